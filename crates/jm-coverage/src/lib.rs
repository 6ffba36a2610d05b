mod clover;
mod cobertura;
mod coverage;
mod html;
mod text;
mod writer;

pub use clover::CloverWriter;
pub use cobertura::CoberturaWriter;
pub use coverage::{CodeCoverage, CoverageSummary, FileCoverage};
pub use html::HtmlWriter;
pub use text::TextWriter;
pub use writer::{select_writer, ReportFormat, ReportWriter, WriterOptions};

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("Failed to read coverage file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} doesn't contain a valid coverage object: {source}")]
    InvalidCoverage {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to write report {path}: {source}")]
    WriteReport {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize report: {0}")]
    Serialize(#[from] quick_xml::Error),
    #[error("Invalid HTML bounds: lowUpperBound {low_upper_bound} exceeds highLowerBound {high_lower_bound}.")]
    InvalidBounds {
        low_upper_bound: u32,
        high_lower_bound: u32,
    },
}
