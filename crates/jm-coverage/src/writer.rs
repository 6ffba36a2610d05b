use std::fs;
use std::path::Path;

use crate::{CloverWriter, CoberturaWriter, CodeCoverage, CoverageError, HtmlWriter, TextWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Clover,
    Cobertura,
    Html,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriterOptions {
    /// Unix timestamp stamped into XML reports.
    pub generated: u64,
    pub low_upper_bound: u32,
    pub high_lower_bound: u32,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            generated: 0,
            low_upper_bound: 50,
            high_lower_bound: 90,
        }
    }
}

pub trait ReportWriter {
    fn format(&self) -> ReportFormat;

    /// Renders `coverage`. When `destination` is set the report is also written there.
    fn process(
        &self,
        coverage: &CodeCoverage,
        destination: Option<&Path>,
    ) -> Result<String, CoverageError>;
}

/// Picks the writer for `format`. Called once per output of a run.
pub fn select_writer(
    format: ReportFormat,
    options: &WriterOptions,
) -> Result<Box<dyn ReportWriter>, CoverageError> {
    let writer: Box<dyn ReportWriter> = match format {
        ReportFormat::Clover => Box::new(CloverWriter::new(options.generated)),
        ReportFormat::Cobertura => Box::new(CoberturaWriter::new(options.generated)),
        ReportFormat::Text => Box::new(TextWriter),
        ReportFormat::Html => Box::new(HtmlWriter::new(
            options.low_upper_bound,
            options.high_lower_bound,
        )?),
    };
    Ok(writer)
}

pub(crate) fn write_output(path: &Path, payload: &str) -> Result<(), CoverageError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|source| CoverageError::WriteReport {
        path: parent.to_path_buf(),
        source,
    })?;
    fs::write(path, payload).map_err(|source| CoverageError::WriteReport {
        path: path.to_path_buf(),
        source,
    })
}

/// Rounds a ratio to four decimals for XML rate attributes.
pub(crate) fn format_rate(rate: f64) -> String {
    format!("{}", (rate * 10_000.0).round() / 10_000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_writer_resolves_each_format() {
        let options = WriterOptions::default();
        for format in [
            ReportFormat::Clover,
            ReportFormat::Cobertura,
            ReportFormat::Html,
            ReportFormat::Text,
        ] {
            let writer = select_writer(format, &options).expect("writer should resolve");
            assert_eq!(writer.format(), format);
        }
    }

    #[test]
    fn select_writer_rejects_inverted_html_bounds() {
        let options = WriterOptions {
            low_upper_bound: 95,
            high_lower_bound: 90,
            ..WriterOptions::default()
        };
        let error = select_writer(ReportFormat::Html, &options)
            .err()
            .expect("inverted bounds should fail");
        assert!(matches!(error, CoverageError::InvalidBounds { .. }));
        assert!(select_writer(ReportFormat::Clover, &options).is_ok());
    }

    #[test]
    fn format_rate_trims_to_four_decimals() {
        assert_eq!(format_rate(0.5), "0.5");
        assert_eq!(format_rate(1.0 / 3.0), "0.3333");
        assert_eq!(format_rate(1.0), "1");
    }
}
