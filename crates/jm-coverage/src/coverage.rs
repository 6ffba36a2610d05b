use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{select_writer, CoverageError, ReportFormat, WriterOptions};

/// Line hit counts keyed by line number.
pub type FileCoverage = BTreeMap<u32, u64>;

/// Accumulated line coverage of one or more test runs.
///
/// Dumps are JSON objects of the shape
/// `{"files": {"src/Foo.php": {"12": 3, "13": 0}}}`: a listed line is
/// executable, its value is how often it ran.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCoverage {
    pub files: BTreeMap<String, FileCoverage>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageSummary {
    pub executable_lines: usize,
    pub covered_lines: usize,
}

impl CoverageSummary {
    pub fn of(lines: &FileCoverage) -> Self {
        Self {
            executable_lines: lines.len(),
            covered_lines: lines.values().filter(|hits| **hits > 0).count(),
        }
    }

    /// Covered share in `0.0..=1.0`. A file without executable lines counts as fully covered.
    pub fn line_rate(&self) -> f64 {
        if self.executable_lines == 0 {
            return 1.0;
        }
        self.covered_lines as f64 / self.executable_lines as f64
    }

    pub fn percent(&self) -> f64 {
        self.line_rate() * 100.0
    }

    pub(crate) fn add(self, other: Self) -> Self {
        Self {
            executable_lines: self.executable_lines + other.executable_lines,
            covered_lines: self.covered_lines + other.covered_lines,
        }
    }
}

impl CodeCoverage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(path: &Path) -> Result<Self, CoverageError> {
        let raw = fs::read_to_string(path).map_err(|source| CoverageError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| CoverageError::InvalidCoverage {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn add_line(&mut self, file: impl Into<String>, line: u32, hits: u64) {
        let entry = self
            .files
            .entry(file.into())
            .or_default()
            .entry(line)
            .or_insert(0);
        *entry = entry.saturating_add(hits);
    }

    /// Folds `other` into `self`; hit counts of the same line add up.
    pub fn merge(&mut self, other: CodeCoverage) {
        for (file, lines) in other.files {
            for (line, hits) in lines {
                self.add_line(file.as_str(), line, hits);
            }
        }
    }

    pub fn file_summaries(&self) -> impl Iterator<Item = (&str, CoverageSummary)> {
        self.files
            .iter()
            .map(|(file, lines)| (file.as_str(), CoverageSummary::of(lines)))
    }

    pub fn summary(&self) -> CoverageSummary {
        self.file_summaries()
            .map(|(_, summary)| summary)
            .fold(CoverageSummary::default(), CoverageSummary::add)
    }

    /// Renders in `format` and writes to `destination` when one is given.
    pub fn render(
        &self,
        format: ReportFormat,
        options: &WriterOptions,
        destination: Option<&Path>,
    ) -> Result<String, CoverageError> {
        select_writer(format, options)?.process(self, destination)
    }
}
