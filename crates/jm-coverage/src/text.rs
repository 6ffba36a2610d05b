use std::fmt::Write as _;
use std::path::Path;

use crate::writer::write_output;
use crate::{CodeCoverage, CoverageError, CoverageSummary, ReportFormat, ReportWriter};

/// Plain-text summary, one line per file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextWriter;

impl TextWriter {
    fn render(&self, coverage: &CodeCoverage) -> String {
        let mut buffer = String::new();
        let _ = writeln!(buffer, "Code Coverage Report Summary:");
        let _ = writeln!(buffer, "  Lines: {}", describe(coverage.summary()));
        for (file, summary) in coverage.file_summaries() {
            let _ = writeln!(buffer);
            let _ = writeln!(buffer, "{}", file);
            let _ = writeln!(buffer, "  Lines: {}", describe(summary));
        }
        buffer
    }
}

fn describe(summary: CoverageSummary) -> String {
    format!(
        "{:.2}% ({}/{})",
        summary.percent(),
        summary.covered_lines,
        summary.executable_lines
    )
}

impl ReportWriter for TextWriter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }

    fn process(
        &self,
        coverage: &CodeCoverage,
        destination: Option<&Path>,
    ) -> Result<String, CoverageError> {
        let buffer = self.render(coverage);
        if let Some(path) = destination {
            write_output(path, &buffer)?;
        }
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_report_lists_totals_then_files() {
        let mut coverage = CodeCoverage::new();
        coverage.add_line("src/a.php", 1, 1);
        coverage.add_line("src/a.php", 2, 0);
        coverage.add_line("src/a.php", 3, 0);

        let rendered = TextWriter.process(&coverage, None).expect("render should pass");
        assert_eq!(
            rendered,
            "Code Coverage Report Summary:\n  Lines: 33.33% (1/3)\n\nsrc/a.php\n  Lines: 33.33% (1/3)\n"
        );
    }
}
