use std::path::Path;

use quick_xml::escape::escape;
use tracing::debug;

use crate::writer::write_output;
use crate::{CodeCoverage, CoverageError, CoverageSummary, ReportFormat, ReportWriter};

const INDEX_FILE: &str = "index.html";

const STYLE: &str = "body{font-family:sans-serif}table{border-collapse:collapse}\
td,th{padding:4px 8px;border:1px solid #ccc}\
.low{background:#f2dede}.medium{background:#fcf8e3}.high{background:#dff0d8}";

/// Single-page HTML report. `destination` is a directory that receives `index.html`.
#[derive(Debug, Clone, Copy)]
pub struct HtmlWriter {
    low_upper_bound: u32,
    high_lower_bound: u32,
}

impl HtmlWriter {
    pub fn new(low_upper_bound: u32, high_lower_bound: u32) -> Result<Self, CoverageError> {
        if low_upper_bound > high_lower_bound {
            return Err(CoverageError::InvalidBounds {
                low_upper_bound,
                high_lower_bound,
            });
        }
        Ok(Self {
            low_upper_bound,
            high_lower_bound,
        })
    }

    fn level(&self, summary: CoverageSummary) -> &'static str {
        let percent = summary.percent();
        if percent < f64::from(self.low_upper_bound) {
            "low"
        } else if percent < f64::from(self.high_lower_bound) {
            "medium"
        } else {
            "high"
        }
    }

    fn render(&self, coverage: &CodeCoverage) -> String {
        let mut page = format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n\
<head><meta charset=\"UTF-8\"><title>Code Coverage</title><style>{}</style></head>\n\
<body>\n<h1>Code Coverage</h1>\n<table>\n\
<thead><tr><th>File</th><th>Lines</th><th>Coverage</th></tr></thead>\n<tbody>\n",
            STYLE
        );
        page.push_str(&self.row("Total", coverage.summary()));
        for (file, summary) in coverage.file_summaries() {
            page.push_str(&self.row(file, summary));
        }
        page.push_str("</tbody>\n</table>\n");
        page.push_str(&format!(
            "<footer>Low: 0% to {low}%, Medium: {low}% to {high}%, High: {high}% to 100%</footer>\n",
            low = self.low_upper_bound,
            high = self.high_lower_bound
        ));
        page.push_str("</body>\n</html>\n");
        page
    }

    fn row(&self, label: &str, summary: CoverageSummary) -> String {
        format!(
            "<tr class=\"{}\"><td>{}</td><td>{} / {}</td><td>{:.2}%</td></tr>\n",
            self.level(summary),
            escape(label),
            summary.covered_lines,
            summary.executable_lines,
            summary.percent()
        )
    }
}

impl ReportWriter for HtmlWriter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Html
    }

    fn process(
        &self,
        coverage: &CodeCoverage,
        destination: Option<&Path>,
    ) -> Result<String, CoverageError> {
        let page = self.render(coverage);
        if let Some(directory) = destination {
            let index = directory.join(INDEX_FILE);
            write_output(&index, &page)?;
            debug!(path = %index.display(), "html report written");
        }
        Ok(page)
    }
}
