use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::writer::write_output;
use crate::{CodeCoverage, CoverageError, CoverageSummary, ReportFormat, ReportWriter};

#[derive(Debug, Clone, Copy)]
pub struct CloverWriter {
    generated: u64,
}

impl CloverWriter {
    pub fn new(generated: u64) -> Self {
        Self { generated }
    }

    fn render(&self, coverage: &CodeCoverage) -> Result<String, CoverageError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        let generated = self.generated.to_string();

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut root = BytesStart::new("coverage");
        root.push_attribute(("generated", generated.as_str()));
        writer.write_event(Event::Start(root))?;
        let mut project = BytesStart::new("project");
        project.push_attribute(("timestamp", generated.as_str()));
        writer.write_event(Event::Start(project))?;

        for (file, lines) in &coverage.files {
            let mut file_tag = BytesStart::new("file");
            file_tag.push_attribute(("name", file.as_str()));
            writer.write_event(Event::Start(file_tag))?;
            for (line, hits) in lines {
                let mut line_tag = BytesStart::new("line");
                line_tag.push_attribute(("num", line.to_string().as_str()));
                line_tag.push_attribute(("type", "stmt"));
                line_tag.push_attribute(("count", hits.to_string().as_str()));
                writer.write_event(Event::Empty(line_tag))?;
            }
            writer.write_event(Event::Empty(metrics_tag(CoverageSummary::of(lines), None)))?;
            writer.write_event(Event::End(BytesEnd::new("file")))?;
        }

        writer.write_event(Event::Empty(metrics_tag(
            coverage.summary(),
            Some(coverage.files.len()),
        )))?;
        writer.write_event(Event::End(BytesEnd::new("project")))?;
        writer.write_event(Event::End(BytesEnd::new("coverage")))?;

        let mut buffer = writer.into_inner();
        buffer.push(b'\n');
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn metrics_tag(summary: CoverageSummary, files: Option<usize>) -> BytesStart<'static> {
    let mut tag = BytesStart::new("metrics");
    if let Some(files) = files {
        tag.push_attribute(("files", files.to_string().as_str()));
    }
    let statements = summary.executable_lines.to_string();
    let covered = summary.covered_lines.to_string();
    tag.push_attribute(("statements", statements.as_str()));
    tag.push_attribute(("coveredstatements", covered.as_str()));
    tag.push_attribute(("elements", statements.as_str()));
    tag.push_attribute(("coveredelements", covered.as_str()));
    tag
}

impl ReportWriter for CloverWriter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Clover
    }

    fn process(
        &self,
        coverage: &CodeCoverage,
        destination: Option<&Path>,
    ) -> Result<String, CoverageError> {
        let buffer = self.render(coverage)?;
        if let Some(path) = destination {
            write_output(path, &buffer)?;
        }
        Ok(buffer)
    }
}
