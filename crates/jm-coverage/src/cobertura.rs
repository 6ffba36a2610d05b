use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;

use crate::writer::{format_rate, write_output};
use crate::{
    CodeCoverage, CoverageError, CoverageSummary, FileCoverage, ReportFormat, ReportWriter,
};

#[derive(Debug, Clone, Copy)]
pub struct CoberturaWriter {
    generated: u64,
}

impl CoberturaWriter {
    pub fn new(generated: u64) -> Self {
        Self { generated }
    }

    fn render(&self, coverage: &CodeCoverage) -> Result<String, CoverageError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
        let summary = coverage.summary();

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let mut root = BytesStart::new("coverage");
        root.push_attribute(("line-rate", format_rate(summary.line_rate()).as_str()));
        root.push_attribute(("branch-rate", "0"));
        root.push_attribute((
            "lines-covered",
            summary.covered_lines.to_string().as_str(),
        ));
        root.push_attribute((
            "lines-valid",
            summary.executable_lines.to_string().as_str(),
        ));
        root.push_attribute(("branches-covered", "0"));
        root.push_attribute(("branches-valid", "0"));
        root.push_attribute(("complexity", "0"));
        root.push_attribute(("version", "0.4"));
        root.push_attribute(("timestamp", self.generated.to_string().as_str()));
        writer.write_event(Event::Start(root))?;

        writer.write_event(Event::Start(BytesStart::new("packages")))?;
        for (package, files) in group_by_package(coverage) {
            let package_summary = files
                .iter()
                .map(|(_, lines)| CoverageSummary::of(lines))
                .fold(CoverageSummary::default(), CoverageSummary::add);

            let mut package_tag = BytesStart::new("package");
            package_tag.push_attribute(("name", package.as_str()));
            push_rates(&mut package_tag, package_summary);
            writer.write_event(Event::Start(package_tag))?;
            writer.write_event(Event::Start(BytesStart::new("classes")))?;

            for (file, lines) in files {
                let class_name = Path::new(file)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.to_string());
                let mut class_tag = BytesStart::new("class");
                class_tag.push_attribute(("name", class_name.as_str()));
                class_tag.push_attribute(("filename", file));
                push_rates(&mut class_tag, CoverageSummary::of(lines));
                writer.write_event(Event::Start(class_tag))?;
                writer.write_event(Event::Empty(BytesStart::new("methods")))?;
                writer.write_event(Event::Start(BytesStart::new("lines")))?;
                for (line, hits) in lines {
                    let mut line_tag = BytesStart::new("line");
                    line_tag.push_attribute(("number", line.to_string().as_str()));
                    line_tag.push_attribute(("hits", hits.to_string().as_str()));
                    writer.write_event(Event::Empty(line_tag))?;
                }
                writer.write_event(Event::End(BytesEnd::new("lines")))?;
                writer.write_event(Event::End(BytesEnd::new("class")))?;
            }

            writer.write_event(Event::End(BytesEnd::new("classes")))?;
            writer.write_event(Event::End(BytesEnd::new("package")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("packages")))?;
        writer.write_event(Event::End(BytesEnd::new("coverage")))?;

        let mut buffer = writer.into_inner();
        buffer.push(b'\n');
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

// Packages are the directories holding the covered files.
fn group_by_package(coverage: &CodeCoverage) -> BTreeMap<String, Vec<(&str, &FileCoverage)>> {
    let mut packages: BTreeMap<String, Vec<(&str, &FileCoverage)>> = BTreeMap::new();
    for (file, lines) in &coverage.files {
        let package = Path::new(file)
            .parent()
            .map(|parent| parent.to_string_lossy().replace('\\', "/"))
            .filter(|parent| !parent.is_empty())
            .unwrap_or_else(|| ".".to_string());
        packages
            .entry(package)
            .or_default()
            .push((file.as_str(), lines));
    }
    packages
}

fn push_rates(tag: &mut BytesStart<'_>, summary: CoverageSummary) {
    tag.push_attribute(("line-rate", format_rate(summary.line_rate()).as_str()));
    tag.push_attribute(("branch-rate", "0"));
    tag.push_attribute(("complexity", "0"));
}

impl ReportWriter for CoberturaWriter {
    fn format(&self) -> ReportFormat {
        ReportFormat::Cobertura
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
