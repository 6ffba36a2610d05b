use std::fs;
use std::io;
use std::path::Path;

use jm_core::{CaseNode, MergedChild, MergedReport, MergedSuite, MergerError};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;

static TESTSUITES_TAG: &str = "testsuites";
static TESTSUITE_TAG: &str = "testsuite";
static TESTCASE_TAG: &str = "testcase";

pub fn render_report(report: &MergedReport) -> Result<String, MergerError> {
    let mut buffer = Vec::new();
    serialize_report(report, &mut buffer).map_err(map_serialize)?;
    // Add a trailing newline.
    buffer.push(b'\n');
    String::from_utf8(buffer).map_err(|error| MergerError::new("REPORT_SERIALIZE", error.to_string()))
}

/// Renders `report` and writes it to `path`, creating missing parent directories.
pub fn write_report(path: &Path, report: &MergedReport) -> Result<(), MergerError> {
    let payload = render_report(report)?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|error| map_write(error, parent))?;
    fs::write(path, payload).map_err(|error| map_write(error, path))?;
    debug!(path = %path.display(), "merged report written");
    Ok(())
}

fn serialize_report(report: &MergedReport, writer: impl io::Write) -> quick_xml::Result<()> {
    let mut writer = Writer::new_with_indent(writer, b' ', 4);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    if report.suites.is_empty() {
        return writer.write_event(Event::Empty(BytesStart::new(TESTSUITES_TAG)));
    }

    writer.write_event(Event::Start(BytesStart::new(TESTSUITES_TAG)))?;
    for suite in &report.suites {
        serialize_testsuite(suite, &mut writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new(TESTSUITES_TAG)))
}

fn serialize_testsuite(
    suite: &MergedSuite,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let mut tag = BytesStart::new(TESTSUITE_TAG);
    for (key, value) in &suite.attributes {
        tag.push_attribute((key.as_str(), value.as_str()));
    }

    if suite.children.is_empty() {
        return writer.write_event(Event::Empty(tag));
    }

    writer.write_event(Event::Start(tag))?;
    for child in &suite.children {
        match child {
            MergedChild::Suite(suite) => serialize_testsuite(suite, writer)?,
            MergedChild::Case(case) => serialize_testcase(case, writer)?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(TESTSUITE_TAG)))
}

fn serialize_testcase(case: &CaseNode, writer: &mut Writer<impl io::Write>) -> quick_xml::Result<()> {
    let mut tag = BytesStart::new(TESTCASE_TAG);
    for (key, value) in &case.attributes {
        tag.push_attribute((key.as_str(), value.as_str()));
    }

    if case.outcomes.is_empty() {
        return writer.write_event(Event::Empty(tag));
    }

    writer.write_event(Event::Start(tag))?;
    for outcome in &case.outcomes {
        let outcome_tag = BytesStart::new(outcome.tag.as_str());
        match outcome.text.as_deref() {
            Some(text) => {
                writer.write_event(Event::Start(outcome_tag))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new(outcome.tag.as_str())))?;
            }
            None => writer.write_event(Event::Empty(outcome_tag))?,
        }
    }
    writer.write_event(Event::End(BytesEnd::new(TESTCASE_TAG)))
}

fn map_serialize(error: quick_xml::Error) -> MergerError {
    MergerError::new("REPORT_SERIALIZE", error.to_string())
}

fn map_write(error: io::Error, path: &Path) -> MergerError {
    MergerError::with_path(
        "REPORT_WRITE",
        format!("cannot write {}: {}", path.display(), error),
        path,
    )
}
