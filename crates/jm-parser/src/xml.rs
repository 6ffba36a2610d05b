use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use jm_core::{Attributes, MergerError};
use roxmltree::{Document, Node, NodeType, ParsingOptions};
use tracing::warn;

const REPORT_ROOTS: [&str; 2] = ["testsuites", "testsuite"];

/// One decoded XML element.
///
/// Child elements are grouped by tag name in order of first appearance and
/// every group is a sequence, so a single `<testcase>` and a run of them look
/// the same to the merge engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawNode {
    pub tag: String,
    pub attributes: Attributes,
    pub children: IndexMap<String, Vec<RawNode>>,
    pub text: Option<String>,
}

impl RawNode {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn children(&self, tag: &str) -> &[RawNode] {
        self.children.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has_children(&self, tag: &str) -> bool {
        !self.children(tag).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_none()
    }
}

pub fn parse_report(source: &str) -> Result<RawNode, MergerError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let document = Document::parse_with_options(source, options)
        .map_err(|error| MergerError::new("XML_PARSE_ERROR", error.to_string()))?;

    let Some(root) = document.root().children().find(|node| node.is_element()) else {
        return Err(MergerError::new(
            "XML_PARSE_ERROR",
            "XML document must contain a root element.",
        ));
    };

    let tag = root.tag_name().name();
    if !REPORT_ROOTS.contains(&tag) {
        return Err(MergerError::new(
            "REPORT_NOT_JUNIT",
            format!("<{}> is not a JUnit report root.", tag),
        ));
    }

    let node = parse_element(root);
    if node.is_empty() {
        return Err(MergerError::new(
            "REPORT_EMPTY",
            format!("<{}> carries no attributes or children.", node.tag),
        ));
    }

    Ok(node)
}

pub fn read_report(path: &Path) -> Result<RawNode, MergerError> {
    let source = fs::read_to_string(path)
        .map_err(|error| MergerError::with_path("REPORT_READ", error.to_string(), path))?;
    parse_report(&source).map_err(|error| MergerError {
        path: Some(path.to_path_buf()),
        ..error
    })
}

/// Loads one shard. Anything that keeps the file from being merged is logged and skipped.
pub fn load_report(path: &Path) -> Option<RawNode> {
    match read_report(path) {
        Ok(node) => Some(node),
        Err(error) => {
            warn!(path = %path.display(), code = %error.code, "skipping report: {}", error.message);
            None
        }
    }
}

fn parse_element(node: Node<'_, '_>) -> RawNode {
    let mut attributes = Attributes::new();
    for attribute in node.attributes() {
        attributes.insert(attribute.name().to_string(), attribute.value().to_string());
    }

    let mut children: IndexMap<String, Vec<RawNode>> = IndexMap::new();
    let mut text = String::new();
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => {
                let parsed = parse_element(child);
                children.entry(parsed.tag.clone()).or_default().push(parsed);
            }
            NodeType::Text => text.push_str(child.text().unwrap_or_default()),
            _ => {}
        }
    }

    RawNode {
        tag: node.tag_name().name().to_string(),
        attributes,
        children,
        text: if text.trim().is_empty() { None } else { Some(text) },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        std::env::temp_dir().join(format!("junit-merger-{}-{}", name, nanos))
    }

    #[test]
    fn parse_report_groups_single_and_repeated_children_as_sequences() {
        let source = r#"
<testsuites>
  <testsuite name="A" tests="1">
    <testcase name="t1" time="0.1"/>
  </testsuite>
  <testsuite name="B" tests="2">
    <testcase name="t2"/>
    <testcase name="t3"/>
  </testsuite>
</testsuites>"#;
        let root = parse_report(source).expect("report should parse");
        assert_eq!(root.tag, "testsuites");

        let suites = root.children("testsuite");
        assert_eq!(suites.len(), 2);
        assert_eq!(suites[0].children("testcase").len(), 1);
        assert_eq!(suites[1].children("testcase").len(), 2);
        assert_eq!(suites[0].attribute("tests"), Some("1"));
        assert!(root.children("testcase").is_empty());
    }

    #[test]
    fn parse_report_keeps_attribute_order_and_raw_values() {
        let source = r#"<testsuite name="A" tests="01" time="0.50" file="a.php"/>"#;
        let root = parse_report(source).expect("report should parse");
        let keys = root.attributes.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(keys, vec!["name", "tests", "time", "file"]);
        assert_eq!(root.attribute("tests"), Some("01"));
        assert_eq!(root.attribute("time"), Some("0.50"));
    }

    #[test]
    fn parse_report_keeps_element_text_and_cdata() {
        let source = r#"<testsuite name="A"><testcase name="t"><error type="E">boom</error><failure><![CDATA[x < y]]></failure><skipped/></testcase></testsuite>"#;
        let suite = parse_report(source).expect("report should parse");
        let root = &suite.children("testcase")[0];
        assert_eq!(root.children("error")[0].text.as_deref(), Some("boom"));
        assert_eq!(root.children("failure")[0].text.as_deref(), Some("x < y"));
        assert_eq!(root.children("skipped")[0].text, None);
        let tags = root.children.keys().map(String::as_str).collect::<Vec<_>>();
        assert_eq!(tags, vec!["error", "failure", "skipped"]);
    }

    #[test]
    fn parse_report_rejects_invalid_xml() {
        let error = parse_report("<testsuites>").expect_err("invalid xml should fail");
        assert_eq!(error.code, "XML_PARSE_ERROR");

        let error = parse_report("<?xml version=\"1.0\"?><!---->")
            .expect_err("missing root element should fail");
        assert_eq!(error.code, "XML_PARSE_ERROR");
    }

    #[test]
    fn parse_report_rejects_semantically_empty_documents() {
        let error = parse_report("<testsuites>\n  </testsuites>").expect_err("empty root");
        assert_eq!(error.code, "REPORT_EMPTY");
    }

    #[test]
    fn parse_report_rejects_foreign_roots() {
        let error = parse_report(r#"<project name="my-app" version="3"><modules/></project>"#)
            .expect_err("non-report root should fail");
        assert_eq!(error.code, "REPORT_NOT_JUNIT");

        let error = parse_report(r#"<testcase name="t"/>"#).expect_err("bare testcase root");
        assert_eq!(error.code, "REPORT_NOT_JUNIT");
    }

    #[test]
    fn parse_report_accepts_doctype_declarations() {
        let source = r#"<?xml version="1.0"?>
<!DOCTYPE testsuites>
<testsuites><testsuite name="A" tests="1"><testcase name="t1"/></testsuite></testsuites>"#;
        let root = parse_report(source).expect("doctype should be accepted");
        assert_eq!(root.children("testsuite")[0].attribute("name"), Some("A"));
    }

    #[test]
    fn read_report_attaches_path_to_errors() {
        let path = temp_path("broken.xml");
        fs::write(&path, "<testsuites><testsuite").expect("write fixture");
        let error = read_report(&path).expect_err("broken file should fail");
        assert_eq!(error.code, "XML_PARSE_ERROR");
        assert_eq!(error.path.as_deref(), Some(path.as_path()));

        let missing = temp_path("missing.xml");
        let error = read_report(&missing).expect_err("missing file should fail");
        assert_eq!(error.code, "REPORT_READ");
    }

    #[test]
    fn load_report_skips_unusable_files() {
        let broken = temp_path("load-broken.xml");
        fs::write(&broken, "not xml at all").expect("write fixture");
        assert!(load_report(&broken).is_none());

        let foreign = temp_path("load-pom.xml");
        fs::write(&foreign, r#"<project name="my-app"><modules/></project>"#).expect("write fixture");
        assert!(load_report(&foreign).is_none());

        let valid = temp_path("load-valid.xml");
        fs::write(&valid, r#"<testsuites><testsuite name="A"/></testsuites>"#)
            .expect("write fixture");
        let node = load_report(&valid).expect("valid file should load");
        assert_eq!(node.children("testsuite")[0].attribute("name"), Some("A"));
    }
}
