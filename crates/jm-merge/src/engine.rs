use jm_core::{Attributes, CaseNode, MergedReport, Numeric, OutcomeChild, SuiteId, SuiteNode};
use jm_parser::RawNode;
use tracing::debug;

const TESTSUITES_TAG: &str = "testsuites";
const TESTSUITE_TAG: &str = "testsuite";
const TESTCASE_TAG: &str = "testcase";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub files: usize,
    pub suites: usize,
    pub cases: usize,
    pub duplicate_cases: usize,
    pub unnamed_cases: usize,
}

/// Folds loaded reports, one after the other, into a single suite tree.
///
/// The first report that introduces a suite or case name fixes its position
/// and descriptive attributes. Later suite occurrences only add to the
/// numeric totals; later case occurrences are dropped.
#[derive(Debug, Default)]
pub struct MergeEngine {
    registry: crate::SuiteRegistry,
    stats: MergeStats,
}

impl MergeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> MergeStats {
        MergeStats {
            suites: self.registry.suite_count(),
            cases: self.registry.case_count(),
            ..self.stats
        }
    }

    pub fn registry(&self) -> &crate::SuiteRegistry {
        &self.registry
    }

    /// Merges one report. A `<testsuites>` root is never a suite itself,
    /// whatever attributes it carries; a bare `<testsuite>` root is.
    pub fn merge_document(&mut self, document: &RawNode) {
        self.stats.files += 1;
        if document.tag == TESTSUITES_TAG {
            self.merge_suites(None, document.children(TESTSUITE_TAG));
        } else {
            self.merge_suites(None, std::slice::from_ref(document));
        }
    }

    pub fn merge_suites(&mut self, root: Option<SuiteId>, suites: &[RawNode]) {
        for raw in suites {
            let Some(name) = raw.attribute("name").filter(|name| !name.is_empty()) else {
                if raw.has_children(TESTSUITE_TAG) {
                    self.merge_suites(root, raw.children(TESTSUITE_TAG));
                }
                continue;
            };

            let id = match self.registry.lookup_suite(name) {
                Some(id) => id,
                None => self.create_suite(root, name, raw),
            };

            if raw.has_children(TESTSUITE_TAG) {
                self.merge_suites(Some(id), raw.children(TESTSUITE_TAG));
            }

            if raw.has_children(TESTCASE_TAG) {
                let cases = raw.children(TESTCASE_TAG);
                if self.introduces_case(cases) {
                    for (key, value) in &raw.attributes {
                        if let Some(value) = Numeric::parse(value) {
                            self.add_attribute_value(id, key, value);
                        }
                    }
                }
                self.merge_cases(id, cases);
            }
        }
    }

    /// Adds `value` to `key` on the suite and on every suite enclosing it.
    pub fn add_attribute_value(&mut self, id: SuiteId, key: &str, value: Numeric) {
        // `line` has no meaning on a suite and `name` is the registry key.
        if key == "line" || key == "name" {
            return;
        }

        let chain = self.registry.ancestors(id).collect::<Vec<_>>();
        for suite_id in chain {
            let attributes = &mut self.registry.suite_mut(suite_id).attributes;
            let current = attributes
                .get(key)
                .and_then(|raw| Numeric::parse(raw))
                .unwrap_or_default();
            attributes.insert(key.to_string(), (current + value).to_string());
        }
    }

    pub fn merge_cases(&mut self, parent: SuiteId, cases: &[RawNode]) {
        for raw in cases {
            let Some(name) = raw.attribute("name").filter(|name| !name.is_empty()) else {
                self.stats.unnamed_cases += 1;
                continue;
            };
            if self.registry.contains_case(name) {
                debug!(case = name, "dropping duplicate testcase");
                self.stats.duplicate_cases += 1;
                continue;
            }

            for (key, value) in &raw.attributes {
                if let Some(value) = Numeric::parse(value) {
                    self.add_attribute_value(parent, key, value);
                }
            }

            let case = CaseNode {
                attributes: raw.attributes.clone(),
                outcomes: outcome_children(raw),
            };
            self.registry.insert_case(parent, name, case);
        }
    }

    pub fn finish(self) -> MergedReport {
        self.registry.into_report()
    }

    fn create_suite(&mut self, root: Option<SuiteId>, name: &str, raw: &RawNode) -> SuiteId {
        debug!(suite = name, "creating testsuite");
        let mut node = SuiteNode::new(name, root);
        // Totals are rebuilt through aggregation, so only the name is copied as written.
        node.attributes = raw
            .attributes
            .iter()
            .filter(|(key, _)| key.as_str() != "line")
            .map(|(key, value)| {
                let value = if key == "name" { value.clone() } else { "0".to_string() };
                (key.clone(), value)
            })
            .collect::<Attributes>();
        self.registry.insert_suite(node)
    }

    // A suite occurrence whose cases are all known contributes nothing.
    fn introduces_case(&self, cases: &[RawNode]) -> bool {
        cases.iter().any(|case| {
            case.attribute("name")
                .is_some_and(|name| !name.is_empty() && !self.registry.contains_case(name))
        })
    }
}

fn outcome_children(raw: &RawNode) -> Vec<OutcomeChild> {
    raw.children
        .iter()
        .map(|(tag, elements)| {
            let texts = elements
                .iter()
                .filter_map(|element| element.text.as_deref())
                .collect::<Vec<_>>();
            OutcomeChild {
                tag: tag.clone(),
                text: if texts.is_empty() {
                    None
                } else {
                    Some(texts.join(", "))
                },
            }
        })
        .collect()
}
