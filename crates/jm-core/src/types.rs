use indexmap::IndexMap;

pub type Attributes = IndexMap<String, String>;

/// Index of a suite inside the registry arena of one merge run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SuiteId(pub usize);

/// A `testsuite` element while the run is still folding files into it.
#[derive(Debug, Clone, PartialEq)]
pub struct SuiteNode {
    pub name: String,
    pub attributes: Attributes,
    /// Enclosing suite at creation time. Only walked for aggregation, never written out.
    pub parent: Option<SuiteId>,
    pub children: Vec<ReportChild>,
}

impl SuiteNode {
    pub fn new(name: impl Into<String>, parent: Option<SuiteId>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            parent,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReportChild {
    Suite(SuiteId),
    Case(CaseNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseNode {
    pub attributes: Attributes,
    pub outcomes: Vec<OutcomeChild>,
}

impl CaseNode {
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").map(String::as_str)
    }
}

/// `error`, `failure`, `skipped`, ... below a `testcase`. `None` renders self-closing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeChild {
    pub tag: String,
    pub text: Option<String>,
}

/// The finished tree handed to the serializer. Carries no bookkeeping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedReport {
    pub suites: Vec<MergedSuite>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergedSuite {
    pub attributes: Attributes,
    pub children: Vec<MergedChild>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergedChild {
    Suite(MergedSuite),
    Case(CaseNode),
}

impl MergedReport {
    /// Depth-first lookup by suite name.
    pub fn find_suite(&self, name: &str) -> Option<&MergedSuite> {
        self.suites.iter().find_map(|suite| suite.find_suite(name))
    }

    pub fn find_case(&self, name: &str) -> Option<&CaseNode> {
        self.suites.iter().find_map(|suite| suite.find_case(name))
    }
}

impl MergedSuite {
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").map(String::as_str)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn find_suite(&self, name: &str) -> Option<&MergedSuite> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            MergedChild::Suite(suite) => suite.find_suite(name),
            MergedChild::Case(_) => None,
        })
    }

    pub fn find_case(&self, name: &str) -> Option<&CaseNode> {
        self.children.iter().find_map(|child| match child {
            MergedChild::Suite(suite) => suite.find_case(name),
            MergedChild::Case(case) if case.name() == Some(name) => Some(case),
            MergedChild::Case(_) => None,
        })
    }

    pub fn cases(&self) -> impl Iterator<Item = &CaseNode> {
        self.children.iter().filter_map(|child| match child {
            MergedChild::Case(case) => Some(case),
            MergedChild::Suite(_) => None,
        })
    }
}
