use std::collections::{HashMap, HashSet};

use jm_core::{CaseNode, MergedChild, MergedReport, MergedSuite, ReportChild, SuiteId, SuiteNode};

/// Every suite and case materialized during one merge run, keyed by name.
///
/// Suites live in an arena and refer to their parent by id. A parent is always
/// inserted before its children, so parent ids are strictly smaller and the
/// ancestor chain cannot loop.
#[derive(Debug, Default)]
pub struct SuiteRegistry {
    suites: Vec<SuiteNode>,
    suite_names: HashMap<String, SuiteId>,
    case_names: HashSet<String>,
    roots: Vec<SuiteId>,
}

impl SuiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup_suite(&self, name: &str) -> Option<SuiteId> {
        self.suite_names.get(name).copied()
    }

    /// Registers `node` and appends it below its parent, or at the top level.
    pub fn insert_suite(&mut self, node: SuiteNode) -> SuiteId {
        let id = SuiteId(self.suites.len());
        self.suite_names.insert(node.name.clone(), id);
        match node.parent {
            Some(parent) => self.suites[parent.0].children.push(ReportChild::Suite(id)),
            None => self.roots.push(id),
        }
        self.suites.push(node);
        id
    }

    pub fn suite(&self, id: SuiteId) -> &SuiteNode {
        &self.suites[id.0]
    }

    pub fn suite_mut(&mut self, id: SuiteId) -> &mut SuiteNode {
        &mut self.suites[id.0]
    }

    pub fn suite_count(&self) -> usize {
        self.suites.len()
    }

    /// `id` followed by each enclosing suite up to the top level.
    pub fn ancestors(&self, id: SuiteId) -> impl Iterator<Item = SuiteId> + '_ {
        std::iter::successors(Some(id), move |current| self.suite(*current).parent)
    }

    pub fn contains_case(&self, name: &str) -> bool {
        self.case_names.contains(name)
    }

    pub fn case_count(&self) -> usize {
        self.case_names.len()
    }

    /// Appends `case` to `parent`. Returns false when the name is already taken.
    pub fn insert_case(&mut self, parent: SuiteId, name: &str, case: CaseNode) -> bool {
        if !self.case_names.insert(name.to_string()) {
            return false;
        }
        self.suites[parent.0].children.push(ReportChild::Case(case));
        true
    }

    /// Detaches the tree from the arena, dropping the parent links.
    pub fn into_report(self) -> MergedReport {
        let mut slots = self.suites.into_iter().map(Some).collect::<Vec<_>>();
        let suites = self
            .roots
            .iter()
            .filter_map(|id| detach(&mut slots, *id))
            .collect();
        MergedReport { suites }
    }
}

fn detach(slots: &mut [Option<SuiteNode>], id: SuiteId) -> Option<MergedSuite> {
    let node = slots.get_mut(id.0)?.take()?;
    let children = node
        .children
        .into_iter()
        .filter_map(|child| match child {
            ReportChild::Suite(child_id) => detach(slots, child_id).map(MergedChild::Suite),
            ReportChild::Case(case) => Some(MergedChild::Case(case)),
        })
        .collect();
    Some(MergedSuite {
        attributes: node.attributes,
        children,
    })
}
