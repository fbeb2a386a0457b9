//! Test-case group derivation.
//!
//! Groups are not part of the scanned syntax. A test case whose body calls
//! `InitializeTestGroup("<Name>")` establishes `<Name>` as the current group
//! for itself and every test case after it in scan order, until a different
//! call appears. Test cases before the first such call belong to no group.
//!
//! This is an order-dependent side table computed at resolution time, kept
//! out of the scanner on purpose so scanning stays free of insertion
//! semantics.

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::constants::GROUP_INIT_CALL;
use crate::elements::{Element, TestCase};

/// Group membership for one scanned element sequence.
///
/// Stale after any line mutation, like every other line-addressed result;
/// re-derive from a fresh scan instead of caching across insertions.
#[derive(Debug, Default)]
pub struct GroupTable {
    /// Group name → end line of the group's last member, in first-seen order.
    groups: IndexMap<SmolStr, usize>,
    /// Test-case start line → assigned group.
    assignments: IndexMap<usize, SmolStr>,
}

impl GroupTable {
    /// Derive the table from a scanned element sequence and the lines it
    /// was scanned from.
    pub fn derive(elements: &[Element], lines: &[String]) -> Self {
        let mut table = Self::default();
        let mut current: Option<SmolStr> = None;

        for element in elements {
            let Element::TestCase(tc) = element else {
                continue;
            };
            let body = &lines[tc.span.start..=tc.span.end];
            if let Some(name) = find_group_init(body) {
                current = Some(SmolStr::new(name));
            }
            if let Some(group) = &current {
                // insert() keeps the first-seen position, updating the value
                table.groups.insert(group.clone(), tc.span.end);
                table.assignments.insert(tc.span.start, group.clone());
            }
        }

        table
    }

    /// Distinct group names in order of first appearance.
    pub fn names(&self) -> impl Iterator<Item = &SmolStr> {
        self.groups.keys()
    }

    /// Whether any group was derived.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// End line (closing brace) of the last test case in a group.
    pub fn last_member_end(&self, name: &str) -> Option<usize> {
        self.groups.get(name).copied()
    }

    /// Group assigned to the test case starting at `start_line`, if any.
    pub fn group_of(&self, start_line: usize) -> Option<&SmolStr> {
        self.assignments.get(&start_line)
    }

    /// A fresh copy of a test case with its derived group filled in.
    pub fn annotate(&self, tc: &TestCase) -> TestCase {
        TestCase {
            group: self.group_of(tc.span.start).cloned(),
            ..tc.clone()
        }
    }
}

/// Find the literal group name in the first group-initialization call within
/// a test-case body.
fn find_group_init(body: &[String]) -> Option<&str> {
    for line in body {
        let Some(idx) = line.find(GROUP_INIT_CALL) else {
            continue;
        };
        let rest = line[idx + GROUP_INIT_CALL.len()..].trim_start();
        let Some(args) = rest.strip_prefix('(') else {
            continue;
        };
        let args = args.trim_start();
        let Some(quoted) = args.strip_prefix('"') else {
            continue;
        };
        if let Some(end) = quoted.find('"') {
            return Some(&quoted[..end]);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_lines;

    fn to_lines(content: &str) -> Vec<String> {
        content.split_inclusive('\n').map(str::to_string).collect()
    }

    const GROUPED: &str = "\
testcase Ungrouped() {\n\
}\n\
testcase StartA() {\n\
    InitializeTestGroup(\"GroupA\");\n\
}\n\
testcase InheritsA() {\n\
}\n\
testcase StartB() {\n\
    InitializeTestGroup(\"GroupB\");\n\
}\n";

    #[test]
    fn test_group_applies_to_declarer_and_successors() {
        let lines = to_lines(GROUPED);
        let elements = scan_lines(&lines);
        let table = GroupTable::derive(&elements, &lines);

        assert_eq!(table.group_of(0), None);
        assert_eq!(table.group_of(2).map(SmolStr::as_str), Some("GroupA"));
        assert_eq!(table.group_of(5).map(SmolStr::as_str), Some("GroupA"));
        assert_eq!(table.group_of(7).map(SmolStr::as_str), Some("GroupB"));
    }

    #[test]
    fn test_names_in_first_seen_order() {
        let lines = to_lines(GROUPED);
        let elements = scan_lines(&lines);
        let table = GroupTable::derive(&elements, &lines);

        let names: Vec<&str> = table.names().map(SmolStr::as_str).collect();
        assert_eq!(names, vec!["GroupA", "GroupB"]);
    }

    #[test]
    fn test_last_member_end_tracks_latest_member() {
        let lines = to_lines(GROUPED);
        let elements = scan_lines(&lines);
        let table = GroupTable::derive(&elements, &lines);

        // GroupA's last member is InheritsA (lines 5-6), GroupB's is StartB.
        assert_eq!(table.last_member_end("GroupA"), Some(6));
        assert_eq!(table.last_member_end("GroupB"), Some(9));
        assert_eq!(table.last_member_end("GroupC"), None);
    }

    #[test]
    fn test_no_calls_means_empty_table() {
        let lines = to_lines("testcase TC1() {\n}\n");
        let elements = scan_lines(&lines);
        let table = GroupTable::derive(&elements, &lines);
        assert!(table.is_empty());
    }
}
