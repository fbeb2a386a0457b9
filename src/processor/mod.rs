//! Location resolution and code insertion for CAPL files.
//!
//! [`CaplProcessor`] owns the file's line store, re-scans it on every
//! insertion, resolves a [`Location`] descriptor to an exact line index, and
//! splices the new code in. All mutation stays in memory until
//! [`save`](CaplProcessor::save); a failed resolution therefore never leaves
//! a partially written file behind.
//!
//! Because an insertion shifts every following line, element positions from
//! before the splice are stale afterwards. The processor never caches them —
//! each `insert` call starts from a fresh scan.

mod groups;
mod location;

pub use groups::GroupTable;
pub use location::Location;

use std::path::{Path, PathBuf};

use crate::base::constants::{
    INCLUDE_ALIASES, INCLUDES_SECTION, VARIABLE_ALIASES, VARIABLES_SECTION,
};
use crate::elements::{Element, TestCase};
use crate::error::CaplError;
use crate::scanner::scan_lines;
use crate::store::CaplFileStore;

/// Editor for one CAPL file: resolves semantic locations and inserts code.
#[derive(Debug)]
pub struct CaplProcessor {
    store: CaplFileStore,
}

impl CaplProcessor {
    /// Open a CAPL file for editing.
    ///
    /// # Errors
    ///
    /// Returns [`CaplError::MissingFile`] or [`CaplError::FileRead`] when the
    /// file cannot be loaded.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CaplError> {
        Ok(Self {
            store: CaplFileStore::open(path)?,
        })
    }

    /// The edited file's path.
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Current in-memory lines, including any unsaved insertions.
    pub fn lines(&self) -> &[String] {
        self.store.lines()
    }

    /// Scan the current in-memory content.
    pub fn scan(&self) -> Vec<Element> {
        scan_lines(self.store.lines())
    }

    /// Test cases of the current content with their derived groups filled in.
    pub fn grouped_test_cases(&self) -> Vec<TestCase> {
        let elements = self.scan();
        let table = GroupTable::derive(&elements, self.store.lines());
        elements
            .iter()
            .filter_map(|e| match e {
                Element::TestCase(tc) => Some(table.annotate(tc)),
                _ => None,
            })
            .collect()
    }

    /// Insert `code` at the line identified by `location`.
    ///
    /// `code` may span multiple lines and is spliced in verbatim; any line
    /// missing a terminator gets one appended. Returns `Ok(true)` on success
    /// — an unresolvable location is an error, never a silent no-op.
    ///
    /// # Errors
    ///
    /// [`CaplError::SectionNotFound`] for an unknown `section:` target (the
    /// message enumerates every available section and group) and
    /// [`CaplError::LocationNotFound`] for an unknown `after:`/`before:`
    /// target or a malformed descriptor.
    pub fn insert(&mut self, location: &str, code: &str) -> Result<bool, CaplError> {
        let location = Location::parse(location)?;
        let elements = scan_lines(self.store.lines());
        let at = self.resolve(&location, &elements)?;

        let new_lines = split_code(code);
        tracing::debug!(
            "Inserting {} line(s) at line {} in {}",
            new_lines.len(),
            at,
            self.store.path().display()
        );
        self.store.insert_lines(at, new_lines);
        Ok(true)
    }

    /// Persist the current in-memory lines back to the file.
    ///
    /// # Errors
    ///
    /// Returns [`CaplError::FileWrite`] if the file cannot be written.
    pub fn save(&self) -> Result<(), CaplError> {
        self.store.save()
    }

    /// Map a parsed location to the insertion line under the current,
    /// pre-insertion numbering.
    fn resolve(&self, location: &Location, elements: &[Element]) -> Result<usize, CaplError> {
        match location {
            Location::Section(name) => self.resolve_section(name, elements),
            Location::After(target) => match find_element(elements, target) {
                Some(element) => Ok(element.end_line() + 1),
                None => Err(CaplError::LocationNotFound(target.clone())),
            },
            Location::Before(target) => match find_element(elements, target) {
                Some(element) => Ok(element.start_line()),
                None => Err(CaplError::LocationNotFound(target.clone())),
            },
        }
    }

    /// Resolve a `section:` target: the section aliases first, then derived
    /// group names. The insertion point is the closing-brace line, so the
    /// new code lands just inside the block (for a group: inside its last
    /// test case).
    fn resolve_section(&self, name: &str, elements: &[Element]) -> Result<usize, CaplError> {
        let include = elements
            .iter()
            .find(|e| matches!(e, Element::Include(_)));
        let variables = elements
            .iter()
            .find(|e| matches!(e, Element::Variables(_)));
        let table = GroupTable::derive(elements, self.store.lines());

        if INCLUDE_ALIASES.contains(&name) {
            if let Some(element) = include {
                return Ok(element.end_line());
            }
        } else if VARIABLE_ALIASES.contains(&name) {
            if let Some(element) = variables {
                return Ok(element.end_line());
            }
        } else if let Some(end) = table.last_member_end(name) {
            return Ok(end);
        }

        let mut available: Vec<String> = Vec::new();
        if include.is_some() {
            available.push(INCLUDES_SECTION.to_string());
        }
        if variables.is_some() {
            available.push(VARIABLES_SECTION.to_string());
        }
        available.extend(table.names().map(|n| n.to_string()));
        Err(CaplError::section_not_found(name, &available))
    }
}

/// First element whose name or rendered signature equals the target exactly.
fn find_element<'a>(elements: &'a [Element], target: &str) -> Option<&'a Element> {
    elements
        .iter()
        .find(|e| e.name() == target || e.signature() == target)
}

/// Split an arbitrary code blob into store-ready lines, appending a
/// terminator where one is missing.
fn split_code(code: &str) -> Vec<String> {
    code.split_inclusive('\n')
        .map(|l| {
            if l.ends_with('\n') {
                l.to_string()
            } else {
                format!("{l}\n")
            }
        })
        .collect()
}
