//! Element model for scanned CAPL constructs.
//!
//! Every top-level construct the scanner recognizes becomes one [`Element`].
//! The enum is closed: consumers match exhaustively on the variant instead of
//! inspecting a class hierarchy. Elements are passive records — once a scan
//! returns, nothing creates, mutates, or destroys them; a fresh scan yields a
//! fresh, independent sequence.

use std::fmt;

use smol_str::SmolStr;

use crate::base::LineSpan;

/// A recognized top-level CAPL construct with its line extent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// An `includes { ... }` block; collects every `#include` inside it.
    Include(IncludeBlock),
    /// A `variables { ... }` block.
    Variables(VariablesBlock),
    /// An `on <event> <condition> { ... }` event handler.
    Handler(Handler),
    /// A top-level non-test function definition.
    Function(Function),
    /// A `testfunction name(...) { ... }` block.
    TestFunction(TestFunction),
    /// A `testcase name() { ... }` block.
    TestCase(TestCase),
}

/// An `includes { ... }` block. Multiple `#include` statements collapse into
/// this one element; the span covers the outer block, not the statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeBlock {
    pub included_files: Vec<String>,
    pub span: LineSpan,
}

/// A `variables { ... }` block. At most one per file in practice, though the
/// scanner does not enforce that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariablesBlock {
    pub span: LineSpan,
}

/// An event handler. `condition` is the free text between the event type and
/// the opening brace, trimmed; empty for bare events like `on start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handler {
    pub event_type: SmolStr,
    pub condition: String,
    pub span: LineSpan,
}

/// A plain function definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: SmolStr,
    pub return_type: SmolStr,
    pub parameters: Vec<String>,
    pub span: LineSpan,
}

/// A `testfunction` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFunction {
    pub name: SmolStr,
    pub parameters: Vec<String>,
    pub span: LineSpan,
}

/// A `testcase` block. `description` comes from an immediately preceding
/// `//` comment when one exists. `group` is assigned by the processor's
/// group derivation, never by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub name: SmolStr,
    pub description: String,
    pub group: Option<SmolStr>,
    pub span: LineSpan,
}

impl Handler {
    /// One-line rendering of the handler header, brace excluded.
    pub fn signature(&self) -> String {
        if self.condition.is_empty() {
            format!("on {}", self.event_type)
        } else {
            format!("on {} {}", self.event_type, self.condition)
        }
    }
}

impl Function {
    pub fn signature(&self) -> String {
        format!("{} {}({})", self.return_type, self.name, self.parameters.join(", "))
    }
}

impl TestFunction {
    pub fn signature(&self) -> String {
        format!("testfunction {}({})", self.name, self.parameters.join(", "))
    }
}

impl TestCase {
    pub fn signature(&self) -> String {
        format!("testcase {}()", self.name)
    }
}

impl Element {
    /// Identifier of the element. Blocks without a declared name use their
    /// canonical block name.
    pub fn name(&self) -> String {
        match self {
            Element::Include(_) => "Includes".to_string(),
            Element::Variables(_) => "Variables".to_string(),
            Element::Handler(h) => {
                if h.condition.is_empty() {
                    h.event_type.to_string()
                } else {
                    format!("{} {}", h.event_type, h.condition)
                }
            }
            Element::Function(f) => f.name.to_string(),
            Element::TestFunction(tf) => tf.name.to_string(),
            Element::TestCase(tc) => tc.name.to_string(),
        }
    }

    /// Full textual extent, opening keyword through closing brace.
    pub fn span(&self) -> LineSpan {
        match self {
            Element::Include(e) => e.span,
            Element::Variables(e) => e.span,
            Element::Handler(e) => e.span,
            Element::Function(e) => e.span,
            Element::TestFunction(e) => e.span,
            Element::TestCase(e) => e.span,
        }
    }

    /// First line of the construct (0-indexed).
    pub fn start_line(&self) -> usize {
        self.span().start
    }

    /// Line of the closing brace (0-indexed, inclusive).
    pub fn end_line(&self) -> usize {
        self.span().end
    }

    /// Human-readable one-line rendering of the construct's header.
    pub fn signature(&self) -> String {
        match self {
            Element::Include(_) => "includes {...}".to_string(),
            Element::Variables(_) => "variables {...}".to_string(),
            Element::Handler(h) => h.signature(),
            Element::Function(f) => f.signature(),
            Element::TestFunction(tf) => tf.signature(),
            Element::TestCase(tc) => tc.signature(),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (lines {}-{})",
            self.signature(),
            self.start_line(),
            self.end_line()
        )
    }
}
