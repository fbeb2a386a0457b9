//! Line-oriented block scanner for CAPL sources.
//!
//! One forward pass over the file recognizes the handful of top-level
//! constructs CAPL has — `includes {}`, `variables {}`, `on <event>` handlers,
//! functions, `testfunction`s, and `testcase`s — using keyword matching plus
//! brace-depth tracking on a comment/literal-masked view of each line (see
//! [`lines`]). There is no grammar and no AST; everything inside a recognized
//! block is skipped wholesale.
//!
//! Scanning is a pure function of the input lines: the same content always
//! produces the same ordered element sequence, and the sequence is emitted in
//! ascending `start_line` order by construction.

mod lines;

use std::path::{Path, PathBuf};

use smol_str::SmolStr;

use crate::base::LineSpan;
use crate::elements::{
    Element, Function, Handler, IncludeBlock, TestCase, TestFunction, VariablesBlock,
};
use crate::error::CaplError;
use crate::store::CaplFileStore;

/// Scanner handle bound to one file.
///
/// Thin wrapper over a [`CaplFileStore`]; the actual work happens in
/// [`scan_lines`], which is also usable directly on an in-memory line
/// sequence.
#[derive(Debug)]
pub struct CaplScanner {
    store: CaplFileStore,
}

impl CaplScanner {
    /// Open a CAPL file for scanning.
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

    /// The scanned file's path.
    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Raw lines of the scanned file, terminators included.
    pub fn lines(&self) -> &[String] {
        self.store.lines()
    }

    /// Scan the file into its ordered element sequence.
    pub fn scan(&self) -> Vec<Element> {
        scan_lines(self.store.lines())
    }

    /// All test cases, in declaration order.
    pub fn test_cases(&self) -> Vec<TestCase> {
        self.scan()
            .into_iter()
            .filter_map(|e| match e {
                Element::TestCase(tc) => Some(tc),
                _ => None,
            })
            .collect()
    }

    /// All test functions, in declaration order.
    pub fn test_functions(&self) -> Vec<TestFunction> {
        self.scan()
            .into_iter()
            .filter_map(|e| match e {
                Element::TestFunction(tf) => Some(tf),
                _ => None,
            })
            .collect()
    }

    /// All event handlers, in declaration order.
    pub fn handlers(&self) -> Vec<Handler> {
        self.scan()
            .into_iter()
            .filter_map(|e| match e {
                Element::Handler(h) => Some(h),
                _ => None,
            })
            .collect()
    }

    /// All plain functions, in declaration order.
    pub fn functions(&self) -> Vec<Function> {
        self.scan()
            .into_iter()
            .filter_map(|e| match e {
                Element::Function(f) => Some(f),
                _ => None,
            })
            .collect()
    }
}

/// Which section keyword opened a block.
#[derive(Clone, Copy)]
enum SectionKind {
    Include,
    Variables,
}

/// Scan a line sequence into its ordered element list.
///
/// Deterministic and side-effect-free; tolerates empty input, comment-only
/// input, and mixed CRLF/LF terminators. A block whose closing brace never
/// appears is closed at end-of-file and reported via `tracing::warn!` —
/// malformed input never makes the scanner fail.
pub fn scan_lines(input: &[String]) -> Vec<Element> {
    let mut state = lines::MaskState::new();
    let masked: Vec<Vec<char>> = input
        .iter()
        .map(|l| lines::mask_line(l, &mut state).chars().collect())
        .collect();
    let raw: Vec<Vec<char>> = input.iter().map(|l| l.chars().collect()).collect();

    let mut elements = Vec::new();
    let mut i = 0;
    while i < input.len() {
        match recognize_at(&raw, &masked, i) {
            Some((element, next)) => {
                elements.push(element);
                i = next;
            }
            None => i += 1,
        }
    }

    tracing::debug!(
        "Scanned {} elements from {} lines",
        elements.len(),
        input.len()
    );
    elements
}

/// Try to open a construct at line `i`. Returns the completed element and
/// the line index to resume scanning from.
fn recognize_at(
    raw: &[Vec<char>],
    masked: &[Vec<char>],
    i: usize,
) -> Option<(Element, usize)> {
    // next_word skips indentation, so a match here is a line-leading keyword.
    let (word, _, word_end) = lines::next_word(&masked[i], 0)?;

    match word.as_str() {
        "includes" | "include" => scan_section(raw, masked, i, word_end, SectionKind::Include),
        "variables" | "variable" => scan_section(raw, masked, i, word_end, SectionKind::Variables),
        "on" => scan_handler(raw, masked, i, word_end),
        "testcase" => scan_testcase(raw, masked, i, word_end),
        "testfunction" => scan_testfunction(raw, masked, i, word_end),
        _ => scan_function(raw, masked, i, &word, word_end),
    }
}

fn scan_section(
    raw: &[Vec<char>],
    masked: &[Vec<char>],
    i: usize,
    after_keyword: usize,
    kind: SectionKind,
) -> Option<(Element, usize)> {
    let (brace_line, brace_col) = find_char_from(masked, i, after_keyword, '{')?;
    if !only_whitespace_between(masked, i, after_keyword, brace_line, brace_col) {
        return None;
    }

    let (end_line, next) = close_block(masked, i, brace_line, brace_col);
    let span = LineSpan::new(i, end_line);

    let element = match kind {
        SectionKind::Include => Element::Include(IncludeBlock {
            included_files: collect_included_files(raw, span),
            span,
        }),
        SectionKind::Variables => Element::Variables(VariablesBlock { span }),
    };
    Some((element, next))
}

fn scan_handler(
    raw: &[Vec<char>],
    masked: &[Vec<char>],
    i: usize,
    after_on: usize,
) -> Option<(Element, usize)> {
    let (event, _, event_end) = lines::next_word(&masked[i], after_on)?;

    let Some((brace_line, brace_col)) = find_char_from(masked, i, event_end, '{') else {
        // Handler header without a body anywhere below it.
        tracing::warn!("Handler 'on {event}' at line {i} has no block; closing at end of file");
        let condition = collect_raw_between(raw, i, event_end, i, raw[i].len());
        let element = Element::Handler(Handler {
            event_type: SmolStr::new(&event),
            condition,
            span: LineSpan::new(i, raw.len() - 1),
        });
        return Some((element, raw.len()));
    };

    let condition = collect_raw_between(raw, i, event_end, brace_line, brace_col);
    let (end_line, next) = close_block(masked, i, brace_line, brace_col);

    let element = Element::Handler(Handler {
        event_type: SmolStr::new(&event),
        condition,
        span: LineSpan::new(i, end_line),
    });
    Some((element, next))
}

fn scan_testcase(
    raw: &[Vec<char>],
    masked: &[Vec<char>],
    i: usize,
    after_keyword: usize,
) -> Option<(Element, usize)> {
    let (name, _, name_end) = lines::next_word(&masked[i], after_keyword)?;
    let paren = lines::next_non_whitespace(&masked[i], name_end)?;
    if masked[i][paren] != '(' {
        return None;
    }
    let (close_line, close_col) = find_char_from(masked, i, paren + 1, ')')?;
    let (brace_line, brace_col) = find_char_from(masked, close_line, close_col + 1, '{')?;
    let (end_line, next) = close_block(masked, i, brace_line, brace_col);

    let element = Element::TestCase(TestCase {
        name: SmolStr::new(&name),
        description: preceding_comment(raw, i),
        group: None,
        span: LineSpan::new(i, end_line),
    });
    Some((element, next))
}

fn scan_testfunction(
    raw: &[Vec<char>],
    masked: &[Vec<char>],
    i: usize,
    after_keyword: usize,
) -> Option<(Element, usize)> {
    let (name, _, name_end) = lines::next_word(&masked[i], after_keyword)?;
    let paren = lines::next_non_whitespace(&masked[i], name_end)?;
    if masked[i][paren] != '(' {
        return None;
    }
    let (close_line, close_col) = find_char_from(masked, i, paren + 1, ')')?;
    let parameters = split_parameters(&collect_raw_between(
        raw,
        i,
        paren + 1,
        close_line,
        close_col,
    ));
    let (brace_line, brace_col) = find_char_from(masked, close_line, close_col + 1, '{')?;
    let (end_line, next) = close_block(masked, i, brace_line, brace_col);

    let element = Element::TestFunction(TestFunction {
        name: SmolStr::new(&name),
        parameters,
        span: LineSpan::new(i, end_line),
    });
    Some((element, next))
}

/// The general `<return_type> <name>(<params>) { ... }` form, tried only
/// after every reserved keyword failed to match. Prototypes (`);`-terminated)
/// and plain statements do not open a block and are skipped.
fn scan_function(
    raw: &[Vec<char>],
    masked: &[Vec<char>],
    i: usize,
    return_type: &str,
    after_type: usize,
) -> Option<(Element, usize)> {
    let (name, _, name_end) = lines::next_word(&masked[i], after_type)?;
    let paren = lines::next_non_whitespace(&masked[i], name_end)?;
    if masked[i][paren] != '(' {
        return None;
    }
    let (close_line, close_col) = find_char_from(masked, i, paren + 1, ')')?;
    let (after_line, after_col) = next_non_whitespace_from(masked, close_line, close_col + 1)?;
    if masked[after_line][after_col] != '{' {
        return None;
    }
    let parameters = split_parameters(&collect_raw_between(
        raw,
        i,
        paren + 1,
        close_line,
        close_col,
    ));
    let (end_line, next) = close_block(masked, i, after_line, after_col);

    let element = Element::Function(Function {
        name: SmolStr::new(&name),
        return_type: SmolStr::new(return_type),
        parameters,
        span: LineSpan::new(i, end_line),
    });
    Some((element, next))
}

/// Track brace depth from the opening brace to depth zero. When the closing
/// brace is missing the block is closed at the last line of the file and a
/// warning is emitted.
fn close_block(
    masked: &[Vec<char>],
    start_line: usize,
    brace_line: usize,
    brace_col: usize,
) -> (usize, usize) {
    let mut depth: i64 = 0;
    for l in brace_line..masked.len() {
        let from = if l == brace_line { brace_col } else { 0 };
        for idx in from..masked[l].len() {
            match masked[l][idx] {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return (l, l + 1);
                    }
                }
                _ => {}
            }
        }
    }

    let last = masked.len() - 1;
    tracing::warn!("Block opened at line {start_line} is never closed; closing at end of file");
    (last, masked.len())
}

/// Find `target` in the masked text starting at `(line, col)`, continuing
/// onto later lines. Literal and comment occurrences are already blanked.
fn find_char_from(
    masked: &[Vec<char>],
    line: usize,
    col: usize,
    target: char,
) -> Option<(usize, usize)> {
    for l in line..masked.len() {
        let from = if l == line { col } else { 0 };
        for idx in from..masked[l].len() {
            if masked[l][idx] == target {
                return Some((l, idx));
            }
        }
    }
    None
}

fn next_non_whitespace_from(
    masked: &[Vec<char>],
    line: usize,
    col: usize,
) -> Option<(usize, usize)> {
    for l in line..masked.len() {
        let from = if l == line { col } else { 0 };
        if let Some(idx) = lines::next_non_whitespace(&masked[l], from) {
            return Some((l, idx));
        }
    }
    None
}

fn only_whitespace_between(
    masked: &[Vec<char>],
    line: usize,
    col: usize,
    end_line: usize,
    end_col: usize,
) -> bool {
    match next_non_whitespace_from(masked, line, col) {
        Some((l, c)) => (l, c) == (end_line, end_col),
        None => false,
    }
}

/// Raw text between two char positions, possibly spanning lines. Each line's
/// contribution is trimmed and the pieces are joined with single spaces, so
/// a multi-line header renders as one readable signature fragment.
fn collect_raw_between(
    raw: &[Vec<char>],
    start_line: usize,
    start_col: usize,
    end_line: usize,
    end_col: usize,
) -> String {
    let mut pieces: Vec<String> = Vec::new();
    for l in start_line..=end_line {
        let from = if l == start_line { start_col } else { 0 };
        let to = if l == end_line { end_col } else { raw[l].len() };
        let piece: String = raw[l][from..to].iter().collect();
        let piece = piece.trim();
        if !piece.is_empty() {
            pieces.push(piece.to_string());
        }
    }
    pieces.join(" ")
}

/// Split a parameter list on commas, trimming each entry; empty parentheses
/// yield an empty list.
fn split_parameters(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Every `#include "..."` or `#include <...>` file name inside a span.
fn collect_included_files(raw: &[Vec<char>], span: LineSpan) -> Vec<String> {
    let mut files = Vec::new();
    for line in &raw[span.start..=span.end] {
        let text: String = line.iter().collect();
        let trimmed = text.trim_start();
        let Some(rest) = trimmed.strip_prefix("#include") else {
            continue;
        };
        if let Some(name) = extract_include_name(rest) {
            files.push(name);
        }
    }
    files
}

fn extract_include_name(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let (open, close) = match rest.chars().next()? {
        '"' => ('"', '"'),
        '<' => ('<', '>'),
        _ => return None,
    };
    let inner = &rest[open.len_utf8()..];
    let end = inner.find(close)?;
    Some(inner[..end].to_string())
}

/// Description for a test case: the `//` comment on the line directly above
/// it, if there is one.
fn preceding_comment(raw: &[Vec<char>], i: usize) -> String {
    if i == 0 {
        return String::new();
    }
    let text: String = raw[i - 1].iter().collect();
    let trimmed = text.trim();
    match trimmed.strip_prefix("//") {
        Some(comment) => comment.trim().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_lines(content: &str) -> Vec<String> {
        content
            .split_inclusive('\n')
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_keyword_inside_string_does_not_open_block() {
        let input = to_lines("void log() {\n    write(\"variables {\");\n}\n");
        let elements = scan_lines(&input);
        assert_eq!(elements.len(), 1);
        assert!(matches!(elements[0], Element::Function(_)));
    }

    #[test]
    fn test_keyword_inside_comment_does_not_open_block() {
        let input = to_lines("// on start {\n/* testcase Fake() {\n} */\n");
        assert!(scan_lines(&input).is_empty());
    }

    #[test]
    fn test_brace_on_later_line() {
        let input = to_lines("on someipSD *\n{\n    write(\"sd\");\n}\n");
        let elements = scan_lines(&input);
        assert_eq!(elements.len(), 1);
        let Element::Handler(h) = &elements[0] else {
            panic!("expected handler, got {:?}", elements[0]);
        };
        assert_eq!(h.event_type, "someipSD");
        assert_eq!(h.condition, "*");
        assert_eq!(h.span, crate::base::LineSpan::new(0, 3));
    }

    #[test]
    fn test_multi_line_function_signature() {
        let input = to_lines("int clamp(int value,\n          int limit)\n{\n    return value;\n}\n");
        let elements = scan_lines(&input);
        assert_eq!(elements.len(), 1);
        let Element::Function(f) = &elements[0] else {
            panic!("expected function");
        };
        assert_eq!(f.name, "clamp");
        assert_eq!(f.parameters, vec!["int value", "int limit"]);
        assert_eq!(f.span.end, 4);
    }

    #[test]
    fn test_prototype_is_not_a_block() {
        let input = to_lines("void forwardDecl(int a);\nvoid real() {\n}\n");
        let elements = scan_lines(&input);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].name(), "real");
    }

    #[test]
    fn test_nested_braces_stay_inside_block() {
        let input = to_lines("on start {\n    if (1) {\n        write(\"x\");\n    }\n}\n");
        let elements = scan_lines(&input);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].end_line(), 4);
    }

    #[test]
    fn test_unterminated_block_closes_at_eof() {
        let input = to_lines("variables {\n    int x;\n");
        let elements = scan_lines(&input);
        assert_eq!(elements.len(), 1);
        assert_eq!(elements[0].end_line(), 1);
    }

    #[test]
    fn test_include_names_with_both_quote_styles() {
        let input = to_lines("includes {\n    #include \"a.cin\",\n    #include <b.cin>\n}\n");
        let elements = scan_lines(&input);
        let Element::Include(inc) = &elements[0] else {
            panic!("expected include block");
        };
        assert_eq!(inc.included_files, vec!["a.cin", "b.cin"]);
    }

    #[test]
    fn test_testcase_description_from_preceding_comment() {
        let input = to_lines("// Checks the happy path\ntestcase TC_Happy() {\n}\n");
        let elements = scan_lines(&input);
        let Element::TestCase(tc) = &elements[0] else {
            panic!("expected testcase");
        };
        assert_eq!(tc.description, "Checks the happy path");
        assert!(tc.group.is_none());
    }
}
