//! Line-level text helpers for the scanner.
//!
//! The scanner never parses CAPL properly; it matches keywords and counts
//! braces on a *masked* view of each line in which comment text and
//! string/char literal interiors are replaced by spaces. The mask is
//! char-for-char aligned with the original line, so any char index found in
//! the masked view (a brace position, the end of a keyword) is valid in the
//! raw line as well — which is how signature text is extracted verbatim
//! while literals and comments stay invisible to the matcher.

/// Masking state that survives across lines: `/* ... */` comments may span
/// any number of lines. String and char literals do not.
#[derive(Debug, Default, Clone)]
pub struct MaskState {
    in_block_comment: bool,
}

impl MaskState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Produce the masked view of one line.
///
/// Comment text, `//` and `/*` markers, quotes, and literal interiors all
/// become spaces; line terminators are kept so the result trims like the
/// original. The output has exactly as many chars as the input.
pub fn mask_line(line: &str, state: &mut MaskState) -> String {
    let chars: Vec<char> = line.chars().collect();
    let n = chars.len();
    let mut out = String::with_capacity(line.len());
    let mut in_string = false;
    let mut in_char = false;
    let mut i = 0;

    while i < n {
        let c = chars[i];

        if state.in_block_comment {
            if c == '*' && i + 1 < n && chars[i + 1] == '/' {
                out.push_str("  ");
                state.in_block_comment = false;
                i += 2;
            } else {
                out.push(blank(c));
                i += 1;
            }
            continue;
        }

        if in_string || in_char {
            let quote = if in_string { '"' } else { '\'' };
            if c == '\\' && i + 1 < n {
                out.push_str("  ");
                i += 2;
            } else if c == quote {
                out.push(' ');
                in_string = false;
                in_char = false;
                i += 1;
            } else {
                out.push(blank(c));
                i += 1;
            }
            continue;
        }

        match c {
            '/' if i + 1 < n && chars[i + 1] == '/' => {
                // Rest of the line is comment text.
                for &r in &chars[i..] {
                    out.push(blank(r));
                }
                i = n;
            }
            '/' if i + 1 < n && chars[i + 1] == '*' => {
                out.push_str("  ");
                state.in_block_comment = true;
                i += 2;
            }
            '"' => {
                out.push(' ');
                in_string = true;
                i += 1;
            }
            '\'' => {
                out.push(' ');
                in_char = true;
                i += 1;
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Keep terminators intact so masked lines still end where raw lines end.
fn blank(c: char) -> char {
    if c == '\n' || c == '\r' { c } else { ' ' }
}

/// Check if a character can be part of a CAPL identifier.
#[inline]
pub fn is_word_char(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Find the next word in `chars` at or after `from`, skipping whitespace.
/// Returns `(word, start, end)` as char indices, `end` exclusive.
pub fn next_word(chars: &[char], from: usize) -> Option<(String, usize, usize)> {
    let mut start = from;
    while start < chars.len() && chars[start].is_whitespace() {
        start += 1;
    }
    if start >= chars.len() || !is_word_char(chars[start]) {
        return None;
    }
    let mut end = start;
    while end < chars.len() && is_word_char(chars[end]) {
        end += 1;
    }
    Some((chars[start..end].iter().collect(), start, end))
}

/// Index of the first non-whitespace char at or after `from`, if any.
pub fn next_non_whitespace(chars: &[char], from: usize) -> Option<usize> {
    (from..chars.len()).find(|&i| !chars[i].is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(line: &str) -> String {
        mask_line(line, &mut MaskState::new())
    }

    #[test]
    fn test_mask_preserves_plain_code() {
        assert_eq!(mask("on timer tCyclic {\n"), "on timer tCyclic {\n");
    }

    #[test]
    fn test_mask_blanks_line_comment() {
        assert_eq!(mask("int x; // on start {\n"), "int x;              \n");
    }

    #[test]
    fn test_mask_blanks_string_interior() {
        let masked = mask(r#"write("brace { inside }");"#);
        assert!(!masked.contains('{'));
        assert!(!masked.contains('}'));
        assert!(masked.ends_with(");"));
    }

    #[test]
    fn test_mask_blanks_char_literal() {
        let masked = mask("on key 'a' {");
        assert_eq!(masked, "on key     {");
    }

    #[test]
    fn test_mask_handles_escaped_quote() {
        let masked = mask(r#"write("say \"hi\" {");"#);
        assert!(!masked.contains('{'));
        assert!(masked.ends_with(");"));
    }

    #[test]
    fn test_mask_block_comment_spans_lines() {
        let mut state = MaskState::new();
        let first = mask_line("a /* comment {\n", &mut state);
        let second = mask_line("still } comment */ b\n", &mut state);
        assert_eq!(first, "a             \n");
        assert_eq!(second, "                   b\n");
    }

    #[test]
    fn test_mask_is_char_aligned() {
        let line = "on key 'ä' { // ümlaut";
        let masked = mask(line);
        assert_eq!(masked.chars().count(), line.chars().count());
    }

    #[test]
    fn test_next_word() {
        let chars: Vec<char> = "  testcase TC1()".chars().collect();
        let (word, start, end) = next_word(&chars, 0).unwrap();
        assert_eq!(word, "testcase");
        assert_eq!((start, end), (2, 10));
        let (name, _, _) = next_word(&chars, end).unwrap();
        assert_eq!(name, "TC1");
    }
}
