//! The location descriptor grammar.
//!
//! A location is a string of the form `section:<name>`, `after:<target>`, or
//! `before:<target>`. Keywords are case-sensitive; whitespace around every
//! component is insignificant, so `"section:  include  "` resolves exactly
//! like `"section:include"`.

use crate::error::CaplError;

/// A parsed insertion location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Before the closing brace of a named section or test-case group.
    Section(String),
    /// Directly after the last line of a named element.
    After(String),
    /// Directly before the first line of a named element.
    Before(String),
}

impl Location {
    /// Parse a location descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`CaplError::LocationNotFound`] when the descriptor has no
    /// recognized prefix.
    pub fn parse(location: &str) -> Result<Self, CaplError> {
        let trimmed = location.trim();
        if let Some(name) = trimmed.strip_prefix("section:") {
            Ok(Self::Section(name.trim().to_string()))
        } else if let Some(target) = trimmed.strip_prefix("after:") {
            Ok(Self::After(target.trim().to_string()))
        } else if let Some(target) = trimmed.strip_prefix("before:") {
            Ok(Self::Before(target.trim().to_string()))
        } else {
            Err(CaplError::LocationNotFound(trimmed.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("section:include", Location::Section("include".to_string()))]
    #[case("section:  include  ", Location::Section("include".to_string()))]
    #[case("  after:on key 'a'", Location::After("on key 'a'".to_string()))]
    #[case("before: void f() ", Location::Before("void f()".to_string()))]
    fn test_parse_valid(#[case] input: &str, #[case] expected: Location) {
        assert_eq!(Location::parse(input).unwrap(), expected);
    }

    #[rstest]
    #[case("Section:include")]
    #[case("inside:variables")]
    #[case("variables")]
    fn test_parse_invalid_prefix(#[case] input: &str) {
        assert!(matches!(
            Location::parse(input),
            Err(CaplError::LocationNotFound(_))
        ));
    }
}
