/// Line-range tracking for scanned elements
///
/// Stores the textual extent of a recognized construct as 0-indexed line
/// numbers, both inclusive, covering the opening keyword through the
/// closing brace.
/// A span of lines in a source file (0-indexed, inclusive on both ends)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    /// Create a span. Invariant: `start <= end`.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "LineSpan start {start} > end {end}");
        Self { start, end }
    }

    /// Number of lines covered, including both endpoints.
    pub fn line_count(&self) -> usize {
        self.end - self.start + 1
    }

    /// Check if a line number falls within this span.
    pub fn contains(&self, line: usize) -> bool {
        line >= self.start && line <= self.end
    }
}
