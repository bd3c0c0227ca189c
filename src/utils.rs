//! Utility helpers shared across the crate.

/// A utility struct to convert byte offsets to line and column numbers.
#[derive(Debug, Clone, Default)]
pub struct LineIndex {
    /// Stores the byte index of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    /// Creates a new `LineIndex` by scanning the source code for newlines.
    /// Uses byte iteration for performance since '\n' is always a single byte in UTF-8.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                // Record the start of the next line (current newline index + 1)
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Converts a byte offset to a 1-indexed line number.
    #[must_use]
    pub fn line_index(&self, offset: usize) -> usize {
        // Binary search to find which line range the offset falls into.
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    /// Converts a byte offset to a 1-indexed `(line, column)` pair.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self.line_index(offset);
        let line_start = self.line_starts.get(line - 1).copied().unwrap_or(0);
        (line, offset.saturating_sub(line_start) + 1)
    }
}
