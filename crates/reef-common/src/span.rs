use serde::Serialize;

/// A position in original Reef source text.
///
/// Line is 1-based and column is 0-based, counted in UTF-16 code units --
/// the convention shared by mainstream JavaScript parsers and by the
/// source-map format the backend emits. Positions ride on AST nodes and
/// flow through code generation unchanged; the source-map encoder converts
/// them to the format's 0-based lines at serialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Pos {
    pub line: u32,
    pub col: u32,
}

impl Pos {
    /// Create a position from a 1-based line and 0-based column.
    pub fn new(line: u32, col: u32) -> Self {
        debug_assert!(line >= 1, "line numbers are 1-based, got {line}");
        Self { line, col }
    }
}

/// Pre-computed index of line start offsets for byte-offset to [`Pos`] lookup.
///
/// Constructed once per source file, then used to convert byte offsets
/// (as a front-end typically tracks them) into line/column positions via
/// binary search. Columns are counted in UTF-16 code units, so astral-plane
/// characters advance the column by two.
#[derive(Debug)]
pub struct LineIndex {
    /// Byte offset of the start of each line. The first entry is always 0.
    line_starts: Vec<u32>,
    source: String,
}

impl LineIndex {
    /// Build a line index by scanning the source text for newline characters.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            line_starts,
            source: source.to_string(),
        }
    }

    /// Convert a byte offset to a [`Pos`].
    ///
    /// Offsets past the end of the source clamp to the final position.
    /// The offset must lie on a character boundary.
    pub fn pos(&self, offset: u32) -> Pos {
        let line_idx = self.line_starts.partition_point(|&start| start <= offset);
        let line_idx = line_idx.saturating_sub(1);
        let line_start = self.line_starts[line_idx] as usize;
        let end = (offset as usize).min(self.source.len());
        let col: usize = self.source[line_start..end]
            .chars()
            .map(|c| c.len_utf16())
            .sum();
        Pos::new((line_idx as u32) + 1, col as u32)
    }

    /// Return the number of lines in the source.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pos_ordering() {
        let a = Pos::new(1, 4);
        let b = Pos::new(2, 0);
        let c = Pos::new(2, 3);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn line_index_single_line() {
        let idx = LineIndex::new("hello");
        assert_eq!(idx.pos(0), Pos::new(1, 0));
        assert_eq!(idx.pos(4), Pos::new(1, 4));
    }

    #[test]
    fn line_index_multiple_lines() {
        let src = "hello\nworld\nfoo";
        let idx = LineIndex::new(src);
        // 'h' is at offset 0 -> line 1, col 0
        assert_eq!(idx.pos(0), Pos::new(1, 0));
        // 'w' is at offset 6 -> line 2, col 0
        assert_eq!(idx.pos(6), Pos::new(2, 0));
        // second 'o' of "foo" is at offset 13 -> line 3, col 1
        assert_eq!(idx.pos(13), Pos::new(3, 1));
    }

    #[test]
    fn line_index_utf16_columns() {
        // '😀' is one char, two UTF-16 code units, four bytes.
        let src = "a😀b";
        let idx = LineIndex::new(src);
        assert_eq!(idx.pos(1), Pos::new(1, 1)); // start of the emoji
        assert_eq!(idx.pos(5), Pos::new(1, 3)); // 'b' after it
    }

    #[test]
    fn line_index_line_count() {
        let idx = LineIndex::new("a\nb\nc");
        assert_eq!(idx.line_count(), 3);
    }
}
