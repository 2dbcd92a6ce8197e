//! Positioned text: the unit of composition for all emission.
//!
//! Every expression and statement emitter returns a [`Fragment`]: the
//! emitted text plus a list of (byte offset, original position) mappings
//! local to that text. Fragments compose with [`Fragment::push`], which
//! re-bases the child's offsets by the length of text already
//! accumulated. Composition is associative, so emitters are free to
//! build sub-fragments in any grouping; the offsets come out the same.
//!
//! The writer in [`crate::sourcemap`] is the only consumer that turns
//! relative offsets into absolute generated line/column records.

use reef_common::Pos;

/// Emitted text plus relative source-position mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    text: String,
    mappings: Vec<(u32, Pos)>,
}

impl Fragment {
    /// An empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fragment of plain text with no mappings.
    pub fn lit(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mappings: Vec::new(),
        }
    }

    /// The accumulated text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The relative mappings, ordered by offset.
    pub fn mappings(&self) -> &[(u32, Pos)] {
        &self.mappings
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.mappings.is_empty()
    }

    /// Append plain text.
    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Record a mapping from the current end of the text to `pos`.
    /// `None` records nothing, so synthesized nodes cost nothing here.
    pub fn map_pos(&mut self, pos: Option<Pos>) {
        if let Some(p) = pos {
            self.mappings.push((self.text.len() as u32, p));
        }
    }

    /// Append another fragment, re-basing its mapping offsets by the
    /// length of the text already held.
    pub fn push(&mut self, other: Fragment) {
        let base = self.text.len() as u32;
        self.text.push_str(&other.text);
        self.mappings
            .extend(other.mappings.into_iter().map(|(off, pos)| (base + off, pos)));
    }

    /// Append a list of fragments joined by `sep`.
    pub fn push_join(&mut self, parts: Vec<Fragment>, sep: &str) {
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                self.push_str(sep);
            }
            self.push(part);
        }
    }

    /// Decompose into text and mappings.
    pub fn into_parts(self) -> (String, Vec<(u32, Pos)>) {
        (self.text, self.mappings)
    }
}

/// Quote a string as a JavaScript double-quoted literal.
///
/// Every non-ASCII character is escaped as `\uXXXX` (surrogate pairs for
/// astral-plane characters), so emitted text is pure ASCII and generated
/// columns measured in bytes equal columns measured in UTF-16 code units,
/// the unit the source-map format counts in.
pub fn quote_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (' '..='\u{7e}').contains(&c) => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{:04x}", unit));
                }
            }
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_rebases_offsets() {
        let mut child = Fragment::new();
        child.map_pos(Some(Pos::new(3, 7)));
        child.push_str("abc");

        let mut parent = Fragment::lit("xxxx");
        parent.push(child);

        assert_eq!(parent.text(), "xxxxabc");
        assert_eq!(parent.mappings(), &[(4, Pos::new(3, 7))]);
    }

    #[test]
    fn push_is_associative() {
        let frag = |text: &str, line: u32| {
            let mut f = Fragment::new();
            f.map_pos(Some(Pos::new(line, 0)));
            f.push_str(text);
            f
        };

        let mut left = frag("aa", 1);
        left.push(frag("bbb", 2));
        left.push(frag("c", 3));

        let mut right_tail = frag("bbb", 2);
        right_tail.push(frag("c", 3));
        let mut right = frag("aa", 1);
        right.push(right_tail);

        assert_eq!(left, right);
        assert_eq!(
            left.mappings(),
            &[(0, Pos::new(1, 0)), (2, Pos::new(2, 0)), (5, Pos::new(3, 0))]
        );
    }

    #[test]
    fn map_pos_none_records_nothing() {
        let mut f = Fragment::lit("x");
        f.map_pos(None);
        assert!(f.mappings().is_empty());
    }

    #[test]
    fn join_with_separator() {
        let mut f = Fragment::new();
        f.push_join(
            vec![Fragment::lit("a"), Fragment::lit("b"), Fragment::lit("c")],
            ", ",
        );
        assert_eq!(f.text(), "a, b, c");
    }

    #[test]
    fn quote_escapes() {
        assert_eq!(quote_js_string("hi"), "\"hi\"");
        assert_eq!(quote_js_string("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote_js_string("a\nb"), "\"a\\nb\"");
        assert_eq!(quote_js_string("caf\u{e9}"), "\"caf\\u00e9\"");
        // astral-plane char becomes a surrogate pair
        assert_eq!(quote_js_string("\u{1f600}"), "\"\\ud83d\\ude00\"");
    }
}
