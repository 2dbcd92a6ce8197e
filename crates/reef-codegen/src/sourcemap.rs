//! Source position tracking and source-map construction.
//!
//! [`Writer`] is the append-only accumulator the program emitter drives:
//! plain text advances the generated line/column counters, and splicing
//! in a [`Fragment`] re-bases the fragment's relative mappings onto the
//! current absolute position, recording one [`Record`] per mapping.
//!
//! [`SourceMap`] turns the accumulated records into the standard v3
//! artifact: one `;`-separated group of Base64-VLQ segments per generated
//! line, each segment encoding deltas of generated column, source index,
//! original line, and original column.
//!
//! Generated columns are counted in UTF-16 code units, matching the
//! format; original positions come in with 1-based lines and are shifted
//! to the format's 0-based lines at encoding time.

use reef_common::Pos;
use serde::Serialize;

use crate::fragment::Fragment;

/// One absolute mapping: a generated position and the original source
/// position it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    pub gen_line: u32,
    pub gen_col: u32,
    pub pos: Pos,
}

/// Append-only output accumulator with line/column tracking.
#[derive(Debug, Default)]
pub struct Writer {
    out: String,
    line: u32,
    col: u32,
    records: Vec<Record>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The text accumulated so far.
    pub fn text(&self) -> &str {
        &self.out
    }

    /// Current generated (line, column), both 0-based.
    pub fn position(&self) -> (u32, u32) {
        (self.line, self.col)
    }

    /// Append plain text, advancing the position counters.
    pub fn push_str(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += c.len_utf16() as u32;
            }
        }
        self.out.push_str(s);
    }

    /// Splice in a fragment: record each of its relative mappings at the
    /// absolute position it lands on, then append its text.
    pub fn push_fragment(&mut self, frag: Fragment) {
        let (text, mappings) = frag.into_parts();
        let mut line = self.line;
        let mut col = self.col;
        let mut pending = mappings.iter().peekable();
        for (i, c) in text.char_indices() {
            while let Some(&&(off, pos)) = pending.peek() {
                if off as usize == i {
                    self.records.push(Record {
                        gen_line: line,
                        gen_col: col,
                        pos,
                    });
                    pending.next();
                } else {
                    break;
                }
            }
            if c == '\n' {
                line += 1;
                col = 0;
            } else {
                col += c.len_utf16() as u32;
            }
        }
        for &(_, pos) in pending {
            self.records.push(Record {
                gen_line: line,
                gen_col: col,
                pos,
            });
        }
        self.out.push_str(&text);
        self.line = line;
        self.col = col;
    }

    /// Finish, handing back the text and the mapping records.
    pub fn into_parts(self) -> (String, Vec<Record>) {
        (self.out, self.records)
    }
}

/// The source-map v3 artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMap {
    pub version: u32,
    pub sources: Vec<String>,
    #[serde(rename = "sourcesContent", skip_serializing_if = "Option::is_none")]
    pub sources_content: Option<Vec<String>>,
    pub names: Vec<String>,
    pub mappings: String,
}

impl SourceMap {
    /// Build the artifact from accumulated records.
    ///
    /// Records are sorted by generated position first; emission order is
    /// already nearly sorted, so this is cheap.
    pub fn build(records: &[Record], source_name: &str, source_text: Option<&str>) -> Self {
        let mut sorted = records.to_vec();
        sorted.sort_by_key(|r| (r.gen_line, r.gen_col));

        let mut mappings = String::new();
        let mut cur_line = 0u32;
        let mut first_in_line = true;
        let mut prev_gen_col = 0i64;
        let mut prev_src_line = 0i64;
        let mut prev_src_col = 0i64;

        for r in &sorted {
            while cur_line < r.gen_line {
                mappings.push(';');
                cur_line += 1;
                prev_gen_col = 0;
                first_in_line = true;
            }
            if !first_in_line {
                mappings.push(',');
            }
            let src_line = i64::from(r.pos.line) - 1;
            let src_col = i64::from(r.pos.col);
            encode_vlq(i64::from(r.gen_col) - prev_gen_col, &mut mappings);
            encode_vlq(0, &mut mappings);
            encode_vlq(src_line - prev_src_line, &mut mappings);
            encode_vlq(src_col - prev_src_col, &mut mappings);
            prev_gen_col = i64::from(r.gen_col);
            prev_src_line = src_line;
            prev_src_col = src_col;
            first_in_line = false;
        }

        SourceMap {
            version: 3,
            sources: vec![source_name.to_string()],
            sources_content: source_text.map(|t| vec![t.to_string()]),
            names: Vec::new(),
            mappings,
        }
    }

    /// Serialize to JSON text.
    ///
    /// # Errors
    ///
    /// Returns a serialization error from `serde_json` (none is expected
    /// for this shape in practice).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

const BASE64: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Append one Base64-VLQ value: sign bit in the lowest position, then
/// 5-bit groups little-endian with a continuation bit.
fn encode_vlq(value: i64, out: &mut String) {
    let mut v = if value < 0 {
        (((-value) as u64) << 1) | 1
    } else {
        (value as u64) << 1
    };
    loop {
        let mut digit = (v & 0x1f) as usize;
        v >>= 5;
        if v != 0 {
            digit |= 0x20;
        }
        out.push(BASE64[digit] as char);
        if v == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: i64) -> String {
        let mut s = String::new();
        encode_vlq(value, &mut s);
        s
    }

    #[test]
    fn vlq_known_values() {
        assert_eq!(vlq(0), "A");
        assert_eq!(vlq(1), "C");
        assert_eq!(vlq(-1), "D");
        assert_eq!(vlq(15), "e");
        assert_eq!(vlq(16), "gB");
        assert_eq!(vlq(-16), "hB");
    }

    #[test]
    fn writer_tracks_lines_and_columns() {
        let mut w = Writer::new();
        w.push_str("ab");
        assert_eq!(w.position(), (0, 2));
        w.push_str("c\nde");
        assert_eq!(w.position(), (1, 2));
        assert_eq!(w.text(), "abc\nde");
    }

    #[test]
    fn fragment_mappings_rebase_onto_current_position() {
        let mut w = Writer::new();
        w.push_str("xx\nyy");

        let mut f = Fragment::new();
        f.map_pos(Some(Pos::new(5, 2)));
        f.push_str("ab\ncd");
        f.map_pos(Some(Pos::new(7, 0)));
        f.push_str("ef");
        w.push_fragment(f);

        let (text, records) = w.into_parts();
        assert_eq!(text, "xx\nyyab\ncdef");
        assert_eq!(
            records,
            vec![
                Record {
                    gen_line: 1,
                    gen_col: 2,
                    pos: Pos::new(5, 2)
                },
                Record {
                    gen_line: 2,
                    gen_col: 2,
                    pos: Pos::new(7, 0)
                },
            ]
        );
    }

    #[test]
    fn unmapped_fragment_records_nothing() {
        let mut w = Writer::new();
        w.push_fragment(Fragment::lit("plain text\n"));
        let (_, records) = w.into_parts();
        assert!(records.is_empty());
    }

    #[test]
    fn mapping_at_fragment_end() {
        let mut w = Writer::new();
        let mut f = Fragment::lit("abc");
        f.map_pos(Some(Pos::new(1, 0)));
        w.push_fragment(f);
        let (_, records) = w.into_parts();
        assert_eq!(records[0].gen_col, 3);
    }

    #[test]
    fn map_encodes_single_record() {
        let records = [Record {
            gen_line: 0,
            gen_col: 0,
            pos: Pos::new(1, 0),
        }];
        let map = SourceMap::build(&records, "main.reef", None);
        assert_eq!(map.version, 3);
        assert_eq!(map.sources, vec!["main.reef".to_string()]);
        assert_eq!(map.mappings, "AAAA");
    }

    #[test]
    fn map_encodes_deltas_within_and_across_lines() {
        let records = [
            Record {
                gen_line: 0,
                gen_col: 0,
                pos: Pos::new(1, 0),
            },
            Record {
                gen_line: 0,
                gen_col: 1,
                pos: Pos::new(1, 1),
            },
            Record {
                gen_line: 2,
                gen_col: 4,
                pos: Pos::new(3, 0),
            },
        ];
        let map = SourceMap::build(&records, "m.reef", None);
        // line 0: absolute col then deltas; line 1 empty; line 2 resets col.
        assert_eq!(map.mappings, "AAAA,CAAC;;IAED");
    }

    #[test]
    fn map_embeds_source_text_when_given() {
        let map = SourceMap::build(&[], "m.reef", Some("let x = 1"));
        assert_eq!(map.sources_content, Some(vec!["let x = 1".to_string()]));
        let json = map.to_json().unwrap();
        assert!(json.contains("\"sourcesContent\""));
        let no_content = SourceMap::build(&[], "m.reef", None);
        assert!(!no_content.to_json().unwrap().contains("sourcesContent"));
    }
}
