//! Document body: flat data stream plus position-keyed overlays
//!
//! Every overlay is an ordered list anchored to positions in `data_stream`.
//! Positions count Unicode scalar values, not bytes.

use super::style::{Attributes, Bullet, CustomRangeType, ParagraphStyle, TextStyle};
use serde::{Deserialize, Serialize};

/// Control tokens embedded in the data stream
pub mod tokens {
    pub const PARAGRAPH: char = '\r';
    pub const SECTION_BREAK: char = '\n';
    pub const CUSTOM_BLOCK: char = '\u{08}';
    pub const TABLE_START: char = '\u{1A}';
    pub const TABLE_ROW_START: char = '\u{1B}';
    pub const TABLE_CELL_START: char = '\u{1C}';
    pub const TABLE_CELL_END: char = '\u{1D}';
    pub const TABLE_ROW_END: char = '\u{0E}';
    pub const TABLE_END: char = '\u{0F}';
    pub const CUSTOM_RANGE_START: char = '\u{1F}';
    pub const CUSTOM_RANGE_END: char = '\u{1E}';
}

/// Number of positions in a stream
pub fn stream_len(s: &str) -> usize {
    s.chars().count()
}

/// Slice a stream by position, `[start, end)`, clamped to its length
pub fn stream_slice(s: &str, start: usize, end: usize) -> String {
    if end <= start {
        return String::new();
    }
    s.chars().skip(start).take(end - start).collect()
}

/// Splice `insert` into `s` at position `at`
pub fn stream_insert(s: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(s.len() + insert.len());
    let mut chars = s.chars();
    out.extend(chars.by_ref().take(at));
    out.push_str(insert);
    out.extend(chars);
    out
}

/// Remove `[start, start + len)` from `s`
pub fn stream_remove(s: &str, start: usize, len: usize) -> String {
    s.chars()
        .enumerate()
        .filter(|(i, _)| *i < start || *i >= start + len)
        .map(|(_, c)| c)
        .collect()
}

/// An overlay entry anchored at a single position
pub trait Anchored {
    fn start_index(&self) -> usize;
    fn set_start_index(&mut self, index: usize);
}

/// An overlay entry covering the closed range `[start_index, end_index]`
pub trait Spanned: Anchored {
    fn end_index(&self) -> usize;
    fn set_end_index(&mut self, index: usize);
    /// Identity shared by every fragment of one range
    fn span_id(&self) -> &str;
}

/// Style run over the half-open range `[st, ed)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub st: usize,
    pub ed: usize,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    pub ts: TextStyle,
    #[serde(rename = "sId", default, skip_serializing_if = "Option::is_none")]
    pub s_id: Option<String>,
}

impl TextRun {
    pub fn new(st: usize, ed: usize, ts: TextStyle) -> Self {
        Self { st, ed, ts, s_id: None }
    }

    pub fn len(&self) -> usize {
        self.ed.saturating_sub(self.st)
    }

    pub fn is_empty(&self) -> bool {
        self.ed <= self.st
    }

    /// A run with no style and no named style carries nothing
    pub fn is_plain(&self) -> bool {
        self.ts.is_empty() && self.s_id.is_none()
    }
}

/// Paragraph terminator anchor with its paragraph metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paragraph {
    pub start_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph_style: Option<ParagraphStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bullet: Option<Bullet>,
}

impl Paragraph {
    pub fn new(start_index: usize) -> Self {
        Self {
            start_index,
            paragraph_style: None,
            bullet: None,
        }
    }

    pub fn with_style(mut self, style: ParagraphStyle) -> Self {
        self.paragraph_style = Some(style);
        self
    }

    pub fn with_bullet(mut self, bullet: Bullet) -> Self {
        self.bullet = Some(bullet);
        self
    }

    /// Exchange style and bullet with another paragraph, keeping anchors
    pub fn swap_format(&mut self, other: &mut Paragraph) {
        std::mem::swap(&mut self.paragraph_style, &mut other.paragraph_style);
        std::mem::swap(&mut self.bullet, &mut other.bullet);
    }

    pub fn same_format(&self, other: &Paragraph) -> bool {
        self.paragraph_style == other.paragraph_style && self.bullet == other.bullet
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBreak {
    pub start_index: usize,
    /// Page size, margins, columns, ... kept opaque
    #[serde(flatten)]
    pub properties: Attributes,
}

impl SectionBreak {
    pub fn new(start_index: usize) -> Self {
        Self {
            start_index,
            properties: Attributes::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomBlock {
    pub start_index: usize,
    pub block_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_type: Option<u32>,
}

impl CustomBlock {
    pub fn new(start_index: usize, block_id: &str) -> Self {
        Self {
            start_index,
            block_id: block_id.to_string(),
            block_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub start_index: usize,
    pub end_index: usize,
    pub table_id: String,
}

impl Table {
    pub fn new(start_index: usize, end_index: usize, table_id: &str) -> Self {
        Self {
            start_index,
            end_index,
            table_id: table_id.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRange {
    pub start_index: usize,
    pub end_index: usize,
    pub range_id: String,
    pub range_type: CustomRangeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Attributes>,
}

impl CustomRange {
    pub fn new(
        start_index: usize,
        end_index: usize,
        range_id: &str,
        range_type: CustomRangeType,
    ) -> Self {
        Self {
            start_index,
            end_index,
            range_id: range_id.to_string(),
            range_type,
            properties: None,
        }
    }
}

macro_rules! impl_anchored {
    ($($ty:ty),*) => {
        $(impl Anchored for $ty {
            fn start_index(&self) -> usize {
                self.start_index
            }

            fn set_start_index(&mut self, index: usize) {
                self.start_index = index;
            }
        })*
    };
}

macro_rules! impl_spanned {
    ($($ty:ty => $id:ident),*) => {
        $(impl Spanned for $ty {
            fn end_index(&self) -> usize {
                self.end_index
            }

            fn set_end_index(&mut self, index: usize) {
                self.end_index = index;
            }

            fn span_id(&self) -> &str {
                &self.$id
            }
        })*
    };
}

impl_anchored!(Paragraph, SectionBreak, CustomBlock, Table, CustomRange);
impl_spanned!(Table => table_id, CustomRange => range_id);

/// The editable unit: a flat stream plus six independent overlays
///
/// An absent overlay (`None`) is distinct from an empty one. For text runs
/// in an insert payload the difference matters: `None` lets the inserted
/// text inherit the style of the run it lands in, `Some(vec![])` marks it
/// explicitly unstyled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentBody {
    #[serde(default)]
    pub data_stream: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_runs: Option<Vec<TextRun>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<Vec<Paragraph>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_breaks: Option<Vec<SectionBreak>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_blocks: Option<Vec<CustomBlock>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_ranges: Option<Vec<CustomRange>>,
}

impl DocumentBody {
    pub fn new(data_stream: &str) -> Self {
        Self {
            data_stream: data_stream.to_string(),
            ..Default::default()
        }
    }

    /// Attribute-only body, as carried by a styling retain
    pub fn attributes() -> Self {
        Self::default()
    }

    pub fn with_text_runs(mut self, runs: Vec<TextRun>) -> Self {
        self.text_runs = Some(runs);
        self
    }

    pub fn with_paragraphs(mut self, paragraphs: Vec<Paragraph>) -> Self {
        self.paragraphs = Some(paragraphs);
        self
    }

    pub fn with_section_breaks(mut self, section_breaks: Vec<SectionBreak>) -> Self {
        self.section_breaks = Some(section_breaks);
        self
    }

    pub fn with_custom_blocks(mut self, custom_blocks: Vec<CustomBlock>) -> Self {
        self.custom_blocks = Some(custom_blocks);
        self
    }

    pub fn with_tables(mut self, tables: Vec<Table>) -> Self {
        self.tables = Some(tables);
        self
    }

    pub fn with_custom_ranges(mut self, custom_ranges: Vec<CustomRange>) -> Self {
        self.custom_ranges = Some(custom_ranges);
        self
    }

    /// Length of the data stream in positions
    pub fn len(&self) -> usize {
        stream_len(&self.data_stream)
    }

    pub fn is_empty(&self) -> bool {
        self.data_stream.is_empty()
    }

    /// True when the stream is exactly one paragraph terminator
    pub fn is_bare_paragraph(&self) -> bool {
        let mut chars = self.data_stream.chars();
        chars.next() == Some(tokens::PARAGRAPH) && chars.next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stream_helpers_count_chars() {
        let s = "héllo";
        assert_eq!(stream_len(s), 5);
        assert_eq!(stream_slice(s, 1, 3), "él");
        assert_eq!(stream_insert(s, 2, "XY"), "héXYllo");
        assert_eq!(stream_remove(s, 1, 2), "hlo");
    }

    #[test]
    fn test_body_omits_absent_overlays() {
        let body = DocumentBody::new("hello")
            .with_text_runs(vec![TextRun::new(0, 5, TextStyle::new().with("bl", 1))]);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({"dataStream": "hello", "textRuns": [{"st": 0, "ed": 5, "ts": {"bl": 1}}]})
        );
    }

    #[test]
    fn test_paragraph_wire_names() {
        let value = json!({
            "dataStream": "ab\r",
            "paragraphs": [{"startIndex": 2, "paragraphStyle": {"horizontalAlign": 2}}],
            "customRanges": [{"startIndex": 0, "endIndex": 1, "rangeId": "r1", "rangeType": 0}]
        });
        let body: DocumentBody = serde_json::from_value(value.clone()).unwrap();

        let paragraphs = body.paragraphs.as_ref().unwrap();
        assert_eq!(paragraphs[0].start_index, 2);
        assert_eq!(body.custom_ranges.as_ref().unwrap()[0].range_type, CustomRangeType::Hyperlink);
        assert_eq!(serde_json::to_value(&body).unwrap(), value);
    }

    #[test]
    fn test_section_break_keeps_properties() {
        let value = json!({"startIndex": 4, "columnSeparatorType": 1, "pageOrient": 0});
        let section: SectionBreak = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(section.start_index, 4);
        assert_eq!(section.properties.len(), 2);
        assert_eq!(serde_json::to_value(&section).unwrap(), value);
    }

    #[test]
    fn test_bare_paragraph() {
        assert!(DocumentBody::new("\r").is_bare_paragraph());
        assert!(!DocumentBody::new("a\r").is_bare_paragraph());
        assert!(!DocumentBody::new("").is_bare_paragraph());
    }
}
