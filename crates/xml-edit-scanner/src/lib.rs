#![warn(missing_docs)]
//! `xml-edit-scanner` - Reference region scanner for `xml-edit-core`.
//!
//! A single-pass, non-validating scanner that partitions a document into the ordered region
//! stream the analyzers consume. It is deliberately lenient: *any* input produces a gap-free
//! partition, unterminated constructs simply extend to the end of the input, and nothing is
//! ever rejected. It is a reference implementation for tests, benches, and simple hosts - not
//! a validator and not a replacement for a production lexer.
//!
//! Scanning policy:
//!
//! - Text between tags is one [`RegionKind::Content`] region, whitespace included (the
//!   indentation policy relies on content regions carrying their leading whitespace).
//! - `<!-- -->` comments and other `<!` declarations, `<? ?>` processing instructions, and
//!   `<![CDATA[ ]]>` sections are single opaque regions.
//! - A `<` not followed by a name character, `/`, `!` or `?` is treated as text, not markup.
//! - Inside tags: `TagName`, `Whitespace`, `AttributeName`, `AttributeEquals`, and
//!   `AttributeValue` (quotes included). Quoted values run to their matching quote, across `>`
//!   (legal in XML) but never across `<`.

use xml_edit_core::{Region, RegionKind, RegionLexer};

/// A non-validating XML region scanner.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlScanner;

impl XmlScanner {
    /// Create a scanner.
    pub fn new() -> Self {
        Self
    }

    /// Partition `text` into an ordered, gap-free region stream (char offsets).
    pub fn scan(&self, text: &str) -> Vec<Region> {
        let chars: Vec<char> = text.chars().collect();
        let mut regions = Vec::new();
        let mut pos = 0;
        while pos < chars.len() {
            pos = if chars[pos] == '<' && is_markup_start(&chars, pos) {
                scan_markup(&chars, pos, &mut regions)
            } else {
                scan_content(&chars, pos, &mut regions)
            };
        }
        regions
    }
}

impl RegionLexer for XmlScanner {
    fn lex(&self, text: &str) -> Vec<Region> {
        self.scan(text)
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | ':' | '.' | '-')
}

/// Does the `<` at `pos` start markup, or is it stray text?
fn is_markup_start(chars: &[char], pos: usize) -> bool {
    match chars.get(pos + 1) {
        Some(&ch) => is_name_char(ch) || matches!(ch, '/' | '!' | '?'),
        None => false,
    }
}

/// Consume text (starting at `pos`, which may itself be a stray `<`) up to the next markup
/// start, emitting one `Content` region.
fn scan_content(chars: &[char], pos: usize, regions: &mut Vec<Region>) -> usize {
    let start = pos;
    let mut pos = pos + 1;
    while pos < chars.len() && !(chars[pos] == '<' && is_markup_start(chars, pos)) {
        pos += 1;
    }
    regions.push(Region::new(RegionKind::Content, start, pos - start));
    pos
}

/// Consume one markup construct starting at the `<` at `pos`.
fn scan_markup(chars: &[char], pos: usize, regions: &mut Vec<Region>) -> usize {
    if starts_with(chars, pos, "<!--") {
        return scan_until(chars, pos, 4, "-->", RegionKind::Comment, regions);
    }
    if starts_with(chars, pos, "<![CDATA[") {
        return scan_until(chars, pos, 9, "]]>", RegionKind::CData, regions);
    }
    if starts_with(chars, pos, "<!") {
        // DOCTYPE and friends; folded into the opaque declaration kind.
        return scan_until(chars, pos, 2, ">", RegionKind::Comment, regions);
    }
    if starts_with(chars, pos, "<?") {
        return scan_until(chars, pos, 2, "?>", RegionKind::ProcessingInstruction, regions);
    }

    let mut cursor = if starts_with(chars, pos, "</") {
        regions.push(Region::new(RegionKind::EndTagOpen, pos, 2));
        pos + 2
    } else {
        regions.push(Region::new(RegionKind::TagOpen, pos, 1));
        pos + 1
    };

    // Tag name hugs the open delimiter; it may be absent in malformed input.
    let name_start = cursor;
    while cursor < chars.len() && is_name_char(chars[cursor]) {
        cursor += 1;
    }
    if cursor > name_start {
        regions.push(Region::new(RegionKind::TagName, name_start, cursor - name_start));
    }

    // Attributes, whitespace, and the close delimiter.
    while cursor < chars.len() {
        let start = cursor;
        let ch = chars[cursor];
        if ch == '<' {
            // A new tag begins before this one closed; recover by ending here.
            return cursor;
        }
        if ch == '>' {
            regions.push(Region::new(RegionKind::TagClose, cursor, 1));
            return cursor + 1;
        }
        if ch == '/' && chars.get(cursor + 1) == Some(&'>') {
            regions.push(Region::new(RegionKind::EmptyTagClose, cursor, 2));
            return cursor + 2;
        }
        if ch.is_whitespace() {
            while cursor < chars.len() && chars[cursor].is_whitespace() {
                cursor += 1;
            }
            regions.push(Region::new(RegionKind::Whitespace, start, cursor - start));
        } else if ch == '=' {
            regions.push(Region::new(RegionKind::AttributeEquals, cursor, 1));
            cursor += 1;
        } else if ch == '"' || ch == '\'' {
            cursor += 1;
            while cursor < chars.len() && chars[cursor] != ch && chars[cursor] != '<' {
                cursor += 1;
            }
            if chars.get(cursor) == Some(&ch) {
                cursor += 1;
            }
            regions.push(Region::new(RegionKind::AttributeValue, start, cursor - start));
        } else {
            while cursor < chars.len()
                && !chars[cursor].is_whitespace()
                && !matches!(chars[cursor], '<' | '>' | '=' | '"' | '\'')
                && !(chars[cursor] == '/' && chars.get(cursor + 1) == Some(&'>'))
            {
                cursor += 1;
            }
            regions.push(Region::new(RegionKind::AttributeName, start, cursor - start));
        }
    }
    cursor
}

fn starts_with(chars: &[char], pos: usize, needle: &str) -> bool {
    let mut idx = pos;
    for ch in needle.chars() {
        if chars.get(idx) != Some(&ch) {
            return false;
        }
        idx += 1;
    }
    true
}

/// Emit one opaque region of `kind` from `pos`, spanning at least `min_len` chars and ending
/// just past `terminator` (or at end of input when unterminated).
fn scan_until(
    chars: &[char],
    pos: usize,
    min_len: usize,
    terminator: &str,
    kind: RegionKind,
    regions: &mut Vec<Region>,
) -> usize {
    let mut cursor = pos + min_len;
    while cursor < chars.len() && !starts_with(chars, cursor, terminator) {
        cursor += 1;
    }
    if cursor < chars.len() {
        cursor += terminator.chars().count();
    }
    regions.push(Region::new(kind, pos, cursor - pos));
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(RegionKind, usize, usize)> {
        XmlScanner::new()
            .scan(text)
            .into_iter()
            .map(|r| (r.kind, r.start, r.len))
            .collect()
    }

    /// The partition must cover the input without gaps or overlaps.
    fn assert_partition(text: &str) {
        let regions = XmlScanner::new().scan(text);
        let mut expected_start = 0;
        for region in &regions {
            assert_eq!(region.start, expected_start, "gap before {region:?} in {text:?}");
            expected_start = region.end();
        }
        assert_eq!(expected_start, text.chars().count(), "short partition of {text:?}");
    }

    #[test]
    fn test_simple_element() {
        assert_eq!(
            kinds("<a>x</a>"),
            vec![
                (RegionKind::TagOpen, 0, 1),
                (RegionKind::TagName, 1, 1),
                (RegionKind::TagClose, 2, 1),
                (RegionKind::Content, 3, 1),
                (RegionKind::EndTagOpen, 4, 2),
                (RegionKind::TagName, 6, 1),
                (RegionKind::TagClose, 7, 1),
            ]
        );
    }

    #[test]
    fn test_attributes_and_self_close() {
        assert_eq!(
            kinds("<a b=\"c\"/>"),
            vec![
                (RegionKind::TagOpen, 0, 1),
                (RegionKind::TagName, 1, 1),
                (RegionKind::Whitespace, 2, 1),
                (RegionKind::AttributeName, 3, 1),
                (RegionKind::AttributeEquals, 4, 1),
                (RegionKind::AttributeValue, 5, 3),
                (RegionKind::EmptyTagClose, 8, 2),
            ]
        );
    }

    #[test]
    fn test_single_quoted_value() {
        assert_eq!(
            kinds("<a b='c d'>"),
            vec![
                (RegionKind::TagOpen, 0, 1),
                (RegionKind::TagName, 1, 1),
                (RegionKind::Whitespace, 2, 1),
                (RegionKind::AttributeName, 3, 1),
                (RegionKind::AttributeEquals, 4, 1),
                (RegionKind::AttributeValue, 5, 5),
                (RegionKind::TagClose, 10, 1),
            ]
        );
    }

    #[test]
    fn test_comment_pi_cdata() {
        assert_eq!(
            kinds("<!--x--><?pi?><![CDATA[y]]>"),
            vec![
                (RegionKind::Comment, 0, 8),
                (RegionKind::ProcessingInstruction, 8, 6),
                (RegionKind::CData, 14, 13),
            ]
        );
    }

    #[test]
    fn test_doctype_is_opaque() {
        assert_eq!(kinds("<!DOCTYPE html>"), vec![(RegionKind::Comment, 0, 15)]);
    }

    #[test]
    fn test_stray_angle_bracket_is_content() {
        assert_eq!(kinds("a < b"), vec![(RegionKind::Content, 0, 5)]);
    }

    #[test]
    fn test_unterminated_constructs_extend_to_eof() {
        assert_partition("<foo bar=\"unclosed");
        assert_partition("<!-- no close");
        assert_partition("<foo");
        assert_partition("text <");
    }

    #[test]
    fn test_value_may_contain_close_bracket() {
        let regions = XmlScanner::new().scan("<a b=\"x>y\">");
        let value = regions
            .iter()
            .find(|r| r.kind == RegionKind::AttributeValue)
            .unwrap();
        assert_eq!((value.start, value.len), (5, 5));
    }

    #[test]
    fn test_partition_of_realistic_document() {
        assert_partition(
            "<?xml version=\"1.0\"?>\n<root a=\"1\">\n  <child/>\n  text & more\n  \
             <!-- note -->\n</root>\n",
        );
    }

    #[test]
    fn test_multiline_tag() {
        assert_eq!(
            kinds("<a\n  b=\"1\">"),
            vec![
                (RegionKind::TagOpen, 0, 1),
                (RegionKind::TagName, 1, 1),
                (RegionKind::Whitespace, 2, 3),
                (RegionKind::AttributeName, 5, 1),
                (RegionKind::AttributeEquals, 6, 1),
                (RegionKind::AttributeValue, 7, 3),
                (RegionKind::TagClose, 10, 1),
            ]
        );
    }

    #[test]
    fn test_tag_interrupted_by_new_tag() {
        // `<a <b>`: the first tag never closes; the second starts cleanly.
        assert_eq!(
            kinds("<a <b>"),
            vec![
                (RegionKind::TagOpen, 0, 1),
                (RegionKind::TagName, 1, 1),
                (RegionKind::Whitespace, 2, 1),
                (RegionKind::TagOpen, 3, 1),
                (RegionKind::TagName, 4, 1),
                (RegionKind::TagClose, 5, 1),
            ]
        );
    }
}
