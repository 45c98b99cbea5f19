//! Caret context resolution.
//!
//! Given a caret offset, classify what construct the caret is inside (element name, attribute
//! name, attribute value, or text content) and compute the exact span a completion or
//! replacement should act on. The resolver works on raw text plus the region stream; it never
//! consults a tree.
//!
//! Known corner cases inherited from the attribute grammar:
//! - resolution is off when there is a space between the `=` and the opening quote;
//! - the replace span is off when the caret is left of a single-quoted opening quote and the
//!   replacement uses double quotes.

use crate::document::DocumentSnapshot;
use crate::region::RegionKind;
use regex::Regex;
use std::sync::OnceLock;

/// What the caret is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The caret is inside an element's tag name.
    ElementName,
    /// The caret is inside an attribute name (possibly an empty one, right after whitespace).
    AttributeName,
    /// The caret is inside an attribute value.
    AttributeValue,
    /// The caret is inside text content between tags.
    Text,
}

/// The resolved edit context at a caret offset.
///
/// Constructed fresh per query and immediately consumed; the offsets are only valid for the
/// snapshot they were computed against and must not be cached across edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchContext {
    /// What construct the caret is inside.
    pub kind: MatchKind,
    /// Start of the span a completion should replace (the typed prefix begins here).
    pub replace_start: usize,
    /// Length of the replaceable span, typed prefix included.
    pub replace_len: usize,
    /// For [`MatchKind::AttributeValue`], the attribute's name.
    pub attribute_name: Option<String>,
    /// For [`MatchKind::AttributeValue`], the typed value so far. If the user already typed the
    /// opening quote it is stripped here: the generic prefix extractor stops at quotes while the
    /// attribute grammar does not, and this field carries the corrected form.
    pub value_prefix: Option<String>,
    /// The quote character surrounding the value, when one is in effect.
    pub quote_char: Option<char>,
    /// Whether an insertion at the caret should step over the existing closing quote.
    pub skip_closing_quote: bool,
    /// A delimiter the caller must synthesize around the insertion: `'<'` for a missing tag
    /// opener, `'"'` for a missing opening quote, `' '` for a missing attribute separator.
    pub needs_opening_delimiter: Option<char>,
}

/// Classify the caret at `offset` and compute the replaceable span.
///
/// Returns `None` when there is no actionable context: the caret sits on a `<`, the offset is
/// out of range, or a scan runs out of document. Callers treat `None` as "offer nothing", never
/// as an error.
pub fn resolve_context(doc: &DocumentSnapshot, offset: usize) -> Option<MatchContext> {
    if offset > doc.len() {
        return None;
    }
    // A caret sitting on `<` is at a tag boundary; there is nothing to complete there.
    if doc.char_at(offset) == Some('<') {
        return None;
    }

    let prefix = extract_element_prefix(doc, offset);

    // Scan back to the nearest tag delimiter to learn which side of one we are on.
    let mut tag_text_start = offset;
    let mut inside_tag = false;
    while tag_text_start > 0 {
        match doc.char_at(tag_text_start - 1) {
            Some('<') => {
                inside_tag = true;
                break;
            }
            Some('>') => break,
            _ => tag_text_start -= 1,
        }
    }

    if inside_tag {
        resolve_tag_context(doc, offset, tag_text_start, &prefix)
    } else {
        resolve_text_context(doc, offset, &prefix)
    }
}

/// Extract the word prefix ending at `offset`.
///
/// Scans backward until whitespace or one of the XML separators `<`, `>`, `'`, `"`, `=`. The
/// separator set is deliberately exclusive rather than enumerating valid name characters; that
/// keeps the prefix usable for element names, attribute names, and attribute values alike.
pub fn extract_element_prefix(doc: &DocumentSnapshot, offset: usize) -> String {
    if offset > doc.len() {
        return String::new();
    }
    let mut start = offset;
    while start > 0 {
        match doc.char_at(start - 1) {
            Some(ch) if ch.is_whitespace() || matches!(ch, '<' | '>' | '\'' | '"' | '=') => break,
            Some(_) => start -= 1,
            None => break,
        }
    }
    doc.text_range(start, offset).unwrap_or_default()
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("literal pattern"))
}

fn leading_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_:.\-]+").expect("literal pattern"))
}

/// Valid in an element name (Java class literal characters plus `:` `.` `-`).
fn is_element_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | ':' | '.' | '-')
}

/// Valid in an attribute name, `:` included for namespace prefixes.
fn is_attribute_name_char(ch: char) -> bool {
    ch.is_alphabetic() || ch == ':' || ch == '_'
}

/// The caret is in text content (the backward scan hit `>` or the start of the document).
fn resolve_text_context(
    doc: &DocumentSnapshot,
    offset: usize,
    prefix: &str,
) -> Option<MatchContext> {
    let prefix_len = prefix.chars().count();

    // The replace span runs through the end of the line within the containing content region,
    // so accepting a proposal swallows the rest of the half-typed word.
    let mut extra = 0;
    if let Some(region) = doc.region_at(offset).filter(|r| r.kind == RegionKind::Content) {
        let bounds = doc.line_bounds_at(offset)?;
        extra = region.end().min(bounds.end()).saturating_sub(offset);
    }

    Some(MatchContext {
        kind: MatchKind::Text,
        replace_start: offset - prefix_len,
        replace_len: prefix_len + extra,
        attribute_name: None,
        value_prefix: None,
        quote_char: None,
        skip_closing_quote: false,
        needs_opening_delimiter: element_needs_bracket(doc, offset, prefix),
    })
}

/// `Some('<')` unless the prefix is already preceded by `<` or `</`.
///
/// Per the XML grammar there is no whitespace between `<`/`</` and the tag name, so one char of
/// lookback (two for the end-tag case) decides.
fn element_needs_bracket(doc: &DocumentSnapshot, offset: usize, prefix: &str) -> Option<char> {
    let prefix_len = prefix.chars().count();
    let Some(pos) = offset.checked_sub(prefix_len + 1) else {
        return Some('<');
    };
    match doc.char_at(pos) {
        Some('<') => None,
        Some('/') if pos > 0 && doc.char_at(pos - 1) == Some('<') => None,
        _ => Some('<'),
    }
}

/// The caret is inside a tag; decide between element name, attribute name, and attribute value.
fn resolve_tag_context(
    doc: &DocumentSnapshot,
    offset: usize,
    tag_text_start: usize,
    prefix: &str,
) -> Option<MatchContext> {
    // Everything between the `<` (exclusive) and the caret.
    let raw = doc.text_range(tag_text_start, offset)?;
    let text = whitespace_re().replace_all(&raw, " ").into_owned();

    // Strip the leading element name; by the grammar it hugs the `<` without whitespace.
    let rest = match leading_name_re().find(&text) {
        Some(m) => &text[m.end()..],
        None => text.as_str(),
    };

    // No space after the element name means the caret is still inside the name itself.
    if !rest.starts_with(' ') {
        return resolve_element_name(doc, offset, prefix);
    }

    let rest = strip_attribute_pairs(rest);
    match rest.find('=') {
        None => resolve_attribute_name(doc, offset, prefix, rest),
        Some(eq_idx) => resolve_attribute_value(doc, offset, prefix, rest, eq_idx),
    }
}

fn resolve_element_name(
    doc: &DocumentSnapshot,
    offset: usize,
    prefix: &str,
) -> Option<MatchContext> {
    let prefix_len = prefix.chars().count();

    // The typed prefix may stop mid-name; extend forward so the whole name is replaceable.
    let mut name_end = offset;
    while let Some(ch) = doc.char_at(name_end) {
        if is_element_name_char(ch) {
            name_end += 1;
        } else {
            break;
        }
    }

    Some(MatchContext {
        kind: MatchKind::ElementName,
        replace_start: offset - prefix_len,
        replace_len: prefix_len + (name_end - offset),
        attribute_name: None,
        value_prefix: None,
        quote_char: None,
        skip_closing_quote: false,
        needs_opening_delimiter: element_needs_bracket(doc, offset, prefix),
    })
}

fn resolve_attribute_name(
    doc: &DocumentSnapshot,
    offset: usize,
    prefix: &str,
    rest: &str,
) -> Option<MatchContext> {
    let prefix_len = prefix.chars().count();
    let typed = rest.trim();

    // Look forward on the current line for where the full attribute name ends, so choosing a
    // different attribute replaces all of it, not just the typed part.
    let bounds = doc.line_bounds_at(offset)?;
    let mut name_end = offset;
    while name_end < bounds.end() {
        match doc.char_at(name_end) {
            Some(ch) if is_attribute_name_char(ch) => name_end += 1,
            _ => break,
        }
    }

    // On malformed input (a bare word with no value before the caret) the normalized-text name
    // can be longer than what sits in the document; keep the span inside the document.
    let replace_start = offset - prefix_len;
    let full_len =
        (typed.chars().count() + (name_end - offset)).min(doc.len() - replace_start);

    // An empty name right after a quote means the previous attribute needs a separator first.
    let needs_opening_delimiter = if full_len == 0
        && offset > 0
        && matches!(doc.char_at(offset - 1), Some('"') | Some('\''))
    {
        Some(' ')
    } else {
        None
    };

    Some(MatchContext {
        kind: MatchKind::AttributeName,
        replace_start,
        replace_len: full_len,
        attribute_name: None,
        value_prefix: None,
        quote_char: None,
        skip_closing_quote: false,
        needs_opening_delimiter,
    })
}

fn resolve_attribute_value(
    doc: &DocumentSnapshot,
    offset: usize,
    prefix: &str,
    rest: &str,
    eq_idx: usize,
) -> Option<MatchContext> {
    let prefix_len = prefix.chars().count();
    let prefix_start = offset - prefix_len;

    let attribute_name = rest[..eq_idx].trim().to_string();
    let raw_value = &rest[eq_idx + 1..];

    // Which quote surrounds the value? The first non-space char after `=` decides, `"` by
    // default when nothing is typed yet.
    let mut quote = '"';
    for ch in raw_value.chars() {
        if !ch.is_whitespace() {
            quote = ch;
            break;
        }
    }

    let (value_prefix, needs_opening_delimiter) = if let Some(stripped) =
        raw_value.strip_prefix(['"', '\''])
    {
        // The opening quote is already there; correct the prefix by dropping it.
        (stripped.to_string(), None)
    } else {
        (raw_value.to_string(), Some('"'))
    };

    // Find the value's full span on the current line.
    let bounds = doc.line_bounds_at(offset)?;
    let line: Vec<char> = doc.text_range(bounds.start, bounds.end())?.chars().collect();
    let cursor_col = offset - bounds.start;

    let mut value_start = cursor_col;
    let mut value_end = cursor_col;
    let mut skip_closing_quote = false;
    while value_end < line.len() {
        if line[value_end] == quote {
            // This may be the *opening* quote (caret between the `=` and the quote). Walk
            // backward: finding `=` first means the value has not opened yet; finding another
            // quote first means it opened there and this one closes it.
            let mut is_opening = false;
            let mut j = value_end;
            while j > 0 {
                j -= 1;
                if line[j] == '=' {
                    is_opening = true;
                    break;
                }
                if line[j] == quote {
                    value_start = j;
                    break;
                }
            }
            if !is_opening {
                skip_closing_quote = true;
                break;
            }
        }
        value_end += 1;
    }

    let value_end_offset = bounds.start + value_end;
    let mut replace_len = prefix_len + value_end_offset.saturating_sub(offset);
    // Caret sitting left of the opening quote: absorb the quote into the replace span, since
    // the proposals offered in that position include their own quotes.
    let value_start_offset = bounds.start + value_start;
    if value_start_offset == prefix_start && value_end > value_start {
        replace_len += 1;
    }
    // The span must stay inside the document even when the scan ran to end of line.
    replace_len = replace_len.min(doc.len() - prefix_start);

    Some(MatchContext {
        kind: MatchKind::AttributeValue,
        replace_start: prefix_start,
        replace_len,
        attribute_name: Some(attribute_name),
        value_prefix: Some(value_prefix),
        quote_char: matches!(quote, '"' | '\'').then_some(quote),
        skip_closing_quote,
        needs_opening_delimiter,
    })
}

/// State of the attribute-pair stripper between characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairState {
    /// Skipping spaces before the attribute name.
    BeforeName,
    /// Inside the attribute name (or the spaces after it, up to the `=`).
    InName,
    /// Seen the `=`, skipping spaces before the opening quote.
    AfterEquals,
    /// Inside the quoted value.
    InValue,
}

/// Strip complete `name="value"` / `name='value'` pairs from the front of `text`.
///
/// `text` has already been whitespace-normalized. The per-pair grammar: optional spaces, a name
/// (`[A-Za-z_:]+`), optional spaces, `=`, optional spaces, then a quoted string containing
/// neither `<` nor its own quote character. The loop stops at the first incomplete pair; what
/// remains describes the attribute the caret is in.
fn strip_attribute_pairs(text: &str) -> &str {
    let mut rest = text;
    while let Some(next) = strip_one_pair(rest) {
        rest = next;
    }
    rest
}

/// Match one complete pair at the head of `text`; `None` if the head is not a complete pair.
fn strip_one_pair(text: &str) -> Option<&str> {
    let mut state = PairState::BeforeName;
    let mut quote = '"';
    let mut name_done = false;

    for (idx, ch) in text.char_indices() {
        state = match state {
            PairState::BeforeName => match ch {
                ' ' => PairState::BeforeName,
                c if c.is_ascii_alphabetic() || c == '_' || c == ':' => PairState::InName,
                _ => return None,
            },
            PairState::InName => match ch {
                c if c.is_ascii_alphabetic() || c == '_' || c == ':' => {
                    if name_done {
                        // A second word before any `=`: the first attribute has no value.
                        return None;
                    }
                    PairState::InName
                }
                ' ' => {
                    name_done = true;
                    PairState::InName
                }
                '=' => PairState::AfterEquals,
                _ => return None,
            },
            PairState::AfterEquals => match ch {
                ' ' => PairState::AfterEquals,
                '"' | '\'' => {
                    quote = ch;
                    PairState::InValue
                }
                _ => return None,
            },
            PairState::InValue => {
                if ch == quote {
                    return Some(&text[idx + ch.len_utf8()..]);
                }
                if ch == '<' {
                    return None;
                }
                PairState::InValue
            }
        };
    }

    // Ran out of text mid-pair.
    None
}
