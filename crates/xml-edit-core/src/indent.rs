//! Auto-indentation for line-break insertion.
//!
//! Given "a line break is about to be typed at offset O", decide the full text to insert (the
//! newline plus indentation, possibly a three-line split between an open and close tag) and
//! where the caret lands. The decision composes the balance analyzer and the tag matcher;
//! indentation assistance must never block text insertion, so every failure path falls back to
//! copying the current line's leading indentation.

use crate::balance::compute_balance;
use crate::document::DocumentSnapshot;
use crate::matching::{MatchDirection, find_matching_tag};
use crate::region::{Region, RegionKind};

/// One level of indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentUnit {
    /// A literal tab character.
    Tab,
    /// The given number of spaces.
    Spaces(usize),
}

impl IndentUnit {
    fn text(self) -> String {
        match self {
            Self::Tab => "\t".to_string(),
            Self::Spaces(width) => " ".repeat(width),
        }
    }

    fn len(self) -> usize {
        match self {
            Self::Tab => 1,
            Self::Spaces(width) => width,
        }
    }
}

impl Default for IndentUnit {
    fn default() -> Self {
        Self::Spaces(4)
    }
}

/// Indentation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndentOptions {
    /// The string inserted per indentation level.
    pub unit: IndentUnit,
}

/// The computed replacement for a typed line break.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentInsertion {
    /// The full text to insert at the break offset, leading newline included.
    pub text: String,
    /// Caret position after the insertion, relative to the insertion offset.
    pub caret_delta: usize,
}

impl IndentInsertion {
    fn at_end(text: String) -> Self {
        let caret_delta = text.chars().count();
        Self { text, caret_delta }
    }
}

/// Compute what to insert when a line break is typed at `offset`.
///
/// Never fails: any offset or lookup problem falls back to a newline plus the current line's
/// leading indentation.
pub fn compute_indent_insertion(
    doc: &DocumentSnapshot,
    offset: usize,
    options: &IndentOptions,
) -> IndentInsertion {
    let offset = offset.min(doc.len());
    compute_smart_insertion(doc, offset, options).unwrap_or_else(|| {
        let indent = doc
            .line_bounds_at(offset)
            .map(|bounds| leading_indent(doc, bounds.start, offset))
            .unwrap_or_default();
        IndentInsertion::at_end(format!("\n{indent}"))
    })
}

fn compute_smart_insertion(
    doc: &DocumentSnapshot,
    offset: usize,
    options: &IndentOptions,
) -> Option<IndentInsertion> {
    let bounds = doc.line_bounds_at(offset)?;
    let text_start = first_text_offset(doc, bounds.start, offset);
    let region = doc.region_at(text_start)?;

    if region.kind.is_tag_token() {
        return indent_after_tag_token(doc, offset, bounds.start, text_start, options);
    }
    if region.kind == RegionKind::Content {
        return indent_in_content(doc, offset, region, options);
    }
    None
}

/// The line starts with (or the caret is preceded on it by) tag tokens.
fn indent_after_tag_token(
    doc: &DocumentSnapshot,
    offset: usize,
    line_start: usize,
    text_start: usize,
    options: &IndentOptions,
) -> Option<IndentInsertion> {
    let line_indent = leading_indent(doc, line_start, offset);
    let left = doc.region_before(offset).filter(|r| r.end() == offset);
    let right = doc.region_after(offset).filter(|r| r.start == offset);

    // Caret exactly between `<foo>` and `</foo>`: split into three lines, caret on the
    // indented blank middle line, the end tag back at the outer indentation.
    if let (Some(l), Some(r)) = (left, right) {
        if l.kind == RegionKind::TagClose && r.kind == RegionKind::EndTagOpen {
            let text = format!("\n{}{}\n{}", line_indent, options.unit.text(), line_indent);
            let caret_delta = 1 + line_indent.chars().count() + options.unit.len();
            return Some(IndentInsertion { text, caret_delta });
        }
    }

    let balance = compute_balance(doc, text_start, offset);

    if balance.bracket_balance < 0 {
        // The line ends a tag whose `<` sits on an earlier line; align with that line.
        let l = left?;
        let target = match l.kind {
            RegionKind::TagClose => -1,
            RegionKind::EmptyTagClose => 0,
            _ => return None,
        };
        let open = find_matching_tag(doc, offset, MatchDirection::Backward, target)?;
        let open_bounds = doc.line_bounds_at(open)?;
        let open_indent = leading_indent(doc, open_bounds.start, open_bounds.end());
        return Some(IndentInsertion::at_end(format!("\n{open_indent}")));
    }

    if balance.tag_balance > 0 || balance.bracket_balance > 0 {
        return Some(IndentInsertion::at_end(format!(
            "\n{}{}",
            line_indent,
            options.unit.text()
        )));
    }

    Some(IndentInsertion::at_end(format!("\n{line_indent}")))
}

/// The caret sits in the leading whitespace of a content region; indent relative to the tag
/// that opened this body.
fn indent_in_content(
    doc: &DocumentSnapshot,
    offset: usize,
    content: Region,
    options: &IndentOptions,
) -> Option<IndentInsertion> {
    let lead_end = content_leading_ws_end(doc, content);
    if offset < content.start || offset > lead_end {
        return None;
    }

    let prev = doc.region_before(content.start)?;
    let target = match prev.kind {
        RegionKind::TagClose => -1,
        RegionKind::EmptyTagClose => 0,
        _ => return None,
    };

    let open = find_matching_tag(doc, content.start, MatchDirection::Backward, target)?;
    let open_bounds = doc.line_bounds_at(open)?;
    let open_indent = leading_indent(doc, open_bounds.start, open_bounds.end());

    // One level into the new body, except for a body that is immediately closed again (or a
    // self-closed tag, which has no body at all). "Immediately closed" means nothing but
    // whitespace sits between the caret and the element's own end tag.
    let body_is_empty = lead_end == content.end();
    let add_level = prev.kind == RegionKind::TagClose
        && !(body_is_empty && followed_by_matching_end(doc, content, open));
    let text = if add_level {
        format!("\n{}{}", open_indent, options.unit.text())
    } else {
        format!("\n{open_indent}")
    };
    Some(IndentInsertion::at_end(text))
}

/// First non-whitespace offset on the line, capped at `limit` (the caret).
fn first_text_offset(doc: &DocumentSnapshot, line_start: usize, limit: usize) -> usize {
    let mut pos = line_start;
    while pos < limit {
        match doc.char_at(pos) {
            Some(' ') | Some('\t') => pos += 1,
            _ => break,
        }
    }
    pos
}

/// Leading whitespace of the line starting at `line_start`, stopping at `limit`.
fn leading_indent(doc: &DocumentSnapshot, line_start: usize, limit: usize) -> String {
    let mut indent = String::new();
    let mut pos = line_start;
    while pos < limit {
        match doc.char_at(pos) {
            Some(ch @ (' ' | '\t')) => {
                indent.push(ch);
                pos += 1;
            }
            _ => break,
        }
    }
    indent
}

/// End of the whitespace run at the start of `content`.
fn content_leading_ws_end(doc: &DocumentSnapshot, content: Region) -> usize {
    let mut pos = content.start;
    while pos < content.end() {
        match doc.char_at(pos) {
            Some(ch) if ch.is_whitespace() => pos += 1,
            _ => break,
        }
    }
    pos
}

/// The tag name directly following a `TagOpen`/`EndTagOpen` delimiter.
fn tag_name_after(doc: &DocumentSnapshot, delimiter: Region) -> Option<String> {
    let name = doc.region_at(delimiter.end())?;
    if name.kind != RegionKind::TagName {
        return None;
    }
    doc.text_range(name.start, name.end())
}

/// Whether `content` is immediately followed by the end tag of the element opened at
/// `open_offset` - the "empty body about to be closed" case that gets no extra level.
fn followed_by_matching_end(doc: &DocumentSnapshot, content: Region, open_offset: usize) -> bool {
    let Some(next) = doc.region_at(content.end()) else {
        return false;
    };
    if next.kind != RegionKind::EndTagOpen {
        return false;
    }
    let Some(open) = doc.region_at(open_offset) else {
        return false;
    };
    match (tag_name_after(doc, open), tag_name_after(doc, next)) {
        (Some(open_name), Some(end_name)) => open_name == end_name,
        _ => false,
    }
}
