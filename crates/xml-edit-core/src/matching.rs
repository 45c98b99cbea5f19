//! Lexical tag-partner search.
//!
//! Given an offset positioned at (or next to) a tag delimiter, find the start offset of the
//! lexically matching partner by scanning the region stream while tracking a running balance.
//! No tree is consulted; self-closed tags are explicitly excluded from cross-matching.

use crate::document::DocumentSnapshot;
use crate::region::RegionKind;

/// Which way [`find_matching_tag`] scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDirection {
    /// Scan regions starting at or after the offset, in document order.
    Forward,
    /// Scan regions ending at or before the offset, nearest first.
    Backward,
}

/// Find the lexical partner of a tag delimiter.
///
/// `target_balance` selects which nesting level the scan stops at. Scanning forward from an open
/// tag's `<` with `0` finds that tag's own `</`; scanning backward from an end tag's `</` with
/// `-1` finds the directly enclosing (or partnered) open tag. Call sites must pass the exact
/// level they mean - an off-by-one here silently matches the wrong ancestor in nested markup.
///
/// Returns the start offset of the matched `TagOpen`/`EndTagOpen` region, or `None` when the
/// scan exhausts the document or would have to cross a self-closed tag boundary.
pub fn find_matching_tag(
    doc: &DocumentSnapshot,
    offset: usize,
    direction: MatchDirection,
    target_balance: i32,
) -> Option<usize> {
    match direction {
        MatchDirection::Forward => find_forward(doc, offset, target_balance),
        MatchDirection::Backward => find_backward(doc, offset, target_balance),
    }
}

fn find_forward(doc: &DocumentSnapshot, offset: usize, target_balance: i32) -> Option<usize> {
    let regions = doc.regions();
    let first = regions.partition_point(|r| r.start < offset);
    let mut tag_balance = 0;

    for region in &regions[first..] {
        match region.kind {
            RegionKind::TagOpen => tag_balance += 1,
            RegionKind::EndTagOpen => {
                tag_balance -= 1;
                if tag_balance == target_balance {
                    return Some(region.start);
                }
            }
            RegionKind::EmptyTagClose => {
                tag_balance -= 1;
                if tag_balance == target_balance {
                    // The level we were asked for turned out to be a self-closed tag; it has
                    // no partner, and matching across it is not allowed.
                    return None;
                }
            }
            RegionKind::TagName
            | RegionKind::TagClose
            | RegionKind::AttributeName
            | RegionKind::AttributeEquals
            | RegionKind::AttributeValue
            | RegionKind::Content
            | RegionKind::Whitespace
            | RegionKind::Comment
            | RegionKind::ProcessingInstruction
            | RegionKind::CData => {}
        }
    }

    None
}

fn find_backward(doc: &DocumentSnapshot, offset: usize, target_balance: i32) -> Option<usize> {
    let regions = doc.regions();
    let end = regions.partition_point(|r| r.end() <= offset);
    let mut tag_balance = 0;
    // Until a real `>` is seen, assume the nearest tag to the left is self-contained.
    let mut in_empty_tag = true;

    for region in regions[..end].iter().rev() {
        match region.kind {
            RegionKind::TagOpen => {
                if !in_empty_tag {
                    tag_balance -= 1;
                }
                if tag_balance == target_balance {
                    return Some(region.start);
                }
            }
            RegionKind::EndTagOpen => tag_balance += 1,
            RegionKind::EmptyTagClose => in_empty_tag = true,
            RegionKind::TagClose => in_empty_tag = false,
            RegionKind::TagName
            | RegionKind::AttributeName
            | RegionKind::AttributeEquals
            | RegionKind::AttributeValue
            | RegionKind::Content
            | RegionKind::Whitespace
            | RegionKind::Comment
            | RegionKind::ProcessingInstruction
            | RegionKind::CData => {}
        }
    }

    None
}
