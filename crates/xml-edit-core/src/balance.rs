//! Tag/bracket balance over a document sub-range.
//!
//! The indentation policy decides "indent, dedent, or keep" from two signed counters computed
//! over the scanned range: how many elements were logically opened minus closed, and how many
//! `<`/`</` delimiters were left unmatched by a `>`/`/>`.

use crate::document::DocumentSnapshot;
use crate::region::RegionKind;

/// Net open/close accounting over a scanned range.
///
/// Purely derived; recomputed on demand and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balance {
    /// Net count of logically opened minus closed elements.
    pub tag_balance: i32,
    /// Net count of unmatched `<`/`</` delimiters minus `>`/`/>` delimiters.
    pub bracket_balance: i32,
}

/// Compute the [`Balance`] over `[start, end)`.
///
/// Regions partially outside the range are clipped at the boundary: a delimiter region counts
/// only when it lies wholly inside (a truncated `</` is no delimiter at all). Malformed nesting
/// is not an error; the scan reports whatever falls out, per the best-effort contract.
pub fn compute_balance(doc: &DocumentSnapshot, start: usize, end: usize) -> Balance {
    let mut balance = Balance::default();
    if start >= end {
        return balance;
    }

    // True while the scan is inside a `<...>` start tag, so the next `>` can be told apart
    // from the second half of a `</name>`.
    let mut in_open_tag = false;

    for region in doc.regions_in_range(start, end) {
        if region.start < start || region.end() > end {
            continue;
        }
        match region.kind {
            RegionKind::TagOpen => {
                balance.bracket_balance += 1;
                in_open_tag = true;
            }
            RegionKind::TagClose => {
                balance.bracket_balance -= 1;
                if in_open_tag {
                    balance.tag_balance += 1;
                } else {
                    balance.tag_balance -= 1;
                }
            }
            RegionKind::EndTagOpen => {
                balance.bracket_balance += 1;
                in_open_tag = false;
            }
            RegionKind::EmptyTagClose => {
                // A self-closed tag nets to zero elements.
                balance.bracket_balance -= 1;
            }
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

    balance
}
