//! Document snapshots.
//!
//! A [`DocumentSnapshot`] is one immutable revision of a document: its text plus the ordered
//! region stream covering it. All analyzer queries take the snapshot as an explicit argument;
//! there is no ambient document state anywhere in the crate.
//!
//! All offsets are **char offsets** and all ranges are half-open, matching the region model.

use crate::region::{Region, RegionLexer};
use ropey::Rope;

/// Bounds of a single logical line, trailing newline excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBounds {
    /// Char offset of the first char on the line.
    pub start: usize,
    /// Line length in chars, newline excluded.
    pub len: usize,
}

impl LineBounds {
    /// Exclusive end char offset (the newline position, if the line has one).
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// One immutable (text, regions) revision of a document.
///
/// The snapshot is cheap to rebuild per edit; the analyzers never mutate it and never retain
/// references across calls, so a single snapshot can serve any number of queries.
pub struct DocumentSnapshot {
    /// Rope provides O(log n) offset/line conversion without a hand-rolled index.
    rope: Rope,
    /// Ordered by start offset; non-overlapping.
    regions: Vec<Region>,
}

impl DocumentSnapshot {
    /// Build a snapshot from text and an already-lexed region stream.
    ///
    /// `regions` must be ordered by start offset and non-overlapping; that is the lexer's
    /// contract and is only spot-checked here in debug builds.
    pub fn new(text: &str, regions: Vec<Region>) -> Self {
        debug_assert!(regions.windows(2).all(|w| w[0].end() <= w[1].start));
        Self {
            rope: Rope::from_str(text),
            regions,
        }
    }

    /// Build a snapshot by running `lexer` over `text`.
    pub fn lex(text: &str, lexer: &impl RegionLexer) -> Self {
        let regions = lexer.lex(text);
        Self::new(text, regions)
    }

    /// Document length in chars.
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns `true` if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The full region stream, in document order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Bounds-checked char access.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.rope.len_chars() {
            Some(self.rope.char(offset))
        } else {
            None
        }
    }

    /// Extract `[start, end)` as an owned string; `None` if the range is inverted or out of
    /// bounds.
    pub fn text_range(&self, start: usize, end: usize) -> Option<String> {
        if start > end || end > self.rope.len_chars() {
            return None;
        }
        Some(self.rope.slice(start..end).to_string())
    }

    /// The region containing `offset`, if any.
    pub fn region_at(&self, offset: usize) -> Option<Region> {
        let idx = self.regions.partition_point(|r| r.end() <= offset);
        self.regions
            .get(idx)
            .copied()
            .filter(|r| r.contains(offset))
    }

    /// All regions overlapping `[start, end)`, in document order.
    ///
    /// Regions straddling either boundary are returned whole; callers clip as needed.
    pub fn regions_in_range(&self, start: usize, end: usize) -> &[Region] {
        let lo = self.regions.partition_point(|r| r.end() <= start);
        let hi = self.regions.partition_point(|r| r.start < end);
        &self.regions[lo.min(hi)..hi]
    }

    /// The nearest region ending at or before `offset` (the caret's left neighbor).
    pub fn region_before(&self, offset: usize) -> Option<Region> {
        let idx = self.regions.partition_point(|r| r.end() <= offset);
        idx.checked_sub(1).map(|i| self.regions[i])
    }

    /// The nearest region starting at or after `offset` (the caret's right neighbor).
    pub fn region_after(&self, offset: usize) -> Option<Region> {
        let idx = self.regions.partition_point(|r| r.start < offset);
        self.regions.get(idx).copied()
    }

    /// Bounds of the line containing `offset`, newline excluded.
    ///
    /// `offset` may equal the document length (caret at end of text); anything beyond that is
    /// `None`.
    pub fn line_bounds_at(&self, offset: usize) -> Option<LineBounds> {
        if offset > self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(offset);
        let start = self.rope.line_to_char(line);
        let slice = self.rope.line(line);
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        Some(LineBounds { start, len })
    }
}
