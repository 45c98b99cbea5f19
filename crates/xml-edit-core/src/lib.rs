#![warn(missing_docs)]
//! XML Edit Core - Headless Edit-Context Analysis for XML Documents
//!
//! # Overview
//!
//! `xml-edit-core` drives editor tooling (code completion, auto-indentation, tag matching) over
//! XML source text. It never builds or maintains a parse tree: every query runs directly over a
//! flat stream of lexical regions covering the document, answers at arbitrary caret offsets, and
//! costs time proportional to the scanned sub-range rather than the whole document.
//!
//! Three query classes are exposed, plus a policy composed from two of them:
//!
//! - **Context resolution** ([`resolve_context`]): what construct is the caret inside (element
//!   name, attribute name, attribute value, text content) and what exact span should a
//!   completion replace?
//! - **Balance analysis** ([`compute_balance`]): the net tag/bracket balance between two
//!   offsets, used to decide whether a new line should be indented, dedented, or aligned.
//! - **Tag matching** ([`find_matching_tag`]): where is the lexical partner of a tag delimiter
//!   (open ⇄ close), with self-closing tags excluded from cross-matching?
//! - **Indentation policy** ([`compute_indent_insertion`]): the exact text to insert for a typed
//!   line break, including the `<foo>|</foo>` three-line split.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Indentation Policy                         │  ← composes the two below
//! ├─────────────────────────────────────────────┤
//! │  Context Resolver │ Balance │ Tag Matcher   │  ← independent analyzers
//! ├─────────────────────────────────────────────┤
//! │  DocumentSnapshot (text + region stream)    │  ← one immutable revision
//! ├─────────────────────────────────────────────┤
//! │  RegionLexer (external tokenizer)           │  ← supplied by the host
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use xml_edit_core::{DocumentSnapshot, MatchKind, Region, RegionKind, resolve_context};
//!
//! // Region streams normally come from a lexer; see the `xml-edit-scanner` crate.
//! let doc = DocumentSnapshot::new(
//!     "<foo bar=\"1\">",
//!     vec![
//!         Region::new(RegionKind::TagOpen, 0, 1),
//!         Region::new(RegionKind::TagName, 1, 3),
//!         Region::new(RegionKind::Whitespace, 4, 1),
//!         Region::new(RegionKind::AttributeName, 5, 3),
//!         Region::new(RegionKind::AttributeEquals, 8, 1),
//!         Region::new(RegionKind::AttributeValue, 9, 3),
//!         Region::new(RegionKind::TagClose, 12, 1),
//!     ],
//! );
//!
//! // Caret inside `bar`: an attribute name, with the whole name replaceable.
//! let context = resolve_context(&doc, 6).unwrap();
//! assert_eq!(context.kind, MatchKind::AttributeName);
//! assert_eq!(context.replace_start, 5);
//! assert_eq!(context.replace_len, 3);
//! ```
//!
//! # Contract
//!
//! - Every operation is a pure function of (snapshot, offsets); nothing is cached across calls
//!   and no ambient editor state exists.
//! - Malformed markup is tolerated, never reported: the worst outcome of any query is "no
//!   context" / "no match" / "copy the previous line's indentation".
//! - All offsets are char offsets; all spans are half-open.

pub mod balance;
pub mod context;
pub mod document;
pub mod indent;
pub mod matching;
pub mod region;

pub use balance::{Balance, compute_balance};
pub use context::{MatchContext, MatchKind, extract_element_prefix, resolve_context};
pub use document::{DocumentSnapshot, LineBounds};
pub use indent::{IndentInsertion, IndentOptions, IndentUnit, compute_indent_insertion};
pub use matching::{MatchDirection, find_matching_tag};
pub use region::{Region, RegionKind, RegionLexer};
