//! Indentation policy behavior over scanner-produced region streams.

use xml_edit_core::{
    Balance, DocumentSnapshot, IndentOptions, IndentUnit, compute_balance,
    compute_indent_insertion,
};
use xml_edit_scanner::XmlScanner;

fn doc(text: &str) -> DocumentSnapshot {
    DocumentSnapshot::lex(text, &XmlScanner::new())
}

/// Compute the insertion with the caret at the `|` marker, using 4-space indents.
fn insertion_at(text_with_caret: &str) -> (String, usize, String) {
    let offset = text_with_caret.find('|').expect("caret marker");
    let text = text_with_caret.replacen('|', "", 1);
    let snapshot = doc(&text);
    let insertion = compute_indent_insertion(&snapshot, offset, &IndentOptions::default());
    (text, offset, insertion.text)
}

/// Apply an insertion the way a host editor would.
fn apply(text: &str, offset: usize, inserted: &str) -> String {
    let mut out: String = text.chars().take(offset).collect();
    out.push_str(inserted);
    out.extend(text.chars().skip(offset));
    out
}

#[test]
fn test_newline_after_open_tag_indents() {
    let (_, _, inserted) = insertion_at("<root>|");
    assert_eq!(inserted, "\n    ");
}

#[test]
fn test_newline_between_open_and_close_splits_pair() {
    let (text, offset, inserted) = insertion_at("<foo>|</foo>");
    assert_eq!(inserted, "\n    \n");

    let snapshot = doc(&text);
    let insertion = compute_indent_insertion(&snapshot, offset, &IndentOptions::default());
    // Caret lands at the end of the blank indented middle line...
    assert_eq!(insertion.caret_delta, 5);
    // ...and applying the edit pushes `</foo>` to its own line at the outer indentation.
    assert_eq!(apply(&text, offset, &insertion.text), "<foo>\n    \n</foo>");
}

#[test]
fn test_split_preserves_nesting_indent() {
    let (text, offset, inserted) = insertion_at("    <foo>|</foo>");
    assert_eq!(inserted, "\n        \n    ");
    assert_eq!(
        apply(&text, offset, &inserted),
        "    <foo>\n        \n    </foo>"
    );
}

#[test]
fn test_newline_in_plain_text_copies_indent() {
    let (_, _, inserted) = insertion_at("    plain text here|");
    assert_eq!(inserted, "\n    ");
}

#[test]
fn test_multiline_open_tag_aligns_to_open_line() {
    let (_, _, inserted) = insertion_at("  <item\n      name=\"x\">|");
    assert_eq!(inserted, "\n  ");
}

#[test]
fn test_split_does_not_change_net_balance() {
    // Splitting a line must not change the document's net balance, and the per-line balances
    // must still sum to the same totals.
    for marked in ["<foo>|</foo>", "  <a><b>|</b></a>", "<r>\n  <e>|</e>\n</r>"] {
        let offset = marked.find('|').unwrap();
        let text = marked.replacen('|', "", 1);
        let before = doc(&text);
        let insertion = compute_indent_insertion(&before, offset, &IndentOptions::default());
        let applied = apply(&text, offset, &insertion.text);
        let after = doc(&applied);

        let total_before = compute_balance(&before, 0, before.len());
        let total_after = compute_balance(&after, 0, after.len());
        assert_eq!(total_before, total_after, "net balance changed for {marked:?}");

        assert_eq!(
            sum_of_line_balances(&before, &text),
            sum_of_line_balances(&after, &applied),
            "per-line balance sum changed for {marked:?}"
        );
    }
}

fn sum_of_line_balances(snapshot: &DocumentSnapshot, text: &str) -> Balance {
    let mut total = Balance::default();
    let mut line_start = 0;
    for line in text.split('\n') {
        let line_end = line_start + line.chars().count();
        let balance = compute_balance(snapshot, line_start, line_end);
        total.tag_balance += balance.tag_balance;
        total.bracket_balance += balance.bracket_balance;
        line_start = line_end + 1;
    }
    total
}

#[test]
fn test_tab_indentation_unit() {
    let marked = "\t<foo>|</foo>";
    let offset = marked.find('|').unwrap();
    let text = marked.replacen('|', "", 1);
    let snapshot = doc(&text);
    let options = IndentOptions { unit: IndentUnit::Tab };
    let insertion = compute_indent_insertion(&snapshot, offset, &options);
    assert_eq!(insertion.text, "\n\t\t\n\t");
    assert_eq!(insertion.caret_delta, 3);
}

#[test]
fn test_indentation_never_blocks_insertion() {
    // Whatever the input, some insertion starting with a newline comes back.
    for text in ["", "x", "<", "</", "<a", "<a b=\"", "  </a>", "<a>\n"] {
        let snapshot = doc(text);
        for offset in 0..=snapshot.len() + 2 {
            let insertion =
                compute_indent_insertion(&snapshot, offset, &IndentOptions::default());
            assert!(insertion.text.starts_with('\n'), "input {text:?} offset {offset}");
            assert!(insertion.caret_delta <= insertion.text.chars().count());
        }
    }
}
