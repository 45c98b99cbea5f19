//! Edit-context analysis example
//!
//! Runs all four analyzer queries over a small document and prints what an editor front end
//! would do with the answers.

use xml_edit_core::{
    DocumentSnapshot, IndentOptions, MatchDirection, compute_balance, compute_indent_insertion,
    find_matching_tag, resolve_context,
};
use xml_edit_scanner::XmlScanner;

fn main() {
    let text = "<manifest package=\"com.example\">\n    \
                <application android:label=\"demo\">\n        \
                <activity android:name=\".Main\"/>\n    \
                </application>\n</manifest>\n";
    let doc = DocumentSnapshot::lex(text, &XmlScanner::new());

    // 1. Context resolution: what would completion act on at a given caret?
    let caret = text.find("android:label=\"de").unwrap() + 17;
    let context = resolve_context(&doc, caret).unwrap();
    println!("caret {caret}: editing {:?}", context.kind);
    println!(
        "  attribute {:?}, typed value {:?}, replace span [{}, {})",
        context.attribute_name,
        context.value_prefix,
        context.replace_start,
        context.replace_start + context.replace_len,
    );

    // 2. Balance over the second line: one element opened, none closed.
    let line_start = text.find("    <application").unwrap();
    let line_end = text[line_start..].find('\n').unwrap() + line_start;
    let balance = compute_balance(&doc, line_start, line_end);
    println!(
        "line 2 balance: tags {:+}, brackets {:+}",
        balance.tag_balance, balance.bracket_balance
    );

    // 3. Tag matching: from `<application`s `<` to its `</application`.
    let open = text.find("<application").unwrap();
    let close = find_matching_tag(&doc, open, MatchDirection::Forward, 0).unwrap();
    println!("<application> at {open} matches </application> at {close}");

    // 4. Indentation: a line break typed right after `<application ...>`.
    let break_offset = line_end;
    let insertion = compute_indent_insertion(&doc, break_offset, &IndentOptions::default());
    println!(
        "newline at {break_offset} inserts {:?}, caret moves {} chars",
        insertion.text, insertion.caret_delta
    );
}
