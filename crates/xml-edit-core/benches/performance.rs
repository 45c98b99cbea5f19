use criterion::{Criterion, black_box, criterion_group, criterion_main};
use xml_edit_core::{
    DocumentSnapshot, IndentOptions, MatchDirection, compute_balance, compute_indent_insertion,
    find_matching_tag, resolve_context,
};
use xml_edit_scanner::XmlScanner;

/// A deeply nested synthetic document: `element_count` elements, a few attributes each.
fn large_document(element_count: usize) -> String {
    let mut out = String::with_capacity(element_count * 64);
    out.push_str("<root>\n");
    for i in 0..element_count {
        out.push_str(&format!(
            "  <item id=\"{i}\" name=\"item-{i}\">\n    <value kind=\"text\"/>\n  </item>\n"
        ));
    }
    out.push_str("</root>\n");
    out
}

fn bench_scan(c: &mut Criterion) {
    let text = large_document(10_000);
    let scanner = XmlScanner::new();
    c.bench_function("scan/10k_elements", |b| {
        b.iter(|| {
            let regions = scanner.scan(black_box(&text));
            black_box(regions.len());
        })
    });
}

fn bench_balance_subrange(c: &mut Criterion) {
    let text = large_document(10_000);
    let doc = DocumentSnapshot::lex(&text, &XmlScanner::new());
    // A range in the middle of the document; cost must track the range, not the document.
    let start = doc.len() / 2;
    let end = start + 200;
    c.bench_function("balance/200_char_range", |b| {
        b.iter(|| black_box(compute_balance(&doc, black_box(start), black_box(end))))
    });
}

fn bench_matching(c: &mut Criterion) {
    let text = large_document(10_000);
    let doc = DocumentSnapshot::lex(&text, &XmlScanner::new());
    c.bench_function("matching/root_to_end", |b| {
        b.iter(|| black_box(find_matching_tag(&doc, 0, MatchDirection::Forward, 0)))
    });
}

fn bench_context_resolution(c: &mut Criterion) {
    let text = large_document(10_000);
    let doc = DocumentSnapshot::lex(&text, &XmlScanner::new());
    // Caret inside an attribute value near the middle of the document.
    let offset = text.find("name=\"item-5000\"").unwrap() + 12;
    c.bench_function("context/attribute_value", |b| {
        b.iter(|| black_box(resolve_context(&doc, black_box(offset))))
    });
}

fn bench_indent(c: &mut Criterion) {
    let text = large_document(10_000);
    let doc = DocumentSnapshot::lex(&text, &XmlScanner::new());
    let offset = text.find("<value kind=\"text\"/>").unwrap() + 20;
    let options = IndentOptions::default();
    c.bench_function("indent/after_self_closed", |b| {
        b.iter(|| black_box(compute_indent_insertion(&doc, black_box(offset), &options)))
    });
}

criterion_group!(
    benches,
    bench_scan,
    bench_balance_subrange,
    bench_matching,
    bench_context_resolution,
    bench_indent
);
criterion_main!(benches);
