#![allow(clippy::expect_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fmt::Write;
use std::io;

use xmlsave::{
    format_document, format_document_html, save_document_to_channel, Channel, Document,
    SaveOptions,
};

// ---------------------------------------------------------------------------
// Document generators
// ---------------------------------------------------------------------------

/// Generates an XML document with approximately `n` elements.
fn make_xml(n: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<catalog>");
    for i in 0..n {
        let _ = write!(
            xml,
            "<book id=\"bk{i}\"><title>Title {i}</title>\
             <author>Author {i}</author>\
             <price>{}.99</price></book>",
            10 + i
        );
    }
    xml.push_str("</catalog>\n");
    xml
}

/// A channel that discards everything it is given.
struct NullChannel {
    open: bool,
}

impl Channel for NullChannel {
    fn is_open(&self) -> bool {
        self.open
    }

    fn open(&mut self) -> io::Result<()> {
        self.open = true;
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(buf.len())
    }

    fn close(&mut self) -> io::Result<()> {
        self.open = false;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_format_document(c: &mut Criterion) {
    let small = Document::parse_str(&make_xml(10)).expect("parse small");
    let medium = Document::parse_str(&make_xml(100)).expect("parse medium");
    let large = Document::parse_str(&make_xml(1000)).expect("parse large");

    c.bench_function("format_compact_small", |b| {
        b.iter(|| format_document(black_box(&small), false));
    });
    c.bench_function("format_compact_medium", |b| {
        b.iter(|| format_document(black_box(&medium), false));
    });
    c.bench_function("format_compact_large", |b| {
        b.iter(|| format_document(black_box(&large), false));
    });
    c.bench_function("format_pretty_large", |b| {
        b.iter(|| format_document(black_box(&large), true));
    });
}

fn bench_format_html(c: &mut Criterion) {
    let doc = Document::parse_str(&make_xml(100)).expect("parse");

    c.bench_function("format_html_medium", |b| {
        b.iter(|| format_document_html(black_box(&doc), false));
    });
}

fn bench_save_to_channel(c: &mut Criterion) {
    let large = Document::parse_str(&make_xml(1000)).expect("parse large");

    c.bench_function("save_channel_large", |b| {
        b.iter(|| {
            let mut chan = NullChannel { open: true };
            save_document_to_channel(
                black_box(&large),
                &mut chan,
                "UTF-8",
                SaveOptions::default(),
            )
        });
    });

    c.bench_function("save_channel_large_latin1", |b| {
        b.iter(|| {
            let mut chan = NullChannel { open: true };
            save_document_to_channel(
                black_box(&large),
                &mut chan,
                "ISO-8859-1",
                SaveOptions::default(),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_format_document,
    bench_format_html,
    bench_save_to_channel
);
criterion_main!(benches);
