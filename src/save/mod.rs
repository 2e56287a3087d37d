//! Serialization engine and save entry points.
//!
//! This module drives the pipeline described by the crate docs: a tree
//! walk (XML or HTML mode) emits text through an output buffer, which
//! pushes chunks through the sink adapter's uniform `write`/`close`
//! contract. The destination — memory, file, or caller channel — is
//! invisible to the walkers.
//!
//! Each save call is one linear pass: open the sink, stream the walk,
//! close the sink. There is no retry anywhere; a failed call left no
//! useful state behind and a fresh call re-executes the whole pipeline.
//! If a write fails mid-walk the walk aborts immediately, the sink still
//! gets a best-effort close, and the write error is reported as primary
//! with any close failure attached as secondary context.
//!
//! Mode selection is explicit: the `format_*` functions are mode-named,
//! and the `save_*` functions pick HTML mode only when the
//! [`SaveOptions::AS_HTML`] flag is set. Nothing is auto-detected from
//! document content.

mod html;
mod options;
pub mod sink;
mod xml;

pub use options::{save_options, SaveOptionInfo, SaveOptions};
pub use sink::Channel;

use std::path::Path;

use crate::error::SaveError;
use crate::tree::{Document, NodeId};

use html::{HtmlConfig, HtmlDumper};
use sink::{OutputBuffer, Sink};
use xml::{XmlConfig, XmlDumper};

// ---------------------------------------------------------------------------
// Format to string
// ---------------------------------------------------------------------------

/// Serializes the whole document to an XML string.
///
/// Uses the document's own declaration fields; no file or channel is
/// touched. `pretty` enables two-space indentation.
///
/// # Examples
///
/// ```
/// use xmlsave::{format_document, Document};
///
/// let doc = Document::parse_str("<a><b/></a>").unwrap();
/// assert_eq!(
///     format_document(&doc, true),
///     "<?xml version=\"1.0\"?>\n<a>\n  <b/>\n</a>\n"
/// );
/// ```
#[must_use]
pub fn format_document(doc: &Document, pretty: bool) -> String {
    let cfg = XmlConfig {
        format: pretty,
        ..XmlConfig::default()
    };
    memory_dump(|out| XmlDumper::new(doc, out, cfg).dump_document())
}

/// Serializes the whole document to an HTML string.
///
/// HTML conventions apply: no XML declaration, void elements without
/// `/>`, raw script/style content. `pretty` adds formatting newlines
/// around block-level elements.
#[must_use]
pub fn format_document_html(doc: &Document, pretty: bool) -> String {
    let cfg = HtmlConfig {
        format: pretty,
        ..HtmlConfig::default()
    };
    memory_dump(|out| HtmlDumper::new(doc, out, cfg).dump_document())
}

/// Serializes a single subtree to an XML string.
///
/// `indent` is the starting indentation depth used when `pretty` is set.
/// No declaration and no trailing newline are emitted.
///
/// # Errors
///
/// Returns a `Serialization` error if `node` does not belong to `doc`.
pub fn format_node(
    doc: &Document,
    node: NodeId,
    pretty: bool,
    indent: usize,
) -> Result<String, SaveError> {
    check_node(doc, node)?;
    let cfg = XmlConfig {
        format: pretty,
        start_depth: indent,
        ..XmlConfig::default()
    };
    Ok(memory_dump(|out| {
        XmlDumper::new(doc, out, cfg).dump_subtree(node)
    }))
}

/// Serializes a single subtree to an HTML string.
///
/// # Errors
///
/// Returns a `Serialization` error if `node` does not belong to `doc`.
pub fn format_node_html(doc: &Document, node: NodeId, pretty: bool) -> Result<String, SaveError> {
    check_node(doc, node)?;
    let cfg = HtmlConfig {
        format: pretty,
        ..HtmlConfig::default()
    };
    Ok(memory_dump(|out| {
        HtmlDumper::new(doc, out, cfg).dump_subtree(node)
    }))
}

// ---------------------------------------------------------------------------
// Save to path / channel
// ---------------------------------------------------------------------------

/// Serializes the whole document to a file.
///
/// The file is created (or truncated), written in streaming fashion, and
/// always closed by the engine. `encoding` is written into the XML
/// declaration and selects the output transcoding; `"UTF-8"` is the
/// conventional default. HTML mode is selected by
/// [`SaveOptions::AS_HTML`].
///
/// # Errors
///
/// `SinkOpen` if the file cannot be created, `ShortWrite` if the
/// destination accepts fewer bytes than offered, `SinkClose` if
/// finalization fails.
pub fn save_document_to_path(
    doc: &Document,
    path: impl AsRef<Path>,
    encoding: &str,
    options: SaveOptions,
) -> Result<(), SaveError> {
    let sink = Sink::file(path.as_ref())?;
    stream_to_sink(doc, None, sink, encoding, options)
}

/// Serializes the whole document to a caller-supplied channel.
///
/// If the channel is not already open it is opened here and closed on
/// completion; a channel the caller already had open is left open — the
/// engine never takes ownership it wasn't given.
///
/// # Errors
///
/// As [`save_document_to_path`], with `SinkOpen` covering a failed
/// channel `open` call.
pub fn save_document_to_channel(
    doc: &Document,
    chan: &mut dyn Channel,
    encoding: &str,
    options: SaveOptions,
) -> Result<(), SaveError> {
    let sink = Sink::channel(chan)?;
    stream_to_sink(doc, None, sink, encoding, options)
}

/// Serializes a single subtree to a file.
///
/// # Errors
///
/// As [`save_document_to_path`], plus a `Serialization` error if `node`
/// does not belong to `doc` (checked before the file is touched).
pub fn save_node_to_path(
    doc: &Document,
    node: NodeId,
    path: impl AsRef<Path>,
    encoding: &str,
    options: SaveOptions,
) -> Result<(), SaveError> {
    check_node(doc, node)?;
    let sink = Sink::file(path.as_ref())?;
    stream_to_sink(doc, Some(node), sink, encoding, options)
}

/// Serializes a single subtree to a caller-supplied channel.
///
/// # Errors
///
/// As [`save_document_to_channel`], plus a `Serialization` error if
/// `node` does not belong to `doc` (checked before the channel is
/// touched).
pub fn save_node_to_channel(
    doc: &Document,
    node: NodeId,
    chan: &mut dyn Channel,
    encoding: &str,
    options: SaveOptions,
) -> Result<(), SaveError> {
    check_node(doc, node)?;
    let sink = Sink::channel(chan)?;
    stream_to_sink(doc, Some(node), sink, encoding, options)
}

// ---------------------------------------------------------------------------
// Pipeline internals
// ---------------------------------------------------------------------------

fn check_node(doc: &Document, node: NodeId) -> Result<(), SaveError> {
    if doc.contains(node) {
        Ok(())
    } else {
        Err(SaveError::serialization(
            "node does not belong to the document",
        ))
    }
}

/// Runs a walk against a memory sink and returns the accumulated text.
///
/// Memory writes cannot fail and the walkers are total over valid trees,
/// so the inner results only exist to share the streaming code paths.
#[allow(clippy::expect_used)]
fn memory_dump(walk: impl FnOnce(&mut OutputBuffer<'static>) -> Result<(), SaveError>) -> String {
    let mut out = OutputBuffer::new(Sink::memory(), None);
    walk(&mut out).expect("memory sink writes cannot fail");
    let (sink, flushed) = out.finish();
    flushed.expect("memory sink writes cannot fail");
    String::from_utf8(sink.into_bytes()).expect("walkers emit valid UTF-8")
}

/// Streams one document or subtree through an opened sink and closes it.
///
/// The walk aborts on the first write failure; the sink still gets a
/// best-effort close, whose failure (if any) rides along as secondary
/// context on the primary error.
fn stream_to_sink(
    doc: &Document,
    node: Option<NodeId>,
    sink: Sink<'_>,
    encoding: &str,
    options: SaveOptions,
) -> Result<(), SaveError> {
    let mut out = OutputBuffer::new(sink, Some(encoding));

    let walk = if options.contains(SaveOptions::AS_HTML) {
        let cfg = HtmlConfig {
            format: options.contains(SaveOptions::FORMAT),
            encoding: Some(encoding),
        };
        let mut dumper = HtmlDumper::new(doc, &mut out, cfg);
        match node {
            Some(n) => dumper.dump_subtree(n),
            None => dumper.dump_document(),
        }
    } else {
        let cfg = XmlConfig {
            format: options.contains(SaveOptions::FORMAT),
            no_decl: options.contains(SaveOptions::NO_DECL),
            no_empty: options.contains(SaveOptions::NO_EMPTY),
            encoding: Some(encoding),
            start_depth: 0,
        };
        let mut dumper = XmlDumper::new(doc, &mut out, cfg);
        match node {
            Some(n) => dumper.dump_subtree(n),
            None => dumper.dump_document(),
        }
    };

    match walk {
        Ok(()) => {
            let (mut sink, flushed) = out.finish();
            match flushed {
                Ok(()) => sink.close(),
                Err(primary) => {
                    let cleanup = sink.close().err();
                    Err(primary.with_cleanup(cleanup))
                }
            }
        }
        Err(primary) => {
            let mut sink = out.into_sink();
            let cleanup = sink.close().err();
            Err(primary.with_cleanup(cleanup))
        }
    }
}
