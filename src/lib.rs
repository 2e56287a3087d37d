//! # xmlsave
//!
//! Streaming serialization for XML/HTML document trees, modeled on
//! libxml2's `xmlsave` module. A document (or any subtree) is written to
//! one of three byte sinks — an in-memory buffer, a file path, or a
//! caller-supplied [`Channel`] — behind a uniform write/close contract,
//! so the tree walker never knows what kind of destination it is feeding.
//!
//! ## Quick Start
//!
//! ```
//! use xmlsave::{format_document, Document};
//!
//! let doc = Document::parse_str("<root><child>Hello</child></root>").unwrap();
//! let xml = format_document(&doc, true);
//! assert!(xml.contains("  <child>Hello</child>"));
//! ```
//!
//! ## Sinks and ownership
//!
//! Saving to a path opens, owns, and always closes the file. Saving to a
//! [`Channel`] inspects whether the channel is already open: a closed
//! channel is opened and closed by the engine, while an already-open
//! channel is written to and **left open** — the engine never closes a
//! resource the caller still owns. Short writes are fatal ([`SaveError`]
//! carries both byte counts) and are never retried.

pub mod error;
pub mod parser;
pub mod save;
pub mod tree;

// Re-export the primary types and entry points at the crate root.
pub use error::{ParseError, SaveError, SaveErrorKind};
pub use save::{
    format_document, format_document_html, format_node, format_node_html, save_document_to_channel,
    save_document_to_path, save_node_to_channel, save_node_to_path, save_options, Channel,
    SaveOptionInfo, SaveOptions,
};
pub use tree::{Attribute, Document, NodeId, NodeKind};
