//! XML-mode tree walker.
//!
//! Serializes a `Document` (or a subtree) as XML, pushing output through
//! an [`OutputBuffer`] so the same walk feeds memory, file, and channel
//! sinks. Escaping follows libxml2: `<`, `>`, `&` become named entities,
//! `\r` and low control characters become character references, and
//! non-ASCII characters are hex-encoded when the document declares no
//! encoding.

use crate::error::SaveError;
use crate::save::sink::OutputBuffer;
use crate::tree::{Document, NodeId, NodeKind};

/// Settings for one XML dump, resolved from the option bitmask and the
/// call's encoding label.
#[derive(Default)]
pub(crate) struct XmlConfig<'a> {
    /// Pretty-print: newlines and two-space indentation around
    /// element-only content.
    pub format: bool,
    /// Suppress the XML declaration.
    pub no_decl: bool,
    /// Serialize childless elements as `<a></a>` instead of `<a/>`.
    pub no_empty: bool,
    /// Encoding label for the declaration; falls back to the document's
    /// declared encoding when `None`.
    pub encoding: Option<&'a str>,
    /// Starting indentation depth (node dumps only).
    pub start_depth: usize,
}

const INDENT: &str = "  ";

/// Walks a document tree and emits XML.
pub(crate) struct XmlDumper<'d, 'o, 'b> {
    doc: &'d Document,
    out: &'o mut OutputBuffer<'b>,
    cfg: XmlConfig<'d>,
    /// Hex-encode non-ASCII characters. Set when neither the call nor the
    /// document declares an encoding (libxml2 behavior for undeclared
    /// output encoding).
    reencode: bool,
}

impl<'d, 'o, 'b> XmlDumper<'d, 'o, 'b> {
    pub fn new(doc: &'d Document, out: &'o mut OutputBuffer<'b>, cfg: XmlConfig<'d>) -> Self {
        let reencode = cfg.encoding.is_none() && doc.encoding.is_none();
        Self {
            doc,
            out,
            cfg,
            reencode,
        }
    }

    /// Emits the whole document: declaration (unless suppressed), every
    /// child of the document node, and a trailing newline.
    pub fn dump_document(&mut self) -> Result<(), SaveError> {
        if !self.cfg.no_decl {
            self.write_declaration();
        }
        for child in self.doc.children(self.doc.root()) {
            self.dump_node(child, 0, false)?;
        }
        self.out.push('\n');
        Ok(())
    }

    /// Emits a single subtree, starting at the configured indentation
    /// depth. No declaration, no trailing newline.
    pub fn dump_subtree(&mut self, node: NodeId) -> Result<(), SaveError> {
        let depth = self.cfg.start_depth;
        if self.cfg.format {
            for _ in 0..depth {
                self.out.push_str(INDENT);
            }
        }
        self.dump_node(node, depth, false)
    }

    fn write_declaration(&mut self) {
        let version = self.doc.version.as_deref().unwrap_or("1.0");
        self.out.push_str("<?xml version=\"");
        self.out.push_str(version);
        self.out.push('"');
        if let Some(encoding) = self.cfg.encoding.or(self.doc.encoding.as_deref()) {
            self.out.push_str(" encoding=\"");
            self.out.push_str(encoding);
            self.out.push('"');
        }
        if let Some(standalone) = self.doc.standalone {
            self.out.push_str(" standalone=\"");
            self.out.push_str(if standalone { "yes" } else { "no" });
            self.out.push('"');
        }
        self.out.push_str("?>\n");
    }

    /// Returns true if the element contains only other elements (and
    /// optional whitespace text), meaning indentation is safe to add.
    fn is_element_only(&self, id: NodeId) -> bool {
        let mut has_element_child = false;
        for child in self.doc.children(id) {
            match &self.doc.node(child).kind {
                NodeKind::Element { .. } => has_element_child = true,
                NodeKind::Text { content } => {
                    if !content.trim().is_empty() {
                        return false;
                    }
                }
                NodeKind::CData { .. } | NodeKind::EntityRef { .. } => return false,
                _ => {}
            }
        }
        has_element_child
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str(INDENT);
        }
    }

    /// Emits one node. `indented` is true when the parent is formatting
    /// element-only content, in which case this node gets its own line.
    fn dump_node(&mut self, id: NodeId, depth: usize, indented: bool) -> Result<(), SaveError> {
        let indented = indented && self.cfg.format;
        match &self.doc.node(id).kind {
            NodeKind::Element { .. } => self.dump_element(id, depth, indented)?,
            NodeKind::Text { content } => {
                write_escaped_text(self.out.buf_mut(), content, self.reencode);
            }
            NodeKind::CData { content } => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(content);
                self.out.push_str("]]>");
            }
            NodeKind::Comment { content } => {
                if indented {
                    self.indent(depth);
                }
                self.out.push_str("<!--");
                self.out.push_str(content);
                self.out.push_str("-->");
                if indented {
                    self.out.push('\n');
                }
            }
            NodeKind::ProcessingInstruction { target, data } => {
                if indented {
                    self.indent(depth);
                }
                self.out.push_str("<?");
                self.out.push_str(target);
                if let Some(d) = data {
                    self.out.push(' ');
                    self.out.push_str(d);
                }
                self.out.push_str("?>");
                if indented {
                    self.out.push('\n');
                }
            }
            NodeKind::EntityRef { name } => {
                self.out.push('&');
                self.out.push_str(name);
                self.out.push(';');
            }
            NodeKind::DocumentType {
                name,
                public_id,
                system_id,
            } => {
                self.out.push_str("<!DOCTYPE ");
                self.out.push_str(name);
                match (public_id, system_id) {
                    (Some(pub_id), Some(sys_id)) => {
                        self.out.push_str(" PUBLIC \"");
                        self.out.push_str(pub_id);
                        self.out.push_str("\" \"");
                        self.out.push_str(sys_id);
                        self.out.push('"');
                    }
                    (None, Some(sys_id)) => {
                        self.out.push_str(" SYSTEM \"");
                        self.out.push_str(sys_id);
                        self.out.push('"');
                    }
                    _ => {}
                }
                self.out.push_str(">\n");
            }
            NodeKind::Document => {}
        }
        self.out.maybe_flush()
    }

    fn dump_element(&mut self, id: NodeId, depth: usize, indented: bool) -> Result<(), SaveError> {
        let NodeKind::Element {
            name,
            prefix,
            attributes,
        } = &self.doc.node(id).kind
        else {
            return Ok(());
        };

        if indented {
            self.indent(depth);
        }
        self.out.push('<');
        if let Some(pfx) = prefix {
            self.out.push_str(pfx);
            self.out.push(':');
        }
        self.out.push_str(name);

        for attr in attributes {
            self.out.push(' ');
            if let Some(pfx) = &attr.prefix {
                self.out.push_str(pfx);
                self.out.push(':');
            }
            self.out.push_str(&attr.name);
            self.out.push_str("=\"");
            write_escaped_attr(self.out.buf_mut(), &attr.value, self.reencode);
            self.out.push('"');
        }

        if self.doc.first_child(id).is_none() && !self.cfg.no_empty {
            self.out.push_str("/>");
            if indented {
                self.out.push('\n');
            }
            return Ok(());
        }

        self.out.push('>');
        let element_only = self.cfg.format && self.is_element_only(id);
        if element_only {
            self.out.push('\n');
        }
        for child in self.doc.children(id) {
            if element_only {
                if let NodeKind::Text { content } = &self.doc.node(child).kind {
                    if content.trim().is_empty() {
                        continue;
                    }
                }
            }
            self.dump_node(child, depth + 1, element_only)?;
        }
        if element_only {
            self.indent(depth);
        }
        self.out.push_str("</");
        if let Some(pfx) = prefix {
            self.out.push_str(pfx);
            self.out.push(':');
        }
        self.out.push_str(name);
        self.out.push('>');
        if indented {
            self.out.push('\n');
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Writes a hexadecimal character reference (`&#xHH;`).
fn write_hex_char_ref(out: &mut String, ch: char) {
    use std::fmt::Write;
    let _ = write!(out, "&#x{:X};", ch as u32);
}

/// Escapes text content:
/// - `<`, `>`, `&` become named entity references
/// - `\r` becomes `&#13;`; `\t` and `\n` pass through
/// - other control characters below 0x20 are hex-encoded
/// - non-ASCII characters are hex-encoded when `reencode` is set
fn write_escaped_text(out: &mut String, text: &str, reencode: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#13;"),
            '\t' | '\n' => out.push(ch),
            c if (c as u32) < 0x20 => write_hex_char_ref(out, c),
            c if reencode && (c as u32) >= 0x80 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}

/// Escapes an attribute value: like text escaping, plus `"` becomes
/// `&quot;` and whitespace characters become character references so they
/// survive attribute-value normalization on re-parse.
fn write_escaped_attr(out: &mut String, text: &str, reencode: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c if (c as u32) < 0x20 => write_hex_char_ref(out, c),
            c if reencode && (c as u32) >= 0x80 => write_hex_char_ref(out, c),
            _ => out.push(ch),
        }
    }
}
