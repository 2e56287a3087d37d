//! HTML-mode tree walker.
//!
//! Serializes a `Document` tree as HTML, following libxml2's
//! `htmlSaveFile` conventions rather than XML rules:
//!
//! - No XML declaration
//! - Void elements use `<br>` syntax (no `/>`, no closing tag)
//! - Non-void empty elements use `<p></p>` (never `<p/>`)
//! - Boolean attributes collapse to the bare name
//! - Raw text elements (script, style) are not escaped
//! - Non-ASCII characters become named HTML entities when no UTF-8
//!   charset is declared
//! - Formatting newlines around block-level elements (when formatting)

use crate::error::SaveError;
use crate::save::sink::OutputBuffer;
use crate::tree::{Document, NodeId, NodeKind};

/// Settings for one HTML dump.
#[derive(Default)]
pub(crate) struct HtmlConfig<'a> {
    /// Add formatting newlines around block-level elements.
    pub format: bool,
    /// Encoding label from the save call, if any. A UTF-8 label keeps
    /// non-ASCII characters as raw UTF-8 instead of named entities.
    pub encoding: Option<&'a str>,
}

/// Walks a document tree and emits HTML.
pub(crate) struct HtmlDumper<'d, 'o, 'b> {
    doc: &'d Document,
    out: &'o mut OutputBuffer<'b>,
    format: bool,
    /// Re-encode non-ASCII characters as named entities. Cleared when a
    /// UTF-8 charset is declared by the call, the document, or a `<meta>`
    /// tag (HTML's default encoding is Latin-1, so entities are the safe
    /// spelling everywhere else).
    reencode: bool,
}

impl<'d, 'o, 'b> HtmlDumper<'d, 'o, 'b> {
    pub fn new(doc: &'d Document, out: &'o mut OutputBuffer<'b>, cfg: HtmlConfig<'d>) -> Self {
        let declared_utf8 = cfg
            .encoding
            .or(doc.encoding.as_deref())
            .is_some_and(|enc| enc.eq_ignore_ascii_case("utf-8"))
            || detect_utf8_charset(doc);
        Self {
            doc,
            out,
            format: cfg.format,
            reencode: !declared_utf8,
        }
    }

    /// Emits every child of the document node, then a trailing newline.
    pub fn dump_document(&mut self) -> Result<(), SaveError> {
        for child in self.doc.children(self.doc.root()) {
            self.dump_node(child)?;
        }
        if !self.out.ends_with_newline() {
            self.out.push('\n');
        }
        Ok(())
    }

    /// Emits a single subtree. No trailing newline.
    pub fn dump_subtree(&mut self, node: NodeId) -> Result<(), SaveError> {
        self.dump_node(node)
    }

    fn dump_node(&mut self, id: NodeId) -> Result<(), SaveError> {
        match &self.doc.node(id).kind {
            NodeKind::Element { .. } => self.dump_element(id)?,
            NodeKind::Text { content } | NodeKind::CData { content } => {
                // CDATA is not standard HTML — emitted as escaped text
                write_escaped_text(self.out.buf_mut(), content, self.reencode);
            }
            NodeKind::Comment { content } => {
                self.out.push_str("<!--");
                self.out.push_str(content);
                self.out.push_str("-->");
            }
            NodeKind::ProcessingInstruction { target, data } => {
                // HTML PIs use '>' as terminator, not '?>'
                self.out.push_str("<?");
                self.out.push_str(target);
                if let Some(d) = data {
                    self.out.push(' ');
                    self.out.push_str(d);
                }
                self.out.push('>');
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
                        self.out.push('"');
                        if !sys_id.is_empty() {
                            self.out.push_str(" \"");
                            self.out.push_str(sys_id);
                            self.out.push('"');
                        }
                    }
                    (Some(pub_id), None) => {
                        self.out.push_str(" PUBLIC \"");
                        self.out.push_str(pub_id);
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

    #[allow(clippy::too_many_lines)]
    fn dump_element(&mut self, id: NodeId) -> Result<(), SaveError> {
        let NodeKind::Element {
            name,
            prefix,
            attributes,
        } = &self.doc.node(id).kind
        else {
            return Ok(());
        };

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
            // Boolean attributes: bare name when value == name
            if attr.value != attr.name {
                if attr.value.contains('"') && !attr.value.contains('\'') {
                    // Single-quote delimiters when the value holds double quotes
                    self.out.push_str("='");
                    write_escaped_attr_sq(self.out.buf_mut(), &attr.value, self.reencode);
                    self.out.push('\'');
                } else {
                    self.out.push_str("=\"");
                    if is_uri_attribute(&attr.name) {
                        write_uri_attr(self.out.buf_mut(), &attr.value, self.reencode);
                    } else {
                        write_escaped_attr(self.out.buf_mut(), &attr.value, self.reencode);
                    }
                    self.out.push('"');
                }
            }
        }
        self.out.push('>');

        let lower = name.to_ascii_lowercase();

        // Void elements have no content and no closing tag
        if is_void_element(&lower) {
            self.newline_after_close(id, &lower);
            return self.out.maybe_flush();
        }

        self.newline_after_open(id, &lower);

        if is_raw_text_element(&lower) {
            // script/style content goes out verbatim
            for child in self.doc.children(id) {
                if let NodeKind::Text { content } = &self.doc.node(child).kind {
                    self.out.push_str(content);
                } else {
                    self.dump_node(child)?;
                }
            }
        } else {
            for child in self.doc.children(id) {
                self.dump_node(child)?;
            }
        }

        self.newline_before_close(id, &lower);

        self.out.push_str("</");
        if let Some(pfx) = prefix {
            self.out.push_str(pfx);
            self.out.push(':');
        }
        self.out.push_str(name);
        self.out.push('>');

        self.newline_after_close(id, &lower);
        self.out.maybe_flush()
    }

    // -- Formatting newlines (libxml2 block-element heuristics) ------------

    /// Newline after a block element's opening tag: only when formatting,
    /// the element is not inline and not `p`-ish, its first child is not
    /// text-like, and it has more than one child.
    fn newline_after_open(&mut self, id: NodeId, tag: &str) {
        if !self.format || is_inline_element(tag) || tag.starts_with('p') {
            return;
        }
        let Some(first) = self.doc.first_child(id) else {
            return;
        };
        if self.doc.node(first).kind.is_text_like() {
            return;
        }
        if self.doc.next_sibling(first).is_none() {
            return;
        }
        self.out.push('\n');
    }

    /// Newline before a block element's closing tag, under the same
    /// conditions as [`newline_after_open`](Self::newline_after_open) but
    /// keyed on the last child.
    fn newline_before_close(&mut self, id: NodeId, tag: &str) {
        if !self.format || is_inline_element(tag) || tag.starts_with('p') {
            return;
        }
        let Some(first) = self.doc.first_child(id) else {
            return;
        };
        let Some(last) = self.doc.last_child(id) else {
            return;
        };
        if self.doc.node(last).kind.is_text_like() {
            return;
        }
        if self.doc.next_sibling(first).is_none() {
            return;
        }
        self.out.push('\n');
    }

    /// Newline after a block element's closing tag, when the next sibling
    /// is not text-like and the parent is not `p`-ish.
    fn newline_after_close(&mut self, id: NodeId, tag: &str) {
        if !self.format || is_inline_element(tag) {
            return;
        }
        let Some(next) = self.doc.next_sibling(id) else {
            return;
        };
        if self.doc.node(next).kind.is_text_like() {
            return;
        }
        if let Some(parent) = self.doc.parent(id) {
            if self.doc.node_name(parent).unwrap_or("").starts_with('p') {
                return;
            }
        }
        self.out.push('\n');
    }
}

// ---------------------------------------------------------------------------
// Charset detection
// ---------------------------------------------------------------------------

/// Detects whether the document declares a UTF-8 charset via `<meta>`:
/// either `<meta charset="utf-8">` or
/// `<meta http-equiv="Content-Type" content="...charset=utf-8...">`.
fn detect_utf8_charset(doc: &Document) -> bool {
    doc.children(doc.root())
        .any(|id| check_meta_charset(doc, id))
}

fn check_meta_charset(doc: &Document, id: NodeId) -> bool {
    let NodeKind::Element {
        name, attributes, ..
    } = &doc.node(id).kind
    else {
        return false;
    };
    if name == "meta" {
        for attr in attributes {
            if attr.name == "charset" && attr.value.eq_ignore_ascii_case("utf-8") {
                return true;
            }
        }
        let is_content_type = attributes
            .iter()
            .any(|a| a.name == "http-equiv" && a.value.eq_ignore_ascii_case("content-type"));
        if is_content_type
            && attributes.iter().any(|a| {
                a.name == "content" && a.value.to_ascii_lowercase().contains("charset=utf-8")
            })
        {
            return true;
        }
    }
    doc.children(id).any(|child| check_meta_charset(doc, child))
}

// ---------------------------------------------------------------------------
// HTML element classification
// ---------------------------------------------------------------------------

/// Returns true if the tag is an HTML void element (no content, no
/// closing tag).
pub(crate) fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "basefont"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "isindex"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Returns true if the tag's content is raw text that must not be escaped.
pub(crate) fn is_raw_text_element(tag: &str) -> bool {
    matches!(tag, "script" | "style")
}

/// Returns true if the element is an HTML inline element. Block-level
/// elements get formatting newlines around them; inline elements do not.
fn is_inline_element(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "abbr"
            | "acronym"
            | "b"
            | "bdo"
            | "big"
            | "br"
            | "cite"
            | "code"
            | "dfn"
            | "em"
            | "font"
            | "i"
            | "img"
            | "input"
            | "kbd"
            | "label"
            | "q"
            | "s"
            | "samp"
            | "select"
            | "small"
            | "span"
            | "strike"
            | "strong"
            | "sub"
            | "sup"
            | "textarea"
            | "tt"
            | "u"
            | "var"
    )
}

/// Returns true if the attribute carries a URI whose spaces should be
/// percent-encoded.
fn is_uri_attribute(name: &str) -> bool {
    matches!(
        name,
        "href"
            | "src"
            | "action"
            | "background"
            | "cite"
            | "classid"
            | "codebase"
            | "data"
            | "longdesc"
            | "profile"
            | "usemap"
    )
}

// ---------------------------------------------------------------------------
// Named entities
// ---------------------------------------------------------------------------

/// Entity names for U+00A0..=U+00FF (the HTML 4.0 Latin-1 block),
/// indexed by `code - 160`.
#[rustfmt::skip]
const LATIN1_ENTITIES: [&str; 96] = [
    "nbsp", "iexcl", "cent", "pound", "curren", "yen", "brvbar", "sect",
    "uml", "copy", "ordf", "laquo", "not", "shy", "reg", "macr",
    "deg", "plusmn", "sup2", "sup3", "acute", "micro", "para", "middot",
    "cedil", "sup1", "ordm", "raquo", "frac14", "frac12", "frac34", "iquest",
    "Agrave", "Aacute", "Acirc", "Atilde", "Auml", "Aring", "AElig", "Ccedil",
    "Egrave", "Eacute", "Ecirc", "Euml", "Igrave", "Iacute", "Icirc", "Iuml",
    "ETH", "Ntilde", "Ograve", "Oacute", "Ocirc", "Otilde", "Ouml", "times",
    "Oslash", "Ugrave", "Uacute", "Ucirc", "Uuml", "Yacute", "THORN", "szlig",
    "agrave", "aacute", "acirc", "atilde", "auml", "aring", "aelig", "ccedil",
    "egrave", "eacute", "ecirc", "euml", "igrave", "iacute", "icirc", "iuml",
    "eth", "ntilde", "ograve", "oacute", "ocirc", "otilde", "ouml", "divide",
    "oslash", "ugrave", "uacute", "ucirc", "uuml", "yacute", "thorn", "yuml",
];

/// Looks up the HTML 4.0 entity name for a character, if it has one.
fn reverse_lookup_entity(ch: char) -> Option<&'static str> {
    let code = ch as u32;
    if (0xA0..=0xFF).contains(&code) {
        return Some(LATIN1_ENTITIES[(code - 0xA0) as usize]);
    }
    // Common named entities outside the Latin-1 block
    match ch {
        '\u{0152}' => Some("OElig"),
        '\u{0153}' => Some("oelig"),
        '\u{2013}' => Some("ndash"),
        '\u{2014}' => Some("mdash"),
        '\u{2018}' => Some("lsquo"),
        '\u{2019}' => Some("rsquo"),
        '\u{201C}' => Some("ldquo"),
        '\u{201D}' => Some("rdquo"),
        '\u{2022}' => Some("bull"),
        '\u{2026}' => Some("hellip"),
        '\u{20AC}' => Some("euro"),
        '\u{2122}' => Some("trade"),
        _ => None,
    }
}

fn push_entity_or_char(out: &mut String, ch: char) {
    if let Some(name) = reverse_lookup_entity(ch) {
        out.push('&');
        out.push_str(name);
        out.push(';');
    } else {
        out.push(ch);
    }
}

// ---------------------------------------------------------------------------
// Escaping
// ---------------------------------------------------------------------------

/// Escapes text content for HTML output.
fn write_escaped_text(out: &mut String, text: &str, reencode: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if reencode && (c as u32) >= 0x80 => push_entity_or_char(out, c),
            _ => out.push(ch),
        }
    }
}

/// Escapes a double-quote-delimited attribute value.
fn write_escaped_attr(out: &mut String, text: &str, reencode: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if reencode && (c as u32) >= 0x80 => push_entity_or_char(out, c),
            _ => out.push(ch),
        }
    }
}

/// Escapes a single-quote-delimited attribute value (used when the value
/// contains `"` characters).
fn write_escaped_attr_sq(out: &mut String, text: &str, reencode: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if reencode && (c as u32) >= 0x80 => push_entity_or_char(out, c),
            _ => out.push(ch),
        }
    }
}

/// Writes a URI attribute value, percent-encoding spaces.
fn write_uri_attr(out: &mut String, text: &str, reencode: bool) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            ' ' => out.push_str("%20"),
            c if reencode && (c as u32) >= 0x80 => push_entity_or_char(out, c),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::save::sink::{OutputBuffer, Sink};
    use crate::tree::Attribute;

    fn dump(doc: &Document, cfg: HtmlConfig<'_>) -> String {
        let mut out = OutputBuffer::new(Sink::memory(), None);
        HtmlDumper::new(doc, &mut out, cfg)
            .dump_document()
            .unwrap();
        let (sink, res) = out.finish();
        res.unwrap();
        String::from_utf8(sink.into_bytes()).expect("dump produced invalid UTF-8")
    }

    fn dump_default(doc: &Document) -> String {
        dump(doc, HtmlConfig::default())
    }

    /// Builds `<html><body>...</body></html>` around the given children.
    fn body_doc(build: impl FnOnce(&mut Document, crate::tree::NodeId)) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        let html = doc.create_element("html", vec![]);
        doc.append_child(root, html);
        let body = doc.create_element("body", vec![]);
        doc.append_child(html, body);
        build(&mut doc, body);
        doc
    }

    // -- Void elements -------------------------------------------------------

    #[test]
    fn test_void_element_br() {
        let doc = body_doc(|doc, body| {
            let br = doc.create_element("br", vec![]);
            doc.append_child(body, br);
        });
        let html = dump_default(&doc);
        assert!(html.contains("<br>"), "expected <br>, got: {html}");
        assert!(!html.contains("<br/>"), "should not have <br/>");
        assert!(!html.contains("</br>"), "should not have </br>");
    }

    #[test]
    fn test_void_element_img_with_attr() {
        let doc = body_doc(|doc, body| {
            let img = doc.create_element("img", vec![Attribute::new("src", "x.png")]);
            doc.append_child(body, img);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains(r#"<img src="x.png">"#),
            "expected img with src, got: {html}"
        );
        assert!(!html.contains("</img>"), "void element should not close");
    }

    // -- Non-void elements ---------------------------------------------------

    #[test]
    fn test_non_void_empty_element() {
        let doc = body_doc(|doc, body| {
            let p = doc.create_element("p", vec![]);
            doc.append_child(body, p);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains("<p></p>"),
            "expected <p></p>, not self-closing, got: {html}"
        );
    }

    // -- Raw text elements ---------------------------------------------------

    #[test]
    fn test_script_not_escaped() {
        let doc = body_doc(|doc, body| {
            let script = doc.create_element("script", vec![]);
            doc.append_child(body, script);
            let code = doc.create_text("if (a < b) {}");
            doc.append_child(script, code);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains("if (a < b) {}"),
            "script content should not be escaped, got: {html}"
        );
    }

    #[test]
    fn test_style_not_escaped() {
        let doc = body_doc(|doc, body| {
            let style = doc.create_element("style", vec![]);
            doc.append_child(body, style);
            let css = doc.create_text(".a > .b {}");
            doc.append_child(style, css);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains(".a > .b {}"),
            "style content should not be escaped, got: {html}"
        );
    }

    // -- Attributes ----------------------------------------------------------

    #[test]
    fn test_boolean_attribute_collapsed() {
        let doc = body_doc(|doc, body| {
            let input = doc.create_element("input", vec![Attribute::new("disabled", "disabled")]);
            doc.append_child(body, input);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains("<input disabled>"),
            "expected bare boolean attr, got: {html}"
        );
    }

    #[test]
    fn test_regular_attribute_preserved() {
        let doc = body_doc(|doc, body| {
            let input = doc.create_element("input", vec![Attribute::new("type", "text")]);
            doc.append_child(body, input);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains(r#"type="text""#),
            "expected type=\"text\", got: {html}"
        );
    }

    #[test]
    fn test_attr_with_quotes_uses_single_quote_delimiters() {
        let doc = body_doc(|doc, body| {
            let div = doc.create_element("div", vec![Attribute::new("title", "say \"hello\"")]);
            doc.append_child(body, div);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains("title='say \"hello\"'"),
            "expected single-quoted attr, got: {html}"
        );
    }

    #[test]
    fn test_uri_attribute_space_encoded() {
        let doc = body_doc(|doc, body| {
            let a = doc.create_element("a", vec![Attribute::new("href", "a b")]);
            doc.append_child(body, a);
            let text = doc.create_text("link");
            doc.append_child(a, text);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains("a%20b"),
            "spaces in href should be encoded as %20, got: {html}"
        );
    }

    // -- Text escaping and entities ------------------------------------------

    #[test]
    fn test_text_escaping() {
        let doc = body_doc(|doc, body| {
            let p = doc.create_element("p", vec![]);
            doc.append_child(body, p);
            let text = doc.create_text("a & b < c > d");
            doc.append_child(p, text);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains("a &amp; b &lt; c &gt; d"),
            "expected escaped text, got: {html}"
        );
    }

    #[test]
    fn test_non_ascii_becomes_named_entity() {
        let doc = body_doc(|doc, body| {
            let p = doc.create_element("p", vec![]);
            doc.append_child(body, p);
            let text = doc.create_text("café");
            doc.append_child(p, text);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains("caf&eacute;"),
            "expected named entity without UTF-8 charset, got: {html}"
        );
    }

    #[test]
    fn test_utf8_call_encoding_keeps_raw_utf8() {
        let doc = body_doc(|doc, body| {
            let p = doc.create_element("p", vec![]);
            doc.append_child(body, p);
            let text = doc.create_text("café");
            doc.append_child(p, text);
        });
        let html = dump(
            &doc,
            HtmlConfig {
                encoding: Some("UTF-8"),
                ..HtmlConfig::default()
            },
        );
        assert!(html.contains("café"), "expected raw UTF-8, got: {html}");
    }

    #[test]
    fn test_meta_charset_keeps_raw_utf8() {
        let mut doc = Document::new();
        let root = doc.root();
        let html_el = doc.create_element("html", vec![]);
        doc.append_child(root, html_el);
        let head = doc.create_element("head", vec![]);
        doc.append_child(html_el, head);
        let meta = doc.create_element("meta", vec![Attribute::new("charset", "utf-8")]);
        doc.append_child(head, meta);
        let body = doc.create_element("body", vec![]);
        doc.append_child(html_el, body);
        let text = doc.create_text("café");
        doc.append_child(body, text);

        let html = dump_default(&doc);
        assert!(
            html.contains("café"),
            "meta charset should preserve UTF-8, got: {html}"
        );
    }

    // -- Entity references ---------------------------------------------------

    #[test]
    fn test_entity_ref_preserved() {
        let doc = body_doc(|doc, body| {
            let entity = doc.create_node(NodeKind::EntityRef {
                name: "nbsp".to_string(),
            });
            doc.append_child(body, entity);
        });
        let html = dump_default(&doc);
        assert!(
            html.contains("&nbsp;"),
            "entity reference should be preserved, got: {html}"
        );
    }

    // -- DOCTYPE -------------------------------------------------------------

    #[test]
    fn test_doctype_serialization() {
        let mut doc = Document::new();
        let root = doc.root();
        let doctype = doc.create_node(NodeKind::DocumentType {
            name: "html".to_string(),
            public_id: Some("-//W3C//DTD HTML 4.01//EN".to_string()),
            system_id: Some("http://www.w3.org/TR/html4/strict.dtd".to_string()),
        });
        doc.append_child(root, doctype);
        let html_el = doc.create_element("html", vec![]);
        doc.append_child(root, html_el);

        let html = dump_default(&doc);
        assert!(
            html.starts_with("<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\""),
            "expected DOCTYPE first, got: {html}"
        );
    }

    // -- No XML declaration --------------------------------------------------

    #[test]
    fn test_no_xml_declaration() {
        let mut doc = Document::new();
        doc.version = Some("1.0".to_string());
        let root = doc.root();
        let html_el = doc.create_element("html", vec![]);
        doc.append_child(root, html_el);

        let html = dump_default(&doc);
        assert!(
            !html.contains("<?xml"),
            "HTML mode must not emit an XML declaration, got: {html}"
        );
    }

    // -- Block formatting ----------------------------------------------------

    #[test]
    fn test_format_newlines_around_block_elements() {
        let doc = body_doc(|doc, body| {
            let div = doc.create_element("div", vec![]);
            doc.append_child(body, div);
            let ul = doc.create_element("ul", vec![]);
            doc.append_child(div, ul);
            for item in ["one", "two"] {
                let li = doc.create_element("li", vec![]);
                doc.append_child(ul, li);
                let text = doc.create_text(item);
                doc.append_child(li, text);
            }
        });
        let html = dump(
            &doc,
            HtmlConfig {
                format: true,
                ..HtmlConfig::default()
            },
        );
        assert!(
            html.contains("<ul>\n"),
            "expected newline after block open, got: {html}"
        );
        assert!(
            html.contains("</li>\n<li>") || html.contains("</li>\n</ul>"),
            "expected newlines between list items, got: {html}"
        );
    }

    #[test]
    fn test_inline_element_no_newlines() {
        let doc = body_doc(|doc, body| {
            let p = doc.create_element("p", vec![]);
            doc.append_child(body, p);
            let text = doc.create_text("Hello ");
            doc.append_child(p, text);
            let span = doc.create_element("span", vec![]);
            doc.append_child(p, span);
            let world = doc.create_text("world");
            doc.append_child(span, world);
        });
        let html = dump(
            &doc,
            HtmlConfig {
                format: true,
                ..HtmlConfig::default()
            },
        );
        assert!(
            html.contains("<span>world</span>"),
            "inline element should not gain newlines, got: {html}"
        );
    }

    // -- Trailing newline ----------------------------------------------------

    #[test]
    fn test_trailing_newline() {
        let doc = body_doc(|_, _| {});
        let html = dump_default(&doc);
        assert!(
            html.ends_with('\n'),
            "output should end with newline, got: {html:?}"
        );
    }
}
