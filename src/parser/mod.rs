//! Strict XML parser.
//!
//! A compact, hand-rolled recursive descent parser sufficient to rebuild a
//! [`Document`] from serialized output. It handles the XML declaration,
//! DOCTYPE (without the internal subset), elements with namespace-prefixed
//! names, attributes, character and builtin entity references, CDATA,
//! comments, and processing instructions.
//!
//! This is deliberately the small strict subset the serializer's round-trip
//! needs — no error recovery, no DTD processing, no external entities.
//! Unknown entity references in character data are kept as
//! [`NodeKind::EntityRef`] nodes so they survive a serialize/parse cycle.

use crate::error::{ParseError, SourceLocation};
use crate::tree::{Attribute, Document, NodeId, NodeKind};

/// Parses an XML string into a [`Document`].
///
/// # Errors
///
/// Returns `ParseError` if the input is not well-formed.
pub fn parse_str(input: &str) -> Result<Document, ParseError> {
    let mut doc = Document::new();
    let mut cur = Cursor::new(input);

    parse_prolog(&mut cur, &mut doc)?;

    // Exactly one root element
    if !cur.starts_with("<") {
        return Err(cur.error("expected root element"));
    }
    let root = doc.root();
    parse_element(&mut cur, &mut doc, root)?;

    // Trailing misc: comments, PIs, whitespace
    loop {
        cur.skip_whitespace();
        if cur.at_end() {
            break;
        }
        if cur.starts_with("<!--") {
            parse_comment(&mut cur, &mut doc, root)?;
        } else if cur.starts_with("<?") {
            parse_pi(&mut cur, &mut doc, root)?;
        } else {
            return Err(cur.error("content after root element"));
        }
    }

    Ok(doc)
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// Tracks the parse position and line/column for error reporting.
struct Cursor<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    /// Consumes `prefix` if present; returns whether it was consumed.
    fn eat(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            for _ in prefix.chars() {
                self.bump();
            }
            true
        } else {
            false
        }
    }

    fn expect(&mut self, prefix: &str) -> Result<(), ParseError> {
        if self.eat(prefix) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{prefix}'")))
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.bump();
        }
    }

    /// Consumes until `delim` and returns the consumed text (delimiter
    /// consumed but excluded from the result).
    fn take_until(&mut self, delim: &str, what: &str) -> Result<&'a str, ParseError> {
        let start = self.pos;
        match self.rest().find(delim) {
            Some(offset) => {
                let end = start + offset;
                while self.pos < end + delim.len() {
                    self.bump();
                }
                Ok(&self.input[start..end])
            }
            None => Err(self.error(format!("unterminated {what}"))),
        }
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            location: SourceLocation {
                line: self.line,
                column: self.column,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Prolog
// ---------------------------------------------------------------------------

fn parse_prolog(cur: &mut Cursor<'_>, doc: &mut Document) -> Result<(), ParseError> {
    if cur.starts_with("<?xml ") || cur.starts_with("<?xml?") {
        parse_declaration(cur, doc)?;
    }

    let root = doc.root();
    loop {
        cur.skip_whitespace();
        if cur.starts_with("<!--") {
            parse_comment(cur, doc, root)?;
        } else if cur.starts_with("<!DOCTYPE") {
            parse_doctype(cur, doc)?;
        } else if cur.starts_with("<?") {
            parse_pi(cur, doc, root)?;
        } else {
            return Ok(());
        }
    }
}

fn parse_declaration(cur: &mut Cursor<'_>, doc: &mut Document) -> Result<(), ParseError> {
    cur.expect("<?xml")?;
    loop {
        cur.skip_whitespace();
        if cur.eat("?>") {
            return Ok(());
        }
        let name = parse_name(cur)?;
        cur.skip_whitespace();
        cur.expect("=")?;
        cur.skip_whitespace();
        let value = parse_quoted(cur)?;
        match name {
            "version" => doc.version = Some(value.to_string()),
            "encoding" => doc.encoding = Some(value.to_string()),
            "standalone" => doc.standalone = Some(value == "yes"),
            other => return Err(cur.error(format!("unexpected '{other}' in XML declaration"))),
        }
    }
}

fn parse_doctype(cur: &mut Cursor<'_>, doc: &mut Document) -> Result<(), ParseError> {
    cur.expect("<!DOCTYPE")?;
    cur.skip_whitespace();
    let name = parse_name(cur)?.to_string();
    cur.skip_whitespace();

    let mut public_id = None;
    let mut system_id = None;
    if cur.eat("PUBLIC") {
        cur.skip_whitespace();
        public_id = Some(parse_quoted(cur)?.to_string());
        cur.skip_whitespace();
        if cur.starts_with("\"") || cur.starts_with("'") {
            system_id = Some(parse_quoted(cur)?.to_string());
        }
    } else if cur.eat("SYSTEM") {
        cur.skip_whitespace();
        system_id = Some(parse_quoted(cur)?.to_string());
    }

    cur.skip_whitespace();
    // Internal subset is skipped, not modeled
    if cur.eat("[") {
        cur.take_until("]", "DOCTYPE internal subset")?;
        cur.skip_whitespace();
    }
    cur.expect(">")?;

    let node = doc.create_node(NodeKind::DocumentType {
        name,
        public_id,
        system_id,
    });
    let root = doc.root();
    doc.append_child(root, node);
    Ok(())
}

// ---------------------------------------------------------------------------
// Elements and content
// ---------------------------------------------------------------------------

fn parse_element(
    cur: &mut Cursor<'_>,
    doc: &mut Document,
    parent: NodeId,
) -> Result<(), ParseError> {
    cur.expect("<")?;
    let qname = parse_name(cur)?.to_string();
    let (prefix, name) = split_qname(&qname);

    let mut attributes = Vec::new();
    loop {
        let had_space = matches!(cur.peek(), Some(' ' | '\t' | '\r' | '\n'));
        cur.skip_whitespace();

        if cur.eat("/>") {
            let elem = doc.create_node(NodeKind::Element {
                name,
                prefix,
                attributes,
            });
            doc.append_child(parent, elem);
            return Ok(());
        }
        if cur.eat(">") {
            let elem = doc.create_node(NodeKind::Element {
                name,
                prefix,
                attributes,
            });
            doc.append_child(parent, elem);
            parse_content(cur, doc, elem, &qname)?;
            return Ok(());
        }

        if !had_space {
            return Err(cur.error("expected whitespace before attribute"));
        }
        let attr_qname = parse_name(cur)?.to_string();
        let (attr_prefix, attr_name) = split_qname(&attr_qname);
        cur.skip_whitespace();
        cur.expect("=")?;
        cur.skip_whitespace();
        let raw = parse_quoted(cur)?;
        let value = decode_attr_value(cur, raw)?;
        attributes.push(Attribute {
            name: attr_name,
            value,
            prefix: attr_prefix,
        });
    }
}

fn parse_content(
    cur: &mut Cursor<'_>,
    doc: &mut Document,
    elem: NodeId,
    qname: &str,
) -> Result<(), ParseError> {
    let mut text = String::new();

    macro_rules! flush_text {
        () => {
            if !text.is_empty() {
                let node = doc.create_node(NodeKind::Text {
                    content: std::mem::take(&mut text),
                });
                doc.append_child(elem, node);
            }
        };
    }

    loop {
        if cur.starts_with("</") {
            flush_text!();
            cur.expect("</")?;
            let end = parse_name(cur)?;
            if end != qname {
                return Err(cur.error(format!("mismatched end tag: expected </{qname}>, got </{end}>")));
            }
            cur.skip_whitespace();
            cur.expect(">")?;
            return Ok(());
        } else if cur.starts_with("<![CDATA[") {
            flush_text!();
            cur.expect("<![CDATA[")?;
            let content = cur.take_until("]]>", "CDATA section")?.to_string();
            let node = doc.create_node(NodeKind::CData { content });
            doc.append_child(elem, node);
        } else if cur.starts_with("<!--") {
            flush_text!();
            parse_comment(cur, doc, elem)?;
        } else if cur.starts_with("<?") {
            flush_text!();
            parse_pi(cur, doc, elem)?;
        } else if cur.starts_with("<") {
            flush_text!();
            parse_element(cur, doc, elem)?;
        } else if cur.starts_with("&") {
            match parse_reference(cur)? {
                Reference::Char(ch) => text.push(ch),
                Reference::Entity(name) => {
                    flush_text!();
                    let node = doc.create_node(NodeKind::EntityRef { name });
                    doc.append_child(elem, node);
                }
            }
        } else {
            match cur.bump() {
                Some(ch) => text.push(ch),
                None => return Err(cur.error(format!("unexpected end of input in <{qname}>"))),
            }
        }
    }
}

fn parse_comment(
    cur: &mut Cursor<'_>,
    doc: &mut Document,
    parent: NodeId,
) -> Result<(), ParseError> {
    cur.expect("<!--")?;
    let content = cur.take_until("-->", "comment")?.to_string();
    let node = doc.create_node(NodeKind::Comment { content });
    doc.append_child(parent, node);
    Ok(())
}

fn parse_pi(cur: &mut Cursor<'_>, doc: &mut Document, parent: NodeId) -> Result<(), ParseError> {
    cur.expect("<?")?;
    let target = parse_name(cur)?.to_string();
    if target.eq_ignore_ascii_case("xml") {
        return Err(cur.error("XML declaration only allowed at document start"));
    }
    let data = if matches!(cur.peek(), Some(' ' | '\t' | '\r' | '\n')) {
        cur.skip_whitespace();
        let data = cur.take_until("?>", "processing instruction")?;
        if data.is_empty() {
            None
        } else {
            Some(data.to_string())
        }
    } else {
        cur.expect("?>")?;
        None
    };
    let node = doc.create_node(NodeKind::ProcessingInstruction { target, data });
    doc.append_child(parent, node);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tokens and references
// ---------------------------------------------------------------------------

fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

fn is_name_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':')
}

fn parse_name<'a>(cur: &mut Cursor<'a>) -> Result<&'a str, ParseError> {
    let start = cur.pos;
    match cur.peek() {
        Some(ch) if is_name_start(ch) => {
            cur.bump();
        }
        _ => return Err(cur.error("expected a name")),
    }
    while matches!(cur.peek(), Some(ch) if is_name_char(ch)) {
        cur.bump();
    }
    Ok(&cur.input[start..cur.pos])
}

/// Splits a qualified name into (prefix, local name).
fn split_qname(qname: &str) -> (Option<String>, String) {
    match qname.split_once(':') {
        Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {
            (Some(prefix.to_string()), local.to_string())
        }
        _ => (None, qname.to_string()),
    }
}

fn parse_quoted<'a>(cur: &mut Cursor<'a>) -> Result<&'a str, ParseError> {
    let quote = match cur.peek() {
        Some(q @ ('"' | '\'')) => q,
        _ => return Err(cur.error("expected quoted value")),
    };
    cur.bump();
    let mut delim = [0u8; 4];
    cur.take_until(quote.encode_utf8(&mut delim), "quoted value")
}

enum Reference {
    /// A character or builtin entity reference, resolved to its character.
    Char(char),
    /// An unknown (custom) entity reference, kept by name.
    Entity(String),
}

fn parse_reference(cur: &mut Cursor<'_>) -> Result<Reference, ParseError> {
    cur.expect("&")?;
    if cur.eat("#") {
        let hex = cur.eat("x");
        let start = cur.pos;
        while matches!(cur.peek(), Some(ch) if ch.is_ascii_hexdigit()) {
            cur.bump();
        }
        let digits = &cur.input[start..cur.pos];
        cur.expect(";")?;
        let radix = if hex { 16 } else { 10 };
        let code = u32::from_str_radix(digits, radix)
            .map_err(|_| cur.error("invalid character reference"))?;
        let ch = char::from_u32(code).ok_or_else(|| cur.error("invalid character reference"))?;
        return Ok(Reference::Char(ch));
    }

    let name = parse_name(cur)?.to_string();
    cur.expect(";")?;
    Ok(match name.as_str() {
        "amp" => Reference::Char('&'),
        "lt" => Reference::Char('<'),
        "gt" => Reference::Char('>'),
        "apos" => Reference::Char('\''),
        "quot" => Reference::Char('"'),
        _ => Reference::Entity(name),
    })
}

/// Decodes references in an attribute value. Unknown entities are an error
/// here — an attribute cannot carry an `EntityRef` node.
fn decode_attr_value(cur: &Cursor<'_>, raw: &str) -> Result<String, ParseError> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut inner = Cursor::new(raw);
    while let Some(ch) = inner.peek() {
        if ch == '&' {
            match parse_reference(&mut inner)? {
                Reference::Char(c) => out.push(c),
                Reference::Entity(name) => {
                    return Err(cur.error(format!("undefined entity '&{name};' in attribute")));
                }
            }
        } else {
            inner.bump();
            out.push(ch);
        }
    }
    Ok(out)
}
