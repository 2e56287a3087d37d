//! Node type definitions.
//!
//! The `NodeKind` enum represents every node type the serializer knows how
//! to emit. Each variant carries the node-type-specific payload; navigation
//! links (parent, children, siblings) live in `NodeData`, not here.

use super::Attribute;

/// The kind of a markup node and its associated data.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// The document node — there is exactly one per `Document`.
    Document,

    /// An element node, e.g., `<div class="x">`.
    Element {
        /// The element's local name (without any namespace prefix).
        name: String,
        /// Namespace prefix (e.g., `"svg"` in `svg:rect`), if any.
        prefix: Option<String>,
        /// Attributes on this element, in document order.
        attributes: Vec<Attribute>,
    },

    /// A text node containing character data.
    Text {
        /// The text content (character references already resolved).
        content: String,
    },

    /// A CDATA section, e.g., `<![CDATA[...]]>`.
    CData {
        /// The CDATA content (no escaping applied on output).
        content: String,
    },

    /// A comment node, e.g., `<!-- ... -->`.
    Comment {
        /// The comment text (without the `<!--` and `-->` delimiters).
        content: String,
    },

    /// A processing instruction, e.g., `<?target data?>`.
    ProcessingInstruction {
        /// The PI target (e.g., `"xml-stylesheet"`).
        target: String,
        /// The PI data, if any.
        data: Option<String>,
    },

    /// An entity reference that was left unexpanded, e.g., `&draft;`.
    EntityRef {
        /// The entity name (without `&` and `;`).
        name: String,
    },

    /// A document type declaration, e.g., `<!DOCTYPE html>`.
    DocumentType {
        /// The root element name declared in the DOCTYPE.
        name: String,
        /// The PUBLIC identifier, if any.
        public_id: Option<String>,
        /// The SYSTEM identifier (URI), if any.
        system_id: Option<String>,
    },
}

impl NodeKind {
    /// Returns true for node kinds that carry character data directly
    /// (`Text`, `CData`, or an unexpanded `EntityRef`).
    #[must_use]
    pub fn is_text_like(&self) -> bool {
        matches!(
            self,
            Self::Text { .. } | Self::CData { .. } | Self::EntityRef { .. }
        )
    }
}
