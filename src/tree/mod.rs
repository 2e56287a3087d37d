//! Arena-based markup document tree.
//!
//! The document tree is the collaborator the save engine reads from: all
//! nodes live in a contiguous `Vec<NodeData>` owned by the [`Document`],
//! referenced by [`NodeId`] — a newtype over `NonZeroU32`. The save engine
//! only ever borrows the tree (`&Document`); it never copies or frees
//! nodes, so a document can be serialized concurrently from several
//! threads as long as nothing mutates it.
//!
//! Arena indices (rather than owning pointers) keep node handles `Copy`
//! and make "a node plus its owning document" a pair of cheap values, the
//! shape the serialization entry points expect.

mod node;

pub use node::NodeKind;

use std::num::NonZeroU32;

use crate::error::ParseError;

/// A typed index into a document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`: it can never be zero, so
/// `Option<NodeId>` is the same size as `NodeId`. A `NodeId` is only
/// meaningful together with the `Document` that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from a raw arena index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 0.
    #[allow(clippy::expect_used, clippy::cast_possible_truncation)]
    fn from_index(index: usize) -> Self {
        Self(NonZeroU32::new(index as u32).expect("NodeId index must be non-zero"))
    }

    /// Returns the raw index for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }
}

/// Storage for a single node in the document arena.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// What kind of node this is and its payload.
    pub kind: NodeKind,
    /// Parent node, if any. The document root node has no parent.
    pub parent: Option<NodeId>,
    /// First child node.
    pub first_child: Option<NodeId>,
    /// Last child node (for O(1) append).
    pub last_child: Option<NodeId>,
    /// Next sibling.
    pub next_sibling: Option<NodeId>,
    /// Previous sibling.
    pub prev_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            prev_sibling: None,
        }
    }
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name (the local part, e.g., `"lang"` for `xml:lang`).
    pub name: String,
    /// The attribute value (entity and character references resolved).
    pub value: String,
    /// Namespace prefix, if any (e.g., `"xml"` for `xml:lang`).
    pub prefix: Option<String>,
}

impl Attribute {
    /// Creates an attribute with no namespace prefix.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            prefix: None,
        }
    }
}

/// A markup document.
///
/// The `Document` owns all nodes in an arena and provides tree navigation
/// (`&Document`) and construction (`&mut Document`). The declaration
/// fields (`version`, `encoding`, `standalone`) feed the XML declaration
/// the serializer emits.
///
/// # Examples
///
/// ```
/// use xmlsave::Document;
///
/// let doc = Document::parse_str("<root><child/></root>").unwrap();
/// let root = doc.root_element().unwrap();
/// assert_eq!(doc.node_name(root), Some("root"));
/// ```
#[derive(Debug)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The document root node id (the Document node, not the root element).
    root: NodeId,
    /// XML version from the declaration (e.g., "1.0").
    pub version: Option<String>,
    /// Encoding name from the declaration (e.g., "UTF-8").
    pub encoding: Option<String>,
    /// Standalone flag from the declaration.
    pub standalone: Option<bool>,
}

impl Document {
    /// Creates a new empty document containing only the root Document node.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(16);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new(NodeKind::Document));
        // Index 1: the document root node
        nodes.push(NodeData::new(NodeKind::Document));
        let root = NodeId::from_index(1);
        Self {
            nodes,
            root,
            version: None,
            encoding: None,
            standalone: None,
        }
    }

    /// Parses an XML string into a `Document`.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the input is not well-formed XML.
    ///
    /// # Examples
    ///
    /// ```
    /// use xmlsave::Document;
    ///
    /// let doc = Document::parse_str("<root><child/></root>").unwrap();
    /// ```
    pub fn parse_str(input: &str) -> Result<Self, ParseError> {
        // Strip a leading UTF-8 BOM (used for encoding detection only).
        let input = input.strip_prefix('\u{FEFF}').unwrap_or(input);
        crate::parser::parse_str(input)
    }

    /// Returns the document root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the root element (the single top-level element), if any.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root)
            .find(|&id| matches!(self.node(id).kind, NodeKind::Element { .. }))
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not refer to a valid node in this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    /// Returns true if `id` refers to a node reachable from this
    /// document's root.
    ///
    /// This is the best-effort ownership check the save entry points use
    /// before walking a subtree: an id from another document either falls
    /// outside the arena or fails the ancestor walk.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        if id.as_index() >= self.nodes.len() {
            return false;
        }
        self.ancestors(id).any(|anc| anc == self.root)
    }

    /// Returns the name of a node, if applicable.
    ///
    /// Elements and PIs have names; text, comments, CDATA, and document
    /// nodes return `None`.
    #[must_use]
    pub fn node_name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Element { name, .. }
            | NodeKind::ProcessingInstruction { target: name, .. } => Some(name),
            _ => None,
        }
    }

    /// Returns the character data of a text, comment, or CDATA node.
    #[must_use]
    pub fn node_text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).kind {
            NodeKind::Text { content }
            | NodeKind::Comment { content }
            | NodeKind::CData { content } => Some(content),
            NodeKind::ProcessingInstruction { data, .. } => data.as_deref(),
            _ => None,
        }
    }

    /// Returns the concatenated text of a node and all its descendants.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        result
    }

    fn collect_text(&self, id: NodeId, buf: &mut String) {
        match &self.node(id).kind {
            NodeKind::Text { content } | NodeKind::CData { content } => {
                buf.push_str(content);
            }
            NodeKind::EntityRef { .. } => {}
            _ => {
                for child in self.children(id) {
                    self.collect_text(child, buf);
                }
            }
        }
    }

    /// Returns the attributes of an element node.
    ///
    /// Returns an empty slice for non-element nodes.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &[Attribute] {
        match &self.node(id).kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Returns the value of an attribute by name on an element node.
    #[must_use]
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).first_child
    }

    /// Returns the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).last_child
    }

    /// Returns the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next_sibling
    }

    /// Returns the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).prev_sibling
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            doc: self,
            next: self.node(id).first_child,
        }
    }

    /// Returns an iterator over a node and its ancestors (up to the root).
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    // --- Construction ---

    /// Allocates a new node in the arena and returns its `NodeId`.
    ///
    /// The node starts detached; link it with [`append_child`](Self::append_child).
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let index = self.nodes.len();
        self.nodes.push(NodeData::new(kind));
        NodeId::from_index(index)
    }

    /// Creates a detached element node with the given name and attributes.
    pub fn create_element(&mut self, name: impl Into<String>, attributes: Vec<Attribute>) -> NodeId {
        self.create_node(NodeKind::Element {
            name: name.into(),
            prefix: None,
            attributes,
        })
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, content: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Text {
            content: content.into(),
        })
    }

    /// Appends a child node to the end of a parent's child list.
    ///
    /// # Panics
    ///
    /// Panics (in debug builds) if `child` already has a parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(
            self.node(child).parent.is_none(),
            "child already has a parent; detach it first"
        );

        self.node_mut(child).parent = Some(parent);

        if let Some(last) = self.node(parent).last_child {
            self.node_mut(last).next_sibling = Some(child);
            self.node_mut(child).prev_sibling = Some(last);
            self.node_mut(parent).last_child = Some(child);
        } else {
            self.node_mut(parent).first_child = Some(child);
            self.node_mut(parent).last_child = Some(child);
        }
    }

    /// Detaches a node from its parent. The node stays allocated in the
    /// arena but becomes unreachable from the root.
    pub fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };

        let prev = self.node(id).prev_sibling;
        let next = self.node(id).next_sibling;

        match prev {
            Some(p) => self.node_mut(p).next_sibling = next,
            None => self.node_mut(parent).first_child = next,
        }

        match next {
            Some(n) => self.node_mut(n).prev_sibling = prev,
            None => self.node_mut(parent).last_child = prev,
        }

        self.node_mut(id).parent = None;
        self.node_mut(id).prev_sibling = None;
        self.node_mut(id).next_sibling = None;
    }

    /// Returns the number of nodes in the arena (excluding the placeholder).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).next_sibling;
        Some(current)
    }
}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).parent;
        Some(current)
    }
}
