//! Read-only document tree
//!
//! The exported application document is HTML written for people, not machines. We hand the
//! raw bytes to html5ever (which recovers from anything) and then freeze the resulting
//! `RcDom` into a flat arena so that the parsers can navigate it without touching `RefCell`s
//! or weak parent pointers.
//!
//! Nodes are stored in document (pre-)order. That gives us two cheap properties the parsers
//! lean on:
//!
//! - the descendants of a node are the contiguous id range `id + 1 .. end`
//! - "the next matching element after this one" is a forward scan over ids
//!
//! Only elements and text survive the freeze. Comments, doctypes and processing instructions
//! carry no information for us.
//!
//! Capabilities
//!
//! Everything the compiler needs from the tree is here: filtered child/descendant iteration,
//! concatenated subtree text, the ordered text fragments of a subtree with the link that wraps
//! each one, and sibling traversal. There is no mutation API.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Index of a node inside its [`Document`].
pub type NodeId = usize;

/// Name given to the synthetic root element.
pub const ROOT_NAME: &str = "#document";

/// A frozen tree node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Position of this node in its parent's children.
    sibling_index: usize,
    /// Exclusive end of this node's subtree in the arena.
    end: NodeId,
}

/// An immutable, navigable HTML tree.
#[derive(Debug, Clone)]
pub struct Document {
    slots: Vec<Slot>,
}

impl Document {
    /// Parse HTML source into a frozen tree.
    pub fn parse(source: &str) -> Self {
        let dom = parse_document(RcDom::default(), Default::default()).one(source);
        let mut doc = Document { slots: Vec::new() };
        doc.freeze(&dom.document, None);
        doc
    }

    fn freeze(&mut self, handle: &Handle, parent: Option<NodeId>) {
        let node = match &handle.data {
            NodeData::Document => Node::Element {
                name: ROOT_NAME.to_string(),
                attrs: Vec::new(),
            },
            NodeData::Element { name, attrs, .. } => Node::Element {
                name: name.local.to_string(),
                attrs: attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect(),
            },
            NodeData::Text { contents } => Node::Text(contents.borrow().to_string()),
            _ => return,
        };

        let id = self.slots.len();
        let sibling_index = match parent {
            Some(parent) => {
                let siblings = &mut self.slots[parent].children;
                siblings.push(id);
                siblings.len() - 1
            }
            None => 0,
        };
        self.slots.push(Slot {
            node,
            parent,
            children: Vec::new(),
            sibling_index,
            end: id + 1,
        });

        for child in handle.children.borrow().iter() {
            self.freeze(child, Some(id));
        }
        self.slots[id].end = self.slots.len();
    }

    /// The synthetic root element.
    pub fn root(&self) -> NodeRef<'_> {
        NodeRef { doc: self, id: 0 }
    }

    /// Handle for a node id.
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id < self.slots.len()).then_some(NodeRef { doc: self, id })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// One text run of a subtree, tagged with the destination of the link wrapping it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub text: &'a str,
    pub link: Option<&'a str>,
}

impl<'a> Fragment<'a> {
    pub fn new(text: &'a str, link: Option<&'a str>) -> Self {
        Self { text, link }
    }
}

/// Borrowed handle to a node
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.node() {
            Node::Element { name, .. } => write!(f, "<{}>#{}", name, self.id),
            Node::Text(text) => write!(f, "{:?}#{}", text, self.id),
        }
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl<'a> NodeRef<'a> {
    fn slot(&self) -> &'a Slot {
        &self.doc.slots[self.id]
    }

    fn at(&self, id: NodeId) -> NodeRef<'a> {
        NodeRef { doc: self.doc, id }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> &'a Node {
        &self.slot().node
    }

    /// Element name, `None` for text nodes.
    pub fn name(&self) -> Option<&'a str> {
        match self.node() {
            Node::Element { name, .. } => Some(name.as_str()),
            Node::Text(_) => None,
        }
    }

    /// True when this is an element with the given name.
    pub fn is(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    pub fn is_element(&self) -> bool {
        matches!(self.node(), Node::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.node(), Node::Text(_))
    }

    pub fn attr(&self, key: &str) -> Option<&'a str> {
        match self.node() {
            Node::Element { attrs, .. } => attrs
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, value)| value.as_str()),
            Node::Text(_) => None,
        }
    }

    /// True when `self` comes after `other` in document order.
    pub fn is_after(&self, other: &NodeRef<'_>) -> bool {
        self.id > other.id
    }

    /// True when `self` lies inside the subtree of `ancestor`.
    pub fn is_inside(&self, ancestor: &NodeRef<'_>) -> bool {
        self.id > ancestor.id && self.id < ancestor.slot().end
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.slot().parent.map(|id| self.at(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        self.slot()
            .children
            .iter()
            .map(move |&id| NodeRef { doc, id })
    }

    /// Element children only.
    pub fn child_elements(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.children().filter(|child| child.is_element())
    }

    /// Every node below this one, in document order.
    pub fn descendants(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        (self.id + 1..self.slot().end).map(move |id| NodeRef { doc, id })
    }

    /// Every descendant element with the given name, in document order.
    pub fn find_all(&self, name: &'a str) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.descendants().filter(move |node| node.is(name))
    }

    /// First descendant element with the given name.
    pub fn find(&self, name: &str) -> Option<NodeRef<'a>> {
        self.descendants().find(|node| node.is(name))
    }

    /// Enclosing nodes, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        std::iter::successors(self.parent(), |node| node.parent())
    }

    /// Nearest enclosing element with the given name.
    pub fn find_parent(&self, name: &str) -> Option<NodeRef<'a>> {
        self.ancestors().find(|node| node.is(name))
    }

    pub fn next_siblings(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let doc = self.doc;
        let siblings: &'a [NodeId] = match self.slot().parent {
            Some(parent) => &doc.slots[parent].children[self.slot().sibling_index + 1..],
            None => &[],
        };
        siblings.iter().map(move |&id| NodeRef { doc, id })
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        self.next_siblings().next()
    }

    pub fn previous_sibling(&self) -> Option<NodeRef<'a>> {
        let parent = self.slot().parent?;
        let index = self.slot().sibling_index.checked_sub(1)?;
        Some(self.at(self.doc.slots[parent].children[index]))
    }

    /// Following sibling elements with the given name.
    pub fn find_next_siblings(&self, name: &'a str) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        self.next_siblings().filter(move |node| node.is(name))
    }

    pub fn find_next_sibling(&self, name: &str) -> Option<NodeRef<'a>> {
        self.next_siblings().find(|node| node.is(name))
    }

    /// First element with the given name after this node in document order, including this
    /// node's own descendants.
    pub fn find_next(&self, name: &str) -> Option<NodeRef<'a>> {
        (self.id + 1..self.doc.slots.len())
            .map(|id| self.at(id))
            .find(|node| node.is(name))
    }

    /// Concatenated text of the subtree.
    pub fn text(&self) -> String {
        match self.node() {
            Node::Text(text) => text.clone(),
            Node::Element { .. } => self
                .descendants()
                .filter_map(|node| match node.node() {
                    Node::Text(text) => Some(text.as_str()),
                    Node::Element { .. } => None,
                })
                .collect(),
        }
    }

    /// Subtree text with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Non-blank lines of the subtree text, trimmed. Both `<br>` elements and literal newlines
    /// in the source break lines.
    pub fn lines(&self) -> Vec<String> {
        let mut text = String::new();
        for node in std::iter::once(*self).chain(self.descendants()) {
            match node.node() {
                Node::Text(run) => text.push_str(run),
                Node::Element { name, .. } if name == "br" => text.push('\n'),
                Node::Element { .. } => {}
            }
        }
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Destination of the nearest link at or above this node, looking no further up than
    /// `boundary`. Name-only anchors (`<a name=..>`) are not links.
    pub fn enclosing_link(&self, boundary: &NodeRef<'_>) -> Option<&'a str> {
        std::iter::once(*self)
            .chain(self.ancestors())
            .take_while(|node| node.id >= boundary.id)
            .filter(|node| node.is("a"))
            .find_map(|node| node.attr("href"))
    }

    /// The text runs of this subtree in order, each with the link that wraps it (if any).
    pub fn strings(&self) -> Vec<Fragment<'a>> {
        let this = *self;
        std::iter::once(this)
            .chain(self.descendants())
            .filter_map(|node| match node.node() {
                Node::Text(text) => Some(Fragment::new(text, node.enclosing_link(&this))),
                Node::Element { .. } => None,
            })
            .collect()
    }

    /// Links (`<a href=..>`) at or below this node.
    pub fn links(&self) -> Vec<NodeRef<'a>> {
        std::iter::once(*self)
            .chain(self.descendants())
            .filter(|node| node.is("a") && node.attr("href").is_some())
            .collect()
    }
}
