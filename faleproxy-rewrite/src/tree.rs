//! Mutable HTML document tree.
//!
//! Thin wrapper over `scraper`'s html5ever-backed [`Html`]. Parsing never
//! fails: malformed markup is recovered the way browsers do it, and input
//! that is not HTML at all ends up as text inside a synthesized `<body>`.

use ego_tree::NodeId;
use scraper::node::Text;
use scraper::{Html, Node};

/// Kind of a node, as seen by tree walkers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Doctype,
    Element,
    Text,
    Comment,
    ProcessingInstruction,
}

impl From<&Node> for NodeKind {
    fn from(node: &Node) -> Self {
        match node {
            Node::Document | Node::Fragment => NodeKind::Document,
            Node::Doctype(_) => NodeKind::Doctype,
            Node::Element(_) => NodeKind::Element,
            Node::Text(_) => NodeKind::Text,
            Node::Comment(_) => NodeKind::Comment,
            Node::ProcessingInstruction(_) => NodeKind::ProcessingInstruction,
        }
    }
}

pub struct DocumentTree {
    html: Html,
}

impl DocumentTree {
    /// Parse a full document.
    ///
    /// ```
    /// use faleproxy_rewrite::DocumentTree;
    ///
    /// let tree = DocumentTree::parse("<p>unclosed <b>markup");
    /// assert_eq!(
    ///     tree.serialize(),
    ///     "<html><head></head><body><p>unclosed <b>markup</b></p></body></html>"
    /// );
    /// ```
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
        }
    }

    pub fn root(&self) -> NodeId {
        self.html.tree.root().id()
    }

    /// Number of recoverable errors the parser reported.
    pub fn parse_errors(&self) -> usize {
        self.html.errors.len()
    }

    /// Pre-order walk starting at (and including) `from`.
    pub fn walk(&self, from: NodeId) -> impl Iterator<Item = (NodeId, NodeKind)> + '_ {
        self.html
            .tree
            .get(from)
            .into_iter()
            .flat_map(|node| node.descendants())
            .map(|node| (node.id(), NodeKind::from(node.value())))
    }

    /// First element named `name` in document order.
    pub fn find_element(&self, name: &str) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .find(|node| {
                node.value()
                    .as_element()
                    .is_some_and(|element| element.name() == name)
            })
            .map(|node| node.id())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.html.tree.get(id)?.parent().map(|node| node.id())
    }

    /// Payload of a text node; `None` for any other kind.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.html.tree.get(id)?.value() {
            Node::Text(text) => Some(&*text.text),
            _ => None,
        }
    }

    /// Replace the payload of a text node. Returns `false` if `id` is not text.
    pub fn set_text(&mut self, id: NodeId, text: String) -> bool {
        let Some(mut node) = self.html.tree.get_mut(id) else {
            return false;
        };
        match node.value() {
            Node::Text(current) => {
                current.text = text.into();
                true
            }
            _ => false,
        }
    }

    /// Concatenated text of every text node under `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        self.walk(id)
            .filter(|(_, kind)| *kind == NodeKind::Text)
            .filter_map(|(node, _)| self.text(node))
            .collect()
    }

    /// Drop every child of `id` and give it a single text child.
    pub fn replace_children_with_text(&mut self, id: NodeId, text: String) -> bool {
        let children: Vec<NodeId> = match self.html.tree.get(id) {
            Some(node) => node.children().map(|child| child.id()).collect(),
            None => return false,
        };
        for child in children {
            if let Some(mut child) = self.html.tree.get_mut(child) {
                child.detach();
            }
        }
        match self.html.tree.get_mut(id) {
            Some(mut node) => {
                node.append(Node::Text(Text { text: text.into() }));
                true
            }
            None => false,
        }
    }

    /// Serialize the whole document, doctype included.
    pub fn serialize(&self) -> String {
        self.html.html()
    }
}
