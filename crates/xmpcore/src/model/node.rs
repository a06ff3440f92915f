use std::fmt;

use crate::options::NodeOptions;

/// Handle to a node slot in a [`PropertyTree`](super::PropertyTree) arena
///
/// The generation is bumped each time a slot is reused, so a handle kept
/// past the removal of its node is detected as stale rather than silently
/// pointing at a new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl NodeId {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// A single tree node: schema, property, struct field, array item or qualifier
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Qualified name (`prefix:local`), `[]` for array items, or the
    /// namespace URI for schema nodes
    pub name: String,

    /// Leaf value, or the prefix for schema nodes; empty on composites
    pub value: String,

    pub options: NodeOptions,

    /// Owned children, in document order
    pub children: Vec<NodeId>,

    /// Owned qualifiers, `xml:lang` first and `rdf:type` second when present
    pub qualifiers: Vec<NodeId>,

    /// Back-link to the owning node; carries no ownership
    pub parent: Option<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, value: impl Into<String>, options: NodeOptions) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            options,
            children: Vec::new(),
            qualifiers: Vec::new(),
            parent: None,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn has_qualifiers(&self) -> bool {
        !self.qualifiers.is_empty()
    }
}
