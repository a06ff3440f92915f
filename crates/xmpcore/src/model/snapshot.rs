use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::options::NodeOptions;

use super::node::NodeId;
use super::tree::PropertyTree;

/// Owned copy of a subtree, free of arena handles
///
/// Two trees are structurally equal when the snapshots of their roots are
/// equal. Also used for JSON output of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    pub options: NodeOptions,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<NodeSnapshot>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Capture the subtree rooted at `id`
    ///
    /// # Errors
    /// * `StaleNode` - If `id` or any link below it is dangling
    pub fn capture(tree: &PropertyTree, id: NodeId) -> Result<Self> {
        let node = tree.node(id)?;
        let qualifiers = node
            .qualifiers
            .iter()
            .map(|&q| Self::capture(tree, q))
            .collect::<Result<Vec<_>>>()?;
        let children = node
            .children
            .iter()
            .map(|&c| Self::capture(tree, c))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: node.name.clone(),
            value: node.value.clone(),
            options: node.options,
            qualifiers,
            children,
        })
    }

    /// Number of nodes in this subtree, qualifiers included
    pub fn node_count(&self) -> usize {
        1 + self
            .qualifiers
            .iter()
            .chain(&self.children)
            .map(NodeSnapshot::node_count)
            .sum::<usize>()
    }

    /// Number of simple non-qualifier nodes with no children
    pub fn leaf_count(&self) -> usize {
        let own = usize::from(self.children.is_empty() && !self.options.is_qualifier());
        own + self
            .qualifiers
            .iter()
            .chain(&self.children)
            .map(NodeSnapshot::leaf_count)
            .sum::<usize>()
    }

    /// Number of qualifier nodes anywhere in this subtree
    pub fn qualifier_count(&self) -> usize {
        self.qualifiers.len()
            + self
                .qualifiers
                .iter()
                .chain(&self.children)
                .map(NodeSnapshot::qualifier_count)
                .sum::<usize>()
    }

    /// Every value in the subtree, in traversal order
    pub fn values(&self) -> Vec<&str> {
        let mut out = vec![self.value.as_str()];
        for node in self.qualifiers.iter().chain(&self.children) {
            out.extend(node.values());
        }
        out
    }
}
