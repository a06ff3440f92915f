use crate::errors::{Result, XmpError};
use crate::options::{NodeKind, NodeOptions};

use super::node::{Node, NodeId};
use super::snapshot::NodeSnapshot;

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena holding every node of one metadata tree
///
/// A node is owned by the tree when it is reachable from the root through
/// `children` / `qualifiers`. Removing a node frees its whole subtree and
/// bumps the generation of each freed slot, so stale [`NodeId`]s are
/// rejected rather than aliased.
///
/// Not thread-safe; a tree instance needs external serialization if it is
/// shared across threads.
#[derive(Debug)]
pub struct PropertyTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    root: NodeId,
}

impl Default for PropertyTree {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTree {
    /// Create a tree holding only an empty root
    pub fn new() -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            root: NodeId {
                index: 0,
                generation: 0,
            },
        };
        tree.root = tree.alloc(Node::new("", "", NodeOptions::default()));
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    /// Get a live node
    ///
    /// # Errors
    /// * `StaleNode` - If `id` does not refer to a live node of this tree
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or_else(|| stale(id))
    }

    /// Get a live node mutably
    ///
    /// Direct field edits bypass the resolver and can break tree
    /// invariants; the validator will report them.
    ///
    /// # Errors
    /// * `StaleNode` - If `id` does not refer to a live node of this tree
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.get_mut(id).ok_or_else(|| stale(id))
    }

    /// Number of live nodes, root included
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.node.is_some()).count()
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if slot.generation == id.generation && slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index);
            }
        }
    }

    /// Free every node below `id` (children and qualifiers), not `id` itself
    fn release_offspring(&mut self, id: NodeId) {
        let mut pending = match self.get_mut(id) {
            Some(node) => {
                let mut owned = std::mem::take(&mut node.children);
                owned.append(&mut node.qualifiers);
                owned
            }
            None => return,
        };
        while let Some(next) = pending.pop() {
            if let Some(node) = self.get_mut(next) {
                pending.append(&mut node.children);
                pending.append(&mut node.qualifiers);
            }
            self.release(next);
        }
    }

    /// Insert `node` into the children of `parent` at `index` (clamped to
    /// the end) and link its parent.
    ///
    /// # Errors
    /// * `StaleNode` - If `parent` is not live
    pub fn insert_child(&mut self, parent: NodeId, index: usize, mut node: Node) -> Result<NodeId> {
        self.node(parent)?;
        node.parent = Some(parent);
        let id = self.alloc(node);
        let children = &mut self.node_mut(parent)?.children;
        let at = index.min(children.len());
        children.insert(at, id);
        Ok(id)
    }

    /// Append `node` to the children of `parent`
    ///
    /// # Errors
    /// * `StaleNode` - If `parent` is not live
    pub fn append_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        self.insert_child(parent, usize::MAX, node)
    }

    /// Insert `node` into the qualifiers of `parent` at `index` (clamped)
    ///
    /// # Errors
    /// * `StaleNode` - If `parent` is not live
    pub fn insert_qualifier(
        &mut self,
        parent: NodeId,
        index: usize,
        mut node: Node,
    ) -> Result<NodeId> {
        self.node(parent)?;
        node.parent = Some(parent);
        let id = self.alloc(node);
        let qualifiers = &mut self.node_mut(parent)?.qualifiers;
        let at = index.min(qualifiers.len());
        qualifiers.insert(at, id);
        Ok(id)
    }

    /// Append `node` to the qualifiers of `parent`
    ///
    /// # Errors
    /// * `StaleNode` - If `parent` is not live
    pub fn append_qualifier(&mut self, parent: NodeId, node: Node) -> Result<NodeId> {
        self.insert_qualifier(parent, usize::MAX, node)
    }

    /// Detach `id` from its parent and free its subtree
    ///
    /// # Errors
    /// * `StaleNode` - If `id` is not live
    /// * `Internal` - If `id` is the root
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(XmpError::Internal {
                message: "the tree root cannot be removed".to_string(),
            });
        }
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent.and_then(|p| self.get_mut(p)) {
            parent.children.retain(|&child| child != id);
            parent.qualifiers.retain(|&qual| qual != id);
        }
        self.release_offspring(id);
        self.release(id);
        Ok(())
    }

    /// Reset a node to the empty simple state, freeing its children and
    /// qualifiers. The parent link is kept.
    ///
    /// An attached node keeps its name and kind so that its owner stays
    /// consistent; a schema node also keeps its prefix.
    ///
    /// # Errors
    /// * `StaleNode` - If `id` is not live
    pub fn clear_node(&mut self, id: NodeId) -> Result<()> {
        self.node(id)?;
        self.release_offspring(id);
        let node = self.node_mut(id)?;
        if node.parent.is_none() {
            node.name.clear();
            node.value.clear();
            node.options = NodeOptions::default();
            return Ok(());
        }
        let kind = node.options.kind;
        if kind != NodeKind::Schema {
            node.value.clear();
        }
        node.options = NodeOptions {
            kind,
            ..NodeOptions::default()
        };
        Ok(())
    }

    /// Clear the whole tree down to an empty root
    pub fn erase(&mut self) {
        let root = self.root;
        self.release_offspring(root);
        if let Some(node) = self.get_mut(root) {
            node.name.clear();
            node.value.clear();
            node.options = NodeOptions::default();
        }
    }

    /// Deep-copy this tree into `dest`, which is cleared first.
    /// Only nodes reachable from the root are copied.
    ///
    /// # Errors
    /// * `StaleNode` - If a child or qualifier link of this tree is dangling
    pub fn copy_into(&self, dest: &mut PropertyTree) -> Result<()> {
        dest.erase();
        let src_root = self.node(self.root)?;
        let dest_root = dest.root;
        {
            let root = dest.node_mut(dest_root)?;
            root.name = src_root.name.clone();
            root.value = src_root.value.clone();
            root.options = src_root.options;
        }
        dest.copy_offspring(self, self.root, dest_root)
    }

    fn copy_offspring(&mut self, src: &PropertyTree, from: NodeId, to: NodeId) -> Result<()> {
        let node = src.node(from)?;
        for &qual in &node.qualifiers {
            let original = src.node(qual)?;
            let copy = Node::new(original.name.clone(), original.value.clone(), original.options);
            let id = self.append_qualifier(to, copy)?;
            self.copy_offspring(src, qual, id)?;
        }
        for &child in &node.children {
            let original = src.node(child)?;
            let copy = Node::new(original.name.clone(), original.value.clone(), original.options);
            let id = self.append_child(to, copy)?;
            self.copy_offspring(src, child, id)?;
        }
        Ok(())
    }

    /// Owned, arena-free rendition of the subtree at `id`
    ///
    /// # Errors
    /// * `StaleNode` - If `id` or any link below it is dangling
    pub fn snapshot(&self, id: NodeId) -> Result<NodeSnapshot> {
        NodeSnapshot::capture(self, id)
    }
}

fn stale(id: NodeId) -> XmpError {
    XmpError::StaleNode {
        handle: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ArrayForm;

    fn leaf(name: &str, value: &str) -> Node {
        Node::new(name, value, NodeOptions::simple())
    }

    #[test]
    fn test_new_tree_has_only_root() {
        let tree = PropertyTree::new();
        assert_eq!(tree.live_count(), 1);
        let root = tree.node(tree.root()).unwrap();
        assert!(root.name.is_empty());
        assert!(root.parent.is_none());
    }

    #[test]
    fn test_append_links_parent() {
        let mut tree = PropertyTree::new();
        let root = tree.root();
        let child = tree.append_child(root, leaf("dc:format", "x")).unwrap();
        assert_eq!(tree.node(child).unwrap().parent, Some(root));
        assert_eq!(tree.node(root).unwrap().children, vec![child]);
    }

    #[test]
    fn test_insert_child_clamps_index() {
        let mut tree = PropertyTree::new();
        let root = tree.root();
        let a = tree.append_child(root, leaf("a:a", "")).unwrap();
        let b = tree.insert_child(root, 99, leaf("a:b", "")).unwrap();
        let c = tree.insert_child(root, 0, leaf("a:c", "")).unwrap();
        assert_eq!(tree.node(root).unwrap().children, vec![c, a, b]);
    }

    #[test]
    fn test_remove_frees_subtree_and_stales_handles() {
        let mut tree = PropertyTree::new();
        let root = tree.root();
        let options = NodeOptions::array(ArrayForm::Unordered);
        let array = tree
            .append_child(root, Node::new("dc:subject", "", options))
            .unwrap();
        let item = tree.append_child(array, leaf("[]", "one")).unwrap();
        let qual = tree.append_qualifier(item, leaf("xmp:q", "v")).unwrap();
        assert_eq!(tree.live_count(), 4);

        tree.remove(array).unwrap();
        assert_eq!(tree.live_count(), 1);
        assert!(!tree.contains(array));
        assert!(!tree.contains(item));
        assert!(!tree.contains(qual));
        assert!(tree.node(root).unwrap().children.is_empty());
    }

    #[test]
    fn test_reused_slot_rejects_old_handle() {
        let mut tree = PropertyTree::new();
        let root = tree.root();
        let first = tree.append_child(root, leaf("a:a", "")).unwrap();
        tree.remove(first).unwrap();
        let second = tree.append_child(root, leaf("a:b", "")).unwrap();
        assert_eq!(first.index(), second.index());
        assert_ne!(first.generation(), second.generation());
        let err = tree.node(first).unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::BadParam);
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut tree = PropertyTree::new();
        let root = tree.root();
        assert!(tree.remove(root).is_err());
    }

    #[test]
    fn test_clear_node_resets_to_empty_simple() {
        let mut tree = PropertyTree::new();
        let root = tree.root();
        let s = tree
            .append_child(root, Node::new("xmp:S", "", NodeOptions::structure()))
            .unwrap();
        tree.append_child(s, leaf("xmp:f", "1")).unwrap();
        tree.append_qualifier(s, leaf("xmp:q", "2")).unwrap();

        tree.clear_node(s).unwrap();
        let node = tree.node(s).unwrap();
        assert_eq!(node.name, "xmp:S");
        assert!(node.options.is_simple());
        assert!(node.children.is_empty());
        assert!(node.qualifiers.is_empty());
        assert_eq!(node.parent, Some(root));
        assert_eq!(tree.live_count(), 2);
    }

    #[test]
    fn test_copy_into_is_deep() {
        let mut tree = PropertyTree::new();
        let root = tree.root();
        tree.node_mut(root).unwrap().name = "doc".to_string();
        let scratch = tree.append_child(root, leaf("a:tmp", "")).unwrap();
        let prop = tree.append_child(root, leaf("a:p", "v")).unwrap();
        tree.append_qualifier(prop, leaf("a:q", "w")).unwrap();
        tree.remove(scratch).unwrap();

        let mut dest = PropertyTree::new();
        dest.append_child(dest.root(), leaf("z:old", "")).unwrap();
        tree.copy_into(&mut dest).unwrap();

        assert_eq!(dest.live_count(), 3);
        assert_eq!(
            dest.snapshot(dest.root()).unwrap(),
            tree.snapshot(tree.root()).unwrap()
        );
    }
}
