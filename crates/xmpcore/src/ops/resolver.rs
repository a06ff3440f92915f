//! Node-level lookup and creation
//!
//! The primitives here keep the tree invariants intact on every call:
//! array children are always `[]` items, struct and schema children never
//! are, `xml:lang` is always the first qualifier and `rdf:type` directly
//! follows it, and the `hasLang` / `hasType` / `hasQualifiers` markers
//! track the qualifier list. [`find_node`] walks an [`ExpandedPath`] on top
//! of them.

use xmpcore_types::names::{ARRAY_ITEM_NAME, RDF_TYPE, XML_LANG, X_DEFAULT};

use crate::errors::{Result, XmpError};
use crate::model::{Node, NodeId, PropertyTree};
use crate::options::{Form, Markers, NodeKind, NodeOptions};
use crate::path::{ExpandedPath, PathStep, Step};
use crate::registry::{NamespaceRegistry, Registries};

/// First child of `parent` named exactly `name`
///
/// # Errors
/// * `StaleNode` - If `parent` is not live
pub fn find_child(tree: &PropertyTree, parent: NodeId, name: &str) -> Result<Option<NodeId>> {
    let node = tree.node(parent)?;
    Ok(find_named(tree, &node.children, name))
}

/// Qualifier of `parent` named exactly `name`
///
/// # Errors
/// * `StaleNode` - If `parent` is not live
pub fn find_qualifier(tree: &PropertyTree, parent: NodeId, name: &str) -> Result<Option<NodeId>> {
    let node = tree.node(parent)?;
    Ok(find_named(tree, &node.qualifiers, name))
}

fn find_named(tree: &PropertyTree, ids: &[NodeId], name: &str) -> Option<NodeId> {
    ids.iter()
        .copied()
        .find(|&id| tree.get(id).is_some_and(|n| n.name == name))
}

/// Schema node for `uri`
///
/// # Errors
/// * `StaleNode` - If the root is corrupt
pub fn find_schema(tree: &PropertyTree, uri: &str) -> Result<Option<NodeId>> {
    find_child(tree, tree.root(), uri)
}

/// Create the schema node for `uri` under the root, with the registered
/// prefix as its value.
///
/// # Errors
/// * `UnregisteredSchema` - If `uri` has no registered prefix
/// * `DuplicateChild` - If the schema node already exists
pub fn create_schema(
    tree: &mut PropertyTree,
    namespaces: &NamespaceRegistry,
    uri: &str,
) -> Result<NodeId> {
    let prefix = namespaces
        .lookup_prefix(uri)
        .ok_or_else(|| XmpError::UnregisteredSchema {
            namespace_uri: uri.to_string(),
        })?;
    if find_schema(tree, uri)?.is_some() {
        return Err(XmpError::DuplicateChild {
            name: uri.to_string(),
        });
    }
    let root = tree.root();
    tree.append_child(root, Node::new(uri, prefix, NodeOptions::schema()))
}

/// Append a new child named `name` to `parent`.
///
/// Array parents take only `[]` items; schema and struct parents take only
/// uniquely named fields. Derived qualifier markers in `options` are
/// dropped since the new node has no qualifiers.
///
/// # Errors
/// * `InvalidOptions` - If `options` is not a plain property
/// * `MissingArgument` - If `name` is empty
/// * `NamedChildOfArray` - If `parent` is an array and `name` is not `[]`
/// * `PlaceholderNotAllowed` - If `name` is `[]` and `parent` is not an array
/// * `IndexOnNonArray` / `NamedChildNotAllowed` - If `parent` is simple
/// * `DuplicateChild` - If a field of that name exists
pub fn create_child(
    tree: &mut PropertyTree,
    parent: NodeId,
    name: &str,
    options: NodeOptions,
) -> Result<NodeId> {
    create_child_at(tree, parent, usize::MAX, name, options)
}

fn create_child_at(
    tree: &mut PropertyTree,
    parent: NodeId,
    index: usize,
    name: &str,
    mut options: NodeOptions,
) -> Result<NodeId> {
    if options.kind != NodeKind::Property {
        return Err(XmpError::InvalidOptions {
            bits: options.bits(),
            reason: "children must be plain properties".to_string(),
        });
    }
    if name.is_empty() {
        return Err(XmpError::MissingArgument {
            name: "child name".to_string(),
        });
    }

    let is_root = parent == tree.root();
    let parent_node = tree.node(parent)?;
    let is_item = name == ARRAY_ITEM_NAME;
    let holds_fields = parent_node.options.is_struct() || parent_node.options.is_schema();

    if parent_node.options.is_array() {
        if !is_item {
            return Err(XmpError::NamedChildOfArray {
                name: name.to_string(),
            });
        }
    } else if is_root || !holds_fields {
        return Err(if is_item {
            XmpError::IndexOnNonArray {
                name: parent_node.name.clone(),
            }
        } else {
            XmpError::NamedChildNotAllowed {
                name: name.to_string(),
            }
        });
    } else if is_item {
        return Err(XmpError::PlaceholderNotAllowed {
            context: parent_node.name.clone(),
        });
    } else if find_named(tree, &parent_node.children, name).is_some() {
        return Err(XmpError::DuplicateChild {
            name: name.to_string(),
        });
    }

    options
        .markers
        .remove(Markers::HAS_LANG | Markers::HAS_TYPE | Markers::HAS_QUALIFIERS);
    tree.insert_child(parent, index, Node::new(name, "", options))
}

/// Attach a qualifier to `parent`.
///
/// `xml:lang` goes first and sets `hasLang`; `rdf:type` goes directly after
/// any language qualifier and sets `hasType`; anything else is appended.
/// `hasQualifiers` is always set.
///
/// # Errors
/// * `QualifierNotAllowed` - If `parent` is the root, a schema or a qualifier
/// * `MissingArgument` - If `name` is empty
/// * `PlaceholderNotAllowed` - If `name` is `[]`
/// * `DuplicateChild` - If a qualifier of that name exists
pub fn create_qualifier(
    tree: &mut PropertyTree,
    parent: NodeId,
    name: &str,
    value: &str,
) -> Result<NodeId> {
    let is_root = parent == tree.root();
    let parent_node = tree.node(parent)?;
    if is_root || parent_node.options.is_schema() || parent_node.options.is_qualifier() {
        return Err(XmpError::QualifierNotAllowed {
            name: parent_node.name.clone(),
        });
    }
    if name.is_empty() {
        return Err(XmpError::MissingArgument {
            name: "qualifier name".to_string(),
        });
    }
    if name == ARRAY_ITEM_NAME {
        return Err(XmpError::PlaceholderNotAllowed {
            context: format!("qualifier of {}", parent_node.name),
        });
    }
    if find_named(tree, &parent_node.qualifiers, name).is_some() {
        return Err(XmpError::DuplicateChild {
            name: name.to_string(),
        });
    }

    let (index, marker) = match name {
        XML_LANG => (0, Markers::HAS_LANG),
        RDF_TYPE => (usize::from(parent_node.options.has_lang()), Markers::HAS_TYPE),
        _ => (usize::MAX, Markers::empty()),
    };
    let qualifier = Node::new(name, value, NodeOptions::qualifier());
    let id = tree.insert_qualifier(parent, index, qualifier)?;
    tree.node_mut(parent)?.options.markers |= Markers::HAS_QUALIFIERS | marker;
    Ok(id)
}

/// Set the value of a simple node
///
/// # Errors
/// * `ValueNotAllowed` - If the node is the root, a schema or composite
pub fn set_value(tree: &mut PropertyTree, id: NodeId, value: impl Into<String>) -> Result<()> {
    let is_root = id == tree.root();
    let node = tree.node_mut(id)?;
    if is_root || node.options.is_schema() || node.options.is_composite() {
        return Err(XmpError::ValueNotAllowed {
            name: node.name.clone(),
        });
    }
    node.value = value.into();
    Ok(())
}

/// Remove a node and its subtree.
///
/// Removing a qualifier clears the matching marker on its parent. A schema
/// left without properties is removed as well.
///
/// # Errors
/// * `StaleNode` - If `id` is not live
/// * `Internal` - If `id` is the root
pub fn remove_node(tree: &mut PropertyTree, id: NodeId) -> Result<()> {
    detach(tree, id, true)
}

fn detach(tree: &mut PropertyTree, id: NodeId, drop_empty_schema: bool) -> Result<()> {
    let node = tree.node(id)?;
    let parent = node.parent;
    let is_qualifier = node.options.is_qualifier();
    let marker = match node.name.as_str() {
        XML_LANG => Markers::HAS_LANG,
        RDF_TYPE => Markers::HAS_TYPE,
        _ => Markers::empty(),
    };
    tree.remove(id)?;

    let Some(parent) = parent else {
        return Ok(());
    };
    let parent_node = tree.node_mut(parent)?;
    if is_qualifier {
        parent_node.options.markers.remove(marker);
        if parent_node.qualifiers.is_empty() {
            parent_node.options.markers.remove(Markers::HAS_QUALIFIERS);
        }
    } else if drop_empty_schema
        && parent_node.options.is_schema()
        && parent_node.children.is_empty()
    {
        tree.remove(parent)?;
    }
    Ok(())
}

/// Item of the array `array` whose `xml:lang` qualifier equals `lang`
///
/// # Errors
/// * `NotAnArray` - If `array` is not an array
pub fn lookup_lang_item(tree: &PropertyTree, array: NodeId, lang: &str) -> Result<Option<NodeId>> {
    let node = tree.node(array)?;
    if !node.options.is_array() {
        return Err(XmpError::NotAnArray {
            name: node.name.clone(),
        });
    }
    for &item in &node.children {
        if let Some(&first) = tree.node(item)?.qualifiers.first() {
            let qual = tree.node(first)?;
            if qual.name == XML_LANG && qual.value == lang {
                return Ok(Some(item));
            }
        }
    }
    Ok(None)
}

fn lookup_qual_selector(
    tree: &PropertyTree,
    array: NodeId,
    name: &str,
    value: &str,
) -> Result<Option<NodeId>> {
    for &item in &tree.node(array)?.children {
        if let Some(qual) = find_qualifier(tree, item, name)? {
            if tree.node(qual)?.value == value {
                return Ok(Some(item));
            }
        }
    }
    Ok(None)
}

fn lookup_field_selector(
    tree: &PropertyTree,
    array: NodeId,
    name: &str,
    value: &str,
) -> Result<Option<NodeId>> {
    let array_node = tree.node(array)?;
    for &item in &array_node.children {
        let item_node = tree.node(item)?;
        if !item_node.options.is_struct() {
            return Err(XmpError::FieldSelectorOnNonStruct {
                name: array_node.name.clone(),
            });
        }
        if let Some(field) = find_named(tree, &item_node.children, name) {
            if tree.node(field)?.value == value {
                return Ok(Some(item));
            }
        }
    }
    Ok(None)
}

/// Walk `path` from the root and return the node it addresses.
///
/// A root step marked as an alias is redirected to the alias target,
/// including its synthetic item step. With `create` set, missing nodes are
/// created along the way: array forms carried on steps are applied to the
/// nodes created for them, a new simple node followed by a field step
/// becomes a struct, an index of `count + 1` appends an item, and an alias
/// to the `x-default` item of an alt-text array creates that item at the
/// front. `leaf_form` is applied to the final node if it was created.
///
/// If a step fails, or the node is not found after something was created,
/// every node created by this call is removed again.
///
/// # Errors
/// * `EmptyPath` - If `path` has no steps
/// * `UnexpectedStep` - If a step kind is out of place
/// * `UnregisteredSchema` - If a schema must be created for an unknown URI
/// * `NamedChildNotAllowed` / `NamedChildOfArray` / `IndexOnNonArray` /
///   `BadArrayIndex` / `FieldSelectorOnNonStruct` - If a step does not fit
///   the node it is applied to
pub fn find_node(
    tree: &mut PropertyTree,
    registries: &Registries,
    path: &ExpandedPath,
    create: bool,
    leaf_form: Option<Form>,
) -> Result<Option<NodeId>> {
    let mut walker = Walker {
        tree: TreeRef::Exclusive(tree),
        registries,
        create,
        topmost_created: None,
        current_is_new: false,
    };
    let outcome = walker.walk(path, leaf_form);
    if let (Ok(None) | Err(_), Some(created)) = (&outcome, walker.topmost_created) {
        tracing::debug!(path = %path, "rolling back nodes created by failed lookup");
        // Only what this call created goes; a schema that was already there
        // stays even if it is left empty.
        detach(walker.tree.get_mut()?, created, false)?;
    }
    outcome
}

/// Read-only form of [`find_node`]: never creates anything
///
/// # Errors
/// As for [`find_node`], less the creation failures
pub fn lookup_node(
    tree: &PropertyTree,
    registries: &Registries,
    path: &ExpandedPath,
) -> Result<Option<NodeId>> {
    let mut walker = Walker {
        tree: TreeRef::Shared(tree),
        registries,
        create: false,
        topmost_created: None,
        current_is_new: false,
    };
    walker.walk(path, None)
}

enum TreeRef<'a> {
    Shared(&'a PropertyTree),
    Exclusive(&'a mut PropertyTree),
}

impl TreeRef<'_> {
    fn get(&self) -> &PropertyTree {
        match self {
            TreeRef::Shared(tree) => *tree,
            TreeRef::Exclusive(tree) => &**tree,
        }
    }

    fn get_mut(&mut self) -> Result<&mut PropertyTree> {
        match self {
            TreeRef::Exclusive(tree) => Ok(&mut **tree),
            TreeRef::Shared(_) => Err(XmpError::Internal {
                message: "read-only lookup cannot modify the tree".to_string(),
            }),
        }
    }
}

struct Walker<'a> {
    tree: TreeRef<'a>,
    registries: &'a Registries,
    create: bool,
    topmost_created: Option<NodeId>,
    current_is_new: bool,
}

impl Walker<'_> {
    fn walk(&mut self, path: &ExpandedPath, leaf_form: Option<Form>) -> Result<Option<NodeId>> {
        let steps = path.steps();
        let first = steps.first().ok_or(XmpError::EmptyPath)?;
        let registries = self.registries;

        let (mut current, rest_from) = match steps.get(1) {
            Some(root) if root.is_alias => {
                let Step::RootProperty(alias_name) = &root.step else {
                    return Err(unexpected(&root.step, 1));
                };
                let target = registries.aliases.resolve(alias_name).ok_or_else(|| {
                    XmpError::Internal {
                        message: format!("{} is marked as an alias but not registered", alias_name),
                    }
                })?;
                let Some(mut current) = self.schema(target)? else {
                    return Ok(None);
                };
                for (position, step) in target.steps().iter().enumerate().skip(1) {
                    match self.follow(current, step, position, true)? {
                        Some(next) => current = next,
                        None => return Ok(None),
                    }
                }
                (current, 2)
            }
            _ => {
                let Some(current) = self.schema_step(first)? else {
                    return Ok(None);
                };
                (current, 1)
            }
        };

        for (position, step) in steps.iter().enumerate().skip(rest_from) {
            match self.follow(current, step, position, false)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }

        if self.current_is_new {
            if let Some(form) = leaf_form {
                self.tree.get_mut()?.node_mut(current)?.options.form = form;
            }
        }
        Ok(Some(current))
    }

    fn note_created(&mut self, id: NodeId) {
        if self.topmost_created.is_none() {
            self.topmost_created = Some(id);
        }
        self.current_is_new = true;
    }

    fn schema(&mut self, target: &ExpandedPath) -> Result<Option<NodeId>> {
        match target.steps().first() {
            Some(step) => self.schema_step(step),
            None => Err(XmpError::EmptyPath),
        }
    }

    fn schema_step(&mut self, step: &PathStep) -> Result<Option<NodeId>> {
        let Step::Schema(uri) = &step.step else {
            return Err(unexpected(&step.step, 0));
        };
        if let Some(schema) = find_schema(self.tree.get(), uri)? {
            return Ok(Some(schema));
        }
        if !self.create {
            return Ok(None);
        }
        let schema = create_schema(self.tree.get_mut()?, &self.registries.namespaces, uri)?;
        self.note_created(schema);
        Ok(Some(schema))
    }

    fn follow(
        &mut self,
        parent: NodeId,
        step: &PathStep,
        position: usize,
        via_alias: bool,
    ) -> Result<Option<NodeId>> {
        let parent_is_new = self.current_is_new;
        self.current_is_new = false;

        match &step.step {
            Step::RootProperty(name) if position == 1 => {
                self.named_child(parent, name, parent_is_new, step)
            }
            Step::StructField(name) if position > 1 => {
                self.named_child(parent, name, parent_is_new, step)
            }
            Step::Qualifier(name) if position > 1 => self.qualifier(parent, name),
            Step::ArrayIndex(_)
            | Step::ArrayLast
            | Step::QualSelector { .. }
            | Step::FieldSelector { .. }
                if position > 1 =>
            {
                self.array_item(parent, step, via_alias)
            }
            other => Err(unexpected(other, position)),
        }
    }

    fn named_child(
        &mut self,
        parent: NodeId,
        name: &str,
        parent_is_new: bool,
        step: &PathStep,
    ) -> Result<Option<NodeId>> {
        let options = self.tree.get().node(parent)?.options;
        if !(options.is_schema() || options.is_struct()) {
            if !parent_is_new {
                return Err(XmpError::NamedChildNotAllowed {
                    name: name.to_string(),
                });
            }
            if options.is_array() {
                return Err(XmpError::NamedChildOfArray {
                    name: name.to_string(),
                });
            }
            // A simple node created by this walk becomes the struct
            // holding the field.
            self.tree.get_mut()?.node_mut(parent)?.options.form = Form::Struct;
        }

        if let Some(child) = find_child(self.tree.get(), parent, name)? {
            return Ok(Some(child));
        }
        if !self.create {
            return Ok(None);
        }
        let child = create_child(self.tree.get_mut()?, parent, name, step_options(step))?;
        self.note_created(child);
        Ok(Some(child))
    }

    fn qualifier(&mut self, parent: NodeId, name: &str) -> Result<Option<NodeId>> {
        if let Some(qual) = find_qualifier(self.tree.get(), parent, name)? {
            return Ok(Some(qual));
        }
        if !self.create {
            return Ok(None);
        }
        let qual = create_qualifier(self.tree.get_mut()?, parent, name, "")?;
        self.note_created(qual);
        Ok(Some(qual))
    }

    fn array_item(
        &mut self,
        array: NodeId,
        step: &PathStep,
        via_alias: bool,
    ) -> Result<Option<NodeId>> {
        let array_node = self.tree.get().node(array)?;
        if !array_node.options.is_array() {
            return Err(XmpError::IndexOnNonArray {
                name: array_node.name.clone(),
            });
        }
        let count = array_node.children.len();

        match &step.step {
            Step::ArrayIndex(index) => {
                if *index == 0 {
                    return Err(XmpError::BadArrayIndex {
                        step: step.step.to_string(),
                    });
                }
                if *index <= count {
                    return Ok(Some(array_node.children[index - 1]));
                }
                if *index == count + 1 && self.create {
                    let tree = self.tree.get_mut()?;
                    let item = create_child(tree, array, ARRAY_ITEM_NAME, step_options(step))?;
                    self.note_created(item);
                    return Ok(Some(item));
                }
                Ok(None)
            }
            Step::ArrayLast => Ok(array_node.children.last().copied()),
            Step::QualSelector { name, value } => {
                let found = if name == XML_LANG {
                    lookup_lang_item(self.tree.get(), array, value)?
                } else {
                    lookup_qual_selector(self.tree.get(), array, name, value)?
                };
                let default_item = name == XML_LANG && value == X_DEFAULT;
                if found.is_some() || !(self.create && via_alias && default_item) {
                    return Ok(found);
                }
                let tree = self.tree.get_mut()?;
                let item = create_child_at(tree, array, 0, ARRAY_ITEM_NAME, step_options(step))?;
                self.note_created(item);
                create_qualifier(self.tree.get_mut()?, item, XML_LANG, X_DEFAULT)?;
                Ok(Some(item))
            }
            Step::FieldSelector { name, value } => {
                lookup_field_selector(self.tree.get(), array, name, value)
            }
            other => Err(unexpected(other, 0)),
        }
    }
}

fn step_options(step: &PathStep) -> NodeOptions {
    match step.array_form {
        Some(form) => NodeOptions::array(form),
        None => NodeOptions::simple(),
    }
}

fn unexpected(step: &Step, position: usize) -> XmpError {
    XmpError::UnexpectedStep {
        kind: step.kind_name().to_string(),
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ArrayForm;
    use xmpcore_types::ns;

    fn setup() -> (PropertyTree, Registries) {
        (PropertyTree::new(), Registries::with_standard().unwrap())
    }

    #[test]
    fn test_create_schema_uses_registered_prefix() {
        let (mut tree, reg) = setup();
        let schema = create_schema(&mut tree, &reg.namespaces, ns::DC).unwrap();
        let node = tree.node(schema).unwrap();
        assert_eq!(node.name, ns::DC);
        assert_eq!(node.value, "dc:");
        assert!(node.options.is_schema());
    }

    #[test]
    fn test_create_schema_unregistered() {
        let (mut tree, reg) = setup();
        let err = create_schema(&mut tree, &reg.namespaces, "http://nowhere/").unwrap_err();
        assert!(matches!(err, XmpError::UnregisteredSchema { .. }));
    }

    #[test]
    fn test_array_children_must_be_items() {
        let (mut tree, reg) = setup();
        let schema = create_schema(&mut tree, &reg.namespaces, ns::DC).unwrap();
        let options = NodeOptions::array(ArrayForm::Unordered);
        let bag = create_child(&mut tree, schema, "dc:subject", options).unwrap();
        let err = create_child(&mut tree, bag, "dc:x", NodeOptions::simple()).unwrap_err();
        assert!(matches!(err, XmpError::NamedChildOfArray { .. }));
        create_child(&mut tree, bag, ARRAY_ITEM_NAME, NodeOptions::simple()).unwrap();
    }

    #[test]
    fn test_struct_children_reject_placeholder() {
        let (mut tree, reg) = setup();
        let schema = create_schema(&mut tree, &reg.namespaces, ns::XMP).unwrap();
        let err =
            create_child(&mut tree, schema, ARRAY_ITEM_NAME, NodeOptions::simple()).unwrap_err();
        assert!(matches!(err, XmpError::PlaceholderNotAllowed { .. }));
    }

    #[test]
    fn test_lang_qualifier_goes_first() {
        let (mut tree, reg) = setup();
        let schema = create_schema(&mut tree, &reg.namespaces, ns::XMP).unwrap();
        let prop = create_child(&mut tree, schema, "xmp:Label", NodeOptions::simple()).unwrap();
        create_qualifier(&mut tree, prop, "xmp:note", "n").unwrap();
        create_qualifier(&mut tree, prop, RDF_TYPE, "t").unwrap();
        create_qualifier(&mut tree, prop, XML_LANG, "en").unwrap();

        let node = tree.node(prop).unwrap();
        let names: Vec<&str> = node
            .qualifiers
            .iter()
            .map(|&q| tree.node(q).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec![XML_LANG, RDF_TYPE, "xmp:note"]);
        assert!(node.options.has_lang());
        assert!(node.options.has_type());
        assert!(node.options.has_qualifiers());
    }

    #[test]
    fn test_remove_qualifier_clears_markers() {
        let (mut tree, reg) = setup();
        let schema = create_schema(&mut tree, &reg.namespaces, ns::XMP).unwrap();
        let prop = create_child(&mut tree, schema, "xmp:Label", NodeOptions::simple()).unwrap();
        let lang = create_qualifier(&mut tree, prop, XML_LANG, "en").unwrap();

        remove_node(&mut tree, lang).unwrap();
        let options = tree.node(prop).unwrap().options;
        assert!(!options.has_lang());
        assert!(!options.has_qualifiers());
    }

    #[test]
    fn test_removing_last_property_drops_schema() {
        let (mut tree, reg) = setup();
        let schema = create_schema(&mut tree, &reg.namespaces, ns::XMP).unwrap();
        let prop = create_child(&mut tree, schema, "xmp:Label", NodeOptions::simple()).unwrap();
        remove_node(&mut tree, prop).unwrap();
        assert!(!tree.contains(schema));
        assert_eq!(tree.live_count(), 1);
    }

    #[test]
    fn test_set_value_rejects_composites() {
        let (mut tree, reg) = setup();
        let schema = create_schema(&mut tree, &reg.namespaces, ns::XMP).unwrap();
        let s = create_child(&mut tree, schema, "xmp:S", NodeOptions::structure()).unwrap();
        let err = set_value(&mut tree, s, "v").unwrap_err();
        assert_eq!(err.kind(), crate::errors::ErrorKind::BadValue);
        assert!(set_value(&mut tree, schema, "p:").is_err());
    }
}
