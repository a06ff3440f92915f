use xmpcore_types::names::PREFIX_SEPARATOR;

use crate::errors::Result;
use crate::model::{NodeId, PropertyTree};
use crate::registry::NamespaceRegistry;

/// Namespace URI and local part of a node name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualifiedName {
    pub namespace_uri: String,
    pub local_name: String,
}

/// Namespace URI of a node.
///
/// A schema node's name is its URI. Other nodes resolve the prefix before
/// the first `:` through `namespaces`; array items (`[]`) and names with an
/// unregistered prefix yield an empty URI.
///
/// # Errors
/// * `StaleNode` - If `id` is not live
pub fn derive_uri(
    tree: &PropertyTree,
    namespaces: &NamespaceRegistry,
    id: NodeId,
) -> Result<String> {
    Ok(derive_qualified_name(tree, namespaces, id)?.namespace_uri)
}

/// Namespace URI and local name of a node.
///
/// For schema nodes the local name is the registered prefix.
///
/// # Errors
/// * `StaleNode` - If `id` is not live
pub fn derive_qualified_name(
    tree: &PropertyTree,
    namespaces: &NamespaceRegistry,
    id: NodeId,
) -> Result<QualifiedName> {
    let node = tree.node(id)?;
    if node.name.is_empty() {
        return Ok(QualifiedName::default());
    }
    if node.options.is_schema() {
        return Ok(QualifiedName {
            namespace_uri: node.name.clone(),
            local_name: node.value.clone(),
        });
    }
    let Some((prefix, local)) = node.name.split_once(PREFIX_SEPARATOR) else {
        return Ok(QualifiedName::default());
    };
    Ok(QualifiedName {
        namespace_uri: namespaces.lookup_uri(prefix).unwrap_or_default().to_string(),
        local_name: local.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use crate::options::{ArrayForm, NodeOptions};
    use xmpcore_types::ns;

    #[test]
    fn test_schema_and_property_names() {
        let mut namespaces = NamespaceRegistry::new();
        namespaces.define(ns::DC, "dc").unwrap();
        let mut tree = PropertyTree::new();
        let schema = tree
            .append_child(tree.root(), Node::new(ns::DC, "dc:", NodeOptions::schema()))
            .unwrap();
        let bag = tree
            .append_child(
                schema,
                Node::new("dc:subject", "", NodeOptions::array(ArrayForm::Unordered)),
            )
            .unwrap();
        let item = tree
            .append_child(bag, Node::new("[]", "k", NodeOptions::simple()))
            .unwrap();

        assert_eq!(derive_uri(&tree, &namespaces, schema).unwrap(), ns::DC);
        assert_eq!(
            derive_qualified_name(&tree, &namespaces, schema).unwrap().local_name,
            "dc:"
        );
        let name = derive_qualified_name(&tree, &namespaces, bag).unwrap();
        assert_eq!(name.namespace_uri, ns::DC);
        assert_eq!(name.local_name, "subject");
        assert_eq!(derive_uri(&tree, &namespaces, item).unwrap(), "");
    }
}
