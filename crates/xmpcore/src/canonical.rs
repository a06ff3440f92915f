//! Canonical ordering of a property tree
//!
//! Sorting never changes content, only sibling order:
//! - schemas (root children) sort by prefix
//! - qualifiers, struct fields and schema properties sort by name, with
//!   `xml:lang` first and `rdf:type` second
//! - unordered array items sort by value; simple items precede structs,
//!   which precede arrays
//! - alt-text items sort by language, `x-default` first and untagged last
//! - ordered and alternate arrays keep their order
//!
//! All sorts are stable, so equal keys keep their prior relative order.

use std::mem;

use xmpcore_types::names::{RDF_TYPE, XML_LANG, X_DEFAULT};

use crate::errors::Result;
use crate::model::{NodeId, PropertyTree};
use crate::options::{ArrayForm, Form};

/// Sort the whole tree into canonical order
///
/// # Errors
/// * `StaleNode` - If a child or qualifier link is dangling
pub fn sort_tree(tree: &mut PropertyTree) -> Result<()> {
    let root = tree.root();
    let mut schemas = mem::take(&mut tree.node_mut(root)?.children);
    schemas.sort_by_cached_key(|&id| tree.get(id).map(|n| n.value.clone()).unwrap_or_default());
    tree.node_mut(root)?.children = schemas.clone();

    for schema in schemas {
        sort_offspring(tree, schema)?;
    }
    tracing::debug!(node_count = tree.live_count(), "tree sorted");
    Ok(())
}

/// Sort the qualifiers and children of `id`, then recurse into both
///
/// # Errors
/// * `StaleNode` - If a child or qualifier link is dangling
pub fn sort_offspring(tree: &mut PropertyTree, id: NodeId) -> Result<()> {
    let mut qualifiers = mem::take(&mut tree.node_mut(id)?.qualifiers);
    qualifiers.sort_by_cached_key(|&q| name_key(tree, q));
    tree.node_mut(id)?.qualifiers = qualifiers.clone();
    for qual in qualifiers {
        sort_offspring(tree, qual)?;
    }

    let node = tree.node(id)?;
    let form = node.options.form;
    let keep_order = matches!(
        form,
        Form::Simple | Form::Array(ArrayForm::Ordered) | Form::Array(ArrayForm::Alternate)
    ) && !node.options.is_schema();

    let mut children = mem::take(&mut tree.node_mut(id)?.children);
    if !keep_order {
        match form {
            Form::Array(ArrayForm::Unordered) => {
                children.sort_by_cached_key(|&c| unordered_item_key(tree, c))
            }
            Form::Array(ArrayForm::AltText) => {
                children.sort_by_cached_key(|&c| alt_text_key(tree, c))
            }
            _ => children.sort_by_cached_key(|&c| name_key(tree, c)),
        }
    }
    tree.node_mut(id)?.children = children.clone();
    for child in children {
        sort_offspring(tree, child)?;
    }
    Ok(())
}

/// `xml:lang` < `rdf:type` < everything else by name
fn name_key(tree: &PropertyTree, id: NodeId) -> (u8, String) {
    match tree.get(id).map(|n| n.name.as_str()) {
        Some(XML_LANG) => (0, String::new()),
        Some(RDF_TYPE) => (1, String::new()),
        Some(name) => (2, name.to_string()),
        None => (3, String::new()),
    }
}

fn unordered_item_key(tree: &PropertyTree, id: NodeId) -> (u8, String) {
    match tree.get(id) {
        Some(node) if node.options.is_simple() => (0, node.value.clone()),
        Some(node) => (node.options.form.rank(), String::new()),
        None => (u8::MAX, String::new()),
    }
}

/// `x-default` first, then by language, then items with no language
fn alt_text_key(tree: &PropertyTree, id: NodeId) -> (u8, String) {
    let lang = tree
        .get(id)
        .and_then(|item| item.qualifiers.first())
        .and_then(|&q| tree.get(q))
        .filter(|q| q.name == XML_LANG)
        .map(|q| q.value.as_str());
    match lang {
        Some(X_DEFAULT) => (0, String::new()),
        Some(lang) => (1, lang.to_string()),
        None => (2, String::new()),
    }
}
