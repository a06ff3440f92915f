//! Structural checks over a property tree
//!
//! Checks are split into those about a node on its own and those about the
//! link between a node and its parent, so that the object dump can print
//! each marker next to the line it concerns.

use std::fmt;

use xmpcore_types::names::{ARRAY_ITEM_NAME, XML_LANG};

use crate::model::{Node, NodeId, PropertyTree};

/// One structural anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Anomaly {
    /// The root carries a value
    RootValue,
    /// The root carries qualifiers
    RootQualifiers,
    /// A root child is not a schema node
    SchemaOptions,
    /// A schema node carries qualifiers
    SchemaQualifiers,
    /// `hasLang` is set but the first qualifier is not `xml:lang`
    LangFlag,
    /// A simple node has children
    Children,
    /// A struct or array node has a value
    CompositeValue,
    /// A child or qualifier does not point back at its owner
    ParentLink,
    /// A qualifier is named `[]`
    QualifierName,
    /// A qualifier without the qualifier kind, or a child with it
    QualifierFlag,
    /// `xml:lang` is not the first qualifier, or `hasLang` is missing
    LangQualifier,
    /// An array child not named `[]`
    ItemName,
    /// A struct or schema child named `[]`
    FieldName,
    /// A child or qualifier handle that is not live
    DanglingLink,
}

impl Anomaly {
    pub fn describe(&self) -> &'static str {
        match self {
            Anomaly::RootValue => "bad root value",
            Anomaly::RootQualifiers => "bad root qualifiers",
            Anomaly::SchemaOptions => "bad schema options",
            Anomaly::SchemaQualifiers => "bad schema qualifiers",
            Anomaly::LangFlag => "bad lang flag",
            Anomaly::Children => "bad children",
            Anomaly::CompositeValue => "bad composite value",
            Anomaly::ParentLink => "bad parent link",
            Anomaly::QualifierName => "bad qual name",
            Anomaly::QualifierFlag => "bad qual flag",
            Anomaly::LangQualifier => "bad lang qual",
            Anomaly::ItemName => "bad item name",
            Anomaly::FieldName => "bad field name",
            Anomaly::DanglingLink => "dangling link",
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "** {} **", self.describe())
    }
}

/// An anomaly and where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Readable location, e.g. `dc:subject[2]/?xml:lang`
    pub location: String,
    pub node: NodeId,
    pub anomaly: Anomaly,
}

/// Anomalies of a node on its own
pub fn node_anomalies(tree: &PropertyTree, node: &Node) -> Vec<Anomaly> {
    let mut found = Vec::new();
    if node.options.has_lang() {
        let first_is_lang = node
            .qualifiers
            .first()
            .and_then(|&q| tree.get(q))
            .is_some_and(|q| q.name == XML_LANG);
        if !first_is_lang {
            found.push(Anomaly::LangFlag);
        }
    }
    if node.options.is_composite() {
        if !node.value.is_empty() {
            found.push(Anomaly::CompositeValue);
        }
    } else if !node.children.is_empty() && !node.options.is_schema() {
        found.push(Anomaly::Children);
    }
    found
}

/// Anomalies of the link from `owner` to its qualifier at `position`
pub fn qualifier_link_anomalies(
    owner_id: NodeId,
    owner: &Node,
    qual: &Node,
    position: usize,
) -> Vec<Anomaly> {
    let mut found = Vec::new();
    if qual.parent != Some(owner_id) {
        found.push(Anomaly::ParentLink);
    }
    if qual.name == ARRAY_ITEM_NAME {
        found.push(Anomaly::QualifierName);
    }
    if !qual.options.is_qualifier() {
        found.push(Anomaly::QualifierFlag);
    }
    if qual.name == XML_LANG && (position != 0 || !owner.options.has_lang()) {
        found.push(Anomaly::LangQualifier);
    }
    found
}

/// Anomalies of the link from `owner` to one of its children
pub fn child_link_anomalies(owner_id: NodeId, owner: &Node, child: &Node) -> Vec<Anomaly> {
    let mut found = Vec::new();
    if child.parent != Some(owner_id) {
        found.push(Anomaly::ParentLink);
    }
    if child.options.is_qualifier() {
        found.push(Anomaly::QualifierFlag);
    }
    if owner.options.is_array() {
        if child.name != ARRAY_ITEM_NAME {
            found.push(Anomaly::ItemName);
        }
    } else if child.name == ARRAY_ITEM_NAME {
        found.push(Anomaly::FieldName);
    }
    found
}

/// Walk the whole tree and collect every anomaly
pub fn find_anomalies(tree: &PropertyTree) -> Vec<Finding> {
    let mut findings = Vec::new();
    let root_id = tree.root();
    let Some(root) = tree.get(root_id) else {
        return findings;
    };

    let mut report = |location: &str, node: NodeId, anomaly: Anomaly| {
        findings.push(Finding {
            location: location.to_string(),
            node,
            anomaly,
        })
    };

    if !root.value.is_empty() {
        report("(root)", root_id, Anomaly::RootValue);
    }
    if !root.qualifiers.is_empty() {
        report("(root)", root_id, Anomaly::RootQualifiers);
    }

    for &schema_id in &root.children {
        let Some(schema) = tree.get(schema_id) else {
            report("(root)", schema_id, Anomaly::DanglingLink);
            continue;
        };
        let location = schema.value.clone();
        if !schema.options.is_schema() {
            report(&location, schema_id, Anomaly::SchemaOptions);
        }
        if schema.parent != Some(root_id) {
            report(&location, schema_id, Anomaly::ParentLink);
        }
        if !schema.qualifiers.is_empty() {
            report(&location, schema_id, Anomaly::SchemaQualifiers);
        }
        walk_offspring(tree, schema_id, schema, &location, &mut report);
    }

    findings
}

fn walk_offspring(
    tree: &PropertyTree,
    owner_id: NodeId,
    owner: &Node,
    owner_location: &str,
    report: &mut dyn FnMut(&str, NodeId, Anomaly),
) {
    for (position, &qual_id) in owner.qualifiers.iter().enumerate() {
        let Some(qual) = tree.get(qual_id) else {
            report(owner_location, qual_id, Anomaly::DanglingLink);
            continue;
        };
        let location = join_location(owner_location, &format!("?{}", qual.name));
        for anomaly in qualifier_link_anomalies(owner_id, owner, qual, position) {
            report(&location, qual_id, anomaly);
        }
        check_node(tree, qual_id, qual, &location, report);
    }

    for (position, &child_id) in owner.children.iter().enumerate() {
        let Some(child) = tree.get(child_id) else {
            report(owner_location, child_id, Anomaly::DanglingLink);
            continue;
        };
        let location = if owner.options.is_array() {
            format!("{}[{}]", owner_location, position + 1)
        } else {
            join_location(owner_location, &child.name)
        };
        for anomaly in child_link_anomalies(owner_id, owner, child) {
            report(&location, child_id, anomaly);
        }
        check_node(tree, child_id, child, &location, report);
    }
}

fn check_node(
    tree: &PropertyTree,
    id: NodeId,
    node: &Node,
    location: &str,
    report: &mut dyn FnMut(&str, NodeId, Anomaly),
) {
    for anomaly in node_anomalies(tree, node) {
        report(location, id, anomaly);
    }
    walk_offspring(tree, id, node, location, report);
}

fn join_location(parent: &str, name: &str) -> String {
    if parent.ends_with(':') {
        // schema prefix: properties already carry it
        name.to_string()
    } else {
        format!("{}/{}", parent, name)
    }
}
