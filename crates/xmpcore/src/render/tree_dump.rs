use crate::model::{NodeId, PropertyTree};
use crate::registry::NamespaceRegistry;
use crate::rules::invariants::{
    child_link_anomalies, node_anomalies, qualifier_link_anomalies, Anomaly,
};

use super::options_dump::dump_options;

const INDENT: &str = "   ";

/// Write `value`, showing bytes outside printable ASCII as `<C3 A9>` spans.
/// Tab and newline pass through unchanged.
pub fn dump_clear_string(value: &str, out: &mut dyn FnMut(&str)) {
    let bytes = value.as_bytes();
    let is_plain = |b: u8| (0x20..=0x7F).contains(&b) || b == b'\t' || b == b'\n';

    let mut start = 0;
    while start < bytes.len() {
        let mut end = start;
        while end < bytes.len() && is_plain(bytes[end]) {
            end += 1;
        }
        if end > start {
            // plain spans are ASCII, so both ends sit on char boundaries
            out(&value[start..end]);
        }

        start = end;
        while end < bytes.len() && !is_plain(bytes[end]) {
            let lead = if end == start { "<" } else { " " };
            out(&format!("{}{:02X}", lead, bytes[end]));
            end += 1;
        }
        if end > start {
            out(">");
        }
        start = end;
    }
}

/// Dump a whole property tree
///
/// The layout is one line per node: schemas at indent 1 as
/// `prefix  uri  (options)`, properties from indent 2, three spaces per
/// level. Qualifiers are prefixed with `? `, array items show `[n]`. Every
/// structural anomaly is marked inline.
pub fn dump_object(tree: &PropertyTree, out: &mut dyn FnMut(&str)) {
    let root_id = tree.root();
    let Some(root) = tree.get(root_id) else {
        out("** dangling root **\n");
        return;
    };

    out("Dumping XMPMeta object \"");
    dump_clear_string(&root.name, out);
    out("\"  ");
    dump_options(root.options.bits(), out);
    out("\n");

    if !root.value.is_empty() {
        out(&format!("** {} **  \"", Anomaly::RootValue.describe()));
        dump_clear_string(&root.value, out);
        out("\"\n");
    }

    if !root.qualifiers.is_empty() {
        out(&format!("{}\n", Anomaly::RootQualifiers));
        for &qual in &root.qualifiers {
            dump_property(tree, qual, 3, 0, out);
        }
    }

    for &schema_id in &root.children {
        out("\n");
        let Some(schema) = tree.get(schema_id) else {
            out(&format!("{} {}\n", Anomaly::DanglingLink, schema_id));
            continue;
        };

        out(INDENT);
        dump_clear_string(&schema.value, out);
        out("  ");
        dump_clear_string(&schema.name, out);
        out("  ");
        dump_options(schema.options.bits(), out);
        out("\n");

        if !schema.options.is_schema() {
            out(&format!("{}\n", Anomaly::SchemaOptions));
        }

        if !schema.qualifiers.is_empty() {
            out(&format!("{}\n", Anomaly::SchemaQualifiers));
            for &qual in &schema.qualifiers {
                dump_property(tree, qual, 3, 0, out);
            }
        }

        for &child_id in &schema.children {
            if let Some(child) = tree.get(child_id) {
                for anomaly in child_link_anomalies(schema_id, schema, child) {
                    link_marker(anomaly, out);
                }
            }
            dump_property(tree, child_id, 2, 0, out);
        }
    }
}

fn link_marker(anomaly: Anomaly, out: &mut dyn FnMut(&str)) {
    out(&format!("** {} => ", anomaly.describe()));
}

fn dump_property(
    tree: &PropertyTree,
    id: NodeId,
    indent: usize,
    item_index: usize,
    out: &mut dyn FnMut(&str),
) {
    out(&INDENT.repeat(indent));
    let Some(node) = tree.get(id) else {
        out(&format!("{} {}\n", Anomaly::DanglingLink, id));
        return;
    };

    if item_index == 0 {
        if node.options.is_qualifier() {
            out("? ");
        }
        dump_clear_string(&node.name, out);
    } else {
        out(&format!("[{}]", item_index));
    }

    if !node.options.is_composite() {
        out(" = \"");
        dump_clear_string(&node.value, out);
        out("\"");
    }

    let bits = node.options.bits();
    if bits != 0 {
        out("  ");
        dump_options(bits, out);
    }

    for anomaly in node_anomalies(tree, node) {
        out(&format!("  {}", anomaly));
    }
    out("\n");

    for (position, &qual_id) in node.qualifiers.iter().enumerate() {
        if let Some(qual) = tree.get(qual_id) {
            for anomaly in qualifier_link_anomalies(id, node, qual, position) {
                link_marker(anomaly, out);
            }
        }
        dump_property(tree, qual_id, indent + 2, 0, out);
    }

    let is_array = node.options.is_array();
    for (position, &child_id) in node.children.iter().enumerate() {
        if let Some(child) = tree.get(child_id) {
            for anomaly in child_link_anomalies(id, node, child) {
                link_marker(anomaly, out);
            }
        }
        let item_index = if is_array { position + 1 } else { 0 };
        dump_property(tree, child_id, indent + 1, item_index, out);
    }
}

/// Dump the namespace table as `prefix => uri` lines ordered by prefix
pub fn dump_namespaces(namespaces: &NamespaceRegistry, out: &mut dyn FnMut(&str)) {
    out("Dumping namespace prefix to URI map\n");
    let width = namespaces
        .iter()
        .map(|(prefix, _)| prefix.len())
        .max()
        .unwrap_or(0);
    for (prefix, uri) in namespaces.iter() {
        out(&format!("{:>width$} => ", prefix, width = width));
        dump_clear_string(uri, out);
        out("\n");
    }
}
