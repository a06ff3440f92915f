use crate::model::PropertyTree;

use super::invariants;

/// Validate the entire property tree
///
/// Runs every structural check and writes one line per anomaly to `out`.
/// Anomalies are never raised as errors; this is a diagnostic aid meant to
/// run after mutations in tests and verification builds. The checks are:
///
/// 1. The root has no value and no qualifiers
/// 2. Root children are schema nodes without qualifiers
/// 3. Only struct, array and schema nodes have children
/// 4. Struct and array nodes have no value
/// 5. Array children are named `[]`, struct and schema children are not
/// 6. `hasLang` is set exactly when `xml:lang` is the first qualifier
/// 7. Children and qualifiers point back at their owner
/// 8. Qualifiers carry the qualifier kind and are never named `[]`
///
/// # Returns
/// The number of anomalies reported.
pub fn validate_tree(tree: &PropertyTree, out: &mut dyn FnMut(&str)) -> usize {
    let findings = invariants::find_anomalies(tree);
    for finding in &findings {
        out(&format!("{}: {}\n", finding.location, finding.anomaly));
    }
    if !findings.is_empty() {
        tracing::debug!(anomaly_count = findings.len(), "property tree failed validation");
    }
    findings.len()
}

/// Whether the tree passes every structural check
pub fn is_consistent(tree: &PropertyTree) -> bool {
    invariants::find_anomalies(tree).is_empty()
}
