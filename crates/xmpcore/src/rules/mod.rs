//! Structural consistency rules for property trees

pub mod invariants;
pub mod validation;

pub use invariants::{find_anomalies, Anomaly, Finding};
pub use validation::{is_consistent, validate_tree};
