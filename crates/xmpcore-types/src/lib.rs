//! Shared vocabulary for the XMP property-tree core
//!
//! This crate provides the constants used by both the core library and its
//! diagnostic tooling:
//!
//! - **Namespace URIs**: the well-known schema namespaces registered at startup
//! - **Reserved names**: array-item placeholder, language/type qualifiers
//! - **Schema constants**: canonical field keys and event names for logging

pub mod names;
pub mod ns;
pub mod schema;

pub use names::{ARRAY_ITEM_NAME, RDF_TYPE, XML_LANG, X_DEFAULT};
