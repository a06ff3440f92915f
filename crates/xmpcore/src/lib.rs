//! XMP Core - in-memory XMP property tree
//!
//! This crate provides the data model and structural rules of XMP metadata:
//! - Typed node options with a bit-exact option word
//! - The property tree arena with generational node handles
//! - Namespace and alias registries with the standard tables
//! - Path steps and the node-level resolver contract
//! - Deterministic canonical ordering
//! - Structural validation and diagnostic dumps
//! - Error taxonomy and client error notification
//!
//! Parsing and serializing RDF/XML is not part of this crate.

pub mod canonical;
pub mod errors;
pub mod library;
pub mod logging_facility;
pub mod meta;
pub mod model;
pub mod notify;
pub mod ops;
pub mod options;
pub mod path;
pub mod registry;
pub mod render;
pub mod rules;

pub use xmpcore_types;

// Re-export commonly used types
pub use errors::{ErrorKind, ExError, Result, XmpError};
pub use meta::XmpMeta;
pub use model::{Node, NodeId, NodeSnapshot, PropertyTree};
pub use notify::{ErrorCallback, ErrorCallbackInfo, Severity};
pub use options::{ArrayForm, Form, Markers, NodeKind, NodeOptions};
pub use path::{ExpandedPath, PathStep, Step};
pub use registry::{AliasRegistry, NamespaceRegistry, Registries, SharedRegistries};
