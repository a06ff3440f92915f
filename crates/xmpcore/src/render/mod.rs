//! Diagnostic text dumps
//!
//! Every dump writes through a text sink, `&mut dyn FnMut(&str)`, so callers
//! can collect into a `String`, print, or forward to a log.

pub mod options_dump;
pub mod tree_dump;

pub use options_dump::{dump_options, format_options};
pub use tree_dump::{dump_clear_string, dump_namespaces, dump_object};
