pub mod aliases;
pub mod demo;
pub mod flags;
pub mod namespaces;
