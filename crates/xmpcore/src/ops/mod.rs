pub mod naming;
pub mod resolver;

pub use naming::{derive_qualified_name, derive_uri, QualifiedName};
pub use resolver::{
    create_child, create_qualifier, create_schema, find_child, find_node, find_qualifier,
    find_schema, lookup_lang_item, lookup_node, remove_node, set_value,
};
