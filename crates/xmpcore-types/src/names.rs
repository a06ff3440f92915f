//! Reserved node names with structural meaning in the property tree.

/// Placeholder name carried by every array item.
pub const ARRAY_ITEM_NAME: &str = "[]";

/// Language qualifier. Always the first qualifier when present.
pub const XML_LANG: &str = "xml:lang";

/// Type qualifier. Sorts directly after the language qualifier.
pub const RDF_TYPE: &str = "rdf:type";

/// Default-language sentinel value for alt-text arrays.
pub const X_DEFAULT: &str = "x-default";

/// Separator between a namespace prefix and a local name.
pub const PREFIX_SEPARATOR: char = ':';
