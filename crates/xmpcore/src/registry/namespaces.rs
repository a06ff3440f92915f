use std::collections::BTreeMap;

use xmpcore_types::names::PREFIX_SEPARATOR;

use crate::errors::{Result, XmpError};

/// Bidirectional namespace URI <-> prefix table
///
/// Prefixes are stored with their trailing `:`. Registration is additive
/// only and idempotent per URI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceRegistry {
    uri_to_prefix: BTreeMap<String, String>,
    prefix_to_uri: BTreeMap<String, String>,
}

impl NamespaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `uri` with a suggested prefix and return the prefix in use.
    ///
    /// If `uri` is already registered its existing prefix is returned and
    /// `suggested_prefix` is ignored. A suggested prefix already taken by a
    /// different URI is replaced by `<prefix>_<n>_:` with the smallest
    /// free `n`.
    ///
    /// # Errors
    /// * `EmptyNamespace` - If `uri` or `suggested_prefix` is empty
    /// * `InvalidXmlName` - If the prefix is not a simple XML name
    pub fn define(&mut self, uri: &str, suggested_prefix: &str) -> Result<String> {
        if uri.is_empty() || suggested_prefix.is_empty() {
            return Err(XmpError::EmptyNamespace);
        }
        let base = suggested_prefix
            .strip_suffix(PREFIX_SEPARATOR)
            .unwrap_or(suggested_prefix);
        verify_simple_xml_name(base)?;

        if let Some(existing) = self.uri_to_prefix.get(uri) {
            return Ok(existing.clone());
        }

        let mut prefix = format!("{}{}", base, PREFIX_SEPARATOR);
        let mut suffix = 1;
        while self.prefix_to_uri.contains_key(&prefix) {
            prefix = format!("{}_{}_{}", base, suffix, PREFIX_SEPARATOR);
            suffix += 1;
        }

        tracing::debug!(namespace_uri = uri, prefix = %prefix, "namespace registered");
        self.uri_to_prefix.insert(uri.to_string(), prefix.clone());
        self.prefix_to_uri.insert(prefix.clone(), uri.to_string());
        Ok(prefix)
    }

    /// Registered prefix (with trailing `:`) for `uri`
    pub fn lookup_prefix(&self, uri: &str) -> Option<&str> {
        self.uri_to_prefix.get(uri).map(String::as_str)
    }

    /// Registered URI for `prefix`, given with or without the trailing `:`
    pub fn lookup_uri(&self, prefix: &str) -> Option<&str> {
        let found = if prefix.ends_with(PREFIX_SEPARATOR) {
            self.prefix_to_uri.get(prefix)
        } else {
            self.prefix_to_uri
                .get(&format!("{}{}", prefix, PREFIX_SEPARATOR))
        };
        found.map(String::as_str)
    }

    /// Namespace deletion is not supported; registered namespaces are
    /// permanent.
    ///
    /// # Errors
    /// * `Unimplemented` - Always
    pub fn delete(&mut self, _uri: &str) -> Result<()> {
        Err(XmpError::Unimplemented {
            operation: "DeleteNamespace".to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.uri_to_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uri_to_prefix.is_empty()
    }

    /// `(prefix, uri)` pairs ordered by prefix
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefix_to_uri
            .iter()
            .map(|(prefix, uri)| (prefix.as_str(), uri.as_str()))
    }
}

/// Check that `name` is a simple (unqualified) XML name
///
/// # Errors
/// * `InvalidXmlName` - If `name` is empty, starts with something other
///   than a letter or `_`, or contains characters other than letters,
///   digits, `-`, `.` and `_`
pub fn verify_simple_xml_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_'));
    if valid_start && valid_rest {
        Ok(())
    } else {
        Err(XmpError::InvalidXmlName {
            name: name.to_string(),
        })
    }
}
