use std::collections::BTreeMap;

use crate::errors::{Result, XmpError};
use crate::options::ArrayForm;
use crate::path::{default_lang_selector, is_simple_name, ExpandedPath, Step};

use super::namespaces::NamespaceRegistry;

/// Map from an aliased top-level property to its actual location
///
/// Keys are qualified root names (`xmp:Author`). Each target is a
/// schema + root property path, optionally followed by one synthetic item
/// step (`[1]` or `[?xml:lang="x-default"]`) when the alias selects an
/// array item. Alias chains are always stored collapsed, so a target never
/// names another alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasRegistry {
    entries: BTreeMap<String, ExpandedPath>,
}

impl AliasRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `alias_ns:alias_prop` as an alias of `actual_ns:actual_prop`.
    ///
    /// `array_form` is a raw option word holding only array-form bits; when
    /// non-zero the alias selects the first item (or the `x-default` item of
    /// an alt-text array) of the actual property.
    ///
    /// Re-registering an identical alias is a no-op. If the actual is itself
    /// an alias the chain is collapsed; existing aliases that target the new
    /// alias are rewritten to target its actual. Nothing is changed when an
    /// error is returned.
    ///
    /// # Errors
    /// * `AliasNotSimple` - If either name is not a plain property name
    /// * `UnregisteredSchema` / `UnknownPrefix` / `PrefixMismatch` - If a
    ///   name does not belong to its namespace
    /// * `OnlyArrayFormAllowed` - If `array_form` carries other flags
    /// * `AliasArrayFormMismatch` / `AliasPathMismatch` /
    ///   `AliasActualMismatch` / `AliasItemMismatch` - If the alias is
    ///   already registered differently
    /// * `ArrayItemToArrayItem` - If the chain would select an item of an
    ///   array item
    /// * `SelfAlias` - If the alias would resolve to itself
    pub fn register(
        &mut self,
        namespaces: &NamespaceRegistry,
        alias_ns: &str,
        alias_prop: &str,
        actual_ns: &str,
        actual_prop: &str,
        array_form: u32,
    ) -> Result<()> {
        let alias = expand_simple(namespaces, alias_ns, alias_prop)?;
        let mut actual = expand_simple(namespaces, actual_ns, actual_prop)?;

        let form = ArrayForm::from_bits(array_form)?;
        if let Some(form) = form {
            actual.steps_mut()[1].array_form = Some(form);
            let item = match form {
                ArrayForm::AltText => default_lang_selector(),
                _ => Step::ArrayIndex(1),
            };
            actual.push(item);
        }

        let alias_name = root_name(&alias)?.to_string();

        if let Some(existing) = self.entries.get(&alias_name) {
            return check_same_target(&alias_name, existing, &actual);
        }

        // The actual is itself an alias: collapse the chain.
        let actual_root = root_name(&actual)?.to_string();
        if let Some(registered) = self.entries.get(&actual_root) {
            if actual.len() == 2 {
                actual = registered.clone();
            } else if registered.len() != 2 {
                return Err(XmpError::ArrayItemToArrayItem { alias: alias_name });
            } else {
                replace_base(&mut actual, registered);
            }
        }

        if root_name(&actual)? == alias_name {
            return Err(XmpError::SelfAlias { alias: alias_name });
        }

        // Existing aliases that target the new alias. Check all of them
        // before rewriting any.
        let dependents: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, target)| target.root_name() == Some(alias_name.as_str()))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &dependents {
            let target = &self.entries[key];
            if target.len() > 2 && actual.len() > 2 {
                return Err(XmpError::ArrayItemToArrayItem { alias: key.clone() });
            }
        }

        for key in &dependents {
            if let Some(target) = self.entries.get_mut(key) {
                if target.len() == 2 {
                    *target = actual.clone();
                } else {
                    replace_base(target, &actual);
                }
            }
        }

        tracing::debug!(
            alias = %alias_name,
            actual = %actual,
            rewritten = dependents.len(),
            "alias registered"
        );
        self.entries.insert(alias_name, actual);
        Ok(())
    }

    /// Whether `root_name` (qualified) is a registered alias
    pub fn is_alias(&self, root_name: &str) -> bool {
        self.entries.contains_key(root_name)
    }

    /// Registered target of the alias with qualified name `root_name`
    pub fn resolve(&self, root_name: &str) -> Option<&ExpandedPath> {
        self.entries.get(root_name)
    }

    /// Registered target of `ns:prop`, or `None` if it is not an alias
    ///
    /// # Errors
    /// Same name errors as [`ExpandedPath::root_property`]
    pub fn resolve_property(
        &self,
        namespaces: &NamespaceRegistry,
        ns: &str,
        prop: &str,
    ) -> Result<Option<&ExpandedPath>> {
        let path = ExpandedPath::root_property(namespaces, self, ns, prop)?;
        Ok(path.root_name().and_then(|name| self.entries.get(name)))
    }

    /// All `(alias, target)` pairs ordered by alias name
    pub fn entries(&self) -> impl Iterator<Item = (&str, &ExpandedPath)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn expand_simple(namespaces: &NamespaceRegistry, ns: &str, prop: &str) -> Result<ExpandedPath> {
    if !prop.is_empty() && !is_simple_name(prop) {
        return Err(XmpError::AliasNotSimple {
            name: prop.to_string(),
        });
    }
    ExpandedPath::root_property(namespaces, &AliasRegistry::new(), ns, prop)
}

fn root_name(path: &ExpandedPath) -> Result<&str> {
    path.root_name().ok_or_else(|| XmpError::Internal {
        message: "alias path without a root property".to_string(),
    })
}

/// Replace schema and root name of `target` with those of `base`, keeping
/// the array form and item step of `target`.
fn replace_base(target: &mut ExpandedPath, base: &ExpandedPath) {
    let steps = target.steps_mut();
    for (slot, from) in steps.iter_mut().zip(base.steps()).take(2) {
        slot.step = from.step.clone();
    }
}

fn check_same_target(alias: &str, existing: &ExpandedPath, requested: &ExpandedPath) -> Result<()> {
    if existing.root_array_form() != requested.root_array_form() {
        return Err(XmpError::AliasArrayFormMismatch {
            alias: alias.to_string(),
        });
    }
    if existing.len() != requested.len() {
        return Err(XmpError::AliasPathMismatch {
            alias: alias.to_string(),
        });
    }
    if existing.root_name() != requested.root_name() {
        return Err(XmpError::AliasActualMismatch {
            alias: alias.to_string(),
            existing: existing.root_name().unwrap_or_default().to_string(),
            requested: requested.root_name().unwrap_or_default().to_string(),
        });
    }
    if existing.len() == 3 && existing.item_step() != requested.item_step() {
        return Err(XmpError::AliasItemMismatch {
            alias: alias.to_string(),
        });
    }
    Ok(())
}
