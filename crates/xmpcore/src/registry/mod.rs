//! Namespace and alias registries
//!
//! [`Registries`] bundles the two tables. It is a plain value so tests and
//! embedders can own one directly; the library lifecycle hands out a
//! [`SharedRegistries`] handle to the process-wide instance.

pub mod aliases;
pub mod namespaces;
pub mod standard;

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use crate::errors::{Result, XmpError};
use crate::{log_op_end, log_op_error, log_op_start};

pub use aliases::AliasRegistry;
pub use namespaces::{verify_simple_xml_name, NamespaceRegistry};

/// The namespace and alias tables used to resolve property names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registries {
    pub namespaces: NamespaceRegistry,
    pub aliases: AliasRegistry,
}

impl Registries {
    /// Empty tables
    pub fn new() -> Self {
        Self::default()
    }

    /// Tables seeded with the standard namespaces and aliases
    ///
    /// # Errors
    /// * `InitializationFailed` - If a standard table entry is rejected
    pub fn with_standard() -> Result<Self> {
        let mut registries = Self::new();
        standard::register_standard_namespaces(&mut registries.namespaces)
            .and_then(|()| {
                standard::register_standard_aliases(
                    &registries.namespaces,
                    &mut registries.aliases,
                )
            })
            .map_err(|err| XmpError::InitializationFailed {
                message: err.to_string(),
            })?;
        Ok(registries)
    }

    /// See [`NamespaceRegistry::define`]
    ///
    /// # Errors
    /// As for [`NamespaceRegistry::define`]
    pub fn register_namespace(&mut self, uri: &str, suggested_prefix: &str) -> Result<String> {
        self.namespaces.define(uri, suggested_prefix)
    }

    /// See [`AliasRegistry::register`]
    ///
    /// # Errors
    /// As for [`AliasRegistry::register`]
    pub fn register_alias(
        &mut self,
        alias_ns: &str,
        alias_prop: &str,
        actual_ns: &str,
        actual_prop: &str,
        array_form: u32,
    ) -> Result<()> {
        self.aliases.register(
            &self.namespaces,
            alias_ns,
            alias_prop,
            actual_ns,
            actual_prop,
            array_form,
        )
    }
}

/// Shared handle to a [`Registries`] instance
///
/// Lookups take a read lock and registrations a write lock, so a handle can
/// be cloned freely across threads.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistries {
    inner: Arc<RwLock<Registries>>,
}

impl SharedRegistries {
    pub fn new(registries: Registries) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registries)),
        }
    }

    /// Read access to the tables
    ///
    /// # Errors
    /// * `Internal` - If a writer panicked while holding the lock
    pub fn read(&self) -> Result<RwLockReadGuard<'_, Registries>> {
        self.inner.read().map_err(|_| poisoned())
    }

    /// Write access to the tables
    ///
    /// # Errors
    /// * `Internal` - If a writer panicked while holding the lock
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Registries>> {
        self.inner.write().map_err(|_| poisoned())
    }

    /// Whether both handles point at the same instance
    pub fn same_instance(&self, other: &SharedRegistries) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Register a namespace and return the prefix in use
    ///
    /// # Errors
    /// As for [`NamespaceRegistry::define`]
    pub fn register_namespace(&self, uri: &str, suggested_prefix: &str) -> Result<String> {
        log_op_start!("register_namespace", namespace_uri = uri);
        let start = Instant::now();

        let prefix = self
            .write()
            .and_then(|mut reg| reg.register_namespace(uri, suggested_prefix))
            .map_err(|e| {
                log_op_error!(
                    "register_namespace",
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "register_namespace",
            duration_ms = start.elapsed().as_millis() as u64,
            prefix = %prefix
        );
        Ok(prefix)
    }

    /// Prefix registered for `uri`
    ///
    /// # Errors
    /// * `Internal` - If the lock is poisoned
    pub fn namespace_prefix(&self, uri: &str) -> Result<Option<String>> {
        Ok(self.read()?.namespaces.lookup_prefix(uri).map(str::to_string))
    }

    /// URI registered for `prefix`
    ///
    /// # Errors
    /// * `Internal` - If the lock is poisoned
    pub fn namespace_uri(&self, prefix: &str) -> Result<Option<String>> {
        Ok(self.read()?.namespaces.lookup_uri(prefix).map(str::to_string))
    }

    /// Namespace deletion is not supported
    ///
    /// # Errors
    /// * `Unimplemented` - Always
    pub fn delete_namespace(&self, uri: &str) -> Result<()> {
        self.write()?.namespaces.delete(uri)
    }

    /// Register an alias
    ///
    /// # Errors
    /// As for [`AliasRegistry::register`]
    pub fn register_alias(
        &self,
        alias_ns: &str,
        alias_prop: &str,
        actual_ns: &str,
        actual_prop: &str,
        array_form: u32,
    ) -> Result<()> {
        log_op_start!("register_alias", alias = alias_prop, actual = actual_prop);
        let start = Instant::now();

        self.write()
            .and_then(|mut reg| {
                reg.register_alias(alias_ns, alias_prop, actual_ns, actual_prop, array_form)
            })
            .map_err(|e| {
                log_op_error!(
                    "register_alias",
                    &e,
                    duration_ms = start.elapsed().as_millis() as u64
                );
                e
            })?;

        log_op_end!(
            "register_alias",
            duration_ms = start.elapsed().as_millis() as u64
        );
        Ok(())
    }
}

fn poisoned() -> XmpError {
    XmpError::Internal {
        message: "registry lock poisoned".to_string(),
    }
}
