//! The metadata object
//!
//! [`XmpMeta`] owns one property tree and a handle to the registries used
//! to resolve names in it. Failures from its operations are offered to the
//! object's error callback as operation-fatal before being returned.
//!
//! An instance has no internal synchronization; callers sharing one across
//! threads must serialize access themselves.

use std::cell::RefCell;
use std::time::Instant;

use crate::canonical;
use crate::errors::{ExError, XmpError};
use crate::library;
use crate::model::{NodeId, NodeSnapshot, PropertyTree};
use crate::notify::{ErrorCallback, ErrorCallbackInfo, Severity};
use crate::ops::resolver;
use crate::options::Form;
use crate::path::ExpandedPath;
use crate::registry::SharedRegistries;
use crate::render;
use crate::rules;
use crate::{log_op_end, log_op_error, log_op_start};

#[derive(Debug)]
pub struct XmpMeta {
    tree: PropertyTree,
    registries: SharedRegistries,
    error_callback: RefCell<ErrorCallbackInfo>,
    client_refs: i32,
}

impl XmpMeta {
    /// Empty object bound to the process-wide registries, starting with
    /// the default error callback
    ///
    /// # Errors
    /// * `NotInitialized` - If the library has not been initialized
    pub fn new() -> Result<Self, ExError> {
        let registries = library::registries().map_err(|e| ExError::from(e).with_op("new"))?;
        Ok(Self::with_registries(registries))
    }

    /// Empty object bound to `registries`
    pub fn with_registries(registries: SharedRegistries) -> Self {
        Self {
            tree: PropertyTree::new(),
            registries,
            error_callback: RefCell::new(library::default_error_callback()),
            client_refs: 0,
        }
    }

    pub fn tree(&self) -> &PropertyTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut PropertyTree {
        &mut self.tree
    }

    pub fn registries(&self) -> &SharedRegistries {
        &self.registries
    }

    /// Log the outcome of `op` and route a failure through the callback
    fn finish<T>(
        &self,
        op: &'static str,
        start: Instant,
        outcome: crate::errors::Result<T>,
    ) -> Result<T, ExError> {
        match outcome {
            Ok(value) => {
                log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
                Ok(value)
            }
            Err(err) => {
                log_op_error!(op, &err, duration_ms = start.elapsed().as_millis() as u64);
                let mut ex = ExError::from(err);
                if ex.op().is_none() {
                    ex = ex.with_op(op);
                }
                self.error_callback
                    .borrow_mut()
                    .offer(Severity::OperationFatal, &mut ex);
                Err(ex)
            }
        }
    }

    // ===== Object name and options =====

    /// Document name stored on the tree root
    pub fn object_name(&self) -> &str {
        self.tree.get(self.tree.root()).map_or("", |root| root.name.as_str())
    }

    /// Set the document name from raw bytes, which must be UTF-8
    ///
    /// # Errors
    /// * `InvalidUtf8` - If `name` is not well-formed UTF-8
    pub fn set_object_name(&mut self, name: &[u8]) -> Result<(), ExError> {
        log_op_start!("set_object_name");
        let start = Instant::now();
        let outcome = std::str::from_utf8(name)
            .map_err(|e| XmpError::InvalidUtf8 {
                context: "object name".to_string(),
                offset: e.valid_up_to(),
            })
            .and_then(|text| {
                let root = self.tree.root();
                self.tree.node_mut(root)?.name = text.to_string();
                Ok(())
            });
        self.finish("set_object_name", start, outcome)
    }

    /// No object options are defined
    pub fn get_object_options(&self) -> u32 {
        0
    }

    /// # Errors
    /// * `Unimplemented` - Always
    pub fn set_object_options(&mut self, _options: u32) -> Result<(), ExError> {
        log_op_start!("set_object_options");
        let start = Instant::now();
        let outcome = Err(XmpError::Unimplemented {
            operation: "SetObjectOptions".to_string(),
        });
        self.finish("set_object_options", start, outcome)
    }

    // ===== Whole-tree operations =====

    /// Remove every property and the object name
    pub fn erase(&mut self) {
        log_op_start!("erase");
        let start = Instant::now();
        self.tree.erase();
        log_op_end!("erase", duration_ms = start.elapsed().as_millis() as u64);
    }

    /// Deep-copy this object into `dest`, which is erased first. The error
    /// callback is copied along with the tree.
    ///
    /// # Errors
    /// * `MissingArgument` - If `dest` is `None`
    /// * `NoOptionsDefined` - If `options` is not 0
    pub fn clone_into(&self, dest: Option<&mut XmpMeta>, options: u32) -> Result<(), ExError> {
        log_op_start!("clone", options = options);
        let start = Instant::now();
        let outcome = match dest {
            None => Err(XmpError::MissingArgument {
                name: "clone".to_string(),
            }),
            Some(_) if options != 0 => Err(XmpError::NoOptionsDefined {
                operation: "Clone".to_string(),
            }),
            Some(dest) => self.tree.copy_into(&mut dest.tree).map(|()| {
                dest.registries = self.registries.clone();
                dest.error_callback = RefCell::new(self.error_callback.borrow().clone());
            }),
        };
        self.finish("clone", start, outcome)
    }

    /// New object holding a deep copy of this one
    ///
    /// # Errors
    /// * `StaleNode` - If the tree has a dangling link
    pub fn duplicate(&self) -> Result<XmpMeta, ExError> {
        let mut copy = XmpMeta::with_registries(self.registries.clone());
        self.clone_into(Some(&mut copy), 0)?;
        Ok(copy)
    }

    /// Put the tree into canonical order
    ///
    /// # Errors
    /// * `StaleNode` - If the tree has a dangling link
    pub fn sort(&mut self) -> Result<(), ExError> {
        log_op_start!("sort");
        let start = Instant::now();
        let outcome = canonical::sort_tree(&mut self.tree);
        self.finish("sort", start, outcome)
    }

    /// Owned snapshot of the whole tree
    ///
    /// # Errors
    /// * `StaleNode` - If the tree has a dangling link
    pub fn snapshot(&self) -> Result<NodeSnapshot, ExError> {
        let start = Instant::now();
        let outcome = self.tree.snapshot(self.tree.root());
        self.finish("snapshot", start, outcome)
    }

    // ===== Properties =====

    /// Walk `path`, creating missing nodes when `create` is set
    ///
    /// # Errors
    /// As for [`resolver::find_node`]
    pub fn find_node(
        &mut self,
        path: &ExpandedPath,
        create: bool,
        leaf_form: Option<Form>,
    ) -> Result<Option<NodeId>, ExError> {
        log_op_start!("find_node", path = %path, create = create);
        let start = Instant::now();
        let outcome = self.registries.read().and_then(|registries| {
            resolver::find_node(&mut self.tree, &registries, path, create, leaf_form)
        });
        self.finish("find_node", start, outcome)
    }

    /// Number of items in the array `array_name` of `schema_ns`; 0 when the
    /// property does not exist
    ///
    /// # Errors
    /// * `NotAnArray` - If the property exists but is not an array
    /// * `UnregisteredSchema` / `PrefixMismatch` - If the name cannot be
    ///   qualified
    pub fn count_array_items(&self, schema_ns: &str, array_name: &str) -> Result<usize, ExError> {
        log_op_start!("count_array_items", namespace_uri = schema_ns);
        let start = Instant::now();
        let outcome = self.registries.read().and_then(|registries| {
            let path = ExpandedPath::root_property(
                &registries.namespaces,
                &registries.aliases,
                schema_ns,
                array_name,
            )?;
            let Some(id) = resolver::lookup_node(&self.tree, &registries, &path)? else {
                return Ok(0);
            };
            let node = self.tree.node(id)?;
            if !node.options.is_array() {
                return Err(XmpError::NotAnArray {
                    name: node.name.clone(),
                });
            }
            Ok(node.children.len())
        });
        self.finish("count_array_items", start, outcome)
    }

    // ===== Diagnostics =====

    /// Dump the tree through `out`
    pub fn dump_object(&self, out: &mut dyn FnMut(&str)) {
        render::dump_object(&self.tree, out);
    }

    /// Report structural anomalies through `out` and return their count
    pub fn validate(&self, out: &mut dyn FnMut(&str)) -> usize {
        rules::validate_tree(&self.tree, out)
    }

    // ===== Error notification =====

    /// Replace this object's error callback
    pub fn set_error_callback(&mut self, callback: ErrorCallback, limit: u32) {
        self.error_callback = RefCell::new(ErrorCallbackInfo::new(callback, limit));
    }

    /// Set a new notification limit and restart the accounting
    pub fn reset_error_callback_limit(&mut self, limit: u32) {
        self.error_callback.get_mut().reset_limit(limit);
    }

    /// Copy of the current callback state
    pub fn error_callback(&self) -> ErrorCallbackInfo {
        self.error_callback.borrow().clone()
    }

    // ===== Client references =====

    pub fn inc_ref(&mut self) -> i32 {
        self.client_refs += 1;
        self.client_refs
    }

    pub fn dec_ref(&mut self) -> i32 {
        self.client_refs -= 1;
        self.client_refs
    }

    pub fn client_refs(&self) -> i32 {
        self.client_refs
    }
}

impl Drop for XmpMeta {
    fn drop(&mut self) {
        debug_assert!(
            self.client_refs <= 0,
            "metadata object dropped with {} client references",
            self.client_refs
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::options::ArrayForm;
    use crate::path::Step;
    use crate::registry::Registries;
    use std::sync::{Arc, Mutex};
    use xmpcore_types::ns;

    fn meta() -> XmpMeta {
        XmpMeta::with_registries(SharedRegistries::new(Registries::with_standard().unwrap()))
    }

    #[test]
    fn test_object_name_must_be_utf8() {
        let mut meta = meta();
        meta.set_object_name("doc.jpg".as_bytes()).unwrap();
        assert_eq!(meta.object_name(), "doc.jpg");

        let err = meta.set_object_name(&[b'a', 0xFF, b'b']).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadUtf8);
        assert_eq!(meta.object_name(), "doc.jpg");
    }

    #[test]
    fn test_object_options() {
        let mut meta = meta();
        assert_eq!(meta.get_object_options(), 0);
        let err = meta.set_object_options(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unimplemented);
    }

    #[test]
    fn test_clone_argument_checks() {
        let meta = meta();
        let err = meta.clone_into(None, 0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadParam);

        let mut other = XmpMeta::with_registries(meta.registries().clone());
        let err = meta.clone_into(Some(&mut other), 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadOptions);
    }

    #[test]
    fn test_count_array_items() {
        let mut meta = meta();
        assert_eq!(meta.count_array_items(ns::DC, "subject").unwrap(), 0);

        let mut path = ExpandedPath::property(ns::DC, "dc:subject").with(Step::ArrayIndex(1));
        path.steps_mut()[1].array_form = Some(ArrayForm::Unordered);
        meta.find_node(&path, true, None).unwrap().unwrap();
        assert_eq!(meta.count_array_items(ns::DC, "subject").unwrap(), 1);
        assert_eq!(meta.count_array_items(ns::DC, "dc:subject").unwrap(), 1);

        let title = ExpandedPath::property(ns::DC, "dc:format");
        meta.find_node(&title, true, None).unwrap().unwrap();
        let err = meta.count_array_items(ns::DC, "format").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadXPath);
    }

    #[test]
    fn test_failures_reach_the_callback() {
        let mut meta = meta();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        meta.set_error_callback(
            Arc::new(move |severity, err: &ExError| {
                sink.lock().unwrap().push((severity, err.code()));
                true
            }),
            0,
        );

        let err = meta.set_object_options(1).unwrap_err();
        assert!(err.is_notified());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![(Severity::OperationFatal, "ERR_UNIMPLEMENTED")]
        );
    }

    #[test]
    fn test_client_refs() {
        let mut meta = meta();
        assert_eq!(meta.inc_ref(), 1);
        assert_eq!(meta.dec_ref(), 0);
        assert_eq!(meta.client_refs(), 0);
    }
}
