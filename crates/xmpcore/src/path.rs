//! Expanded path steps
//!
//! An [`ExpandedPath`] is the already-parsed form of a property address:
//! step 0 names the schema, step 1 the root property, and any further steps
//! walk into fields, qualifiers and array items. Turning path text into
//! steps is left to callers; this module only builds the simple
//! `schema + root property` form from a namespace and a property name.

use std::fmt;

use xmpcore_types::names::{PREFIX_SEPARATOR, XML_LANG, X_DEFAULT};

use crate::errors::{Result, XmpError};
use crate::options::ArrayForm;
use crate::registry::{AliasRegistry, NamespaceRegistry};

/// One addressing step
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Namespace URI of the schema
    Schema(String),
    /// Qualified name of a top-level property
    RootProperty(String),
    /// Qualified name of a struct field
    StructField(String),
    /// Qualified name of a qualifier
    Qualifier(String),
    /// 1-based array index
    ArrayIndex(usize),
    /// Last array item
    ArrayLast,
    /// Array item whose qualifier `name` has value `value`
    QualSelector { name: String, value: String },
    /// Array item (a struct) whose field `name` has value `value`
    FieldSelector { name: String, value: String },
}

impl Step {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Step::Schema(_) => "schema",
            Step::RootProperty(_) => "root property",
            Step::StructField(_) => "struct field",
            Step::Qualifier(_) => "qualifier",
            Step::ArrayIndex(_) => "array index",
            Step::ArrayLast => "last item",
            Step::QualSelector { .. } => "qualifier selector",
            Step::FieldSelector { .. } => "field selector",
        }
    }

    /// Whether this step selects an array item
    pub fn is_item_step(&self) -> bool {
        matches!(
            self,
            Step::ArrayIndex(_)
                | Step::ArrayLast
                | Step::QualSelector { .. }
                | Step::FieldSelector { .. }
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Schema(name) | Step::RootProperty(name) | Step::StructField(name) => {
                f.write_str(name)
            }
            Step::Qualifier(name) => write!(f, "?{}", name),
            Step::ArrayIndex(index) => write!(f, "[{}]", index),
            Step::ArrayLast => f.write_str("[last()]"),
            Step::QualSelector { name, value } => write!(f, "[?{}=\"{}\"]", name, value),
            Step::FieldSelector { name, value } => write!(f, "[{}=\"{}\"]", name, value),
        }
    }
}

/// A step plus the options the resolver applies to it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub step: Step,
    /// Root property is a registered alias and must be redirected
    pub is_alias: bool,
    /// Array form for a node created at this step
    pub array_form: Option<ArrayForm>,
}

impl PathStep {
    pub fn new(step: Step) -> Self {
        Self {
            step,
            is_alias: false,
            array_form: None,
        }
    }

    pub fn with_array_form(mut self, form: ArrayForm) -> Self {
        self.array_form = Some(form);
        self
    }
}

impl From<Step> for PathStep {
    fn from(step: Step) -> Self {
        Self::new(step)
    }
}

/// Ordered step sequence addressing one node
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ExpandedPath {
    steps: Vec<PathStep>,
}

impl ExpandedPath {
    /// Empty path; push steps to build it
    pub fn new() -> Self {
        Self::default()
    }

    /// Two-step path for a top-level property
    pub fn property(schema_uri: impl Into<String>, root_name: impl Into<String>) -> Self {
        Self {
            steps: vec![
                Step::Schema(schema_uri.into()).into(),
                Step::RootProperty(root_name.into()).into(),
            ],
        }
    }

    /// Build the two-step path for property `prop_name` of `schema_uri`.
    ///
    /// `prop_name` is either a local name or `prefix:local` with the
    /// schema's own prefix. The root step is marked as an alias when the
    /// resulting name is registered in `aliases`.
    ///
    /// # Errors
    /// * `MissingArgument` - If `schema_uri` is empty
    /// * `EmptyPath` - If `prop_name` is empty
    /// * `NotSimpleName` - If `prop_name` contains path syntax
    /// * `UnregisteredSchema` - If `schema_uri` has no prefix
    /// * `UnknownPrefix` / `PrefixMismatch` - If the name's prefix is not
    ///   the schema's prefix
    pub fn root_property(
        namespaces: &NamespaceRegistry,
        aliases: &AliasRegistry,
        schema_uri: &str,
        prop_name: &str,
    ) -> Result<Self> {
        let qualified = qualify_root_name(namespaces, schema_uri, prop_name)?;
        let mut path = Self::property(schema_uri, qualified);
        if aliases.is_alias(path.root_name().unwrap_or_default()) {
            path.steps[1].is_alias = true;
        }
        Ok(path)
    }

    pub fn push(&mut self, step: impl Into<PathStep>) {
        self.steps.push(step.into());
    }

    /// Builder form of [`push`](Self::push)
    pub fn with(mut self, step: impl Into<PathStep>) -> Self {
        self.push(step);
        self
    }

    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    pub(crate) fn steps_mut(&mut self) -> &mut [PathStep] {
        &mut self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn schema_uri(&self) -> Option<&str> {
        match self.steps.first().map(|s| &s.step) {
            Some(Step::Schema(uri)) => Some(uri),
            _ => None,
        }
    }

    pub fn root_name(&self) -> Option<&str> {
        match self.steps.get(1).map(|s| &s.step) {
            Some(Step::RootProperty(name)) => Some(name),
            _ => None,
        }
    }

    /// Array form recorded on the root step
    pub fn root_array_form(&self) -> Option<ArrayForm> {
        self.steps.get(1).and_then(|s| s.array_form)
    }

    /// The synthetic item step of an alias target, if any
    pub fn item_step(&self) -> Option<&Step> {
        self.steps.get(2).map(|s| &s.step)
    }
}

impl fmt::Display for ExpandedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, step) in self.steps.iter().enumerate().skip(1) {
            let joined = matches!(
                step.step,
                Step::StructField(_) | Step::Qualifier(_)
            );
            if position > 1 && joined {
                f.write_str("/")?;
            }
            write!(f, "{}", step.step)?;
        }
        Ok(())
    }
}

/// Synthetic item step selecting the default-language alt-text item
pub fn default_lang_selector() -> Step {
    Step::QualSelector {
        name: XML_LANG.to_string(),
        value: X_DEFAULT.to_string(),
    }
}

/// Whether `name` is a plain (optionally prefixed) name with no path syntax
pub fn is_simple_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '[', '?', '@', '*', '='])
}

fn qualify_root_name(
    namespaces: &NamespaceRegistry,
    schema_uri: &str,
    prop_name: &str,
) -> Result<String> {
    if schema_uri.is_empty() {
        return Err(XmpError::MissingArgument {
            name: "schema namespace URI".to_string(),
        });
    }
    if prop_name.is_empty() {
        return Err(XmpError::EmptyPath);
    }
    if !is_simple_name(prop_name) {
        return Err(XmpError::NotSimpleName {
            name: prop_name.to_string(),
        });
    }
    let schema_prefix =
        namespaces
            .lookup_prefix(schema_uri)
            .ok_or_else(|| XmpError::UnregisteredSchema {
                namespace_uri: schema_uri.to_string(),
            })?;

    match prop_name.split_once(PREFIX_SEPARATOR) {
        None => Ok(format!("{}{}", schema_prefix, prop_name)),
        Some((prefix, local)) => {
            let prefix_uri =
                namespaces
                    .lookup_uri(prefix)
                    .ok_or_else(|| XmpError::UnknownPrefix {
                        prefix: prefix.to_string(),
                    })?;
            if prefix_uri != schema_uri || local.is_empty() {
                return Err(XmpError::PrefixMismatch {
                    name: prop_name.to_string(),
                    namespace_uri: schema_uri.to_string(),
                });
            }
            Ok(prop_name.to_string())
        }
    }
}
