use thiserror::Error;

/// Result type alias using XmpError
pub type Result<T> = std::result::Result<T, XmpError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure raised by the core is classified into one of these kinds.
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and error notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Path does not reduce to the step shape the operation requires
    BadXPath,
    /// Flag combination outside the subset allowed for the call
    BadOptions,
    /// Semantic conflict between arguments, or a missing required argument
    BadParam,
    /// Namespace URI that is not registered
    BadSchema,
    /// Name that is not a legal XML name
    BadXml,
    /// Text that is not well-formed UTF-8
    BadUtf8,
    /// Value that cannot be stored on the addressed node
    BadValue,
    /// An invariant the caller cannot have violated
    InternalFailure,
    /// Placeholder operation that is intentionally not supported
    Unimplemented,
}

impl ErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::BadXPath => "ERR_BAD_XPATH",
            ErrorKind::BadOptions => "ERR_BAD_OPTIONS",
            ErrorKind::BadParam => "ERR_BAD_PARAM",
            ErrorKind::BadSchema => "ERR_BAD_SCHEMA",
            ErrorKind::BadXml => "ERR_BAD_XML",
            ErrorKind::BadUtf8 => "ERR_BAD_UTF8",
            ErrorKind::BadValue => "ERR_BAD_VALUE",
            ErrorKind::InternalFailure => "ERR_INTERNAL_FAILURE",
            ErrorKind::Unimplemented => "ERR_UNIMPLEMENTED",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification fields used for programmatic handling and for
/// client error notification, plus free-form context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ErrorKind,
    op: Option<String>,
    property: Option<String>,
    message: String,
    notified: bool,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            op: None,
            property: None,
            message: String::new(),
            notified: false,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the property (qualified name or path step) involved
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the property context, if any
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether a client callback has already seen this error
    pub fn is_notified(&self) -> bool {
        self.notified
    }

    pub(crate) fn set_notified(&mut self) {
        self.notified = true;
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(property) = &self.property {
            write!(f, " (property: {})", property)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for property-tree, registry and metadata-object operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum XmpError {
    // ===== Path shape errors =====
    /// An expanded path with no steps
    #[error("Empty XPath")]
    EmptyPath,

    /// Alias or actual name that expands to more than schema + root property
    #[error("Alias and actual property names must be simple: {name}")]
    AliasNotSimple { name: String },

    /// Property prefix does not belong to the given schema namespace
    #[error("Prefix of {name} does not match schema namespace {namespace_uri}")]
    PrefixMismatch { name: String, namespace_uri: String },

    /// Named child requested below a node that cannot hold fields
    #[error("Named children only allowed for schemas and structs: {name}")]
    NamedChildNotAllowed { name: String },

    /// Named child requested below an array
    #[error("Named children not allowed for arrays: {name}")]
    NamedChildOfArray { name: String },

    /// Array-item placeholder used where a named node is required
    #[error("Array item placeholder not allowed here: {context}")]
    PlaceholderNotAllowed { context: String },

    /// Array indexing step applied to a node that is not an array
    #[error("Indexing applied to non-array: {name}")]
    IndexOnNonArray { name: String },

    /// Array index step that is not a positive integer
    #[error("Array index must be a positive integer: {step}")]
    BadArrayIndex { step: String },

    /// Selector step that cannot be split into name and value
    #[error("Malformed selector step: {step}")]
    BadSelector { step: String },

    /// Field selector applied to an array whose items are not structs
    #[error("Field selector must be used on array of struct: {name}")]
    FieldSelectorOnNonStruct { name: String },

    /// Qualifier requested on a node that cannot carry qualifiers
    #[error("Qualifiers not allowed on {name}")]
    QualifierNotAllowed { name: String },

    /// Property is not an array
    #[error("The named property is not an array: {name}")]
    NotAnArray { name: String },

    /// Property name that is path syntax rather than a qualified name
    #[error("Property name must be a simple qualified name: {name}")]
    NotSimpleName { name: String },

    /// Step kind that is not valid at this position in the path
    #[error("Unexpected {kind} step at position {position}")]
    UnexpectedStep { kind: String, position: usize },

    // ===== Option errors =====
    /// Array form argument carrying non array-form flags
    #[error("Only array form flags are allowed: 0x{bits:X}")]
    OnlyArrayFormAllowed { bits: u32 },

    /// Option word that does not decode to a legal flag combination
    #[error("Invalid option combination 0x{bits:X}: {reason}")]
    InvalidOptions { bits: u32, reason: String },

    /// Options argument on a call that defines none
    #[error("No options are defined for {operation}")]
    NoOptionsDefined { operation: String },

    // ===== Parameter errors =====
    /// Required argument not supplied
    #[error("Missing required argument: {name}")]
    MissingArgument { name: String },

    /// Empty namespace URI or prefix
    #[error("Empty namespace URI or prefix")]
    EmptyNamespace,

    /// Alias re-registered with a different array form
    #[error("Mismatch with existing alias array form: {alias}")]
    AliasArrayFormMismatch { alias: String },

    /// Alias re-registered with a different actual path length
    #[error("Mismatch with existing actual path: {alias}")]
    AliasPathMismatch { alias: String },

    /// Alias re-registered with a different actual property
    #[error("Mismatch with existing actual name: {alias} ({existing}, not {requested})")]
    AliasActualMismatch {
        alias: String,
        existing: String,
        requested: String,
    },

    /// Alias re-registered with a different synthetic item step
    #[error("Mismatch with existing actual array item: {alias}")]
    AliasItemMismatch { alias: String },

    /// Alias chain that would select an array item of an array item
    #[error("Can't alias an array item to an array item: {alias}")]
    ArrayItemToArrayItem { alias: String },

    /// Alias whose actual is the alias itself
    #[error("Alias cannot refer to itself: {alias}")]
    SelfAlias { alias: String },

    /// Node handle that no longer refers to a live node
    #[error("Stale or unknown node handle: {handle}")]
    StaleNode { handle: String },

    /// Named child or qualifier already present on the parent
    #[error("Child {name} already exists")]
    DuplicateChild { name: String },

    // ===== Schema / name errors =====
    /// Namespace URI that has not been registered
    #[error("Unregistered schema namespace URI: {namespace_uri}")]
    UnregisteredSchema { namespace_uri: String },

    /// Prefix that has not been registered
    #[error("Unknown namespace prefix: {prefix}")]
    UnknownPrefix { prefix: String },

    /// Prefix that is not a simple XML name
    #[error("Invalid XML name: {name}")]
    InvalidXmlName { name: String },

    /// Text that is not UTF-8
    #[error("Invalid UTF-8 in {context} at byte {offset}")]
    InvalidUtf8 { context: String, offset: usize },

    // ===== Value errors =====
    /// Value assigned to a node that cannot hold one (composite, schema or root)
    #[error("Node cannot hold a value: {name}")]
    ValueNotAllowed { name: String },

    // ===== Lifecycle / internal errors =====
    /// The library has not been initialised
    #[error("Library not initialized")]
    NotInitialized,

    /// A dependent subsystem failed to initialise
    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// Intentionally unsupported operation
    #[error("Unimplemented method {operation}")]
    Unimplemented { operation: String },
}

impl XmpError {
    /// Classify this error into the canonical taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            XmpError::EmptyPath
            | XmpError::AliasNotSimple { .. }
            | XmpError::PrefixMismatch { .. }
            | XmpError::NamedChildNotAllowed { .. }
            | XmpError::NamedChildOfArray { .. }
            | XmpError::PlaceholderNotAllowed { .. }
            | XmpError::IndexOnNonArray { .. }
            | XmpError::BadArrayIndex { .. }
            | XmpError::BadSelector { .. }
            | XmpError::FieldSelectorOnNonStruct { .. }
            | XmpError::QualifierNotAllowed { .. }
            | XmpError::NotAnArray { .. }
            | XmpError::NotSimpleName { .. }
            | XmpError::UnexpectedStep { .. } => ErrorKind::BadXPath,

            XmpError::OnlyArrayFormAllowed { .. }
            | XmpError::InvalidOptions { .. }
            | XmpError::NoOptionsDefined { .. } => ErrorKind::BadOptions,

            XmpError::MissingArgument { .. }
            | XmpError::EmptyNamespace
            | XmpError::AliasArrayFormMismatch { .. }
            | XmpError::AliasPathMismatch { .. }
            | XmpError::AliasActualMismatch { .. }
            | XmpError::AliasItemMismatch { .. }
            | XmpError::ArrayItemToArrayItem { .. }
            | XmpError::SelfAlias { .. }
            | XmpError::StaleNode { .. }
            | XmpError::DuplicateChild { .. } => ErrorKind::BadParam,

            XmpError::UnregisteredSchema { .. } | XmpError::UnknownPrefix { .. } => {
                ErrorKind::BadSchema
            }

            XmpError::InvalidXmlName { .. } => ErrorKind::BadXml,
            XmpError::InvalidUtf8 { .. } => ErrorKind::BadUtf8,
            XmpError::ValueNotAllowed { .. } => ErrorKind::BadValue,

            XmpError::NotInitialized
            | XmpError::InitializationFailed { .. }
            | XmpError::Internal { .. } => ErrorKind::InternalFailure,

            XmpError::Unimplemented { .. } => ErrorKind::Unimplemented,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    fn property(&self) -> Option<&str> {
        match self {
            XmpError::AliasNotSimple { name }
            | XmpError::PrefixMismatch { name, .. }
            | XmpError::NamedChildNotAllowed { name }
            | XmpError::NamedChildOfArray { name }
            | XmpError::IndexOnNonArray { name }
            | XmpError::FieldSelectorOnNonStruct { name }
            | XmpError::QualifierNotAllowed { name }
            | XmpError::NotAnArray { name }
            | XmpError::NotSimpleName { name }
            | XmpError::DuplicateChild { name }
            | XmpError::ValueNotAllowed { name } => Some(name.as_str()),
            XmpError::AliasArrayFormMismatch { alias }
            | XmpError::AliasPathMismatch { alias }
            | XmpError::AliasActualMismatch { alias, .. }
            | XmpError::AliasItemMismatch { alias }
            | XmpError::ArrayItemToArrayItem { alias }
            | XmpError::SelfAlias { alias } => Some(alias.as_str()),
            XmpError::BadArrayIndex { step } | XmpError::BadSelector { step } => {
                Some(step.as_str())
            }
            _ => None,
        }
    }
}

/// Conversion from XmpError to ExError
///
/// The message keeps the variant's display text so that notification
/// callbacks see the same wording the error would print.
impl From<XmpError> for ExError {
    fn from(err: XmpError) -> Self {
        let mut ex = ExError::new(err.kind()).with_message(err.to_string());
        if let Some(property) = err.property() {
            ex = ex.with_property(property);
        }
        if let XmpError::Unimplemented { operation } = &err {
            ex = ex.with_op(operation.clone());
        }
        ex
    }
}

impl From<&XmpError> for ExError {
    fn from(err: &XmpError) -> Self {
        err.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_codes_are_distinct() {
        let kinds = [
            ErrorKind::BadXPath,
            ErrorKind::BadOptions,
            ErrorKind::BadParam,
            ErrorKind::BadSchema,
            ErrorKind::BadXml,
            ErrorKind::BadUtf8,
            ErrorKind::BadValue,
            ErrorKind::InternalFailure,
            ErrorKind::Unimplemented,
        ];
        let mut codes: Vec<_> = kinds.iter().map(|k| k.code()).collect();
        codes.sort();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_alias_conflicts_are_bad_param() {
        let err = XmpError::ArrayItemToArrayItem {
            alias: "xmp:Author".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::BadParam);
        assert_eq!(err.code(), "ERR_BAD_PARAM");
    }

    #[test]
    fn test_ex_error_carries_property_and_message() {
        let ex: ExError = XmpError::AliasNotSimple {
            name: "dc:creator[1]".to_string(),
        }
        .into();
        assert_eq!(ex.kind(), ErrorKind::BadXPath);
        assert_eq!(ex.property(), Some("dc:creator[1]"));
        assert!(ex.message().contains("must be simple"));
        assert!(!ex.is_notified());
    }

    #[test]
    fn test_unimplemented_records_operation() {
        let ex: ExError = XmpError::Unimplemented {
            operation: "DeleteNamespace".to_string(),
        }
        .into();
        assert_eq!(ex.kind(), ErrorKind::Unimplemented);
        assert_eq!(ex.op(), Some("DeleteNamespace"));
    }

    #[test]
    fn test_display_includes_code() {
        let ex = ExError::new(ErrorKind::BadOptions)
            .with_op("clone")
            .with_message("No options are defined");
        let text = ex.to_string();
        assert!(text.starts_with("[ERR_BAD_OPTIONS]"));
        assert!(text.contains("clone"));
    }
}
