//! Node option flags
//!
//! A node's options are held as a typed value: node kind, composite form
//! (with the array sub-form inside the array variant) and a set of marker
//! flags. The typed value cannot express two composite forms at once. The
//! 32-bit option word used by the diagnostic dumps is produced by
//! [`NodeOptions::bits`] and decoded by [`NodeOptions::from_bits`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, XmpError};

/// Raw bit layout of the option word.
pub mod raw {
    pub const VALUE_IS_URI: u32 = 0x0000_0002;
    pub const HAS_QUALIFIERS: u32 = 0x0000_0010;
    pub const IS_QUALIFIER: u32 = 0x0000_0020;
    pub const HAS_LANG: u32 = 0x0000_0040;
    pub const HAS_TYPE: u32 = 0x0000_0080;
    pub const VALUE_IS_STRUCT: u32 = 0x0000_0100;
    pub const VALUE_IS_ARRAY: u32 = 0x0000_0200;
    pub const ARRAY_IS_ORDERED: u32 = 0x0000_0400;
    pub const ARRAY_IS_ALTERNATE: u32 = 0x0000_0800;
    pub const ARRAY_IS_ALT_TEXT: u32 = 0x0000_1000;
    pub const IS_ALIAS: u32 = 0x0001_0000;
    pub const HAS_ALIASES: u32 = 0x0002_0000;
    pub const IS_INTERNAL: u32 = 0x0004_0000;
    pub const IS_STABLE: u32 = 0x0010_0000;
    pub const IS_DERIVED: u32 = 0x0020_0000;
    pub const IS_STALE: u32 = 0x0040_0000;
    pub const SCHEMA_NODE: u32 = 0x8000_0000;

    pub const COMPOSITE_MASK: u32 = VALUE_IS_STRUCT | VALUE_IS_ARRAY;
    pub const ARRAY_FORM_MASK: u32 =
        VALUE_IS_ARRAY | ARRAY_IS_ORDERED | ARRAY_IS_ALTERNATE | ARRAY_IS_ALT_TEXT;
}

bitflags! {
    /// Derived and stability markers carried alongside kind and form.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Markers: u32 {
        const VALUE_IS_URI = raw::VALUE_IS_URI;
        const HAS_QUALIFIERS = raw::HAS_QUALIFIERS;
        const HAS_LANG = raw::HAS_LANG;
        const HAS_TYPE = raw::HAS_TYPE;
        const IS_ALIAS = raw::IS_ALIAS;
        const HAS_ALIASES = raw::HAS_ALIASES;
        const IS_INTERNAL = raw::IS_INTERNAL;
        const IS_STABLE = raw::IS_STABLE;
        const IS_DERIVED = raw::IS_DERIVED;
        const IS_STALE = raw::IS_STALE;
    }
}

/// What role a node plays in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeKind {
    /// Property, struct field or array item
    #[default]
    Property,
    /// Qualifier attached to another node
    Qualifier,
    /// Top-level namespace node
    Schema,
}

/// Array sub-form. Forms are cumulative in the option word: alt-text
/// implies alternate, alternate implies ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrayForm {
    Unordered,
    Ordered,
    Alternate,
    AltText,
}

impl ArrayForm {
    /// Option-word bits for this form, including the array bit
    pub fn bits(self) -> u32 {
        match self {
            ArrayForm::Unordered => raw::VALUE_IS_ARRAY,
            ArrayForm::Ordered => raw::VALUE_IS_ARRAY | raw::ARRAY_IS_ORDERED,
            ArrayForm::Alternate => {
                raw::VALUE_IS_ARRAY | raw::ARRAY_IS_ORDERED | raw::ARRAY_IS_ALTERNATE
            }
            ArrayForm::AltText => raw::ARRAY_FORM_MASK,
        }
    }

    /// Decode an array-form argument.
    ///
    /// Zero means "no array form". Any bit outside the array-form mask is
    /// rejected; implied bits are filled in.
    ///
    /// # Errors
    /// * `OnlyArrayFormAllowed` - If `bits` carries non array-form flags
    pub fn from_bits(bits: u32) -> Result<Option<ArrayForm>> {
        if bits & !raw::ARRAY_FORM_MASK != 0 {
            return Err(XmpError::OnlyArrayFormAllowed { bits });
        }
        Ok(Self::decode(bits))
    }

    fn decode(bits: u32) -> Option<ArrayForm> {
        if bits & raw::ARRAY_IS_ALT_TEXT != 0 {
            Some(ArrayForm::AltText)
        } else if bits & raw::ARRAY_IS_ALTERNATE != 0 {
            Some(ArrayForm::Alternate)
        } else if bits & raw::ARRAY_IS_ORDERED != 0 {
            Some(ArrayForm::Ordered)
        } else if bits & raw::VALUE_IS_ARRAY != 0 {
            Some(ArrayForm::Unordered)
        } else {
            None
        }
    }
}

/// Composite form of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Form {
    #[default]
    Simple,
    Struct,
    Array(ArrayForm),
}

impl Form {
    /// Ordering rank used when unordered-array items are not both simple
    pub fn rank(self) -> u8 {
        match self {
            Form::Simple => 0,
            Form::Struct => 1,
            Form::Array(_) => 2,
        }
    }

    fn bits(self) -> u32 {
        match self {
            Form::Simple => 0,
            Form::Struct => raw::VALUE_IS_STRUCT,
            Form::Array(form) => form.bits(),
        }
    }
}

/// Full option set of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct NodeOptions {
    pub kind: NodeKind,
    pub form: Form,
    pub markers: Markers,
}

impl NodeOptions {
    /// Simple property with no markers
    pub fn simple() -> Self {
        Self::default()
    }

    /// Struct property
    pub fn structure() -> Self {
        Self {
            form: Form::Struct,
            ..Self::default()
        }
    }

    /// Array property of the given form
    pub fn array(form: ArrayForm) -> Self {
        Self {
            form: Form::Array(form),
            ..Self::default()
        }
    }

    /// Schema (namespace) node
    pub fn schema() -> Self {
        Self {
            kind: NodeKind::Schema,
            ..Self::default()
        }
    }

    /// Simple qualifier
    pub fn qualifier() -> Self {
        Self {
            kind: NodeKind::Qualifier,
            ..Self::default()
        }
    }

    pub fn is_schema(&self) -> bool {
        self.kind == NodeKind::Schema
    }

    pub fn is_qualifier(&self) -> bool {
        self.kind == NodeKind::Qualifier
    }

    pub fn is_simple(&self) -> bool {
        self.form == Form::Simple
    }

    pub fn is_struct(&self) -> bool {
        self.form == Form::Struct
    }

    pub fn is_array(&self) -> bool {
        matches!(self.form, Form::Array(_))
    }

    pub fn is_composite(&self) -> bool {
        !self.is_simple()
    }

    /// Array sub-form, if this is an array
    pub fn array_form(&self) -> Option<ArrayForm> {
        match self.form {
            Form::Array(form) => Some(form),
            _ => None,
        }
    }

    pub fn is_unordered_array(&self) -> bool {
        self.array_form() == Some(ArrayForm::Unordered)
    }

    pub fn is_alt_text(&self) -> bool {
        self.array_form() == Some(ArrayForm::AltText)
    }

    pub fn has_lang(&self) -> bool {
        self.markers.contains(Markers::HAS_LANG)
    }

    pub fn has_type(&self) -> bool {
        self.markers.contains(Markers::HAS_TYPE)
    }

    pub fn has_qualifiers(&self) -> bool {
        self.markers.contains(Markers::HAS_QUALIFIERS)
    }

    pub fn is_alias(&self) -> bool {
        self.markers.contains(Markers::IS_ALIAS)
    }

    /// Encode into the 32-bit option word
    pub fn bits(&self) -> u32 {
        let kind = match self.kind {
            NodeKind::Property => 0,
            NodeKind::Qualifier => raw::IS_QUALIFIER,
            NodeKind::Schema => raw::SCHEMA_NODE,
        };
        kind | self.form.bits() | self.markers.bits()
    }

    /// Decode a 32-bit option word.
    ///
    /// Implied array-form bits are filled in, so `from_bits(0x1000)` decodes
    /// to an alt-text array whose `bits()` is `0x1E00`.
    ///
    /// # Errors
    /// * `InvalidOptions` - If the word carries schema and qualifier together,
    ///   struct and array together, a composite form on a schema node, or bits
    ///   outside the known layout
    pub fn from_bits(bits: u32) -> Result<Self> {
        let invalid = |reason: &str| XmpError::InvalidOptions {
            bits,
            reason: reason.to_string(),
        };

        let kind = match (bits & raw::SCHEMA_NODE != 0, bits & raw::IS_QUALIFIER != 0) {
            (true, true) => return Err(invalid("schema node cannot be a qualifier")),
            (true, false) => NodeKind::Schema,
            (false, true) => NodeKind::Qualifier,
            (false, false) => NodeKind::Property,
        };

        let is_struct = bits & raw::VALUE_IS_STRUCT != 0;
        let form = match (is_struct, ArrayForm::decode(bits & raw::ARRAY_FORM_MASK)) {
            (true, Some(_)) => return Err(invalid("struct and array are exclusive")),
            (true, None) => Form::Struct,
            (false, Some(form)) => Form::Array(form),
            (false, None) => Form::Simple,
        };
        if kind == NodeKind::Schema && form != Form::Simple {
            return Err(invalid("schema nodes carry no composite form"));
        }

        let rest = bits
            & !(raw::SCHEMA_NODE | raw::IS_QUALIFIER | raw::VALUE_IS_STRUCT | raw::ARRAY_FORM_MASK);
        let markers = Markers::from_bits(rest).ok_or_else(|| invalid("unknown option bits"))?;

        Ok(Self {
            kind,
            form,
            markers,
        })
    }
}
