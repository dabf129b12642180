//! Managed and unmanaged type descriptors.
//!
//! A [`ManagedTypeInfo`] is identified by its fully qualified name. The
//! diagnostic name is the human-readable form used in messages, and the
//! [`ManagedTypeKind`] records the classification the stub emitter switches on.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

// ============================================================================
// Special Types
// ============================================================================

/// Primitive types that have a language keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialType {
    Void,
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    IntPtr,
    UIntPtr,
    String,
    Object,
}

impl SpecialType {
    /// The keyword spelling, which is also the full type name of the type.
    pub fn keyword(self) -> &'static str {
        match self {
            SpecialType::Void => "void",
            SpecialType::Boolean => "bool",
            SpecialType::Char => "char",
            SpecialType::SByte => "sbyte",
            SpecialType::Byte => "byte",
            SpecialType::Int16 => "short",
            SpecialType::UInt16 => "ushort",
            SpecialType::Int32 => "int",
            SpecialType::UInt32 => "uint",
            SpecialType::Int64 => "long",
            SpecialType::UInt64 => "ulong",
            SpecialType::Single => "float",
            SpecialType::Double => "double",
            SpecialType::IntPtr => "nint",
            SpecialType::UIntPtr => "nuint",
            SpecialType::String => "string",
            SpecialType::Object => "object",
        }
    }

    /// Returns true for the primitive value types (everything but `void`,
    /// `string` and `object`).
    pub fn is_primitive_value(self) -> bool {
        !matches!(
            self,
            SpecialType::Void | SpecialType::String | SpecialType::Object
        )
    }
}

impl fmt::Display for SpecialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ============================================================================
// Type Descriptors
// ============================================================================

/// Classification of a [`ManagedTypeInfo`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManagedTypeKind {
    /// A keyword primitive (`int`, `void`, `double`, ...)
    Special(SpecialType),
    /// A class or interface type
    Reference,
    /// A struct type
    Value {
        /// Whether the struct may only live on the stack
        is_byref_like: bool,
    },
    /// A data or function pointer
    Pointer { is_function_pointer: bool },
    /// A single-dimensional, zero-based array
    SzArray { element: Box<ManagedTypeInfo> },
    /// A generic type parameter
    TypeParameter,
    /// A delegate type
    Delegate,
}

/// A type as seen by the interop generator, identified by its full name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManagedTypeInfo {
    full_type_name: SmolStr,
    diagnostic_formatted_name: SmolStr,
    kind: ManagedTypeKind,
}

impl ManagedTypeInfo {
    /// Create a descriptor from its parts
    pub fn new(
        full_type_name: impl Into<SmolStr>,
        diagnostic_formatted_name: impl Into<SmolStr>,
        kind: ManagedTypeKind,
    ) -> Self {
        Self {
            full_type_name: full_type_name.into(),
            diagnostic_formatted_name: diagnostic_formatted_name.into(),
            kind,
        }
    }

    /// Descriptor for a keyword primitive
    pub fn special(special: SpecialType) -> Self {
        let keyword = special.keyword();
        Self::new(keyword, keyword, ManagedTypeKind::Special(special))
    }

    /// Descriptor for a class or interface
    pub fn reference(
        full_type_name: impl Into<SmolStr>,
        diagnostic_formatted_name: impl Into<SmolStr>,
    ) -> Self {
        Self::new(
            full_type_name,
            diagnostic_formatted_name,
            ManagedTypeKind::Reference,
        )
    }

    /// Descriptor for a struct
    pub fn value(
        full_type_name: impl Into<SmolStr>,
        diagnostic_formatted_name: impl Into<SmolStr>,
        is_byref_like: bool,
    ) -> Self {
        Self::new(
            full_type_name,
            diagnostic_formatted_name,
            ManagedTypeKind::Value { is_byref_like },
        )
    }

    /// Descriptor for a data pointer (`int*`) or function pointer
    pub fn pointer(
        full_type_name: impl Into<SmolStr>,
        diagnostic_formatted_name: impl Into<SmolStr>,
        is_function_pointer: bool,
    ) -> Self {
        Self::new(
            full_type_name,
            diagnostic_formatted_name,
            ManagedTypeKind::Pointer {
                is_function_pointer,
            },
        )
    }

    /// Descriptor for `element[]`
    pub fn sz_array(element: ManagedTypeInfo) -> Self {
        let full = format!("{}[]", element.full_type_name);
        let diagnostic = format!("{}[]", element.diagnostic_formatted_name);
        Self::new(
            full,
            diagnostic,
            ManagedTypeKind::SzArray {
                element: Box::new(element),
            },
        )
    }

    /// Descriptor for a generic type parameter such as `T`
    pub fn type_parameter(name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        Self::new(name.clone(), name, ManagedTypeKind::TypeParameter)
    }

    /// Descriptor for a delegate type
    pub fn delegate(
        full_type_name: impl Into<SmolStr>,
        diagnostic_formatted_name: impl Into<SmolStr>,
    ) -> Self {
        Self::new(
            full_type_name,
            diagnostic_formatted_name,
            ManagedTypeKind::Delegate,
        )
    }

    pub fn full_type_name(&self) -> &str {
        &self.full_type_name
    }

    pub fn diagnostic_formatted_name(&self) -> &str {
        &self.diagnostic_formatted_name
    }

    pub fn kind(&self) -> &ManagedTypeKind {
        &self.kind
    }

    /// The keyword primitive this type is, if any
    pub fn special_type(&self) -> Option<SpecialType> {
        match self.kind {
            ManagedTypeKind::Special(special) => Some(special),
            _ => None,
        }
    }

    /// Returns true for data and function pointers
    pub fn is_pointer(&self) -> bool {
        matches!(self.kind, ManagedTypeKind::Pointer { .. })
    }

    /// The element type of an array, if this is one
    pub fn array_element(&self) -> Option<&ManagedTypeInfo> {
        match &self.kind {
            ManagedTypeKind::SzArray { element } => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for ManagedTypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.diagnostic_formatted_name)
    }
}
