//! Marshalling Information
//!
//! [`MarshallingInfo`] is the closed set of answers to "how is this value
//! marshalled". Values are built once per signature element while the model
//! is computed and are never mutated afterwards.
//!
//! ## Dependencies
//!
//! A linear collection can depend on other signature elements: the element
//! that supplies its length, and whatever its element marshaller depends on
//! in turn. [`MarshallingInfo::dependencies`] enumerates those positions so
//! the emitter can generate them first. Placeholder positions (no index on
//! either side) are never reported.

use interop_types::{ManagedTypeInfo, TypePositionInfo};
use serde::{Deserialize, Serialize};

use crate::{CharEncoding, CountInfo, CustomTypeMarshallers};

/// Lazily evaluated dependency positions of a [`MarshallingInfo`]
pub type Dependencies<'a> = Box<dyn Iterator<Item = &'a TypePositionInfo> + 'a>;

// ============================================================================
// Marshalling Info
// ============================================================================

/// How a value is marshalled across the native boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MarshallingInfo {
    /// No marshalling information exists for the type
    #[default]
    NoMarshalling,
    /// Only the string encoding is known
    StringSupport(CharEncoding),
    /// The type can be passed to native code as-is
    UnmanagedBlittable {
        /// Blittable by the rules of the built-in runtime marshallers
        is_strictly_blittable: bool,
    },
    /// A user-defined marshaller applied to a scalar value
    CustomType(CustomTypeMarshallingInfo),
    /// A user-defined marshaller applied to a collection
    CustomLinearCollection(LinearCollectionMarshallingInfo),
    /// Exceptions are converted to the unmanaged return value.
    ///
    /// Carries no data. The concrete marshaller depends on the unmanaged
    /// return type and is produced by
    /// [`derive_com_exception_marshalling`](crate::derive_com_exception_marshalling).
    ComException,
}

impl MarshallingInfo {
    pub fn is_none(&self) -> bool {
        matches!(self, MarshallingInfo::NoMarshalling)
    }

    /// The custom marshaller details shared by scalar and collection marshalling
    pub fn as_custom_type(&self) -> Option<&CustomTypeMarshallingInfo> {
        match self {
            MarshallingInfo::CustomType(info) => Some(info),
            MarshallingInfo::CustomLinearCollection(info) => Some(&info.custom),
            _ => None,
        }
    }

    pub fn as_linear_collection(&self) -> Option<&LinearCollectionMarshallingInfo> {
        match self {
            MarshallingInfo::CustomLinearCollection(info) => Some(info),
            _ => None,
        }
    }

    /// Positions this marshalling depends on.
    ///
    /// Only linear collections have dependencies. The iterator is recomputed
    /// on every call and yields the same sequence each time.
    pub fn dependencies(&self) -> Dependencies<'_> {
        match self {
            MarshallingInfo::CustomLinearCollection(info) => Box::new(info.element_dependencies()),
            _ => Box::new(std::iter::empty()),
        }
    }
}

// ============================================================================
// Custom Marshallers
// ============================================================================

/// A custom marshaller for a scalar value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomTypeMarshallingInfo {
    /// The type named by the marshalling attribute
    pub entry_point_type: ManagedTypeInfo,
    pub marshallers: CustomTypeMarshallers,
}

impl CustomTypeMarshallingInfo {
    pub fn new(entry_point_type: ManagedTypeInfo, marshallers: CustomTypeMarshallers) -> Self {
        Self {
            entry_point_type,
            marshallers,
        }
    }
}

impl From<CustomTypeMarshallingInfo> for MarshallingInfo {
    fn from(info: CustomTypeMarshallingInfo) -> Self {
        MarshallingInfo::CustomType(info)
    }
}

/// A custom marshaller for a linear collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinearCollectionMarshallingInfo {
    pub custom: CustomTypeMarshallingInfo,
    /// How the collection's length is found
    pub element_count_info: CountInfo,
    /// Stands in for the element type when the entry point type is generic
    /// over it
    pub placeholder_type_parameter: ManagedTypeInfo,
}

impl LinearCollectionMarshallingInfo {
    pub fn new(
        entry_point_type: ManagedTypeInfo,
        marshallers: CustomTypeMarshallers,
        element_count_info: CountInfo,
        placeholder_type_parameter: ManagedTypeInfo,
    ) -> Self {
        Self {
            custom: CustomTypeMarshallingInfo::new(entry_point_type, marshallers),
            element_count_info,
            placeholder_type_parameter,
        }
    }

    pub fn entry_point_type(&self) -> &ManagedTypeInfo {
        &self.custom.entry_point_type
    }

    pub fn marshallers(&self) -> &CustomTypeMarshallers {
        &self.custom.marshallers
    }

    /// The count element first, then each mode's element dependencies in
    /// table order. Repeats are kept.
    fn element_dependencies(&self) -> impl Iterator<Item = &TypePositionInfo> + '_ {
        let count = self
            .element_count_info
            .count_element()
            .filter(|element| element.is_live());

        let nested = self
            .custom
            .marshallers
            .iter()
            .filter_map(|(_, data)| data.element_marshalling_info())
            .flat_map(MarshallingInfo::dependencies)
            .filter(|element| element.is_live());

        count.into_iter().chain(nested)
    }
}

impl From<LinearCollectionMarshallingInfo> for MarshallingInfo {
    fn from(info: LinearCollectionMarshallingInfo) -> Self {
        MarshallingInfo::CustomLinearCollection(info)
    }
}
