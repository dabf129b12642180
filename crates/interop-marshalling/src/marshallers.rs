//! Custom Marshaller Mode Table
//!
//! A custom marshaller can implement different shapes depending on where it
//! is used: the direction data flows and which side of the boundary makes the
//! call. [`CustomTypeMarshallers`] maps each [`MarshalMode`] the marshaller
//! supports to the [`CustomTypeMarshallerData`] describing it.
//!
//! ## Modes
//!
//! | Role | In | Ref | Out |
//! |------|----|-----|-----|
//! | managed caller | `ManagedToUnmanagedIn` | `ManagedToUnmanagedRef` | `ManagedToUnmanagedOut` |
//! | unmanaged caller | `UnmanagedToManagedIn` | `UnmanagedToManagedRef` | `UnmanagedToManagedOut` |
//! | collection element | `ElementIn` | `ElementRef` | `ElementOut` |
//!
//! `Default` applies to any mode the marshaller does not list explicitly.

use bitflags::bitflags;
use indexmap::IndexMap;
use interop_types::ManagedTypeInfo;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{BuildHasherDefault, Hash, Hasher};
use std::sync::Arc;

use crate::MarshallingInfo;

/// Insertion-ordered map using the Fx hasher
pub type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

// ============================================================================
// Modes
// ============================================================================

/// Direction data flows through a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarshalDirection {
    In,
    Ref,
    Out,
}

/// Which side of the boundary is calling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarshalRole {
    /// Managed code calls into unmanaged code
    ManagedToUnmanaged,
    /// Unmanaged code calls into managed code
    UnmanagedToManaged,
    /// The value is an element of a marshalled collection
    Element,
}

/// The context a custom marshaller is used in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarshalMode {
    Default,
    ManagedToUnmanagedIn,
    ManagedToUnmanagedRef,
    ManagedToUnmanagedOut,
    UnmanagedToManagedIn,
    UnmanagedToManagedRef,
    UnmanagedToManagedOut,
    ElementIn,
    ElementRef,
    ElementOut,
}

impl MarshalMode {
    pub const ALL: [MarshalMode; 10] = [
        MarshalMode::Default,
        MarshalMode::ManagedToUnmanagedIn,
        MarshalMode::ManagedToUnmanagedRef,
        MarshalMode::ManagedToUnmanagedOut,
        MarshalMode::UnmanagedToManagedIn,
        MarshalMode::UnmanagedToManagedRef,
        MarshalMode::UnmanagedToManagedOut,
        MarshalMode::ElementIn,
        MarshalMode::ElementRef,
        MarshalMode::ElementOut,
    ];

    pub fn from_parts(role: MarshalRole, direction: MarshalDirection) -> Self {
        use MarshalDirection::*;
        use MarshalRole::*;
        match (role, direction) {
            (ManagedToUnmanaged, In) => MarshalMode::ManagedToUnmanagedIn,
            (ManagedToUnmanaged, Ref) => MarshalMode::ManagedToUnmanagedRef,
            (ManagedToUnmanaged, Out) => MarshalMode::ManagedToUnmanagedOut,
            (UnmanagedToManaged, In) => MarshalMode::UnmanagedToManagedIn,
            (UnmanagedToManaged, Ref) => MarshalMode::UnmanagedToManagedRef,
            (UnmanagedToManaged, Out) => MarshalMode::UnmanagedToManagedOut,
            (Element, In) => MarshalMode::ElementIn,
            (Element, Ref) => MarshalMode::ElementRef,
            (Element, Out) => MarshalMode::ElementOut,
        }
    }

    /// Split into role and direction; `None` for `Default`
    pub fn parts(self) -> Option<(MarshalRole, MarshalDirection)> {
        use MarshalDirection::*;
        use MarshalRole::*;
        let parts = match self {
            MarshalMode::Default => return None,
            MarshalMode::ManagedToUnmanagedIn => (ManagedToUnmanaged, In),
            MarshalMode::ManagedToUnmanagedRef => (ManagedToUnmanaged, Ref),
            MarshalMode::ManagedToUnmanagedOut => (ManagedToUnmanaged, Out),
            MarshalMode::UnmanagedToManagedIn => (UnmanagedToManaged, In),
            MarshalMode::UnmanagedToManagedRef => (UnmanagedToManaged, Ref),
            MarshalMode::UnmanagedToManagedOut => (UnmanagedToManaged, Out),
            MarshalMode::ElementIn => (Element, In),
            MarshalMode::ElementRef => (Element, Ref),
            MarshalMode::ElementOut => (Element, Out),
        };
        Some(parts)
    }

    pub fn role(self) -> Option<MarshalRole> {
        self.parts().map(|(role, _)| role)
    }

    pub fn direction(self) -> Option<MarshalDirection> {
        self.parts().map(|(_, direction)| direction)
    }
}

impl fmt::Display for MarshalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ============================================================================
// Shapes
// ============================================================================

bitflags! {
    /// The marshalling members a custom marshaller implements for a mode.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MarshallerShape: u32 {
        /// Converts a managed value to its unmanaged form
        const TO_UNMANAGED = 1 << 0;
        /// Two-phase conversion into a caller-provided scratch buffer
        const CALLER_ALLOCATED_BUFFER = 1 << 1;
        const STATELESS_PINNABLE_REFERENCE = 1 << 2;
        const STATEFUL_PINNABLE_REFERENCE = 1 << 3;
        /// Converts an unmanaged value back to its managed form
        const TO_MANAGED = 1 << 4;
        /// The managed conversion runs even when the call fails
        const GUARANTEED_UNMARSHAL = 1 << 5;
        const FREE = 1 << 6;
        const ON_INVOKED = 1 << 7;
    }
}

// ============================================================================
// Per-Mode Data
// ============================================================================

/// What a custom marshaller looks like in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomTypeMarshallerData {
    pub marshaller_type: ManagedTypeInfo,
    /// The unmanaged type the marshaller produces
    pub native_type: ManagedTypeInfo,
    /// Whether the marshaller keeps state between its calls
    pub has_state: bool,
    pub shape: MarshallerShape,
    pub is_strictly_blittable: bool,
    /// Element type of the scratch buffer for `CALLER_ALLOCATED_BUFFER`
    pub buffer_element_type: Option<ManagedTypeInfo>,
    /// Element type, for collection marshallers
    pub collection_element_type: Option<ManagedTypeInfo>,
    /// How each element is marshalled, for collection marshallers
    pub collection_element_marshalling_info: Option<Arc<MarshallingInfo>>,
}

impl CustomTypeMarshallerData {
    /// Data for a scalar marshaller, with no buffer or collection details
    pub fn scalar(
        marshaller_type: ManagedTypeInfo,
        native_type: ManagedTypeInfo,
        has_state: bool,
        shape: MarshallerShape,
        is_strictly_blittable: bool,
    ) -> Self {
        Self {
            marshaller_type,
            native_type,
            has_state,
            shape,
            is_strictly_blittable,
            buffer_element_type: None,
            collection_element_type: None,
            collection_element_marshalling_info: None,
        }
    }

    pub fn with_buffer_element_type(mut self, buffer_element_type: ManagedTypeInfo) -> Self {
        self.buffer_element_type = Some(buffer_element_type);
        self
    }

    /// Attach the element type and element marshalling of a collection
    pub fn with_collection_element(
        mut self,
        element_type: ManagedTypeInfo,
        element_info: MarshallingInfo,
    ) -> Self {
        self.collection_element_type = Some(element_type);
        self.collection_element_marshalling_info = Some(Arc::new(element_info));
        self
    }

    pub fn element_marshalling_info(&self) -> Option<&MarshallingInfo> {
        self.collection_element_marshalling_info.as_deref()
    }
}

// ============================================================================
// Mode Table
// ============================================================================

/// The modes a custom marshaller supports, in declaration order.
///
/// Iteration follows insertion order, so a table reads back exactly as it
/// was built. Equality and hashing ignore that order: two tables holding the
/// same entries are the same table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomTypeMarshallers {
    modes: FxIndexMap<MarshalMode, CustomTypeMarshallerData>,
}

impl CustomTypeMarshallers {
    /// Build a table from its entries. A repeated mode replaces the earlier
    /// entry's data but keeps its position.
    pub fn new(modes: impl IntoIterator<Item = (MarshalMode, CustomTypeMarshallerData)>) -> Self {
        Self {
            modes: modes.into_iter().collect(),
        }
    }

    /// A table with exactly one mode
    pub fn single(mode: MarshalMode, data: CustomTypeMarshallerData) -> Self {
        Self::new([(mode, data)])
    }

    pub fn modes(&self) -> &FxIndexMap<MarshalMode, CustomTypeMarshallerData> {
        &self.modes
    }

    /// The data for exactly `mode`. Nothing is synthesized.
    pub fn get(&self, mode: MarshalMode) -> Option<&CustomTypeMarshallerData> {
        self.modes.get(&mode)
    }

    /// The data for `mode`, falling back to an explicit `Default` entry
    pub fn get_or_default(&self, mode: MarshalMode) -> Option<&CustomTypeMarshallerData> {
        self.get(mode).or_else(|| self.get(MarshalMode::Default))
    }

    pub fn is_defined_or_default(&self, mode: MarshalMode) -> bool {
        self.get_or_default(mode).is_some()
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, MarshalMode, CustomTypeMarshallerData> {
        self.modes.iter()
    }
}

impl FromIterator<(MarshalMode, CustomTypeMarshallerData)> for CustomTypeMarshallers {
    fn from_iter<I: IntoIterator<Item = (MarshalMode, CustomTypeMarshallerData)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a> IntoIterator for &'a CustomTypeMarshallers {
    type Item = (&'a MarshalMode, &'a CustomTypeMarshallerData);
    type IntoIter = indexmap::map::Iter<'a, MarshalMode, CustomTypeMarshallerData>;

    fn into_iter(self) -> Self::IntoIter {
        self.modes.iter()
    }
}

impl PartialEq for CustomTypeMarshallers {
    fn eq(&self, other: &Self) -> bool {
        self.modes.len() == other.modes.len()
            && self
                .modes
                .iter()
                .all(|(mode, data)| other.modes.get(mode) == Some(data))
    }
}

impl Eq for CustomTypeMarshallers {}

impl Hash for CustomTypeMarshallers {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Entries are hashed separately and summed so the result is order-free
        let combined = self.modes.iter().fold(0u64, |acc, entry| {
            let mut hasher = FxHasher::default();
            entry.hash(&mut hasher);
            acc.wrapping_add(hasher.finish())
        });
        self.modes.len().hash(state);
        combined.hash(state);
    }
}
