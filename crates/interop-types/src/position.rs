//! Signature Positions
//!
//! A [`TypePositionInfo`] identifies one element of a call signature: a
//! parameter or the return value. Each element has two independent indices,
//! one in the managed signature and one in the unmanaged signature, and
//! either may be absent (an element that only exists on one side, such as
//! the native `HRESULT` return of a COM method).
//!
//! ## Placeholders
//!
//! Upstream model building sometimes inserts positions with *neither* index
//! set, to stand in for elements that failed to resolve without producing a
//! second round of diagnostics. Such positions are not live: they never take
//! part in dependency graphs. See [`TypePositionInfo::is_live`].

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

use crate::ManagedTypeInfo;

/// An index into one side of a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SignatureIndex {
    /// Zero-based parameter ordinal
    Param(u32),
    /// The return value
    Return,
}

impl fmt::Display for SignatureIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureIndex::Param(index) => write!(f, "#{}", index),
            SignatureIndex::Return => f.write_str("return"),
        }
    }
}

/// How a parameter is passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RefKind {
    /// By value
    #[default]
    None,
    In,
    Ref,
    Out,
    RefReadonlyParameter,
}

impl RefKind {
    pub fn is_by_ref(self) -> bool {
        !matches!(self, RefKind::None)
    }
}

/// Identity of a live position within one signature.
///
/// The managed index wins when present; native-only positions are keyed by
/// their native index so they never collide with managed ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PositionKey {
    Managed(SignatureIndex),
    Native(SignatureIndex),
}

impl fmt::Display for PositionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionKey::Managed(index) => write!(f, "managed {}", index),
            PositionKey::Native(index) => write!(f, "native {}", index),
        }
    }
}

/// One parameter or return value of a signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypePositionInfo {
    /// The parameter name, or [`TypePositionInfo::RETURN_VALUE_IDENTIFIER`]
    pub instance_identifier: SmolStr,
    /// The managed type of the element
    pub managed_type: ManagedTypeInfo,
    pub ref_kind: RefKind,
    /// Position in the managed signature, if the element appears there
    pub managed_index: Option<SignatureIndex>,
    /// Position in the unmanaged signature, if the element appears there
    pub native_index: Option<SignatureIndex>,
}

impl TypePositionInfo {
    /// Identifier used for return value positions
    pub const RETURN_VALUE_IDENTIFIER: &'static str = "__retVal";

    /// Create a position with neither index set
    pub fn new(instance_identifier: impl Into<SmolStr>, managed_type: ManagedTypeInfo) -> Self {
        Self {
            instance_identifier: instance_identifier.into(),
            managed_type,
            ref_kind: RefKind::None,
            managed_index: None,
            native_index: None,
        }
    }

    /// Create a parameter that sits at `index` on both sides of the signature
    pub fn parameter(
        instance_identifier: impl Into<SmolStr>,
        managed_type: ManagedTypeInfo,
        index: u32,
    ) -> Self {
        Self::new(instance_identifier, managed_type)
            .with_managed_index(SignatureIndex::Param(index))
            .with_native_index(SignatureIndex::Param(index))
    }

    /// Create the return value position on both sides of the signature
    pub fn return_value(managed_type: ManagedTypeInfo) -> Self {
        Self::new(Self::RETURN_VALUE_IDENTIFIER, managed_type)
            .with_managed_index(SignatureIndex::Return)
            .with_native_index(SignatureIndex::Return)
    }

    pub fn with_managed_index(mut self, index: SignatureIndex) -> Self {
        self.managed_index = Some(index);
        self
    }

    pub fn with_native_index(mut self, index: SignatureIndex) -> Self {
        self.native_index = Some(index);
        self
    }

    pub fn with_ref_kind(mut self, ref_kind: RefKind) -> Self {
        self.ref_kind = ref_kind;
        self
    }

    /// Returns true if at least one index is set.
    ///
    /// Positions with no index at all are placeholders and must be skipped
    /// wherever dependencies are enumerated.
    pub fn is_live(&self) -> bool {
        self.managed_index.is_some() || self.native_index.is_some()
    }

    /// Returns true if either side places this element at the return slot
    pub fn is_return(&self) -> bool {
        self.managed_index == Some(SignatureIndex::Return)
            || self.native_index == Some(SignatureIndex::Return)
    }

    /// The identity of this position, or `None` for placeholders
    pub fn position_key(&self) -> Option<PositionKey> {
        match (self.managed_index, self.native_index) {
            (Some(index), _) => Some(PositionKey::Managed(index)),
            (None, Some(index)) => Some(PositionKey::Native(index)),
            (None, None) => None,
        }
    }
}

impl fmt::Display for TypePositionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.instance_identifier, self.managed_type)
    }
}
