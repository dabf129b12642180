//! Element Count Model
//!
//! Describes how the length of a marshalled collection is known, without
//! evaluating it. Turning a [`CountInfo`] into a runtime length is the stub
//! emitter's job.
//!
//! No validation happens here: a negative constant size is representable and
//! is rejected, if at all, by whoever builds the model.

use interop_types::TypePositionInfo;
use serde::{Deserialize, Serialize};

/// How the number of elements in a collection is determined.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CountInfo {
    /// The length is not statically known
    #[default]
    NoCount,
    /// A fixed number of elements
    ConstSize { size: i32 },
    /// The length is the runtime value of another parameter or of the return
    /// value
    CountElement(TypePositionInfo),
    /// A constant, a parameter, or both
    SizeAndParamIndex(SizeAndParamIndexInfo),
}

impl CountInfo {
    /// Name used by count declarations to refer to the return value
    pub const RETURN_VALUE_ELEMENT_NAME: &'static str = "return-value";

    /// The element supplying the count, for [`CountInfo::CountElement`]
    pub fn count_element(&self) -> Option<&TypePositionInfo> {
        match self {
            CountInfo::CountElement(element) => Some(element),
            _ => None,
        }
    }

    /// Returns true if the count is read from the return value
    pub fn is_return_value_count(&self) -> bool {
        self.count_element().is_some_and(TypePositionInfo::is_return)
    }
}

/// A base constant plus an optional parameter contributing to the length.
///
/// Either half may be absent; callers must check both before treating the
/// count as fully specified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SizeAndParamIndexInfo {
    pub const_size: Option<i32>,
    pub param_at_index: Option<TypePositionInfo>,
}

impl SizeAndParamIndexInfo {
    /// Neither half declared
    pub const UNSPECIFIED: SizeAndParamIndexInfo = SizeAndParamIndexInfo {
        const_size: None,
        param_at_index: None,
    };

    pub fn new(const_size: Option<i32>, param_at_index: Option<TypePositionInfo>) -> Self {
        Self {
            const_size,
            param_at_index,
        }
    }

    /// Set the constant half, keeping the parameter half as it is
    pub fn with_const_size(mut self, size: i32) -> Self {
        self.const_size = Some(size);
        self
    }

    /// Set the parameter half, keeping the constant half as it is
    pub fn with_param(mut self, param: TypePositionInfo) -> Self {
        self.param_at_index = Some(param);
        self
    }

    pub fn is_unspecified(&self) -> bool {
        self.const_size.is_none() && self.param_at_index.is_none()
    }
}

impl From<SizeAndParamIndexInfo> for CountInfo {
    fn from(info: SizeAndParamIndexInfo) -> Self {
        CountInfo::SizeAndParamIndex(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interop_types::{ManagedTypeInfo, SpecialType};
    use pretty_assertions::assert_eq;

    fn length_param() -> TypePositionInfo {
        TypePositionInfo::parameter("length", ManagedTypeInfo::special(SpecialType::Int32), 2)
    }

    #[test]
    fn test_unspecified_has_both_halves_absent() {
        assert_eq!(SizeAndParamIndexInfo::UNSPECIFIED.const_size, None);
        assert_eq!(SizeAndParamIndexInfo::UNSPECIFIED.param_at_index, None);
        assert!(SizeAndParamIndexInfo::UNSPECIFIED.is_unspecified());
        assert_eq!(SizeAndParamIndexInfo::default(), SizeAndParamIndexInfo::UNSPECIFIED);
    }

    #[test]
    fn test_const_only_keeps_param_unspecified() {
        let info = SizeAndParamIndexInfo::UNSPECIFIED.with_const_size(16);
        assert_eq!(info.const_size, Some(16));
        assert_eq!(info.param_at_index, None);
        assert!(!info.is_unspecified());
    }

    #[test]
    fn test_param_only_keeps_const_unspecified() {
        let info = SizeAndParamIndexInfo::UNSPECIFIED.with_param(length_param());
        assert_eq!(info.const_size, None);
        assert_eq!(info.param_at_index, Some(length_param()));
    }

    #[test]
    fn test_negative_const_size_is_representable() {
        let count = CountInfo::ConstSize { size: -4 };
        assert_eq!(count, CountInfo::ConstSize { size: -4 });
    }

    #[test]
    fn test_return_value_count() {
        let from_return = CountInfo::CountElement(TypePositionInfo::return_value(
            ManagedTypeInfo::special(SpecialType::Int32),
        ));
        assert!(from_return.is_return_value_count());
        assert!(!CountInfo::CountElement(length_param()).is_return_value_count());
        assert!(!CountInfo::NoCount.is_return_value_count());
    }
}
