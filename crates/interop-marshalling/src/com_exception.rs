//! COM Exception Marshalling
//!
//! Under the COM calling convention exceptions never cross the boundary: a
//! managed method called from unmanaged code converts any exception it throws
//! into its unmanaged return value. Which conversion applies depends on that
//! return type:
//!
//! | Unmanaged return | Strategy | Marshaller |
//! |------------------|----------|------------|
//! | `void` | discard the exception | `ExceptionAsVoidMarshaller` |
//! | `int` | HRESULT | `ExceptionAsHResultMarshaller<int>` |
//! | `uint` | HRESULT | `ExceptionAsHResultMarshaller<uint>` |
//! | `float` | NaN | `ExceptionAsNaNMarshaller<float>` |
//! | `double` | NaN | `ExceptionAsNaNMarshaller<double>` |
//! | anything else | default value | `ExceptionAsDefaultMarshaller<T>` |
//!
//! [`MarshallingInfo::ComException`](crate::MarshallingInfo::ComException)
//! only marks that this conversion is wanted. The concrete marshaller is
//! produced here, outside the variant, once the return type is known. This
//! is the one place where one kind of marshalling info is turned into another.

use interop_types::{ManagedTypeInfo, SpecialType};
use std::fmt;

use crate::type_names::{
    self, EXCEPTION_AS_DEFAULT_MARSHALLER, EXCEPTION_AS_HRESULT_MARSHALLER,
    EXCEPTION_AS_NAN_MARSHALLER, EXCEPTION_AS_VOID_MARSHALLER, NATIVE_INT,
};
use crate::{
    CustomTypeMarshallerData, CustomTypeMarshallers, CustomTypeMarshallingInfo, MarshalMode,
    MarshallerShape,
};

/// Integer types an HRESULT can be returned as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HResultType {
    Int,
    UInt,
}

impl HResultType {
    pub fn special_type(self) -> SpecialType {
        match self {
            HResultType::Int => SpecialType::Int32,
            HResultType::UInt => SpecialType::UInt32,
        }
    }
}

/// Floating point types a NaN can be returned as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaNType {
    Float,
    Double,
}

impl NaNType {
    pub fn special_type(self) -> SpecialType {
        match self {
            NaNType::Float => SpecialType::Single,
            NaNType::Double => SpecialType::Double,
        }
    }
}

/// How an exception becomes a return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComExceptionStrategy {
    /// The exception is dropped and nothing is returned
    Discard,
    /// The exception's HRESULT is returned
    HResult(HResultType),
    /// NaN is returned
    NaN(NaNType),
    /// The default value of the return type is returned
    DefaultValue,
}

impl ComExceptionStrategy {
    /// Pick the strategy for an unmanaged return type
    pub fn classify(unmanaged_return_type: &ManagedTypeInfo) -> Self {
        match unmanaged_return_type.special_type() {
            Some(SpecialType::Void) => ComExceptionStrategy::Discard,
            Some(SpecialType::Int32) => ComExceptionStrategy::HResult(HResultType::Int),
            Some(SpecialType::UInt32) => ComExceptionStrategy::HResult(HResultType::UInt),
            Some(SpecialType::Single) => ComExceptionStrategy::NaN(NaNType::Float),
            Some(SpecialType::Double) => ComExceptionStrategy::NaN(NaNType::Double),
            _ => ComExceptionStrategy::DefaultValue,
        }
    }

    /// Name of the marshaller implementing this strategy, instantiated for
    /// `unmanaged_return_type` where it is generic
    pub fn marshaller_name(self, unmanaged_return_type: &ManagedTypeInfo) -> String {
        match self {
            ComExceptionStrategy::Discard => EXCEPTION_AS_VOID_MARSHALLER.to_string(),
            ComExceptionStrategy::HResult(ty) => format!(
                "{}<{}>",
                EXCEPTION_AS_HRESULT_MARSHALLER,
                ty.special_type().keyword()
            ),
            ComExceptionStrategy::NaN(ty) => format!(
                "{}<{}>",
                EXCEPTION_AS_NAN_MARSHALLER,
                ty.special_type().keyword()
            ),
            ComExceptionStrategy::DefaultValue => format!(
                "{}<{}>",
                EXCEPTION_AS_DEFAULT_MARSHALLER,
                generic_argument(unmanaged_return_type)
            ),
        }
    }
}

impl fmt::Display for ComExceptionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComExceptionStrategy::Discard => f.write_str("discard"),
            ComExceptionStrategy::HResult(ty) => write!(f, "hresult({})", ty.special_type()),
            ComExceptionStrategy::NaN(ty) => write!(f, "nan({})", ty.special_type()),
            ComExceptionStrategy::DefaultValue => f.write_str("default"),
        }
    }
}

/// Pointers cannot be generic arguments; they travel as `nint`.
fn generic_argument(ty: &ManagedTypeInfo) -> &str {
    if ty.is_pointer() {
        NATIVE_INT
    } else {
        ty.full_type_name()
    }
}

/// Build the custom marshaller that converts a thrown exception into a value
/// of `unmanaged_return_type`.
///
/// The result has a single `UnmanagedToManagedOut` mode: stateless,
/// `TO_UNMANAGED` only, strictly blittable, producing the return type.
#[tracing::instrument(level = "trace", skip_all, fields(return_type = %unmanaged_return_type))]
pub fn derive_com_exception_marshalling(
    unmanaged_return_type: &ManagedTypeInfo,
) -> CustomTypeMarshallingInfo {
    let strategy = ComExceptionStrategy::classify(unmanaged_return_type);
    let marshaller_name = strategy.marshaller_name(unmanaged_return_type);
    tracing::debug!(%strategy, marshaller = %marshaller_name, "derived exception marshaller");

    let marshaller_type =
        ManagedTypeInfo::reference(type_names::global(&marshaller_name), marshaller_name);
    let data = CustomTypeMarshallerData::scalar(
        marshaller_type.clone(),
        unmanaged_return_type.clone(),
        false,
        MarshallerShape::TO_UNMANAGED,
        true,
    );

    CustomTypeMarshallingInfo::new(
        marshaller_type,
        CustomTypeMarshallers::single(MarshalMode::UnmanagedToManagedOut, data),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_primitives() {
        let classify = |special| ComExceptionStrategy::classify(&ManagedTypeInfo::special(special));
        assert_eq!(classify(SpecialType::Void), ComExceptionStrategy::Discard);
        assert_eq!(classify(SpecialType::Int32), ComExceptionStrategy::HResult(HResultType::Int));
        assert_eq!(classify(SpecialType::UInt32), ComExceptionStrategy::HResult(HResultType::UInt));
        assert_eq!(classify(SpecialType::Single), ComExceptionStrategy::NaN(NaNType::Float));
        assert_eq!(classify(SpecialType::Double), ComExceptionStrategy::NaN(NaNType::Double));
        assert_eq!(classify(SpecialType::Int64), ComExceptionStrategy::DefaultValue);
        assert_eq!(classify(SpecialType::Boolean), ComExceptionStrategy::DefaultValue);
    }

    #[test]
    fn test_non_special_types_use_default_value() {
        let handle = ManagedTypeInfo::value("global::Demo.Handle", "Demo.Handle", false);
        assert_eq!(ComExceptionStrategy::classify(&handle), ComExceptionStrategy::DefaultValue);
        assert_eq!(
            ComExceptionStrategy::DefaultValue.marshaller_name(&handle),
            "System.Runtime.InteropServices.Marshalling.ExceptionAsDefaultMarshaller<global::Demo.Handle>"
        );
    }

    #[test]
    fn test_pointer_argument_becomes_nint() {
        let pointer = ManagedTypeInfo::pointer("int*", "int*", false);
        assert_eq!(generic_argument(&pointer), "nint");
        assert_eq!(
            ComExceptionStrategy::classify(&pointer).marshaller_name(&pointer),
            "System.Runtime.InteropServices.Marshalling.ExceptionAsDefaultMarshaller<nint>"
        );
    }
}
