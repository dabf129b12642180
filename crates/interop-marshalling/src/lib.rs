//! Interop Marshalling Model
//!
//! This crate describes how a managed value crossing a native boundary is
//! converted: which strategy applies, which unmanaged type it produces and
//! how the length of a variable-size buffer is found. The stub emitter reads
//! this model; it never has to look back at the symbols it was built from.
//!
//! ## Architecture
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`encoding`] | [`CharEncoding`] and the [`DefaultMarshallingInfo`] context |
//! | [`count`] | [`CountInfo`]: how many elements a buffer holds |
//! | [`marshallers`] | [`MarshalMode`], [`MarshallerShape`] and the per-mode table |
//! | [`info`] | [`MarshallingInfo`] and its dependency sets |
//! | [`com_exception`] | deriving the exception-to-return-value marshaller |
//! | [`ordering`] | ordering signature elements so dependencies come first |
//!
//! ## Caching
//!
//! Every type here is an immutable value compared and hashed by value. No
//! variant of [`MarshallingInfo`] holds a symbol handle or the
//! [`DefaultMarshallingInfo`] context, so a model computed in one incremental
//! pass compares equal to the same model computed in the next.
//!
//! ## Example
//!
//! ```
//! use interop_marshalling::{
//!     CountInfo, CustomTypeMarshallers, LinearCollectionMarshallingInfo, MarshallingInfo,
//! };
//! use interop_types::{ManagedTypeInfo, SpecialType, TypePositionInfo};
//!
//! let length = TypePositionInfo::parameter("length", ManagedTypeInfo::special(SpecialType::Int32), 1);
//! let info = MarshallingInfo::from(LinearCollectionMarshallingInfo::new(
//!     ManagedTypeInfo::reference("global::Demo.ArrayMarshaller<,>", "Demo.ArrayMarshaller<,>"),
//!     CustomTypeMarshallers::default(),
//!     CountInfo::CountElement(length.clone()),
//!     ManagedTypeInfo::type_parameter("T"),
//! ));
//!
//! assert_eq!(info.dependencies().collect::<Vec<_>>(), vec![&length]);
//! ```

pub mod com_exception;
pub mod count;
pub mod encoding;
pub mod error;
pub mod info;
pub mod marshallers;
pub mod ordering;
pub mod type_names;

pub use com_exception::{
    derive_com_exception_marshalling, ComExceptionStrategy, HResultType, NaNType,
};
pub use count::{CountInfo, SizeAndParamIndexInfo};
pub use encoding::{CharEncoding, DefaultMarshallingInfo};
pub use error::{OrderingError, OrderingResult};
pub use info::{
    CustomTypeMarshallingInfo, Dependencies, LinearCollectionMarshallingInfo, MarshallingInfo,
};
pub use marshallers::{
    CustomTypeMarshallerData, CustomTypeMarshallers, MarshalDirection, MarshalMode, MarshalRole,
    MarshallerShape,
};
pub use ordering::{order_by_dependencies, BoundElement};

pub use interop_types::{ManagedTypeInfo, SpecialType, TypePositionInfo};
