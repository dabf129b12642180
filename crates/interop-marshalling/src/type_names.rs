//! Well-known type names referenced by derived marshalling info.

/// Prefix that makes a type name resolve from the global namespace
pub const GLOBAL_ALIAS: &str = "global::";

pub const MARSHALLING_NAMESPACE: &str = "System.Runtime.InteropServices.Marshalling";

pub const EXCEPTION_AS_VOID_MARSHALLER: &str =
    "System.Runtime.InteropServices.Marshalling.ExceptionAsVoidMarshaller";
pub const EXCEPTION_AS_HRESULT_MARSHALLER: &str =
    "System.Runtime.InteropServices.Marshalling.ExceptionAsHResultMarshaller";
pub const EXCEPTION_AS_NAN_MARSHALLER: &str =
    "System.Runtime.InteropServices.Marshalling.ExceptionAsNaNMarshaller";
pub const EXCEPTION_AS_DEFAULT_MARSHALLER: &str =
    "System.Runtime.InteropServices.Marshalling.ExceptionAsDefaultMarshaller";

/// Native-sized integer, used where a pointer cannot be a generic argument
pub const NATIVE_INT: &str = "nint";

/// Qualify `name` with [`GLOBAL_ALIAS`]
pub fn global(name: &str) -> String {
    format!("{}{}", GLOBAL_ALIAS, name)
}
