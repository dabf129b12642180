//! Character encodings and the default marshalling context.

use interop_types::ManagedTypeInfo;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MarshallingInfo;

/// Character encoding used when marshalling strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharEncoding {
    #[default]
    Undefined,
    Utf8,
    Utf16,
    /// Strings go through a user-supplied marshaller
    Custom,
}

impl fmt::Display for CharEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CharEncoding::Undefined => "undefined",
            CharEncoding::Utf8 => "utf-8",
            CharEncoding::Utf16 => "utf-16",
            CharEncoding::Custom => "custom",
        };
        f.write_str(name)
    }
}

/// Defaults declared on the enclosing member or type.
///
/// This context is handed to the code that builds [`MarshallingInfo`] values
/// but is never stored inside one: it may refer to types whose resolution
/// depends on the current compilation, which must not leak into cached
/// models.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DefaultMarshallingInfo {
    pub char_encoding: CharEncoding,
    /// Marshaller used for strings when `char_encoding` is `Custom`
    pub string_marshalling_custom_type: Option<ManagedTypeInfo>,
}

impl DefaultMarshallingInfo {
    pub fn new(
        char_encoding: CharEncoding,
        string_marshalling_custom_type: Option<ManagedTypeInfo>,
    ) -> Self {
        Self {
            char_encoding,
            string_marshalling_custom_type,
        }
    }

    /// Context declaring only an encoding
    pub fn with_encoding(char_encoding: CharEncoding) -> Self {
        Self::new(char_encoding, None)
    }

    /// The string-support fallback for values with no marshaller of their own
    pub fn string_support(&self) -> MarshallingInfo {
        MarshallingInfo::StringSupport(self.char_encoding)
    }
}
