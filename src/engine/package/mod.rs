// Character package container format
//
// A package is a flat sequence of fields: magic, version, character info JSON,
// prefab resource name, animator resource name, blob length and blob bytes.
// Header literals are matched exactly; there is no compatibility window.

mod codec;

pub use codec::{decode, encode, write_package, DecodedPackage, PACKAGE_MAGIC, PACKAGE_VERSION};

/// Container format errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("File magic invalid, wrong file type?")]
    MagicMismatch,

    #[error("Unsupported package version: {found}")]
    UnsupportedVersion { found: String },

    #[error("Truncated {field}: needed {needed} bytes, {available} available")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("Malformed length prefix for {field}")]
    MalformedLength { field: &'static str },

    #[error("Field {field} is not valid UTF-8")]
    InvalidText { field: &'static str },

    #[error("Blob of {len} bytes does not fit the length field")]
    BlobTooLarge { len: usize },
}
