//! Error types for stub generation.

use thiserror::Error;

/// Error type for stub generation.
///
/// Every variant is fatal: the input descriptor set is expected to have passed `protoc`'s own
/// validation, so any of these indicates a broken request rather than a recoverable condition.
#[derive(Debug, Error)]
pub enum Error {
    /// The serialized `CodeGeneratorRequest` could not be decoded.
    #[error("invalid CodeGeneratorRequest: {0}")]
    Decode(#[from] prost::DecodeError),

    /// A field carries a type tag outside the descriptor type table.
    #[error("unrecognized type {type_tag:?} on field '{field}'")]
    UnrecognizedType {
        /// Field name.
        field: String,
        /// Raw type tag, if any was present.
        type_tag: Option<i32>,
    },

    /// A type reference does not resolve to any message or enum in the request.
    #[error("unresolved type reference '{0}'")]
    UnresolvedType(String),

    /// Two definitions share the same fully qualified name.
    #[error("duplicate definition of '{0}'")]
    DuplicateName(String),

    /// A schema file name lacks the `.proto` suffix.
    #[error("invalid proto file name '{0}': expected a '.proto' suffix")]
    InvalidFileName(String),

    /// A file requested for generation is absent from the request's file set.
    #[error("file to generate '{0}' not found in request")]
    MissingFile(String),

    /// A map entry message does not have the `key`, `value` field layout.
    #[error("malformed map entry message '{0}'")]
    MalformedMapEntry(String),
}

/// A specialized `Result` type for stub generation.
pub type Result<T> = std::result::Result<T, Error>;
