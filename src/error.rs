//! Error types for the avro-event-gen crate.

use std::path::PathBuf;

/// Errors that can occur during Avro protocol generation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A declared field uses a type with no Avro equivalent.
    #[error("record '{record}' field '{field}': unsupported declared type '{type_name}'")]
    UnmappableField {
        record: String,
        field: String,
        type_name: String,
    },

    /// A declared type expression could not be mapped.
    ///
    /// Raised by the type mapper without record/field context; the codegen
    /// layer converts it into [`Error::UnmappableField`] before it reaches
    /// the caller.
    #[error("unsupported declared type '{0}'")]
    UnsupportedType(String),

    /// Failed to read a declaration file from disk.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A declaration file is not valid JSON for the expected shape.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A generated protocol could not be serialized to JSON text.
    #[error("failed to serialize protocol '{protocol}': {source}")]
    Serialize {
        protocol: String,
        source: serde_json::Error,
    },

    /// Failed to create the output directory.
    #[error("failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write a generated protocol file.
    #[error("failed to write protocol '{protocol}' to {path}: {source}")]
    Write {
        protocol: String,
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
