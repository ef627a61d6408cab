//! Template pipeline error types

use std::path::PathBuf;

/// Errors from resolving, converting, or writing jobs and job templates.
///
/// None of these are retried; each ends the command.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("the filename and {kind} name cannot both be empty")]
    MissingSource { kind: &'static str },

    #[error("unsupported file {}: only yaml files (.yaml, .yml) are supported", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to read file {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {kind} from {}: {message}", path.display())]
    MalformedInput {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("failed to get {kind} <{namespace}/{name}>: {source}")]
    RemoteLookupFailed {
        kind: &'static str,
        namespace: String,
        name: String,
        source: vcctl_common::Error,
    },

    #[error("failed to convert {from} <{namespace}/{name}> to Job: {message}")]
    SchemaMismatch {
        from: &'static str,
        namespace: String,
        name: String,
        message: String,
    },

    #[error("failed to create {kind} <{namespace}/{name}>: {source}")]
    CreateFailed {
        kind: &'static str,
        namespace: String,
        name: String,
        source: vcctl_common::Error,
    },

    #[error("failed to convert Job <{namespace}/{name}> to JobTemplate: {message}")]
    Serialization {
        namespace: String,
        name: String,
        message: String,
    },
}
