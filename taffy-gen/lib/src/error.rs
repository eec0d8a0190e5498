//! Error types for the taffy generator.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning filtered markup into an element tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The underlying XML reader rejected the markup.
    #[error("malformed markup at byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },

    /// An attribute could not be read (e.g. missing quotes).
    #[error("malformed attribute at byte {position}: {source}")]
    Attribute {
        position: usize,
        #[source]
        source: quick_xml::events::attributes::AttrError,
    },

    /// A closing tag did not match the innermost open element.
    #[error("closing tag `</{found}>` does not match open element `<{expected}>`")]
    MismatchedTag { expected: String, found: String },

    /// A closing tag appeared with no open element.
    #[error("closing tag `</{0}>` has no matching open element")]
    UnexpectedClose(String),

    /// The input ended while elements were still open.
    #[error("element `<{0}>` is never closed")]
    Unclosed(String),
}

/// Errors raised while extracting an [`Endpoint`](crate::model::Endpoint)
/// from an element tree.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The tree has no `cfcomponent` element.
    #[error("no <cfcomponent> element found")]
    MissingComponent,

    /// A required attribute is absent.
    #[error("<{element} name=\"{owner}\"> is missing the `{attribute}` attribute")]
    MissingAttribute {
        element: &'static str,
        owner: String,
        attribute: &'static str,
    },

    /// An argument type is not in the type lookup table.
    #[error("argument `{argument}` of `{operation}` has unsupported type `{type_name}`")]
    UnknownArgumentType {
        operation: String,
        argument: String,
        type_name: String,
    },
}

/// Invalid generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no service name given")]
    MissingServiceName,

    #[error("`{0}` is not a valid TypeScript identifier")]
    InvalidServiceName(String),

    #[error("output file name `{0}` must be a bare file name")]
    InvalidOutputFile(String),

    #[error("the interfaces file and the client file are both named `{0}`")]
    OutputCollision(String),
}

/// Top-level errors for a generation run.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to read a source file or list the source directory.
    #[error("failed to read `{path}`: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source directory listing failed.
    #[error("failed to list `{path}`: {source}")]
    ListError {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Failed to write an output file.
    #[error("failed to write output file `{path}`: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Two source files map to the same endpoint name.
    #[error("`{path}` maps to endpoint `{endpoint}`, already taken by `{first}`")]
    DuplicateEndpoint {
        endpoint: String,
        path: PathBuf,
        first: PathBuf,
    },

    /// The per-file task panicked or was cancelled.
    #[error("generation task for `{endpoint}` did not complete: {reason}")]
    TaskFailed { endpoint: String, reason: String },
}
