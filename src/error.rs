/// Error types.
///
/// Nothing in the decision core is fatal: these errors only surface at the
/// edges (token parsing, frame parsing, config loading), where the caller
/// logs them and carries on.

use thiserror::Error;

/// A single inbound sensor token that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObservationError {
    #[error("unknown observation token `{0}`")]
    Unknown(String),

    #[error("malformed parameter in observation token `{0}`")]
    MalformedParameter(String),
}

/// A driver frame line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("frame is missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` is not a number: `{value}`")]
    InvalidNumber { field: &'static str, value: String },

    #[error("invalid facing `{0}`")]
    InvalidFacing(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config.toml parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
