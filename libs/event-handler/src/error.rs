/// Classified failure of a single handler run.
///
/// Callers only ever see the fixed message; underlying causes are logged
/// by the handler and dropped. Missing, mistyped and falsy fields share
/// one variant on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error("event not as expected")]
    Envelope,

    #[error("json body malformed")]
    Parse,

    #[error("missing required fields for entry or data type was not correct or was a falsy value")]
    Validation,

    #[error("event type is not supported")]
    UnsupportedEvent,

    #[error("dynamodb error")]
    Store,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config ({path}): {source}")]
    Read { path: String, source: std::io::Error },

    #[error("config parse: {0}")]
    Parse(String),

    #[error("invalid config: {0}")]
    Invalid(String),
}
