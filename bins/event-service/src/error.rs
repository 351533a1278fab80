#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config ({context}): {detail}")]
    Config { context: &'static str, detail: String },

    #[error("{0}")]
    HandlerConfig(#[from] event_handler::ConfigError),

    #[error("unknown storage '{0}' (expected \"memory\" or \"file\")")]
    UnknownStorage(String),

    #[error("store: {0}")]
    Store(#[from] event_api::StoreError),

    #[error("read event: {0}")]
    Input(#[from] std::io::Error),

    /// Classified handler failure; only the fixed message is shown.
    #[error("{0}")]
    Handler(#[from] event_handler::HandlerError),

    #[error("encode output: {0}")]
    Output(#[from] serde_json::Error),
}

impl ServiceError {
    /// Line printed to stderr before exiting non-zero. Handler failures
    /// print their classified message alone.
    pub fn report(&self) -> String {
        match self {
            ServiceError::Handler(e) => e.to_string(),
            other => format!("Error: {other}"),
        }
    }
}
