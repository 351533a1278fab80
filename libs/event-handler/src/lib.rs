pub mod config;
pub mod error;
pub mod handler;
pub mod logger;
pub mod validate;

use std::sync::Arc;

use event_api::{HandlerLogger, NoopLogger};

pub use config::{FieldSpec, FieldType, HandlerConfig};
pub use error::{ConfigError, HandlerError};
pub use handler::EventHandler;
pub use logger::TracingLogger;

/// Logger matching the config's `quiet` flag.
pub fn logger_for(config: &HandlerConfig) -> Arc<dyn HandlerLogger> {
    if config.quiet {
        Arc::new(NoopLogger)
    } else {
        Arc::new(TracingLogger)
    }
}
