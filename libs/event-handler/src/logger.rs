use event_api::HandlerLogger;

/// Forwards handler log lines to `tracing` (`log` is emitted at info).
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl HandlerLogger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}
