use std::sync::Arc;

use event_api::{EventRecord, EventStore, HandlerLogger, PutOutput};
use serde_json::Value;

use crate::config::{HandlerConfig, EVENT_FIELD};
use crate::error::HandlerError;
use crate::validate;

/// Validates one event envelope and writes its body into the store.
///
/// Holds no per-invocation state: concurrent `run` calls share only the
/// configuration, the store handle and the logger.
pub struct EventHandler {
    config: HandlerConfig,
    store: Arc<dyn EventStore>,
    logger: Arc<dyn HandlerLogger>,
}

impl EventHandler {
    pub fn new(config: HandlerConfig, store: Arc<dyn EventStore>, logger: Arc<dyn HandlerLogger>) -> Self {
        Self { config, store, logger }
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    /// Process a single invocation.
    ///
    /// Stages run in order (envelope, body, fields, event type, put) and
    /// the first failing stage ends the run. The event-type stage is
    /// skipped for schemas without an `event` field.
    #[tracing::instrument(skip_all, fields(table = %self.config.table_name))]
    pub async fn run(&self, event: Option<&Value>) -> Result<PutOutput, HandlerError> {
        let body = self.envelope_body(event)?;
        let data = self.parse_body(body)?;

        let record = validate::verify_fields(&data, &self.config.fields)
            .inspect_err(|e| self.logger.error(&e.to_string()))?;
        if self.config.checks_event_type() {
            validate::verify_event(record.get(EVENT_FIELD), &self.config.events)
                .inspect_err(|e| self.logger.error(&e.to_string()))?;
        }

        self.write(record).await
    }

    fn envelope_body<'a>(&self, event: Option<&'a Value>) -> Result<&'a str, HandlerError> {
        event
            .and_then(|e| e.get("body"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                self.logger.error("event not as expected");
                HandlerError::Envelope
            })
    }

    fn parse_body(&self, body: &str) -> Result<Value, HandlerError> {
        serde_json::from_str(body).map_err(|e| {
            self.logger.error(&format!("json body malformed: {e}"));
            HandlerError::Parse
        })
    }

    async fn write(&self, record: &EventRecord) -> Result<PutOutput, HandlerError> {
        let table = &self.config.table_name;
        match self.store.put(table, record).await {
            Ok(outcome) => {
                self.logger.log(&format!(
                    "put item into '{table}' (replaced existing: {})",
                    outcome.replaced.is_some()
                ));
                Ok(PutOutput {
                    table_name: table.clone(),
                    item: record.clone(),
                    attributes: outcome.replaced,
                })
            }
            Err(e) => {
                self.logger.error(&format!("dynamodb error: {e:?}"));
                Err(HandlerError::Store)
            }
        }
    }
}
