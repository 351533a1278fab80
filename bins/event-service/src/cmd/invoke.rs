use std::io::Read;
use std::sync::Arc;

use event_api::{EventStore, PutOutput};
use event_handler::EventHandler;
use event_store_file::{FileStore, FileStoreConfig};
use event_store_memory::{MemoryStore, MemoryStoreConfig};

use crate::config::{InvokeArgs, ServiceConfig};
use crate::error::ServiceError;

pub async fn run(args: InvokeArgs) -> Result<(), ServiceError> {
    let config = ServiceConfig::resolve(&args)?;
    let raw = read_event(args.event.as_deref())?;

    let output = invoke(config, &raw).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Build the store and handler from `config` and run one envelope.
pub async fn invoke(config: ServiceConfig, raw_event: &str) -> Result<PutOutput, ServiceError> {
    tracing::info!(
        table = %config.handler.table_name,
        region = %config.handler.region,
        storage = %config.storage,
        "configured handler"
    );

    let store = build_store(&config)?;
    store.init().await?;

    let logger = event_handler::logger_for(&config.handler);
    let handler = EventHandler::new(config.handler, store, logger);

    let event = parse_envelope(raw_event);
    Ok(handler.run(event.as_ref()).await?)
}

fn build_store(config: &ServiceConfig) -> Result<Arc<dyn EventStore>, ServiceError> {
    match config.storage.as_str() {
        "memory" => {
            let mem_cfg: MemoryStoreConfig = match &config.storage_config {
                Some(v) => v.clone().try_into::<MemoryStoreConfig>().map_err(|e| ServiceError::Config {
                    context: "memory storage",
                    detail: format!("{e}"),
                })?,
                None => MemoryStoreConfig::default(),
            };
            Ok(Arc::new(MemoryStore::new(mem_cfg)))
        }
        "file" => {
            let file_cfg: FileStoreConfig = config
                .storage_config
                .clone()
                .ok_or_else(|| ServiceError::Config {
                    context: "file storage",
                    detail: "[storage_config] with data_dir is required".into(),
                })?
                .try_into::<FileStoreConfig>()
                .map_err(|e| ServiceError::Config { context: "file storage", detail: format!("{e}") })?;
            Ok(Arc::new(FileStore::new(file_cfg, &config.handler.region)?))
        }
        other => Err(ServiceError::UnknownStorage(other.to_string())),
    }
}

fn read_event(path: Option<&str>) -> Result<String, ServiceError> {
    match path {
        Some(p) if p != "-" => Ok(std::fs::read_to_string(p)?),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Blank or non-JSON input counts as a missing envelope; the handler
/// reports it as such.
fn parse_envelope(raw: &str) -> Option<serde_json::Value> {
    if raw.trim().is_empty() {
        return None;
    }
    serde_json::from_str(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_handler::HandlerError;
    use serde_json::json;
    use tempfile::TempDir;

    fn quiet() -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.handler.quiet = true;
        config
    }

    fn envelope() -> String {
        let body = json!({
            "eventId": "12345-test",
            "timestamp": 20180907133700u64,
            "data": "test data",
            "event": "Audit",
        });
        json!({ "body": body.to_string() }).to_string()
    }

    #[test]
    fn blank_or_garbage_input_is_no_envelope() {
        assert_eq!(parse_envelope(""), None);
        assert_eq!(parse_envelope("  \n"), None);
        assert_eq!(parse_envelope("not json"), None);
        assert_eq!(parse_envelope(r#"{"body": "{}"}"#), Some(json!({"body": "{}"})));
    }

    #[tokio::test]
    async fn invoke_with_memory_store() {
        let output = invoke(quiet(), &envelope()).await.unwrap();
        assert_eq!(output.table_name, "event-service-table");
        assert_eq!(output.item["eventId"], "12345-test");
    }

    #[tokio::test]
    async fn invoke_reports_classified_errors() {
        let err = invoke(quiet(), "").await.unwrap_err();
        assert!(matches!(err, ServiceError::Handler(HandlerError::Envelope)));
        assert_eq!(err.to_string(), "event not as expected");
    }

    #[tokio::test]
    async fn invoke_with_file_store_writes_under_region() {
        let dir = TempDir::new().unwrap();
        let mut config = quiet();
        config.handler.region = "eu-west-1".into();
        config.storage = "file".into();
        let mut storage_config = toml::Table::new();
        storage_config.insert("data_dir".into(), toml::Value::String(dir.path().to_string_lossy().into_owned()));
        config.storage_config = Some(toml::Value::Table(storage_config));

        invoke(config, &envelope()).await.unwrap();

        let path = dir.path().join("eu-west-1").join("event-service-table").join("12345-test.json");
        assert!(path.is_file());
    }

    #[test]
    fn file_store_requires_data_dir() {
        let config = ServiceConfig { storage: "file".into(), ..quiet() };
        assert!(matches!(build_store(&config), Err(ServiceError::Config { context: "file storage", .. })));
    }

    #[test]
    fn unknown_storage_is_rejected() {
        let config = ServiceConfig { storage: "dynamodb".into(), ..quiet() };
        assert!(matches!(build_store(&config), Err(ServiceError::UnknownStorage(name)) if name == "dynamodb"));
    }
}
