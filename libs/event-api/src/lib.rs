use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════
//  Event Record
// ════════════════════════════════════════════════════════════════

/// Event payload as it is handed to the store.
///
/// Deliberately untyped: the handler checks the required fields, every
/// other key passes through unmodified.
pub type EventRecord = serde_json::Map<String, serde_json::Value>;

/// Metadata reported by a store after a successful put.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PutOutcome {
    /// Item overwritten by this put. `None` if the key was new or the
    /// store does not report previous values.
    pub replaced: Option<EventRecord>,
}

/// Result of a successful handler run.
///
/// Serialized with DynamoDB-style field names (`TableName`, `Item`,
/// `Attributes`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutOutput {
    #[serde(rename = "TableName")]
    pub table_name: String,
    #[serde(rename = "Item")]
    pub item: EventRecord,
    #[serde(rename = "Attributes", default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<EventRecord>,
}

// ════════════════════════════════════════════════════════════════
//  Store Trait
// ════════════════════════════════════════════════════════════════

/// Key-value backend the handler writes into.
///
/// Implementations: memory store, file store. The handler only ever
/// issues a single `put` per invocation.
pub trait EventStore: Send + Sync {
    /// Prepare the backend (create directories etc). Called once at startup.
    fn init(&self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>>;

    /// Unconditional upsert of `item` into `table`. An existing item with
    /// the same partition key is overwritten.
    fn put<'a>(
        &'a self,
        table: &'a str,
        item: &'a EventRecord,
    ) -> Pin<Box<dyn Future<Output = Result<PutOutcome, StoreError>> + Send + 'a>>;
}

/// Extract the partition key of `item`.
///
/// Strings are used as-is, numbers by their JSON rendering. Anything else
/// (missing, null, bool, nested) cannot address a record.
pub fn partition_key(item: &EventRecord, key_field: &str) -> Result<String, StoreError> {
    match item.get(key_field) {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(serde_json::Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(StoreError::format_err(format!(
            "partition key '{key_field}' must be a non-empty string or a number, got {other}"
        ))),
        None => Err(StoreError::format_err(format!(
            "partition key '{key_field}' missing from item"
        ))),
    }
}

// ════════════════════════════════════════════════════════════════
//  Logger
// ════════════════════════════════════════════════════════════════

/// Side channel for the handler's log lines.
///
/// Injected rather than read from the environment, so callers decide
/// whether output goes to `tracing` or nowhere.
pub trait HandlerLogger: Send + Sync {
    fn log(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Logger that drops everything. Used for quiet runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl HandlerLogger for NoopLogger {
    fn log(&self, _message: &str) {}
    fn warn(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

// ════════════════════════════════════════════════════════════════
//  Store Error
// ════════════════════════════════════════════════════════════════

/// Category of a store error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid store configuration — permanent, fail at startup.
    Config,
    /// I/O or network error.
    Io,
    /// Item cannot be encoded or addressed.
    Format,
    /// Anything else.
    Logic,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Config => f.write_str("config"),
            ErrorKind::Io => f.write_str("io"),
            ErrorKind::Format => f.write_str("format"),
            ErrorKind::Logic => f.write_str("logic"),
        }
    }
}

/// Error returned by every `EventStore` method.
///
/// The handler never forwards it to its caller; it is only logged.
#[derive(Clone)]
pub struct StoreError {
    kind: ErrorKind,
    message: String,
}

impl StoreError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Logic, message: msg.into() }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Config, message: msg.into() }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Io, message: msg.into() }
    }

    pub fn format_err(msg: impl Into<String>) -> Self {
        Self { kind: ErrorKind::Format, message: msg.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Debug for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self { Self { kind: ErrorKind::Io, message: e.to_string() } }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self { Self { kind: ErrorKind::Format, message: e.to_string() } }
}
