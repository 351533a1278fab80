use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;

use tokio::sync::RwLock;

use event_api::{partition_key, EventRecord, EventStore, PutOutcome, StoreError};

// ═══════════════════════════════════════════════════════════════
//  MemoryStoreConfig
// ═══════════════════════════════════════════════════════════════

fn default_key_field() -> String {
    "eventId".into()
}

fn default_max_items() -> usize {
    100_000
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct MemoryStoreConfig {
    /// Field whose value addresses an item within a table.
    #[serde(default = "default_key_field")]
    pub key_field: String,

    /// Items kept per table; the oldest key is evicted once full.
    #[serde(default = "default_max_items")]
    pub max_items: usize,
}

impl Default for MemoryStoreConfig {
    fn default() -> Self {
        Self {
            key_field: default_key_field(),
            max_items: default_max_items(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  MemoryStore
// ═══════════════════════════════════════════════════════════════

/// Items of one table plus their keys in first-insert order.
#[derive(Default)]
struct Table {
    items: HashMap<String, EventRecord>,
    order: VecDeque<String>,
}

impl Table {
    fn upsert(&mut self, key: String, item: EventRecord, max_items: usize) -> Option<EventRecord> {
        if let Some(slot) = self.items.get_mut(&key) {
            return Some(std::mem::replace(slot, item));
        }
        if self.items.len() >= max_items {
            if let Some(oldest) = self.order.pop_front() {
                self.items.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.items.insert(key, item);
        None
    }
}

/// In-memory key-value store. Tables are created on first put and live
/// as long as the store; nothing is persisted.
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
    key_field: String,
    max_items: usize,
}

impl MemoryStore {
    pub fn new(config: MemoryStoreConfig) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            key_field: config.key_field,
            max_items: config.max_items,
        }
    }

    /// Current item stored under `key`, if any.
    pub async fn get(&self, table: &str, key: &str) -> Option<EventRecord> {
        let tables = self.tables.read().await;
        tables.get(table).and_then(|t| t.items.get(key)).cloned()
    }

    /// Number of items in `table`.
    pub async fn len(&self, table: &str) -> usize {
        let tables = self.tables.read().await;
        tables.get(table).map_or(0, |t| t.items.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(MemoryStoreConfig::default())
    }
}

impl EventStore for MemoryStore {
    fn init(&self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async { Ok(()) })
    }

    fn put<'a>(
        &'a self,
        table: &'a str,
        item: &'a EventRecord,
    ) -> Pin<Box<dyn Future<Output = Result<PutOutcome, StoreError>> + Send + 'a>> {
        Box::pin(async move {
            let key = partition_key(item, &self.key_field)?;
            let mut tables = self.tables.write().await;
            let replaced = tables
                .entry(table.to_string())
                .or_default()
                .upsert(key, item.clone(), self.max_items);
            Ok(PutOutcome { replaced })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use event_api::ErrorKind;
    use serde_json::json;

    fn item(value: serde_json::Value) -> EventRecord {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn put_overwrites_by_key() {
        let store = MemoryStore::default();
        let first = item(json!({"eventId": "a", "data": "one"}));
        let second = item(json!({"eventId": "a", "data": "two"}));

        let outcome = store.put("events", &first).await.unwrap();
        assert_eq!(outcome.replaced, None);

        let outcome = store.put("events", &second).await.unwrap();
        assert_eq!(outcome.replaced, Some(first));

        assert_eq!(store.len("events").await, 1);
        assert_eq!(store.get("events", "a").await, Some(second));
    }

    #[tokio::test]
    async fn tables_are_independent() {
        let store = MemoryStore::default();
        let record = item(json!({"eventId": "a"}));
        store.put("left", &record).await.unwrap();

        assert_eq!(store.len("left").await, 1);
        assert_eq!(store.len("right").await, 0);
        assert_eq!(store.get("right", "a").await, None);
    }

    #[tokio::test]
    async fn custom_key_field() {
        let store = MemoryStore::new(MemoryStoreConfig { key_field: "seq".into(), ..Default::default() });
        store.put("t", &item(json!({"seq": 7, "eventId": "x"}))).await.unwrap();
        assert!(store.get("t", "7").await.is_some());

        let err = store.put("t", &item(json!({"eventId": "x"}))).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[tokio::test]
    async fn full_table_evicts_oldest_key() {
        let store = MemoryStore::new(MemoryStoreConfig { max_items: 2, ..Default::default() });
        store.put("t", &item(json!({"eventId": "a"}))).await.unwrap();
        store.put("t", &item(json!({"eventId": "b"}))).await.unwrap();
        // Overwriting keeps the table size and the key's age.
        let outcome = store.put("t", &item(json!({"eventId": "a", "v": 2}))).await.unwrap();
        assert!(outcome.replaced.is_some());
        assert_eq!(store.len("t").await, 2);

        store.put("t", &item(json!({"eventId": "c"}))).await.unwrap();
        assert_eq!(store.len("t").await, 2);
        assert_eq!(store.get("t", "a").await, None);
        assert!(store.get("t", "b").await.is_some());
        assert!(store.get("t", "c").await.is_some());

        store.put("other", &item(json!({"eventId": "a"}))).await.unwrap();
        assert_eq!(store.len("t").await, 2);
        assert_eq!(store.len("other").await, 1);
    }
}
