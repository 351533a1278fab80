use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use event_api::{partition_key, EventRecord, EventStore, PutOutcome, StoreError};

use super::config::FileStoreConfig;

// ════════════════════════════════════════════════════════════════
//  FileStore
// ════════════════════════════════════════════════════════════════

/// One JSON document per item: `{data_dir}/{region}/{table}/{key}.json`.
///
/// A put replaces the whole document (write to a temp file, then rename),
/// so readers never observe a half-written item.
#[derive(Debug, Clone)]
pub struct FileStore {
    region_dir: PathBuf,
    key_field: String,
}

impl FileStore {
    pub fn new(config: FileStoreConfig, region: &str) -> Result<Self, StoreError> {
        check_segment("region", region).map_err(|e| StoreError::config(e.message()))?;
        Ok(Self {
            region_dir: Path::new(&config.data_dir).join(region),
            key_field: config.key_field,
        })
    }

    /// Read the item stored under `key`, if any.
    pub fn get(&self, table: &str, key: &str) -> Result<Option<EventRecord>, StoreError> {
        let path = self.item_path(table, key)?;
        read_item(&path)
    }

    fn item_path(&self, table: &str, key: &str) -> Result<PathBuf, StoreError> {
        check_segment("table", table)?;
        check_segment("key", key)?;
        Ok(self.region_dir.join(table).join(format!("{key}.json")))
    }

    fn do_put(&self, table: &str, item: &EventRecord) -> Result<PutOutcome, StoreError> {
        let key = partition_key(item, &self.key_field)?;
        let path = self.item_path(table, &key)?;
        let dir = self.region_dir.join(table);
        std::fs::create_dir_all(&dir)
            .map_err(|e| StoreError::io(format!("mkdir {}: {e}", dir.display())))?;

        // Unreadable previous content is still overwritten.
        let replaced = read_item(&path).ok().flatten();

        let bytes = serde_json::to_vec(item)?;
        // Unique temp name per put: concurrent writers of one key each
        // rename their own file, the last rename wins.
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| StoreError::io(format!("create temp in {}: {e}", dir.display())))?;
        tmp.write_all(&bytes)
            .map_err(|e| StoreError::io(format!("write {}: {e}", tmp.path().display())))?;
        tmp.as_file()
            .sync_all()
            .map_err(|e| StoreError::io(format!("sync {}: {e}", tmp.path().display())))?;
        tmp.persist(&path)
            .map_err(|e| StoreError::io(format!("rename {}: {}", path.display(), e.error)))?;

        Ok(PutOutcome { replaced })
    }
}

impl EventStore for FileStore {
    fn init(&self) -> Pin<Box<dyn Future<Output = Result<(), StoreError>> + Send + '_>> {
        Box::pin(async move {
            std::fs::create_dir_all(&self.region_dir)
                .map_err(|e| StoreError::io(format!("mkdir {}: {e}", self.region_dir.display())))
        })
    }

    fn put<'a>(
        &'a self,
        table: &'a str,
        item: &'a EventRecord,
    ) -> Pin<Box<dyn Future<Output = Result<PutOutcome, StoreError>> + Send + 'a>> {
        Box::pin(async move { self.do_put(table, item) })
    }
}

// ════════════════════════════════════════════════════════════════
//  Helpers
// ════════════════════════════════════════════════════════════════

/// Path segments come from configuration and from item values; none of
/// them may step outside the directory they name.
fn check_segment(what: &str, segment: &str) -> Result<(), StoreError> {
    let bad = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(&['/', '\\', '\0'][..]);
    if bad {
        return Err(StoreError::format_err(format!("{what} '{segment}' is not a valid path segment")));
    }
    Ok(())
}

fn read_item(path: &Path) -> Result<Option<EventRecord>, StoreError> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::io(format!("read {}: {e}", path.display()))),
    }
}
