// ════════════════════════════════════════════════════════════════
//  Configuration
// ════════════════════════════════════════════════════════════════

fn default_key_field() -> String {
    "eventId".into()
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct FileStoreConfig {
    /// Root directory; tables live under `{data_dir}/{region}/{table}`.
    pub data_dir: String,
    /// Field whose value names the item file.
    #[serde(default = "default_key_field")]
    pub key_field: String,
}
