use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ConfigError;

/// Primitive type a required field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
}

impl FieldType {
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            FieldType::String => value.is_string(),
            FieldType::Number => value.is_number(),
        }
    }
}

/// One entry of the required-field schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: FieldType,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self { name: name.into(), ty }
    }
}

/// Handler configuration — one per deployment.
///
/// Every field has a default, so an empty TOML document yields the
/// standard `event-service-table` deployment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HandlerConfig {
    /// Destination table for every put.
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Region the table lives in.
    #[serde(default = "default_region")]
    pub region: String,

    /// Supported `event` values, compared case-sensitively.
    #[serde(default = "default_events")]
    pub events: Vec<String>,

    /// Required fields, checked in declaration order.
    #[serde(default = "default_fields")]
    pub fields: Vec<FieldSpec>,

    /// Suppress handler log output.
    #[serde(default)]
    pub quiet: bool,
}

pub const DEFAULT_TABLE_NAME: &str = "event-service-table";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const EVENT_FIELD: &str = "event";

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.into()
}

fn default_region() -> String {
    DEFAULT_REGION.into()
}

fn default_events() -> Vec<String> {
    ["Audit", "User", "Post", "Reply"].into_iter().map(String::from).collect()
}

fn default_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::new("eventId", FieldType::String),
        FieldSpec::new("data", FieldType::String),
        FieldSpec::new("event", FieldType::String),
        FieldSpec::new("timestamp", FieldType::Number),
    ]
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            table_name: default_table_name(),
            region: default_region(),
            events: default_events(),
            fields: default_fields(),
            quiet: false,
        }
    }
}

impl HandlerConfig {
    /// Deployment that stores into `event-service-db`, stamps records with
    /// a `dateCreate` string instead of a numeric `timestamp` and does not
    /// require an `event` field.
    pub fn date_created() -> Self {
        Self {
            table_name: "event-service-db".into(),
            fields: vec![
                FieldSpec::new("eventId", FieldType::String),
                FieldSpec::new("data", FieldType::String),
                FieldSpec::new("dateCreate", FieldType::String),
            ],
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_string(), source })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string and validate it.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// The allow-list only applies when `event` is a required field.
    pub fn checks_event_type(&self) -> bool {
        self.fields.iter().any(|f| f.name == EVENT_FIELD)
    }

    /// Reject configurations no event could ever pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.table_name.trim().is_empty() {
            return Err(ConfigError::Invalid("table_name must not be empty".into()));
        }
        if self.region.trim().is_empty() {
            return Err(ConfigError::Invalid("region must not be empty".into()));
        }
        if self.events.is_empty() {
            return Err(ConfigError::Invalid("events allow-list must not be empty".into()));
        }
        if self.fields.is_empty() {
            return Err(ConfigError::Invalid("at least one required field must be declared".into()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate required field '{}'", field.name)));
            }
        }
        Ok(())
    }
}
