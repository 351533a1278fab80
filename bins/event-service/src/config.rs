use clap::{Args, Parser, Subcommand};
use serde::Deserialize;

use event_handler::HandlerConfig;

use crate::error::ServiceError;

#[derive(Parser)]
#[command(name = "event-service", about = "Validate event payloads and store them in a key-value table")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the handler once for a single event envelope
    Invoke(InvokeArgs),
}

#[derive(Args, Clone, Debug, Default)]
pub struct InvokeArgs {
    /// Path to TOML config file (defaults apply when omitted)
    #[arg(long, env = "EVENT_SERVICE_CONFIG")]
    pub config: Option<String>,

    /// File holding the event envelope; reads stdin when omitted or "-"
    #[arg(long)]
    pub event: Option<String>,

    /// Region override
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Table name override
    #[arg(long)]
    pub table: Option<String>,

    /// Suppress handler log lines
    #[arg(
        long,
        env = "NO_LAMBDA_LOG",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub quiet: bool,
}

// ---- TOML Config ----

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    #[serde(flatten)]
    pub handler: HandlerConfig,
    /// Store backend: "memory" or "file".
    #[serde(default = "default_storage")]
    pub storage: String,
    /// Backend-specific settings.
    #[serde(default)]
    pub storage_config: Option<toml::Value>,
}

fn default_storage() -> String {
    "memory".into()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            handler: HandlerConfig::default(),
            storage: default_storage(),
            storage_config: None,
        }
    }
}

impl ServiceConfig {
    pub fn load(path: &str) -> Result<Self, ServiceError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config { context: "read", detail: format!("'{path}': {e}") })?;
        Self::parse(&content)
            .map_err(|e| ServiceError::Config { context: "parse", detail: format!("'{path}': {e}") })
    }

    pub fn parse(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Config file (if any) with command-line overrides applied, validated.
    pub fn resolve(args: &InvokeArgs) -> Result<Self, ServiceError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(region) = &args.region {
            config.handler.region = region.clone();
        }
        if let Some(table) = &args.table {
            config.handler.table_name = table.clone();
        }
        if args.quiet {
            config.handler.quiet = true;
        }
        config.handler.validate()?;
        Ok(config)
    }
}
