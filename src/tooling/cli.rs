//! CLI Tooling
//!
//! Command-line interface for the bridge. Commands return their output as a
//! string; the binary prints it.

use crate::command::COMMAND_TABLE;
use crate::config::{BridgeConfig, ConfigLoader, ValidationReport};
use crate::connection::ConnectionProvider;
use crate::error::AdapterError;
use crate::logging::LoggingConfig;
use crate::protocol::{ConnectionStatus, TwitchProtocol};
use crate::registry::LinkState;
use crate::router::RecordingSink;
use crate::types::{AttributeEvent, AttributeRef, AttributeValue};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Twitch bridge - link asset attributes to Twitch API calls and events
#[derive(Parser)]
#[command(name = "twitch-bridge")]
#[command(about = "Route Twitch API calls and events into linked attributes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Apply command-line logging flags over the configured logging section.
    pub fn logging_overrides(&self, base: &LoggingConfig) -> LoggingConfig {
        let mut config = base.clone();
        if let Some(level) = &self.log_level {
            config.level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.format = format.clone();
        }
        if let Some(output) = &self.log_output {
            config.output = output.clone();
        }
        if let Some(file) = &self.log_file {
            config.file = Some(file.clone());
        }
        config
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List supported commands with their mode and requirements
    Commands {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Load the configuration and report problems
    CheckConfig,
    /// Start the adapter, link one configured attribute and write to it once
    Invoke {
        /// Entity id of the configured link
        entity: String,
        /// Attribute name of the configured link
        attribute: String,
        /// JSON value written to the attribute
        #[arg(long, default_value = "true")]
        value: String,
    },
}

/// CLI context holding the loaded configuration
pub struct CliContext {
    config: BridgeConfig,
    config_path: Option<PathBuf>,
}

impl CliContext {
    /// Load configuration from `config_path`, or from the standard locations.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, AdapterError> {
        let config = ConfigLoader::load_or_default(config_path.as_deref())?;
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn from_config(config: BridgeConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, AdapterError> {
        match command {
            Commands::Commands { format } => format_command_table(format),
            Commands::CheckConfig => {
                let report = self.config.validate();
                let source = self
                    .config_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "default locations".to_string());
                let output = format_validation_report(&source, &report);
                if report.is_valid() {
                    Ok(output)
                } else {
                    Err(AdapterError::Config(output))
                }
            }
            Commands::Invoke {
                entity,
                attribute,
                value,
            } => {
                let value: AttributeValue = serde_json::from_str(value)?;
                self.invoke(
                    entity,
                    attribute,
                    value,
                    Arc::new(ConnectionProvider::with_helix(self.config.helix.clone())),
                )
            }
        }
    }

    /// Link the configured attribute on a fresh adapter and write `value` to it.
    ///
    /// Returns the attribute events the adapter published, as pretty JSON.
    pub fn invoke(
        &self,
        entity: &str,
        attribute: &str,
        value: AttributeValue,
        connections: Arc<ConnectionProvider>,
    ) -> Result<String, AdapterError> {
        let link_config = self.config.find_link(entity, attribute).ok_or_else(|| {
            AdapterError::Config(format!("No link configured for {}:{}", entity, attribute))
        })?;
        let link = link_config.link();

        let sink = Arc::new(RecordingSink::new());
        let protocol = TwitchProtocol::with_system_clock(connections, sink.clone());

        let status = protocol.start(&self.config.credentials)?;
        if status != ConnectionStatus::Connected {
            return Err(AdapterError::Connection(format!(
                "Adapter did not connect (status {})",
                status
            )));
        }

        let state = protocol.link_attribute(entity, attribute, &link);
        info!(
            entity_id = %entity,
            attribute = %attribute,
            state = ?state,
            "Invoke linked attribute"
        );

        let result = match state {
            LinkState::LinkedPull => {
                let event = AttributeEvent::new(
                    AttributeRef::new(entity, attribute),
                    value.clone(),
                    Utc::now().timestamp_millis(),
                );
                protocol.attribute_write(&link, &event, value)
            }
            LinkState::LinkedPush => Ok(()),
            LinkState::Inert | LinkState::Unlinked => Err(AdapterError::Config(format!(
                "{}:{} could not be linked (state {:?})",
                entity, attribute, state
            ))),
        };
        protocol.stop();
        result?;

        Ok(serde_json::to_string_pretty(&json!({
            "state": state,
            "events": sink.events(),
        }))?)
    }
}

/// Render the dispatch table
pub fn format_command_table(format: &str) -> Result<String, AdapterError> {
    if format == "json" {
        let rows: Vec<_> = COMMAND_TABLE
            .iter()
            .map(|spec| {
                json!({
                    "command": spec.name,
                    "mode": spec.mode,
                    "event": spec.event.map(|e| e.as_str()),
                    "requires": spec.requires.map(|i| i.field_name()),
                })
            })
            .collect();
        return Ok(serde_json::to_string_pretty(&rows)?);
    }
    if format != "text" {
        return Err(AdapterError::Config(format!(
            "Invalid format: {} (must be 'text' or 'json')",
            format
        )));
    }

    use comfy_table::Table;
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Command", "Mode", "Event", "Requires"]);
    for spec in COMMAND_TABLE.iter() {
        table.add_row(vec![
            spec.name.to_string(),
            spec.mode.to_string(),
            spec.event.map(|e| e.to_string()).unwrap_or_else(|| "-".to_string()),
            spec.requires
                .map(|i| i.field_name().to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    Ok(format!("{}\n\nTotal: {} command(s)", table, COMMAND_TABLE.len()))
}

fn format_validation_report(source: &str, report: &ValidationReport) -> String {
    let mut output = format!("Configuration: {}\n", source);
    if report.is_valid() {
        output.push_str("Status: valid\n");
    } else {
        output.push_str("Status: invalid\n");
    }
    if !report.errors.is_empty() {
        output.push_str("\nErrors:\n");
        for error in &report.errors {
            output.push_str(&format!("  - {}\n", error));
        }
    }
    if !report.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &report.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }
    output
}
