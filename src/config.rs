use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    ledger::DEFAULT_ADDRESS_PREFIX,
    params::{LATEST_PARAMS_VERSION, StaticParams, is_supported_version},
    types::BlockHeight,
};

const SCHEMA_FILE_NAME: &str = "settlement.schema.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub params: StaticParams,
    #[serde(default)]
    pub ledger: LedgerRuntimeConfig,
    #[serde(default)]
    pub run: RunConfig,
}

fn default_enabled_true() -> bool {
    true
}

fn default_logging_dir() -> PathBuf {
    PathBuf::from("./logs/settlement")
}

fn default_logging_filter() -> String {
    "info".to_string()
}

fn default_logging_retention_days() -> usize {
    14
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from("./state/ledger.json")
}

fn default_address_prefix() -> String {
    DEFAULT_ADDRESS_PREFIX.to_string()
}

fn default_from_height() -> BlockHeight {
    1
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_logging_filter")]
    pub filter: String,
    #[serde(default = "default_logging_retention_days")]
    pub retention_days: usize,
    #[serde(default = "default_enabled_true")]
    pub stderr_warn_enabled: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: default_logging_dir(),
            filter: default_logging_filter(),
            retention_days: default_logging_retention_days(),
            stderr_warn_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerRuntimeConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: PathBuf,
    /// Where the ledger is written after the run; defaults to overwriting the input.
    #[serde(default)]
    pub output_path: Option<PathBuf>,
    #[serde(default = "default_address_prefix")]
    pub address_prefix: String,
}

impl Default for LedgerRuntimeConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            output_path: None,
            address_prefix: default_address_prefix(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_from_height")]
    pub from_height: BlockHeight,
    #[serde(default)]
    pub to_height: Option<BlockHeight>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            from_height: default_from_height(),
            to_height: None,
        }
    }
}

impl RunConfig {
    pub fn last_height(&self) -> BlockHeight {
        self.to_height.unwrap_or(self.from_height)
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let config_value: Value = json5::from_str(&config_content)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        let config_base = config_path.parent().unwrap_or_else(|| Path::new("."));
        let schema_path = resolve_schema_path(config_base, &config_value)?;
        validate_against_schema(&config_value, &schema_path)?;

        let mut config: Config = serde_json::from_value(config_value)
            .context("failed to deserialize settlement config")?;

        if !config.ledger.snapshot_path.is_absolute() {
            config.ledger.snapshot_path = config_base.join(&config.ledger.snapshot_path);
        }
        if let Some(output_path) = config.ledger.output_path.as_mut()
            && !output_path.is_absolute()
        {
            *output_path = config_base.join(&*output_path);
        }
        if !is_supported_version(config.params.version) {
            return Err(anyhow!(
                "params.version {} is not supported (latest is {})",
                config.params.version,
                LATEST_PARAMS_VERSION
            ));
        }
        if config.run.last_height() < config.run.from_height {
            return Err(anyhow!(
                "run.to_height ({}) is below run.from_height ({})",
                config.run.last_height(),
                config.run.from_height
            ));
        }

        Ok(config)
    }
}

fn resolve_schema_path(config_base: &Path, config_value: &Value) -> Result<PathBuf> {
    if let Some(path_text) = config_value.get("$schema").and_then(|value| value.as_str()) {
        let configured = PathBuf::from(path_text);
        if configured.is_absolute() {
            return Ok(configured);
        }
        return Ok(config_base.join(&configured));
    }

    let local_default = config_base.join(SCHEMA_FILE_NAME);
    if local_default.exists() {
        return Ok(local_default);
    }

    Err(anyhow!(
        "unable to resolve schema path: expected $schema in config or {} next to it",
        SCHEMA_FILE_NAME
    ))
}

fn validate_against_schema(config_value: &Value, schema_path: &Path) -> Result<()> {
    let schema_content = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_content)
        .with_context(|| format!("failed to parse schema {}", schema_path.display()))?;

    let compiled =
        JSONSchema::compile(&schema).map_err(|e| anyhow!("failed to compile schema: {e}"))?;

    match compiled.validate(config_value) {
        Ok(()) => Ok(()),
        Err(errors_iter) => {
            let validation_errors: Vec<ValidationError> = errors_iter.collect();
            let messages: Vec<String> = validation_errors
                .into_iter()
                .map(|error| error.to_string())
                .collect();
            Err(anyhow!("config validation failed: {}", messages.join("; ")))
        }
    }
}
