//! Gateway settings.
//!
//! Sources are layered, later ones winning: built-in defaults, an optional
//! TOML file, `LNAC_*` environment variables, then command-line flags.

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use config::{Config, Environment, File as ConfigFile};
use lnac_library::DEFAULT_DATA_DIR;
use lnac_types::LevelPolicy;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "LNAC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub level_policy: LevelPolicy,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Shared secret callers must present; read from `LNAC_API_KEY`.
    pub api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            level_policy: LevelPolicy::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::default(),
            api_key: None,
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("level_policy", &self.level_policy)
            .field("log_level", &self.log_level)
            .field("log_format", &self.log_format)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Command-line overrides, flattened into the binary's CLI.
#[derive(Debug, Clone, Default, Args)]
pub struct SettingsOverrides {
    /// Bind address
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory holding the library JSON documents
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// How the reported level is derived: coerce or passthrough
    #[arg(long)]
    pub level_policy: Option<LevelPolicy>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

impl Settings {
    /// Loads settings from the optional file and the process environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::from_sources(config_path, Environment::with_prefix(ENV_PREFIX))
    }

    /// Same as [`Settings::load`] with an explicit environment source.
    pub fn from_sources(config_path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            if !path.exists() {
                bail!(
                    "Configuration file {} not found (specified via --config)",
                    path.display()
                );
            }
            builder = builder.add_source(ConfigFile::from(path));
        }

        let config = builder
            .add_source(environment)
            .build()
            .context("failed to assemble configuration")?;

        config
            .try_deserialize()
            .context("invalid gateway configuration")
    }

    pub fn apply(&mut self, overrides: SettingsOverrides) {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(data_dir) = overrides.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(level_policy) = overrides.level_policy {
            self.level_policy = level_policy;
        }
        if let Some(log_level) = overrides.log_level {
            self.log_level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.log_format = log_format;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("port must be non-zero");
        }
        if self.host.trim().is_empty() {
            bail!("host must not be empty");
        }
        if self.data_dir.as_os_str().is_empty() {
            bail!("data_dir must not be empty");
        }
        if self.log_level.trim().is_empty() {
            bail!("log_level must not be empty");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
