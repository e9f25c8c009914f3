use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validator;

use crate::cli::{Cli, FixtureCli};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub model: ModelSettings,
    #[serde(default)]
    pub chaos: ChaosSettings,
    #[serde(default)]
    pub sandbox: SandboxSettings,
    #[serde(default)]
    pub fixture: FixtureSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Generative model provider settings (Gemini REST API)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used when enumeration fails or returns nothing usable
    #[serde(default = "default_fallback_model")]
    pub fallback_model: String,
    /// Substring marking the preferred (fast) model family
    #[serde(default = "default_preferred_marker")]
    pub preferred_marker: String,
    /// Timeout applied to every provider request
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_fallback_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_preferred_marker() -> String {
    "flash".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            fallback_model: default_fallback_model(),
            preferred_marker: default_preferred_marker(),
            timeout_seconds: default_timeout_seconds(),
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChaosSettings {
    /// Chaos state at startup
    #[serde(default)]
    pub enabled: bool,
    /// Probability that a mock request is turned into a simulated 500
    #[serde(default = "default_chaos_failure_rate")]
    pub failure_rate: f64,
}

fn default_chaos_failure_rate() -> f64 {
    0.5
}

impl Default for ChaosSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            failure_rate: default_chaos_failure_rate(),
        }
    }
}

/// Limits enforced on every compiled generator
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SandboxSettings {
    #[serde(default = "default_max_operations")]
    pub max_operations: u64,
    #[serde(default = "default_max_call_levels")]
    pub max_call_levels: usize,
    #[serde(default = "default_max_expr_depth")]
    pub max_expr_depth: usize,
    #[serde(default = "default_max_string_size")]
    pub max_string_size: usize,
    #[serde(default = "default_max_collection_size")]
    pub max_array_size: usize,
    #[serde(default = "default_max_collection_size")]
    pub max_map_size: usize,
}

fn default_max_operations() -> u64 {
    500_000
}

fn default_max_call_levels() -> usize {
    32
}

fn default_max_expr_depth() -> usize {
    64
}

fn default_max_string_size() -> usize {
    64 * 1024
}

fn default_max_collection_size() -> usize {
    10_000
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            max_operations: default_max_operations(),
            max_call_levels: default_max_call_levels(),
            max_expr_depth: default_max_expr_depth(),
            max_string_size: default_max_string_size(),
            max_array_size: default_max_collection_size(),
            max_map_size: default_max_collection_size(),
        }
    }
}

/// Standalone inventory fixture server
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FixtureSettings {
    #[serde(default = "default_fixture_host")]
    pub host: String,
    #[serde(default = "default_fixture_port")]
    pub port: u16,
    #[serde(default = "default_fixture_failure_rate")]
    pub failure_rate: f64,
}

fn default_fixture_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_fixture_port() -> u16 {
    5001
}

fn default_fixture_failure_rate() -> f64 {
    0.15
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            host: default_fixture_host(),
            port: default_fixture_port(),
            failure_rate: default_fixture_failure_rate(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            model: ModelSettings::default(),
            chaos: ChaosSettings::default(),
            sandbox: SandboxSettings::default(),
            fixture: FixtureSettings::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Loads `<root>/mirage.{toml,yaml,json}` if present, falling back to defaults
    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = Path::new(root).join("mirage");
        let settings = Self::load(File::from(config_path).required(false))?;
        settings.validated()
    }

    /// Create settings from CLI arguments (config file, then CLI/env overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(File::from(cli.config.clone()).required(false))?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.validated()
    }

    /// Settings for the standalone fixture binary
    pub fn new_with_fixture_cli(cli: &FixtureCli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(File::from(cli.config.clone()).required(false))?;

        if let Some(host) = &cli.host {
            settings.fixture.host = host.clone();
        }
        if let Some(port) = cli.port {
            settings.fixture.port = port;
        }
        if let Some(rate) = cli.failure_rate {
            settings.fixture.failure_rate = rate;
        }

        settings.validated()
    }

    fn load<S>(source: S) -> Result<Self, anyhow::Error>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let s = Config::builder()
            .add_source(source)
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(chaos) = cli.chaos {
            self.chaos.enabled = chaos;
        }
        if let Some(timeout) = cli.model_timeout {
            self.model.timeout_seconds = timeout;
        }
    }

    fn validated(self) -> Result<Self, anyhow::Error> {
        validator::ConfigValidator::validate(&self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })?;
        Ok(self)
    }
}
