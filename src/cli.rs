use clap::Parser;
use std::path::PathBuf;

/// Mirage - AI-generated mock data server with chaos injection
#[derive(Parser, Debug, Clone)]
#[command(name = "mirage", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "MIRAGE_CONFIG", default_value = "mirage.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "MIRAGE_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "MIRAGE_PORT")]
    pub port: Option<u16>,

    /// Start with chaos mode enabled
    #[arg(long, env = "MIRAGE_CHAOS", num_args = 0..=1, default_missing_value = "true")]
    pub chaos: Option<bool>,

    /// Timeout in seconds for generative model requests
    #[arg(long, env = "MIRAGE_MODEL_TIMEOUT")]
    pub model_timeout: Option<u64>,
}

/// Standalone inventory fixture server
#[derive(Parser, Debug, Clone)]
#[command(name = "shadow-server", version, about, long_about = None)]
pub struct FixtureCli {
    /// Path to the configuration file
    #[arg(short, long, env = "MIRAGE_CONFIG", default_value = "mirage.toml")]
    pub config: PathBuf,

    /// Fixture host address
    #[arg(long, env = "SHADOW_HOST")]
    pub host: Option<String>,

    /// Fixture port
    #[arg(long, env = "SHADOW_PORT")]
    pub port: Option<u16>,

    /// Probability of a simulated 500 per request
    #[arg(long, env = "SHADOW_FAILURE_RATE")]
    pub failure_rate: Option<f64>,
}
