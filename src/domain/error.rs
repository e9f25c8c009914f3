//! Error types for the deploy pipeline and the mock endpoint

use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced to callers of the deploy and mock endpoints
#[derive(Debug, Error)]
pub enum MirageError {
    /// Deploy request carried no model credential
    #[error("API Key Missing")]
    CredentialMissing,

    /// Provider call failed (network, auth, quota)
    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    /// Generated code did not compile into a generator
    #[error("Syntax Error: {0}")]
    Compilation(String),

    /// Mock endpoint hit before any successful deploy
    #[error("Not Deployed")]
    NotDeployed,

    /// Compiled generator failed when invoked
    #[error("Runtime Error: {0}")]
    GeneratorRuntime(String),

    /// Intentionally injected failure
    #[error("CHAOS MODE: 500 Server Error Simulated")]
    SimulatedChaos,

    /// Prompt template could not be rendered
    #[error("Prompt error: {0}")]
    Prompt(String),
}

impl MirageError {
    /// HTTP status used when the error is returned from the mock endpoint
    pub fn status_code(&self) -> StatusCode {
        match self {
            MirageError::NotDeployed => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            MirageError::CredentialMissing => "credential_missing",
            MirageError::ModelInvocation(_) => "model_invocation",
            MirageError::Compilation(_) => "compilation",
            MirageError::NotDeployed => "not_deployed",
            MirageError::GeneratorRuntime(_) => "runtime",
            MirageError::SimulatedChaos => "chaos",
            MirageError::Prompt(_) => "prompt",
        }
    }
}

/// Errors specific to the generative model provider
#[derive(Debug, Error)]
pub enum LlmError {
    /// Non-success status from the provider
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be interpreted
    #[error("Parse error: {0}")]
    Parse(String),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else if err.is_connect() {
            LlmError::Network(format!("Connection error: {}", err))
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

/// Result type alias for provider operations
pub type LlmResult<T> = Result<T, LlmError>;
