use async_trait::async_trait;
use secrecy::SecretString;

pub mod error;

pub use error::{LlmError, LlmResult, MirageError};

/// Registry key of the single simulation slot served by `/api/mirage`
pub const DEFAULT_SIMULATION_KEY: &str = "default";

/// Prefix of the comment returned by a [`ModelInvoker`] in place of code when
/// the provider call fails
pub const ERROR_SENTINEL_PREFIX: &str = "// Error:";

/// Port for the generative model that writes generator code.
///
/// Implementations never fail: provider errors are encoded in the returned
/// text as a comment starting with [`ERROR_SENTINEL_PREFIX`], which the
/// compiler later rejects.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    async fn invoke(&self, credential: &SecretString, prompt: &str) -> String;
}

/// Builds the sentinel text for a failed model invocation
pub fn error_sentinel(message: impl std::fmt::Display) -> String {
    // Keep the sentinel a single comment line even for multi-line provider errors
    let message = message.to_string().replace(['\r', '\n'], " ");
    format!("{} {}", ERROR_SENTINEL_PREFIX, message)
}
