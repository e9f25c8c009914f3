//! Google Gemini model invoker
//!
//! Picks a generation-capable model, submits the generator prompt and returns
//! the raw reply text. Failures never escape: enumeration problems fall back
//! to the configured model and generation problems become an error sentinel.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::ModelSettings;
use crate::domain::{error_sentinel, LlmError, LlmResult, MirageError, ModelInvoker};

const API_KEY_HEADER: &str = "x-goog-api-key";
const GENERATE_METHOD: &str = "generateContent";
const MODEL_PREFIX: &str = "models/";

pub struct GeminiInvoker {
    client: reqwest::Client,
    base_url: String,
    fallback_model: String,
    preferred_marker: String,
    temperature: Option<f32>,
}

impl GeminiInvoker {
    pub fn new(settings: &ModelSettings) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            fallback_model: settings.fallback_model.clone(),
            preferred_marker: settings.preferred_marker.clone(),
            temperature: settings.temperature,
        })
    }

    /// Identifiers of models that support content generation
    pub async fn list_models(&self, credential: &SecretString) -> LlmResult<Vec<String>> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, credential.expose_secret())
            .query(&[("pageSize", "1000")])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let listing: ModelList = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse model list: {}", e)))?;

        Ok(listing
            .models
            .into_iter()
            .filter(|m| m.supported_generation_methods.iter().any(|g| g == GENERATE_METHOD))
            .map(|m| m.name.trim_start_matches(MODEL_PREFIX).to_string())
            .collect())
    }

    /// Chosen model for this credential; enumeration failure only skips selection
    pub async fn select_model(&self, credential: &SecretString) -> String {
        match self.list_models(credential).await {
            Ok(models) => choose_model(&models, &self.preferred_marker, &self.fallback_model),
            Err(e) => {
                warn!(
                    "Model enumeration failed, using fallback {}: {}",
                    self.fallback_model, e
                );
                self.fallback_model.clone()
            }
        }
    }

    fn build_request_body(&self, prompt: &str) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        if let Some(temp) = self.temperature {
            body["generationConfig"] = json!({ "temperature": temp });
        }

        body
    }

    pub async fn generate_content(
        &self,
        credential: &SecretString,
        model: &str,
        prompt: &str,
    ) -> LlmResult<String> {
        let url = format!("{}/models/{}:{}", self.base_url, model, GENERATE_METHOD);

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, credential.expose_secret())
            .json(&self.build_request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(format!("Failed to parse response: {}", e)))?;

        gemini_response.text()
    }
}

#[async_trait]
impl ModelInvoker for GeminiInvoker {
    async fn invoke(&self, credential: &SecretString, prompt: &str) -> String {
        let model = self.select_model(credential).await;
        info!("Generating generator code with model {}", model);

        match self.generate_content(credential, &model, prompt).await {
            Ok(text) => {
                debug!("Model reply ({} bytes):\n{}", text.len(), text);
                text
            }
            Err(e) => {
                let failure = MirageError::ModelInvocation(e.to_string());
                warn!("{}", failure);
                error_sentinel(failure)
            }
        }
    }
}

/// Preferred-marker model, else the first one, else the fallback
pub fn choose_model(models: &[String], preferred_marker: &str, fallback: &str) -> String {
    models
        .iter()
        .find(|m| m.contains(preferred_marker))
        .or_else(|| models.first())
        .cloned()
        .unwrap_or_else(|| fallback.to_string())
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    /// Concatenated text parts of the first candidate
    fn text(&self) -> LlmResult<String> {
        let candidate = self
            .candidates
            .first()
            .ok_or_else(|| LlmError::Parse("No candidates in response".to_string()))?;

        let text: String = candidate
            .content
            .as_ref()
            .and_then(|c| c.parts.as_ref())
            .map(|parts| parts.iter().filter_map(|p| p.text.as_deref()).collect())
            .unwrap_or_default();

        if text.is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("UNKNOWN");
            return Err(LlmError::Parse(format!(
                "Candidate has no text (finish reason: {})",
                reason
            )));
        }

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    text: Option<String>,
}
