//! Text generation via Google Gemini
//!
//! [`ResponseGenerator`] never fails: any error from the underlying
//! [`TextGenerator`] is turned into [`GenerationResult::Failure`] so the
//! caller can tell fallback text apart from model output.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::persona::Persona;
use crate::{Error, Result};

/// Default Gemini endpoint
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro";

const APOLOGY: &str = "I'm experiencing some technical difficulties. Could you please try again?";

/// Backend that turns a prompt into text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete a prompt
    ///
    /// # Errors
    ///
    /// Returns error if the remote call fails or yields no text
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Outcome of a generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationResult {
    /// Text returned by the model, verbatim
    Text { text: String },
    /// The call failed; `message` is the failure detail
    Failure { message: String },
}

impl GenerationResult {
    /// Model text, if the call succeeded
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    /// Whether this is a failure
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Text to show the user under a failure policy
    #[must_use]
    pub fn display_text(&self, policy: FailurePolicy) -> String {
        match self {
            Self::Text { text } => text.clone(),
            Self::Failure { message } => policy.fallback_text(message),
        }
    }
}

/// How generation failures are surfaced to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Generic apology, failure detail only goes to the log
    #[default]
    Apology,
    /// Show the failure detail
    Detailed,
}

impl FailurePolicy {
    /// Fallback text for a failure detail
    #[must_use]
    pub fn fallback_text(self, detail: &str) -> String {
        match self {
            Self::Apology => APOLOGY.to_string(),
            Self::Detailed => format!("Error generating response: {detail}"),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apology" => Ok(Self::Apology),
            "detailed" => Ok(Self::Detailed),
            other => Err(Error::Config(format!(
                "unknown failure policy '{other}' (expected 'apology' or 'detailed')"
            ))),
        }
    }
}

/// Persona-aware wrapper around a [`TextGenerator`]
#[derive(Clone)]
pub struct ResponseGenerator {
    backend: Arc<dyn TextGenerator>,
    persona: Persona,
}

impl ResponseGenerator {
    #[must_use]
    pub fn new(backend: Arc<dyn TextGenerator>, persona: Persona) -> Self {
        Self { backend, persona }
    }

    /// Active persona
    #[must_use]
    pub const fn persona(&self) -> &Persona {
        &self.persona
    }

    /// Full prompt sent for a question
    #[must_use]
    pub fn prompt_for(&self, question: &str) -> String {
        self.persona.request(question).prompt()
    }

    /// Generate an answer to a question
    pub async fn generate(&self, question: &str) -> GenerationResult {
        let prompt = self.prompt_for(question);
        tracing::debug!(question, prompt_chars = prompt.len(), "generating response");

        match self.backend.complete(&prompt).await {
            Ok(text) => {
                tracing::info!(chars = text.len(), "generation complete");
                GenerationResult::Text { text }
            }
            Err(e) => {
                tracing::error!(error = %e, "response generation failed");
                GenerationResult::Failure {
                    message: e.to_string(),
                }
            }
        }
    }
}

#[derive(Serialize)]
struct GeminiRequest<'a> {
    contents: [GeminiContent<'a>; 1],
}

#[derive(Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: [GeminiPart<'a>; 1],
}

#[derive(Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a client against the public Gemini endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be built
    pub fn new(api_key: SecretString, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Self::with_base_url(api_key, model, timeout, GEMINI_BASE_URL)
    }

    /// Create a client against a custom endpoint
    ///
    /// # Errors
    ///
    /// Returns error if the API key is empty or the HTTP client cannot be built
    pub fn with_base_url(
        api_key: SecretString,
        model: impl Into<String>,
        timeout: Duration,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("Gemini API key required".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Model identifier
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GeminiRequest {
            contents: [GeminiContent {
                role: "user",
                parts: [GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Gemini request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Generation(format!("Gemini API error {status}: {body}")));
        }

        let result: GeminiResponse = response.json().await?;

        let text: String = result
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(Error::Generation("empty response from Gemini".to_string()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn complete(&self, prompt: &str) -> Result<String> {
            Ok(prompt.to_string())
        }
    }

    struct Broken;

    #[async_trait]
    impl TextGenerator for Broken {
        async fn complete(&self, _prompt: &str) -> Result<String> {
            Err(Error::Generation("quota exceeded".to_string()))
        }
    }

    #[tokio::test]
    async fn success_returns_text_verbatim() {
        let generator = ResponseGenerator::new(Arc::new(Echo), Persona::new("T", "sys"));
        let result = generator.generate("Q?").await;
        assert_eq!(
            result,
            GenerationResult::Text {
                text: "sys\n\nQuestion: Q?".to_string()
            }
        );
    }

    #[tokio::test]
    async fn failure_is_converted_not_propagated() {
        let generator = ResponseGenerator::new(Arc::new(Broken), Persona::default());
        let result = generator.generate("Q?").await;
        assert!(result.is_failure());
        assert!(result.text().is_none());

        let apology = result.display_text(FailurePolicy::Apology);
        assert_eq!(apology, APOLOGY);

        let detailed = result.display_text(FailurePolicy::Detailed);
        assert!(detailed.starts_with("Error generating response: "));
        assert!(detailed.contains("quota exceeded"));
    }

    #[test]
    fn parses_failure_policy() {
        assert_eq!("Apology".parse::<FailurePolicy>().unwrap(), FailurePolicy::Apology);
        assert_eq!(" detailed ".parse::<FailurePolicy>().unwrap(), FailurePolicy::Detailed);
        assert!("loud".parse::<FailurePolicy>().is_err());
    }

    #[test]
    fn rejects_empty_api_key() {
        let result = GeminiClient::new(
            SecretString::from(String::new()),
            DEFAULT_GEMINI_MODEL,
            Duration::from_secs(30),
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn request_body_shape() {
        let request = GeminiRequest {
            contents: [GeminiContent {
                role: "user",
                parts: [GeminiPart { text: "hi" }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
    }
}
