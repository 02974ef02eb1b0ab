//! Google Cloud Text-to-Speech client

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::auth::{ServiceAccount, TokenSource};
use super::{AUDIO_ENCODING, LANGUAGE_CODE, SSML_GENDER, SpeechBackend};
use crate::{Error, Result};

/// Default Text-to-Speech endpoint
pub const GOOGLE_TTS_BASE_URL: &str = "https://texttospeech.googleapis.com";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeRequest<'a> {
    input: SynthesisInput<'a>,
    voice: VoiceSelection<'a>,
    audio_config: AudioConfig<'a>,
}

#[derive(Serialize)]
struct SynthesisInput<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceSelection<'a> {
    language_code: &'a str,
    ssml_gender: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig<'a> {
    audio_encoding: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    #[serde(default)]
    audio_content: String,
}

/// Synthesizes speech with Google Cloud TTS
pub struct GoogleTts {
    client: reqwest::Client,
    tokens: TokenSource,
    base_url: String,
}

impl GoogleTts {
    /// Create a client authenticated by a service-account key file
    ///
    /// The key file is read here, so a missing or malformed file fails at
    /// startup rather than on the first request.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the key file cannot be loaded
    pub fn from_service_account(path: &Path, timeout: Duration) -> Result<Self> {
        let account = ServiceAccount::from_file(path)?;
        tracing::info!(client_email = %account.client_email, "loaded TTS service account");
        Self::new(TokenSource::service_account(account), timeout)
    }

    /// Create a client with an explicit token source
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(tokens: TokenSource, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            tokens,
            base_url: GOOGLE_TTS_BASE_URL.to_string(),
        })
    }

    /// Point the client at a different endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl SpeechBackend for GoogleTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        let token = self.tokens.access_token(&self.client).await?;

        let request = SynthesizeRequest {
            input: SynthesisInput { text },
            voice: VoiceSelection {
                language_code: LANGUAGE_CODE,
                ssml_gender: SSML_GENDER,
            },
            audio_config: AudioConfig {
                audio_encoding: AUDIO_ENCODING,
            },
        };

        let response = self
            .client
            .post(format!("{}/v1/text:synthesize", self.base_url))
            .bearer_auth(token.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "TTS request failed");
                e
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Synthesis(format!("Google TTS error {status}: {body}")));
        }

        let result: SynthesizeResponse = response.json().await?;

        base64::engine::general_purpose::STANDARD
            .decode(result.audio_content.as_bytes())
            .map_err(|e| Error::Synthesis(format!("invalid audio payload: {e}")))
    }
}
