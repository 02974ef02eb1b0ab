//! Interview session controller
//!
//! One user action is one call to [`InterviewSession::respond`]: generate the
//! answer, then synthesize it when audio was requested. Nothing is retried or
//! cached; each call is an independent round trip.

use std::sync::Arc;

use crate::Result;
use crate::config::Config;
use crate::credentials::Credentials;
use crate::generation::{FailurePolicy, GeminiClient, GenerationResult, ResponseGenerator};
use crate::questions::InterviewQuestion;
use crate::speech::{GoogleTts, SpeechSynthesizer, SynthesisResult, TokenSource};

/// What the user asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    TextOnly,
    TextAndAudio,
}

/// Result of one user action
#[derive(Debug, Clone)]
pub struct InterviewResponse {
    pub question: InterviewQuestion,
    pub text: GenerationResult,
    /// `None` in text-only mode
    pub audio: Option<SynthesisResult>,
}

impl InterviewResponse {
    /// Whether a playable clip is available
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.audio.as_ref().and_then(SynthesisResult::audio).is_some()
    }
}

/// Orchestrates generation and synthesis for the fixed question set
#[derive(Clone)]
pub struct InterviewSession {
    generator: ResponseGenerator,
    synthesizer: SpeechSynthesizer,
    policy: FailurePolicy,
}

impl InterviewSession {
    #[must_use]
    pub const fn new(
        generator: ResponseGenerator,
        synthesizer: SpeechSynthesizer,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            generator,
            synthesizer,
            policy,
        }
    }

    /// Wire up the Gemini and Google TTS clients from resolved credentials
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if either client cannot be constructed, e.g.
    /// the service-account file is missing or malformed
    pub fn from_config(config: &Config, credentials: &Credentials) -> Result<Self> {
        let gemini = GeminiClient::with_base_url(
            credentials.generation_api_key().clone(),
            config.llm.model.clone(),
            config.request_timeout,
            config.llm.base_url.clone(),
        )?;
        tracing::debug!(model = gemini.model(), "configured Gemini client");

        let tts = match &config.speech.access_token {
            Some(token) => {
                tracing::info!("using pre-minted TTS access token");
                GoogleTts::new(TokenSource::fixed(token.clone()), config.request_timeout)?
            }
            None => GoogleTts::from_service_account(
                credentials.speech_credential_path(),
                config.request_timeout,
            )?,
        }
        .with_base_url(config.speech.base_url.clone());

        Ok(Self::new(
            ResponseGenerator::new(Arc::new(gemini), config.persona.clone()),
            SpeechSynthesizer::new(Arc::new(tts)),
            config.failure_policy,
        ))
    }

    /// The selectable questions, in display order
    #[must_use]
    pub const fn questions(&self) -> &'static [InterviewQuestion] {
        &InterviewQuestion::ALL
    }

    /// Failure policy chosen at construction
    #[must_use]
    pub const fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Generator used for text answers
    #[must_use]
    pub const fn generator(&self) -> &ResponseGenerator {
        &self.generator
    }

    /// Text shown to the user for a generation result
    #[must_use]
    pub fn display_text(&self, result: &GenerationResult) -> String {
        result.display_text(self.policy)
    }

    /// Answer a question, optionally with audio
    pub async fn respond(&self, question: InterviewQuestion, mode: ResponseMode) -> InterviewResponse {
        tracing::info!(question = question.index(), ?mode, "handling interview request");

        let text = self.generator.generate(question.text()).await;

        let audio = match mode {
            ResponseMode::TextOnly => None,
            ResponseMode::TextAndAudio => Some(match text.text() {
                Some(answer) => self.synthesizer.synthesize(answer).await,
                None => SynthesisResult::Unavailable {
                    reason: "no response text to synthesize".to_string(),
                },
            }),
        };

        InterviewResponse {
            question,
            text,
            audio,
        }
    }
}
