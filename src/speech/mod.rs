//! Speech synthesis
//!
//! [`SpeechSynthesizer`] wraps a [`SpeechBackend`] and never fails: errors
//! and empty payloads become [`SynthesisResult::Unavailable`], which callers
//! must check before offering playback or download.

mod auth;
mod google;

use std::sync::Arc;

use async_trait::async_trait;

pub use auth::{ServiceAccount, TokenSource};
pub use google::{GOOGLE_TTS_BASE_URL, GoogleTts};

use crate::Result;

/// Voice locale
pub const LANGUAGE_CODE: &str = "en-US";

/// Voice gender
pub const SSML_GENDER: &str = "NEUTRAL";

/// Audio encoding
pub const AUDIO_ENCODING: &str = "MP3";

/// MIME type of produced clips
pub const AUDIO_MIME: &str = "audio/mpeg";

/// Suggested download filename for produced clips
pub const AUDIO_FILE_NAME: &str = "interview_response.mp3";

/// Backend that turns text into encoded audio
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Synthesize text to MP3 bytes
    ///
    /// # Errors
    ///
    /// Returns error if the remote call fails
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}

/// An encoded audio clip held fully in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub file_name: &'static str,
}

impl AudioClip {
    /// Wrap MP3 bytes
    #[must_use]
    pub const fn mp3(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            mime: AUDIO_MIME,
            file_name: AUDIO_FILE_NAME,
        }
    }
}

/// Outcome of a synthesis call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisResult {
    /// Non-empty audio
    Audio(AudioClip),
    /// No audio was produced
    Unavailable { reason: String },
}

impl SynthesisResult {
    /// Audio clip, if one was produced
    #[must_use]
    pub const fn audio(&self) -> Option<&AudioClip> {
        match self {
            Self::Audio(clip) => Some(clip),
            Self::Unavailable { .. } => None,
        }
    }

    /// Take the audio clip, if one was produced
    #[must_use]
    pub fn into_audio(self) -> Option<AudioClip> {
        match self {
            Self::Audio(clip) => Some(clip),
            Self::Unavailable { .. } => None,
        }
    }

    fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

/// Failure-absorbing wrapper around a [`SpeechBackend`]
#[derive(Clone)]
pub struct SpeechSynthesizer {
    backend: Arc<dyn SpeechBackend>,
}

impl SpeechSynthesizer {
    #[must_use]
    pub fn new(backend: Arc<dyn SpeechBackend>) -> Self {
        Self { backend }
    }

    /// Synthesize text with the fixed voice settings
    pub async fn synthesize(&self, text: &str) -> SynthesisResult {
        if text.trim().is_empty() {
            return SynthesisResult::unavailable("no text to synthesize");
        }

        tracing::debug!(chars = text.len(), "synthesizing speech");

        match self.backend.synthesize(text).await {
            Ok(bytes) if bytes.is_empty() => {
                tracing::warn!("TTS returned empty audio");
                SynthesisResult::unavailable("speech service returned no audio")
            }
            Ok(bytes) => {
                tracing::info!(audio_bytes = bytes.len(), "synthesis complete");
                SynthesisResult::Audio(AudioClip::mp3(bytes))
            }
            Err(e) => {
                tracing::error!(error = %e, "text-to-speech conversion failed");
                SynthesisResult::unavailable(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    struct Fixed(Vec<u8>);

    #[async_trait]
    impl SpeechBackend for Fixed {
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl SpeechBackend for Failing {
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>> {
            Err(Error::Synthesis("permission denied".to_string()))
        }
    }

    #[tokio::test]
    async fn audio_is_wrapped_as_mp3() {
        let synth = SpeechSynthesizer::new(Arc::new(Fixed(vec![0xFF, 0xFB, 0x90])));
        let result = synth.synthesize("hello").await;
        let clip = result.audio().expect("audio");
        assert_eq!(clip.bytes, vec![0xFF, 0xFB, 0x90]);
        assert_eq!(clip.mime, "audio/mpeg");
        assert!(clip.file_name.ends_with(".mp3"));
    }

    #[tokio::test]
    async fn failure_is_unavailable() {
        let synth = SpeechSynthesizer::new(Arc::new(Failing));
        let result = synth.synthesize("hello").await;
        assert!(result.audio().is_none());
        assert!(
            matches!(result, SynthesisResult::Unavailable { ref reason } if reason.contains("permission denied"))
        );
    }

    #[tokio::test]
    async fn empty_audio_is_unavailable() {
        let synth = SpeechSynthesizer::new(Arc::new(Fixed(Vec::new())));
        assert!(synth.synthesize("hello").await.into_audio().is_none());
    }

    #[tokio::test]
    async fn blank_text_skips_backend() {
        let synth = SpeechSynthesizer::new(Arc::new(Failing));
        let result = synth.synthesize("   ").await;
        assert_eq!(
            result,
            SynthesisResult::Unavailable {
                reason: "no text to synthesize".to_string()
            }
        );
    }
}
