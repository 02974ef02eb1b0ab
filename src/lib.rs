//! Interview Assistant - persona interview answers with optional speech
//!
//! A user picks one of five fixed interview questions; the question is sent
//! with a persona prompt to Google Gemini, and the answer can be turned into
//! an MP3 clip with Google Cloud Text-to-Speech.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │              Presentation (HTTP API / CLI)           │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Interview Session                    │
//! │   Questions  │  Response Generator  │  Synthesizer   │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │   Credentials (key document, service account)        │
//! │   Gemini generateContent  │  Google Cloud TTS        │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod credentials;
pub mod docx;
pub mod error;
pub mod generation;
pub mod persona;
pub mod questions;
pub mod session;
pub mod speech;

pub use config::Config;
pub use credentials::{CredentialOverrides, Credentials, DevDefaults};
pub use error::{Error, Result};
pub use generation::{
    FailurePolicy, GeminiClient, GenerationResult, ResponseGenerator, TextGenerator,
};
pub use persona::{GenerationRequest, Persona};
pub use questions::InterviewQuestion;
pub use session::{InterviewResponse, InterviewSession, ResponseMode};
pub use speech::{AudioClip, GoogleTts, SpeechBackend, SpeechSynthesizer, SynthesisResult};
