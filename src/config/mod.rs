//! Configuration management
//!
//! Precedence is environment > config file > built-in defaults. Credential
//! paths from the config file count as caller-supplied values and are handed
//! to the credential resolver as overrides.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::credentials::CredentialOverrides;
use crate::generation::{DEFAULT_GEMINI_MODEL, FailurePolicy, GEMINI_BASE_URL};
use crate::persona::Persona;
use crate::speech::GOOGLE_TTS_BASE_URL;
use crate::Result;

pub use file::ConfigFile;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8501;

/// Default timeout for each outbound request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Interview assistant configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Credential paths supplied by configuration
    pub credentials: CredentialOverrides,

    /// Text generation settings
    pub llm: LlmConfig,

    /// Speech synthesis settings
    pub speech: SpeechConfig,

    /// HTTP server settings
    pub server: ServerConfig,

    /// How generation failures are shown
    pub failure_policy: FailurePolicy,

    /// Timeout applied to every outbound request
    pub request_timeout: Duration,

    /// Persona used for every prompt
    pub persona: Persona,
}

/// Text generation settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Gemini model identifier
    pub model: String,

    /// Gemini API base URL
    pub base_url: String,
}

/// Speech synthesis settings
#[derive(Debug, Clone)]
pub struct SpeechConfig {
    /// Text-to-Speech API base URL
    pub base_url: String,

    /// Pre-minted access token used instead of the service account
    /// (from `GOOGLE_TTS_ACCESS_TOKEN`)
    pub access_token: Option<SecretString>,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Path to static files directory (web page)
    pub static_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the config file and process environment
    ///
    /// # Errors
    ///
    /// Returns error if a setting has an invalid value
    pub fn load() -> Result<Self> {
        Self::from_sources(file::load_config_file(), |name| std::env::var(name).ok())
    }

    /// Build configuration from a parsed config file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the failure policy or a numeric setting is invalid
    pub fn from_sources<F>(fc: ConfigFile, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let failure_policy = env("INTERVIEW_FAILURE_POLICY")
            .or(fc.session.failure_policy)
            .map(|s| s.parse::<FailurePolicy>())
            .transpose()?
            .unwrap_or_default();

        let port = match env("INTERVIEW_PORT") {
            Some(v) => v.trim().parse::<u16>().map_err(|e| {
                crate::Error::Config(format!("invalid INTERVIEW_PORT '{v}': {e}"))
            })?,
            None => fc.server.port.unwrap_or(DEFAULT_PORT),
        };

        let timeout_secs = fc
            .session
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(crate::Error::Config(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        let default_persona = Persona::default();
        let persona = Persona::new(
            fc.persona.name.unwrap_or(default_persona.name),
            fc.persona.prompt.unwrap_or(default_persona.system_prompt),
        );

        Ok(Self {
            credentials: CredentialOverrides {
                gemini_key_path: fc.credentials.gemini_key_path,
                gcp_key_path: fc.credentials.gcp_key_path,
            },
            llm: LlmConfig {
                model: env("INTERVIEW_GEMINI_MODEL")
                    .or(fc.llm.model)
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: fc.llm.base_url.unwrap_or_else(|| GEMINI_BASE_URL.to_string()),
            },
            speech: SpeechConfig {
                base_url: fc
                    .speech
                    .base_url
                    .unwrap_or_else(|| GOOGLE_TTS_BASE_URL.to_string()),
                access_token: env("GOOGLE_TTS_ACCESS_TOKEN").map(SecretString::from),
            },
            server: ServerConfig {
                port,
                static_dir: fc.server.static_dir,
            },
            failure_policy,
            request_timeout: Duration::from_secs(timeout_secs),
            persona,
        })
    }
}
