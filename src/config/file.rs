//! TOML configuration file loading
//!
//! Supports `~/.config/interview-assistant/config.toml` as a persistent
//! config source. All fields are optional; the file is a partial overlay on
//! top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Credential file locations
    #[serde(default)]
    pub credentials: CredentialsFileConfig,

    /// Text generation settings
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Speech synthesis settings
    #[serde(default)]
    pub speech: SpeechFileConfig,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Session behaviour
    #[serde(default)]
    pub session: SessionFileConfig,

    /// Persona override
    #[serde(default)]
    pub persona: PersonaFileConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsFileConfig {
    /// Path to the `.docx` holding the Gemini key
    pub gemini_key_path: Option<PathBuf>,

    /// Path to the service-account JSON for TTS
    pub gcp_key_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Model identifier (e.g. "gemini-1.5-pro")
    pub model: Option<String>,

    /// API base URL
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SpeechFileConfig {
    /// API base URL
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Port to listen on
    pub port: Option<u16>,

    /// Directory with a web page to serve
    pub static_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionFileConfig {
    /// "apology" or "detailed"
    pub failure_policy: Option<String>,

    /// Timeout for each outbound request
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PersonaFileConfig {
    /// Display name
    pub name: Option<String>,

    /// System prompt replacing the built-in one
    pub prompt: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ConfigFile {
    config_file_path().map_or_else(ConfigFile::default, |path| load_from(&path))
}

/// Load a TOML config file from an explicit path, with the same fallbacks
pub fn load_from(path: &Path) -> ConfigFile {
    if !path.exists() {
        return ConfigFile::default();
    }

    let parsed: Result<ConfigFile> = std::fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|content| Ok(toml::from_str(&content)?));

    parsed.map_or_else(
        |error| {
            tracing::warn!(path = %path.display(), %error, "ignoring unusable config file");
            ConfigFile::default()
        },
        |config| {
            tracing::debug!(path = %path.display(), "loaded config file");
            config
        },
    )
}

/// Return the config file path: `~/.config/interview-assistant/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| {
        d.config_dir()
            .join("interview-assistant")
            .join("config.toml")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let file: ConfigFile = toml::from_str(
            r#"
            [credentials]
            gemini_key_path = "/keys/gemini.docx"

            [server]
            port = 9000

            [session]
            failure_policy = "detailed"
            "#,
        )
        .unwrap();

        assert_eq!(
            file.credentials.gemini_key_path,
            Some(PathBuf::from("/keys/gemini.docx"))
        );
        assert!(file.credentials.gcp_key_path.is_none());
        assert_eq!(file.server.port, Some(9000));
        assert_eq!(file.session.failure_policy.as_deref(), Some("detailed"));
        assert!(file.persona.prompt.is_none());
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();

        let file = load_from(&path);
        assert!(file.server.port.is_none());
    }

    #[test]
    fn unreadable_path_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        // exists, but is a directory
        let file = load_from(dir.path());
        assert!(file.server.port.is_none());
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[llm]\nmodel = \"gemini-1.5-flash\"\n").unwrap();

        let file = load_from(&path);
        assert_eq!(file.llm.model.as_deref(), Some("gemini-1.5-flash"));
    }

    #[test]
    fn missing_file_is_default() {
        let file = load_from(Path::new("/nonexistent/config.toml"));
        assert!(file.llm.model.is_none());
    }
}
