//! Credential resolution
//!
//! Two secrets are needed before anything else can start:
//! - the Gemini API key, stored as the text of a `.docx` key document
//! - the path to a Google Cloud service-account JSON file used for TTS
//!
//! Each path is resolved as: explicit value → environment variable →
//! development default (only when the caller opted in). The service-account
//! file is not parsed here; its path is handed to the speech client
//! constructor directly instead of being exported through the process
//! environment.

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result, docx};

/// Environment variable holding the key document path
pub const GEMINI_KEY_PATH_ENV: &str = "GEMINI_KEY_PATH";

/// Environment variable holding the service-account file path
pub const GCP_KEY_PATH_ENV: &str = "GCP_KEY_PATH";

/// Resolved credentials, held for the process lifetime
#[derive(Debug, Clone)]
pub struct Credentials {
    generation_api_key: SecretString,
    speech_credential_path: PathBuf,
}

impl Credentials {
    /// Create credentials from already-known values
    #[must_use]
    pub fn new(generation_api_key: SecretString, speech_credential_path: PathBuf) -> Self {
        Self {
            generation_api_key,
            speech_credential_path,
        }
    }

    /// Gemini API key
    #[must_use]
    pub const fn generation_api_key(&self) -> &SecretString {
        &self.generation_api_key
    }

    /// Path to the service-account JSON consumed by the speech client
    #[must_use]
    pub fn speech_credential_path(&self) -> &Path {
        &self.speech_credential_path
    }
}

/// Paths supplied directly by the caller (CLI flags, config file)
#[derive(Debug, Clone, Default)]
pub struct CredentialOverrides {
    pub gemini_key_path: Option<PathBuf>,
    pub gcp_key_path: Option<PathBuf>,
}

/// Last-resort paths for local development
///
/// Never consulted unless the caller passes them in explicitly; a production
/// deployment should leave this `None` and configure real paths.
#[derive(Debug, Clone)]
pub struct DevDefaults {
    pub gemini_key_path: PathBuf,
    pub gcp_key_path: PathBuf,
}

impl DevDefaults {
    /// Conventional `secrets/` layout relative to the working directory
    #[must_use]
    pub fn local() -> Self {
        Self {
            gemini_key_path: PathBuf::from("secrets/gemini-key.docx"),
            gcp_key_path: PathBuf::from("secrets/gcp-service-account.json"),
        }
    }
}

/// Resolve credentials using the process environment
///
/// # Errors
///
/// Returns `Error::Config` if either path is unset or the key document
/// cannot be read or yields an empty key
pub fn resolve(overrides: &CredentialOverrides, dev: Option<&DevDefaults>) -> Result<Credentials> {
    resolve_with(overrides, dev, |name| std::env::var(name).ok())
}

/// Resolve credentials with a custom environment lookup
///
/// # Errors
///
/// Same as [`resolve`]
pub fn resolve_with<F>(
    overrides: &CredentialOverrides,
    dev: Option<&DevDefaults>,
    lookup: F,
) -> Result<Credentials>
where
    F: Fn(&str) -> Option<String>,
{
    let gemini_key_path = pick_path(
        overrides.gemini_key_path.as_deref(),
        lookup(GEMINI_KEY_PATH_ENV),
        dev.map(|d| d.gemini_key_path.as_path()),
    )
    .ok_or_else(|| {
        Error::Config(format!(
            "Gemini key path not configured (pass --gemini-key-path or set {GEMINI_KEY_PATH_ENV})"
        ))
    })?;

    let gcp_key_path = pick_path(
        overrides.gcp_key_path.as_deref(),
        lookup(GCP_KEY_PATH_ENV),
        dev.map(|d| d.gcp_key_path.as_path()),
    )
    .ok_or_else(|| {
        Error::Config(format!(
            "GCP service account path not configured (pass --gcp-key-path or set {GCP_KEY_PATH_ENV})"
        ))
    })?;

    let key = read_key_document(&gemini_key_path)?;

    tracing::info!(
        key_document = %gemini_key_path.display(),
        service_account = %gcp_key_path.display(),
        "resolved credentials"
    );

    Ok(Credentials::new(key, gcp_key_path))
}

/// Read the API key from a key document
///
/// The key is every body paragraph concatenated with no separator, then
/// trimmed.
///
/// # Errors
///
/// Returns `Error::Config` if the document cannot be read or the key is empty
pub fn read_key_document(path: &Path) -> Result<SecretString> {
    let paragraphs = docx::read_paragraphs(path).map_err(|e| {
        Error::Config(format!("failed to read key document {}: {e}", path.display()))
    })?;

    let key = SecretString::from(paragraphs.concat().trim().to_string());
    if key.expose_secret().is_empty() {
        return Err(Error::Config(format!(
            "key document {} contains no text",
            path.display()
        )));
    }

    Ok(key)
}

fn pick_path(explicit: Option<&Path>, env: Option<String>, dev: Option<&Path>) -> Option<PathBuf> {
    explicit
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .or_else(|| env.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .or_else(|| {
            let path = dev?;
            tracing::warn!(path = %path.display(), "using development default credential path");
            Some(path.to_path_buf())
        })
}
