//! Credential resolution against real key documents

use std::path::PathBuf;

use interview_assistant::credentials::{self, GCP_KEY_PATH_ENV, GEMINI_KEY_PATH_ENV};
use interview_assistant::{CredentialOverrides, DevDefaults, Error};
use secrecy::ExposeSecret;

mod common;
use common::{write_docx, write_service_account};

#[test]
fn key_is_trimmed_concatenation_of_paragraphs() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = write_docx(dir.path(), "key.docx", &["AB", "C"]);

    let key = credentials::read_key_document(&key_path).unwrap();
    assert_eq!(key.expose_secret(), "ABC");
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = write_docx(dir.path(), "key.docx", &["", "  AIza", "Sy123  ", ""]);

    let key = credentials::read_key_document(&key_path).unwrap();
    assert_eq!(key.expose_secret(), "AIzaSy123");
}

#[test]
fn blank_document_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = write_docx(dir.path(), "key.docx", &["   ", ""]);

    let err = credentials::read_key_document(&key_path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn non_docx_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = dir.path().join("key.docx");
    std::fs::write(&key_path, "AIzaSy-plain-text").unwrap();

    let err = credentials::read_key_document(&key_path).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn resolves_from_environment() {
    let dir = tempfile::tempdir().unwrap();
    let key_path = write_docx(dir.path(), "key.docx", &["secret-key"]);
    let sa_path = write_service_account(dir.path());

    let key_env = key_path.display().to_string();
    let sa_env = sa_path.display().to_string();
    let creds = credentials::resolve_with(&CredentialOverrides::default(), None, |name| {
        match name {
            GEMINI_KEY_PATH_ENV => Some(key_env.clone()),
            GCP_KEY_PATH_ENV => Some(sa_env.clone()),
            _ => None,
        }
    })
    .unwrap();

    assert_eq!(creds.generation_api_key().expose_secret(), "secret-key");
    assert_eq!(creds.speech_credential_path(), sa_path.as_path());
}

#[test]
fn explicit_paths_beat_environment() {
    let dir = tempfile::tempdir().unwrap();
    let explicit_key = write_docx(dir.path(), "explicit.docx", &["explicit"]);
    let env_key = write_docx(dir.path(), "env.docx", &["from-env"]);
    let sa_path = write_service_account(dir.path());

    let overrides = CredentialOverrides {
        gemini_key_path: Some(explicit_key),
        gcp_key_path: Some(sa_path),
    };
    let env_value = env_key.display().to_string();
    let creds = credentials::resolve_with(&overrides, None, |name| {
        (name == GEMINI_KEY_PATH_ENV).then(|| env_value.clone())
    })
    .unwrap();

    assert_eq!(creds.generation_api_key().expose_secret(), "explicit");
}

#[test]
fn unset_gemini_path_fails_without_dev_defaults() {
    let err = credentials::resolve_with(
        &CredentialOverrides {
            gemini_key_path: None,
            gcp_key_path: Some(PathBuf::from("/sa.json")),
        },
        None,
        |_| None,
    )
    .unwrap_err();

    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn dev_defaults_used_only_as_last_resort() {
    let dir = tempfile::tempdir().unwrap();
    let dev = DevDefaults {
        gemini_key_path: write_docx(dir.path(), "dev.docx", &["dev-key"]),
        gcp_key_path: write_service_account(dir.path()),
    };

    let creds = credentials::resolve_with(&CredentialOverrides::default(), Some(&dev), |_| None)
        .unwrap();
    assert_eq!(creds.generation_api_key().expose_secret(), "dev-key");
    assert_eq!(creds.speech_credential_path(), dev.gcp_key_path.as_path());
}

#[test]
fn local_dev_defaults_point_into_secrets_dir() {
    let dev = DevDefaults::local();
    assert!(dev.gemini_key_path.starts_with("secrets"));
    assert!(dev.gcp_key_path.starts_with("secrets"));
}
