use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PetError>;

#[derive(Error, Debug)]
pub enum PetError {
    #[error("Unknown event: {name}{}", did_you_mean(.suggestion))]
    UnknownEvent {
        name: String,
        suggestion: Option<String>,
    },

    #[error("State file {path} is unreadable: {message}")]
    State { path: PathBuf, message: String },

    #[error("Not a git repository (no .git directory): {0}")]
    NotGitRepo(PathBuf),

    #[error("Hook {0} already exists and was not written by terminal-pet; use --force to overwrite")]
    HookConflict(PathBuf),

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Invalid package descriptor: {0}")]
    Descriptor(String),

    #[error("Formula parse error: {0}")]
    Formula(String),

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Archive does not contain '{0}'")]
    MissingBinary(String),

    #[error("Download failed for {url}: {message}")]
    Download { url: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    #[cfg(feature = "download")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

impl PetError {
    pub fn exit_code(&self) -> i32 {
        2
    }
}
