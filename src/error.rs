use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SktError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0} is not set")]
    CredentialMissing(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication rejected: {0}")]
    Authentication(String),

    #[error("repository already exists: {0}")]
    AlreadyExists(String),

    #[error("repository not found or not ready: {0}")]
    NotFoundOrNotReady(String),

    #[error("github error: {0}")]
    GitHub(String),

    #[error("invalid license key, please contact support@saasstarter.live")]
    LicenseInvalid,

    #[error("failed to fork {repository}: {source}")]
    Fork {
        repository: String,
        #[source]
        source: Box<SktError>,
    },

    #[error("fork {repository} not completed after {attempts} attempts: {source}")]
    RetryExhausted {
        repository: String,
        attempts: u32,
        #[source]
        source: Box<SktError>,
    },

    #[error(
        "forks not ready: {}; ready so far: [{}]",
        .failed.join("; "),
        .ready.join(", ")
    )]
    ForksNotReady {
        ready: Vec<String>,
        failed: Vec<String>,
    },

    #[error("clone of {url} into {} failed: {reason}", .path.display())]
    Clone {
        url: String,
        path: PathBuf,
        reason: String,
    },

    #[error("git error: {0}")]
    Git(#[from] git2::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SktError>;
