use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InstallerError>;

#[derive(Error, Debug)]
pub enum InstallerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Registry error: {context}: {source}")]
    Registry {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Download failed: {url}: {message}")]
    Download { url: String, message: String },

    #[error("Failed to download file after {attempts} attempts")]
    FailedAfterRetries { attempts: u32 },

    #[error("Extraction failed: {path}: {message}")]
    Extraction { path: PathBuf, message: String },

    #[error("Installer exited with {}; see the log at {log_path:?}", describe_code(.code))]
    Install { code: Option<i32>, log_path: PathBuf },

    #[error("Failed to start installer {program:?}: {source}")]
    InstallerNotStarted {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Verification failed: {message}")]
    Verification { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code".to_string(),
    }
}

impl InstallerError {
    pub fn registry<S: Into<String>>(context: S, source: std::io::Error) -> Self {
        InstallerError::Registry {
            context: context.into(),
            source,
        }
    }

    pub fn extraction<S: Into<String>>(path: impl Into<PathBuf>, message: S) -> Self {
        InstallerError::Extraction {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn verification<S: Into<String>>(message: S) -> Self {
        InstallerError::Verification {
            message: message.into(),
        }
    }

    pub fn config_error<S: Into<String>>(message: S) -> Self {
        InstallerError::Config {
            message: message.into(),
        }
    }
}
