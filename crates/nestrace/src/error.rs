use std::path::PathBuf;

use thiserror::Error;

use crate::LogRole;

/// Errors that abort a comparison run.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not find {role} file: {}", .path.display())]
    NotFound { role: LogRole, path: PathBuf },
    #[error("failed to read {role} file {}: {source}", .path.display())]
    Read {
        role: LogRole,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
