use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// The key CSV could not be opened or read.
    #[error("cannot read node key file {}: {source}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader could not tokenize a row.
    #[error("malformed row in node key file {}: {source}", .path.display())]
    MalformedRow {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The stats request did not complete, or the server answered with an error status.
    #[error("failed to fetch node stats from {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The feed body was not a UTF-8 JSON array of complete stat records.
    #[error("invalid node stats from {url}: {reason}")]
    DataFormat { url: String, reason: String },

    /// A report needs at least one node to compute averages.
    #[error("node list is empty, nothing to report")]
    EmptyNodeList,
}

impl StatsError {
    /// Whether a later attempt of the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { source, .. } => match source.status() {
                Some(status) => status.is_server_error(),
                // Builder, redirect and decode failures repeat on every attempt.
                None => source.is_connect() || source.is_timeout() || source.is_request(),
            },
            _ => false,
        }
    }
}

pub type Result<T, E = StatsError> = std::result::Result<T, E>;
