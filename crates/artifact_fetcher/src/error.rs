use std::path::PathBuf;

use thiserror::Error;

/// An artifact could not be obtained from the registry or the local cache.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("invalid repository id {repo_id:?}: {reason}")]
    InvalidRepoId {
        repo_id: String,
        reason: &'static str,
    },

    #[error("invalid registry endpoint {url:?}")]
    InvalidEndpoint { url: String },

    #[error("registry denied access to {repo_id} (missing or rejected access token)")]
    CredentialRejected { repo_id: String },

    #[error("repository {repo_id} not found (it may be private and require a token)")]
    RepositoryNotFound { repo_id: String },

    #[error("file {filename} not found in {repo_id}")]
    FileNotFound { repo_id: String, filename: String },

    #[error("registry request for {url} failed with status {status}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    #[error("failed to reach registry at {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to create artifact cache directory {path}")]
    CacheDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("artifact cache failure at {path}")]
    Cache {
        path: String,
        #[source]
        source: object_store::Error,
    },
}
