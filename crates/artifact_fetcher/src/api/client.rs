//! HTTP client for the model registry's file-resolve endpoint.

use core::future::Future;
use core::time::Duration;

use bytes::Bytes;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode, Url};
use tracing::{info, warn};

use crate::{RepoId, RetrievalError};

/// Response header the registry uses to tell a missing repository from a
/// missing file.
const ERROR_CODE_HEADER: &str = "x-error-code";

/// Fetches raw artifact bytes from a registry.
pub trait RegistryTransport: Send + Sync {
    /// Downloads `filename` from `repo` at `revision`.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry rejects the request or cannot be
    /// reached.
    fn fetch(
        &self,
        repo: &RepoId,
        revision: &str,
        filename: &str,
        token: Option<&str>,
    ) -> impl Future<Output = Result<Bytes, RetrievalError>> + Send;
}

/// Registry client speaking `GET {endpoint}/{repo}/resolve/{revision}/{filename}`.
pub struct HttpRegistry {
    client: Client,
    endpoint: Url,
}

impl HttpRegistry {
    /// Creates a client for the registry at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not an absolute URL or the HTTP
    /// client cannot be created.
    pub fn new(endpoint: &str) -> Result<Self, RetrievalError> {
        let invalid = || RetrievalError::InvalidEndpoint {
            url: endpoint.to_owned(),
        };

        let endpoint = Url::parse(endpoint).map_err(|_| invalid())?;
        if endpoint.cannot_be_a_base() {
            return Err(invalid());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|source| RetrievalError::Transport {
                url: endpoint.to_string(),
                source,
            })?;

        Ok(Self { client, endpoint })
    }

    /// Builds the download URL of one file, percent-encoding every segment.
    #[must_use]
    pub fn file_url(&self, repo: &RepoId, revision: &str, filename: &str) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(repo.as_str().split('/'))
                .push("resolve")
                .push(revision)
                .extend(filename.split('/'));
        }
        url
    }
}

impl RegistryTransport for HttpRegistry {
    async fn fetch(
        &self,
        repo: &RepoId,
        revision: &str,
        filename: &str,
        token: Option<&str>,
    ) -> Result<Bytes, RetrievalError> {
        let url = self.file_url(repo, revision, filename);

        info!(
            repo = %repo,
            revision,
            filename,
            authenticated = token.is_some(),
            "Downloading artifact"
        );

        let mut request = self.client.get(url.clone());
        if let Some(token) = token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|source| RetrievalError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_code = response
                .headers()
                .get(ERROR_CODE_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let body = response.text().await.unwrap_or_default();

            warn!(
                repo = %repo,
                filename,
                status = status.as_u16(),
                error_code = error_code.as_deref(),
                "Registry refused artifact download"
            );

            return Err(classify_failure(
                repo,
                filename,
                &url,
                status,
                error_code.as_deref(),
                body,
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| RetrievalError::Transport {
                url: url.to_string(),
                source,
            })?;

        info!(repo = %repo, filename, bytes = bytes.len(), "Downloaded artifact");

        Ok(bytes)
    }
}

/// Maps a non-success registry response onto the retrieval taxonomy.
fn classify_failure(
    repo: &RepoId,
    filename: &str,
    url: &Url,
    status: StatusCode,
    error_code: Option<&str>,
    body: String,
) -> RetrievalError {
    let repo_id = repo.to_string();

    // The registry answers 401 for private or missing repositories alike, so
    // the error code wins over the status.
    if error_code == Some("RepoNotFound") {
        return RetrievalError::RepositoryNotFound { repo_id };
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RetrievalError::CredentialRejected { repo_id }
        }
        StatusCode::NOT_FOUND => RetrievalError::FileNotFound {
            repo_id,
            filename: filename.to_owned(),
        },
        _ => RetrievalError::Http {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        },
    }
}
