//! Cache-or-download resolution of repository files to local paths.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::api::client::RegistryTransport;
use crate::cache::ArtifactCache;
use crate::{RepoId, RetrievalError};

/// Local paths of the two files the prediction service needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub metadata: PathBuf,
}

/// Resolves `(repository, filename)` pairs to cached local files.
pub struct ArtifactFetcher<T> {
    transport: T,
    cache: ArtifactCache,
    revision: String,
    token: Option<String>,
}

impl<T: RegistryTransport> ArtifactFetcher<T> {
    pub fn new(
        transport: T,
        cache: ArtifactCache,
        revision: impl Into<String>,
        token: Option<String>,
    ) -> Self {
        Self {
            transport,
            cache,
            revision: revision.into(),
            token,
        }
    }

    /// Returns the local path of `filename`, downloading it only if it is
    /// not already cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is not cached and cannot be downloaded,
    /// or if the cache cannot be read or written.
    pub async fn fetch(&self, repo: &RepoId, filename: &str) -> Result<PathBuf, RetrievalError> {
        let key = ArtifactCache::object_key(repo, &self.revision, filename);

        if self.cache.contains(&key).await? {
            let path = self.cache.local_path(&key);
            debug!(repo = %repo, filename, path = %path.display(), "Using cached artifact");
            return Ok(path);
        }

        let bytes = self
            .transport
            .fetch(repo, &self.revision, filename, self.token.as_deref())
            .await?;

        let path = self.cache.store(&key, bytes).await?;
        info!(repo = %repo, filename, path = %path.display(), "Cached artifact");

        Ok(path)
    }

    /// Fetches the serialized model and its metadata document.
    ///
    /// # Errors
    ///
    /// Returns the first retrieval failure.
    pub async fn fetch_artifacts(
        &self,
        repo: &RepoId,
        model_filename: &str,
        metadata_filename: &str,
    ) -> Result<ArtifactPaths, RetrievalError> {
        let model = self.fetch(repo, model_filename).await?;
        let metadata = self.fetch(repo, metadata_filename).await?;
        Ok(ArtifactPaths { model, metadata })
    }
}
