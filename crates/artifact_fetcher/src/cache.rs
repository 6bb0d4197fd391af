//! Local artifact cache backed by an `object_store` filesystem store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectStorePath;
use object_store::{ObjectStoreExt, PutPayload};

use crate::{RepoId, RetrievalError};

/// Downloaded artifacts laid out as `models--{namespace}--{name}/{revision}/{filename}`.
#[derive(Clone)]
pub struct ArtifactCache {
    root: PathBuf,
    store: Arc<dyn object_store::ObjectStore>,
}

impl ArtifactCache {
    /// Opens the cache rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or opened.
    pub fn open(root: &Path) -> Result<Self, RetrievalError> {
        std::fs::create_dir_all(root).map_err(|source| RetrievalError::CacheDir {
            path: root.to_path_buf(),
            source,
        })?;

        let store =
            LocalFileSystem::new_with_prefix(root).map_err(|source| RetrievalError::Cache {
                path: root.display().to_string(),
                source,
            })?;

        Ok(Self {
            root: root.to_path_buf(),
            store: Arc::new(store),
        })
    }

    /// Cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Relative object path of an artifact, using forward slashes.
    #[must_use]
    pub fn object_key(repo: &RepoId, revision: &str, filename: &str) -> String {
        // Revisions such as `refs/pr/1` must stay one directory level.
        let revision = revision.replace('/', "--");
        format!("{}/{revision}/{filename}", repo.cache_folder())
    }

    /// Absolute local path an artifact is (or would be) stored at.
    #[must_use]
    pub fn local_path(&self, key: &str) -> PathBuf {
        key.split('/')
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    /// Returns whether the artifact is already cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails for a reason other than absence.
    pub async fn contains(&self, key: &str) -> Result<bool, RetrievalError> {
        match self.store.head(&ObjectStorePath::from(key)).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(source) => Err(RetrievalError::Cache {
                path: key.to_owned(),
                source,
            }),
        }
    }

    /// Writes an artifact in a single put and returns its local path.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn store(&self, key: &str, bytes: Bytes) -> Result<PathBuf, RetrievalError> {
        self.store
            .put(&ObjectStorePath::from(key), PutPayload::from(bytes))
            .await
            .map_err(|source| RetrievalError::Cache {
                path: key.to_owned(),
                source,
            })?;

        Ok(self.local_path(key))
    }
}
