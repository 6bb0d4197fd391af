//! Model artifact retrieval.
//!
//! Resolves files of a remote model repository to local paths, downloading
//! each file at most once into an on-disk cache.

pub mod api;
mod cache;
mod error;
mod fetcher;
mod repo_id;

pub use api::client::{HttpRegistry, RegistryTransport};
pub use cache::ArtifactCache;
pub use error::RetrievalError;
pub use fetcher::{ArtifactFetcher, ArtifactPaths};
pub use repo_id::RepoId;
