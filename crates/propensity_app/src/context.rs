//! Process-wide state built once at startup.

use anyhow::{Context, Result};
use artifact_fetcher::{ArtifactCache, ArtifactFetcher, ArtifactPaths, HttpRegistry, RepoId};
use config::Config;
use ml_model::{InferencePipeline, MetadataRecord};
use tracing::info;

/// Loaded model and metadata, shared read-only with every request.
pub struct AppContext {
    pipeline: InferencePipeline,
    metadata: MetadataRecord,
    model_repo: String,
}

impl AppContext {
    #[must_use]
    pub const fn new(pipeline: InferencePipeline, metadata: MetadataRecord, model_repo: String) -> Self {
        Self {
            pipeline,
            metadata,
            model_repo,
        }
    }

    /// Retrieves the model artifacts (from cache when possible) and loads them.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifacts cannot be retrieved or loaded. The
    /// service cannot start without them.
    pub async fn initialize(config: &Config) -> Result<Self> {
        let repo: RepoId = config.model_repo.parse()?;
        let cache = ArtifactCache::open(&config.cache_dir)?;
        let registry = HttpRegistry::new(&config.registry_endpoint)?;
        let fetcher =
            ArtifactFetcher::new(registry, cache, config.revision.clone(), config.hf_token.clone());

        info!(
            repo = %repo,
            revision = %config.revision,
            cache_dir = %config.cache_dir.display(),
            "Resolving model artifacts"
        );

        let paths = fetcher
            .fetch_artifacts(&repo, &config.model_filename, &config.metadata_filename)
            .await
            .with_context(|| format!("Failed to retrieve model artifacts from {repo}"))?;

        Self::from_artifacts(&paths, repo.to_string())
    }

    /// Loads already retrieved artifacts.
    ///
    /// # Errors
    ///
    /// Returns an error if the model or the metadata cannot be loaded.
    pub fn from_artifacts(paths: &ArtifactPaths, model_repo: String) -> Result<Self> {
        let pipeline = InferencePipeline::load(&paths.model).context("Failed to load model")?;
        let metadata =
            MetadataRecord::load(&paths.metadata).context("Failed to load model metadata")?;

        Ok(Self::new(pipeline, metadata, model_repo))
    }

    #[must_use]
    pub const fn pipeline(&self) -> &InferencePipeline {
        &self.pipeline
    }

    #[must_use]
    pub const fn metadata(&self) -> &MetadataRecord {
        &self.metadata
    }

    #[must_use]
    pub fn model_repo(&self) -> &str {
        &self.model_repo
    }
}

/// Context over the checked-in test model.
#[cfg(test)]
pub(crate) fn fixture_context() -> AppContext {
    let model = ml_model::BoostedTrees::from_slice(include_bytes!(
        "../../ml_model/testdata/tourism_xgb.json"
    ))
    .unwrap();
    let metadata =
        MetadataRecord::from_json_str(include_str!("../../ml_model/testdata/metadata.json"))
            .unwrap();

    AppContext::new(
        InferencePipeline::new(model),
        metadata,
        "acme/tourism".to_owned(),
    )
}
