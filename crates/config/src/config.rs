//! Configuration loading from environment variables.

use core::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Model repository used when `MODEL_REPO` is not set.
pub const DEFAULT_MODEL_REPO: &str = "MBG0903/tourism_customer_xgb";

/// Registry base URL used when `HF_ENDPOINT` is not set.
pub const DEFAULT_REGISTRY_ENDPOINT: &str = "https://huggingface.co";

/// Repository revision used when `MODEL_REVISION` is not set.
pub const DEFAULT_REVISION: &str = "main";

/// Serialized model filename used when `MODEL_FILENAME` is not set.
pub const DEFAULT_MODEL_FILENAME: &str = "model.json";

/// Metadata filename used when `METADATA_FILENAME` is not set.
pub const DEFAULT_METADATA_FILENAME: &str = "metadata.json";

/// Bind address used when `LISTEN_ADDR` is not set.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8501";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Remote model repository identifier
    pub model_repo: String,

    /// Registry access token, if any
    pub hf_token: Option<String>,

    /// Registry base URL
    pub registry_endpoint: String,

    /// Repository revision (branch, tag or commit)
    pub revision: String,

    /// Filename of the serialized model inside the repository
    pub model_filename: String,

    /// Filename of the metadata document inside the repository
    pub metadata_filename: String,

    /// Local directory holding downloaded artifacts
    pub cache_dir: PathBuf,

    /// HTTP bind address
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Loads configuration from the process environment, reading `.env` first.
    ///
    /// Optional environment variables:
    /// - `MODEL_REPO`: model repository id (default: `MBG0903/tourism_customer_xgb`)
    /// - `HF_TOKEN`: registry access token
    /// - `HF_ENDPOINT`: registry base URL (default: `https://huggingface.co`)
    /// - `MODEL_REVISION`: repository revision (default: `main`)
    /// - `MODEL_FILENAME` / `METADATA_FILENAME`: artifact filenames
    /// - `ARTIFACT_CACHE_DIR`: download cache (default: `$HF_HOME/hub`, then `~/.cache/huggingface/hub`)
    /// - `LISTEN_ADDR`: bind address (default: `0.0.0.0:8501`)
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is not a valid socket address.
    pub fn from_env() -> Result<Self> {
        // Load .env file
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is not a valid socket address.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let listen_raw = var("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
        let listen_addr = listen_raw
            .parse()
            .with_context(|| format!("LISTEN_ADDR is not a socket address: {listen_raw}"))?;

        Ok(Self {
            model_repo: var("MODEL_REPO").unwrap_or_else(|| DEFAULT_MODEL_REPO.to_owned()),
            hf_token: var("HF_TOKEN"),
            registry_endpoint: var("HF_ENDPOINT")
                .map(|endpoint| endpoint.trim_end_matches('/').to_owned())
                .unwrap_or_else(|| DEFAULT_REGISTRY_ENDPOINT.to_owned()),
            revision: var("MODEL_REVISION").unwrap_or_else(|| DEFAULT_REVISION.to_owned()),
            model_filename: var("MODEL_FILENAME")
                .unwrap_or_else(|| DEFAULT_MODEL_FILENAME.to_owned()),
            metadata_filename: var("METADATA_FILENAME")
                .unwrap_or_else(|| DEFAULT_METADATA_FILENAME.to_owned()),
            cache_dir: cache_dir(&var),
            listen_addr,
        })
    }
}

/// Resolves the artifact cache directory.
fn cache_dir(var: &impl Fn(&str) -> Option<String>) -> PathBuf {
    if let Some(dir) = var("ARTIFACT_CACHE_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(hf_home) = var("HF_HOME") {
        return PathBuf::from(hf_home).join("hub");
    }

    var("HOME").map_or_else(
        || PathBuf::from(".cache/hub"),
        |home| PathBuf::from(home).join(".cache/huggingface/hub"),
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.model_repo, DEFAULT_MODEL_REPO);
        assert_eq!(config.hf_token, None);
        assert_eq!(config.registry_endpoint, DEFAULT_REGISTRY_ENDPOINT);
        assert_eq!(config.revision, "main");
        assert_eq!(config.model_filename, "model.json");
        assert_eq!(config.metadata_filename, "metadata.json");
        assert_eq!(config.cache_dir, PathBuf::from(".cache/hub"));
        assert_eq!(config.listen_addr.port(), 8501);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MODEL_REPO", "acme/propensity"),
            ("HF_TOKEN", "hf_secret"),
            ("HF_ENDPOINT", "http://127.0.0.1:9000/"),
            ("ARTIFACT_CACHE_DIR", "/tmp/artifacts"),
            ("LISTEN_ADDR", "127.0.0.1:3000"),
        ])
        .unwrap();
        assert_eq!(config.model_repo, "acme/propensity");
        assert_eq!(config.hf_token.as_deref(), Some("hf_secret"));
        assert_eq!(config.registry_endpoint, "http://127.0.0.1:9000");
        assert_eq!(config.cache_dir, PathBuf::from("/tmp/artifacts"));
        assert_eq!(config.listen_addr.to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = config_from(&[("HF_TOKEN", ""), ("MODEL_REPO", "  ")]).unwrap();
        assert_eq!(config.hf_token, None);
        assert_eq!(config.model_repo, DEFAULT_MODEL_REPO);
    }

    #[test]
    fn test_cache_dir_fallbacks() {
        let config = config_from(&[("HF_HOME", "/data/hf"), ("HOME", "/home/u")]).unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("/data/hf/hub"));

        let config = config_from(&[("HOME", "/home/u")]).unwrap();
        assert_eq!(config.cache_dir, PathBuf::from("/home/u/.cache/huggingface/hub"));
    }

    #[test]
    fn test_invalid_listen_addr() {
        assert!(config_from(&[("LISTEN_ADDR", "not-an-address")]).is_err());
    }
}
