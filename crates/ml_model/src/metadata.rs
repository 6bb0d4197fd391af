//! Training metrics shipped alongside the model.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::{Number, Value};
use tracing::{info, warn};

use crate::MetadataError;

/// Metric name to value, as recorded at training time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetadataRecord {
    metrics: BTreeMap<String, Number>,
}

impl MetadataRecord {
    /// Reads the metadata document from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not JSON.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let data = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let record = Self::from_json_str(&data)?;
        info!(
            path = %path.display(),
            metrics = record.metrics.len(),
            "Loaded model metadata"
        );
        Ok(record)
    }

    /// Extracts the top-level `metrics` mapping.
    ///
    /// A missing or non-object `metrics` key yields an empty record; entries
    /// that are not numbers are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `data` is not JSON.
    pub fn from_json_str(data: &str) -> Result<Self, MetadataError> {
        let doc: Value = serde_json::from_str(data)?;

        let mut metrics = BTreeMap::new();
        match doc.get("metrics") {
            Some(Value::Object(entries)) => {
                for (name, value) in entries {
                    if let Value::Number(number) = value {
                        metrics.insert(name.clone(), number.clone());
                    } else {
                        warn!(metric = %name, "Skipping non-numeric metric");
                    }
                }
            }
            Some(_) => warn!("Metadata `metrics` is not an object, showing no metrics"),
            None => warn!("Metadata has no `metrics` key, showing no metrics"),
        }

        Ok(Self { metrics })
    }

    /// Returns a metric as a float.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).and_then(Number::as_f64)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Pretty-printed JSON object of all metrics, sorted by name.
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.metrics).unwrap_or_else(|_| "{}".to_owned())
    }
}
