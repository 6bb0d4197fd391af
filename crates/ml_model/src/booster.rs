//! Gradient-boosted tree classifier read from an XGBoost JSON model.
//!
//! Only the `gbtree` booster with the `binary:logistic` objective is
//! supported. Trees are validated once at load time so evaluation can walk
//! them without bounds surprises.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::record::TabularRecord;
use crate::{Classifier, InferenceError, ModelLoadError};

const SUPPORTED_OBJECTIVE: &str = "binary:logistic";
const SUPPORTED_BOOSTER: &str = "gbtree";

#[derive(Deserialize)]
struct ModelDocument {
    learner: LearnerDocument,
}

#[derive(Deserialize)]
struct LearnerDocument {
    #[serde(default)]
    feature_names: Vec<String>,
    gradient_booster: BoosterDocument,
    learner_model_param: LearnerModelParam,
    objective: ObjectiveDocument,
}

#[derive(Deserialize)]
struct BoosterDocument {
    name: String,
    #[serde(default)]
    model: serde_json::Value,
}

#[derive(Deserialize)]
struct TreeModelDocument {
    trees: Vec<TreeDocument>,
}

#[derive(Deserialize)]
struct TreeDocument {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f32>,
    #[serde(default)]
    default_left: Vec<JsonFlag>,
}

/// XGBoost writes `default_left` as 0/1 integers or as booleans depending on
/// the version.
#[derive(Deserialize, Clone, Copy)]
#[serde(untagged)]
enum JsonFlag {
    Bool(bool),
    Int(u8),
}

impl From<JsonFlag> for bool {
    fn from(flag: JsonFlag) -> Self {
        match flag {
            JsonFlag::Bool(b) => b,
            JsonFlag::Int(i) => i != 0,
        }
    }
}

#[derive(Deserialize)]
struct LearnerModelParam {
    base_score: String,
}

#[derive(Deserialize)]
struct ObjectiveDocument {
    name: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf(f32),
}

#[derive(Debug, Clone, PartialEq)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_document(
        index: usize,
        doc: TreeDocument,
        feature_count: usize,
    ) -> Result<Self, ModelLoadError> {
        let malformed = |reason: String| ModelLoadError::MalformedTree {
            tree: index,
            reason,
        };

        let len = doc.left_children.len();
        if len == 0 {
            return Err(malformed("tree has no nodes".to_owned()));
        }
        if doc.right_children.len() != len
            || doc.split_indices.len() != len
            || doc.split_conditions.len() != len
            || (!doc.default_left.is_empty() && doc.default_left.len() != len)
        {
            return Err(malformed("node arrays have different lengths".to_owned()));
        }

        // Children always come after their parent, so a walk from the root
        // strictly increases the node index and terminates.
        let child = |node: usize, raw: i64| {
            usize::try_from(raw)
                .ok()
                .filter(|&c| c > node && c < len)
                .ok_or_else(|| malformed(format!("node {node} has invalid child {raw}")))
        };

        let mut nodes = Vec::with_capacity(len);
        for node in 0..len {
            let (left, right) = (doc.left_children[node], doc.right_children[node]);
            if left == -1 && right == -1 {
                nodes.push(Node::Leaf(doc.split_conditions[node]));
                continue;
            }

            let feature = usize::try_from(doc.split_indices[node])
                .ok()
                .filter(|&f| f < feature_count)
                .ok_or_else(|| {
                    malformed(format!(
                        "node {node} splits on unknown feature {}",
                        doc.split_indices[node]
                    ))
                })?;

            nodes.push(Node::Split {
                feature,
                threshold: doc.split_conditions[node],
                left: child(node, left)?,
                right: child(node, right)?,
                default_left: doc.default_left.get(node).copied().is_some_and(bool::from),
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_value(&self, features: &[f32]) -> f32 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let value = features[feature];
                    let go_left = if value.is_nan() {
                        default_left
                    } else {
                        value < threshold
                    };
                    index = if go_left { left } else { right };
                }
            }
        }
    }
}

/// A binary gradient-boosted tree ensemble.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostedTrees {
    feature_names: Vec<String>,
    base_margin: f32,
    trees: Vec<Tree>,
}

impl BoostedTrees {
    /// Loads a model from an XGBoost JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a supported model.
    pub fn load(path: &Path) -> Result<Self, ModelLoadError> {
        let data = std::fs::read(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let model = Self::from_slice(&data)?;

        info!(
            path = %path.display(),
            trees = model.trees.len(),
            features = model.feature_names.len(),
            "Loaded boosted tree model"
        );

        Ok(model)
    }

    /// Parses a model from XGBoost JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or not a supported model.
    pub fn from_slice(data: &[u8]) -> Result<Self, ModelLoadError> {
        let doc: ModelDocument = serde_json::from_slice(data)?;
        Self::from_document(doc.learner)
    }

    fn from_document(learner: LearnerDocument) -> Result<Self, ModelLoadError> {
        if learner.objective.name != SUPPORTED_OBJECTIVE {
            return Err(ModelLoadError::UnsupportedObjective(learner.objective.name));
        }

        let BoosterDocument { name, model } = learner.gradient_booster;
        if name != SUPPORTED_BOOSTER {
            return Err(ModelLoadError::UnsupportedBooster(name));
        }
        let model: TreeModelDocument = serde_json::from_value(model)?;

        if learner.feature_names.is_empty() {
            return Err(ModelLoadError::MissingFeatureNames);
        }

        let base_margin = base_margin(&learner.learner_model_param.base_score)?;
        let feature_count = learner.feature_names.len();

        let trees = model
            .trees
            .into_iter()
            .enumerate()
            .map(|(index, doc)| Tree::from_document(index, doc, feature_count))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            feature_names: learner.feature_names,
            base_margin,
            trees,
        })
    }

    /// Feature names in model input order.
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Number of trees in the ensemble.
    #[must_use]
    pub const fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Raw log-odds for an encoded feature vector.
    ///
    /// `features` must hold one value per entry of [`Self::feature_names`].
    /// Leaves accumulate in `f32`, in tree order, as XGBoost does.
    #[must_use]
    pub fn margin(&self, features: &[f32]) -> f32 {
        self.trees
            .iter()
            .fold(self.base_margin, |sum, tree| sum + tree.leaf_value(features))
    }
}

impl Classifier for BoostedTrees {
    fn predict_proba(&self, record: &TabularRecord) -> Result<f64, InferenceError> {
        let features = record.encode(&self.feature_names)?;
        let margin = self.margin(&features);
        debug!(margin, "Evaluated tree ensemble");
        Ok(f64::from(sigmoid(margin)))
    }
}

/// Converts the stored `base_score` probability into a log-odds offset.
///
/// Accepts both `"5E-1"` and the bracketed `"[5E-1]"` spelling.
fn base_margin(raw: &str) -> Result<f32, ModelLoadError> {
    let invalid = || ModelLoadError::InvalidBaseScore(raw.to_owned());

    let score: f32 = raw
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
        .parse()
        .map_err(|_| invalid())?;

    if score > 0.0 && score < 1.0 {
        Ok((score / (1.0 - score)).ln())
    } else {
        Err(invalid())
    }
}

fn sigmoid(margin: f32) -> f32 {
    1.0 / (1.0 + (-margin).exp())
}
