// ABOUTME: Decision-tree ensemble evaluator for random-forest and boosted-tree artifacts
// ABOUTME: Validates node layout at load time and walks trees without recursion at inference

#[cfg(feature = "tree-ensembles")]
use super::logistic::sigmoid;
use gdm_core::constants::FEATURE_COUNT;
use gdm_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// How per-tree outputs combine into one probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Leaves hold probabilities; the ensemble averages them (random forest)
    MeanProbability,
    /// Leaves hold log-odds margins; the ensemble sums them onto a base
    /// score and applies the sigmoid (gradient boosting)
    LogitSum {
        /// Starting margin before any tree contributes
        base_score: f64,
    },
}

/// Tree node, addressed by its index in [`DecisionTree::nodes`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal node; goes `left` when `x[feature] <= threshold`
    Split {
        /// Feature index in schema order
        feature: usize,
        /// Split value
        threshold: f64,
        /// Index of the left child
        left: usize,
        /// Index of the right child
        right: usize,
    },
    /// Terminal node
    Leaf {
        /// Probability or margin, depending on [`Aggregation`]
        value: f64,
    },
}

/// A single decision tree rooted at node 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    /// Flattened nodes; children always have larger indices than parents
    pub nodes: Vec<TreeNode>,
}

/// Ensemble of decision trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleModel {
    /// Output combination rule
    pub aggregation: Aggregation,
    /// Member trees
    pub trees: Vec<DecisionTree>,
}

impl DecisionTree {
    fn validate(&self, tree_index: usize, aggregation: Aggregation) -> AppResult<()> {
        if self.nodes.is_empty() {
            return Err(AppError::invalid_format(format!(
                "tree {tree_index} has no nodes"
            )));
        }

        for (index, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(AppError::schema_mismatch(format!(
                            "tree {tree_index} node {index} splits on feature {feature}, \
                             schema has {FEATURE_COUNT}"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(AppError::invalid_format(format!(
                            "tree {tree_index} node {index} has a non-finite threshold"
                        )));
                    }
                    for child in [left, right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(AppError::invalid_format(format!(
                                "tree {tree_index} node {index} has child {child} \
                                 outside ({index}, {})",
                                self.nodes.len()
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    let in_range = match aggregation {
                        Aggregation::MeanProbability => (0.0..=1.0).contains(&value),
                        Aggregation::LogitSum { .. } => value.is_finite(),
                    };
                    if !in_range {
                        return Err(AppError::invalid_format(format!(
                            "tree {tree_index} leaf {index} has invalid value {value}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by a feature vector
    ///
    /// Node layout must have been validated; children always point forward so
    /// the walk terminates.
    #[cfg(feature = "tree-ensembles")]
    fn evaluate(&self, values: &[f64; FEATURE_COUNT]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = values.get(*feature).copied().unwrap_or(f64::NAN);
                    index = if x <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { value }) => return *value,
                None => return f64::NAN,
            }
        }
    }
}

impl TreeEnsembleModel {
    /// Validate every tree against the feature schema
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` for out-of-schema feature indices and
    /// `InvalidFormat` for empty ensembles, bad child links, or bad leaves.
    pub fn validate(&self) -> AppResult<()> {
        if self.trees.is_empty() {
            return Err(AppError::invalid_format("tree ensemble has no trees"));
        }
        if let Aggregation::LogitSum { base_score } = self.aggregation {
            if !base_score.is_finite() {
                return Err(AppError::invalid_format("base_score must be finite"));
            }
        }
        for (tree_index, tree) in self.trees.iter().enumerate() {
            tree.validate(tree_index, self.aggregation)?;
        }
        Ok(())
    }

    /// Probability of the high-risk class
    #[cfg(feature = "tree-ensembles")]
    #[must_use]
    pub fn predict_proba(&self, values: &[f64; FEATURE_COUNT]) -> f64 {
        let leaves = self.trees.iter().map(|tree| tree.evaluate(values));
        match self.aggregation {
            Aggregation::MeanProbability => leaves.sum::<f64>() / self.trees.len() as f64,
            Aggregation::LogitSum { base_score } => sigmoid(base_score + leaves.sum::<f64>()),
        }
    }
}
