//! Decision tree structures for boosted-ensemble inference
//!
//! Nodes live in a flat array; node 0 is the root. Split semantics follow
//! the exported XGBoost dump: go left when `x < threshold`, and a missing
//! (`NaN`) value follows the node's `missing` branch.

use serde::{Deserialize, Serialize};

/// A decision tree node (internal or leaf)
///
/// For internal nodes `feature >= 0` indexes the feature vector and
/// `left`/`right` point to child nodes. Leaf nodes carry `leaf`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node ID (for reference, not used in traversal)
    #[serde(default)]
    pub id: i32,

    /// Feature index to split on (-1 for leaf nodes)
    #[serde(default = "no_child")]
    pub feature: i32,

    /// Split threshold
    #[serde(default)]
    pub threshold: f64,

    /// Child taken when `x < threshold`
    #[serde(default = "no_child")]
    pub left: i32,

    /// Child taken when `x >= threshold`
    #[serde(default = "no_child")]
    pub right: i32,

    /// Child taken when the feature is missing; defaults to `left`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing: Option<i32>,

    /// Leaf margin contribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leaf: Option<f64>,
}

fn no_child() -> i32 {
    -1
}

impl Node {
    /// Create a new internal (split) node
    pub fn split(id: i32, feature: i32, threshold: f64, left: i32, right: i32) -> Self {
        Self {
            id,
            feature,
            threshold,
            left,
            right,
            missing: None,
            leaf: None,
        }
    }

    /// Create a new leaf node
    pub fn leaf(id: i32, value: f64) -> Self {
        Self {
            id,
            feature: -1,
            threshold: 0.0,
            left: -1,
            right: -1,
            missing: None,
            leaf: Some(value),
        }
    }

    pub fn with_missing(mut self, child: i32) -> Self {
        self.missing = Some(child);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf.is_some()
    }

    fn missing_child(&self) -> i32 {
        self.missing.unwrap_or(self.left)
    }
}

/// A single regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Walk from the root to a leaf and return its value.
    ///
    /// Returns `None` if the walk leaves the node array, reads past the
    /// feature vector, or does not terminate.
    pub fn evaluate(&self, features: &[f64]) -> Option<f64> {
        let mut idx = 0usize;

        // A valid walk visits each node at most once
        for _ in 0..self.nodes.len() {
            let node = self.nodes.get(idx)?;

            if let Some(value) = node.leaf {
                return Some(value);
            }

            let value = *features.get(usize::try_from(node.feature).ok()?)?;
            let next = if value.is_nan() {
                node.missing_child()
            } else if value < node.threshold {
                node.left
            } else {
                node.right
            };

            idx = usize::try_from(next).ok()?;
        }

        None
    }

    /// Validate tree structure against the expected feature count
    pub fn validate(&self, num_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("Tree has no nodes".to_string());
        }

        let in_bounds = |child: i32| child >= 0 && (child as usize) < self.nodes.len();

        for (i, node) in self.nodes.iter().enumerate() {
            if node.is_leaf() {
                if !node.leaf.is_some_and(f64::is_finite) {
                    return Err(format!("Leaf node {} has a non-finite value", i));
                }
                continue;
            }

            if node.feature < 0 || node.feature as usize >= num_features {
                return Err(format!("Node {} has invalid feature index: {}", i, node.feature));
            }
            if !node.threshold.is_finite() {
                return Err(format!("Node {} has a non-finite threshold", i));
            }
            for (side, child) in [("left", node.left), ("right", node.right), ("missing", node.missing_child())] {
                if !in_bounds(child) {
                    return Err(format!("Node {} has invalid {} child: {}", i, side, child));
                }
                // Children always come after their parent, so walks terminate
                if child as usize <= i {
                    return Err(format!("Node {} points back to node {}", i, child));
                }
            }
        }

        Ok(())
    }
}
