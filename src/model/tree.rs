//! CART regression tree with squared-error splits.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// Maximum depth; a depth of 0 yields a single leaf.
    pub max_depth: usize,
    /// Minimum number of samples a node needs before it may split.
    pub min_samples_split: usize,
    /// Minimum number of samples on each side of a split.
    pub min_samples_leaf: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 2,
            min_samples_leaf: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted binary regression tree stored as a flat node arena.
///
/// Rows with `row[feature] <= threshold` descend left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<Node>,
}

struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

impl RegressionTree {
    /// Fits a tree on the rows of `x` selected by `indices`.
    ///
    /// `indices` may contain repeats (bootstrap samples) and must not be empty.
    pub fn fit(x: &[Vec<f64>], y: &[f64], indices: &[usize], params: &TreeParams) -> Self {
        debug_assert!(!indices.is_empty(), "cannot fit a tree on zero rows");
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(x, y, indices.to_vec(), 0, params);
        tree
    }

    /// Returns the leaf value reached by `row`.
    pub fn predict(&self, row: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Checks that the arena describes a finite tree over `n_features` inputs.
    ///
    /// Every child index must point forward to an existing node, so traversal
    /// always reaches a leaf.
    ///
    /// # Errors
    ///
    /// Returns a description of the first structural defect found.
    pub fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (id, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("node {id}: non-finite leaf value"));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature >= n_features {
                        return Err(format!("node {id}: feature {feature} out of range"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {id}: non-finite threshold"));
                    }
                    for child in [*left, *right] {
                        if child <= id || child >= self.nodes.len() {
                            return Err(format!("node {id}: invalid child index {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Number of leaves.
    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    fn grow(
        &mut self,
        x: &[Vec<f64>],
        y: &[f64],
        indices: Vec<usize>,
        depth: usize,
        params: &TreeParams,
    ) -> usize {
        let id = self.nodes.len();
        let n = indices.len() as f64;
        let sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let mean = sum / n;
        self.nodes.push(Node::Leaf { value: mean });

        let pure = indices.iter().all(|&i| y[i] == y[indices[0]]);
        if depth >= params.max_depth || indices.len() < params.min_samples_split || pure {
            return id;
        }

        let Some(best) = best_split(x, y, &indices, sum, params.min_samples_leaf) else {
            return id;
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| x[i][best.feature] <= best.threshold);

        let left = self.grow(x, y, left_idx, depth + 1, params);
        let right = self.grow(x, y, right_idx, depth + 1, params);
        self.nodes[id] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        id
    }
}

/// Finds the split maximizing `S_l²/n_l + S_r²/n_r`, which minimizes the
/// summed squared error of the two children.
fn best_split(
    x: &[Vec<f64>],
    y: &[f64],
    indices: &[usize],
    total: f64,
    min_leaf: usize,
) -> Option<SplitCandidate> {
    let n = indices.len();
    let n_features = x[indices[0]].len();
    let parent_score = total * total / n as f64;
    let min_leaf = min_leaf.max(1);

    let mut best: Option<SplitCandidate> = None;
    let mut order = indices.to_vec();

    for feature in 0..n_features {
        order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));

        let mut left_sum = 0.0;
        for k in 1..n {
            left_sum += y[order[k - 1]];
            let lo = x[order[k - 1]][feature];
            let hi = x[order[k]][feature];
            // NaN never compares less, so it is never used as a boundary.
            if lo.partial_cmp(&hi) != Some(Ordering::Less) || k < min_leaf || n - k < min_leaf {
                continue;
            }

            let right_sum = total - left_sum;
            let score =
                left_sum * left_sum / k as f64 + right_sum * right_sum / (n - k) as f64;
            if score <= parent_score || best.as_ref().is_some_and(|b| score <= b.score) {
                continue;
            }

            let mut threshold = lo + (hi - lo) / 2.0;
            if threshold >= hi {
                threshold = lo;
            }
            best = Some(SplitCandidate {
                feature,
                threshold,
                score,
            });
        }
    }

    best
}
