//! Random forest classifier for the binary delay label.
//!
//! Bagged CART trees over bootstrap samples, a random feature subspace of
//! size √n at every split, optional balanced class weights, and
//! mean-decrease-in-impurity feature importances. Training is fully
//! determined by the configured seed.

mod error;
mod tree;

pub use error::ForestError;
pub use tree::{DecisionTree, Node, NodeIndex, TreeParams};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use tree::TrainingSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassWeight {
    /// Every sample counts once
    Uniform,
    /// Weight each class by `n_samples / (2 * n_class)`
    Balanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
    pub class_weight: ClassWeight,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 300,
            max_depth: 10,
            min_samples_leaf: 5,
            seed: 42,
            class_weight: ClassWeight::Balanced,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_features: usize,
}

fn class_weights(labels: &[bool], mode: ClassWeight) -> (f64, f64) {
    match mode {
        ClassWeight::Uniform => (1.0, 1.0),
        ClassWeight::Balanced => {
            let n = labels.len() as f64;
            let pos = labels.iter().filter(|&&y| y).count() as f64;
            let neg = n - pos;
            (n / (2.0 * neg), n / (2.0 * pos))
        }
    }
}

impl RandomForest {
    pub fn fit(rows: &[Vec<f64>], labels: &[bool], config: &ForestConfig) -> Result<Self, ForestError> {
        if rows.is_empty() {
            return Err(ForestError::EmptyTrainingSet);
        }
        if rows.len() != labels.len() {
            return Err(ForestError::LabelMismatch {
                labels: labels.len(),
                rows: rows.len(),
            });
        }
        let n_features = rows[0].len();
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != n_features) {
            return Err(ForestError::RaggedRows {
                row,
                expected: n_features,
                found: r.len(),
            });
        }
        if labels.iter().all(|&y| y) || labels.iter().all(|&y| !y) {
            return Err(ForestError::SingleClass);
        }

        let (w_neg, w_pos) = class_weights(labels, config.class_weight);
        let weights: Vec<f64> = labels.iter().map(|&y| if y { w_pos } else { w_neg }).collect();
        let data = TrainingSet {
            rows,
            labels,
            weights: &weights,
        };
        let params = TreeParams {
            max_depth: config.max_depth,
            min_samples_leaf: config.min_samples_leaf,
            max_features: ((n_features as f64).sqrt() as usize).max(1),
        };

        let mut master = StdRng::seed_from_u64(config.seed);
        let n = rows.len();
        let trees: Vec<DecisionTree> = (0..config.n_trees.max(1))
            .map(|_| {
                let mut rng = StdRng::seed_from_u64(master.gen());
                let draws: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(&data, draws, params, &mut rng)
            })
            .collect();

        debug!(
            trees = trees.len(),
            samples = n,
            features = n_features,
            "random forest fitted"
        );
        Ok(Self { trees, n_features })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Probability of the positive (delayed) class
    pub fn predict_proba(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict_positive(row)).sum();
        sum / self.trees.len() as f64
    }

    pub fn predict(&self, row: &[f64]) -> bool {
        self.predict_proba(row) >= 0.5
    }

    /// Mean of per-tree normalized importances, renormalized to sum to 1.
    pub fn feature_importances(&self) -> Vec<f64> {
        let mut acc = vec![0.0; self.n_features];
        for tree in &self.trees {
            for (a, v) in acc.iter_mut().zip(tree.feature_importances()) {
                *a += v;
            }
        }
        let total: f64 = acc.iter().sum();
        if total > 0.0 {
            for a in &mut acc {
                *a /= total;
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_threshold(n: usize) -> (Vec<Vec<f64>>, Vec<bool>) {
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|i| vec![i as f64, ((i * 37) % 11) as f64, ((i * 13) % 5) as f64])
            .collect();
        let labels = (0..n).map(|i| i >= n / 2).collect();
        (rows, labels)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_trees: 25,
            max_depth: 6,
            min_samples_leaf: 2,
            ..ForestConfig::default()
        }
    }

    #[test]
    fn test_learns_threshold() {
        let (rows, labels) = noisy_threshold(80);
        let forest = RandomForest::fit(&rows, &labels, &small_config()).unwrap();
        assert_eq!(forest.n_trees(), 25);
        assert_eq!(forest.n_features(), 3);
        assert!(forest.predict_proba(&[2.0, 3.0, 1.0]) < 0.5);
        assert!(forest.predict_proba(&[77.0, 3.0, 1.0]) > 0.5);
        assert!(forest.predict(&[79.0, 0.0, 0.0]));
    }

    #[test]
    fn test_importances_sum_to_one() {
        let (rows, labels) = noisy_threshold(60);
        let forest = RandomForest::fit(&rows, &labels, &small_config()).unwrap();
        let imp = forest.feature_importances();
        assert_eq!(imp.len(), 3);
        assert!((imp.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(imp[0] > imp[1] && imp[0] > imp[2]);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (rows, labels) = noisy_threshold(50);
        let a = RandomForest::fit(&rows, &labels, &small_config()).unwrap();
        let b = RandomForest::fit(&rows, &labels, &small_config()).unwrap();
        assert_eq!(a.feature_importances(), b.feature_importances());
        assert_eq!(a.predict_proba(&[24.0, 5.0, 2.0]), b.predict_proba(&[24.0, 5.0, 2.0]));
    }

    #[test]
    fn test_rejects_bad_input() {
        let cfg = small_config();
        assert_eq!(
            RandomForest::fit(&[], &[], &cfg).unwrap_err(),
            ForestError::EmptyTrainingSet
        );
        let rows = vec![vec![1.0], vec![2.0]];
        assert_eq!(
            RandomForest::fit(&rows, &[true, true], &cfg).unwrap_err(),
            ForestError::SingleClass
        );
        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(
            RandomForest::fit(&ragged, &[true, false], &cfg),
            Err(ForestError::RaggedRows { row: 1, .. })
        ));
    }

    #[test]
    fn test_balanced_weights() {
        let labels = [true, false, false, false];
        let (neg, pos) = class_weights(&labels, ClassWeight::Balanced);
        assert!((pos - 2.0).abs() < 1e-12);
        assert!((neg - 4.0 / 6.0).abs() < 1e-12);
    }
}
