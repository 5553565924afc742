//! Bagged tree ensemble.
//!
//! Trees are trained in parallel, each on its own bootstrap draw from a
//! per-tree RNG derived from the configured seed, so a retrain on the same
//! snapshot and config reproduces the same forest.

use super::tree::{DecisionTree, Task, TreeParams};
use crate::config::ModelConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Ensemble hyperparameters.
#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    pub n_trees: usize,
    pub tree: TreeParams,
    pub seed: u64,
}

impl From<&ModelConfig> for ForestParams {
    fn from(config: &ModelConfig) -> Self {
        Self {
            n_trees: config.n_trees,
            tree: TreeParams {
                max_depth: config.max_depth,
                min_samples_split: config.min_samples_split,
                max_features: config.max_features,
            },
            seed: config.seed,
        }
    }
}

/// A fitted bagged ensemble.
#[derive(Debug, Clone)]
pub struct Forest {
    trees: Vec<DecisionTree>,
    task: Task,
}

impl Forest {
    /// Fit `params.n_trees` trees over bootstrap draws of the training rows.
    pub fn fit(features: &[Vec<f64>], targets: &[f64], task: Task, params: ForestParams) -> Self {
        debug_assert_eq!(features.len(), targets.len());
        debug_assert!(!features.is_empty());
        let n = features.len();

        let trees: Vec<DecisionTree> = (0..params.n_trees)
            .into_par_iter()
            .map(|t| {
                // distinct, deterministic stream per tree
                let mut rng =
                    StdRng::seed_from_u64(params.seed ^ ((t as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)));
                let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
                DecisionTree::fit(features, targets, &sample, task, params.tree, &mut rng)
            })
            .collect();

        Self { trees, task }
    }

    /// Aggregate tree predictions: mean for regression, majority vote for
    /// classification (ties go to the positive class).
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mean =
            self.trees.iter().map(|tree| tree.predict(x)).sum::<f64>() / self.trees.len() as f64;
        match self.task {
            Task::Regression => mean,
            Task::Classification => {
                if mean >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn task(&self) -> Task {
        self.task
    }
}
