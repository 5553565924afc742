//! CART decision tree.
//!
//! Greedy binary splits over a bootstrap sample: variance reduction for
//! regression, Gini impurity for (binary) classification. Split search per
//! feature sorts once and scans candidate boundaries with prefix sums.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::cmp::Ordering;

/// What the tree's leaves predict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Regression,
    Classification,
}

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Fraction of features considered at each split, in (0, 1].
    pub max_features: f64,
}

#[derive(Debug, Clone)]
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

/// A fitted tree. Nodes live in an arena; `root` indexes the entry node.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    root: usize,
    task: Task,
}

struct Builder<'a> {
    features: &'a [Vec<f64>],
    targets: &'a [f64],
    task: Task,
    params: TreeParams,
    split_features: usize,
    nodes: Vec<Node>,
}

impl DecisionTree {
    /// Fit over the rows named by `sample` (a bootstrap draw, with
    /// repetition allowed).
    pub fn fit(
        features: &[Vec<f64>],
        targets: &[f64],
        sample: &[usize],
        task: Task,
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        debug_assert_eq!(features.len(), targets.len());
        let n_features = features.first().map_or(0, Vec::len);
        let split_features =
            (((n_features as f64) * params.max_features).ceil() as usize).clamp(1, n_features.max(1));

        let mut builder = Builder {
            features,
            targets,
            task,
            params,
            split_features,
            nodes: Vec::new(),
        };
        let root = builder.build(sample.to_vec(), 0, rng);
        Self {
            nodes: builder.nodes,
            root,
            task,
        }
    }

    /// Walk the tree for a single feature vector.
    pub fn predict(&self, x: &[f64]) -> f64 {
        let mut index = self.root;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn task(&self) -> Task {
        self.task
    }

    #[cfg(test)]
    fn depth_from(&self, index: usize) -> usize {
        match &self.nodes[index] {
            Node::Leaf { .. } => 0,
            Node::Split { left, right, .. } => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
        }
    }

    /// Maximum depth of the fitted tree (0 = single leaf).
    #[cfg(test)]
    pub fn depth(&self) -> usize {
        self.depth_from(self.root)
    }
}

impl Builder<'_> {
    fn leaf_value(&self, sample: &[usize]) -> f64 {
        let mean =
            sample.iter().map(|&i| self.targets[i]).sum::<f64>() / sample.len() as f64;
        match self.task {
            Task::Regression => mean,
            // Majority vote over binary targets; ties go to the positive class.
            Task::Classification => {
                if mean >= 0.5 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    fn push_leaf(&mut self, sample: &[usize]) -> usize {
        let value = self.leaf_value(sample);
        self.nodes.push(Node::Leaf { value });
        self.nodes.len() - 1
    }

    fn build(&mut self, sample: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        if depth >= self.params.max_depth
            || sample.len() < self.params.min_samples_split
            || is_pure(self.targets, &sample)
        {
            return self.push_leaf(&sample);
        }

        let n_features = self.features[sample[0]].len();
        let mut candidates: Vec<usize> = (0..n_features).collect();
        candidates.shuffle(rng);
        candidates.truncate(self.split_features);

        let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, score)
        for &feature in &candidates {
            if let Some((threshold, score)) = self.best_split_for(&sample, feature) {
                let better = best.map_or(true, |(_, _, s)| score < s);
                if better {
                    best = Some((feature, threshold, score));
                }
            }
        }

        let Some((feature, threshold, _)) = best else {
            // every candidate feature was constant over this sample
            return self.push_leaf(&sample);
        };

        let (left_sample, right_sample): (Vec<usize>, Vec<usize>) = sample
            .iter()
            .partition(|&&i| self.features[i][feature] <= threshold);
        if left_sample.is_empty() || right_sample.is_empty() {
            return self.push_leaf(&sample);
        }

        let left = self.build(left_sample, depth + 1, rng);
        let right = self.build(right_sample, depth + 1, rng);
        self.nodes.push(Node::Split {
            feature,
            threshold,
            left,
            right,
        });
        self.nodes.len() - 1
    }

    /// Best threshold for one feature, returning (threshold, weighted child
    /// impurity). Lower score is better; `None` if the feature is constant.
    fn best_split_for(&self, sample: &[usize], feature: usize) -> Option<(f64, f64)> {
        let mut pairs: Vec<(f64, f64)> = sample
            .iter()
            .map(|&i| (self.features[i][feature], self.targets[i]))
            .collect();
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

        let n = pairs.len();
        let total_sum: f64 = pairs.iter().map(|(_, y)| y).sum();
        let total_sq: f64 = pairs.iter().map(|(_, y)| y * y).sum();

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        let mut best: Option<(f64, f64)> = None;

        for i in 1..n {
            let (x_prev, y_prev) = pairs[i - 1];
            left_sum += y_prev;
            left_sq += y_prev * y_prev;

            let x_here = pairs[i].0;
            if x_here <= x_prev {
                continue; // no boundary between equal values
            }

            let left_n = i as f64;
            let right_n = (n - i) as f64;
            let right_sum = total_sum - left_sum;
            let right_sq = total_sq - left_sq;

            let score = match self.task {
                // summed squared error of both children
                Task::Regression => {
                    (left_sq - left_sum * left_sum / left_n)
                        + (right_sq - right_sum * right_sum / right_n)
                }
                // sample-weighted Gini impurity (binary targets)
                Task::Classification => {
                    let p_left = left_sum / left_n;
                    let p_right = right_sum / right_n;
                    let gini_left = 2.0 * p_left * (1.0 - p_left);
                    let gini_right = 2.0 * p_right * (1.0 - p_right);
                    left_n * gini_left + right_n * gini_right
                }
            };

            let threshold = x_prev + (x_here - x_prev) / 2.0;
            let better = best.map_or(true, |(_, s)| score < s);
            if better {
                best = Some((threshold, score));
            }
        }
        best
    }
}

fn is_pure(targets: &[f64], sample: &[usize]) -> bool {
    let first = targets[sample[0]];
    sample.iter().all(|&i| targets[i] == first)
}
