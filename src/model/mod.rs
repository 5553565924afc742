//! Bagged decision-tree estimators.
//!
//! The estimator contract is deliberately small: `fit` over a row-major
//! feature matrix and a target vector, `predict` over a single feature
//! vector. The price pipeline trains against `ln(price)` and the
//! orchestrator exponentiates; the sale pipeline trains against binary
//! status targets (1.0 = sold).

mod forest;
mod tree;

pub use forest::{Forest, ForestParams};
pub use tree::{DecisionTree, Task, TreeParams};
