//! HomeVal: Residential Property Intelligence
//!
//! Price estimation and sale-potential scoring for residential listings.
//!
//! ## Architecture
//!
//! - **Feature Preparer**: encodes categoricals, substitutes training medians
//!   for missing values, derives computed features, scales
//! - **Estimators**: bagged decision-tree ensembles (log-price regression,
//!   sale-status classification) trained at startup from CSV snapshots
//! - **Scoring**: weighted sigmoid combining price fairness, rental yield
//!   and predicted sale likelihood into a 0–100 score
//! - **Record Store**: append-only JSON files with contiguous integer IDs

pub mod api;
pub mod config;
pub mod dataset;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod store;
pub mod types;

// Re-export configuration
pub use config::ServiceConfig;

// Re-export commonly used types
pub use types::{
    ListingStatusInput, PredictionRecord, PriceEntry, PropertyInput, SaleEntry, SalePrediction,
    SaleStatus, SaleTier,
};

// Re-export pipeline entry points
pub use pipeline::{ModelContext, PipelineError};

// Re-export store
pub use store::{RecordStore, StoreError};
