//! Feature preparation: encoding, substitution, derivation, scaling.
//!
//! Everything here is fit once from a training snapshot and read-only
//! afterwards. Inference goes through [`PriceFeaturePreparer::prepare`] or
//! [`SaleFeaturePreparer::prepare`], which apply the same transformations
//! the training path used, in the same feature order.

mod encoder;
mod preparer;
mod scaler;
mod schema;

pub use encoder::LabelEncoder;
pub use preparer::{PriceFeaturePreparer, SaleFeatures, SaleFeaturePreparer};
pub use scaler::StandardScaler;
pub use schema::{FeatureSchema, PRICE_FEATURES, SALE_FEATURES};

/// Errors raised while turning a raw input into a feature vector.
#[derive(Debug, thiserror::Error)]
pub enum PrepareError {
    /// A categorical value was never seen during training. Substitution only
    /// applies to *missing* categoricals; a present-but-unseen value is
    /// rejected rather than silently mapped to garbage.
    #[error("unknown {field} {value:?}: not present in the training snapshot")]
    UnknownCategory { field: &'static str, value: String },

    /// The assembled vector does not match the feature schema the estimator
    /// was fit against. Order or length drift silently corrupts predictions,
    /// so it is checked on every call.
    #[error("{schema} feature vector has {actual} slots, schema expects {expected}")]
    SchemaMismatch {
        schema: &'static str,
        expected: usize,
        actual: usize,
    },
}
