//! Pipeline orchestration.
//!
//! [`ModelContext`] owns everything that is fit or trained at startup: the
//! two feature preparers and the two forests. It is constructed once in
//! `main()` (or from fixture rows in tests) and passed by reference — there
//! is no global trained-model state. After construction it is read-only, so
//! sharing across request handlers needs no locking.

pub mod scoring;

use crate::config::ModelConfig;
use crate::dataset::{self, DatasetError, HouseRow, MarketRow};
use crate::features::{PrepareError, PriceFeaturePreparer, SaleFeaturePreparer};
use crate::model::{Forest, ForestParams, Task};
use crate::types::{round2, ListingStatusInput, PropertyInput, SalePrediction, SaleStatus};
use crate::ServiceConfig;

/// Errors crossing the pipeline boundary.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Prepare(#[from] PrepareError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    /// An input violated a numeric contract (e.g. non-positive price in the
    /// yield computation).
    #[error("domain error: {0}")]
    Domain(String),
}

/// Fitted state for both pipelines.
pub struct ModelContext {
    price_preparer: PriceFeaturePreparer,
    price_model: Forest,
    sale_preparer: SaleFeaturePreparer,
    sale_model: Forest,
}

impl ModelContext {
    /// Load both training snapshots from the configured paths and train.
    pub fn from_files(config: &ServiceConfig) -> Result<Self, PipelineError> {
        let house_rows = dataset::load_house_rows(&config.data.house_features_csv)?;
        let market_rows = dataset::load_market_rows(&config.data.market_features_csv)?;
        tracing::info!(
            house_rows = house_rows.len(),
            market_rows = market_rows.len(),
            "training snapshots loaded"
        );
        Self::train(&config.model, &house_rows, &market_rows)
    }

    /// Fit the preparers and train both forests from in-memory rows.
    pub fn train(
        config: &ModelConfig,
        house_rows: &[HouseRow],
        market_rows: &[MarketRow],
    ) -> Result<Self, PipelineError> {
        let params = ForestParams::from(config);

        let started = std::time::Instant::now();
        let (price_preparer, price_matrix, log_prices) =
            PriceFeaturePreparer::fit(house_rows, config.reference_year)?;
        let price_model = Forest::fit(&price_matrix, &log_prices, Task::Regression, params);
        tracing::info!(
            trees = price_model.n_trees(),
            rows = price_matrix.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "price regressor trained"
        );

        let started = std::time::Instant::now();
        let (sale_preparer, sale_matrix, status_labels) = SaleFeaturePreparer::fit(market_rows)?;
        let sale_model = Forest::fit(&sale_matrix, &status_labels, Task::Classification, params);
        tracing::info!(
            trees = sale_model.n_trees(),
            rows = sale_matrix.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "sale-status classifier trained"
        );

        Ok(Self {
            price_preparer,
            price_model,
            sale_preparer,
            sale_model,
        })
    }

    /// Estimate the market price for a property, in linear price units,
    /// rounded to two decimals.
    ///
    /// The regressor predicts in log space; the exponentiation back to
    /// dollars happens here, not in the estimator.
    pub fn estimate_price(&self, input: &PropertyInput) -> Result<f64, PipelineError> {
        let features = self.price_preparer.prepare(input)?;
        let log_price = self.price_model.predict(&features);
        Ok(round2(log_price.exp()))
    }

    /// Score a listing's sale potential: classify, then apply the scoring
    /// formula to the resolved market figures, then tier the rounded score.
    pub fn estimate_sale_potential(
        &self,
        input: &ListingStatusInput,
    ) -> Result<SalePrediction, PipelineError> {
        let features = self.sale_preparer.prepare(input)?;
        let status = if self.sale_model.predict(&features.vector) >= 0.5 {
            SaleStatus::Sold
        } else {
            SaleStatus::OnSale
        };
        let score = scoring::property_score(
            features.price,
            features.median_price,
            features.median_rental,
            status,
        )?;
        Ok(SalePrediction {
            status,
            score,
            tier: scoring::tier_for(score),
        })
    }

    pub fn price_preparer(&self) -> &PriceFeaturePreparer {
        &self.price_preparer
    }

    pub fn sale_preparer(&self) -> &SaleFeaturePreparer {
        &self.sale_preparer
    }

    /// One-line model summary for the health endpoint.
    pub fn summary(&self) -> String {
        format!(
            "price: {} trees / {} features; sale: {} trees / {} features",
            self.price_model.n_trees(),
            self.price_preparer.schema().len(),
            self.sale_model.n_trees(),
            self.sale_preparer.schema().len(),
        )
    }
}
