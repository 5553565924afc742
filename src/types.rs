//! Shared domain types for the price and sale-potential pipelines.
//!
//! Input types use `Option` for "not provided". The upstream wire format
//! historically used in-band sentinels (`0`/`1` for land size, `0` for
//! building area and market medians, the string `"Other"` for categoricals);
//! the accessor methods normalize those to `None` so the feature preparer
//! only ever sees one missing-value convention.

use serde::{Deserialize, Serialize};

/// Land size values at or below this are treated as "not provided"
/// (legacy clients sent `0` or `1` square metres as a placeholder).
const LANDSIZE_SENTINEL_MAX: f64 = 1.0;

/// Categorical placeholder sent by legacy clients for "no selection".
const CATEGORY_SENTINEL: &str = "Other";

/// Raw property attributes for the price estimation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    /// Distance to the central business district, km.
    pub cbd_distance: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub car_spaces: u32,
    /// Land size in m². `None` (or a legacy sentinel) → training median.
    #[serde(default)]
    pub landsize: Option<f64>,
    /// Building area in m². `None` or zero → training median.
    #[serde(default)]
    pub building_area: Option<f64>,
    /// Construction year. `None` → the training reference year (age 0).
    #[serde(default)]
    pub built_year: Option<i32>,
    /// Suburb name. `None` or `"Other"` → median encoded suburb code.
    #[serde(default)]
    pub suburb: Option<String>,
    /// Property type code (e.g. `"h"`, `"u"`, `"t"`). Required; an unseen
    /// code is an unknown-category error, not a substitution.
    pub property_type: String,
}

impl PropertyInput {
    /// Land size with legacy sentinels normalized away.
    pub fn landsize(&self) -> Option<f64> {
        self.landsize.filter(|v| *v > LANDSIZE_SENTINEL_MAX)
    }

    /// Building area with the zero sentinel normalized away.
    pub fn building_area(&self) -> Option<f64> {
        self.building_area.filter(|v| *v > 0.0)
    }

    /// Suburb with the `"Other"` sentinel normalized away.
    pub fn suburb(&self) -> Option<&str> {
        self.suburb
            .as_deref()
            .filter(|s| !s.is_empty() && *s != CATEGORY_SENTINEL)
    }
}

/// Raw listing + market attributes for the sale-potential pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingStatusInput {
    /// Asking price. Must be positive; zero is a domain error downstream.
    pub price: f64,
    pub cbd_distance: f64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub car_spaces: u32,
    /// Land size in m². `None` or zero → training median.
    #[serde(default)]
    pub landsize: Option<f64>,
    /// Listing agency name. `None` or `"Other"` → median encoded code.
    #[serde(default)]
    pub agency: Option<String>,
    /// Suburb median sale price. `None` or zero → training median.
    #[serde(default)]
    pub median_price: Option<f64>,
    /// Suburb median weekly rental. `None` or zero → training median.
    #[serde(default)]
    pub median_rental: Option<u32>,
}

impl ListingStatusInput {
    pub fn landsize(&self) -> Option<f64> {
        self.landsize.filter(|v| *v > 0.0)
    }

    pub fn agency(&self) -> Option<&str> {
        self.agency
            .as_deref()
            .filter(|s| !s.is_empty() && *s != CATEGORY_SENTINEL)
    }

    pub fn median_price(&self) -> Option<f64> {
        self.median_price.filter(|v| *v > 0.0)
    }

    pub fn median_rental(&self) -> Option<u32> {
        self.median_rental.filter(|v| *v > 0)
    }
}

/// Sale status label predicted by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    Sold,
    OnSale,
}

impl SaleStatus {
    /// Contribution of the predicted label to the sale-potential score.
    pub fn potential_factor(self) -> f64 {
        match self {
            Self::Sold => 1.0,
            Self::OnSale => 0.5,
        }
    }
}

/// Tier assigned to a rounded sale-potential score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleTier {
    Bad,
    Average,
    Good,
}

/// Result of the sale-potential pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalePrediction {
    pub status: SaleStatus,
    /// Score in (0, 100), rounded to two decimals.
    pub score: f64,
    pub tier: SaleTier,
}

/// A persisted prediction: contiguous ID plus the flattened entry payload.
///
/// IDs start at 1 and are renumbered sequentially when any record is
/// deleted; that renumbering is the only mutation after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord<T> {
    pub id: u64,
    #[serde(flatten)]
    pub entry: T,
}

/// Store entry for a price prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceEntry {
    pub input: PropertyInput,
    pub predicted_price: f64,
}

/// Store entry for a sale-potential prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleEntry {
    pub input: ListingStatusInput,
    pub score: f64,
    pub tier: SaleTier,
}

/// Round to two decimal places (prices and scores are reported at 2 dp).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
