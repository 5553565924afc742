//! Fitted feature preparers for the two pipelines.
//!
//! Each preparer is fit once from its training snapshot, capturing the
//! encoders, scaler, substitution medians and (for the price pipeline) the
//! 99th-percentile clip bounds. All captured values are frozen — nothing is
//! recomputed per request, including the reference year used for property
//! age, so the model does not drift under a moving clock.

use super::{FeatureSchema, LabelEncoder, PrepareError, StandardScaler};
use crate::dataset::{HouseRow, MarketRow};
use crate::types::{ListingStatusInput, PropertyInput, SaleStatus};
use statrs::statistics::{Data, OrderStatistics};

fn median(values: &[f64]) -> f64 {
    let mut data = Data::new(values.to_vec());
    data.median()
}

fn percentile_99(values: &[f64]) -> f64 {
    let mut data = Data::new(values.to_vec());
    data.percentile(99)
}

/// Building-area-to-land-size ratio with the zero-land-size policy:
/// an undefined ratio resolves to 0, never to infinity or NaN.
fn area_ratio(building_area: f64, landsize: f64) -> f64 {
    if landsize == 0.0 {
        0.0
    } else {
        building_area / landsize
    }
}

// ============================================================================
// Price pipeline
// ============================================================================

/// Feature preparer for the price estimation pipeline.
#[derive(Debug, Clone)]
pub struct PriceFeaturePreparer {
    suburb_encoder: LabelEncoder,
    proptype_encoder: LabelEncoder,
    scaler: StandardScaler,
    schema: FeatureSchema,
    median_suburb_code: f64,
    median_landsize: f64,
    median_building_area: f64,
    landsize_clip: f64,
    building_area_clip: f64,
    reference_year: i32,
}

impl PriceFeaturePreparer {
    /// Fit from the house-features snapshot.
    ///
    /// Returns the preparer together with the scaled training matrix and the
    /// log-price target vector, in schema order.
    pub fn fit(
        rows: &[HouseRow],
        reference_year: i32,
    ) -> Result<(Self, Vec<Vec<f64>>, Vec<f64>), PrepareError> {
        debug_assert!(!rows.is_empty());
        let schema = FeatureSchema::price();

        let suburb_encoder = LabelEncoder::fit(rows.iter().map(|r| r.suburb.as_str()));
        let proptype_encoder = LabelEncoder::fit(rows.iter().map(|r| r.property_type.as_str()));

        let suburb_codes =
            suburb_encoder.transform_column("suburb", rows.iter().map(|r| r.suburb.as_str()))?;
        let proptype_codes = proptype_encoder
            .transform_column("property type", rows.iter().map(|r| r.property_type.as_str()))?;

        let landsizes: Vec<f64> = rows.iter().map(|r| r.landsize).collect();
        let building_areas: Vec<f64> = rows.iter().map(|r| r.building_area).collect();

        let median_suburb_code = median(&suburb_codes);
        let median_landsize = median(&landsizes);
        let median_building_area = median(&building_areas);
        let landsize_clip = percentile_99(&landsizes);
        let building_area_clip = percentile_99(&building_areas);

        // Derived features come from the raw columns; the clip is applied to
        // the land size / building area slots afterwards, so the ratio keeps
        // the pre-clip value. This matches the order used at inference.
        let mut matrix = Vec::with_capacity(rows.len());
        let mut targets = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let vector = vec![
                row.cbd_distance,
                row.bedrooms,
                row.bathrooms,
                row.car_spaces,
                row.landsize.clamp(0.0, landsize_clip),
                row.building_area.clamp(0.0, building_area_clip),
                f64::from(reference_year) - row.built_year,
                suburb_codes[i],
                proptype_codes[i],
                row.bedrooms + row.bathrooms + row.car_spaces,
                area_ratio(row.building_area, row.landsize),
            ];
            schema.check(&vector)?;
            matrix.push(vector);
            targets.push(row.price.ln());
        }

        let scaler = StandardScaler::fit(&matrix);
        let scaled = scaler.transform_matrix(&matrix);

        Ok((
            Self {
                suburb_encoder,
                proptype_encoder,
                scaler,
                schema,
                median_suburb_code,
                median_landsize,
                median_building_area,
                landsize_clip,
                building_area_clip,
                reference_year,
            },
            scaled,
            targets,
        ))
    }

    /// Assemble the unscaled feature vector for an input, after default
    /// substitution, derivation and clipping. Exposed for inspection; the
    /// estimator consumes [`prepare`](Self::prepare) output.
    pub fn raw_features(&self, input: &PropertyInput) -> Result<Vec<f64>, PrepareError> {
        let suburb_code = match input.suburb() {
            Some(name) => self.suburb_encoder.transform("suburb", name)?,
            None => self.median_suburb_code,
        };
        let proptype_code = self
            .proptype_encoder
            .transform("property type", &input.property_type)?;

        let landsize = input.landsize().unwrap_or(self.median_landsize);
        let building_area = input.building_area().unwrap_or(self.median_building_area);
        let built_year = input.built_year.unwrap_or(self.reference_year);
        let property_age = f64::from(self.reference_year - built_year);
        let total_rooms = f64::from(input.bedrooms + input.bathrooms + input.car_spaces);

        let vector = vec![
            input.cbd_distance,
            f64::from(input.bedrooms),
            f64::from(input.bathrooms),
            f64::from(input.car_spaces),
            landsize.clamp(0.0, self.landsize_clip),
            building_area.clamp(0.0, self.building_area_clip),
            property_age,
            suburb_code,
            proptype_code,
            total_rooms,
            area_ratio(building_area, landsize),
        ];
        self.schema.check(&vector)?;
        Ok(vector)
    }

    /// Produce the scaled feature vector ready for the estimator.
    pub fn prepare(&self, input: &PropertyInput) -> Result<Vec<f64>, PrepareError> {
        let raw = self.raw_features(input)?;
        Ok(self.scaler.transform_row(&raw))
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Training-set median land size, the substitution value for missing
    /// land size inputs.
    pub fn median_landsize(&self) -> f64 {
        self.median_landsize
    }

    pub fn median_building_area(&self) -> f64 {
        self.median_building_area
    }
}

// ============================================================================
// Sale-potential pipeline
// ============================================================================

/// Prepared sale-potential features plus the resolved market figures the
/// scoring formula needs (post-substitution, pre-scaling).
#[derive(Debug, Clone)]
pub struct SaleFeatures {
    pub vector: Vec<f64>,
    pub price: f64,
    pub median_price: f64,
    pub median_rental: f64,
}

/// Feature preparer for the sale-potential pipeline.
#[derive(Debug, Clone)]
pub struct SaleFeaturePreparer {
    agency_encoder: LabelEncoder,
    scaler: StandardScaler,
    schema: FeatureSchema,
    median_agency_code: f64,
    median_landsize: f64,
    median_price: f64,
    median_rental: f64,
}

impl SaleFeaturePreparer {
    /// Fit from the market-features snapshot.
    ///
    /// Returns the preparer, the scaled training matrix and the binary
    /// sale-status targets (1.0 = sold, 0.0 = on sale).
    pub fn fit(rows: &[MarketRow]) -> Result<(Self, Vec<Vec<f64>>, Vec<f64>), PrepareError> {
        debug_assert!(!rows.is_empty());
        let schema = FeatureSchema::sale();

        let agency_encoder = LabelEncoder::fit(rows.iter().map(|r| r.agency.as_str()));
        let agency_codes =
            agency_encoder.transform_column("agency", rows.iter().map(|r| r.agency.as_str()))?;

        let landsizes: Vec<f64> = rows.iter().map(|r| r.landsize).collect();
        let median_prices: Vec<f64> = rows.iter().map(|r| r.median_price).collect();
        let median_rentals: Vec<f64> = rows.iter().map(|r| r.median_rental).collect();

        let median_agency_code = median(&agency_codes);
        let median_landsize = median(&landsizes);
        let median_price = median(&median_prices);
        let median_rental = median(&median_rentals);

        let mut matrix = Vec::with_capacity(rows.len());
        let mut targets = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let vector = vec![
                row.price,
                row.cbd_distance,
                row.bedrooms,
                row.bathrooms,
                row.car_spaces,
                row.landsize,
                agency_codes[i],
                row.median_price,
                row.median_rental,
            ];
            schema.check(&vector)?;
            matrix.push(vector);
            targets.push(match row.status {
                SaleStatus::Sold => 1.0,
                SaleStatus::OnSale => 0.0,
            });
        }

        let scaler = StandardScaler::fit(&matrix);
        let scaled = scaler.transform_matrix(&matrix);

        Ok((
            Self {
                agency_encoder,
                scaler,
                schema,
                median_agency_code,
                median_landsize,
                median_price,
                median_rental,
            },
            scaled,
            targets,
        ))
    }

    /// Assemble the unscaled feature vector and resolved market figures.
    pub fn raw_features(&self, input: &ListingStatusInput) -> Result<SaleFeatures, PrepareError> {
        let agency_code = match input.agency() {
            Some(name) => self.agency_encoder.transform("agency", name)?,
            None => self.median_agency_code,
        };

        let landsize = input.landsize().unwrap_or(self.median_landsize);
        let median_price = input.median_price().unwrap_or(self.median_price);
        let median_rental = input
            .median_rental()
            .map_or(self.median_rental, f64::from);

        let vector = vec![
            input.price,
            input.cbd_distance,
            f64::from(input.bedrooms),
            f64::from(input.bathrooms),
            f64::from(input.car_spaces),
            landsize,
            agency_code,
            median_price,
            median_rental,
        ];
        self.schema.check(&vector)?;

        Ok(SaleFeatures {
            vector,
            price: input.price,
            median_price,
            median_rental,
        })
    }

    /// Produce scaled features plus the figures the scoring formula uses.
    pub fn prepare(&self, input: &ListingStatusInput) -> Result<SaleFeatures, PrepareError> {
        let mut features = self.raw_features(input)?;
        features.vector = self.scaler.transform_row(&features.vector);
        Ok(features)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn median_landsize(&self) -> f64 {
        self.median_landsize
    }

    pub fn median_price(&self) -> f64 {
        self.median_price
    }

    pub fn median_rental(&self) -> f64 {
        self.median_rental
    }
}
