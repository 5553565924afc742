//! Named feature ordering shared by training and inference.
//!
//! The estimators consume positional vectors; a silent order or length
//! mismatch between the training matrix and an inference vector corrupts
//! predictions without any error. The schema makes the ordering explicit
//! and is checked at runtime on both paths.

use super::PrepareError;

/// Feature order for the price pipeline, matching the training matrix.
pub const PRICE_FEATURES: &[&str] = &[
    "cbd_distance",
    "bedrooms",
    "bathrooms",
    "car_spaces",
    "landsize",
    "building_area",
    "property_age",
    "suburb",
    "property_type",
    "total_rooms",
    "area_to_landsize_ratio",
];

/// Feature order for the sale-potential pipeline.
pub const SALE_FEATURES: &[&str] = &[
    "price",
    "cbd_distance",
    "bedrooms",
    "bathrooms",
    "car_spaces",
    "landsize",
    "agency",
    "median_price",
    "median_rental",
];

/// An ordered, named feature layout.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    name: &'static str,
    features: &'static [&'static str],
}

impl FeatureSchema {
    pub const fn new(name: &'static str, features: &'static [&'static str]) -> Self {
        Self { name, features }
    }

    pub fn price() -> Self {
        Self::new("price", PRICE_FEATURES)
    }

    pub fn sale() -> Self {
        Self::new("sale-potential", SALE_FEATURES)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn names(&self) -> &'static [&'static str] {
        self.features
    }

    /// Verify a vector has exactly one slot per schema feature.
    pub fn check(&self, vector: &[f64]) -> Result<(), PrepareError> {
        if vector.len() == self.features.len() {
            Ok(())
        } else {
            Err(PrepareError::SchemaMismatch {
                schema: self.name,
                expected: self.features.len(),
                actual: vector.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lengths() {
        assert_eq!(FeatureSchema::price().len(), 11);
        assert_eq!(FeatureSchema::sale().len(), 9);
    }

    #[test]
    fn test_check_rejects_wrong_length() {
        let schema = FeatureSchema::sale();
        assert!(schema.check(&vec![0.0; 9]).is_ok());
        let err = schema.check(&vec![0.0; 8]).unwrap_err();
        assert!(matches!(
            err,
            PrepareError::SchemaMismatch {
                expected: 9,
                actual: 8,
                ..
            }
        ));
    }
}
