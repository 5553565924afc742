//! Label encoding for categorical columns.

use super::PrepareError;

/// Mapping from category strings to integer codes, fixed at fit time.
///
/// Codes are assigned by sorted order of the distinct training values, so
/// the mapping is stable across retrains on the same snapshot.
#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit over a training column. Duplicates are fine; order is not.
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let mut classes: Vec<String> = values.into_iter().map(str::to_string).collect();
        classes.sort_unstable();
        classes.dedup();
        Self { classes }
    }

    /// Encode a single value.
    ///
    /// Fails with [`PrepareError::UnknownCategory`] for values never seen at
    /// fit time; `field` names the offending input field in the error.
    pub fn transform(&self, field: &'static str, value: &str) -> Result<f64, PrepareError> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .map(|idx| idx as f64)
            .map_err(|_| PrepareError::UnknownCategory {
                field,
                value: value.to_string(),
            })
    }

    /// Encode a full training column. Every value is known by construction
    /// when the encoder was fit on the same column.
    pub fn transform_column<'a>(
        &self,
        field: &'static str,
        values: impl IntoIterator<Item = &'a str>,
    ) -> Result<Vec<f64>, PrepareError> {
        values
            .into_iter()
            .map(|v| self.transform(field, v))
            .collect()
    }

    /// Number of distinct classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
