//! Per-feature standardization.

/// Centers and scales each feature column to zero mean and unit variance,
/// with the mean/std captured at fit time. A constant column (zero std)
/// scales by 1 so it centers to zero instead of dividing by zero.
#[derive(Debug, Clone)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit over a row-major training matrix. Panics in debug builds if rows
    /// are ragged; the caller builds rows from a fixed schema.
    pub fn fit(matrix: &[Vec<f64>]) -> Self {
        let n_rows = matrix.len();
        let n_cols = matrix.first().map_or(0, Vec::len);

        let mut means = vec![0.0; n_cols];
        for row in matrix {
            debug_assert_eq!(row.len(), n_cols);
            for (mean, value) in means.iter_mut().zip(row) {
                *mean += value;
            }
        }
        for mean in &mut means {
            *mean /= n_rows as f64;
        }

        let mut stds = vec![0.0; n_cols];
        for row in matrix {
            for ((std, value), mean) in stds.iter_mut().zip(row).zip(&means) {
                let d = value - mean;
                *std += d * d;
            }
        }
        for std in &mut stds {
            *std = (*std / n_rows as f64).sqrt();
            if *std == 0.0 {
                *std = 1.0;
            }
        }

        Self { means, stds }
    }

    /// Scale a single row in place order.
    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter().zip(&self.stds))
            .map(|(value, (mean, std))| (value - mean) / std)
            .collect()
    }

    /// Scale every row of a matrix.
    pub fn transform_matrix(&self, matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
        matrix.iter().map(|row| self.transform_row(row)).collect()
    }

    pub fn n_features(&self) -> usize {
        self.means.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_centers_and_scales() {
        let matrix = vec![vec![1.0, 10.0], vec![3.0, 10.0], vec![5.0, 10.0]];
        let scaler = StandardScaler::fit(&matrix);

        let scaled = scaler.transform_row(&[3.0, 10.0]);
        assert!(scaled[0].abs() < 1e-12); // mean maps to zero
        assert!(scaled[1].abs() < 1e-12); // constant column: centered, scale 1

        let lo = scaler.transform_row(&[1.0, 10.0]);
        let hi = scaler.transform_row(&[5.0, 10.0]);
        assert!((lo[0] + hi[0]).abs() < 1e-12); // symmetric around the mean
        // population std of [1,3,5] = sqrt(8/3)
        assert!((hi[0] - 2.0 / (8.0_f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_training_matrix_scales_to_unit_variance() {
        let matrix = vec![vec![2.0], vec![4.0], vec![4.0], vec![4.0], vec![5.0], vec![5.0], vec![7.0], vec![9.0]];
        let scaler = StandardScaler::fit(&matrix);
        let scaled = scaler.transform_matrix(&matrix);

        let mean: f64 = scaled.iter().map(|r| r[0]).sum::<f64>() / scaled.len() as f64;
        let var: f64 = scaled.iter().map(|r| (r[0] - mean).powi(2)).sum::<f64>() / scaled.len() as f64;
        assert!(mean.abs() < 1e-12);
        assert!((var - 1.0).abs() < 1e-12);
    }
}
