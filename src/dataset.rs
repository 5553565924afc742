//! Training snapshot loading.
//!
//! Parses the two CSV snapshots the estimators are trained from. Columns are
//! located by header name, so column order in the file does not matter. Rows
//! with unparseable numerics are logged and skipped; a snapshot that yields
//! no usable rows is an error.

use crate::types::SaleStatus;
use std::path::Path;

/// One row of the house-features training snapshot (price pipeline).
#[derive(Debug, Clone)]
pub struct HouseRow {
    pub cbd_distance: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub car_spaces: f64,
    pub landsize: f64,
    pub building_area: f64,
    pub built_year: f64,
    pub suburb: String,
    pub property_type: String,
    pub price: f64,
}

/// One row of the market-features training snapshot (sale-potential pipeline).
#[derive(Debug, Clone)]
pub struct MarketRow {
    pub price: f64,
    pub cbd_distance: f64,
    pub bedrooms: f64,
    pub bathrooms: f64,
    pub car_spaces: f64,
    pub landsize: f64,
    pub agency: String,
    pub median_price: f64,
    pub median_rental: f64,
    pub status: SaleStatus,
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("{path}: missing required column {column:?}")]
    MissingColumn { path: String, column: String },
    #[error("{path}: no usable training rows")]
    Empty { path: String },
}

/// Header-indexed view over a CSV header line.
struct Columns {
    indices: Vec<usize>,
}

impl Columns {
    fn resolve(path: &str, header: &str, names: &[&str]) -> Result<Self, DatasetError> {
        let fields: Vec<&str> = header.split(',').map(str::trim).collect();
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let idx = fields.iter().position(|f| f == name).ok_or_else(|| {
                DatasetError::MissingColumn {
                    path: path.to_string(),
                    column: (*name).to_string(),
                }
            })?;
            indices.push(idx);
        }
        Ok(Self { indices })
    }

    fn get<'a>(&self, fields: &[&'a str], slot: usize) -> Option<&'a str> {
        fields.get(self.indices[slot]).map(|s| s.trim())
    }

    fn number(&self, fields: &[&str], slot: usize) -> Option<f64> {
        self.get(fields, slot)?.parse().ok()
    }
}

fn read_lines(path: &str) -> Result<Vec<String>, DatasetError> {
    let contents =
        std::fs::read_to_string(Path::new(path)).map_err(|source| DatasetError::Io {
            path: path.to_string(),
            source,
        })?;
    Ok(contents
        .lines()
        .map(|l| l.trim_end_matches('\r').to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

/// Load the house-features snapshot.
pub fn load_house_rows(path: &str) -> Result<Vec<HouseRow>, DatasetError> {
    let lines = read_lines(path)?;
    let Some((header, body)) = lines.split_first() else {
        return Err(DatasetError::Empty {
            path: path.to_string(),
        });
    };

    const NAMES: [&str; 10] = [
        "CBD Distance",
        "Bedroom",
        "Bathroom",
        "Car-Garage",
        "Landsize",
        "Building Area",
        "Built Year",
        "Suburb",
        "PropType",
        "Price",
    ];
    let cols = Columns::resolve(path, header, &NAMES)?;

    let mut rows = Vec::with_capacity(body.len());
    for (line_no, line) in body.iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        let parsed = (|| {
            Some(HouseRow {
                cbd_distance: cols.number(&fields, 0)?,
                bedrooms: cols.number(&fields, 1)?,
                bathrooms: cols.number(&fields, 2)?,
                car_spaces: cols.number(&fields, 3)?,
                landsize: cols.number(&fields, 4)?,
                building_area: cols.number(&fields, 5)?,
                built_year: cols.number(&fields, 6)?,
                suburb: cols.get(&fields, 7)?.to_string(),
                property_type: cols.get(&fields, 8)?.to_string(),
                price: cols.number(&fields, 9).filter(|p| *p > 0.0)?,
            })
        })();
        match parsed {
            Some(row) => rows.push(row),
            None => tracing::warn!(path, line = line_no + 2, "skipping unparseable row"),
        }
    }

    if rows.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_string(),
        });
    }
    Ok(rows)
}

/// Load the market-features snapshot.
///
/// Status labels follow the snapshot convention: `S` = sold, `NS` = on sale.
/// Rows with any other label are skipped.
pub fn load_market_rows(path: &str) -> Result<Vec<MarketRow>, DatasetError> {
    let lines = read_lines(path)?;
    let Some((header, body)) = lines.split_first() else {
        return Err(DatasetError::Empty {
            path: path.to_string(),
        });
    };

    const NAMES: [&str; 10] = [
        "Price",
        "CBD Distance",
        "Bedroom",
        "Bathroom",
        "Car-Garage",
        "Landsize",
        "RE Agency",
        "Median Price",
        "Median Rental",
        "Status",
    ];
    let cols = Columns::resolve(path, header, &NAMES)?;

    let mut rows = Vec::with_capacity(body.len());
    for (line_no, line) in body.iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        let parsed = (|| {
            let status = match cols.get(&fields, 9)? {
                "S" => SaleStatus::Sold,
                "NS" => SaleStatus::OnSale,
                _ => return None,
            };
            Some(MarketRow {
                price: cols.number(&fields, 0).filter(|p| *p > 0.0)?,
                cbd_distance: cols.number(&fields, 1)?,
                bedrooms: cols.number(&fields, 2)?,
                bathrooms: cols.number(&fields, 3)?,
                car_spaces: cols.number(&fields, 4)?,
                landsize: cols.number(&fields, 5)?,
                agency: cols.get(&fields, 6)?.to_string(),
                median_price: cols.number(&fields, 7)?,
                median_rental: cols.number(&fields, 8)?,
                status,
            })
        })();
        match parsed {
            Some(row) => rows.push(row),
            None => tracing::warn!(path, line = line_no + 2, "skipping unparseable row"),
        }
    }

    if rows.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_string(),
        });
    }
    Ok(rows)
}
