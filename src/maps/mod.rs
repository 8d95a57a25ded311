//! Choropleth map output: join seat results onto boundary polygons and
//! render one self-contained interactive HTML page per coalition.

pub mod color;
pub mod render;

use std::fs;
use std::path::Path;

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to parse boundary GeoJSON: {0}")]
    Geometry(#[from] serde_json::Error),
    #[error("seat results table is missing column {0}")]
    MissingColumn(String),
    #[error("boundary file has no features array")]
    NoFeatures,
}

pub type MapResult<T> = std::result::Result<T, MapError>;

/// Constituency polygons, kept as opaque GeoJSON. Only the `cst`
/// property is interpreted; geometry passes through untouched.
pub fn load_boundaries(path: &Path) -> MapResult<Value> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
