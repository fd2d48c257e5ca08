use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::geometry::{Buffer, GeoPoint};
use super::indicators::all_indicator_codes;
use super::SpatialError;

/// EJScreen block group reduced to a representative point and its percentile columns.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockGroup {
    pub location: GeoPoint,
    pub indicators: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default)]
pub struct EjScreenDataset {
    block_groups: Vec<BlockGroup>,
}

impl EjScreenDataset {
    pub fn new(block_groups: Vec<BlockGroup>) -> Self {
        Self { block_groups }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SpatialError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Expects `latitude` and `longitude` columns. Only the EJScreen percentile
    /// columns in the indicator catalog are kept; identifiers such as GEOIDs and
    /// unknown columns are ignored. Blank or non-numeric cells are treated as
    /// missing.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SpatialError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let column = |name: &'static str| {
            headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(name))
                .ok_or(SpatialError::MissingColumn(name))
        };
        let lat_idx = column("latitude")?;
        let lon_idx = column("longitude")?;

        let catalog = all_indicator_codes();
        let indicator_columns: Vec<(usize, &str)> = headers
            .iter()
            .enumerate()
            .filter(|&(idx, header)| {
                idx != lat_idx && idx != lon_idx && catalog.iter().any(|code| *code == header)
            })
            .collect();

        let mut block_groups = Vec::new();
        for (row_idx, record) in csv_reader.records().enumerate() {
            let record = record?;
            let coordinate = |idx: usize| {
                record
                    .get(idx)
                    .and_then(|value| value.parse::<f64>().ok())
                    .filter(|value| value.is_finite())
                    .ok_or(SpatialError::InvalidCoordinate { row: row_idx + 1 })
            };
            let location = GeoPoint::new(coordinate(lat_idx)?, coordinate(lon_idx)?);

            let indicators = indicator_columns
                .iter()
                .filter_map(|&(idx, header)| {
                    let value = record.get(idx)?.parse::<f64>().ok()?;
                    value.is_finite().then(|| (header.to_string(), value))
                })
                .collect();

            block_groups.push(BlockGroup {
                location,
                indicators,
            });
        }

        Ok(Self { block_groups })
    }

    pub fn block_groups(&self) -> &[BlockGroup] {
        &self.block_groups
    }

    pub fn len(&self) -> usize {
        self.block_groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block_groups.is_empty()
    }
}

/// Mean of each requested column over the features inside the buffer.
/// Columns with no values inside the buffer are omitted.
pub fn spatial_average(
    buffer: &Buffer,
    features: &[BlockGroup],
    columns: &[&str],
) -> BTreeMap<String, f64> {
    let within: Vec<&BlockGroup> = features
        .iter()
        .filter(|feature| buffer.contains(&feature.location))
        .collect();

    columns
        .iter()
        .filter_map(|column| {
            let (sum, count) = within
                .iter()
                .filter_map(|feature| feature.indicators.get(*column))
                .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
            (count > 0).then(|| (column.to_string(), sum / count as f64))
        })
        .collect()
}

/// Circular approximation of a CEJST disadvantaged tract.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
struct AreaRow {
    latitude: f64,
    longitude: f64,
    radius_m: f64,
}

/// Disadvantaged community areas from the CEJST screening tool.
#[derive(Debug, Clone, Default)]
pub struct CejstAreas {
    areas: Vec<Buffer>,
}

impl CejstAreas {
    pub fn new(areas: Vec<Buffer>) -> Self {
        Self { areas }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SpatialError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SpatialError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut areas = Vec::new();
        for record in csv_reader.deserialize::<AreaRow>() {
            let row = record?;
            areas.push(Buffer::new(
                GeoPoint::new(row.latitude, row.longitude),
                row.radius_m,
            ));
        }
        Ok(Self { areas })
    }

    pub fn areas(&self) -> &[Buffer] {
        &self.areas
    }
}

pub fn intersects_any(buffer: &Buffer, areas: &[Buffer]) -> bool {
    areas.iter().any(|area| buffer.intersects(area))
}
