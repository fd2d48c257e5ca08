//! Environmental-justice context for a project site, derived from EJScreen
//! block-group percentiles and CEJST disadvantaged-community areas.

mod dataset;
mod gazetteer;
mod geometry;
pub mod indicators;

pub use dataset::{intersects_any, spatial_average, BlockGroup, CejstAreas, EjScreenDataset};
pub use gazetteer::{Gazetteer, Geocoder};
pub use geometry::{Buffer, GeoPoint, DEFAULT_BUFFER_RADIUS_M};
pub use indicators::{
    all_indicator_codes, ej_indexes, top_environmental_indicators, top_social_indicators,
    IndicatorAverage,
};

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::assessment::LocationContext;

#[derive(Debug, thiserror::Error)]
pub enum SpatialError {
    #[error("unable to geocode location '{0}'")]
    NotFound(String),
    #[error("failed to read spatial dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid spatial CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("spatial dataset is missing the '{0}' column")]
    MissingColumn(&'static str),
    #[error("row {row} has a missing or non-numeric coordinate")]
    InvalidCoordinate { row: usize },
    #[error("no {0} dataset configured")]
    MissingDataset(&'static str),
}

/// Narrow seam the scoring engine uses to obtain site context.
pub trait LocationContextProvider {
    fn location_context(&self, location: &str) -> Result<LocationContext, SpatialError>;
}

/// Summary of the EJ screening around a location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EjAssessment {
    pub location: String,
    pub center: GeoPoint,
    pub radius_m: f64,
    pub block_groups_within: usize,
    pub averages: BTreeMap<String, f64>,
    pub top_social: Vec<IndicatorAverage>,
    pub top_environmental: Vec<IndicatorAverage>,
    pub context: LocationContext,
    pub cejst_disadvantaged: bool,
}

/// Geocodes a place, buffers it, and summarizes the EJScreen data inside.
pub struct EjScreenProvider<G> {
    geocoder: G,
    block_groups: EjScreenDataset,
    cejst: CejstAreas,
    radius_m: f64,
}

impl<G: Geocoder> EjScreenProvider<G> {
    pub fn new(geocoder: G, block_groups: EjScreenDataset, cejst: CejstAreas) -> Self {
        Self {
            geocoder,
            block_groups,
            cejst,
            radius_m: DEFAULT_BUFFER_RADIUS_M,
        }
    }

    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    pub fn assess(&self, location: &str) -> Result<EjAssessment, SpatialError> {
        let center = self.geocoder.geocode(location)?;
        let buffer = Buffer::new(center, self.radius_m);

        let block_groups_within = self
            .block_groups
            .block_groups()
            .iter()
            .filter(|feature| buffer.contains(&feature.location))
            .count();
        let averages = spatial_average(
            &buffer,
            self.block_groups.block_groups(),
            &all_indicator_codes(),
        );
        let cejst_disadvantaged = intersects_any(&buffer, self.cejst.areas());

        debug!(
            %location,
            block_groups_within,
            cejst_disadvantaged,
            "ejscreen buffer summarized"
        );

        Ok(EjAssessment {
            location: location.trim().to_string(),
            center,
            radius_m: self.radius_m,
            block_groups_within,
            top_social: top_social_indicators(&averages),
            top_environmental: top_environmental_indicators(&averages),
            context: ej_indexes(&averages),
            averages,
            cejst_disadvantaged,
        })
    }
}

impl<G: Geocoder> LocationContextProvider for EjScreenProvider<G> {
    fn location_context(&self, location: &str) -> Result<LocationContext, SpatialError> {
        self.assess(location).map(|assessment| assessment.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> EjScreenProvider<Gazetteer> {
        let gazetteer = Gazetteer::from_reader(
            "name,latitude,longitude\nEquator Town,0.0,0.0\nFaraway,45.0,45.0\n".as_bytes(),
        )
        .expect("gazetteer loads");
        let block_groups = EjScreenDataset::from_reader(
            "latitude,longitude,P_LOWINCPC,P_OVER64PC,P_PM25,P_NO2\n\
             0.0,0.0,70,20,55,90\n\
             0.0,0.03,50,40,65,\n\
             5.0,5.0,99,99,99,99\n"
                .as_bytes(),
        )
        .expect("dataset loads");
        let cejst = CejstAreas::new(vec![Buffer::new(GeoPoint::new(0.0, 0.1), 4_000.0)]);
        EjScreenProvider::new(gazetteer, block_groups, cejst)
    }

    #[test]
    fn summarizes_block_groups_inside_the_buffer() {
        let assessment = provider().assess("equator town").expect("assessment");

        assert_eq!(assessment.block_groups_within, 2);
        assert_eq!(assessment.averages.get("P_LOWINCPC"), Some(&60.0));
        assert_eq!(assessment.averages.get("P_NO2"), Some(&90.0));
        assert_eq!(assessment.top_social[0].code, "P_LOWINCPC");
        assert_eq!(assessment.context.demographic_index, Some(60.0));
        assert_eq!(assessment.context.environmental_justice_score, Some(90.0));
        assert!(assessment.cejst_disadvantaged);
    }

    #[test]
    fn empty_buffer_yields_empty_context() {
        let assessment = provider().assess("Faraway").expect("assessment");
        assert_eq!(assessment.block_groups_within, 0);
        assert!(assessment.averages.is_empty());
        assert!(assessment.context.is_empty());
        assert!(!assessment.cejst_disadvantaged);
    }

    #[test]
    fn unknown_location_is_not_found() {
        assert!(matches!(
            provider().location_context("Nowhere"),
            Err(SpatialError::NotFound(_))
        ));
    }

    #[test]
    fn smaller_radius_excludes_neighbors() {
        let provider = provider().with_radius(1_000.0);
        let assessment = provider.assess("Equator Town").expect("assessment");
        assert_eq!(assessment.block_groups_within, 1);
        assert_eq!(assessment.context.demographic_index, Some(70.0));
    }
}
