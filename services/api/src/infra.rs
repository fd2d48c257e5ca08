use esg_advisor::assessment::{EsgRecommendationEngine, ScoringTables};
use esg_advisor::config::{ConfigError, ScoringConfig, SpatialConfig};
use esg_advisor::error::AppError;
use esg_advisor::spatial::{CejstAreas, EjScreenDataset, EjScreenProvider, Gazetteer, SpatialError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn load_engine(config: &ScoringConfig) -> Result<EsgRecommendationEngine, AppError> {
    let tables = match &config.tables_path {
        Some(path) => {
            info!(path = %path.display(), "loading scoring tables");
            ScoringTables::from_path(path)?
        }
        None => ScoringTables::standard(),
    };
    Ok(EsgRecommendationEngine::new(tables))
}

pub(crate) fn load_provider(config: &SpatialConfig) -> Result<EjScreenProvider<Gazetteer>, AppError> {
    let radius_m = config.buffer_radius_m;
    if !(radius_m.is_finite() && radius_m > 0.0) {
        return Err(ConfigError::InvalidRadius.into());
    }

    let gazetteer_path = config
        .gazetteer_csv
        .as_ref()
        .ok_or(SpatialError::MissingDataset("gazetteer"))?;
    let block_groups_path = config
        .block_groups_csv
        .as_ref()
        .ok_or(SpatialError::MissingDataset("EJScreen block group"))?;

    let gazetteer = Gazetteer::from_path(gazetteer_path)?;
    let block_groups = EjScreenDataset::from_path(block_groups_path)?;
    let cejst = match &config.cejst_csv {
        Some(path) => CejstAreas::from_path(path)?,
        None => CejstAreas::default(),
    };

    info!(
        places = gazetteer.len(),
        block_groups = block_groups.len(),
        cejst_areas = cejst.areas().len(),
        radius_m,
        "spatial datasets loaded"
    );

    Ok(EjScreenProvider::new(gazetteer, block_groups, cejst).with_radius(radius_m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use esg_advisor::spatial::DEFAULT_BUFFER_RADIUS_M;

    #[test]
    fn provider_requires_gazetteer_and_block_groups() {
        let config = SpatialConfig {
            gazetteer_csv: None,
            block_groups_csv: None,
            cejst_csv: None,
            buffer_radius_m: DEFAULT_BUFFER_RADIUS_M,
        };
        match load_provider(&config) {
            Err(AppError::Spatial(SpatialError::MissingDataset(name))) => {
                assert_eq!(name, "gazetteer")
            }
            Err(other) => panic!("expected missing dataset, got {other}"),
            Ok(_) => panic!("expected missing dataset"),
        }
    }

    #[test]
    fn default_engine_uses_standard_tables() {
        let engine = load_engine(&ScoringConfig::default()).expect("engine builds");
        assert_eq!(engine.tables(), &ScoringTables::standard());
    }

    #[test]
    fn provider_rejects_unusable_radius() {
        for radius in [-5.0, 0.0, f64::NAN, f64::INFINITY] {
            let config = SpatialConfig {
                gazetteer_csv: Some("places.csv".into()),
                block_groups_csv: Some("ejscreen.csv".into()),
                cejst_csv: None,
                buffer_radius_m: radius,
            };
            assert!(
                matches!(
                    load_provider(&config),
                    Err(AppError::Config(ConfigError::InvalidRadius))
                ),
                "radius {radius} should be rejected"
            );
        }
    }
}
