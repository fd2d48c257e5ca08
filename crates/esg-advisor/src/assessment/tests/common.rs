use std::sync::Arc;

use crate::assessment::{
    AssessmentState, CategoryScores, EsgRecommendationEngine, LocationContext, ProjectType,
    ScoringTables, SurveyAnswer, SurveyResponse,
};
use crate::spatial::{LocationContextProvider, SpatialError};

pub(super) const QUESTION_COUNT: u32 = 33;

pub(super) fn engine() -> EsgRecommendationEngine {
    EsgRecommendationEngine::new(ScoringTables::standard())
}

pub(super) fn uniform_answers(answer: SurveyAnswer) -> Vec<SurveyResponse> {
    (1..=QUESTION_COUNT)
        .map(|question_id| SurveyResponse::new(question_id, answer))
        .collect()
}

pub(super) fn scores(entries: &[(&str, f64)]) -> CategoryScores {
    entries.iter().map(|(name, score)| (*name, *score)).collect()
}

pub(super) fn assert_close(actual: Option<f64>, expected: f64, what: &str) {
    let actual = actual.unwrap_or_else(|| panic!("{what} missing"));
    assert!(
        (actual - expected).abs() < 1e-9,
        "{what}: expected {expected}, got {actual}"
    );
}

/// Hand-computed all-"Yes" totals: (environmental, social, governance).
pub(super) fn all_yes_esg_totals(project_type: ProjectType) -> (f64, f64, f64) {
    match project_type {
        ProjectType::Biomass => (80.0, 30.0, 30.0),
        ProjectType::Gas => (75.0, 35.0, 20.0),
        ProjectType::Solar => (80.0, 40.0, 20.0),
        ProjectType::Wind => (75.0, 50.0, 15.0),
        ProjectType::Geothermal => (85.0, 40.0, 15.0),
    }
}

/// Hand-computed all-"Yes" impact totals: (climate, local, community, health, innovation).
pub(super) fn all_yes_impact_totals(project_type: ProjectType) -> (f64, f64, f64, f64, f64) {
    match project_type {
        ProjectType::Biomass => (50.0, 45.0, 30.0, 10.0, 5.0),
        ProjectType::Gas => (30.0, 50.0, 40.0, 20.0, 5.0),
        ProjectType::Solar => (60.0, 30.0, 40.0, 10.0, 5.0),
        ProjectType::Wind => (70.0, 25.0, 50.0, 5.0, 5.0),
        ProjectType::Geothermal => (80.0, 30.0, 40.0, 5.0, 5.0),
    }
}

pub(super) fn state_with(
    engine: EsgRecommendationEngine,
    locations: Option<Arc<dyn LocationContextProvider + Send + Sync>>,
) -> AssessmentState {
    AssessmentState {
        engine: Arc::new(engine),
        locations,
    }
}

pub(super) struct FixedContext(pub LocationContext);

impl LocationContextProvider for FixedContext {
    fn location_context(&self, _location: &str) -> Result<LocationContext, SpatialError> {
        Ok(self.0)
    }
}

pub(super) struct UnknownPlaces;

impl LocationContextProvider for UnknownPlaces {
    fn location_context(&self, location: &str) -> Result<LocationContext, SpatialError> {
        Err(SpatialError::NotFound(location.to_string()))
    }
}
