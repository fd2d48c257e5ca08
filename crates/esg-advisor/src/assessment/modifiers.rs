use super::domain::{CategoryScores, LocationContext, ProjectType};
use super::ScoringError;

pub const ENVIRONMENTAL: &str = "environmental";
pub const SOCIAL: &str = "social";
pub const GOVERNANCE: &str = "governance";

const RENEWABLE_ENVIRONMENTAL_MULTIPLIER: f64 = 1.1;
const BIOMASS_ENVIRONMENTAL_MULTIPLIER: f64 = 0.9;
const RENEWABLE_SOCIAL_MULTIPLIER: f64 = 1.2;

/// Fixed project-type heuristics. Governance is never touched.
pub(crate) fn apply_project_modifiers(
    scores: &CategoryScores,
    project_type: ProjectType,
) -> CategoryScores {
    let mut modified = scores.clone();

    let environmental = match project_type {
        ProjectType::Solar | ProjectType::Wind => Some(RENEWABLE_ENVIRONMENTAL_MULTIPLIER),
        ProjectType::Biomass => Some(BIOMASS_ENVIRONMENTAL_MULTIPLIER),
        ProjectType::Gas | ProjectType::Geothermal => None,
    };
    if let (Some(multiplier), Some(score)) = (environmental, modified.get_mut(ENVIRONMENTAL)) {
        *score *= multiplier;
    }

    if matches!(project_type, ProjectType::Solar | ProjectType::Wind) {
        if let Some(score) = modified.get_mut(SOCIAL) {
            *score *= RENEWABLE_SOCIAL_MULTIPLIER;
        }
    }

    modified
}

/// A percentile of 50 is neutral; above amplifies, below dampens.
fn percentile_multiplier(percentile: f64) -> f64 {
    1.0 + (percentile / 100.0 - 0.5)
}

pub(crate) fn incorporate_location_context(
    scores: &CategoryScores,
    context: &LocationContext,
) -> Result<CategoryScores, ScoringError> {
    let checked = |field: &'static str, value: Option<f64>| match value {
        Some(value) if !value.is_finite() => Err(ScoringError::InvalidContext { field, value }),
        other => Ok(other),
    };
    let demographic_index = checked("demographic_index", context.demographic_index)?;
    let environmental_justice_score = checked(
        "environmental_justice_score",
        context.environmental_justice_score,
    )?;

    let mut contextual = scores.clone();

    if let Some(index) = demographic_index {
        let social = contextual.require(SOCIAL)?;
        contextual.insert(SOCIAL, social * percentile_multiplier(index));
    }

    if let Some(score) = environmental_justice_score {
        let environmental = contextual.require(ENVIRONMENTAL)?;
        contextual.insert(ENVIRONMENTAL, environmental * percentile_multiplier(score));
    }

    Ok(contextual)
}
