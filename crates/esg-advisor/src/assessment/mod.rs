//! Survey-driven ESG scoring, impact scoring, and ranked remediation advice.

pub mod domain;
mod modifiers;
mod recommendations;
mod router;
mod rules;
pub mod survey;
pub mod tables;

#[cfg(test)]
mod tests;

pub use domain::{
    CategoryScores, EsgAssessment, EsgCategory, Impact, LocationContext, Partner, ProjectType,
    Recommendation, SurveyAnswer, SurveyResponse, Timeline,
};
pub use modifiers::{ENVIRONMENTAL, GOVERNANCE, SOCIAL};
pub use recommendations::prioritize_recommendations;
pub use router::{assessment_router, AssessmentRequest, AssessmentResponse, AssessmentState};
pub use survey::{SurveyCsvImporter, SurveyImportError};
pub use tables::{ScoringTables, SubcategoryWeights, TablesError, WeightSumViolation};

use crate::spatial::LocationContextProvider;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("score for category '{0}' is missing")]
    MissingCategory(String),
    #[error("recommendation '{title}' has zero ESG impact; effectiveness is undefined")]
    ZeroEsgImpact { title: String },
    #[error("location context {field} must be a finite percentile, got {value}")]
    InvalidContext { field: &'static str, value: f64 },
}

/// Stateless scorer over a fixed set of weight and question tables.
#[derive(Debug, Clone, Default)]
pub struct EsgRecommendationEngine {
    tables: ScoringTables,
}

impl EsgRecommendationEngine {
    pub fn new(tables: ScoringTables) -> Self {
        for violation in tables.weight_sum_violations() {
            warn!(
                table = violation.table,
                category = %violation.category,
                project_type = %violation.project_type,
                total = violation.total,
                "subcategory weights sum above 1.0"
            );
        }
        Self { tables }
    }

    pub fn tables(&self) -> &ScoringTables {
        &self.tables
    }

    pub fn calculate_base_scores(
        &self,
        responses: &[SurveyResponse],
        project_type: ProjectType,
    ) -> CategoryScores {
        rules::score_categories(
            responses,
            project_type,
            &self.tables.esg_weights,
            &self.tables.esg_questions,
        )
    }

    pub fn calculate_impact_scores(
        &self,
        responses: &[SurveyResponse],
        project_type: ProjectType,
    ) -> CategoryScores {
        rules::score_categories(
            responses,
            project_type,
            &self.tables.impact_weights,
            &self.tables.impact_questions,
        )
    }

    pub fn apply_project_modifiers(
        &self,
        scores: &CategoryScores,
        project_type: ProjectType,
    ) -> CategoryScores {
        modifiers::apply_project_modifiers(scores, project_type)
    }

    pub fn incorporate_location_context(
        &self,
        scores: &CategoryScores,
        context: &LocationContext,
    ) -> Result<CategoryScores, ScoringError> {
        modifiers::incorporate_location_context(scores, context)
    }

    pub fn generate_recommendations(
        &self,
        scores: &CategoryScores,
        impact_scores: &CategoryScores,
    ) -> Result<Vec<Recommendation>, ScoringError> {
        recommendations::generate_recommendations(scores, impact_scores)
    }

    /// Runs the full pipeline: base scores, project modifiers, location
    /// context, impact scores, then recommendations from the adjusted scores.
    pub fn assess(
        &self,
        responses: &[SurveyResponse],
        project_type: ProjectType,
        context: Option<LocationContext>,
    ) -> Result<EsgAssessment, ScoringError> {
        let base_scores = self.calculate_base_scores(responses, project_type);
        debug!(%project_type, responses = responses.len(), ?base_scores, "base scores computed");

        let mut adjusted_scores = self.apply_project_modifiers(&base_scores, project_type);
        let location_context = context.unwrap_or_default();
        if !location_context.is_empty() {
            adjusted_scores = self.incorporate_location_context(&adjusted_scores, &location_context)?;
        }
        debug!(?adjusted_scores, ?location_context, "scores adjusted");

        let impact_scores = self.calculate_impact_scores(responses, project_type);
        debug!(?impact_scores, "impact scores computed");

        let recommendations = self.generate_recommendations(&adjusted_scores, &impact_scores)?;
        debug!(count = recommendations.len(), "recommendations ranked");

        Ok(EsgAssessment {
            project_type,
            base_scores,
            adjusted_scores,
            impact_scores,
            location_context,
            recommendations,
        })
    }

    /// Like [`assess`](Self::assess), resolving the context from a provider.
    /// A provider failure means no context, not a failed assessment.
    pub fn assess_at_location(
        &self,
        responses: &[SurveyResponse],
        project_type: ProjectType,
        provider: &dyn LocationContextProvider,
        location: &str,
    ) -> Result<EsgAssessment, ScoringError> {
        let context = match provider.location_context(location) {
            Ok(context) => Some(context),
            Err(err) => {
                warn!(%location, error = %err, "location context unavailable; scoring without it");
                None
            }
        };
        self.assess(responses, project_type, context)
    }
}
