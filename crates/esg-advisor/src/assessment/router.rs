use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::domain::{EsgAssessment, LocationContext, ProjectType, SurveyResponse};
use super::survey::SurveyCsvImporter;
use super::EsgRecommendationEngine;
use crate::spatial::LocationContextProvider;

/// Shared handles for the assessment endpoints.
#[derive(Clone)]
pub struct AssessmentState {
    pub engine: Arc<EsgRecommendationEngine>,
    pub locations: Option<Arc<dyn LocationContextProvider + Send + Sync>>,
}

#[derive(Debug, Deserialize)]
pub struct AssessmentRequest {
    pub project_type: ProjectType,
    #[serde(default)]
    pub responses: Vec<SurveyResponse>,
    #[serde(default)]
    pub responses_csv: Option<String>,
    #[serde(default)]
    pub location_context: Option<LocationContext>,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub assessed_at: DateTime<Utc>,
    #[serde(flatten)]
    pub assessment: EsgAssessment,
}

/// Router builder exposing the ESG assessment endpoint.
pub fn assessment_router(state: AssessmentState) -> Router {
    Router::new()
        .route("/api/v1/esg/assessment", post(assessment_handler))
        .with_state(state)
}

pub(crate) async fn assessment_handler(
    State(state): State<AssessmentState>,
    axum::Json(request): axum::Json<AssessmentRequest>,
) -> Response {
    let AssessmentRequest {
        project_type,
        mut responses,
        responses_csv,
        location_context,
        location,
    } = request;

    if let Some(csv) = responses_csv {
        match SurveyCsvImporter::from_reader(Cursor::new(csv.into_bytes())) {
            Ok(parsed) => responses.extend(parsed),
            Err(error) => return error_response(StatusCode::BAD_REQUEST, error.to_string()),
        }
    }

    let outcome = match (location_context, location, &state.locations) {
        (Some(context), _, _) => state.engine.assess(&responses, project_type, Some(context)),
        (None, Some(name), Some(provider)) => {
            state
                .engine
                .assess_at_location(&responses, project_type, provider.as_ref(), &name)
        }
        (None, Some(_), None) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "location lookups are not configured on this server".to_string(),
            )
        }
        (None, None, _) => state.engine.assess(&responses, project_type, None),
    };

    match outcome {
        Ok(assessment) => {
            info!(
                %project_type,
                responses = responses.len(),
                recommendations = assessment.recommendations.len(),
                "assessment served"
            );
            let body = AssessmentResponse {
                assessed_at: Utc::now(),
                assessment,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(StatusCode::UNPROCESSABLE_ENTITY, error.to_string()),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
