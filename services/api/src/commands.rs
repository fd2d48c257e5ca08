use crate::infra::{load_engine, load_provider};
use chrono::Utc;
use clap::Args;
use esg_advisor::assessment::{
    AssessmentResponse, CategoryScores, EsgAssessment, LocationContext, ProjectType,
    SurveyCsvImporter,
};
use esg_advisor::config::{AppConfig, SpatialConfig};
use esg_advisor::error::AppError;
use esg_advisor::spatial::{EjAssessment, IndicatorAverage};
use esg_advisor::telemetry;
use std::path::PathBuf;

/// Spatial dataset overrides; unset values fall back to the environment config.
#[derive(Args, Debug, Default)]
pub(crate) struct SpatialArgs {
    /// Gazetteer CSV with name, latitude and longitude columns
    #[arg(long)]
    pub(crate) gazetteer: Option<PathBuf>,
    /// EJScreen block group CSV with latitude, longitude and percentile columns
    #[arg(long)]
    pub(crate) block_groups: Option<PathBuf>,
    /// CEJST disadvantaged areas CSV with latitude, longitude and radius_m columns
    #[arg(long)]
    pub(crate) cejst: Option<PathBuf>,
    /// Buffer radius around the location in meters (defaults to five miles)
    #[arg(long, value_parser = parse_radius)]
    pub(crate) radius_m: Option<f64>,
}

impl SpatialArgs {
    fn merge_into(self, mut config: SpatialConfig) -> SpatialConfig {
        if let Some(path) = self.gazetteer {
            config.gazetteer_csv = Some(path);
        }
        if let Some(path) = self.block_groups {
            config.block_groups_csv = Some(path);
        }
        if let Some(path) = self.cejst {
            config.cejst_csv = Some(path);
        }
        if let Some(radius) = self.radius_m {
            config.buffer_radius_m = radius;
        }
        config
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct LocationArgs {
    /// Place name to derive environmental-justice context from
    #[arg(long, conflicts_with_all = ["demographic_index", "ej_score"])]
    pub(crate) location: Option<String>,
    #[command(flatten)]
    pub(crate) spatial: SpatialArgs,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Project technology: solar, wind, geothermal, biomass or gas
    #[arg(long)]
    pub(crate) project_type: ProjectType,
    /// Survey CSV with question_id and response columns
    #[arg(long)]
    pub(crate) responses: PathBuf,
    /// Demographic index percentile (0-100) for the project site
    #[arg(long, value_parser = parse_percentile)]
    pub(crate) demographic_index: Option<f64>,
    /// Environmental justice percentile (0-100) for the project site
    #[arg(long, value_parser = parse_percentile)]
    pub(crate) ej_score: Option<f64>,
    #[command(flatten)]
    pub(crate) location: LocationArgs,
    /// Print the assessment as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct EjArgs {
    /// Place name to screen
    #[arg(long)]
    pub(crate) location: String,
    #[command(flatten)]
    pub(crate) spatial: SpatialArgs,
    /// Print the summary as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

fn parse_percentile(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{raw}' is not a finite percentile"))
    }
}

fn parse_radius(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("'{raw}' must be a positive number of meters"))
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        project_type,
        responses,
        demographic_index,
        ej_score,
        location,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let engine = load_engine(&config.scoring)?;
    let responses = SurveyCsvImporter::from_path(responses)?;

    let explicit = LocationContext {
        demographic_index,
        environmental_justice_score: ej_score,
    };

    let assessment = match location.location {
        Some(name) if explicit.is_empty() => {
            let provider = load_provider(&location.spatial.merge_into(config.spatial))?;
            engine.assess_at_location(&responses, project_type, &provider, &name)?
        }
        _ if !explicit.is_empty() => engine.assess(&responses, project_type, Some(explicit))?,
        _ => engine.assess(&responses, project_type, None)?,
    };

    if json {
        let report = AssessmentResponse {
            assessed_at: Utc::now(),
            assessment,
        };
        println!("{}", to_pretty_json(&report)?);
    } else {
        render_assessment(&assessment, responses.len());
    }

    Ok(())
}

pub(crate) fn run_ej_report(args: EjArgs) -> Result<(), AppError> {
    let EjArgs {
        location,
        spatial,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let provider = load_provider(&spatial.merge_into(config.spatial))?;
    let summary = provider.assess(&location)?;

    if json {
        println!("{}", to_pretty_json(&summary)?);
    } else {
        render_ej_summary(&summary);
    }

    Ok(())
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(AppError::from)
}

fn render_scores(heading: &str, scores: &CategoryScores) {
    println!("\n{heading}");
    for (category, score) in scores.iter() {
        println!("- {}: {:.1}", category, score);
    }
}

fn render_assessment(assessment: &EsgAssessment, response_count: usize) {
    println!("ESG assessment");
    println!(
        "Project type: {} ({} survey responses)",
        assessment.project_type, response_count
    );

    let context = &assessment.location_context;
    if context.is_empty() {
        println!("Location context: none");
    } else {
        let describe = |value: Option<f64>| match value {
            Some(value) => format!("{value:.1}"),
            None => "n/a".to_string(),
        };
        println!(
            "Location context: demographic index {}, EJ score {}",
            describe(context.demographic_index),
            describe(context.environmental_justice_score)
        );
    }

    render_scores("Base ESG scores", &assessment.base_scores);
    render_scores("Adjusted ESG scores", &assessment.adjusted_scores);
    render_scores("Impact scores", &assessment.impact_scores);

    if assessment.recommendations.is_empty() {
        println!("\nRecommendations: none");
        return;
    }

    println!("\nRecommendations (highest priority first)");
    for recommendation in &assessment.recommendations {
        println!(
            "- [{:.2}] {} ({}, {})",
            recommendation.priority.unwrap_or_default(),
            recommendation.title,
            recommendation.category,
            recommendation.timeline.label()
        );
        println!("  {}", recommendation.description);
        println!(
            "  impact: +{} ESG / +{} score",
            recommendation.impact.esg, recommendation.impact.score
        );
        for partner in &recommendation.partners {
            println!(
                "  partner: {} ({}) - {}",
                partner.name, partner.kind, partner.description
            );
        }
    }
}

fn render_indicators(heading: &str, indicators: &[IndicatorAverage]) {
    if indicators.is_empty() {
        println!("\n{heading}: no data");
        return;
    }
    println!("\n{heading}");
    for indicator in indicators {
        println!(
            "- {} ({}): {:.1}",
            indicator.label, indicator.code, indicator.average
        );
    }
}

fn render_ej_summary(summary: &EjAssessment) {
    println!("Environmental justice screening");
    println!(
        "Location: {} ({:.4}, {:.4}), radius {:.0} m",
        summary.location, summary.center.latitude, summary.center.longitude, summary.radius_m
    );
    println!("Block groups within buffer: {}", summary.block_groups_within);

    render_indicators("Top social indicators", &summary.top_social);
    render_indicators("Top environmental indicators", &summary.top_environmental);

    let describe = |value: Option<f64>| match value {
        Some(value) => format!("{value:.1}"),
        None => "n/a".to_string(),
    };
    println!("\nDerived indexes");
    println!(
        "- demographic index: {}",
        describe(summary.context.demographic_index)
    );
    println!(
        "- environmental justice score: {}",
        describe(summary.context.environmental_justice_score)
    );

    if summary.cejst_disadvantaged {
        println!("\nCEJST: buffer intersects a disadvantaged community");
    } else {
        println!("\nCEJST: no disadvantaged community within the buffer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esg_advisor::spatial::DEFAULT_BUFFER_RADIUS_M;

    #[test]
    fn percentile_flags_must_be_finite() {
        assert_eq!(parse_percentile(" 62.5 "), Ok(62.5));
        assert!(parse_percentile("NaN").is_err());
        assert!(parse_percentile("inf").is_err());
        assert!(parse_percentile("high").is_err());
    }

    #[test]
    fn radius_flag_must_be_positive() {
        assert_eq!(parse_radius("1609.34"), Ok(1609.34));
        for raw in ["-5", "0", "NaN", "inf"] {
            assert!(parse_radius(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn radius_override_replaces_configured_value() {
        let config = SpatialConfig {
            gazetteer_csv: None,
            block_groups_csv: None,
            cejst_csv: None,
            buffer_radius_m: DEFAULT_BUFFER_RADIUS_M,
        };
        let args = SpatialArgs {
            radius_m: Some(1_000.0),
            ..SpatialArgs::default()
        };
        assert_eq!(args.merge_into(config).buffer_radius_m, 1_000.0);
    }
}
