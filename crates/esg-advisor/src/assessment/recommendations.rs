use super::domain::{CategoryScores, EsgCategory, Impact, Partner, Recommendation, Timeline};
use super::modifiers::{ENVIRONMENTAL, GOVERNANCE, SOCIAL};
use super::ScoringError;

const ENVIRONMENTAL_THRESHOLD: f64 = 60.0;
const SOCIAL_THRESHOLD: f64 = 50.0;
const GOVERNANCE_THRESHOLD: f64 = 50.0;
const IMPACT_THRESHOLD: f64 = 50.0;

const URGENCY_WEIGHT: f64 = 0.7;
const EFFECTIVENESS_WEIGHT: f64 = 0.3;

/// Builds the remediation list from adjusted ESG scores and impact scores.
///
/// The social check only runs once the environmental check has fired, and the
/// governance check only once the social one has. Missing impact scores count
/// as zero; missing ESG categories are an error.
pub(crate) fn generate_recommendations(
    scores: &CategoryScores,
    impact_scores: &CategoryScores,
) -> Result<Vec<Recommendation>, ScoringError> {
    let impact = |name: &str| impact_scores.get(name).unwrap_or(0.0);
    let mut recommendations = Vec::new();

    if scores.require(ENVIRONMENTAL)? < ENVIRONMENTAL_THRESHOLD
        || impact("climate_change_mitigation") < IMPACT_THRESHOLD
    {
        recommendations.push(environmental_monitoring());

        if scores.require(SOCIAL)? < SOCIAL_THRESHOLD
            || impact("community_benefits") < IMPACT_THRESHOLD
        {
            recommendations.push(community_engagement());

            if scores.require(GOVERNANCE)? < GOVERNANCE_THRESHOLD
                || impact("health_safety") < IMPACT_THRESHOLD
            {
                recommendations.push(governance_and_safety());
            }
        }
    }

    prioritize_recommendations(recommendations, scores, impact_scores)
}

/// Assigns a priority to every recommendation and orders them highest first.
/// Ties keep their incoming order.
pub fn prioritize_recommendations(
    mut recommendations: Vec<Recommendation>,
    scores: &CategoryScores,
    impact_scores: &CategoryScores,
) -> Result<Vec<Recommendation>, ScoringError> {
    for recommendation in &mut recommendations {
        let category_score = scores.require(recommendation.category.as_str())?;
        // Impact categories are keyed differently from ESG categories, so this
        // lookup falls back to zero for the built-in tables.
        let impact_score = impact_scores
            .get(&recommendation.category.as_str().to_lowercase())
            .unwrap_or(0.0);
        recommendation.priority = Some(calculate_priority(
            &recommendation.title,
            category_score,
            impact_score,
            recommendation.impact,
        )?);
    }

    recommendations.sort_by(|left, right| {
        let left = left.priority.unwrap_or(0.0);
        let right = right.priority.unwrap_or(0.0);
        right.total_cmp(&left)
    });

    Ok(recommendations)
}

fn calculate_priority(
    title: &str,
    category_score: f64,
    impact_score: f64,
    impact: Impact,
) -> Result<f64, ScoringError> {
    if impact.esg == 0.0 {
        return Err(ScoringError::ZeroEsgImpact {
            title: title.to_string(),
        });
    }

    let urgency = 100.0 - (category_score + impact_score) / 2.0;
    let effectiveness_ratio = impact.score / impact.esg;
    Ok(urgency * URGENCY_WEIGHT + effectiveness_ratio * EFFECTIVENESS_WEIGHT)
}

fn environmental_monitoring() -> Recommendation {
    Recommendation {
        title: "Implement Advanced Environmental Monitoring".to_string(),
        description: "Deploy comprehensive environmental monitoring systems with focus on GHG emissions and resource usage optimization.".to_string(),
        impact: Impact { esg: 15.0, score: 20.0 },
        timeline: Timeline::Medium,
        category: EsgCategory::Environmental,
        partners: vec![
            Partner::new(
                "GreenTech Certifications",
                "certifier",
                "Leading certification body specializing in environmental compliance",
            ),
            Partner::new(
                "EcoInnovate Solutions",
                "technology",
                "Cutting-edge environmental monitoring provider",
            ),
        ],
        priority: None,
    }
}

fn community_engagement() -> Recommendation {
    Recommendation {
        title: "Enhance Community Engagement Initiatives".to_string(),
        description: "Develop programs to improve community engagement, focusing on inclusivity, diversity, and equitable access to resources.".to_string(),
        impact: Impact { esg: 20.0, score: 25.0 },
        timeline: Timeline::Long,
        category: EsgCategory::Social,
        partners: vec![
            Partner::new(
                "Community Builders Network",
                "nonprofit",
                "Organization dedicated to fostering community development and engagement.",
            ),
            Partner::new(
                "Social Equity Innovations",
                "consulting",
                "Experts in designing and implementing equitable social programs.",
            ),
        ],
        priority: None,
    }
}

fn governance_and_safety() -> Recommendation {
    Recommendation {
        title: "Strengthen Governance and Safety Frameworks".to_string(),
        description: "Implement robust governance practices and enhance health and safety standards to ensure organizational resilience and compliance.".to_string(),
        impact: Impact { esg: 18.0, score: 22.0 },
        timeline: Timeline::Medium,
        category: EsgCategory::Governance,
        partners: vec![
            Partner::new(
                "SafetyFirst Compliance",
                "certifier",
                "Specialists in health and safety certifications and risk management.",
            ),
            Partner::new(
                "GovernWell Consulting",
                "consulting",
                "Advisors in corporate governance and ethical practices.",
            ),
        ],
        priority: None,
    }
}
