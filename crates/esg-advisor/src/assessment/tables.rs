use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::domain::ProjectType;

/// Per-project-type weight fractions for one subcategory, with an optional
/// fallback applied to every project type not listed explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubcategoryWeights {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<f64>,
    #[serde(flatten)]
    pub by_project: BTreeMap<ProjectType, f64>,
}

impl SubcategoryWeights {
    pub fn per_project(weights: [(ProjectType, f64); 5]) -> Self {
        Self {
            default: None,
            by_project: weights.into_iter().collect(),
        }
    }

    pub fn uniform(weight: f64) -> Self {
        Self {
            default: Some(weight),
            by_project: BTreeMap::new(),
        }
    }

    /// Explicit weight, then the default, then zero.
    pub fn weight_for(&self, project_type: ProjectType) -> f64 {
        self.by_project
            .get(&project_type)
            .copied()
            .or(self.default)
            .unwrap_or(0.0)
    }
}

/// category -> subcategory -> weights
pub type WeightTable = BTreeMap<String, BTreeMap<String, SubcategoryWeights>>;

/// category -> subcategory -> question ids
pub type QuestionMapping = BTreeMap<String, BTreeMap<String, Vec<u32>>>;

/// A category whose subcategory weights exceed 1.0 for some project type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightSumViolation {
    pub table: &'static str,
    pub category: String,
    pub project_type: ProjectType,
    pub total: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum TablesError {
    #[error("failed to read scoring tables: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scoring tables JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Immutable lookup tables driving both the ESG and impact calculations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringTables {
    pub esg_weights: WeightTable,
    pub impact_weights: WeightTable,
    pub esg_questions: QuestionMapping,
    pub impact_questions: QuestionMapping,
}

impl Default for ScoringTables {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringTables {
    pub fn standard() -> Self {
        Self {
            esg_weights: standard_esg_weights(),
            impact_weights: standard_impact_weights(),
            esg_questions: standard_esg_questions(),
            impact_questions: standard_impact_questions(),
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TablesError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, TablesError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Categories whose subcategory weights sum above 1.0. Not enforced by the engine.
    pub fn weight_sum_violations(&self) -> Vec<WeightSumViolation> {
        let mut violations = Vec::new();
        for (table, weights) in [("esg", &self.esg_weights), ("impact", &self.impact_weights)] {
            for (category, subcategories) in weights {
                for project_type in ProjectType::ALL {
                    let total: f64 = subcategories
                        .values()
                        .map(|weights| weights.weight_for(project_type))
                        .sum();
                    if total > 1.0 + 1e-9 {
                        violations.push(WeightSumViolation {
                            table,
                            category: category.clone(),
                            project_type,
                            total,
                        });
                    }
                }
            }
        }
        violations
    }
}

use ProjectType::{Biomass, Gas, Geothermal, Solar, Wind};

fn per_project(biomass: f64, gas: f64, solar: f64, wind: f64, geothermal: f64) -> SubcategoryWeights {
    SubcategoryWeights::per_project([
        (Biomass, biomass),
        (Gas, gas),
        (Solar, solar),
        (Wind, wind),
        (Geothermal, geothermal),
    ])
}

fn category<T>(entries: Vec<(&str, T)>) -> BTreeMap<String, T> {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

fn standard_esg_weights() -> WeightTable {
    category(vec![
        (
            "environmental",
            category(vec![
                ("ghg_emissions", per_project(0.40, 0.30, 0.50, 0.50, 0.55)),
                ("biodiversity_land_water", per_project(0.30, 0.35, 0.20, 0.15, 0.20)),
                ("circular_economy", SubcategoryWeights::uniform(0.10)),
            ]),
        ),
        (
            "social",
            category(vec![
                ("energy_access", per_project(0.10, 0.15, 0.25, 0.30, 0.20)),
                ("job_creation", per_project(0.15, 0.10, 0.10, 0.10, 0.10)),
                ("equitable_access", per_project(0.05, 0.10, 0.05, 0.10, 0.10)),
            ]),
        ),
        (
            "governance",
            category(vec![
                ("transparency", per_project(0.15, 0.10, 0.10, 0.05, 0.05)),
                ("compliance", per_project(0.10, 0.05, 0.05, 0.05, 0.05)),
                ("stakeholder_engagement", SubcategoryWeights::uniform(0.05)),
            ]),
        ),
    ])
}

fn standard_impact_weights() -> WeightTable {
    category(vec![
        (
            "climate_change_mitigation",
            category(vec![
                ("ghg_reduction", per_project(0.35, 0.20, 0.40, 0.45, 0.50)),
                ("operational_emissions", per_project(0.15, 0.10, 0.20, 0.25, 0.30)),
            ]),
        ),
        (
            "local_environmental",
            category(vec![
                ("biodiversity", per_project(0.25, 0.30, 0.20, 0.15, 0.20)),
                ("pollution_risks", per_project(0.20, 0.20, 0.10, 0.10, 0.10)),
            ]),
        ),
        (
            "community_benefits",
            category(vec![
                ("jobs_economy", per_project(0.20, 0.25, 0.25, 0.30, 0.20)),
                ("energy_access_cost", per_project(0.10, 0.15, 0.15, 0.20, 0.20)),
            ]),
        ),
        (
            "health_safety",
            category(vec![(
                "public_health_risks",
                per_project(0.10, 0.20, 0.10, 0.05, 0.05),
            )]),
        ),
        (
            "innovation",
            category(vec![(
                "technology_scalability",
                SubcategoryWeights::uniform(0.05),
            )]),
        ),
    ])
}

fn standard_esg_questions() -> QuestionMapping {
    category(vec![
        (
            "environmental",
            category(vec![
                ("ghg_emissions", vec![1, 6, 9]),
                ("biodiversity_land_water", vec![7, 22, 23]),
                ("circular_economy", vec![24, 25]),
            ]),
        ),
        (
            "social",
            category(vec![
                ("energy_access", vec![2, 8]),
                ("job_creation", vec![3, 26, 27]),
                ("equitable_access", vec![13, 14]),
            ]),
        ),
        (
            "governance",
            category(vec![
                ("transparency", vec![4, 11]),
                ("compliance", vec![5, 12, 15]),
                ("stakeholder_engagement", vec![28, 29, 30, 31]),
            ]),
        ),
    ])
}

fn standard_impact_questions() -> QuestionMapping {
    category(vec![
        (
            "climate_change_mitigation",
            category(vec![
                ("ghg_reduction", vec![9, 19, 23]),
                ("operational_emissions", vec![1, 6, 24]),
            ]),
        ),
        (
            "local_environmental",
            category(vec![
                ("biodiversity", vec![7, 22]),
                ("pollution_risks", vec![24]),
            ]),
        ),
        (
            "community_benefits",
            category(vec![
                ("jobs_economy", vec![2, 3, 26]),
                ("energy_access_cost", vec![20, 32, 33]),
            ]),
        ),
        (
            "health_safety",
            category(vec![("public_health_risks", vec![10, 25])]),
        ),
        (
            "innovation",
            category(vec![("technology_scalability", vec![21, 28])]),
        ),
    ])
}
