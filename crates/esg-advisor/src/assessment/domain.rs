use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ScoringError;

/// Generation technology of the assessed project. Selects the weight column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Solar,
    Wind,
    Geothermal,
    Biomass,
    Gas,
}

impl ProjectType {
    pub const ALL: [ProjectType; 5] = [
        ProjectType::Solar,
        ProjectType::Wind,
        ProjectType::Geothermal,
        ProjectType::Biomass,
        ProjectType::Gas,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ProjectType::Solar => "solar",
            ProjectType::Wind => "wind",
            ProjectType::Geothermal => "geothermal",
            ProjectType::Biomass => "biomass",
            ProjectType::Gas => "gas",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        ProjectType::ALL
            .into_iter()
            .find(|project_type| project_type.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown project type '{raw}' (expected solar, wind, geothermal, biomass or gas)")
            })
    }
}

/// Binary survey answer. Anything other than "yes" counts as "no".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyAnswer {
    Yes,
    No,
}

impl SurveyAnswer {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("yes") => SurveyAnswer::Yes,
            _ => SurveyAnswer::No,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SurveyAnswer::Yes => "Yes",
            SurveyAnswer::No => "No",
        }
    }

    pub const fn is_yes(self) -> bool {
        matches!(self, SurveyAnswer::Yes)
    }
}

impl Serialize for SurveyAnswer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for SurveyAnswer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(SurveyAnswer::from_raw(raw.as_deref()))
    }
}

/// A single answered survey question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub question_id: u32,
    #[serde(default = "missing_answer")]
    pub response: SurveyAnswer,
}

fn missing_answer() -> SurveyAnswer {
    SurveyAnswer::No
}

impl SurveyResponse {
    pub fn new(question_id: u32, response: SurveyAnswer) -> Self {
        Self {
            question_id,
            response,
        }
    }
}

/// Named scores keyed by category. Values are not clamped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryScores(BTreeMap<String, f64>);

impl CategoryScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    /// Lookup that treats an absent category as malformed input.
    pub fn require(&self, category: &str) -> Result<f64, ScoringError> {
        self.get(category)
            .ok_or_else(|| ScoringError::MissingCategory(category.to_string()))
    }

    pub fn insert(&mut self, category: impl Into<String>, score: f64) {
        self.0.insert(category.into(), score);
    }

    pub(crate) fn get_mut(&mut self, category: &str) -> Option<&mut f64> {
        self.0.get_mut(category)
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, score)| (name.as_str(), *score))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for CategoryScores {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, score)| (name.into(), score))
                .collect(),
        )
    }
}

/// Percentile context for the project site, each nominally 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographic_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environmental_justice_score: Option<f64>,
}

impl LocationContext {
    pub fn is_empty(&self) -> bool {
        self.demographic_index.is_none() && self.environmental_justice_score.is_none()
    }
}

/// Top-level ESG dimension a recommendation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EsgCategory {
    Environmental,
    Social,
    Governance,
}

impl EsgCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            EsgCategory::Environmental => "environmental",
            EsgCategory::Social => "social",
            EsgCategory::Governance => "governance",
        }
    }
}

impl fmt::Display for EsgCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "short-term")]
    Short,
    #[serde(rename = "medium-term")]
    Medium,
    #[serde(rename = "long-term")]
    Long,
}

impl Timeline {
    pub const fn label(self) -> &'static str {
        match self {
            Timeline::Short => "short-term",
            Timeline::Medium => "medium-term",
            Timeline::Long => "long-term",
        }
    }
}

/// Expected gain from acting on a recommendation, in ESG points and score points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub esg: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl Partner {
    pub fn new(name: &str, kind: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub timeline: Timeline,
    pub category: EsgCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partners: Vec<Partner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

/// Everything the pipeline derived for a single project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EsgAssessment {
    pub project_type: ProjectType,
    pub base_scores: CategoryScores,
    pub adjusted_scores: CategoryScores,
    pub impact_scores: CategoryScores,
    pub location_context: LocationContext,
    pub recommendations: Vec<Recommendation>,
}
