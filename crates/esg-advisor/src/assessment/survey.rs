use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::domain::{SurveyAnswer, SurveyResponse};

#[derive(Debug, thiserror::Error)]
pub enum SurveyImportError {
    #[error("failed to read survey responses: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid survey CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Loads `question_id,response` rows. Blank or unrecognized answers count as "no".
pub struct SurveyCsvImporter;

impl SurveyCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<SurveyResponse>, SurveyImportError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<SurveyResponse>, SurveyImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut responses = Vec::new();
        for record in csv_reader.deserialize::<SurveyRow>() {
            let row = record?;
            responses.push(SurveyResponse::new(
                row.question_id,
                SurveyAnswer::from_raw(row.response.as_deref()),
            ));
        }

        Ok(responses)
    }
}

#[derive(Debug, serde::Deserialize)]
struct SurveyRow {
    question_id: u32,
    #[serde(default)]
    response: Option<String>,
}
