use super::domain::{CategoryScores, ProjectType, SurveyResponse};
use super::tables::{QuestionMapping, WeightTable};

/// Weighted yes-rate per category. Shared by the ESG and impact calculations.
///
/// Subcategories with no matching responses contribute nothing. Missing weights
/// count as zero. The totals are not normalized.
pub(crate) fn score_categories(
    responses: &[SurveyResponse],
    project_type: ProjectType,
    weights: &WeightTable,
    questions: &QuestionMapping,
) -> CategoryScores {
    let mut scores = CategoryScores::new();

    for (category, subcategories) in questions {
        let mut category_score = 0.0;

        for (subcategory, question_ids) in subcategories {
            let Some(subcategory_score) = yes_rate(responses, question_ids) else {
                continue;
            };

            let weight = weights
                .get(category)
                .and_then(|table| table.get(subcategory))
                .map(|entry| entry.weight_for(project_type))
                .unwrap_or(0.0);

            category_score += subcategory_score * weight;
        }

        scores.insert(category.as_str(), category_score);
    }

    scores
}

/// Percentage of "yes" answers among responses to the given questions.
fn yes_rate(responses: &[SurveyResponse], question_ids: &[u32]) -> Option<f64> {
    let (answered, yes) = responses
        .iter()
        .filter(|response| question_ids.contains(&response.question_id))
        .fold((0usize, 0usize), |(answered, yes), response| {
            (answered + 1, yes + usize::from(response.response.is_yes()))
        });

    if answered == 0 {
        None
    } else {
        Some(yes as f64 / answered as f64 * 100.0)
    }
}
