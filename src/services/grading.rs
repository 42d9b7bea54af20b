use std::collections::HashMap;

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::repositories;

/// Canonical answers keyed by question id. Loaded once per worker run and
/// read-only afterwards.
pub(crate) struct ModelAnswerCache {
    answers: HashMap<i32, String>,
}

impl ModelAnswerCache {
    pub(crate) async fn load(pool: &PgPool) -> Result<Self> {
        let rows = repositories::question_bank::list_model_answers(pool)
            .await
            .context("Failed to load model answers from question_bank")?;

        let total = rows.len();
        let answers: HashMap<i32, String> = rows
            .into_iter()
            .filter_map(|row| row.question_model_answer.map(|answer| (row.question_id, answer)))
            .collect();

        if answers.len() < total {
            tracing::debug!(
                without_model_answer = total - answers.len(),
                "Some question_bank rows carry no model answer"
            );
        }

        Ok(Self { answers })
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: impl IntoIterator<Item = (i32, String)>) -> Self {
        Self { answers: pairs.into_iter().collect() }
    }

    pub(crate) fn len(&self) -> usize {
        self.answers.len()
    }

    /// Exact, case-sensitive string comparison. A question without a stored
    /// model answer always grades 0.
    pub(crate) fn grade(&self, question_id: i32, student_answer: &str) -> i32 {
        match self.answers.get(&question_id) {
            Some(model_answer) if student_answer == model_answer => 1,
            Some(_) => 0,
            None => {
                tracing::warn!(question_id, "No model answer found; defaulting to grade 0");
                0
            }
        }
    }
}
