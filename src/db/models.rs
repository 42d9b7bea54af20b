use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ModelAnswerRow {
    pub(crate) question_id: i32,
    pub(crate) question_model_answer: Option<String>,
}
