use sqlx::PgPool;

use crate::db::models::ModelAnswerRow;

pub(crate) async fn list_model_answers(pool: &PgPool) -> Result<Vec<ModelAnswerRow>, sqlx::Error> {
    sqlx::query_as::<_, ModelAnswerRow>(
        "SELECT question_id, question_model_answer FROM question_bank",
    )
    .fetch_all(pool)
    .await
}
