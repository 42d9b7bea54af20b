use sqlx::PgPool;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GradedAnswer {
    pub(crate) exam_id: i32,
    pub(crate) question_id: i32,
    pub(crate) student_id: i32,
    pub(crate) student_answer: String,
    pub(crate) student_grade: i32,
}

/// Last write wins: overwrites answer and grade for an existing key.
pub(crate) async fn upsert(pool: &PgPool, answer: &GradedAnswer) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO student_exam_answer \
             (exam_id, question_id, student_id, student_answer, student_grade)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (exam_id, question_id, student_id) DO UPDATE
         SET student_answer = EXCLUDED.student_answer,
             student_grade = EXCLUDED.student_grade",
    )
    .bind(answer.exam_id)
    .bind(answer.question_id)
    .bind(answer.student_id)
    .bind(&answer.student_answer)
    .bind(answer.student_grade)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns false when a row for the key already exists and was left intact.
pub(crate) async fn insert_if_absent(
    pool: &PgPool,
    answer: &GradedAnswer,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO student_exam_answer \
             (exam_id, question_id, student_id, student_answer, student_grade)
         VALUES ($1, $2, $3, $4, $5)
         ON CONFLICT (exam_id, question_id, student_id) DO NOTHING",
    )
    .bind(answer.exam_id)
    .bind(answer.question_id)
    .bind(answer.student_id)
    .bind(&answer.student_answer)
    .bind(answer.student_grade)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
