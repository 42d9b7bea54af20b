use sqlx::postgres::PgPoolOptions;
use sqlx::Row;

// Exercises the schema and the conflict-handling statements against a real
// Postgres instance. Skips when neither DATABASE_URL nor POSTGRES_SERVER is
// configured so the suite stays runnable without infrastructure.
fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();

    if let Ok(url) = std::env::var("DATABASE_URL") {
        if !url.trim().is_empty() {
            return Some(url);
        }
    }

    let server = std::env::var("POSTGRES_SERVER").ok().filter(|value| !value.trim().is_empty())?;
    let port = std::env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".into());
    let user = std::env::var("POSTGRES_USER").unwrap_or_else(|_| "examsync".into());
    let password = std::env::var("POSTGRES_PASSWORD").unwrap_or_default();
    let db = std::env::var("POSTGRES_DB").unwrap_or_else(|_| "examination_system".into());

    Some(format!("postgresql://{user}:{password}@{server}:{port}/{db}"))
}

const UPSERT: &str = "INSERT INTO student_exam_answer \
         (exam_id, question_id, student_id, student_answer, student_grade)
     VALUES ($1, $2, $3, $4, $5)
     ON CONFLICT (exam_id, question_id, student_id) DO UPDATE
     SET student_answer = EXCLUDED.student_answer,
         student_grade = EXCLUDED.student_grade";

const INSERT_IF_ABSENT: &str = "INSERT INTO student_exam_answer \
         (exam_id, question_id, student_id, student_answer, student_grade)
     VALUES ($1, $2, $3, $4, $5)
     ON CONFLICT (exam_id, question_id, student_id) DO NOTHING";

#[tokio::test]
async fn migrations_apply_and_conflict_handling_works() -> anyhow::Result<()> {
    let Some(database_url) = database_url() else {
        eprintln!("skipping: DATABASE_URL / POSTGRES_SERVER not configured");
        return Ok(());
    };

    let pool = PgPoolOptions::new().max_connections(1).connect(&database_url).await?;

    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new("migrations")).await?;
    migrator.run(&pool).await?;

    for table in ["question_bank", "student_exam_answer"] {
        let row = sqlx::query("SELECT to_regclass($1)::text").bind(table).fetch_one(&pool).await?;
        let regclass: Option<String> = row.try_get(0)?;
        assert!(regclass.is_some(), "expected table {table} to exist after migrations");
    }

    // Key space far outside anything a real deployment would use.
    let (exam_id, question_id, student_id) = (990_010, 990_005, 990_200);

    sqlx::query(
        "DELETE FROM student_exam_answer \
         WHERE exam_id = $1 AND question_id = $2 AND student_id = $3",
    )
    .bind(exam_id)
    .bind(question_id)
    .bind(student_id)
    .execute(&pool)
    .await?;

    // Two writes for the same key must collapse into one row holding the
    // later answer.
    for (answer, grade) in [("42", 1), ("41", 0)] {
        sqlx::query(UPSERT)
            .bind(exam_id)
            .bind(question_id)
            .bind(student_id)
            .bind(answer)
            .bind(grade)
            .execute(&pool)
            .await?;
    }

    let row = sqlx::query(
        "SELECT student_answer, student_grade, COUNT(*) OVER () AS total \
         FROM student_exam_answer \
         WHERE exam_id = $1 AND question_id = $2 AND student_id = $3",
    )
    .bind(exam_id)
    .bind(question_id)
    .bind(student_id)
    .fetch_one(&pool)
    .await?;

    let answer: String = row.try_get("student_answer")?;
    let grade: i32 = row.try_get("student_grade")?;
    let total: i64 = row.try_get("total")?;
    assert_eq!(answer, "41");
    assert_eq!(grade, 0);
    assert_eq!(total, 1);

    // Insert-if-absent leaves the existing row untouched and reports the
    // conflict.
    let result = sqlx::query(INSERT_IF_ABSENT)
        .bind(exam_id)
        .bind(question_id)
        .bind(student_id)
        .bind("99")
        .bind(1)
        .execute(&pool)
        .await?;
    assert_eq!(result.rows_affected(), 0);

    let kept: String = sqlx::query(
        "SELECT student_answer FROM student_exam_answer \
         WHERE exam_id = $1 AND question_id = $2 AND student_id = $3",
    )
    .bind(exam_id)
    .bind(question_id)
    .bind(student_id)
    .fetch_one(&pool)
    .await?
    .try_get("student_answer")?;
    assert_eq!(kept, "41");

    sqlx::query(
        "DELETE FROM student_exam_answer \
         WHERE exam_id = $1 AND question_id = $2 AND student_id = $3",
    )
    .bind(exam_id)
    .bind(question_id)
    .bind(student_id)
    .execute(&pool)
    .await?;

    Ok(())
}
