use serde_json::Value;
use thiserror::Error;

/// A validated raw submission, identifiers coerced to integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RawAnswer {
    pub(super) exam_id: i32,
    pub(super) question_id: i32,
    pub(super) student_id: i32,
    pub(super) student_answer: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(super) enum RecordError {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("field {field} is not coercible to an integer id: {value}")]
    InvalidId { field: &'static str, value: String },
    #[error("field Student_Answer has an unsupported value")]
    InvalidAnswer,
}

/// The exam form writes identifiers as either JSON numbers or numeric
/// strings. Unknown fields (e.g. the submission timestamp) are ignored.
pub(super) fn parse_raw_answer(record: &Value) -> Result<RawAnswer, RecordError> {
    let fields = record.as_object().ok_or(RecordError::NotAnObject)?;

    let exam_id = coerce_id(fields.get("Exam_ID"), "Exam_ID")?;
    let question_id = coerce_id(fields.get("Question_ID"), "Question_ID")?;
    let student_id = coerce_id(fields.get("Student_ID"), "Student_ID")?;
    let student_answer = coerce_answer(fields.get("Student_Answer"))?;

    Ok(RawAnswer { exam_id, question_id, student_id, student_answer })
}

fn coerce_id(value: Option<&Value>, field: &'static str) -> Result<i32, RecordError> {
    let value = value.ok_or(RecordError::MissingField(field))?;
    match value {
        Value::Number(number) => number
            .as_i64()
            .and_then(|id| i32::try_from(id).ok())
            .ok_or_else(|| RecordError::InvalidId { field, value: number.to_string() }),
        Value::String(raw) => raw
            .trim()
            .parse::<i32>()
            .map_err(|_| RecordError::InvalidId { field, value: raw.clone() }),
        other => Err(RecordError::InvalidId { field, value: other.to_string() }),
    }
}

fn coerce_answer(value: Option<&Value>) -> Result<String, RecordError> {
    match value {
        // Absence marks the record malformed; the "N/A" sentinel does not.
        None | Some(Value::Null) => Err(RecordError::MissingField("Student_Answer")),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(Value::Number(number)) => Ok(number.to_string()),
        Some(_) => Err(RecordError::InvalidAnswer),
    }
}
