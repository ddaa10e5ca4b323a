use quiz_core::model::{AnswerId, AnswerRecord, GameId, GameResult};
use sqlx::Row;

use crate::repository::{IncorrectAnswer, StorageError};

pub(super) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(super) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(super) fn map_answer_row(row: &sqlx::sqlite::SqliteRow) -> Result<AnswerRecord, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let game_id: Option<i64> = row.try_get("game_id").map_err(ser)?;
    let country: String = row.try_get("country").map_err(ser)?;
    let user_answer: String = row.try_get("user_answer").map_err(ser)?;
    let correct_answer: String = row.try_get("correct_answer").map_err(ser)?;
    let is_correct: i64 = row.try_get("is_correct").map_err(ser)?;
    let question_number = u32_from_i64(
        "question_number",
        row.try_get::<i64, _>("question_number").map_err(ser)?,
    )?;
    let answered_at = row.try_get("answered_at").map_err(ser)?;

    AnswerRecord::from_persisted(
        AnswerId::new(id),
        game_id.map(GameId::new),
        country,
        user_answer,
        correct_answer,
        is_correct != 0,
        question_number,
        answered_at,
    )
    .map_err(ser)
}

pub(super) fn map_result_row(row: &sqlx::sqlite::SqliteRow) -> Result<GameResult, StorageError> {
    let id: i64 = row.try_get("id").map_err(ser)?;
    let total_questions = u32_from_i64(
        "total_questions",
        row.try_get::<i64, _>("total_questions").map_err(ser)?,
    )?;
    let correct_answers = u32_from_i64(
        "correct_answers",
        row.try_get::<i64, _>("correct_answers").map_err(ser)?,
    )?;
    let wrong_answers = u32_from_i64(
        "wrong_answers",
        row.try_get::<i64, _>("wrong_answers").map_err(ser)?,
    )?;
    let score_percentage = u32_from_i64(
        "score_percentage",
        row.try_get::<i64, _>("score_percentage").map_err(ser)?,
    )?;
    let game_date = row.try_get("game_date").map_err(ser)?;

    GameResult::from_persisted(
        GameId::new(id),
        total_questions,
        correct_answers,
        wrong_answers,
        score_percentage,
        game_date,
    )
    .map_err(ser)
}

pub(super) fn map_incorrect_row(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<IncorrectAnswer, StorageError> {
    Ok(IncorrectAnswer {
        id: Some(row.try_get("id").map_err(ser)?),
        country: row.try_get("country").map_err(ser)?,
        user_answer: row.try_get("user_answer").map_err(ser)?,
        correct_answer: row.try_get("correct_answer").map_err(ser)?,
        logged_at: row.try_get("logged_at").map_err(ser)?,
    })
}
