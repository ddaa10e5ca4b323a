use quiz_core::model::{AnswerId, AnswerRecord, GameId};
use sqlx::Row;

use super::{SqliteRepository, mapping::map_answer_row, mapping::ser};
use crate::repository::{AnswerLedger, StorageError};

#[async_trait::async_trait]
impl AnswerLedger for SqliteRepository {
    async fn append_answer(&self, record: &AnswerRecord) -> Result<AnswerId, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO all_answers (
                    game_id, country, user_answer, correct_answer,
                    is_correct, question_number, answered_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(record.game_id().map(|id| id.value()))
        .bind(record.country())
        .bind(record.user_answer())
        .bind(record.correct_answer())
        .bind(i64::from(record.is_correct()))
        .bind(i64::from(record.question_number()))
        .bind(record.answered_at())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(AnswerId::new(res.last_insert_rowid()))
    }

    async fn link_unlinked(&self, game_id: GameId) -> Result<u64, StorageError> {
        let res = sqlx::query(
            r"
                UPDATE all_answers
                SET game_id = ?1
                WHERE game_id IS NULL
            ",
        )
        .bind(game_id.value())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.rows_affected())
    }

    async fn answers_for_game(&self, game_id: GameId) -> Result<Vec<AnswerRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, game_id, country, user_answer, correct_answer,
                    is_correct, question_number, answered_at
                FROM all_answers
                WHERE game_id = ?1
                ORDER BY question_number ASC
            ",
        )
        .bind(game_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_answer_row(&row)?);
        }
        Ok(out)
    }

    async fn recent_answers(&self) -> Result<Vec<AnswerRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, game_id, country, user_answer, correct_answer,
                    is_correct, question_number, answered_at
                FROM all_answers
                ORDER BY answered_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_answer_row(&row)?);
        }
        Ok(out)
    }

    async fn unlinked_count(&self) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM all_answers WHERE game_id IS NULL")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let n: i64 = row.try_get("n").map_err(ser)?;
        u64::try_from(n).map_err(|_| StorageError::Serialization(format!("invalid count: {n}")))
    }

    async fn clear_answers(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM all_answers")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
