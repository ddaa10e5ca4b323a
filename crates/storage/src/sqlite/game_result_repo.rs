use quiz_core::model::{GameId, GameResult};

use super::{SqliteRepository, mapping::map_result_row};
use crate::repository::{GameResultStore, StorageError};

#[async_trait::async_trait]
impl GameResultStore for SqliteRepository {
    async fn append_result(&self, result: &GameResult) -> Result<GameId, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO game_results (
                    total_questions, correct_answers, wrong_answers,
                    score_percentage, game_date
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
            ",
        )
        .bind(i64::from(result.total_questions()))
        .bind(i64::from(result.correct_answers()))
        .bind(i64::from(result.wrong_answers()))
        .bind(i64::from(result.score_percentage()))
        .bind(result.game_date())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(GameId::new(res.last_insert_rowid()))
    }

    async fn list_results(&self) -> Result<Vec<GameResult>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, total_questions, correct_answers, wrong_answers,
                    score_percentage, game_date
                FROM game_results
                ORDER BY game_date DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_result_row(&row)?);
        }
        Ok(out)
    }

    async fn clear_results(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM game_results")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
