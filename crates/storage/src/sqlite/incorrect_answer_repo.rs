use super::{SqliteRepository, mapping::map_incorrect_row};
use crate::repository::{IncorrectAnswer, IncorrectAnswerLog, StorageError};

#[async_trait::async_trait]
impl IncorrectAnswerLog for SqliteRepository {
    async fn append_incorrect(&self, entry: &IncorrectAnswer) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO incorrect_answers (
                    country, user_answer, correct_answer, logged_at
                )
                VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(&entry.country)
        .bind(&entry.user_answer)
        .bind(&entry.correct_answer)
        .bind(entry.logged_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(res.last_insert_rowid())
    }

    async fn list_incorrect(&self) -> Result<Vec<IncorrectAnswer>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT id, country, user_answer, correct_answer, logged_at
                FROM incorrect_answers
                ORDER BY logged_at DESC, id DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_incorrect_row(&row)?);
        }
        Ok(out)
    }

    async fn clear_incorrect(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM incorrect_answers")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
