use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

/// Runs a single, consolidated migration for the current schema.
///
/// Creates the full schema: game results, the comprehensive answer ledger
/// with its nullable game reference, the legacy incorrect-answer log, and
/// indexes.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    // Version 1: full schema.
    if !is_applied(pool, 1).await? {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS game_results (
                    id INTEGER PRIMARY KEY,
                    total_questions INTEGER NOT NULL CHECK (total_questions >= 1),
                    correct_answers INTEGER NOT NULL CHECK (correct_answers >= 0),
                    wrong_answers INTEGER NOT NULL CHECK (wrong_answers >= 0),
                    score_percentage INTEGER NOT NULL CHECK (score_percentage BETWEEN 0 AND 100),
                    game_date TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        // game_id is NULL while the answer's session is still in flight.
        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS all_answers (
                    id INTEGER PRIMARY KEY,
                    game_id INTEGER,
                    country TEXT NOT NULL,
                    user_answer TEXT NOT NULL,
                    correct_answer TEXT NOT NULL,
                    is_correct INTEGER NOT NULL CHECK (is_correct IN (0, 1)),
                    question_number INTEGER NOT NULL CHECK (question_number >= 1),
                    answered_at TEXT NOT NULL,
                    FOREIGN KEY (game_id) REFERENCES game_results(id) ON DELETE SET NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE TABLE IF NOT EXISTS incorrect_answers (
                    id INTEGER PRIMARY KEY,
                    country TEXT NOT NULL,
                    user_answer TEXT NOT NULL,
                    correct_answer TEXT NOT NULL,
                    logged_at TEXT NOT NULL
                );
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_all_answers_game_question
                    ON all_answers (game_id, question_number);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_all_answers_answered_at
                    ON all_answers (answered_at);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                CREATE INDEX IF NOT EXISTS idx_game_results_game_date
                    ON game_results (game_date);
            ",
        )
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r"
                INSERT INTO schema_migrations (version, applied_at)
                VALUES (?1, ?2)
                ON CONFLICT(version) DO NOTHING
            ",
        )
        .bind(1_i64)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
    }

    Ok(())
}
