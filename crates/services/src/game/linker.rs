use tracing::warn;

use quiz_core::model::GameId;
use storage::repository::{AnswerLedger, StorageError};

/// Binds in-flight ledger entries to a freshly finalized game.
///
/// Not stateful; it exists to pin down the ordering requirement: call it only
/// after `GameResultStore::append_result` has succeeded, and only with the id
/// that call returned. Answers left unlinked by a failed call remain visible
/// through `recent_answers` and attach to whatever game finalizes next.
pub struct GameLinker;

impl GameLinker {
    /// Link every unlinked answer record to `game_id`.
    ///
    /// Finding nothing to link is an inconsistency (the game just produced
    /// answers), logged but deliberately not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the batch update fails.
    pub async fn link(ledger: &dyn AnswerLedger, game_id: GameId) -> Result<u64, StorageError> {
        let linked = ledger.link_unlinked(game_id).await?;
        if linked == 0 {
            warn!(game = %game_id, "no unlinked answers found while finalizing game");
        }
        Ok(linked)
    }
}
