use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{GameId, GameResult, QuizConfig, ReferenceSet};
use quiz_core::time::fixed_now;
use services::game::{GameAdvance, GamePhase};
use services::{GameLoopService, QuizServices};
use storage::repository::{AnswerLedger, GameResultStore, Storage, StorageError};

fn services_over(storage: &Storage) -> QuizServices {
    QuizServices::from_storage(
        storage.clone(),
        Clock::fixed(fixed_now()),
        QuizConfig::default(),
        ReferenceSet::builtin(),
    )
}

/// Pick an option for the current question: the capital when `correct`,
/// otherwise the first distractor.
fn pick_option(session: &services::GameSession, correct: bool) -> String {
    let instance = session.current_question().expect("question should be up");
    let capital = instance.question().capital();
    if correct {
        capital.to_owned()
    } else {
        instance
            .options()
            .iter()
            .find(|o| *o != capital)
            .expect("options always hold three distractors")
            .clone()
    }
}

#[tokio::test]
async fn full_game_finalizes_and_links_every_answer() {
    let storage = Storage::in_memory();
    let services = services_over(&storage);
    let game_loop = services.game_loop();

    let pattern = [
        true, false, true, true, false, true, true, false, true, false,
    ];

    let mut session = game_loop.start_game();
    let mut completed = None;
    for (i, &correct) in pattern.iter().enumerate() {
        let option = pick_option(&session, correct);
        let feedback = game_loop
            .submit_answer(&mut session, &option)
            .await
            .unwrap()
            .expect("first submission is always accepted");
        assert_eq!(feedback.is_correct, correct);
        assert_eq!(feedback.question_number, i as u32 + 1);

        match game_loop.advance(&mut session).await.unwrap() {
            GameAdvance::NextQuestion => assert!(i < 9),
            GameAdvance::Completed { result } => {
                assert_eq!(i, 9);
                completed = Some(result);
            }
        }
    }

    let result = completed.expect("tenth advance completes the game");
    assert_eq!(result.total_questions(), 10);
    assert_eq!(result.correct_answers(), 6);
    assert_eq!(result.wrong_answers(), 4);
    assert_eq!(result.score_percentage(), 60);
    let game_id = result.id().expect("result row should be persisted");

    assert!(session.is_complete());
    assert_eq!(session.game_id(), Some(game_id));

    // Every answer now carries the session id, numbered 1..=10.
    let linked = services.history().answers_for_game(game_id).await.unwrap();
    assert_eq!(linked.len(), 10);
    let numbers: Vec<u32> = linked.iter().map(|r| r.question_number()).collect();
    assert_eq!(numbers, (1..=10).collect::<Vec<u32>>());
    assert!(linked.iter().all(|r| r.game_id() == Some(game_id)));
    assert_eq!(storage.answers.unlinked_count().await.unwrap(), 0);

    // Re-running the link finds nothing left.
    assert_eq!(storage.answers.link_unlinked(game_id).await.unwrap(), 0);

    // Wrong answers were mirrored into the legacy log.
    let incorrect = services.history().incorrect_answers().await.unwrap();
    assert_eq!(incorrect.len(), 4);
}

#[tokio::test]
async fn restart_mid_game_abandons_unlinked_answers() {
    let storage = Storage::in_memory();
    let services = services_over(&storage);
    let game_loop = services.game_loop();

    let mut session = game_loop.start_game();
    for _ in 0..3 {
        let option = pick_option(&session, true);
        game_loop
            .submit_answer(&mut session, &option)
            .await
            .unwrap();
        game_loop.advance(&mut session).await.unwrap();
    }
    assert_eq!(session.question_count(), 3);

    game_loop.restart(&mut session);
    assert_eq!(session.question_count(), 0);
    assert_eq!(session.score(), 0);
    // Only the freshly presented question's country is marked used.
    assert_eq!(session.used_countries().len(), 1);
    assert_eq!(session.phase(), GamePhase::Presenting);

    // The abandoned answers stay unlinked and browsable.
    assert_eq!(storage.answers.unlinked_count().await.unwrap(), 3);
    let recent = services.history().recent_answers().await.unwrap();
    assert_eq!(recent.len(), 3);
    assert!(recent.iter().all(|r| r.game_id().is_none()));

    // They attach to whatever game finalizes next.
    for _ in 0..10 {
        let option = pick_option(&session, true);
        game_loop
            .submit_answer(&mut session, &option)
            .await
            .unwrap();
        game_loop.advance(&mut session).await.unwrap();
    }
    let game_id = session.game_id().expect("second game persisted");
    assert_eq!(storage.answers.unlinked_count().await.unwrap(), 0);
    let linked = services.history().answers_for_game(game_id).await.unwrap();
    assert_eq!(linked.len(), 13);
}

#[tokio::test]
async fn double_submission_and_early_advance_are_rejected() {
    let storage = Storage::in_memory();
    let services = services_over(&storage);
    let game_loop = services.game_loop();

    let mut session = game_loop.start_game();

    // Advancing before an answer is an error, not a skipped question.
    assert!(matches!(
        game_loop.advance(&mut session).await,
        Err(services::GameError::AwaitingAnswer)
    ));

    let option = pick_option(&session, false);
    assert!(
        game_loop
            .submit_answer(&mut session, &option)
            .await
            .unwrap()
            .is_some()
    );
    // Double tap: no-op, nothing extra recorded.
    assert!(
        game_loop
            .submit_answer(&mut session, &option)
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(session.question_count(), 1);
    assert_eq!(storage.answers.recent_answers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn clear_history_empties_every_table() {
    let storage = Storage::in_memory();
    let services = services_over(&storage);
    let game_loop = services.game_loop();

    let mut session = game_loop.start_game();
    for _ in 0..10 {
        let option = pick_option(&session, false);
        game_loop
            .submit_answer(&mut session, &option)
            .await
            .unwrap();
        game_loop.advance(&mut session).await.unwrap();
    }
    assert!(!services.history().list_games().await.unwrap().is_empty());

    services.history().clear_history().await.unwrap();

    assert!(services.history().list_games().await.unwrap().is_empty());
    assert!(services.history().recent_answers().await.unwrap().is_empty());
    assert!(
        services
            .history()
            .incorrect_answers()
            .await
            .unwrap()
            .is_empty()
    );
}

/// Result store that always fails, to exercise best-effort finalization.
struct FailingResultStore;

#[async_trait::async_trait]
impl GameResultStore for FailingResultStore {
    async fn append_result(&self, _result: &GameResult) -> Result<GameId, StorageError> {
        Err(StorageError::Connection("disk full".into()))
    }

    async fn list_results(&self) -> Result<Vec<GameResult>, StorageError> {
        Err(StorageError::Connection("disk full".into()))
    }

    async fn clear_results(&self) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk full".into()))
    }
}

#[tokio::test]
async fn failed_result_write_completes_game_without_linking() {
    let storage = Storage::in_memory();
    let game_loop = GameLoopService::new(
        Clock::fixed(fixed_now()),
        QuizConfig::default(),
        Arc::new(ReferenceSet::builtin()),
        Arc::clone(&storage.answers),
        Arc::new(FailingResultStore),
        Arc::clone(&storage.incorrect),
    );

    let mut session = game_loop.start_game();
    let mut completed = None;
    for _ in 0..10 {
        let option = pick_option(&session, true);
        game_loop
            .submit_answer(&mut session, &option)
            .await
            .unwrap();
        if let GameAdvance::Completed { result } = game_loop.advance(&mut session).await.unwrap() {
            completed = Some(result);
        }
    }

    // The player still sees the final score, from memory.
    let result = completed.expect("game completes despite storage failure");
    assert_eq!(result.correct_answers(), 10);
    assert_eq!(result.score_percentage(), 100);
    assert!(result.id().is_none());
    assert!(session.is_complete());

    // No result row means no linking: answers remain unlinked, not orphaned
    // against a game that does not exist.
    assert_eq!(storage.answers.unlinked_count().await.unwrap(), 10);
}
