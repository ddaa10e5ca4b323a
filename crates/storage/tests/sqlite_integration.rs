use chrono::Duration;
use quiz_core::model::{AnswerRecord, GameId, GameResult};
use quiz_core::time::fixed_now;
use storage::repository::{
    AnswerLedger, GameResultStore, IncorrectAnswer, IncorrectAnswerLog, StorageError,
};
use storage::sqlite::SqliteRepository;

fn build_answer(number: u32, correct: bool) -> AnswerRecord {
    let user = if correct { "Paris" } else { "Berlin" };
    let answered_at = fixed_now() + Duration::seconds(i64::from(number));
    AnswerRecord::new("France", user, "Paris", number, answered_at).unwrap()
}

#[tokio::test]
async fn answers_persist_unlinked_and_link_in_one_batch() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_link?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    for number in 1..=3 {
        repo.append_answer(&build_answer(number, number % 2 == 1))
            .await
            .unwrap();
    }
    assert_eq!(repo.unlinked_count().await.unwrap(), 3);

    let result = GameResult::from_score(2, 3, fixed_now()).unwrap();
    let game_id = repo.append_result(&result).await.unwrap();

    assert_eq!(repo.link_unlinked(game_id).await.unwrap(), 3);
    assert_eq!(repo.unlinked_count().await.unwrap(), 0);

    // Second run finds nothing left to link.
    assert_eq!(repo.link_unlinked(game_id).await.unwrap(), 0);

    let linked = repo.answers_for_game(game_id).await.unwrap();
    assert_eq!(linked.len(), 3);
    let numbers: Vec<u32> = linked.iter().map(|r| r.question_number()).collect();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert!(linked.iter().all(|r| r.game_id() == Some(game_id)));
}

#[tokio::test]
async fn linking_never_reassigns_across_games() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_reassign?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.append_answer(&build_answer(1, true)).await.unwrap();
    let first_game = repo
        .append_result(&GameResult::from_score(1, 1, fixed_now()).unwrap())
        .await
        .unwrap();
    assert_eq!(repo.link_unlinked(first_game).await.unwrap(), 1);

    repo.append_answer(&build_answer(1, false)).await.unwrap();
    let second_game = repo
        .append_result(&GameResult::from_score(0, 1, fixed_now()).unwrap())
        .await
        .unwrap();
    assert_eq!(repo.link_unlinked(second_game).await.unwrap(), 1);

    assert_eq!(repo.answers_for_game(first_game).await.unwrap().len(), 1);
    assert_eq!(repo.answers_for_game(second_game).await.unwrap().len(), 1);
}

#[tokio::test]
async fn linking_against_missing_game_fails() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_fk?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.append_answer(&build_answer(1, true)).await.unwrap();
    let err = repo.link_unlinked(GameId::new(999)).await.unwrap_err();
    assert!(matches!(err, StorageError::Connection(_)));
    assert_eq!(repo.unlinked_count().await.unwrap(), 1);
}

#[tokio::test]
async fn recent_answers_are_most_recent_first() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_recent?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    for number in 1..=3 {
        repo.append_answer(&build_answer(number, true)).await.unwrap();
    }

    let recent = repo.recent_answers().await.unwrap();
    let numbers: Vec<u32> = recent.iter().map(|r| r.question_number()).collect();
    assert_eq!(numbers, vec![3, 2, 1]);
}

#[tokio::test]
async fn results_list_by_game_date_descending() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_results?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let older = GameResult::from_score(6, 10, fixed_now()).unwrap();
    let newer = GameResult::from_score(8, 10, fixed_now() + Duration::minutes(1)).unwrap();
    repo.append_result(&older).await.unwrap();
    repo.append_result(&newer).await.unwrap();

    let listed = repo.list_results().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].correct_answers(), 8);
    assert_eq!(listed[0].score_percentage(), 80);
    assert_eq!(listed[1].correct_answers(), 6);
    assert!(listed.iter().all(|r| r.id().is_some()));
}

#[tokio::test]
async fn clear_history_empties_all_three_tables() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_clear?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    let wrong = build_answer(1, false);
    repo.append_answer(&wrong).await.unwrap();
    repo.append_incorrect(&IncorrectAnswer::from_answer(&wrong))
        .await
        .unwrap();
    let game_id = repo
        .append_result(&GameResult::from_score(0, 1, fixed_now()).unwrap())
        .await
        .unwrap();
    repo.link_unlinked(game_id).await.unwrap();

    repo.clear_answers().await.unwrap();
    repo.clear_results().await.unwrap();
    repo.clear_incorrect().await.unwrap();

    assert!(repo.recent_answers().await.unwrap().is_empty());
    assert!(repo.list_results().await.unwrap().is_empty());
    assert!(repo.list_incorrect().await.unwrap().is_empty());
}

#[tokio::test]
async fn incorrect_log_lists_most_recent_first() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_incorrect?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    for number in 1..=2 {
        let wrong = build_answer(number, false);
        repo.append_incorrect(&IncorrectAnswer::from_answer(&wrong))
            .await
            .unwrap();
    }

    let listed = repo.list_incorrect().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed[0].logged_at > listed[1].logged_at);
    assert_eq!(listed[0].correct_answer, "Paris");
}
