use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{GameId, QuizConfig};
use services::game::GameAdvance;
use services::{GameLoopService, HistoryService, QuizServices};
use tracing_subscriber::EnvFilter;

const DEFAULT_DB_URL: &str = "sqlite:capital_quiz.db?mode=rwc";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidQuestions { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidQuestions { raw } => write!(f, "invalid --questions value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

struct Args {
    db_url: String,
    config: QuizConfig,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, ArgsError> {
    let mut db_url = DEFAULT_DB_URL.to_owned();
    let mut config = QuizConfig::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" => db_url = require_value(&mut args, "--db")?,
            "--questions" => {
                let raw = require_value(&mut args, "--questions")?;
                let questions: u32 = raw
                    .parse()
                    .map_err(|_| ArgsError::InvalidQuestions { raw: raw.clone() })?;
                config = config.with_questions_per_game(questions);
            }
            other => return Err(ArgsError::UnknownArg(other.to_owned())),
        }
    }

    Ok(Args { db_url, config })
}

fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

async fn play(game_loop: &GameLoopService) -> io::Result<()> {
    let mut session = game_loop.start_game();

    loop {
        let Some(instance) = session.current_question() else {
            break;
        };
        println!(
            "\nQuestion {}/{}: What is the capital of {}?",
            instance.number(),
            session.questions_per_game(),
            instance.question().country()
        );
        for (i, option) in instance.options().iter().enumerate() {
            println!("  {}. {option}", i + 1);
        }

        let Some(input) = read_line("> ")? else {
            return Ok(());
        };
        if input.eq_ignore_ascii_case("q") {
            println!("Game abandoned.");
            return Ok(());
        }
        let choice = match input.parse::<usize>() {
            Ok(n) if (1..=instance.options().len()).contains(&n) => {
                instance.options()[n - 1].clone()
            }
            _ => {
                println!("Pick 1-{} or q to quit.", instance.options().len());
                continue;
            }
        };

        match game_loop.submit_answer(&mut session, &choice).await {
            Ok(Some(feedback)) => {
                if feedback.is_correct {
                    println!("Correct!");
                } else {
                    println!("Wrong - the capital is {}.", feedback.correct_answer);
                }
            }
            Ok(None) => continue,
            Err(error) => {
                println!("{error}");
                return Ok(());
            }
        }

        tokio::time::sleep(session.feedback_delay()).await;

        match game_loop.advance(&mut session).await {
            Ok(GameAdvance::NextQuestion) => {}
            Ok(GameAdvance::Completed { result }) => {
                println!(
                    "\nGame over: {}/{} correct ({}%).",
                    result.correct_answers(),
                    result.total_questions(),
                    result.score_percentage()
                );
                break;
            }
            Err(error) => {
                println!("{error}");
                break;
            }
        }
    }

    Ok(())
}

async fn show_games(history: &HistoryService) {
    match history.list_games().await {
        Ok(games) if games.is_empty() => println!("No games played yet."),
        Ok(games) => {
            for game in games {
                let id = game
                    .id()
                    .map_or_else(|| "-".to_owned(), |id| id.to_string());
                println!(
                    "game {id}: {}/{} correct ({}%) on {}",
                    game.correct_answers(),
                    game.total_questions(),
                    game.score_percentage(),
                    game.game_date().format("%Y-%m-%d %H:%M")
                );
            }
        }
        Err(error) => println!("failed to load history: {error}"),
    }
}

async fn show_answers(history: &HistoryService, game_id: GameId) {
    match history.answers_for_game(game_id).await {
        Ok(answers) if answers.is_empty() => println!("No answers for game {game_id}."),
        Ok(answers) => {
            for answer in answers {
                let mark = if answer.is_correct() { "+" } else { "-" };
                println!(
                    "{mark} Q{} {}: answered {}, correct {}",
                    answer.question_number(),
                    answer.country(),
                    answer.user_answer(),
                    answer.correct_answer()
                );
            }
        }
        Err(error) => println!("failed to load answers: {error}"),
    }
}

async fn show_recent(history: &HistoryService) {
    match history.recent_answers().await {
        Ok(answers) if answers.is_empty() => println!("No answers recorded yet."),
        Ok(answers) => {
            for answer in answers.iter().take(20) {
                let game = answer
                    .game_id()
                    .map_or_else(|| "unlinked".to_owned(), |id| format!("game {id}"));
                println!(
                    "{}: {} -> {} ({game})",
                    answer.country(),
                    answer.user_answer(),
                    answer.correct_answer()
                );
            }
        }
        Err(error) => println!("failed to load answers: {error}"),
    }
}

async fn show_missed(history: &HistoryService) {
    match history.incorrect_answers().await {
        Ok(missed) if missed.is_empty() => println!("No missed answers. Well done!"),
        Ok(missed) => {
            for entry in missed {
                println!(
                    "{}: you said {}, capital is {}",
                    entry.country, entry.user_answer, entry.correct_answer
                );
            }
        }
        Err(error) => println!("failed to load missed answers: {error}"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let args = parse_args(std::env::args().skip(1))?;
    let services = QuizServices::new_sqlite(&args.db_url, Clock::default_clock(), args.config)
        .await
        .map_err(|e| {
            eprintln!("failed to start: {e}");
            e
        })?;
    let game_loop: Arc<GameLoopService> = services.game_loop();
    let history: Arc<HistoryService> = services.history();

    println!("Capital Quiz - play | games | answers <id> | recent | missed | clear | quit");
    loop {
        let Some(input) = read_line("\n> ")? else {
            break;
        };
        let mut parts = input.split_whitespace();
        match parts.next() {
            Some("play") | Some("p") => play(&game_loop).await?,
            Some("games") | Some("g") => show_games(&history).await,
            Some("answers") | Some("a") => match parts.next().and_then(|raw| raw.parse().ok()) {
                Some(game_id) => show_answers(&history, game_id).await,
                None => println!("usage: answers <game id>"),
            },
            Some("recent") | Some("r") => show_recent(&history).await,
            Some("missed") | Some("m") => show_missed(&history).await,
            Some("clear") => {
                let confirm = read_line("Delete all history? This cannot be undone [y/N]: ")?;
                if confirm.as_deref() == Some("y") {
                    match history.clear_history().await {
                        Ok(()) => println!("History cleared."),
                        Err(error) => println!("failed to clear history: {error}"),
                    }
                }
            }
            Some("quit") | Some("q") => break,
            Some(other) => println!("unknown command: {other}"),
            None => {}
        }
    }

    Ok(())
}
