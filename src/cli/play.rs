use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};

use super::Play;
use crate::{
    errors::Result,
    framework::Config,
    square::{
        daily::today,
        game::{GridSnapshot, SavedGame},
        DailyPuzzles, Direction, FileStore, GameSession, GameStore, Phase, Position, PuzzleGrid,
        SessionHandle,
    },
};

const HELP: &str = "\
letters      type at the cursor (several at once is fine)
.            backspace
> / <        next / previous open cell
^            first open cell
@ROW,COL     jump to a cell, counting from 0
!            submit the border
:stats       your statistics for this size
:help        this message
:quit        save and leave";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Letters(Vec<char>),
    Backspace,
    Move(Direction),
    Submit,
    Stats,
    Help,
    Quit,
    Redraw,
    Unknown(String),
}

fn parse_position(text: &str) -> Option<Position> {
    let (row, col) = text.split_once(',')?;
    Some(Position::new(row.trim().parse().ok()?, col.trim().parse().ok()?))
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();

    match line {
        "" => Input::Redraw,
        "." => Input::Backspace,
        ">" => Input::Move(Direction::Next),
        "<" => Input::Move(Direction::Previous),
        "^" => Input::Move(Direction::First),
        "!" => Input::Submit,
        ":stats" => Input::Stats,
        ":help" | "?" => Input::Help,
        ":quit" | ":q" => Input::Quit,
        _ => {
            if let Some(position) = line.strip_prefix('@').and_then(parse_position) {
                Input::Move(Direction::To(position))
            } else if line.chars().all(|ch| ch.is_ascii_alphabetic()) {
                Input::Letters(line.chars().collect())
            } else {
                Input::Unknown(line.to_owned())
            }
        }
    }
}

fn is_save_for(saved: &SavedGame, puzzle: &PuzzleGrid) -> bool {
    saved.size == puzzle.size() && &saved.target == puzzle.border()
}

fn show(snapshot: &GridSnapshot) {
    print!("{snapshot}");
    println!(
        "guesses: {}  time: {}:{:02}",
        snapshot.guesses,
        snapshot.elapsed_secs / 60,
        snapshot.elapsed_secs % 60
    );
}

/// Line-driven game on stdin/stdout. Progress is saved after every
/// submission and on the way out.
#[instrument(skip_all, fields(size = %args.size))]
pub async fn play(config: &Config, args: &Play) -> Result {
    let date = args.date.unwrap_or_else(today);
    let difficulty = args.size.difficulty();

    let words = Arc::new(config.words_list()?);
    let daily =
        DailyPuzzles::new(words.clone()).with_max_attempts(config.generator.max_attempts);
    let store = GameStore::new(FileStore::new(&config.storage.dir));

    let puzzle = daily.puzzle(date, args.size).await?;
    let mut session = GameSession::new();
    match store.load_state(date, difficulty).await {
        Some(saved) if is_save_for(&saved, &puzzle) => {
            if let Err(err) = session.resume(saved) {
                warn!(%err, "saved game unusable, starting over");
                session.load(&puzzle);
            }
        }
        Some(_) => {
            warn!("saved game is for a different puzzle, starting over");
            session.load(&puzzle);
        }
        None => session.load(&puzzle),
    }

    let mut stats = store.load_stats(difficulty).await;
    if stats.record_played(date) {
        store.save_stats(difficulty, &stats).await?;
    }

    let validator = Arc::new(config.validator(words));
    let (handle, task) = SessionHandle::spawn(session, validator);

    println!("wordsquare {date} ({difficulty}), type :help for commands");
    let snapshot = handle.snapshot().await?;
    show(&snapshot);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut finished = snapshot.phase == Phase::Won;

    while !finished {
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Letters(letters) => {
                for letter in letters {
                    handle.type_letter(letter).await?;
                }
            }
            Input::Backspace => {
                handle.backspace().await?;
            }
            Input::Move(direction) => {
                if handle.navigate(direction).await?.is_none() {
                    println!("nowhere to go");
                }
            }
            Input::Submit => {
                let result = handle.submit().await?;
                println!("{result}");

                if let Some(saved) = handle.save().await? {
                    store.save_state(date, difficulty, &saved).await?;
                }

                if result.is_win() {
                    let snapshot = handle.snapshot().await?;
                    if stats.record_win(date, snapshot.guesses) {
                        store.save_stats(difficulty, &stats).await?;
                    }
                    finished = true;
                }
            }
            Input::Stats => print!("{}", stats.report(today())),
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
            Input::Redraw => {}
            Input::Unknown(input) => println!("don't know what {input:?} means, try :help"),
        }

        show(&handle.snapshot().await?);
    }

    if let Some(saved) = handle.save().await? {
        store.save_state(date, difficulty, &saved).await?;
    }

    drop(handle);
    let session = task.await?;

    if session.phase() == Phase::Won {
        if let Some(text) = session.share_text() {
            println!("\n{text}");
        }
    }

    info!(phase = ?session.phase(), "leaving game");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{is_save_for, parse_input, Input};
    use crate::square::{BorderWords, Direction, GameSession, Position, PuzzleGrid, Size};

    #[test]
    fn inputs() {
        assert_eq!(parse_input("  word "), Input::Letters(vec!['w', 'o', 'r', 'd']));
        assert_eq!(parse_input("."), Input::Backspace);
        assert_eq!(parse_input("!"), Input::Submit);
        assert_eq!(
            parse_input("@3, 2"),
            Input::Move(Direction::To(Position::new(3, 2)))
        );
        assert_eq!(parse_input(":q"), Input::Quit);
        assert_eq!(parse_input(""), Input::Redraw);
        assert_eq!(parse_input("wo rd"), Input::Unknown("wo rd".to_owned()));
        assert_eq!(parse_input("@x"), Input::Unknown("@x".to_owned()));
    }

    #[test]
    fn saves_must_match_the_days_puzzle() {
        let today = PuzzleGrid::new(BorderWords::fallback(Size::Four), |_| 'x', 1, true);
        let mut session = GameSession::new();
        session.load(&today);
        let saved = session.save().unwrap();

        assert!(is_save_for(&saved, &today));

        let yesterday = PuzzleGrid::new(
            BorderWords::parse("word", "west", "dust", "tast").unwrap(),
            |_| 'x',
            0,
            false,
        );
        assert!(!is_save_for(&saved, &yesterday));
        assert!(!is_save_for(
            &saved,
            &PuzzleGrid::new(BorderWords::fallback(Size::Five), |_| 'x', 1, true)
        ));
    }
}
