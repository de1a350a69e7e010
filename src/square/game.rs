use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use serde::{Deserialize, Serialize};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinHandle,
};
use tracing::{debug, info, trace};

use super::{
    core::{AsEmoji, BorderWords, Cell, CellStatus, GridModel, NavigationCursor, Position, RestoreError, Size},
    dictionary::{DictionaryValidator, RemoteDictionary},
    evaluator::{SubmissionEvaluator, SubmissionResult, ValidationFailure},
    puzzle::PuzzleGrid,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Loading,
    Active,
    /// Terminal.
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    First,
    Next,
    Previous,
    To(Position),
}

#[derive(Debug, Clone)]
struct Board {
    grid: GridModel,
    target: BorderWords,
    navigation: NavigationCursor,
    cursor: Option<Position>,
    guesses: u32,
    elapsed: Duration,
    resumed: Instant,
    tried: Vec<BorderWords>,
}

impl Board {
    fn new(grid: GridModel, target: BorderWords) -> Self {
        let navigation = NavigationCursor::new(grid.size());
        let cursor = navigation.find_first(&grid);

        Self {
            grid,
            target,
            navigation,
            cursor,
            guesses: 0,
            elapsed: Duration::ZERO,
            resumed: Instant::now(),
            tried: Vec::new(),
        }
    }
}

/// One player's run at one puzzle.
///
/// `Loading` until a puzzle is loaded or resumed, `Active` while playing,
/// `Won` forever after the first complete submission. Not shared between
/// threads; see [`SessionHandle`] for that.
#[derive(Debug, Clone, Default)]
pub struct GameSession {
    board: Option<Board>,
    won: bool,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        match (&self.board, self.won) {
            (None, _) => Phase::Loading,
            (Some(_), false) => Phase::Active,
            (Some(_), true) => Phase::Won,
        }
    }

    /// Starts `puzzle` from scratch, replacing whatever was loaded.
    pub fn load(&mut self, puzzle: &PuzzleGrid) {
        info!(size = %puzzle.size(), seed = puzzle.seed(), "loaded puzzle");

        self.board = Some(Board::new(GridModel::new(puzzle), puzzle.border().clone()));
        self.won = false;
    }

    /// Picks up a saved game where it left off. Refuses saves whose answer
    /// doesn't fit the grid they carry.
    pub fn resume(&mut self, saved: SavedGame) -> Result<(), RestoreError> {
        let grid = GridModel::restore(saved.size, saved.cells)?;
        grid.check_target(&saved.target)?;
        let won = saved.phase == Phase::Won && grid.is_complete();

        let mut board = Board::new(grid, saved.target);
        board.guesses = saved.guesses;
        board.elapsed = Duration::from_secs(saved.elapsed_secs);
        board.tried = saved.tried;

        info!(guesses = board.guesses, won, "resumed saved game");

        self.board = Some(board);
        self.won = won;

        Ok(())
    }

    fn active_board(&mut self) -> Option<&mut Board> {
        if self.won {
            return None;
        }
        self.board.as_mut()
    }

    pub fn grid(&self) -> Option<&GridModel> {
        self.board.as_ref().map(|board| &board.grid)
    }

    pub fn size(&self) -> Option<Size> {
        self.grid().map(GridModel::size)
    }

    pub fn cursor(&self) -> Option<Position> {
        self.board.as_ref().and_then(|board| board.cursor)
    }

    pub fn guesses(&self) -> u32 {
        self.board.as_ref().map_or(0, |board| board.guesses)
    }

    /// Play time, including time from before a resume. Stops at the win.
    pub fn elapsed(&self) -> Duration {
        self.board.as_ref().map_or(Duration::ZERO, |board| {
            if self.won {
                board.elapsed
            } else {
                board.elapsed + board.resumed.elapsed()
            }
        })
    }

    pub fn set_letter(&mut self, position: Position, letter: char) -> bool {
        self.active_board()
            .is_some_and(|board| board.grid.set_letter(position, letter))
    }

    pub fn clear_letter(&mut self, position: Position) -> bool {
        self.active_board()
            .is_some_and(|board| board.grid.clear_letter(position))
    }

    /// Types at the cursor and moves it on to the next open cell.
    pub fn type_letter(&mut self, letter: char) -> bool {
        let Some(board) = self.active_board() else {
            return false;
        };
        let Some(cursor) = board.cursor else {
            return false;
        };

        if !board.grid.set_letter(cursor, letter) {
            return false;
        }

        board.cursor = board.navigation.find_next(&board.grid, cursor).or(Some(cursor));
        true
    }

    /// Clears the cursor cell, or steps back and clears the previous one if
    /// the cursor cell is already blank.
    pub fn backspace(&mut self) -> bool {
        let Some(board) = self.active_board() else {
            return false;
        };
        let Some(cursor) = board.cursor else {
            return false;
        };

        let blank = board.grid.cell(cursor).map_or(true, Cell::is_empty);
        if !blank {
            return board.grid.clear_letter(cursor);
        }

        let Some(previous) = board.navigation.find_previous(&board.grid, cursor) else {
            return false;
        };
        board.cursor = Some(previous);
        board.grid.clear_letter(previous)
    }

    pub fn navigate(&mut self, direction: Direction) -> Option<Position> {
        let board = self.active_board()?;

        let target = match (direction, board.cursor) {
            (Direction::To(position), _) => board
                .grid
                .cell(position)
                .filter(|cell| cell.is_editable())
                .map(Cell::position),
            (Direction::First, _) | (_, None) => board.navigation.find_first(&board.grid),
            (Direction::Next, Some(current)) => board.navigation.find_next(&board.grid, current),
            (Direction::Previous, Some(current)) => {
                board.navigation.find_previous(&board.grid, current)
            }
        };

        if let Some(target) = target {
            board.cursor = Some(target);
        }

        trace!(?direction, cursor = ?board.cursor, "navigated");
        board.cursor
    }

    /// Evaluates the current border. A border identical to an earlier
    /// submission that didn't win is refused without asking the dictionary.
    pub async fn submit<R>(&mut self, validator: &DictionaryValidator<R>) -> SubmissionResult
    where
        R: RemoteDictionary,
    {
        if self.won {
            return SubmissionResult::ValidationError {
                reason: ValidationFailure::Finished,
            };
        }

        let Some(board) = self.board.as_mut() else {
            return SubmissionResult::incomplete();
        };

        let submitted = board.grid.border_words();
        if submitted
            .as_ref()
            .is_some_and(|words| board.tried.contains(words))
        {
            debug!("repeated submission");
            return SubmissionResult::ValidationError {
                reason: ValidationFailure::Repeated,
            };
        }

        let result = SubmissionEvaluator::submit(&mut board.grid, &board.target, validator).await;

        if let SubmissionResult::Success { complete, .. } = result {
            board.guesses += 1;

            if complete {
                board.elapsed += board.resumed.elapsed();
                board.cursor = None;
                self.won = true;

                info!(guesses = board.guesses, elapsed = ?board.elapsed, "puzzle solved");
            } else {
                board.tried.extend(submitted);
                board.cursor = board.navigation.find_first(&board.grid);
            }
        }

        result
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            phase: self.phase(),
            size: self.size(),
            cells: self
                .grid()
                .map(|grid| grid.cells().to_vec())
                .unwrap_or_default(),
            cursor: self.cursor(),
            guesses: self.guesses(),
            elapsed_secs: self.elapsed().as_secs(),
        }
    }

    /// Everything needed to resume later, or `None` while loading.
    pub fn save(&self) -> Option<SavedGame> {
        let board = self.board.as_ref()?;

        Some(SavedGame {
            size: board.grid.size(),
            cells: board.grid.cells().to_vec(),
            target: board.target.clone(),
            elapsed_secs: self.elapsed().as_secs(),
            guesses: board.guesses,
            phase: self.phase(),
            tried: board.tried.clone(),
        })
    }

    /// Spoiler-free summary for sharing a finished puzzle.
    pub fn share_text(&self) -> Option<String> {
        let grid = self.grid()?;
        Some(format!(
            "wordsquare {size}x{size} in {guesses} {noun}\n{emoji}",
            size = grid.size(),
            guesses = self.guesses(),
            noun = if self.guesses() == 1 { "guess" } else { "guesses" },
            emoji = grid.as_emoji(),
        ))
    }
}

/// The persisted shape of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    pub size: Size,
    pub cells: Vec<Cell>,
    pub target: BorderWords,
    pub elapsed_secs: u64,
    pub guesses: u32,
    pub phase: Phase,
    #[serde(default)]
    pub tried: Vec<BorderWords>,
}

/// Read-only view of a session for whatever draws it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub phase: Phase,
    pub size: Option<Size>,
    pub cells: Vec<Cell>,
    pub cursor: Option<Position>,
    pub guesses: u32,
    pub elapsed_secs: u64,
}

impl GridSnapshot {
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.map_or(1, Size::len))
    }
}

impl std::fmt::Display for GridSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.phase == Phase::Loading {
            return writeln!(f, "loading...");
        }

        for row in self.rows() {
            let line: Vec<String> = row
                .iter()
                .map(|cell| {
                    let letter = cell.letter().unwrap_or('_');
                    let selected = self.cursor == Some(cell.position());
                    match (cell.status(), selected) {
                        (CellStatus::Interior, _) => " · ".to_owned(),
                        (CellStatus::Correct, _) => format!("[{letter}]"),
                        (CellStatus::Editable, true) => format!(">{}<", letter.to_ascii_lowercase()),
                        (CellStatus::Editable, false) => format!(" {} ", letter.to_ascii_lowercase()),
                    }
                })
                .collect();
            writeln!(f, "{}", line.join(""))?;
        }

        let tried: Vec<String> = self
            .cells
            .iter()
            .filter(|cell| cell.is_editable() && !cell.attempts().is_empty())
            .map(|cell| {
                let letters: String = cell.attempts().iter().collect();
                format!("{} {}", cell.position(), letters.to_ascii_lowercase())
            })
            .collect();
        if !tried.is_empty() {
            writeln!(f, "not: {}", tried.join(", "))?;
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("game session has shut down")]
pub struct SessionClosed;

enum Command {
    SetLetter(Position, char, oneshot::Sender<bool>),
    ClearLetter(Position, oneshot::Sender<bool>),
    Type(char, oneshot::Sender<bool>),
    Backspace(oneshot::Sender<bool>),
    Navigate(Direction, oneshot::Sender<Option<Position>>),
    Submit(oneshot::Sender<SubmissionResult>),
    Snapshot(oneshot::Sender<GridSnapshot>),
    Save(oneshot::Sender<Option<SavedGame>>),
}

/// Cloneable handle to a session owned by its own task.
///
/// Every caller (input, timers, autosave) goes through the same queue, so
/// the grid only ever has one writer.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Moves `session` into a new task. The task ends, handing the session
    /// back, once every handle is dropped.
    pub fn spawn<R>(
        session: GameSession,
        validator: Arc<DictionaryValidator<R>>,
    ) -> (Self, JoinHandle<GameSession>)
    where
        R: RemoteDictionary + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel(32);
        let task = tokio::spawn(run(session, validator, rx));
        (Self { tx }, task)
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionClosed> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| SessionClosed)?;
        response.await.map_err(|_| SessionClosed)
    }

    pub async fn set_letter(&self, position: Position, letter: char) -> Result<bool, SessionClosed> {
        self.request(|reply| Command::SetLetter(position, letter, reply))
            .await
    }

    pub async fn clear_letter(&self, position: Position) -> Result<bool, SessionClosed> {
        self.request(|reply| Command::ClearLetter(position, reply))
            .await
    }

    pub async fn type_letter(&self, letter: char) -> Result<bool, SessionClosed> {
        self.request(|reply| Command::Type(letter, reply)).await
    }

    pub async fn backspace(&self) -> Result<bool, SessionClosed> {
        self.request(Command::Backspace).await
    }

    pub async fn navigate(&self, direction: Direction) -> Result<Option<Position>, SessionClosed> {
        self.request(|reply| Command::Navigate(direction, reply))
            .await
    }

    pub async fn submit(&self) -> Result<SubmissionResult, SessionClosed> {
        self.request(Command::Submit).await
    }

    pub async fn snapshot(&self) -> Result<GridSnapshot, SessionClosed> {
        self.request(Command::Snapshot).await
    }

    pub async fn save(&self) -> Result<Option<SavedGame>, SessionClosed> {
        self.request(Command::Save).await
    }
}

async fn run<R>(
    mut session: GameSession,
    validator: Arc<DictionaryValidator<R>>,
    mut rx: mpsc::Receiver<Command>,
) -> GameSession
where
    R: RemoteDictionary + Send + Sync + 'static,
{
    while let Some(command) = rx.recv().await {
        // a dropped reply receiver just means the caller stopped waiting
        match command {
            Command::SetLetter(position, letter, reply) => {
                reply.send(session.set_letter(position, letter)).ok();
            }
            Command::ClearLetter(position, reply) => {
                reply.send(session.clear_letter(position)).ok();
            }
            Command::Type(letter, reply) => {
                reply.send(session.type_letter(letter)).ok();
            }
            Command::Backspace(reply) => {
                reply.send(session.backspace()).ok();
            }
            Command::Navigate(direction, reply) => {
                reply.send(session.navigate(direction)).ok();
            }
            Command::Submit(reply) => {
                let result = session.submit(&validator).await;
                reply.send(result).ok();
            }
            Command::Snapshot(reply) => {
                reply.send(session.snapshot()).ok();
            }
            Command::Save(reply) => {
                reply.send(session.save()).ok();
            }
        }
    }

    debug!("session handles dropped, stopping");
    session
}
