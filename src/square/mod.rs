//! The daily word square: four words around the edge of a grid, sharing
//! their corner letters.

pub mod core;
pub mod daily;
pub mod dictionary;
pub mod evaluator;
pub mod game;
pub mod generator;
pub mod puzzle;
pub mod rng;
pub mod stats;
pub mod storage;

mod words_list;
pub use words_list::{LoadError, WordsList};

pub use self::core::{
    AsEmoji, BorderPosition, BorderWords, CellStatus, Difficulty, GridModel, NavigationCursor,
    Position, Size, Word,
};
pub use daily::{DailyPuzzles, MemoryPuzzleCache, PuzzleCache};
pub use dictionary::{DictionaryValidator, HttpDictionary, RemoteDictionary};
pub use evaluator::{SubmissionEvaluator, SubmissionResult};
pub use game::{Direction, GameSession, Phase, SessionHandle};
pub use generator::SquareGenerator;
pub use puzzle::PuzzleGrid;
pub use storage::{FileStore, GameStore, KeyValueStore, MemoryStore};
