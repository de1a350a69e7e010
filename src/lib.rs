#![warn(clippy::perf)]
#![warn(clippy::unwrap_used)]

pub mod cli;
pub use cli::Cli;

pub mod errors;
pub use errors::Error;

pub mod framework;

pub mod square;
pub use square::{
    BorderPosition, BorderWords, DictionaryValidator, GameSession, GridModel, NavigationCursor,
    PuzzleGrid, Size, SquareGenerator, SubmissionEvaluator, SubmissionResult, WordsList,
};
