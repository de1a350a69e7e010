use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{
    core::{BorderPosition, BorderWords, GridModel, Word},
    dictionary::{DictionaryValidator, RemoteDictionary, Verdict},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    /// Some border cell is still blank.
    Incomplete,
    /// The exact same border was already submitted and wasn't a win.
    Repeated,
    /// The puzzle is already won.
    Finished,
}

impl std::fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Incomplete => "incomplete",
            Self::Repeated => "already tried",
            Self::Finished => "already solved",
        })
    }
}

/// What one press of "submit" produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SubmissionResult {
    Success {
        correct_cells: usize,
        complete: bool,
    },
    InvalidWords {
        words: Vec<(Word, BorderPosition)>,
        /// Set when at least one word couldn't be checked because the remote
        /// dictionary was unreachable.
        network_error: bool,
    },
    ValidationError {
        reason: ValidationFailure,
    },
}

impl SubmissionResult {
    pub const fn incomplete() -> Self {
        Self::ValidationError {
            reason: ValidationFailure::Incomplete,
        }
    }

    pub const fn is_win(&self) -> bool {
        matches!(self, Self::Success { complete: true, .. })
    }
}

impl std::fmt::Display for SubmissionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success {
                complete: true, ..
            } => write!(f, "solved!"),
            Self::Success { correct_cells, .. } => {
                write!(f, "{correct_cells} new letters locked in")
            }
            Self::InvalidWords {
                network_error: true,
                ..
            } => write!(f, "couldn't reach the dictionary, check your connection"),
            Self::InvalidWords { words, .. } => {
                let list: Vec<String> = words
                    .iter()
                    .map(|(word, position)| format!("{word} ({position})"))
                    .collect();
                write!(f, "not in the dictionary: {}", list.join(", "))
            }
            Self::ValidationError { reason } => write!(f, "{reason}"),
        }
    }
}

pub struct SubmissionEvaluator;

impl SubmissionEvaluator {
    /// Checks the player's border and, if every word is real, reconciles the
    /// grid against `target`.
    #[instrument(skip_all)]
    pub async fn submit<R>(
        grid: &mut GridModel,
        target: &BorderWords,
        validator: &DictionaryValidator<R>,
    ) -> SubmissionResult
    where
        R: RemoteDictionary,
    {
        let Some(submitted) = grid.border_words() else {
            debug!("submission has blank cells");
            return SubmissionResult::incomplete();
        };

        let mut invalid = Vec::new();
        let mut network_error = false;

        for (position, word) in submitted.iter() {
            match validator.is_valid(word).await {
                Verdict::Valid => {}
                Verdict::Invalid => invalid.push((word.clone(), position)),
                Verdict::Unreachable => {
                    network_error = true;
                    invalid.push((word.clone(), position));
                }
            }
        }

        if !invalid.is_empty() {
            debug!(?invalid, network_error, "rejected submission");
            return SubmissionResult::InvalidWords {
                words: invalid,
                network_error,
            };
        }

        let correct_cells = grid.mark_correctness(target);
        let complete = grid.is_complete();

        debug!(correct_cells, complete, "accepted submission");

        SubmissionResult::Success {
            correct_cells,
            complete,
        }
    }
}
