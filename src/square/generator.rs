use thiserror::Error;
use tracing::{debug, instrument, trace, warn};

use super::{
    core::{BorderWords, Size, Word},
    puzzle::PuzzleGrid,
    rng::SquareRng,
    WordsList,
};

pub const DEFAULT_MAX_ATTEMPTS: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no {size}x{size} square found for seed {seed} after {attempts} attempts")]
pub struct GenerationFailure {
    pub size: Size,
    pub seed: u64,
    pub attempts: usize,
}

/// Searches a words list for four words that close into a square.
#[derive(Debug, Clone, Copy)]
pub struct SquareGenerator<'a> {
    words: &'a WordsList,
    max_attempts: usize,
}

impl<'a> SquareGenerator<'a> {
    pub fn new(words: &'a WordsList) -> Self {
        Self {
            words,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub const fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Deterministic in `seed` for a given words list.
    #[instrument(skip(self), fields(max_attempts = self.max_attempts))]
    pub fn generate(&self, size: Size, seed: u64) -> Result<PuzzleGrid, GenerationFailure> {
        let mut rng = SquareRng::from_seed(seed);
        let pool = self.words.words_of_length(size);

        for attempt in 1..=self.max_attempts {
            let Some(border) = Self::attempt(pool, &mut rng) else {
                continue;
            };

            debug!(attempt, %border, "found square");

            return Ok(PuzzleGrid::new(border, |_| rng.letter(), seed, false));
        }

        Err(GenerationFailure {
            size,
            seed,
            attempts: self.max_attempts,
        })
    }

    /// Never fails: falls back to the hand-picked words for `size` when the
    /// search gives up.
    pub fn generate_or_fallback(&self, size: Size, seed: u64) -> PuzzleGrid {
        self.generate(size, seed).unwrap_or_else(|failure| {
            warn!(%failure, "using fallback words");

            let mut rng = SquareRng::from_seed(seed);
            PuzzleGrid::new(BorderWords::fallback(size), |_| rng.letter(), seed, true)
        })
    }

    fn attempt(pool: &[Word], rng: &mut SquareRng) -> Option<BorderWords> {
        let top = rng.pick(pool)?;

        let left_candidates: Vec<&Word> = pool
            .iter()
            .filter(|word| word.first() == top.first() && *word != top)
            .collect();
        let Some(left) = rng.pick(&left_candidates).copied() else {
            trace!(%top, "no left word");
            return None;
        };

        let right_candidates: Vec<&Word> = pool
            .iter()
            .filter(|word| word.first() == top.last() && *word != top && *word != left)
            .collect();
        let Some(right) = rng.pick(&right_candidates).copied() else {
            trace!(%top, %left, "no right word");
            return None;
        };

        let bottom_candidates: Vec<&Word> = pool
            .iter()
            .filter(|word| {
                word.first() == left.last()
                    && word.last() == right.last()
                    && ![top, left, right].contains(word)
            })
            .collect();
        let Some(bottom) = rng.pick(&bottom_candidates).copied() else {
            trace!(%top, %left, %right, "no bottom word");
            return None;
        };

        BorderWords::distinct(top.clone(), left.clone(), right.clone(), bottom.clone())
            .inspect_err(|err| warn!(%err, "candidate square failed corner check"))
            .ok()
    }
}
