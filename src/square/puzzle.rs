use serde::{Deserialize, Serialize};

use super::core::{BorderWords, Position, Size};

/// A generated square: the answer words plus filler for the interior.
///
/// Created once by the generator and never modified; sessions build a
/// [`GridModel`](super::core::GridModel) from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleGrid {
    size: Size,
    rows: Vec<String>,
    border: BorderWords,
    seed: u64,
    #[serde(default)]
    fallback: bool,
}

impl PuzzleGrid {
    /// Lays `border` out on the edges and asks `interior` for every other
    /// cell, row by row.
    pub fn new(
        border: BorderWords,
        mut interior: impl FnMut(Position) -> char,
        seed: u64,
        fallback: bool,
    ) -> Self {
        let size = border.size();
        let n = size.len();

        let rows = (0..n)
            .map(|row| {
                (0..n)
                    .map(|col| {
                        let position = Position::new(row, col);
                        border
                            .target_at(position)
                            .unwrap_or_else(|| interior(position).to_ascii_uppercase())
                    })
                    .collect()
            })
            .collect();

        Self {
            size,
            rows,
            border,
            seed,
            fallback,
        }
    }

    pub const fn size(&self) -> Size {
        self.size
    }

    pub const fn border(&self) -> &BorderWords {
        &self.border
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether this grid came from the hand-picked fallback words.
    pub const fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn letter(&self, position: Position) -> Option<char> {
        self.rows
            .get(position.row)
            .and_then(|row| row.chars().nth(position.col))
    }

    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(String::as_str)
    }
}

impl std::fmt::Display for PuzzleGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in &self.rows {
            let spaced: Vec<String> = row.chars().map(String::from).collect();
            writeln!(f, "{}", spaced.join(" "))?;
        }
        Ok(())
    }
}
