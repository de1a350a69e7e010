use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Position, Size, Word};

/// One of the four edges of the square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderPosition {
    Top,
    Left,
    Right,
    Bottom,
}

impl BorderPosition {
    pub const ALL: [Self; 4] = [Self::Top, Self::Left, Self::Right, Self::Bottom];

    /// Grid positions covered by this edge, in reading order.
    pub fn positions(self, size: Size) -> impl Iterator<Item = Position> {
        let n = size.len();
        (0..n).map(move |i| match self {
            Self::Top => Position::new(0, i),
            Self::Bottom => Position::new(n - 1, i),
            Self::Left => Position::new(i, 0),
            Self::Right => Position::new(i, n - 1),
        })
    }
}

impl std::fmt::Display for BorderPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::Left => "left",
            Self::Right => "right",
            Self::Bottom => "bottom",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BorderError {
    #[error("border words must all have the same length (got {top}, {left}, {right}, {bottom})")]
    MismatchedLengths {
        top: usize,
        left: usize,
        right: usize,
        bottom: usize,
    },

    #[error("{len}-letter words cannot form a square")]
    UnplayableLength { len: usize },

    #[error("{first} and {second} do not agree at their shared corner")]
    CornerMismatch {
        first: BorderPosition,
        second: BorderPosition,
    },

    #[error("`{0}` is used for more than one edge")]
    Reused(Word),
}

/// The four words around the edge of a square.
///
/// Always corner-consistent: the checked constructor is the only way in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBorderWords", into = "RawBorderWords")]
pub struct BorderWords {
    top: Word,
    left: Word,
    right: Word,
    bottom: Word,
}

impl BorderWords {
    pub fn new(top: Word, left: Word, right: Word, bottom: Word) -> Result<Self, BorderError> {
        let len = top.len();
        if [left.len(), right.len(), bottom.len()]
            .iter()
            .any(|other| *other != len)
        {
            return Err(BorderError::MismatchedLengths {
                top: top.len(),
                left: left.len(),
                right: right.len(),
                bottom: bottom.len(),
            });
        }

        Size::try_from(len).map_err(|_| BorderError::UnplayableLength { len })?;

        let corners = [
            (top.first(), left.first(), BorderPosition::Top, BorderPosition::Left),
            (top.last(), right.first(), BorderPosition::Top, BorderPosition::Right),
            (left.last(), bottom.first(), BorderPosition::Left, BorderPosition::Bottom),
            (right.last(), bottom.last(), BorderPosition::Right, BorderPosition::Bottom),
        ];

        for (a, b, first, second) in corners {
            if a != b {
                return Err(BorderError::CornerMismatch { first, second });
            }
        }

        Ok(Self {
            top,
            left,
            right,
            bottom,
        })
    }

    /// Like [`BorderWords::new`], but also rejects a word filling two edges.
    pub fn distinct(top: Word, left: Word, right: Word, bottom: Word) -> Result<Self, BorderError> {
        let words = Self::new(top, left, right, bottom)?;

        let all = words.words();
        for (i, word) in all.iter().enumerate() {
            if all[i + 1..].contains(word) {
                return Err(BorderError::Reused((*word).clone()));
            }
        }

        Ok(words)
    }

    pub fn parse(top: &str, left: &str, right: &str, bottom: &str) -> Result<Self, ParseBorderError> {
        Ok(Self::new(
            Word::from_str(top)?,
            Word::from_str(left)?,
            Word::from_str(right)?,
            Word::from_str(bottom)?,
        )?)
    }

    pub fn size(&self) -> Size {
        Size::try_from(self.top.len()).expect("length checked on construction")
    }

    pub fn top(&self) -> &Word {
        &self.top
    }

    pub fn left(&self) -> &Word {
        &self.left
    }

    pub fn right(&self) -> &Word {
        &self.right
    }

    pub fn bottom(&self) -> &Word {
        &self.bottom
    }

    pub fn get(&self, position: BorderPosition) -> &Word {
        match position {
            BorderPosition::Top => &self.top,
            BorderPosition::Left => &self.left,
            BorderPosition::Right => &self.right,
            BorderPosition::Bottom => &self.bottom,
        }
    }

    pub fn words(&self) -> [&Word; 4] {
        [&self.top, &self.left, &self.right, &self.bottom]
    }

    pub fn iter(&self) -> impl Iterator<Item = (BorderPosition, &Word)> {
        BorderPosition::ALL.into_iter().map(|pos| (pos, self.get(pos)))
    }

    /// The letter this square expects at `position`, or `None` for interior
    /// and out-of-range positions.
    pub fn target_at(&self, position: Position) -> Option<char> {
        let n = self.top.len();
        let Position { row, col } = position;

        if row >= n || col >= n {
            None
        } else if row == 0 {
            self.top.get(col)
        } else if row == n - 1 {
            self.bottom.get(col)
        } else if col == 0 {
            self.left.get(row)
        } else if col == n - 1 {
            self.right.get(row)
        } else {
            None
        }
    }

    /// Hand-checked words used whenever generation gives up.
    pub fn fallback(size: Size) -> Self {
        let (top, left, right, bottom) = match size {
            Size::Four => ("SLAB", "SOFT", "BEST", "TART"),
            Size::Five => ("CRANE", "CHAIR", "EAGER", "RIVER"),
            Size::Six => ("PLANET", "PALACE", "TALENT", "EXPERT"),
        };

        Self::parse(top, left, right, bottom).expect("fallback words are corner-consistent")
    }
}

#[derive(Debug, Error)]
pub enum ParseBorderError {
    #[error(transparent)]
    Word(#[from] super::word::ParseWordError),

    #[error(transparent)]
    Border(#[from] BorderError),
}

#[derive(Serialize, Deserialize)]
struct RawBorderWords {
    top: Word,
    left: Word,
    right: Word,
    bottom: Word,
}

impl TryFrom<RawBorderWords> for BorderWords {
    type Error = BorderError;

    fn try_from(value: RawBorderWords) -> Result<Self, Self::Error> {
        Self::new(value.top, value.left, value.right, value.bottom)
    }
}

impl From<BorderWords> for RawBorderWords {
    fn from(value: BorderWords) -> Self {
        Self {
            top: value.top,
            left: value.left,
            right: value.right,
            bottom: value.bottom,
        }
    }
}

impl std::fmt::Display for BorderWords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "top {} / left {} / right {} / bottom {}",
            self.top, self.left, self.right, self.bottom
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{BorderError, BorderPosition, BorderWords};
    use crate::square::core::{Position, Size};

    #[test]
    fn accepts_consistent_corners() {
        let words = BorderWords::parse("word", "west", "dust", "tast").unwrap();
        assert_eq!(words.size(), Size::Four);
        assert_eq!(words.get(BorderPosition::Right), &"DUST");
    }

    #[test]
    fn rejects_mismatched_corner() {
        let err = BorderWords::parse("word", "west", "dust", "toad").unwrap_err();
        assert_eq!(
            err.to_string(),
            BorderError::CornerMismatch {
                first: BorderPosition::Right,
                second: BorderPosition::Bottom
            }
            .to_string()
        );
    }

    #[test]
    fn rejects_mixed_lengths() {
        assert!(BorderWords::parse("word", "wests", "dust", "tast").is_err());
    }

    #[test]
    fn rejects_reuse() {
        let top = "tent".parse().unwrap();
        let left = "tent".parse().unwrap();
        let right = "tart".parse().unwrap();
        let bottom = "tart".parse().unwrap();

        assert!(BorderWords::new(
            "tent".parse().unwrap(),
            "tent".parse().unwrap(),
            "tart".parse().unwrap(),
            "tart".parse().unwrap()
        )
        .is_ok());
        assert!(matches!(
            BorderWords::distinct(top, left, right, bottom),
            Err(BorderError::Reused(_))
        ));
    }

    #[test]
    fn fallbacks_are_valid() {
        for size in Size::ALL {
            let words = BorderWords::fallback(size);
            assert_eq!(words.size(), size);

            let [top, left, right, bottom] = words.words().map(Clone::clone);
            assert!(BorderWords::distinct(top, left, right, bottom).is_ok());
        }
    }

    #[test]
    fn target_letters() {
        let words = BorderWords::parse("word", "west", "dust", "tast").unwrap();

        assert_eq!(words.target_at(Position::new(0, 0)), Some('W'));
        assert_eq!(words.target_at(Position::new(0, 3)), Some('D'));
        assert_eq!(words.target_at(Position::new(2, 0)), Some('S'));
        assert_eq!(words.target_at(Position::new(2, 3)), Some('S'));
        assert_eq!(words.target_at(Position::new(3, 1)), Some('A'));
        assert_eq!(words.target_at(Position::new(1, 1)), None);
        assert_eq!(words.target_at(Position::new(4, 0)), None);
    }

    #[test]
    fn edge_positions() {
        let right: Vec<_> = BorderPosition::Right.positions(Size::Four).collect();
        assert_eq!(
            right,
            vec![
                Position::new(0, 3),
                Position::new(1, 3),
                Position::new(2, 3),
                Position::new(3, 3)
            ]
        );
    }

    #[test]
    fn serde_rejects_inconsistent_words() {
        let json = r#"{"top":"WORD","left":"WEST","right":"DUST","bottom":"TOAD"}"#;
        assert!(serde_json::from_str::<BorderWords>(json).is_err());

        let json = r#"{"top":"WORD","left":"WEST","right":"DUST","bottom":"TAST"}"#;
        assert!(serde_json::from_str::<BorderWords>(json).is_ok());
    }
}
