use std::borrow::Cow;

mod word;
pub use word::{ParseWordError, Word};

mod size;
pub use size::{Difficulty, InvalidSize, Size};

mod border;
pub use border::{BorderError, BorderPosition, BorderWords, ParseBorderError};

mod cell;
pub use cell::{Cell, CellStatus, Position};

mod grid;
pub use grid::{GridModel, RestoreError};

pub mod navigation;
pub use navigation::NavigationCursor;

pub trait AsEmoji {
    fn as_emoji(&self) -> Cow<str>;
}

impl AsEmoji for CellStatus {
    fn as_emoji(&self) -> Cow<str> {
        match self {
            Self::Correct => "🟩",   // green square
            Self::Interior => "⬛",  // black square
            Self::Editable => "⬜",  // white square
        }
        .into()
    }
}

impl AsEmoji for Cell {
    fn as_emoji(&self) -> Cow<str> {
        self.status().as_emoji().into_owned().into()
    }
}

impl AsEmoji for GridModel {
    fn as_emoji(&self) -> Cow<str> {
        self.rows()
            .map(|row| row.iter().map(|cell| cell.as_emoji()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
            .into()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{AsEmoji, BorderWords, GridModel, Position};
    use crate::square::puzzle::PuzzleGrid;

    #[test]
    fn grid_emoji() {
        let target = BorderWords::parse("word", "west", "dust", "tast").unwrap();
        let mut model = GridModel::new(&PuzzleGrid::new(target.clone(), |_| 'x', 0, false));
        model.set_letter(Position::new(0, 0), 'w');
        model.mark_correctness(&target);

        assert_eq!(
            model.as_emoji(),
            "🟩⬜⬜⬜\n⬜⬛⬛⬜\n⬜⬛⬛⬜\n⬜⬜⬜⬜"
        );
    }
}
