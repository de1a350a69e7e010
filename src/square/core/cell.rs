use serde::{Deserialize, Serialize};

use super::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub const fn is_border(self, size: Size) -> bool {
        let last = size.len() - 1;
        self.row == 0 || self.col == 0 || self.row == last || self.col == last
    }

    pub const fn in_bounds(self, size: Size) -> bool {
        self.row < size.len() && self.col < size.len()
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellStatus {
    /// A given from the puzzle, never played.
    Interior,
    #[default]
    Editable,
    /// Locked in. Never leaves this state.
    Correct,
}

/// One square of the grid.
///
/// Fields are private: every transition goes through
/// [`GridModel`](super::GridModel), which is what keeps `Correct` permanent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    position: Position,
    letter: Option<char>,
    status: CellStatus,
    #[serde(default)]
    attempts: Vec<char>,
}

impl Cell {
    pub(super) fn interior(position: Position, letter: char) -> Self {
        Self {
            position,
            letter: Some(letter),
            status: CellStatus::Interior,
            attempts: Vec::new(),
        }
    }

    pub(super) fn editable(position: Position) -> Self {
        Self {
            position,
            letter: None,
            status: CellStatus::Editable,
            attempts: Vec::new(),
        }
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn letter(&self) -> Option<char> {
        self.letter
    }

    pub const fn status(&self) -> CellStatus {
        self.status
    }

    /// Wrong letters already tried here, oldest first.
    pub fn attempts(&self) -> &[char] {
        &self.attempts
    }

    pub fn was_attempted(&self, letter: char) -> bool {
        self.attempts.contains(&letter.to_ascii_uppercase())
    }

    pub const fn is_editable(&self) -> bool {
        matches!(self.status, CellStatus::Editable)
    }

    pub const fn is_correct(&self) -> bool {
        matches!(self.status, CellStatus::Correct)
    }

    pub const fn is_empty(&self) -> bool {
        self.letter.is_none()
    }

    pub(super) fn set(&mut self, letter: char) -> bool {
        if !self.is_editable() || !letter.is_ascii_alphabetic() {
            return false;
        }

        self.letter = Some(letter.to_ascii_uppercase());
        true
    }

    pub(super) fn clear(&mut self) -> bool {
        if !self.is_editable() {
            return false;
        }

        self.letter = None;
        true
    }

    /// Compares against `target`, locking or wiping the letter. Returns
    /// whether the cell became correct.
    pub(super) fn mark(&mut self, target: char) -> bool {
        if !self.is_editable() {
            return false;
        }

        match self.letter {
            Some(letter) if letter == target => {
                self.status = CellStatus::Correct;
                true
            }
            Some(letter) => {
                if !self.attempts.contains(&letter) {
                    self.attempts.push(letter);
                }
                self.letter = None;
                false
            }
            None => false,
        }
    }

    /// Structural check for cells coming back from storage.
    pub(super) fn is_well_formed(&self, size: Size) -> bool {
        let letter_ok = self.letter.map_or(true, |ch| ch.is_ascii_uppercase());
        let attempts_ok = self.attempts.iter().all(char::is_ascii_uppercase);

        let status_ok = match self.status {
            CellStatus::Interior => !self.position.is_border(size) && self.letter.is_some(),
            CellStatus::Editable => self.position.is_border(size),
            CellStatus::Correct => self.position.is_border(size) && self.letter.is_some(),
        };

        self.position.in_bounds(size) && letter_ok && attempts_ok && status_ok
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Cell, CellStatus, Position};

    #[test]
    fn wrong_letters_are_remembered_once() {
        let mut cell = Cell::editable(Position::new(0, 0));

        for _ in 0..3 {
            assert!(cell.set('x'));
            assert!(!cell.mark('W'));
            assert!(cell.is_empty());
        }

        assert!(cell.set('y'));
        assert!(!cell.mark('W'));

        assert_eq!(cell.attempts(), &['X', 'Y']);
        assert!(cell.was_attempted('x'));
    }

    #[test]
    fn correct_is_permanent() {
        let mut cell = Cell::editable(Position::new(0, 1));
        cell.set('o');
        assert!(cell.mark('O'));

        assert!(!cell.set('z'));
        assert!(!cell.clear());
        assert!(!cell.mark('Z'));

        assert_eq!(cell.status(), CellStatus::Correct);
        assert_eq!(cell.letter(), Some('O'));
    }

    #[test]
    fn interior_is_inert() {
        let mut cell = Cell::interior(Position::new(1, 1), 'Q');

        assert!(!cell.set('a'));
        assert!(!cell.clear());
        assert!(!cell.mark('Q'));
        assert_eq!(cell.status(), CellStatus::Interior);
    }

    #[test]
    fn rejects_non_letters() {
        let mut cell = Cell::editable(Position::new(0, 2));
        assert!(!cell.set('3'));
        assert!(!cell.set(' '));
        assert!(cell.is_empty());
    }
}
