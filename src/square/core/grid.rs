use thiserror::Error;
use tracing::trace;

use super::{BorderPosition, BorderWords, Cell, CellStatus, Position, Size, Word};
use crate::square::puzzle::PuzzleGrid;

/// The player's copy of a puzzle.
///
/// Owns every cell and is the only place cell state changes. Border words
/// are always read back out of the cells rather than stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    size: Size,
    cells: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RestoreError {
    #[error("expected {expected} cells, found {found}")]
    WrongCellCount { expected: usize, found: usize },

    #[error("cell at {0} does not belong there or is malformed")]
    BadCell(Position),

    #[error("answer is {found}x{found} but the grid is {expected}x{expected}")]
    WrongTargetSize { expected: Size, found: Size },

    #[error("cell at {0} is locked on a letter the answer doesn't have")]
    WrongLetter(Position),
}

impl GridModel {
    pub fn new(grid: &PuzzleGrid) -> Self {
        let size = grid.size();
        let n = size.len();

        let cells = (0..n)
            .flat_map(|row| (0..n).map(move |col| Position::new(row, col)))
            .map(|position| {
                if position.is_border(size) {
                    Cell::editable(position)
                } else {
                    // interior letters always exist in a generated grid
                    Cell::interior(position, grid.letter(position).unwrap_or(' '))
                }
            })
            .collect();

        Self { size, cells }
    }

    /// Resets this model to a fresh copy of `grid`.
    pub fn initialize(&mut self, grid: &PuzzleGrid) {
        *self = Self::new(grid);
    }

    /// Rebuilds a model from previously saved cells.
    pub fn restore(size: Size, cells: Vec<Cell>) -> Result<Self, RestoreError> {
        let n = size.len();
        if cells.len() != n * n {
            return Err(RestoreError::WrongCellCount {
                expected: n * n,
                found: cells.len(),
            });
        }

        for (index, cell) in cells.iter().enumerate() {
            let expected = Position::new(index / n, index % n);
            if cell.position() != expected || !cell.is_well_formed(size) {
                return Err(RestoreError::BadCell(expected));
            }
        }

        Ok(Self { size, cells })
    }

    /// Fails unless `target` fits this grid and every locked cell agrees
    /// with it.
    pub fn check_target(&self, target: &BorderWords) -> Result<(), RestoreError> {
        if target.size() != self.size {
            return Err(RestoreError::WrongTargetSize {
                expected: self.size,
                found: target.size(),
            });
        }

        match self
            .cells
            .iter()
            .filter(|cell| cell.is_correct())
            .find(|cell| cell.letter() != target.target_at(cell.position()))
        {
            Some(cell) => Err(RestoreError::WrongLetter(cell.position())),
            None => Ok(()),
        }
    }

    pub const fn size(&self) -> Size {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.len())
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index(position).map(|index| &self.cells[index])
    }

    fn index(&self, position: Position) -> Option<usize> {
        position
            .in_bounds(self.size)
            .then(|| position.row * self.size.len() + position.col)
    }

    fn cell_mut(&mut self, position: Position) -> Option<&mut Cell> {
        self.index(position).map(|index| &mut self.cells[index])
    }

    /// Puts `letter` in an editable cell. Anything else (interior, locked,
    /// out of range, not a letter) is ignored and reported as `false`.
    pub fn set_letter(&mut self, position: Position, letter: char) -> bool {
        let set = self
            .cell_mut(position)
            .map_or(false, |cell| cell.set(letter));

        if !set {
            trace!(%position, ?letter, "ignored letter");
        }

        set
    }

    pub fn clear_letter(&mut self, position: Position) -> bool {
        self.cell_mut(position).map_or(false, Cell::clear)
    }

    /// One edge as typed so far, blanks as spaces.
    pub fn border_line(&self, edge: BorderPosition) -> String {
        edge.positions(self.size)
            .map(|position| {
                self.cell(position)
                    .and_then(Cell::letter)
                    .unwrap_or(' ')
            })
            .collect()
    }

    /// The four edges read as words, or `None` while any border cell is
    /// blank.
    pub fn border_words(&self) -> Option<BorderWords> {
        if self.has_empty_editable_cells() {
            return None;
        }

        let [top, left, right, bottom] = BorderPosition::ALL.map(|edge| {
            Word::from_letters(
                edge.positions(self.size)
                    .filter_map(|position| self.cell(position).and_then(Cell::letter)),
            )
        });

        // corners are shared cells, so agreement holds by construction
        BorderWords::new(top.ok()?, left.ok()?, right.ok()?, bottom.ok()?).ok()
    }

    pub fn has_empty_editable_cells(&self) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.is_editable() && cell.is_empty())
    }

    /// Locks every editable cell that matches `target` and wipes the rest,
    /// remembering each wrong letter once. Returns how many cells became
    /// correct.
    pub fn mark_correctness(&mut self, target: &BorderWords) -> usize {
        let mut newly_correct = 0;

        for cell in self.cells.iter_mut().filter(|cell| cell.is_editable()) {
            let Some(expected) = target.target_at(cell.position()) else {
                continue;
            };

            if cell.mark(expected) {
                newly_correct += 1;
            }
        }

        trace!(newly_correct, "marked grid");

        newly_correct
    }

    pub fn is_complete(&self) -> bool {
        !self.cells.iter().any(Cell::is_editable)
    }

    pub fn correct_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_correct()).count()
    }

    pub fn status(&self, position: Position) -> Option<CellStatus> {
        self.cell(position).map(Cell::status)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{GridModel, RestoreError};
    use crate::square::{
        core::{BorderPosition, BorderWords, CellStatus, Position},
        puzzle::PuzzleGrid,
    };

    fn target() -> BorderWords {
        BorderWords::parse("word", "west", "dust", "tast").unwrap()
    }

    fn model() -> GridModel {
        GridModel::new(&PuzzleGrid::new(target(), |_| 'q', 7, false))
    }

    fn fill(model: &mut GridModel, words: &BorderWords) {
        for edge in BorderPosition::ALL {
            for (position, letter) in edge.positions(model.size()).zip(words.get(edge).iter()) {
                model.set_letter(position, *letter);
            }
        }
    }

    #[test]
    fn starts_blank() {
        let model = model();

        assert!(model.has_empty_editable_cells());
        assert!(!model.is_complete());
        assert_eq!(model.border_words(), None);
        assert_eq!(model.status(Position::new(1, 2)), Some(CellStatus::Interior));
        assert_eq!(
            model.cell(Position::new(2, 1)).and_then(|cell| cell.letter()),
            Some('Q')
        );
        assert_eq!(model.border_line(BorderPosition::Top), "    ");
    }

    #[test]
    fn all_correct_completes() {
        let mut model = model();
        fill(&mut model, &target());

        assert_eq!(model.border_words(), Some(target()));
        assert_eq!(model.mark_correctness(&target()), 12);
        assert!(model.is_complete());
    }

    #[test]
    fn completion_is_idempotent() {
        let mut model = model();
        fill(&mut model, &target());
        model.mark_correctness(&target());

        assert_eq!(model.mark_correctness(&target()), 0);
        assert!(model.is_complete());
        assert!(model.is_complete());
    }

    #[test]
    fn wrong_letters_are_wiped_and_remembered() {
        let mut model = model();
        let guess = BorderWords::parse("ward", "west", "dust", "test").unwrap();
        fill(&mut model, &guess);

        // A at (0,1) and E at (3,1) are wrong
        assert_eq!(model.mark_correctness(&target()), 10);

        let top = model.cell(Position::new(0, 1)).unwrap();
        assert!(top.is_empty());
        assert_eq!(top.attempts(), &['A']);

        let bottom = model.cell(Position::new(3, 1)).unwrap();
        assert_eq!(bottom.attempts(), &['E']);

        assert!(!model.is_complete());
        assert_eq!(model.border_line(BorderPosition::Top), "W RD");
    }

    #[test]
    fn correct_cells_never_change() {
        let mut model = model();
        fill(&mut model, &target());
        model.mark_correctness(&target());

        let corner = Position::new(0, 0);
        assert!(!model.set_letter(corner, 'z'));
        assert!(!model.clear_letter(corner));
        model.mark_correctness(&BorderWords::parse("zzzz", "zzzz", "zzzz", "zzzz").unwrap());

        let cell = model.cell(corner).unwrap();
        assert_eq!(cell.status(), CellStatus::Correct);
        assert_eq!(cell.letter(), Some('W'));
    }

    #[test]
    fn ignores_interior_and_out_of_range() {
        let mut model = model();
        assert!(!model.set_letter(Position::new(1, 1), 'a'));
        assert!(!model.set_letter(Position::new(9, 9), 'a'));
        assert!(!model.clear_letter(Position::new(9, 9)));
    }

    #[test]
    fn restore_round_trip() {
        let mut model = model();
        model.set_letter(Position::new(0, 0), 'w');

        let cells = model.cells().to_vec();
        let restored = GridModel::restore(model.size(), cells.clone()).unwrap();
        assert_eq!(restored, model);

        assert!(GridModel::restore(model.size(), cells[1..].to_vec()).is_err());

        let mut swapped = cells;
        swapped.swap(0, 5);
        assert!(GridModel::restore(model.size(), swapped).is_err());
    }

    #[test]
    fn target_must_agree_with_locked_cells() {
        let mut model = model();
        let guess = BorderWords::parse("ward", "west", "dust", "test").unwrap();
        fill(&mut model, &guess);
        model.mark_correctness(&target());

        assert_eq!(model.check_target(&target()), Ok(()));
        assert_eq!(
            model.check_target(&BorderWords::fallback(crate::Size::Five)),
            Err(RestoreError::WrongTargetSize {
                expected: crate::Size::Four,
                found: crate::Size::Five,
            })
        );

        // same corners, different letter where (0,2) is already locked on R
        let other = BorderWords::parse("wold", "west", "dust", "tast").unwrap();
        assert_eq!(
            model.check_target(&other),
            Err(RestoreError::WrongLetter(Position::new(0, 2)))
        );
    }

    #[test]
    fn initialize_resets() {
        let mut model = model();
        fill(&mut model, &target());
        model.mark_correctness(&target());

        model.initialize(&PuzzleGrid::new(BorderWords::fallback(crate::Size::Five), |_| 'z', 1, true));
        assert_eq!(model.size(), crate::Size::Five);
        assert_eq!(model.correct_count(), 0);
        assert!(model.has_empty_editable_cells());
    }
}
