//! Cursor movement over the border cells.
//!
//! The traversal order is fixed: the top row left to right, down the right
//! column, down the left column, then the inside of the bottom row. Every
//! border cell appears exactly once.

use super::{GridModel, Position, Size};

pub fn ordered_editable_positions(size: Size) -> Vec<Position> {
    let n = size.len();
    let last = n - 1;

    let top = (0..n).map(|col| Position::new(0, col));
    let right = (1..n).map(|row| Position::new(row, last));
    let left = (1..n).map(|row| Position::new(row, 0));
    let bottom = (1..last).map(|col| Position::new(last, col));

    top.chain(right).chain(left).chain(bottom).collect()
}

/// Walks the border of a grid, skipping cells that are already locked in.
#[derive(Debug, Clone)]
pub struct NavigationCursor {
    order: Vec<Position>,
}

impl NavigationCursor {
    pub fn new(size: Size) -> Self {
        Self {
            order: ordered_editable_positions(size),
        }
    }

    pub fn order(&self) -> &[Position] {
        &self.order
    }

    fn is_open(grid: &GridModel, position: Position) -> bool {
        grid.cell(position).is_some_and(|cell| cell.is_editable())
    }

    pub fn find_first(&self, grid: &GridModel) -> Option<Position> {
        self.order
            .iter()
            .copied()
            .find(|position| Self::is_open(grid, *position))
    }

    /// The next open cell after `current`, wrapping around. A `current` off
    /// the border starts from the beginning.
    pub fn find_next(&self, grid: &GridModel, current: Position) -> Option<Position> {
        let Some(start) = self.order.iter().position(|p| *p == current) else {
            return self.find_first(grid);
        };

        let len = self.order.len();
        (1..=len)
            .map(|offset| self.order[(start + offset) % len])
            .find(|position| Self::is_open(grid, *position))
    }

    pub fn find_previous(&self, grid: &GridModel, current: Position) -> Option<Position> {
        let Some(start) = self.order.iter().position(|p| *p == current) else {
            return self.find_first(grid);
        };

        let len = self.order.len();
        (1..=len)
            .map(|offset| self.order[(start + len - offset) % len])
            .find(|position| Self::is_open(grid, *position))
    }
}
