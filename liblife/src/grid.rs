use itertools::Itertools;
use rand::Rng;
use thiserror::Error;

use crate::cell::CellState;
use crate::pos::Position;
use crate::rule::Rule;

/// A write landed outside the field. Reads never produce this; out-of-bounds
/// reads are normalized to [`CellState::Empty`] instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cell ({x}, {y}) is outside the {width}x{height} field")]
pub struct OutOfBounds {
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
}

/// The simulation field: a rectangular grid of [`CellState`] with a
/// birth/survival [`Rule`].
///
/// The grid is a plain synchronous data structure. Callers that share it
/// across threads are responsible for exclusive access during mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifeGrid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
    rule: Rule,
}

/// How many collisions with already-alive cells a single random placement
/// attempt tolerates before it is abandoned.
const SEED_RETRY_LIMIT: usize = 10;

impl LifeGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_rule(width, height, Rule::default())
    }

    pub fn with_rule(width: usize, height: usize, rule: Rule) -> Self {
        Self {
            width,
            height,
            cells: vec![CellState::default(); width * height],
            rule,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Set the cell at `(x, y)`.
    ///
    /// Out-of-bounds coordinates are a caller bug (bad pixel math in a
    /// frontend, usually) and are reported together with the current bounds.
    pub fn place(&mut self, x: i32, y: i32, state: CellState) -> Result<(), OutOfBounds> {
        let index = self.checked_index(x, y).ok_or(OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        })?;

        self.cells[index] = state;
        Ok(())
    }

    /// Read the cell at `(x, y)`. Any coordinate outside the field reads as
    /// `Empty`, so neighbor counting needs no border special cases.
    pub fn get_cell(&self, x: i32, y: i32) -> CellState {
        self.checked_index(x, y)
            .map(|index| self.cells[index])
            .unwrap_or_default()
    }

    /// Grow the field to at least `width` x `height`, independently per
    /// axis. Existing cells keep their coordinates; new cells start `Empty`.
    /// An axis whose requested size is not larger than the current one is
    /// left untouched, so the field never shrinks and never loses state.
    pub fn resize(&mut self, width: usize, height: usize) {
        let new_width = width.max(self.width);
        let new_height = height.max(self.height);

        if new_width == self.width && new_height == self.height {
            return;
        }

        let mut cells = vec![CellState::default(); new_width * new_height];
        for (pos, state) in self.enumerate_cells() {
            cells[pos.x + pos.y * new_width] = state;
        }

        self.width = new_width;
        self.height = new_height;
        self.cells = cells;
    }

    /// Reset every cell to `Empty`.
    pub fn clear(&mut self) {
        self.cells.fill(CellState::Empty);
    }

    /// Seed roughly half the field with alive cells.
    ///
    /// Makes `width * height / 2 + 1` placement attempts at uniform random
    /// coordinates. An attempt that keeps hitting already-alive cells is
    /// abandoned after [`SEED_RETRY_LIMIT`] collisions, so the resulting
    /// occupancy is approximate, not exact.
    pub fn populate_randomly(&mut self) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        let rng = &mut rand::rng();

        for _ in 0..=self.width * self.height / 2 {
            let mut collisions = 0;

            loop {
                let x = rng.random_range(0..self.width);
                let y = rng.random_range(0..self.height);
                let index = x + y * self.width;

                if self.cells[index] != CellState::Alive {
                    self.cells[index] = CellState::Alive;
                    break;
                }

                collisions += 1;
                if collisions >= SEED_RETRY_LIMIT {
                    break;
                }
            }
        }
    }

    /// Advance the simulation by one generation.
    ///
    /// Two passes over the same storage: the mark pass turns dying cells
    /// `Dead` and newborn cells `Hatched`, the commit pass resolves the
    /// markers. `Dead` still counts as visible and `Hatched` does not, so
    /// the mark pass always sees pre-step liveness; no second buffer exists.
    pub fn next_generation(&mut self) {
        self.mark_hatched_and_dead();
        self.set_hatched_remove_dead();
    }

    fn mark_hatched_and_dead(&mut self) {
        for index in 0..self.cells.len() {
            let count = self.count_around(self.index_to_pos(index));

            if self.cells[index] == CellState::Alive {
                if !self.rule.survives(count) {
                    self.cells[index] = CellState::Dead;
                }
            } else if self.rule.births(count) {
                self.cells[index] = CellState::Hatched;
            }
        }
    }

    fn count_around(&self, pos: Position) -> usize {
        (-1..=1)
            .cartesian_product(-1..=1)
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .filter(|&(dx, dy)| {
                pos.offset(dx, dy)
                    .map(|neighbor| self.cell_at(neighbor).visible())
                    .unwrap_or(false)
            })
            .count()
    }

    fn set_hatched_remove_dead(&mut self) {
        for cell in &mut self.cells {
            *cell = match *cell {
                CellState::Hatched => CellState::Alive,
                CellState::Dead => CellState::Empty,
                other => other,
            };
        }
    }

    /// Row-major snapshot of the field. The snapshot is detached storage;
    /// treat it as read-only, mutations do not propagate back.
    pub fn field(&self) -> Vec<CellState> {
        self.cells.clone()
    }

    pub fn enumerate_cells(&self) -> impl Iterator<Item = (Position, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (self.index_to_pos(index), *cell))
    }

    fn cell_at(&self, pos: Position) -> CellState {
        self.pos_to_index(pos)
            .map(|index| self.cells[index])
            .unwrap_or_default()
    }

    fn checked_index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }

        self.pos_to_index(Position {
            x: x as usize,
            y: y as usize,
        })
    }

    fn pos_to_index(&self, pos: Position) -> Option<usize> {
        if pos.x >= self.width || pos.y >= self.height {
            return None;
        }

        Some(pos.x + pos.y * self.width)
    }

    fn index_to_pos(&self, index: usize) -> Position {
        Position {
            x: index % self.width,
            y: index / self.width,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alive_count(grid: &LifeGrid) -> usize {
        grid.enumerate_cells()
            .filter(|(_, cell)| *cell == CellState::Alive)
            .count()
    }

    #[test]
    fn place_then_get_round_trip() {
        let mut grid = LifeGrid::new(4, 3);
        grid.place(2, 1, CellState::Alive).unwrap();

        assert_eq!(grid.get_cell(2, 1), CellState::Alive);

        grid.place(2, 1, CellState::Empty).unwrap();
        assert_eq!(grid.get_cell(2, 1), CellState::Empty);
    }

    #[test]
    fn out_of_bounds_reads_are_empty() {
        let mut grid = LifeGrid::new(3, 3);
        grid.place(0, 0, CellState::Alive).unwrap();

        assert_eq!(grid.get_cell(-1, 0), CellState::Empty);
        assert_eq!(grid.get_cell(0, -1), CellState::Empty);
        assert_eq!(grid.get_cell(3, 0), CellState::Empty);
        assert_eq!(grid.get_cell(0, 3), CellState::Empty);
        assert_eq!(grid.get_cell(100, 100), CellState::Empty);
    }

    #[test]
    fn out_of_bounds_place_reports_coordinates_and_bounds() {
        let mut grid = LifeGrid::new(4, 3);

        let err = grid.place(-1, 5, CellState::Alive).unwrap_err();
        assert_eq!(
            err,
            OutOfBounds {
                x: -1,
                y: 5,
                width: 4,
                height: 3,
            }
        );

        // The failed write must not have touched anything.
        assert_eq!(alive_count(&grid), 0);
    }

    #[test]
    fn resize_is_a_noop_at_or_below_current_size() {
        let mut grid = LifeGrid::new(5, 5);
        grid.place(4, 4, CellState::Alive).unwrap();

        let before = grid.clone();
        grid.resize(5, 5);
        grid.resize(3, 2);

        assert_eq!(grid, before);
    }

    #[test]
    fn resize_preserves_cells_written_at_the_larger_size() {
        let mut grid = LifeGrid::new(4, 4);
        grid.resize(8, 8);
        grid.place(7, 7, CellState::Alive).unwrap();
        grid.place(1, 1, CellState::Alive).unwrap();

        // A later, smaller request must not erase anything.
        grid.resize(4, 4);

        assert_eq!(grid.width(), 8);
        assert_eq!(grid.height(), 8);
        assert_eq!(grid.get_cell(7, 7), CellState::Alive);
        assert_eq!(grid.get_cell(1, 1), CellState::Alive);
        assert_eq!(alive_count(&grid), 2);
    }

    #[test]
    fn resize_grows_each_axis_independently() {
        let mut grid = LifeGrid::new(4, 4);
        grid.place(3, 3, CellState::Alive).unwrap();

        grid.resize(6, 2);
        assert_eq!((grid.width(), grid.height()), (6, 4));

        grid.resize(2, 7);
        assert_eq!((grid.width(), grid.height()), (6, 7));

        assert_eq!(grid.get_cell(3, 3), CellState::Alive);
        assert_eq!(alive_count(&grid), 1);
    }

    #[test]
    fn lonely_cell_dies() {
        let mut grid = LifeGrid::new(3, 3);
        grid.place(1, 1, CellState::Alive).unwrap();

        grid.next_generation();

        for (_, cell) in grid.enumerate_cells() {
            assert_eq!(cell, CellState::Empty);
        }
    }

    #[test]
    fn block_is_a_still_life() {
        let mut grid = LifeGrid::new(4, 4);
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            grid.place(x, y, CellState::Alive).unwrap();
        }

        let before = grid.clone();
        grid.next_generation();

        assert_eq!(grid, before);
    }

    #[test]
    fn blinker_oscillates() {
        let mut grid = LifeGrid::new(3, 3);
        for y in 0..3 {
            grid.place(1, y, CellState::Alive).unwrap();
        }

        grid.next_generation();

        for x in 0..3 {
            assert_eq!(grid.get_cell(x, 1), CellState::Alive);
        }
        assert_eq!(alive_count(&grid), 3);

        grid.next_generation();

        for y in 0..3 {
            assert_eq!(grid.get_cell(1, y), CellState::Alive);
        }
        assert_eq!(alive_count(&grid), 3);
    }

    #[test]
    fn birth_needs_exactly_three_neighbors() {
        // Two neighbors: the empty cell between them stays empty.
        let mut grid = LifeGrid::new(5, 5);
        grid.place(1, 2, CellState::Alive).unwrap();
        grid.place(3, 2, CellState::Alive).unwrap();

        grid.next_generation();
        assert_eq!(grid.get_cell(2, 2), CellState::Empty);
    }

    #[test]
    fn transient_states_never_survive_a_generation() {
        let mut grid = LifeGrid::new(6, 6);
        grid.populate_randomly();

        for _ in 0..5 {
            grid.next_generation();
            for (_, cell) in grid.enumerate_cells() {
                assert!(matches!(cell, CellState::Empty | CellState::Alive));
            }
        }
    }

    #[test]
    fn populate_randomly_respects_the_attempt_budget() {
        let mut grid = LifeGrid::new(10, 10);
        grid.populate_randomly();

        let alive = alive_count(&grid);
        assert!(alive > 0);
        assert!(alive <= 10 * 10 / 2 + 1, "seeded {alive} cells");
    }

    #[test]
    fn populate_randomly_on_a_tiny_grid() {
        let mut grid = LifeGrid::new(1, 1);
        grid.populate_randomly();

        assert_eq!(grid.get_cell(0, 0), CellState::Alive);
    }

    #[test]
    fn field_snapshot_reflects_placements() {
        let mut grid = LifeGrid::new(3, 2);
        grid.place(2, 1, CellState::Alive).unwrap();

        let field = grid.field();
        assert_eq!(field.len(), 6);
        assert_eq!(field[2 + 3], CellState::Alive);

        // Detached storage: mutating the snapshot leaves the grid alone.
        let mut field = field;
        field[0] = CellState::Alive;
        assert_eq!(grid.get_cell(0, 0), CellState::Empty);
    }

    #[test]
    fn custom_rules_drive_the_generation_step() {
        // Nothing survives, nothing births: one step wipes the field.
        let rule = Rule {
            birth: vec![],
            survive: vec![],
        };

        let mut grid = LifeGrid::with_rule(4, 4, rule);
        for (x, y) in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            grid.place(x, y, CellState::Alive).unwrap();
        }

        grid.next_generation();
        assert_eq!(alive_count(&grid), 0);
    }

    #[test]
    fn clear_empties_the_field() {
        let mut grid = LifeGrid::new(4, 4);
        grid.populate_randomly();
        grid.clear();

        assert_eq!(alive_count(&grid), 0);
    }
}
