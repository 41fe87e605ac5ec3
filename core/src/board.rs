// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board graph construction and neighbor queries

use crate::{
    cell::{Cell, CellId, Direction},
    Dimensions, GameError, Position,
};

/// Builds a board one row at a time
///
/// Each pushed row is linked left/right internally and cross-linked with the
/// row above it (straight and diagonal), so the graph is fully resolved once
/// the last row is in.
pub struct BoardBuilder {
    dims: Dimensions,
    cells: Vec<Cell>,
    rows: u8,
}

impl BoardBuilder {
    /// Start an empty board; `Dimensions` are non-zero by construction
    pub fn new(dims: Dimensions) -> Self {
        Self {
            dims,
            cells: Vec::with_capacity(dims.cell_count()),
            rows: 0,
        }
    }

    /// Number of rows pushed so far
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Allocate and link the next row, returning the new cell ids
    pub fn push_row(&mut self) -> Result<Vec<CellId>, GameError> {
        if self.rows == self.dims.height() {
            return Err(self.dimension_error());
        }

        let row = self.rows;
        let width = self.dims.width() as usize;
        let start = self.cells.len();
        let edge_row = row == 0 || row == self.dims.height() - 1;

        for col in 0..self.dims.width() {
            let id = CellId(self.cells.len());
            self.cells.push(Cell::new(id, Position::new(row, col), edge_row));
        }

        for col in 1..width {
            self.link(start + col - 1, Direction::RIGHT, start + col);
        }

        if row > 0 {
            let above = start - width;
            for col in 0..width {
                let below = start + col;
                self.link(below, Direction::TOP, above + col);
                if col > 0 {
                    self.link(below, Direction::TOP_LEFT, above + col - 1);
                }
                if col + 1 < width {
                    self.link(below, Direction::TOP_RIGHT, above + col + 1);
                }
            }
        }

        self.rows += 1;
        tracing::trace!(row, cells = width, "Linked board row");
        Ok((start..start + width).map(CellId).collect())
    }

    /// Hand out the graph once every row has been pushed
    pub fn finish(self) -> Result<BoardGraph, GameError> {
        if self.rows != self.dims.height() {
            return Err(self.dimension_error());
        }
        Ok(BoardGraph {
            dims: self.dims,
            cells: self.cells,
        })
    }

    // Links are always written in pairs so the graph stays symmetric.
    fn link(&mut self, from: usize, dir: Direction, to: usize) {
        self.cells[from].neighbors.set(dir, CellId(to));
        self.cells[to].neighbors.set(dir.opposite(), CellId(from));
    }

    fn dimension_error(&self) -> GameError {
        GameError::InvalidDimensions {
            width: self.dims.width(),
            height: self.rows,
        }
    }
}

/// All cells of a board, row-major, with resolved neighbor links
#[derive(Debug, Clone)]
pub struct BoardGraph {
    dims: Dimensions,
    cells: Vec<Cell>,
}

impl BoardGraph {
    /// Build a width x height board
    pub fn build(width: u8, height: u8) -> Result<Self, GameError> {
        let dims = Dimensions::new(width, height)?;
        let mut builder = BoardBuilder::new(dims);
        for _ in 0..height {
            builder.push_row()?;
        }
        builder.finish()
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// Number of cells on the board
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Look up a cell by identifier
    pub fn cell(&self, id: CellId) -> Result<&Cell, GameError> {
        self.cells.get(id.0).ok_or(GameError::UnknownCell(id))
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> Result<&mut Cell, GameError> {
        self.cells.get_mut(id.0).ok_or(GameError::UnknownCell(id))
    }

    /// Identifier of the cell at a position
    pub fn id_at(&self, pos: Position) -> Result<CellId, GameError> {
        if !pos.is_valid(self.dims) {
            return Err(GameError::OutOfBounds(pos));
        }
        Ok(CellId(self.position_to_index(pos)))
    }

    /// Look up a cell by position
    pub fn cell_at(&self, pos: Position) -> Result<&Cell, GameError> {
        let id = self.id_at(pos)?;
        self.cell(id)
    }

    /// Neighbor of a cell in one direction
    pub fn neighbor(&self, id: CellId, dir: Direction) -> Result<Option<CellId>, GameError> {
        Ok(self.cell(id)?.neighbors.get(dir))
    }

    /// Every neighbor of a cell (up to eight)
    pub fn neighbors(&self, id: CellId) -> Result<Vec<CellId>, GameError> {
        Ok(self.cell(id)?.neighbors.iter().map(|(_, n)| n).collect())
    }

    /// Cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    /// Rows of cells, first row first
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.dims.width() as usize)
    }

    /// Cells currently flagged as selected
    pub fn selected_cells(&self) -> Vec<CellId> {
        self.cells
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.id())
            .collect()
    }

    fn position_to_index(&self, pos: Position) -> usize {
        (pos.row as usize) * (self.dims.width() as usize) + (pos.col as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_row_major_order() {
        let board = BoardGraph::build(3, 2).unwrap();
        let ids: Vec<usize> = board.cells().map(|c| c.id().index()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(board.cell_at(Position::new(1, 0)).unwrap().id(), CellId(3));
    }

    #[test]
    fn builder_rejects_extra_and_missing_rows() {
        let dims = Dimensions::new(2, 2).unwrap();
        let mut builder = BoardBuilder::new(dims);
        builder.push_row().unwrap();
        let mut partial = BoardBuilder::new(dims);
        partial.push_row().unwrap();
        assert!(matches!(partial.finish(), Err(GameError::InvalidDimensions { .. })));

        builder.push_row().unwrap();
        assert!(builder.push_row().is_err());
        assert_eq!(builder.finish().unwrap().len(), 4);
    }

    #[test]
    fn cross_row_links_appear_when_next_row_is_pushed() {
        let mut builder = BoardBuilder::new(Dimensions::new(3, 3).unwrap());
        let first = builder.push_row().unwrap();
        let second = builder.push_row().unwrap();
        builder.push_row().unwrap();
        let board = builder.finish().unwrap();

        assert_eq!(board.neighbor(first[1], Direction::BOTTOM).unwrap(), Some(second[1]));
        assert_eq!(board.neighbor(first[1], Direction::BOTTOM_LEFT).unwrap(), Some(second[0]));
        assert_eq!(board.neighbor(second[2], Direction::TOP_LEFT).unwrap(), Some(first[1]));
    }

    #[test]
    fn edge_rows_are_flagged() {
        let board = BoardGraph::build(2, 4).unwrap();
        let flags: Vec<bool> = board.rows().map(|r| r[0].is_edge_row()).collect();
        assert_eq!(flags, vec![true, false, false, true]);
    }

    #[test]
    fn builder_only_sees_non_empty_dimensions() {
        // zero-sized dimensions never reach the builder
        assert!(Dimensions::new(0, 1).is_err());
        assert!(Dimensions::new(1, 0).is_err());

        let mut builder = BoardBuilder::new(Dimensions::new(1, 1).unwrap());
        builder.push_row().unwrap();
        let board = builder.finish().unwrap();
        assert_eq!(board.rows().count(), 1);
        assert_eq!(board.dimensions().width(), 1);
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        let board = BoardGraph::build(1, 1).unwrap();
        assert!(board.neighbors(CellId(0)).unwrap().is_empty());
    }

    #[test]
    fn lookups_out_of_range_fail() {
        let board = BoardGraph::build(2, 2).unwrap();
        assert_eq!(board.cell(CellId(4)).err(), Some(GameError::UnknownCell(CellId(4))));
        assert!(matches!(board.cell_at(Position::new(2, 0)), Err(GameError::OutOfBounds(_))));
    }
}
