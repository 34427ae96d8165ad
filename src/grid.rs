use error_chain::bail;
use std::error;
use std::fmt;

use petgraph::algo::{connected_components, is_cyclic_undirected};
use petgraph::graph::{NodeIndex, UnGraph};
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, Cell, CompassPrimary};
use crate::errors::*;
use crate::units::{ColumnIndex, ColumnLength, RowIndex, RowLength};

/// Neighbouring cells paired with the direction taken to reach them, in
/// `CompassPrimary::SCAN_ORDER`.
pub type NeighbourSmallVec = SmallVec<[(CompassPrimary, Cartesian2DCoordinate); 4]>;

/// Which in-bounds neighbours `Grid::neighbours` reports.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum NeighbourFilter {
    All,
    /// Only neighbours that still have all four walls.
    Unvisited,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum WallError {
    InvalidGridCoordinate,
    NotAdjacent,
}

impl fmt::Display for WallError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            WallError::InvalidGridCoordinate => write!(f, "cell coordinate outside the grid"),
            WallError::NotAdjacent => write!(f, "cells are not adjacent in the given direction"),
        }
    }
}

impl error::Error for WallError {}

/// A rectangular grid of cells, stored row major and addressed by coordinate.
///
/// Created with every wall standing. Generators only ever knock walls down.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Grid {
    cells: Vec<Cell>,
    row_length: RowLength,
    column_length: ColumnLength,
    start: Cartesian2DCoordinate,
    mark_start_end: bool,
    treasure: Option<Cartesian2DCoordinate>,
}

impl Grid {
    /// A fully walled grid whose walk/growth start cell is the top left corner.
    pub fn new(row_length: RowLength, column_length: ColumnLength) -> Result<Grid> {
        Grid::with_start(row_length, column_length, Cartesian2DCoordinate::new(0, 0))
    }

    pub fn with_start(row_length: RowLength,
                      column_length: ColumnLength,
                      start: Cartesian2DCoordinate)
                      -> Result<Grid> {

        let (RowLength(width), ColumnLength(height)) = (row_length, column_length);
        if width == 0 || height == 0 || start.x >= width || start.y >= height {
            bail!(ErrorKind::InvalidDimensions(width, height, start));
        }

        let cells_count = width as usize * height as usize;
        let cells = (0..cells_count)
            .map(|index| Cell::new(Cartesian2DCoordinate::from_row_major_index(index, row_length)))
            .collect();

        Ok(Grid {
            cells,
            row_length,
            column_length,
            start,
            mark_start_end: false,
            treasure: None,
        })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn row_length(&self) -> RowLength {
        self.row_length
    }

    #[inline]
    pub fn column_length(&self) -> ColumnLength {
        self.column_length
    }

    /// Where walk based generators begin.
    #[inline]
    pub fn start(&self) -> Cartesian2DCoordinate {
        self.start
    }

    #[inline]
    pub fn center(&self) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(self.row_length.0 / 2, self.column_length.0 / 2)
    }

    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cartesian2DCoordinate {
        let x = rng.gen_range(0..self.row_length.0);
        let y = rng.gen_range(0..self.column_length.0);
        Cartesian2DCoordinate::new(x, y)
    }

    /// The cell at `coord`, or `None` when `coord` is outside the grid.
    #[inline]
    pub fn cell_at(&self, coord: Cartesian2DCoordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        coord.x < self.row_length.0 && coord.y < self.column_length.0
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.row_length.0 as usize + coord.x as usize)
        } else {
            None
        }
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Cartesian2DCoordinate,
                                  direction: CompassPrimary)
                                  -> Option<Cartesian2DCoordinate> {
        if !self.is_valid_coordinate(coord) {
            return None;
        }
        coord.offset(direction).filter(|neighbour| self.is_valid_coordinate(*neighbour))
    }

    /// Cells to the West, East, South and North of `coord` (in that order) that exist, whether or
    /// not a wall stands between them.
    pub fn neighbours(&self,
                      coord: Cartesian2DCoordinate,
                      filter: NeighbourFilter)
                      -> NeighbourSmallVec {
        CompassPrimary::SCAN_ORDER
            .iter()
            .filter_map(|&dir| {
                self.neighbour_at_direction(coord, dir).map(|neighbour| (dir, neighbour))
            })
            .filter(|&(_, neighbour)| match filter {
                NeighbourFilter::All => true,
                NeighbourFilter::Unvisited => self.has_all_walls(neighbour),
            })
            .collect()
    }

    /// Remove the wall between `a` and its neighbour `b` in `direction`, on both sides.
    ///
    /// Knocking down a wall that is already down changes nothing.
    pub fn knock_down_wall(&mut self,
                           a: Cartesian2DCoordinate,
                           b: Cartesian2DCoordinate,
                           direction: CompassPrimary)
                           -> ::std::result::Result<(), WallError> {

        let (a_index, b_index) = match (self.grid_coordinate_to_index(a),
                                        self.grid_coordinate_to_index(b)) {
            (Some(a_index), Some(b_index)) => (a_index, b_index),
            _ => return Err(WallError::InvalidGridCoordinate),
        };
        if self.neighbour_at_direction(a, direction) != Some(b) {
            return Err(WallError::NotAdjacent);
        }

        self.cells[a_index].remove_wall(direction);
        self.cells[b_index].remove_wall(direction.opposite());
        Ok(())
    }

    /// Does the cell still have all four walls? False for coordinates outside the grid.
    #[inline]
    pub fn has_all_walls(&self, coord: Cartesian2DCoordinate) -> bool {
        self.cell_at(coord).map_or(false, Cell::has_all_walls)
    }

    /// Is there an open passage from `coord` to the cell in `direction`?
    pub fn is_neighbour_linked(&self, coord: Cartesian2DCoordinate, direction: CompassPrimary) -> bool {
        self.neighbour_at_direction(coord, direction).is_some() &&
        self.cell_at(coord).map_or(false, |cell| !cell.has_wall(direction))
    }

    /// The first cell, in row major order, with a wall knocked down.
    pub fn first_opened_cell(&self) -> Option<Cartesian2DCoordinate> {
        self.cells
            .iter()
            .find(|cell| !cell.has_all_walls())
            .map(Cell::coordinate)
    }

    /// Coordinates of every cell, row by row.
    pub fn iter(&self) -> impl Iterator<Item = Cartesian2DCoordinate> + '_ {
        self.cells.iter().map(Cell::coordinate)
    }

    pub fn iter_row(&self) -> impl Iterator<Item = Vec<Cartesian2DCoordinate>> + '_ {
        let RowLength(width) = self.row_length;
        (0..self.column_length.0).map(move |y| {
            (0..width)
                .map(|x| Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(x), RowIndex(y)))
                .collect()
        })
    }

    /// Every knocked down wall exactly once, as the pair of cells it used to separate.
    ///
    /// Only South and East walls are looked at, so each passage shows up from one side.
    pub fn passages(&self) -> impl Iterator<Item = (Cartesian2DCoordinate, Cartesian2DCoordinate)> + '_ {
        self.iter().flat_map(move |coord| {
            [CompassPrimary::South, CompassPrimary::East]
                .iter()
                .filter(move |&&dir| self.is_neighbour_linked(coord, dir))
                .filter_map(move |&dir| self.neighbour_at_direction(coord, dir))
                .map(move |neighbour| (coord, neighbour))
                .collect::<SmallVec<[_; 2]>>()
        })
    }

    pub fn passages_count(&self) -> usize {
        self.passages().count()
    }

    /// The maze as an undirected graph: one node per cell, weighted by its coordinate and indexed
    /// row major, one edge per passage.
    pub fn passage_graph(&self) -> UnGraph<Cartesian2DCoordinate, ()> {
        let mut graph = UnGraph::with_capacity(self.size(), self.size().saturating_sub(1));
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.passages() {
            if let (Some(a_index), Some(b_index)) = (self.grid_coordinate_to_index(a),
                                                     self.grid_coordinate_to_index(b)) {
                let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
            }
        }
        graph
    }

    /// Do the passages form a spanning tree of the grid? Exactly `size - 1` passages, one
    /// connected component and no cycles.
    pub fn is_perfect_maze(&self) -> bool {
        let graph = self.passage_graph();
        graph.edge_count() == self.size() - 1 && connected_components(&graph) == 1 &&
        !is_cyclic_undirected(&graph)
    }

    #[inline]
    pub fn set_mark_start_end(&mut self, mark: bool) {
        self.mark_start_end = mark;
    }

    #[inline]
    pub fn is_marking_start_end(&self) -> bool {
        self.mark_start_end
    }

    /// The cell rendered as the maze entrance when start/end marking is on.
    #[inline]
    pub fn start_marker(&self) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(0, 0)
    }

    /// The cell rendered as the maze exit when start/end marking is on.
    #[inline]
    pub fn end_marker(&self) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(self.row_length.0 - 1, self.column_length.0 - 1)
    }

    #[inline]
    pub fn treasure(&self) -> Option<Cartesian2DCoordinate> {
        self.treasure
    }

    pub fn set_treasure(&mut self, treasure: Option<Cartesian2DCoordinate>) -> Result<()> {
        if let Some(coord) = treasure {
            if !self.is_valid_coordinate(coord) {
                bail!(ErrorKind::InvalidMarker(coord));
            }
        }
        self.treasure = treasure;
        Ok(())
    }

    pub fn place_treasure<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Cartesian2DCoordinate {
        let coord = self.random_cell(rng);
        self.treasure = Some(coord);
        coord
    }
}
