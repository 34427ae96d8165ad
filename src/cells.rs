use std::convert::From;
use std::fmt;

use crate::units::{ColumnIndex, RowIndex, RowLength};

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, row_length: RowLength) -> Cartesian2DCoordinate {
        let RowLength(width) = row_length;
        let x = index % width as usize;
        let y = index / width as usize;

        Cartesian2DCoordinate::new(x as u32, y as u32)
    }

    #[inline]
    pub fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        Cartesian2DCoordinate::new(col, row)
    }

    /// The coordinate one cell away in `direction`, ignoring any grid bounds except that
    /// coordinates never go negative.
    #[inline]
    pub fn offset(&self, direction: CompassPrimary) -> Option<Cartesian2DCoordinate> {
        let (x, y) = (self.x, self.y);
        match direction {
            CompassPrimary::North => y.checked_sub(1).map(|y| Cartesian2DCoordinate::new(x, y)),
            CompassPrimary::South => y.checked_add(1).map(|y| Cartesian2DCoordinate::new(x, y)),
            CompassPrimary::East => x.checked_add(1).map(|x| Cartesian2DCoordinate::new(x, y)),
            CompassPrimary::West => x.checked_sub(1).map(|x| Cartesian2DCoordinate::new(x, y)),
        }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for Cartesian2DCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    /// Neighbour scan order shared by every generator. Tie-breaks in the cost based
    /// Prim's generator depend on it, so it must not change.
    pub const SCAN_ORDER: [CompassPrimary; 4] = [CompassPrimary::West,
                                                 CompassPrimary::East,
                                                 CompassPrimary::South,
                                                 CompassPrimary::North];

    /// The wall pair: the same wall seen from the cell on the other side.
    #[inline]
    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        match self {
            CompassPrimary::North | CompassPrimary::South => true,
            CompassPrimary::East | CompassPrimary::West => false,
        }
    }

    #[inline]
    fn wall_index(self) -> usize {
        match self {
            CompassPrimary::North => 0,
            CompassPrimary::South => 1,
            CompassPrimary::East => 2,
            CompassPrimary::West => 3,
        }
    }
}

/// A grid cell and its four walls.
///
/// Cells hold no references to their neighbours, adjacency comes from the owning `Grid`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Cell {
    coordinate: Cartesian2DCoordinate,
    walls: [bool; 4],
}

impl Cell {
    pub fn new(coordinate: Cartesian2DCoordinate) -> Cell {
        Cell {
            coordinate,
            walls: [true; 4],
        }
    }

    #[inline]
    pub fn coordinate(&self) -> Cartesian2DCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn has_wall(&self, direction: CompassPrimary) -> bool {
        self.walls[direction.wall_index()]
    }

    /// True until the first wall of the cell is knocked down.
    ///
    /// Generators treat this as the definition of "unvisited". Walls are never rebuilt, so a
    /// cell is visited from the moment its first wall goes.
    #[inline]
    pub fn has_all_walls(&self) -> bool {
        self.walls.iter().all(|&wall| wall)
    }

    #[inline]
    pub(crate) fn remove_wall(&mut self, direction: CompassPrimary) {
        self.walls[direction.wall_index()] = false;
    }
}
