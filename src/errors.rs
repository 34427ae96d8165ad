//! Crate wide `Error`, `ErrorKind`, `ResultExt` and `Result` types, created by `error_chain!`.
//!
//! Out of bounds coordinate lookups are not errors, they return `None`. Everything here is a
//! configuration problem found before generation starts, or a generator refusing to continue.

use error_chain::*;

use crate::cells::Cartesian2DCoordinate;

error_chain! {

    foreign_links {
        Wall(crate::grid::WallError);
    }

    errors {
        InvalidDimensions(width: u32, height: u32, start: Cartesian2DCoordinate) {
            description("invalid grid dimensions")
            display("a {}x{} grid starting at {} is not valid: width and height must be positive \
                     and the start cell must lie inside the grid", width, height, start)
        }

        PreconditionViolation(coord: Cartesian2DCoordinate) {
            description("grid is not fully walled")
            display("maze generation needs a fully walled grid, but cell {} has a missing wall",
                    coord)
        }

        DidNotConverge(steps: u64, visited: usize, total: usize) {
            description("random walk did not visit every cell")
            display("random walk stopped after {} steps having visited {} of {} cells",
                    steps, visited, total)
        }

        InvalidBias(reason: String) {
            description("invalid binary tree bias")
            display("invalid binary tree bias: {}", reason)
        }

        InvalidMarker(coord: Cartesian2DCoordinate) {
            description("marker outside the grid")
            display("cannot place a marker at {}, it is outside the grid", coord)
        }
    }
}
