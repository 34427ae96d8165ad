use std::fmt;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::Grid;
use crate::units::RowLength;

const CELL_BODY: &str = "   ";
const START_BODY: &str = " S ";
const END_BODY: &str = " E ";
const TREASURE_BODY: &str = " $ ";

impl Grid {
    /// The three characters drawn inside a cell. Start and end markers take precedence over the
    /// treasure.
    fn render_cell_body(&self, coord: Cartesian2DCoordinate) -> &'static str {
        if self.is_marking_start_end() && coord == self.start_marker() {
            START_BODY
        } else if self.is_marking_start_end() && coord == self.end_marker() {
            END_BODY
        } else if self.treasure() == Some(coord) {
            TREASURE_BODY
        } else {
            CELL_BODY
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {

        let RowLength(columns_count) = self.row_length();

        // Every cell draws its own East and South walls. The north boundary and the west
        // boundary of each row are drawn up front.
        let mut output = String::from("+");
        for _ in 0..columns_count {
            output.push_str("---+");
        }
        output.push('\n');

        for row in self.iter_row() {

            let mut row_middle_section_render = String::from("|");
            let mut row_bottom_section_render = String::from("+");

            for cell_coord in row {
                let wall = |direction| {
                    self.cell_at(cell_coord).map_or(true, |cell| cell.has_wall(direction))
                };

                row_middle_section_render.push_str(self.render_cell_body(cell_coord));
                row_middle_section_render.push_str(if wall(CompassPrimary::East) { "|" } else { " " });
                row_bottom_section_render.push_str(if wall(CompassPrimary::South) {
                    "---+"
                } else {
                    "   +"
                });
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}
