use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use log::debug;
use petgraph::visit::EdgeRef;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::errors::*;
use crate::grid::Grid;
use crate::units::{ColumnLength, RowLength};

const MARKER_INSET: f64 = 5.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SvgOptions {
    height: u32,
    padding: u32,
    stroke_width: u32,
}

impl SvgOptions {
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn padding(&self) -> u32 {
        self.padding
    }

    #[inline]
    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }
}

impl Default for SvgOptions {
    fn default() -> SvgOptions {
        SvgOptions {
            height: 500,
            padding: 10,
            stroke_width: 5,
        }
    }
}

#[derive(Debug)]
pub struct SvgOptionsBuilder {
    options: SvgOptions,
}

impl SvgOptionsBuilder {
    pub fn new() -> SvgOptionsBuilder {
        SvgOptionsBuilder { options: SvgOptions::default() }
    }

    /// Height of the maze in pixels, excluding padding. The width follows from the grid's
    /// aspect ratio.
    pub fn height(mut self, height: u32) -> SvgOptionsBuilder {
        self.options.height = height;
        self
    }

    pub fn padding(mut self, padding: u32) -> SvgOptionsBuilder {
        self.options.padding = padding;
        self
    }

    pub fn stroke_width(mut self, stroke_width: u32) -> SvgOptionsBuilder {
        self.options.stroke_width = stroke_width;
        self
    }

    pub fn build(self) -> SvgOptions {
        self.options
    }
}

impl Default for SvgOptionsBuilder {
    fn default() -> SvgOptionsBuilder {
        SvgOptionsBuilder::new()
    }
}

/// Maps grid coordinates onto image coordinates.
struct Scale {
    width: u32,
    height: u32,
    x: f64,
    y: f64,
}

impl Scale {
    fn new(grid: &Grid, options: &SvgOptions) -> Scale {
        let (RowLength(columns), ColumnLength(rows)) = (grid.row_length(), grid.column_length());
        let height = options.height;
        let width = (f64::from(height) * f64::from(columns) / f64::from(rows)) as u32;
        Scale {
            width,
            height,
            x: f64::from(width) / f64::from(columns),
            y: f64::from(height) / f64::from(rows),
        }
    }
}

fn write_wall<W: Write>(out: &mut W, x1: f64, y1: f64, x2: f64, y2: f64) -> io::Result<()> {
    writeln!(out, r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#, x1, y1, x2, y2)
}

fn write_cell_rect<W: Write>(out: &mut W,
                             scale: &Scale,
                             coord: Cartesian2DCoordinate,
                             colour: &str)
                             -> io::Result<()> {
    writeln!(out,
             r#"<rect x="{}" y="{}" width="{}" height="{}" style="fill:{}" />"#,
             scale.x * f64::from(coord.x) + MARKER_INSET,
             scale.y * f64::from(coord.y) + MARKER_INSET,
             scale.x - 2.0 * MARKER_INSET,
             scale.y - 2.0 * MARKER_INSET,
             colour)
}

/// Write the maze as an SVG image.
///
/// Each cell draws its South and East walls, then the North and West border is drawn as two
/// lines. Start/end markers are green and red, the treasure is yellow.
pub fn write_svg<W: Write>(grid: &Grid, options: &SvgOptions, out: &mut W) -> io::Result<()> {

    let scale = Scale::new(grid, options);
    let padding = options.padding;
    let (full_width, full_height) = (scale.width + 2 * padding, scale.height + 2 * padding);

    writeln!(out, r#"<?xml version="1.0" encoding="utf-8"?>"#)?;
    writeln!(out, r#"<svg xmlns="http://www.w3.org/2000/svg""#)?;
    writeln!(out, r#"    xmlns:xlink="http://www.w3.org/1999/xlink""#)?;
    writeln!(out,
             r#"    width="{}" height="{}" viewBox="-{} -{} {} {}">"#,
             full_width,
             full_height,
             padding,
             padding,
             full_width,
             full_height)?;
    writeln!(out, r#"<defs>"#)?;
    writeln!(out, r#"<style type="text/css"><![CDATA["#)?;
    writeln!(out, "line {{")?;
    writeln!(out, "    stroke: #000000;")?;
    writeln!(out, "    stroke-linecap: square;")?;
    writeln!(out, "    stroke-width: {};", options.stroke_width)?;
    writeln!(out, "}}")?;
    writeln!(out, "]]></style>")?;
    writeln!(out, "</defs>")?;

    for coord in grid.iter() {
        let cell = match grid.cell_at(coord) {
            Some(cell) => cell,
            None => continue,
        };
        let (x, y) = (f64::from(coord.x), f64::from(coord.y));

        if cell.has_wall(CompassPrimary::South) {
            write_wall(out,
                       x * scale.x,
                       (y + 1.0) * scale.y,
                       (x + 1.0) * scale.x,
                       (y + 1.0) * scale.y)?;
        }
        if cell.has_wall(CompassPrimary::East) {
            write_wall(out,
                       (x + 1.0) * scale.x,
                       y * scale.y,
                       (x + 1.0) * scale.x,
                       (y + 1.0) * scale.y)?;
        }
    }

    write_wall(out, 0.0, 0.0, f64::from(scale.width), 0.0)?;
    write_wall(out, 0.0, 0.0, 0.0, f64::from(scale.height))?;

    if grid.is_marking_start_end() {
        write_cell_rect(out, &scale, grid.start_marker(), "green")?;
        write_cell_rect(out, &scale, grid.end_marker(), "red")?;
    }
    if let Some(treasure) = grid.treasure() {
        write_cell_rect(out, &scale, treasure, "yellow")?;
    }

    writeln!(out, "</svg>")
}

pub fn save_svg<P: AsRef<Path>>(grid: &Grid, options: &SvgOptions, path: P) -> Result<()> {
    let path = path.as_ref();
    debug!("writing svg to {}", path.display());

    let file = File::create(path)
        .chain_err(|| format!("Failed to create svg file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_svg(grid, options, &mut out)
        .and_then(|_| out.flush())
        .chain_err(|| format!("Failed to write svg file {}", path.display()))?;
    Ok(())
}

/// Write the maze as a plain edge list: `vertices edges` on the first line, then one line per
/// passage holding the 1-based, row major indices of the two cells it joins.
pub fn write_edge_list<W: Write>(grid: &Grid, out: &mut W) -> io::Result<()> {
    let graph = grid.passage_graph();
    writeln!(out, "{} {}", graph.node_count(), graph.edge_count())?;
    for edge in graph.edge_references() {
        writeln!(out, "{} {}", edge.source().index() + 1, edge.target().index() + 1)?;
    }
    Ok(())
}
