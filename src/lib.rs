//! **perfect_mazes** generates perfect mazes on rectangular grids.
//!
//! A perfect maze has exactly one path between any two cells: its passages form a spanning tree
//! of the grid. Six generators are provided: binary tree, Aldous-Broder, recursive backtracker,
//! simplified Prim's, cost based ("true") Prim's and Kruskal's. Mazes render as text through
//! `Display` or as SVG through `renderers`.

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod renderers;
pub mod units;
mod utils;
