use docopt::Docopt;
use log::{debug, info};
use perfect_mazes::{
    cells::Cartesian2DCoordinate,
    generators::{self, BinaryTreeBias, GenerationOptions, GeneratorKind},
    grid::Grid,
    renderers::{self, SvgOptionsBuilder},
    units::{ColumnLength, RowLength},
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde_derive::Deserialize;
use std::{
    fs::File,
    io::prelude::*,
};

const USAGE: &str = "Perfect Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver (binary|aldous-broder|recursive-backtracker|simplified-prims|true-prims|kruskals) [(--grid-size=<n>|[--grid-width=<w> --grid-height=<h>])] [--start-x=<x> --start-y=<y>] [--center] [--seed=<s>] [--iteration-cap=<n>] [--south-weight=<p> --east-weight=<q>] [--text-out=<path>] [--svg-out=<path> --svg-height=<px>] [--mark-start-end] [--treasure] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --grid-width=<w>       The grid width in a w*h grid [default: 20].
    --grid-height=<h>      The grid height in a w*h grid [default: 20].
    --start-x=<x>          x coordinate of the cell aldous-broder and recursive-backtracker start from [default: 0].
    --start-y=<y>          y coordinate of the cell aldous-broder and recursive-backtracker start from [default: 0].
    --center               Prim's generators grow from the grid center instead of a random cell.
    --seed=<s>             Seed for the random number generator. A random seed is chosen and logged if not given.
    --iteration-cap=<n>    Give up the aldous-broder random walk after n steps.
    --south-weight=<p>     Binary tree: relative chance of carving south [default: 0.5].
    --east-weight=<q>      Binary tree: relative chance of carving east [default: 0.5].
    --text-out=<path>      Output file path for a textual rendering of the maze. Printed to stdout unless an svg is requested.
    --svg-out=<path>       Output file path for an SVG rendering of the maze.
    --svg-height=<px>      Height of the SVG maze in pixels, excluding padding [default: 500].
    --mark-start-end       Mark the top left (start) and bottom right (end) cells.
    --treasure             Place a treasure on a random cell.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_binary: bool,
    cmd_aldous_broder: bool,
    cmd_recursive_backtracker: bool,
    cmd_simplified_prims: bool,
    cmd_true_prims: bool,
    cmd_kruskals: bool,
    flag_grid_size: Option<u32>,
    flag_grid_width: u32,
    flag_grid_height: u32,
    flag_start_x: u32,
    flag_start_y: u32,
    flag_center: bool,
    flag_seed: Option<u64>,
    flag_iteration_cap: Option<u64>,
    flag_south_weight: f64,
    flag_east_weight: f64,
    flag_text_out: String,
    flag_svg_out: String,
    flag_svg_height: u32,
    flag_mark_start_end: bool,
    flag_treasure: bool,
    flag_save_edges: String,
}

impl MazeArgs {
    fn generator_kind(&self) -> GeneratorKind {
        if self.cmd_binary {
            GeneratorKind::BinaryTree
        } else if self.cmd_aldous_broder {
            GeneratorKind::AldousBroder
        } else if self.cmd_recursive_backtracker {
            GeneratorKind::RecursiveBacktracker
        } else if self.cmd_simplified_prims {
            GeneratorKind::SimplifiedPrims
        } else if self.cmd_true_prims {
            GeneratorKind::TruePrims
        } else {
            GeneratorKind::Kruskals
        }
    }
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::perfect_mazes::errors::Error, ::perfect_mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    env_logger::init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };

    let seed = args.flag_seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("maze seed {}", seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut maze_grid = Grid::with_start(RowLength(width),
                                         ColumnLength(height),
                                         Cartesian2DCoordinate::from((args.flag_start_x,
                                                                      args.flag_start_y)))?;

    let options = generation_options(&args)?;
    let kind = args.generator_kind();
    generators::generate(kind, &mut maze_grid, &mut rng, &options)?;
    debug!("{} carved {} passages", kind, maze_grid.passages_count());

    maze_grid.set_mark_start_end(args.flag_mark_start_end);
    if args.flag_treasure {
        let treasure = maze_grid.place_treasure(&mut rng);
        debug!("treasure at {}", treasure);
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
    }

    if !args.flag_text_out.is_empty() {
        write_text_to_file(&format!("{}", maze_grid), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    } else if args.flag_svg_out.is_empty() {
        print!("{}", maze_grid);
    }

    if !args.flag_svg_out.is_empty() {
        let svg_options = SvgOptionsBuilder::new().height(args.flag_svg_height).build();
        renderers::save_svg(&maze_grid, &svg_options, &args.flag_svg_out)?;
    }

    Ok(())
}

fn generation_options(args: &MazeArgs) -> Result<GenerationOptions> {
    let bias = BinaryTreeBias::default().with_weights(args.flag_south_weight, args.flag_east_weight)?;
    Ok(GenerationOptions {
        bias,
        start_at_center: args.flag_center,
        iteration_cap: args.flag_iteration_cap,
    })
}

fn write_text_to_file(data: &str, file_name: &str) -> ::std::io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &Grid, file_path: &str) -> Result<()> {
    let mut graph_data = Vec::new();
    renderers::write_edge_list(maze_grid, &mut graph_data)?;
    File::create(file_path)
        .and_then(|mut f| f.write_all(&graph_data))
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;
    Ok(())
}
