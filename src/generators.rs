//! Perfect maze generators.
//!
//! Every generator takes a fully walled `Grid` and knocks walls down until the passages form a
//! spanning tree of the grid: every cell reachable from every other by exactly one path.
//! Randomness always comes from the caller's `Rng`, so a seeded source reproduces a maze exactly.
//!
//! A grid that already has a wall missing is rejected with `ErrorKind::PreconditionViolation`.
//! "Unvisited" means `has_all_walls` throughout.

use std::fmt;

use error_chain::bail;
use itertools::Itertools;
use log::{debug, info, trace, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::errors::*;
use crate::grid::{Grid, NeighbourFilter};
use crate::units::{Cost, RowLength};
use crate::utils::{self, FnvHashMap};

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum GeneratorKind {
    BinaryTree,
    AldousBroder,
    RecursiveBacktracker,
    SimplifiedPrims,
    TruePrims,
    Kruskals,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 6] = [GeneratorKind::BinaryTree,
                                         GeneratorKind::AldousBroder,
                                         GeneratorKind::RecursiveBacktracker,
                                         GeneratorKind::SimplifiedPrims,
                                         GeneratorKind::TruePrims,
                                         GeneratorKind::Kruskals];

    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::BinaryTree => "binary-tree",
            GeneratorKind::AldousBroder => "aldous-broder",
            GeneratorKind::RecursiveBacktracker => "recursive-backtracker",
            GeneratorKind::SimplifiedPrims => "simplified-prims",
            GeneratorKind::TruePrims => "true-prims",
            GeneratorKind::Kruskals => "kruskals",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The two perpendicular directions the binary tree generator carves in, and how strongly it
/// favours each one.
///
/// Only a vertical/horizontal pair is accepted. Any such pair leaves exactly one corner cell with
/// nowhere to carve and every other cell with one passage towards that corner, which is what makes
/// the result a spanning tree.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct BinaryTreeBias {
    vertical: CompassPrimary,
    horizontal: CompassPrimary,
    vertical_weight: f64,
    horizontal_weight: f64,
}

impl BinaryTreeBias {
    pub fn new(vertical: CompassPrimary, horizontal: CompassPrimary) -> Result<BinaryTreeBias> {
        if !vertical.is_vertical() {
            bail!(ErrorKind::InvalidBias(format!("{:?} is not North or South", vertical)));
        }
        if horizontal.is_vertical() {
            bail!(ErrorKind::InvalidBias(format!("{:?} is not East or West", horizontal)));
        }
        Ok(BinaryTreeBias {
            vertical,
            horizontal,
            vertical_weight: 0.5,
            horizontal_weight: 0.5,
        })
    }

    /// Relative chance of carving vertically vs horizontally when a cell could do either.
    ///
    /// A cell that can only carve one way always does, even if that direction's weight is zero.
    pub fn with_weights(self, vertical_weight: f64, horizontal_weight: f64) -> Result<BinaryTreeBias> {
        for &weight in &[vertical_weight, horizontal_weight] {
            if !weight.is_finite() || weight < 0.0 {
                bail!(ErrorKind::InvalidBias(format!("weight {} must be finite and non-negative",
                                                     weight)));
            }
        }
        if !(vertical_weight + horizontal_weight).is_finite() {
            bail!(ErrorKind::InvalidBias(format!("weights {} and {} overflow when summed",
                                                 vertical_weight,
                                                 horizontal_weight)));
        }
        Ok(BinaryTreeBias {
            vertical_weight,
            horizontal_weight,
            ..self
        })
    }

    #[inline]
    pub fn directions(&self) -> [CompassPrimary; 2] {
        [self.vertical, self.horizontal]
    }

    pub fn weight(&self, direction: CompassPrimary) -> f64 {
        if direction == self.vertical {
            self.vertical_weight
        } else if direction == self.horizontal {
            self.horizontal_weight
        } else {
            0.0
        }
    }
}

impl Default for BinaryTreeBias {
    fn default() -> BinaryTreeBias {
        BinaryTreeBias {
            vertical: CompassPrimary::South,
            horizontal: CompassPrimary::East,
            vertical_weight: 0.5,
            horizontal_weight: 0.5,
        }
    }
}

/// Per generator settings. Generators ignore the fields that do not concern them.
#[derive(PartialEq, Copy, Clone, Debug, Default)]
pub struct GenerationOptions {
    /// Binary tree only.
    pub bias: BinaryTreeBias,
    /// Prim's generators only: grow from the grid center instead of a random cell.
    pub start_at_center: bool,
    /// Aldous-Broder only: give up after this many steps of the walk.
    pub iteration_cap: Option<u64>,
}

/// Run the generator `kind` over `grid`.
pub fn generate<R>(kind: GeneratorKind,
                   grid: &mut Grid,
                   rng: &mut R,
                   options: &GenerationOptions)
                   -> Result<()>
    where R: Rng + ?Sized
{
    debug!("generating a {}x{} maze with {}",
           grid.row_length().0,
           grid.column_length().0,
           kind);

    match kind {
        GeneratorKind::BinaryTree => binary_tree(grid, rng, &options.bias),
        GeneratorKind::AldousBroder => aldous_broder(grid, rng, options.iteration_cap),
        GeneratorKind::RecursiveBacktracker => recursive_backtracker(grid, rng),
        GeneratorKind::SimplifiedPrims => simplified_prims(grid, rng, options.start_at_center),
        GeneratorKind::TruePrims => true_prims(grid, rng, options.start_at_center),
        GeneratorKind::Kruskals => kruskals(grid, rng),
    }
}

fn ensure_fully_walled(grid: &Grid) -> Result<()> {
    if let Some(coord) = grid.first_opened_cell() {
        bail!(ErrorKind::PreconditionViolation(coord));
    }
    Ok(())
}

/// Apply the binary tree maze generation algorithm to a grid
/// It works simply by visiting each cell in the grid and choosing to carve a passage
/// in one of two perpendicular directions, picked according to the bias weights.
/// The two directions are constant for the entire run, otherwise we would wall off areas
/// with no way in or out and not generate a perfect maze.
pub fn binary_tree<R>(grid: &mut Grid, rng: &mut R, bias: &BinaryTreeBias) -> Result<()>
    where R: Rng + ?Sized
{
    ensure_fully_walled(grid)?;
    let directions = bias.directions();

    let cells = grid.iter().collect::<Vec<_>>();
    for cell_coord in cells {

        let candidates = directions.iter()
            .filter_map(|&dir| grid.neighbour_at_direction(cell_coord, dir).map(|n| (dir, n)))
            .collect::<SmallVec<[(CompassPrimary, Cartesian2DCoordinate); 2]>>();

        // Zero weights on every available direction fall back to an unweighted pick, so a
        // boundary cell still carves the only way it can.
        let link = match candidates.choose_weighted(rng, |&(dir, _)| bias.weight(dir)) {
            Ok(&choice) => Some(choice),
            Err(_) => candidates.choose(rng).cloned(),
        };

        if let Some((direction, neighbour)) = link {
            grid.knock_down_wall(cell_coord, neighbour, direction)?;
        }
    }

    Ok(())
}

/// Apply the Aldous-Broder maze generation algorithm to a grid.
///
/// A random walk from the grid's start cell: step to any neighbour, visited or not, and knock
/// down the wall behind us whenever we step into a cell for the first time. Finishes once every
/// cell has been visited. Every spanning tree of the grid is equally likely.
///
/// The walk has no upper bound on its length. With `iteration_cap` set, the walk stops after that
/// many steps with `ErrorKind::DidNotConverge` if cells are still unvisited.
pub fn aldous_broder<R>(grid: &mut Grid, rng: &mut R, iteration_cap: Option<u64>) -> Result<()>
    where R: Rng + ?Sized
{
    ensure_fully_walled(grid)?;

    let cells_count = grid.size();
    let mut current_cell = grid.start();
    let mut visited_count = 1;
    let mut steps: u64 = 0;

    while visited_count < cells_count {

        if let Some(cap) = iteration_cap {
            if steps >= cap {
                warn!("aldous-broder gave up after {} steps, {} of {} cells visited",
                      steps,
                      visited_count,
                      cells_count);
                bail!(ErrorKind::DidNotConverge(steps, visited_count, cells_count));
            }
        }

        let neighbours = grid.neighbours(current_cell, NeighbourFilter::All);
        let (direction, next_cell) = match neighbours.choose(rng) {
            Some(&choice) => choice,
            None => unreachable!("every cell of a multi cell grid has a neighbour"),
        };

        if grid.has_all_walls(next_cell) {
            grid.knock_down_wall(current_cell, next_cell, direction)?;
            visited_count += 1;
        }

        current_cell = next_cell;
        steps += 1;
    }

    info!("aldous-broder visited all {} cells in {} steps", cells_count, steps);
    Ok(())
}

/// Apply the recursive backtracker (randomised depth first search) algorithm to a grid.
///
/// From the grid's start cell keep carving into a random unvisited neighbour. At a dead end,
/// pop back along the carved path to the most recent cell that still has an unvisited neighbour.
/// An explicit stack stands in for recursion so large grids cannot overflow the call stack.
pub fn recursive_backtracker<R>(grid: &mut Grid, rng: &mut R) -> Result<()>
    where R: Rng + ?Sized
{
    ensure_fully_walled(grid)?;

    let cells_count = grid.size();
    let mut stack = Vec::with_capacity(cells_count);
    let mut current_cell = grid.start();
    let mut visited_count = 1;

    while visited_count < cells_count {

        let neighbours = grid.neighbours(current_cell, NeighbourFilter::Unvisited);

        if let Some(&(direction, next_cell)) = neighbours.choose(rng) {
            grid.knock_down_wall(current_cell, next_cell, direction)?;
            stack.push(current_cell);
            current_cell = next_cell;
            visited_count += 1;
        } else {
            // Dead end: backtrack.
            current_cell = match stack.pop() {
                Some(previous) => previous,
                None => {
                    unreachable!("backtracked past the start cell with {} of {} cells visited",
                                 visited_count,
                                 cells_count)
                }
            };
            trace!("backtracked to {}", current_cell);
        }
    }

    Ok(())
}

fn prims_first_cell<R>(grid: &Grid, rng: &mut R, start_at_center: bool) -> Cartesian2DCoordinate
    where R: Rng + ?Sized
{
    if start_at_center {
        grid.center()
    } else {
        grid.random_cell(rng)
    }
}

/// Apply the simplified Prim's algorithm to a grid.
///
/// Keeps an active set of visited cells that may still have unvisited neighbours. Each round picks
/// an active cell at random: if it has unvisited neighbours it carves into a random one, which
/// joins the active set, otherwise it leaves the active set. Done when the active set is empty.
pub fn simplified_prims<R>(grid: &mut Grid, rng: &mut R, start_at_center: bool) -> Result<()>
    where R: Rng + ?Sized
{
    ensure_fully_walled(grid)?;

    let first_cell = prims_first_cell(grid, rng, start_at_center);
    debug!("simplified prims started at {}", first_cell);

    let mut active = vec![first_cell];
    while !active.is_empty() {

        let active_index = rng.gen_range(0..active.len());
        let current_cell = active[active_index];
        let neighbours = grid.neighbours(current_cell, NeighbourFilter::Unvisited);

        if let Some(&(direction, neighbour)) = neighbours.choose(rng) {
            grid.knock_down_wall(current_cell, neighbour, direction)?;
            active.push(neighbour);
        } else {
            let _ = active.remove(active_index);
        }
    }

    Ok(())
}

/// Apply the "true" Prim's algorithm to a grid.
///
/// Every cell is given a random cost in `0..100` up front. Each round takes the cheapest active
/// cell and carves into its cheapest unvisited neighbour. Ties between active cells go to the one
/// that joined the active set first, ties between neighbours go to the first in West, East, South,
/// North order.
pub fn true_prims<R>(grid: &mut Grid, rng: &mut R, start_at_center: bool) -> Result<()>
    where R: Rng + ?Sized
{
    ensure_fully_walled(grid)?;

    let first_cell = prims_first_cell(grid, rng, start_at_center);
    debug!("true prims started at {}", first_cell);

    let costs = (0..grid.size())
        .map(|_| Cost(rng.gen_range(0..Cost::UPPER_BOUND)))
        .collect::<Vec<_>>();

    grow_cheapest_first(grid, first_cell, &costs)
}

/// The deterministic half of `true_prims`: grow from `first_cell` given a cost per cell, indexed
/// row major.
fn grow_cheapest_first(grid: &mut Grid,
                       first_cell: Cartesian2DCoordinate,
                       costs: &[Cost])
                       -> Result<()> {

    let RowLength(width) = grid.row_length();
    let cost_of = |coord: Cartesian2DCoordinate| {
        costs[coord.y as usize * width as usize + coord.x as usize]
    };

    // Parallel stacks of active cells and their costs. The cheapest is found with a linear
    // scan, keeping the first of equal costs.
    let mut active = vec![first_cell];
    let mut active_costs = vec![cost_of(first_cell)];

    while let Some(active_index) = active_costs.iter().position_min() {

        let current_cell = active[active_index];
        let neighbours = grid.neighbours(current_cell, NeighbourFilter::Unvisited);

        if let Some(&(direction, neighbour)) =
            neighbours.iter().min_by_key(|&&(_, neighbour)| cost_of(neighbour)) {

            grid.knock_down_wall(current_cell, neighbour, direction)?;
            active.push(neighbour);
            active_costs.push(cost_of(neighbour));
        } else {
            let _ = active.remove(active_index);
            let _ = active_costs.remove(active_index);
        }
    }

    Ok(())
}

/// Which cells have been joined together by Kruskal's algorithm so far.
///
/// Each set id owns the list of its member cells. Merging moves every member of the losing set
/// into the winning set, there is no union by rank or path compression.
#[derive(Debug)]
struct DisjointSets {
    set_for_cell: FnvHashMap<Cartesian2DCoordinate, usize>,
    cells_in_set: FnvHashMap<usize, Vec<Cartesian2DCoordinate>>,
}

impl DisjointSets {
    fn new(grid: &Grid) -> DisjointSets {
        let mut set_for_cell = utils::fnv_hashmap(grid.size());
        let mut cells_in_set = utils::fnv_hashmap(grid.size());
        for (set_id, coord) in grid.iter().enumerate() {
            let _ = set_for_cell.insert(coord, set_id);
            let _ = cells_in_set.insert(set_id, vec![coord]);
        }

        DisjointSets {
            set_for_cell,
            cells_in_set,
        }
    }

    fn can_merge(&self, a: Cartesian2DCoordinate, b: Cartesian2DCoordinate) -> bool {
        self.set_for_cell.get(&a) != self.set_for_cell.get(&b)
    }

    /// Merge the set holding `loser_cell` into the set holding `winner_cell`.
    fn merge(&mut self, winner_cell: Cartesian2DCoordinate, loser_cell: Cartesian2DCoordinate) {
        let (winner, loser) = match (self.set_for_cell.get(&winner_cell),
                                     self.set_for_cell.get(&loser_cell)) {
            (Some(&winner), Some(&loser)) if winner != loser => (winner, loser),
            _ => return,
        };

        let losers = self.cells_in_set.remove(&loser).unwrap_or_default();
        for &cell in &losers {
            let _ = self.set_for_cell.insert(cell, winner);
        }
        self.cells_in_set.entry(winner).or_insert_with(Vec::new).extend(losers);
    }

    fn sets_count(&self) -> usize {
        self.cells_in_set.len()
    }
}

/// Apply randomised Kruskal's algorithm to a grid.
///
/// Lists every wall once (each cell's South and East wall), shuffles them, then knocks down each
/// wall in turn unless the cells either side are already connected. Skipping those walls is what
/// keeps the passages free of cycles, and trying every wall is what connects the whole grid.
pub fn kruskals<R>(grid: &mut Grid, rng: &mut R) -> Result<()>
    where R: Rng + ?Sized
{
    ensure_fully_walled(grid)?;

    let mut sets = DisjointSets::new(grid);
    let mut walls = grid.iter()
        .flat_map(|coord| {
            [CompassPrimary::South, CompassPrimary::East]
                .iter()
                .filter_map(|&dir| grid.neighbour_at_direction(coord, dir).map(|n| (coord, n, dir)))
                .collect::<SmallVec<[_; 2]>>()
        })
        .collect::<Vec<_>>();
    walls.shuffle(rng);

    while let Some((left_cell, right_cell, direction)) = walls.pop() {
        if sets.can_merge(left_cell, right_cell) {
            grid.knock_down_wall(left_cell, right_cell, direction)?;
            sets.merge(left_cell, right_cell);
        }
    }

    debug!("kruskals finished with {} set(s)", sets.sets_count());
    Ok(())
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::units::ColumnLength;

    // StepRng values whose top bit picks index 0 or 1 out of two choices.
    const PICK_FIRST: u64 = 0;
    const PICK_SECOND: u64 = 0x8000_0000;

    fn grid(w: u32, h: u32) -> Grid {
        Grid::new(RowLength(w), ColumnLength(h)).expect("invalid grid dimensions")
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    fn sorted_passages(g: &Grid) -> Vec<(Cartesian2DCoordinate, Cartesian2DCoordinate)> {
        g.passages().sorted().collect()
    }

    fn generated(kind: GeneratorKind, w: u32, h: u32, seed: u64) -> Grid {
        let mut g = grid(w, h);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate(kind, &mut g, &mut rng, &GenerationOptions::default())
            .expect("maze generation failed");
        g
    }

    #[test]
    fn every_generator_makes_perfect_mazes() {
        for &kind in GeneratorKind::ALL.iter() {
            for w in 1..7 {
                for h in 1..7 {
                    let g = generated(kind, w, h, u64::from(w * 31 + h));
                    assert_eq!(g.passages_count(), g.size() - 1, "{} {}x{}", kind, w, h);
                    assert!(g.is_perfect_maze(), "{} {}x{}", kind, w, h);
                }
            }
        }
    }

    #[test]
    fn single_cell_grids_need_no_passages() {
        for &kind in GeneratorKind::ALL.iter() {
            let g = generated(kind, 1, 1, 3);
            assert_eq!(g.passages_count(), 0);
            assert!(g.is_perfect_maze());
            assert!(g.has_all_walls(gc(0, 0)));
        }
    }

    #[test]
    fn same_seed_same_maze() {
        for &kind in GeneratorKind::ALL.iter() {
            let a = generated(kind, 9, 7, 1234);
            let b = generated(kind, 9, 7, 1234);
            assert_eq!(a, b, "{}", kind);
        }
    }

    #[test]
    fn generators_refuse_opened_grids() {
        for &kind in GeneratorKind::ALL.iter() {
            let mut g = grid(3, 3);
            g.knock_down_wall(gc(1, 1), gc(1, 2), CompassPrimary::South).unwrap();
            let before = g.clone();
            let mut rng = ChaCha8Rng::seed_from_u64(0);
            let result = generate(kind, &mut g, &mut rng, &GenerationOptions::default());
            match result {
                Err(Error(ErrorKind::PreconditionViolation(coord), _)) => assert_eq!(coord, gc(1, 1)),
                other => panic!("{}: expected PreconditionViolation, got {:?}", kind, other),
            }
            assert_eq!(g, before);
        }
    }

    #[test]
    fn binary_tree_forced_east() {
        let mut g = grid(3, 3);
        let bias = BinaryTreeBias::default().with_weights(0.0, 1.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        binary_tree(&mut g, &mut rng, &bias).unwrap();

        for coord in g.iter() {
            let east_open = g.is_neighbour_linked(coord, CompassPrimary::East);
            let south_open = g.is_neighbour_linked(coord, CompassPrimary::South);
            match (coord.x, coord.y) {
                (2, 2) => assert!(!east_open && !south_open),
                (2, _) => assert!(south_open),
                _ => assert!(east_open && !south_open),
            }
        }
        assert_eq!(g.passages_count(), 8);
        assert!(g.is_perfect_maze());
    }

    #[test]
    fn binary_tree_every_bias_makes_perfect_mazes() {
        let verticals = [CompassPrimary::North, CompassPrimary::South];
        let horizontals = [CompassPrimary::East, CompassPrimary::West];
        let weights = [(0.5, 0.5), (1.0, 0.0), (0.0, 1.0), (0.9, 0.1), (0.0, 0.0)];

        for (&vertical, &horizontal) in verticals.iter().cartesian_product(horizontals.iter()) {
            for &(vertical_weight, horizontal_weight) in weights.iter() {
                let bias = BinaryTreeBias::new(vertical, horizontal)
                    .and_then(|b| b.with_weights(vertical_weight, horizontal_weight))
                    .unwrap();
                for w in 1..6 {
                    for h in 1..6 {
                        let mut g = grid(w, h);
                        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(w + 10 * h));
                        binary_tree(&mut g, &mut rng, &bias).unwrap();
                        assert!(g.is_perfect_maze(), "{:?} {}x{}", bias, w, h);
                    }
                }
            }
        }
    }

    #[test]
    fn binary_tree_carves_only_in_bias_directions() {
        let bias = BinaryTreeBias::new(CompassPrimary::North, CompassPrimary::West).unwrap();
        let mut g = grid(6, 6);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        binary_tree(&mut g, &mut rng, &bias).unwrap();

        // North/West carving leaves the top row and left column as straight corridors.
        for x in 1..6 {
            assert!(g.is_neighbour_linked(gc(x, 0), CompassPrimary::West));
        }
        for y in 1..6 {
            assert!(g.is_neighbour_linked(gc(0, y), CompassPrimary::North));
        }
    }

    #[test]
    fn binary_tree_rejects_bad_bias() {
        assert!(BinaryTreeBias::new(CompassPrimary::East, CompassPrimary::South).is_err());
        assert!(BinaryTreeBias::new(CompassPrimary::South, CompassPrimary::North).is_err());
        assert!(BinaryTreeBias::new(CompassPrimary::West, CompassPrimary::East).is_err());
        let bias = BinaryTreeBias::default();
        assert!(bias.with_weights(-1.0, 1.0).is_err());
        assert!(bias.with_weights(1.0, ::std::f64::NAN).is_err());
        assert!(bias.with_weights(1.0, ::std::f64::INFINITY).is_err());
        assert!(bias.with_weights(1e308, 1e308).is_err());
        assert!(bias.with_weights(::std::f64::MAX, 0.0).is_ok());
        assert_eq!(bias.weight(CompassPrimary::North), 0.0);
        assert_eq!(bias.directions(), [CompassPrimary::South, CompassPrimary::East]);
    }

    #[test]
    fn aldous_broder_follows_the_random_source() {
        // 2x2 neighbours in scan order:
        // (0,0): E(1,0) S(0,1)   (1,0): W(0,0) S(1,1)
        // (0,1): E(1,1) N(0,0)   (1,1): W(0,1) N(1,0)
        // Alternating first, second, first: (0,0) -E-> (1,0) -S-> (1,1) -W-> (0,1)
        let mut g = grid(2, 2);
        let mut rng = StepRng::new(PICK_FIRST, PICK_SECOND);
        aldous_broder(&mut g, &mut rng, None).unwrap();
        assert_eq!(sorted_passages(&g),
                   vec![(gc(0, 0), gc(1, 0)), (gc(0, 1), gc(1, 1)), (gc(1, 0), gc(1, 1))]);
        assert!(g.cell_at(gc(0, 0)).unwrap().has_wall(CompassPrimary::South));
        assert!(g.cell_at(gc(0, 1)).unwrap().has_wall(CompassPrimary::North));

        // Second, first, second: (0,0) -S-> (0,1) -E-> (1,1) -N-> (1,0)
        let mut g = grid(2, 2);
        let mut rng = StepRng::new(PICK_SECOND, PICK_SECOND);
        aldous_broder(&mut g, &mut rng, None).unwrap();
        assert_eq!(sorted_passages(&g),
                   vec![(gc(0, 0), gc(0, 1)), (gc(0, 1), gc(1, 1)), (gc(1, 0), gc(1, 1))]);
    }

    #[test]
    fn aldous_broder_picks_spanning_trees_uniformly() {
        // A 2x2 grid has four spanning trees, each one named by the single inner wall left
        // standing.
        let runs = 8000;
        let mut trees: FnvHashMap<Vec<(Cartesian2DCoordinate, Cartesian2DCoordinate)>, usize> =
            utils::fnv_hashmap(4);
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        for _ in 0..runs {
            let mut g = grid(2, 2);
            aldous_broder(&mut g, &mut rng, None).unwrap();
            *trees.entry(sorted_passages(&g)).or_insert(0) += 1;
        }

        assert_eq!(trees.len(), 4);
        for (passages, &count) in &trees {
            let share = count as f64 / f64::from(runs);
            assert!((share - 0.25).abs() < 0.03, "{:?} drawn {} times", passages, count);
        }
    }

    #[test]
    fn aldous_broder_walks_from_the_grid_start() {
        // Always picking the first neighbour from (1,1): W to (0,1), then E back to (1,1), which
        // is already visited, and so on forever.
        let mut g = Grid::with_start(RowLength(2), ColumnLength(2), gc(1, 1)).unwrap();
        let mut rng = StepRng::new(PICK_FIRST, 0);
        let result = aldous_broder(&mut g, &mut rng, Some(50));
        match result {
            Err(Error(ErrorKind::DidNotConverge(steps, visited, total), _)) => {
                assert_eq!((steps, visited, total), (50, 2, 4));
            }
            other => panic!("expected DidNotConverge, got {:?}", other),
        }
        assert_eq!(sorted_passages(&g), vec![(gc(0, 1), gc(1, 1))]);
    }

    #[test]
    fn aldous_broder_cap_does_not_change_the_walk() {
        let mut capped = grid(5, 5);
        let mut uncapped = grid(5, 5);
        aldous_broder(&mut capped, &mut ChaCha8Rng::seed_from_u64(8), Some(1_000_000)).unwrap();
        aldous_broder(&mut uncapped, &mut ChaCha8Rng::seed_from_u64(8), None).unwrap();
        assert_eq!(capped, uncapped);
    }

    #[test]
    fn recursive_backtracker_backtracks_from_dead_ends() {
        // Always the first unvisited neighbour: from the middle of a 3x1 row go West, hit the
        // dead end, come back to the middle and carry on East.
        let mut g = Grid::with_start(RowLength(3), ColumnLength(1), gc(1, 0)).unwrap();
        let mut rng = StepRng::new(PICK_FIRST, 0);
        recursive_backtracker(&mut g, &mut rng).unwrap();
        assert_eq!(sorted_passages(&g), vec![(gc(0, 0), gc(1, 0)), (gc(1, 0), gc(2, 0))]);
    }

    #[test]
    fn recursive_backtracker_carves_one_long_corridor_when_it_can() {
        // First unvisited neighbour each time from (0,0) in a 2x2:
        // E to (1,0), S to (1,1), W to (0,1). No backtracking needed.
        let mut g = grid(2, 2);
        let mut rng = StepRng::new(PICK_FIRST, 0);
        recursive_backtracker(&mut g, &mut rng).unwrap();
        assert_eq!(sorted_passages(&g),
                   vec![(gc(0, 0), gc(1, 0)), (gc(0, 1), gc(1, 1)), (gc(1, 0), gc(1, 1))]);
    }

    #[test]
    fn prims_can_start_at_the_center() {
        for &kind in &[GeneratorKind::SimplifiedPrims, GeneratorKind::TruePrims] {
            let options = GenerationOptions {
                start_at_center: true,
                ..GenerationOptions::default()
            };
            let mut g = grid(7, 4);
            let mut rng = ChaCha8Rng::seed_from_u64(21);
            generate(kind, &mut g, &mut rng, &options).unwrap();
            assert!(g.is_perfect_maze());
        }
    }

    #[test]
    fn simplified_prims_first_carve_leaves_the_center() {
        // The center is the only active cell, so whichever neighbour is picked, the first
        // passage touches it.
        let mut g = grid(5, 5);
        let mut rng = StepRng::new(PICK_FIRST, 0);
        simplified_prims(&mut g, &mut rng, true).unwrap();
        assert!(g.is_neighbour_linked(gc(2, 2), CompassPrimary::West));
        assert!(g.is_perfect_maze());
    }

    #[test]
    fn true_prims_equal_costs_follow_insertion_then_scan_order() {
        // All zero costs. The center keeps winning ties as the oldest active cell and carves
        // W, E, S, N. Then (0,1) carves S, N and (2,1) carves S, N.
        let mut g = grid(3, 3);
        let mut rng = StepRng::new(0, 0);
        true_prims(&mut g, &mut rng, true).unwrap();
        assert_eq!(sorted_passages(&g),
                   vec![(gc(0, 0), gc(0, 1)),
                        (gc(0, 1), gc(0, 2)),
                        (gc(0, 1), gc(1, 1)),
                        (gc(1, 0), gc(1, 1)),
                        (gc(1, 1), gc(1, 2)),
                        (gc(1, 1), gc(2, 1)),
                        (gc(2, 0), gc(2, 1)),
                        (gc(2, 1), gc(2, 2))]);
    }

    #[test]
    fn true_prims_grows_towards_cheap_cells() {
        // Costs row major: (0,0) (1,0) (0,1) (1,1)
        let mut g = grid(2, 2);
        grow_cheapest_first(&mut g, gc(0, 0), &[Cost(0), Cost(9), Cost(1), Cost(2)]).unwrap();
        assert_eq!(sorted_passages(&g),
                   vec![(gc(0, 0), gc(0, 1)), (gc(0, 0), gc(1, 0)), (gc(0, 1), gc(1, 1))]);

        let mut g = grid(2, 2);
        grow_cheapest_first(&mut g, gc(0, 0), &[Cost(0), Cost(2), Cost(9), Cost(1)]).unwrap();
        assert_eq!(sorted_passages(&g),
                   vec![(gc(0, 0), gc(0, 1)), (gc(0, 0), gc(1, 0)), (gc(1, 0), gc(1, 1))]);
    }

    #[test]
    fn kruskals_single_row_opens_every_wall() {
        for seed in 0..20 {
            let g = generated(GeneratorKind::Kruskals, 4, 1, seed);
            assert_eq!(sorted_passages(&g),
                       vec![(gc(0, 0), gc(1, 0)), (gc(1, 0), gc(2, 0)), (gc(2, 0), gc(3, 0))]);
        }
    }

    #[test]
    fn disjoint_sets_merge() {
        let g = grid(3, 1);
        let mut sets = DisjointSets::new(&g);
        assert_eq!(sets.sets_count(), 3);
        assert!(sets.can_merge(gc(0, 0), gc(1, 0)));

        sets.merge(gc(0, 0), gc(1, 0));
        assert_eq!(sets.sets_count(), 2);
        assert!(!sets.can_merge(gc(0, 0), gc(1, 0)));
        assert!(sets.can_merge(gc(1, 0), gc(2, 0)));

        sets.merge(gc(2, 0), gc(1, 0));
        assert_eq!(sets.sets_count(), 1);
        assert!(!sets.can_merge(gc(0, 0), gc(2, 0)));

        // merging within a set is a no-op
        sets.merge(gc(0, 0), gc(2, 0));
        assert_eq!(sets.sets_count(), 1);
    }

    #[test]
    fn quickcheck_perfect_mazes() {
        fn p(kind_index: u8, w: u8, h: u8, seed: u64) -> TestResult {
            let kind = GeneratorKind::ALL[kind_index as usize % GeneratorKind::ALL.len()];
            let (w, h) = (u32::from(w % 12) + 1, u32::from(h % 12) + 1);
            let mut g = grid(w, h);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            match generate(kind, &mut g, &mut rng, &GenerationOptions::default()) {
                Ok(()) => TestResult::from_bool(g.is_perfect_maze()),
                Err(e) => TestResult::error(format!("{}: {}", kind, e)),
            }
        }
        quickcheck(p as fn(u8, u8, u8, u64) -> TestResult)
    }
}
