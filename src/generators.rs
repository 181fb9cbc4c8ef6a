use rand::seq::SliceRandom;
use rand_xorshift::XorShiftRng;
use smallvec::SmallVec;

use crate::cells::{Direction, GridCoordinate};
use crate::grid::Grid;
use crate::symmetry::{self, transform_walls, Symmetry};

/// Carve a maze into the grid with an iterative depth first search
/// (recursive backtracker), routing every wall removal through the
/// symmetry engine so the active symmetry holds at each step.
///
/// The explicit stack keeps arbitrarily large grids safe from call stack
/// overflow. The result spans every cell reachable from the start; a final
/// reconciliation pass covers cells only ever reached through their orbit
/// mates.
pub fn recursive_backtracker(grid: &mut Grid, start: GridCoordinate, rng: &mut XorShiftRng) {
    grid.reset();

    let start = clamp_to_canonical_region(grid, start);
    if let Some(cell) = grid.cell_mut(start) {
        cell.set_visited(true);
    } else {
        return;
    }

    let mut stack: Vec<GridCoordinate> = vec![start];
    while let Some(&current) = stack.last() {
        // unvisited orthogonal neighbours, paired with the direction to them
        let mut candidates: SmallVec<[(GridCoordinate, Direction); 4]> = SmallVec::new();
        for &direction in Direction::all().iter() {
            if let Some(neighbour) = grid.offset_coordinate(current, direction) {
                if let Some(cell) = grid.cell(neighbour) {
                    if !cell.is_visited() {
                        candidates.push((neighbour, direction));
                    }
                }
            }
        }

        if let Some(&(next, direction)) = candidates.choose(rng) {
            symmetry::carve(grid, current, direction);
            if let Some(cell) = grid.cell_mut(next) {
                cell.set_visited(true);
            }
            stack.push(next);
        } else {
            stack.pop();
        }
    }

    reconcile_symmetric_orbits(grid);
}

/// Keep the start inside the canonical half/quadrant so the start cell is
/// never rewritten by its own orbit in a conflicting order.
fn clamp_to_canonical_region(grid: &Grid, start: GridCoordinate) -> GridCoordinate {
    if grid.symmetry() == Symmetry::None {
        return start;
    }
    let x = start.x.min((grid.width() / 2) as u32);
    let y = start.y.min((grid.height() / 2) as u32);
    GridCoordinate::new(x, y)
}

/// Symmetric carving marks orbit mates' walls without marking the mates
/// visited, so cells can be left unvisited after the main loop. Each one
/// adopts its canonical orbit representative's wall set, mapped through
/// the representative-to-cell axis flips.
fn reconcile_symmetric_orbits(grid: &mut Grid) {
    if grid.symmetry() == Symmetry::None {
        return;
    }

    for coord in grid.iter() {
        let visited = grid.cell(coord).map(|c| c.is_visited()).unwrap_or(true);
        if visited {
            continue;
        }

        let orbit = grid.symmetry().orbit(coord, grid.width(), grid.height());
        let representative = match orbit.iter().min() {
            Some(&rep) => rep,
            None => continue,
        };
        if representative == coord {
            continue;
        }

        let rep_cell = match grid.cell(representative) {
            Some(c) => *c,
            None => continue,
        };
        if !rep_cell.is_visited() {
            // cannot occur given the clamped start cell; leave untouched
            continue;
        }

        let x_flipped = representative.x != coord.x;
        let y_flipped = representative.y != coord.y;
        let walls = transform_walls(rep_cell.walls(), x_flipped, y_flipped);
        if let Some(cell) = grid.cell_mut(coord) {
            cell.set_walls(walls);
            cell.set_visited(true);
        }
    }
}

/// Open up dead ends by knocking a wall through to a well connected
/// neighbour, sweeping the whole grid until a sweep changes nothing.
///
/// Best effort only: a dead end whose every walled-off neighbour has
/// fewer than two exits stays a dead end. Wall removal here is ordinary
/// and direct, not symmetric.
///
/// Returns the number of walls removed.
pub fn eliminate_dead_ends(grid: &mut Grid) -> usize {
    let mut removed = 0;

    loop {
        let mut changed = false;

        for coord in grid.iter() {
            let exits = match grid.exit_count(coord) {
                Some(n) => n,
                None => continue,
            };
            if exits != 1 {
                continue;
            }

            for &direction in Direction::all().iter() {
                if grid.has_wall(coord, direction) != Some(true) {
                    continue;
                }
                let neighbour = match grid.offset_coordinate(coord, direction) {
                    Some(n) => n,
                    None => continue,
                };
                if grid.exit_count(neighbour).unwrap_or(0) >= 2 {
                    grid.remove_wall_at(coord, direction);
                    removed += 1;
                    changed = true;
                    break;
                }
            }
        }

        if !changed {
            break;
        }
    }

    removed
}
