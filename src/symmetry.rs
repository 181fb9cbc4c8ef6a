use crate::cells::{CoordinateSmallVec, Direction, GridCoordinate, WallSet};
use crate::grid::Grid;

/// The symmetry constraint a maze is generated under. Each mode induces a
/// finite transformation group on grid coordinates and on directions.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug)]
pub enum Symmetry {
    None,
    Horizontal,
    Vertical,
    Rotational,
    Both,
}

impl Symmetry {
    /// Mirroring across the vertical axis pairs column `x` with column
    /// `width - 1 - x`, which only lines up when the width is even.
    pub fn requires_even_width(self) -> bool {
        matches!(self, Symmetry::Horizontal | Symmetry::Rotational | Symmetry::Both)
    }

    pub fn requires_even_height(self) -> bool {
        matches!(self, Symmetry::Vertical | Symmetry::Rotational | Symmetry::Both)
    }

    /// Every position in `coord`'s orbit under this symmetry, `coord` itself
    /// first. Positions are deduplicated so a cell sitting on a symmetry
    /// axis never appears twice (mutating its wall twice would re-toggle).
    pub fn orbit(self, coord: GridCoordinate, width: usize, height: usize) -> CoordinateSmallVec {
        let mirror_x = width as u32 - 1 - coord.x;
        let mirror_y = height as u32 - 1 - coord.y;

        let mut orbit = CoordinateSmallVec::new();
        orbit.push(coord);

        match self {
            Symmetry::None => {}
            Symmetry::Horizontal => {
                if mirror_x != coord.x {
                    orbit.push(GridCoordinate::new(mirror_x, coord.y));
                }
            }
            Symmetry::Vertical => {
                if mirror_y != coord.y {
                    orbit.push(GridCoordinate::new(coord.x, mirror_y));
                }
            }
            Symmetry::Rotational => {
                if mirror_x != coord.x || mirror_y != coord.y {
                    orbit.push(GridCoordinate::new(mirror_x, mirror_y));
                }
            }
            Symmetry::Both => {
                if mirror_x != coord.x {
                    orbit.push(GridCoordinate::new(mirror_x, coord.y));
                }
                if mirror_y != coord.y {
                    orbit.push(GridCoordinate::new(coord.x, mirror_y));
                }
                if mirror_x != coord.x && mirror_y != coord.y {
                    orbit.push(GridCoordinate::new(mirror_x, mirror_y));
                }
            }
        }

        orbit
    }
}

/// Map a direction onto an orbit mate's frame of reference.
///
/// An x flip swaps Left and Right, a y flip swaps Up and Down, and a mate
/// flipped on both axes composes the two swaps, sending every direction to
/// its opposite.
pub fn transform_direction(direction: Direction, x_flipped: bool, y_flipped: bool) -> Direction {
    let direction = if x_flipped {
        match direction {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            other => other,
        }
    } else {
        direction
    };

    if y_flipped {
        match direction {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            other => other,
        }
    } else {
        direction
    }
}

/// Map a whole wall mask onto an orbit mate's frame of reference.
pub fn transform_walls(walls: WallSet, x_flipped: bool, y_flipped: bool) -> WallSet {
    let mut transformed = WallSet::empty();
    for &d in walls.directions().iter() {
        transformed.insert(transform_direction(d, x_flipped, y_flipped));
    }
    transformed
}

/// Remove the wall between `coord` and its neighbour in `direction`, then
/// repeat the removal at every other position in `coord`'s orbit, under the
/// direction mapping that position's axis flips induce.
///
/// Removing an already open wall is a no-op, so repeated carves with the
/// same arguments are idempotent.
pub fn carve(grid: &mut Grid, coord: GridCoordinate, direction: Direction) {
    let orbit = grid.symmetry().orbit(coord, grid.width(), grid.height());

    for &position in orbit.iter() {
        let x_flipped = position.x != coord.x;
        let y_flipped = position.y != coord.y;
        let mapped = transform_direction(direction, x_flipped, y_flipped);
        grid.remove_wall_at(position, mapped);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::{Height, Width};

    fn gc(x: u32, y: u32) -> GridCoordinate {
        GridCoordinate::new(x, y)
    }

    #[test]
    fn evenness_requirements() {
        assert!(!Symmetry::None.requires_even_width());
        assert!(!Symmetry::None.requires_even_height());
        assert!(Symmetry::Horizontal.requires_even_width());
        assert!(!Symmetry::Horizontal.requires_even_height());
        assert!(!Symmetry::Vertical.requires_even_width());
        assert!(Symmetry::Vertical.requires_even_height());
        assert!(Symmetry::Rotational.requires_even_width());
        assert!(Symmetry::Rotational.requires_even_height());
        assert!(Symmetry::Both.requires_even_width());
        assert!(Symmetry::Both.requires_even_height());
    }

    #[test]
    fn orbit_membership() {
        assert_eq!(&*Symmetry::None.orbit(gc(1, 2), 6, 4), &[gc(1, 2)]);
        assert_eq!(
            &*Symmetry::Horizontal.orbit(gc(1, 2), 6, 4),
            &[gc(1, 2), gc(4, 2)]
        );
        assert_eq!(
            &*Symmetry::Vertical.orbit(gc(1, 2), 6, 4),
            &[gc(1, 2), gc(1, 1)]
        );
        assert_eq!(
            &*Symmetry::Rotational.orbit(gc(1, 2), 6, 4),
            &[gc(1, 2), gc(4, 1)]
        );
        assert_eq!(
            &*Symmetry::Both.orbit(gc(1, 2), 6, 4),
            &[gc(1, 2), gc(4, 2), gc(1, 1), gc(4, 1)]
        );
    }

    #[test]
    fn orbit_deduplicates_axis_positions() {
        // On a grid of odd width column 2 is its own horizontal mirror.
        let orbit = Symmetry::Horizontal.orbit(gc(2, 1), 5, 4);
        assert_eq!(&*orbit, &[gc(2, 1)]);

        let orbit = Symmetry::Vertical.orbit(gc(0, 1), 4, 3);
        assert_eq!(&*orbit, &[gc(0, 1)]);
    }

    #[test]
    fn direction_transforms() {
        assert_eq!(
            transform_direction(Direction::Left, true, false),
            Direction::Right
        );
        assert_eq!(transform_direction(Direction::Up, true, false), Direction::Up);
        assert_eq!(
            transform_direction(Direction::Up, false, true),
            Direction::Down
        );
        assert_eq!(
            transform_direction(Direction::Left, false, true),
            Direction::Left
        );
        // both flips compose to the opposite direction
        for &d in Direction::all().iter() {
            assert_eq!(transform_direction(d, true, true), d.opposite());
            assert_eq!(transform_direction(d, false, false), d);
        }
    }

    #[test]
    fn transform_walls_maps_each_member() {
        let mut walls = WallSet::empty();
        walls.insert(Direction::Up);
        walls.insert(Direction::Left);

        let flipped = transform_walls(walls, true, true);
        assert!(flipped.contains(Direction::Down));
        assert!(flipped.contains(Direction::Right));
        assert_eq!(flipped.count(), 2);
    }

    #[test]
    fn carve_mirrors_wall_removal() {
        let mut grid =
            Grid::new(Width(6), Height(4), false, Symmetry::Horizontal).expect("valid grid");

        carve(&mut grid, gc(1, 1), Direction::Right);

        assert_eq!(grid.has_wall(gc(1, 1), Direction::Right), Some(false));
        assert_eq!(grid.has_wall(gc(2, 1), Direction::Left), Some(false));
        // mirrored at x -> width - 1 - x with Left/Right swapped
        assert_eq!(grid.has_wall(gc(4, 1), Direction::Left), Some(false));
        assert_eq!(grid.has_wall(gc(3, 1), Direction::Right), Some(false));
    }

    #[test]
    fn carve_is_idempotent() {
        let mut grid =
            Grid::new(Width(6), Height(6), false, Symmetry::Both).expect("valid grid");

        carve(&mut grid, gc(1, 1), Direction::Down);
        let snapshot: Vec<WallSet> = grid.iter().map(|c| grid.cell(c).unwrap().walls()).collect();

        carve(&mut grid, gc(1, 1), Direction::Down);
        let again: Vec<WallSet> = grid.iter().map(|c| grid.cell(c).unwrap().walls()).collect();

        assert_eq!(snapshot, again);
    }

    #[test]
    fn carve_obeys_orbit_wall_law() {
        let mut grid =
            Grid::new(Width(8), Height(6), false, Symmetry::Both).expect("valid grid");

        carve(&mut grid, gc(2, 1), Direction::Up);
        carve(&mut grid, gc(2, 1), Direction::Right);

        let walls = grid.cell(gc(2, 1)).unwrap().walls();
        let mirror_x = grid.cell(gc(5, 1)).unwrap().walls();
        let mirror_y = grid.cell(gc(2, 4)).unwrap().walls();
        let mirror_xy = grid.cell(gc(5, 4)).unwrap().walls();

        assert_eq!(mirror_x, transform_walls(walls, true, false));
        assert_eq!(mirror_y, transform_walls(walls, false, true));
        assert_eq!(mirror_xy, transform_walls(walls, true, true));
    }
}
