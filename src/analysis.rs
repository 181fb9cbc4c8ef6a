use std::fmt;

use crate::cells::Cell;
use crate::grid::Grid;

/// Wall shape taxonomy of a single cell, named for the look of the walls.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum WallShape {
    /// Fully walled in on all four sides ("I").
    Full,
    /// Two adjacent walls ("L").
    Corner,
    /// Three exits ("T").
    Tee,
    /// Four exits ("+").
    Cross,
}

/// The shape category of a cell's wall mask, `None` for a plain corridor.
pub fn wall_shape(cell: &Cell) -> Option<WallShape> {
    if cell.wall_count() == 4 {
        Some(WallShape::Full)
    } else if cell.is_corner() {
        Some(WallShape::Corner)
    } else if cell.exit_count() == 3 {
        Some(WallShape::Tee)
    } else if cell.exit_count() == 4 {
        Some(WallShape::Cross)
    } else {
        None
    }
}

/// Aggregate numbers over a finished grid. A read-only derived view,
/// recomputed on every call, never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct MazeStatistics {
    pub total_cells: usize,
    pub intersections: usize,
    pub dead_ends: usize,
    pub corridors: usize,
    pub total_walls: usize,
    pub walls_i: usize,
    pub walls_l: usize,
    pub walls_t: usize,
    pub walls_plus: usize,
    pub avg_exits: f64,
    pub wall_percentage: f64,
}

pub fn statistics(grid: &Grid) -> MazeStatistics {
    let total_cells = grid.size();
    let mut stats = MazeStatistics {
        total_cells,
        intersections: 0,
        dead_ends: 0,
        corridors: 0,
        total_walls: 0,
        walls_i: 0,
        walls_l: 0,
        walls_t: 0,
        walls_plus: 0,
        avg_exits: 0.0,
        wall_percentage: 0.0,
    };

    for coord in grid.iter() {
        let cell = match grid.cell(coord) {
            Some(c) => c,
            None => continue,
        };
        stats.total_walls += cell.wall_count();

        if cell.is_intersection() {
            stats.intersections += 1;
        } else if cell.is_dead_end() {
            stats.dead_ends += 1;
        } else {
            stats.corridors += 1;
        }

        match wall_shape(cell) {
            Some(WallShape::Full) => stats.walls_i += 1,
            Some(WallShape::Corner) => stats.walls_l += 1,
            Some(WallShape::Tee) => stats.walls_t += 1,
            Some(WallShape::Cross) => stats.walls_plus += 1,
            None => {}
        }
    }

    if total_cells > 0 {
        stats.avg_exits = (total_cells * 4 - stats.total_walls) as f64 / total_cells as f64;
        stats.wall_percentage = stats.total_walls as f64 / (total_cells * 4) as f64 * 100.0;
    }

    stats
}

impl fmt::Display for MazeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "cells:          {}", self.total_cells)?;
        writeln!(f, "intersections:  {}", self.intersections)?;
        writeln!(f, "dead ends:      {}", self.dead_ends)?;
        writeln!(f, "corridors:      {}", self.corridors)?;
        writeln!(f, "walls:          {}", self.total_walls)?;
        writeln!(
            f,
            "wall shapes:    I={} L={} T={} +={}",
            self.walls_i, self.walls_l, self.walls_t, self.walls_plus
        )?;
        writeln!(f, "avg exits:      {:.2}", self.avg_exits)?;
        write!(f, "wall coverage:  {:.1}%", self.wall_percentage)
    }
}
