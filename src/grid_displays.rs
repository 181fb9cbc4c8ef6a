use std::fmt;

use crate::cells::{Direction, GridCoordinate};
use crate::grid::Grid;

/// Dense single character rendering, one cell per glyph:
/// `#` fully walled, `D` dead end, `I` intersection, `.` corridor.
pub fn simple_string(grid: &Grid) -> String {
    let mut output = String::with_capacity((grid.width() + 1) * grid.height());

    for y in 0..grid.height() as u32 {
        for x in 0..grid.width() as u32 {
            let glyph = match grid.cell(GridCoordinate::new(x, y)) {
                Some(cell) if cell.wall_count() == 4 => '#',
                Some(cell) if cell.is_dead_end() => 'D',
                Some(cell) if cell.is_intersection() => 'I',
                Some(_) => '.',
                None => ' ',
            };
            output.push(glyph);
        }
        output.push('\n');
    }

    output
}

const WALL_L: &str = "╴";
const WALL_R: &str = "╶";
const WALL_U: &str = "╵";
const WALL_D: &str = "╷";
const WALL_LR_3: &str = "───";
const WALL_LR: &str = "─";
const WALL_UD: &str = "│";
const WALL_LD: &str = "┐";
const WALL_RU: &str = "└";
const WALL_LU: &str = "┘";
const WALL_RD: &str = "┌";
const WALL_LRU: &str = "┴";
const WALL_LRD: &str = "┬";
const WALL_LRUD: &str = "┼";
const WALL_RUD: &str = "├";
const WALL_LUD: &str = "┤";

/// Pick the box drawing glyph for a lattice point from which of the four
/// wall segments meet there.
fn junction_glyph(left: bool, right: bool, up: bool, down: bool) -> &'static str {
    match (left, right, up, down) {
        (true, true, true, true) => WALL_LRUD,
        (true, true, true, false) => WALL_LRU,
        (true, true, false, true) => WALL_LRD,
        (true, false, true, true) => WALL_LUD,
        (false, true, true, true) => WALL_RUD,
        (true, true, false, false) => WALL_LR,
        (false, false, true, true) => WALL_UD,
        (false, true, true, false) => WALL_RU,
        (true, false, false, true) => WALL_LD,
        (true, false, true, false) => WALL_LU,
        (false, true, false, true) => WALL_RD,
        (true, false, false, false) => WALL_L,
        (false, true, false, false) => WALL_R,
        (false, false, true, false) => WALL_U,
        (false, false, false, true) => WALL_D,
        (false, false, false, false) => " ",
    }
}

/// Box drawing rendering showing every wall segment. Wrap tunnels appear
/// as gaps in the border. Intersections and dead ends are marked inside
/// their cells.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (w, h) = (self.width(), self.height());
        let cell_at = |x: usize, y: usize| self.cell(GridCoordinate::new(x as u32, y as u32));

        // Is there a wall segment along the top boundary of row `by`,
        // above cell column `x`? Adjacent cells agree by the consistency
        // invariant; either side of the boundary answers for both.
        let horizontal_segment = |x: usize, by: usize| -> bool {
            (by > 0 && cell_at(x, by - 1).map_or(false, |c| c.has_wall(Direction::Down)))
                || (by < h && cell_at(x, by).map_or(false, |c| c.has_wall(Direction::Up)))
        };
        let vertical_segment = |bx: usize, y: usize| -> bool {
            (bx > 0 && cell_at(bx - 1, y).map_or(false, |c| c.has_wall(Direction::Right)))
                || (bx < w && cell_at(bx, y).map_or(false, |c| c.has_wall(Direction::Left)))
        };

        let mut output = String::new();

        for by in 0..=h {
            for bx in 0..=w {
                let left = bx > 0 && horizontal_segment(bx - 1, by);
                let right = bx < w && horizontal_segment(bx, by);
                let up = by > 0 && vertical_segment(bx, by - 1);
                let down = by < h && vertical_segment(bx, by);
                output.push_str(junction_glyph(left, right, up, down));

                if bx < w {
                    output.push_str(if horizontal_segment(bx, by) { WALL_LR_3 } else { "   " });
                }
            }
            output.push('\n');

            if by < h {
                for bx in 0..=w {
                    output.push_str(if vertical_segment(bx, by) { WALL_UD } else { " " });
                    if bx < w {
                        let body = match cell_at(bx, by) {
                            Some(cell) if cell.is_intersection() => " I ",
                            Some(cell) if cell.is_dead_end() => " D ",
                            _ => "   ",
                        };
                        output.push_str(body);
                    }
                }
                output.push('\n');
            }
        }

        write!(f, "{}", output)
    }
}
