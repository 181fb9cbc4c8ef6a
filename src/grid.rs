use petgraph::graph::{NodeIndex, UnGraph};
use std::error::Error;
use std::fmt;

use crate::cells::{Cell, CoordinateSmallVec, Direction, GridCoordinate};
use crate::symmetry::Symmetry;
use crate::units::{Height, Width};
use crate::utils::{self, FnvHashMap};

/// Why a grid could not be constructed or re-validated.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum GridError {
    ZeroDimension,
    OddWidthForSymmetry(Symmetry),
    OddHeightForSymmetry(Symmetry),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            GridError::ZeroDimension => write!(f, "grid dimensions must be positive"),
            GridError::OddWidthForSymmetry(s) => {
                write!(f, "width must be even for symmetry {:?}", s)
            }
            GridError::OddHeightForSymmetry(s) => {
                write!(f, "height must be even for symmetry {:?}", s)
            }
        }
    }
}

impl Error for GridError {}

/// A dense rectangular grid of cells, each carrying a four direction wall
/// mask.
///
/// Invariant: for any two adjacent cells `u`, `v` with `v` in direction `d`
/// of `u` (including wrap-wound border pairs when `wrap` is on),
/// `u` blocks `d` iff `v` blocks `opposite(d)`. All wall mutation goes
/// through the paired operations below, which keep both sides in step.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    wrap: bool,
    symmetry: Symmetry,
    cells: Vec<Cell>,
}

impl Grid {
    /// Build a fully walled grid. Fails before any allocation when a
    /// dimension is zero or odd on an axis the symmetry constrains.
    pub fn new(width: Width, height: Height, wrap: bool, symmetry: Symmetry) -> Result<Grid, GridError> {
        let (Width(w), Height(h)) = (width, height);
        validate_dimensions(w, h, symmetry)?;

        Ok(Grid {
            width: w,
            height: h,
            wrap,
            symmetry,
            cells: vec![Cell::closed(); w * h],
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    #[inline]
    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    /// Switch the active symmetry, validating it against the current
    /// dimensions. On failure nothing about the grid changes.
    pub fn set_symmetry(&mut self, symmetry: Symmetry) -> Result<(), GridError> {
        validate_dimensions(self.width, self.height, symmetry)?;
        self.symmetry = symmetry;
        Ok(())
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: GridCoordinate) -> bool {
        (coord.x as usize) < self.width && (coord.y as usize) < self.height
    }

    /// Row-major index of a coordinate, `None` when it is out of the grid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: GridCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.y as usize * self.width + coord.x as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, coord: GridCoordinate) -> Option<&Cell> {
        self.grid_coordinate_to_index(coord).map(|i| &self.cells[i])
    }

    pub(crate) fn cell_mut(&mut self, coord: GridCoordinate) -> Option<&mut Cell> {
        self.grid_coordinate_to_index(coord)
            .map(move |i| &mut self.cells[i])
    }

    /// The coordinate one step away in `direction`. Out of bounds steps
    /// wrap modulo the dimensions when `wrap` is on and are `None`
    /// otherwise.
    pub fn offset_coordinate(&self, coord: GridCoordinate, direction: Direction) -> Option<GridCoordinate> {
        let (dx, dy) = direction.to_vector();
        let nx = i64::from(coord.x) + i64::from(dx);
        let ny = i64::from(coord.y) + i64::from(dy);
        let (w, h) = (self.width as i64, self.height as i64);

        if self.wrap {
            Some(GridCoordinate::new(
                nx.rem_euclid(w) as u32,
                ny.rem_euclid(h) as u32,
            ))
        } else if nx >= 0 && ny >= 0 && nx < w && ny < h {
            Some(GridCoordinate::new(nx as u32, ny as u32))
        } else {
            None
        }
    }

    /// Adjacent cells in `Direction::all()` order, whether or not a wall
    /// separates them.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        Direction::all()
            .iter()
            .filter_map(|&d| self.offset_coordinate(coord, d))
            .collect()
    }

    /// Adjacent cells reachable through an open (unwalled) edge, in
    /// `Direction::all()` order.
    pub fn open_neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        let cell = match self.cell(coord) {
            Some(c) => *c,
            None => return CoordinateSmallVec::new(),
        };
        Direction::all()
            .iter()
            .filter(|&&d| !cell.has_wall(d))
            .filter_map(|&d| self.offset_coordinate(coord, d))
            .collect()
    }

    /// Does `coord` block movement in `direction`? `None` for a coordinate
    /// outside the grid.
    pub fn has_wall(&self, coord: GridCoordinate, direction: Direction) -> Option<bool> {
        self.cell(coord).map(|c| c.has_wall(direction))
    }

    pub fn exit_count(&self, coord: GridCoordinate) -> Option<usize> {
        self.cell(coord).map(|c| c.exit_count())
    }

    /// Remove the wall between `coord` and its neighbour in `direction`,
    /// clearing both sides of the shared edge. Returns false when there is
    /// no neighbour that way.
    pub fn remove_wall_at(&mut self, coord: GridCoordinate, direction: Direction) -> bool {
        self.update_wall_at(coord, direction, false)
    }

    /// Rebuild the wall between `coord` and its neighbour in `direction`,
    /// setting both sides of the shared edge.
    pub fn add_wall_at(&mut self, coord: GridCoordinate, direction: Direction) -> bool {
        self.update_wall_at(coord, direction, true)
    }

    fn update_wall_at(&mut self, coord: GridCoordinate, direction: Direction, blocked: bool) -> bool {
        if !self.is_valid_coordinate(coord) {
            return false;
        }
        let neighbour = match self.offset_coordinate(coord, direction) {
            Some(n) => n,
            None => return false,
        };

        if let Some(cell) = self.cell_mut(coord) {
            if blocked {
                cell.add_wall(direction);
            } else {
                cell.remove_wall(direction);
            }
        }
        if let Some(cell) = self.cell_mut(neighbour) {
            if blocked {
                cell.add_wall(direction.opposite());
            } else {
                cell.remove_wall(direction.opposite());
            }
        }
        true
    }

    /// Remove the wall between two adjacent cells given only their
    /// positions, recovering the edge direction from the displacement.
    /// Wrap-wound border pairs are recognised when `wrap` is on. Returns
    /// false when the cells are not adjacent.
    pub fn remove_wall_between(&mut self, a: GridCoordinate, b: GridCoordinate) -> bool {
        self.update_wall_between(a, b, false)
    }

    /// Counterpart of `remove_wall_between` that rebuilds the wall.
    pub fn add_wall_between(&mut self, a: GridCoordinate, b: GridCoordinate) -> bool {
        self.update_wall_between(a, b, true)
    }

    fn update_wall_between(&mut self, a: GridCoordinate, b: GridCoordinate, blocked: bool) -> bool {
        if !self.is_valid_coordinate(a) || !self.is_valid_coordinate(b) {
            return false;
        }
        let (dir_a, dir_b) = match self.paired_directions(a, b) {
            Some(pair) => pair,
            None => return false,
        };

        if let Some(cell) = self.cell_mut(a) {
            if blocked {
                cell.add_wall(dir_a);
            } else {
                cell.remove_wall(dir_a);
            }
        }
        if let Some(cell) = self.cell_mut(b) {
            if blocked {
                cell.add_wall(dir_b);
            } else {
                cell.remove_wall(dir_b);
            }
        }
        true
    }

    /// The directions of the shared edge as seen from `a` and from `b`.
    /// Checks direct adjacency first, then the four wrap-wound border
    /// displacements.
    fn paired_directions(&self, a: GridCoordinate, b: GridCoordinate) -> Option<(Direction, Direction)> {
        let dx = i64::from(b.x) - i64::from(a.x);
        let dy = i64::from(b.y) - i64::from(a.y);

        if dx.abs() <= 1 && dy.abs() <= 1 {
            if let Some(direction) = Direction::from_vector(dx as i32, dy as i32) {
                return Some((direction, direction.opposite()));
            }
        }

        if !self.wrap {
            return None;
        }
        let w = self.width as i64;
        let h = self.height as i64;
        if dx == w - 1 && dy == 0 {
            Some((Direction::Left, Direction::Right))
        } else if dx == -(w - 1) && dy == 0 {
            Some((Direction::Right, Direction::Left))
        } else if dx == 0 && dy == h - 1 {
            Some((Direction::Up, Direction::Down))
        } else if dx == 0 && dy == -(h - 1) {
            Some((Direction::Down, Direction::Up))
        } else {
            None
        }
    }

    /// Reset every cell to fully walled and unvisited. Every generation
    /// run starts here, discarding all prior state.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::closed();
        }
    }

    pub fn iter(&self) -> CellIter {
        CellIter {
            current_cell_number: 0,
            width: self.width,
            cells_count: self.size(),
        }
    }

    /// Number of distinct open edges in the grid, wrap edges included.
    pub fn open_edge_count(&self) -> usize {
        let mut count = 0;
        for coord in self.iter() {
            for &direction in [Direction::Down, Direction::Right].iter() {
                if self.offset_coordinate(coord, direction).is_some()
                    && self.has_wall(coord, direction) == Some(false)
                {
                    count += 1;
                }
            }
        }
        count
    }

    /// Mapping from every cell to the cells reachable from it through open
    /// edges, ordered by `Direction::all()`.
    pub fn connection_graph(&self) -> FnvHashMap<GridCoordinate, CoordinateSmallVec> {
        let mut graph = utils::fnv_hashmap(self.size());
        for coord in self.iter() {
            graph.insert(coord, self.open_neighbours(coord));
        }
        graph
    }

    /// The open edge graph as an undirected petgraph graph, nodes in
    /// row-major order carrying their coordinate. Used for connectivity
    /// and acyclicity validation.
    pub fn as_graph(&self) -> UnGraph<GridCoordinate, ()> {
        let mut graph = UnGraph::with_capacity(self.size(), self.size() * 2);
        for coord in self.iter() {
            graph.add_node(coord);
        }
        for coord in self.iter() {
            for &direction in [Direction::Down, Direction::Right].iter() {
                if self.has_wall(coord, direction) != Some(false) {
                    continue;
                }
                if let Some(neighbour) = self.offset_coordinate(coord, direction) {
                    let a = NodeIndex::new(self.grid_coordinate_to_index(coord).unwrap_or(0));
                    let b = NodeIndex::new(self.grid_coordinate_to_index(neighbour).unwrap_or(0));
                    graph.update_edge(a, b, ());
                }
            }
        }
        graph
    }
}

fn validate_dimensions(width: usize, height: usize, symmetry: Symmetry) -> Result<(), GridError> {
    if width == 0 || height == 0 {
        return Err(GridError::ZeroDimension);
    }
    if symmetry.requires_even_width() && width % 2 != 0 {
        return Err(GridError::OddWidthForSymmetry(symmetry));
    }
    if symmetry.requires_even_height() && height % 2 != 0 {
        return Err(GridError::OddHeightForSymmetry(symmetry));
    }
    Ok(())
}

#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    current_cell_number: usize,
    width: usize,
    cells_count: usize,
}

impl Iterator for CellIter {
    type Item = GridCoordinate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let x = self.current_cell_number % self.width;
            let y = self.current_cell_number / self.width;
            self.current_cell_number += 1;
            Some(GridCoordinate::new(x as u32, y as u32))
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.cells_count - self.current_cell_number;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
