use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

use crate::analysis::{self, MazeStatistics};
use crate::cells::GridCoordinate;
use crate::generators;
use crate::grid::{Grid, GridError};
use crate::symmetry::Symmetry;
use crate::tetris::{self, TetrisMazeConfig};
use crate::units::{Height, Width};

/// The closed set of generation strategies. Each is an operation over the
/// shared `Grid` value type; there is no shared mutable generator state.
#[derive(Debug, Clone)]
pub enum GenerationStrategy {
    /// Symmetric depth first carving followed by dead end elimination.
    RecursiveBacktracker { start: GridCoordinate },
    /// The multi stage piece pipeline.
    TetrisPieces(TetrisMazeConfig),
}

/// A generated board bound to its parameters and its seeded random
/// stream. Regeneration re-runs the strategy with a fresh draw from the
/// same stream, discarding all prior cell state.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    strategy: GenerationStrategy,
    rng: XorShiftRng,
}

impl Maze {
    /// Build and carve a maze with the DFS strategy. Dimension and
    /// symmetry validation happens before anything is allocated.
    pub fn dfs(
        width: Width,
        height: Height,
        wrap: bool,
        symmetry: Symmetry,
        start: GridCoordinate,
        seed: u64,
    ) -> Result<Maze, GridError> {
        let grid = Grid::new(width, height, wrap, symmetry)?;
        let mut maze = Maze {
            grid,
            strategy: GenerationStrategy::RecursiveBacktracker { start },
            rng: XorShiftRng::seed_from_u64(seed),
        };
        maze.generate()?;
        Ok(maze)
    }

    /// Build a maze with the piece pipeline strategy.
    pub fn tetris(config: TetrisMazeConfig, seed: u64) -> Result<Maze, GridError> {
        let mut rng = XorShiftRng::seed_from_u64(seed);
        let grid = tetris::generate(&config, &mut rng)?;
        Ok(Maze {
            grid,
            strategy: GenerationStrategy::TetrisPieces(config),
            rng,
        })
    }

    fn generate(&mut self) -> Result<(), GridError> {
        match self.strategy {
            GenerationStrategy::RecursiveBacktracker { start } => {
                generators::recursive_backtracker(&mut self.grid, start, &mut self.rng);
                generators::eliminate_dead_ends(&mut self.grid);
                Ok(())
            }
            GenerationStrategy::TetrisPieces(ref config) => {
                self.grid = tetris::generate(config, &mut self.rng)?;
                Ok(())
            }
        }
    }

    /// Re-run generation with the existing parameters and the next random
    /// draw. All prior cell state is discarded.
    pub fn regenerate(&mut self) -> Result<(), GridError> {
        self.generate()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn strategy(&self) -> &GenerationStrategy {
        &self.strategy
    }

    /// Aggregate statistics over the current board, computed per call.
    pub fn statistics(&self) -> MazeStatistics {
        analysis::statistics(&self.grid)
    }
}
