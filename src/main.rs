use docopt::Docopt;
use serde_derive::Deserialize;
use symmaze::{
    cells::GridCoordinate,
    grid_displays,
    maze::Maze,
    pathing::Distances,
    symmetry::Symmetry,
    tetris::TetrisMazeConfig,
    units::{Height, Width},
};
use std::{fs::File, io, io::prelude::*};

const USAGE: &str = "Symmaze

Usage:
    symmaze_driver -h | --help
    symmaze_driver dfs [--grid-width=<w> --grid-height=<h>] [--symmetry=<mode>] [--wrap] [--seed=<n>] [--simple] [--stats] [--text-out=<path>]
    symmaze_driver tetris [--target-width=<w> --target-height=<h>] [--seed=<n>] [--simple] [--stats] [--text-out=<path>]

Options:
    -h --help            Show this screen.
    --grid-width=<w>     The grid width in a w*h grid [default: 20].
    --grid-height=<h>    The grid height in a w*h grid [default: 20].
    --symmetry=<mode>    One of none|horizontal|vertical|rotational|both [default: none].
    --wrap               Opposite borders count as adjacent (tunnels).
    --seed=<n>           Seed for the deterministic random stream [default: 0].
    --target-width=<w>   Final width of the piece pipeline board [default: 28].
    --target-height=<h>  Final height of the piece pipeline board [default: 31].
    --simple             Render one character per cell instead of drawing every wall.
    --stats              Print the aggregate maze statistics.
    --text-out=<path>    Output file path for the textual rendering.
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    cmd_dfs: bool,
    cmd_tetris: bool,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_symmetry: String,
    flag_wrap: bool,
    flag_seed: u64,
    flag_target_width: usize,
    flag_target_height: usize,
    flag_simple: bool,
    flag_stats: bool,
    flag_text_out: String,
}

// All driver failures funnel into one error type; the lib's own errors
// chain in as foreign links.
mod errors {
    use error_chain::*;
    error_chain! {
        foreign_links {
            DocOptFailure(::docopt::Error);
            Generation(::symmaze::grid::GridError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let maze = build_maze(&args)?;

    let rendered = if args.flag_simple {
        grid_displays::simple_string(maze.grid())
    } else {
        format!("{}", maze.grid())
    };

    if args.flag_text_out.is_empty() {
        println!("{}", rendered);
    } else {
        write_text_to_file(&rendered, &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    if args.flag_stats {
        println!("{}", maze.statistics());
        let origin = GridCoordinate::new(0, 0);
        if let Some(distances) = Distances::<u32>::new(maze.grid(), origin) {
            println!(
                "reachable from (0, 0): {} of {} cells",
                distances.reachable_cell_count(),
                maze.grid().size()
            );
        }
    }

    Ok(())
}

fn build_maze(args: &DriverArgs) -> Result<Maze> {
    if args.cmd_tetris {
        let config = TetrisMazeConfig {
            target_width: args.flag_target_width,
            target_height: args.flag_target_height,
            ..TetrisMazeConfig::default()
        };
        Ok(Maze::tetris(config, args.flag_seed)?)
    } else {
        let symmetry = parse_symmetry(&args.flag_symmetry)?;
        Ok(Maze::dfs(
            Width(args.flag_grid_width),
            Height(args.flag_grid_height),
            args.flag_wrap,
            symmetry,
            GridCoordinate::new(0, 0),
            args.flag_seed,
        )?)
    }
}

fn parse_symmetry(mode: &str) -> Result<Symmetry> {
    match mode.to_lowercase().as_str() {
        "none" => Ok(Symmetry::None),
        "horizontal" => Ok(Symmetry::Horizontal),
        "vertical" => Ok(Symmetry::Vertical),
        "rotational" => Ok(Symmetry::Rotational),
        "both" => Ok(Symmetry::Both),
        other => Err(format!("Unknown symmetry mode: {}", other).into()),
    }
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
