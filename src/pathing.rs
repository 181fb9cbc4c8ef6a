use std::fmt::Debug;
use std::ops::Add;

use num::traits::{Bounded, One, Unsigned, Zero};

use crate::cells::GridCoordinate;
use crate::grid::Grid;
use crate::utils::{self, FnvHashMap};

// Trait used purely as a generic type parameter alias; spelling the full
// bound list at every use site is uglier.
pub trait MaxDistance: Zero + One + Bounded + Unsigned + Add + Debug + Copy + Clone + Ord {}

impl<T: Zero + One + Bounded + Unsigned + Add + Debug + Copy + Clone + Ord> MaxDistance for T {}

/// Flood fill distances from a start cell through open edges.
///
/// Every step costs one, so a frontier-at-a-time sweep already yields
/// shortest distances; the map doubles as the visited set. Used for the
/// basic reachability validation the generators rely on.
#[derive(Debug, Clone)]
pub struct Distances<MaxDistanceT = u32> {
    start_coordinate: GridCoordinate,
    distances: FnvHashMap<GridCoordinate, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<MaxDistanceT> Distances<MaxDistanceT>
where
    MaxDistanceT: MaxDistance,
{
    /// `None` when the start coordinate lies outside the grid.
    pub fn new(grid: &Grid, start_coordinate: GridCoordinate) -> Option<Distances<MaxDistanceT>> {
        if !grid.is_valid_coordinate(start_coordinate) {
            return None;
        }

        let mut distances = utils::fnv_hashmap(grid.size());
        distances.insert(start_coordinate, MaxDistanceT::zero());
        let mut max_distance = MaxDistanceT::zero();

        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {
            let mut new_frontier = vec![];

            for coord in frontier {
                let distance_to_cell = distances[&coord];
                if distance_to_cell > max_distance {
                    max_distance = distance_to_cell;
                }

                for linked in grid.open_neighbours(coord).iter() {
                    if !distances.contains_key(linked) {
                        distances.insert(*linked, distance_to_cell + MaxDistanceT::one());
                        new_frontier.push(*linked);
                    }
                }
            }

            frontier = new_frontier;
        }

        Some(Distances {
            start_coordinate,
            distances,
            max_distance,
        })
    }

    #[inline]
    pub fn start(&self) -> GridCoordinate {
        self.start_coordinate
    }

    #[inline]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    /// `None` when the cell is unreachable from the start.
    #[inline]
    pub fn distance_from_start_to(&self, coord: GridCoordinate) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    /// How many cells the start can reach, itself included.
    #[inline]
    pub fn reachable_cell_count(&self) -> usize {
        self.distances.len()
    }
}
