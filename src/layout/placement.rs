//! Initial node placement.
//!
//! Placement only decides where a node starts; the user is expected to drag
//! nodes into a readable arrangement.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::geometry::Point;
use crate::options::PlacementBounds;
use crate::schema::Table;

pub trait PlacementStrategy {
    /// Top-left corner for the `index`-th table of the schema.
    fn place(&mut self, index: usize, table: &Table, bounds: &PlacementBounds) -> Point;
}

/// Uniformly random positions inside the placement bounds.
pub struct RandomPlacement {
    rng: StdRng,
}

impl RandomPlacement {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomPlacement {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementStrategy for RandomPlacement {
    fn place(&mut self, _index: usize, _table: &Table, bounds: &PlacementBounds) -> Point {
        let top = bounds.origin
            + self.rng.r#gen::<f64>() * (bounds.max_top - bounds.min_top)
            + bounds.min_top;
        let left = bounds.origin
            + self.rng.r#gen::<f64>() * (bounds.max_left - bounds.min_left)
            + bounds.min_left;
        Point::new(left, top)
    }
}

/// Row-major grid, deterministic.
#[derive(Debug, Clone)]
pub struct GridPlacement {
    pub columns: usize,
    pub cell_width: f64,
    pub cell_height: f64,
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self {
            columns: 4,
            cell_width: 320.0,
            cell_height: 300.0,
        }
    }
}

impl PlacementStrategy for GridPlacement {
    fn place(&mut self, index: usize, _table: &Table, bounds: &PlacementBounds) -> Point {
        let columns = self.columns.max(1);
        let col = (index % columns) as f64;
        let row = (index / columns) as f64;
        Point::new(
            bounds.origin + bounds.min_left + col * self.cell_width,
            bounds.origin + bounds.min_top + row * self.cell_height,
        )
    }
}

/// Positions chosen by the host, keyed by table name.
#[derive(Debug, Clone, Default)]
pub struct FixedPlacement {
    positions: HashMap<String, Point>,
    fallback: Point,
}

impl FixedPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, table: impl Into<String>, position: Point) -> Self {
        self.positions.insert(table.into(), position);
        self
    }

    /// Where tables without an explicit position go.
    pub fn fallback(mut self, position: Point) -> Self {
        self.fallback = position;
        self
    }
}

impl PlacementStrategy for FixedPlacement {
    fn place(&mut self, _index: usize, table: &Table, _bounds: &PlacementBounds) -> Point {
        self.positions
            .get(&table.name)
            .copied()
            .unwrap_or(self.fallback)
    }
}
