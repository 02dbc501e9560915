//! Geometry that is recomputed as the diagram changes: initial node
//! placement and relation routing.

pub mod placement;
pub mod routing;

pub use placement::{FixedPlacement, GridPlacement, PlacementStrategy, RandomPlacement};
pub use routing::{RouteCase, route, select_case};
