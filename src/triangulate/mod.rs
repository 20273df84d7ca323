//! Quality-refined planar triangulation of the ground point set.
//!
//! Points are projected onto the horizontal plane and triangulated with a
//! minimum-angle constraint. Refinement may insert synthetic points that have
//! no scanned elevation; [`steiner`] synthesizes one for each of them.

mod config;
mod planar_index;
pub mod steiner;
mod triangulator;

pub use config::TriangulationConfig;
pub use planar_index::PlanarIndex;
pub use steiner::{resolve_steiner_elevations, SteinerReport, SteinerWeight};
pub use triangulator::{triangulate, TriangulationError, TriangulationReport};
