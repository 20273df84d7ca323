//! Droplet-based hydraulic erosion over mesh adjacency.
//!
//! Droplets walk from vertex to lowest neighboring vertex, eroding on the way
//! down and filling basins they get stuck in. No raster grid is involved.
//! Droplets run strictly one after another: each one sees the terrain as the
//! previous ones left it.

mod config;
mod droplet;
mod simulate;

pub use config::ErosionConfig;
pub use droplet::{Droplet, StepOutcome, StepResult};
pub use simulate::{simulate_erosion, ErosionReport};
