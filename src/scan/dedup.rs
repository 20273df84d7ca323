//! Visible-from-above vertex deduplication.

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Default horizontal deduplication tolerance.
pub const DEFAULT_PRECISION: f32 = 0.011;

/// Parameters for the vertex collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Two vertices closer than this on both horizontal axes are duplicates.
    pub precision: f32,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

type CellKey = (i64, i64);

/// Uniform grid over the horizontal plane holding already-kept vertices.
struct KeptGrid {
    cell: f32,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl KeptGrid {
    fn new(cell: f32) -> Self {
        Self {
            cell,
            cells: HashMap::new(),
        }
    }

    fn key(&self, v: Vec3) -> CellKey {
        (
            (v.x / self.cell).floor() as i64,
            (v.z / self.cell).floor() as i64,
        )
    }

    fn insert(&mut self, v: Vec3, slot: usize) {
        let key = self.key(v);
        self.cells.entry(key).or_default().push(slot);
    }

    /// True if any kept vertex lies within `cell` of `v` on both axes.
    fn has_neighbor(&self, v: Vec3, kept: &[Vec3]) -> bool {
        let (cx, cz) = self.key(v);
        for dx in -1..=1 {
            for dz in -1..=1 {
                let Some(slots) = self.cells.get(&(cx.saturating_add(dx), cz.saturating_add(dz))) else {
                    continue;
                };
                let near = slots.iter().any(|&s| {
                    let k = kept[s];
                    (k.x - v.x).abs() < self.cell && (k.z - v.z).abs() < self.cell
                });
                if near {
                    return true;
                }
            }
        }
        false
    }
}

/// Removes near-duplicate and occluded vertices.
///
/// Vertices are sorted by elevation and scanned from the highest down; a
/// vertex survives only if no already-kept vertex lies within `precision` of
/// it on both the x and z axes. Of any cluster that projects onto the same
/// horizontal spot, the highest member is the one retained.
///
/// The result is a subset of the input, ordered by ascending elevation.
/// Non-finite vertices are dropped.
pub fn deduplicate(vertices: &[Vec3], precision: f32) -> Vec<Vec3> {
    let mut sorted: Vec<Vec3> = vertices.iter().copied().filter(|v| v.is_finite()).collect();
    let dropped = vertices.len() - sorted.len();
    if dropped > 0 {
        tracing::warn!(dropped, "discarded non-finite ground vertices");
    }

    sorted.sort_by(|a, b| a.y.total_cmp(&b.y));

    if precision <= 0.0 {
        return sorted;
    }

    let mut grid = KeptGrid::new(precision);
    let mut kept: Vec<Vec3> = Vec::with_capacity(sorted.len());

    for &v in sorted.iter().rev() {
        if grid.has_neighbor(v, &kept) {
            continue;
        }
        grid.insert(v, kept.len());
        kept.push(v);
    }

    kept.reverse();
    kept
}
