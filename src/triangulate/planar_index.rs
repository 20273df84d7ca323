//! Vertex reuse lookup keyed on horizontal position.

use std::collections::HashMap;

/// Hash grid mapping exact (x, z) coordinates to emitted vertex indices.
///
/// Coordinates are quantized to pick a bucket; inside the bucket positions are
/// compared exactly, so only points at the identical horizontal position share
/// an index.
#[derive(Debug, Clone)]
pub struct PlanarIndex {
    quantum: f32,
    buckets: HashMap<(i64, i64), Vec<(f32, f32, u32)>>,
}

impl Default for PlanarIndex {
    fn default() -> Self {
        Self::new(1.0e-3)
    }
}

impl PlanarIndex {
    /// Creates an index with the given bucket size.
    pub fn new(quantum: f32) -> Self {
        Self {
            quantum: quantum.max(f32::MIN_POSITIVE),
            buckets: HashMap::new(),
        }
    }

    fn key(&self, x: f32, z: f32) -> (i64, i64) {
        (
            (x / self.quantum).floor() as i64,
            (z / self.quantum).floor() as i64,
        )
    }

    /// Returns the index stored at exactly `(x, z)`, if any.
    pub fn get(&self, x: f32, z: f32) -> Option<u32> {
        self.buckets
            .get(&self.key(x, z))?
            .iter()
            .find(|&&(bx, bz, _)| bx == x && bz == z)
            .map(|&(_, _, idx)| idx)
    }

    /// Returns the existing index at `(x, z)` or records `next` there.
    ///
    /// The boolean is true when `next` was inserted.
    pub fn get_or_insert(&mut self, x: f32, z: f32, next: u32) -> (u32, bool) {
        if let Some(existing) = self.get(x, z) {
            return (existing, false);
        }
        let key = self.key(x, z);
        self.buckets.entry(key).or_default().push((x, z, next));
        (next, true)
    }

    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
