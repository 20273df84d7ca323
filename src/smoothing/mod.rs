//! Cliff removal by raising low triangle corners toward their triangle's
//! average elevation.
//!
//! Scan noise leaves isolated pits and micro-cliffs. Both passes here only
//! ever raise vertices, and they visit triangles from high to low so that
//! elevation propagates downward from the peaks.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::terrain::TerrainBuffers;

/// Averages below this are treated as "no real triangle left".
pub const NO_TRIANGLE_FLOOR: f32 = -1.0e30;

/// Counters from one smoothing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmoothingReport {
    pub triangles_processed: usize,
    pub vertices_raised: usize,
}

#[derive(Clone, Copy, Debug)]
struct HeapItem {
    average: f32,
    triangle: u32,
}

impl PartialEq for HeapItem {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapItem {}

impl PartialOrd for HeapItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Max-heap by average; ties pop the lowest triangle index first.
impl Ord for HeapItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.average
            .total_cmp(&other.average)
            .then_with(|| other.triangle.cmp(&self.triangle))
    }
}

/// Raises every corner of triangle `t` that sits below `average`.
fn raise_corners(buffers: &mut TerrainBuffers, t: usize, average: f32) -> [Option<usize>; 3] {
    let mut raised = [None; 3];
    for (k, v) in buffers.triangle(t).into_iter().enumerate() {
        if buffers.vertices[v].y < average {
            buffers.vertices[v].y = average;
            raised[k] = Some(v);
        }
    }
    raised
}

/// Greedy high-to-low smoothing.
///
/// Repeatedly takes the unprocessed triangle with the highest current average
/// elevation, raises its corners that lie below that average, and retires it.
/// Raising a vertex lifts the averages of the other triangles that share it,
/// so those are re-queued with their new value; elevations never decrease, so
/// a queued entry is stale exactly when it no longer matches the triangle's
/// current average.
///
/// Afterwards every triangle's lowest corner is at or above the average the
/// triangle had before the pass.
pub fn smooth_mesh(buffers: &mut TerrainBuffers) -> SmoothingReport {
    let tri_count = buffers.triangle_count();
    let mut report = SmoothingReport::default();
    if tri_count == 0 {
        return report;
    }

    // Triangles incident to each vertex.
    let mut incident: Vec<Vec<u32>> = vec![Vec::new(); buffers.vertex_count()];
    for (t, tri) in buffers.triangles().enumerate() {
        for v in tri {
            incident[v].push(t as u32);
        }
    }

    let mut averages: Vec<f32> = (0..tri_count).map(|t| buffers.triangle_average(t)).collect();
    let mut heap: BinaryHeap<HeapItem> = averages
        .iter()
        .enumerate()
        .map(|(t, &average)| HeapItem {
            average,
            triangle: t as u32,
        })
        .collect();

    while let Some(item) = heap.pop() {
        let t = item.triangle as usize;
        if averages[t] != item.average {
            continue;
        }
        if item.average < NO_TRIANGLE_FLOOR {
            break;
        }

        let raised = raise_corners(buffers, t, item.average);
        averages[t] = f32::NEG_INFINITY;
        report.triangles_processed += 1;

        for v in raised.into_iter().flatten() {
            report.vertices_raised += 1;
            for &other in &incident[v] {
                let o = other as usize;
                if averages[o] == f32::NEG_INFINITY {
                    continue;
                }
                let updated = buffers.triangle_average(o);
                if updated != averages[o] {
                    averages[o] = updated;
                    heap.push(HeapItem {
                        average: updated,
                        triangle: other,
                    });
                }
            }
        }
    }

    report
}

/// One-pass ordering smooth.
///
/// Triangles are sorted once by descending average elevation; each is then
/// visited in that order and its corners below its *current* average are
/// raised to it. The effect is cumulative: a vertex raised by a higher
/// triangle lifts the average seen later by a lower neighbor.
pub fn order_smooth(buffers: &mut TerrainBuffers) -> SmoothingReport {
    let tri_count = buffers.triangle_count();
    let mut order: Vec<(f32, usize)> = (0..tri_count).map(|t| (buffers.triangle_average(t), t)).collect();
    order.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut report = SmoothingReport::default();
    for (_, t) in order {
        let average = buffers.triangle_average(t);
        let raised = raise_corners(buffers, t, average);
        report.triangles_processed += 1;
        report.vertices_raised += raised.iter().flatten().count();
    }
    report
}
