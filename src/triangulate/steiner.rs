//! Elevation synthesis for refinement (Steiner) points.
//!
//! Each triangle touching a synthetic point contributes the average of its
//! known vertices, blended into a running weighted average. Sweeps alternate
//! between forward and reverse triangle order so chains of adjacent synthetic
//! points influence each other in both directions.

use crate::terrain::MeshAdjacency;

/// Resolution state of a synthetic point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteinerWeight {
    /// No known neighbor has contributed yet.
    Unset,
    /// Being updated by the triangle currently visited.
    InProgress,
    /// Holds the number of known contributions blended so far.
    Resolved(u32),
}

/// Outcome of Steiner elevation resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SteinerReport {
    /// Synthetic points found in the input.
    pub steiner_points: usize,
    /// Points still unresolved after all relaxation sweeps.
    pub unresolved: usize,
    /// Points that had no defined neighbor at all and took the minimum
    /// known elevation.
    pub isolated: usize,
}

/// Assigns an elevation to every synthetic point.
///
/// `elevations[i]` is `None` for synthetic points. `triangles` is a flat index
/// list. `passes` sweeps are run, alternating direction, starting forward.
/// Points left unresolved are filled from the average of their defined
/// neighbors, repeated until nothing changes; whatever is still undefined
/// takes the lowest known elevation. Every returned height is defined.
pub fn resolve_steiner_elevations(
    elevations: &[Option<f32>],
    triangles: &[u32],
    passes: usize,
) -> (Vec<f32>, SteinerReport) {
    let n = elevations.len();
    let mut heights: Vec<f32> = elevations.iter().map(|e| e.unwrap_or(0.0)).collect();
    // None marks an original (scanned) vertex.
    let mut state: Vec<Option<SteinerWeight>> = elevations
        .iter()
        .map(|e| if e.is_some() { None } else { Some(SteinerWeight::Unset) })
        .collect();

    let mut report = SteinerReport {
        steiner_points: state.iter().filter(|s| s.is_some()).count(),
        ..Default::default()
    };
    if report.steiner_points == 0 {
        return (heights, report);
    }

    let tri_count = triangles.len() / 3;
    for pass in 0..passes {
        if pass % 2 == 0 {
            for t in 0..tri_count {
                relax_triangle(&triangles[t * 3..t * 3 + 3], &mut heights, &mut state);
            }
        } else {
            for t in (0..tri_count).rev() {
                relax_triangle(&triangles[t * 3..t * 3 + 3], &mut heights, &mut state);
            }
        }
    }

    let mut defined: Vec<bool> = state
        .iter()
        .map(|s| matches!(s, None | Some(SteinerWeight::Resolved(_))))
        .collect();
    report.unresolved = defined.iter().filter(|d| !**d).count();
    if report.unresolved == 0 {
        return (heights, report);
    }

    tracing::warn!(
        unresolved = report.unresolved,
        steiner = report.steiner_points,
        "steiner points without a known neighbor after relaxation; falling back to neighbor average"
    );

    let adjacency = MeshAdjacency::from_indices(n, triangles);
    loop {
        let mut filled = Vec::new();
        for v in 0..n {
            if defined[v] {
                continue;
            }
            let (sum, count) = adjacency
                .neighbors(v)
                .iter()
                .filter(|&&u| defined[u as usize])
                .fold((0.0f32, 0u32), |(s, c), &u| (s + heights[u as usize], c + 1));
            if count > 0 {
                filled.push((v, sum / count as f32));
            }
        }
        if filled.is_empty() {
            break;
        }
        for (v, h) in filled {
            heights[v] = h;
            defined[v] = true;
        }
    }

    let floor = elevations
        .iter()
        .flatten()
        .copied()
        .fold(None, |acc: Option<f32>, h| Some(acc.map_or(h, |a| a.min(h))))
        .unwrap_or(0.0);
    for v in 0..n {
        if !defined[v] {
            heights[v] = floor;
            report.isolated += 1;
        }
    }

    (heights, report)
}

/// Blends the known vertices of one triangle into its synthetic vertices.
fn relax_triangle(tri: &[u32], heights: &mut [f32], state: &mut [Option<SteinerWeight>]) {
    let verts = [tri[0] as usize, tri[1] as usize, tri[2] as usize];

    let known: [bool; 3] = verts.map(|v| match state[v] {
        None => true,
        Some(SteinerWeight::Resolved(w)) => w > 0,
        Some(_) => false,
    });
    let known_heights = verts.map(|v| heights[v]);

    // Mark every synthetic vertex as being updated, remembering its weight.
    let mut prior = [0u32; 3];
    for (k, &v) in verts.iter().enumerate() {
        if let Some(s) = state[v] {
            prior[k] = match s {
                SteinerWeight::Resolved(w) => w,
                _ => 0,
            };
            state[v] = Some(SteinerWeight::InProgress);
        }
    }

    for (k, &v) in verts.iter().enumerate() {
        if state[v].is_none() {
            continue;
        }

        let mut sum = 0.0f32;
        let mut count = 0u32;
        for m in 0..3 {
            if m != k && known[m] && verts[m] != v {
                sum += known_heights[m];
                count += 1;
            }
        }

        let weight = prior[k];
        if count == 0 {
            state[v] = Some(if weight > 0 {
                SteinerWeight::Resolved(weight)
            } else {
                SteinerWeight::Unset
            });
            continue;
        }

        let average = sum / count as f32;
        let blended = (heights[v] * weight as f32 + average * count as f32) / (weight + count) as f32;
        heights[v] = blended;
        state[v] = Some(SteinerWeight::Resolved(weight + count));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_no_steiner_points_is_identity() {
        let elev = [Some(1.0), Some(2.0), Some(3.0)];
        let (h, report) = resolve_steiner_elevations(&elev, &[0, 1, 2], 2);
        assert_eq!(h, vec![1.0, 2.0, 3.0]);
        assert_eq!(report, SteinerReport::default());
    }

    #[test]
    fn test_single_triangle_average() {
        let elev = [Some(1.0), Some(3.0), None];
        let (h, report) = resolve_steiner_elevations(&elev, &[0, 1, 2], 1);
        assert_relative_eq!(h[2], 2.0);
        assert_eq!(report.steiner_points, 1);
        assert_eq!(report.unresolved, 0);
    }

    #[test]
    fn test_blend_across_triangles() {
        // Steiner point 3 in the middle of a fan over three originals.
        let elev = [Some(0.0), Some(3.0), Some(6.0), None];
        let tris = [0, 1, 3, 1, 2, 3, 2, 0, 3];
        let (h, _) = resolve_steiner_elevations(&elev, &tris, 1);
        // Contributions 1.5, 4.5, 3.0 each with weight 2.
        assert_relative_eq!(h[3], 3.0, epsilon = 1e-6);
    }

    #[test]
    fn test_chain_resolves_over_two_passes() {
        // Triangle 1-2-3 is entirely synthetic and comes first, so a single
        // forward sweep cannot reach vertex 3. The reverse sweep can.
        let elev = [Some(4.0), None, None, None];
        let tris = [1, 2, 3, 0, 1, 2];

        let (_, one_pass) = resolve_steiner_elevations(&elev, &tris, 1);
        assert_eq!(one_pass.unresolved, 1);

        let (h, two_pass) = resolve_steiner_elevations(&elev, &tris, 2);
        assert_eq!(two_pass.unresolved, 0);
        assert_relative_eq!(h[1], 4.0, epsilon = 1e-6);
        assert_relative_eq!(h[3], 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_resolution_propagates_forward() {
        let elev = [Some(1.0), Some(1.0), None, None, None];
        let tris = [0, 1, 2, 2, 3, 4];
        let (h, report) = resolve_steiner_elevations(&elev, &tris, 1);
        assert_eq!(report.unresolved, 0);
        assert_relative_eq!(h[3], 1.0);
        assert_relative_eq!(h[4], 1.0);
    }

    #[test]
    fn test_neighbor_average_fallback() {
        let elev = [Some(1.0), Some(3.0), None, None, None];
        let tris = [2, 3, 4, 0, 1, 2];
        let (h, report) = resolve_steiner_elevations(&elev, &tris, 1);
        assert_eq!(report.unresolved, 2);
        assert_eq!(report.isolated, 0);
        assert_relative_eq!(h[2], 2.0);
        assert_relative_eq!(h[3], 2.0);
        assert_relative_eq!(h[4], 2.0);
    }

    #[test]
    fn test_isolated_synthetic_component() {
        let elev = [Some(2.5), None, None, None];
        let (h, report) = resolve_steiner_elevations(&elev, &[1, 2, 3], 2);
        assert_eq!(report.unresolved, 3);
        assert_eq!(report.isolated, 3);
        assert!(h.iter().all(|v| *v == 2.5));
    }
}
