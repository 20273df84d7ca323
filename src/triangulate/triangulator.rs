//! Constrained Delaunay triangulation with minimum-angle refinement.

use glam::Vec3;
use spade::{
    AngleLimit, ConstrainedDelaunayTriangulation, HasPosition, InsertionError, Point2,
    RefinementParameters, Triangulation,
};
use thiserror::Error;

use crate::smoothing::order_smooth;
use crate::terrain::TerrainBuffers;

use super::config::TriangulationConfig;
use super::planar_index::PlanarIndex;
use super::steiner::{resolve_steiner_elevations, SteinerReport};

/// Errors related to triangulation.
#[derive(Debug, Error)]
pub enum TriangulationError {
    #[error("need at least 3 points to triangulate, got {0}")]
    TooFewPoints(usize),

    #[error("point insertion failed: {0:?}")]
    Insertion(InsertionError),

    #[error("triangulation of {0} points produced no triangles (collinear input?)")]
    Degenerate(usize),

    #[error("refinement did not converge after {attempts} attempts (last angle limit {angle_deg:.3} deg)")]
    RefinementDidNotConverge { attempts: usize, angle_deg: f64 },
}

impl From<InsertionError> for TriangulationError {
    fn from(err: InsertionError) -> Self {
        Self::Insertion(err)
    }
}

/// Summary of one triangulation run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TriangulationReport {
    pub input_points: usize,
    pub output_vertices: usize,
    pub triangles: usize,
    /// Angle limit of the attempt that succeeded.
    pub angle_limit_deg: f64,
    pub attempts: usize,
    pub steiner: SteinerReport,
}

/// Triangulation vertex: projected position plus optional scanned elevation.
///
/// Refinement creates new vertices through `From<Point2>`, which is how
/// synthetic points end up with no elevation.
#[derive(Debug, Clone, Copy)]
struct SurfacePoint {
    position: Point2<f64>,
    elevation: Option<f32>,
}

impl HasPosition for SurfacePoint {
    type Scalar = f64;

    fn position(&self) -> Point2<f64> {
        self.position
    }
}

impl From<Point2<f64>> for SurfacePoint {
    fn from(position: Point2<f64>) -> Self {
        Self {
            position,
            elevation: None,
        }
    }
}

type SurfaceCdt = ConstrainedDelaunayTriangulation<SurfacePoint>;

fn build_cdt(points: &[Vec3]) -> Result<SurfaceCdt, TriangulationError> {
    let surface: Vec<SurfacePoint> = points
        .iter()
        .map(|p| SurfacePoint {
            position: Point2::new(p.x as f64, p.z as f64),
            elevation: Some(p.y),
        })
        .collect();
    Ok(SurfaceCdt::bulk_load(surface)?)
}

/// Builds and refines the triangulation, relaxing the angle limit whenever a
/// refinement attempt hits the vertex cap.
fn refine_with_retry(
    points: &[Vec3],
    config: &TriangulationConfig,
) -> Result<(SurfaceCdt, f64, usize), TriangulationError> {
    let attempts = config.max_refinement_attempts.max(1);
    let max_added = config.max_additional_vertices(points.len());
    let mut angle = config.min_angle_deg;

    for attempt in 0..attempts {
        angle = config.angle_for_attempt(attempt);
        let mut cdt = build_cdt(points)?;
        if cdt.num_inner_faces() == 0 {
            return Err(TriangulationError::Degenerate(points.len()));
        }
        if angle <= 0.0 {
            return Ok((cdt, angle, attempt + 1));
        }

        let params = RefinementParameters::<f64>::new()
            .with_angle_limit(AngleLimit::from_deg(angle))
            .with_max_additional_vertices(max_added);
        let result = cdt.refine(params);

        if result.refinement_complete {
            return Ok((cdt, angle, attempt + 1));
        }
        tracing::debug!(attempt, angle_deg = angle, "refinement incomplete, relaxing angle limit");
    }

    Err(TriangulationError::RefinementDidNotConverge { attempts, angle_deg: angle })
}

/// Triangulates the deduplicated ground points.
///
/// Produces fresh buffers: every vertex has a defined elevation, triangles
/// wind counter-clockwise when viewed from above (+y), and a first-pass
/// ordering smooth has been applied.
pub fn triangulate(
    points: &[Vec3],
    config: &TriangulationConfig,
) -> Result<(TerrainBuffers, TriangulationReport), TriangulationError> {
    if points.len() < 3 {
        return Err(TriangulationError::TooFewPoints(points.len()));
    }

    let (cdt, angle, attempts) = refine_with_retry(points, config)?;

    // Emit vertices, reusing an index for identical horizontal positions.
    let mut index = PlanarIndex::default();
    let mut positions: Vec<(f32, f32)> = Vec::with_capacity(cdt.num_vertices());
    let mut elevations: Vec<Option<f32>> = Vec::with_capacity(cdt.num_vertices());
    let mut remap: Vec<u32> = vec![0; cdt.num_vertices()];

    for vh in cdt.vertices() {
        let data = vh.data();
        let x = data.position.x as f32;
        let z = data.position.y as f32;
        let (slot, inserted) = index.get_or_insert(x, z, positions.len() as u32);
        if inserted {
            positions.push((x, z));
            elevations.push(data.elevation);
        } else if elevations[slot as usize].is_none() {
            elevations[slot as usize] = data.elevation;
        }
        remap[vh.fix().index()] = slot;
    }

    let mut indices: Vec<u32> = Vec::with_capacity(cdt.num_inner_faces() * 3);
    for face in cdt.inner_faces() {
        let [a, b, c] = face.vertices().map(|v| remap[v.fix().index()]);
        if a == b || b == c || a == c {
            continue;
        }
        // spade winds counter-clockwise in (x, z); swap to face +y.
        indices.extend_from_slice(&[a, c, b]);
    }

    if indices.is_empty() {
        return Err(TriangulationError::Degenerate(points.len()));
    }

    let (heights, steiner) = resolve_steiner_elevations(&elevations, &indices, config.steiner_passes);

    let vertices = positions
        .iter()
        .zip(&heights)
        .map(|(&(x, z), &y)| Vec3::new(x, y, z))
        .collect();
    let mut buffers = TerrainBuffers::new(vertices, indices);
    order_smooth(&mut buffers);

    let report = TriangulationReport {
        input_points: points.len(),
        output_vertices: buffers.vertex_count(),
        triangles: buffers.triangle_count(),
        angle_limit_deg: angle,
        attempts,
        steiner,
    };

    tracing::debug!(
        steiner_points = steiner.steiner_points,
        unresolved = steiner.unresolved,
        angle_limit_deg = angle,
        attempts,
        "triangulation finished"
    );

    Ok((buffers, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize, spacing: f32, height: impl Fn(usize, usize) -> f32) -> Vec<Vec3> {
        let mut pts = Vec::new();
        for i in 0..n {
            for j in 0..n {
                pts.push(Vec3::new(i as f32 * spacing, height(i, j), j as f32 * spacing));
            }
        }
        pts
    }

    fn face_normal(buffers: &TerrainBuffers, t: usize) -> Vec3 {
        let [a, b, c] = buffers.triangle(t);
        let (a, b, c) = (buffers.vertices[a], buffers.vertices[b], buffers.vertices[c]);
        (b - a).cross(c - a)
    }

    #[test]
    fn test_grid_triangulation_is_valid() {
        let pts = grid(5, 1.0, |_, _| 2.0);
        let (buffers, report) = triangulate(&pts, &TriangulationConfig::default()).unwrap();

        assert!(buffers.is_valid());
        assert!(buffers.triangle_count() >= 32);
        assert!(buffers.vertices.iter().all(|v| v.is_finite()));
        assert_eq!(report.input_points, 25);
        assert_eq!(report.attempts, 1);
    }

    #[test]
    fn test_triangles_face_up() {
        let pts = grid(4, 1.0, |i, j| (i + j) as f32 * 0.01);
        let (buffers, _) = triangulate(&pts, &TriangulationConfig::default()).unwrap();
        for t in 0..buffers.triangle_count() {
            assert!(face_normal(&buffers, t).y > 0.0);
        }
    }

    #[test]
    fn test_refinement_points_get_elevation() {
        // A long sliver fan forces refinement to insert points.
        let mut pts = vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(10.0, 3.0, 0.0),
            Vec3::new(5.0, 2.0, 0.3),
            Vec3::new(5.0, 2.0, -0.3),
        ];
        pts.push(Vec3::new(2.0, 1.5, 0.1));
        let config = TriangulationConfig {
            min_angle_deg: 25.0,
            ..Default::default()
        };

        let (buffers, report) = triangulate(&pts, &config).unwrap();
        assert!(report.output_vertices >= pts.len());
        assert!(buffers.is_valid());
        assert!(buffers.vertices.iter().all(|v| v.y.is_finite()));

        // Synthetic elevations are blends of scanned ones.
        let bounds = buffers.bounds();
        assert!(bounds.min >= 1.0 - 1e-4);
        assert!(bounds.max <= 3.0 + 1e-4);
    }

    #[test]
    fn test_original_points_are_kept() {
        let pts = grid(3, 2.0, |i, j| (i * 3 + j) as f32);
        let (buffers, _) = triangulate(&pts, &TriangulationConfig::default()).unwrap();
        for p in &pts {
            assert!(buffers
                .vertices
                .iter()
                .any(|v| v.x == p.x && v.z == p.z));
        }
    }

    fn sliver() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(10.0, 3.0, 0.0),
            Vec3::new(5.0, 2.0, 0.3),
            Vec3::new(5.0, 2.0, -0.3),
        ]
    }

    #[test]
    fn test_refinement_gives_up_after_bounded_attempts() {
        let config = TriangulationConfig {
            min_angle_deg: 30.0,
            max_additional_vertices_factor: 0.0,
            ..Default::default()
        };
        let err = triangulate(&sliver(), &config).unwrap_err();
        match err {
            TriangulationError::RefinementDidNotConverge { attempts, angle_deg } => {
                assert_eq!(attempts, 3);
                assert!((angle_deg - 7.5).abs() < 1e-9);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_relaxed_attempt_succeeds() {
        // Isosceles triangle with 20 degree base angles: too sharp for a
        // 30 degree limit, fine once relaxed to 15.
        let h = 20.0f32.to_radians().tan() * 0.5;
        let pts = vec![
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.5, 2.0, h),
        ];
        let config = TriangulationConfig {
            min_angle_deg: 30.0,
            max_additional_vertices_factor: 0.0,
            ..Default::default()
        };

        let (buffers, report) = triangulate(&pts, &config).unwrap();

        assert_eq!(report.attempts, 2);
        assert!(report.attempts > 1);
        assert!(report.angle_limit_deg < config.min_angle_deg);
        assert!((report.angle_limit_deg - 15.0).abs() < 1e-9);
        assert_eq!(buffers.triangle_count(), 1);
        assert_eq!(report.steiner.steiner_points, 0);
    }

    #[test]
    fn test_too_few_points() {
        let err = triangulate(&[Vec3::ZERO, Vec3::X], &TriangulationConfig::default()).unwrap_err();
        assert!(matches!(err, TriangulationError::TooFewPoints(2)));
    }

    #[test]
    fn test_collinear_points_are_degenerate() {
        let pts: Vec<Vec3> = (0..5).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let err = triangulate(&pts, &TriangulationConfig::default()).unwrap_err();
        assert!(matches!(err, TriangulationError::Degenerate(5)));
    }
}
