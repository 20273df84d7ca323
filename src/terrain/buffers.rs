//! Vertex and index buffers shared by every pipeline stage.

use glam::Vec3;

use super::bounds::ElevationBounds;

/// The two containers every generation stage consumes and produces.
///
/// `indices` is a flat triangle list in runs of three. Stages either mutate
/// the buffers in place or replace them wholesale.
#[derive(Debug, Clone, Default)]
pub struct TerrainBuffers {
    /// Vertex positions (x, z horizontal, y elevation).
    pub vertices: Vec<Vec3>,
    /// Triangle index list.
    pub indices: Vec<u32>,
}

impl TerrainBuffers {
    /// Creates buffers holding an unconnected point set.
    pub fn from_points(vertices: Vec<Vec3>) -> Self {
        Self {
            vertices,
            indices: Vec::new(),
        }
    }

    /// Creates buffers from vertices and a triangle index list.
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Recomputes elevation bounds from the current vertices.
    pub fn bounds(&self) -> ElevationBounds {
        ElevationBounds::from_vertices(&self.vertices)
    }

    /// Returns the vertex indices of triangle `t`.
    pub fn triangle(&self, t: usize) -> [usize; 3] {
        let base = t * 3;
        [
            self.indices[base] as usize,
            self.indices[base + 1] as usize,
            self.indices[base + 2] as usize,
        ]
    }

    /// Iterates over all triangles as vertex index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
    }

    /// Average elevation of triangle `t`.
    pub fn triangle_average(&self, t: usize) -> f32 {
        let [a, b, c] = self.triangle(t);
        (self.vertices[a].y + self.vertices[b].y + self.vertices[c].y) / 3.0
    }

    /// Returns the first out-of-range index, if any.
    pub fn find_invalid_index(&self) -> Option<u32> {
        let n = self.vertices.len();
        self.indices.iter().copied().find(|&i| i as usize >= n)
    }

    /// Returns true when the index list is a whole number of triangles and
    /// every index references an existing vertex.
    pub fn is_valid(&self) -> bool {
        self.indices.len() % 3 == 0 && self.find_invalid_index().is_none()
    }

    /// Sum of all vertex elevations.
    pub fn total_elevation(&self) -> f64 {
        self.vertices.iter().map(|v| v.y as f64).sum()
    }

    /// Drops all vertex and index data.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}
