//! Vertex adjacency derived from a triangle list.

/// For every vertex, the vertices that share at least one triangle with it.
///
/// Neighbors are listed in first-found order while scanning the triangle list
/// front to back, without duplicates and without the vertex itself.
#[derive(Debug, Clone, Default)]
pub struct MeshAdjacency {
    neighbors: Vec<Vec<u32>>,
}

impl MeshAdjacency {
    /// Builds adjacency for `vertex_count` vertices from a flat index list.
    pub fn from_indices(vertex_count: usize, indices: &[u32]) -> Self {
        let mut neighbors: Vec<Vec<u32>> = vec![Vec::new(); vertex_count];

        for tri in indices.chunks_exact(3) {
            for (k, &v) in tri.iter().enumerate() {
                let list = &mut neighbors[v as usize];
                for (m, &other) in tri.iter().enumerate() {
                    if m != k && other != v && !list.contains(&other) {
                        list.push(other);
                    }
                }
            }
        }

        Self { neighbors }
    }

    /// Neighbors of vertex `v`.
    pub fn neighbors(&self, v: usize) -> &[u32] {
        &self.neighbors[v]
    }

    pub fn vertex_count(&self) -> usize {
        self.neighbors.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_found_order() {
        // Two triangles sharing edge 1-2.
        let adj = MeshAdjacency::from_indices(4, &[0, 1, 2, 2, 1, 3]);
        assert_eq!(adj.neighbors(0), &[1, 2]);
        assert_eq!(adj.neighbors(1), &[0, 2, 3]);
        assert_eq!(adj.neighbors(2), &[0, 1, 3]);
        assert_eq!(adj.neighbors(3), &[2, 1]);
    }

    #[test]
    fn test_isolated_vertex() {
        let adj = MeshAdjacency::from_indices(4, &[0, 1, 2]);
        assert!(adj.neighbors(3).is_empty());
        assert_eq!(adj.vertex_count(), 4);
    }
}
