//! Ground mesh input interface.

use glam::Vec3;

/// A vertex buffer classified as walkable ground by an external step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundMesh {
    pub vertices: Vec<Vec3>,
}

impl GroundMesh {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Self { vertices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

/// Supplier of already-classified ground meshes in a shared coordinate frame.
pub trait GroundMeshSource {
    /// Returns every ground mesh currently known to the source.
    fn ground_meshes(&self) -> Vec<GroundMesh>;
}

impl GroundMeshSource for [GroundMesh] {
    fn ground_meshes(&self) -> Vec<GroundMesh> {
        self.to_vec()
    }
}

impl GroundMeshSource for Vec<GroundMesh> {
    fn ground_meshes(&self) -> Vec<GroundMesh> {
        self.clone()
    }
}

/// Concatenates all ground mesh vertices into one sequence.
pub fn collect_ground_vertices<S: GroundMeshSource + ?Sized>(source: &S) -> Vec<Vec3> {
    let meshes = source.ground_meshes();
    let total: usize = meshes.iter().map(GroundMesh::vertex_count).sum();

    let mut vertices = Vec::with_capacity(total);
    for mesh in meshes {
        vertices.extend(mesh.vertices);
    }
    vertices
}
