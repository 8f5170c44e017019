//! Mesh data and renderable geometry handles
//!
//! The mesh loader is an external collaborator: it hands over positions,
//! normals and triangle index triples as [`MeshData`]. The core validates the
//! arrays, optionally normalizes them, uploads them through a
//! [`RenderBackend`] and keeps only the resulting [`GeometryHandle`].
//!
//! Procedural primitives (cube, UV sphere) are provided for bounding-volume
//! visualization, track markers and headless demos.

use bytemuck::{Pod, Zeroable};

use crate::foundation::collections::MeshId;
use crate::foundation::math::{constants, Mat4, Vec3};
use crate::render::{BackendResult, DrawRequest, Material, ProgramId, RenderBackend};
use crate::scene::{bounds, SceneError};

/// Interleaved vertex layout handed to the render backend
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in object space
    pub position: [f32; 3],
    /// Surface normal
    pub normal: [f32; 3],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }
}

/// Geometry arrays as produced by a mesh loader
#[derive(Debug, Clone)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<Vec3>,
    /// Per-vertex normals (same length as `positions`)
    pub normals: Vec<Vec3>,
    /// Triangle index triples into `positions`
    pub triangles: Vec<[u32; 3]>,
}

impl MeshData {
    /// Validate and wrap loader output
    ///
    /// # Errors
    /// * [`SceneError::EmptyGeometry`] when there are no positions
    /// * [`SceneError::MalformedMesh`] when normals do not match positions or
    ///   an index is out of range
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Result<Self, SceneError> {
        if positions.is_empty() {
            return Err(SceneError::EmptyGeometry);
        }
        if normals.len() != positions.len() {
            return Err(SceneError::MalformedMesh(format!(
                "{} normals for {} positions",
                normals.len(),
                positions.len()
            )));
        }
        let vertex_count = positions.len();
        if let Some(bad) = triangles.iter().flatten().find(|&&i| i as usize >= vertex_count) {
            return Err(SceneError::MalformedMesh(format!(
                "index {bad} out of range for {vertex_count} vertices"
            )));
        }
        Ok(Self { positions, normals, triangles })
    }

    /// Number of indices drawn (three per triangle)
    pub fn index_count(&self) -> u32 {
        (self.triangles.len() * 3) as u32
    }

    /// Axis-aligned extent as `(min, max)`
    ///
    /// # Errors
    /// [`SceneError::EmptyGeometry`] when the mesh has no positions.
    pub fn extent(&self) -> Result<(Vec3, Vec3), SceneError> {
        bounds::extent(&self.positions)
    }

    /// Center the mesh on its bounding-box midpoint and scale it so the largest
    /// half-extent equals `target_half_extent`
    ///
    /// Flat meshes with zero extent are only recentered.
    ///
    /// # Errors
    /// [`SceneError::EmptyGeometry`] when the mesh has no positions.
    pub fn normalized(mut self, target_half_extent: f32) -> Result<Self, SceneError> {
        let (min, max) = self.extent()?;
        let midpoint = (min + max) * 0.5;
        let half_extent = ((max - min) * 0.5).max();
        let scale = if half_extent > constants::EPSILON {
            target_half_extent / half_extent
        } else {
            1.0
        };

        for p in &mut self.positions {
            *p = (*p - midpoint) * scale;
        }
        log::debug!(
            "Normalized mesh of {} vertices: midpoint {:?}, scale {:.4}",
            self.positions.len(),
            midpoint,
            scale
        );
        Ok(self)
    }

    /// Interleave positions and normals for upload
    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(p, n)| Vertex::new([p.x, p.y, p.z], [n.x, n.y, n.z]))
            .collect()
    }

    /// Flattened triangle indices
    pub fn indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Unit cube centered at the origin with corners at ±1
    pub fn cube() -> Self {
        let corners = [
            [-1.0, -1.0, 1.0],
            [1.0, -1.0, 1.0],
            [1.0, 1.0, 1.0],
            [-1.0, 1.0, 1.0],
            [-1.0, -1.0, -1.0],
            [-1.0, 1.0, -1.0],
            [1.0, 1.0, -1.0],
            [1.0, -1.0, -1.0],
        ];
        let positions: Vec<Vec3> = corners.iter().map(|c| Vec3::new(c[0], c[1], c[2])).collect();
        // Corner normals point away from the center
        let normals = positions.iter().map(|p| p.normalize()).collect();
        let triangles = vec![
            [0, 1, 2], [2, 3, 0],
            [4, 5, 6], [6, 7, 4],
            [4, 0, 3], [3, 5, 4],
            [1, 7, 6], [6, 2, 1],
            [3, 2, 6], [6, 5, 3],
            [4, 7, 1], [1, 0, 4],
        ];
        Self { positions, normals, triangles }
    }

    /// UV sphere of radius 1 centered at the origin
    ///
    /// `rings` and `segments` are clamped to at least 2 and 3.
    pub fn uv_sphere(rings: u32, segments: u32) -> Self {
        let rings = rings.max(2);
        let segments = segments.max(3);
        let mut positions = Vec::with_capacity(((rings + 1) * (segments + 1)) as usize);

        for ring in 0..=rings {
            let theta = constants::PI * ring as f32 / rings as f32;
            for segment in 0..=segments {
                let phi = 2.0 * constants::PI * segment as f32 / segments as f32;
                positions.push(Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin()));
            }
        }

        let stride = segments + 1;
        let mut triangles = Vec::with_capacity((rings * segments * 2) as usize);
        for ring in 0..rings {
            for segment in 0..segments {
                let a = ring * stride + segment;
                let b = a + stride;
                triangles.push([a, b, a + 1]);
                triangles.push([a + 1, b, b + 1]);
            }
        }

        let normals = positions.clone();
        Self { positions, normals, triangles }
    }
}

/// Opaque reference to a mesh resident in a render backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryHandle {
    mesh: MeshId,
    index_count: u32,
}

impl GeometryHandle {
    /// Wrap a backend mesh id
    pub fn new(mesh: MeshId, index_count: u32) -> Self {
        Self { mesh, index_count }
    }

    /// Backend mesh id
    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    /// Number of indices drawn
    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    /// Issue one draw request for this mesh
    pub fn draw(
        &self,
        backend: &mut dyn RenderBackend,
        model: Mat4,
        material: &Material,
        program: Option<ProgramId>,
    ) -> BackendResult<()> {
        backend.draw_mesh(&DrawRequest {
            geometry: *self,
            model,
            material: material.clone(),
            program,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_empty_mesh_is_rejected() {
        let result = MeshData::new(Vec::new(), Vec::new(), Vec::new());
        assert!(matches!(result, Err(SceneError::EmptyGeometry)));
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let positions = vec![Vec3::zeros(), Vec3::x(), Vec3::y()];
        let normals = vec![Vec3::z(); 3];
        let result = MeshData::new(positions, normals, vec![[0, 1, 3]]);
        assert!(matches!(result, Err(SceneError::MalformedMesh(_))));
    }

    #[test]
    fn test_normalized_centers_and_scales_largest_extent() {
        let positions = vec![Vec3::new(10.0, 0.0, 0.0), Vec3::new(14.0, 1.0, 2.0)];
        let normals = vec![Vec3::y(); 2];
        let mesh = MeshData::new(positions, normals, Vec::new())
            .expect("valid mesh")
            .normalized(7.5)
            .expect("non-empty");
        let (min, max) = mesh.extent().expect("non-empty");
        assert_relative_eq!(min, Vec3::new(-7.5, -1.875, -3.75), epsilon = 1e-5);
        assert_relative_eq!(max, Vec3::new(7.5, 1.875, 3.75), epsilon = 1e-5);
    }

    #[test]
    fn test_normalizing_empty_arrays_reports_empty_geometry() {
        let empty = MeshData { positions: Vec::new(), normals: Vec::new(), triangles: Vec::new() };
        assert!(matches!(empty.extent(), Err(SceneError::EmptyGeometry)));
        assert!(matches!(empty.normalized(7.5), Err(SceneError::EmptyGeometry)));
    }

    #[test]
    fn test_cube_mesh_structure() {
        let cube = MeshData::cube();
        assert_eq!(cube.positions.len(), 8, "Cube should have 8 vertices");
        assert_eq!(cube.index_count(), 36, "Cube should have 36 indices");
    }

    #[test]
    fn test_uv_sphere_vertices_lie_on_unit_sphere() {
        let sphere = MeshData::uv_sphere(8, 12);
        for p in &sphere.positions {
            assert_relative_eq!(p.magnitude(), 1.0, epsilon = 1e-5);
        }
        let vertex_count = sphere.positions.len() as u32;
        assert!(sphere.indices().iter().all(|&i| i < vertex_count));
    }

    #[test]
    fn test_vertex_layout_is_tightly_packed() {
        let cube = MeshData::cube();
        let vertices = cube.vertices();
        let bytes: &[u8] = bytemuck::cast_slice(&vertices);
        assert_eq!(bytes.len(), vertices.len() * 6 * std::mem::size_of::<f32>());
    }
}
