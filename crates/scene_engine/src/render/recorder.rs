//! Headless backend that records every request of the current frame
//!
//! Used by the demo binaries and by tests to observe exactly what a scene
//! asked the renderer to do.

use crate::foundation::collections::{HandleMap, MeshId};
use crate::render::{
    BackendResult, BoundsRequest, DrawRequest, FrameUniforms, GeometryHandle, LineRequest, MeshData,
    RenderBackend, RenderError, Vertex,
};

/// Mesh resident in the recording backend
#[derive(Debug, Clone)]
struct ResidentMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

/// Everything submitted between `begin_frame` and `end_frame`
#[derive(Debug, Clone, Default)]
pub struct RecordedFrame {
    /// Uniforms passed to `begin_frame`
    pub uniforms: Option<FrameUniforms>,
    /// Mesh draws in submission order
    pub draws: Vec<DrawRequest>,
    /// Bounding-sphere draws
    pub bounds: Vec<BoundsRequest>,
    /// Line draws
    pub lines: Vec<LineRequest>,
}

/// Recording render backend
#[derive(Debug, Default)]
pub struct RecordingBackend {
    meshes: HandleMap<MeshId, ResidentMesh>,
    current: RecordedFrame,
    last: RecordedFrame,
    frames: u64,
    in_frame: bool,
}

impl RecordingBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests of the frame in progress (or the last one if none is open)
    pub fn frame(&self) -> &RecordedFrame {
        if self.in_frame {
            &self.current
        } else {
            &self.last
        }
    }

    /// Number of completed frames
    pub fn frames_completed(&self) -> u64 {
        self.frames
    }

    /// Number of uploaded meshes
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Total bytes of vertex data uploaded
    pub fn vertex_bytes(&self) -> usize {
        self.meshes
            .values()
            .map(|mesh| bytemuck::cast_slice::<Vertex, u8>(&mesh.vertices).len())
            .sum()
    }

    fn check_mesh(&self, handle: &GeometryHandle) -> BackendResult<()> {
        let mesh = self.meshes.get(handle.mesh()).ok_or(RenderError::UnknownMesh(handle.mesh()))?;
        if mesh.indices.len() != handle.index_count() as usize {
            return Err(RenderError::Backend(format!(
                "handle expects {} indices, mesh has {}",
                handle.index_count(),
                mesh.indices.len()
            )));
        }
        Ok(())
    }

    fn check_open(&self) -> BackendResult<()> {
        if self.in_frame {
            Ok(())
        } else {
            Err(RenderError::NoActiveFrame)
        }
    }
}

impl RenderBackend for RecordingBackend {
    fn upload_mesh(&mut self, mesh: &MeshData) -> BackendResult<GeometryHandle> {
        if mesh.positions.is_empty() || mesh.triangles.is_empty() {
            return Err(RenderError::EmptyMesh);
        }
        let resident = ResidentMesh { vertices: mesh.vertices(), indices: mesh.indices() };
        let index_count = mesh.index_count();
        let id = self.meshes.insert(resident);
        log::debug!("Uploaded mesh {:?}: {} vertices, {} indices", id, mesh.positions.len(), index_count);
        Ok(GeometryHandle::new(id, index_count))
    }

    fn begin_frame(&mut self, uniforms: &FrameUniforms) -> BackendResult<()> {
        self.current = RecordedFrame { uniforms: Some(uniforms.clone()), ..RecordedFrame::default() };
        self.in_frame = true;
        Ok(())
    }

    fn draw_mesh(&mut self, request: &DrawRequest) -> BackendResult<()> {
        self.check_open()?;
        self.check_mesh(&request.geometry)?;
        self.current.draws.push(request.clone());
        Ok(())
    }

    fn draw_bounds(&mut self, request: &BoundsRequest) -> BackendResult<()> {
        self.check_open()?;
        self.current.bounds.push(*request);
        Ok(())
    }

    fn draw_lines(&mut self, request: &LineRequest) -> BackendResult<()> {
        self.check_open()?;
        self.current.lines.push(request.clone());
        Ok(())
    }

    fn end_frame(&mut self) -> BackendResult<()> {
        self.check_open()?;
        self.last = std::mem::take(&mut self.current);
        self.in_frame = false;
        self.frames += 1;
        log::trace!(
            "Frame {} recorded: {} draws, {} bounds, {} line batches",
            self.frames,
            self.last.draws.len(),
            self.last.bounds.len(),
            self.last.lines.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Vec3};
    use crate::render::Material;

    fn uniforms() -> FrameUniforms {
        FrameUniforms { view: Mat4::identity(), projection: Mat4::identity(), eye: Vec3::zeros(), light: None }
    }

    #[test]
    fn test_draw_outside_frame_is_rejected() {
        let mut backend = RecordingBackend::new();
        let cube = backend.upload_mesh(&MeshData::cube()).expect("upload");
        let result = cube.draw(&mut backend, Mat4::identity(), &Material::default(), None);
        assert!(matches!(result, Err(RenderError::NoActiveFrame)));
    }

    #[test]
    fn test_frame_records_draws() {
        let mut backend = RecordingBackend::new();
        let cube = backend.upload_mesh(&MeshData::cube()).expect("upload");
        backend.begin_frame(&uniforms()).expect("begin");
        cube.draw(&mut backend, Mat4::identity(), &Material::default(), None).expect("draw");
        backend.end_frame().expect("end");

        assert_eq!(backend.frame().draws.len(), 1);
        assert_eq!(backend.frames_completed(), 1);
        assert_eq!(backend.vertex_bytes(), 8 * std::mem::size_of::<Vertex>());
    }

    #[test]
    fn test_empty_upload_is_rejected() {
        let mut backend = RecordingBackend::new();
        let empty = MeshData { positions: Vec::new(), normals: Vec::new(), triangles: Vec::new() };
        assert!(matches!(backend.upload_mesh(&empty), Err(RenderError::EmptyMesh)));

        let points_only = MeshData { positions: vec![Vec3::zeros()], normals: vec![Vec3::y()], triangles: Vec::new() };
        assert!(matches!(backend.upload_mesh(&points_only), Err(RenderError::EmptyMesh)));
        assert_eq!(backend.mesh_count(), 0);
    }

    #[test]
    fn test_handle_from_other_backend_is_unknown() {
        let mut other = RecordingBackend::new();
        let foreign = other.upload_mesh(&MeshData::cube()).expect("upload");
        let _ = other.upload_mesh(&MeshData::cube()).expect("upload");

        let mut backend = RecordingBackend::new();
        backend.begin_frame(&uniforms()).expect("begin");
        let second = GeometryHandle::new(
            other.meshes.keys().last().expect("two meshes"),
            foreign.index_count(),
        );
        let result = second.draw(&mut backend, Mat4::identity(), &Material::default(), None);
        assert!(matches!(result, Err(RenderError::UnknownMesh(_))));
    }
}
