//! Bounding spheres for subtree culling

use crate::foundation::math::{Mat4, Mat4Ext, Point3, Vec3};
use crate::render::MeshData;
use crate::scene::SceneError;

/// Sphere enclosing a node's geometry, expressed in the node's object space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    /// Center in object space
    pub center: Vec3,
    /// Radius in object space
    pub radius: f32,
}

impl BoundingSphere {
    /// Create a new bounding sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere from the axis-aligned extent of a point set
    ///
    /// The center is the box midpoint and the radius is half the largest box
    /// extent. Corners of elongated boxes may stick out of this sphere; use
    /// [`BoundingSphere::conservative`] where that matters.
    ///
    /// # Errors
    /// [`SceneError::EmptyGeometry`] when `positions` is empty.
    pub fn from_positions(positions: &[Vec3]) -> Result<Self, SceneError> {
        let (min, max) = extent(positions)?;
        let center = (min + max) * 0.5;
        let radius = ((max - min) * 0.5).max();
        Ok(Self { center, radius })
    }

    /// Sphere around the box midpoint that contains every point
    ///
    /// # Errors
    /// [`SceneError::EmptyGeometry`] when `positions` is empty.
    pub fn conservative(positions: &[Vec3]) -> Result<Self, SceneError> {
        let (min, max) = extent(positions)?;
        let center = (min + max) * 0.5;
        let radius = positions
            .iter()
            .map(|p| (p - center).magnitude())
            .fold(0.0_f32, f32::max);
        Ok(Self { center, radius })
    }

    /// Sphere containing every vertex of a mesh
    ///
    /// # Errors
    /// [`SceneError::EmptyGeometry`] when the mesh has no positions.
    pub fn from_mesh(mesh: &MeshData) -> Result<Self, SceneError> {
        Self::conservative(&mesh.positions)
    }

    /// Sphere scaled uniformly about the object-space origin
    pub fn scaled(&self, factor: f32) -> Self {
        Self { center: self.center * factor, radius: self.radius * factor.abs() }
    }

    /// Smallest sphere enclosing both spheres
    pub fn merged(&self, other: &Self) -> Self {
        let offset = other.center - self.center;
        let distance = offset.magnitude();
        if distance + other.radius <= self.radius {
            return *self;
        }
        if distance + self.radius <= other.radius {
            return *other;
        }
        let radius = (distance + self.radius + other.radius) * 0.5;
        let center = self.center + offset * ((radius - self.radius) / distance);
        Self { center, radius }
    }

    /// Sphere about `pivot` holding this sphere at any rotation around it
    pub fn swept_about(&self, pivot: Vec3) -> Self {
        Self { center: pivot, radius: (self.center - pivot).magnitude() + self.radius }
    }

    /// World-space sphere under `world`
    ///
    /// The center follows the full transform; the radius grows with the
    /// largest axis scale so non-uniform scaling never shrinks it.
    pub fn transformed(&self, world: &Mat4) -> Self {
        let center = world.transform_point(&Point3::from(self.center)).coords;
        Self { center, radius: self.radius * world.max_axis_scale() }
    }
}

/// Axis-aligned `(min, max)` of a point set
pub(crate) fn extent(positions: &[Vec3]) -> Result<(Vec3, Vec3), SceneError> {
    let (first, rest) = positions.split_first().ok_or(SceneError::EmptyGeometry)?;
    Ok(rest.iter().fold((*first, *first), |(min, max), p| (min.inf(p), max.sup(p))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn box_corners() -> Vec<Vec3> {
        vec![Vec3::new(-4.0, -1.0, -1.0), Vec3::new(4.0, 1.0, 1.0), Vec3::new(4.0, -1.0, 1.0)]
    }

    #[test]
    fn test_extent_sphere_uses_largest_half_extent() {
        let sphere = BoundingSphere::from_positions(&box_corners()).expect("non-empty");
        assert_relative_eq!(sphere.center, Vec3::zeros());
        assert_relative_eq!(sphere.radius, 4.0);
    }

    #[test]
    fn test_conservative_sphere_contains_corners() {
        let points = box_corners();
        let sphere = BoundingSphere::conservative(&points).expect("non-empty");
        for p in &points {
            assert!((p - sphere.center).magnitude() <= sphere.radius + 1e-5);
        }
        assert!(sphere.radius > 4.0);
    }

    #[test]
    fn test_empty_positions_error() {
        assert!(matches!(BoundingSphere::from_positions(&[]), Err(SceneError::EmptyGeometry)));
        assert!(matches!(BoundingSphere::conservative(&[]), Err(SceneError::EmptyGeometry)));
    }

    #[test]
    fn test_merged_encloses_both() {
        let a = BoundingSphere::new(Vec3::zeros(), 1.0);
        let b = BoundingSphere::new(Vec3::new(4.0, 0.0, 0.0), 2.0);
        let merged = a.merged(&b);
        assert_relative_eq!(merged.center, Vec3::new(2.5, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(merged.radius, 3.5, epsilon = 1e-5);

        let inner = BoundingSphere::new(Vec3::new(0.5, 0.0, 0.0), 0.25);
        assert_eq!(a.merged(&inner), a);
        assert_eq!(inner.merged(&a), a);
    }

    #[test]
    fn test_swept_sphere_holds_rotated_copies() {
        let pivot = Vec3::new(0.0, 5.0, 0.0);
        let sphere = BoundingSphere::new(Vec3::new(0.0, -2.0, 1.0), 1.5);
        let swept = sphere.swept_about(pivot);
        for angle in [0.3_f32, 1.2, -0.9, 3.0] {
            let rotated = Mat4::pivot_rotation(pivot, &Vec3::x_axis(), angle).transform_point(&Point3::from(sphere.center));
            assert!((rotated.coords - swept.center).magnitude() + sphere.radius <= swept.radius + 1e-4);
        }
    }

    #[test]
    fn test_transformed_follows_translation_and_scale() {
        let sphere = BoundingSphere::new(Vec3::new(0.0, 1.0, 0.0), 2.0);
        let world = Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0)) * Mat4::new_scaling(3.0);
        let moved = sphere.transformed(&world);
        assert_relative_eq!(moved.center, Vec3::new(10.0, 3.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(moved.radius, 6.0, epsilon = 1e-5);
    }
}
