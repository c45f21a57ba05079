//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the two compositions the samples need:
//! a model transform (translation × rotation × scale) and a look-at camera
//! with a perspective projection.

pub use nalgebra::{Matrix4, Unit, UnitQuaternion, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = UnitQuaternion<f32>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Set the rotation to `angle` radians about `axis`
    #[must_use]
    pub fn with_axis_angle(mut self, axis: &Unit<Vec3>, angle: f32) -> Self {
        self.rotation = Quat::from_axis_angle(axis, angle);
        self
    }

    /// Set the scale
    #[must_use]
    pub const fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Model matrix, applied as `T * R * S`
    pub fn to_matrix(&self) -> Mat4 {
        let translation = Mat4::new_translation(&self.position);
        let rotation = self.rotation.to_homogeneous();
        let scale = Mat4::new_nonuniform_scaling(&self.scale);
        translation * rotation * scale
    }
}

/// Look-at camera with a perspective lens
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position
    pub eye: Point3,
    /// Point the camera looks at
    pub target: Point3,
    /// Up direction
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
}

impl Camera {
    /// Camera at `eye` looking at the origin with a 45° lens
    pub fn looking_at_origin(eye: Point3) -> Self {
        Self {
            eye,
            target: Point3::origin(),
            up: Vec3::y(),
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// World to view matrix
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(&self.eye, &self.target, &self.up)
    }

    /// Perspective projection; a non-positive aspect falls back to 1.0
    pub fn projection(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect > 0.0 && aspect.is_finite() { aspect } else { 1.0 };
        Mat4::new_perspective(aspect, self.fov_y_degrees.to_radians(), self.near, self.far)
    }

    /// `projection * view`
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector4;

    #[test]
    fn test_identity_transform() {
        assert_relative_eq!(Transform::default().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_scale_rotates_before_translating() {
        let transform = Transform::from_position(Vec3::new(0.0, 2.0, 0.0))
            .with_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_2)
            .with_scale(Vec3::new(2.0, 2.0, 2.0));

        // (1,0,0) -> scaled to (2,0,0) -> rotated to (0,2,0) -> moved to (0,4,0)
        let moved = transform.to_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(moved, Vector4::new(0.0, 4.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_view_puts_target_in_front() {
        let camera = Camera::looking_at_origin(Point3::new(4.0, 3.0, 3.0));
        let target = camera.view() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(target.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(target.y, 0.0, epsilon = 1e-5);
        assert!(target.z < 0.0);
    }

    #[test]
    fn test_degenerate_aspect_falls_back() {
        let camera = Camera::looking_at_origin(Point3::new(0.0, 0.0, 5.0));
        assert_relative_eq!(camera.projection(0.0), camera.projection(1.0));
        assert_relative_eq!(camera.projection(f32::NAN), camera.projection(1.0));
    }
}
