use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: position, rotation, scale.
///
/// Each drawable entity owns exactly one of these; the model matrix is
/// recomputed from the current fields every time it is read, so it always
/// reflects the latest mutation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
    }

    /// Model matrix derived from the current fields.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.model_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn model_matrix_tracks_mutation() {
        let mut t = Transform::default();
        t.set_position(Vec3::new(1.0, 2.0, 3.0));
        let m = t.model_matrix();
        assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));

        t.set_scale(Vec3::splat(2.0));
        let m = t.model_matrix();
        assert_eq!(m.x_axis.x, 2.0);
    }

    #[test]
    fn rotation_applies_before_translation() {
        let mut t = Transform::default();
        t.set_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        t.set_position(Vec3::new(5.0, 0.0, 0.0));
        let p = t.model_matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(5.0, 0.0, -1.0)).length() < 1e-5);
    }
}
