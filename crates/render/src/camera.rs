use glam::{Mat4, Vec3};

/// View and projection matrices for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    pub view: Mat4,
    pub projection: Mat4,
}

impl CameraMatrices {
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }
}

/// Orbit camera: yaw/pitch/distance around a fixed focus point.
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: -90.0_f32.to_radians(),
            pitch: 20.0_f32.to_radians(),
            distance: 3.0,
            target: Vec3::ZERO,
            fov: 60.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
            sensitivity: 0.008,
            zoom_speed: 0.25,
            min_distance: 1.2,
            max_distance: 20.0,
        }
    }
}

impl OrbitCamera {
    /// Pitch stays short of +/-90 degrees so the look-at up vector never
    /// degenerates.
    pub const PITCH_LIMIT: f32 = 1.5533; // 89 degrees in radians

    /// Apply a pointer drag: yaw and pitch move with the pointer, pitch
    /// clamped to avoid gimbal flip.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch += dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);
    }

    /// Apply a scroll delta: positive scroll moves the camera closer,
    /// clamped to [min_distance, max_distance].
    pub fn zoom(&mut self, delta: f32) {
        self.distance -= delta * self.zoom_speed;
        self.distance = self.distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Camera position derived from the orbit state.
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        ) * self.distance;
        self.target + offset
    }

    pub fn matrices(&self) -> CameraMatrices {
        CameraMatrices {
            view: Mat4::look_at_rh(self.eye(), self.target, Vec3::Y),
            projection: Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_is_valid() {
        let cam = OrbitCamera::default();
        let m = cam.matrices();
        assert!(!m.view_projection().col(0).x.is_nan());
        assert!(cam.distance >= cam.min_distance);
    }

    #[test]
    fn orbit_moves_yaw_and_pitch() {
        let mut cam = OrbitCamera::default();
        let (yaw0, pitch0) = (cam.yaw, cam.pitch);
        cam.orbit(10.0, -5.0);
        assert_ne!(cam.yaw, yaw0);
        assert_ne!(cam.pitch, pitch0);
    }

    #[test]
    fn pitch_clamps_exactly_at_bound() {
        let mut cam = OrbitCamera::default();
        cam.orbit(0.0, 100000.0);
        assert_eq!(cam.pitch, OrbitCamera::PITCH_LIMIT);
        cam.orbit(0.0, -200000.0);
        assert_eq!(cam.pitch, -OrbitCamera::PITCH_LIMIT);
    }

    #[test]
    fn zoom_clamps_to_range() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1000.0);
        assert_eq!(cam.distance, cam.min_distance);
        cam.zoom(-10000.0);
        assert_eq!(cam.distance, cam.max_distance);
    }

    #[test]
    fn eye_sits_at_distance_from_target() {
        let cam = OrbitCamera::default();
        assert!((cam.eye().distance(cam.target) - cam.distance).abs() < 1e-5);
    }
}
