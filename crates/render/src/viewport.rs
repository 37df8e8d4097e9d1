use serde::{Deserialize, Serialize};

/// Preview surface size in pixels, clamped to at least 1x1 so projection
/// math never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Apply a resize. Returns `true` when the clamped size actually
    /// changed, so callers can skip reallocation on repeated identical
    /// sizes.
    pub fn apply(&mut self, width: u32, height: u32) -> bool {
        let next = Self::new(width, height);
        if next == *self {
            false
        } else {
            *self = next;
            true
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_clamped() {
        let v = Viewport::new(0, 0);
        assert_eq!((v.width(), v.height()), (1, 1));
        assert_eq!(v.aspect(), 1.0);
    }

    #[test]
    fn apply_reports_change() {
        let mut v = Viewport::new(800, 600);
        assert!(v.apply(1024, 768));
        assert_eq!((v.width(), v.height()), (1024, 768));
    }

    #[test]
    fn identical_resize_is_idempotent() {
        let mut v = Viewport::new(800, 600);
        assert!(!v.apply(800, 600));
        assert!(!v.apply(800, 600));
    }

    #[test]
    fn aspect_matches_dimensions() {
        let mut v = Viewport::new(1, 1);
        v.apply(1920, 1080);
        assert!((v.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
    }
}
