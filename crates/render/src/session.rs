use crate::{CameraMatrices, ChannelPayload, OrbitCamera, PreviewEvent, Viewport};
use texview_channels::{Background, ChannelError, ChannelSet};

/// All preview state a GPU backend needs to draw a frame: the channel set,
/// the orbit camera, the viewport, and elapsed time.
///
/// Events mutate the session immediately; pointer and scroll deltas
/// accumulate and apply on [`advance`](Self::advance), once per frame.
/// Backends pick up channel changes by comparing slot revisions at the
/// start of their tick, so a swap is atomic with respect to a frame.
pub struct PreviewSession {
    channels: ChannelSet,
    background: Background,
    camera: OrbitCamera,
    viewport: Viewport,
    pending_drag: (f32, f32),
    pending_scroll: f32,
    elapsed: f64,
}

impl PreviewSession {
    pub fn new(width: u32, height: u32) -> Self {
        let viewport = Viewport::new(width, height);
        let mut camera = OrbitCamera::default();
        camera.set_aspect(viewport.aspect());
        Self {
            channels: ChannelSet::new(),
            background: Background::new(),
            camera,
            viewport,
            pending_drag: (0.0, 0.0),
            pending_scroll: 0.0,
            elapsed: 0.0,
        }
    }

    /// Consume one host event. The only fallible cases are file-backed
    /// channel and background changes; on failure the prior value stays.
    pub fn handle(&mut self, event: PreviewEvent) -> Result<(), ChannelError> {
        match event {
            PreviewEvent::ChannelChanged { channel, payload } => match payload {
                ChannelPayload::Value(value) => self.channels.set_constant(channel, value),
                ChannelPayload::File(path) => self.channels.load_file(channel, &path)?,
            },
            PreviewEvent::BackgroundChanged { payload } => match payload {
                ChannelPayload::Value(value) => self.background.set_color(value),
                ChannelPayload::File(path) => self.background.load_file(&path)?,
            },
            PreviewEvent::ViewportResized { width, height } => {
                if self.viewport.apply(width, height) {
                    self.camera.set_aspect(self.viewport.aspect());
                    tracing::debug!("viewport resized to {width}x{height}");
                }
            }
            PreviewEvent::PointerDrag { dx, dy } => {
                self.pending_drag.0 += dx;
                self.pending_drag.1 += dy;
            }
            PreviewEvent::Scroll { delta } => {
                self.pending_scroll += delta;
            }
        }
        Ok(())
    }

    /// Advance one frame: apply accumulated input deltas and elapsed time.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += f64::from(dt);
        let (dx, dy) = std::mem::take(&mut self.pending_drag);
        if dx != 0.0 || dy != 0.0 {
            self.camera.orbit(dx, dy);
        }
        let scroll = std::mem::take(&mut self.pending_scroll);
        if scroll != 0.0 {
            self.camera.zoom(scroll);
        }
    }

    pub fn channels(&self) -> &ChannelSet {
        &self.channels
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Seconds since the session started, summed from per-frame deltas.
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    pub fn matrices(&self) -> CameraMatrices {
        self.camera.matrices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use texview_channels::{ChannelKind, ChannelValue};

    #[test]
    fn resize_updates_aspect() {
        let mut s = PreviewSession::new(200, 200);
        s.handle(PreviewEvent::ViewportResized {
            width: 640,
            height: 480,
        })
        .unwrap();
        assert!((s.camera().aspect - 640.0 / 480.0).abs() < 1e-6);
    }

    #[test]
    fn zero_height_resize_is_clamped() {
        let mut s = PreviewSession::new(200, 200);
        s.handle(PreviewEvent::ViewportResized {
            width: 640,
            height: 0,
        })
        .unwrap();
        assert_eq!(s.viewport().height(), 1);
        assert!(s.camera().aspect.is_finite());
    }

    #[test]
    fn drag_applies_on_advance_not_on_event() {
        let mut s = PreviewSession::new(200, 200);
        let yaw0 = s.camera().yaw;
        s.handle(PreviewEvent::PointerDrag { dx: 10.0, dy: 0.0 }).unwrap();
        assert_eq!(s.camera().yaw, yaw0);
        s.advance(1.0 / 60.0);
        assert_ne!(s.camera().yaw, yaw0);
    }

    #[test]
    fn drags_accumulate_between_frames() {
        let mut a = PreviewSession::new(200, 200);
        let mut b = PreviewSession::new(200, 200);
        a.handle(PreviewEvent::PointerDrag { dx: 3.0, dy: 0.0 }).unwrap();
        a.handle(PreviewEvent::PointerDrag { dx: 4.0, dy: 0.0 }).unwrap();
        b.handle(PreviewEvent::PointerDrag { dx: 7.0, dy: 0.0 }).unwrap();
        a.advance(0.016);
        b.advance(0.016);
        assert_eq!(a.camera().yaw, b.camera().yaw);
    }

    #[test]
    fn failed_file_event_keeps_channel() {
        let mut s = PreviewSession::new(200, 200);
        s.handle(PreviewEvent::ChannelChanged {
            channel: ChannelKind::Albedo,
            payload: ChannelPayload::Value(ChannelValue::Rgb([255, 0, 0])),
        })
        .unwrap();

        let result = s.handle(PreviewEvent::ChannelChanged {
            channel: ChannelKind::Albedo,
            payload: ChannelPayload::File("/no/such/file.png".into()),
        });
        assert!(result.is_err());
        assert_eq!(
            s.channels().fill_value(ChannelKind::Albedo),
            Some(ChannelValue::Rgb([255, 0, 0]))
        );
    }

    #[test]
    fn channel_sync_snapshot_is_stable_across_later_events() {
        let mut s = PreviewSession::new(200, 200);
        s.handle(PreviewEvent::ChannelChanged {
            channel: ChannelKind::Smoothness,
            payload: ChannelPayload::Value(ChannelValue::Scalar(200)),
        })
        .unwrap();

        // A backend snapshots revisions at its tick boundary.
        let seen: Vec<u64> = ChannelKind::ALL
            .iter()
            .map(|k| s.channels().revision(*k))
            .collect();

        // An event arriving afterwards does not perturb what the tick saw;
        // it only shows up in the next snapshot.
        s.handle(PreviewEvent::ChannelChanged {
            channel: ChannelKind::Smoothness,
            payload: ChannelPayload::Value(ChannelValue::Scalar(50)),
        })
        .unwrap();
        assert_eq!(seen[ChannelKind::Smoothness.slot()], 1);
        assert_eq!(s.channels().revision(ChannelKind::Smoothness), 2);
    }

    #[test]
    fn background_event_changes_backdrop() {
        let mut s = PreviewSession::new(200, 200);
        assert_eq!(s.background().fill_value(), Some(Background::DEFAULT_COLOR));

        s.handle(PreviewEvent::BackgroundChanged {
            payload: ChannelPayload::Value(ChannelValue::Rgb([20, 40, 80])),
        })
        .unwrap();
        assert_eq!(
            s.background().fill_value(),
            Some(ChannelValue::Rgb([20, 40, 80]))
        );
        assert_eq!(s.background().revision(), 1);
    }

    #[test]
    fn failed_background_file_keeps_backdrop() {
        let mut s = PreviewSession::new(200, 200);
        let result = s.handle(PreviewEvent::BackgroundChanged {
            payload: ChannelPayload::File("/no/such/sky.png".into()),
        });
        assert!(result.is_err());
        assert_eq!(s.background().fill_value(), Some(Background::DEFAULT_COLOR));
        assert_eq!(s.background().revision(), 0);
    }

    #[test]
    fn elapsed_accumulates() {
        let mut s = PreviewSession::new(200, 200);
        for _ in 0..60 {
            s.advance(1.0 / 60.0);
        }
        assert!((s.elapsed() - 1.0).abs() < 1e-4);
    }
}
