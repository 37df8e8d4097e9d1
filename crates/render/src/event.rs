use std::path::PathBuf;
use texview_channels::{ChannelKind, ChannelValue};

/// Payload of a channel-change event: a new constant, or a file to decode.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelPayload {
    Value(ChannelValue),
    File(PathBuf),
}

/// The single inbound event type the core consumes.
///
/// UI toolkits, window systems, and input devices all reduce to these;
/// the core never sees widgets or raw OS events.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewEvent {
    /// A material channel was changed by the artist.
    ChannelChanged {
        channel: ChannelKind,
        payload: ChannelPayload,
    },
    /// The preview backdrop was changed: a flat color or a sky image.
    BackgroundChanged { payload: ChannelPayload },
    /// The preview surface was resized, in pixels.
    ViewportResized { width: u32, height: u32 },
    /// Pointer dragged across the preview by (dx, dy) pixels.
    PointerDrag { dx: f32, dy: f32 },
    /// Scroll wheel moved by `delta` notches.
    Scroll { delta: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_event_carries_payload() {
        let e = PreviewEvent::ChannelChanged {
            channel: ChannelKind::Albedo,
            payload: ChannelPayload::Value(ChannelValue::Rgb([255, 0, 0])),
        };
        assert!(matches!(e, PreviewEvent::ChannelChanged { .. }));
    }

    #[test]
    fn file_payload_is_a_path() {
        let p = ChannelPayload::File(PathBuf::from("rock_albedo.png"));
        assert!(matches!(p, ChannelPayload::File(_)));
    }
}
