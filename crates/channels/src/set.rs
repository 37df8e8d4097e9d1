use crate::{ChannelError, ChannelImage, ChannelKind, ChannelSource, ChannelValue};
use std::path::Path;

/// One channel slot: provenance, decoded pixels, and a revision counter.
#[derive(Debug, Clone)]
struct Slot {
    source: ChannelSource,
    image: ChannelImage,
    revision: u64,
}

/// The ten named channel slots of a preview session.
///
/// Single instance per session, mutated only by channel-change events and
/// read by the renderer. Consumers compare [`ChannelSet::revision`] against
/// the value they last saw to find slots that changed; a mutation never
/// touches any other slot, so a sync taken at a tick boundary is a
/// consistent snapshot.
#[derive(Debug, Clone)]
pub struct ChannelSet {
    slots: [Slot; ChannelKind::COUNT],
}

impl Default for ChannelSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelSet {
    /// Every slot starts with its neutral constant fill, so no slot is
    /// ever unbound and a failed load always has prior pixels to keep.
    pub fn new() -> Self {
        Self {
            slots: ChannelKind::ALL.map(|kind| {
                let value = kind.neutral();
                Slot {
                    source: ChannelSource::Constant(value),
                    image: ChannelImage::from_constant(value),
                    revision: 0,
                }
            }),
        }
    }

    /// Replace a slot with a constant fill.
    pub fn set_constant(&mut self, kind: ChannelKind, value: ChannelValue) {
        let slot = &mut self.slots[kind.slot()];
        slot.source = ChannelSource::Constant(value);
        slot.image = ChannelImage::from_constant(value);
        slot.revision += 1;
        tracing::debug!("{} set to {value:?}", kind.label());
    }

    /// Replace a slot with pixels decoded from a file. On failure the slot
    /// is left exactly as it was and the error is returned.
    pub fn load_file(&mut self, kind: ChannelKind, path: impl AsRef<Path>) -> Result<(), ChannelError> {
        let path = path.as_ref();
        let image = ChannelImage::from_file(path)?;
        let slot = &mut self.slots[kind.slot()];
        slot.source = ChannelSource::File(path.to_path_buf());
        slot.image = image;
        slot.revision += 1;
        tracing::info!("{} loaded from {path:?}", kind.label());
        Ok(())
    }

    /// Where the slot's pixels came from.
    pub fn source(&self, kind: ChannelKind) -> &ChannelSource {
        &self.slots[kind.slot()].source
    }

    /// The slot's current pixels.
    pub fn image(&self, kind: ChannelKind) -> &ChannelImage {
        &self.slots[kind.slot()].image
    }

    /// Monotonic per-slot revision, bumped on every successful mutation.
    pub fn revision(&self, kind: ChannelKind) -> u64 {
        self.slots[kind.slot()].revision
    }

    /// The retained constant for a constant-filled slot, `None` for a
    /// file-backed one.
    pub fn fill_value(&self, kind: ChannelKind) -> Option<ChannelValue> {
        match self.slots[kind.slot()].source {
            ChannelSource::Constant(value) => Some(value),
            ChannelSource::File(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_neutral_fills() {
        let set = ChannelSet::new();
        for kind in ChannelKind::ALL {
            assert_eq!(set.fill_value(kind), Some(kind.neutral()));
            assert_eq!(set.revision(kind), 0);
        }
    }

    #[test]
    fn constant_fill_round_trip() {
        let mut set = ChannelSet::new();
        set.set_constant(ChannelKind::Height, ChannelValue::Scalar(128));
        assert_eq!(
            set.fill_value(ChannelKind::Height),
            Some(ChannelValue::Scalar(128))
        );
        assert_eq!(
            set.image(ChannelKind::Height).pixels(),
            &[128, 128, 128, 255]
        );
    }

    #[test]
    fn failed_load_keeps_prior_value() {
        let mut set = ChannelSet::new();
        set.set_constant(ChannelKind::Albedo, ChannelValue::Rgb([255, 0, 0]));
        let before = set.revision(ChannelKind::Albedo);

        let err = set.load_file(ChannelKind::Albedo, "/no/such/file.png");
        assert!(err.is_err());
        assert_eq!(
            set.fill_value(ChannelKind::Albedo),
            Some(ChannelValue::Rgb([255, 0, 0]))
        );
        assert_eq!(set.revision(ChannelKind::Albedo), before);
    }

    #[test]
    fn successful_load_bumps_only_that_slot() {
        let tmp = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]))
            .save(tmp.path())
            .unwrap();

        let mut set = ChannelSet::new();
        set.load_file(ChannelKind::Normal, tmp.path()).unwrap();

        assert_eq!(set.revision(ChannelKind::Normal), 1);
        assert_eq!(set.fill_value(ChannelKind::Normal), None);
        assert!(matches!(
            set.source(ChannelKind::Normal),
            ChannelSource::File(_)
        ));
        for kind in ChannelKind::ALL {
            if kind != ChannelKind::Normal {
                assert_eq!(set.revision(kind), 0);
            }
        }
    }

    #[test]
    fn revisions_are_monotonic() {
        let mut set = ChannelSet::new();
        set.set_constant(ChannelKind::Porosity, ChannelValue::Scalar(10));
        set.set_constant(ChannelKind::Porosity, ChannelValue::Scalar(20));
        assert_eq!(set.revision(ChannelKind::Porosity), 2);
    }
}
