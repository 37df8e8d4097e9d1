use crate::{ChannelError, ChannelImage, ChannelSource, ChannelValue};
use std::path::Path;

/// The backdrop behind the previewed object: a flat color or an image
/// file, selectable by the artist.
///
/// Same discipline as a channel slot: always holds a value, a failed file
/// load leaves the prior backdrop untouched, and the revision bumps on
/// every successful change so the renderer can rebind at tick boundaries.
#[derive(Debug, Clone)]
pub struct Background {
    source: ChannelSource,
    image: ChannelImage,
    revision: u64,
}

impl Default for Background {
    fn default() -> Self {
        Self::new()
    }
}

impl Background {
    /// Dark neutral backdrop used until the artist picks one.
    pub const DEFAULT_COLOR: ChannelValue = ChannelValue::Rgb([48, 48, 52]);

    pub fn new() -> Self {
        Self {
            source: ChannelSource::Constant(Self::DEFAULT_COLOR),
            image: ChannelImage::from_constant(Self::DEFAULT_COLOR),
            revision: 0,
        }
    }

    /// Replace the backdrop with a flat color.
    pub fn set_color(&mut self, value: ChannelValue) {
        self.source = ChannelSource::Constant(value);
        self.image = ChannelImage::from_constant(value);
        self.revision += 1;
        tracing::debug!("background set to {value:?}");
    }

    /// Replace the backdrop with an image file. On failure the current
    /// backdrop is left exactly as it was and the error is returned.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<(), ChannelError> {
        let path = path.as_ref();
        let image = ChannelImage::from_file(path)?;
        self.source = ChannelSource::File(path.to_path_buf());
        self.image = image;
        self.revision += 1;
        tracing::info!("background loaded from {path:?}");
        Ok(())
    }

    pub fn source(&self) -> &ChannelSource {
        &self.source
    }

    pub fn image(&self) -> &ChannelImage {
        &self.image
    }

    /// Monotonic revision, bumped on every successful change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The retained color for a flat backdrop, `None` for an image-backed
    /// one.
    pub fn fill_value(&self) -> Option<ChannelValue> {
        match self.source {
            ChannelSource::Constant(value) => Some(value),
            ChannelSource::File(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_default_color() {
        let bg = Background::new();
        assert_eq!(bg.fill_value(), Some(Background::DEFAULT_COLOR));
        assert_eq!(bg.revision(), 0);
        assert_eq!((bg.image().width(), bg.image().height()), (1, 1));
    }

    #[test]
    fn color_round_trip() {
        let mut bg = Background::new();
        bg.set_color(ChannelValue::Rgb([10, 60, 120]));
        assert_eq!(bg.fill_value(), Some(ChannelValue::Rgb([10, 60, 120])));
        assert_eq!(bg.image().pixels(), &[10, 60, 120, 255]);
        assert_eq!(bg.revision(), 1);
    }

    #[test]
    fn failed_load_keeps_prior_backdrop() {
        let mut bg = Background::new();
        bg.set_color(ChannelValue::Rgb([0, 0, 255]));
        let before = bg.revision();

        assert!(bg.load_file("/no/such/sky.png").is_err());
        assert_eq!(bg.fill_value(), Some(ChannelValue::Rgb([0, 0, 255])));
        assert_eq!(bg.revision(), before);
    }

    #[test]
    fn successful_load_becomes_file_backed() {
        let tmp = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        image::RgbaImage::from_pixel(8, 4, image::Rgba([50, 60, 70, 255]))
            .save(tmp.path())
            .unwrap();

        let mut bg = Background::new();
        bg.load_file(tmp.path()).unwrap();
        assert_eq!(bg.fill_value(), None);
        assert!(matches!(bg.source(), ChannelSource::File(_)));
        assert_eq!((bg.image().width(), bg.image().height()), (8, 4));
        assert_eq!(bg.revision(), 1);
    }
}
