use crate::{ChannelError, ChannelValue};
use std::path::Path;

/// CPU-side channel pixels, always RGBA8. Either decoded from a texture
/// file or a 1x1 constant fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ChannelImage {
    /// Decode an image file into RGBA8 pixels.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ChannelError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|source| ChannelError::AssetLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        tracing::debug!("decoded {path:?}: {width}x{height}");
        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// A 1x1 fill representing a flat constant value.
    pub fn from_constant(value: ChannelValue) -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: value.texel().to_vec(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Tightly packed RGBA8 pixel data, `width * height * 4` bytes.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_fill_is_one_texel() {
        let img = ChannelImage::from_constant(ChannelValue::Scalar(128));
        assert_eq!((img.width(), img.height()), (1, 1));
        assert_eq!(img.pixels(), &[128, 128, 128, 255]);
    }

    #[test]
    fn missing_file_is_asset_load_error() {
        let err = ChannelImage::from_file("/no/such/file.png").unwrap_err();
        let ChannelError::AssetLoad { path, .. } = err;
        assert_eq!(path, std::path::PathBuf::from("/no/such/file.png"));
    }

    #[test]
    fn undecodable_file_is_asset_load_error() {
        let mut tmp = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        std::io::Write::write_all(&mut tmp, b"not a png at all").unwrap();
        assert!(ChannelImage::from_file(tmp.path()).is_err());
    }

    #[test]
    fn decodes_a_real_png() {
        let tmp = tempfile::NamedTempFile::with_suffix(".png").unwrap();
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        img.save(tmp.path()).unwrap();

        let loaded = ChannelImage::from_file(tmp.path()).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (4, 2));
        assert_eq!(&loaded.pixels()[..4], &[10, 20, 30, 255]);
        assert_eq!(loaded.pixels().len(), 4 * 2 * 4);
    }
}
