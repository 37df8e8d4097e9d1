use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One of the ten PBR material input slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChannelKind {
    Albedo,
    Opacity,
    Normal,
    F0,
    Smoothness,
    Height,
    Porosity,
    Translucence,
    AmbientOcclusion,
    Emission,
}

impl ChannelKind {
    /// All channels, in slot order.
    pub const ALL: [ChannelKind; 10] = [
        ChannelKind::Albedo,
        ChannelKind::Opacity,
        ChannelKind::Normal,
        ChannelKind::F0,
        ChannelKind::Smoothness,
        ChannelKind::Height,
        ChannelKind::Porosity,
        ChannelKind::Translucence,
        ChannelKind::AmbientOcclusion,
        ChannelKind::Emission,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Texture binding slot for this channel. The shader-side bindings use
    /// the same table, so this mapping is the single source of truth.
    pub fn slot(self) -> usize {
        match self {
            ChannelKind::Albedo => 0,
            ChannelKind::Opacity => 1,
            ChannelKind::Normal => 2,
            ChannelKind::F0 => 3,
            ChannelKind::Smoothness => 4,
            ChannelKind::Height => 5,
            ChannelKind::Porosity => 6,
            ChannelKind::Translucence => 7,
            ChannelKind::AmbientOcclusion => 8,
            ChannelKind::Emission => 9,
        }
    }

    /// Human-readable name for UI and log lines.
    pub fn label(self) -> &'static str {
        match self {
            ChannelKind::Albedo => "Albedo",
            ChannelKind::Opacity => "Opacity",
            ChannelKind::Normal => "Normal",
            ChannelKind::F0 => "Specular (F0)",
            ChannelKind::Smoothness => "Smoothness",
            ChannelKind::Height => "Height",
            ChannelKind::Porosity => "Porosity",
            ChannelKind::Translucence => "Translucence",
            ChannelKind::AmbientOcclusion => "Ambient Occlusion",
            ChannelKind::Emission => "Emission",
        }
    }

    /// Whether file-backed pixels for this channel are authored in sRGB.
    /// Data channels (normals, masks) stay linear.
    pub fn is_srgb(self) -> bool {
        matches!(self, ChannelKind::Albedo | ChannelKind::Emission)
    }

    /// Neutral fill used before the artist supplies anything: a value that
    /// leaves the lighting model in a sane default state.
    pub fn neutral(self) -> ChannelValue {
        match self {
            ChannelKind::Albedo => ChannelValue::Rgb([128, 128, 128]),
            ChannelKind::Opacity => ChannelValue::Scalar(255),
            // Flat tangent-space normal.
            ChannelKind::Normal => ChannelValue::Rgb([128, 128, 255]),
            // 0.04, the dielectric default.
            ChannelKind::F0 => ChannelValue::Scalar(10),
            ChannelKind::Smoothness => ChannelValue::Scalar(128),
            ChannelKind::Height => ChannelValue::Scalar(128),
            ChannelKind::Porosity => ChannelValue::Scalar(0),
            ChannelKind::Translucence => ChannelValue::Scalar(0),
            ChannelKind::AmbientOcclusion => ChannelValue::Scalar(255),
            ChannelKind::Emission => ChannelValue::Scalar(0),
        }
    }
}

/// A constant channel value: a single scalar or an RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelValue {
    Scalar(u8),
    Rgb([u8; 3]),
}

impl ChannelValue {
    /// The value expanded to one RGBA8 texel.
    pub fn texel(self) -> [u8; 4] {
        match self {
            ChannelValue::Scalar(v) => [v, v, v, 255],
            ChannelValue::Rgb([r, g, b]) => [r, g, b, 255],
        }
    }
}

/// Where a channel's pixels came from. The constant value is retained so
/// the UI can re-display it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelSource {
    Constant(ChannelValue),
    File(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_dense_and_ordered() {
        for (i, kind) in ChannelKind::ALL.iter().enumerate() {
            assert_eq!(kind.slot(), i);
        }
    }

    #[test]
    fn scalar_texel_replicates() {
        assert_eq!(ChannelValue::Scalar(128).texel(), [128, 128, 128, 255]);
    }

    #[test]
    fn rgb_texel_is_opaque() {
        assert_eq!(ChannelValue::Rgb([255, 0, 0]).texel(), [255, 0, 0, 255]);
    }

    #[test]
    fn only_color_channels_are_srgb() {
        let srgb: Vec<_> = ChannelKind::ALL.iter().filter(|k| k.is_srgb()).collect();
        assert_eq!(srgb, [&ChannelKind::Albedo, &ChannelKind::Emission]);
    }
}
