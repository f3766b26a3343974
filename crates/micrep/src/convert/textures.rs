//! Texture extraction from source materials

use crate::assets::{AssetId, MaterialProperty};
use crate::host::EditorHost;

/// Effective base color and normal textures of a material
///
/// Doubles as the dedup key in unified conversion: equality is structural,
/// so two absent textures compare equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TexturePair {
    /// First texture feeding the base color input
    pub color: Option<AssetId>,
    /// First texture feeding the normal input
    pub normal: Option<AssetId>,
}

impl TexturePair {
    /// Pair of explicit textures
    pub const fn new(color: Option<AssetId>, normal: Option<AssetId>) -> Self {
        Self { color, normal }
    }

    /// Query a material's effective textures through the host
    ///
    /// A missing material yields an empty pair.
    pub fn extract<H: EditorHost + ?Sized>(host: &H, material: Option<AssetId>) -> Self {
        let Some(material) = material else {
            return Self::default();
        };
        let first = |property: MaterialProperty| {
            host.textures_in_property_chain(material, property)
                .first()
                .copied()
        };

        Self {
            color: first(MaterialProperty::BaseColor),
            normal: first(MaterialProperty::Normal),
        }
    }

    /// Neither texture is present
    pub const fn is_empty(&self) -> bool {
        self.color.is_none() && self.normal.is_none()
    }
}
