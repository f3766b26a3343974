//! Asset model shared by the converter, the rebinder and host implementations
//!
//! Hosts own the actual objects; this module only describes what the tooling
//! needs to see of them: a class tag, an object path, and for meshes an
//! ordered list of material slots.

pub mod mesh;
pub mod path;

pub use crate::foundation::collections::AssetId;
pub use mesh::{MaterialSlots, SkeletalMaterial, SkeletalMesh, StaticMaterial, StaticMesh};

use serde::{Deserialize, Serialize};

/// Class tag of an asset as reported by the asset registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    /// Multi-slot static geometry
    StaticMesh,
    /// Multi-slot skinned geometry
    SkeletalMesh,
    /// Root material with its own expression graph
    Material,
    /// Material instance with a parent and parameter overrides
    MaterialInstance,
    /// Texture referenced by material parameters
    Texture,
    /// Anything the tooling does not handle
    Other,
}

impl AssetClass {
    /// Whether assets of this class own material slots
    pub const fn is_mesh(self) -> bool {
        matches!(self, Self::StaticMesh | Self::SkeletalMesh)
    }

    /// Whether assets of this class can act as a material parent
    pub const fn is_material_interface(self) -> bool {
        matches!(self, Self::Material | Self::MaterialInstance)
    }

    /// Registry class name
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::StaticMesh => "StaticMesh",
            Self::SkeletalMesh => "SkeletalMesh",
            Self::Material => "Material",
            Self::MaterialInstance => "MaterialInstanceConstant",
            Self::Texture => "Texture",
            Self::Other => "Object",
        }
    }
}

/// Registry entry for a selected asset
///
/// Cheap metadata that can be inspected without loading the object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetData {
    /// Full object path, e.g. `/Game/Props/SM_Rock.SM_Rock`
    pub object_path: String,
    /// Class tag
    pub class: AssetClass,
}

impl AssetData {
    /// Create a registry entry
    pub fn new(object_path: impl Into<String>, class: AssetClass) -> Self {
        Self {
            object_path: object_path.into(),
            class,
        }
    }

    /// Object name component of the path
    pub fn asset_name(&self) -> &str {
        path::object_name(&self.object_path)
    }

    /// Directory holding the asset's package
    pub fn package_path(&self) -> &str {
        path::long_package_path(&self.object_path)
    }
}

/// Loaded object narrowed to the shapes the tooling acts on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolvedAsset {
    /// Static mesh with `static_materials` slots
    StaticMesh(AssetId),
    /// Skeletal mesh with `materials` slots
    SkeletalMesh(AssetId),
    /// Root material
    Material(AssetId),
    /// Material instance
    MaterialInstance(AssetId),
    /// Anything else
    Other(AssetId),
}

impl ResolvedAsset {
    /// Narrow a loaded object by its class
    pub const fn from_class(id: AssetId, class: AssetClass) -> Self {
        match class {
            AssetClass::StaticMesh => Self::StaticMesh(id),
            AssetClass::SkeletalMesh => Self::SkeletalMesh(id),
            AssetClass::Material => Self::Material(id),
            AssetClass::MaterialInstance => Self::MaterialInstance(id),
            AssetClass::Texture | AssetClass::Other => Self::Other(id),
        }
    }

    /// Handle if the object owns material slots
    pub const fn as_mesh(self) -> Option<AssetId> {
        match self {
            Self::StaticMesh(id) | Self::SkeletalMesh(id) => Some(id),
            _ => None,
        }
    }

    /// Handle if the object is a material instance
    pub const fn as_material_instance(self) -> Option<AssetId> {
        match self {
            Self::MaterialInstance(id) => Some(id),
            _ => None,
        }
    }

    /// Handle if the object can parent a material instance
    pub const fn as_material_interface(self) -> Option<AssetId> {
        match self {
            Self::Material(id) | Self::MaterialInstance(id) => Some(id),
            _ => None,
        }
    }
}

/// Material output whose texture inputs can be queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialProperty {
    /// Albedo input
    BaseColor,
    /// Tangent-space normal input
    Normal,
    /// Metallic input
    Metallic,
    /// Roughness input
    Roughness,
    /// Emissive color input
    EmissiveColor,
}

/// Static switch override on a material instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticSwitchParameter {
    /// Switch parameter name
    pub name: String,
    /// Switch value
    pub value: bool,
    /// Whether the instance overrides the parent's value
    pub overridden: bool,
}

impl StaticSwitchParameter {
    /// Create an overriding switch value
    pub fn overriding(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            value,
            overridden: true,
        }
    }
}

/// Static permutation applied to a material instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticParameterSet {
    /// Static switch overrides
    pub static_switch_parameters: Vec<StaticSwitchParameter>,
}

impl StaticParameterSet {
    /// Whether the set changes anything
    pub fn is_empty(&self) -> bool {
        self.static_switch_parameters.is_empty()
    }

    /// Look up a switch by name
    pub fn switch(&self, name: &str) -> Option<&StaticSwitchParameter> {
        self.static_switch_parameters.iter().find(|p| p.name == name)
    }
}
