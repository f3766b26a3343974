//! Serializable asset library description
//!
//! Lets a [`MemoryHost`] be populated from (and written back to) a RON file,
//! referencing assets by object path instead of handle.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::memory::{AssetObject, MaterialGraph, MaterialInstance, MemoryHost, TextureSample};
use super::HostError;
use crate::assets::{
    path, AssetId, MaterialProperty, SkeletalMesh, StaticMesh, StaticSwitchParameter,
};
use crate::config::ConfigError;

/// Texture sample of a root material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleDesc {
    /// Material output fed by the sample
    pub property: MaterialProperty,
    /// Object path of the default texture
    pub texture: String,
    /// Texture parameter name, if overridable
    #[serde(default)]
    pub parameter: Option<String>,
}

/// Payload of a described asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetKindDesc {
    /// Texture
    Texture,
    /// Root material
    Material {
        /// Texture samples in graph order
        #[serde(default)]
        samples: Vec<SampleDesc>,
    },
    /// Material instance
    MaterialInstance {
        /// Object path of the parent
        #[serde(default)]
        parent: Option<String>,
        /// Texture overrides: parameter name to texture object path
        #[serde(default)]
        textures: BTreeMap<String, String>,
        /// Static switch overrides
        #[serde(default)]
        switches: Vec<StaticSwitchParameter>,
    },
    /// Static mesh; one entry per slot
    StaticMesh {
        /// Slot materials by object path
        materials: Vec<Option<String>>,
    },
    /// Skeletal mesh; one entry per slot
    SkeletalMesh {
        /// Slot materials by object path
        materials: Vec<Option<String>>,
    },
    /// Anything else
    Other,
}

/// One described asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDesc {
    /// Full object path
    pub path: String,
    /// Payload
    pub kind: AssetKindDesc,
}

/// Whole library description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLibrary {
    /// Package paths that reject new assets
    #[serde(default)]
    pub read_only: Vec<String>,
    /// Assets in registration order
    pub assets: Vec<AssetDesc>,
}

impl AssetLibrary {
    /// Parse a RON library description
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        ron::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize as pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Load a RON library description from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Write the library as RON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }
}

impl MemoryHost {
    /// Build a host holding every asset in `library`
    ///
    /// Fails if a reference names an object path that is not in the library.
    pub fn from_library(library: &AssetLibrary) -> Result<Self, HostError> {
        let mut host = Self::new();
        for package_path in &library.read_only {
            host.set_read_only(package_path.trim_end_matches('/'));
        }

        // Register every path first so references can point forward
        let mut ids = Vec::with_capacity(library.assets.len());
        for desc in &library.assets {
            let name = path::object_name(&desc.path);
            let package_path = path::long_package_path(&desc.path);
            ids.push(host.insert(package_path, name, AssetObject::Other));
        }

        for (desc, id) in library.assets.iter().zip(ids) {
            let object = host.build_object(&desc.kind)?;
            if let Some(record) = host.records_mut().get_mut(id) {
                record.object = object;
            }
        }

        log::info!("Loaded asset library with {} asset(s)", host.asset_count());
        Ok(host)
    }

    /// Describe every stored asset
    pub fn to_library(&self) -> AssetLibrary {
        let mut read_only: Vec<String> = self.read_only_paths().map(str::to_string).collect();
        read_only.sort();

        let assets = self
            .records()
            .map(|(_, record)| AssetDesc {
                path: record.object_path(),
                kind: self.describe_object(&record.object),
            })
            .collect();

        AssetLibrary { read_only, assets }
    }

    fn lookup(&self, object_path: &str) -> Result<AssetId, HostError> {
        self.id_of(object_path)
            .ok_or_else(|| HostError::NotFound(object_path.to_string()))
    }

    fn lookup_slots(
        &self,
        materials: &[Option<String>],
    ) -> Result<Vec<Option<AssetId>>, HostError> {
        materials
            .iter()
            .map(|slot| slot.as_deref().map(|p| self.lookup(p)).transpose())
            .collect()
    }

    fn build_object(&self, kind: &AssetKindDesc) -> Result<AssetObject, HostError> {
        let object = match kind {
            AssetKindDesc::Texture => AssetObject::Texture,
            AssetKindDesc::Other => AssetObject::Other,
            AssetKindDesc::Material { samples } => {
                let samples = samples
                    .iter()
                    .map(|sample| {
                        Ok(TextureSample {
                            property: sample.property,
                            texture: self.lookup(&sample.texture)?,
                            parameter: sample.parameter.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, HostError>>()?;
                AssetObject::Material(MaterialGraph { samples })
            }
            AssetKindDesc::MaterialInstance {
                parent,
                textures,
                switches,
            } => {
                let parent = parent.as_deref().map(|p| self.lookup(p)).transpose()?;
                let texture_parameters = textures
                    .iter()
                    .map(|(name, texture)| Ok((name.clone(), self.lookup(texture)?)))
                    .collect::<Result<BTreeMap<_, _>, HostError>>()?;
                let mut instance = MaterialInstance {
                    parent,
                    texture_parameters,
                    ..MaterialInstance::default()
                };
                instance.static_parameters.static_switch_parameters = switches.clone();
                AssetObject::MaterialInstance(instance)
            }
            AssetKindDesc::StaticMesh { materials } => {
                let slots = self.lookup_slots(materials)?;
                AssetObject::StaticMesh(StaticMesh::with_materials(slots))
            }
            AssetKindDesc::SkeletalMesh { materials } => {
                let slots = self.lookup_slots(materials)?;
                AssetObject::SkeletalMesh(SkeletalMesh::with_materials(slots))
            }
        };
        Ok(object)
    }

    fn path_of(&self, id: AssetId) -> String {
        self.record(id)
            .map_or_else(|| format!("{id:?}"), |record| record.object_path())
    }

    fn describe_object(&self, object: &AssetObject) -> AssetKindDesc {
        match object {
            AssetObject::Texture => AssetKindDesc::Texture,
            AssetObject::Other => AssetKindDesc::Other,
            AssetObject::Material(graph) => AssetKindDesc::Material {
                samples: graph
                    .samples
                    .iter()
                    .map(|sample| SampleDesc {
                        property: sample.property,
                        texture: self.path_of(sample.texture),
                        parameter: sample.parameter.clone(),
                    })
                    .collect(),
            },
            AssetObject::MaterialInstance(instance) => AssetKindDesc::MaterialInstance {
                parent: instance.parent.map(|id| self.path_of(id)),
                textures: instance
                    .texture_parameters
                    .iter()
                    .map(|(name, &texture)| (name.clone(), self.path_of(texture)))
                    .collect(),
                switches: instance.static_parameters.static_switch_parameters.clone(),
            },
            AssetObject::StaticMesh(mesh) => AssetKindDesc::StaticMesh {
                materials: mesh
                    .static_materials
                    .iter()
                    .map(|slot| slot.material_interface.map(|id| self.path_of(id)))
                    .collect(),
            },
            AssetObject::SkeletalMesh(mesh) => AssetKindDesc::SkeletalMesh {
                materials: mesh
                    .materials
                    .iter()
                    .map(|slot| slot.material_interface.map(|id| self.path_of(id)))
                    .collect(),
            },
        }
    }
}
