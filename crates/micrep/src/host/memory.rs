//! In-memory editor host
//!
//! Keeps every asset in a slot map keyed by [`AssetId`], with an object-path
//! index acting as the asset registry. Behaves like an editor for the
//! purposes of the batch tools: duplication and creation can fail, names are
//! made unique on collision, packages carry a dirty flag, and material
//! property queries follow instance parent chains.
//!
//! # Example
//!
//! ```
//! use micrep::assets::MaterialProperty;
//! use micrep::host::{EditorHost, MemoryHost, TextureSample};
//!
//! let mut host = MemoryHost::new();
//! let albedo = host.add_texture("/Game/Textures", "T_Rock_D");
//! let material = host.add_material(
//!     "/Game/Materials",
//!     "M_Rock",
//!     vec![TextureSample::new(MaterialProperty::BaseColor, albedo)],
//! );
//!
//! assert_eq!(
//!     host.textures_in_property_chain(material, MaterialProperty::BaseColor),
//!     vec![albedo]
//! );
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};

use super::{EditorHost, HostError};
use crate::assets::{
    path, AssetClass, AssetData, AssetId, MaterialProperty, MaterialSlots, SkeletalMesh,
    StaticMesh, StaticParameterSet,
};
use crate::foundation::collections::AssetMap;

/// Deepest instance chain that is followed
const MAX_PARENT_DEPTH: usize = 64;

/// What to do when a new asset's path is already taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// Append `_1`, `_2`, ... until the name is free
    #[default]
    MakeUnique,
    /// Refuse to create the asset
    Fail,
}

/// Texture input of a root material's expression graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureSample {
    /// Material output the sample feeds
    pub property: MaterialProperty,
    /// Default texture
    pub texture: AssetId,
    /// Texture parameter name, if instances may override the texture
    pub parameter: Option<String>,
}

impl TextureSample {
    /// Fixed texture sample
    pub const fn new(property: MaterialProperty, texture: AssetId) -> Self {
        Self {
            property,
            texture,
            parameter: None,
        }
    }

    /// Sample exposed as an overridable texture parameter
    pub fn parameter(
        property: MaterialProperty,
        texture: AssetId,
        name: impl Into<String>,
    ) -> Self {
        Self {
            property,
            texture,
            parameter: Some(name.into()),
        }
    }
}

/// Root material data relevant to texture queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialGraph {
    /// Texture samples in graph order
    pub samples: Vec<TextureSample>,
}

/// Material instance data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialInstance {
    /// Parent material or instance
    pub parent: Option<AssetId>,
    /// Texture parameter overrides
    pub texture_parameters: BTreeMap<String, AssetId>,
    /// Static permutation
    pub static_parameters: StaticParameterSet,
}

impl MaterialInstance {
    /// Value of a static switch override, if present
    pub fn static_switch(&self, name: &str) -> Option<bool> {
        self.static_parameters
            .switch(name)
            .filter(|p| p.overridden)
            .map(|p| p.value)
    }
}

/// Object payload of an asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetObject {
    /// Static mesh
    StaticMesh(StaticMesh),
    /// Skeletal mesh
    SkeletalMesh(SkeletalMesh),
    /// Root material
    Material(MaterialGraph),
    /// Material instance
    MaterialInstance(MaterialInstance),
    /// Texture
    Texture,
    /// Anything else
    Other,
}

impl AssetObject {
    /// Class tag of the payload
    pub const fn class(&self) -> AssetClass {
        match self {
            Self::StaticMesh(_) => AssetClass::StaticMesh,
            Self::SkeletalMesh(_) => AssetClass::SkeletalMesh,
            Self::Material(_) => AssetClass::Material,
            Self::MaterialInstance(_) => AssetClass::MaterialInstance,
            Self::Texture => AssetClass::Texture,
            Self::Other => AssetClass::Other,
        }
    }
}

/// Stored asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    /// Object name
    pub name: String,
    /// Directory holding the package
    pub package_path: String,
    /// Object payload
    pub object: AssetObject,
    /// Package needs saving
    pub dirty: bool,
    /// Number of property-change notifications received
    pub edit_changes: u32,
}

impl AssetRecord {
    /// Full object path
    pub fn object_path(&self) -> String {
        path::object_path(&self.package_path, &self.name)
    }
}

/// In-memory [`EditorHost`]
#[derive(Debug, Default)]
pub struct MemoryHost {
    records: AssetMap<AssetRecord>,
    by_path: HashMap<String, AssetId>,
    /// Registry rows whose object fails to load
    unloadable: HashMap<String, AssetClass>,
    read_only: HashSet<String>,
    collision_policy: CollisionPolicy,
}

impl MemoryHost {
    /// Create an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how name collisions are handled
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    /// Current collision policy
    pub const fn collision_policy(&self) -> CollisionPolicy {
        self.collision_policy
    }

    /// Forbid creating assets inside `package_path`
    pub fn set_read_only(&mut self, package_path: impl Into<String>) {
        self.read_only.insert(package_path.into());
    }

    /// Read-only package paths
    pub fn read_only_paths(&self) -> impl Iterator<Item = &str> {
        self.read_only.iter().map(String::as_str)
    }

    /// Insert an asset, replacing any registry row at the same path
    pub fn insert(&mut self, package_path: &str, name: &str, object: AssetObject) -> AssetId {
        let record = AssetRecord {
            name: name.to_string(),
            package_path: package_path.trim_end_matches('/').to_string(),
            object,
            dirty: false,
            edit_changes: 0,
        };
        let object_path = record.object_path();
        let id = self.records.insert(record);
        if let Some(previous) = self.by_path.insert(object_path.clone(), id) {
            log::warn!("Replaced registry entry {object_path} ({previous:?} -> {id:?})");
        }
        id
    }

    /// Add a texture
    pub fn add_texture(&mut self, package_path: &str, name: &str) -> AssetId {
        self.insert(package_path, name, AssetObject::Texture)
    }

    /// Add a root material
    pub fn add_material(
        &mut self,
        package_path: &str,
        name: &str,
        samples: Vec<TextureSample>,
    ) -> AssetId {
        let graph = MaterialGraph { samples };
        self.insert(package_path, name, AssetObject::Material(graph))
    }

    /// Add a material instance with texture overrides
    pub fn add_material_instance(
        &mut self,
        package_path: &str,
        name: &str,
        parent: Option<AssetId>,
        texture_parameters: impl IntoIterator<Item = (String, AssetId)>,
    ) -> AssetId {
        let instance = MaterialInstance {
            parent,
            texture_parameters: texture_parameters.into_iter().collect(),
            static_parameters: StaticParameterSet::default(),
        };
        self.insert(package_path, name, AssetObject::MaterialInstance(instance))
    }

    /// Add a static mesh
    pub fn add_static_mesh(
        &mut self,
        package_path: &str,
        name: &str,
        materials: impl IntoIterator<Item = Option<AssetId>>,
    ) -> AssetId {
        self.insert(
            package_path,
            name,
            AssetObject::StaticMesh(StaticMesh::with_materials(materials)),
        )
    }

    /// Add a skeletal mesh
    pub fn add_skeletal_mesh(
        &mut self,
        package_path: &str,
        name: &str,
        materials: impl IntoIterator<Item = Option<AssetId>>,
    ) -> AssetId {
        self.insert(
            package_path,
            name,
            AssetObject::SkeletalMesh(SkeletalMesh::with_materials(materials)),
        )
    }

    /// Add an asset the tools do not handle
    pub fn add_other(&mut self, package_path: &str, name: &str) -> AssetId {
        self.insert(package_path, name, AssetObject::Other)
    }

    /// Add a registry row whose object cannot be loaded
    pub fn add_unloadable(
        &mut self,
        object_path: impl Into<String>,
        class: AssetClass,
    ) -> AssetData {
        let object_path = object_path.into();
        self.unloadable.insert(object_path.clone(), class);
        AssetData::new(object_path, class)
    }

    /// Registry row of a stored asset
    pub fn asset_data(&self, id: AssetId) -> Option<AssetData> {
        let record = self.records.get(id)?;
        Some(AssetData::new(record.object_path(), record.object.class()))
    }

    /// Handle of the asset at an object path
    pub fn id_of(&self, object_path: &str) -> Option<AssetId> {
        self.by_path.get(object_path).copied()
    }

    /// Stored asset
    pub fn record(&self, id: AssetId) -> Option<&AssetRecord> {
        self.records.get(id)
    }

    /// Iterate stored assets in insertion order
    pub fn records(&self) -> impl Iterator<Item = (AssetId, &AssetRecord)> {
        self.records.iter()
    }

    pub(super) fn records_mut(&mut self) -> &mut AssetMap<AssetRecord> {
        &mut self.records
    }

    /// Number of stored assets
    pub fn asset_count(&self) -> usize {
        self.records.len()
    }

    /// Material instance payload
    pub fn instance(&self, id: AssetId) -> Option<&MaterialInstance> {
        match &self.records.get(id)?.object {
            AssetObject::MaterialInstance(instance) => Some(instance),
            _ => None,
        }
    }

    /// Whether an asset's package needs saving
    pub fn is_dirty(&self, id: AssetId) -> bool {
        self.records.get(id).is_some_and(|r| r.dirty)
    }

    /// Property-change notifications received by an asset
    pub fn edit_change_count(&self, id: AssetId) -> u32 {
        self.records.get(id).map_or(0, |r| r.edit_changes)
    }

    /// Clear every dirty flag, returning the assets that were dirty
    pub fn save_dirty_packages(&mut self) -> Vec<AssetId> {
        let mut saved = Vec::new();
        for (id, record) in &mut self.records {
            if record.dirty {
                record.dirty = false;
                saved.push(id);
            }
        }
        log::debug!("Saved {} package(s)", saved.len());
        saved
    }

    fn display_path(&self, id: AssetId) -> String {
        self.records
            .get(id)
            .map_or_else(|| format!("{id:?}"), AssetRecord::object_path)
    }

    /// Pick the name a new asset will get, honouring the collision policy
    fn claim_name(&self, name: &str, package_path: &str) -> Result<String, HostError> {
        if !path::is_valid_asset_name(name) {
            return Err(HostError::InvalidName(name.to_string()));
        }
        let package_path = package_path.trim_end_matches('/');
        if self.read_only.contains(package_path) {
            return Err(HostError::ReadOnly(package_path.to_string()));
        }

        let is_free = |candidate: &str| {
            let object_path = path::object_path(package_path, candidate);
            !self.by_path.contains_key(&object_path) && !self.unloadable.contains_key(&object_path)
        };
        if is_free(name) {
            return Ok(name.to_string());
        }

        match self.collision_policy {
            CollisionPolicy::Fail => {
                let taken = path::object_path(package_path, name);
                Err(HostError::AlreadyExists(taken))
            }
            CollisionPolicy::MakeUnique => {
                let unique = (1..)
                    .map(|suffix| format!("{name}_{suffix}"))
                    .find(|candidate| is_free(candidate))
                    .unwrap_or_else(|| name.to_string());
                log::debug!("Name {name} taken in {package_path}, using {unique}");
                Ok(unique)
            }
        }
    }

    fn create(
        &mut self,
        name: &str,
        package_path: &str,
        object: AssetObject,
    ) -> Result<AssetId, HostError> {
        let name = self.claim_name(name, package_path)?;
        let id = self.insert(package_path, &name, object);
        if let Some(record) = self.records.get_mut(id) {
            record.dirty = true;
        }
        Ok(id)
    }

    fn instance_mut(&mut self, id: AssetId) -> Result<&mut MaterialInstance, HostError> {
        let display = self.display_path(id);
        match self.records.get_mut(id).map(|r| &mut r.object) {
            Some(AssetObject::MaterialInstance(instance)) => Ok(instance),
            Some(_) => Err(HostError::WrongClass {
                path: display,
                expected: AssetClass::MaterialInstance.class_name(),
            }),
            None => Err(HostError::NotFound(display)),
        }
    }

    fn require_class(
        &self,
        id: AssetId,
        accepts: fn(AssetClass) -> bool,
        expected: &'static str,
    ) -> Result<(), HostError> {
        let record = self
            .records
            .get(id)
            .ok_or_else(|| HostError::NotFound(format!("{id:?}")))?;
        if accepts(record.object.class()) {
            Ok(())
        } else {
            Err(HostError::WrongClass {
                path: record.object_path(),
                expected,
            })
        }
    }

    /// Whether `ancestor` appears in the parent chain starting at `start`
    ///
    /// Fails with [`HostError::ParentChainTooDeep`] when the chain does not
    /// end within [`MAX_PARENT_DEPTH`] links.
    fn chain_contains(&self, start: AssetId, ancestor: AssetId) -> Result<bool, HostError> {
        let mut current = Some(start);
        for _ in 0..MAX_PARENT_DEPTH {
            let Some(id) = current else {
                return Ok(false);
            };
            if id == ancestor {
                return Ok(true);
            }
            current = self.instance(id).and_then(|instance| instance.parent);
        }
        match current {
            None => Ok(false),
            Some(_) => Err(HostError::ParentChainTooDeep(self.display_path(start))),
        }
    }
}

impl EditorHost for MemoryHost {
    fn find_asset_by_object_path(&self, object_path: &str) -> Option<AssetData> {
        if let Some(&id) = self.by_path.get(object_path) {
            return self.asset_data(id);
        }
        self.unloadable
            .get(object_path)
            .map(|&class| AssetData::new(object_path, class))
    }

    fn load_asset(&mut self, asset: &AssetData) -> Option<AssetId> {
        let id = self.by_path.get(&asset.object_path).copied();
        if id.is_none() {
            log::debug!("Failed to load {}", asset.object_path);
        }
        id
    }

    fn asset_class(&self, id: AssetId) -> Option<AssetClass> {
        self.records.get(id).map(|r| r.object.class())
    }

    fn asset_name(&self, id: AssetId) -> Option<String> {
        self.records.get(id).map(|r| r.name.clone())
    }

    fn asset_object_path(&self, id: AssetId) -> Option<String> {
        self.records.get(id).map(AssetRecord::object_path)
    }

    fn textures_in_property_chain(
        &self,
        material: AssetId,
        property: MaterialProperty,
    ) -> Vec<AssetId> {
        // Overrides nearest to `material` win
        let mut overrides: Vec<&BTreeMap<String, AssetId>> = Vec::new();
        let mut current = Some(material);

        for _ in 0..MAX_PARENT_DEPTH {
            let Some(id) = current else {
                break;
            };
            match self.records.get(id).map(|r| &r.object) {
                Some(AssetObject::MaterialInstance(instance)) => {
                    overrides.push(&instance.texture_parameters);
                    current = instance.parent;
                }
                Some(AssetObject::Material(graph)) => {
                    return graph
                        .samples
                        .iter()
                        .filter(|sample| sample.property == property)
                        .map(|sample| {
                            let overridden = sample.parameter.as_ref().and_then(|name| {
                                overrides.iter().find_map(|o| o.get(name).copied())
                            });
                            overridden.unwrap_or(sample.texture)
                        })
                        .collect();
                }
                _ => break,
            }
        }

        Vec::new()
    }

    fn duplicate_asset(
        &mut self,
        name: &str,
        package_path: &str,
        source: AssetId,
    ) -> Result<AssetId, HostError> {
        let object = self
            .records
            .get(source)
            .map(|r| r.object.clone())
            .ok_or_else(|| HostError::NotFound(format!("{source:?}")))?;
        let id = self.create(name, package_path, object)?;
        log::debug!("Duplicated {} as {}", self.display_path(source), self.display_path(id));
        Ok(id)
    }

    fn create_material_instance(
        &mut self,
        name: &str,
        package_path: &str,
        parent: AssetId,
    ) -> Result<AssetId, HostError> {
        self.require_class(parent, AssetClass::is_material_interface, "material")?;
        let instance = MaterialInstance {
            parent: Some(parent),
            ..MaterialInstance::default()
        };
        let id = self.create(name, package_path, AssetObject::MaterialInstance(instance))?;
        log::debug!("Created material instance {}", self.display_path(id));
        Ok(id)
    }

    fn material_slots(&self, mesh: AssetId) -> Option<&dyn MaterialSlots> {
        match &self.records.get(mesh)?.object {
            AssetObject::StaticMesh(static_mesh) => Some(static_mesh as &dyn MaterialSlots),
            AssetObject::SkeletalMesh(skeletal_mesh) => Some(skeletal_mesh as &dyn MaterialSlots),
            _ => None,
        }
    }

    fn material_slots_mut(&mut self, mesh: AssetId) -> Option<&mut dyn MaterialSlots> {
        match &mut self.records.get_mut(mesh)?.object {
            AssetObject::StaticMesh(static_mesh) => Some(static_mesh as &mut dyn MaterialSlots),
            AssetObject::SkeletalMesh(skeletal_mesh) => {
                Some(skeletal_mesh as &mut dyn MaterialSlots)
            }
            _ => None,
        }
    }

    fn set_texture_parameter(
        &mut self,
        instance: AssetId,
        name: &str,
        texture: AssetId,
    ) -> Result<(), HostError> {
        self.require_class(texture, |class| class == AssetClass::Texture, "texture")?;
        self.instance_mut(instance)?
            .texture_parameters
            .insert(name.to_string(), texture);
        Ok(())
    }

    fn update_static_permutation(
        &mut self,
        instance: AssetId,
        parameters: &StaticParameterSet,
    ) -> Result<(), HostError> {
        let switches = &mut self.instance_mut(instance)?.static_parameters.static_switch_parameters;
        for parameter in &parameters.static_switch_parameters {
            match switches.iter_mut().find(|existing| existing.name == parameter.name) {
                Some(existing) => *existing = parameter.clone(),
                None => switches.push(parameter.clone()),
            }
        }
        Ok(())
    }

    fn set_parent(&mut self, instance: AssetId, parent: AssetId) -> Result<(), HostError> {
        self.require_class(parent, AssetClass::is_material_interface, "material")?;
        if self.chain_contains(parent, instance)? {
            return Err(HostError::CyclicParent(self.display_path(instance)));
        }
        self.instance_mut(instance)?.parent = Some(parent);
        Ok(())
    }

    fn mark_package_dirty(&mut self, id: AssetId) {
        if let Some(record) = self.records.get_mut(id) {
            record.dirty = true;
        }
    }

    fn post_edit_change(&mut self, id: AssetId) {
        if let Some(record) = self.records.get_mut(id) {
            record.edit_changes += 1;
        }
    }
}
