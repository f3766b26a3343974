//! Host editor services
//!
//! The converter never owns assets. Registry lookups, duplication, creation,
//! slot edits and package bookkeeping all go through [`EditorHost`], and the
//! final selection highlight goes through [`SelectionSink`]. An editor
//! integration implements these against its own object model;
//! [`MemoryHost`] implements them in memory for tests and offline runs.
//!
//! # Threading
//! Not Send + Sync. Every call happens on the editor thread that handled the
//! menu action.

pub mod library;
pub mod memory;

pub use library::{AssetDesc, AssetKindDesc, AssetLibrary, SampleDesc};
pub use memory::{
    AssetObject, AssetRecord, CollisionPolicy, MaterialGraph, MaterialInstance, MemoryHost,
    TextureSample,
};

use thiserror::Error;

use crate::assets::{
    path, AssetClass, AssetData, AssetId, MaterialProperty, MaterialSlots, ResolvedAsset,
    StaticParameterSet,
};

/// Editor services consumed by the batch tools
pub trait EditorHost {
    /// Look up a registry entry by object path without loading it
    fn find_asset_by_object_path(&self, object_path: &str) -> Option<AssetData>;

    /// Load a registry entry into memory
    ///
    /// `None` if the entry has no loadable object.
    fn load_asset(&mut self, asset: &AssetData) -> Option<AssetId>;

    /// Class of a loaded object
    fn asset_class(&self, id: AssetId) -> Option<AssetClass>;

    /// Object name of a loaded object
    fn asset_name(&self, id: AssetId) -> Option<String>;

    /// Full object path of a loaded object
    fn asset_object_path(&self, id: AssetId) -> Option<String>;

    /// Textures feeding a material property, following parent and
    /// parameter-override chains
    fn textures_in_property_chain(
        &self,
        material: AssetId,
        property: MaterialProperty,
    ) -> Vec<AssetId>;

    /// Duplicate `source` as a new asset named `name` inside `package_path`
    fn duplicate_asset(
        &mut self,
        name: &str,
        package_path: &str,
        source: AssetId,
    ) -> Result<AssetId, HostError>;

    /// Create a material instance named `name` inside `package_path`
    fn create_material_instance(
        &mut self,
        name: &str,
        package_path: &str,
        parent: AssetId,
    ) -> Result<AssetId, HostError>;

    /// Slot view of a mesh-like object
    fn material_slots(&self, mesh: AssetId) -> Option<&dyn MaterialSlots>;

    /// Mutable slot view of a mesh-like object
    fn material_slots_mut(&mut self, mesh: AssetId) -> Option<&mut dyn MaterialSlots>;

    /// Set a texture parameter on a material instance
    fn set_texture_parameter(
        &mut self,
        instance: AssetId,
        name: &str,
        texture: AssetId,
    ) -> Result<(), HostError>;

    /// Apply static parameter overrides and rebuild the instance permutation
    fn update_static_permutation(
        &mut self,
        instance: AssetId,
        parameters: &StaticParameterSet,
    ) -> Result<(), HostError>;

    /// Change the parent of a material instance
    ///
    /// Fails with [`HostError::CyclicParent`] if `instance` is already an
    /// ancestor of `parent`, and with [`HostError::ParentChainTooDeep`] if
    /// the parent chain is too long to walk.
    fn set_parent(&mut self, instance: AssetId, parent: AssetId) -> Result<(), HostError>;

    /// Flag the owning package as needing a save
    fn mark_package_dirty(&mut self, id: AssetId);

    /// Notify the editor that an object's properties changed
    fn post_edit_change(&mut self, id: AssetId);

    /// Load a registry entry and narrow it by the loaded object's class
    fn resolve(&mut self, asset: &AssetData) -> Option<ResolvedAsset> {
        let id = self.load_asset(asset)?;
        let class = self.asset_class(id)?;
        Some(ResolvedAsset::from_class(id, class))
    }

    /// Directory holding a loaded object's package
    fn asset_package_path(&self, id: AssetId) -> Option<String> {
        self.asset_object_path(id)
            .map(|object_path| path::long_package_path(&object_path).to_string())
    }
}

/// Receives assets to highlight in the content browser
pub trait SelectionSink {
    /// Select and reveal the given assets
    fn sync_browser_to_assets(&mut self, assets: &[AssetId]);
}

/// Sink that remembers every batch it was handed
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Synced batches, oldest first
    pub batches: Vec<Vec<AssetId>>,
}

impl RecordingSink {
    /// Most recent batch
    pub fn last(&self) -> Option<&[AssetId]> {
        self.batches.last().map(Vec::as_slice)
    }
}

impl SelectionSink for RecordingSink {
    fn sync_browser_to_assets(&mut self, assets: &[AssetId]) {
        self.batches.push(assets.to_vec());
    }
}

/// Sink for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SelectionSink for NullSink {
    fn sync_browser_to_assets(&mut self, assets: &[AssetId]) {
        log::trace!("Discarding browser sync of {} asset(s)", assets.len());
    }
}

/// Host service errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// Asset exists but has the wrong class
    #[error("Asset {path} is not a {expected}")]
    WrongClass {
        /// Offending object path
        path: String,
        /// Expected class name
        expected: &'static str,
    },

    /// An asset already occupies the requested path
    #[error("Asset already exists: {0}")]
    AlreadyExists(String),

    /// The destination cannot be written to
    #[error("Destination is read-only: {0}")]
    ReadOnly(String),

    /// The requested asset name is not usable
    #[error("Invalid asset name: {0:?}")]
    InvalidName(String),

    /// Reparenting would make an instance its own ancestor
    #[error("Reparenting {0} would create a parent cycle")]
    CyclicParent(String),

    /// The new parent's own chain is too deep to check for cycles
    #[error("Parent chain above {0} is too deep")]
    ParentChainTooDeep(String),
}
