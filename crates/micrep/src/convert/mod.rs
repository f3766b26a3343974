//! Batch material conversion
//!
//! Replaces every material slot of the selected meshes with a material
//! instance derived from a duplicate of the template material. Per-asset
//! mode duplicates the template once per mesh; unified mode shares one
//! duplicate across the selection and reuses instances whose source
//! materials have the same textures.

mod converter;
mod dedup;
mod factory;
mod textures;

#[cfg(test)]
mod test_scenarios;

pub use converter::BatchConverter;
pub use dedup::{DedupKey, InstanceCache};
pub use factory::{FactoryError, GeneratedInstance, InstanceFactory};
pub use textures::TexturePair;

use thiserror::Error;

use crate::assets::{AssetData, AssetId};
use crate::config::ConfigError;
use crate::foundation::collections::UniqueVec;

/// Errors that abort a whole conversion run
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The template material is not in the registry or cannot be loaded
    #[error("Template material not found: {0}")]
    TemplateNotFound(String),

    /// The template asset exists but is not a material
    #[error("Template asset is not a material: {0}")]
    TemplateNotMaterial(String),

    /// Unified mode could not duplicate the template for any selected mesh
    #[error("Template could not be duplicated for any selected mesh")]
    NoTemplateDuplicate,

    /// The converter configuration is unusable
    #[error("Invalid converter configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

/// Outcome of one conversion run
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    /// Generated instances in creation order
    pub created_instances: Vec<AssetId>,
    /// Template duplicates created for the run
    pub template_duplicates: Vec<AssetId>,
    /// Meshes with at least one rewritten slot
    pub modified_assets: UniqueVec<AssetId>,
    /// Selection rows that were not converted
    pub skipped_assets: Vec<AssetData>,
    /// Slots left untouched because instance creation failed
    pub failed_slots: usize,
    /// Slots pointed at an instance generated earlier in the run
    pub reused_slots: usize,
}

impl ConversionReport {
    /// Whether the run changed nothing
    pub fn is_empty(&self) -> bool {
        self.created_instances.is_empty()
            && self.template_duplicates.is_empty()
            && self.modified_assets.is_empty()
    }
}
