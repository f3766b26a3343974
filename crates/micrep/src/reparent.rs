//! Batch reparenting of material instances

use thiserror::Error;

use crate::assets::{AssetData, AssetId, ResolvedAsset};
use crate::config::ConverterConfig;
use crate::host::{EditorHost, SelectionSink};

/// Errors that prevent a reparent run from starting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReparentError {
    /// The chosen parent is not in the registry or cannot be loaded
    #[error("New parent not found: {0}")]
    ParentNotFound(String),

    /// The chosen parent is neither a material nor a material instance
    #[error("New parent is not a material: {0}")]
    ParentNotMaterial(String),
}

/// Outcome of one reparent run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebindReport {
    /// Instances now parented to the new material, in selection order
    pub updated_instances: Vec<AssetId>,
    /// Selection rows left untouched
    pub skipped: Vec<AssetData>,
}

/// Points a batch of material instances at a new parent
#[derive(Debug, Clone, Copy)]
pub struct ParentRebinder {
    sync_browser: bool,
}

impl Default for ParentRebinder {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ParentRebinder {
    /// Create a rebinder
    pub const fn new(sync_browser: bool) -> Self {
        Self { sync_browser }
    }

    /// Create a rebinder honouring the converter's browser sync setting
    pub const fn from_config(config: &ConverterConfig) -> Self {
        Self::new(config.sync_browser)
    }

    /// Reparent every material instance in `selection` to `new_parent`
    ///
    /// Entries that are not material instances, fail to load, are the new
    /// parent itself or are rejected by the host are skipped.
    pub fn reparent<H, S>(
        &self,
        host: &mut H,
        sink: &mut S,
        new_parent: &AssetData,
        selection: &[AssetData],
    ) -> Result<RebindReport, ReparentError>
    where
        H: EditorHost + ?Sized,
        S: SelectionSink + ?Sized,
    {
        let parent = match host.resolve(new_parent) {
            Some(resolved) => resolved
                .as_material_interface()
                .ok_or_else(|| ReparentError::ParentNotMaterial(new_parent.object_path.clone()))?,
            None => return Err(ReparentError::ParentNotFound(new_parent.object_path.clone())),
        };

        let mut report = RebindReport::default();
        for asset in selection {
            let resolved = host.resolve(asset);
            let Some(instance) = resolved.and_then(ResolvedAsset::as_material_instance) else {
                log::debug!("Skipping {}: not a material instance", asset.object_path);
                report.skipped.push(asset.clone());
                continue;
            };
            if instance == parent {
                log::debug!("Skipping {}: cannot be its own parent", asset.object_path);
                report.skipped.push(asset.clone());
                continue;
            }

            if let Err(e) = host.set_parent(instance, parent) {
                log::warn!("Failed to reparent {}: {e}", asset.object_path);
                report.skipped.push(asset.clone());
                continue;
            }
            host.mark_package_dirty(instance);
            host.post_edit_change(instance);
            report.updated_instances.push(instance);
        }

        log::info!(
            "Reparented {} instance(s) to {}, skipped {}",
            report.updated_instances.len(),
            new_parent.object_path,
            report.skipped.len()
        );
        if self.sync_browser && !report.updated_instances.is_empty() {
            sink.sync_browser_to_assets(&report.updated_instances);
        }
        Ok(report)
    }
}
