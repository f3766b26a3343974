//! Per-asset and unified batch conversion

use super::dedup::InstanceCache;
use super::factory::InstanceFactory;
use super::textures::TexturePair;
use super::{ConversionReport, ConvertError};
use crate::assets::{AssetClass, AssetData, AssetId, ResolvedAsset};
use crate::config::ConverterConfig;
use crate::host::{EditorHost, HostError, SelectionSink};

/// Template duplicate that generated instances are parented to
#[derive(Debug, Clone)]
struct BaseMaterial {
    id: AssetId,
    simple_name: String,
}

/// Mesh picked out of the selection
#[derive(Debug, Clone)]
struct TargetMesh {
    id: AssetId,
    name: String,
    package_path: String,
    slot_count: usize,
}

/// Converts mesh materials into generated material instances
#[derive(Debug, Clone)]
pub struct BatchConverter {
    config: ConverterConfig,
    factory: InstanceFactory,
}

impl Default for BatchConverter {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl BatchConverter {
    /// Create a converter without validating the configuration
    pub fn new(config: ConverterConfig) -> Self {
        let factory = InstanceFactory::new(config.naming.clone(), config.parameters.clone());
        Self { config, factory }
    }

    /// Create a converter, rejecting an invalid configuration
    pub fn try_new(config: ConverterConfig) -> Result<Self, ConvertError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Active configuration
    pub const fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert each selected mesh against its own template duplicate
    ///
    /// A mesh whose duplicate cannot be created is skipped whole; a slot
    /// whose instance cannot be created keeps its old material.
    pub fn convert_per_asset<H, S>(
        &self,
        host: &mut H,
        sink: &mut S,
        selection: &[AssetData],
    ) -> Result<ConversionReport, ConvertError>
    where
        H: EditorHost + ?Sized,
        S: SelectionSink + ?Sized,
    {
        let template = self.resolve_template(host)?;
        let mut report = ConversionReport::default();

        for asset in selection {
            let Some(mesh) = self.target_mesh(host, asset, &mut report) else {
                continue;
            };
            if mesh.slot_count == 0 {
                log::debug!("Skipping {}: no material slots", asset.object_path);
                continue;
            }

            let simple_name = self.config.naming.simple_name(&mesh.name);
            let duplicate =
                self.duplicate_template(host, template, &simple_name, &mesh.package_path);
            let base = match duplicate {
                Ok(base) => base,
                Err(e) => {
                    log::warn!(
                        "Skipping {}: template duplication failed: {e}",
                        asset.object_path
                    );
                    report.skipped_assets.push(asset.clone());
                    continue;
                }
            };
            report.template_duplicates.push(base.id);

            self.convert_slots(host, &mesh, &base, None, &mut report);
        }

        self.finish(sink, &report, "per-asset");
        Ok(report)
    }

    /// Convert the selection against one shared template duplicate
    ///
    /// Every mesh in selection order is a duplication candidate, including
    /// meshes without slots. The first mesh whose duplicate can be created
    /// supplies the shared base material and its name. Slots whose source materials resolve to
    /// the same textures share one generated instance.
    pub fn convert_unified<H, S>(
        &self,
        host: &mut H,
        sink: &mut S,
        selection: &[AssetData],
    ) -> Result<ConversionReport, ConvertError>
    where
        H: EditorHost + ?Sized,
        S: SelectionSink + ?Sized,
    {
        let template = self.resolve_template(host)?;
        let mut report = ConversionReport::default();

        let mut meshes = Vec::new();
        for asset in selection {
            if let Some(mesh) = self.target_mesh(host, asset, &mut report) {
                meshes.push(mesh);
            }
        }
        if meshes.is_empty() {
            self.finish(sink, &report, "unified");
            return Ok(report);
        }

        let mut base = None;
        for mesh in &meshes {
            let simple_name = self.config.naming.simple_name(&mesh.name);
            match self.duplicate_template(host, template, &simple_name, &mesh.package_path) {
                Ok(duplicate) => {
                    base = Some(duplicate);
                    break;
                }
                Err(e) => {
                    log::warn!("Template duplication next to {} failed: {e}", mesh.name);
                }
            }
        }
        let Some(base) = base else {
            log::error!("Unified conversion aborted: no template duplicate could be created");
            return Err(ConvertError::NoTemplateDuplicate);
        };
        report.template_duplicates.push(base.id);

        let mut cache = InstanceCache::new();
        for mesh in meshes.iter().filter(|mesh| mesh.slot_count > 0) {
            self.convert_slots(host, mesh, &base, Some(&mut cache), &mut report);
        }
        log::debug!("Unified run produced {} distinct texture pair(s)", cache.len());

        self.finish(sink, &report, "unified");
        Ok(report)
    }

    /// Look up and load the template material
    pub fn resolve_template<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
    ) -> Result<AssetId, ConvertError> {
        let path = &self.config.template_path;
        let Some(data) = host.find_asset_by_object_path(path) else {
            log::error!("Template material {path} is not in the asset registry");
            return Err(ConvertError::TemplateNotFound(path.clone()));
        };

        match host.resolve(&data) {
            Some(ResolvedAsset::Material(id)) => Ok(id),
            Some(_) => {
                log::error!("Template {path} is not a material");
                Err(ConvertError::TemplateNotMaterial(path.clone()))
            }
            None => {
                log::error!("Template material {path} failed to load");
                Err(ConvertError::TemplateNotFound(path.clone()))
            }
        }
    }

    /// Load a selection row as a mesh
    fn target_mesh<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        asset: &AssetData,
        report: &mut ConversionReport,
    ) -> Option<TargetMesh> {
        let Some(resolved) = host.resolve(asset) else {
            log::debug!("Skipping {}: failed to load", asset.object_path);
            report.skipped_assets.push(asset.clone());
            return None;
        };
        let Some(id) = resolved.as_mesh() else {
            log::debug!("Skipping {}: not a mesh", asset.object_path);
            report.skipped_assets.push(asset.clone());
            return None;
        };

        let slot_count = host.material_slots(id).map_or(0, |slots| slots.slot_count());
        let name = host.asset_name(id).unwrap_or_else(|| asset.asset_name().to_string());
        let package_path = host
            .asset_package_path(id)
            .unwrap_or_else(|| asset.package_path().to_string());
        Some(TargetMesh {
            id,
            name,
            package_path,
            slot_count,
        })
    }

    fn duplicate_template<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        template: AssetId,
        simple_name: &str,
        package_path: &str,
    ) -> Result<BaseMaterial, HostError> {
        let name = self.config.naming.base_material_name(simple_name);
        let id = host.duplicate_asset(&name, package_path, template)?;
        if host.asset_class(id) != Some(AssetClass::Material) {
            return Err(HostError::WrongClass {
                path: host.asset_object_path(id).unwrap_or(name),
                expected: AssetClass::Material.class_name(),
            });
        }
        log::debug!("Duplicated template as {name} in {package_path}");
        Ok(BaseMaterial {
            id,
            simple_name: simple_name.to_string(),
        })
    }

    /// Rewrite every slot of one mesh
    ///
    /// With a cache, a slot whose texture pair was seen earlier in the run
    /// reuses that instance instead of creating a new one. Failed creations
    /// are not cached.
    fn convert_slots<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        mesh: &TargetMesh,
        base: &BaseMaterial,
        mut cache: Option<&mut InstanceCache>,
        report: &mut ConversionReport,
    ) {
        let mut rewritten = 0;

        for index in 0..mesh.slot_count {
            let source = host
                .material_slots(mesh.id)
                .and_then(|slots| slots.slot_material(index));
            let key = TexturePair::extract(host, source);

            let reused = cache.as_deref().and_then(|cache| cache.get(&key));
            let instance = if let Some(instance) = reused {
                report.reused_slots += 1;
                instance
            } else {
                match self
                    .factory
                    .create(host, Some(base.id), &base.simple_name, source, &mesh.package_path)
                {
                    Ok(created) => {
                        report.created_instances.push(created.id);
                        if let Some(cache) = cache.as_deref_mut() {
                            cache.insert(key, created.id);
                        }
                        created.id
                    }
                    Err(e) => {
                        log::warn!("{} slot {index}: instance creation failed: {e}", mesh.name);
                        report.failed_slots += 1;
                        continue;
                    }
                }
            };

            let assigned = host
                .material_slots_mut(mesh.id)
                .is_some_and(|slots| slots.set_slot_material(index, Some(instance)));
            if assigned {
                log::debug!("{} slot {index} -> {instance:?}", mesh.name);
                rewritten += 1;
            }
        }

        if rewritten > 0 {
            host.mark_package_dirty(mesh.id);
            host.post_edit_change(mesh.id);
            report.modified_assets.push(mesh.id);
        }
    }

    fn finish<S: SelectionSink + ?Sized>(
        &self,
        sink: &mut S,
        report: &ConversionReport,
        mode: &str,
    ) {
        log::info!(
            "Material conversion ({mode}): {} instance(s) created, {} slot(s) reused, \
             {} mesh(es) modified, {} slot(s) failed, {} asset(s) skipped",
            report.created_instances.len(),
            report.reused_slots,
            report.modified_assets.len(),
            report.failed_slots,
            report.skipped_assets.len(),
        );

        if self.config.sync_browser && !report.created_instances.is_empty() {
            sink.sync_browser_to_assets(&report.created_instances);
        }
    }
}
