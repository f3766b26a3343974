//! Generated instance creation
//!
//! Builds one material instance parented to a template duplicate and
//! parameterized from the textures of the material it replaces.

use thiserror::Error;

use super::textures::TexturePair;
use crate::assets::{AssetId, StaticParameterSet, StaticSwitchParameter};
use crate::config::{NamingConfig, ParameterNames};
use crate::host::{EditorHost, HostError};

/// Reasons a generated instance could not be created
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// No template duplicate to parent the instance to
    #[error("No template material to derive from")]
    MissingTemplate,

    /// The slot had no material to convert
    #[error("Slot has no source material")]
    MissingSource,

    /// The host refused to create the asset
    #[error("Host error: {0}")]
    Host(#[from] HostError),
}

/// Result of a successful creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedInstance {
    /// New material instance
    pub id: AssetId,
    /// Textures copied from the source material
    pub textures: TexturePair,
    /// Whether the normal-map switch was forced off
    pub normal_disabled: bool,
}

/// Creates generated instances
#[derive(Debug, Clone, Default)]
pub struct InstanceFactory {
    naming: NamingConfig,
    parameters: ParameterNames,
}

impl InstanceFactory {
    /// Create a factory with the given naming and parameter conventions
    pub const fn new(naming: NamingConfig, parameters: ParameterNames) -> Self {
        Self { naming, parameters }
    }

    /// Create an instance of `template` replacing `source`
    ///
    /// The instance is named `<instance prefix><simple name>_<source name>`
    /// and placed in `package_path`. Texture parameters are set only for
    /// textures the source actually has; without a normal texture the
    /// normal-map switch is overridden to false instead.
    pub fn create<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        template: Option<AssetId>,
        simple_name: &str,
        source: Option<AssetId>,
        package_path: &str,
    ) -> Result<GeneratedInstance, FactoryError> {
        let template = template.ok_or(FactoryError::MissingTemplate)?;
        let source = source.ok_or(FactoryError::MissingSource)?;
        let source_name = host.asset_name(source).ok_or(FactoryError::MissingSource)?;

        let textures = TexturePair::extract(host, Some(source));
        let name = self.naming.instance_name(simple_name, &source_name);
        let id = host.create_material_instance(&name, package_path, template)?;

        if let Some(color) = textures.color {
            self.apply_texture(host, id, &self.parameters.base_color, color);
        }

        let mut static_parameters = StaticParameterSet::default();
        if let Some(normal) = textures.normal {
            self.apply_texture(host, id, &self.parameters.normal, normal);
        } else {
            let switch =
                StaticSwitchParameter::overriding(&self.parameters.use_normal_switch, false);
            static_parameters.static_switch_parameters.push(switch);
        }

        let mut normal_disabled = false;
        if !static_parameters.is_empty() {
            match host.update_static_permutation(id, &static_parameters) {
                Ok(()) => normal_disabled = true,
                Err(e) => log::warn!("Failed to update static permutation of {name}: {e}"),
            }
        }
        host.post_edit_change(id);

        log::debug!(
            "Created {name} (color: {}, normal: {})",
            textures.color.is_some(),
            textures.normal.is_some()
        );

        Ok(GeneratedInstance {
            id,
            textures,
            normal_disabled,
        })
    }

    fn apply_texture<H: EditorHost + ?Sized>(
        &self,
        host: &mut H,
        instance: AssetId,
        parameter: &str,
        texture: AssetId,
    ) {
        if let Err(e) = host.set_texture_parameter(instance, parameter, texture) {
            log::warn!("Failed to set texture parameter {parameter}: {e}");
        }
    }
}
