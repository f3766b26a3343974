//! # Converter Configuration
//!
//! Names and paths that drive batch conversion. The defaults reproduce the
//! conventions the template material ships with: meshes named `SM_*`,
//! materials named `M_*`, generated instances named `MI_*`, and a template
//! exposing `BaseColor` / `Normal` texture parameters plus a `UseNormal`
//! static switch.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};

/// Object path of the template material shipped with the plugin content
pub const DEFAULT_TEMPLATE_PATH: &str = "/MICRep/M_MICRepBase.M_MICRepBase";

/// Naming conventions for derived assets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Removed from mesh names to form the simple base name
    pub mesh_prefix: String,
    /// Removed from source material names when naming instances
    pub material_prefix: String,
    /// Prepended to the simple name for template duplicates
    pub base_material_prefix: String,
    /// Appended to the simple name for template duplicates
    pub base_material_suffix: String,
    /// Prepended to generated instance names
    pub instance_prefix: String,
}

impl NamingConfig {
    /// Create naming config with the stock prefixes
    pub fn new() -> Self {
        Self {
            mesh_prefix: "SM_".to_string(),
            material_prefix: "M_".to_string(),
            base_material_prefix: "M_".to_string(),
            base_material_suffix: "_Base".to_string(),
            instance_prefix: "MI_".to_string(),
        }
    }

    /// Derive the simple base name from a mesh asset name
    ///
    /// Every case-sensitive occurrence of the mesh prefix is removed, not
    /// just a leading one.
    pub fn simple_name(&self, mesh_name: &str) -> String {
        strip_all(mesh_name, &self.mesh_prefix)
    }

    /// Name of the template duplicate for a simple base name
    pub fn base_material_name(&self, simple_name: &str) -> String {
        format!(
            "{}{}{}",
            self.base_material_prefix, simple_name, self.base_material_suffix
        )
    }

    /// Name of a generated instance
    pub fn instance_name(&self, simple_name: &str, source_material_name: &str) -> String {
        format!(
            "{}{}_{}",
            self.instance_prefix,
            simple_name,
            strip_all(source_material_name, &self.material_prefix)
        )
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_all(name: &str, pattern: &str) -> String {
    if pattern.is_empty() {
        name.to_string()
    } else {
        name.replace(pattern, "")
    }
}

/// Parameter names exposed by the template material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterNames {
    /// Texture parameter receiving the base color texture
    pub base_color: String,
    /// Texture parameter receiving the normal texture
    pub normal: String,
    /// Static switch that enables normal mapping
    pub use_normal_switch: String,
}

impl Default for ParameterNames {
    fn default() -> Self {
        Self {
            base_color: "BaseColor".to_string(),
            normal: "Normal".to_string(),
            use_normal_switch: "UseNormal".to_string(),
        }
    }
}

/// Top-level converter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    /// Object path of the template material
    pub template_path: String,
    /// Forward created assets to the selection sink after a run
    pub sync_browser: bool,
    /// Naming conventions
    pub naming: NamingConfig,
    /// Template parameter names
    pub parameters: ParameterNames,
}

impl ConverterConfig {
    /// Create a configuration using a custom template material
    pub fn new(template_path: impl Into<String>) -> Self {
        Self {
            template_path: template_path.into(),
            ..Self::default()
        }
    }

    /// Set naming conventions
    pub fn with_naming(mut self, naming: NamingConfig) -> Self {
        self.naming = naming;
        self
    }

    /// Set template parameter names
    pub fn with_parameters(mut self, parameters: ParameterNames) -> Self {
        self.parameters = parameters;
        self
    }

    /// Enable or disable selection sync after a run
    pub fn with_browser_sync(mut self, enabled: bool) -> Self {
        self.sync_browser = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.template_path.is_empty() {
            return Err(ConfigError::Invalid("Template path cannot be empty".to_string()));
        }
        if !self.template_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "Template path must be absolute: {}",
                self.template_path
            )));
        }

        let parameters = [
            &self.parameters.base_color,
            &self.parameters.normal,
            &self.parameters.use_normal_switch,
        ];
        if parameters.iter().any(|name| name.is_empty()) {
            return Err(ConfigError::Invalid("Parameter names cannot be empty".to_string()));
        }

        if self.naming.instance_prefix.is_empty() {
            return Err(ConfigError::Invalid("Instance prefix cannot be empty".to_string()));
        }

        Ok(())
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            template_path: DEFAULT_TEMPLATE_PATH.to_string(),
            sync_browser: true,
            naming: NamingConfig::default(),
            parameters: ParameterNames::default(),
        }
    }
}

impl Config for ConverterConfig {}
