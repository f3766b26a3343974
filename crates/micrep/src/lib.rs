//! # MICRep
//!
//! Editor-time material tooling: batch-converts mesh materials into
//! material instances derived from a template material, and batch-reparents
//! existing material instances.
//!
//! ## Features
//!
//! - **Per-asset conversion**: one template duplicate per mesh, one new
//!   instance per material slot
//! - **Unified conversion**: one shared template duplicate for the whole
//!   selection, instances shared between slots with identical textures
//! - **Reparenting**: point a batch of instances at a new parent material
//! - **Host seam**: every engine service is consumed through [`host::EditorHost`]
//!
//! ## Quick Start
//!
//! ```rust
//! use micrep::prelude::*;
//!
//! let mut host = MemoryHost::new();
//! let template = host.add_material("/MICRep", "M_MICRepBase", Vec::new());
//! let mut sink = RecordingSink::default();
//!
//! let converter = BatchConverter::new(ConverterConfig::default());
//! let report = converter.convert_per_asset(&mut host, &mut sink, &[]).unwrap();
//! assert!(report.created_instances.is_empty());
//! # let _ = template;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod convert;
pub mod foundation;
pub mod host;
pub mod menu;
pub mod plugin;
pub mod reparent;

/// Common imports for tool users
pub mod prelude {
    pub use crate::{
        assets::{AssetClass, AssetData, AssetId, MaterialProperty, MaterialSlots, ResolvedAsset},
        config::{Config, ConfigError, ConverterConfig, NamingConfig, ParameterNames},
        convert::{BatchConverter, ConversionReport, ConvertError, DedupKey, TexturePair},
        host::{
            AssetLibrary, CollisionPolicy, EditorHost, HostError, MemoryHost, NullSink,
            RecordingSink, SelectionSink,
        },
        menu::{build_asset_menu, AssetMenu, AssetPickerConfig, MenuAction, MenuEntry},
        plugin::{ActionOutcome, ContentBrowserExtenders, MicRepModule, MicRepPlugin, PluginError},
        reparent::{ParentRebinder, RebindReport, ReparentError},
    };
}
