//! Plugin lifecycle and action dispatch
//!
//! [`MicRepModule`] is what the editor loads: on startup it registers a
//! selection-menu extender with the content browser and on shutdown it
//! releases it again. [`MicRepPlugin`] runs the action picked from the menu.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use slotmap::{new_key_type, SlotMap};
use thiserror::Error;

use crate::assets::{AssetData, AssetId};
use crate::config::ConverterConfig;
use crate::convert::{BatchConverter, ConversionReport, ConvertError};
use crate::host::{EditorHost, SelectionSink};
use crate::menu::{build_asset_menu, AssetMenu, MenuAction};
use crate::reparent::{ParentRebinder, RebindReport, ReparentError};

new_key_type! {
    /// Handle of a registered selection-menu extender
    pub struct ExtenderHandle;
}

/// Callback asked for menu entries whenever the asset context menu opens
pub type SelectionMenuExtender = Box<dyn Fn(&[AssetData]) -> Option<AssetMenu>>;

type SharedExtender = Rc<dyn Fn(&[AssetData]) -> Option<AssetMenu>>;
type ExtenderMap = SlotMap<ExtenderHandle, SharedExtender>;

/// Selection-menu extenders registered with the content browser
///
/// Cloning shares the same registry.
#[derive(Clone, Default)]
pub struct ContentBrowserExtenders {
    extenders: Rc<RefCell<ExtenderMap>>,
}

impl ContentBrowserExtenders {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extender; it stays registered until the guard is dropped
    #[must_use = "dropping the registration removes the extender immediately"]
    pub fn register(&self, extender: SelectionMenuExtender) -> ExtenderRegistration {
        let handle = self.extenders.borrow_mut().insert(Rc::from(extender));
        log::debug!("Registered selection menu extender {handle:?}");
        ExtenderRegistration {
            handle,
            extenders: Rc::downgrade(&self.extenders),
        }
    }

    /// Number of registered extenders
    pub fn len(&self) -> usize {
        self.extenders.borrow().len()
    }

    /// Whether no extender is registered
    pub fn is_empty(&self) -> bool {
        self.extenders.borrow().is_empty()
    }

    /// Collect the menu extensions every extender offers for a selection
    ///
    /// Extenders run against a snapshot of the registry and may register or
    /// drop extenders themselves; such changes apply from the next call.
    pub fn menus_for(&self, selection: &[AssetData]) -> Vec<AssetMenu> {
        let snapshot: Vec<SharedExtender> = self.extenders.borrow().values().cloned().collect();
        snapshot
            .iter()
            .filter_map(|extender| extender(selection))
            .collect()
    }
}

impl fmt::Debug for ContentBrowserExtenders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentBrowserExtenders")
            .field("registered", &self.len())
            .finish()
    }
}

/// Keeps an extender registered; dropping it unregisters
///
/// Holds the registry weakly, so a registry torn down first is not kept
/// alive and the drop is a no-op.
#[derive(Debug)]
pub struct ExtenderRegistration {
    handle: ExtenderHandle,
    extenders: Weak<RefCell<ExtenderMap>>,
}

impl ExtenderRegistration {
    /// Handle of the registered extender
    pub const fn handle(&self) -> ExtenderHandle {
        self.handle
    }
}

impl Drop for ExtenderRegistration {
    fn drop(&mut self) {
        if let Some(extenders) = self.extenders.upgrade() {
            if extenders.borrow_mut().remove(self.handle).is_some() {
                log::debug!("Unregistered selection menu extender {:?}", self.handle);
            }
        }
    }
}

/// Result of a menu action
#[derive(Debug, Clone)]
pub enum ActionOutcome {
    /// A conversion ran
    Converted(ConversionReport),
    /// A reparent ran
    Reparented(RebindReport),
}

impl ActionOutcome {
    /// Assets the action created or updated
    pub fn touched_assets(&self) -> &[AssetId] {
        match self {
            Self::Converted(report) => &report.created_instances,
            Self::Reparented(report) => &report.updated_instances,
        }
    }
}

/// Errors from running a menu action
#[derive(Error, Debug)]
pub enum PluginError {
    /// Conversion aborted
    #[error("Conversion failed: {0}")]
    Convert(#[from] ConvertError),

    /// Reparent aborted
    #[error("Reparent failed: {0}")]
    Reparent(#[from] ReparentError),
}

/// Runs context menu actions
#[derive(Debug, Clone, Default)]
pub struct MicRepPlugin {
    converter: BatchConverter,
    rebinder: ParentRebinder,
}

impl MicRepPlugin {
    /// Create a plugin with an unchecked configuration
    pub fn new(config: ConverterConfig) -> Self {
        let rebinder = ParentRebinder::from_config(&config);
        Self {
            converter: BatchConverter::new(config),
            rebinder,
        }
    }

    /// Create a plugin, rejecting an invalid configuration
    pub fn try_new(config: ConverterConfig) -> Result<Self, PluginError> {
        let rebinder = ParentRebinder::from_config(&config);
        Ok(Self {
            converter: BatchConverter::try_new(config)?,
            rebinder,
        })
    }

    /// Converter used by the conversion actions
    pub const fn converter(&self) -> &BatchConverter {
        &self.converter
    }

    /// Run `action` against `selection`
    pub fn execute<H, S>(
        &self,
        host: &mut H,
        sink: &mut S,
        action: &MenuAction,
        selection: &[AssetData],
    ) -> Result<ActionOutcome, PluginError>
    where
        H: EditorHost + ?Sized,
        S: SelectionSink + ?Sized,
    {
        log::info!("Running {action:?} on {} selected asset(s)", selection.len());
        let outcome = match action {
            MenuAction::ReplaceMaterials => {
                let report = self.converter.convert_per_asset(host, sink, selection)?;
                ActionOutcome::Converted(report)
            }
            MenuAction::ReplaceMaterialsUnify => {
                let report = self.converter.convert_unified(host, sink, selection)?;
                ActionOutcome::Converted(report)
            }
            MenuAction::Reparent { new_parent } => {
                let report = self.rebinder.reparent(host, sink, new_parent, selection)?;
                ActionOutcome::Reparented(report)
            }
        };
        Ok(outcome)
    }
}

/// Editor module entry point
#[derive(Debug)]
pub struct MicRepModule {
    plugin: MicRepPlugin,
    registration: Option<ExtenderRegistration>,
}

impl MicRepModule {
    /// Start the module
    ///
    /// Registers the selection-menu extender unless the editor runs as a
    /// headless commandlet, where no content browser exists.
    pub fn startup(
        extenders: &ContentBrowserExtenders,
        config: ConverterConfig,
        is_commandlet: bool,
    ) -> Self {
        let plugin = MicRepPlugin::new(config);
        if is_commandlet {
            log::info!("Running as commandlet, content browser menu not extended");
            return Self {
                plugin,
                registration: None,
            };
        }

        let registration = extenders.register(Box::new(build_asset_menu));
        log::info!("Content browser menu extended");
        Self {
            plugin,
            registration: Some(registration),
        }
    }

    /// Release the menu extender
    pub fn shutdown(&mut self) {
        if self.registration.take().is_some() {
            log::info!("Content browser menu extension removed");
        }
    }

    /// Whether the menu extender is currently registered
    pub const fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    /// Action runner
    pub const fn plugin(&self) -> &MicRepPlugin {
        &self.plugin
    }
}
