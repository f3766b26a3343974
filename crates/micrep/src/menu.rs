//! Content browser context menu
//!
//! Describes which entries the asset selection menu offers and how the
//! reparent picker is configured. Rendering is up to the editor; this module
//! only decides what to show for a selection.

use crate::assets::{AssetClass, AssetData};

/// Menu section the entries are inserted after
pub const EXTENSION_HOOK: &str = "GetAssetActions";

/// One entry of the asset context menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Convert each selected mesh against its own base material
    ReplaceMaterials,
    /// Convert the selected meshes against one shared base material
    ReplaceMaterialsUnify,
    /// Submenu hosting a picker for the new parent material
    ReparentSubmenu(AssetPickerConfig),
}

impl MenuEntry {
    /// Display label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ReplaceMaterials => "ReplaceMaterials",
            Self::ReplaceMaterialsUnify => "ReplaceMaterials(Unify)",
            Self::ReparentSubmenu(_) => "Reparent MaterialInstance",
        }
    }

    /// Hover text
    pub const fn tooltip(&self) -> &'static str {
        match self {
            Self::ReplaceMaterials => "Replace all Materials to MaterialInstance",
            Self::ReplaceMaterialsUnify => {
                "Replace all Materials to MaterialInstance. (Derived from unified material)"
            }
            Self::ReparentSubmenu(_) => "Reparent MaterialInstance",
        }
    }

    /// Action run when a button entry is clicked
    ///
    /// The reparent submenu has no direct action; it runs once a parent is
    /// picked, see [`AssetPickerConfig::pick`].
    pub fn action(&self) -> Option<MenuAction> {
        match self {
            Self::ReplaceMaterials => Some(MenuAction::ReplaceMaterials),
            Self::ReplaceMaterialsUnify => Some(MenuAction::ReplaceMaterialsUnify),
            Self::ReparentSubmenu(_) => None,
        }
    }
}

/// Entries offered for one selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetMenu {
    /// Menu section the entries are inserted after
    pub hook: &'static str,
    /// Entries in display order
    pub entries: Vec<MenuEntry>,
    /// Selection the entries act on
    pub selection: Vec<AssetData>,
}

impl AssetMenu {
    /// Find an entry by label
    pub fn entry(&self, label: &str) -> Option<&MenuEntry> {
        self.entries.iter().find(|entry| entry.label() == label)
    }

    /// Whether an entry with the given label is offered
    pub fn has_entry(&self, label: &str) -> bool {
        self.entry(label).is_some()
    }
}

/// Build the context menu extension for a selection
///
/// Classes are read from the registry rows, so nothing is loaded. Returns
/// `None` when the selection holds neither meshes nor material instances.
pub fn build_asset_menu(selection: &[AssetData]) -> Option<AssetMenu> {
    let mesh_count = selection.iter().filter(|asset| asset.class.is_mesh()).count();
    let instance_count = selection
        .iter()
        .filter(|asset| asset.class == AssetClass::MaterialInstance)
        .count();

    if mesh_count == 0 && instance_count == 0 {
        return None;
    }

    let mut entries = Vec::new();
    if mesh_count > 0 {
        entries.push(MenuEntry::ReplaceMaterials);
        if mesh_count >= 2 {
            entries.push(MenuEntry::ReplaceMaterialsUnify);
        }
    }
    if instance_count > 0 {
        entries.push(MenuEntry::ReparentSubmenu(AssetPickerConfig::for_reparent()));
    }

    log::trace!(
        "Asset menu for {mesh_count} mesh(es), {instance_count} instance(s): {} entr(ies)",
        entries.len()
    );
    Some(AssetMenu {
        hook: EXTENSION_HOOK,
        entries,
        selection: selection.to_vec(),
    })
}

/// How many assets a picker allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Exactly one asset
    #[default]
    Single,
    /// Any number of assets
    Multi,
}

/// Initial layout of a picker's asset view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetViewType {
    /// Compact rows
    #[default]
    List,
    /// Thumbnail grid
    Tile,
    /// Sortable columns
    Column,
}

/// Asset picker settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPickerConfig {
    /// Selection mode
    pub selection_mode: SelectionMode,
    /// Initial view layout
    pub initial_view: AssetViewType,
    /// Classes the picker lists
    pub class_filter: Vec<AssetClass>,
    /// Whether subclasses of the filter classes are listed too
    pub recursive_classes: bool,
    /// Focus the search box when the picker opens
    pub focus_search_box: bool,
}

impl AssetPickerConfig {
    /// Picker used to choose a new parent material
    ///
    /// Lists every material interface, so both materials and material
    /// instances can be chosen.
    pub fn for_reparent() -> Self {
        Self {
            selection_mode: SelectionMode::Single,
            initial_view: AssetViewType::List,
            class_filter: vec![AssetClass::Material, AssetClass::MaterialInstance],
            recursive_classes: true,
            focus_search_box: true,
        }
    }

    /// Whether the picker lists an asset
    pub fn accepts(&self, asset: &AssetData) -> bool {
        self.class_filter.contains(&asset.class)
    }

    /// Turn a picked asset into the reparent action
    ///
    /// `None` when the picker would not have listed the asset.
    pub fn pick(&self, asset: &AssetData) -> Option<MenuAction> {
        self.accepts(asset).then(|| MenuAction::Reparent {
            new_parent: asset.clone(),
        })
    }
}

/// Work requested from the context menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Per-asset conversion
    ReplaceMaterials,
    /// Unified conversion
    ReplaceMaterialsUnify,
    /// Reparent the selected instances
    Reparent {
        /// Picked parent material
        new_parent: AssetData,
    },
}
