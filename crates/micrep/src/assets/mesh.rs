//! Mesh-like assets and the slot capability they share

use super::AssetId;

/// Ordered list of material references on a mesh-like asset
///
/// Slot indices are stable; only the material reference changes.
pub trait MaterialSlots {
    /// Number of slots
    fn slot_count(&self) -> usize;

    /// Material currently bound to a slot
    ///
    /// `None` for an empty slot or an out-of-range index.
    fn slot_material(&self, index: usize) -> Option<AssetId>;

    /// Rebind a slot
    ///
    /// Returns false if the index is out of range.
    fn set_slot_material(&mut self, index: usize, material: Option<AssetId>) -> bool;

    /// Snapshot of every slot's material, in slot order
    fn slot_materials(&self) -> Vec<Option<AssetId>> {
        (0..self.slot_count()).map(|index| self.slot_material(index)).collect()
    }
}

/// Material entry on a static mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMaterial {
    /// Bound material
    pub material_interface: Option<AssetId>,
    /// Slot name authored in the source file
    pub material_slot_name: String,
}

/// Static geometry with per-section materials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticMesh {
    /// Material slots
    pub static_materials: Vec<StaticMaterial>,
}

impl StaticMesh {
    /// Create a static mesh from slot materials, naming slots by index
    pub fn with_materials(materials: impl IntoIterator<Item = Option<AssetId>>) -> Self {
        Self {
            static_materials: materials
                .into_iter()
                .enumerate()
                .map(|(index, material_interface)| StaticMaterial {
                    material_interface,
                    material_slot_name: format!("Slot{index}"),
                })
                .collect(),
        }
    }
}

impl MaterialSlots for StaticMesh {
    fn slot_count(&self) -> usize {
        self.static_materials.len()
    }

    fn slot_material(&self, index: usize) -> Option<AssetId> {
        self.static_materials.get(index)?.material_interface
    }

    fn set_slot_material(&mut self, index: usize, material: Option<AssetId>) -> bool {
        match self.static_materials.get_mut(index) {
            Some(slot) => {
                slot.material_interface = material;
                true
            }
            None => false,
        }
    }
}

/// Material entry on a skeletal mesh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletalMaterial {
    /// Bound material
    pub material_interface: Option<AssetId>,
    /// Slot name authored in the source file
    pub material_slot_name: String,
}

/// Skinned geometry with per-section materials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkeletalMesh {
    /// Material slots
    pub materials: Vec<SkeletalMaterial>,
}

impl SkeletalMesh {
    /// Create a skeletal mesh from slot materials, naming slots by index
    pub fn with_materials(materials: impl IntoIterator<Item = Option<AssetId>>) -> Self {
        Self {
            materials: materials
                .into_iter()
                .enumerate()
                .map(|(index, material_interface)| SkeletalMaterial {
                    material_interface,
                    material_slot_name: format!("Slot{index}"),
                })
                .collect(),
        }
    }
}

impl MaterialSlots for SkeletalMesh {
    fn slot_count(&self) -> usize {
        self.materials.len()
    }

    fn slot_material(&self, index: usize) -> Option<AssetId> {
        self.materials.get(index)?.material_interface
    }

    fn set_slot_material(&mut self, index: usize, material: Option<AssetId>) -> bool {
        match self.materials.get_mut(index) {
            Some(slot) => {
                slot.material_interface = material;
                true
            }
            None => false,
        }
    }
}
