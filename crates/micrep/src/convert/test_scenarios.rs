//! End-to-end conversion scenarios against the in-memory host

use super::*;
use crate::assets::{AssetClass, AssetData, AssetId, MaterialProperty};
use crate::config::ConverterConfig;
use crate::host::{EditorHost, MemoryHost, RecordingSink, TextureSample};

struct Scene {
    host: MemoryHost,
    template: AssetId,
    color_x: AssetId,
    normal_y: AssetId,
}

fn scene() -> Scene {
    let mut host = MemoryHost::new();
    let default_color = host.add_texture("/MICRep", "T_Default_D");
    let default_normal = host.add_texture("/MICRep", "T_Default_N");
    let template = host.add_material(
        "/MICRep",
        "M_MICRepBase",
        vec![
            TextureSample::parameter(MaterialProperty::BaseColor, default_color, "BaseColor"),
            TextureSample::parameter(MaterialProperty::Normal, default_normal, "Normal"),
        ],
    );
    let color_x = host.add_texture("/Game/Textures", "T_X_D");
    let normal_y = host.add_texture("/Game/Textures", "T_Y_N");
    Scene {
        host,
        template,
        color_x,
        normal_y,
    }
}

fn material(
    host: &mut MemoryHost,
    name: &str,
    color: Option<AssetId>,
    normal: Option<AssetId>,
) -> AssetId {
    let mut samples = Vec::new();
    if let Some(color) = color {
        samples.push(TextureSample::new(MaterialProperty::BaseColor, color));
    }
    if let Some(normal) = normal {
        samples.push(TextureSample::new(MaterialProperty::Normal, normal));
    }
    host.add_material("/Game/Materials", name, samples)
}

fn rows(host: &MemoryHost, ids: &[AssetId]) -> Vec<AssetData> {
    ids.iter().filter_map(|&id| host.asset_data(id)).collect()
}

fn slots(host: &MemoryHost, mesh: AssetId) -> Vec<Option<AssetId>> {
    host.material_slots(mesh).map(|s| s.slot_materials()).unwrap_or_default()
}

#[test]
fn test_zero_slot_meshes_are_untouched() {
    let Scene { mut host, .. } = scene();
    let empty_static = host.add_static_mesh("/Game/Props", "SM_Empty", []);
    let empty_skeletal = host.add_skeletal_mesh("/Game/Chars", "SK_Empty", []);
    let before = host.asset_count();
    let mut sink = RecordingSink::default();

    let selection = rows(&host, &[empty_static, empty_skeletal]);
    let report = BatchConverter::default()
        .convert_per_asset(&mut host, &mut sink, &selection)
        .unwrap();

    assert!(report.is_empty());
    assert!(report.created_instances.is_empty());
    assert_eq!(host.asset_count(), before);
    assert!(!host.is_dirty(empty_static));
    assert!(!host.is_dirty(empty_skeletal));
    assert!(sink.batches.is_empty());
}

#[test]
fn test_untextured_source_gets_switch_only() {
    let Scene { mut host, .. } = scene();
    let plain = material(&mut host, "M_Plain", None, None);
    let mesh = host.add_static_mesh("/Game/Props", "SM_Plain", [Some(plain)]);

    let selection = rows(&host, &[mesh]);
    let report = BatchConverter::default()
        .convert_per_asset(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    let instance = host.instance(report.created_instances[0]).unwrap();
    assert!(instance.texture_parameters.is_empty());
    assert_eq!(instance.static_switch("UseNormal"), Some(false));
    assert!(instance.static_parameters.switch("UseNormal").unwrap().overridden);
}

#[test]
fn test_normal_texture_suppresses_switch() {
    let Scene {
        mut host, normal_y, ..
    } = scene();
    let bumpy = material(&mut host, "M_Bumpy", None, Some(normal_y));
    let mesh = host.add_static_mesh("/Game/Props", "SM_Bumpy", [Some(bumpy)]);

    let selection = rows(&host, &[mesh]);
    let report = BatchConverter::default()
        .convert_per_asset(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    let instance = host.instance(report.created_instances[0]).unwrap();
    assert_eq!(instance.static_switch("UseNormal"), None);
    assert!(instance.static_parameters.is_empty());
    assert_eq!(instance.texture_parameters.get("Normal"), Some(&normal_y));
    assert!(!instance.texture_parameters.contains_key("BaseColor"));
}

#[test]
fn test_per_asset_color_only_mesh() {
    let Scene {
        mut host,
        template,
        color_x,
        ..
    } = scene();
    let painted = material(&mut host, "M_Painted", Some(color_x), None);
    let mesh_c = host.add_static_mesh("/Game/Props", "SM_MeshC", [Some(painted)]);
    let mut sink = RecordingSink::default();

    let selection = rows(&host, &[mesh_c]);
    let report = BatchConverter::default()
        .convert_per_asset(&mut host, &mut sink, &selection)
        .unwrap();

    assert_eq!(report.created_instances.len(), 1);
    assert_eq!(report.template_duplicates.len(), 1);
    let created = report.created_instances[0];
    let duplicate = report.template_duplicates[0];

    assert_eq!(
        host.asset_object_path(duplicate).as_deref(),
        Some("/Game/Props/M_MeshC_Base.M_MeshC_Base")
    );
    assert_ne!(duplicate, template);
    assert_eq!(
        host.asset_object_path(created).as_deref(),
        Some("/Game/Props/MI_MeshC_Painted.MI_MeshC_Painted")
    );

    let instance = host.instance(created).unwrap();
    assert_eq!(instance.parent, Some(duplicate));
    assert_eq!(instance.texture_parameters.get("BaseColor"), Some(&color_x));
    assert_eq!(instance.static_switch("UseNormal"), Some(false));

    assert_eq!(slots(&host, mesh_c), vec![Some(created)]);
    assert!(host.is_dirty(mesh_c));
    assert_eq!(host.edit_change_count(mesh_c), 1);
    assert_eq!(report.modified_assets.as_slice(), &[mesh_c]);
    assert_eq!(sink.last(), Some(&[created][..]));
}

#[test]
fn test_unify_shares_one_instance_across_meshes() {
    let Scene {
        mut host,
        color_x,
        normal_y,
        ..
    } = scene();
    let first = material(&mut host, "M_First", Some(color_x), Some(normal_y));
    let second = material(&mut host, "M_Second", Some(color_x), Some(normal_y));
    let third = material(&mut host, "M_Third", Some(color_x), Some(normal_y));
    let mesh_a = host.add_static_mesh("/Game/Props", "SM_MeshA", [Some(first), Some(second)]);
    let mesh_b = host.add_static_mesh("/Game/Other", "SM_MeshB", [Some(third)]);
    let mut sink = RecordingSink::default();

    let selection = rows(&host, &[mesh_a, mesh_b]);
    let report = BatchConverter::default()
        .convert_unified(&mut host, &mut sink, &selection)
        .unwrap();

    assert_eq!(report.created_instances.len(), 1);
    assert_eq!(report.template_duplicates.len(), 1);
    assert_eq!(report.reused_slots, 2);
    let shared = report.created_instances[0];
    assert_eq!(slots(&host, mesh_a), vec![Some(shared), Some(shared)]);
    assert_eq!(slots(&host, mesh_b), vec![Some(shared)]);

    // First mesh in the selection names the shared base material
    assert_eq!(
        host.asset_object_path(report.template_duplicates[0]).as_deref(),
        Some("/Game/Props/M_MeshA_Base.M_MeshA_Base")
    );
    assert_eq!(host.asset_name(shared).as_deref(), Some("MI_MeshA_First"));
    assert!(host.is_dirty(mesh_a));
    assert!(host.is_dirty(mesh_b));
    assert_eq!(sink.last(), Some(&[shared][..]));
}

#[test]
fn test_unify_distinct_keys_get_distinct_instances() {
    let Scene {
        mut host,
        color_x,
        normal_y,
        ..
    } = scene();
    let both = material(&mut host, "M_Both", Some(color_x), Some(normal_y));
    let color = material(&mut host, "M_Color", Some(color_x), None);
    let normal = material(&mut host, "M_Normal", None, Some(normal_y));
    let bare = material(&mut host, "M_Bare", None, None);
    let bare_again = material(&mut host, "M_BareAgain", None, None);

    let mesh = host.add_skeletal_mesh(
        "/Game/Chars",
        "SK_Hero",
        [Some(both), Some(color), Some(normal), Some(bare)],
    );
    let other = host.add_static_mesh("/Game/Props", "SM_Prop", [Some(bare_again), Some(color)]);

    let selection = rows(&host, &[mesh, other]);
    let report = BatchConverter::default()
        .convert_unified(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    assert_eq!(report.created_instances.len(), 4);
    assert_eq!(report.reused_slots, 2);

    let hero = slots(&host, mesh);
    let prop = slots(&host, other);
    for (i, a) in hero.iter().enumerate() {
        for b in &hero[i + 1..] {
            assert_ne!(a, b);
        }
    }
    // Absent textures match absent textures
    assert_eq!(prop[0], hero[3]);
    assert_eq!(prop[1], hero[1]);
}

#[test]
fn test_unify_empty_slot_shares_untextured_instance() {
    let Scene { mut host, .. } = scene();
    let bare = material(&mut host, "M_Bare", None, None);
    let mesh = host.add_static_mesh("/Game/Props", "SM_Gap", [Some(bare), None]);

    let selection = rows(&host, &[mesh]);
    let report = BatchConverter::default()
        .convert_unified(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    assert_eq!(report.created_instances.len(), 1);
    assert_eq!(report.failed_slots, 0);
    let shared = Some(report.created_instances[0]);
    assert_eq!(slots(&host, mesh), vec![shared, shared]);
}

#[test]
fn test_per_asset_empty_slot_is_left_alone() {
    let Scene {
        mut host, color_x, ..
    } = scene();
    let painted = material(&mut host, "M_Painted", Some(color_x), None);
    let mesh = host.add_static_mesh("/Game/Props", "SM_Gap", [None, Some(painted)]);

    let selection = rows(&host, &[mesh]);
    let report = BatchConverter::default()
        .convert_per_asset(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    assert_eq!(report.failed_slots, 1);
    assert_eq!(report.created_instances.len(), 1);
    assert_eq!(slots(&host, mesh), vec![None, Some(report.created_instances[0])]);
    assert!(host.is_dirty(mesh));
}

#[test]
fn test_conversion_is_not_idempotent() {
    let Scene {
        mut host, color_x, ..
    } = scene();
    let painted = material(&mut host, "M_Painted", Some(color_x), None);
    let mesh = host.add_static_mesh("/Game/Props", "SM_Box", [Some(painted)]);
    let selection = rows(&host, &[mesh]);
    let converter = BatchConverter::default();

    let first = converter
        .convert_per_asset(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();
    let second = converter
        .convert_per_asset(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    assert_eq!(first.created_instances.len(), 1);
    assert_eq!(second.created_instances.len(), 1);
    assert_ne!(first.created_instances, second.created_instances);
    assert_ne!(first.template_duplicates, second.template_duplicates);

    // Second run reads the first run's instance through its parameter overrides
    let regenerated = host.instance(second.created_instances[0]).unwrap();
    assert_eq!(regenerated.texture_parameters.get("BaseColor"), Some(&color_x));
    assert_eq!(slots(&host, mesh), vec![Some(second.created_instances[0])]);
}

#[test]
fn test_failed_duplication_skips_only_that_asset() {
    let Scene {
        mut host, color_x, ..
    } = scene();
    let painted = material(&mut host, "M_Painted", Some(color_x), None);
    let locked = host.add_static_mesh("/Engine/Props", "SM_Locked", [Some(painted)]);
    let open = host.add_static_mesh("/Game/Props", "SM_Open", [Some(painted)]);
    host.set_read_only("/Engine/Props");

    let selection = rows(&host, &[locked, open]);
    let report = BatchConverter::default()
        .convert_per_asset(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    assert_eq!(slots(&host, locked), vec![Some(painted)]);
    assert!(!host.is_dirty(locked));
    assert_eq!(report.skipped_assets, rows(&host, &[locked]));
    assert_eq!(report.modified_assets.as_slice(), &[open]);
    assert_eq!(report.created_instances.len(), 1);
}

#[test]
fn test_unify_uses_first_successful_duplicate() {
    let Scene {
        mut host, color_x, ..
    } = scene();
    let painted = material(&mut host, "M_Painted", Some(color_x), None);
    let locked = host.add_static_mesh("/Engine/Props", "SM_Locked", [Some(painted)]);
    let open = host.add_static_mesh("/Game/Props", "SM_Open", [Some(painted)]);
    host.set_read_only("/Engine/Props");

    let selection = rows(&host, &[locked, open]);
    let report = BatchConverter::default()
        .convert_unified(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    assert_eq!(
        host.asset_name(report.template_duplicates[0]).as_deref(),
        Some("M_Open_Base")
    );
    // Instances for the locked mesh land next to it and fail there
    assert_eq!(report.failed_slots, 1);
    assert_eq!(slots(&host, locked), vec![Some(painted)]);
    assert_eq!(
        host.asset_name(report.created_instances[0]).as_deref(),
        Some("MI_Open_Painted")
    );
    assert_eq!(slots(&host, open), vec![Some(report.created_instances[0])]);
}

#[test]
fn test_unify_without_any_duplicate_is_fatal() {
    let Scene {
        mut host, color_x, ..
    } = scene();
    let painted = material(&mut host, "M_Painted", Some(color_x), None);
    let a = host.add_static_mesh("/Engine/Props", "SM_A", [Some(painted)]);
    let b = host.add_static_mesh("/Engine/Props", "SM_B", [Some(painted)]);
    host.set_read_only("/Engine/Props");
    let before = host.asset_count();
    let mut sink = RecordingSink::default();

    let selection = rows(&host, &[a, b]);
    let result = BatchConverter::default().convert_unified(&mut host, &mut sink, &selection);

    assert!(matches!(result, Err(ConvertError::NoTemplateDuplicate)));
    assert_eq!(host.asset_count(), before);
    assert!(sink.batches.is_empty());
}

#[test]
fn test_unify_names_base_after_leading_zero_slot_mesh() {
    let Scene {
        mut host, color_x, ..
    } = scene();
    let painted = material(&mut host, "M_Painted", Some(color_x), None);
    let empty = host.add_static_mesh("/Game/A", "SM_Empty", []);
    let boxed = host.add_static_mesh("/Game/B", "SM_Box", [Some(painted)]);

    let selection = rows(&host, &[empty, boxed]);
    let report = BatchConverter::default()
        .convert_unified(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    let base = report.template_duplicates[0];
    assert_eq!(
        host.asset_object_path(base).as_deref(),
        Some("/Game/A/M_Empty_Base.M_Empty_Base")
    );
    // The empty mesh supplies the base but has nothing to rewrite
    assert!(!host.is_dirty(empty));
    assert_eq!(report.modified_assets.as_slice(), &[boxed]);
    let instance = report.created_instances[0];
    assert_eq!(host.asset_name(instance).as_deref(), Some("MI_Empty_Painted"));
    assert_eq!(host.asset_package_path(instance).as_deref(), Some("/Game/B"));
    assert_eq!(host.instance(instance).unwrap().parent, Some(base));
}

#[test]
fn test_unify_duplicates_next_to_zero_slot_mesh() {
    let Scene {
        mut host, color_x, ..
    } = scene();
    let painted = material(&mut host, "M_Painted", Some(color_x), None);
    let empty = host.add_static_mesh("/Game/A", "SM_Empty", []);
    let locked = host.add_static_mesh("/Engine/Props", "SM_Locked", [Some(painted)]);
    host.set_read_only("/Engine/Props");

    let selection = rows(&host, &[empty, locked]);
    let report = BatchConverter::default()
        .convert_unified(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    assert_eq!(report.template_duplicates.len(), 1);
    assert_eq!(
        host.asset_name(report.template_duplicates[0]).as_deref(),
        Some("M_Empty_Base")
    );
    assert_eq!(report.failed_slots, 1);
    assert!(report.created_instances.is_empty());
    assert_eq!(slots(&host, locked), vec![Some(painted)]);
}

#[test]
fn test_per_asset_skips_zero_slot_mesh_before_duplication() {
    let Scene {
        mut host, color_x, ..
    } = scene();
    let painted = material(&mut host, "M_Painted", Some(color_x), None);
    let empty = host.add_static_mesh("/Game/A", "SM_Empty", []);
    let boxed = host.add_static_mesh("/Game/B", "SM_Box", [Some(painted)]);

    let selection = rows(&host, &[empty, boxed]);
    let report = BatchConverter::default()
        .convert_per_asset(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    assert_eq!(report.template_duplicates.len(), 1);
    assert_eq!(
        host.asset_name(report.template_duplicates[0]).as_deref(),
        Some("M_Box_Base")
    );
    assert!(host.id_of("/Game/A/M_Empty_Base.M_Empty_Base").is_none());
    assert!(report.skipped_assets.is_empty());
}

#[test]
fn test_non_meshes_and_unloadable_rows_are_skipped() {
    let Scene {
        mut host, color_x, ..
    } = scene();
    let painted = material(&mut host, "M_Painted", Some(color_x), None);
    let mesh = host.add_static_mesh("/Game/Props", "SM_Box", [Some(painted)]);
    let lost = host.add_unloadable("/Game/Props/SM_Lost.SM_Lost", AssetClass::StaticMesh);

    let mut selection = rows(&host, &[color_x, painted, mesh]);
    selection.push(lost.clone());
    let report = BatchConverter::default()
        .convert_per_asset(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    assert_eq!(report.modified_assets.as_slice(), &[mesh]);
    assert_eq!(report.skipped_assets.len(), 3);
    assert!(report.skipped_assets.contains(&lost));
    assert_eq!(host.material_slots(painted).map(|s| s.slot_count()), None);
}

#[test]
fn test_skeletal_and_static_meshes_share_the_same_path() {
    let Scene {
        mut host,
        color_x,
        normal_y,
        ..
    } = scene();
    let skin = material(&mut host, "M_Skin", Some(color_x), Some(normal_y));
    let hero = host.add_skeletal_mesh("/Game/Chars", "SK_Hero", [Some(skin), Some(skin)]);

    let selection = rows(&host, &[hero]);
    let report = BatchConverter::default()
        .convert_per_asset(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    // Prefix stripping only targets static mesh names
    assert_eq!(
        host.asset_name(report.template_duplicates[0]).as_deref(),
        Some("M_SK_Hero_Base")
    );
    assert_eq!(report.created_instances.len(), 2);
    assert_eq!(host.asset_name(report.created_instances[1]).as_deref(), Some("MI_SK_Hero_Skin_1"));
    assert_eq!(
        slots(&host, hero),
        report.created_instances.iter().copied().map(Some).collect::<Vec<_>>()
    );
}

#[test]
fn test_instances_inherit_textures_through_parent_chain() {
    let Scene {
        mut host,
        color_x,
        normal_y,
        ..
    } = scene();
    let root = host.add_material(
        "/Game/Materials",
        "M_Master",
        vec![
            TextureSample::parameter(MaterialProperty::BaseColor, normal_y, "Albedo"),
            TextureSample::new(MaterialProperty::Normal, normal_y),
        ],
    );
    let child = host.add_material_instance(
        "/Game/Materials",
        "MI_Brick",
        Some(root),
        [("Albedo".to_string(), color_x)],
    );
    let mesh = host.add_static_mesh("/Game/Props", "SM_Wall", [Some(child)]);

    let selection = rows(&host, &[mesh]);
    let report = BatchConverter::new(ConverterConfig::default())
        .convert_per_asset(&mut host, &mut RecordingSink::default(), &selection)
        .unwrap();

    let instance = host.instance(report.created_instances[0]).unwrap();
    assert_eq!(instance.texture_parameters.get("BaseColor"), Some(&color_x));
    assert_eq!(instance.texture_parameters.get("Normal"), Some(&normal_y));
    assert_eq!(
        host.asset_name(report.created_instances[0]).as_deref(),
        Some("MI_Wall_MI_Brick")
    );
}

#[test]
fn test_demo_library_unify() {
    let source = include_str!("../../../../demos/library.ron");
    let library = crate::host::AssetLibrary::from_ron(source).unwrap();
    let mut host = MemoryHost::from_library(&library).unwrap();
    let crate_mesh = host.id_of("/Game/Props/SM_Crate.SM_Crate").unwrap();
    let barrel = host.id_of("/Game/Props/SM_Barrel.SM_Barrel").unwrap();
    let mut sink = RecordingSink::default();

    let selection = rows(&host, &[crate_mesh, barrel]);
    let report = BatchConverter::default()
        .convert_unified(&mut host, &mut sink, &selection)
        .unwrap();

    assert_eq!(report.created_instances.len(), 2);
    assert_eq!(report.reused_slots, 2);
    assert_eq!(report.failed_slots, 1);

    let crate_slots = slots(&host, crate_mesh);
    let barrel_slots = slots(&host, barrel);
    assert_eq!(barrel_slots[0], crate_slots[0]);
    assert_eq!(barrel_slots[1], crate_slots[1]);
    assert_eq!(barrel_slots[2], None);
    assert_eq!(
        crate_slots.iter().map(|s| s.and_then(|id| host.asset_name(id))).collect::<Vec<_>>(),
        vec![Some("MI_Crate_Wood".to_string()), Some("MI_Crate_Metal".to_string())]
    );
}
