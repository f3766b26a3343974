use anyhow::{anyhow, bail, Context, Result};
use clap::{Arg, ArgAction, Command};
use std::path::PathBuf;

use micrep::foundation::logging;
use micrep::host::NullSink;
use micrep::menu::{MenuEntry, EXTENSION_HOOK};
use micrep::prelude::*;

const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug)]
struct RunConfig {
    library: PathBuf,
    config: Option<PathBuf>,
    template: Option<String>,
    action: String,
    selection: Vec<String>,
    parent: Option<String>,
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let matches = Command::new("micrep")
        .about("Replays MICRep content browser actions against an asset library")
        .arg(
            Arg::new("library")
                .short('l')
                .long("library")
                .value_name("FILE")
                .help("Asset library description (RON)")
                .required(true),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Converter configuration (TOML or RON)"),
        )
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .value_name("OBJECT_PATH")
                .help("Override the template material object path"),
        )
        .arg(
            Arg::new("action")
                .short('a')
                .long("action")
                .value_name("ACTION")
                .help("Menu action to run")
                .value_parser(["convert", "unify", "reparent"])
                .default_value("convert"),
        )
        .arg(
            Arg::new("select")
                .short('s')
                .long("select")
                .value_name("OBJECT_PATH")
                .help("Selected asset; repeat for more. Defaults to the whole library")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("parent")
                .short('p')
                .long("parent")
                .value_name("OBJECT_PATH")
                .help("New parent material for the reparent action"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the modified library here"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("Default log filter when RUST_LOG is unset")
                .default_value(DEFAULT_LOG_LEVEL),
        )
        .get_matches();

    let log_level = matches
        .get_one::<String>("log-level")
        .map_or(DEFAULT_LOG_LEVEL, String::as_str);
    logging::init_with_default_level(log_level);

    let run = RunConfig {
        library: matches
            .get_one::<String>("library")
            .map(PathBuf::from)
            .context("Missing --library")?,
        config: matches.get_one::<String>("config").map(PathBuf::from),
        template: matches.get_one::<String>("template").cloned(),
        action: matches
            .get_one::<String>("action")
            .cloned()
            .unwrap_or_else(|| "convert".to_string()),
        selection: matches
            .get_many::<String>("select")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        parent: matches.get_one::<String>("parent").cloned(),
        output: matches.get_one::<String>("output").map(PathBuf::from),
    };

    run_action(&run)
}

fn run_action(run: &RunConfig) -> Result<()> {
    let mut config = match &run.config {
        Some(path) => ConverterConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ConverterConfig::default(),
    };
    if let Some(template) = &run.template {
        config.template_path.clone_from(template);
    }
    config.validate().context("Invalid converter configuration")?;

    let library = AssetLibrary::load(&run.library)
        .with_context(|| format!("Failed to load asset library {}", run.library.display()))?;
    let mut host = MemoryHost::from_library(&library).context("Failed to build asset library")?;
    log::info!("Loaded {} asset(s) from {}", host.asset_count(), run.library.display());

    let selection = select_assets(&host, &run.selection)?;

    let extenders = ContentBrowserExtenders::new();
    let mut module = MicRepModule::startup(&extenders, config, false);
    log::info!("Template: {}", module.plugin().converter().config().template_path);
    let menu = extenders
        .menus_for(&selection)
        .into_iter()
        .find(|menu| menu.hook == EXTENSION_HOOK)
        .ok_or_else(|| anyhow!("No MICRep menu for this selection"))?;

    let action = match run.action.as_str() {
        "convert" | "unify" => {
            let label = if run.action == "unify" {
                MenuEntry::ReplaceMaterialsUnify.label()
            } else {
                MenuEntry::ReplaceMaterials.label()
            };
            menu.entry(label)
                .and_then(MenuEntry::action)
                .ok_or_else(|| anyhow!("'{label}' is not offered for this selection"))?
        }
        "reparent" => {
            let picker = menu
                .entries
                .iter()
                .find_map(|entry| match entry {
                    MenuEntry::ReparentSubmenu(picker) => Some(picker),
                    _ => None,
                })
                .context("Reparent is not offered for this selection")?;
            let parent_path = run.parent.as_deref().context("--parent is required for reparent")?;
            let parent = host
                .find_asset_by_object_path(parent_path)
                .with_context(|| format!("Parent {parent_path} not found"))?;
            picker
                .pick(&parent)
                .with_context(|| format!("{parent_path} is not a material"))?
        }
        other => bail!("Unknown action {other}"),
    };

    let outcome = module
        .plugin()
        .execute(&mut host, &mut NullSink, &action, &menu.selection)
        .with_context(|| format!("{action:?} failed"))?;
    module.shutdown();

    print_outcome(&host, &outcome);
    let saved = host.save_dirty_packages();
    println!("Saved {} package(s)", saved.len());

    if let Some(output) = &run.output {
        host.to_library()
            .save(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Wrote {}", output.display());
    }
    Ok(())
}

fn select_assets(host: &MemoryHost, paths: &[String]) -> Result<Vec<AssetData>> {
    if paths.is_empty() {
        return Ok(host.records().filter_map(|(id, _)| host.asset_data(id)).collect());
    }
    paths
        .iter()
        .map(|path| {
            host.find_asset_by_object_path(path)
                .with_context(|| format!("Selected asset {path} not found"))
        })
        .collect()
}

fn print_outcome(host: &MemoryHost, outcome: &ActionOutcome) {
    let describe = |id: AssetId| host.asset_object_path(id).unwrap_or_else(|| format!("{id:?}"));
    match outcome {
        ActionOutcome::Converted(report) => {
            println!("Base materials: {}", report.template_duplicates.len());
            for &id in &report.template_duplicates {
                println!("  {}", describe(id));
            }
            println!("Created instances: {}", report.created_instances.len());
            for &id in &report.created_instances {
                println!("  {}", describe(id));
            }
            println!("Modified meshes: {}", report.modified_assets.len());
            println!("Reused slots: {}", report.reused_slots);
            println!("Failed slots: {}", report.failed_slots);
            println!("Skipped assets: {}", report.skipped_assets.len());
        }
        ActionOutcome::Reparented(report) => {
            println!("Reparented instances: {}", report.updated_instances.len());
            for &id in &report.updated_instances {
                println!("  {}", describe(id));
            }
            println!("Skipped assets: {}", report.skipped.len());
        }
    }
}
