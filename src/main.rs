//! Scene Composer - command-line entry point
//!
//! Loads a scene collection into an in-memory host, reports what was
//! built, and optionally decodes a VPID pair or saves the collection.

use std::cell::RefCell;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use scene_composer::composition::Scene;
use scene_composer::config::{Preferences, SceneCollection};
use scene_composer::host::MemoryHost;
use scene_composer::properties::PropertyBag;
use scene_composer::telemetry::{init_logging, LogConfig};
use scene_composer::vpid::VpidData;

const USAGE: &str =
    "usage: scene-composer [collection.xml] [--set <item> <json>]... [--vpid <A> <B>] [--save <out.xml>]";

/// Parsed command line
#[derive(Debug, Default, PartialEq)]
struct Args {
    collection: Option<PathBuf>,
    /// Property edits as (item name, JSON object)
    set: Vec<(String, serde_json::Value)>,
    vpid: Option<(u32, u32)>,
    save: Option<PathBuf>,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, String> {
        let mut parsed = Args::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--vpid" => {
                    let a = args.next().ok_or("--vpid needs two words")?;
                    let b = args.next().ok_or("--vpid needs two words")?;
                    parsed.vpid = Some((parse_word(&a)?, parse_word(&b)?));
                }
                "--set" => {
                    let item = args.next().ok_or("--set needs an item name and a JSON object")?;
                    let json = args.next().ok_or("--set needs an item name and a JSON object")?;
                    parsed.set.push((item, parse_properties(&json)?));
                }
                "--save" => {
                    let path = args.next().ok_or("--save needs a path")?;
                    parsed.save = Some(PathBuf::from(path));
                }
                "-h" | "--help" => return Err(USAGE.to_string()),
                flag if flag.starts_with('-') => return Err(format!("unknown option {}", flag)),
                _ if parsed.collection.is_none() => parsed.collection = Some(PathBuf::from(arg)),
                _ => return Err(format!("unexpected argument {}", arg)),
            }
        }
        Ok(parsed)
    }
}

/// Parse a VPID word given as `0x`-prefixed hex or decimal
fn parse_word(text: &str) -> Result<u32, String> {
    let result = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => text.parse(),
    };
    result.map_err(|e| format!("invalid VPID word '{}': {}", text, e))
}

/// Parse a `--set` value; only JSON objects are accepted
fn parse_properties(text: &str) -> Result<serde_json::Value, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("invalid properties '{}': {}", text, e))?;
    if !value.is_object() {
        return Err(format!("properties must be a JSON object, got '{}'", text));
    }
    Ok(value)
}

/// Apply `--set` edits to the first item with a matching name, then push
/// the changes to the host. Returns the number of edits applied.
fn apply_edits(scenes: &mut [Scene<MemoryHost>], edits: &[(String, serde_json::Value)]) -> usize {
    let mut applied = 0;
    for (name, json) in edits {
        let bag = PropertyBag::from_json(json);
        let Some(item) = scenes.iter_mut().find_map(|scene| scene.item_by_name_mut(name)) else {
            tracing::warn!("No item named '{}'", name);
            continue;
        };
        match item.apply_properties(&bag) {
            Ok(()) => applied += 1,
            Err(e) => tracing::warn!(item = %name, "Edit rejected: {}", e),
        }
    }

    for scene in scenes.iter_mut() {
        match scene.apply_all_updates() {
            Ok(0) => {}
            Ok(pushed) => tracing::info!(scene = scene.name(), pushed, "Pushed item updates"),
            Err(e) => tracing::warn!(scene = scene.name(), "Failed to push item updates: {}", e),
        }
    }
    applied
}

fn load_collection(args: &Args, preferences: &mut Preferences) -> SceneCollection {
    let path = args.collection.clone().or_else(|| preferences.last_opened());
    let Some(path) = path else {
        tracing::info!("No collection given, starting with the default collection");
        return SceneCollection::default();
    };

    match SceneCollection::load_from_file(&path) {
        Ok(collection) => {
            tracing::info!("Loaded collection '{}' from {}", collection.name, path.display());
            preferences.set_last_opened(&path);
            collection
        }
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", path.display(), e);
            SceneCollection::default()
        }
    }
}

fn report_vpid(a: u32, b: u32) {
    let data = VpidData::new(a, b);
    tracing::info!("VPID {}", data);
    for (link, info) in [("A", data.info_a()), ("B", data.info_b())] {
        tracing::info!(
            link,
            standard = %info.standard,
            sampling = %info.sampling,
            colorimetry = ?info.colorimetry,
            transfer = ?info.transfer,
            picture_rate = ?info.picture_rate.frames_per_second(),
            bit_depth = info.bit_depth.depth(),
            channel = info.channel,
            "Link decoded"
        );
    }
    tracing::info!("Link A is RGB: {}", data.is_rgb());
}

fn main() -> ExitCode {
    let args = match Args::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            return ExitCode::from(2);
        }
    };

    let mut preferences = Preferences::load();

    let log_config = LogConfig::from_preferences(&preferences);
    // Keep the guard alive for the program duration
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("Scene Composer v{}", env!("CARGO_PKG_VERSION"));

    let collection = load_collection(&args, &mut preferences);

    let host = Rc::new(RefCell::new(MemoryHost::new()));
    let mut scenes = match collection.restore(&host) {
        Ok(scenes) => scenes,
        Err(e) => {
            tracing::error!("Failed to restore collection: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !args.set.is_empty() {
        let applied = apply_edits(&mut scenes, &args.set);
        tracing::info!("Applied {} of {} property edits", applied, args.set.len());
    }

    for scene in &scenes {
        tracing::info!(scene = scene.name(), items = scene.len(), "Scene ready");
        for item in scene.items() {
            tracing::info!(
                scene = scene.name(),
                item = item.name(),
                kind = item.kind(),
                hidden = item.is_hidden(),
                locked = item.is_locked(),
                properties = %item.properties().to_json(),
                "  {}",
                item.item_type()
            );
        }
    }

    if let Some((a, b)) = args.vpid {
        report_vpid(a, b);
    }

    if let Some(path) = &args.save {
        let snapshot = SceneCollection::capture(collection.name.clone(), &scenes);
        if let Err(e) = snapshot.save_to_file(path) {
            tracing::error!("Failed to save {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        tracing::info!("Saved collection to {}", path.display());
    }

    ExitCode::SUCCESS
}
