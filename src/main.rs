//! marksync one-shot command line front end.
//!
//! Usage: `marksync [--settings <path>] [--import <tree.json>] [--export json|csv|html]`
//!
//! Imports a bookmark tree (the browser `getTree()` shape) when asked, takes
//! a manual snapshot, prints the popup summary and optionally exports.

use std::error::Error;
use std::fs;

use chrono::Utc;
use log::warn;

use marksync::app::App;
use marksync::services::exporter::ExportFormat;
use marksync::services::library_view;
use marksync::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use marksync::types::bookmark::BookmarkNode;
use marksync::types::snapshot::SyncReason;

#[derive(Debug, Default)]
struct CliArgs {
    settings: Option<String>,
    import: Option<String>,
    export: Option<ExportFormat>,
}

fn parse_args<I: Iterator<Item = String>>(mut args: I) -> Result<CliArgs, String> {
    let mut parsed = CliArgs::default();
    while let Some(arg) = args.next() {
        let mut value = |name: &str| args.next().ok_or(format!("{} needs a value", name));
        match arg.as_str() {
            "--settings" => parsed.settings = Some(value("--settings")?),
            "--import" => parsed.import = Some(value("--import")?),
            "--export" => parsed.export = Some(value("--export")?.parse()?),
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(parsed)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args(std::env::args().skip(1))?;
    let mut engine = SettingsEngine::new(args.settings);
    engine.load()?;
    let mut app = App::new(engine)?;

    if let Some(path) = &args.import {
        let text = fs::read_to_string(path)?;
        let roots: Vec<BookmarkNode> = serde_json::from_str(&text)?;
        let written = app.bookmark_store().import_tree(&roots)?;
        println!("Imported {} nodes from {}", written, path);
    }

    if let Err(e) = app.startup() {
        warn!("install check failed: {}", e);
    }
    let snapshot = app.sync(SyncReason::Manual)?;

    let summary =
        library_view::popup_summary(Some(&snapshot), app.stats(), Utc::now().timestamp_millis());
    println!("Total bookmarks: {}", summary.total_bookmarks);
    println!("Duplicates:      {}", summary.duplicate_groups);
    println!("Unique domains:  {}", summary.domains);
    println!("Total clicks:    {}", summary.total_clicks);
    for domain in snapshot.top_domains.iter().take(5) {
        println!("  {:<30} {}", domain.domain, domain.count);
    }

    if let Some(format) = args.export {
        let download_id = app.export(format)?;
        println!("Exported {} to {}", format, download_id);
    }
    Ok(())
}
