//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `fedora_lens_core` linkage.
//! - Start file logging (`FEDORA_LENS_LOG_DIR`, else a temp directory).
//! - Run one create/find/update/delete cycle against an in-memory store.

use fedora_lens_core::db::open_db_in_memory;
use fedora_lens_core::vocab::DC_TITLE;
use fedora_lens_core::{
    default_log_level, init_logging, resolve_log_dir, AttributeMap, Context, ModelDeclaration,
    ModelRegistry, Record, Segment, SqliteResourceStore, StoreConfig,
};
use log::info;
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    println!("fedora_lens_core ping={}", fedora_lens_core::ping());
    println!("fedora_lens_core version={}", fedora_lens_core::core_version());

    let log_dir = resolve_log_dir(|key| std::env::var(key).ok());
    let config = StoreConfig::load(None)?;
    run(&config, &log_dir)
}

fn run(config: &StoreConfig, log_dir: &Path) -> Result<(), Box<dyn Error>> {
    init_logging(default_log_level(), &log_dir.to_string_lossy())?;
    println!("log_dir={}", log_dir.display());

    let conn = open_db_in_memory()?;
    let ctx = Context::new(SqliteResourceStore::new(&conn), config);

    let mut registry = ModelRegistry::new();
    let bridge = registry.register(&ModelDeclaration::new("Probe").attribute(
        "title",
        [
            Segment::predicate(DC_TITLE),
            Segment::Single,
            Segment::LiteralToString,
        ],
    ))?;

    let attributes: AttributeMap = [("title", "probe")].into_iter().collect();
    let mut record = Record::create(&ctx, bridge.clone(), attributes)?;
    let id = record.id().ok_or("created record has no id")?;
    println!("created id={id}");

    record.set_attribute("title", "probe (updated)")?;
    record.save_strict(&ctx)?;

    let found = Record::find(&ctx, bridge, &id)?;
    println!(
        "found title={}",
        found
            .attribute("title")
            .and_then(|value| value.as_str())
            .unwrap_or_default()
    );
    found.delete(&ctx)?;
    println!("deleted id={id}");
    info!("event=cli_probe module=cli status=ok");
    Ok(())
}
