mod config;
mod session_script;

use anyhow::{Context, Result};
use clap::Parser;
use config::{EngineConfig, DEFAULT_CONFIG_PATH};
use craftbench_assets::{
    catalog_from_file, default_catalog, default_recipe_book, recipe_book_from_file,
};
use craftbench_engine::{
    read_save, restore_inventory, save_inventory, write_save, Inventory, Session,
};
use session_script::SessionScript;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless inventory and crafting session driver", long_about = None)]
struct Cli {
    /// Engine configuration file (TOML)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Session script to replay (JSON)
    #[arg(long)]
    script: PathBuf,

    /// Inventory save to start from
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the final inventory to this path
    #[arg(long)]
    save: Option<PathBuf>,

    /// Override the configured inventory size
    #[arg(long)]
    inventory_slots: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The config supplies the default log filter, so read it before
    // installing the subscriber and report problems afterwards.
    let loaded = EngineConfig::read(&cli.config);
    let filter = loaded
        .as_ref()
        .map(|config| config.log_filter.clone())
        .unwrap_or_else(|_| "warn".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    info!("Starting craftbench v{}", env!("CARGO_PKG_VERSION"));

    let mut config = loaded.unwrap_or_else(|err| {
        warn!("{err:#}. Using defaults");
        EngineConfig::default()
    });
    if let Some(slots) = cli.inventory_slots {
        config.inventory_slots = slots.max(1);
    }

    let catalog = match &config.items_path {
        Some(path) => catalog_from_file(path)
            .with_context(|| format!("Failed to load items from {}", path.display()))?,
        None => default_catalog().context("Failed to load bundled items")?,
    };
    let recipes = match &config.recipes_path {
        Some(path) => recipe_book_from_file(path, &catalog)
            .with_context(|| format!("Failed to load recipes from {}", path.display()))?,
        None => default_recipe_book(&catalog).context("Failed to load bundled recipes")?,
    };
    info!(items = catalog.len(), recipes = recipes.len(), "data loaded");

    let inventory = match &cli.load {
        Some(path) => {
            let saved = read_save(path)
                .with_context(|| format!("Failed to read save {}", path.display()))?;
            let (inventory, report) = restore_inventory(&saved, &catalog, config.inventory_slots);
            if report.dropped() > 0 {
                warn!(
                    dropped = report.dropped(),
                    restored = report.restored,
                    "save contained invalid entries"
                );
            }
            inventory
        }
        None => Inventory::with_size(config.inventory_slots),
    };

    let script = SessionScript::from_path(&cli.script)
        .with_context(|| format!("Failed to load script {}", cli.script.display()))?;

    let mut session = Session::new(catalog, recipes, inventory);
    let summary = script.run(&mut session)?;
    let lost_on_exit = session.close_crafting();

    if let Some(path) = &cli.save {
        write_save(path, &save_inventory(session.inventory()))
            .with_context(|| format!("Failed to write save {}", path.display()))?;
    }

    info!(
        steps = summary.steps,
        refused = summary.refused,
        crafted = summary.crafted,
        lost = summary.lost + lost_on_exit,
        "session finished"
    );
    for (item_id, quantity) in session.item_totals() {
        let name = session
            .catalog()
            .definition(item_id)
            .map_or("?", |def| def.name.as_str());
        info!(item = name, quantity, "inventory total");
    }
    Ok(())
}
