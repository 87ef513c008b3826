//! Bonsai - Main entry point
//!
//! Thin command-line layer over the generator and the tree store.

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bonsai::cli::{Cli, Commands};
use bonsai::{EngineConfig, GenerateOptions, Hemisphere, TreeGenerator, TreeStore};

/// Initialize the logger; RUST_LOG overrides the default level
fn init_logger(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// Resolve the engine config from the file, then apply command-line overrides
fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::discover()?,
    };
    if let Some(dir) = &cli.store_dir {
        config.store_dir = dir.clone();
    }
    if cli.debug {
        config.debug = true;
    }
    if cli.southern {
        config.hemisphere = Hemisphere::Southern;
    }
    Ok(config)
}

/// Main application entry point
fn main() {
    let cli = Cli::parse_args();
    init_logger(cli.debug);
    debug!("CLI arguments parsed");

    if let Err(e) = run(cli) {
        eprintln!("✗ {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let generator = TreeGenerator::from_config(&config);
    let store = || -> Result<TreeStore> {
        TreeStore::from_config(&config)
            .with_context(|| format!("Failed to open tree store at {:?}", config.store_dir))
    };

    match cli.command {
        Commands::Generate {
            style,
            season,
            age,
            seed,
            strict,
            save,
            force,
        } => {
            let options = GenerateOptions {
                style,
                season,
                age,
                seed,
            };
            if strict {
                generator.resolve(&options).strict()?;
            }
            // refuse before growing so nothing unsaved is printed
            let target = match save {
                Some(config_id) => {
                    let store = store()?;
                    if !force {
                        store
                            .ensure_vacant(&config_id)
                            .context("Refusing to overwrite without --force")?;
                    }
                    Some((store, config_id))
                }
                None => None,
            };

            let tree = generator.generate(&options);
            println!("{}", tree.render());

            if let Some((store, config_id)) = target {
                store.store(&config_id, &tree)?;
                info!("Saved tree for {}", config_id);
            }
        }
        Commands::Show { config_id } => {
            let tree = store()?
                .get(&config_id)?
                .with_context(|| format!("No tree stored for '{}'", config_id))?;
            println!("{}", tree.render());
        }
        Commands::Age { config_id } => {
            let store = store()?;
            let mut tree = store
                .get(&config_id)?
                .with_context(|| format!("No tree stored for '{}'", config_id))?;
            generator.age(&mut tree);
            store.store(&config_id, &tree)?;
            println!("✓ {} is now {}", config_id, tree.style());
        }
        Commands::Regrow { config_id } => {
            let store = store()?;
            let mut tree = store
                .get(&config_id)?
                .with_context(|| format!("No tree stored for '{}'", config_id))?;
            generator.regenerate(&mut tree);
            store.store(&config_id, &tree)?;
            println!("{}", tree.render());
        }
        Commands::List => {
            for (key, tree) in store()?.all()? {
                println!("{}  {}", key, tree.summary());
            }
        }
        Commands::Delete { config_id } => {
            if store()?.delete(&config_id)? {
                println!("✓ Deleted tree for {}", config_id);
            } else {
                println!("No tree stored for {}", config_id);
            }
        }
        Commands::Key { config_id } => {
            println!("{}", TreeStore::key_for(&config_id));
        }
    }

    Ok(())
}
