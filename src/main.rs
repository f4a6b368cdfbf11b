use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config_augment::registry::{ConfigStore, ModuleRegistry};
use config_augment::store::{
    DirConfigStore, NullEntityTypes, StaticCollectionRegistry, StaticModuleRegistry,
};
use config_augment::{ConfigAugmenter, Extension, GlobalOverrides};
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Deep-merging configuration augmentation
///
/// Operates on a directory of extensions (each may ship partial overrides
/// under `config/augment/`) and a directory of active configuration stored
/// as `<name>.yml` files.
#[derive(Parser, Debug)]
#[command(name = "config-augment")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing extensions, one subdirectory per extension
    #[arg(short, long, default_value = "modules")]
    modules_dir: PathBuf,

    /// Directory holding active configuration as <name>.yml files
    #[arg(short, long, default_value = "config")]
    active_dir: PathBuf,

    /// Known override collection names (e.g. language.fr), comma separated
    #[arg(short, long, value_delimiter = ',')]
    collections: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the augmented value of a configuration name as YAML
    Resolve { name: String },

    /// Apply an extension's augmentations to the active configuration
    Apply { extension: String },

    /// List augmentations discovered for an extension, per collection
    List { extension: String },
}

fn setup_logging(log_level: &str) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Treat every subdirectory of `dir` as an extension, in name order.
fn discover_extensions(dir: &Path) -> Result<Vec<Extension>> {
    if !dir.is_dir() {
        bail!("Modules directory {} does not exist", dir.display());
    }

    let mut extensions = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read modules directory {}", dir.display()))?
    {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            extensions.push(Extension::new(name, &path));
        }
    }
    extensions.sort_by(|a, b| a.name.cmp(&b.name));
    info!("Discovered {} extension(s)", extensions.len());
    Ok(extensions)
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level)?;

    let store = DirConfigStore::new(&args.active_dir);
    let modules = StaticModuleRegistry::new(discover_extensions(&args.modules_dir)?);

    let mut collections = StaticCollectionRegistry::new();
    for name in &args.collections {
        collections.add_collection(name, None);
    }

    let entity_types = NullEntityTypes;
    let mut augmenter = ConfigAugmenter::new(
        &store,
        &collections,
        &entity_types,
        &modules,
        GlobalOverrides::default(),
    );

    match args.command {
        Command::Resolve { name } => {
            let current = store.read(&name)?.unwrap_or_default();
            let resolved = augmenter.augment_by_name(&name, current)?;
            print!("{}", serde_yaml::to_string(&resolved)?);
        }
        Command::Apply { extension } => {
            let Some(extension) = modules.module(&extension) else {
                bail!("Unknown extension: {extension}");
            };
            augmenter.apply_extension_augmentations(&extension)?;
        }
        Command::List { extension } => {
            let Some(extension) = modules.module(&extension) else {
                bail!("Unknown extension: {extension}");
            };
            for (collection, names) in augmenter.extension_augmentations(&extension)? {
                let label = if collection.is_empty() {
                    "(default)"
                } else {
                    collection.as_str()
                };
                println!("{label}:");
                for name in names.keys() {
                    println!("  {name}");
                }
            }
        }
    }

    Ok(())
}
