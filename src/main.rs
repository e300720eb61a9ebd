//! prefs - command line access to preferences files

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use prefs::{parse_literal, Prefs, PrefsDirs, Source, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands, DirArgs};

fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for command output
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    run(cli.command)
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Show { file } => {
            let prefs = load(&file)?;
            println!("{prefs}");
        }
        Commands::Get { file, path } => {
            let prefs = load(&file)?;
            let Some(value) = prefs.get(&path) else {
                bail!("'{}' is not set in {}", path, file.display());
            };
            match value {
                Value::Doc(doc) => println!("{}", doc.to_json_string()?),
                other => println!("{other}"),
            }
        }
        Commands::Set { file, path, value } => {
            let mut prefs = load(&file)?;
            prefs
                .set(&path, parse_literal(&value))
                .with_context(|| format!("Failed to set '{path}'"))?;
            prefs.save()?;
        }
        Commands::Migrate { legacy, output } => {
            let prefs = load(&legacy)?;
            match prefs.source() {
                Source::Legacy => {}
                Source::Missing => bail!("{} does not exist", legacy.display()),
                _ => tracing::warn!("{} is already JSON; copying as-is", legacy.display()),
            }
            prefs.save_to(&output)?;
            println!("Wrote {}", output.display());
        }
        Commands::Dir(args) => println!("{}", resolve_dir(args)?.display()),
    }
    Ok(())
}

fn load(file: &std::path::Path) -> Result<Prefs> {
    Prefs::load(file).with_context(|| format!("Failed to load preferences: {}", file.display()))
}

fn resolve_dir(args: DirArgs) -> Result<std::path::PathBuf> {
    let dirs = PrefsDirs {
        local_template: args.local_template,
        network_template: args.network_template,
    };
    Ok(dirs.resolve(args.core.as_deref(), args.network)?)
}
