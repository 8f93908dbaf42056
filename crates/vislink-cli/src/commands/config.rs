//! Scope configuration commands.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use vislink_config::{ScopeConfig, default_config_path, ensure_user_config_dir};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show {
        /// Config file (defaults to the user config)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Write the default configuration to disk
    Init {
        /// Destination file (defaults to the user config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the default config file location
    Path,
}

pub fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show { config } => show(config),
        ConfigCommand::Init { output, force } => init(output, force),
        ConfigCommand::Path => {
            println!("{}", default_config_path().display());
            Ok(())
        }
    }
}

fn show(path: Option<PathBuf>) -> anyhow::Result<()> {
    let (config, path) = super::load_config(path.as_deref())?;
    let source = if path.exists() { "file" } else { "defaults" };

    println!("# {} ({source})", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}

fn init(output: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match output {
        Some(path) => path,
        None => {
            ensure_user_config_dir()?;
            default_config_path()
        }
    };

    if path.exists() && !force {
        anyhow::bail!(
            "Config '{}' already exists. Use --force to overwrite.",
            path.display()
        );
    }

    ScopeConfig::default().save(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
