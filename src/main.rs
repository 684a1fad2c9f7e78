//! spot_launch CLI

use clap::{Parser, Subcommand};
use spot_launch::{assemble, ament::AmentIndex, declared_arguments};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    process,
};

#[derive(Parser)]
#[command(name = "spot_launch")]
#[command(about = "Launch description assembler for the Spot driver stack", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Assemble the launch description and write it as JSON
    Assemble {
        /// Launch arguments (key:=value)
        #[arg(value_parser = parse_launch_arg)]
        args: Vec<(String, String)>,

        /// Output file path (default: record.json)
        #[arg(short, long, default_value = "record.json")]
        output: PathBuf,
    },

    /// List the declared launch arguments
    Arguments,
}

fn parse_launch_arg(s: &str) -> Result<(String, String), String> {
    let parts: Vec<&str> = s.split(":=").collect();
    if parts.len() != 2 {
        return Err(format!("Invalid launch argument format: {}", s));
    }
    Ok((parts[0].to_string(), parts[1].to_string()))
}

/// The driver consumes the config file at runtime; a bad path or bad YAML
/// here only warns, it never fails the assembly.
fn check_config_file(path: &str) {
    let path = Path::new(path);
    if !path.is_file() {
        log::warn!("Config file does not exist: {}", path.display());
        return;
    }
    match std::fs::read_to_string(path) {
        Ok(content) => {
            if let Err(e) = serde_yaml::from_str::<serde_yaml::Value>(&content) {
                log::warn!("Config file {} is not valid YAML: {}", path.display(), e);
            }
        }
        Err(e) => log::warn!("Config file {} is unreadable: {}", path.display(), e),
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Assemble { args, output } => {
            if let Some((_, config_file)) = args.iter().find(|(name, _)| name == "config_file") {
                check_config_file(config_file);
            }
            let overrides: HashMap<String, String> = args.into_iter().collect();
            assemble_and_write(overrides, &output)
        }
        Commands::Arguments => {
            for argument in declared_arguments() {
                let default = match &argument.default {
                    Some(value) => format!("default: '{}'", value),
                    None => "required".to_string(),
                };
                println!("{} ({}): {}", argument.name, default, argument.description);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn assemble_and_write(
    overrides: HashMap<String, String>,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = AmentIndex::from_env();
    let description = assemble(&index, overrides)?;

    let json = description.to_json()?;
    std::fs::write(output, json)?;

    log::info!("Wrote launch description: {}", output.display());
    log::info!(
        "  {} arguments, {} includes, {} nodes",
        description.arguments().len(),
        description.includes().len(),
        description.nodes().len()
    );

    Ok(())
}
