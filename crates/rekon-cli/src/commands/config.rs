//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use rekon_core::models::config::RekonConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "intake.max_files")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => show_config(&path),
        ConfigCommand::Init(init_args) => init_config(init_args, &path),
        ConfigCommand::Get { key } => get_config(&path, &key),
        ConfigCommand::Set { key, value } => set_config(&path, &key, &value),
        ConfigCommand::Path => show_path(&path),
    }
}

/// `<config dir>/rekon/config.json`.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rekon")
        .join("config.json")
}

fn load_or_default(path: &Path) -> anyhow::Result<RekonConfig> {
    if path.exists() {
        Ok(RekonConfig::from_file(path)?)
    } else {
        Ok(RekonConfig::default())
    }
}

fn show_config(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!(
            "{} No config file found, showing defaults.",
            style("ℹ").blue()
        );
    }
    let config = load_or_default(path)?;

    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(args: InitArgs, path: &Path) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| path.to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    RekonConfig::default().save(&output_path)?;

    println!(
        "{} Created configuration file at {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(path: &Path, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(load_or_default(path)?)?;
    let value = lookup(&json, key)?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut json = serde_json::to_value(load_or_default(path)?)?;

    let parsed_value = assign(&mut json, key, value)?;

    let config: RekonConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;

    println!(
        "{} Set {} = {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?
    );

    Ok(())
}

fn show_path(path: &Path) -> anyhow::Result<()> {
    println!("Configuration file: {}", path.display());

    if path.exists() {
        println!("Status: {}", style("exists").green());
    } else {
        println!("Status: {}", style("not created").yellow());
        println!();
        println!("Run 'rekon config init' to create a configuration file.");
    }

    Ok(())
}

/// Follow a dotted key such as `report.styled`.
fn lookup<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.').try_fold(json, |current, part| {
        current
            .get(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })
}

/// Replace the value at an existing dotted key, returning what was stored.
fn assign(json: &mut Value, key: &str, raw: &str) -> anyhow::Result<Value> {
    let slot = key.split('.').try_fold(json, |current, part| {
        current
            .get_mut(part)
            .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))
    })?;

    if slot.is_object() {
        anyhow::bail!("Cannot replace configuration section {}", key);
    }
    let value = parse_value(slot, raw);
    *slot = value.clone();
    Ok(value)
}

/// Read `raw` as JSON, except that a string slot keeps bare input as text.
fn parse_value(current: &Value, raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) if value.is_string() || !current.is_string() => value,
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_dotted_key() {
        let config = serde_json::to_value(RekonConfig::default()).unwrap();

        assert_eq!(lookup(&config, "intake.max_files").unwrap(), &json!(50));
        assert!(lookup(&config, "intake.nope").is_err());
    }

    #[test]
    fn test_assign_existing_key_only() {
        let mut config = serde_json::to_value(RekonConfig::default()).unwrap();

        assert_eq!(assign(&mut config, "report.styled", "false").unwrap(), json!(false));
        assert_eq!(config["report"]["styled"], json!(false));

        assert!(assign(&mut config, "report.colour", "red").is_err());
        assert!(assign(&mut config, "report", "1").is_err());
    }

    #[test]
    fn test_assign_coerces_by_slot_type() {
        let mut config = serde_json::to_value(RekonConfig::default()).unwrap();

        assign(&mut config, "report.output_prefix", "2025").unwrap();
        assign(&mut config, "intake.max_files", "5").unwrap();
        assign(&mut config, "intake.extension", "\"TXT\"").unwrap();

        assert_eq!(config["report"]["output_prefix"], json!("2025"));
        assert_eq!(config["intake"]["max_files"], json!(5));
        assert_eq!(config["intake"]["extension"], json!("TXT"));

        let parsed: RekonConfig = serde_json::from_value(config).unwrap();
        assert_eq!(parsed.report.output_prefix, "2025");
    }
}
