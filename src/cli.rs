// ABOUTME: Command-line interface definitions using clap
// ABOUTME: Defines subcommands, global flags, and config precedence

use crate::api::DEFAULT_API_BASE;
use crate::config::ExportConfig;
use crate::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "diary-sync")]
#[command(about = "Export Notion diary entries to Markdown files", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Notion integration token
    #[arg(long, global = true, env = "NOTION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Database holding the diary pages
    #[arg(long, global = true, env = "NOTION_DATABASE_ID")]
    pub database_id: Option<String>,

    /// API base URL
    #[arg(long, global = true, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Output directory
    #[arg(long, global = true, default_value = "diary")]
    pub out_dir: PathBuf,

    /// YAML file with property bindings and output naming
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Title property name
    #[arg(long, global = true)]
    pub title_property: Option<String>,

    /// Date property name
    #[arg(long, global = true)]
    pub date_property: Option<String>,

    /// Only export pages whose title contains this text
    #[arg(long, global = true, conflicts_with = "all")]
    pub filter: Option<String>,

    /// Export every page, ignoring the title filter
    #[arg(long, global = true)]
    pub all: bool,

    /// Disable throttling (not recommended)
    #[arg(long, global = true)]
    pub no_throttle: bool,

    /// Throttle range in ms (min:max)
    #[arg(long, global = true, value_parser = parse_throttle_range)]
    pub throttle_ms: Option<(u64, u64)>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

fn parse_throttle_range(s: &str) -> std::result::Result<(u64, u64), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err("Expected format: min:max".into());
    }

    let min = parts[0].parse().map_err(|_| "Invalid min value")?;
    let max = parts[1].parse().map_err(|_| "Invalid max value")?;

    if min > max {
        return Err("min must be <= max".into());
    }

    Ok((min, max))
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Export all entries and the combined file (default)
    Export,

    /// List the entries an export would write
    List,

    /// Print one page as Markdown
    Show {
        /// Page ID to render
        id: String,
    },
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Export)
    }

    /// Defaults, then the YAML file, then flags.
    pub fn export_config(&self) -> Result<ExportConfig> {
        let mut config = match &self.config {
            Some(path) => ExportConfig::load(path)?,
            None => ExportConfig::default(),
        };

        if let Some(title) = &self.title_property {
            config.title_property = title.clone();
        }
        if let Some(date) = &self.date_property {
            config.date_property = date.clone();
        }
        if self.all {
            config.filter = None;
        } else if let Some(filter) = &self.filter {
            config.filter = Some(filter.clone());
        }

        Ok(config)
    }
}
