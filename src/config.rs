use clap::Parser;
use serde::Deserialize;
use serenity::model::id::GuildId;
use std::path::PathBuf;
use thiserror::Error;

use crate::logging::LogLevel;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("No bot token configured, set the TOKEN environment variable")]
    MissingToken,
}

#[derive(Debug, Parser)]
#[command(name = "rosterbot", about = "Keeps role roster embeds in sync with a Discord server")]
pub struct Cli {
    /// Optional TOML file with bot settings
    #[arg(long, default_value = "rosterbot.toml")]
    pub config: PathBuf,

    /// Where tracked rosters are persisted
    #[arg(long)]
    pub rosters: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    token: Option<String>,
    rosters_file: PathBuf,
    #[serde(default)]
    log_level: LogLevel,
    command_guild_id: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub rosters_file: PathBuf,
    pub log_level: LogLevel,
    /// Register slash commands on this guild only instead of globally.
    pub command_guild_id: Option<GuildId>,
}

impl Config {
    const DEFAULT_ROSTERS_FILE: &'static str = "rosters.json";

    /// Defaults, then the TOML file if present, then environment variables,
    /// then command line overrides.
    pub fn new(cli: &Cli) -> Result<Self, ConfigError> {
        let settings = ::config::Config::builder()
            .set_default("rosters_file", Self::DEFAULT_ROSTERS_FILE)?
            .add_source(::config::File::from(cli.config.as_path()).required(false))
            .add_source(::config::Environment::default().try_parsing(true))
            .set_override_option(
                "rosters_file",
                cli.rosters.as_ref().map(|path| path.to_string_lossy().into_owned()),
            )?
            .build()?;

        Self::from_raw(settings.try_deserialize()?)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let token = raw
            .token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty())
            .ok_or(ConfigError::MissingToken)?;

        Ok(Self {
            token,
            rosters_file: raw.rosters_file,
            log_level: raw.log_level,
            command_guild_id: raw.command_guild_id.filter(|id| *id != 0).map(GuildId::new),
        })
    }
}
