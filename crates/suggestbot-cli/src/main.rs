#![deny(unsafe_code)]

//! SuggestBot CLI: offline tools for the tokenizer, configuration and the
//! save file.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use suggestbot_config::AppConfig;
use suggestbot_core::store::Store;
use suggestbot_core::{CommandRegistry, ControlCommand, DEFAULT_PREFIX, ExitMode, Tokenizer};

/// SuggestBot — anonymous suggestions for chat communities.
#[derive(Parser)]
#[command(name = "suggestbot", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "suggestbot.toml")]
    config: PathBuf,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split text into tokens the way the bot reads commands.
    Tokenize {
        /// Text to tokenize.
        text: String,

        /// Guild command prefix to classify with.
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },

    /// Validate and display configuration.
    Config {
        /// Show the resolved configuration.
        #[arg(long)]
        show: bool,
    },

    /// Check a console line the way the running bot reads it.
    Control {
        /// Console line, e.g. "reload".
        line: String,
    },

    /// Summarise the save file.
    State {
        /// Drop suggestions older than one week and write the file back.
        #[arg(long)]
        prune: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.config.exists() {
        Some(AppConfig::load(&cli.config).await?)
    } else {
        None
    };

    let filter = match cli.verbose {
        0 => config
            .as_ref()
            .map_or("info", |c| c.logging.level.as_str())
            .to_string(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    let config = config.unwrap_or_else(|| {
        info!(path = %cli.config.display(), "Config file not found, using defaults");
        AppConfig::default()
    });

    match cli.command {
        Commands::Tokenize { text, prefix } => cmd_tokenize(&text, &prefix),
        Commands::Config { show } => cmd_config(&cli.config, &config, show)?,
        Commands::Control { line } => cmd_control(&line)?,
        Commands::State { prune } => cmd_state(&config, prune).await?,
    }

    Ok(())
}

fn cmd_tokenize(text: &str, prefix: &str) {
    let registry = CommandRegistry::new();
    for token in Tokenizer::new(text, prefix) {
        let resolved = token
            .resolve(&registry)
            .map_or_else(|| "-".to_string(), |value| value.to_string());
        println!(
            "{:<12} {:<20} {:<20} {resolved}",
            token.kind().to_string(),
            format!("{:?}", token.value()),
            format!("{:?}", token.raw_value()),
        );
    }
}

fn cmd_control(line: &str) -> Result<()> {
    let command = ControlCommand::parse(line)
        .with_context(|| format!("unknown console command: {:?}", line.trim()))?;
    println!("{}", describe_control(command));
    Ok(())
}

fn describe_control(command: ControlCommand) -> String {
    let effect = match command {
        ControlCommand::Shutdown => {
            format!("persist and exit with code {}", ExitMode::Shutdown.exit_code())
        }
        ControlCommand::Reload => {
            format!("persist and exit with code {}", ExitMode::Reload.exit_code())
        }
        ControlCommand::Ping => "log pong".to_string(),
        ControlCommand::ResetPresence => "restore the configured presence".to_string(),
    };
    format!("{command}: {effect}")
}

fn cmd_config(config_path: &Path, config: &AppConfig, show: bool) -> Result<()> {
    if show {
        let toml_str = toml::to_string_pretty(config).context("failed to render configuration")?;
        println!("{toml_str}");
    } else {
        println!("Configuration at '{}' is valid.", config_path.display());
    }
    Ok(())
}

async fn cmd_state(config: &AppConfig, prune: bool) -> Result<()> {
    let store = Store::new(config.save_path());
    let mut data = store
        .load()
        .await
        .with_context(|| format!("failed to read {}", store.path().display()))?;

    println!("Save file: {}", store.path().display());
    println!("Guilds: {}", data.guild_data.len());
    for guild in &data.guild_data {
        let channel = guild
            .suggestion_channel_id
            .as_ref()
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        println!(
            "  {}  prefix={}  suggestion_channel={}  admin_roles={}",
            guild.guild_id,
            guild.bot_prefix,
            channel,
            guild.admin_role_ids.len()
        );
    }
    println!("Suggestions: {}", data.suggestions.len());
    debug!(document = %serde_json::to_string(&data)?, "Loaded save file");

    if prune {
        let mut queue: suggestbot_core::SuggestionQueue =
            std::mem::take(&mut data.suggestions).into_iter().collect();
        let removed = queue.expire(now_millis()?);
        data.suggestions = queue.iter().cloned().collect();
        store
            .save(&data)
            .await
            .with_context(|| format!("failed to write {}", store.path().display()))?;
        debug!(remaining = data.suggestions.len(), "Pruned save file");
        println!("Pruned {removed} expired suggestion(s).");
    }
    Ok(())
}

fn now_millis() -> Result<i64> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the Unix epoch")?;
    Ok(i64::try_from(elapsed.as_millis())?)
}
