//! RoleCall - reaction roles for Discord.
//!
//! Reads monitor configuration from a TOML file and runs the bot until Ctrl+C.

use clap::Parser;
use rolecall_bot::{BotConfig, RoleCallBot};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the RoleCall bot.
#[derive(Parser, Debug)]
#[command(name = "rolecall")]
#[command(about = "RoleCall - grant Discord roles from message reactions")]
#[command(version)]
struct Args {
    /// Path to the bot configuration file
    #[arg(short, long, default_value = "rolecall.toml")]
    config: PathBuf,

    /// Discord bot token
    #[arg(long, env = "DISCORD_TOKEN", hide_env_values = true)]
    discord_token: Option<String>,

    /// Validate the configuration and exit without connecting
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!(config_file = ?args.config, "Loading configuration");

    let config = BotConfig::from_file(&args.config)?;
    let monitors = config.validate()?;
    info!(
        monitors = monitors.len(),
        default_handlers = config.handlers().default_handlers,
        exclusive = config.handlers().exclusive,
        "Configuration loaded"
    );

    if args.check {
        for monitor in &monitors {
            info!(
                guild_id = %monitor.guild_id(),
                channel_id = %monitor.channel_id(),
                message_id = %monitor.message_id(),
                roles = monitor.pairs().len(),
                "Monitor configuration valid"
            );
        }
        info!("Configuration check complete");
        return Ok(());
    }

    let token = args.discord_token.ok_or("DISCORD_TOKEN not provided")?;
    let mut bot = RoleCallBot::new(&token, monitors, *config.handlers()).await?;
    bot.start().await?;
    Ok(())
}
