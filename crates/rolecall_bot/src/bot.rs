//! serenity client setup and monitor bootstrap.

use crate::HandlerSettings;
use async_trait::async_trait;
use rolecall_core::ValidatedConfig;
use rolecall_error::{PlatformError, RoleCallResult};
use rolecall_monitor::discord::{RoleCallHandler, SerenityPlatform};
use rolecall_monitor::{MonitorRegistry, ReactionRoleMonitor};
use serenity::Client;
use serenity::all::{Context, EventHandler, Ready};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, info, instrument, warn};

/// The RoleCall Discord bot.
///
/// # Example
/// ```no_run
/// use rolecall_bot::{BotConfig, RoleCallBot};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = BotConfig::from_file("rolecall.toml")?;
///     let monitors = config.validate()?;
///     let token = std::env::var("DISCORD_TOKEN")?;
///
///     let mut bot = RoleCallBot::new(&token, monitors, *config.handlers()).await?;
///     bot.start().await?;
///     Ok(())
/// }
/// ```
pub struct RoleCallBot {
    client: Client,
    registry: Arc<MonitorRegistry<SerenityPlatform>>,
}

impl RoleCallBot {
    /// Build the serenity client.
    ///
    /// Monitors are set up later, when the gateway session becomes ready.
    ///
    /// # Errors
    ///
    /// Returns an error if the serenity client fails to initialize.
    #[instrument(skip(token, monitors), fields(monitors = monitors.len()))]
    pub async fn new(
        token: &str,
        monitors: Vec<ValidatedConfig>,
        handlers: HandlerSettings,
    ) -> RoleCallResult<Self> {
        info!("Initializing RoleCall bot");

        let registry = Arc::new(MonitorRegistry::new());
        let bootstrap = MonitorBootstrap {
            registry: registry.clone(),
            monitors,
            handlers,
            started: AtomicBool::new(false),
        };

        let intents = RoleCallHandler::intents();
        debug!(?intents, "Building serenity client");

        let client = Client::builder(token, intents)
            .event_handler(bootstrap)
            .raw_event_handler(RoleCallHandler::new(registry.clone()))
            .await
            .map_err(|e| PlatformError::request(format!("Failed to build client: {}", e)))?;

        Ok(Self { client, registry })
    }

    /// Run until the gateway connection ends or Ctrl+C is received.
    ///
    /// # Errors
    ///
    /// Returns an error if the client fails to start or hits a fatal error.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> RoleCallResult<()> {
        let shard_manager = self.client.shard_manager.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutdown requested");
                    shard_manager.shutdown_all().await;
                }
                Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
            }
        });

        info!("Starting RoleCall bot");
        self.client
            .start()
            .await
            .map_err(|e| PlatformError::request(format!("Client error: {}", e)))?;
        Ok(())
    }

    /// Monitors attached so far.
    pub fn registry(&self) -> &Arc<MonitorRegistry<SerenityPlatform>> {
        &self.registry
    }
}

/// Sets up the configured monitors on the first `READY`.
struct MonitorBootstrap {
    registry: Arc<MonitorRegistry<SerenityPlatform>>,
    monitors: Vec<ValidatedConfig>,
    handlers: HandlerSettings,
    started: AtomicBool,
}

#[async_trait]
impl EventHandler for MonitorBootstrap {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, guilds = ready.guilds.len(), "Connected to Discord");

        // READY repeats on every reconnect; monitors survive those.
        if self.started.swap(true, Ordering::AcqRel) {
            debug!("Session resumed, monitors already running");
            return;
        }

        let platform = Arc::new(SerenityPlatform::new(ctx.http.clone()));
        let mut running = 0;
        for config in &self.monitors {
            let message_id = *config.message_id();
            match ReactionRoleMonitor::from_validated(platform.clone(), config.clone()).await {
                Ok(monitor) => {
                    let monitor = Arc::new(monitor);
                    self.registry.attach(monitor.clone()).await;
                    if let Some(options) = self.handlers.options() {
                        monitor.run_default_handlers(options);
                    }
                    running += 1;
                }
                Err(e) => {
                    error!(%message_id, error = %e, "Role call setup failed");
                }
            }
        }

        if running == 0 {
            error!("No role call monitors running");
        } else {
            info!(running, configured = self.monitors.len(), "Role call monitors running");
        }
    }
}
