//! Bot configuration: which messages to monitor and how to handle their events.

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use rolecall_core::{RoleCallConfig, ValidatedConfig};
use rolecall_error::{ConfigError, RoleCallResult};
use rolecall_monitor::DefaultHandlers;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, instrument};

/// Prefix for environment overrides, e.g. `ROLECALL__HANDLERS__EXCLUSIVE=true`.
const ENV_PREFIX: &str = "ROLECALL";

/// Top-level bot configuration.
///
/// # Example
///
/// ```toml
/// [handlers]
/// default_handlers = true
/// exclusive = false
///
/// [[monitors]]
/// guild_id = "111"
/// channel_id = "222"
/// message_id = "333"
///
/// [[monitors.roles]]
/// role = "444"
/// emoji = "👍"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct BotConfig {
    /// One entry per tracked message.
    #[serde(default)]
    monitors: Vec<RoleCallConfig>,
    /// Event handling for every monitor.
    #[serde(default)]
    handlers: HandlerSettings,
}

/// How the bot reacts to role-reaction events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerSettings {
    /// Grant and revoke roles automatically.
    #[serde(default = "default_true")]
    pub default_handlers: bool,
    /// Allow only one role per message.
    #[serde(default)]
    pub exclusive: bool,
}

fn default_true() -> bool {
    true
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            default_handlers: true,
            exclusive: false,
        }
    }
}

impl HandlerSettings {
    /// Options for the default handler loop, or `None` when it is disabled.
    pub fn options(&self) -> Option<DefaultHandlers> {
        self.default_handlers.then_some(DefaultHandlers {
            exclusive: self.exclusive,
        })
    }
}

impl BotConfig {
    /// Load configuration from a TOML file, applying `ROLECALL__*` environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> RoleCallResult<Self> {
        debug!("Loading bot configuration");
        let builder = Config::builder()
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
            .add_source(environment());
        Self::build(builder, &path.as_ref().display().to_string())
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid configuration.
    pub fn from_toml_str(toml: &str) -> RoleCallResult<Self> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        Self::build(builder, "inline configuration")
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        origin: &str,
    ) -> RoleCallResult<Self> {
        let config = builder
            .build()
            .map_err(|e| {
                ConfigError::new(format!("Failed to read configuration from {}: {}", origin, e))
            })?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        Ok(config)
    }

    /// Validate every monitor configuration.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - No monitors are configured
    /// - Any monitor configuration is invalid
    /// - Two monitors track the same message
    pub fn validate(&self) -> Result<Vec<ValidatedConfig>, ConfigError> {
        if self.monitors.is_empty() {
            return Err(ConfigError::new("No [[monitors]] configured"));
        }

        let mut seen = HashSet::new();
        let mut validated = Vec::with_capacity(self.monitors.len());
        for monitor in &self.monitors {
            let config = monitor.validate()?;
            if !seen.insert(*config.message_id()) {
                return Err(ConfigError::new(format!(
                    "Message {} is monitored more than once; merge its roles into one entry",
                    config.message_id()
                )));
            }
            validated.push(config);
        }
        Ok(validated)
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_MONITORS: &str = r#"
        [handlers]
        exclusive = true

        [[monitors]]
        guild_id = "1"
        channel_id = "2"
        message_id = "3"
        on_misconfiguration = "log_and_continue"

        [[monitors.roles]]
        role = "10"
        emoji = "👍"

        [[monitors.roles]]
        role = "11"
        emoji = "<:blob:99>"

        [[monitors]]
        guild_id = "1"
        channel_id = "2"
        message_id = "4"

        [monitors.retry]
        base_delay_secs = 3
    "#;

    #[test]
    fn test_parse_monitors_and_handlers() {
        let config = BotConfig::from_toml_str(TWO_MONITORS).expect("valid config");

        assert_eq!(config.monitors().len(), 2);
        assert_eq!(config.monitors()[0].roles.len(), 2);
        assert!(config.handlers().default_handlers);
        assert_eq!(
            config.handlers().options(),
            Some(DefaultHandlers { exclusive: true })
        );

        let validated = config.validate().expect("valid monitors");
        assert_eq!(validated[1].retry().base_delay().as_secs(), 3);
        assert_eq!(validated[0].pairs()[1].emoji.to_string(), "blob:99");
    }

    #[test]
    fn test_handlers_can_be_disabled() {
        let config = BotConfig::from_toml_str(
            r#"
            [handlers]
            default_handlers = false
            "#,
        )
        .expect("valid config");
        assert!(config.handlers().options().is_none());
    }

    #[test]
    fn test_empty_config_rejected() {
        let config = BotConfig::from_toml_str("").expect("empty config parses");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_message_rejected() {
        let config = BotConfig::from_toml_str(
            r#"
            [[monitors]]
            guild_id = "1"
            channel_id = "2"
            message_id = "3"

            [[monitors]]
            guild_id = "1"
            channel_id = "2"
            message_id = "3"
            "#,
        )
        .expect("valid config");
        let err = config.validate().expect_err("duplicate message");
        assert!(err.message.contains("more than once"));
    }
}
