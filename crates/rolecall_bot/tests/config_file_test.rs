// Tests for loading bot configuration from disk.

use rolecall_bot::BotConfig;
use rolecall_core::{MisconfigurationPolicy, RoleId};
use std::io::Write;

#[test]
fn test_load_config_file() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        file,
        r#"
[[monitors]]
guild_id = "111"
channel_id = "222"
message_id = "333"

[[monitors.roles]]
role = "444"
emoji = "👍"

[[monitors.roles]]
role = "555"
emoji = "👎"
"#
    )?;

    let config = BotConfig::from_file(file.path())?;
    let monitors = config.validate()?;

    assert_eq!(monitors.len(), 1);
    let monitor = &monitors[0];
    assert_eq!(monitor.message_id().get(), 333);
    assert_eq!(*monitor.policy(), MisconfigurationPolicy::FailLoud);
    let roles: Vec<RoleId> = monitor.pairs().iter().map(|pair| pair.role).collect();
    assert_eq!(roles, vec![RoleId::new(444), RoleId::new(555)]);
    assert!(config.handlers().default_handlers);
    assert!(!config.handlers().exclusive);
    Ok(())
}

#[test]
fn test_missing_file_is_config_error() {
    let err = BotConfig::from_file("does/not/exist/rolecall.toml").expect_err("missing file");
    assert!(err.to_string().contains("Failed to read configuration"));
}

#[test]
fn test_invalid_monitor_reported() -> anyhow::Result<()> {
    let config = BotConfig::from_toml_str(
        r#"
        [[monitors]]
        guild_id = "guild"
        channel_id = "222"
        message_id = "333"
        "#,
    )?;

    let err = config.validate().expect_err("non-numeric guild id");
    assert!(err.message.contains("guild_id"));
    Ok(())
}
