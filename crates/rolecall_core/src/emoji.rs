//! Emoji identity used to match reactions against configured roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Mention syntax Discord clients paste for custom emoji: `<:name:id>` or `<a:name:id>`.
static MENTION: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^<a?:(?P<name>\w+):(?P<id>\d+)>$").expect("static regex")
});

/// Normalized `name:id` form.
static NAME_ID: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^(?P<name>\w+):(?P<id>\d+)$").expect("static regex")
});

/// Key identifying one reaction option on a tracked message.
///
/// Unicode emoji are keyed by their grapheme. Custom guild emoji are keyed by
/// name and id and display in the normalized `name:id` form.
///
/// # Examples
///
/// ```
/// use rolecall_core::EmojiKey;
///
/// let thumbs: EmojiKey = "👍".parse().unwrap();
/// assert_eq!(thumbs, EmojiKey::Unicode("👍".to_string()));
///
/// let custom: EmojiKey = "<a:party:112233>".parse().unwrap();
/// assert_eq!(custom.to_string(), "party:112233");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EmojiKey {
    /// A unicode emoji grapheme.
    Unicode(String),
    /// A custom guild emoji.
    Custom {
        /// Emoji name as shown in the guild.
        name: String,
        /// Emoji snowflake.
        id: u64,
    },
}

impl EmojiKey {
    /// Build a key from the pieces a gateway payload carries.
    ///
    /// A payload with an id is a custom emoji; one without is unicode and must
    /// carry a name. Returns `None` when neither is present.
    pub fn from_parts(name: Option<&str>, id: Option<u64>) -> Option<Self> {
        match (name, id) {
            (name, Some(id)) => Some(Self::Custom {
                name: name.unwrap_or_default().to_string(),
                id,
            }),
            (Some(name), None) if !name.is_empty() => Some(Self::Unicode(name.to_string())),
            _ => None,
        }
    }

    /// Whether this is a custom guild emoji.
    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }
}

impl fmt::Display for EmojiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unicode(grapheme) => write!(f, "{}", grapheme),
            Self::Custom { name, id } => write!(f, "{}:{}", name, id),
        }
    }
}

impl std::str::FromStr for EmojiKey {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.is_empty() {
            return Err("emoji cannot be empty".to_string());
        }

        let captures = MENTION
            .captures(input)
            .or_else(|| NAME_ID.captures(input));
        if let Some(captures) = captures {
            let id = captures["id"]
                .parse::<u64>()
                .map_err(|e| format!("invalid emoji id in '{}': {}", input, e))?;
            if id == 0 {
                return Err(format!("invalid emoji id in '{}'", input));
            }
            return Ok(Self::Custom {
                name: captures["name"].to_string(),
                id,
            });
        }

        if input.starts_with('<') {
            return Err(format!("malformed custom emoji mention '{}'", input));
        }

        Ok(Self::Unicode(input.to_string()))
    }
}
