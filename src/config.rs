//! # Settings
//!
//! Immutable option bags for the help command. Each `HelpCommand` owns its own
//! copy; nothing is shared or mutated after construction.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Embed, paginator and search settings with environment loading

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::HelpError;

/// Styling applied to every generated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateEmbed {
    pub color: u32,
    /// Shown on the overview page in listing mode
    pub description: Option<String>,
    /// Label used for commands without an owning module
    pub no_category_name: String,
    pub fields_per_embed: usize,
    pub footer: Option<String>,
}

impl Default for TemplateEmbed {
    fn default() -> Self {
        TemplateEmbed {
            color: 0,
            description: None,
            no_category_name: "No Category".to_string(),
            fields_per_embed: 3,
            footer: None,
        }
    }
}

/// Options handed to the paginator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginatorSettings {
    /// Seconds of inactivity before the components are removed
    pub timeout: u64,
    /// First/last buttons in addition to previous/next
    pub extended_buttons: bool,
    /// Page select menu
    pub use_select: bool,
    /// Only the invoking user may navigate
    pub author_only: bool,
}

impl PaginatorSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for PaginatorSettings {
    fn default() -> Self {
        PaginatorSettings {
            timeout: 60,
            extended_buttons: true,
            use_select: true,
            author_only: false,
        }
    }
}

/// Search and filtering behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedSettings {
    pub max_search_results: usize,
    /// Substrings matched against command and module names
    pub blacklist: Vec<String>,
    /// Offer a `/help` definition for the host bot to register
    pub auto_create: bool,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        AdvancedSettings {
            max_search_results: 15,
            blacklist: Vec::new(),
            auto_create: true,
        }
    }
}

/// Everything a `HelpCommand` is configured with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpSettings {
    /// Refetch the command listing on every call instead of reusing the cache
    pub sync_commands: bool,
    pub template_embed: TemplateEmbed,
    pub paginator: PaginatorSettings,
    pub advanced: AdvancedSettings,
}

impl HelpSettings {
    /// Defaults overridden by `HELP_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let mut settings = HelpSettings::default();

        if let Some(sync) = parse_var("HELP_SYNC_COMMANDS")? {
            settings.sync_commands = sync;
        }
        if let Ok(color) = env::var("HELP_COLOR") {
            settings.template_embed.color = parse_color(&color)?;
        }
        if let Ok(description) = env::var("HELP_DESCRIPTION") {
            settings.template_embed.description = Some(description);
        }
        if let Ok(label) = env::var("HELP_NO_CATEGORY_NAME") {
            settings.template_embed.no_category_name = label;
        }
        if let Some(per_page) = parse_var("HELP_FIELDS_PER_PAGE")? {
            settings.template_embed.fields_per_embed = per_page;
        }
        if let Ok(footer) = env::var("HELP_FOOTER") {
            settings.template_embed.footer = Some(footer);
        }
        if let Some(timeout) = parse_var("HELP_TIMEOUT_SECS")? {
            settings.paginator.timeout = timeout;
        }
        if let Some(extended) = parse_var("HELP_EXTENDED_BUTTONS")? {
            settings.paginator.extended_buttons = extended;
        }
        if let Some(use_select) = parse_var("HELP_USE_SELECT")? {
            settings.paginator.use_select = use_select;
        }
        if let Some(author_only) = parse_var("HELP_AUTHOR_ONLY")? {
            settings.paginator.author_only = author_only;
        }
        if let Some(max) = parse_var("HELP_MAX_RESULTS")? {
            settings.advanced.max_search_results = max;
        }
        if let Ok(blacklist) = env::var("HELP_BLACKLIST") {
            settings.advanced.blacklist = blacklist
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(auto_create) = parse_var("HELP_AUTO_CREATE")? {
            settings.advanced.auto_create = auto_create;
        }

        Ok(settings)
    }
}

fn parse_var<T: FromStr>(key: &'static str) -> Result<Option<T>> {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return Ok(None),
    };
    match value.trim().parse() {
        Ok(parsed) => Ok(Some(parsed)),
        Err(_) => Err(HelpError::InvalidSetting { key, value }.into()),
    }
}

/// Accepts `0x5865F2`, `#5865F2` or a decimal integer.
fn parse_color(value: &str) -> Result<u32> {
    let trimmed = value.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix('#'))
    {
        u32::from_str_radix(hex, 16).ok()
    } else {
        trimmed.parse().ok()
    };

    parsed.ok_or_else(|| {
        HelpError::InvalidSetting {
            key: "HELP_COLOR",
            value: value.to_string(),
        }
        .into()
    })
}

/// Settings for the bundled bot binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub discord_token: String,
    pub log_level: String,
    /// Register commands in this guild only (faster while developing)
    pub guild_id: Option<u64>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Ok(BotConfig {
            discord_token: env::var("DISCORD_TOKEN")
                .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN environment variable not set"))?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            guild_id: parse_var("HELP_GUILD_ID")?,
        })
    }
}
