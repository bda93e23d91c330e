//! # Command Listing
//!
//! Raw application command descriptors as Discord returns them, and the seam
//! the help command fetches them through.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Raw descriptors, `ListingSource` and the serenity HTTP source

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::command::Command;
use serenity::model::id::GuildId;
use std::sync::Arc;

/// Application command type codes
pub const CHAT_INPUT: u8 = 1;
pub const USER_MENU: u8 = 2;
pub const MESSAGE_MENU: u8 = 3;

/// Option type codes that make a command subcommand-bearing
pub const SUB_COMMAND: u8 = 1;
pub const SUB_COMMAND_GROUP: u8 = 2;

/// Top-level application command as listed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCommand {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default = "chat_input")]
    pub kind: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<RawOption>,
}

/// Command option, subcommand or subcommand group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOption {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default, deserialize_with = "null_as_default")]
    pub required: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub choices: Vec<RawChoice>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<RawOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChoice {
    pub name: String,
    pub value: Value,
}

impl RawCommand {
    /// A chat-input command whose first option is a subcommand or group.
    pub fn has_subcommands(&self) -> bool {
        self.kind == CHAT_INPUT
            && self
                .options
                .first()
                .map_or(false, |opt| matches!(opt.kind, SUB_COMMAND | SUB_COMMAND_GROUP))
    }
}

fn chat_input() -> u8 {
    CHAT_INPUT
}

// Discord omits absent fields, but cached payloads sometimes carry explicit nulls.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Global commands plus, optionally, the guild-scoped ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub global: Vec<Option<RawCommand>>,
    pub guild: Option<Vec<Option<RawCommand>>>,
}

impl RawListing {
    /// Non-null commands, global first.
    pub fn commands(&self) -> impl Iterator<Item = &RawCommand> {
        self.global
            .iter()
            .chain(self.guild.iter().flatten())
            .filter_map(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.commands().next().is_none()
    }
}

/// Which command scopes a fetch covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingScope {
    pub global: bool,
    pub guild: bool,
}

impl Default for ListingScope {
    fn default() -> Self {
        ListingScope {
            global: true,
            guild: true,
        }
    }
}

/// Where application commands are read from.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Global commands when `guild` is `None`, otherwise that guild's commands.
    /// `None` means the source had nothing to report.
    async fn get_application_commands(
        &self,
        guild: Option<GuildId>,
    ) -> Result<Option<Vec<Option<RawCommand>>>>;
}

/// Fetches the listing for `scope`. Fetch errors propagate unmodified.
pub async fn fetch_listing<S>(source: &S, scope: ListingScope, guild: Option<GuildId>) -> Result<RawListing>
where
    S: ListingSource + ?Sized,
{
    let global = if scope.global {
        source.get_application_commands(None).await?.unwrap_or_default()
    } else {
        Vec::new()
    };

    let guild = match guild {
        Some(guild_id) if scope.guild => source.get_application_commands(Some(guild_id)).await?,
        _ => None,
    };

    debug!(
        "Fetched {} global and {} guild commands",
        global.len(),
        guild.as_ref().map_or(0, Vec::len)
    );

    Ok(RawListing { global, guild })
}

/// Reads commands through serenity's HTTP client.
#[derive(Clone)]
pub struct HttpListingSource {
    http: Arc<Http>,
}

impl HttpListingSource {
    pub fn new(http: Arc<Http>) -> Self {
        HttpListingSource { http }
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn get_application_commands(
        &self,
        guild: Option<GuildId>,
    ) -> Result<Option<Vec<Option<RawCommand>>>> {
        let commands = match guild {
            Some(guild_id) => guild_id.get_application_commands(&self.http).await?,
            None => Command::get_global_application_commands(&self.http).await?,
        };

        Ok(Some(raw_commands(&commands)?))
    }
}

/// Re-reads serenity's models as raw descriptors. They serialize to the API's
/// own shape, so the serde round trip keeps options, choices and flags.
fn raw_commands(commands: &[Command]) -> Result<Vec<Option<RawCommand>>> {
    Ok(serde_json::from_value(serde_json::to_value(commands)?)?)
}
