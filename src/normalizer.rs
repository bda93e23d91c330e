//! # Command Normalizer
//!
//! Flattens a raw command listing into one `InteractionRecord` per invokable
//! leaf: plain slash commands, every subcommand, and context menus.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Tagged interaction kinds and explicit module lookup

use anyhow::Result;
use log::debug;
use std::collections::HashSet;
use std::fmt;

use crate::error::HelpError;
use crate::listing::{RawCommand, RawListing, RawOption, MESSAGE_MENU, SUB_COMMAND, SUB_COMMAND_GROUP, USER_MENU};
use crate::registry::ModuleRegistry;

/// Resolves an option type code to the label shown in usage strings.
/// Options with a choice list are always shown as `choices`.
pub fn type_label(kind: u8, has_choices: bool) -> &'static str {
    if has_choices {
        return "choices";
    }
    match kind {
        1 => "sub_command",
        2 => "sub_command_group",
        3 => "string",
        4 => "integer",
        5 => "boolean",
        6 => "user",
        7 => "channel",
        8 => "role",
        9 => "mentionable",
        10 => "float",
        11 => "attachment",
        _ => "unknown",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionDescriptor {
    pub name: String,
    pub required: bool,
    pub type_label: &'static str,
}

impl From<&RawOption> for OptionDescriptor {
    fn from(option: &RawOption) -> Self {
        OptionDescriptor {
            name: option.name.clone(),
            required: option.required,
            type_label: type_label(option.kind, !option.choices.is_empty()),
        }
    }
}

/// What kind of interaction a record documents. Only slash-style kinds carry options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionKind {
    SlashCommand { options: Vec<OptionDescriptor> },
    Subcommand { options: Vec<OptionDescriptor> },
    SubcommandGroup { options: Vec<OptionDescriptor> },
    UserMenu,
    MessageMenu,
}

impl InteractionKind {
    pub fn options(&self) -> &[OptionDescriptor] {
        match self {
            InteractionKind::SlashCommand { options }
            | InteractionKind::Subcommand { options }
            | InteractionKind::SubcommandGroup { options } => options,
            InteractionKind::UserMenu | InteractionKind::MessageMenu => &[],
        }
    }

    pub fn is_menu(&self) -> bool {
        matches!(self, InteractionKind::UserMenu | InteractionKind::MessageMenu)
    }

    /// Human label, e.g. `Slash command` or `User menu`.
    pub fn label(&self) -> &'static str {
        match self {
            InteractionKind::SlashCommand { .. } => "Slash command",
            InteractionKind::Subcommand { .. } => "Subcommand",
            InteractionKind::SubcommandGroup { .. } => "Subcommand group",
            InteractionKind::UserMenu => "User menu",
            InteractionKind::MessageMenu => "Message menu",
        }
    }
}

/// One documented interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRecord {
    pub name: String,
    pub description: Option<String>,
    pub kind: InteractionKind,
    pub module: Option<String>,
}

impl InteractionRecord {
    pub fn options(&self) -> &[OptionDescriptor] {
        self.kind.options()
    }
}

impl fmt::Display for InteractionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_menu() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "/{}", self.name)
        }
    }
}

/// Records grouped by owning module, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGroup<'a> {
    pub name: Option<&'a str>,
    pub records: Vec<&'a InteractionRecord>,
}

pub fn group_by_module<'a, I>(records: I) -> Vec<ModuleGroup<'a>>
where
    I: IntoIterator<Item = &'a InteractionRecord>,
{
    let mut groups: Vec<ModuleGroup<'a>> = Vec::new();
    for record in records {
        let module = record.module.as_deref();
        match groups.iter_mut().find(|group| group.name == module) {
            Some(group) => group.records.push(record),
            None => groups.push(ModuleGroup {
                name: module,
                records: vec![record],
            }),
        }
    }
    groups
}

/// Builds the flat record list for a listing snapshot.
///
/// Fails with [`HelpError::NoCommands`] when the listing holds no commands once
/// null entries are dropped.
pub fn normalize(listing: &RawListing, registry: &ModuleRegistry) -> Result<Vec<InteractionRecord>> {
    if listing.is_empty() {
        return Err(HelpError::NoCommands.into());
    }

    let mut plain = Vec::new();
    let mut with_subcommands = Vec::new();
    let mut menus = Vec::new();
    for command in listing.commands() {
        if command.kind == USER_MENU || command.kind == MESSAGE_MENU {
            menus.push(command);
        } else if command.has_subcommands() {
            with_subcommands.push(command);
        } else {
            plain.push(command);
        }
    }

    let mut records = Vec::new();
    for command in plain {
        records.push(InteractionRecord {
            name: command.name.clone(),
            description: command.description.clone(),
            kind: InteractionKind::SlashCommand {
                options: descriptors(&command.options),
            },
            module: owner(registry, command),
        });
    }
    for command in with_subcommands {
        expand_subcommands(command, registry, &mut records);
    }
    for command in menus {
        records.push(InteractionRecord {
            name: command.name.clone(),
            description: command.description.clone().filter(|d| !d.is_empty()),
            kind: if command.kind == USER_MENU {
                InteractionKind::UserMenu
            } else {
                InteractionKind::MessageMenu
            },
            module: owner(registry, command),
        });
    }

    let mut seen = HashSet::new();
    records.retain(|record| {
        let first = seen.insert(record.name.clone());
        if !first {
            debug!("Dropping duplicate interaction {}", record.name);
        }
        first
    });

    debug!("Normalized {} interactions", records.len());
    Ok(records)
}

fn expand_subcommands(command: &RawCommand, registry: &ModuleRegistry, records: &mut Vec<InteractionRecord>) {
    let module = owner(registry, command);
    for sub in &command.options {
        match sub.kind {
            SUB_COMMAND => records.push(InteractionRecord {
                name: format!("{} {}", command.name, sub.name),
                description: Some(sub.description.clone()),
                kind: InteractionKind::Subcommand {
                    options: descriptors(&sub.options),
                },
                module: module.clone(),
            }),
            SUB_COMMAND_GROUP => {
                for leaf in &sub.options {
                    records.push(InteractionRecord {
                        name: format!("{} {} {}", command.name, sub.name, leaf.name),
                        description: Some(leaf.description.clone()),
                        kind: InteractionKind::SubcommandGroup {
                            options: descriptors(&leaf.options),
                        },
                        module: module.clone(),
                    });
                }
            }
            other => debug!(
                "Ignoring option {} (type {}) mixed into subcommands of {}",
                sub.name, other, command.name
            ),
        }
    }
}

fn descriptors(options: &[RawOption]) -> Vec<OptionDescriptor> {
    options.iter().map(OptionDescriptor::from).collect()
}

fn owner(registry: &ModuleRegistry, command: &RawCommand) -> Option<String> {
    registry.module_for(&command.name).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn listing(global: Value) -> RawListing {
        RawListing {
            global: serde_json::from_value(global).unwrap(),
            guild: None,
        }
    }

    #[test]
    fn test_plain_commands_one_record_each() {
        let raw = listing(json!([
            {"name": "ping", "type": 1, "description": "pong", "options": []},
            {"name": "forget", "type": 1, "description": "Clear your history"},
            {"name": "recipe", "type": 1, "description": "Get a recipe", "options": [
                {"name": "dish", "type": 3, "required": true},
                {"name": "servings", "type": 4}
            ]}
        ]));

        let records = normalize(&raw, &ModuleRegistry::new()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].name, "ping");
        assert_eq!(records[0].description.as_deref(), Some("pong"));
        assert!(records[1].options().is_empty());
        assert_eq!(
            records[2].options(),
            &[
                OptionDescriptor { name: "dish".into(), required: true, type_label: "string" },
                OptionDescriptor { name: "servings".into(), required: false, type_label: "integer" },
            ]
        );
        assert!(records.iter().all(|r| matches!(r.kind, InteractionKind::SlashCommand { .. })));
    }

    #[test]
    fn test_subcommand_expansion() {
        let raw = listing(json!([
            {"name": "admin", "type": 1, "description": "Admin tools", "options": [
                {"name": "settings", "type": 1, "description": "Show settings"},
                {"name": "role", "type": 2, "description": "Role tools", "options": [
                    {"name": "set", "type": 1, "description": "Set the admin role", "options": [
                        {"name": "role", "type": 8, "required": true}
                    ]},
                    {"name": "clear", "type": 1, "description": "Clear the admin role"}
                ]}
            ]}
        ]));

        let records = normalize(&raw, &ModuleRegistry::new()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["admin settings", "admin role set", "admin role clear"]);

        assert!(matches!(records[0].kind, InteractionKind::Subcommand { .. }));
        assert!(records[0].options().is_empty());
        assert!(matches!(records[1].kind, InteractionKind::SubcommandGroup { .. }));
        assert_eq!(records[1].description.as_deref(), Some("Set the admin role"));
        assert_eq!(records[1].options()[0].type_label, "role");
        assert!(records[1].options()[0].required);
    }

    #[test]
    fn test_menus_and_ordering() {
        let raw = listing(json!([
            {"name": "Analyze User", "type": 2, "description": ""},
            {"name": "remind", "type": 1, "description": "Reminders", "options": [
                {"name": "set", "type": 1, "description": "Set one"}
            ]},
            {"name": "Explain Message", "type": 3},
            {"name": "ping", "type": 1, "description": "pong"}
        ]));

        let records = normalize(&raw, &ModuleRegistry::new()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ping", "remind set", "Analyze User", "Explain Message"]);
        assert_eq!(records[2].kind, InteractionKind::UserMenu);
        assert_eq!(records[2].description, None);
        assert_eq!(records[3].kind, InteractionKind::MessageMenu);
        assert!(records[3].options().is_empty());
    }

    #[test]
    fn test_choices_label() {
        let raw = listing(json!([
            {"name": "set_persona", "type": 1, "description": "Set persona", "options": [
                {"name": "persona", "type": 3, "required": true, "choices": [
                    {"name": "chef", "value": "chef"}
                ]}
            ]}
        ]));
        let records = normalize(&raw, &ModuleRegistry::new()).unwrap();
        assert_eq!(records[0].options()[0].type_label, "choices");
    }

    #[test]
    fn test_module_resolution() {
        let mut registry = ModuleRegistry::new();
        registry.register("utility", ["ping"]);
        registry.register("admin", ["admin"]);

        let raw = listing(json!([
            {"name": "ping", "type": 1, "description": "pong"},
            {"name": "imagine", "type": 1, "description": "Draw"},
            {"name": "admin", "type": 1, "options": [{"name": "settings", "type": 1}]}
        ]));
        let records = normalize(&raw, &registry).unwrap();

        assert_eq!(records[0].module.as_deref(), Some("utility"));
        assert_eq!(records[1].module, None);
        assert_eq!(records[2].module.as_deref(), Some("admin"));
    }

    #[test]
    fn test_guild_commands_follow_global() {
        let raw = RawListing {
            global: serde_json::from_value(json!([{"name": "ping", "type": 1, "description": "pong"}])).unwrap(),
            guild: Some(
                serde_json::from_value(json!([
                    {"name": "local", "type": 1, "description": "Guild only"},
                    {"name": "ping", "type": 1, "description": "override"}
                ]))
                .unwrap(),
            ),
        };
        let records = normalize(&raw, &ModuleRegistry::new()).unwrap();
        let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ping", "local"]);
        assert_eq!(records[0].description.as_deref(), Some("pong"));
    }

    #[test]
    fn test_empty_listing_is_an_error() {
        let raw = RawListing {
            global: vec![None, None],
            guild: Some(Vec::new()),
        };
        let err = normalize(&raw, &ModuleRegistry::new()).unwrap_err();
        assert_eq!(err.downcast_ref::<HelpError>(), Some(&HelpError::NoCommands));
    }

    #[test]
    fn test_group_by_module_first_seen_order() {
        let mut registry = ModuleRegistry::new();
        registry.register("b", ["two"]).register("a", ["one", "three"]);
        let raw = listing(json!([
            {"name": "one", "type": 1},
            {"name": "two", "type": 1},
            {"name": "three", "type": 1},
            {"name": "four", "type": 1}
        ]));
        let records = normalize(&raw, &registry).unwrap();
        let groups = group_by_module(&records);

        let summary: Vec<_> = groups
            .iter()
            .map(|g| (g.name, g.records.iter().map(|r| r.name.as_str()).collect::<Vec<_>>()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some("a"), vec!["one", "three"]),
                (Some("b"), vec!["two"]),
                (None, vec!["four"]),
            ]
        );
    }

    #[test]
    fn test_display_prefix() {
        let record = InteractionRecord {
            name: "Analyze User".into(),
            description: None,
            kind: InteractionKind::UserMenu,
            module: None,
        };
        assert_eq!(record.to_string(), "Analyze User");
    }
}
