//! # Paginator
//!
//! Hands generated pages to whatever owns the interactive display. The default
//! implementation sends the first page as the response to a slash command and
//! swaps pages as the user clicks buttons or picks from a select menu.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Button and select-menu navigation with idle timeout and author lock

use anyhow::Result;
use log::{debug, info, warn};
use serenity::async_trait;
use serenity::builder::CreateComponents;
use serenity::futures::StreamExt;
use serenity::model::application::component::ButtonStyle;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::model::id::GuildId;
use serenity::prelude::Context;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::PaginatorSettings;
use crate::pages::{truncate, DisplayPage};

pub const FIRST_ID: &str = "help_page_first";
pub const PREV_ID: &str = "help_page_prev";
pub const INFO_ID: &str = "help_page_info";
pub const NEXT_ID: &str = "help_page_next";
pub const LAST_ID: &str = "help_page_last";
pub const SELECT_ID: &str = "help_page_select";

/// Discord caps select menus at 25 options.
const MAX_SELECT_OPTIONS: usize = 25;
const MAX_LABEL_LEN: usize = 100;

/// The invocation a help request answers.
pub trait HelpTarget {
    /// Guild the request came from, if any.
    fn guild_id(&self) -> Option<GuildId>;
}

/// Owns the display of generated pages and all further user interaction.
#[async_trait]
pub trait Paginator: Send + Sync {
    type Target: HelpTarget + Send + Sync;

    async fn run(&self, target: &Self::Target, pages: Vec<DisplayPage>, settings: &PaginatorSettings) -> Result<()>;
}

/// Navigation request decoded from a component interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageAction {
    First,
    Previous,
    Next,
    Last,
    Goto(usize),
}

impl PageAction {
    pub fn from_component(custom_id: &str, values: &[String]) -> Option<Self> {
        match custom_id {
            FIRST_ID => Some(PageAction::First),
            PREV_ID => Some(PageAction::Previous),
            NEXT_ID => Some(PageAction::Next),
            LAST_ID => Some(PageAction::Last),
            SELECT_ID => values.first()?.parse().ok().map(PageAction::Goto),
            _ => None,
        }
    }

    /// Zero-based page shown after this action, clamped to `0..total`.
    pub fn apply(self, current: usize, total: usize) -> usize {
        let last = total.saturating_sub(1);
        match self {
            PageAction::First => 0,
            PageAction::Previous => current.saturating_sub(1),
            PageAction::Next => (current + 1).min(last),
            PageAction::Last => last,
            PageAction::Goto(index) => index.min(last),
        }
    }
}

/// Select menu window of at most 25 pages, centred on `current` where possible.
fn select_window(current: usize, total: usize) -> std::ops::Range<usize> {
    if total <= MAX_SELECT_OPTIONS {
        return 0..total;
    }
    let start = current
        .saturating_sub(MAX_SELECT_OPTIONS / 2)
        .min(total - MAX_SELECT_OPTIONS);
    start..start + MAX_SELECT_OPTIONS
}

fn select_label(index: usize, title: &str) -> String {
    truncate(&format!("{}. {}", index + 1, title), MAX_LABEL_LEN)
}

/// Waits for `next`, giving up once `idle` passes without it resolving.
/// Called once per click, so the idle window restarts after every interaction.
async fn next_before_idle<T>(idle: Duration, next: impl Future<Output = Option<T>>) -> Option<T> {
    timeout(idle, next).await.ok().flatten()
}

/// Navigation components for the page at `current` (zero-based).
pub fn navigation_components(pages: &[DisplayPage], current: usize, settings: &PaginatorSettings) -> CreateComponents {
    let total = pages.len();
    let mut components = CreateComponents::default();

    if settings.use_select && total > 1 {
        let window = select_window(current, total);
        components.create_action_row(|row| {
            row.create_select_menu(|menu| {
                menu.custom_id(SELECT_ID)
                    .placeholder("Jump to a page")
                    .options(|options| {
                        for index in window {
                            options.create_option(|option| {
                                option
                                    .label(select_label(index, &pages[index].title))
                                    .value(index.to_string())
                                    .default_selection(index == current)
                            });
                        }
                        options
                    })
            })
        });
    }

    components.create_action_row(|row| {
        if settings.extended_buttons {
            row.create_button(|button| {
                button
                    .custom_id(FIRST_ID)
                    .label("⏮️")
                    .style(ButtonStyle::Secondary)
                    .disabled(current == 0)
            });
        }
        row.create_button(|button| {
            button
                .custom_id(PREV_ID)
                .label("⬅️")
                .style(ButtonStyle::Secondary)
                .disabled(current == 0)
        })
        .create_button(|button| {
            button
                .custom_id(INFO_ID)
                .label(&format!("{}/{}", current + 1, total))
                .style(ButtonStyle::Secondary)
                .disabled(true)
        })
        .create_button(|button| {
            button
                .custom_id(NEXT_ID)
                .label("➡️")
                .style(ButtonStyle::Secondary)
                .disabled(current + 1 >= total)
        });
        if settings.extended_buttons {
            row.create_button(|button| {
                button
                    .custom_id(LAST_ID)
                    .label("⏭️")
                    .style(ButtonStyle::Secondary)
                    .disabled(current + 1 >= total)
            });
        }
        row
    });

    components
}

/// A slash command invocation answered through serenity.
#[derive(Clone)]
pub struct SlashInvocation {
    pub ctx: Context,
    pub command: ApplicationCommandInteraction,
}

impl HelpTarget for SlashInvocation {
    fn guild_id(&self) -> Option<GuildId> {
        self.command.guild_id
    }
}

/// Serenity paginator driven by message components.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentPaginator;

#[async_trait]
impl Paginator for ComponentPaginator {
    type Target = SlashInvocation;

    async fn run(&self, target: &SlashInvocation, pages: Vec<DisplayPage>, settings: &PaginatorSettings) -> Result<()> {
        let ctx = &target.ctx;
        let command = &target.command;

        if pages.is_empty() {
            warn!("No help pages generated for {}", command.user.id);
            command
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::ChannelMessageWithSource)
                        .interaction_response_data(|message| message.content("Nothing to show.").ephemeral(true))
                })
                .await?;
            return Ok(());
        }

        let mut current = 0;
        command
            .create_interaction_response(&ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|message| {
                        message
                            .add_embed(pages[current].to_embed())
                            .set_components(navigation_components(&pages, current, settings))
                    })
            })
            .await?;

        let message = command.get_interaction_response(&ctx.http).await?;
        info!("Help sent to {} with {} pages", command.user.id, pages.len());

        let mut interactions = message.await_component_interactions(ctx).build();
        while let Some(interaction) = next_before_idle(settings.timeout(), interactions.next()).await {
            if settings.author_only && interaction.user.id != command.user.id {
                interaction
                    .create_interaction_response(&ctx.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|message| {
                                message
                                    .content("Only the person who asked for help can turn these pages.")
                                    .ephemeral(true)
                            })
                    })
                    .await?;
                continue;
            }

            let action = match PageAction::from_component(&interaction.data.custom_id, &interaction.data.values) {
                Some(action) => action,
                None => continue,
            };
            current = action.apply(current, pages.len());
            debug!("Help page {} of {} for {}", current + 1, pages.len(), interaction.user.id);

            interaction
                .create_interaction_response(&ctx.http, |response| {
                    response
                        .kind(InteractionResponseType::UpdateMessage)
                        .interaction_response_data(|message| {
                            message
                                .add_embed(pages[current].to_embed())
                                .set_components(navigation_components(&pages, current, settings))
                        })
                })
                .await?;
        }

        // Idle: leave the current page, drop the controls
        command
            .edit_original_interaction_response(&ctx.http, |response| response.components(|c| c))
            .await?;
        debug!("Help pagination for {} went idle", command.user.id);

        Ok(())
    }
}
