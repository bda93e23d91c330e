//! # Help Command
//!
//! Entry point: fetches the command catalog, builds either search results or
//! the full per-module listing, and hands the pages to the paginator.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Search and listing modes, `/help` definition

use anyhow::Result;
use log::info;
use serenity::builder::CreateApplicationCommand;
use serenity::model::application::command::CommandOptionType;
use serenity::model::application::interaction::application_command::CommandDataOption;
use serenity::model::id::GuildId;

use crate::blacklist::Blacklist;
use crate::catalog::CommandCatalog;
use crate::config::HelpSettings;
use crate::listing::{ListingScope, ListingSource};
use crate::normalizer::{group_by_module, InteractionRecord, ModuleGroup};
use crate::pages::{build_pages, command_list, record_field, truncate, DisplayPage, PageField};
use crate::paginator::{HelpTarget, Paginator};
use crate::registry::ModuleRegistry;
use crate::search::{rank, MatchTarget, RankedMatch};

/// Name of the string option carrying the search query.
pub const SEARCH_OPTION: &str = "search";

/// Longest query echoed in a search page title; keeps the page range visible.
const MAX_TITLE_QUERY_LEN: usize = 100;

/// Definition of `/help [search]` for the host bot to register.
pub fn create_help_command() -> CreateApplicationCommand {
    CreateApplicationCommand::default()
        .name("help")
        .description("Show available commands and usage information")
        .create_option(|option| {
            option
                .name(SEARCH_OPTION)
                .description("Command or category to look for")
                .kind(CommandOptionType::String)
                .required(false)
        })
        .to_owned()
}

/// Search query passed to `/help`, if any.
pub fn search_query(options: &[CommandDataOption]) -> Option<String> {
    options
        .iter()
        .find(|opt| opt.name == SEARCH_OPTION)
        .and_then(|opt| opt.value.as_ref())
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
        .filter(|s| !s.trim().is_empty())
}

pub struct HelpCommand<S, P> {
    catalog: CommandCatalog<S>,
    paginator: P,
    settings: HelpSettings,
}

impl<S, P> HelpCommand<S, P>
where
    S: ListingSource,
    P: Paginator,
{
    pub fn new(source: S, registry: ModuleRegistry, paginator: P, settings: HelpSettings) -> Self {
        HelpCommand {
            catalog: CommandCatalog::new(source, registry, settings.sync_commands),
            paginator,
            settings,
        }
    }

    /// The `/help` definition when `auto_create` is enabled.
    pub fn definition(&self) -> Option<CreateApplicationCommand> {
        self.settings.advanced.auto_create.then(create_help_command)
    }

    /// Answers a help request. `guild_id` defaults to the target's guild.
    ///
    /// Listing errors, including an empty listing, are returned before the
    /// paginator is involved.
    pub async fn send_help(&self, target: &P::Target, search: Option<&str>, guild_id: Option<GuildId>) -> Result<()> {
        let guild_id = guild_id.or_else(|| target.guild_id());
        let records = self.catalog.get_commands(ListingScope::default(), guild_id).await?;

        let pages = match search {
            Some(query) => self.search_pages(&records, query),
            None => self.listing_pages(&records),
        };

        info!(
            "Sending help ({}) with {} pages",
            search.map_or_else(|| "listing".to_string(), |q| format!("search {:?}", q)),
            pages.len()
        );
        self.paginator.run(target, pages, &self.settings.paginator).await
    }

    fn blacklist(&self) -> Blacklist<'_> {
        Blacklist::new(&self.settings.advanced.blacklist)
    }

    /// Pages of fuzzy matches for `query`.
    pub fn search_pages(&self, records: &[InteractionRecord], query: &str) -> Vec<DisplayPage> {
        let query = query.to_lowercase();
        let matches = rank(records, &query, self.settings.advanced.max_search_results, self.blacklist());
        let fields: Vec<PageField> = matches
            .iter()
            .filter_map(|found| self.match_field(records, found))
            .collect();

        let template = &self.settings.template_embed;
        let shown = truncate(&query, MAX_TITLE_QUERY_LEN);
        build_pages(
            &fields,
            template.fields_per_embed,
            template,
            |start, end| format!("Search results for `{}`, {} - {}", shown, start, end),
            PageField::clone,
        )
    }

    fn match_field(&self, records: &[InteractionRecord], found: &RankedMatch) -> Option<PageField> {
        match &found.target {
            MatchTarget::Module(module) => {
                let blacklist = self.blacklist();
                let commands = records
                    .iter()
                    .filter(|r| r.module.as_deref() == Some(module.as_str()) && !blacklist.excludes_command(r));
                Some(PageField {
                    name: module.clone(),
                    body: format!("Category\nCommands:\n{}", command_list(commands)),
                })
            }
            MatchTarget::Command(name) => records.iter().find(|r| &r.name == name).map(record_field),
        }
    }

    /// Overview page followed by detail pages for every module.
    pub fn listing_pages(&self, records: &[InteractionRecord]) -> Vec<DisplayPage> {
        let template = &self.settings.template_embed;
        let blacklist = self.blacklist();
        // Category order follows the module rule, where records without a module
        // always count; the command rule then decides what each category lists.
        let ordered = group_by_module(records.iter().filter(|r| !blacklist.excludes_module(r)));
        let groups: Vec<ModuleGroup<'_>> = ordered
            .into_iter()
            .map(|mut group| {
                group.records.retain(|r| !blacklist.excludes_command(r));
                group
            })
            .filter(|group| !group.records.is_empty())
            .collect();

        let mut overview = DisplayPage::styled("Help", template);
        overview.description = template.description.clone();
        for group in &groups {
            let label = group.name.unwrap_or(&template.no_category_name);
            overview.add_field(label, command_list(group.records.iter().copied()));
        }

        let mut pages = vec![overview];
        for group in &groups {
            let label = group.name.unwrap_or(&template.no_category_name);
            pages.extend(build_pages(
                &group.records,
                template.fields_per_embed,
                template,
                |start, end| format!("{} {} - {}", label, start, end),
                |record| record_field(record),
            ));
        }
        pages
    }
}
