//! # Page Builder
//!
//! Chunks items into fixed-size pages and renders interaction records as
//! embed fields with a usage block.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Usage strings, chunking and embed conversion

use serenity::builder::CreateEmbed;

use crate::config::TemplateEmbed;
use crate::normalizer::{InteractionKind, InteractionRecord};

/// Discord embed limits, in characters unless noted
pub const MAX_TITLE_LEN: usize = 256;
pub const MAX_DESCRIPTION_LEN: usize = 4096;
pub const MAX_FIELD_NAME_LEN: usize = 256;
pub const MAX_FIELD_VALUE_LEN: usize = 1024;
pub const MAX_FOOTER_LEN: usize = 2048;
/// Fields per embed
pub const MAX_FIELDS: usize = 25;

/// Cuts `text` to at most `max` characters, ending in `…` when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageField {
    pub name: String,
    pub body: String,
}

/// One page handed to the paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayPage {
    pub title: String,
    pub description: Option<String>,
    pub color: u32,
    pub footer: Option<String>,
    pub fields: Vec<PageField>,
}

impl DisplayPage {
    /// Empty page styled with the template's colour and footer.
    pub fn styled(title: impl Into<String>, template: &TemplateEmbed) -> Self {
        DisplayPage {
            title: title.into(),
            description: None,
            color: template.color,
            footer: template.footer.clone(),
            fields: Vec::new(),
        }
    }

    pub fn add_field(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.fields.push(PageField {
            name: name.into(),
            body: body.into(),
        });
    }

    /// Embed for this page, cut down to Discord's limits so an oversized page
    /// still sends.
    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::default();
        embed.title(truncate(&self.title, MAX_TITLE_LEN)).colour(self.color);
        if let Some(description) = &self.description {
            embed.description(truncate(description, MAX_DESCRIPTION_LEN));
        }
        for field in self.fields.iter().take(MAX_FIELDS) {
            embed.field(
                truncate(&field.name, MAX_FIELD_NAME_LEN),
                truncate(&field.body, MAX_FIELD_VALUE_LEN),
                false,
            );
        }
        if let Some(footer) = &self.footer {
            embed.footer(|f| f.text(truncate(footer, MAX_FOOTER_LEN)));
        }
        embed
    }
}

/// Splits `items` into pages of `per_page` fields.
///
/// `title` receives the 1-based first index of the page and the last index it
/// could hold, so titles read `1 - 3`, `4 - 6` regardless of how full the last
/// page is. `render` turns one item into a field.
pub fn build_pages<T, F, R>(
    items: &[T],
    per_page: usize,
    template: &TemplateEmbed,
    mut title: F,
    mut render: R,
) -> Vec<DisplayPage>
where
    F: FnMut(usize, usize) -> String,
    R: FnMut(&T) -> PageField,
{
    let per_page = per_page.max(1);
    items
        .chunks(per_page)
        .enumerate()
        .map(|(index, chunk)| {
            let start = index * per_page + 1;
            let mut page = DisplayPage::styled(title(start, start + per_page - 1), template);
            page.fields = chunk.iter().map(&mut render).collect();
            page
        })
        .collect()
}

/// `/name [opt: type], [opt: optional type]` for slash kinds,
/// `Right click on a user` for menus.
pub fn usage(record: &InteractionRecord) -> String {
    match record.kind {
        InteractionKind::UserMenu => "Right click on a user".to_string(),
        InteractionKind::MessageMenu => "Right click on a message".to_string(),
        _ => {
            let mut usage = format!("/{} ", record.name);
            for option in record.options() {
                let optional = if option.required { "" } else { "optional " };
                usage.push_str(&format!("[{}: {}{}], ", option.name, optional, option.type_label));
            }
            let usage = usage.strip_suffix(", ").unwrap_or(&usage);
            usage.trim_end().to_string()
        }
    }
}

/// Field documenting a single interaction.
pub fn record_field(record: &InteractionRecord) -> PageField {
    let description = record
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or("No description");

    PageField {
        name: record.name.clone(),
        body: format!(
            "{}\n{}\nHow to use:\n```\n{}\n```",
            description,
            record.kind.label(),
            usage(record)
        ),
    }
}

/// Backtick-quoted, comma separated command list, e.g. `` `/ping`, `Analyze User` ``.
pub fn command_list<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a InteractionRecord>,
{
    records
        .into_iter()
        .map(|record| format!("`{}`", record))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::OptionDescriptor;

    fn slash(name: &str, options: Vec<OptionDescriptor>) -> InteractionRecord {
        InteractionRecord {
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            kind: InteractionKind::SlashCommand { options },
            module: None,
        }
    }

    fn option(name: &str, required: bool, type_label: &'static str) -> OptionDescriptor {
        OptionDescriptor {
            name: name.to_string(),
            required,
            type_label,
        }
    }

    #[test]
    fn test_page_counts_and_order() {
        let items: Vec<u32> = (1..=7).collect();
        let pages = build_pages(
            &items,
            3,
            &TemplateEmbed::default(),
            |start, end| format!("{} - {}", start, end),
            |n| PageField { name: n.to_string(), body: String::new() },
        );

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].fields.len(), 3);
        assert_eq!(pages[1].fields.len(), 3);
        assert_eq!(pages[2].fields.len(), 1);
        assert_eq!(pages[0].title, "1 - 3");
        assert_eq!(pages[2].title, "7 - 9");

        let flattened: Vec<String> = pages.iter().flat_map(|p| p.fields.iter().map(|f| f.name.clone())).collect();
        let expected: Vec<String> = items.iter().map(u32::to_string).collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn test_exact_multiple_and_empty() {
        let template = TemplateEmbed::default();
        let field = |n: &u32| PageField { name: n.to_string(), body: String::new() };

        let pages = build_pages(&[1u32, 2, 3, 4], 2, &template, |s, e| format!("{}-{}", s, e), field);
        assert_eq!(pages.len(), 2);
        assert!(pages.iter().all(|p| p.fields.len() == 2));

        let none: Vec<u32> = Vec::new();
        assert!(build_pages(&none, 2, &template, |s, e| format!("{}-{}", s, e), field).is_empty());
    }

    #[test]
    fn test_pages_carry_template_style() {
        let template = TemplateEmbed {
            color: 0x5865F2,
            footer: Some("Use /help <query> to search".into()),
            ..TemplateEmbed::default()
        };
        let pages = build_pages(
            &[1u32],
            3,
            &template,
            |_, _| "t".into(),
            |n| PageField { name: n.to_string(), body: String::new() },
        );
        assert_eq!(pages[0].color, 0x5865F2);
        assert_eq!(pages[0].footer.as_deref(), Some("Use /help <query> to search"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("ping", 4), "ping");
        assert_eq!(truncate("reminders", 5), "remi…");
        assert_eq!(truncate("ééééé", 3).chars().count(), 3);
    }

    #[test]
    fn test_embed_respects_discord_limits() {
        let mut page = DisplayPage::styled("t".repeat(300), &TemplateEmbed::default());
        for n in 0..30 {
            page.add_field(format!("field {}", n), "x".repeat(2000));
        }

        let embed = page.to_embed();
        let title = embed.0.get("title").and_then(|v| v.as_str()).unwrap();
        assert_eq!(title.chars().count(), MAX_TITLE_LEN);
        let fields = embed.0.get("fields").and_then(|v| v.as_array()).unwrap();
        assert_eq!(fields.len(), MAX_FIELDS);
        let value = fields[0].get("value").and_then(|v| v.as_str()).unwrap();
        assert_eq!(value.chars().count(), MAX_FIELD_VALUE_LEN);
        assert!(value.ends_with('…'));
        assert_eq!(fields[24].get("name").and_then(|v| v.as_str()), Some("field 24"));
    }

    #[test]
    fn test_usage_strings() {
        assert_eq!(usage(&slash("ping", Vec::new())), "/ping");
        assert_eq!(
            usage(&slash(
                "remind",
                vec![option("time", true, "string"), option("note", false, "string")]
            )),
            "/remind [time: string], [note: optional string]"
        );

        let menu = InteractionRecord {
            name: "Analyze User".into(),
            description: None,
            kind: InteractionKind::UserMenu,
            module: None,
        };
        assert_eq!(usage(&menu), "Right click on a user");

        let message = InteractionRecord {
            kind: InteractionKind::MessageMenu,
            ..menu
        };
        assert_eq!(usage(&message), "Right click on a message");
    }

    #[test]
    fn test_record_field_body() {
        let mut record = slash("ping", Vec::new());
        record.description = None;
        let field = record_field(&record);

        assert_eq!(field.name, "ping");
        assert!(field.body.starts_with("No description\nSlash command\n"));
        assert!(field.body.contains("```\n/ping\n```"));

        record.description = Some(String::new());
        assert!(record_field(&record).body.starts_with("No description"));
    }

    #[test]
    fn test_command_list() {
        let menu = InteractionRecord {
            name: "Analyze User".into(),
            description: None,
            kind: InteractionKind::UserMenu,
            module: None,
        };
        let ping = slash("ping", Vec::new());
        assert_eq!(command_list([&ping, &menu]), "`/ping`, `Analyze User`");
    }

    #[test]
    fn test_to_embed_contains_fields() {
        let mut page = DisplayPage::styled("Help", &TemplateEmbed::default());
        page.add_field("utility", "`/ping`");
        let embed = page.to_embed();
        assert_eq!(embed.0.get("title").and_then(|v| v.as_str()), Some("Help"));
        assert!(embed.0.get("fields").is_some());
    }
}
