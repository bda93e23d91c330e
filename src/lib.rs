pub mod blacklist;
pub mod catalog;
pub mod config;
pub mod error;
pub mod help;
pub mod listing;
pub mod normalizer;
pub mod pages;
pub mod paginator;
pub mod registry;
pub mod search;

pub use config::{AdvancedSettings, HelpSettings, PaginatorSettings, TemplateEmbed};
pub use error::HelpError;
pub use help::{create_help_command, HelpCommand};
pub use normalizer::{InteractionKind, InteractionRecord, OptionDescriptor};
pub use pages::DisplayPage;
pub use paginator::{ComponentPaginator, Paginator};
