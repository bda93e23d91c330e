//! # Command Catalog
//!
//! Fetches the application's commands, normalizes them and keeps the last
//! snapshot around for reuse.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Cached snapshot replaced wholesale on every refetch

use anyhow::Result;
use log::{debug, info};
use serenity::model::id::GuildId;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::listing::{fetch_listing, ListingScope, ListingSource};
use crate::normalizer::{normalize, InteractionRecord};
use crate::registry::ModuleRegistry;

pub struct CommandCatalog<S> {
    source: S,
    registry: ModuleRegistry,
    /// Refetch on every call instead of serving the cached snapshot
    sync_commands: bool,
    cache: RwLock<Option<Arc<[InteractionRecord]>>>,
}

impl<S: ListingSource> CommandCatalog<S> {
    pub fn new(source: S, registry: ModuleRegistry, sync_commands: bool) -> Self {
        CommandCatalog {
            source,
            registry,
            sync_commands,
            cache: RwLock::new(None),
        }
    }

    /// Normalized commands for `guild`.
    ///
    /// The cached snapshot is returned as-is when one exists and syncing is
    /// off, whatever `scope` and `guild` ask for.
    pub async fn get_commands(&self, scope: ListingScope, guild: Option<GuildId>) -> Result<Arc<[InteractionRecord]>> {
        if !self.sync_commands {
            if let Some(records) = self.cache.read().await.as_ref() {
                debug!("Serving {} cached interactions", records.len());
                return Ok(Arc::clone(records));
            }
        }

        let listing = fetch_listing(&self.source, scope, guild).await?;
        let records: Arc<[InteractionRecord]> = normalize(&listing, &self.registry)?.into();

        *self.cache.write().await = Some(Arc::clone(&records));
        info!("Cached {} interactions", records.len());
        Ok(records)
    }

    /// Drops the cached snapshot so the next call refetches.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}
