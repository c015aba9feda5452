use crate::config::StaticEntry;
use crate::model::CatalogEntry;
use crate::sources::Source;
use anyhow::Result;
use log::{debug, info};

/// Extra entries for the operating system the launcher is running on.
pub struct PlatformSource<'a> {
    os: &'a str,
    items: &'a [StaticEntry],
}

impl<'a> PlatformSource<'a> {
    pub fn new(os: &'a str, items: &'a [StaticEntry]) -> Self {
        Self { os, items }
    }
}

impl Source for PlatformSource<'_> {
    fn scan(&self) -> Result<Vec<CatalogEntry>> {
        if self.items.is_empty() {
            debug!("PlatformSource: no addendum for {}", self.os);
            return Ok(vec![]);
        }

        let entries: Vec<CatalogEntry> = self
            .items
            .iter()
            .map(|item| CatalogEntry::new(item.name.clone(), item.command.clone()))
            .collect();
        info!("PlatformSource: found {} entries for {}", entries.len(), self.os);
        Ok(entries)
    }
}
