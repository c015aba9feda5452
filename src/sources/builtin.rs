use crate::config::StaticEntry;
use crate::model::CatalogEntry;
use crate::sources::Source;
use anyhow::Result;
use log::info;

/// The base application table shipped with the launcher.
pub struct BuiltinSource<'a> {
    items: &'a [StaticEntry],
}

impl<'a> BuiltinSource<'a> {
    pub fn new(items: &'a [StaticEntry]) -> Self {
        Self { items }
    }
}

impl Source for BuiltinSource<'_> {
    fn scan(&self) -> Result<Vec<CatalogEntry>> {
        let entries: Vec<CatalogEntry> = self
            .items
            .iter()
            .map(|item| CatalogEntry::new(item.name.clone(), item.command.clone()))
            .collect();
        info!("BuiltinSource: found {} entries", entries.len());
        Ok(entries)
    }
}
