use crate::model::{Catalog, CatalogEntry};
use anyhow::Result;
use log::{info, warn};

pub trait Source {
    fn scan(&self) -> Result<Vec<CatalogEntry>>;
}

pub mod builtin;
pub mod platform;

/// Collects every source into one sorted catalog.
pub fn build_catalog(sources: &[&dyn Source]) -> Result<Catalog> {
    let mut entries = Vec::new();
    for source in sources {
        entries.append(&mut source.scan()?);
    }
    let catalog = Catalog::new(entries);
    if catalog.is_empty() {
        warn!("Catalog is empty, nothing to launch");
    }
    info!("Catalog: {} entries", catalog.len());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticEntry;
    use crate::sources::builtin::BuiltinSource;
    use crate::sources::platform::PlatformSource;

    fn item(name: &str, command: &str) -> StaticEntry {
        StaticEntry { name: name.to_string(), command: command.to_string() }
    }

    #[test]
    fn merges_base_table_and_addendum_sorted() {
        let base = vec![item("Notepad", "notepad.exe"), item("Calculator", "calc.exe")];
        let addendum = vec![item("firefox", "firefox")];
        let builtin = BuiltinSource::new(&base);
        let platform = PlatformSource::new("linux", &addendum);

        let catalog = build_catalog(&[&builtin, &platform]).expect("static sources never fail");

        let names: Vec<_> = catalog.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Calculator", "firefox", "Notepad"]);
    }
}
