#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,    // Display name
    pub command: String, // Launch invocation, may embed arguments
}

impl CatalogEntry {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
        }
    }
}

/// The launchable applications, sorted case-insensitively by name.
///
/// Built once at startup and never mutated. Duplicate names are kept and keep
/// their table order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(mut entries: Vec<CatalogEntry>) -> Self {
        entries.sort_by_cached_key(|e| e.name.to_lowercase());
        Self { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CatalogEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(catalog: &Catalog) -> Vec<&str> {
        catalog.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn sorts_case_insensitively() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("paint", "mspaint.exe"),
            CatalogEntry::new("Notepad", "notepad.exe"),
            CatalogEntry::new("calculator", "calc.exe"),
            CatalogEntry::new("Calendar", "cal"),
        ]);

        assert_eq!(names(&catalog), ["calculator", "Calendar", "Notepad", "paint"]);
    }

    #[test]
    fn keeps_duplicates_in_table_order() {
        let catalog = Catalog::new(vec![
            CatalogEntry::new("Terminal", "gnome-terminal"),
            CatalogEntry::new("Firefox", "firefox"),
            CatalogEntry::new("Terminal", "open -a Terminal"),
        ]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(1).map(|e| e.command.as_str()), Some("gnome-terminal"));
        assert_eq!(catalog.get(2).map(|e| e.command.as_str()), Some("open -a Terminal"));
    }
}
