use crate::model::Catalog;

/// Case-insensitive substring filter over the catalog.
///
/// Returns catalog indices in catalog order. An empty query keeps every entry.
/// Linear in catalog size; fine for a hand-written table, would need an index
/// for anything scanned from disk.
pub fn filter(catalog: &Catalog, query: &str) -> Vec<usize> {
    if query.is_empty() {
        return (0..catalog.len()).collect();
    }

    let needle = query.to_lowercase();
    catalog
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| e.name.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CatalogEntry;

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::new(names.iter().map(|n| CatalogEntry::new(*n, n.to_lowercase())).collect())
    }

    fn shown<'a>(catalog: &'a Catalog, indices: &[usize]) -> Vec<&'a str> {
        indices
            .iter()
            .filter_map(|&i| catalog.get(i))
            .map(|e| e.name.as_str())
            .collect()
    }

    #[test]
    fn matches_substring_in_catalog_order() {
        let c = catalog(&["Calculator", "Calendar", "Notepad"]);

        let result = filter(&c, "cal");

        assert_eq!(shown(&c, &result), ["Calculator", "Calendar"]);
    }

    #[test]
    fn empty_query_returns_whole_catalog() {
        let c = catalog(&["Notepad", "Calendar", "Calculator"]);

        let result = filter(&c, "");

        assert_eq!(result, [0, 1, 2]);
        assert_eq!(shown(&c, &result), ["Calculator", "Calendar", "Notepad"]);
    }

    #[test]
    fn query_case_is_ignored() {
        let c = catalog(&["File Explorer", "Firefox", "Task Manager"]);

        assert_eq!(shown(&c, &filter(&c, "FI")), ["File Explorer", "Firefox"]);
        assert_eq!(shown(&c, &filter(&c, "mAnAgEr")), ["Task Manager"]);
    }

    #[test]
    fn no_match_is_empty() {
        let c = catalog(&["Calculator", "Calendar", "Notepad"]);

        assert!(filter(&c, "zzz").is_empty());
    }

    #[test]
    fn spaces_and_punctuation_are_literal() {
        let c = catalog(&["Files (Nautilus)", "Text Editor (gedit)", "Terminal"]);

        assert_eq!(shown(&c, &filter(&c, "(ged")), ["Text Editor (gedit)"]);
        assert_eq!(shown(&c, &filter(&c, "t e")), ["Text Editor (gedit)"]);
    }

    #[test]
    fn result_is_exactly_the_matching_subsequence() {
        let c = catalog(&[
            "Calculator", "Command Prompt", "Control Panel", "File Explorer",
            "Notepad", "Paint", "Task Manager", "Wordpad",
        ]);

        for query in ["o", "pad", "an", "C", "x", "rol p"] {
            let result = filter(&c, query);
            let expected: Vec<usize> = (0..c.len())
                .filter(|&i| c.entries()[i].name.to_lowercase().contains(&query.to_lowercase()))
                .collect();

            assert_eq!(result, expected, "query {query:?}");
            assert!(result.windows(2).all(|w| w[0] < w[1]), "query {query:?} reordered");
        }
    }

    #[test]
    fn refiltering_a_result_is_stable() {
        let c = catalog(&["Calculator", "Calendar", "Notepad", "Wordpad"]);
        let first = filter(&c, "pad");
        let narrowed = Catalog::new(first.iter().filter_map(|&i| c.get(i).cloned()).collect());

        let second = filter(&narrowed, "pad");

        assert_eq!(shown(&narrowed, &second), shown(&c, &first));
    }

    #[test]
    fn duplicates_are_each_returned() {
        let c = catalog(&["Terminal", "Terminal", "Paint"]);

        assert_eq!(filter(&c, "term"), [0, 1]);
    }
}
