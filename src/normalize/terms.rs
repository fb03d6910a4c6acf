use crate::models::{Taxonomy, Term};
use std::collections::HashMap;

use super::format::html_to_text;

/// Lookup table from taxonomy term ids to display names.
///
/// Used when a record only carries term ids because the response was not
/// requested with `_embed`.
#[derive(Debug, Clone, Default)]
pub struct TermIndex {
    names: HashMap<(Taxonomy, u64), String>,
}

impl TermIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a term; terms without an id or a name are ignored
    pub fn insert(&mut self, taxonomy: Taxonomy, term: &Term) {
        let Some(id) = term.id else { return };
        let name = term.name.as_deref().map(html_to_text).unwrap_or_default();
        if !name.is_empty() {
            self.names.insert((taxonomy, id), name);
        }
    }

    pub fn extend<'a>(&mut self, taxonomy: Taxonomy, terms: impl IntoIterator<Item = &'a Term>) {
        for term in terms {
            self.insert(taxonomy, term);
        }
    }

    pub fn name(&self, taxonomy: Taxonomy, id: u64) -> Option<&str> {
        self.names.get(&(taxonomy, id)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn term(id: Option<u64>, name: Option<&str>) -> Term {
        Term {
            id,
            name: name.map(str::to_string),
            ..Term::default()
        }
    }

    #[test]
    fn test_index_scopes_ids_by_taxonomy() {
        let mut index = TermIndex::new();
        index.insert(Taxonomy::Type, &term(Some(3), Some("Casa")));
        index.insert(Taxonomy::City, &term(Some(3), Some("Valpara&iacute;so")));

        assert_eq!(index.name(Taxonomy::Type, 3), Some("Casa"));
        assert_eq!(index.name(Taxonomy::City, 3), Some("Valparaíso"));
        assert_eq!(index.name(Taxonomy::Status, 3), None);
    }

    #[test]
    fn test_incomplete_terms_skipped() {
        let mut index = TermIndex::new();
        let terms = [term(None, Some("Sin id")), term(Some(1), None), term(Some(2), Some(" "))];
        index.extend(Taxonomy::Feature, &terms);
        assert!(index.is_empty());
    }
}
