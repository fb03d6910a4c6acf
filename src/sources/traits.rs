use crate::models::{RawProperty, Taxonomy, Term};
use crate::sources::types::CatalogQuery;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for everything that can hand out raw property records
/// (the live CMS, the bundled sample data, test doubles)
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Fetch the property listing
    async fn fetch_properties(&self, query: &CatalogQuery) -> Result<Vec<RawProperty>>;

    /// Fetch a single property by slug
    async fn fetch_property(&self, slug: &str) -> Result<Option<RawProperty>>;

    /// Fetch every term of a taxonomy
    async fn fetch_terms(&self, taxonomy: Taxonomy) -> Result<Vec<Term>>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}
