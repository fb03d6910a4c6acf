pub mod sample;
pub mod traits;
pub mod types;
pub mod wordpress;

pub use sample::SampleSource;
pub use traits::PropertySource;
pub use types::CatalogQuery;
pub use wordpress::WordPressSource;

use crate::models::Taxonomy;
use crate::normalize::TermIndex;
use tracing::{debug, warn};

/// Fetch every taxonomy into a [`TermIndex`].
///
/// A taxonomy whose route fails is logged and left out; records then fall
/// back to embedded terms or stay unresolved.
pub async fn load_term_index(source: &dyn PropertySource) -> TermIndex {
    let mut index = TermIndex::new();

    for taxonomy in Taxonomy::ALL {
        match source.fetch_terms(taxonomy).await {
            Ok(terms) => index.extend(taxonomy, &terms),
            Err(err) => warn!("Could not load {} terms: {:#}", taxonomy.rest_base(), err),
        }
    }

    debug!("Term index holds {} terms", index.len());
    index
}
