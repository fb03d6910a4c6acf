use serde::{Deserialize, Serialize};

/// Parameters for a listing request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogQuery {
    /// Records per page (the CMS caps this at 100)
    pub per_page: u32,
    /// Stop after this many pages even if the CMS reports more
    pub max_pages: u32,
    /// Free-text search passed through to the CMS
    pub search: Option<String>,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            per_page: 20,
            max_pages: 10,
            search: None,
        }
    }
}
