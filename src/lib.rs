//! Data shaping for real-estate listings served by a WordPress-style CMS.
//!
//! Raw records are normalized into [`PropertyCard`] / [`PropertyDetail`]
//! view models, then grouped, sorted, filtered and summarized.

pub mod collections;
pub mod config;
pub mod models;
pub mod normalize;
pub mod retry;
pub mod sources;
pub mod stats;

pub use collections::{filter, group_by, parse_price, sort_by, GroupKey, PropertyFilter, SortBy, UNCATEGORIZED};
pub use config::Config;
pub use models::{PropertyCard, PropertyDetail, RawProperty, Taxonomy};
pub use normalize::{to_card, to_card_with_terms, to_detail, to_detail_with_terms, TermIndex};
pub use retry::{with_retry, RetryPolicy};
pub use stats::{compute_stats, CategoryCount, PropertyStats};
