use crate::collections::parse_price;
use crate::models::PropertyCard;
use crate::normalize::format::fold_char;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Ordering applied to a property collection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    PriceAsc,
    PriceDesc,
    /// Newest first
    Date,
    Title,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price-asc" => Ok(SortBy::PriceAsc),
            "price-desc" => Ok(SortBy::PriceDesc),
            "date" => Ok(SortBy::Date),
            "title" => Ok(SortBy::Title),
            other => Err(format!(
                "unknown sort '{}' (expected price-asc, price-desc, date or title)",
                other
            )),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortBy::PriceAsc => "price-asc",
            SortBy::PriceDesc => "price-desc",
            SortBy::Date => "date",
            SortBy::Title => "title",
        };
        f.write_str(name)
    }
}

/// Return a sorted copy of `items`; equal elements keep their input order
pub fn sort_by<T>(items: &[T], by: SortBy) -> Vec<T>
where
    T: AsRef<PropertyCard> + Clone,
{
    let mut sorted = items.to_vec();

    match by {
        SortBy::PriceAsc => sorted.sort_by(|a, b| compare_price(a.as_ref(), b.as_ref())),
        SortBy::PriceDesc => sorted.sort_by(|a, b| compare_price(b.as_ref(), a.as_ref())),
        SortBy::Date => sorted.sort_by_cached_key(|item| std::cmp::Reverse(timestamp(&item.as_ref().date))),
        SortBy::Title => sorted.sort_by(|a, b| compare_title(&a.as_ref().title, &b.as_ref().title)),
    }

    sorted
}

fn compare_price(a: &PropertyCard, b: &PropertyCard) -> Ordering {
    parse_price(&a.price).total_cmp(&parse_price(&b.price))
}

/// Milliseconds since the epoch for the date formats the CMS emits
pub fn timestamp(date: &str) -> Option<i64> {
    let date = date.trim();
    if date.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return Some(parsed.timestamp_millis());
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(date, format) {
            return Some(parsed.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}

/// Case- and accent-insensitive comparison, ties broken by the raw text
fn compare_title(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().map(fold_char);
    let folded_b = b.chars().map(fold_char);
    folded_a.cmp(folded_b).then_with(|| a.cmp(b))
}
