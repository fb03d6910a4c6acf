use crate::models::PropertyCard;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Bucket for records whose grouping field is empty or absent
pub const UNCATEGORIZED: &str = "sin-categoria";

/// Card field to group a collection by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Type,
    Status,
    City,
    Bedrooms,
    Bathrooms,
}

impl GroupKey {
    /// The card's value for this key; empty values count as absent
    pub fn value<'a>(&self, card: &'a PropertyCard) -> Option<&'a str> {
        let value = match self {
            GroupKey::Type => card.property_type.as_deref(),
            GroupKey::Status => card.status.as_deref(),
            GroupKey::City => card.city.as_deref(),
            GroupKey::Bedrooms => Some(card.bedrooms.as_str()),
            GroupKey::Bathrooms => Some(card.bathrooms.as_str()),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "type" => Ok(GroupKey::Type),
            "status" => Ok(GroupKey::Status),
            "city" => Ok(GroupKey::City),
            "bedrooms" => Ok(GroupKey::Bedrooms),
            "bathrooms" => Ok(GroupKey::Bathrooms),
            other => Err(format!(
                "unknown group key '{}' (expected type, status, city, bedrooms or bathrooms)",
                other
            )),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GroupKey::Type => "type",
            GroupKey::Status => "status",
            GroupKey::City => "city",
            GroupKey::Bedrooms => "bedrooms",
            GroupKey::Bathrooms => "bathrooms",
        };
        f.write_str(name)
    }
}

/// Partition `items` by `key`, preserving input order inside each bucket
pub fn group_by<T>(items: &[T], key: GroupKey) -> BTreeMap<String, Vec<T>>
where
    T: AsRef<PropertyCard> + Clone,
{
    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();

    for item in items {
        let bucket = key.value(item.as_ref()).unwrap_or(UNCATEGORIZED);
        groups.entry(bucket.to_string()).or_default().push(item.clone());
    }

    groups
}
