use crate::collections::{parse_count, parse_price};
use crate::models::PropertyCard;
use serde::{Deserialize, Serialize};

/// AND-combined predicates over a property collection.
///
/// Unset fields (and empty strings) impose no restriction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PropertyFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_bedrooms: Option<f64>,
    pub max_bedrooms: Option<f64>,
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub city: Option<String>,
    /// Case-insensitive substring over title or address
    pub search: Option<String>,
}

impl PropertyFilter {
    /// True when no predicate is set
    pub fn is_empty(&self) -> bool {
        self.min_price.is_none()
            && self.max_price.is_none()
            && self.min_bedrooms.is_none()
            && self.max_bedrooms.is_none()
            && active(&self.property_type).is_none()
            && active(&self.status).is_none()
            && active(&self.city).is_none()
            && active(&self.search).is_none()
    }

    pub fn matches(&self, card: &PropertyCard) -> bool {
        let price = parse_price(&card.price);
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        let bedrooms = parse_count(&card.bedrooms);
        if self.min_bedrooms.is_some_and(|min| bedrooms < min) {
            return false;
        }
        if self.max_bedrooms.is_some_and(|max| bedrooms > max) {
            return false;
        }

        if !exact(&self.property_type, &card.property_type)
            || !exact(&self.status, &card.status)
            || !exact(&self.city, &card.city)
        {
            return false;
        }

        match active(&self.search) {
            Some(query) => {
                let query = query.to_lowercase();
                card.title.to_lowercase().contains(&query)
                    || card.address.to_lowercase().contains(&query)
            }
            None => true,
        }
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn exact(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match active(wanted) {
        Some(wanted) => actual.as_deref() == Some(wanted),
        None => true,
    }
}

/// Return the items matching every predicate in `filter`, in input order
pub fn filter<T>(items: &[T], filter: &PropertyFilter) -> Vec<T>
where
    T: AsRef<PropertyCard> + Clone,
{
    items
        .iter()
        .filter(|item| filter.matches((*item).as_ref()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::to_card;
    use serde_json::json;

    fn card(id: u64, price: &str, bedrooms: &str) -> PropertyCard {
        to_card(
            &serde_json::from_value(json!({
                "id": id,
                "property_meta": {"property_price": price, "property_bedrooms": bedrooms}
            }))
            .unwrap(),
        )
    }

    fn ids(cards: &[PropertyCard]) -> Vec<&str> {
        cards.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_price_range() {
        let cards = vec![card(1, "50000", "1"), card(2, "150000", "2"), card(3, "250000", "3")];
        let criteria = PropertyFilter {
            min_price: Some(100000.0),
            max_price: Some(200000.0),
            ..Default::default()
        };

        assert_eq!(ids(&filter(&cards, &criteria)), vec!["2"]);
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let cards = vec![card(1, "", ""), card(2, "x", "y")];
        let criteria = PropertyFilter {
            search: Some(String::new()),
            city: Some(String::new()),
            ..Default::default()
        };

        assert!(criteria.is_empty());
        assert_eq!(filter(&cards, &criteria).len(), 2);
    }

    #[test]
    fn test_bedroom_bounds_tolerate_junk() {
        let cards = vec![card(1, "", "1"), card(2, "", "3+"), card(3, "", "muchos"), card(4, "", "5")];

        let at_least_two = PropertyFilter {
            min_bedrooms: Some(2.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&cards, &at_least_two)), vec!["2", "4"]);

        let at_most_three = PropertyFilter {
            max_bedrooms: Some(3.0),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&cards, &at_most_three)), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_exact_match_on_categories() {
        let mut house = card(1, "", "");
        house.property_type = Some("Casa".to_string());
        house.city = Some("Santiago".to_string());
        let mut flat = card(2, "", "");
        flat.property_type = Some("Departamento".to_string());
        flat.city = Some("Santiago".to_string());
        let unknown = card(3, "", "");

        let cards = vec![house, flat, unknown];
        let criteria = PropertyFilter {
            property_type: Some("Casa".to_string()),
            city: Some("Santiago".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&cards, &criteria)), vec!["1"]);

        let lowercase = PropertyFilter {
            property_type: Some("casa".to_string()),
            ..Default::default()
        };
        assert!(filter(&cards, &lowercase).is_empty());
    }

    #[test]
    fn test_search_matches_title_or_address() {
        let mut by_title = card(1, "", "");
        by_title.title = "Casa en La Reina".to_string();
        let mut by_address = card(2, "", "");
        by_address.address = "Calle REINA Victoria 12".to_string();
        let other = card(3, "", "");

        let cards = vec![by_title, by_address, other];
        let criteria = PropertyFilter {
            search: Some("reina".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(&filter(&cards, &criteria)), vec!["1", "2"]);
    }
}
