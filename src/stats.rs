use crate::collections::{group_by, parse_price, GroupKey};
use crate::models::PropertyCard;
use serde::{Deserialize, Serialize};

/// Number of properties in one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Aggregate figures for a property collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyStats {
    pub total: usize,
    pub featured: usize,
    pub min_price: f64,
    pub max_price: f64,
    /// Mean over positive prices only
    pub average_price: f64,
    pub by_type: Vec<CategoryCount>,
    pub by_status: Vec<CategoryCount>,
    pub by_city: Vec<CategoryCount>,
}

/// Compute statistics for `items`.
///
/// Records without a positive, parseable price count towards `total` and
/// `featured` but are left out of the price figures.
pub fn compute_stats<T>(items: &[T]) -> PropertyStats
where
    T: AsRef<PropertyCard> + Clone,
{
    let prices: Vec<f64> = items
        .iter()
        .map(|item| parse_price(&item.as_ref().price))
        .filter(|price| *price > 0.0)
        .collect();

    let (min_price, max_price, average_price) = if prices.is_empty() {
        (0.0, 0.0, 0.0)
    } else {
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let average = prices.iter().sum::<f64>() / prices.len() as f64;
        (min, max, average)
    };

    PropertyStats {
        total: items.len(),
        featured: items.iter().filter(|item| (*item).as_ref().featured).count(),
        min_price,
        max_price,
        average_price,
        by_type: category_counts(items, GroupKey::Type),
        by_status: category_counts(items, GroupKey::Status),
        by_city: category_counts(items, GroupKey::City),
    }
}

fn category_counts<T>(items: &[T], key: GroupKey) -> Vec<CategoryCount>
where
    T: AsRef<PropertyCard> + Clone,
{
    group_by(items, key)
        .into_iter()
        .map(|(category, members)| CategoryCount {
            category,
            count: members.len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::UNCATEGORIZED;
    use crate::normalize::to_card;
    use serde_json::json;

    fn card(price: &str, featured: bool, property_type: Option<&str>) -> PropertyCard {
        let mut card = to_card(
            &serde_json::from_value(json!({
                "id": 1,
                "property_meta": {"property_price": price}
            }))
            .unwrap(),
        );
        card.featured = featured;
        card.property_type = property_type.map(str::to_string);
        card
    }

    #[test]
    fn test_average_excludes_zero_prices() {
        let cards = vec![
            card("100000", false, None),
            card("0", true, None),
            card("300000", false, None),
        ];

        let stats = compute_stats(&cards);

        assert_eq!(stats.total, 3);
        assert_eq!(stats.featured, 1);
        assert_eq!(stats.average_price, 200000.0);
        assert_eq!(stats.min_price, 100000.0);
        assert_eq!(stats.max_price, 300000.0);
    }

    #[test]
    fn test_no_priced_records_yields_zeroes() {
        let cards = vec![card("", false, None), card("Consultar", false, None)];
        let stats = compute_stats(&cards);

        assert_eq!(stats.total, 2);
        assert_eq!(stats.min_price, 0.0);
        assert_eq!(stats.max_price, 0.0);
        assert_eq!(stats.average_price, 0.0);
    }

    #[test]
    fn test_empty_collection() {
        let stats = compute_stats::<PropertyCard>(&[]);
        assert_eq!(stats.total, 0);
        assert!(stats.by_type.is_empty());
    }

    #[test]
    fn test_category_counts_include_uncategorized() {
        let cards = vec![
            card("1", false, Some("Casa")),
            card("2", false, None),
            card("3", false, Some("Casa")),
            card("4", false, Some("Oficina")),
        ];

        let stats = compute_stats(&cards);

        assert_eq!(
            stats.by_type,
            vec![
                CategoryCount { category: "Casa".to_string(), count: 2 },
                CategoryCount { category: "Oficina".to_string(), count: 1 },
                CategoryCount { category: UNCATEGORIZED.to_string(), count: 1 },
            ]
        );
        assert_eq!(
            stats.by_city,
            vec![CategoryCount { category: UNCATEGORIZED.to_string(), count: 4 }]
        );
    }
}
