pub mod fields;
pub mod format;
pub mod terms;

pub use fields::{explain, FieldChain, FieldReport, Lookup};
pub use format::{format_price, html_to_text};
pub use terms::TermIndex;

use crate::models::{PropertyCard, PropertyDetail, RawProperty, Taxonomy};
use format::{area_with_unit, slugify};
use serde_json::Value;

/// Build a card view from a raw record without term lookups
pub fn to_card(raw: &RawProperty) -> PropertyCard {
    to_card_with_terms(raw, &TermIndex::default())
}

/// Build a card view, resolving bare term ids through `terms`.
///
/// Total over any input: missing or malformed fields get their defaults.
pub fn to_card_with_terms(raw: &RawProperty, terms: &TermIndex) -> PropertyCard {
    let title = html_to_text(raw.rendered_title());
    let id = identifier(raw, terms);
    let slug = slug_for(raw, &title, &id);

    let image = fields::IMAGE
        .resolve(raw, terms)
        .or_else(|| gallery(raw).into_iter().next());

    PropertyCard {
        id,
        title,
        slug,
        excerpt: html_to_text(raw.rendered_excerpt()),
        image,
        price: fields::PRICE.resolve(raw, terms).unwrap_or_default(),
        bedrooms: fields::BEDROOMS
            .resolve(raw, terms)
            .unwrap_or_else(|| "0".to_string()),
        bathrooms: fields::BATHROOMS
            .resolve(raw, terms)
            .unwrap_or_else(|| "0".to_string()),
        area: area_with_unit(&fields::AREA.resolve(raw, terms).unwrap_or_default()),
        address: fields::ADDRESS.resolve(raw, terms).unwrap_or_default(),
        property_type: fields::PROPERTY_TYPE.resolve(raw, terms),
        status: fields::STATUS.resolve(raw, terms),
        city: fields::CITY.resolve(raw, terms),
        link: raw.link.clone().unwrap_or_default(),
        date: raw.date.clone().unwrap_or_default(),
        featured: fields::FEATURED.resolve(raw, terms).as_deref() == Some("1"),
    }
}

/// Build a detail view from a raw record without term lookups
pub fn to_detail(raw: &RawProperty) -> PropertyDetail {
    to_detail_with_terms(raw, &TermIndex::default())
}

/// Build a detail view, resolving bare term ids through `terms`
pub fn to_detail_with_terms(raw: &RawProperty, terms: &TermIndex) -> PropertyDetail {
    PropertyDetail {
        card: to_card_with_terms(raw, terms),
        content: raw.rendered_content().to_string(),
        lot_size: fields::LOT_SIZE.resolve(raw, terms).unwrap_or_default(),
        year_built: fields::YEAR_BUILT.resolve(raw, terms).unwrap_or_default(),
        external_id: fields::EXTERNAL_ID.resolve(raw, terms),
        video_url: fields::VIDEO_URL.resolve(raw, terms),
        virtual_tour_url: fields::VIRTUAL_TOUR_URL.resolve(raw, terms),
        agent: fields::AGENT.resolve(raw, terms),
        gallery: gallery(raw),
        features: feature_names(raw, terms),
        modified: raw.modified.clone().unwrap_or_default(),
    }
}

/// Record id, then external id, then slug, then a fixed placeholder
fn identifier(raw: &RawProperty, terms: &TermIndex) -> String {
    raw.id
        .clone()
        .or_else(|| fields::EXTERNAL_ID.resolve(raw, terms))
        .or_else(|| non_empty(raw.slug.as_deref()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn slug_for(raw: &RawProperty, title: &str, id: &str) -> String {
    non_empty(raw.slug.as_deref())
        .or_else(|| non_empty(Some(slugify(title).as_str())))
        .unwrap_or_else(|| format!("property-{}", slugify(id)))
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Ordered gallery image URLs from whichever bag carries them
fn gallery(raw: &RawProperty) -> Vec<String> {
    let bags = [raw.property_meta.as_ref(), raw.acf.as_ref()];

    for key in fields::GALLERY_KEYS {
        for bag in bags.iter().flatten() {
            if let Some(value) = bag.get(*key) {
                let urls = gallery_urls(value);
                if !urls.is_empty() {
                    return urls;
                }
            }
        }
    }

    Vec::new()
}

/// Accepts URL arrays, arrays of `{url|source_url}` objects, or a comma-separated string
fn gallery_urls(value: &Value) -> Vec<String> {
    let candidates: Vec<String> = match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(url) => Some(url.clone()),
                Value::Object(obj) => ["url", "source_url", "full"]
                    .iter()
                    .find_map(|key| obj.get(*key).and_then(Value::as_str))
                    .map(str::to_string),
                _ => None,
            })
            .collect(),
        Value::String(list) => list.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    };

    // Bare attachment ids can't be displayed
    candidates
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/'))
        .collect()
}

fn feature_names(raw: &RawProperty, terms: &TermIndex) -> Vec<String> {
    let embedded: Vec<String> = raw
        .embedded_terms(Taxonomy::Feature)
        .filter_map(|term| term.name.as_deref())
        .map(html_to_text)
        .filter(|name| !name.is_empty())
        .collect();

    if !embedded.is_empty() {
        return embedded;
    }

    raw.term_ids(Taxonomy::Feature)
        .iter()
        .filter_map(|id| terms.name(Taxonomy::Feature, *id))
        .map(str::to_string)
        .collect()
}
