use crate::models::{RawProperty, Taxonomy, Term};
use crate::sources::traits::PropertySource;
use crate::sources::types::CatalogQuery;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

/// In-memory source with a handful of representative listings.
///
/// The records deliberately mix the shapes the CMS produces: embedded terms,
/// bare term ids, meta vs ACF fields, missing bags.
pub struct SampleSource {
    properties: Vec<RawProperty>,
}

impl SampleSource {
    pub fn new() -> Result<Self> {
        let properties = sample_records()
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<RawProperty>, _>>()
            .context("Failed to parse sample records")?;

        Ok(Self { properties })
    }

    /// Source over caller-provided records
    pub fn from_records(properties: Vec<RawProperty>) -> Self {
        Self { properties }
    }
}

#[async_trait]
impl PropertySource for SampleSource {
    async fn fetch_properties(&self, query: &CatalogQuery) -> Result<Vec<RawProperty>> {
        info!("📋 Serving {} sample properties", self.properties.len());

        let limit = query.per_page.max(1).saturating_mul(query.max_pages.max(1)) as usize;
        let search = query
            .search
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        Ok(self
            .properties
            .iter()
            .filter(|p| match &search {
                Some(needle) => p.rendered_title().to_lowercase().contains(needle),
                None => true,
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn fetch_property(&self, slug: &str) -> Result<Option<RawProperty>> {
        Ok(self
            .properties
            .iter()
            .find(|p| p.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn fetch_terms(&self, taxonomy: Taxonomy) -> Result<Vec<Term>> {
        let terms = sample_terms()
            .into_iter()
            .filter(|(t, _, _)| *t == taxonomy)
            .map(|(t, id, name)| Term {
                id: Some(id),
                name: Some(name.to_string()),
                slug: None,
                taxonomy: Some(t.rest_base().to_string()),
            })
            .collect();
        Ok(terms)
    }

    fn source_name(&self) -> &'static str {
        "Sample"
    }
}

fn sample_terms() -> Vec<(Taxonomy, u64, &'static str)> {
    vec![
        (Taxonomy::Type, 11, "Casa"),
        (Taxonomy::Type, 12, "Departamento"),
        (Taxonomy::Type, 13, "Oficina"),
        (Taxonomy::Status, 21, "En venta"),
        (Taxonomy::Status, 22, "En arriendo"),
        (Taxonomy::Feature, 31, "Piscina"),
        (Taxonomy::Feature, 32, "Estacionamiento"),
        (Taxonomy::Feature, 33, "Bodega"),
        (Taxonomy::City, 41, "Santiago"),
        (Taxonomy::City, 42, "Viña del Mar"),
    ]
}

fn sample_records() -> Vec<Value> {
    vec![
        json!({
            "id": 101,
            "slug": "casa-la-dehesa",
            "date": "2024-04-18T11:20:00",
            "modified": "2024-05-02T09:00:00",
            "link": "https://inmobiliaria.example.com/propiedad/casa-la-dehesa/",
            "title": {"rendered": "Casa en La Dehesa"},
            "excerpt": {"rendered": "<p>Amplia casa familiar con jard&iacute;n y piscina.</p>\n"},
            "content": {"rendered": "<p>Amplia casa familiar con jardín, piscina y quincho.</p>"},
            "property_meta": {
                "property_price": "$485,000,000",
                "property_bedrooms": "5",
                "property_bathrooms": "4",
                "property_area": "320",
                "property_lot_size": "1200",
                "property_year_built": "2009",
                "property_address": "Camino La Dehesa 2150",
                "property_featured": "1",
                "property_gallery": [
                    {"url": "https://cdn.example.com/dehesa/1.jpg"},
                    {"url": "https://cdn.example.com/dehesa/2.jpg"}
                ]
            },
            "acf": false,
            "_embedded": {
                "wp:featuredmedia": [{"source_url": "https://cdn.example.com/dehesa/portada.jpg"}],
                "wp:term": [
                    [{"id": 11, "name": "Casa", "taxonomy": "property_type"}],
                    [{"id": 21, "name": "En venta", "taxonomy": "property_status"}],
                    [
                        {"id": 31, "name": "Piscina", "taxonomy": "property_feature"},
                        {"id": 32, "name": "Estacionamiento", "taxonomy": "property_feature"}
                    ],
                    [{"id": 41, "name": "Santiago", "taxonomy": "property_city"}]
                ]
            }
        }),
        json!({
            "id": 102,
            "slug": "depto-providencia",
            "date": "2024-06-03T15:45:00",
            "link": "https://inmobiliaria.example.com/propiedad/depto-providencia/",
            "title": {"rendered": "Departamento &#8211; Providencia"},
            "excerpt": {"rendered": "<p>A pasos del metro.</p>"},
            "content": {"rendered": "<p>Departamento luminoso a pasos del metro Los Leones.</p>"},
            "property_meta": {
                "property_price": "185000000",
                "property_bedrooms": 2,
                "property_bathrooms": 2,
                "property_area": "68",
                "property_address": "Av. Providencia 2330, depto 1204",
                "property_featured": "0",
                "property_id": "PRV-1204"
            },
            "property_type": [12],
            "property_status": [21],
            "property_feature": [32, 33],
            "property_city": [41]
        }),
        json!({
            "id": 103,
            "slug": "depto-vina-costa",
            "date": "2023-11-20T08:00:00",
            "link": "https://inmobiliaria.example.com/propiedad/depto-vina-costa/",
            "title": {"rendered": "Departamento vista al mar"},
            "excerpt": {"rendered": "<p>Frente a la playa.</p>"},
            "property_meta": {"property_featured": "1"},
            "acf": {
                "price": "950000",
                "bedrooms": "3",
                "bathrooms": "2",
                "area": "110 m2",
                "address": "Av. Perú 550",
                "property_virtual_tour": "https://tour.example.com/vina-550",
                "gallery": "https://cdn.example.com/vina/1.jpg,https://cdn.example.com/vina/2.jpg"
            },
            "property_type": [12],
            "property_status": [22],
            "property_city": [42]
        }),
        json!({
            "id": 104,
            "slug": "oficina-centro",
            "date": "2024-01-09T10:10:00",
            "link": "https://inmobiliaria.example.com/propiedad/oficina-centro/",
            "title": {"rendered": "Oficina en el centro"},
            "excerpt": {"rendered": ""},
            "property_meta": {
                "property_price": "Consultar",
                "property_area": "45",
                "property_address": "Huérfanos 1160, of. 803"
            },
            "property_type": [13]
        }),
        json!({
            "id": 105,
            "slug": "terreno-sin-datos",
            "date": "2022-08-30T12:00:00",
            "title": {"rendered": "Terreno"}
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sample_records_parse() {
        let source = SampleSource::new().unwrap();
        let all = source.fetch_properties(&CatalogQuery::default()).await.unwrap();
        assert_eq!(all.len(), 5);
    }

    #[tokio::test]
    async fn test_search_and_limit() {
        let source = SampleSource::new().unwrap();

        let query = CatalogQuery {
            search: Some("departamento".to_string()),
            ..Default::default()
        };
        assert_eq!(source.fetch_properties(&query).await.unwrap().len(), 2);

        let limited = CatalogQuery {
            per_page: 2,
            max_pages: 1,
            search: None,
        };
        assert_eq!(source.fetch_properties(&limited).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_huge_page_settings_do_not_overflow() {
        let source = SampleSource::new().unwrap();
        let query = CatalogQuery {
            per_page: u32::MAX,
            max_pages: u32::MAX,
            search: None,
        };
        assert_eq!(source.fetch_properties(&query).await.unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_fetch_by_slug_and_terms() {
        let source = SampleSource::new().unwrap();

        let found = source.fetch_property("oficina-centro").await.unwrap();
        assert_eq!(found.unwrap().id.as_deref(), Some("104"));
        assert!(source.fetch_property("missing").await.unwrap().is_none());

        let cities = source.fetch_terms(Taxonomy::City).await.unwrap();
        assert_eq!(cities.len(), 2);
    }
}
