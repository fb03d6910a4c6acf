use crate::models::{RawProperty, Taxonomy, Term};
use crate::retry::{with_retry, RetryPolicy};
use crate::sources::traits::PropertySource;
use crate::sources::types::CatalogQuery;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

const PROPERTIES_ROUTE: &str = "wp-json/wp/v2/properties";
const TERMS_PER_PAGE: u32 = 100;
const TERMS_MAX_PAGES: u32 = 20;

/// Property source backed by the WordPress REST API
pub struct WordPressSource {
    client: Client,
    base_url: String,
    retry: RetryPolicy,
}

impl WordPressSource {
    /// Create a source with a 30s timeout and the default retry policy
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_settings(base_url, Duration::from_secs(30), RetryPolicy::default())
    }

    /// Create a source with a custom timeout and retry policy
    pub fn with_settings(base_url: &str, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("property-catalog/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry,
        })
    }

    fn endpoint(&self, route: &str, params: &[(&str, String)]) -> Result<Url> {
        let url = format!("{}/{}", self.base_url, route);
        Url::parse_with_params(&url, params).with_context(|| format!("Invalid CMS URL: {}", url))
    }

    /// One GET, returning the JSON body and the reported page count
    async fn request_json(&self, url: &Url) -> Result<(Value, Option<u32>)> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .context("Failed to reach CMS")?;

        if !response.status().is_success() {
            warn!("CMS returned status: {}", response.status());
            anyhow::bail!("CMS request to {} failed: {}", url, response.status());
        }

        let total_pages = response
            .headers()
            .get("x-wp-totalpages")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());

        let body = response
            .json::<Value>()
            .await
            .context("Failed to decode CMS response")?;

        Ok((body, total_pages))
    }

    /// Walk a paginated collection route, collecting every array entry
    async fn fetch_collection(
        &self,
        route: &str,
        params: &[(&str, String)],
        per_page: u32,
        max_pages: u32,
    ) -> Result<Vec<Value>> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let mut page_params = params.to_vec();
            page_params.push(("per_page", per_page.to_string()));
            page_params.push(("page", page.to_string()));
            let url = self.endpoint(route, &page_params)?;

            let url = &url;
            let (body, total_pages) =
                with_retry(self.retry, move || async move { self.request_json(url).await }).await?;

            let batch = match body {
                Value::Array(batch) => batch,
                other => {
                    warn!("Expected a JSON array from {}, got {}", route, type_name(&other));
                    Vec::new()
                }
            };
            let batch_len = batch.len();
            items.extend(batch);

            let more = match total_pages {
                Some(total) => page < total,
                None => batch_len as u32 >= per_page,
            };
            if !more || batch_len == 0 || page >= max_pages {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

/// Deserialize every object entry, skipping anything that isn't one
fn parse_entries<T: DeserializeOwned>(entries: Vec<Value>, what: &str) -> Vec<T> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| {
            if !entry.is_object() {
                warn!("Skipping {} entry {}: not an object ({})", what, idx, type_name(&entry));
                return None;
            }
            match serde_json::from_value(entry) {
                Ok(parsed) => Some(parsed),
                Err(err) => {
                    warn!("Skipping {} entry {}: {}", what, idx, err);
                    None
                }
            }
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl PropertySource for WordPressSource {
    async fn fetch_properties(&self, query: &CatalogQuery) -> Result<Vec<RawProperty>> {
        info!("Fetching properties from {}", self.base_url);

        let mut params = vec![("_embed", "1".to_string())];
        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            params.push(("search", search.trim().to_string()));
        }

        let entries = self
            .fetch_collection(PROPERTIES_ROUTE, &params, query.per_page.clamp(1, 100), query.max_pages.max(1))
            .await?;
        let properties: Vec<RawProperty> = parse_entries(entries, "property");

        info!("✅ Fetched {} properties", properties.len());
        Ok(properties)
    }

    async fn fetch_property(&self, slug: &str) -> Result<Option<RawProperty>> {
        let params = [("_embed", "1".to_string()), ("slug", slug.to_string())];
        let url = self.endpoint(PROPERTIES_ROUTE, &params)?;

        let url = &url;
        let (body, _) = with_retry(self.retry, move || async move { self.request_json(url).await }).await?;

        let entries = match body {
            Value::Array(entries) => entries,
            other => vec![other],
        };
        let property = parse_entries::<RawProperty>(entries, "property").into_iter().next();

        if property.is_none() {
            info!("No property found for slug '{}'", slug);
        }
        Ok(property)
    }

    async fn fetch_terms(&self, taxonomy: Taxonomy) -> Result<Vec<Term>> {
        let route = format!("wp-json/wp/v2/{}", taxonomy.rest_base());
        let entries = self
            .fetch_collection(&route, &[], TERMS_PER_PAGE, TERMS_MAX_PAGES)
            .await?;
        let terms: Vec<Term> = parse_entries(entries, taxonomy.rest_base());

        debug!("Fetched {} {} terms", terms.len(), taxonomy.rest_base());
        Ok(terms)
    }

    fn source_name(&self) -> &'static str {
        "WordPress"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer, attempts: u32) -> WordPressSource {
        WordPressSource::with_settings(
            &format!("{}/", server.uri()),
            Duration::from_secs(5),
            RetryPolicy::new(attempts, Duration::from_millis(5)),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_properties_follows_total_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/properties"))
            .and(query_param("page", "1"))
            .and(query_param("_embed", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-WP-TotalPages", "2")
                    .set_body_json(json!([{"id": 1, "slug": "uno"}, {"id": 2, "slug": "dos"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/properties"))
            .and(query_param("page", "2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-WP-TotalPages", "2")
                    .set_body_json(json!([{"id": 3, "slug": "tres"}, "garbage"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let query = CatalogQuery {
            per_page: 2,
            ..Default::default()
        };
        let properties = source(&server, 1).fetch_properties(&query).await.unwrap();

        let slugs: Vec<_> = properties.iter().filter_map(|p| p.slug.as_deref()).collect();
        assert_eq!(slugs, vec!["uno", "dos", "tres"]);
    }

    #[tokio::test]
    async fn test_max_pages_caps_pagination() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/properties"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-WP-TotalPages", "50")
                    .set_body_json(json!([{"id": 1}])),
            )
            .expect(3)
            .mount(&server)
            .await;

        let query = CatalogQuery {
            per_page: 1,
            max_pages: 3,
            search: None,
        };
        let properties = source(&server, 1).fetch_properties(&query).await.unwrap();
        assert_eq!(properties.len(), 3);
    }

    #[tokio::test]
    async fn test_search_is_forwarded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/properties"))
            .and(query_param("search", "vista mar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 8}])))
            .expect(1)
            .mount(&server)
            .await;

        let query = CatalogQuery {
            search: Some(" vista mar ".to_string()),
            ..Default::default()
        };
        let properties = source(&server, 1).fetch_properties(&query).await.unwrap();
        assert_eq!(properties.len(), 1);
    }

    #[tokio::test]
    async fn test_server_error_is_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/properties"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/properties"))
            .and(query_param("slug", "casa-azul"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 5, "slug": "casa-azul"}])))
            .expect(1)
            .mount(&server)
            .await;

        let property = source(&server, 3).fetch_property("casa-azul").await.unwrap();
        assert_eq!(property.unwrap().id.as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_error_surfaces_after_attempts_exhausted() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/properties"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let err = source(&server, 2).fetch_property("x").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_unknown_slug_is_none() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/properties"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        assert!(source(&server, 1).fetch_property("nada").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_terms_uses_taxonomy_route() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/wp-json/wp/v2/property_city"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 30, "name": "Vi&ntilde;a del Mar", "slug": "vina-del-mar", "taxonomy": "property_city"},
                {"id": 31, "name": "Quilpué", "slug": "quilpue", "taxonomy": "property_city"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let terms = source(&server, 1).fetch_terms(Taxonomy::City).await.unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(terms[1].name.as_deref(), Some("Quilpué"));
    }
}
