pub mod de;
pub mod view;

pub use view::{PropertyCard, PropertyDetail};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Loosely-typed metadata bag attached to a property record
pub type MetaBag = Map<String, Value>;

/// Taxonomies a property can be tagged with
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Taxonomy {
    Type,
    Status,
    Feature,
    City,
}

impl Taxonomy {
    pub const ALL: [Taxonomy; 4] = [
        Taxonomy::Type,
        Taxonomy::Status,
        Taxonomy::Feature,
        Taxonomy::City,
    ];

    /// REST route / taxonomy slug used by the CMS
    pub fn rest_base(&self) -> &'static str {
        match self {
            Taxonomy::Type => "property_type",
            Taxonomy::Status => "property_status",
            Taxonomy::Feature => "property_feature",
            Taxonomy::City => "property_city",
        }
    }
}

/// A `{"rendered": "..."}` text field
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(from = "RenderedRepr")]
pub struct Rendered {
    pub rendered: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RenderedRepr {
    Wrapped { rendered: String },
    Bare(String),
}

impl From<RenderedRepr> for Rendered {
    fn from(repr: RenderedRepr) -> Self {
        match repr {
            RenderedRepr::Wrapped { rendered } | RenderedRepr::Bare(rendered) => Self { rendered },
        }
    }
}

/// Taxonomy term as returned by the CMS (embedded or from a taxonomy route)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Term {
    #[serde(default, deserialize_with = "de::id_number")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub taxonomy: Option<String>,
}

/// One rendition of a media item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaSize {
    #[serde(default, deserialize_with = "de::lenient")]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaDetails {
    #[serde(default, deserialize_with = "de::lenient")]
    pub sizes: BTreeMap<String, MediaSize>,
}

/// Embedded featured media item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Media {
    #[serde(default, deserialize_with = "de::id_number")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub media_details: Option<MediaDetails>,
}

impl Media {
    /// Preferred display URL: the large rendition, else the original upload
    pub fn display_url(&self) -> Option<&str> {
        let large = self
            .media_details
            .as_ref()
            .and_then(|details| details.sizes.get("large"))
            .and_then(|size| size.source_url.as_deref());

        large
            .into_iter()
            .chain(self.source_url.as_deref())
            .map(str::trim)
            .find(|url| !url.is_empty())
    }
}

/// Data embedded in the response when requested with `_embed`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(rename = "wp:featuredmedia", default, deserialize_with = "de::lenient")]
    pub featured_media: Vec<Media>,
    #[serde(rename = "wp:term", default, deserialize_with = "de::lenient")]
    pub terms: Vec<Vec<Term>>,
}

/// Unprocessed property record as returned by the content API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProperty {
    #[serde(default, deserialize_with = "de::id_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub modified: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub title: Option<Rendered>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub excerpt: Option<Rendered>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub content: Option<Rendered>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub property_meta: Option<MetaBag>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub acf: Option<MetaBag>,
    #[serde(default, deserialize_with = "de::term_ids")]
    pub property_type: Vec<u64>,
    #[serde(default, deserialize_with = "de::term_ids")]
    pub property_status: Vec<u64>,
    #[serde(default, deserialize_with = "de::term_ids")]
    pub property_feature: Vec<u64>,
    #[serde(default, deserialize_with = "de::term_ids")]
    pub property_city: Vec<u64>,
    #[serde(rename = "_embedded", default, deserialize_with = "de::lenient")]
    pub embedded: Option<Embedded>,
}

impl RawProperty {
    /// Value from the `property_meta` bag, coerced to a string
    pub fn meta(&self, key: &str) -> Option<String> {
        self.property_meta
            .as_ref()
            .and_then(|bag| bag.get(key))
            .and_then(de::scalar_to_string)
    }

    /// Value from the `acf` bag, coerced to a string
    pub fn acf(&self, key: &str) -> Option<String> {
        self.acf
            .as_ref()
            .and_then(|bag| bag.get(key))
            .and_then(de::scalar_to_string)
    }

    /// Raw value from either bag, meta first
    pub fn raw_field(&self, key: &str) -> Option<&Value> {
        [self.property_meta.as_ref(), self.acf.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|bag| bag.get(key))
    }

    /// Embedded terms belonging to `taxonomy`
    pub fn embedded_terms(&self, taxonomy: Taxonomy) -> impl Iterator<Item = &Term> {
        self.embedded
            .iter()
            .flat_map(|embedded| embedded.terms.iter())
            .flatten()
            .filter(move |term| term.taxonomy.as_deref() == Some(taxonomy.rest_base()))
    }

    /// Term ids the record references for `taxonomy`
    pub fn term_ids(&self, taxonomy: Taxonomy) -> &[u64] {
        match taxonomy {
            Taxonomy::Type => &self.property_type,
            Taxonomy::Status => &self.property_status,
            Taxonomy::Feature => &self.property_feature,
            Taxonomy::City => &self.property_city,
        }
    }

    /// URL of the embedded featured image, if any
    pub fn featured_image(&self) -> Option<&str> {
        self.embedded
            .as_ref()
            .and_then(|embedded| embedded.featured_media.first())
            .and_then(Media::display_url)
    }

    pub fn rendered_title(&self) -> &str {
        self.title.as_ref().map(|t| t.rendered.as_str()).unwrap_or("")
    }

    pub fn rendered_excerpt(&self) -> &str {
        self.excerpt.as_ref().map(|t| t.rendered.as_str()).unwrap_or("")
    }

    pub fn rendered_content(&self) -> &str {
        self.content.as_ref().map(|t| t.rendered.as_str()).unwrap_or("")
    }
}
