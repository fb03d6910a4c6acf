use serde::{Deserialize, Serialize};

/// Display projection of a property for listing pages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyCard {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub image: Option<String>,
    /// Price as received from the CMS, never absent (empty when unknown)
    pub price: String,
    pub bedrooms: String,
    pub bathrooms: String,
    /// Area including unit, e.g. "120 m²"
    pub area: String,
    pub address: String,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub status: Option<String>,
    pub city: Option<String>,
    pub link: String,
    pub date: String,
    pub featured: bool,
}

impl AsRef<PropertyCard> for PropertyCard {
    fn as_ref(&self) -> &PropertyCard {
        self
    }
}

/// Full projection of a property for its own page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub card: PropertyCard,
    /// Rendered HTML body
    pub content: String,
    pub lot_size: String,
    pub year_built: String,
    pub external_id: Option<String>,
    pub video_url: Option<String>,
    pub virtual_tour_url: Option<String>,
    pub agent: Option<String>,
    pub gallery: Vec<String>,
    pub features: Vec<String>,
    pub modified: String,
}

impl AsRef<PropertyCard> for PropertyDetail {
    fn as_ref(&self) -> &PropertyCard {
        &self.card
    }
}
