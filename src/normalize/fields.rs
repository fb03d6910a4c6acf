//! Ordered fallback chains for every view-model field.
//!
//! The CMS has shipped the same value under several names over time. Each
//! chain lists the places a field may live, in priority order; the first
//! non-empty value wins.

use crate::models::{RawProperty, Taxonomy};
use serde::Serialize;
use std::fmt;

use super::format::html_to_text;
use super::terms::TermIndex;

/// One place a field value may be read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Key in the `property_meta` bag
    Meta(&'static str),
    /// Key in the `acf` bag
    Acf(&'static str),
    /// First embedded term of a taxonomy
    EmbeddedTerm(Taxonomy),
    /// First term id of a taxonomy that resolves through a [`TermIndex`]
    TermId(Taxonomy),
    /// Embedded featured media
    FeaturedMedia,
}

impl Lookup {
    pub fn get(&self, raw: &RawProperty, terms: &TermIndex) -> Option<String> {
        let value = match *self {
            Lookup::Meta(key) => raw.meta(key),
            Lookup::Acf(key) => raw.acf(key),
            Lookup::EmbeddedTerm(taxonomy) => raw
                .embedded_terms(taxonomy)
                .filter_map(|term| term.name.as_deref())
                .map(html_to_text)
                .find(|name| !name.is_empty()),
            Lookup::TermId(taxonomy) => raw
                .term_ids(taxonomy)
                .iter()
                .find_map(|id| terms.name(taxonomy, *id))
                .map(str::to_string),
            Lookup::FeaturedMedia => raw.featured_image().map(str::to_string),
        };

        value.filter(|v| !v.trim().is_empty())
    }
}

impl fmt::Display for Lookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Meta(key) => write!(f, "property_meta.{}", key),
            Lookup::Acf(key) => write!(f, "acf.{}", key),
            Lookup::EmbeddedTerm(taxonomy) => write!(f, "_embedded.wp:term[{}]", taxonomy.rest_base()),
            Lookup::TermId(taxonomy) => write!(f, "{}[id]", taxonomy.rest_base()),
            Lookup::FeaturedMedia => write!(f, "_embedded.wp:featuredmedia"),
        }
    }
}

/// Named, ordered list of lookups for a single field
#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    pub field: &'static str,
    pub lookups: &'static [Lookup],
}

impl FieldChain {
    pub fn resolve(&self, raw: &RawProperty, terms: &TermIndex) -> Option<String> {
        self.resolve_with_source(raw, terms).map(|(_, value)| value)
    }

    /// Resolve and report which lookup produced the value
    pub fn resolve_with_source(&self, raw: &RawProperty, terms: &TermIndex) -> Option<(Lookup, String)> {
        self.lookups
            .iter()
            .find_map(|lookup| lookup.get(raw, terms).map(|value| (*lookup, value)))
    }
}

use Lookup::{Acf, EmbeddedTerm, FeaturedMedia, Meta, TermId};

pub const PRICE: FieldChain = FieldChain {
    field: "price",
    lookups: &[Meta("property_price"), Meta("price"), Acf("property_price"), Acf("price")],
};

pub const BEDROOMS: FieldChain = FieldChain {
    field: "bedrooms",
    lookups: &[
        Meta("property_bedrooms"),
        Meta("bedrooms"),
        Acf("property_bedrooms"),
        Acf("bedrooms"),
    ],
};

pub const BATHROOMS: FieldChain = FieldChain {
    field: "bathrooms",
    lookups: &[
        Meta("property_bathrooms"),
        Meta("bathrooms"),
        Acf("property_bathrooms"),
        Acf("bathrooms"),
    ],
};

pub const AREA: FieldChain = FieldChain {
    field: "area",
    lookups: &[
        Meta("property_area"),
        Meta("property_size"),
        Meta("area"),
        Acf("property_area"),
        Acf("area"),
    ],
};

pub const ADDRESS: FieldChain = FieldChain {
    field: "address",
    lookups: &[
        Meta("property_address"),
        Meta("address"),
        Acf("property_address"),
        Acf("address"),
    ],
};

pub const FEATURED: FieldChain = FieldChain {
    field: "featured",
    lookups: &[Meta("property_featured"), Meta("featured"), Acf("property_featured")],
};

pub const IMAGE: FieldChain = FieldChain {
    field: "image",
    lookups: &[FeaturedMedia, Meta("property_image"), Acf("property_image")],
};

pub const PROPERTY_TYPE: FieldChain = FieldChain {
    field: "type",
    lookups: &[EmbeddedTerm(Taxonomy::Type), TermId(Taxonomy::Type)],
};

pub const STATUS: FieldChain = FieldChain {
    field: "status",
    lookups: &[EmbeddedTerm(Taxonomy::Status), TermId(Taxonomy::Status)],
};

pub const CITY: FieldChain = FieldChain {
    field: "city",
    lookups: &[
        EmbeddedTerm(Taxonomy::City),
        TermId(Taxonomy::City),
        Meta("property_city"),
        Acf("property_city"),
    ],
};

pub const EXTERNAL_ID: FieldChain = FieldChain {
    field: "external_id",
    lookups: &[Meta("property_id"), Meta("property_mls"), Acf("property_id")],
};

pub const LOT_SIZE: FieldChain = FieldChain {
    field: "lot_size",
    lookups: &[Meta("property_lot_size"), Meta("lot_size"), Acf("property_lot_size")],
};

pub const YEAR_BUILT: FieldChain = FieldChain {
    field: "year_built",
    lookups: &[
        Meta("property_year_built"),
        Meta("year_built"),
        Acf("property_year_built"),
    ],
};

pub const VIDEO_URL: FieldChain = FieldChain {
    field: "video_url",
    lookups: &[Meta("property_video_url"), Meta("property_video"), Acf("property_video")],
};

pub const VIRTUAL_TOUR_URL: FieldChain = FieldChain {
    field: "virtual_tour_url",
    lookups: &[Meta("property_virtual_tour"), Acf("property_virtual_tour")],
};

pub const AGENT: FieldChain = FieldChain {
    field: "agent",
    lookups: &[
        Meta("property_agent"),
        Meta("agent"),
        Acf("property_agent"),
        Acf("agent"),
    ],
};

/// Keys that may hold the gallery, checked in both bags
pub const GALLERY_KEYS: &[&str] = &["property_gallery", "gallery"];

pub const ALL: &[FieldChain] = &[
    PRICE,
    BEDROOMS,
    BATHROOMS,
    AREA,
    ADDRESS,
    FEATURED,
    IMAGE,
    PROPERTY_TYPE,
    STATUS,
    CITY,
    EXTERNAL_ID,
    LOT_SIZE,
    YEAR_BUILT,
    VIDEO_URL,
    VIRTUAL_TOUR_URL,
    AGENT,
];

/// Where a field was found in a record, if anywhere
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldReport {
    pub field: &'static str,
    pub source: Option<String>,
    pub value: Option<String>,
}

/// Resolve every chain against `raw` and report provenance
pub fn explain(raw: &RawProperty, terms: &TermIndex) -> Vec<FieldReport> {
    ALL.iter()
        .map(|chain| match chain.resolve_with_source(raw, terms) {
            Some((lookup, value)) => FieldReport {
                field: chain.field,
                source: Some(lookup.to_string()),
                value: Some(value),
            },
            None => FieldReport {
                field: chain.field,
                source: None,
                value: None,
            },
        })
        .collect()
}
