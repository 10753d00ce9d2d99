//! Turns alias-resolved source records into canonical listings.
//!
//! Applies the publication gate (only active, web-published listings are
//! searchable), derives amenity flags and runs the price normalizer.

use std::collections::BTreeMap;
use thiserror::Error;

use super::amenities::{amenity_flags, Amenity};
use super::canonical::{CanonicalListing, ListingLocation, OperationFlags, PhysicalAttributes};
use super::price::normalize;
use super::raw::RawListing;
use crate::domain::foundation::{finite, normalize_text};

/// Why a record did not become a searchable listing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IngestRejection {
    #[error("record has neither an id nor a property code")]
    MissingIdentity,

    #[error("listing status is '{0}', not active")]
    Inactive(String),

    #[error("listing is not published on the web")]
    Unpublished,
}

const ACTIVE_STATUSES: &[&str] = &["activa", "activo", "active", "disponible", "publicada"];

/// Builds the canonical listing for one record of `source_id`.
pub fn ingest(source_id: &str, raw: &RawListing) -> Result<CanonicalListing, IngestRejection> {
    if let Some(status) = raw.status.as_deref() {
        if !ACTIVE_STATUSES.contains(&normalize_text(status).as_str()) {
            return Err(IngestRejection::Inactive(status.to_string()));
        }
    }
    if raw.published == Some(false) {
        return Err(IngestRejection::Unpublished);
    }

    let id = match (&raw.id, &raw.code) {
        (Some(id), _) => id.clone(),
        (None, Some(code)) => format!("{source_id}-{code}"),
        (None, None) => return Err(IngestRejection::MissingIdentity),
    };

    let location = ListingLocation {
        region: raw.region.clone(),
        locality: raw.locality.clone(),
        sector: raw.sector.clone(),
    };
    let locality_key = location
        .locality
        .as_deref()
        .map(normalize_text)
        .unwrap_or_default();

    Ok(CanonicalListing {
        id,
        source_id: source_id.to_string(),
        code: raw.code.clone(),
        link: raw.link.clone(),
        operation: raw.primary_operation(),
        legacy_flags: OperationFlags {
            sale: raw.sale_flag == Some(true),
            rental: raw.rental_flag == Some(true),
        },
        location,
        prices: normalize(raw),
        attributes: PhysicalAttributes {
            bedrooms: raw.bedrooms.and_then(finite),
            bathrooms: raw.bathrooms.and_then(finite),
            common_expenses_clp: raw.common_expenses.and_then(finite).filter(|v| *v > 0.0),
        },
        amenities: amenities(raw),
        locality_key,
    })
}

/// Source amenity map when shipped, else keyword detection over the
/// description. Unknown tags in a source map are dropped.
fn amenities(raw: &RawListing) -> BTreeMap<Amenity, bool> {
    match &raw.amenities {
        Some(map) => {
            let mut flags: BTreeMap<Amenity, bool> =
                Amenity::ALL.into_iter().map(|a| (a, false)).collect();
            for (tag, present) in map {
                if let Some(amenity) = Amenity::from_tag(tag) {
                    flags.insert(amenity, *present);
                }
            }
            flags
        }
        None => amenity_flags(raw.description.as_deref().unwrap_or_default()),
    }
}
