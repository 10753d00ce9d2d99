//! The canonical listing shape every source is normalized into.

use serde::Serialize;
use std::collections::BTreeMap;

use super::amenities::Amenity;
use super::operation::Operation;
use super::price::OperationPrices;

/// Where a listing is.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListingLocation {
    pub region: Option<String>,
    /// Municipality ("comuna"); the field location filters match against.
    pub locality: Option<String>,
    pub sector: Option<String>,
}

/// Physical attributes carried through for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PhysicalAttributes {
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub common_expenses_clp: Option<f64>,
}

/// Legacy per-operation boolean columns, kept for schema-compatible matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationFlags {
    pub sale: bool,
    pub rental: bool,
}

impl OperationFlags {
    pub fn allows(&self, operation: Operation) -> bool {
        match operation {
            Operation::Sale => self.sale,
            Operation::Rental => self.rental,
        }
    }
}

/// A listing in the one internal shape the match engine understands.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalListing {
    pub id: String,
    pub source_id: String,
    pub code: Option<String>,
    pub link: Option<String>,
    pub operation: Option<Operation>,
    pub legacy_flags: OperationFlags,
    pub location: ListingLocation,
    pub prices: OperationPrices,
    pub attributes: PhysicalAttributes,
    pub amenities: BTreeMap<Amenity, bool>,
    /// Folded locality, computed once at ingestion.
    #[serde(skip)]
    pub(crate) locality_key: String,
}

impl CanonicalListing {
    /// The operation whose price block applies when a query does not name
    /// one: the explicit operation, else the first legacy flag set.
    pub fn primary_operation(&self) -> Option<Operation> {
        self.operation.or_else(|| {
            if self.legacy_flags.sale {
                Some(Operation::Sale)
            } else if self.legacy_flags.rental {
                Some(Operation::Rental)
            } else {
                None
            }
        })
    }

    pub fn has_amenity(&self, amenity: Amenity) -> bool {
        self.amenities.get(&amenity).copied().unwrap_or(false)
    }

    pub fn locality_key(&self) -> &str {
        &self.locality_key
    }
}
