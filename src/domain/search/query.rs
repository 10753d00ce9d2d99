//! The immutable filter set a search runs with.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::domain::foundation::{normalize_text, Money};
use crate::domain::listing::{Amenity, Operation};

/// Resolved filters for one search request.
///
/// Built once (usually from a completed conversation state) and never
/// mutated; the `with_*` methods consume and return a new value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterQuery {
    location: Option<String>,
    operation: Option<Operation>,
    price_ceiling: Option<Money>,
    price_floor: Option<Money>,
    amenities: BTreeSet<Amenity>,
}

impl FilterQuery {
    /// An unconstrained query: every listing matches.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the location filter. Blank values are ignored; the value is
    /// stored folded (lowercase, accent-free).
    pub fn with_location(mut self, location: impl AsRef<str>) -> Self {
        let folded = normalize_text(location.as_ref());
        self.location = (!folded.is_empty()).then_some(folded);
        self
    }

    pub fn with_operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    /// Inclusive upper bound on the canonical price.
    pub fn with_price_ceiling(mut self, ceiling: Money) -> Self {
        self.price_ceiling = Some(ceiling);
        self
    }

    /// Inclusive lower bound on the canonical price.
    pub fn with_price_floor(mut self, floor: Money) -> Self {
        self.price_floor = Some(floor);
        self
    }

    pub fn with_amenities(mut self, amenities: impl IntoIterator<Item = Amenity>) -> Self {
        self.amenities = amenities.into_iter().collect();
        self
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn operation(&self) -> Option<Operation> {
        self.operation
    }

    pub fn price_ceiling(&self) -> Option<Money> {
        self.price_ceiling
    }

    pub fn price_floor(&self) -> Option<Money> {
        self.price_floor
    }

    pub fn amenities(&self) -> &BTreeSet<Amenity> {
        &self.amenities
    }

    /// Whether any price bound is requested.
    pub fn is_price_bounded(&self) -> bool {
        self.price_ceiling.is_some() || self.price_floor.is_some()
    }
}
