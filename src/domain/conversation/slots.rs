//! Search slots - the structured fields a conversation accumulates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::domain::foundation::{normalize_text, positive, Currency, Money};
use crate::domain::listing::{Amenity, Operation};
use crate::domain::search::FilterQuery;

use super::state::PriceDirection;

/// Identifier of one slot, as used by the field table and in API payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    Operation,
    Location,
    PriceMaxUf,
    PriceMaxClp,
    PriceMinUf,
    PriceMinClp,
    Amenities,
}

impl FieldKey {
    pub const ALL: [FieldKey; 7] = [
        FieldKey::Operation,
        FieldKey::Location,
        FieldKey::PriceMaxUf,
        FieldKey::PriceMaxClp,
        FieldKey::PriceMinUf,
        FieldKey::PriceMinClp,
        FieldKey::Amenities,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            FieldKey::Operation => "operation",
            FieldKey::Location => "location",
            FieldKey::PriceMaxUf => "price_max_uf",
            FieldKey::PriceMaxClp => "price_max_clp",
            FieldKey::PriceMinUf => "price_min_uf",
            FieldKey::PriceMinClp => "price_min_clp",
            FieldKey::Amenities => "amenities",
        }
    }

    /// The price slot for a direction and currency.
    pub fn price(direction: PriceDirection, currency: Currency) -> Self {
        match (direction, currency) {
            (PriceDirection::Max, Currency::Uf) => FieldKey::PriceMaxUf,
            (PriceDirection::Max, Currency::Clp) => FieldKey::PriceMaxClp,
            (PriceDirection::Min, Currency::Uf) => FieldKey::PriceMinUf,
            (PriceDirection::Min, Currency::Clp) => FieldKey::PriceMinClp,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Accumulated search fields. Every field is optional; `None` means
/// "not known yet", never "cleared".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchSlots {
    #[serde(default, alias = "operacion", skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,

    /// Folded locality name.
    #[serde(default, alias = "comuna", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max_uf: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max_clp: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min_uf: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min_clp: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<BTreeSet<Amenity>>,
}

impl SearchSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the slot holds a value.
    pub fn has(&self, key: FieldKey) -> bool {
        match key {
            FieldKey::Operation => self.operation.is_some(),
            FieldKey::Location => self.location.is_some(),
            FieldKey::PriceMaxUf => self.price_max_uf.is_some(),
            FieldKey::PriceMaxClp => self.price_max_clp.is_some(),
            FieldKey::PriceMinUf => self.price_min_uf.is_some(),
            FieldKey::PriceMinClp => self.price_min_clp.is_some(),
            FieldKey::Amenities => self.amenities.is_some(),
        }
    }

    pub fn is_empty(&self) -> bool {
        FieldKey::ALL.iter().all(|key| !self.has(*key))
    }

    /// Whether any price slot is set.
    pub fn has_price(&self) -> bool {
        self.price_max_uf.is_some()
            || self.price_max_clp.is_some()
            || self.price_min_uf.is_some()
            || self.price_min_clp.is_some()
    }

    /// Whether a bound in `direction` is set, in either currency.
    pub fn has_bound(&self, direction: PriceDirection) -> bool {
        match direction {
            PriceDirection::Max => self.price_max_uf.is_some() || self.price_max_clp.is_some(),
            PriceDirection::Min => self.price_min_uf.is_some() || self.price_min_clp.is_some(),
        }
    }

    /// Sets the price slot matching `direction` and the amount's currency.
    pub fn set_price(&mut self, direction: PriceDirection, price: Money) {
        let slot = match FieldKey::price(direction, price.currency) {
            FieldKey::PriceMaxUf => &mut self.price_max_uf,
            FieldKey::PriceMaxClp => &mut self.price_max_clp,
            FieldKey::PriceMinUf => &mut self.price_min_uf,
            _ => &mut self.price_min_clp,
        };
        *slot = Some(price.amount);
    }

    /// Overlays `newer` onto `self` and returns the result.
    ///
    /// Each value present in `newer` replaces the value for that exact key;
    /// absent values never clear anything. Other members of a field group
    /// are left untouched.
    pub fn merge(&self, newer: &SearchSlots) -> SearchSlots {
        SearchSlots {
            operation: newer.operation.or(self.operation),
            location: newer.location.clone().or_else(|| self.location.clone()),
            price_max_uf: newer.price_max_uf.or(self.price_max_uf),
            price_max_clp: newer.price_max_clp.or(self.price_max_clp),
            price_min_uf: newer.price_min_uf.or(self.price_min_uf),
            price_min_clp: newer.price_min_clp.or(self.price_min_clp),
            amenities: newer.amenities.clone().or_else(|| self.amenities.clone()),
        }
    }

    /// Drops values that could not have come from a valid extraction:
    /// non-positive or non-finite prices, blank locations, empty amenity
    /// sets. Locations are folded.
    pub fn sanitized(&self) -> SearchSlots {
        SearchSlots {
            operation: self.operation,
            location: self
                .location
                .as_deref()
                .map(normalize_text)
                .filter(|l| !l.is_empty()),
            price_max_uf: self.price_max_uf.and_then(positive),
            price_max_clp: self.price_max_clp.and_then(positive),
            price_min_uf: self.price_min_uf.and_then(positive),
            price_min_clp: self.price_min_clp.and_then(positive),
            amenities: self.amenities.clone().filter(|a| !a.is_empty()),
        }
    }

    /// The filter set a search runs with. When a bound is known in both
    /// currencies, the UF one is used.
    pub fn to_filter_query(&self) -> FilterQuery {
        let mut query = FilterQuery::new();
        if let Some(location) = &self.location {
            query = query.with_location(location);
        }
        if let Some(operation) = self.operation {
            query = query.with_operation(operation);
        }
        if let Some(ceiling) = pick(self.price_max_uf, self.price_max_clp) {
            query = query.with_price_ceiling(ceiling);
        }
        if let Some(floor) = pick(self.price_min_uf, self.price_min_clp) {
            query = query.with_price_floor(floor);
        }
        if let Some(amenities) = &self.amenities {
            query = query.with_amenities(amenities.iter().copied());
        }
        query
    }
}

fn pick(uf: Option<f64>, clp: Option<f64>) -> Option<Money> {
    uf.map(Money::uf).or_else(|| clp.map(Money::clp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod merge {
        use super::*;

        #[test]
        fn newer_value_overwrites_same_key() {
            let old = SearchSlots {
                location: Some("macul".into()),
                ..Default::default()
            };
            let newer = SearchSlots {
                location: Some("providencia".into()),
                ..Default::default()
            };
            assert_eq!(old.merge(&newer).location.as_deref(), Some("providencia"));
        }

        #[test]
        fn absent_value_never_clears() {
            let old = SearchSlots {
                operation: Some(Operation::Rental),
                price_max_clp: Some(900_000.0),
                ..Default::default()
            };
            let merged = old.merge(&SearchSlots::new());
            assert_eq!(merged, old);
        }

        #[test]
        fn group_members_are_independent() {
            let old = SearchSlots {
                price_max_clp: Some(900_000.0),
                ..Default::default()
            };
            let newer = SearchSlots {
                price_max_uf: Some(25.0),
                ..Default::default()
            };
            let merged = old.merge(&newer);
            assert_eq!(merged.price_max_clp, Some(900_000.0));
            assert_eq!(merged.price_max_uf, Some(25.0));
        }

        #[test]
        fn input_is_not_mutated() {
            let old = SearchSlots::new();
            let newer = SearchSlots {
                operation: Some(Operation::Sale),
                ..Default::default()
            };
            let _ = old.merge(&newer);
            assert!(old.is_empty());
        }
    }

    mod filter_query {
        use super::*;

        #[test]
        fn uf_ceiling_wins_over_clp() {
            let slots = SearchSlots {
                price_max_uf: Some(5_000.0),
                price_max_clp: Some(100_000_000.0),
                price_min_clp: Some(50_000_000.0),
                ..Default::default()
            };
            let query = slots.to_filter_query();
            assert_eq!(query.price_ceiling(), Some(Money::uf(5_000.0)));
            assert_eq!(query.price_floor(), Some(Money::clp(50_000_000.0)));
        }

        #[test]
        fn carries_every_slot() {
            let slots = SearchSlots {
                operation: Some(Operation::Rental),
                location: Some("providencia".into()),
                amenities: Some(BTreeSet::from([Amenity::Piscina])),
                ..Default::default()
            };
            let query = slots.to_filter_query();
            assert_eq!(query.operation(), Some(Operation::Rental));
            assert_eq!(query.location(), Some("providencia"));
            assert!(query.amenities().contains(&Amenity::Piscina));
            assert!(!query.is_price_bounded());
        }
    }

    mod serde_shape {
        use super::*;

        #[test]
        fn skips_absent_fields() {
            let slots = SearchSlots {
                operation: Some(Operation::Rental),
                ..Default::default()
            };
            assert_eq!(serde_json::to_value(&slots).unwrap(), json!({"operation": "arriendo"}));
        }

        #[test]
        fn accepts_spanish_aliases() {
            let slots: SearchSlots =
                serde_json::from_value(json!({"operacion": "venta", "comuna": "Ñuñoa"})).unwrap();
            assert_eq!(slots.operation, Some(Operation::Sale));
            assert_eq!(slots.sanitized().location.as_deref(), Some("nunoa"));
        }

        #[test]
        fn sanitize_drops_invalid_prices() {
            let slots = SearchSlots {
                price_max_clp: Some(0.0),
                price_min_uf: Some(-3.0),
                price_max_uf: Some(f64::NAN),
                location: Some("  ".into()),
                amenities: Some(BTreeSet::new()),
                ..Default::default()
            };
            assert!(slots.sanitized().is_empty());
        }
    }

    #[test]
    fn set_price_routes_by_direction_and_currency() {
        let mut slots = SearchSlots::new();
        slots.set_price(PriceDirection::Min, Money::uf(3_000.0));
        slots.set_price(PriceDirection::Max, Money::clp(900_000.0));
        assert_eq!(slots.price_min_uf, Some(3_000.0));
        assert_eq!(slots.price_max_clp, Some(900_000.0));
        assert!(slots.has(FieldKey::PriceMinUf));
        assert!(!slots.has(FieldKey::PriceMaxUf));
    }
}
