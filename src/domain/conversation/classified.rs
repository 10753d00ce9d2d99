//! Output of the remote intent classifier, and its validation into slots.
//!
//! The classifier is one more source of slot values, never an authority:
//! its filters pass the same checks as locally extracted ones.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeSet;

use crate::domain::foundation::{parse_grouped_number, positive, Currency, Money};
use crate::domain::listing::{Amenity, Operation};

use super::gazetteer::Gazetteer;
use super::slots::SearchSlots;
use super::state::PriceDirection;

/// Filters as the classifier reports them. Field names follow its prompt
/// contract, which is Spanish.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassifiedFilters {
    #[serde(default, alias = "operacion")]
    pub operation: Option<String>,

    #[serde(default, alias = "comuna")]
    pub location: Option<String>,

    /// Number or numeric string.
    #[serde(default, alias = "precio_max")]
    pub price_max: Option<Value>,

    #[serde(default, alias = "precio_min")]
    pub price_min: Option<Value>,

    #[serde(default, alias = "moneda")]
    pub currency: Option<String>,

    #[serde(default)]
    pub amenities: Vec<String>,
}

/// A classifier answer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ClassifiedIntent {
    /// "search" or "clarify"; informational only.
    #[serde(default)]
    pub action: Option<String>,

    #[serde(default)]
    pub filters: ClassifiedFilters,

    #[serde(default)]
    pub missing_fields: Vec<String>,

    #[serde(default)]
    pub assumptions: Vec<String>,

    #[serde(default)]
    pub confidence: Option<f64>,
}

impl ClassifiedIntent {
    /// Keeps only values a local extraction could also have produced:
    /// a known operation tag, a gazetteer locality, positive finite prices
    /// in a known currency (pesos when unstated) and known amenity tags.
    pub fn validated(&self, gazetteer: &Gazetteer) -> SearchSlots {
        let f = &self.filters;
        let mut slots = SearchSlots {
            operation: f.operation.as_deref().and_then(Operation::from_tag),
            location: f
                .location
                .as_deref()
                .and_then(|l| gazetteer.resolve(l))
                .map(str::to_string),
            ..Default::default()
        };

        let currency = match f.currency.as_deref() {
            None => Some(Currency::Clp),
            Some(tag) => Currency::from_tag(tag),
        };
        if let Some(currency) = currency {
            if let Some(amount) = f.price_max.as_ref().and_then(amount) {
                slots.set_price(PriceDirection::Max, Money::new(amount, currency));
            }
            if let Some(amount) = f.price_min.as_ref().and_then(amount) {
                slots.set_price(PriceDirection::Min, Money::new(amount, currency));
            }
        }

        let amenities: BTreeSet<Amenity> =
            f.amenities.iter().filter_map(|t| Amenity::from_tag(t)).collect();
        if !amenities.is_empty() {
            slots.amenities = Some(amenities);
        }

        slots
    }
}

fn amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_grouped_number(s),
        _ => None,
    }
    .and_then(positive)
}
