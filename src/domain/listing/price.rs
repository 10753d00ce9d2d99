//! Price normalization.
//!
//! Reduces a listing's per-source price blocks to one canonical
//! `{amount, currency, available}` record per operation. This is the only
//! place that decides whether a listing has a usable price.

use serde::Serialize;

use super::operation::Operation;
use super::raw::{RawListing, RawPriceBlock};
use crate::domain::foundation::{positive, Currency, Money};

/// Canonical price of one operation.
///
/// Invariant: `amount` is `None` iff `available` is false. The fields are
/// private so the only way to build one is through the two constructors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanonicalPrice {
    amount: Option<f64>,
    currency: Option<Currency>,
    available: bool,
}

impl CanonicalPrice {
    /// A usable price. Non-positive or non-finite amounts yield
    /// [`CanonicalPrice::unavailable`] instead.
    pub fn available(money: Money) -> Self {
        match positive(money.amount) {
            Some(amount) => Self {
                amount: Some(amount),
                currency: Some(money.currency),
                available: true,
            },
            None => Self::unavailable(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            amount: None,
            currency: None,
            available: false,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn money(&self) -> Option<Money> {
        match (self.amount, self.currency) {
            (Some(amount), Some(currency)) => Some(Money::new(amount, currency)),
            _ => None,
        }
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn currency(&self) -> Option<Currency> {
        self.currency
    }
}

/// Canonical prices for both operations of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OperationPrices {
    #[serde(rename = "venta")]
    pub sale: CanonicalPrice,
    #[serde(rename = "arriendo")]
    pub rental: CanonicalPrice,
}

impl OperationPrices {
    pub fn for_operation(&self, operation: Operation) -> &CanonicalPrice {
        match operation {
            Operation::Sale => &self.sale,
            Operation::Rental => &self.rental,
        }
    }
}

/// Computes the canonical price of each operation.
///
/// A block counts only when its activation indicator is true and it carries
/// a positive finite amount. Amount selection order inside a block: the UF
/// field, then the CLP field, then the generic principal in the block's
/// declared currency. A principal whose currency tag is missing or unknown
/// is unusable.
///
/// A flat `{valor, moneda}` price fills the slot of the listing's primary
/// operation when that operation has no usable block of its own.
pub fn normalize(raw: &RawListing) -> OperationPrices {
    let mut prices = OperationPrices {
        sale: normalize_block(raw.sale_price.as_ref()),
        rental: normalize_block(raw.rental_price.as_ref()),
    };

    if let (Some(flat), Some(operation)) = (raw.flat_price.as_ref(), raw.primary_operation()) {
        let slot = match operation {
            Operation::Sale => &mut prices.sale,
            Operation::Rental => &mut prices.rental,
        };
        if !slot.is_available() {
            *slot = normalize_block(Some(flat));
        }
    }

    prices
}

fn normalize_block(block: Option<&RawPriceBlock>) -> CanonicalPrice {
    let Some(block) = block else {
        return CanonicalPrice::unavailable();
    };
    if block.active != Some(true) {
        return CanonicalPrice::unavailable();
    }

    if let Some(uf) = block.reference_amount.and_then(positive) {
        return CanonicalPrice::available(Money::uf(uf));
    }
    if let Some(clp) = block.local_amount.and_then(positive) {
        return CanonicalPrice::available(Money::clp(clp));
    }
    let principal = block.principal.and_then(positive);
    let currency = block.currency_tag.as_deref().and_then(Currency::from_tag);
    match (principal, currency) {
        (Some(amount), Some(currency)) => CanonicalPrice::available(Money::new(amount, currency)),
        _ => CanonicalPrice::unavailable(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(active: bool) -> RawPriceBlock {
        RawPriceBlock {
            active: Some(active),
            ..Default::default()
        }
    }

    fn with_sale(sale: RawPriceBlock) -> RawListing {
        RawListing {
            sale_price: Some(sale),
            ..Default::default()
        }
    }

    mod activation {
        use super::*;

        #[test]
        fn active_block_with_zero_principal_is_unavailable() {
            let raw = with_sale(RawPriceBlock {
                principal: Some(0.0),
                currency_tag: Some("UF".into()),
                ..block(true)
            });
            let prices = normalize(&raw);
            assert!(!prices.sale.is_available());
            assert_eq!(prices.sale.amount(), None);
        }

        #[test]
        fn nan_amounts_are_absent() {
            let raw = with_sale(RawPriceBlock {
                principal: Some(f64::NAN),
                reference_amount: Some(f64::NAN),
                currency_tag: Some("UF".into()),
                ..block(true)
            });
            assert!(!normalize(&raw).sale.is_available());
        }

        #[test]
        fn inactive_block_is_unavailable_even_with_amount() {
            let raw = with_sale(RawPriceBlock {
                reference_amount: Some(5_000.0),
                ..block(false)
            });
            assert!(!normalize(&raw).sale.is_available());
        }

        #[test]
        fn missing_indicator_counts_as_inactive() {
            let raw = with_sale(RawPriceBlock {
                local_amount: Some(900_000.0),
                ..Default::default()
            });
            assert!(!normalize(&raw).sale.is_available());
        }

        #[test]
        fn missing_block_is_unavailable() {
            let prices = normalize(&RawListing::default());
            assert!(!prices.sale.is_available());
            assert!(!prices.rental.is_available());
        }
    }

    mod selection {
        use super::*;

        #[test]
        fn prefers_reference_currency() {
            let raw = with_sale(RawPriceBlock {
                principal: Some(1.0),
                reference_amount: Some(4_200.0),
                local_amount: Some(150_000_000.0),
                currency_tag: Some("CLP".into()),
                ..block(true)
            });
            assert_eq!(normalize(&raw).sale.money(), Some(Money::uf(4_200.0)));
        }

        #[test]
        fn falls_back_to_local_currency() {
            let raw = with_sale(RawPriceBlock {
                reference_amount: Some(0.0),
                local_amount: Some(150_000_000.0),
                ..block(true)
            });
            assert_eq!(normalize(&raw).sale.money(), Some(Money::clp(150_000_000.0)));
        }

        #[test]
        fn principal_takes_declared_currency() {
            let raw = with_sale(RawPriceBlock {
                principal: Some(3_900.0),
                currency_tag: Some("UF".into()),
                ..block(true)
            });
            assert_eq!(normalize(&raw).sale.money(), Some(Money::uf(3_900.0)));

            let raw = with_sale(RawPriceBlock {
                principal: Some(650_000.0),
                currency_tag: Some("$".into()),
                ..block(true)
            });
            assert_eq!(normalize(&raw).sale.money(), Some(Money::clp(650_000.0)));
        }

        #[test]
        fn principal_with_unknown_currency_is_unusable() {
            let raw = with_sale(RawPriceBlock {
                principal: Some(3_900.0),
                currency_tag: Some("USD".into()),
                ..block(true)
            });
            assert!(!normalize(&raw).sale.is_available());

            let raw = with_sale(RawPriceBlock {
                principal: Some(3_900.0),
                ..block(true)
            });
            assert!(!normalize(&raw).sale.is_available());
        }
    }

    mod flat_price {
        use super::*;

        #[test]
        fn fills_primary_operation() {
            let raw = RawListing {
                operation: Some("arriendo".into()),
                flat_price: Some(RawPriceBlock {
                    active: Some(true),
                    principal: Some(800_000.0),
                    currency_tag: Some("CLP".into()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            let prices = normalize(&raw);
            assert_eq!(prices.rental.money(), Some(Money::clp(800_000.0)));
            assert!(!prices.sale.is_available());
        }

        #[test]
        fn ignored_without_operation() {
            let raw = RawListing {
                flat_price: Some(RawPriceBlock {
                    active: Some(true),
                    principal: Some(800_000.0),
                    currency_tag: Some("CLP".into()),
                    ..Default::default()
                }),
                ..Default::default()
            };
            let prices = normalize(&raw);
            assert!(!prices.sale.is_available());
            assert!(!prices.rental.is_available());
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = with_sale(RawPriceBlock {
            principal: Some(3_900.0),
            local_amount: Some(140_000_000.0),
            currency_tag: Some("UF".into()),
            ..block(true)
        });
        assert_eq!(normalize(&raw), normalize(&raw));
    }

    #[test]
    fn available_constructor_guards_invariant() {
        assert!(!CanonicalPrice::available(Money::clp(0.0)).is_available());
        assert!(!CanonicalPrice::available(Money::clp(f64::INFINITY)).is_available());
        let price = CanonicalPrice::available(Money::uf(10.0));
        assert!(price.is_available());
        assert_eq!(price.amount(), Some(10.0));
    }

    #[test]
    fn serializes_null_amount_when_unavailable() {
        let json = serde_json::to_value(CanonicalPrice::unavailable()).unwrap();
        assert_eq!(json["amount"], serde_json::Value::Null);
        assert_eq!(json["available"], false);
    }
}
