//! Filter predicates. A listing matches a query when every predicate passes.

use crate::domain::foundation::ExchangeRate;
use crate::domain::listing::CanonicalListing;

use super::query::FilterQuery;

/// Evaluates all predicates.
pub fn matches(listing: &CanonicalListing, query: &FilterQuery, rate: &ExchangeRate) -> bool {
    matches_location(listing, query)
        && matches_operation(listing, query)
        && matches_price(listing, query, rate)
        && matches_amenities(listing, query)
}

/// Folded equality, or the filter contained in the listing's locality.
///
/// Containment lets "providencia" match "Providencia, Santiago". It also
/// lets a short filter match a longer unrelated name; that recall/precision
/// trade is accepted.
pub fn matches_location(listing: &CanonicalListing, query: &FilterQuery) -> bool {
    match query.location() {
        None => true,
        Some(wanted) => {
            let have = listing.locality_key();
            have == wanted || have.contains(wanted)
        }
    }
}

/// Exact operation, or the legacy flag for that operation.
pub fn matches_operation(listing: &CanonicalListing, query: &FilterQuery) -> bool {
    match query.operation() {
        None => true,
        Some(wanted) => listing.operation == Some(wanted) || listing.legacy_flags.allows(wanted),
    }
}

/// Inclusive price bounds, compared in the bound's currency.
///
/// The price block is the query's operation, or the listing's own when the
/// query names none. A bounded query never admits a listing without a usable
/// price for that block.
pub fn matches_price(listing: &CanonicalListing, query: &FilterQuery, rate: &ExchangeRate) -> bool {
    if !query.is_price_bounded() {
        return true;
    }
    let Some(operation) = query.operation().or_else(|| listing.primary_operation()) else {
        return false;
    };
    let Some(price) = listing.prices.for_operation(operation).money() else {
        return false;
    };

    let within_ceiling = query
        .price_ceiling()
        .map_or(true, |ceiling| rate.convert(price, ceiling.currency) <= ceiling.amount);
    let within_floor = query
        .price_floor()
        .map_or(true, |floor| rate.convert(price, floor.currency) >= floor.amount);

    within_ceiling && within_floor
}

/// Every requested amenity must be present; missing tags count as absent.
pub fn matches_amenities(listing: &CanonicalListing, query: &FilterQuery) -> bool {
    query.amenities().iter().all(|a| listing.has_amenity(*a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Money;
    use crate::domain::listing::{ingest, Amenity, Operation, RawListing, RawPriceBlock};
    use std::collections::BTreeMap;

    fn rate() -> ExchangeRate {
        ExchangeRate::new(40_000.0).unwrap()
    }

    fn listing(raw: RawListing) -> CanonicalListing {
        let raw = RawListing {
            code: raw.code.clone().or(Some("1".into())),
            ..raw
        };
        ingest("test", &raw).expect("fixture ingests")
    }

    fn rental_clp(locality: &str, amount: f64) -> CanonicalListing {
        listing(RawListing {
            operation: Some("arriendo".into()),
            locality: Some(locality.into()),
            rental_price: Some(RawPriceBlock {
                active: Some(true),
                local_amount: Some(amount),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    fn sale_uf(amount: f64) -> CanonicalListing {
        listing(RawListing {
            operation: Some("venta".into()),
            locality: Some("Las Condes".into()),
            sale_price: Some(RawPriceBlock {
                active: Some(true),
                reference_amount: Some(amount),
                ..Default::default()
            }),
            ..Default::default()
        })
    }

    mod location {
        use super::*;

        #[test]
        fn exact_match_ignores_case_and_accents() {
            let l = rental_clp("Ñuñoa", 1.0);
            assert!(matches_location(&l, &FilterQuery::new().with_location("nunoa")));
        }

        #[test]
        fn composite_listing_value_matches() {
            let l = rental_clp("Providencia, Santiago", 1.0);
            assert!(matches_location(&l, &FilterQuery::new().with_location("Providencia")));
        }

        #[test]
        fn short_filter_false_positive_is_accepted() {
            // "colina" is contained in a Peñalolén villa name.
            let l = rental_clp("Colina Verde, Peñalolén", 1.0);
            assert!(matches_location(&l, &FilterQuery::new().with_location("Colina")));
        }

        #[test]
        fn different_locality_rejected() {
            let l = rental_clp("Macul", 1.0);
            assert!(!matches_location(&l, &FilterQuery::new().with_location("Providencia")));
        }

        #[test]
        fn listing_without_locality_fails_location_filter() {
            let l = listing(RawListing::default());
            assert!(!matches_location(&l, &FilterQuery::new().with_location("Macul")));
            assert!(matches_location(&l, &FilterQuery::new()));
        }
    }

    mod operation {
        use super::*;

        #[test]
        fn exact_match() {
            let l = rental_clp("Macul", 1.0);
            assert!(matches_operation(&l, &FilterQuery::new().with_operation(Operation::Rental)));
            assert!(!matches_operation(&l, &FilterQuery::new().with_operation(Operation::Sale)));
        }

        #[test]
        fn legacy_flag_fallback() {
            let l = listing(RawListing {
                operation: Some("venta".into()),
                rental_flag: Some(true),
                ..Default::default()
            });
            assert!(matches_operation(&l, &FilterQuery::new().with_operation(Operation::Rental)));
        }
    }

    mod price {
        use super::*;

        #[test]
        fn ceiling_is_inclusive() {
            let l = rental_clp("Macul", 900_000.0);
            let q = FilterQuery::new()
                .with_operation(Operation::Rental)
                .with_price_ceiling(Money::clp(900_000.0));
            assert!(matches_price(&l, &q, &rate()));

            let q = FilterQuery::new()
                .with_operation(Operation::Rental)
                .with_price_ceiling(Money::clp(899_999.0));
            assert!(!matches_price(&l, &q, &rate()));
        }

        #[test]
        fn floor_is_inclusive() {
            let l = rental_clp("Macul", 500_000.0);
            let q = FilterQuery::new().with_price_floor(Money::clp(500_000.0));
            assert!(matches_price(&l, &q, &rate()));
            let q = FilterQuery::new().with_price_floor(Money::clp(500_001.0));
            assert!(!matches_price(&l, &q, &rate()));
        }

        #[test]
        fn converts_listing_currency_to_filter_currency() {
            // 5.000 UF at 40.000 CLP/UF = 200.000.000 CLP
            let l = sale_uf(5_000.0);
            let q = FilterQuery::new()
                .with_operation(Operation::Sale)
                .with_price_ceiling(Money::clp(200_000_000.0));
            assert!(matches_price(&l, &q, &rate()));

            let q = FilterQuery::new()
                .with_operation(Operation::Sale)
                .with_price_ceiling(Money::clp(150_000_000.0));
            assert!(!matches_price(&l, &q, &rate()));
        }

        #[test]
        fn unavailable_price_excluded_only_when_bounded() {
            let l = listing(RawListing {
                operation: Some("venta".into()),
                sale_price: Some(RawPriceBlock {
                    active: Some(true),
                    principal: Some(0.0),
                    currency_tag: Some("UF".into()),
                    ..Default::default()
                }),
                ..Default::default()
            });
            let bounded = FilterQuery::new()
                .with_operation(Operation::Sale)
                .with_price_ceiling(Money::uf(10_000.0));
            assert!(!matches_price(&l, &bounded, &rate()));

            let unbounded = FilterQuery::new().with_operation(Operation::Sale);
            assert!(matches(&l, &unbounded, &rate()));
        }

        #[test]
        fn uses_block_of_requested_operation() {
            // Rental price is fine but the sale block is missing.
            let l = rental_clp("Macul", 100.0);
            let q = FilterQuery::new()
                .with_operation(Operation::Sale)
                .with_price_ceiling(Money::clp(1_000.0));
            assert!(!matches_price(&l, &q, &rate()));
        }

        #[test]
        fn bounded_query_without_any_operation_excludes() {
            let l = listing(RawListing::default());
            let q = FilterQuery::new().with_price_ceiling(Money::clp(1_000.0));
            assert!(!matches_price(&l, &q, &rate()));
        }
    }

    mod amenities {
        use super::*;

        #[test]
        fn all_requested_must_be_present() {
            let l = listing(RawListing {
                amenities: Some(BTreeMap::from([
                    ("piscina".to_string(), true),
                    ("quincho".to_string(), false),
                ])),
                ..Default::default()
            });
            let q = FilterQuery::new().with_amenities([Amenity::Piscina]);
            assert!(matches_amenities(&l, &q));

            let q = FilterQuery::new().with_amenities([Amenity::Piscina, Amenity::Quincho]);
            assert!(!matches_amenities(&l, &q));

            let q = FilterQuery::new().with_amenities([Amenity::Gimnasio]);
            assert!(!matches_amenities(&l, &q));
        }

        #[test]
        fn empty_set_always_matches() {
            let l = listing(RawListing::default());
            assert!(matches_amenities(&l, &FilterQuery::new()));
        }
    }
}
