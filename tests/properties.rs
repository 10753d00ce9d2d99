//! Property tests for the merge, extraction, normalization and matching
//! invariants.

use proptest::prelude::*;

use property_concierge::domain::conversation::{SearchSlots, SlotExtractor};
use property_concierge::domain::foundation::{normalize_text, Currency, ExchangeRate, Money};
use property_concierge::domain::listing::{ingest, normalize, Operation, RawListing, RawPriceBlock};
use property_concierge::domain::search::{matches_price, FilterQuery};

// =============================================================================
// Strategies
// =============================================================================

fn operation() -> impl Strategy<Value = Option<Operation>> {
    prop_oneof![
        Just(None),
        Just(Some(Operation::Sale)),
        Just(Some(Operation::Rental))
    ]
}

fn slots() -> impl Strategy<Value = SearchSlots> {
    (
        operation(),
        proptest::option::of("[a-z]{3,12}"),
        proptest::option::of(1.0f64..10_000.0),
        proptest::option::of(1_000.0f64..1e9),
        proptest::option::of(1.0f64..10_000.0),
        proptest::option::of(1_000.0f64..1e9),
    )
        .prop_map(
            |(operation, location, price_max_uf, price_max_clp, price_min_uf, price_min_clp)| {
                SearchSlots {
                    operation,
                    location,
                    price_max_uf,
                    price_max_clp,
                    price_min_uf,
                    price_min_clp,
                    amenities: None,
                }
            },
        )
}

fn block() -> impl Strategy<Value = RawPriceBlock> {
    (
        proptest::option::of(any::<bool>()),
        proptest::option::of(prop_oneof![Just(f64::NAN), Just(0.0), -10.0f64..1e9]),
        proptest::option::of(prop_oneof![Just(f64::NAN), -10.0f64..50_000.0]),
        proptest::option::of(prop_oneof![Just(f64::INFINITY), 0.0f64..1e9]),
        proptest::option::of(prop_oneof![
            Just("UF".to_string()),
            Just("CLP".to_string()),
            Just("USD".to_string())
        ]),
    )
        .prop_map(
            |(active, principal, reference_amount, local_amount, currency_tag)| RawPriceBlock {
                active,
                principal,
                reference_amount,
                local_amount,
                currency_tag,
            },
        )
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// A key set earlier survives any later turn that does not set it.
    #[test]
    fn merge_never_clears(older in slots(), newer in slots()) {
        let merged = older.merge(&newer);
        prop_assert_eq!(merged.operation, newer.operation.or(older.operation));
        prop_assert_eq!(merged.location.clone(), newer.location.clone().or(older.location.clone()));
        prop_assert_eq!(merged.price_max_uf, newer.price_max_uf.or(older.price_max_uf));
        prop_assert_eq!(merged.price_max_clp, newer.price_max_clp.or(older.price_max_clp));
        prop_assert_eq!(merged.price_min_uf, newer.price_min_uf.or(older.price_min_uf));
        prop_assert_eq!(merged.price_min_clp, newer.price_min_clp.or(older.price_min_clp));
        prop_assert_eq!(merged.merge(&SearchSlots::new()), merged);
    }

    /// Utterances with both lexemes are rentals, whatever surrounds them.
    #[test]
    fn rental_wins_over_sale(prefix in "[a-z ]{0,12}", middle in "[a-z ]{0,12}", rental_first in any::<bool>()) {
        let (a, b) = if rental_first { ("arriendo", "venta") } else { ("venta", "arriendo") };
        let utterance = format!("{prefix} {a} {middle} {b}");
        let extractor = SlotExtractor::new();
        let first = extractor.extract(&utterance);
        let second = extractor.extract(&utterance);
        prop_assert_eq!(first.slots.operation, Some(Operation::Rental));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn normalize_text_is_idempotent(s in "[ a-zA-Z0-9áéíóúÁÉÍÓÚñÑüÜ,.-]{0,40}") {
        let once = normalize_text(&s);
        prop_assert_eq!(normalize_text(&once), once);
    }

    /// Feeding a canonical price back through the normalizer changes nothing.
    #[test]
    fn price_normalization_is_idempotent(sale in block(), rental in block()) {
        let raw = RawListing {
            code: Some("p".into()),
            sale_price: Some(sale),
            rental_price: Some(rental),
            ..Default::default()
        };
        let once = normalize(&raw);

        let back = |price: &property_concierge::domain::listing::CanonicalPrice| RawPriceBlock {
            active: Some(price.is_available()),
            principal: price.amount(),
            currency_tag: price.currency().map(|c| c.code().to_string()),
            ..Default::default()
        };
        let again = normalize(&RawListing {
            sale_price: Some(back(&once.sale)),
            rental_price: Some(back(&once.rental)),
            ..Default::default()
        });
        prop_assert_eq!(again, once);
    }

    /// Unavailable prices never pass a bounded query and always pass an
    /// unbounded one.
    #[test]
    fn unavailable_prices_only_match_unbounded(sale in block(), ceiling in 1.0f64..1e10) {
        let raw = RawListing {
            code: Some("p".into()),
            operation: Some("venta".into()),
            sale_price: Some(sale),
            ..Default::default()
        };
        let listing = ingest("s", &raw).unwrap();
        prop_assume!(!listing.prices.sale.is_available());

        let rate = ExchangeRate::new(38_000.0).unwrap();
        let bounded = FilterQuery::new()
            .with_operation(Operation::Sale)
            .with_price_ceiling(Money::clp(ceiling));
        let unbounded = FilterQuery::new().with_operation(Operation::Sale);
        prop_assert!(!matches_price(&listing, &bounded, &rate));
        prop_assert!(matches_price(&listing, &unbounded, &rate));
    }

    /// Comparing in the ceiling's currency and in the listing's currency
    /// agree away from the boundary.
    #[test]
    fn cross_currency_decision_is_symmetric(
        uf_price in 1.0f64..50_000.0,
        ceiling_clp in 1_000.0f64..2e9,
        clp_per_uf in 20_000.0f64..50_000.0,
    ) {
        let rate = ExchangeRate::new(clp_per_uf).unwrap();
        let price_in_clp = uf_price * clp_per_uf;
        prop_assume!((price_in_clp - ceiling_clp).abs() > 1e-6 * ceiling_clp);

        let raw = RawListing {
            code: Some("p".into()),
            operation: Some("venta".into()),
            sale_price: Some(RawPriceBlock {
                active: Some(true),
                reference_amount: Some(uf_price),
                ..Default::default()
            }),
            ..Default::default()
        };
        let listing = ingest("s", &raw).unwrap();

        let in_clp = FilterQuery::new()
            .with_operation(Operation::Sale)
            .with_price_ceiling(Money::clp(ceiling_clp));
        let in_uf = FilterQuery::new()
            .with_operation(Operation::Sale)
            .with_price_ceiling(Money::new(rate.convert(Money::clp(ceiling_clp), Currency::Uf), Currency::Uf));

        prop_assert_eq!(
            matches_price(&listing, &in_clp, &rate),
            matches_price(&listing, &in_uf, &rate)
        );
        prop_assert_eq!(matches_price(&listing, &in_clp, &rate), price_in_clp <= ceiling_clp);
    }
}
