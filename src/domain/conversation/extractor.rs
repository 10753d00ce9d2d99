//! Slot extraction from one free-text utterance.
//!
//! Purely lexical: operation keywords, a locality gazetteer, a price
//! grammar tolerant of Chilean number formatting, and the amenity keyword
//! table shared with ingestion. Never fails; text with nothing recognizable
//! yields an empty [`Extraction`].

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::domain::foundation::{normalize_text, parse_grouped_number, positive, Currency, Money};
use crate::domain::listing::{detect_amenities, Operation};

use super::gazetteer::Gazetteer;
use super::slots::SearchSlots;
use super::state::PriceDirection;

static RENTAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:arriendo|arriendos|arrendar|arrienda|arrendamiento|alquiler|alquilar)\b")
        .expect("rental pattern is valid")
});

static SALE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:venta|ventas|vender|vendo|compra|comprar)\b").expect("sale pattern is valid")
});

/// A number with optional currency marker before it, magnitude and currency
/// after it. Numbers followed by a unit ("3 dormitorios", "80 m2") are
/// captured in `unit` so they can be skipped.
static PRICE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?:(?P<pre>\$|\buf\b|\bclp\b)\s*)?",
        r"(?P<num>\d{1,3}(?:[.,]\d{3})+(?:[.,]\d+)?|\d+(?:[.,]\d+)?)",
        r"(?:\s*(?P<mag>millones|millon|mm|mil)\b)?",
        r"(?:\s*(?:de\s+)?(?P<suf>uf|pesos|clp)\b)?",
        r"(?P<unit>\s*(?:dormitorios?|dorms?|habitaciones|habitacion|piezas?|banos?|m2|mt2|mts2?|metros|estacionamientos?|pisos?|ambientes)\b)?",
    ))
    .expect("price pattern is valid")
});

static QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\b(?:(?P<max>no mas de|menos de|hasta|maximo|max|tope)",
        r"|(?P<min>mas de|al menos|desde|minimo|min)",
        r"|(?P<between>entre))\b",
    ))
    .expect("qualifier pattern is valid")
});

/// Qualifier written after the amount ("900.000 como máximo").
static TRAILING_QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*,?\s*(?:como\s+|a\s+lo\s+|de\s+)?(?:(?P<max>maximo|max|tope)|(?P<min>minimo|min))\b")
        .expect("trailing qualifier pattern is valid")
});

/// Plain amounts below this, with no currency, magnitude or qualifier, are
/// counts ("2 deptos"), not prices.
const MIN_UNMARKED_AMOUNT: f64 = 1_000.0;

/// What one utterance contributed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Slots recognized with certainty.
    pub slots: SearchSlots,
    /// First amount found without a min/max qualifier, when no directed
    /// amount was found.
    pub ambiguous_price: Option<Money>,
    /// A bare qualifier with no amount ("el máximo"): answers a pending
    /// price question.
    pub direction: Option<PriceDirection>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty() && self.ambiguous_price.is_none() && self.direction.is_none()
    }
}

/// Rule-based slot extractor.
#[derive(Debug, Clone, Default)]
pub struct SlotExtractor {
    gazetteer: Gazetteer,
}

impl SlotExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gazetteer(gazetteer: Gazetteer) -> Self {
        Self { gazetteer }
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    /// Extracts every recognizable slot from `utterance`.
    pub fn extract(&self, utterance: &str) -> Extraction {
        let folded = normalize_text(utterance);
        let mut extraction = Extraction::default();
        if folded.is_empty() {
            return extraction;
        }

        extraction.slots.operation = operation(&folded);
        extraction.slots.location = self.gazetteer.find_in_folded(&folded).map(str::to_string);

        let amenities = detect_amenities(&folded);
        if !amenities.is_empty() {
            extraction.slots.amenities = Some(amenities);
        }

        extract_prices(&folded, &mut extraction);
        extraction
    }
}

/// Rental is checked first; an utterance with both lexemes is a rental.
fn operation(folded: &str) -> Option<Operation> {
    if RENTAL.is_match(folded) {
        Some(Operation::Rental)
    } else if SALE.is_match(folded) {
        Some(Operation::Sale)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Qualifier {
    Direction(PriceDirection),
    Between,
}

fn qualifier_of(caps: &Captures<'_>) -> Option<Qualifier> {
    if caps.name("max").is_some() {
        Some(Qualifier::Direction(PriceDirection::Max))
    } else if caps.name("min").is_some() {
        Some(Qualifier::Direction(PriceDirection::Min))
    } else if caps.name("between").is_some() {
        Some(Qualifier::Between)
    } else {
        None
    }
}

fn extract_prices(folded: &str, extraction: &mut Extraction) {
    let matches: Vec<Captures<'_>> = PRICE.captures_iter(folded).collect();
    let mut cursor = 0;
    let mut after_between = false;
    let mut found_amount = false;
    let mut undirected: Option<Money> = None;

    for (i, caps) in matches.iter().enumerate() {
        let Some(whole) = caps.get(0) else { continue };
        let before = &folded[cursor..whole.start()];
        cursor = whole.end();

        if caps.name("unit").is_some() {
            after_between = false;
            continue;
        }
        let next_start = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(folded.len(), |m| m.start());
        let after = &folded[whole.end()..next_start];

        let Some(number) = caps.name("num").and_then(|m| parse_grouped_number(m.as_str())) else {
            continue;
        };
        let magnitude = match caps.name("mag").map(|m| m.as_str()) {
            Some("mil") => 1_000.0,
            Some(_) => 1_000_000.0,
            None => 1.0,
        };
        let currency_marker = caps
            .name("pre")
            .or_else(|| caps.name("suf"))
            .and_then(|m| Currency::from_tag(m.as_str()));
        let Some(amount) = positive(number * magnitude) else {
            continue;
        };

        let leading = QUALIFIER
            .captures_iter(before)
            .last()
            .and_then(|c| qualifier_of(&c));
        let direction = match leading {
            Some(Qualifier::Direction(d)) => Some(d),
            Some(Qualifier::Between) => {
                after_between = true;
                Some(PriceDirection::Min)
            }
            None if after_between && matches!(before.trim(), "y" | "a" | "-") => {
                after_between = false;
                Some(PriceDirection::Max)
            }
            None => TRAILING_QUALIFIER.captures(after).and_then(|c| match qualifier_of(&c) {
                Some(Qualifier::Direction(d)) => Some(d),
                _ => None,
            }),
        };

        if direction.is_none()
            && currency_marker.is_none()
            && magnitude == 1.0
            && amount < MIN_UNMARKED_AMOUNT
        {
            continue;
        }
        found_amount = true;

        let price = Money::new(amount, currency_marker.unwrap_or(Currency::Clp));
        match direction {
            // First amount per direction wins.
            Some(direction) if !extraction.slots.has_bound(direction) => {
                extraction.slots.set_price(direction, price);
            }
            Some(_) => {}
            None => {
                undirected.get_or_insert(price);
            }
        }
    }

    if extraction.slots.has_price() {
        return;
    }
    if undirected.is_some() {
        extraction.ambiguous_price = undirected;
    } else if !found_amount {
        extraction.direction = QUALIFIER.captures_iter(folded).find_map(|c| match qualifier_of(&c) {
            Some(Qualifier::Direction(d)) => Some(d),
            _ => None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::Amenity;

    fn extract(text: &str) -> Extraction {
        SlotExtractor::new().extract(text)
    }

    mod operation {
        use super::*;

        #[test]
        fn detects_rental() {
            assert_eq!(extract("busco arriendo").slots.operation, Some(Operation::Rental));
            assert_eq!(extract("quiero alquilar").slots.operation, Some(Operation::Rental));
        }

        #[test]
        fn detects_sale() {
            assert_eq!(extract("casa en VENTA").slots.operation, Some(Operation::Sale));
            assert_eq!(extract("quiero comprar").slots.operation, Some(Operation::Sale));
        }

        #[test]
        fn rental_wins_when_both_present() {
            let e = extract("no sé si comprar o arrendar");
            assert_eq!(e.slots.operation, Some(Operation::Rental));
        }

        #[test]
        fn no_partial_word_matches() {
            assert_eq!(extract("ventanal amplio").slots.operation, None);
        }
    }

    mod location {
        use super::*;

        #[test]
        fn stores_folded_name() {
            assert_eq!(extract("algo en Ñuñoa").slots.location.as_deref(), Some("nunoa"));
        }

        #[test]
        fn lampara_collides_with_lampa() {
            assert_eq!(extract("una lámpara").slots.location.as_deref(), Some("lampa"));
        }
    }

    mod price {
        use super::*;

        #[test]
        fn dot_grouped_ceiling_defaults_to_clp() {
            let e = extract("depto en arriendo en Providencia hasta 900.000");
            assert_eq!(e.slots.price_max_clp, Some(900_000.0));
            assert_eq!(e.ambiguous_price, None);
        }

        #[test]
        fn comma_grouped_is_the_same_number() {
            let e = extract("hasta 900,000");
            assert_eq!(e.slots.price_max_clp, Some(900_000.0));
        }

        #[test]
        fn uf_suffix_and_prefix() {
            assert_eq!(extract("máximo 5.000 UF").slots.price_max_uf, Some(5_000.0));
            assert_eq!(extract("desde uf 3.200").slots.price_min_uf, Some(3_200.0));
        }

        #[test]
        fn magnitude_words() {
            assert_eq!(extract("hasta 1,5 millones").slots.price_max_clp, Some(1_500_000.0));
            assert_eq!(extract("más de 2 millones").slots.price_min_clp, Some(2_000_000.0));
            assert_eq!(extract("tope 800 mil").slots.price_max_clp, Some(800_000.0));
            assert_eq!(extract("menos de 1 millón").slots.price_max_clp, Some(1_000_000.0));
        }

        #[test]
        fn dollar_sign_means_clp() {
            let e = extract("$1.200.000 tope");
            assert_eq!(e.slots.price_max_clp, Some(1_200_000.0));
        }

        #[test]
        fn trailing_qualifier() {
            let e = extract("uf 4.500 como máximo");
            assert_eq!(e.slots.price_max_uf, Some(4_500.0));
        }

        #[test]
        fn range_with_entre() {
            let e = extract("entre 500.000 y 800.000");
            assert_eq!(e.slots.price_min_clp, Some(500_000.0));
            assert_eq!(e.slots.price_max_clp, Some(800_000.0));
        }

        #[test]
        fn both_bounds() {
            let e = extract("desde 3.000 uf hasta 5.000 uf");
            assert_eq!(e.slots.price_min_uf, Some(3_000.0));
            assert_eq!(e.slots.price_max_uf, Some(5_000.0));
        }

        #[test]
        fn unqualified_amount_is_ambiguous() {
            let e = extract("tengo un presupuesto de 900.000");
            assert!(!e.slots.has_price());
            assert_eq!(e.ambiguous_price, Some(Money::clp(900_000.0)));
        }

        #[test]
        fn only_first_ambiguous_amount_is_kept() {
            let e = extract("900.000 o 950.000");
            assert_eq!(e.ambiguous_price, Some(Money::clp(900_000.0)));
        }

        #[test]
        fn unit_numbers_are_not_prices() {
            let e = extract("3 dormitorios y 2 baños, 80 m2");
            assert!(!e.slots.has_price());
            assert_eq!(e.ambiguous_price, None);
        }

        #[test]
        fn small_counts_are_not_prices() {
            let e = extract("busco 2 deptos");
            assert_eq!(e.ambiguous_price, None);
        }

        #[test]
        fn bare_qualifier_is_a_direction_answer() {
            assert_eq!(extract("máximo").direction, Some(PriceDirection::Max));
            assert_eq!(extract("es el mínimo").direction, Some(PriceDirection::Min));
            assert_eq!(extract("hasta 900.000").direction, None);
        }
    }

    #[test]
    fn amenities_use_keyword_table() {
        let e = extract("con piscina y parrilla");
        let amenities = e.slots.amenities.unwrap();
        assert!(amenities.contains(&Amenity::Piscina));
        assert!(amenities.contains(&Amenity::Quincho));
    }

    #[test]
    fn unrecognized_text_is_empty() {
        assert!(extract("busco algo").is_empty());
        assert!(extract("").is_empty());
    }
}
