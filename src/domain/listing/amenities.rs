//! Amenity tags and the keyword table that detects them in free text.
//!
//! The same table runs over user utterances ("con piscina y quincho") and
//! over listing descriptions at ingestion time. A tag is present when any of
//! its synonyms appears as a whole word.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::domain::foundation::normalize_text;

/// Amenity a listing can offer and a user can require.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Amenity {
    Piscina,
    Gimnasio,
    Quincho,
    Terraza,
    Patio,
    Bodega,
    Loggia,
    Amoblado,
    AreasVerdes,
    Ascensor,
    Conserjeria,
    Estacionamiento,
}

impl Amenity {
    pub const ALL: [Amenity; 12] = [
        Amenity::Piscina,
        Amenity::Gimnasio,
        Amenity::Quincho,
        Amenity::Terraza,
        Amenity::Patio,
        Amenity::Bodega,
        Amenity::Loggia,
        Amenity::Amoblado,
        Amenity::AreasVerdes,
        Amenity::Ascensor,
        Amenity::Conserjeria,
        Amenity::Estacionamiento,
    ];

    /// Tag name as stored in source amenity maps and API payloads.
    pub fn tag(&self) -> &'static str {
        match self {
            Amenity::Piscina => "piscina",
            Amenity::Gimnasio => "gimnasio",
            Amenity::Quincho => "quincho",
            Amenity::Terraza => "terraza",
            Amenity::Patio => "patio",
            Amenity::Bodega => "bodega",
            Amenity::Loggia => "loggia",
            Amenity::Amoblado => "amoblado",
            Amenity::AreasVerdes => "areas_verdes",
            Amenity::Ascensor => "ascensor",
            Amenity::Conserjeria => "conserjeria",
            Amenity::Estacionamiento => "estacionamiento",
        }
    }

    /// Parses a tag as written by a source or a collaborator.
    ///
    /// Tags go through the same folding as field names, so "Áreas verdes"
    /// and "areas_verdes" are the same tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let folded = normalize_text(tag).replace([' ', '-'], "_");
        Amenity::ALL.into_iter().find(|a| a.tag() == folded)
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            Amenity::Piscina => &["piscina", "piscinas", "pileta"],
            Amenity::Gimnasio => &["gimnasio", "gym"],
            Amenity::Quincho => &["quincho", "parrilla", "asadera"],
            Amenity::Terraza => &["terraza", "terrazas"],
            Amenity::Patio => &["patio"],
            Amenity::Bodega => &["bodega"],
            Amenity::Loggia => &["loggia", "lavandería"],
            Amenity::Amoblado => &["amoblado", "amoblada", "equipado"],
            Amenity::AreasVerdes => &["áreas verdes", "jardín", "parque"],
            Amenity::Ascensor => &["ascensor", "elevador"],
            Amenity::Conserjeria => &["conserjería", "conserje", "portero"],
            Amenity::Estacionamiento => &["estacionamiento", "estacionamientos"],
        }
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

static AMENITY_PATTERNS: Lazy<Vec<(Amenity, Regex)>> = Lazy::new(|| {
    Amenity::ALL
        .into_iter()
        .map(|amenity| {
            let alternatives = amenity
                .keywords()
                .iter()
                .map(|k| regex::escape(&normalize_text(k)))
                .collect::<Vec<_>>()
                .join("|");
            let pattern = Regex::new(&format!(r"\b(?:{alternatives})\b"))
                .expect("amenity keywords form a valid pattern");
            (amenity, pattern)
        })
        .collect()
});

/// Detects every amenity mentioned in `text`.
pub fn detect_amenities(text: &str) -> BTreeSet<Amenity> {
    let folded = normalize_text(text);
    if folded.is_empty() {
        return BTreeSet::new();
    }
    AMENITY_PATTERNS
        .iter()
        .filter(|(_, pattern)| pattern.is_match(&folded))
        .map(|(amenity, _)| *amenity)
        .collect()
}

/// Full flag map for a description: every tag present, true when detected.
pub fn amenity_flags(text: &str) -> BTreeMap<Amenity, bool> {
    let found = detect_amenities(text);
    Amenity::ALL
        .into_iter()
        .map(|a| (a, found.contains(&a)))
        .collect()
}
