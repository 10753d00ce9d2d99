//! Known localities ("comunas") the extractor recognizes.

use crate::domain::foundation::normalize_text;

/// Gazetteer entries, in match priority order.
///
/// Matching is substring-based, so an entry contained in a longer word
/// ("lampa" in "lámpara") also matches. Multi-word names come before the
/// shorter names they could hide, and "Santiago" is last so that
/// "Providencia, Santiago" resolves to the more specific comuna.
const LOCALITIES: &[&str] = &[
    "Las Condes",
    "Lo Barnechea",
    "Vitacura",
    "Providencia",
    "Ñuñoa",
    "La Reina",
    "Peñalolén",
    "Macul",
    "La Florida",
    "San Miguel",
    "San Joaquín",
    "Estación Central",
    "Independencia",
    "Recoleta",
    "Quinta Normal",
    "Huechuraba",
    "Conchalí",
    "Quilicura",
    "Cerrillos",
    "Pudahuel",
    "Lo Prado",
    "Cerro Navia",
    "San Ramón",
    "La Granja",
    "La Cisterna",
    "Pedro Aguirre Cerda",
    "Lo Espejo",
    "El Bosque",
    "La Pintana",
    "Puente Alto",
    "San Bernardo",
    "San José de Maipo",
    "Padre Hurtado",
    "Calera de Tango",
    "Maipú",
    "Pirque",
    "Colina",
    "Lampa",
    "Buin",
    "Talagante",
    "Peñaflor",
    "Renca",
    "Viña del Mar",
    "Valparaíso",
    "Concón",
    "Quilpué",
    "Villa Alemana",
    "Rancagua",
    "Concepción",
    "La Serena",
    "Coquimbo",
    "Antofagasta",
    "Temuco",
    "Puerto Montt",
    "Santiago",
];

/// Folded-name lookup over [`LOCALITIES`].
#[derive(Debug, Clone)]
pub struct Gazetteer {
    entries: Vec<String>,
}

impl Default for Gazetteer {
    fn default() -> Self {
        Self::new(LOCALITIES.iter().copied())
    }
}

impl Gazetteer {
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            entries: names
                .into_iter()
                .map(normalize_text)
                .filter(|n| !n.is_empty())
                .collect(),
        }
    }

    /// First entry, in list order, contained in the folded text.
    pub fn find_in(&self, text: &str) -> Option<&str> {
        let folded = normalize_text(text);
        self.find_in_folded(&folded)
    }

    pub(crate) fn find_in_folded(&self, folded: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| folded.contains(entry.as_str()))
            .map(String::as_str)
    }

    /// Validates a locality proposed by a remote collaborator: exact folded
    /// match first, else the same containment rule as [`find_in`].
    ///
    /// [`find_in`]: Gazetteer::find_in
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let folded = normalize_text(name);
        self.entries
            .iter()
            .find(|entry| **entry == folded)
            .map(String::as_str)
            .or_else(|| self.find_in_folded(&folded))
    }
}
