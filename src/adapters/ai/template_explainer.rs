//! Template Explainer - local, deterministic result summary.

use async_trait::async_trait;

use crate::domain::conversation::SearchSlots;
use crate::ports::{CollaboratorError, ExplanationRequest, ResultExplainer};

const NO_RESULTS: &str =
    "No se encontraron propiedades que coincidan con los criterios de búsqueda indicados.";

/// Builds "Se encontraron N propiedades en arriendo en providencia hasta
/// $900000." from the filters. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateExplainer;

impl TemplateExplainer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(filters: &SearchSlots, count: usize) -> String {
        if count == 0 {
            return NO_RESULTS.to_string();
        }

        let mut parts = Vec::new();
        if let Some(operation) = filters.operation {
            parts.push(format!("en {operation}"));
        }
        if let Some(location) = &filters.location {
            parts.push(format!("en {location}"));
        }
        if let Some(v) = filters.price_min_uf {
            parts.push(format!("desde {v} UF"));
        }
        if let Some(v) = filters.price_max_uf {
            parts.push(format!("hasta {v} UF"));
        }
        if let Some(v) = filters.price_min_clp {
            parts.push(format!("desde ${v}"));
        }
        if let Some(v) = filters.price_max_clp {
            parts.push(format!("hasta ${v}"));
        }

        let noun = if count == 1 { "propiedad" } else { "propiedades" };
        let verb = if count == 1 { "encontró" } else { "encontraron" };
        if parts.is_empty() {
            format!("Se {verb} {count} {noun}.")
        } else {
            format!("Se {verb} {count} {noun} {}.", parts.join(" "))
        }
    }
}

#[async_trait]
impl ResultExplainer for TemplateExplainer {
    async fn explain(&self, request: &ExplanationRequest) -> Result<String, CollaboratorError> {
        Ok(Self::summarize(&request.filters, request.results.len()))
    }

    fn name(&self) -> &str {
        "template"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::Operation;

    #[test]
    fn full_sentence() {
        let filters = SearchSlots {
            operation: Some(Operation::Rental),
            location: Some("providencia".into()),
            price_max_clp: Some(900_000.0),
            ..Default::default()
        };
        assert_eq!(
            TemplateExplainer::summarize(&filters, 3),
            "Se encontraron 3 propiedades en arriendo en providencia hasta $900000."
        );
    }

    #[test]
    fn uf_range() {
        let filters = SearchSlots {
            price_min_uf: Some(3_000.0),
            price_max_uf: Some(5_000.5),
            ..Default::default()
        };
        assert_eq!(
            TemplateExplainer::summarize(&filters, 1),
            "Se encontró 1 propiedad desde 3000 UF hasta 5000.5 UF."
        );
    }

    #[test]
    fn no_results() {
        assert_eq!(TemplateExplainer::summarize(&SearchSlots::new(), 0), NO_RESULTS);
    }
}
