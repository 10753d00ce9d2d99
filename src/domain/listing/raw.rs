//! Source-native listing records and the field alias table.
//!
//! Sources disagree on field names ("comuna", "Comuna", "COMUNA",
//! "localidad"), on nesting (flat vs. an "ubicacion" object) and on value
//! types (numbers vs. "1.500.000", `true` vs. "SI"). All of that is resolved
//! here, once, into a [`RawListing`] with typed optional fields. Nothing
//! downstream looks at source field names again.

use once_cell::sync::Lazy;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use super::operation::Operation;
use crate::domain::foundation::{normalize_key, normalize_text, parse_grouped_number};

/// One price block (sale or rental) as the source wrote it.
///
/// Amounts are parsed but not validated: zero, negative and missing values
/// are kept as-is for the normalizer to judge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPriceBlock {
    /// Explicit activation indicator ("activo").
    pub active: Option<bool>,
    /// Generic amount whose unit comes from `currency_tag`.
    pub principal: Option<f64>,
    /// Amount explicitly tagged as UF.
    pub reference_amount: Option<f64>,
    /// Amount explicitly tagged as CLP.
    pub local_amount: Option<f64>,
    /// Declared currency of the block ("divisa").
    pub currency_tag: Option<String>,
}

/// A listing after alias resolution, before normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub id: Option<String>,
    pub code: Option<String>,
    pub link: Option<String>,
    pub status: Option<String>,
    pub published: Option<bool>,
    pub operation: Option<String>,
    /// Legacy per-operation boolean columns ("Venta": "SI").
    pub sale_flag: Option<bool>,
    pub rental_flag: Option<bool>,
    pub region: Option<String>,
    pub locality: Option<String>,
    pub sector: Option<String>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub common_expenses: Option<f64>,
    pub description: Option<String>,
    /// Amenity map as shipped by the source, keys untouched.
    pub amenities: Option<BTreeMap<String, bool>>,
    pub sale_price: Option<RawPriceBlock>,
    pub rental_price: Option<RawPriceBlock>,
    /// Single `{valor, moneda}` price already attributed to the listing's
    /// own operation by an upstream enrichment step.
    pub flat_price: Option<RawPriceBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawField {
    Id,
    Code,
    Link,
    Status,
    Published,
    Operation,
    SaleFlag,
    RentalFlag,
    Region,
    Locality,
    Sector,
    Bedrooms,
    Bathrooms,
    CommonExpenses,
    Description,
    Amenities,
    Price,
    Nested,
}

/// Folded field name → canonical field.
const FIELD_ALIASES: &[(&str, RawField)] = &[
    ("id", RawField::Id),
    ("codigo", RawField::Code),
    ("code", RawField::Code),
    ("cod", RawField::Code),
    ("codigo_propiedad", RawField::Code),
    ("link", RawField::Link),
    ("url", RawField::Link),
    ("enlace", RawField::Link),
    ("estado", RawField::Status),
    ("status", RawField::Status),
    ("publicada_web", RawField::Published),
    ("publicado_web", RawField::Published),
    ("publicada", RawField::Published),
    ("publicado", RawField::Published),
    ("operacion", RawField::Operation),
    ("tipo_operacion", RawField::Operation),
    ("operation", RawField::Operation),
    ("venta", RawField::SaleFlag),
    ("en_venta", RawField::SaleFlag),
    ("arriendo", RawField::RentalFlag),
    ("en_arriendo", RawField::RentalFlag),
    ("region", RawField::Region),
    ("comuna", RawField::Locality),
    ("localidad", RawField::Locality),
    ("municipio", RawField::Locality),
    ("sector", RawField::Sector),
    ("barrio", RawField::Sector),
    ("dormitorios", RawField::Bedrooms),
    ("dormitorio", RawField::Bedrooms),
    ("dorms", RawField::Bedrooms),
    ("habitaciones", RawField::Bedrooms),
    ("banos", RawField::Bathrooms),
    ("bano", RawField::Bathrooms),
    ("gastos_comunes", RawField::CommonExpenses),
    ("gastos_comunes_clp", RawField::CommonExpenses),
    ("gc", RawField::CommonExpenses),
    ("descripcion", RawField::Description),
    ("description", RawField::Description),
    ("detalle", RawField::Description),
    ("amenities", RawField::Amenities),
    ("comodidades", RawField::Amenities),
    ("precio", RawField::Price),
    ("precios", RawField::Price),
    ("price", RawField::Price),
    ("ubicacion", RawField::Nested),
    ("caracteristicas", RawField::Nested),
    ("location", RawField::Nested),
];

static ALIAS_INDEX: Lazy<HashMap<&'static str, RawField>> =
    Lazy::new(|| FIELD_ALIASES.iter().copied().collect());

fn resolve_field(key: &str) -> Option<RawField> {
    ALIAS_INDEX.get(normalize_key(key).as_str()).copied()
}

impl RawListing {
    /// Resolves one source record into the typed shape.
    ///
    /// Unknown fields are ignored. When two aliases of the same field are
    /// present, the first non-empty value in record order wins.
    pub fn from_json(record: &Map<String, Value>) -> Self {
        let mut raw = RawListing::default();
        raw.absorb(record, 0);
        raw
    }

    /// The operation the listing is primarily offered under: the explicit
    /// tag if it parses, else the first legacy flag set (sale before rental).
    pub fn primary_operation(&self) -> Option<Operation> {
        self.operation
            .as_deref()
            .and_then(Operation::from_tag)
            .or_else(|| (self.sale_flag == Some(true)).then_some(Operation::Sale))
            .or_else(|| (self.rental_flag == Some(true)).then_some(Operation::Rental))
    }

    fn absorb(&mut self, record: &Map<String, Value>, depth: usize) {
        for (key, value) in record {
            let Some(field) = resolve_field(key) else {
                continue;
            };
            match field {
                RawField::Id => fill(&mut self.id, text(value)),
                RawField::Code => fill(&mut self.code, code(value)),
                RawField::Link => fill(&mut self.link, text(value)),
                RawField::Status => fill(&mut self.status, text(value)),
                RawField::Published => fill(&mut self.published, flag(value)),
                RawField::Operation => self.absorb_operation(value),
                RawField::SaleFlag => fill(&mut self.sale_flag, flag(value)),
                RawField::RentalFlag => fill(&mut self.rental_flag, flag(value)),
                RawField::Region => fill(&mut self.region, text(value)),
                RawField::Locality => fill(&mut self.locality, text(value)),
                RawField::Sector => fill(&mut self.sector, text(value)),
                RawField::Bedrooms => fill(&mut self.bedrooms, number(value)),
                RawField::Bathrooms => fill(&mut self.bathrooms, number(value)),
                RawField::CommonExpenses => fill(&mut self.common_expenses, number(value)),
                RawField::Description => fill(&mut self.description, text(value)),
                RawField::Amenities => fill(&mut self.amenities, amenity_map(value)),
                RawField::Price => self.absorb_price(value),
                RawField::Nested => {
                    // Enriched records nest location and attributes one level deep.
                    if let (Value::Object(inner), 0) = (value, depth) {
                        self.absorb(inner, depth + 1);
                    }
                }
            }
        }
    }

    /// "operacion" is either a tag ("venta") or, in spreadsheet exports, the
    /// "En Venta" yes/no column.
    fn absorb_operation(&mut self, value: &Value) {
        if let Some(tag) = text(value) {
            let folded = normalize_text(&tag);
            if matches!(folded.as_str(), "si" | "x" | "true" | "1" | "yes") {
                fill(&mut self.sale_flag, Some(true));
                return;
            }
            if matches!(folded.as_str(), "no" | "false" | "0") {
                fill(&mut self.rental_flag, Some(true));
                return;
            }
            fill(&mut self.operation, Some(tag));
        } else if let Value::Bool(for_sale) = value {
            if *for_sale {
                fill(&mut self.sale_flag, Some(true));
            } else {
                fill(&mut self.rental_flag, Some(true));
            }
        }
    }

    fn absorb_price(&mut self, value: &Value) {
        let Value::Object(blocks) = value else {
            return;
        };
        for (key, block) in blocks {
            let Value::Object(block) = block else {
                continue;
            };
            match normalize_key(key).as_str() {
                "venta" | "sale" => fill(&mut self.sale_price, Some(price_block(block))),
                "arriendo" | "alquiler" | "rental" => {
                    fill(&mut self.rental_price, Some(price_block(block)))
                }
                _ => {}
            }
        }
        if self.sale_price.is_none() && self.rental_price.is_none() {
            // Enriched shape: {"valor": 4200, "moneda": "UF"}, active iff valued.
            let flat = price_block(blocks);
            if flat.principal.is_some() || flat.currency_tag.is_some() {
                let valued = flat.principal.is_some();
                fill(
                    &mut self.flat_price,
                    Some(RawPriceBlock {
                        active: flat.active.or(Some(valued)),
                        ..flat
                    }),
                );
            }
        }
    }
}

fn price_block(block: &Map<String, Value>) -> RawPriceBlock {
    let mut out = RawPriceBlock::default();
    for (key, value) in block {
        match normalize_key(key).as_str() {
            "activo" | "activa" | "active" | "vigente" => fill(&mut out.active, flag(value)),
            "principal" | "valor" | "monto" | "value" => fill(&mut out.principal, number(value)),
            "uf" | "valor_uf" | "precio_uf" => fill(&mut out.reference_amount, number(value)),
            "pesos" | "clp" | "valor_pesos" | "precio_clp" => {
                fill(&mut out.local_amount, number(value))
            }
            "divisa" | "moneda" | "currency" => fill(&mut out.currency_tag, text(value)),
            _ => {}
        }
    }
    out
}

fn fill<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Property codes come as "12.345-6" or 12345; both reduce to digits/letters.
fn code(value: &Value) -> Option<String> {
    text(value)
        .map(|s| s.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|s| !s.is_empty())
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => parse_grouped_number(s),
        _ => None,
    }
}

fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|v| v != 0.0),
        Value::String(s) => match normalize_text(s).as_str() {
            "si" | "x" | "true" | "1" | "yes" | "activo" | "activa" => Some(true),
            "no" | "false" | "0" | "" | "inactivo" | "inactiva" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn amenity_map(value: &Value) -> Option<BTreeMap<String, bool>> {
    match value {
        Value::Object(map) => Some(
            map.iter()
                .filter_map(|(k, v)| flag(v).map(|b| (k.clone(), b)))
                .collect(),
        ),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(text)
                .map(|tag| (tag, true))
                .collect(),
        ),
        _ => None,
    }
}
