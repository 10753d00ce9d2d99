//! Sale vs. rental.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::normalize_text;

/// Commercial operation a listing is offered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    #[serde(rename = "venta", alias = "sale")]
    Sale,
    #[serde(rename = "arriendo", alias = "rental")]
    Rental,
}

impl Operation {
    /// Parses an operation tag from a source record or a collaborator.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalize_text(tag).as_str() {
            "venta" | "sale" | "en venta" | "compra" => Some(Operation::Sale),
            "arriendo" | "alquiler" | "rental" | "rent" | "en arriendo" => Some(Operation::Rental),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Operation::Sale => "venta",
            Operation::Rental => "arriendo",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
