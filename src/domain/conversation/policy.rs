//! Completion policy - decides, from a declarative field table, whether to
//! ask one more question or run the search.

use serde::Serialize;
use std::fmt;

use crate::domain::foundation::Money;
use crate::domain::search::FilterQuery;

use super::slots::{FieldKey, SearchSlots};
use super::state::ConversationState;

const OPERATION_PROMPT: &str = "¿Buscas propiedades en venta o en arriendo?";
const LOCATION_PROMPT: &str = "¿En qué comuna te gustaría buscar?";
const BUDGET_PROMPT: &str = "¿Cuál es tu presupuesto? Puedes indicarlo en pesos o en UF, \
     por ejemplo \"hasta 900.000\" o \"hasta 5.000 UF\".";
const AMENITIES_PROMPT: &str =
    "¿Necesitas alguna comodidad en particular, como piscina o estacionamiento?";

/// Asked when the user's message could not be understood at all.
pub const REFORMULATE_PROMPT: &str = "No logré entender tu búsqueda. ¿Podrías reformularla? \
     Por ejemplo: \"departamento en arriendo en Providencia hasta 900.000\".";

/// Static definition of one searchable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub required: bool,
    /// Lower asks first.
    pub priority: u8,
    pub prompt: &'static str,
    /// Fields sharing a group are substitutable: any one satisfies all.
    pub group: Option<&'static str>,
}

impl FieldSpec {
    pub const fn required(key: FieldKey, priority: u8, prompt: &'static str) -> Self {
        Self {
            key,
            required: true,
            priority,
            prompt,
            group: None,
        }
    }

    pub const fn optional(key: FieldKey, priority: u8, prompt: &'static str) -> Self {
        Self {
            key,
            required: false,
            priority,
            prompt,
            group: None,
        }
    }

    pub const fn in_group(mut self, group: &'static str) -> Self {
        self.group = Some(group);
        self
    }
}

/// The field table the service runs with.
pub fn default_field_table() -> Vec<FieldSpec> {
    vec![
        FieldSpec::required(FieldKey::Operation, 1, OPERATION_PROMPT),
        FieldSpec::required(FieldKey::Location, 2, LOCATION_PROMPT),
        // Pesos lead the group: the budget question reports `price_max_clp`.
        FieldSpec::required(FieldKey::PriceMaxClp, 3, BUDGET_PROMPT).in_group("budget"),
        FieldSpec::required(FieldKey::PriceMaxUf, 3, BUDGET_PROMPT).in_group("budget"),
        FieldSpec::required(FieldKey::PriceMinUf, 3, BUDGET_PROMPT).in_group("budget"),
        FieldSpec::required(FieldKey::PriceMinClp, 3, BUDGET_PROMPT).in_group("budget"),
        FieldSpec::optional(FieldKey::Amenities, 10, AMENITIES_PROMPT),
    ]
}

/// What a clarification asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "&'static str")]
pub enum AskFor {
    Field(FieldKey),
    /// Whether a pending amount is a ceiling or a floor.
    PriceDirection,
}

impl AskFor {
    pub fn id(&self) -> &'static str {
        match self {
            AskFor::Field(key) => key.id(),
            AskFor::PriceDirection => "price_direction",
        }
    }
}

impl From<AskFor> for &'static str {
    fn from(ask: AskFor) -> Self {
        ask.id()
    }
}

impl fmt::Display for AskFor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One targeted question plus the partial state it was asked from.
#[derive(Debug, Clone, PartialEq)]
pub struct Clarification {
    pub ask_for: AskFor,
    pub prompt: String,
    pub state: ConversationState,
}

impl Clarification {
    /// Same question target, different wording.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }
}

/// Where the conversation stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPhase {
    Collecting,
    Ready,
}

/// Ask-vs-search outcome for one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    Ask(Clarification),
    Search {
        query: FilterQuery,
        /// Unsatisfied optional fields, reported but never asked.
        missing_fields: Vec<FieldKey>,
    },
}

/// Evaluates conversation state against a field table.
#[derive(Debug, Clone)]
pub struct CompletionPolicy {
    fields: Vec<FieldSpec>,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self::new(default_field_table())
    }
}

impl CompletionPolicy {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Satisfied when the key is set, or any member of its group is.
    pub fn is_satisfied(&self, spec: &FieldSpec, slots: &SearchSlots) -> bool {
        if slots.has(spec.key) {
            return true;
        }
        match spec.group {
            Some(group) => self
                .fields
                .iter()
                .any(|other| other.group == Some(group) && slots.has(other.key)),
            None => false,
        }
    }

    /// Unsatisfied fields, required before optional, then by priority.
    /// Ties keep table order.
    pub fn unsatisfied(&self, slots: &SearchSlots) -> Vec<&FieldSpec> {
        let mut pending: Vec<&FieldSpec> = self
            .fields
            .iter()
            .filter(|spec| !self.is_satisfied(spec, slots))
            .collect();
        pending.sort_by_key(|spec| (!spec.required, spec.priority));
        pending
    }

    pub fn phase(&self, state: &ConversationState) -> PolicyPhase {
        let collecting = state.pending_price.is_some()
            || self
                .unsatisfied(&state.filters)
                .iter()
                .any(|spec| spec.required);
        if collecting {
            PolicyPhase::Collecting
        } else {
            PolicyPhase::Ready
        }
    }

    /// Asks for at most one thing per turn; searches once every required
    /// field (or its group) is satisfied.
    pub fn decide(&self, state: &ConversationState) -> Decision {
        if let Some(amount) = state.pending_price {
            return Decision::Ask(Clarification {
                ask_for: AskFor::PriceDirection,
                prompt: direction_prompt(amount),
                state: state.clone(),
            });
        }

        let unsatisfied = self.unsatisfied(&state.filters);
        if let Some(spec) = unsatisfied.iter().find(|spec| spec.required) {
            return Decision::Ask(Clarification {
                ask_for: AskFor::Field(spec.key),
                prompt: spec.prompt.to_string(),
                state: state.clone(),
            });
        }

        Decision::Search {
            query: state.filters.to_filter_query(),
            missing_fields: unsatisfied.iter().map(|spec| spec.key).collect(),
        }
    }
}

fn direction_prompt(amount: Money) -> String {
    format!("¿{amount} es tu presupuesto máximo o mínimo?")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::listing::Operation;

    fn policy() -> CompletionPolicy {
        CompletionPolicy::default()
    }

    fn state(filters: SearchSlots) -> ConversationState {
        ConversationState::new(filters, None)
    }

    fn complete() -> SearchSlots {
        SearchSlots {
            operation: Some(Operation::Rental),
            location: Some("providencia".into()),
            price_max_clp: Some(900_000.0),
            ..Default::default()
        }
    }

    fn asked(decision: Decision) -> Clarification {
        match decision {
            Decision::Ask(clarification) => clarification,
            other => panic!("expected a clarification, got {other:?}"),
        }
    }

    mod ask {
        use super::*;

        #[test]
        fn empty_state_asks_operation_first() {
            let c = asked(policy().decide(&state(SearchSlots::new())));
            assert_eq!(c.ask_for, AskFor::Field(FieldKey::Operation));
            assert_eq!(c.prompt, OPERATION_PROMPT);
        }

        #[test]
        fn asks_in_priority_order() {
            let c = asked(policy().decide(&state(SearchSlots {
                operation: Some(Operation::Sale),
                ..Default::default()
            })));
            assert_eq!(c.ask_for.id(), "location");

            let c = asked(policy().decide(&state(SearchSlots {
                operation: Some(Operation::Sale),
                location: Some("macul".into()),
                ..Default::default()
            })));
            assert_eq!(c.prompt, BUDGET_PROMPT);
            assert_eq!(c.ask_for, AskFor::Field(FieldKey::PriceMaxClp));
        }

        #[test]
        fn carries_partial_state() {
            let partial = SearchSlots {
                location: Some("macul".into()),
                ..Default::default()
            };
            let c = asked(policy().decide(&state(partial.clone())));
            assert_eq!(c.state.filters, partial);
        }

        #[test]
        fn pending_price_takes_precedence() {
            let s = ConversationState::new(SearchSlots::new(), Some(Money::uf(4_000.0)));
            let c = asked(policy().decide(&s));
            assert_eq!(c.ask_for, AskFor::PriceDirection);
            assert_eq!(c.ask_for.id(), "price_direction");
            assert!(c.prompt.contains("4000 UF"));
        }
    }

    mod search {
        use super::*;

        #[test]
        fn any_budget_member_satisfies_group() {
            for budget in [
                SearchSlots { price_max_uf: Some(5_000.0), ..Default::default() },
                SearchSlots { price_min_clp: Some(1.0), ..Default::default() },
            ] {
                let slots = SearchSlots {
                    price_max_clp: None,
                    ..complete()
                }
                .merge(&budget);
                assert!(matches!(policy().decide(&state(slots)), Decision::Search { .. }));
            }
        }

        #[test]
        fn optional_fields_never_ask() {
            match policy().decide(&state(complete())) {
                Decision::Search { query, missing_fields } => {
                    assert_eq!(query.operation(), Some(Operation::Rental));
                    assert_eq!(missing_fields, vec![FieldKey::Amenities]);
                }
                other => panic!("expected search, got {other:?}"),
            }
        }
    }

    mod phase {
        use super::*;

        #[test]
        fn collecting_until_required_satisfied() {
            assert_eq!(policy().phase(&state(SearchSlots::new())), PolicyPhase::Collecting);
            assert_eq!(policy().phase(&state(complete())), PolicyPhase::Ready);
        }

        #[test]
        fn pending_price_keeps_collecting() {
            let s = ConversationState::new(complete(), Some(Money::clp(1.0)));
            assert_eq!(policy().phase(&s), PolicyPhase::Collecting);
        }
    }

    #[test]
    fn unsatisfied_sorts_required_before_optional() {
        let table = vec![
            FieldSpec::optional(FieldKey::Amenities, 0, AMENITIES_PROMPT),
            FieldSpec::required(FieldKey::Location, 5, LOCATION_PROMPT),
            FieldSpec::required(FieldKey::Operation, 1, OPERATION_PROMPT),
        ];
        let keys: Vec<FieldKey> = CompletionPolicy::new(table)
            .unsatisfied(&SearchSlots::new())
            .iter()
            .map(|spec| spec.key)
            .collect();
        assert_eq!(
            keys,
            vec![FieldKey::Operation, FieldKey::Location, FieldKey::Amenities]
        );
    }
}
