//! Conversation domain module.
//!
//! Turns free text into search filters one turn at a time:
//! extraction ([`SlotExtractor`]), merge ([`ConversationState::apply`]) and
//! the ask-vs-search decision ([`CompletionPolicy`]).

mod classified;
mod extractor;
mod gazetteer;
mod policy;
mod slots;
mod state;

pub use classified::{ClassifiedFilters, ClassifiedIntent};
pub use extractor::{Extraction, SlotExtractor};
pub use gazetteer::Gazetteer;
pub use policy::{
    default_field_table, AskFor, Clarification, CompletionPolicy, Decision, FieldSpec,
    PolicyPhase, REFORMULATE_PROMPT,
};
pub use slots::{FieldKey, SearchSlots};
pub use state::{ConversationState, PriceDirection};
