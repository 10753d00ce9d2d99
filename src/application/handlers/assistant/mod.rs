//! Assistant turn handler.

mod assistant_turn;

pub use assistant_turn::{
    AssistantError, AssistantReply, AssistantTurnCommand, AssistantTurnHandler, ResultLimits,
    SearchOutcome, MAX_MESSAGE_CHARS,
};
