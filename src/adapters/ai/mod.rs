//! Persona responder adapters.

mod mock_responder;
mod openai_responder;

pub use mock_responder::{MockPersonaResponder, ScriptedReply};
pub use openai_responder::{OpenAiResponder, ResponderConfig};
