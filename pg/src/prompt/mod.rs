//! Prompt model
//!
//! Kinds, the prompt entity, its text templates and its record form.

mod kind;
mod model;
mod record;
mod render;

pub use kind::{Expertise, PromptKind, Style};
pub use model::{Active, ChainOfThought, Persona, Prompt, PromptBody, Timestamp, TreeOfThoughts, now};
pub use record::{Record, record_kind, record_str, to_pretty_json};

pub(crate) use model::timestamp;
