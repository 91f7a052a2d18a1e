//! Prompt entity
//!
//! A `Prompt` is shared metadata (title, timestamps) plus a `PromptBody`
//! whose variant fixes the prompt kind for the lifetime of the value.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::kind::{Expertise, PromptKind, Style};
use crate::error::PromptError;

/// Local wall-clock time, as stored in prompt files
pub type Timestamp = NaiveDateTime;

/// Current local time
pub fn now() -> Timestamp {
    chrono::Local::now().naive_local()
}

/// Fields of a Chain-of-Thought prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainOfThought {
    pub topic: String,
    pub audience: String,
    pub objective: String,
    pub steps: String,
    pub format: String,
    pub length: String,
}

/// Fields of a Tree-of-Thoughts prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOfThoughts {
    pub topic: String,
    pub audience: String,
    pub objective: String,
    pub branches: String,
    pub evaluation: String,
    pub format: String,
    pub length: String,
}

/// Fields of an Active Prompting prompt
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Active {
    pub topic: String,
    pub audience: String,
    pub objective: String,
    pub initial_question: String,
    pub followups: String,
    pub format: String,
    pub length: String,
}

/// Fields of a Persona-based prompt
///
/// `expertise` and `style` are normally one of the `Expertise` / `Style`
/// choices, but are kept as text so placeholder templates survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    pub topic: String,
    pub audience: String,
    pub objective: String,
    pub role: String,
    pub expertise: String,
    pub style: String,
    pub knowledge: String,
    pub format: String,
    pub length: String,
}

impl Persona {
    /// The expertise level, if the text names one of the offered choices
    pub fn expertise_level(&self) -> Option<Expertise> {
        self.expertise.parse().ok()
    }

    /// The communication style, if the text names one of the offered choices
    pub fn communication_style(&self) -> Option<Style> {
        self.style.parse().ok()
    }
}

/// Kind-specific part of a prompt, tagged by `type` in records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PromptBody {
    #[serde(rename = "cot")]
    ChainOfThought(ChainOfThought),
    #[serde(rename = "tot")]
    TreeOfThoughts(TreeOfThoughts),
    #[serde(rename = "active")]
    Active(Active),
    #[serde(rename = "persona")]
    Persona(Persona),
}

impl PromptBody {
    /// A body of the given kind with every field blank
    pub fn empty(kind: PromptKind) -> Self {
        match kind {
            PromptKind::ChainOfThought => Self::ChainOfThought(ChainOfThought::default()),
            PromptKind::TreeOfThoughts => Self::TreeOfThoughts(TreeOfThoughts::default()),
            PromptKind::Active => Self::Active(Active::default()),
            PromptKind::Persona => Self::Persona(Persona::default()),
        }
    }

    pub fn kind(&self) -> PromptKind {
        match self {
            Self::ChainOfThought(_) => PromptKind::ChainOfThought,
            Self::TreeOfThoughts(_) => PromptKind::TreeOfThoughts,
            Self::Active(_) => PromptKind::Active,
            Self::Persona(_) => PromptKind::Persona,
        }
    }

    /// Read a field by its snake_case name
    pub fn field(&self, name: &str) -> Option<&str> {
        let value = match (self, name) {
            (Self::ChainOfThought(p), "topic") => &p.topic,
            (Self::ChainOfThought(p), "audience") => &p.audience,
            (Self::ChainOfThought(p), "objective") => &p.objective,
            (Self::ChainOfThought(p), "steps") => &p.steps,
            (Self::ChainOfThought(p), "format") => &p.format,
            (Self::ChainOfThought(p), "length") => &p.length,
            (Self::TreeOfThoughts(p), "topic") => &p.topic,
            (Self::TreeOfThoughts(p), "audience") => &p.audience,
            (Self::TreeOfThoughts(p), "objective") => &p.objective,
            (Self::TreeOfThoughts(p), "branches") => &p.branches,
            (Self::TreeOfThoughts(p), "evaluation") => &p.evaluation,
            (Self::TreeOfThoughts(p), "format") => &p.format,
            (Self::TreeOfThoughts(p), "length") => &p.length,
            (Self::Active(p), "topic") => &p.topic,
            (Self::Active(p), "audience") => &p.audience,
            (Self::Active(p), "objective") => &p.objective,
            (Self::Active(p), "initial_question") => &p.initial_question,
            (Self::Active(p), "followups") => &p.followups,
            (Self::Active(p), "format") => &p.format,
            (Self::Active(p), "length") => &p.length,
            (Self::Persona(p), "topic") => &p.topic,
            (Self::Persona(p), "audience") => &p.audience,
            (Self::Persona(p), "objective") => &p.objective,
            (Self::Persona(p), "role") => &p.role,
            (Self::Persona(p), "expertise") => &p.expertise,
            (Self::Persona(p), "style") => &p.style,
            (Self::Persona(p), "knowledge") => &p.knowledge,
            (Self::Persona(p), "format") => &p.format,
            (Self::Persona(p), "length") => &p.length,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Mutable access to a field by its snake_case name
    pub fn field_mut(&mut self, name: &str) -> Option<&mut String> {
        let value = match (self, name) {
            (Self::ChainOfThought(p), "topic") => &mut p.topic,
            (Self::ChainOfThought(p), "audience") => &mut p.audience,
            (Self::ChainOfThought(p), "objective") => &mut p.objective,
            (Self::ChainOfThought(p), "steps") => &mut p.steps,
            (Self::ChainOfThought(p), "format") => &mut p.format,
            (Self::ChainOfThought(p), "length") => &mut p.length,
            (Self::TreeOfThoughts(p), "topic") => &mut p.topic,
            (Self::TreeOfThoughts(p), "audience") => &mut p.audience,
            (Self::TreeOfThoughts(p), "objective") => &mut p.objective,
            (Self::TreeOfThoughts(p), "branches") => &mut p.branches,
            (Self::TreeOfThoughts(p), "evaluation") => &mut p.evaluation,
            (Self::TreeOfThoughts(p), "format") => &mut p.format,
            (Self::TreeOfThoughts(p), "length") => &mut p.length,
            (Self::Active(p), "topic") => &mut p.topic,
            (Self::Active(p), "audience") => &mut p.audience,
            (Self::Active(p), "objective") => &mut p.objective,
            (Self::Active(p), "initial_question") => &mut p.initial_question,
            (Self::Active(p), "followups") => &mut p.followups,
            (Self::Active(p), "format") => &mut p.format,
            (Self::Active(p), "length") => &mut p.length,
            (Self::Persona(p), "topic") => &mut p.topic,
            (Self::Persona(p), "audience") => &mut p.audience,
            (Self::Persona(p), "objective") => &mut p.objective,
            (Self::Persona(p), "role") => &mut p.role,
            (Self::Persona(p), "expertise") => &mut p.expertise,
            (Self::Persona(p), "style") => &mut p.style,
            (Self::Persona(p), "knowledge") => &mut p.knowledge,
            (Self::Persona(p), "format") => &mut p.format,
            (Self::Persona(p), "length") => &mut p.length,
            _ => return None,
        };
        Some(value)
    }
}

/// A prompt of one of the four kinds plus its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// User-assigned title; filled in on save when left blank
    #[serde(default)]
    pub title: String,

    #[serde(flatten)]
    body: PromptBody,

    /// Set at construction, never changed afterwards
    #[serde(
        default = "now",
        serialize_with = "timestamp::serialize",
        deserialize_with = "timestamp::deserialize_or_now"
    )]
    created_at: Timestamp,

    /// Refreshed on every save
    #[serde(
        default = "now",
        serialize_with = "timestamp::serialize",
        deserialize_with = "timestamp::deserialize_or_now"
    )]
    updated_at: Timestamp,
}

impl Prompt {
    /// Create a blank prompt of the given kind
    pub fn new(kind: PromptKind, title: impl Into<String>) -> Self {
        Self::with_body(title, PromptBody::empty(kind))
    }

    /// Create a prompt from an already populated body
    pub fn with_body(title: impl Into<String>, body: PromptBody) -> Self {
        let now = now();
        Self {
            title: title.into(),
            body,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> PromptKind {
        self.body.kind()
    }

    pub fn body(&self) -> &PromptBody {
        &self.body
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Read a field by name; `None` if the kind has no such field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.body.field(name)
    }

    /// Replace the value of one field, as a form edit would
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), PromptError> {
        let kind = self.kind();
        match self.body.field_mut(name) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(PromptError::UnknownField {
                kind: kind.to_string(),
                field: name.to_string(),
            }),
        }
    }

    /// Refresh `updated_at`, never letting it fall behind `created_at`
    pub(crate) fn touch(&mut self) {
        self.updated_at = now().max(self.created_at);
    }
}

/// ISO-8601 encoding of timestamps in records
pub(crate) mod timestamp {
    use chrono::{DateTime, Local, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Timestamp, now};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn format(ts: &Timestamp) -> String {
        ts.format(FORMAT).to_string()
    }

    /// Parse a local ISO-8601 time, or an RFC 3339 time with an offset
    pub fn parse(s: &str) -> Option<Timestamp> {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, FORMAT)
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.with_timezone(&Local).naive_local()))
    }

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(ts))
    }

    /// Unparsable or non-string values fall back to the current time
    pub fn deserialize_or_now<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(|v| v.as_str()).and_then(parse).unwrap_or_else(now))
    }
}
