//! Prompt kinds and persona choice lists

use serde::{Deserialize, Serialize};

use crate::error::PromptError;

/// The four prompt templates a prompt can follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PromptKind {
    #[serde(rename = "cot")]
    ChainOfThought,
    #[serde(rename = "tot")]
    TreeOfThoughts,
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "persona")]
    Persona,
}

impl PromptKind {
    /// All kinds, in the order the templates are offered
    pub const ALL: [PromptKind; 4] = [Self::ChainOfThought, Self::TreeOfThoughts, Self::Active, Self::Persona];

    /// Short tag stored in the `type` field of a record
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ChainOfThought => "cot",
            Self::TreeOfThoughts => "tot",
            Self::Active => "active",
            Self::Persona => "persona",
        }
    }

    /// Human-readable template name
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChainOfThought => "Chain-of-Thought",
            Self::TreeOfThoughts => "Tree-of-Thoughts",
            Self::Active => "Active Prompting",
            Self::Persona => "Persona-based Prompting",
        }
    }

    /// Ordered snake_case names of the free-text fields this kind carries
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::ChainOfThought => &["topic", "audience", "objective", "steps", "format", "length"],
            Self::TreeOfThoughts => &[
                "topic",
                "audience",
                "objective",
                "branches",
                "evaluation",
                "format",
                "length",
            ],
            Self::Active => &[
                "topic",
                "audience",
                "objective",
                "initial_question",
                "followups",
                "format",
                "length",
            ],
            Self::Persona => &[
                "topic",
                "audience",
                "objective",
                "role",
                "expertise",
                "style",
                "knowledge",
                "format",
                "length",
            ],
        }
    }

    /// Check whether `field` belongs to this kind's field set
    pub fn has_field(&self, field: &str) -> bool {
        self.fields().contains(&field)
    }
}

impl std::fmt::Display for PromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

impl std::str::FromStr for PromptKind {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cot" => Ok(Self::ChainOfThought),
            "tot" => Ok(Self::TreeOfThoughts),
            "active" => Ok(Self::Active),
            "persona" => Ok(Self::Persona),
            _ => Err(PromptError::UnsupportedKind(s.to_string())),
        }
    }
}

/// Expertise levels offered for a persona
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expertise {
    Beginner,
    Intermediate,
    Expert,
    WorldClassExpert,
}

impl Expertise {
    pub const ALL: [Expertise; 4] = [Self::Beginner, Self::Intermediate, Self::Expert, Self::WorldClassExpert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Expert => "Expert",
            Self::WorldClassExpert => "World-class Expert",
        }
    }
}

impl std::fmt::Display for Expertise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Expertise {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown expertise level: {}", s))
    }
}

/// Communication styles offered for a persona
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Academic,
    Conversational,
    Technical,
    Simplified,
    Socratic,
}

impl Style {
    pub const ALL: [Style; 5] = [
        Self::Academic,
        Self::Conversational,
        Self::Technical,
        Self::Simplified,
        Self::Socratic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Academic => "Academic",
            Self::Conversational => "Conversational",
            Self::Technical => "Technical",
            Self::Simplified => "Simplified",
            Self::Socratic => "Socratic",
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown communication style: {}", s))
    }
}
