//! Prompt text generation
//!
//! Each kind renders through one fixed template. Blank fields render as
//! empty substrings; user text is inserted as-is.

use super::model::{Active, ChainOfThought, Persona, Prompt, PromptBody, TreeOfThoughts};

impl ChainOfThought {
    pub fn generate_text(&self) -> String {
        format!(
            "Topic: {topic}\n\n\
             For {audience}, I need a detailed explanation on {topic} that achieves the following learning objective:\n\
             {objective}\n\n\
             Please use a Chain-of-Thought approach to break down this topic into the following logical steps:\n\
             {steps}\n\n\
             The content should be in {format} format and approximately {length} in length.",
            topic = self.topic,
            audience = self.audience,
            objective = self.objective,
            steps = self.steps,
            format = self.format,
            length = self.length,
        )
    }
}

impl TreeOfThoughts {
    pub fn generate_text(&self) -> String {
        format!(
            "Topic: {topic}\n\n\
             For {audience}, I need an exploration of {topic} that achieves the following learning objective:\n\
             {objective}\n\n\
             Please use a Tree-of-Thoughts approach to explore these different solution paths:\n\
             {branches}\n\n\
             Evaluate each path using these criteria:\n\
             {evaluation}\n\n\
             The content should be in {format} format and approximately {length} in length.",
            topic = self.topic,
            audience = self.audience,
            objective = self.objective,
            branches = self.branches,
            evaluation = self.evaluation,
            format = self.format,
            length = self.length,
        )
    }
}

impl Active {
    pub fn generate_text(&self) -> String {
        format!(
            "Topic: {topic}\n\n\
             For {audience}, I need an interactive learning experience on {topic} that achieves the following learning objective:\n\
             {objective}\n\n\
             Begin with this initial question:\n\
             {initial_question}\n\n\
             Then use these follow-up prompts to guide the learning process:\n\
             {followups}\n\n\
             The content should be in {format} format and approximately {length} in length.",
            topic = self.topic,
            audience = self.audience,
            objective = self.objective,
            initial_question = self.initial_question,
            followups = self.followups,
            format = self.format,
            length = self.length,
        )
    }
}

impl Persona {
    pub fn generate_text(&self) -> String {
        format!(
            "Topic: {topic}\n\n\
             For {audience}, I need content on {topic} that achieves the following learning objective:\n\
             {objective}\n\n\
             Please respond as if you are a {expertise} {role} with the following specific knowledge:\n\
             {knowledge}\n\n\
             Use a {style} communication style.\n\n\
             The content should be in {format} format and approximately {length} in length.",
            topic = self.topic,
            audience = self.audience,
            objective = self.objective,
            expertise = self.expertise,
            role = self.role,
            knowledge = self.knowledge,
            style = self.style,
            format = self.format,
            length = self.length,
        )
    }
}

impl PromptBody {
    /// Render with the template selected by this body's kind
    pub fn generate_text(&self) -> String {
        match self {
            Self::ChainOfThought(p) => p.generate_text(),
            Self::TreeOfThoughts(p) => p.generate_text(),
            Self::Active(p) => p.generate_text(),
            Self::Persona(p) => p.generate_text(),
        }
    }
}

impl Prompt {
    /// Final prompt text for this prompt
    pub fn generate_text(&self) -> String {
        self.body().generate_text()
    }
}
