//! promptgen - structured prompt builder
//!
//! Builds AI content-generation prompts from four fixed templates
//! (Chain-of-Thought, Tree-of-Thoughts, Active Prompting, Persona-based
//! Prompting) and keeps them as flat JSON files.
//!
//! # Architecture
//!
//! ```text
//! ~/PromptGenerator/
//! ├── prompts/       # {title_with_underscores}.json, newest first
//! ├── templates/     # reusable starting points, by title
//! └── history/       # {kind}_{yyyyMMdd_HHmmss}.json, bounded by mtime
//! ```
//!
//! # Example
//!
//! ```ignore
//! use promptgen::{HistoryConfig, PromptManager};
//!
//! let manager = PromptManager::open("prompts-home", HistoryConfig::default())?;
//! let mut prompt = manager.create("cot", "Photosynthesis")?;
//! prompt.set_field("topic", "Photosynthesis")?;
//! manager.save(&mut prompt, false)?;
//! println!("{}", prompt.generate_text());
//! ```

pub mod cli;
pub mod config;
mod error;
mod export;
mod manager;
pub mod prompt;

pub use config::{Config, ExportConfig, HistoryConfig};
pub use error::PromptError;
pub use export::{ExportFormat, ExportManager, prompt_text, render_html, render_markdown};
pub use manager::{HistoryEntry, PromptManager, PromptSummary, Store, slugify};
pub use prompt::{Expertise, Prompt, PromptBody, PromptKind, Record, Style};

/// Default number of history entries kept
pub const DEFAULT_MAX_HISTORY: usize = 50;
