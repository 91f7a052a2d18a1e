//! CLI argument parsing for promptgen

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::export::ExportFormat;
use crate::prompt::PromptKind;

#[derive(Parser, Debug)]
#[command(name = "pg")]
#[command(author, version, about = "Build structured AI prompts from fixed templates", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create and save a new prompt
    New {
        /// Prompt kind: cot, tot, active or persona
        #[arg(required = true)]
        kind: String,

        /// Title (generated from kind and time when omitted)
        #[arg(short, long, default_value = "")]
        title: String,

        /// Field assignment, e.g. --set topic=Photosynthesis (repeatable)
        #[arg(short, long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Save to the template store instead of the prompt store
        #[arg(long)]
        template: bool,
    },

    /// Change fields of a saved prompt and save it again
    Set {
        /// File name within the store
        #[arg(required = true)]
        filename: String,

        /// Field assignments, e.g. audience="10th graders"
        #[arg(required = true, value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,

        /// Edit a template instead of a prompt
        #[arg(long)]
        template: bool,
    },

    /// Print the generated text of a saved prompt
    Show {
        /// File name within the store
        #[arg(required = true)]
        filename: String,

        /// Read from the template store
        #[arg(long)]
        template: bool,
    },

    /// List saved prompts or templates
    List {
        /// Only show this kind
        #[arg(short, long)]
        kind: Option<PromptKind>,

        /// List templates instead of prompts
        #[arg(long)]
        templates: bool,
    },

    /// Show recent history entries, or remove them
    History {
        /// Maximum entries to show
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,

        /// Delete one history entry by file name
        #[arg(long, conflicts_with = "clear")]
        delete: Option<String>,

        /// Delete every history entry
        #[arg(long)]
        clear: bool,
    },

    /// Delete a saved prompt or template
    Delete {
        /// File name within the store
        #[arg(required = true)]
        filename: String,

        /// Delete from the template store
        #[arg(long)]
        template: bool,
    },

    /// Export a saved prompt as txt, md, html or json
    Export {
        /// File name within the store
        #[arg(required = true)]
        filename: String,

        /// Output path; the format's extension is appended if missing
        #[arg(required = true)]
        output: PathBuf,

        /// Output format (default: from the output extension)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Export from the template store
        #[arg(long)]
        template: bool,
    },

    /// Seed one starter template per kind
    InitTemplates,

    /// List the fields of a prompt kind
    Fields {
        /// Prompt kind: cot, tot, active or persona
        #[arg(required = true)]
        kind: PromptKind,
    },
}

/// Parse `field=value`
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => Ok((field.trim().to_string(), value.to_string())),
        _ => Err(format!("expected field=value, got '{}'", s)),
    }
}
