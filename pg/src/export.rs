//! Prompt export
//!
//! Writes a prompt record as plain text, Markdown, standalone HTML or JSON.
//! The prompt text comes from, in order: a `generated_text` string in the
//! record, the record's own template, or a key/value listing of its fields.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::error::PromptError;
use crate::prompt::{Prompt, Record, record_str, to_pretty_json};

/// Keys left out of the fallback field listing
const SUMMARY_EXCLUDED_KEYS: [&str; 5] = ["title", "type", "created_at", "updated_at", "id"];

/// Output encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Txt,
    Md,
    Html,
    Json,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [Self::Txt, Self::Md, Self::Html, Self::Json];

    /// File extension, without the dot
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Md => "md",
            Self::Html => "html",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "txt" => Ok(Self::Txt),
            "md" => Ok(Self::Md),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown export format: {}", s)),
        }
    }
}

/// Exports prompt records to files
pub struct ExportManager {
    config: ExportConfig,
}

impl ExportManager {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Pick the output format: explicit choice, then a recognized extension, then the default
    pub fn resolve_format(&self, filepath: &Path, format: Option<ExportFormat>) -> ExportFormat {
        if let Some(format) = format {
            return format;
        }

        filepath
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse::<ExportFormat>().ok())
            .filter(|format| self.config.formats.contains(format))
            .unwrap_or(self.config.default_format)
    }

    /// Export a record, returning the path actually written
    ///
    /// The resolved format's extension is appended when `filepath` lacks it,
    /// so `out` exported as Markdown lands in `out.md`.
    pub fn export(
        &self,
        record: &Record,
        filepath: impl AsRef<Path>,
        format: Option<ExportFormat>,
    ) -> Result<PathBuf, PromptError> {
        let filepath = filepath.as_ref();
        let format = self.resolve_format(filepath, format);
        let path = with_extension(filepath, format);
        debug!(path = %path.display(), %format, "export: resolved target");

        let result = render(record, format).and_then(|content| fs::write(&path, content).map_err(PromptError::from));
        match result {
            Ok(()) => {
                info!(path = %path.display(), %format, "Exported prompt");
                Ok(path)
            }
            Err(e) => {
                warn!(path = %path.display(), %format, error = %e, "Failed to export prompt");
                Err(e)
            }
        }
    }

    /// Export a prompt through its record form
    pub fn export_prompt(
        &self,
        prompt: &Prompt,
        filepath: impl AsRef<Path>,
        format: Option<ExportFormat>,
    ) -> Result<PathBuf, PromptError> {
        self.export(&prompt.to_record()?, filepath, format)
    }
}

fn render(record: &Record, format: ExportFormat) -> Result<Vec<u8>, PromptError> {
    let content = match format {
        ExportFormat::Json => return Ok(to_pretty_json(record)?),
        ExportFormat::Txt => prompt_text(record),
        ExportFormat::Md => render_markdown(record, &prompt_text(record)),
        ExportFormat::Html => render_html(record, &prompt_text(record)),
    };
    Ok(content.into_bytes())
}

/// Append `.{ext}` unless the path already ends with it (case-insensitively)
fn with_extension(filepath: &Path, format: ExportFormat) -> PathBuf {
    let has_extension = filepath
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()));
    if has_extension {
        return filepath.to_path_buf();
    }

    let mut name = OsString::from(filepath.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// Text to export for a record
pub fn prompt_text(record: &Record) -> String {
    if let Some(text) = record.get("generated_text").and_then(Value::as_str) {
        return text.to_string();
    }
    match Prompt::from_record(record) {
        Ok(prompt) => prompt.generate_text(),
        Err(e) => {
            debug!(error = %e, "prompt_text: record has no template, listing fields");
            field_listing(record)
        }
    }
}

/// Generic rendering for records that have no template
fn field_listing(record: &Record) -> String {
    let title = match record_str(record, "title") {
        "" => "Untitled",
        title => title,
    };
    let mut text = format!("Title: {}\n\n", title);

    for (key, value) in record {
        if SUMMARY_EXCLUDED_KEYS.contains(&key.as_str()) || !is_truthy(value) {
            continue;
        }
        text.push_str(&format!("{}: {}\n\n", title_case(&key.replace('_', " ")), display_value(value)));
    }
    text
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Capitalize the first letter of each alphabetic run, lowercasing the rest
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn display_title(record: &Record) -> &str {
    match record_str(record, "title") {
        "" => "Untitled Prompt",
        title => title,
    }
}

fn created_at(record: &Record) -> Option<String> {
    record.get("created_at").map(display_value)
}

/// Markdown document: title, type, creation time, then the prompt
pub fn render_markdown(record: &Record, text: &str) -> String {
    let mut md = format!("# {}\n\n", display_title(record));
    md.push_str(&format!("**Type:** {}\n\n", record_str(record, "type").to_uppercase()));
    if let Some(created) = created_at(record) {
        md.push_str(&format!("**Created:** {}\n\n", created));
    }
    md.push_str("## Prompt\n\n");
    md.push_str(text);
    md
}

const HTML_STYLE: &str = "    <style>
        body {
            font-family: Arial, sans-serif;
            line-height: 1.6;
            margin: 0;
            padding: 20px;
            color: #333;
        }
        .container {
            max-width: 800px;
            margin: 0 auto;
            background: #fff;
            padding: 20px;
            border-radius: 5px;
            box-shadow: 0 0 10px rgba(0,0,0,0.1);
        }
        h1 {
            color: #2c3e50;
            border-bottom: 2px solid #eee;
            padding-bottom: 10px;
        }
        .meta {
            color: #7f8c8d;
            font-size: 0.9em;
            margin-bottom: 20px;
        }
        .prompt-text {
            background: #f9f9f9;
            padding: 15px;
            border-left: 4px solid #2c3e50;
            margin-bottom: 20px;
        }
    </style>
";

/// Self-contained HTML page; each non-blank line becomes a `<p>`, each blank line a `<br>`
pub fn render_html(record: &Record, text: &str) -> String {
    let title = escape_html(display_title(record));
    let kind = escape_html(&record_str(record, "type").to_uppercase());

    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n    <meta charset='UTF-8'>\n    \
         <meta name='viewport' content='width=device-width, initial-scale=1.0'>\n",
    );
    html.push_str(&format!("    <title>{}</title>\n", title));
    html.push_str(HTML_STYLE);
    html.push_str("</head>\n<body>\n    <div class='container'>\n");
    html.push_str(&format!("        <h1>{}</h1>\n", title));
    html.push_str("        <div class='meta'>\n");
    html.push_str(&format!("            <strong>Type:</strong> {}<br>\n", kind));
    if let Some(created) = created_at(record) {
        html.push_str(&format!("            <strong>Created:</strong> {}<br>\n", escape_html(&created)));
    }
    html.push_str("        </div>\n        <h2>Prompt</h2>\n        <div class='prompt-text'>\n");
    for line in text.split('\n') {
        if line.trim().is_empty() {
            html.push_str("<br>\n");
        } else {
            html.push_str(&format!("<p>{}</p>\n", escape_html(line)));
        }
    }
    html.push_str("        </div>\n    </div>\n</body>\n</html>\n");
    html
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
