//! Prompt, template and history stores
//!
//! Each store is a directory of one-record-per-file JSON documents under the
//! manager's base path. Prompts and templates are keyed by a slug of their
//! title; history entries are keyed by kind and save time and pruned by file
//! modification time.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::config::HistoryConfig;
use crate::error::PromptError;
use crate::prompt::{Prompt, PromptKind, Record, Timestamp, record_kind, record_str, timestamp, to_pretty_json};

/// The three on-disk stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Store {
    Prompts,
    Templates,
    History,
}

impl Store {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Prompts => "prompts",
            Self::Templates => "templates",
            Self::History => "history",
        }
    }

    fn for_template(as_template: bool) -> Self {
        if as_template { Self::Templates } else { Self::Prompts }
    }
}

/// Listing entry for a stored prompt
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSummary {
    /// File name within its store
    pub filename: String,
    pub title: String,
    /// `None` when the file names a kind this version does not know
    pub kind: Option<PromptKind>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl PromptSummary {
    fn from_record(filename: String, record: &Record) -> Self {
        Self {
            filename,
            title: record_str(record, "title").to_string(),
            kind: record_kind(record).ok(),
            created_at: timestamp::parse(record_str(record, "created_at")),
            updated_at: timestamp::parse(record_str(record, "updated_at")),
        }
    }
}

/// A history entry with the full stored record
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub summary: PromptSummary,
    pub content: Record,
}

/// File name for a title: spaces and path separators become underscores
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .chars()
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            other => other,
        })
        .collect();
    format!("{}.json", slug)
}

/// Manages the prompt, template and history stores
pub struct PromptManager {
    /// Root holding the three store directories
    base_path: PathBuf,
    /// History recording and pruning settings
    history: HistoryConfig,
}

impl PromptManager {
    /// Open the stores under `path`, creating the directories if needed
    pub fn open(path: impl AsRef<Path>, history: HistoryConfig) -> Result<Self, PromptError> {
        let base_path = path.as_ref().to_path_buf();
        for store in [Store::Prompts, Store::Templates, Store::History] {
            fs::create_dir_all(base_path.join(store.dir_name()))?;
        }
        debug!(?base_path, "Opened prompt stores");
        Ok(Self { base_path, history })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Directory backing a store
    pub fn store_dir(&self, store: Store) -> PathBuf {
        self.base_path.join(store.dir_name())
    }

    /// Create a blank prompt of the named kind
    pub fn create(&self, kind: &str, title: &str) -> Result<Prompt, PromptError> {
        let kind: PromptKind = kind.parse()?;
        debug!(%kind, title, "create: blank prompt");
        Ok(Prompt::new(kind, title))
    }

    /// Save a prompt to the prompt store, or the template store when `as_template`
    ///
    /// A blank title is replaced with `{KIND}_{yyyyMMdd_HHmmss}` and `updated_at`
    /// is refreshed. Non-template saves also record a history entry.
    pub fn save(&self, prompt: &mut Prompt, as_template: bool) -> Result<PathBuf, PromptError> {
        if prompt.title.is_empty() {
            let stamp = crate::prompt::now().format("%Y%m%d_%H%M%S");
            prompt.title = format!("{}_{}", prompt.kind().tag().to_uppercase(), stamp);
            debug!(title = %prompt.title, "save: generated title");
        }
        prompt.touch();

        let store = Store::for_template(as_template);
        let path = self.store_dir(store).join(slugify(&prompt.title));
        if let Err(e) = write_prompt(&path, prompt) {
            warn!(path = %path.display(), error = %e, "Failed to save prompt");
            return Err(e);
        }
        info!(path = %path.display(), kind = %prompt.kind(), "Saved prompt");

        if !as_template && self.history.enabled {
            // History is best-effort once the prompt itself is written
            if let Err(e) = self.add_to_history(prompt) {
                warn!(title = %prompt.title, error = %e, "Failed to record history entry");
            }
        }

        Ok(path)
    }

    /// Load a prompt from the prompt store, or the template store when `from_template`
    pub fn load(&self, filename: &str, from_template: bool) -> Result<Prompt, PromptError> {
        let store = Store::for_template(from_template);
        let result = self.read_prompt(store, filename);
        if let Err(e) = &result {
            warn!(filename, store = store.dir_name(), error = %e, "Failed to load prompt");
        }
        result
    }

    fn read_prompt(&self, store: Store, filename: &str) -> Result<Prompt, PromptError> {
        let path = self
            .entry_path(store, filename)
            .ok_or_else(|| PromptError::NotFound {
                path: PathBuf::from(filename),
            })?;
        if !path.is_file() {
            return Err(PromptError::NotFound { path });
        }

        let record = read_record(&path)?;
        Prompt::from_record(&record).map_err(|e| match e {
            PromptError::Json(source) => PromptError::Malformed { path, source },
            other => other,
        })
    }

    /// Saved prompts, newest `updated_at` first, optionally of one kind
    pub fn list_prompts(&self, kind: Option<PromptKind>) -> Vec<PromptSummary> {
        self.list(Store::Prompts, kind)
    }

    /// Saved templates, by title, optionally of one kind
    pub fn list_templates(&self, kind: Option<PromptKind>) -> Vec<PromptSummary> {
        self.list(Store::Templates, kind)
    }

    /// Summaries of one store, optionally of one kind
    ///
    /// Templates sort by title ascending; the other stores sort by
    /// `updated_at` descending. Ties fall back to the file name.
    pub fn list(&self, store: Store, kind: Option<PromptKind>) -> Vec<PromptSummary> {
        let mut summaries: Vec<PromptSummary> = self
            .scan(store)
            .into_iter()
            .map(|(filename, record)| PromptSummary::from_record(filename, &record))
            .filter(|summary| kind.is_none() || summary.kind == kind)
            .collect();

        match store {
            Store::Templates => {
                summaries.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.filename.cmp(&b.filename)));
            }
            Store::Prompts | Store::History => {
                summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.filename.cmp(&b.filename)));
            }
        }
        debug!(store = store.dir_name(), count = summaries.len(), "list: done");
        summaries
    }

    /// Delete a saved prompt; `false` if it did not exist or could not be removed
    pub fn delete(&self, filename: &str) -> bool {
        self.remove_entry(Store::Prompts, filename)
    }

    /// Delete a saved template; `false` if it did not exist or could not be removed
    pub fn delete_template(&self, filename: &str) -> bool {
        self.remove_entry(Store::Templates, filename)
    }

    fn remove_entry(&self, store: Store, filename: &str) -> bool {
        let Some(path) = self.entry_path(store, filename) else {
            warn!(filename, "Refusing to delete outside the store");
            return false;
        };
        if !path.is_file() {
            debug!(path = %path.display(), "delete: no such file");
            return false;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(path = %path.display(), "Deleted prompt file");
                true
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to delete prompt file");
                false
            }
        }
    }

    /// The most recent history entries, newest `updated_at` first
    pub fn get_history(&self, limit: usize) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = self
            .scan(Store::History)
            .into_iter()
            .map(|(filename, content)| HistoryEntry {
                summary: PromptSummary::from_record(filename, &content),
                content,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.summary
                .updated_at
                .cmp(&a.summary.updated_at)
                .then_with(|| history_key(&b.summary.filename).cmp(&history_key(&a.summary.filename)))
        });
        entries.truncate(limit);
        entries
    }

    fn add_to_history(&self, prompt: &Prompt) -> Result<PathBuf, PromptError> {
        let dir = self.store_dir(Store::History);
        let stamp = crate::prompt::now().format("%Y%m%d_%H%M%S").to_string();
        let path = next_history_path(&dir, prompt.kind(), &stamp);

        write_prompt(&path, prompt)?;
        debug!(path = %path.display(), "add_to_history: wrote entry");

        self.prune_history(self.history.max_entries);
        Ok(path)
    }

    /// Keep only the `max_entries` most recently modified history files
    ///
    /// Ordering uses file modification time, not the stored timestamps.
    /// Returns the number of files removed.
    pub fn prune_history(&self, max_entries: usize) -> usize {
        let dir = self.store_dir(Store::History);
        let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();

        for path in json_files(&dir) {
            match fs::metadata(&path).and_then(|meta| meta.modified()) {
                Ok(modified) => files.push((path, modified)),
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to read history file time"),
            }
        }

        if files.len() <= max_entries {
            return 0;
        }

        files.sort_by(|(a, a_time), (b, b_time)| {
            b_time
                .cmp(a_time)
                .then_with(|| history_key(&file_name(b)).cmp(&history_key(&file_name(a))))
        });

        let mut removed = 0;
        for (path, _) in files.into_iter().skip(max_entries) {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to prune history file"),
            }
        }
        info!(removed, max_entries, "Pruned history");
        removed
    }

    /// Delete one history entry; `false` if it did not exist or could not be removed
    pub fn delete_history(&self, filename: &str) -> bool {
        self.remove_entry(Store::History, filename)
    }

    /// Delete every history entry, returning how many were removed
    pub fn clear_history(&self) -> usize {
        let mut removed = 0;
        for path in json_files(&self.store_dir(Store::History)) {
            if self.remove_entry(Store::History, &file_name(&path)) {
                removed += 1;
            }
        }
        info!(removed, "Cleared history");
        removed
    }

    /// Seed one placeholder template per kind; saving over same-titled templates
    pub fn create_default_templates(&self) -> Result<Vec<PathBuf>, PromptError> {
        let mut paths = Vec::new();
        for mut template in default_templates()? {
            paths.push(self.save(&mut template, true)?);
        }
        Ok(paths)
    }

    /// Path of a file in a store; `None` if the name would leave the store
    fn entry_path(&self, store: Store, filename: &str) -> Option<PathBuf> {
        let name = Path::new(filename);
        let plain = name.components().count() == 1 && name.file_name().is_some_and(|n| n == name.as_os_str());
        plain.then(|| self.store_dir(store).join(name))
    }

    /// Every parsable `.json` record in a store, with its file name
    fn scan(&self, store: Store) -> Vec<(String, Record)> {
        let mut records = Vec::new();
        for path in json_files(&self.store_dir(store)) {
            let Some(filename) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            match read_record(&path) {
                Ok(record) => records.push((filename, record)),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable prompt file"),
            }
        }
        records
    }
}

/// Regular `.json` files directly inside `dir`
fn json_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "Failed to read store directory");
            return Vec::new();
        }
    };

    entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .collect()
}

fn file_name(path: &Path) -> String {
    path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Ordering of history file names: save stamp, then collision suffix, then name
///
/// `{kind}_{yyyyMMdd}_{HHmmss}.json` is sequence 1 and `..._{n}.json` is
/// sequence `n`. Names outside that pattern sort before all others.
fn history_key(filename: &str) -> (String, u32, &str) {
    let stem = filename.strip_suffix(".json").unwrap_or(filename);
    let parts: Vec<&str> = stem.split('_').collect();
    let is_digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());

    if (parts.len() == 3 || parts.len() == 4) && is_digits(parts[1], 8) && is_digits(parts[2], 6) {
        let seq = match parts.get(3) {
            None => Some(1),
            Some(n) => n.parse().ok(),
        };
        if let Some(seq) = seq {
            return (format!("{}_{}", parts[1], parts[2]), seq, filename);
        }
    }
    (String::new(), 0, filename)
}

/// Path for the next history entry saved at `stamp`
///
/// Suffixes count up across every kind saved within the same second and
/// only grow, so a slot freed by pruning is never reused.
fn next_history_path(dir: &Path, kind: PromptKind, stamp: &str) -> PathBuf {
    let last = json_files(dir)
        .iter()
        .filter_map(|path| {
            let name = file_name(path);
            let (entry_stamp, seq, _) = history_key(&name);
            (entry_stamp == stamp).then_some(seq)
        })
        .max();
    match last {
        None => dir.join(format!("{}_{}.json", kind.tag(), stamp)),
        Some(n) => dir.join(format!("{}_{}_{}.json", kind.tag(), stamp, n + 1)),
    }
}

fn read_record(path: &Path) -> Result<Record, PromptError> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|source| PromptError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

fn write_prompt(path: &Path, prompt: &Prompt) -> Result<(), PromptError> {
    let json = to_pretty_json(&prompt.to_record()?)?;
    fs::write(path, json)?;
    Ok(())
}

const FORMAT_PLACEHOLDER: &str = "[Format, e.g., 'article', 'lesson plan']";
const LENGTH_PLACEHOLDER: &str = "[Length, e.g., '500 words', '10 minutes']";

/// Placeholder-filled starter templates, one per kind
fn default_templates() -> Result<Vec<Prompt>, PromptError> {
    let seeds: [(PromptKind, &str, &[(&str, &str)]); 4] = [
        (
            PromptKind::ChainOfThought,
            "Basic Chain of Thought",
            &[("steps", "1. [First step]\n2. [Second step]\n3. [Third step]")],
        ),
        (
            PromptKind::TreeOfThoughts,
            "Basic Tree of Thoughts",
            &[
                (
                    "branches",
                    "Branch 1: [First approach]\nBranch 2: [Second approach]\nBranch 3: [Third approach]",
                ),
                ("evaluation", "[Criteria for evaluating each approach]"),
            ],
        ),
        (
            PromptKind::Active,
            "Basic Active Prompting",
            &[
                ("initial_question", "[Initial question to start the learning process]"),
                (
                    "followups",
                    "1. [First follow-up]\n2. [Second follow-up]\n3. [Third follow-up]",
                ),
            ],
        ),
        (
            PromptKind::Persona,
            "Basic Persona Prompting",
            &[
                ("role", "[Role or persona]"),
                ("expertise", "[Expertise level]"),
                ("style", "[Communication style]"),
                ("knowledge", "[Specific knowledge or expertise]"),
            ],
        ),
    ];

    let mut templates = Vec::with_capacity(seeds.len());
    for (kind, title, extra) in seeds {
        let mut prompt = Prompt::new(kind, title);
        prompt.set_field("topic", "[Your topic]")?;
        prompt.set_field("audience", "[Target audience]")?;
        prompt.set_field("objective", "[Learning objective]")?;
        for (field, value) in extra {
            prompt.set_field(field, *value)?;
        }
        prompt.set_field("format", FORMAT_PLACEHOLDER)?;
        prompt.set_field("length", LENGTH_PLACEHOLDER)?;
        templates.push(prompt);
    }
    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn manager(temp: &TempDir) -> PromptManager {
        PromptManager::open(temp.path(), HistoryConfig::default()).unwrap()
    }

    fn write_raw(dir: &Path, filename: &str, value: serde_json::Value) {
        fs::write(dir.join(filename), serde_json::to_vec_pretty(&value).unwrap()).unwrap();
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(time).unwrap();
    }

    fn history_names(mgr: &PromptManager) -> Vec<String> {
        let mut names: Vec<String> = json_files(&mgr.store_dir(Store::History))
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_open_creates_stores() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        for store in [Store::Prompts, Store::Templates, Store::History] {
            assert!(mgr.store_dir(store).is_dir());
        }
        assert_eq!(mgr.base_path(), temp.path());
    }

    #[test]
    fn test_create() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        let prompt = mgr.create("tot", "Paths").unwrap();
        assert_eq!(prompt.kind(), PromptKind::TreeOfThoughts);
        assert_eq!(prompt.title, "Paths");
        assert_eq!(prompt.field("branches"), Some(""));

        let err = mgr.create("limerick", "").unwrap_err();
        assert!(matches!(err, PromptError::UnsupportedKind(_)));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My first prompt"), "My_first_prompt.json");
        assert_eq!(slugify("a/b\\c"), "a_b_c.json");
    }

    #[test]
    fn test_save_generates_title_and_history() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        let mut prompt = mgr.create("cot", "").unwrap();
        prompt.set_field("topic", "Gravity").unwrap();
        let path = mgr.save(&mut prompt, false).unwrap();

        assert!(prompt.title.starts_with("COT_"));
        assert_eq!(prompt.title.len(), "COT_".len() + "yyyyMMdd_HHmmss".len());
        assert_eq!(path, mgr.store_dir(Store::Prompts).join(format!("{}.json", prompt.title)));
        assert!(path.is_file());
        assert!(prompt.updated_at() >= prompt.created_at());

        let history = history_names(&mgr);
        assert_eq!(history.len(), 1);
        assert!(history[0].starts_with("cot_"));
    }

    #[test]
    fn test_save_template_skips_history() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        let mut prompt = mgr.create("persona", "Tutor voice").unwrap();
        let path = mgr.save(&mut prompt, true).unwrap();

        assert_eq!(path, mgr.store_dir(Store::Templates).join("Tutor_voice.json"));
        assert!(history_names(&mgr).is_empty());
        assert!(mgr.list_prompts(None).is_empty());
    }

    #[test]
    fn test_history_disabled() {
        let temp = TempDir::new().unwrap();
        let config = HistoryConfig {
            enabled: false,
            ..Default::default()
        };
        let mgr = PromptManager::open(temp.path(), config).unwrap();

        let mut prompt = mgr.create("active", "Quiz").unwrap();
        mgr.save(&mut prompt, false).unwrap();
        assert!(history_names(&mgr).is_empty());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        let mut prompt = mgr.create("active", "Cell quiz").unwrap();
        prompt.set_field("initial_question", "What is a cell?").unwrap();
        prompt.set_field("followups", "1. Nucleus?\n2. Membrane?").unwrap();
        mgr.save(&mut prompt, false).unwrap();

        let loaded = mgr.load("Cell_quiz.json", false).unwrap();
        assert_eq!(loaded, prompt);
        assert!(mgr.load("Cell_quiz.json", true).unwrap_err().is_not_found());
    }

    #[test]
    fn test_load_failures() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::Prompts);

        assert!(mgr.load("missing.json", false).unwrap_err().is_not_found());
        assert!(mgr.load("../escape.json", false).unwrap_err().is_not_found());

        fs::write(dir.join("broken.json"), "{ not json").unwrap();
        let err = mgr.load("broken.json", false).unwrap_err();
        assert!(matches!(err, PromptError::Malformed { .. }));

        write_raw(&dir, "odd.json", json!({ "type": "haiku" }));
        let err = mgr.load("odd.json", false).unwrap_err();
        assert!(matches!(err, PromptError::UnknownKind(ref k) if k == "haiku"));

        write_raw(&dir, "typed.json", json!({ "type": "cot", "topic": 42 }));
        let err = mgr.load("typed.json", false).unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_list_prompts_by_updated_desc() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::Prompts);

        write_raw(&dir, "a.json", json!({ "title": "A", "type": "cot", "updated_at": "2024-01-01T10:00:00" }));
        write_raw(&dir, "b.json", json!({ "title": "B", "type": "tot", "updated_at": "2024-03-01T10:00:00" }));
        write_raw(&dir, "c.json", json!({ "title": "C", "type": "cot", "updated_at": "2024-02-01T10:00:00" }));
        fs::write(dir.join("notes.txt"), "ignored").unwrap();
        fs::write(dir.join("junk.json"), "[").unwrap();

        let titles: Vec<String> = mgr.list_prompts(None).into_iter().map(|s| s.title).collect();
        assert_eq!(titles, ["B", "C", "A"]);

        let cot: Vec<String> = mgr
            .list_prompts(Some(PromptKind::ChainOfThought))
            .into_iter()
            .map(|s| s.filename)
            .collect();
        assert_eq!(cot, ["c.json", "a.json"]);
    }

    #[test]
    fn test_list_templates_by_title() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::Templates);

        write_raw(&dir, "z.json", json!({ "title": "beta", "type": "cot" }));
        write_raw(&dir, "y.json", json!({ "title": "Alpha", "type": "persona" }));
        write_raw(&dir, "x.json", json!({ "title": "beta", "type": "active" }));

        let listed: Vec<(String, String)> = mgr
            .list_templates(None)
            .into_iter()
            .map(|s| (s.title, s.filename))
            .collect();
        assert_eq!(
            listed,
            [
                ("Alpha".to_string(), "y.json".to_string()),
                ("beta".to_string(), "x.json".to_string()),
                ("beta".to_string(), "z.json".to_string()),
            ]
        );
    }

    #[test]
    fn test_delete() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        let mut prompt = mgr.create("cot", "Doomed").unwrap();
        mgr.save(&mut prompt, false).unwrap();
        let mut template = mgr.create("cot", "Kept").unwrap();
        mgr.save(&mut template, true).unwrap();

        assert!(mgr.delete("Doomed.json"));
        assert!(!mgr.delete("Doomed.json"));
        assert!(!mgr.delete("Kept.json"));
        assert!(!mgr.delete("../history"));
        assert!(mgr.delete_template("Kept.json"));
        assert!(!mgr.delete_template("never-existed.json"));
    }

    #[test]
    fn test_history_bounded_after_many_saves() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        let mut prompt = mgr.create("cot", "Repeated").unwrap();
        for _ in 0..55 {
            mgr.save(&mut prompt, false).unwrap();
        }

        assert_eq!(history_names(&mgr).len(), 50);
        assert_eq!(mgr.list_prompts(None).len(), 1);
    }

    #[test]
    fn test_prune_keeps_most_recently_modified() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::History);
        let base = SystemTime::now() - Duration::from_secs(10_000);

        // File names and stored timestamps both run opposite to modification order.
        for i in 0..60u64 {
            let name = format!("cot_{:02}.json", 59 - i);
            let updated = format!("2024-01-01T00:{:02}:00", 59 - i);
            write_raw(&dir, &name, json!({ "title": name, "type": "cot", "updated_at": updated }));
            set_mtime(&dir.join(&name), base + Duration::from_secs(i * 10));
        }

        assert_eq!(mgr.prune_history(50), 10);

        let kept = history_names(&mgr);
        assert_eq!(kept.len(), 50);
        let expected: Vec<String> = (0..50).map(|n| format!("cot_{:02}.json", n)).collect();
        assert_eq!(kept, expected);

        assert_eq!(mgr.prune_history(50), 0);
    }

    #[test]
    fn test_save_prunes_oldest_by_mtime() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::History);
        let base = SystemTime::now() - Duration::from_secs(10_000);

        for i in 0..50u64 {
            let name = format!("old_{:02}.json", i);
            write_raw(&dir, &name, json!({ "title": name, "type": "cot" }));
            set_mtime(&dir.join(&name), base + Duration::from_secs(i));
        }

        let mut prompt = mgr.create("tot", "Fresh").unwrap();
        mgr.save(&mut prompt, false).unwrap();

        let kept = history_names(&mgr);
        assert_eq!(kept.len(), 50);
        assert!(!kept.contains(&"old_00.json".to_string()));
        assert!(kept.contains(&"old_01.json".to_string()));
        assert!(kept.iter().any(|n| n.starts_with("tot_")));
    }

    #[test]
    fn test_next_history_path_never_reuses_freed_slot() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::History);
        let stamp = "20240101_120000";

        assert_eq!(
            next_history_path(&dir, PromptKind::ChainOfThought, stamp),
            dir.join("cot_20240101_120000.json")
        );

        // The unsuffixed entry was pruned; its name must not come back
        write_raw(&dir, "cot_20240101_120000_2.json", json!({ "type": "cot" }));
        write_raw(&dir, "cot_20240101_120000_3.json", json!({ "type": "cot" }));
        assert_eq!(
            next_history_path(&dir, PromptKind::ChainOfThought, stamp),
            dir.join("cot_20240101_120000_4.json")
        );
        assert_eq!(
            next_history_path(&dir, PromptKind::TreeOfThoughts, stamp),
            dir.join("tot_20240101_120000_4.json")
        );
        assert_eq!(
            next_history_path(&dir, PromptKind::ChainOfThought, "20240101_120001"),
            dir.join("cot_20240101_120001.json")
        );
    }

    #[test]
    fn test_history_key_orders_suffixes_numerically() {
        assert!(history_key("cot_20240101_120000_10.json") > history_key("cot_20240101_120000_9.json"));
        assert!(history_key("cot_20240101_120000_2.json") > history_key("cot_20240101_120000.json"));
        assert!(history_key("cot_20240101_120001.json") > history_key("cot_20240101_120000_10.json"));
        assert!(history_key("tot_20240101_120000_3.json") > history_key("cot_20240101_120000_2.json"));
        assert!(history_key("cot_20240101_120000.json") > history_key("notes.json"));
    }

    #[test]
    fn test_prune_equal_mtimes_keeps_latest_suffixes() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::History);
        let same = SystemTime::now() - Duration::from_secs(60);

        let mut names = vec!["cot_20240101_120000.json".to_string()];
        names.extend((2..=11).map(|n| format!("cot_20240101_120000_{}.json", n)));
        for name in &names {
            write_raw(&dir, name, json!({ "title": name, "type": "cot" }));
            set_mtime(&dir.join(name), same);
        }

        assert_eq!(mgr.prune_history(9), 2);

        let kept = history_names(&mgr);
        assert!(!kept.contains(&"cot_20240101_120000.json".to_string()));
        assert!(!kept.contains(&"cot_20240101_120000_2.json".to_string()));
        assert!(kept.contains(&"cot_20240101_120000_10.json".to_string()));
        assert!(kept.contains(&"cot_20240101_120000_11.json".to_string()));
    }

    #[test]
    fn test_same_second_saves_keep_newest_entry() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::History);
        let same = SystemTime::now() - Duration::from_secs(60);
        let stamp = "20240101_120000";

        // Coarse file times: every entry reports the same modification second
        let mut written = Vec::new();
        for i in 1..=5 {
            let path = next_history_path(&dir, PromptKind::ChainOfThought, stamp);
            write_raw(&dir, &file_name(&path), json!({ "title": format!("save-{}", i), "type": "cot" }));
            set_mtime(&path, same);
            mgr.prune_history(3);
            written.push(file_name(&path));
        }

        assert_eq!(
            written,
            [
                "cot_20240101_120000.json",
                "cot_20240101_120000_2.json",
                "cot_20240101_120000_3.json",
                "cot_20240101_120000_4.json",
                "cot_20240101_120000_5.json",
            ]
        );
        let titles: Vec<String> = mgr.get_history(10).into_iter().map(|e| e.summary.title).collect();
        assert_eq!(titles, ["save-5", "save-4", "save-3"]);
    }

    #[test]
    fn test_get_history_ties_by_suffix() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::History);
        let updated = "2024-01-01T12:00:00";

        for name in ["cot_20240101_120000.json", "cot_20240101_120000_9.json", "cot_20240101_120000_10.json"] {
            write_raw(&dir, name, json!({ "title": name, "type": "cot", "updated_at": updated }));
        }

        let names: Vec<String> = mgr.get_history(10).into_iter().map(|e| e.summary.filename).collect();
        assert_eq!(
            names,
            ["cot_20240101_120000_10.json", "cot_20240101_120000_9.json", "cot_20240101_120000.json"]
        );
    }

    #[test]
    fn test_delete_and_clear_history() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::History);

        write_raw(&dir, "cot_20240101_120000.json", json!({ "type": "cot" }));
        write_raw(&dir, "tot_20240101_120001.json", json!({ "type": "tot" }));
        write_raw(&dir, "active_20240101_120002.json", json!({ "type": "active" }));

        assert!(mgr.delete_history("tot_20240101_120001.json"));
        assert!(!mgr.delete_history("tot_20240101_120001.json"));
        assert!(!mgr.delete_history("../prompts"));
        assert_eq!(history_names(&mgr).len(), 2);

        let mut prompt = mgr.create("cot", "Kept").unwrap();
        mgr.save(&mut prompt, false).unwrap();

        assert_eq!(mgr.clear_history(), 3);
        assert!(history_names(&mgr).is_empty());
        assert!(mgr.store_dir(Store::Prompts).join("Kept.json").is_file());
        assert_eq!(mgr.clear_history(), 0);
    }

    #[test]
    fn test_save_clamps_updated_to_future_created() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::Prompts);

        write_raw(
            &dir,
            "Future.json",
            json!({ "title": "Future", "type": "cot", "created_at": "2999-01-01T00:00:00", "updated_at": "2999-01-01T00:00:00" }),
        );

        let mut prompt = mgr.load("Future.json", false).unwrap();
        let created = prompt.created_at();
        assert_eq!(timestamp::format(&created), "2999-01-01T00:00:00");

        mgr.save(&mut prompt, false).unwrap();
        assert_eq!(prompt.updated_at(), created);

        let reloaded = mgr.load("Future.json", false).unwrap();
        assert_eq!(reloaded.created_at(), created);
        assert_eq!(reloaded.updated_at(), created);
    }

    #[test]
    fn test_get_history_newest_first() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);
        let dir = mgr.store_dir(Store::History);

        write_raw(&dir, "h1.json", json!({ "title": "one", "type": "cot", "updated_at": "2024-01-01T00:00:00" }));
        write_raw(&dir, "h2.json", json!({ "title": "two", "type": "tot", "updated_at": "2024-01-03T00:00:00" }));
        write_raw(&dir, "h3.json", json!({ "title": "three", "type": "active", "updated_at": "2024-01-02T00:00:00" }));

        let history = mgr.get_history(2);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].summary.title, "two");
        assert_eq!(history[1].summary.title, "three");
        assert_eq!(record_str(&history[0].content, "type"), "tot");

        assert_eq!(mgr.get_history(10).len(), 3);
    }

    #[test]
    fn test_create_default_templates() {
        let temp = TempDir::new().unwrap();
        let mgr = manager(&temp);

        let paths = mgr.create_default_templates().unwrap();
        assert_eq!(paths.len(), 4);
        assert!(history_names(&mgr).is_empty());

        let titles: Vec<String> = mgr.list_templates(None).into_iter().map(|s| s.title).collect();
        assert_eq!(
            titles,
            [
                "Basic Active Prompting",
                "Basic Chain of Thought",
                "Basic Persona Prompting",
                "Basic Tree of Thoughts"
            ]
        );

        let persona = mgr.load("Basic_Persona_Prompting.json", true).unwrap();
        assert_eq!(persona.field("expertise"), Some("[Expertise level]"));
        assert_eq!(persona.field("topic"), Some("[Your topic]"));

        // Same titles overwrite rather than duplicate
        mgr.create_default_templates().unwrap();
        assert_eq!(mgr.list_templates(None).len(), 4);
    }
}
