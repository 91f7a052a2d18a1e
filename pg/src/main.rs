use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use promptgen::cli::{Cli, Command};
use promptgen::config::Config;
use promptgen::prompt::Timestamp;
use promptgen::{Expertise, ExportManager, PromptKind, PromptManager, Style};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > WARN
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") | None => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", other);
            tracing::Level::WARN
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre!("{}", e))?;

    debug!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn fmt_time(ts: Option<Timestamp>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn fmt_kind(kind: Option<PromptKind>) -> String {
    kind.map(|k| k.to_string()).unwrap_or_else(|| "?".to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(store_path = %config.store_path.display(), "promptgen starting");

    let open_manager = || {
        PromptManager::open(&config.store_path, config.history.clone())
            .context(format!("Failed to open prompt store at {}", config.store_path.display()))
    };

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::New {
            kind,
            title,
            set,
            template,
        } => {
            let manager = open_manager()?;
            let mut prompt = manager.create(&kind, &title)?;
            for (field, value) in set {
                prompt.set_field(&field, value)?;
            }
            let path = manager.save(&mut prompt, template)?;
            println!("{} Saved {}: {}", "✓".green(), prompt.title.cyan(), path.display());
        }
        Command::Set {
            filename,
            assignments,
            template,
        } => {
            let manager = open_manager()?;
            let mut prompt = manager.load(&filename, template)?;
            for (field, value) in assignments {
                prompt.set_field(&field, value)?;
            }
            let path = manager.save(&mut prompt, template)?;
            println!("{} Updated {}: {}", "✓".green(), prompt.title.cyan(), path.display());
        }
        Command::Show { filename, template } => {
            let manager = open_manager()?;
            let prompt = manager.load(&filename, template)?;
            println!("{}", prompt.generate_text());
        }
        Command::List { kind, templates } => {
            let manager = open_manager()?;
            let entries = if templates {
                manager.list_templates(kind)
            } else {
                manager.list_prompts(kind)
            };
            if entries.is_empty() {
                println!("No {} found", if templates { "templates" } else { "prompts" });
            }
            for entry in entries {
                println!(
                    "{} {} [{}] {}",
                    entry.filename.yellow(),
                    entry.title,
                    fmt_kind(entry.kind),
                    fmt_time(entry.updated_at).dimmed()
                );
            }
        }
        Command::History { limit, delete, clear } => {
            let manager = open_manager()?;
            if clear {
                let removed = manager.clear_history();
                println!("{} Cleared {} history entries", "✓".green(), removed);
                return Ok(());
            }
            if let Some(filename) = delete {
                if !manager.delete_history(&filename) {
                    return Err(eyre!("Nothing deleted: {}", filename));
                }
                println!("{} Deleted: {}", "✓".green(), filename);
                return Ok(());
            }
            let entries = manager.get_history(limit);
            if entries.is_empty() {
                println!("No history");
            }
            for entry in entries {
                println!(
                    "{} {} {} [{}]",
                    fmt_time(entry.summary.updated_at).dimmed(),
                    entry.summary.filename.yellow(),
                    entry.summary.title,
                    fmt_kind(entry.summary.kind)
                );
            }
        }
        Command::Delete { filename, template } => {
            let manager = open_manager()?;
            let deleted = if template {
                manager.delete_template(&filename)
            } else {
                manager.delete(&filename)
            };
            if !deleted {
                return Err(eyre!("Nothing deleted: {}", filename));
            }
            println!("{} Deleted: {}", "✓".green(), filename);
        }
        Command::Export {
            filename,
            output,
            format,
            template,
        } => {
            let manager = open_manager()?;
            let prompt = manager.load(&filename, template)?;
            let exporter = ExportManager::new(config.export.clone());
            let path = exporter
                .export_prompt(&prompt, &output, format)
                .context(format!("Failed to export {}", filename))?;
            println!("{} Exported to {}", "✓".green(), path.display());
        }
        Command::InitTemplates => {
            let manager = open_manager()?;
            for path in manager.create_default_templates()? {
                println!("{} {}", "✓".green(), path.display());
            }
        }
        Command::Fields { kind } => {
            println!("{} ({})", kind.label().cyan(), kind);
            for field in kind.fields() {
                match (kind, *field) {
                    (PromptKind::Persona, "expertise") => {
                        let choices: Vec<&str> = Expertise::ALL.iter().map(|e| e.as_str()).collect();
                        println!("  {} {}", field, format!("({})", choices.join(", ")).dimmed());
                    }
                    (PromptKind::Persona, "style") => {
                        let choices: Vec<&str> = Style::ALL.iter().map(|s| s.as_str()).collect();
                        println!("  {} {}", field, format!("({})", choices.join(", ")).dimmed());
                    }
                    _ => println!("  {}", field),
                }
            }
        }
    }

    Ok(())
}
