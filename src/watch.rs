// ABOUTME: Watch module for monitoring reference and theme files
// ABOUTME: Regenerates the deck whenever a watched input changes

use log::{debug, error, info};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;

use crate::config::Config as AppConfig;
use crate::deck::{self, DeckRequest};
use crate::errors::{DeckError, Result};
use crate::html;
use crate::images::{GeminiImageClient, ImageSource};
use crate::resources::{self, ReferenceFile};
use crate::utils;

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Description the deck is generated from
    pub description: String,

    /// Raw reference inputs (paths, glob patterns or URLs)
    pub inputs: Vec<String>,

    /// Output HTML file path
    pub html_output: PathBuf,

    /// Theme to force, if any
    pub forced_theme: Option<String>,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            description: String::new(),
            inputs: Vec::new(),
            html_output: PathBuf::new(),
            forced_theme: None,
            debounce_ms: 500,
        }
    }
}

fn local_references(config: &WatchConfig) -> Vec<ReferenceFile> {
    resources::expand_inputs(&config.inputs)
        .into_iter()
        .filter(|file| !file.is_remote)
        .collect()
}

/// Directories holding the local references and custom themes.
fn watch_directories(config: &WatchConfig, app_config: &AppConfig) -> Result<BTreeSet<PathBuf>> {
    let mut dirs = BTreeSet::new();

    for file in local_references(config) {
        let path = PathBuf::from(&file.path);
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        dirs.insert(utils::get_absolute_path(&parent)?);
    }

    if let Some(themes_dir) = &app_config.themes_dir {
        dirs.insert(utils::get_absolute_path(themes_dir)?);
    }

    Ok(dirs)
}

/// Starts watching the reference files and regenerates the deck when they change
pub fn watch_references(config: WatchConfig, app_config: &AppConfig) -> Result<()> {
    let references = local_references(&config);
    if references.is_empty() {
        return Err(DeckError::WatchError(
            "No local reference files to watch".to_string(),
        ));
    }
    for file in &references {
        utils::validate_file_exists(Path::new(&file.path))?;
    }

    // Ensure parent directory for output exists
    utils::ensure_parent_directory_exists(&config.html_output)?;

    // Initial generation
    regenerate_outputs(&config, app_config)?;

    // Create a channel to receive file system events
    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| DeckError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    let dirs = watch_directories(&config, app_config)?;
    for dir in &dirs {
        debug!("Watching absolute path: {:?}", dir);
        debouncer
            .watcher()
            .watch(dir, RecursiveMode::NonRecursive)
            .map_err(|e| {
                DeckError::WatchError(format!("Failed to start watching {:?}: {}", dir, e))
            })?;
    }

    info!("Watching for changes in {:?}", dirs);
    println!(
        "Watching {} director{} for changes (Press Ctrl+C to stop)",
        dirs.len(),
        if dirs.len() == 1 { "y" } else { "ies" }
    );

    let mut last_processed = Instant::now();

    for result in rx {
        match result {
            Ok(events) => {
                let relevant_changes = events.iter().any(|event| {
                    event.paths.iter().any(|path| {
                        let is_relevant = is_relevant_path(path, &config, app_config);
                        if is_relevant {
                            debug!("Detected relevant change in {:?}", path);
                        }
                        is_relevant
                    })
                });

                // Only regenerate if there are relevant changes and enough time has passed
                let now = Instant::now();
                if relevant_changes
                    && now.duration_since(last_processed)
                        > Duration::from_millis(config.debounce_ms)
                {
                    match regenerate_outputs(&config, app_config) {
                        Ok(_) => {
                            info!("Regenerated deck successfully");
                            last_processed = now;
                        }
                        Err(e) => error!("Failed to regenerate deck: {}", e),
                    }
                }
            }
            Err(e) => error!("Watch error: {:?}", e),
        }
    }

    Ok(())
}

/// Checks if a path is relevant to watch (reference file or theme file)
fn is_relevant_path(path: &Path, config: &WatchConfig, app_config: &AppConfig) -> bool {
    // The output itself lives next to the inputs more often than not
    if path.file_name().is_some() && path.file_name() == config.html_output.file_name() {
        if let (Ok(a), Ok(b)) = (
            utils::get_absolute_path(path),
            utils::get_absolute_path(&config.html_output),
        ) {
            if a == b {
                return false;
            }
        }
    }

    let path_abs = utils::get_absolute_path(path).unwrap_or_else(|_| path.to_path_buf());

    for file in local_references(config) {
        let reference = PathBuf::from(&file.path);
        let reference_abs = utils::get_absolute_path(&reference).unwrap_or(reference.clone());
        if path_abs == reference_abs || path == reference {
            return true;
        }
    }

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    if let Some(themes_dir) = &app_config.themes_dir {
        let in_themes_dir = utils::get_absolute_path(themes_dir)
            .map(|dir| path_abs.starts_with(dir))
            .unwrap_or(false);
        if in_themes_dir && matches!(extension.as_deref(), Some("yaml") | Some("yml")) {
            return true;
        }
    }

    // New files picked up by a glob pattern
    matches!(extension.as_deref(), Some("md") | Some("markdown"))
}

/// Regenerate the deck from the current state of the inputs
fn regenerate_outputs(config: &WatchConfig, app_config: &AppConfig) -> Result<()> {
    info!("Regenerating deck...");

    let themes = app_config.load_themes()?;
    let references = resources::read_references(&resources::expand_inputs(&config.inputs));
    let request = DeckRequest::new(&config.description)
        .with_references(references)
        .with_theme(config.forced_theme.as_deref());

    let image_client = GeminiImageClient::from_config(&app_config.get_image_config())?;
    let image_source = image_client.as_ref().map(|client| client as &dyn ImageSource);

    let deck = deck::generate_deck(&request, &themes, image_source);
    html::write_html_to_file(&deck.html, &config.html_output)?;
    info!("Deck regenerated: {:?} ({})", config.html_output, deck.report);

    Ok(())
}
