// ABOUTME: Reference file handling for the deckgen application
// ABOUTME: Reads local, globbed or remote reference files; unreadable inputs contribute no text

use crate::errors::{DeckError, Result};
use log::{info, warn};
use reqwest::blocking::Client;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A reference file that can be either local or remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFile {
    pub path: String,
    pub is_remote: bool,
}

impl ReferenceFile {
    /// Create a new ReferenceFile from a path string.
    /// The path can be either a local file path or a URL.
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    /// The path as the classifier sees it (for extension checks).
    pub fn as_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    /// Get the content of the reference file.
    /// If the file is remote, it will be fetched from the URL.
    /// If the file is local, it will be read from the filesystem.
    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            self.fetch_remote_content()
        } else {
            self.read_local_content()
        }
    }

    /// Fetch content from a remote URL with retry capability
    fn fetch_remote_content(&self) -> Result<String> {
        info!("Fetching remote reference: {}", self.path);

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(DeckError::FetchError)?;

        // Try up to 3 times with increasing backoff
        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=3 {
            match client.get(&self.path).send() {
                Ok(response) => {
                    if response.status().is_success() {
                        return response.text().map_err(DeckError::FetchError);
                    }
                    let status = response.status();
                    last_error = Some(DeckError::ValidationError(format!("HTTP error: {}", status)));
                }
                Err(e) => {
                    last_error = Some(DeckError::FetchError(e));
                }
            }

            if attempt < 3 {
                info!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DeckError::ValidationError("Unknown error fetching reference".to_string())
        }))
    }

    /// Read content from a local file
    fn read_local_content(&self) -> Result<String> {
        info!("Reading local reference: {}", self.path);
        let path = Path::new(&self.path);
        if !path.exists() {
            return Err(DeckError::PathNotFoundError(path.to_path_buf()));
        }

        fs::read_to_string(path).map_err(DeckError::FileReadError)
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Turn raw `--file` arguments into reference files, expanding glob
/// patterns in sorted order. Patterns that match nothing are dropped.
pub fn expand_inputs(inputs: &[String]) -> Vec<ReferenceFile> {
    let mut files = Vec::new();

    for input in inputs {
        let reference = ReferenceFile::new(input);
        if reference.is_remote || !is_glob_pattern(input) {
            files.push(reference);
            continue;
        }

        let entries = match glob::glob(input) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Invalid glob pattern {}: {}", input, e);
                files.push(reference);
                continue;
            }
        };

        let mut matched: Vec<PathBuf> = entries.flatten().filter(|p| p.is_file()).collect();
        matched.sort();
        if matched.is_empty() {
            warn!("No reference files match {}", input);
        }
        files.extend(
            matched
                .iter()
                .map(|path| ReferenceFile::new(&path.to_string_lossy())),
        );
    }

    files
}

/// Concatenated reference text plus what the classifier needs to know
/// about the inputs.
#[derive(Debug, Clone, Default)]
pub struct ReferenceText {
    pub text: String,
    pub paths: Vec<PathBuf>,
    pub unreadable: Vec<String>,
}

/// Read every reference in order. Failures are logged and skipped.
pub fn read_references(files: &[ReferenceFile]) -> ReferenceText {
    let mut chunks = Vec::new();
    let mut unreadable = Vec::new();

    for file in files {
        match file.content() {
            Ok(content) => chunks.push(content),
            Err(e) => {
                warn!("Skipping reference {}: {}", file.path, e);
                unreadable.push(file.path.clone());
            }
        }
    }

    ReferenceText {
        text: chunks.join("\n\n"),
        paths: files.iter().map(ReferenceFile::as_path).collect(),
        unreadable,
    }
}
