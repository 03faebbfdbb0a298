// ABOUTME: Configuration module for the deckgen application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::errors::Result;
use crate::images::{ImageConfig, DEFAULT_IMAGE_MODEL, GEMINI_BASE_URL};
use crate::theme::ThemeSet;
use log::info;
use std::env;
use std::path::PathBuf;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub themes_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub gemini_api_key: Option<String>,
    pub image_model: String,
    pub image_timeout_secs: u64,
    pub generate_images: bool,
    pub debounce_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            themes_dir: None,
            output_dir: PathBuf::from("output"),
            gemini_api_key: None,
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            image_timeout_secs: 90,
            generate_images: true,
            debounce_ms: 500,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let themes_dir = env::var("DECKGEN_THEMES_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let output_dir = env::var("DECKGEN_OUTPUT_DIR")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.output_dir);
        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|s| !s.is_empty());
        let image_model = env::var("DECKGEN_IMAGE_MODEL").unwrap_or(defaults.image_model);
        let image_timeout_secs = env::var("DECKGEN_IMAGE_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.image_timeout_secs);
        let generate_images = env::var("DECKGEN_IMAGES")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);
        let debounce_ms = env::var("DECKGEN_DEBOUNCE_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.debounce_ms);

        Self {
            themes_dir,
            output_dir,
            gemini_api_key,
            image_model,
            image_timeout_secs,
            generate_images,
            debounce_ms,
        }
    }

    /// Get an image configuration; no API key when images are turned off
    pub fn get_image_config(&self) -> ImageConfig {
        ImageConfig {
            api_key: if self.generate_images {
                self.gemini_api_key.clone()
            } else {
                None
            },
            model: self.image_model.clone(),
            base_url: GEMINI_BASE_URL.to_string(),
            timeout_secs: self.image_timeout_secs,
        }
    }

    /// Built-in themes, overlaid with the themes directory when one is set
    pub fn load_themes(&self) -> Result<ThemeSet> {
        let mut themes = ThemeSet::builtin()?;
        if let Some(dir) = &self.themes_dir {
            let loaded = themes.load_dir(dir)?;
            info!("Loaded {} theme(s) from {:?}", loaded, dir);
        }
        Ok(themes)
    }
}
