// ABOUTME: Background image generation for deck slides
// ABOUTME: Builds prompts from theme imagery and calls an injected image source such as Gemini

use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::{debug, error, info, warn};
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;

use crate::errors::{DeckError, Result};
use crate::layout::{Layout, MappedSlide};
use crate::theme::ImageryStyle;

pub const DEFAULT_IMAGE_MODEL: &str = "nano-banana-pro-preview";
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Raw image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageBlob {
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Decode a base64 payload. Invalid input yields `None`.
    pub fn from_base64(mime_type: &str, encoded: &str) -> Option<Self> {
        match STANDARD.decode(encoded.trim()) {
            Ok(data) if !data.is_empty() => Some(Self::new(mime_type, data)),
            Ok(_) => None,
            Err(e) => {
                warn!("Discarding image with invalid base64 payload: {}", e);
                None
            }
        }
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// Anything that can turn a prompt into an image. `None` means no image,
/// which never fails a deck.
pub trait ImageSource {
    fn generate(&self, prompt: &str) -> Option<ImageBlob>;
}

impl<F> ImageSource for F
where
    F: Fn(&str) -> Option<ImageBlob>,
{
    fn generate(&self, prompt: &str) -> Option<ImageBlob> {
        self(prompt)
    }
}

/// Build the image prompt for one slide.
pub fn build_prompt(slide: &MappedSlide, style: &ImageryStyle, deck_topic: &str) -> String {
    let subject = [slide.text("title"), slide.text("label"), slide.text("subtitle")]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|text| !text.is_empty())
        .or_else(|| Some(deck_topic.trim()).filter(|topic| !topic.is_empty()))
        .unwrap_or("abstract presentation");

    let mut parts = vec![
        format!(
            "Create a {} background image for a presentation slide.",
            style.style
        ),
        format!("Theme: {}.", style.mood),
        format!("Topic: {}.", subject),
        format!("Color palette: {}.", style.colors),
        "The image should be subtle enough to allow white text overlay.".to_string(),
        "No text or words in the image.".to_string(),
        "Aspect ratio: 16:9, landscape orientation.".to_string(),
    ];

    match slide.layout {
        Layout::TitleCenter => parts.push(
            "This is a title slide - make it visually striking but not overwhelming.".to_string(),
        ),
        Layout::Statement => parts.push(
            "This is a section divider - use abstract shapes or subtle patterns.".to_string(),
        ),
        _ => {}
    }

    parts.join(" ")
}

/// Attach generated backgrounds to the first slide and every slide that
/// asks for one. Returns the new slides and how many images were attached.
pub fn attach_backgrounds(
    slides: &[MappedSlide],
    source: &dyn ImageSource,
    style: &ImageryStyle,
    deck_topic: &str,
) -> (Vec<MappedSlide>, usize) {
    let mut generated = 0;
    let slides = slides
        .iter()
        .enumerate()
        .map(|(idx, slide)| {
            if idx != 0 && !slide.wants_image {
                return slide.clone();
            }
            let prompt = build_prompt(slide, style, deck_topic);
            match source.generate(&prompt) {
                Some(image) => {
                    generated += 1;
                    slide.clone().with_background(image)
                }
                None => slide.clone(),
            }
        })
        .collect();
    (slides, generated)
}

/// Settings for the Gemini-backed image source.
#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
            timeout_secs: 90,
        }
    }
}

/// Image source backed by Gemini image generation, or Imagen for
/// `imagen-*` models.
pub struct GeminiImageClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiImageClient {
    /// Build a client, or `None` when no API key is configured.
    pub fn from_config(config: &ImageConfig) -> Result<Option<Self>> {
        let Some(api_key) = config.api_key.clone().filter(|key| !key.is_empty()) else {
            info!("No GEMINI_API_KEY found - image generation disabled");
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(DeckError::FetchError)?;

        Ok(Some(Self {
            client,
            api_key,
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }))
    }

    fn uses_imagen(&self) -> bool {
        self.model.starts_with("imagen-")
    }

    fn post(&self, method: &str, payload: &Value) -> Result<Value> {
        let url = format!("{}/models/{}:{}", self.base_url, self.model, method);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(payload)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let snippet: String = body.chars().take(300).collect();
            return Err(DeckError::ImageError(format!(
                "API error {}: {}",
                status, snippet
            )));
        }

        Ok(response.json()?)
    }

    fn generate_gemini(&self, prompt: &str) -> Result<Option<ImageBlob>> {
        let payload = json!({
            "contents": [{ "parts": [{ "text": format!("Generate an image: {}", prompt) }] }],
            "generationConfig": { "responseModalities": ["image"] },
        });
        let result = self.post("generateContent", &payload)?;

        let parts = result
            .pointer("/candidates/0/content/parts")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        for part in parts {
            if let Some(inline) = part.get("inlineData") {
                let mime = inline
                    .get("mimeType")
                    .and_then(Value::as_str)
                    .unwrap_or("image/png");
                if let Some(data) = inline.get("data").and_then(Value::as_str) {
                    return Ok(ImageBlob::from_base64(mime, data));
                }
            }
        }

        warn!("No image data in Gemini response");
        Ok(None)
    }

    fn generate_imagen(&self, prompt: &str) -> Result<Option<ImageBlob>> {
        let payload = json!({
            "instances": [{ "prompt": prompt }],
            "parameters": {
                "sampleCount": 1,
                "aspectRatio": "16:9",
                "personGeneration": "dont_allow",
                "safetySetting": "block_low_and_above",
            },
        });
        let result = self.post("predict", &payload)?;

        match result
            .pointer("/predictions/0/bytesBase64Encoded")
            .and_then(Value::as_str)
        {
            Some(data) => Ok(ImageBlob::from_base64("image/png", data)),
            None => {
                warn!("No image data in Imagen response");
                Ok(None)
            }
        }
    }
}

impl ImageSource for GeminiImageClient {
    fn generate(&self, prompt: &str) -> Option<ImageBlob> {
        debug!("Image prompt: {}", prompt);
        let result = if self.uses_imagen() {
            self.generate_imagen(prompt)
        } else {
            self.generate_gemini(prompt)
        };

        match result {
            Ok(image) => image,
            Err(e) => {
                error!("Image generation failed: {}", e);
                None
            }
        }
    }
}
