use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use rand::Rng;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::Config;
use crate::prompt::single_line;
use crate::strategy::SelfieStrategy;
use crate::utils::http::get_http_client;

pub const MAX_REFERENCE_IMAGES: usize = 10;
const DOWNLOAD_TIMEOUT_SECONDS: u64 = 30;
const SEED_MIN: i64 = 1;
const SEED_MAX: i64 = 999_999;

#[derive(Debug, Clone, thiserror::Error)]
pub enum GenerationError {
    #[error("未配置 API Key，请设置 ARK_API_KEY 环境变量")]
    MissingApiKey,
    #[error("请求超时（{0}秒）")]
    Timeout(u64),
    #[error("API 请求失败 ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("API 返回数据格式异常")]
    MalformedResponse,
    #[error("网络请求错误: {0}")]
    Network(String),
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: Option<Vec<ImageItem>>,
}

#[derive(Debug, Deserialize)]
struct ImageItem {
    url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub size: Option<String>,
    pub watermark: Option<bool>,
    pub reference_images: Vec<String>,
    pub n: u32,
    pub seed: Option<i64>,
    pub save_to_file: bool,
    pub filename_prefix: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            size: None,
            watermark: None,
            reference_images: Vec::new(),
            n: 1,
            seed: None,
            save_to_file: true,
            filename_prefix: "jimeng".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Success {
        url: String,
        local_path: Option<PathBuf>,
        seed: i64,
    },
    Failure(GenerationError),
}

#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub prompt: String,
    pub outcome: GenerationOutcome,
}

impl GenerationResult {
    fn failure(prompt: &str, error: GenerationError) -> Self {
        Self {
            prompt: prompt.to_string(),
            outcome: GenerationOutcome::Failure(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Success { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match &self.outcome {
            GenerationOutcome::Success { url, .. } => Some(url),
            GenerationOutcome::Failure(_) => None,
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        match &self.outcome {
            GenerationOutcome::Success { local_path, .. } => local_path.as_deref(),
            GenerationOutcome::Failure(_) => None,
        }
    }

    pub fn seed(&self) -> Option<i64> {
        match &self.outcome {
            GenerationOutcome::Success { seed, .. } => Some(*seed),
            GenerationOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&GenerationError> {
        match &self.outcome {
            GenerationOutcome::Success { .. } => None,
            GenerationOutcome::Failure(error) => Some(error),
        }
    }
}

fn extract_error_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        if let Some(message) = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .or_else(|| value.get("message").and_then(|v| v.as_str()))
        {
            return message.to_string();
        }
    }

    trimmed.to_string()
}

pub struct JimengClient {
    api_key: String,
    api_url: String,
    model: String,
    output_dir: PathBuf,
    default_size: String,
    default_watermark: bool,
    request_timeout: Duration,
}

impl JimengClient {
    pub fn new(config: &Config) -> Self {
        Self {
            api_key: config.ark_api_key.clone(),
            api_url: config.ark_api_url.clone(),
            model: config.model_name.clone(),
            output_dir: config.output_dir.clone(),
            default_size: config.default_size.clone(),
            default_watermark: config.default_watermark,
            request_timeout: Duration::from_secs(config.request_timeout_seconds),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn set_output_dir(&mut self, dir: impl Into<PathBuf>) {
        self.output_dir = dir.into();
    }

    fn build_payload(&self, prompt: &str, options: &GenerateOptions, seed: i64) -> Value {
        let mut payload = json!({
            "model": self.model,
            "prompt": single_line(prompt),
            "response_format": "url",
            "size": options.size.as_deref().unwrap_or(&self.default_size),
            "watermark": options.watermark.unwrap_or(self.default_watermark),
            "n": options.n,
            "seed": seed,
        });

        if !options.reference_images.is_empty() {
            let references: Vec<&str> = options
                .reference_images
                .iter()
                .take(MAX_REFERENCE_IMAGES)
                .map(String::as_str)
                .collect();
            // Image-to-image mode excludes sequential generation.
            payload["image"] = json!(references);
            payload["sequential_image_generation"] = json!("disabled");
        }

        payload
    }

    pub async fn generate(&self, prompt: &str, options: &GenerateOptions) -> GenerationResult {
        if !self.has_api_key() {
            return GenerationResult::failure(prompt, GenerationError::MissingApiKey);
        }

        let seed = options
            .seed
            .unwrap_or_else(|| rand::thread_rng().gen_range(SEED_MIN..=SEED_MAX));
        let payload = self.build_payload(prompt, options, seed);
        let timeout_seconds = self.request_timeout.as_secs();

        let response = match get_http_client()
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .timeout(self.request_timeout)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) if err.is_timeout() => {
                return GenerationResult::failure(prompt, GenerationError::Timeout(timeout_seconds));
            }
            Err(err) => {
                return GenerationResult::failure(prompt, GenerationError::Network(err.to_string()));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = extract_error_message(&body);
            warn!("Generation request failed: status={status}, message={message}");
            return GenerationResult::failure(
                prompt,
                GenerationError::Http {
                    status: status.as_u16(),
                    message,
                },
            );
        }

        let data: ImagesResponse = match response.json().await {
            Ok(data) => data,
            Err(err) => {
                warn!("Failed to decode generation response: {err}");
                return GenerationResult::failure(prompt, GenerationError::MalformedResponse);
            }
        };

        let url = match data
            .data
            .and_then(|items| items.into_iter().next())
            .and_then(|item| item.url)
        {
            Some(url) if !url.trim().is_empty() => url,
            _ => return GenerationResult::failure(prompt, GenerationError::MalformedResponse),
        };

        info!("Image generated: seed={seed}, url={url}");

        let local_path = if options.save_to_file {
            self.download_image(&url, &options.filename_prefix, seed).await
        } else {
            None
        };

        GenerationResult {
            prompt: prompt.to_string(),
            outcome: GenerationOutcome::Success {
                url,
                local_path,
                seed,
            },
        }
    }

    // Best effort: a failed download never turns a generated image into a
    // failed generation.
    async fn download_image(&self, url: &str, prefix: &str, seed: i64) -> Option<PathBuf> {
        if let Err(err) = fs::create_dir_all(&self.output_dir) {
            warn!(
                "Failed to create output directory {}: {err}",
                self.output_dir.display()
            );
            return None;
        }

        let timestamp = Utc::now().timestamp();
        let filename = format!("{prefix}_{seed}_{timestamp}.jpg");
        let filepath = self.output_dir.join(filename);

        let response = match get_http_client()
            .get(url)
            .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECONDS))
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                warn!("Failed to download image {url}: {err}");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "Image download failed for {url} with status {}",
                response.status()
            );
            return None;
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!("Failed to read image bytes from {url}: {err}");
                return None;
            }
        };

        match fs::write(&filepath, &bytes) {
            Ok(()) => Some(filepath),
            Err(err) => {
                warn!("Failed to write image to {}: {err}", filepath.display());
                None
            }
        }
    }

    pub async fn generate_selfie<R: Rng>(
        &self,
        strategy: &mut SelfieStrategy<R>,
        character_prompt: &str,
        selfie_style: Option<&str>,
        reference_images: Vec<String>,
        platform: &str,
    ) -> GenerationResult {
        let style = match selfie_style {
            Some(style) => style.to_string(),
            None => strategy.select_style(platform, None, true),
        };

        let full_prompt = format!("{character_prompt}，{style}，高质量照片，自然光线");
        let options = GenerateOptions {
            reference_images,
            filename_prefix: format!("selfie_{}", style.replace(' ', "_")),
            ..GenerateOptions::default()
        };

        self.generate(&full_prompt, &options).await
    }
}
