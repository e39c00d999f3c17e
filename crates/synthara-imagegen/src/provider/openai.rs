use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use synthara_config::ImageGenConfig;

use crate::{
    ImageRequest, ImageSynthesizer,
    error::{ImageGenError, Result},
};

/// Default `OpenAI` API base URL
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible image generation provider
///
/// Diffusion servers that speak this API accept `num_inference_steps` and
/// `guidance_scale` as extension fields.
pub(crate) struct OpenAiImageGenProvider {
    client: Client,
    api_key: Option<SecretString>,
    base_url: String,
    model: String,
    size: String,
}

impl OpenAiImageGenProvider {
    pub fn new(config: &ImageGenConfig) -> Result<Self> {
        let client = synthara_core::http_client(Duration::from_secs(config.timeout_secs))
            .map_err(|e| ImageGenError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        let base_url = config
            .base_url
            .as_ref()
            .map_or(DEFAULT_BASE_URL, |url| url.as_str())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url,
            model: config.model.clone(),
            size: config.size.clone(),
        })
    }

    /// Fetch the image bytes out of the first result
    async fn image_bytes(&self, data: OpenAiImageData) -> Result<Vec<u8>> {
        if let Some(b64) = data.b64_json {
            return STANDARD
                .decode(b64.as_bytes())
                .map_err(|e| ImageGenError::InvalidResponse(format!("invalid base64 image: {e}")));
        }

        let Some(url) = data.url else {
            return Err(ImageGenError::InvalidResponse(
                "result has neither b64_json nor url".to_string(),
            ));
        };

        tracing::debug!(url = %url, "downloading generated image");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ImageGenError::ConnectionError(format!("failed to download image: {e}")))?;

        if !response.status().is_success() {
            return Err(ImageGenError::ProviderApiError {
                status: response.status().as_u16(),
                message: format!("image download from {url} failed"),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageGenError::ConnectionError(format!("failed to read image body: {e}")))?;

        Ok(bytes.to_vec())
    }
}

/// Wire format for the `OpenAI` image generation API request
#[derive(Serialize)]
struct OpenAiImageRequest<'a> {
    prompt: &'a str,
    model: &'a str,
    n: u32,
    size: &'a str,
    response_format: &'static str,
    num_inference_steps: u32,
    guidance_scale: f64,
}

/// Wire format for the `OpenAI` image generation API response
#[derive(Deserialize)]
struct OpenAiImageResponse {
    data: Vec<OpenAiImageData>,
}

#[derive(Deserialize)]
struct OpenAiImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    b64_json: Option<String>,
}

#[async_trait]
impl ImageSynthesizer for OpenAiImageGenProvider {
    async fn synthesize(&self, request: &ImageRequest, output: &Path) -> Result<()> {
        let url = format!("{}/images/generations", self.base_url);

        let wire_request = OpenAiImageRequest {
            prompt: &request.prompt,
            model: &self.model,
            n: 1,
            size: &self.size,
            response_format: "b64_json",
            num_inference_steps: request.num_inference_steps,
            guidance_scale: request.guidance_scale,
        };

        tracing::debug!(
            model = %self.model,
            steps = request.num_inference_steps,
            "sending image generation request"
        );

        let mut http_request = self.client.post(&url).json(&wire_request);
        if let Some(api_key) = &self.api_key {
            http_request = http_request.bearer_auth(api_key.expose_secret());
        }

        let response = http_request.send().await.map_err(|e| {
            tracing::error!(error = %e, "image generation request failed");
            ImageGenError::ConnectionError(format!("Failed to send image generation request: {e}"))
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!(status = %status, "image generation API error");

            return Err(ImageGenError::ProviderApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let wire_response: OpenAiImageResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse image generation response");
            ImageGenError::InvalidResponse(e.to_string())
        })?;

        let first = wire_response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ImageGenError::InvalidResponse("response contained no images".to_string()))?;

        let image = self.image_bytes(first).await?;
        tokio::fs::write(output, &image).await?;

        tracing::debug!(bytes = image.len(), path = %output.display(), "image generation complete");

        Ok(())
    }

    fn name(&self) -> &str {
        "openai"
    }
}
