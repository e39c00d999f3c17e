//! Music inference server reached over HTTP

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use synthara_config::MusicConfig;
use url::Url;

use crate::{MusicRequest, MusicSynthesizer, error::MusicError, error::Result};

/// Music backend exposing `POST /generate`
///
/// The request carries every tunable as JSON and the response body is the
/// encoded waveform.
pub(crate) struct HttpMusicProvider {
    client: Client,
    base_url: Url,
    api_key: Option<SecretString>,
    timeout_secs: u64,
}

impl HttpMusicProvider {
    pub fn new(config: &MusicConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .ok_or_else(|| MusicError::Config("music.base_url is required for the http backend".to_string()))?;

        let client = synthara_core::http_client(Duration::from_secs(config.timeout_secs))
            .map_err(|e| MusicError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

/// Wire format for the generation request
#[derive(Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    lyrics: &'a str,
    audio_duration: f64,
    infer_step: i64,
    guidance_scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    manual_seeds: Option<[u64; 1]>,
}

impl<'a> From<&'a MusicRequest> for GenerateRequest<'a> {
    fn from(request: &'a MusicRequest) -> Self {
        Self {
            prompt: &request.prompt,
            lyrics: &request.lyrics,
            audio_duration: request.audio_duration,
            infer_step: request.infer_step,
            guidance_scale: request.guidance_scale,
            manual_seeds: request.seed.map(|seed| [seed]),
        }
    }
}

#[async_trait]
impl MusicSynthesizer for HttpMusicProvider {
    async fn synthesize(&self, request: &MusicRequest, output: &Path) -> Result<()> {
        let url = format!("{}/generate", self.base_url.as_str().trim_end_matches('/'));

        tracing::debug!(
            prompt = %request.prompt,
            audio_duration = request.audio_duration,
            infer_step = request.infer_step,
            "sending music generation request"
        );

        let mut http_request = self.client.post(&url).json(&GenerateRequest::from(request));
        if let Some(api_key) = &self.api_key {
            http_request = http_request.bearer_auth(api_key.expose_secret());
        }

        let response = http_request.send().await.map_err(|e| {
            tracing::error!(error = %e, "music generation request failed");
            if e.is_timeout() {
                MusicError::Timeout(self.timeout_secs)
            } else {
                MusicError::Connection(e.to_string())
            }
        })?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(status = %status, "music backend API error");

            return Err(MusicError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let audio = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                MusicError::Timeout(self.timeout_secs)
            } else {
                MusicError::InvalidResponse(format!("failed to read audio body: {e}"))
            }
        })?;

        tokio::fs::write(output, &audio).await?;

        tracing::debug!(bytes = audio.len(), path = %output.display(), "music generation complete");

        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(seed: Option<u64>) -> MusicRequest {
        MusicRequest {
            prompt: "rap, 100 bpm".to_string(),
            lyrics: "[instrumental]".to_string(),
            audio_duration: 120.0,
            infer_step: 60,
            guidance_scale: 15.0,
            seed,
        }
    }

    #[test]
    fn seed_is_sent_as_manual_seeds() {
        let value = serde_json::to_value(GenerateRequest::from(&request(Some(42)))).unwrap();
        assert_eq!(value["manual_seeds"], serde_json::json!([42]));
        assert_eq!(value["infer_step"], 60);
        assert_eq!(value["lyrics"], "[instrumental]");
    }

    #[test]
    fn negative_infer_step_is_forwarded() {
        let mut req = request(None);
        req.infer_step = -5;
        let value = serde_json::to_value(GenerateRequest::from(&req)).unwrap();
        assert_eq!(value["infer_step"], -5);
    }

    #[test]
    fn unset_seed_is_omitted() {
        let value = serde_json::to_value(GenerateRequest::from(&request(None))).unwrap();
        assert!(value.get("manual_seeds").is_none());
    }
}
