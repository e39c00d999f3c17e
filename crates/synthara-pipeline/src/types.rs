use serde::{Deserialize, Serialize};

/// Synthesis tunables shared by every generation request
///
/// Values are forwarded to the music backend without validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Track length in seconds
    #[serde(default = "default_audio_duration")]
    pub audio_duration: f64,
    /// Fixed seed, or -1 to let the backend choose
    #[serde(default = "default_seed")]
    pub seed: i64,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
    #[serde(default = "default_infer_step")]
    pub infer_step: i64,
    /// Skip lyrics entirely
    #[serde(default)]
    pub instrumental: bool,
}

impl GenerationParams {
    /// Seed to pass to the backend; negative values mean random
    pub fn seed(&self) -> Option<u64> {
        u64::try_from(self.seed).ok()
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            audio_duration: default_audio_duration(),
            seed: default_seed(),
            guidance_scale: default_guidance_scale(),
            infer_step: default_infer_step(),
            instrumental: false,
        }
    }
}

const fn default_audio_duration() -> f64 {
    120.0
}

const fn default_seed() -> i64 {
    -1
}

const fn default_guidance_scale() -> f64 {
    15.0
}

const fn default_infer_step() -> i64 {
    60
}

/// Generate a song from a single free-form description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateFromDescriptionRequest {
    #[serde(rename = "description", alias = "full_described_song")]
    pub full_described_song: String,
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// Generate a song from style tags and ready-made lyrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateWithLyricsRequest {
    pub prompt: String,
    pub lyrics: String,
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// Generate a song from style tags and a brief for the lyrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateWithDescribedLyricsRequest {
    pub prompt: String,
    pub described_lyrics: String,
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// Keys of the stored artifacts plus derived categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub s3_key: String,
    pub s3_thumbnail_key: String,
    pub categories: Vec<String>,
}

/// Inline demo track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoResponse {
    /// Base64 encoded WAV bytes
    pub audio_data: String,
}
