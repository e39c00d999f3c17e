use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use base64::Engine;
use synthara_config::PipelineConfig;
use synthara_imagegen::{ImageRequest, ImageSynthesizer};
use synthara_llm::LanguageModel;
use synthara_music::{MusicRequest, MusicSynthesizer};
use synthara_storage::ArtifactStore;
use synthara_telemetry::metrics::{self, GENERATION_COUNT, GENERATION_DURATION, STAGE_DURATION};
use synthara_telemetry::{Counter, Histogram, KeyValue};
use tempfile::TempDir;
use tokio::sync::Semaphore;
use uuid::Uuid;

use crate::generators;
use crate::types::{
    DemoResponse, GenerateFromDescriptionRequest, GenerateWithDescribedLyricsRequest, GenerateWithLyricsRequest,
    GenerationParams, GenerationResult,
};
use crate::{PipelineError, Result};

/// Lyrics passed to the music backend for tracks without vocals
pub const INSTRUMENTAL_LYRICS: &str = "[instrumental]";

// Cover art is cheap and fixed: a turbo model needs two steps and no guidance
const THUMBNAIL_SUFFIX: &str = ", album cover art";
const THUMBNAIL_STEPS: u32 = 2;
const THUMBNAIL_GUIDANCE: f64 = 0.0;

const DEMO_PROMPT: &str = "alternative rock, pop, rock";
const DEMO_DURATION_SECS: f64 = 202.199_979_166_666_68;
const DEMO_LYRICS: &str = "[verse]
Bright lights flashing in the city sky
Running fast and we don't know why
Electric nights got our hearts on fire
Chasing dreams we'll never tire

[verse]
Grit in our eyes wind in our hair
Breaking rules we don't even care
Shouting loud above the crowd
Living life like we're unbowed

[chorus]
Running wild in the night so free
Feel the beat pumping endlessly
Hearts collide in the midnight air
We belong we don't have a care

[verse]
Piercing through like a lightning strike
Every moment feels like a hike
Daring bold never backing down
Kings and queens without a crown

[chorus]
Running wild in the night so free
Feel the beat pumping endlessly
Hearts collide in the midnight air
We belong we don't have a care

[bridge]
Close your eyes let your spirit soar
We are the ones who wanted more
Breaking chains of the mundane
In this world we'll make our claim";

/// Song generation orchestrator
///
/// Cheap to clone. Model handles are shared by every request and a
/// semaphore bounds how many generations run against them at once.
#[derive(Clone)]
pub struct Pipeline {
    inner: Arc<PipelineInner>,
}

struct PipelineInner {
    llm: Arc<dyn LanguageModel>,
    music: Arc<dyn MusicSynthesizer>,
    image: Arc<dyn ImageSynthesizer>,
    store: Arc<dyn ArtifactStore>,
    scratch_dir: Option<PathBuf>,
    permits: Semaphore,
    metrics: PipelineMetrics,
}

struct PipelineMetrics {
    generations: Counter<u64>,
    generation_duration: Histogram<f64>,
    stage_duration: Histogram<f64>,
}

impl PipelineMetrics {
    fn new() -> Self {
        let meter = metrics::meter();

        Self {
            generations: meter
                .u64_counter(GENERATION_COUNT)
                .with_description("Completed generation requests")
                .build(),
            generation_duration: meter
                .f64_histogram(GENERATION_DURATION)
                .with_description("End-to-end generation time")
                .with_unit("s")
                .build(),
            stage_duration: meter
                .f64_histogram(STAGE_DURATION)
                .with_description("Time spent in each generation stage")
                .with_unit("s")
                .build(),
        }
    }
}

impl Pipeline {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        music: Arc<dyn MusicSynthesizer>,
        image: Arc<dyn ImageSynthesizer>,
        store: Arc<dyn ArtifactStore>,
        config: &PipelineConfig,
    ) -> Self {
        tracing::debug!(
            llm = llm.name(),
            music = music.name(),
            image = image.name(),
            store = store.name(),
            max_concurrent_generations = config.max_concurrent_generations,
            "generation pipeline initialized"
        );

        Self {
            inner: Arc::new(PipelineInner {
                llm,
                music,
                image,
                store,
                scratch_dir: config.scratch_dir.clone(),
                permits: Semaphore::new(config.max_concurrent_generations),
                metrics: PipelineMetrics::new(),
            }),
        }
    }

    /// Stop handing out generation slots
    ///
    /// Running generations finish; queued and later calls fail with
    /// [`PipelineError::Unavailable`].
    pub fn close(&self) {
        self.inner.permits.close();
    }

    /// Generate a song from a free-form description
    ///
    /// Style tags and lyrics are both derived from the description, which
    /// also drives categorization.
    pub async fn generate_from_description(&self, request: GenerateFromDescriptionRequest) -> Result<GenerationResult> {
        self.run("from_description", async {
            let description = request.full_described_song.as_str();
            let llm = self.inner.llm.as_ref();

            let tags = self.stage("prompt", generators::generate_prompt(llm, description)).await?;
            let lyrics = if request.params.instrumental {
                INSTRUMENTAL_LYRICS.to_owned()
            } else {
                self.stage("lyrics", generators::generate_lyrics(llm, description)).await?
            };

            self.generate_and_upload(&tags, lyrics, &request.params, description).await
        })
        .await
    }

    /// Generate a song from style tags and caller-supplied lyrics
    pub async fn generate_with_lyrics(&self, request: GenerateWithLyricsRequest) -> Result<GenerationResult> {
        self.run("with_lyrics", async {
            let lyrics = if request.params.instrumental {
                INSTRUMENTAL_LYRICS.to_owned()
            } else {
                request.lyrics
            };

            self.generate_and_upload(&request.prompt, lyrics, &request.params, &request.prompt).await
        })
        .await
    }

    /// Generate a song from style tags and a brief for the lyrics
    ///
    /// The brief goes to the language model as the whole instruction.
    pub async fn generate_with_described_lyrics(
        &self,
        request: GenerateWithDescribedLyricsRequest,
    ) -> Result<GenerationResult> {
        self.run("with_described_lyrics", async {
            let lyrics = if request.params.instrumental {
                INSTRUMENTAL_LYRICS.to_owned()
            } else {
                self.stage("lyrics", async {
                    self.inner
                        .llm
                        .generate(&request.described_lyrics)
                        .await
                        .map_err(PipelineError::from)
                })
                .await?
            };

            self.generate_and_upload(&request.prompt, lyrics, &request.params, &request.prompt).await
        })
        .await
    }

    /// Render the fixed demo track and return it inline
    pub async fn generate_demo(&self) -> Result<DemoResponse> {
        self.run("demo", async {
            let scratch = self.scratch().await?;
            let audio_path = scratch.path().join(format!("{}.wav", Uuid::new_v4()));

            let request = MusicRequest {
                prompt: DEMO_PROMPT.to_owned(),
                lyrics: DEMO_LYRICS.to_owned(),
                audio_duration: DEMO_DURATION_SECS,
                infer_step: 60,
                guidance_scale: 15.0,
                seed: None,
            };

            self.stage("music", async {
                self.inner
                    .music
                    .synthesize(&request, &audio_path)
                    .await
                    .map_err(PipelineError::from)
            })
            .await?;

            let audio = tokio::fs::read(&audio_path).await?;
            tracing::debug!(bytes = audio.len(), "demo track rendered");

            Ok::<_, PipelineError>(DemoResponse {
                audio_data: base64::engine::general_purpose::STANDARD.encode(audio),
            })
        })
        .await
    }

    /// Synthesize audio and cover art, categorize, then upload both files
    ///
    /// Uploads start only after every synthesis step succeeded. Scratch
    /// files are removed when the request ends, on success or failure.
    async fn generate_and_upload(
        &self,
        prompt: &str,
        lyrics: String,
        params: &GenerationParams,
        category_description: &str,
    ) -> Result<GenerationResult> {
        let scratch = self.scratch().await?;

        let audio_key = format!("{}.wav", Uuid::new_v4());
        let audio_path = scratch.path().join(&audio_key);
        let music_request = MusicRequest {
            prompt: prompt.to_owned(),
            lyrics,
            audio_duration: params.audio_duration,
            infer_step: params.infer_step,
            guidance_scale: params.guidance_scale,
            seed: params.seed(),
        };

        self.stage("music", async {
            self.inner
                .music
                .synthesize(&music_request, &audio_path)
                .await
                .map_err(PipelineError::from)
        })
        .await?;

        let image_key = format!("{}.png", Uuid::new_v4());
        let image_path = scratch.path().join(&image_key);
        let image_request = ImageRequest {
            prompt: format!("{prompt}{THUMBNAIL_SUFFIX}"),
            num_inference_steps: THUMBNAIL_STEPS,
            guidance_scale: THUMBNAIL_GUIDANCE,
        };

        self.stage("thumbnail", async {
            self.inner
                .image
                .synthesize(&image_request, &image_path)
                .await
                .map_err(PipelineError::from)
        })
        .await?;

        let categories = self
            .stage(
                "categories",
                generators::generate_categories(self.inner.llm.as_ref(), category_description),
            )
            .await?;

        let (s3_key, s3_thumbnail_key) = self
            .stage("upload", async {
                let store = self.inner.store.as_ref();
                let audio = store.put_file(&audio_path, &audio_key, "audio/wav").await?;
                let thumbnail = store.put_file(&image_path, &image_key, "image/png").await?;
                Ok::<_, PipelineError>((audio, thumbnail))
            })
            .await?;

        tracing::info!(
            s3_key = %s3_key,
            s3_thumbnail_key = %s3_thumbnail_key,
            categories = categories.len(),
            "song generated"
        );

        Ok(GenerationResult {
            s3_key,
            s3_thumbnail_key,
            categories,
        })
    }

    /// Create a per-request scratch directory, removed on drop
    async fn scratch(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("synthara-");

        let dir = match &self.inner.scratch_dir {
            Some(parent) => {
                tokio::fs::create_dir_all(parent).await?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };

        Ok(dir)
    }

    /// Run one operation while holding a generation slot
    async fn run<T, F>(&self, operation: &'static str, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let _permit = self
            .inner
            .permits
            .acquire()
            .await
            .map_err(|_| PipelineError::Unavailable)?;

        tracing::debug!(operation, "generation started");

        let start = Instant::now();
        let result = work.await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        let attributes = [KeyValue::new("operation", operation), KeyValue::new("outcome", outcome)];
        self.inner.metrics.generations.add(1, &attributes);
        metrics::record_duration(&self.inner.metrics.generation_duration, start, &attributes);

        if let Err(e) = &result {
            tracing::error!(operation, error = %e, "generation failed");
        }

        result
    }

    async fn stage<T, F>(&self, stage: &'static str, work: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let start = Instant::now();
        let result = work.await;

        metrics::record_duration(
            &self.inner.metrics.stage_duration,
            start,
            &[KeyValue::new("stage", stage)],
        );
        tracing::debug!(stage, duration = ?start.elapsed(), ok = result.is_ok(), "stage finished");

        result
    }
}
