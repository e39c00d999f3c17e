use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use synthara_pipeline::{
    DemoResponse, GenerateFromDescriptionRequest, GenerateWithDescribedLyricsRequest, GenerateWithLyricsRequest,
    GenerationResult, Pipeline,
};

use crate::error::ApiError;
use crate::extract::ExtractPayload;

/// Routes for the song generation endpoints
pub fn generation_router() -> Router<Pipeline> {
    Router::new()
        .route("/generate", post(generate_demo))
        .route("/generate_from_description", post(generate_from_description))
        .route("/generate_with_lyrics", post(generate_with_lyrics))
        .route("/generate_with_described_lyrics", post(generate_with_described_lyrics))
}

async fn generate_demo(State(pipeline): State<Pipeline>) -> Result<Json<DemoResponse>, ApiError> {
    tracing::debug!("demo generation requested");

    Ok(Json(pipeline.generate_demo().await?))
}

async fn generate_from_description(
    State(pipeline): State<Pipeline>,
    ExtractPayload(request): ExtractPayload<GenerateFromDescriptionRequest>,
) -> Result<Json<GenerationResult>, ApiError> {
    tracing::debug!(instrumental = request.params.instrumental, "generation from description requested");

    Ok(Json(pipeline.generate_from_description(request).await?))
}

async fn generate_with_lyrics(
    State(pipeline): State<Pipeline>,
    ExtractPayload(request): ExtractPayload<GenerateWithLyricsRequest>,
) -> Result<Json<GenerationResult>, ApiError> {
    tracing::debug!(
        prompt = %request.prompt,
        instrumental = request.params.instrumental,
        "generation with lyrics requested"
    );

    Ok(Json(pipeline.generate_with_lyrics(request).await?))
}

async fn generate_with_described_lyrics(
    State(pipeline): State<Pipeline>,
    ExtractPayload(request): ExtractPayload<GenerateWithDescribedLyricsRequest>,
) -> Result<Json<GenerationResult>, ApiError> {
    tracing::debug!(
        prompt = %request.prompt,
        instrumental = request.params.instrumental,
        "generation with described lyrics requested"
    );

    Ok(Json(pipeline.generate_with_described_lyrics(request).await?))
}
