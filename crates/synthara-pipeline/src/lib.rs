//! Song generation pipeline
//!
//! Turns a description, explicit lyrics, or a lyrics brief into a stored
//! song: derived text from the language model, audio and cover synthesis,
//! categorization, and upload.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
pub mod generators;
mod pipeline;
pub mod prompts;
mod types;

pub use error::{PipelineError, Result};
pub use pipeline::{INSTRUMENTAL_LYRICS, Pipeline};
pub use types::{
    DemoResponse, GenerateFromDescriptionRequest, GenerateWithDescribedLyricsRequest, GenerateWithLyricsRequest,
    GenerationParams, GenerationResult,
};
