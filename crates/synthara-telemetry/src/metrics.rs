//! Metric name constants and recording helpers

use std::time::Instant;

use opentelemetry::metrics::{Histogram, Meter};

/// Meter shared by every Synthara instrument
#[must_use]
pub fn meter() -> Meter {
    opentelemetry::global::meter("synthara")
}

/// Record a duration measurement on a histogram
pub fn record_duration(histogram: &Histogram<f64>, start: Instant, attributes: &[opentelemetry::KeyValue]) {
    histogram.record(start.elapsed().as_secs_f64(), attributes);
}

// Pipeline metric names
pub const GENERATION_COUNT: &str = "synthara.generation.count";
pub const GENERATION_DURATION: &str = "synthara.generation.duration";
pub const STAGE_DURATION: &str = "synthara.stage.duration";
