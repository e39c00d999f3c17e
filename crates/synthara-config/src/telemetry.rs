use indexmap::IndexMap;
use serde::Deserialize;
use url::Url;

/// Logging and OTLP export settings
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelemetryConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Extra resource attributes, emitted in file order
    #[serde(default)]
    pub resource_attributes: IndexMap<String, String>,
    /// Log filter directive (e.g. `info,synthara_pipeline=debug`)
    #[serde(default)]
    pub log_filter: Option<String>,
    /// Collector to ship traces and metrics to
    #[serde(default)]
    pub otlp: Option<OtlpConfig>,
}

impl TelemetryConfig {
    /// Whether any signal is exported over OTLP
    pub fn has_exporter(&self) -> bool {
        self.otlp.as_ref().is_some_and(|otlp| otlp.traces || otlp.metrics)
    }
}

/// OTLP collector connection and per-signal switches
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtlpConfig {
    pub endpoint: Url,
    #[serde(default)]
    pub protocol: ExportProtocol,
    /// Metric export interval in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_true")]
    pub traces: bool,
    #[serde(default = "default_true")]
    pub metrics: bool,
    /// Fraction of root traces kept, 0.0 to 1.0
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
    /// Follow the caller's sampling decision when one is propagated
    #[serde(default = "default_true")]
    pub parent_based: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportProtocol {
    #[default]
    Grpc,
    HttpProto,
}

fn default_service_name() -> String {
    "synthara".to_string()
}

#[allow(clippy::missing_const_for_fn)]
fn default_interval_secs() -> u64 {
    30
}

#[allow(clippy::missing_const_for_fn)]
fn default_sampling_ratio() -> f64 {
    1.0
}

#[allow(clippy::missing_const_for_fn)]
fn default_true() -> bool {
    true
}
