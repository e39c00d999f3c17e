//! OTLP exporters for traces and metrics

use std::time::Duration;

use opentelemetry_otlp::{MetricExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::metrics::{PeriodicReader, SdkMeterProvider};
use opentelemetry_sdk::trace::{Sampler, SdkTracerProvider};
use synthara_config::{ExportProtocol, OtlpConfig};

pub(crate) fn meter_provider(config: &OtlpConfig, resource: Resource) -> anyhow::Result<SdkMeterProvider> {
    let endpoint = config.endpoint.as_str();

    let exporter = match config.protocol {
        ExportProtocol::Grpc => MetricExporter::builder().with_tonic().with_endpoint(endpoint).build(),
        ExportProtocol::HttpProto => MetricExporter::builder().with_http().with_endpoint(endpoint).build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build metrics exporter: {e}"))?;

    let reader = PeriodicReader::builder(exporter)
        .with_interval(Duration::from_secs(config.interval_secs))
        .build();

    Ok(SdkMeterProvider::builder()
        .with_resource(resource)
        .with_reader(reader)
        .build())
}

pub(crate) fn tracer_provider(config: &OtlpConfig, resource: Resource) -> anyhow::Result<SdkTracerProvider> {
    let endpoint = config.endpoint.as_str();

    let exporter = match config.protocol {
        ExportProtocol::Grpc => SpanExporter::builder().with_tonic().with_endpoint(endpoint).build(),
        ExportProtocol::HttpProto => SpanExporter::builder().with_http().with_endpoint(endpoint).build(),
    }
    .map_err(|e| anyhow::anyhow!("failed to build span exporter: {e}"))?;

    Ok(SdkTracerProvider::builder()
        .with_resource(resource)
        .with_batch_exporter(exporter)
        .with_sampler(sampler(config.sampling_ratio, config.parent_based))
        .build())
}

fn sampler(ratio: f64, parent_based: bool) -> Sampler {
    let root = if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    };

    if parent_based {
        Sampler::ParentBased(Box::new(root))
    } else {
        root
    }
}
