use std::time::Duration;

use anyhow::Context;
use base64::Engine;
use synthara_pipeline::DemoResponse;

use crate::args::SmokeArgs;

/// Fetch the demo track from a running server and write it to disk
pub async fn run(args: SmokeArgs) -> anyhow::Result<()> {
    let endpoint = format!("{}/generate", args.url.as_str().trim_end_matches('/'));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;

    tracing::info!(%endpoint, "requesting demo track");

    let response = client
        .post(&endpoint)
        .send()
        .await
        .with_context(|| format!("failed to reach {endpoint}"))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("server answered {status}: {body}");
    }

    let demo: DemoResponse = response.json().await.context("invalid demo response")?;
    let audio = base64::engine::general_purpose::STANDARD
        .decode(demo.audio_data)
        .context("demo audio is not valid base64")?;

    tokio::fs::write(&args.output, &audio)
        .await
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    tracing::info!(output = %args.output.display(), bytes = audio.len(), "demo track saved");

    Ok(())
}
