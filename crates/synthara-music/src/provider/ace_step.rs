//! Resident ACE-Step generation daemon reached over a Unix socket
//!
//! Each synthesis opens a connection, writes one JSON request line and
//! waits for one JSON response line.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use synthara_config::MusicConfig;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::UnixStream,
    time::timeout,
};

use crate::{MusicRequest, MusicSynthesizer, error::MusicError, error::Result};

pub(crate) struct AceStepProvider {
    socket: PathBuf,
    timeout_secs: u64,
}

impl AceStepProvider {
    pub fn new(config: &MusicConfig) -> Result<Self> {
        let socket = config
            .socket
            .clone()
            .ok_or_else(|| MusicError::Config("music.socket is required for the ace_step backend".to_string()))?;

        Ok(Self {
            socket,
            timeout_secs: config.timeout_secs,
        })
    }

    async fn exchange(&self, line: &[u8]) -> Result<String> {
        let mut stream = UnixStream::connect(&self.socket).await.map_err(|e| {
            MusicError::Connection(format!("failed to connect to {}: {e}", self.socket.display()))
        })?;

        stream.write_all(line).await?;
        stream.write_all(b"\n").await?;
        stream.flush().await?;

        let mut reader = BufReader::new(stream);
        let mut response = String::new();
        let read = reader.read_line(&mut response).await?;

        if read == 0 {
            return Err(MusicError::InvalidResponse(
                "daemon closed the connection without a response".to_string(),
            ));
        }

        Ok(response)
    }
}

/// Generation request line
///
/// `infer_step` and `guidance_scale` ride along for daemons that honour
/// them; the reference daemon ignores unknown fields.
#[derive(Serialize)]
struct DaemonRequest<'a> {
    caption: &'a str,
    lyrics: &'a str,
    duration_s: f64,
    infer_step: i64,
    guidance_scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    output: &'a str,
}

/// Response line; failures are matched first since both shapes carry `ok`
#[derive(Deserialize)]
#[serde(untagged)]
enum DaemonResponse {
    Failure { error: String },
    Success { ok: bool, path: Option<String> },
}

#[async_trait]
impl MusicSynthesizer for AceStepProvider {
    async fn synthesize(&self, request: &MusicRequest, output: &Path) -> Result<()> {
        let output_str = output
            .to_str()
            .ok_or_else(|| MusicError::Config(format!("output path is not UTF-8: {}", output.display())))?;

        let line = serde_json::to_vec(&DaemonRequest {
            caption: &request.prompt,
            lyrics: &request.lyrics,
            duration_s: request.audio_duration,
            infer_step: request.infer_step,
            guidance_scale: request.guidance_scale,
            seed: request.seed,
            output: output_str,
        })
        .map_err(|e| MusicError::InvalidResponse(format!("failed to encode request: {e}")))?;

        tracing::debug!(socket = %self.socket.display(), caption = %request.prompt, "sending request to generation daemon");

        let raw = timeout(Duration::from_secs(self.timeout_secs), self.exchange(&line))
            .await
            .map_err(|_| MusicError::Timeout(self.timeout_secs))??;

        let response: DaemonResponse = serde_json::from_str(raw.trim())
            .map_err(|e| MusicError::InvalidResponse(format!("unparseable daemon response: {e}")))?;

        match response {
            DaemonResponse::Success { ok: true, path } => {
                // The daemon may pick its own location; move the file to where the caller expects it
                if let Some(written) = path.map(PathBuf::from)
                    && written != output
                {
                    tokio::fs::copy(&written, output).await?;
                    tokio::fs::remove_file(&written).await?;
                }

                tracing::debug!(path = %output.display(), "generation daemon finished");
                Ok(())
            }
            DaemonResponse::Success { ok: false, .. } => Err(MusicError::Generation(
                "daemon reported failure without a message".to_string(),
            )),
            DaemonResponse::Failure { error } => {
                tracing::error!(error = %error, "generation daemon failed");
                Err(MusicError::Generation(error))
            }
        }
    }

    fn name(&self) -> &str {
        "ace_step"
    }
}

#[cfg(test)]
mod tests {
    use tokio::net::UnixListener;

    use super::*;

    fn config(socket: &Path, timeout_secs: u64) -> MusicConfig {
        MusicConfig {
            provider_type: synthara_config::MusicProviderType::AceStep,
            base_url: None,
            socket: Some(socket.to_path_buf()),
            api_key: None,
            timeout_secs,
        }
    }

    fn request() -> MusicRequest {
        MusicRequest {
            prompt: "ambient piano".to_string(),
            lyrics: "[instrumental]".to_string(),
            audio_duration: 20.0,
            infer_step: 60,
            guidance_scale: 15.0,
            seed: Some(7),
        }
    }

    /// Serve one connection, replying with `reply(request_json)`
    fn spawn_daemon(listener: UnixListener, reply: impl Fn(serde_json::Value) -> String + Send + 'static) {
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (read, mut write) = stream.into_split();
            let mut lines = BufReader::new(read).lines();
            let line = lines.next_line().await.unwrap().unwrap();
            let request: serde_json::Value = serde_json::from_str(&line).unwrap();
            let mut response = reply(request);
            response.push('\n');
            write.write_all(response.as_bytes()).await.unwrap();
        });
    }

    #[tokio::test]
    async fn writes_to_requested_output() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("gen.sock");
        let listener = UnixListener::bind(&socket).unwrap();

        spawn_daemon(listener, |request| {
            assert_eq!(request["caption"], "ambient piano");
            assert_eq!(request["lyrics"], "[instrumental]");
            assert_eq!(request["seed"], 7);
            let output = request["output"].as_str().unwrap().to_string();
            std::fs::write(&output, b"RIFF").unwrap();
            serde_json::json!({"ok": true, "path": output, "duration_s": 20.0}).to_string()
        });

        let provider = AceStepProvider::new(&config(&socket, 5)).unwrap();
        let output = dir.path().join("song.wav");
        provider.synthesize(&request(), &output).await.unwrap();

        assert_eq!(std::fs::read(&output).unwrap(), b"RIFF");
    }

    #[tokio::test]
    async fn relocates_file_written_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("gen.sock");
        let listener = UnixListener::bind(&socket).unwrap();
        let elsewhere = dir.path().join("daemon-choice.wav");
        let elsewhere_clone = elsewhere.clone();

        spawn_daemon(listener, move |_| {
            std::fs::write(&elsewhere_clone, b"RIFF").unwrap();
            serde_json::json!({"ok": true, "path": elsewhere_clone}).to_string()
        });

        let provider = AceStepProvider::new(&config(&socket, 5)).unwrap();
        let output = dir.path().join("song.wav");
        provider.synthesize(&request(), &output).await.unwrap();

        assert!(output.exists());
        assert!(!elsewhere.exists());
    }

    #[tokio::test]
    async fn daemon_error_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("gen.sock");
        let listener = UnixListener::bind(&socket).unwrap();

        spawn_daemon(listener, |_| {
            serde_json::json!({"ok": false, "error": "out of memory"}).to_string()
        });

        let provider = AceStepProvider::new(&config(&socket, 5)).unwrap();
        let err = provider
            .synthesize(&request(), &dir.path().join("song.wav"))
            .await
            .unwrap_err();

        assert!(matches!(err, MusicError::Generation(ref msg) if msg == "out of memory"));
    }

    #[tokio::test]
    async fn missing_socket_is_a_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let provider = AceStepProvider::new(&config(&dir.path().join("absent.sock"), 5)).unwrap();

        let err = provider
            .synthesize(&request(), &dir.path().join("song.wav"))
            .await
            .unwrap_err();

        assert!(matches!(err, MusicError::Connection(_)));
    }
}
