#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod extract;
mod health;
mod routes;

use std::net::SocketAddr;

use axum::Router;
use synthara_config::Config;
use synthara_pipeline::Pipeline;
use tower_http::trace::TraceLayer;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    pipeline: Pipeline,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// Model and storage clients are created once here and shared by
    /// every request.
    ///
    /// # Errors
    ///
    /// Returns an error if any backend client cannot be constructed
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let llm = synthara_llm::build_model(&config.llm)
            .map_err(|e| anyhow::anyhow!("Failed to initialize language model: {e}"))?;
        let music = synthara_music::build_synthesizer(&config.music)
            .map_err(|e| anyhow::anyhow!("Failed to initialize music synthesizer: {e}"))?;
        let image = synthara_imagegen::build_synthesizer(&config.imagegen)
            .map_err(|e| anyhow::anyhow!("Failed to initialize image synthesizer: {e}"))?;
        let store = synthara_storage::build_store(&config.storage)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to initialize artifact store: {e}"))?;

        let pipeline = Pipeline::new(llm, music, image, store, &config.pipeline);

        Ok(Self::with_pipeline(pipeline, &config))
    }

    /// Build the server around an existing pipeline
    pub fn with_pipeline(pipeline: Pipeline, config: &Config) -> Self {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8000)));

        let mut app = Router::new();

        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        app = app.merge(routes::generation_router().with_state(pipeline.clone()));

        app = app.layer(TraceLayer::new_for_http());

        Self {
            router: app,
            pipeline,
            listen_address,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Override the listen address
    #[must_use]
    pub const fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered. Generations still
    /// waiting for a slot at that point are answered with 503.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        let pipeline = self.pipeline;
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
                pipeline.close();
            })
            .await?;

        Ok(())
    }
}
