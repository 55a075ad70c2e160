//! The `grayscaler serve` command: run the HTTP service.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use grayscaler::{create_router, AppState};
use grayscaler_core::{Config, ResultCache};

/// Arguments for the `serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Interface to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory reserved for uploads
    #[arg(long, env = "UPLOAD_FOLDER")]
    pub upload_dir: Option<PathBuf>,

    /// Directory processed images are written to
    #[arg(long, env = "OUTPUT_FOLDER")]
    pub output_dir: Option<PathBuf>,
}

impl ServeArgs {
    /// Apply command-line and environment overrides on top of the file config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(dir) = &self.upload_dir {
            config.storage.upload_dir = dir.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.storage.output_dir = dir.clone();
        }
    }
}

/// Execute the serve command.
pub async fn execute(args: ServeArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    config
        .ensure_directories()
        .context("Failed to create upload/output directories")?;

    tracing::info!(
        upload_dir = %config.upload_dir().display(),
        output_dir = %config.output_dir().display(),
        "Starting Grayscaler v{}",
        grayscaler_core::VERSION
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let cache = Arc::new(ResultCache::from_config(&config.cache));
    let cleanup_interval = Duration::from_secs(config.cache.cleanup_interval_secs);
    let _cleanup_handle = cache.clone().spawn_cleanup_task(cleanup_interval);
    tracing::debug!(
        interval_secs = cleanup_interval.as_secs(),
        "Cache cleanup task spawned"
    );

    let router = create_router(AppState::with_cache(config, cache));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let args = ServeArgs {
            host: Some("127.0.0.1".into()),
            port: Some(9000),
            upload_dir: None,
            output_dir: Some(PathBuf::from("/tmp/out")),
        };
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.storage.upload_dir, PathBuf::from("static/uploads"));
    }
}
