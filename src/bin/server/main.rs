use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use product_catalog::{
    adapters::inbound::http::router::{create_router_with_timeout, AppState},
    app::{AppBuilder, AppConfig, RepositoryBackend, StorageBackend, DEFAULT_MAX_CONNECTIONS},
};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StorageKind {
    Memory,
    Local,
    S3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RepositoryKind {
    Memory,
    Database,
}

#[derive(Parser, Debug)]
#[command(name = "catalog-server")]
#[command(about = "Product catalog HTTP server", long_about = None)]
struct Cli {
    /// Server port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "3000")]
    port: u16,

    /// Server host to bind to
    #[arg(long, env = "SERVER_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Storage backend for product images
    #[arg(long, env = "STORAGE_BACKEND", value_enum, default_value = "memory")]
    storage_backend: StorageKind,

    /// Root directory of the local storage backend
    #[arg(long, env = "STORAGE_ROOT", default_value = "./uploads")]
    storage_root: PathBuf,

    /// Base URL image locators are built from
    #[arg(long, env = "PUBLIC_BASE_URL")]
    public_base_url: Option<String>,

    /// S3 bucket name
    #[arg(long, env = "S3_BUCKET")]
    s3_bucket: Option<String>,

    /// S3 region
    #[arg(long, env = "S3_REGION", default_value = "us-east-1")]
    s3_region: String,

    /// S3 endpoint URL (for S3-compatible services such as MinIO)
    #[arg(long, env = "S3_ENDPOINT")]
    s3_endpoint: Option<String>,

    /// S3 access key
    #[arg(long, env = "S3_ACCESS_KEY")]
    s3_access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "S3_SECRET_KEY")]
    s3_secret_key: Option<String>,

    /// Product repository backend
    #[arg(long, env = "REPOSITORY_BACKEND", value_enum, default_value = "memory")]
    repository_backend: RepositoryKind,

    /// Database URL for the repository backend (PostgreSQL)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = DEFAULT_MAX_CONNECTIONS)]
    database_max_connections: u32,

    /// Seconds before an in-flight request is aborted
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    request_timeout_secs: u64,

    /// Log level or filter directive
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Cli {
    fn to_app_config(&self) -> Result<AppConfig> {
        let storage_backend = match self.storage_backend {
            StorageKind::Memory => StorageBackend::InMemory,
            StorageKind::Local => StorageBackend::LocalFileSystem {
                root: self.storage_root.clone(),
                public_base_url: self.public_base_url.clone(),
            },
            StorageKind::S3 => StorageBackend::S3 {
                bucket: self
                    .s3_bucket
                    .clone()
                    .context("S3_BUCKET is required for S3 backend")?,
                region: self.s3_region.clone(),
                endpoint: self.s3_endpoint.clone(),
                access_key: self.s3_access_key.clone(),
                secret_key: self.s3_secret_key.clone(),
                public_base_url: self.public_base_url.clone(),
            },
        };

        let repository_backend = match self.repository_backend {
            RepositoryKind::Memory => RepositoryBackend::InMemory,
            RepositoryKind::Database => RepositoryBackend::Database {
                connection_string: self
                    .database_url
                    .clone()
                    .context("DATABASE_URL is required for database backend")?,
                max_connections: self.database_max_connections,
            },
        };

        Ok(AppConfig {
            storage_backend,
            repository_backend,
        })
    }

    fn init_logging(&self) -> Result<()> {
        let env_filter = EnvFilter::try_new(&self.log_level)
            .unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("Failed to install tracing subscriber")?;

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    info!("Starting product catalog server");
    info!(storage = ?cli.storage_backend, repository = ?cli.repository_backend, "backends");

    let config = cli.to_app_config()?;
    let app_services = AppBuilder::new()
        .with_config(config)
        .build()
        .await
        .context("Failed to build application")?;

    let router = create_router_with_timeout(
        AppState::new(app_services.catalog),
        Duration::from_secs(cli.request_timeout_secs),
    );

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, router)
        .await
        .context("Failed to start server")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "catalog-server",
            "--port",
            "8080",
            "--storage-backend",
            "s3",
            "--s3-bucket",
            "catalog-images",
            "--s3-endpoint",
            "http://localhost:9000",
        ]);

        assert_eq!(cli.port, 8080);
        assert_eq!(cli.storage_backend, StorageKind::S3);

        match cli.to_app_config().unwrap().storage_backend {
            StorageBackend::S3 {
                bucket, endpoint, ..
            } => {
                assert_eq!(bucket, "catalog-images");
                assert_eq!(endpoint.as_deref(), Some("http://localhost:9000"));
            }
            other => panic!("expected S3 backend, got {other:?}"),
        }
    }

    #[test]
    fn test_memory_config() {
        let cli = Cli::parse_from(["catalog-server"]);

        let config = cli.to_app_config().unwrap();
        assert!(matches!(config.storage_backend, StorageBackend::InMemory));
        assert!(matches!(
            config.repository_backend,
            RepositoryBackend::InMemory
        ));
    }

    #[test]
    fn test_database_requires_url() {
        let cli = Cli::parse_from(["catalog-server", "--repository-backend", "database"]);

        if cli.database_url.is_none() {
            assert!(cli.to_app_config().is_err());
        }
    }
}
