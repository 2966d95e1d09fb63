use std::{path::PathBuf, sync::Arc};
use url::Url;

use crate::{
    adapters::outbound::{
        persistence::{InMemoryProductRepository, PostgresProductRepository},
        storage::{create_s3_store, default_public_base_url, ObjectStoreStorage, S3Config},
    },
    ports::{ObjectStorage, ProductRepository},
    services::CatalogService,
};

/// Root directory of the local filesystem backend when none is configured
pub const DEFAULT_STORAGE_ROOT: &str = "./uploads";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration for the application
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
    pub repository_backend: RepositoryBackend,
}

/// Storage backend configuration
#[derive(Debug, Clone, Default)]
pub enum StorageBackend {
    #[default]
    InMemory,
    LocalFileSystem {
        root: PathBuf,
        public_base_url: Option<String>,
    },
    S3 {
        bucket: String,
        region: String,
        endpoint: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
        public_base_url: Option<String>,
    },
}

/// Repository backend configuration
#[derive(Debug, Clone, Default)]
pub enum RepositoryBackend {
    #[default]
    InMemory,
    Database {
        connection_string: String,
        max_connections: u32,
    },
}

impl AppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `var`, which resolves a variable name
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |key: &str| {
            var(key).ok_or_else(|| AppError::Configuration {
                message: format!("{key} environment variable required"),
            })
        };

        let storage_backend = match var("STORAGE_BACKEND").as_deref() {
            None | Some("memory") => StorageBackend::InMemory,
            Some("local") => StorageBackend::LocalFileSystem {
                root: var("STORAGE_ROOT")
                    .unwrap_or_else(|| DEFAULT_STORAGE_ROOT.to_string())
                    .into(),
                public_base_url: var("PUBLIC_BASE_URL"),
            },
            Some("s3") => StorageBackend::S3 {
                bucket: required("S3_BUCKET")?,
                region: required("S3_REGION")?,
                endpoint: var("S3_ENDPOINT"),
                access_key: var("S3_ACCESS_KEY"),
                secret_key: var("S3_SECRET_KEY"),
                public_base_url: var("PUBLIC_BASE_URL"),
            },
            Some(other) => {
                return Err(AppError::Configuration {
                    message: format!("Unknown storage backend: {other}"),
                })
            }
        };

        let repository_backend = match var("REPOSITORY_BACKEND").as_deref() {
            None | Some("memory") => RepositoryBackend::InMemory,
            Some("database") => RepositoryBackend::Database {
                connection_string: required("DATABASE_URL")?,
                max_connections: match var("DATABASE_MAX_CONNECTIONS") {
                    Some(value) => value.parse().map_err(|_| AppError::Configuration {
                        message: format!("DATABASE_MAX_CONNECTIONS is not a number: {value}"),
                    })?,
                    None => DEFAULT_MAX_CONNECTIONS,
                },
            },
            Some(other) => {
                return Err(AppError::Configuration {
                    message: format!("Unknown repository backend: {other}"),
                })
            }
        };

        Ok(Self {
            storage_backend,
            repository_backend,
        })
    }
}

/// Application dependencies container
pub struct AppDependencies {
    pub repository: Arc<dyn ProductRepository>,
    pub storage: Arc<dyn ObjectStorage>,
}

/// Application services container
#[derive(Clone)]
pub struct AppServices {
    pub catalog: CatalogService,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    pub fn with_repository_backend(mut self, backend: RepositoryBackend) -> Self {
        self.config.repository_backend = backend;
        self
    }

    /// Build the port implementations
    pub async fn build_dependencies(self) -> Result<AppDependencies, AppError> {
        let storage = self.create_storage()?;
        let repository = self.create_repository().await?;

        Ok(AppDependencies {
            repository,
            storage,
        })
    }

    /// Build the complete application with services
    pub async fn build(self) -> Result<AppServices, AppError> {
        let deps = self.build_dependencies().await?;

        Ok(AppServices {
            catalog: CatalogService::new(deps.repository, deps.storage),
        })
    }

    fn create_storage(&self) -> Result<Arc<dyn ObjectStorage>, AppError> {
        let storage_init = |e: crate::domain::errors::StorageError| AppError::StorageInit {
            message: e.to_string(),
        };

        let storage = match &self.config.storage_backend {
            StorageBackend::InMemory => ObjectStoreStorage::in_memory().map_err(storage_init)?,
            StorageBackend::LocalFileSystem {
                root,
                public_base_url,
            } => {
                let public_base_url = public_base_url.as_deref().map(parse_url).transpose()?;
                ObjectStoreStorage::local(root, public_base_url).map_err(storage_init)?
            }
            StorageBackend::S3 {
                bucket,
                region,
                endpoint,
                access_key,
                secret_key,
                public_base_url,
            } => {
                let config = S3Config {
                    bucket: bucket.clone(),
                    region: region.clone(),
                    access_key: access_key.clone(),
                    secret_key: secret_key.clone(),
                    endpoint: endpoint.clone(),
                };
                let store = create_s3_store(&config).map_err(|e| AppError::StorageInit {
                    message: format!("{e:#}"),
                })?;
                let base_url = match public_base_url {
                    Some(url) => parse_url(url)?,
                    None => parse_url(&default_public_base_url(&config))?,
                };
                ObjectStoreStorage::new(store, base_url)
            }
        };

        tracing::info!(base_url = %storage.base_url(), "object storage ready");
        Ok(Arc::new(storage))
    }

    async fn create_repository(&self) -> Result<Arc<dyn ProductRepository>, AppError> {
        match &self.config.repository_backend {
            RepositoryBackend::InMemory => Ok(Arc::new(InMemoryProductRepository::new())),
            RepositoryBackend::Database {
                connection_string,
                max_connections,
            } => {
                let repository =
                    PostgresProductRepository::connect(connection_string, *max_connections)
                        .await
                        .map_err(|e| AppError::RepositoryInit {
                            message: format!("Failed to connect to database: {e}"),
                        })?;
                repository
                    .migrate()
                    .await
                    .map_err(|e| AppError::RepositoryInit {
                        message: format!("Failed to initialize schema: {e}"),
                    })?;

                tracing::info!(max_connections, "database repository ready");
                Ok(Arc::new(repository))
            }
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_url(value: &str) -> Result<Url, AppError> {
    Url::parse(value).map_err(|e| AppError::Configuration {
        message: format!("Invalid public base URL {value}: {e}"),
    })
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },

    #[error("Repository initialization error: {message}")]
    RepositoryInit { message: String },
}

/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .with_repository_backend(RepositoryBackend::InMemory)
        .build()
        .await
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppServices, AppError> {
    AppBuilder::new()
        .with_config(AppConfig::from_env()?)
        .build()
        .await
}
