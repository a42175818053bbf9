use thiserror::Error;

/// Failures outside individual API calls: terminal setup, the API worker
/// thread, and configuration files.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal: {0}")]
    Terminal(#[source] std::io::Error),
    #[error("failed to start api worker: {0}")]
    Worker(#[source] std::io::Error),
    #[error("config {path}: {source}")]
    Config {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("API worker is not running")]
    WorkerGone,
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Attach a config file path to an I/O error.
pub trait ConfigContext<T> {
    fn config_ctx(self, path: &std::path::Path) -> Result<T>;
}

impl<T> ConfigContext<T> for std::io::Result<T> {
    fn config_ctx(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|source| AppError::Config {
            path: path.display().to_string(),
            source,
        })
    }
}
