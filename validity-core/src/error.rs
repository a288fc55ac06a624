use std::path::PathBuf;
use thiserror::Error;

/// 基础设施错误（配置加载、日志初始化）
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to initialize logging: {0}")]
    LoggingInitFailed(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
