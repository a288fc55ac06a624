use crate::config::Environment;
use crate::error::{CoreError, CoreResult};
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        };
        f.write_str(name)
    }
}

/// 日志格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 紧凑格式（默认）
    Compact,
    /// 完整格式（带时间、级别、目标）
    Full,
    /// JSON 格式
    Json,
    /// 美化格式（适合开发）
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "full" => Ok(LogFormat::Full),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            _ => Err(format!("Invalid log format: {}", s)),
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LogFormat::Compact => "compact",
            LogFormat::Full => "full",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

/// 日志配置
///
/// 校验器本身只发出 `tracing` 事件；是否输出、输出到哪里由这里安装的订阅者决定。
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别（默认：Info）
    pub level: LogLevel,

    /// 日志格式（默认：Compact）
    pub format: LogFormat,

    /// 是否显示目标（模块路径）（默认：false）
    pub show_target: bool,

    /// 是否显示线程 ID（默认：false）
    pub show_thread_ids: bool,

    /// 是否显示线程名（默认：false）
    pub show_thread_names: bool,

    /// 自定义过滤器，例如 "validity_validator=debug"
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
            show_target: false,
            show_thread_ids: false,
            show_thread_names: false,
            filter: None,
        }
    }
}

impl LoggingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn show_target(mut self, show: bool) -> Self {
        self.show_target = show;
        self
    }

    pub fn show_thread_ids(mut self, show: bool) -> Self {
        self.show_thread_ids = show;
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// 从环境变量读取配置（RUST_LOG / VALIDITY_LOG_LEVEL / VALIDITY_LOG_FORMAT）
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(rust_log) = std::env::var("RUST_LOG") {
            config.filter = Some(rust_log);
        }

        if let Some(level) = std::env::var("VALIDITY_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.level = level;
        }

        if let Some(format) = std::env::var("VALIDITY_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.format = format;
        }

        config
    }

    /// 从 Environment 读取 `logging.*` 配置，无法识别的值保留默认
    pub fn from_environment(env: &Environment) -> Self {
        let mut config = Self::default();

        if let Some(level) = env.get_string("logging.level") {
            match level.parse() {
                Ok(level) => config.level = level,
                Err(e) => tracing::warn!("Ignoring logging.level: {}", e),
            }
        }

        if let Some(format) = env.get_string("logging.format") {
            match format.parse() {
                Ok(format) => config.format = format,
                Err(e) => tracing::warn!("Ignoring logging.format: {}", e),
            }
        }

        config.filter = env.get_string("logging.filter");
        config.show_target = env.get_bool_or("logging.show-target", config.show_target);
        config
    }

    fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.level.to_string());
        match &self.filter {
            Some(filter) => EnvFilter::try_new(filter).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }

    /// 初始化全局订阅者；重复初始化返回错误
    pub fn init(self) -> CoreResult<()> {
        let env_filter = self.env_filter();
        let failed = |e: Box<dyn std::error::Error + Send + Sync>| {
            CoreError::LoggingInitFailed(e.to_string())
        };

        match self.format {
            LogFormat::Compact => fmt()
                .with_env_filter(env_filter)
                .compact()
                .with_target(self.show_target)
                .with_thread_ids(self.show_thread_ids)
                .with_thread_names(self.show_thread_names)
                .try_init()
                .map_err(failed),
            LogFormat::Full => fmt()
                .with_env_filter(env_filter)
                .with_target(self.show_target)
                .with_thread_ids(self.show_thread_ids)
                .with_thread_names(self.show_thread_names)
                .try_init()
                .map_err(failed),
            LogFormat::Json => fmt()
                .with_env_filter(env_filter)
                .json()
                .with_target(self.show_target)
                .try_init()
                .map_err(failed),
            LogFormat::Pretty => fmt()
                .with_env_filter(env_filter)
                .pretty()
                .with_target(self.show_target)
                .try_init()
                .map_err(failed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigValue, MapPropertySource};

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("info".parse::<LogLevel>().unwrap(), LogLevel::Info);
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_log_format_round_trip() {
        for format in [LogFormat::Compact, LogFormat::Full, LogFormat::Json, LogFormat::Pretty] {
            assert_eq!(format.to_string().parse::<LogFormat>().unwrap(), format);
        }
    }

    #[test]
    fn test_logging_config_builder() {
        let config = LoggingConfig::new()
            .level(LogLevel::Debug)
            .format(LogFormat::Json)
            .show_target(true)
            .filter("validity_validator=trace");

        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.show_target);
        assert_eq!(config.filter.as_deref(), Some("validity_validator=trace"));
    }

    #[test]
    fn test_from_environment() {
        let env = Environment::new().with_property_source(
            MapPropertySource::new("test")
                .with_property("logging.level", ConfigValue::String("trace".to_string()))
                .with_property("logging.format", ConfigValue::String("sparkly".to_string()))
                .with_property("logging.show-target", ConfigValue::Bool(true)),
        );

        let config = LoggingConfig::from_environment(&env);
        assert_eq!(config.level, LogLevel::Trace);
        assert_eq!(config.format, LogFormat::Compact);
        assert!(config.show_target);
        assert!(config.filter.is_none());
    }

    #[test]
    fn test_second_init_fails() {
        let _ = LoggingConfig::new().level(LogLevel::Warn).init();
        let again = LoggingConfig::new().init();
        assert!(matches!(again, Err(CoreError::LoggingInitFailed(_))));
    }
}
