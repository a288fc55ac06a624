// validity-core: 校验框架的基础设施
//
// - 分层配置源（TOML 文件、环境变量、内存覆盖）
// - tracing 日志初始化
// - 基础设施错误类型

pub mod config;
pub mod error;
pub mod logging;

pub use config::{
    ConfigValue, Environment, EnvironmentPropertySource, MapPropertySource, PropertySource,
    TomlPropertySource, ENV_PREFIX,
};
pub use error::{CoreError, CoreResult};
pub use logging::{LogFormat, LogLevel, LoggingConfig};
