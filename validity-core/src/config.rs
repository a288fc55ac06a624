use crate::error::{CoreError, CoreResult};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// 环境变量前缀：`validator.cnp.minimum-age` 对应 `VALIDITY_VALIDATOR_CNP_MINIMUM_AGE`
pub const ENV_PREFIX: &str = "VALIDITY_";

/// 配置值类型
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<ConfigValue>),
}

impl ConfigValue {
    /// 转换为字符串
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 转换为整数（字符串会尝试解析）
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(i) => Some(*i),
            ConfigValue::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// 转换为布尔值
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            ConfigValue::String(s) => match s.trim().to_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// 配置源 trait
pub trait PropertySource: Send + Sync {
    /// 配置源名称
    fn name(&self) -> &str;

    /// 按点分键读取配置值，例如 `validator.arguments`
    fn get(&self, key: &str) -> Option<ConfigValue>;

    /// 优先级（数字越大优先级越高）
    fn priority(&self) -> i32 {
        0
    }
}

/// Environment - 多个配置源的合并视图
///
/// 按优先级从高到低查找，第一个命中的配置源胜出。
#[derive(Default)]
pub struct Environment {
    sources: Vec<Box<dyn PropertySource>>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// 标准加载顺序：可选的 TOML 文件，再叠加 `VALIDITY_*` 环境变量
    pub fn load(config_file: Option<&Path>) -> CoreResult<Self> {
        let mut env = Self::new();
        if let Some(path) = config_file {
            env.add_property_source(Box::new(TomlPropertySource::from_file(path)?));
        }
        env.add_property_source(Box::new(EnvironmentPropertySource::new(ENV_PREFIX)));
        tracing::debug!("Loaded configuration sources: {:?}", env);
        Ok(env)
    }

    /// 添加配置源
    pub fn add_property_source(&mut self, source: Box<dyn PropertySource>) {
        self.sources.push(source);
        // 稳定排序：同优先级保持添加顺序
        self.sources.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// 链式添加配置源
    pub fn with_property_source(mut self, source: impl PropertySource + 'static) -> Self {
        self.add_property_source(Box::new(source));
        self
    }

    /// 获取配置值
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        for source in &self.sources {
            if let Some(value) = source.get(key) {
                tracing::debug!("Config '{}' found in source '{}'", key, source.name());
                return Some(value);
            }
        }
        tracing::debug!("Config '{}' not found in any source", key);
        None
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_str().map(String::from))
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(|v| v.as_i64())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.as_bool())
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

}

// ========== Property Sources ==========

/// 环境变量配置源
pub struct EnvironmentPropertySource {
    prefix: String,
    priority: i32,
}

impl EnvironmentPropertySource {
    /// # 参数
    /// * `prefix` - 环境变量前缀，例如 "VALIDITY_"
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            priority: 100, // 环境变量优先级较高
        }
    }

    /// cnp.minimum-age -> VALIDITY_CNP_MINIMUM_AGE
    fn key_to_env(&self, key: &str) -> String {
        format!(
            "{}{}",
            self.prefix,
            key.replace(['.', '-'], "_").to_uppercase()
        )
    }
}

impl PropertySource for EnvironmentPropertySource {
    fn name(&self) -> &str {
        "environment"
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        std::env::var(self.key_to_env(key))
            .ok()
            .map(ConfigValue::String)
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// TOML 文件配置源
pub struct TomlPropertySource {
    name: String,
    properties: HashMap<String, ConfigValue>,
    priority: i32,
}

impl TomlPropertySource {
    /// 从文件加载 TOML 配置
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content, path.to_string_lossy().to_string())
    }

    /// 从字符串解析 TOML 配置
    pub fn parse(content: &str, name: impl Into<String>) -> CoreResult<Self> {
        let value: toml::Value = toml::from_str(content)?;

        let mut properties = HashMap::new();
        Self::flatten_toml(&value, String::new(), &mut properties);

        Ok(Self {
            name: name.into(),
            properties,
            priority: 0, // 文件配置优先级最低
        })
    }

    /// 展平 TOML 结构
    /// 例如: { validator: { arguments: "strict" } } -> { "validator.arguments": "strict" }
    fn flatten_toml(
        value: &toml::Value,
        prefix: String,
        result: &mut HashMap<String, ConfigValue>,
    ) {
        match value {
            toml::Value::Table(table) => {
                for (key, val) in table {
                    let new_prefix = if prefix.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", prefix, key)
                    };
                    Self::flatten_toml(val, new_prefix, result);
                }
            }
            other => {
                result.insert(prefix, Self::toml_value_to_config(other));
            }
        }
    }

    fn toml_value_to_config(value: &toml::Value) -> ConfigValue {
        match value {
            toml::Value::String(s) => ConfigValue::String(s.clone()),
            toml::Value::Integer(i) => ConfigValue::Int(*i),
            toml::Value::Float(f) => ConfigValue::Float(*f),
            toml::Value::Boolean(b) => ConfigValue::Bool(*b),
            toml::Value::Array(arr) => {
                ConfigValue::Array(arr.iter().map(Self::toml_value_to_config).collect())
            }
            // 数组内的表没有点分键可用，按 TOML 文本保存
            toml::Value::Table(table) => ConfigValue::String(table.to_string()),
            toml::Value::Datetime(dt) => ConfigValue::String(dt.to_string()),
        }
    }
}

impl PropertySource for TomlPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.properties.get(key).cloned()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

/// 内存配置源（用于测试或运行时覆盖）
pub struct MapPropertySource {
    name: String,
    properties: HashMap<String, ConfigValue>,
    priority: i32,
}

impl MapPropertySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
            priority: 50,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: ConfigValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

}

impl PropertySource for MapPropertySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.properties.get(key).cloned()
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
