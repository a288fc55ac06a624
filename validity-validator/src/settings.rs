use crate::cnp::DEFAULT_MINIMUM_AGE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use validity_core::{CoreResult, Environment};

pub const ARGUMENTS_KEY: &str = "validator.arguments";
pub const STRICT_CALENDAR_KEY: &str = "validator.cnp.strict-calendar";
pub const MINIMUM_AGE_KEY: &str = "validator.cnp.minimum-age";

/// 数值参数解析失败时的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentPolicy {
    /// 返回 `RuleError::MalformedArgument`
    #[default]
    Strict,
    /// 按 0 处理并记录警告（旧行为）
    Lenient,
}

impl FromStr for ArgumentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(ArgumentPolicy::Strict),
            "lenient" => Ok(ArgumentPolicy::Lenient),
            _ => Err(format!("Invalid argument policy: {}", s)),
        }
    }
}

/// 分发器配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherSettings {
    pub argument_policy: ArgumentPolicy,
    pub strict_calendar: bool,
    pub minimum_age: i32,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            argument_policy: ArgumentPolicy::Strict,
            strict_calendar: false,
            minimum_age: DEFAULT_MINIMUM_AGE,
        }
    }
}

impl DispatcherSettings {
    /// 读取可选的 TOML 文件和 `VALIDITY_VALIDATOR_*` 环境变量
    pub fn load(config_file: Option<&Path>) -> CoreResult<Self> {
        Ok(Self::from_environment(&Environment::load(config_file)?))
    }

    /// 从 Environment 读取 `validator.*`，缺失或无效的值使用默认
    pub fn from_environment(env: &Environment) -> Self {
        let defaults = Self::default();

        let argument_policy = match env.get_string(ARGUMENTS_KEY) {
            Some(raw) => raw.parse::<ArgumentPolicy>().unwrap_or_else(|e| {
                tracing::warn!("Ignoring {}: {}", ARGUMENTS_KEY, e);
                defaults.argument_policy
            }),
            None => defaults.argument_policy,
        };

        let minimum_age = env
            .get_i64(MINIMUM_AGE_KEY)
            .and_then(|age| i32::try_from(age).ok())
            .unwrap_or(defaults.minimum_age);

        Self {
            argument_policy,
            strict_calendar: env.get_bool_or(STRICT_CALENDAR_KEY, defaults.strict_calendar),
            minimum_age,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validity_core::{ConfigValue, MapPropertySource, TomlPropertySource};

    #[test]
    fn test_defaults() {
        let settings = DispatcherSettings::from_environment(&Environment::new());
        assert_eq!(settings, DispatcherSettings::default());
        assert_eq!(settings.argument_policy, ArgumentPolicy::Strict);
        assert!(!settings.strict_calendar);
        assert_eq!(settings.minimum_age, 14);
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
            [validator]
            arguments = "lenient"

            [validator.cnp]
            strict-calendar = true
            minimum-age = 18
        "#;
        let env = Environment::new()
            .with_property_source(TomlPropertySource::parse(toml, "validity.toml").unwrap());

        let settings = DispatcherSettings::from_environment(&env);
        assert_eq!(settings.argument_policy, ArgumentPolicy::Lenient);
        assert!(settings.strict_calendar);
        assert_eq!(settings.minimum_age, 18);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let env = Environment::new().with_property_source(
            MapPropertySource::new("overrides")
                .with_property(ARGUMENTS_KEY, ConfigValue::String("chaotic".to_string()))
                .with_property(MINIMUM_AGE_KEY, ConfigValue::String("old".to_string())),
        );

        let settings = DispatcherSettings::from_environment(&env);
        assert_eq!(settings.argument_policy, ArgumentPolicy::Strict);
        assert_eq!(settings.minimum_age, 14);
    }

    #[test]
    fn test_load_reads_file_and_env() {
        let file_name = format!("validity-settings-{}.toml", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        std::fs::write(&path, "[validator.cnp]\nminimum-age = 21\n").unwrap();
        std::env::set_var("VALIDITY_VALIDATOR_CNP_STRICT_CALENDAR", "yes");

        let settings = DispatcherSettings::load(Some(&path)).unwrap();
        assert_eq!(settings.minimum_age, 21);
        assert!(settings.strict_calendar);
        assert_eq!(settings.argument_policy, ArgumentPolicy::Strict);

        std::env::remove_var("VALIDITY_VALIDATOR_CNP_STRICT_CALENDAR");
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let missing = Path::new("/definitely/not/here/validity.toml");
        assert!(DispatcherSettings::load(Some(missing)).is_err());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("LENIENT".parse::<ArgumentPolicy>().unwrap(), ArgumentPolicy::Lenient);
        assert!("loose".parse::<ArgumentPolicy>().is_err());
    }
}
