use std::collections::HashMap;
use thiserror::Error;

/// 规则配置错误
///
/// 与"值不合法"（`Ok(false)`）区分开：这些错误说明规则本身写错了。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Unknown rule: '{0}'")]
    UnknownRule(String),

    #[error("Rule '{rule}' expects {expected} argument(s), got {actual}")]
    ArityMismatch {
        rule: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Rule '{rule}' got malformed argument '{argument}': {reason}")]
    MalformedArgument {
        rule: &'static str,
        argument: String,
        reason: String,
    },
}

pub type RuleResult<T> = Result<T, RuleError>;

/// 验证错误
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 字段 -> 按声明顺序排列的失败规则名
    #[error("Field validation errors: {0:?}")]
    FieldErrors(HashMap<String, Vec<String>>),
}

impl ValidationError {
    pub fn field_errors(field: impl Into<String>, rules: Vec<String>) -> Self {
        let mut errors = HashMap::new();
        errors.insert(field.into(), rules);
        Self::FieldErrors(errors)
    }

    /// 某个字段的失败规则
    pub fn rules_for(&self, field: &str) -> &[String] {
        match self {
            Self::FieldErrors(errors) => errors.get(field).map(Vec::as_slice).unwrap_or(&[]),
        }
    }

    pub fn merge(&mut self, other: ValidationError) {
        let (Self::FieldErrors(errors1), Self::FieldErrors(errors2)) = (self, other);
        for (field, rules) in errors2 {
            errors1.entry(field).or_default().extend(rules);
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_order() {
        let mut first = ValidationError::field_errors("email", vec!["email".to_string()]);
        first.merge(ValidationError::field_errors("email", vec!["max".to_string()]));
        first.merge(ValidationError::field_errors("name", vec!["alpha".to_string()]));

        assert_eq!(first.rules_for("email"), ["email", "max"]);
        assert_eq!(first.rules_for("name"), ["alpha"]);
        assert!(first.rules_for("phone").is_empty());
    }

    #[test]
    fn test_rule_error_display() {
        let err = RuleError::ArityMismatch {
            rule: "between",
            expected: 2,
            actual: 1,
        };
        assert_eq!(err.to_string(), "Rule 'between' expects 2 argument(s), got 1");
        assert_eq!(
            RuleError::UnknownRule("shiny".to_string()).to_string(),
            "Unknown rule: 'shiny'"
        );
    }
}
