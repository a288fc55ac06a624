use crate::clock::{Clock, SystemClock};
use crate::dispatcher::RuleDispatcher;
use crate::error::{ValidationError, ValidationResult};
use crate::rule::RuleSpec;
use serde::{Deserialize, Serialize};

/// 待校验的字段：键、值和按顺序声明的规则
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSubject {
    pub key: String,
    pub item: String,
    pub rules: Vec<RuleSpec>,
}

impl ValidationSubject {
    pub fn new(key: impl Into<String>, item: impl Into<String>, rules: Vec<RuleSpec>) -> Self {
        Self {
            key: key.into(),
            item: item.into(),
            rules,
        }
    }

    /// 从规则声明字符串构建，例如 `["required", "between:3,10"]`
    pub fn from_tokens<'a>(
        key: impl Into<String>,
        item: impl Into<String>,
        tokens: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::new(key, item, tokens.into_iter().map(RuleSpec::parse).collect())
    }
}

/// 校验器 trait
pub trait Checker {
    fn key(&self) -> &str;

    fn rules(&self) -> &[RuleSpec];

    /// 失败的规则名（不含第一条规则）
    fn errors(&self) -> Vec<String>;

    fn validate(&self) -> ValidationResult<()> {
        let errors = self.errors();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::field_errors(self.key(), errors))
        }
    }
}

/// 字符串字段的校验器，把字段绑定到一个分发器上
#[derive(Debug)]
pub struct StringChecker<'d, C = SystemClock> {
    subject: ValidationSubject,
    dispatcher: &'d RuleDispatcher<C>,
}

impl<'d, C: Clock> StringChecker<'d, C> {
    pub fn new(subject: ValidationSubject, dispatcher: &'d RuleDispatcher<C>) -> Self {
        Self {
            subject,
            dispatcher,
        }
    }

    pub fn item(&self) -> &str {
        &self.subject.item
    }

    pub fn subject(&self) -> &ValidationSubject {
        &self.subject
    }
}

impl<C: Clock> Checker for StringChecker<'_, C> {
    fn key(&self) -> &str {
        &self.subject.key
    }

    fn rules(&self) -> &[RuleSpec] {
        &self.subject.rules
    }

    fn errors(&self) -> Vec<String> {
        self.dispatcher.collect_errors(&self.subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::settings::DispatcherSettings;

    fn dispatcher() -> RuleDispatcher<FixedClock> {
        RuleDispatcher::with_clock(
            FixedClock::ymd(2026, 10, 15).unwrap(),
            DispatcherSettings::default(),
        )
    }

    #[test]
    fn test_valid_subject() {
        let d = dispatcher();
        let checker = StringChecker::new(
            ValidationSubject::from_tokens("cnp", "1960101415229", ["required", "cnp", "len:12"]),
            &d,
        );

        assert_eq!(checker.key(), "cnp");
        assert_eq!(checker.item(), "1960101415229");
        assert_eq!(checker.rules().len(), 3);
        assert!(checker.errors().is_empty());
        assert!(checker.validate().is_ok());
    }

    #[test]
    fn test_invalid_subject_reports_field_errors() {
        let d = dispatcher();
        let checker = StringChecker::new(
            ValidationSubject::from_tokens(
                "contact",
                "not-an-email",
                ["required", "email", "alpha_dash", "max:5"],
            ),
            &d,
        );

        let err = checker.validate().unwrap_err();
        assert_eq!(err.rules_for("contact"), ["email", "max"]);
    }

    #[test]
    fn test_subject_serialization() {
        let subject = ValidationSubject::from_tokens("age", "42", ["required", "between:0,130"]);
        let json = serde_json::to_value(&subject).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "key": "age",
                "item": "42",
                "rules": [
                    { "name": "required" },
                    { "name": "between", "args": ["0", "130"] }
                ]
            })
        );

        let back: ValidationSubject = serde_json::from_value(json).unwrap();
        assert_eq!(back, subject);
    }
}
