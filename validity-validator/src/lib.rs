//! Validity Validator - 基于规则的字符串校验
//!
//! 用 `name`、`name:arg`、`name:arg1,arg2` 形式的规则声明校验字符串字段，
//! 返回失败的规则名。包含带校验位和出生日期解码的 CNP 校验器。
//!
//! ```
//! use validity_validator::{RuleDispatcher, ValidationSubject};
//!
//! let dispatcher = RuleDispatcher::new();
//! let subject = ValidationSubject::from_tokens(
//!     "username",
//!     "ab",
//!     ["required", "alpha_dash", "between_inclusive:3,16"],
//! );
//!
//! assert_eq!(dispatcher.collect_errors(&subject), vec!["between_inclusive"]);
//! assert!(dispatcher.check("cnp", &[] as &[&str], "1960101415229").unwrap());
//! ```

pub mod clock;
pub mod cnp;
pub mod dispatcher;
pub mod error;
pub mod rule;
pub mod settings;
pub mod string_rules;
pub mod subject;

pub use clock::{Clock, FixedClock, SystemClock};
pub use cnp::{CnpDefect, CnpReport, CnpValidator, DecodedIdentity};
pub use dispatcher::RuleDispatcher;
pub use error::*;
pub use rule::{RuleKind, RuleSpec};
pub use settings::{ArgumentPolicy, DispatcherSettings};
pub use subject::{Checker, StringChecker, ValidationSubject};
