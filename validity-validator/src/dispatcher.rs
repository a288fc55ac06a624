use crate::clock::{Clock, SystemClock};
use crate::cnp::CnpValidator;
use crate::error::{RuleError, RuleResult};
use crate::rule::{RuleKind, RuleSpec};
use crate::settings::{ArgumentPolicy, DispatcherSettings};
use crate::string_rules;
use crate::subject::ValidationSubject;
use regex::Regex;
use validity_core::Environment;

/// 规则分发器
///
/// 把 (规则名, 参数) 解析成目录中的 `RuleKind`，检查参数个数，
/// 然后调用对应的谓词。不持有跨调用的可变状态，可以在多个线程间共享。
#[derive(Debug, Clone)]
pub struct RuleDispatcher<C = SystemClock> {
    argument_policy: ArgumentPolicy,
    cnp: CnpValidator<C>,
}

impl Default for RuleDispatcher<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleDispatcher<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock, DispatcherSettings::default())
    }

    /// 按 `validator.*` 配置创建
    pub fn from_environment(env: &Environment) -> Self {
        Self::with_clock(SystemClock, DispatcherSettings::from_environment(env))
    }
}

impl<C: Clock> RuleDispatcher<C> {
    pub fn with_clock(clock: C, settings: DispatcherSettings) -> Self {
        tracing::debug!("Creating rule dispatcher with {:?}", settings);
        Self {
            argument_policy: settings.argument_policy,
            cnp: CnpValidator::new(clock)
                .with_minimum_age(settings.minimum_age)
                .with_strict_calendar(settings.strict_calendar),
        }
    }

    pub fn with_argument_policy(mut self, policy: ArgumentPolicy) -> Self {
        self.argument_policy = policy;
        self
    }

    pub fn argument_policy(&self) -> ArgumentPolicy {
        self.argument_policy
    }

    /// CNP 校验器，用于获取结构化的检查结果
    pub fn cnp(&self) -> &CnpValidator<C> {
        &self.cnp
    }

    /// 按名字检查一条规则
    pub fn check<S: AsRef<str>>(&self, name: &str, args: &[S], item: &str) -> RuleResult<bool> {
        let kind: RuleKind = name.parse()?;
        self.evaluate(kind, args, item)
    }

    pub fn check_spec(&self, spec: &RuleSpec, item: &str) -> RuleResult<bool> {
        self.check(&spec.name, &spec.args, item)
    }

    /// 对已解析的规则类型求值
    pub fn evaluate<S: AsRef<str>>(
        &self,
        kind: RuleKind,
        args: &[S],
        item: &str,
    ) -> RuleResult<bool> {
        if args.len() != kind.arity() {
            return Err(RuleError::ArityMismatch {
                rule: kind.name(),
                expected: kind.arity(),
                actual: args.len(),
            });
        }
        let arg = |index: usize| args[index].as_ref();

        let passed = match kind {
            RuleKind::Accepted => string_rules::accepted(item),
            RuleKind::Alpha => string_rules::alpha(item),
            RuleKind::AlphaDash => string_rules::alpha_dash(item),
            RuleKind::AlphaNum => string_rules::alpha_num(item),
            RuleKind::Between => {
                let (min, max) = (self.bound(kind, arg(0))?, self.bound(kind, arg(1))?);
                string_rules::between(item, min, max)
            }
            RuleKind::BetweenInclusive => {
                let (min, max) = (self.bound(kind, arg(0))?, self.bound(kind, arg(1))?);
                string_rules::between_inclusive(item, min, max)
            }
            RuleKind::Cnp => self.cnp.is_valid(item),
            RuleKind::Date => string_rules::date(item),
            RuleKind::Email => string_rules::email(item),
            RuleKind::FullName => string_rules::full_name(item),
            RuleKind::Ip => string_rules::ip(item),
            RuleKind::Ipv4 => string_rules::ipv4(item),
            RuleKind::Ipv6 => string_rules::ipv6(item),
            RuleKind::Len => string_rules::len(item, self.bound(kind, arg(0))?),
            RuleKind::Max => string_rules::max(item, self.bound(kind, arg(0))?),
            RuleKind::Min => string_rules::min(item, self.bound(kind, arg(0))?),
            RuleKind::Regexp => string_rules::regexp(item, &compile(kind, arg(0))?),
            RuleKind::Url => string_rules::url(item),
        };

        tracing::trace!(rule = kind.name(), passed, "Rule evaluated");
        Ok(passed)
    }

    /// 收集失败的规则名（跳过第一条规则，它是调用方单独处理的 required 检查）
    ///
    /// 返回 false 的规则和配置有误的规则都算失败，保持声明顺序。
    pub fn collect_errors(&self, subject: &ValidationSubject) -> Vec<String> {
        subject
            .rules
            .iter()
            .skip(1)
            .filter_map(|spec| match self.check_spec(spec, &subject.item) {
                Ok(true) => None,
                Ok(false) => Some(spec.name.clone()),
                Err(e) => {
                    tracing::warn!("Field '{}': {}", subject.key, e);
                    Some(spec.name.clone())
                }
            })
            .collect()
    }

    fn bound(&self, kind: RuleKind, raw: &str) -> RuleResult<i64> {
        match raw.parse::<i64>() {
            Ok(value) => Ok(value),
            Err(e) => match self.argument_policy {
                ArgumentPolicy::Strict => Err(RuleError::MalformedArgument {
                    rule: kind.name(),
                    argument: raw.to_string(),
                    reason: e.to_string(),
                }),
                ArgumentPolicy::Lenient => {
                    tracing::warn!(
                        "Rule '{}' argument '{}' is not an integer, using 0",
                        kind,
                        raw
                    );
                    Ok(0)
                }
            },
        }
    }
}

fn compile(kind: RuleKind, pattern: &str) -> RuleResult<Regex> {
    Regex::new(pattern).map_err(|e| RuleError::MalformedArgument {
        rule: kind.name(),
        argument: pattern.to_string(),
        reason: e.to_string(),
    })
}
