//! 规则目录与规则声明
//!
//! `RuleKind` 是封闭的规则目录，`RuleSpec` 是调用方声明的一条规则（名字 + 原始参数）。

use crate::error::RuleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 字符串规则目录
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Accepted,
    Alpha,
    AlphaDash,
    AlphaNum,
    Between,
    BetweenInclusive,
    Cnp,
    Date,
    Email,
    FullName,
    Ip,
    Ipv4,
    Ipv6,
    /// 长度"不等于"给定值
    Len,
    Max,
    Min,
    Regexp,
    Url,
}

impl RuleKind {
    pub const ALL: [RuleKind; 18] = [
        RuleKind::Accepted,
        RuleKind::Alpha,
        RuleKind::AlphaDash,
        RuleKind::AlphaNum,
        RuleKind::Between,
        RuleKind::BetweenInclusive,
        RuleKind::Cnp,
        RuleKind::Date,
        RuleKind::Email,
        RuleKind::FullName,
        RuleKind::Ip,
        RuleKind::Ipv4,
        RuleKind::Ipv6,
        RuleKind::Len,
        RuleKind::Max,
        RuleKind::Min,
        RuleKind::Regexp,
        RuleKind::Url,
    ];

    /// 规则在声明中使用的名字
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Accepted => "accepted",
            RuleKind::Alpha => "alpha",
            RuleKind::AlphaDash => "alpha_dash",
            RuleKind::AlphaNum => "alpha_num",
            RuleKind::Between => "between",
            RuleKind::BetweenInclusive => "between_inclusive",
            RuleKind::Cnp => "cnp",
            RuleKind::Date => "date",
            RuleKind::Email => "email",
            RuleKind::FullName => "full_name",
            RuleKind::Ip => "ip",
            RuleKind::Ipv4 => "ipv4",
            RuleKind::Ipv6 => "ipv6",
            RuleKind::Len => "len",
            RuleKind::Max => "max",
            RuleKind::Min => "min",
            RuleKind::Regexp => "regexp",
            RuleKind::Url => "url",
        }
    }

    /// 规则需要的参数个数
    pub fn arity(&self) -> usize {
        match self {
            RuleKind::Between | RuleKind::BetweenInclusive => 2,
            RuleKind::Len | RuleKind::Max | RuleKind::Min | RuleKind::Regexp => 1,
            _ => 0,
        }
    }
}

impl FromStr for RuleKind {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| RuleError::UnknownRule(s.to_string()))
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 一条规则声明：`name`、`name:arg` 或 `name:arg1,arg2`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl RuleSpec {
    pub fn new<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// 解析规则声明
    ///
    /// 单参数规则（如 `regexp`）把冒号后的全部内容当作一个参数，
    /// 这样 `regexp:^a{1,3}$` 中的逗号不会被拆开。
    pub fn parse(token: &str) -> Self {
        let Some((name, rest)) = token.split_once(':') else {
            return Self::new(token, Vec::<String>::new());
        };

        let single = matches!(name.parse::<RuleKind>(), Ok(kind) if kind.arity() == 1);
        if single {
            Self::new(name, [rest])
        } else {
            Self::new(name, rest.split(','))
        }
    }

    /// 目录中的规则类型
    pub fn kind(&self) -> Result<RuleKind, RuleError> {
        self.name.parse()
    }
}

impl From<&str> for RuleSpec {
    fn from(token: &str) -> Self {
        Self::parse(token)
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            write!(f, ":{}", self.args.join(","))?;
        }
        Ok(())
    }
}
