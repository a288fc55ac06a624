//! CNP（个人识别码）校验
//!
//! 13 位数字：性别/世纪位、两位年份、月、日、县代码、三位序号、校验位。
//! 按顺序检查，遇到第一个不满足的字段即失败。

use crate::clock::{Clock, SystemClock};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use thiserror::Error;

pub const CNP_LENGTH: usize = 13;

/// 默认的最小年龄，用于 7/8/9 性别位的世纪判定
pub const DEFAULT_MINIMUM_AGE: i32 = 14;

const CONTROL_WEIGHTS: [u32; 12] = [2, 7, 9, 1, 4, 6, 3, 5, 8, 2, 7, 9];

/// 解码后的 CNP 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecodedIdentity {
    pub sex: u8,
    /// 已解析世纪后的完整年份
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub county: u32,
    pub sequence: u32,
    pub control: u8,
}

impl DecodedIdentity {
    /// 出生日期；日历上不存在时为 None
    pub fn birth_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// CNP 不合格的原因
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CnpDefect {
    #[error("Expected {expected} characters, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("The character at position {position} [{found}] is not a digit")]
    NotDigit { position: usize, found: char },

    #[error("Sex can not be 0")]
    ZeroSex,

    #[error("Wrong year: {0}")]
    YearOutOfRange(i32),

    #[error("Wrong month: {0}")]
    MonthOutOfRange(u32),

    #[error("The date does not exist: {year}/{month}/{day}")]
    DateDoesNotExist { year: i32, month: u32, day: u32 },

    #[error("Wrong county: {0}")]
    CountyOutOfRange(u32),

    #[error("Wrong number: {0}")]
    SequenceOutOfRange(u32),

    #[error("Wrong control digit: expected {expected}, found {found}")]
    ChecksumMismatch { expected: u8, found: u8 },
}

/// 一次检查的完整结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CnpReport {
    pub outcome: Result<DecodedIdentity, CnpDefect>,
    /// 不影响结果的问题（宽松日历模式下的不存在日期）
    pub warnings: Vec<CnpDefect>,
}

impl CnpReport {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn defect(&self) -> Option<&CnpDefect> {
        self.outcome.as_ref().err()
    }
}

/// 前 12 位的加权和模 11，余 10 记为 1
pub fn control_digit(digits: &[u8; 12]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(CONTROL_WEIGHTS)
        .map(|(&digit, weight)| u32::from(digit) * weight)
        .sum();

    match sum % 11 {
        10 => 1,
        rest => rest as u8,
    }
}

/// CNP 校验器
#[derive(Debug, Clone)]
pub struct CnpValidator<C = SystemClock> {
    clock: C,
    minimum_age: i32,
    strict_calendar: bool,
}

impl Default for CnpValidator<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> CnpValidator<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            minimum_age: DEFAULT_MINIMUM_AGE,
            strict_calendar: false,
        }
    }

    pub fn with_minimum_age(mut self, minimum_age: i32) -> Self {
        self.minimum_age = minimum_age;
        self
    }

    /// 开启后，日历上不存在的出生日期直接判为不合格
    pub fn with_strict_calendar(mut self, strict: bool) -> Self {
        self.strict_calendar = strict;
        self
    }

    /// 检查并记录诊断信息
    pub fn is_valid(&self, raw: &str) -> bool {
        let report = self.inspect(raw);

        for warning in &report.warnings {
            tracing::debug!("CNP warning: {}", warning);
        }
        if let Err(defect) = &report.outcome {
            tracing::debug!("CNP rejected: {}", defect);
        }

        report.is_valid()
    }

    /// 检查但不产生任何副作用
    pub fn inspect(&self, raw: &str) -> CnpReport {
        let mut warnings = Vec::new();
        let outcome = self.decode(raw, &mut warnings);
        CnpReport { outcome, warnings }
    }

    fn decode(
        &self,
        raw: &str,
        warnings: &mut Vec<CnpDefect>,
    ) -> Result<DecodedIdentity, CnpDefect> {
        let digits = scan_digits(raw)?;

        let sex = digits[0];
        if sex == 0 {
            return Err(CnpDefect::ZeroSex);
        }

        let year = self.resolve_year(sex, two_digits(&digits, 1) as i32);
        if !(1800..=2099).contains(&year) {
            return Err(CnpDefect::YearOutOfRange(year));
        }

        let month = two_digits(&digits, 3);
        if !(1..=12).contains(&month) {
            return Err(CnpDefect::MonthOutOfRange(month));
        }

        let day = two_digits(&digits, 5);
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            let defect = CnpDefect::DateDoesNotExist { year, month, day };
            if self.strict_calendar {
                return Err(defect);
            }
            warnings.push(defect);
        }

        let county = two_digits(&digits, 7);
        if !(1..=52).contains(&county) {
            return Err(CnpDefect::CountyOutOfRange(county));
        }

        let sequence = u32::from(digits[9]) * 100 + two_digits(&digits, 10);
        if !(1..=999).contains(&sequence) {
            return Err(CnpDefect::SequenceOutOfRange(sequence));
        }

        let mut leading = [0u8; 12];
        leading.copy_from_slice(&digits[..12]);
        let expected = control_digit(&leading);
        let control = digits[12];
        if control != expected {
            return Err(CnpDefect::ChecksumMismatch {
                expected,
                found: control,
            });
        }

        Ok(DecodedIdentity {
            sex,
            year,
            month,
            day,
            county,
            sequence,
            control,
        })
    }

    /// 1/2 -> 19xx，3/4 -> 18xx，5/6 -> 20xx；
    /// 7/8/9 先按 20xx，若晚于"今年 - 最小年龄"则退回 19xx
    fn resolve_year(&self, sex: u8, fragment: i32) -> i32 {
        match sex {
            1 | 2 => 1900 + fragment,
            3 | 4 => 1800 + fragment,
            5 | 6 => 2000 + fragment,
            _ => {
                let year = 2000 + fragment;
                let cutoff = self.clock.today().year() - self.minimum_age;
                if year > cutoff {
                    year - 100
                } else {
                    year
                }
            }
        }
    }
}

fn scan_digits(raw: &str) -> Result<[u8; CNP_LENGTH], CnpDefect> {
    let actual = raw.chars().count();
    if actual != CNP_LENGTH {
        return Err(CnpDefect::WrongLength {
            expected: CNP_LENGTH,
            actual,
        });
    }

    let mut digits = [0u8; CNP_LENGTH];
    for (position, found) in raw.chars().enumerate() {
        let digit = found
            .to_digit(10)
            .ok_or(CnpDefect::NotDigit { position, found })?;
        digits[position] = digit as u8;
    }
    Ok(digits)
}

fn two_digits(digits: &[u8; CNP_LENGTH], at: usize) -> u32 {
    u32::from(digits[at]) * 10 + u32::from(digits[at + 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn validator() -> CnpValidator<FixedClock> {
        CnpValidator::new(FixedClock::ymd(2026, 10, 15).unwrap())
    }

    fn defect(raw: &str) -> Option<CnpDefect> {
        validator().inspect(raw).defect().cloned()
    }

    #[test]
    fn test_reference_value() {
        let report = validator().inspect("1960101415229");
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());

        let identity = report.outcome.unwrap();
        assert_eq!(identity.sex, 1);
        assert_eq!(identity.year, 1996);
        assert_eq!(identity.month, 1);
        assert_eq!(identity.day, 1);
        assert_eq!(identity.county, 41);
        assert_eq!(identity.sequence, 522);
        assert_eq!(identity.control, 9);
        assert_eq!(identity.birth_date(), NaiveDate::from_ymd_opt(1996, 1, 1));
    }

    #[test]
    fn test_flipped_control_digit() {
        assert!(validator().is_valid("1960101415229"));
        assert!(!validator().is_valid("1960101415225"));
        assert_eq!(
            defect("1960101415225"),
            Some(CnpDefect::ChecksumMismatch {
                expected: 9,
                found: 5
            })
        );
    }

    #[test]
    fn test_remainder_ten_maps_to_one() {
        assert_eq!(control_digit(&[6, 0, 1, 0, 1, 0, 1, 4, 1, 5, 2, 2]), 1);
        assert!(validator().is_valid("6010101415221"));
    }

    #[test]
    fn test_centuries() {
        let year = |raw: &str| validator().inspect(raw).outcome.unwrap().year;
        assert_eq!(year("2990101415225"), 1999);
        assert_eq!(year("3190101415226"), 1819);
        assert_eq!(year("5990101415220"), 2099);
    }

    #[test]
    fn test_rolling_cutoff_rolls_back_a_century() {
        // 2026 - 14 = 2012：2019 晚于界限，退回 1919
        let identity = validator().inspect("8190101415225").outcome.unwrap();
        assert_eq!(identity.year, 1919);

        // 等于界限时不退回
        let identity = validator().inspect("8123101415220").outcome.unwrap();
        assert_eq!(identity.year, 2012);

        // 换一个"今天"，同一个值不再退回
        let later = CnpValidator::new(FixedClock::ymd(2040, 1, 1).unwrap());
        assert_eq!(later.inspect("8190101415225").outcome.unwrap().year, 2019);
    }

    #[test]
    fn test_minimum_age_is_configurable() {
        let validator = validator().with_minimum_age(0);
        assert_eq!(validator.inspect("8190101415225").outcome.unwrap().year, 2019);
    }

    #[test]
    fn test_non_digit_fails_closed() {
        assert_eq!(
            defect("19601014152x9"),
            Some(CnpDefect::NotDigit {
                position: 11,
                found: 'x'
            })
        );
        assert_eq!(
            defect("196010141522a"),
            Some(CnpDefect::NotDigit {
                position: 12,
                found: 'a'
            })
        );
        assert!(matches!(defect("１960101415229"), Some(CnpDefect::NotDigit { position: 0, .. })));
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(
            defect("196010141522"),
            Some(CnpDefect::WrongLength {
                expected: 13,
                actual: 12
            })
        );
        assert!(matches!(defect("19601014152290"), Some(CnpDefect::WrongLength { .. })));
        assert!(matches!(defect(""), Some(CnpDefect::WrongLength { .. })));
    }

    #[test]
    fn test_zero_sex() {
        assert_eq!(defect("0960101415229"), Some(CnpDefect::ZeroSex));
    }

    #[test]
    fn test_month_range() {
        assert_eq!(defect("1961301415227"), Some(CnpDefect::MonthOutOfRange(13)));
        assert_eq!(defect("1960001415225"), Some(CnpDefect::MonthOutOfRange(0)));
    }

    #[test]
    fn test_county_edges() {
        assert_eq!(defect("1960101005223"), Some(CnpDefect::CountyOutOfRange(0)));
        assert_eq!(defect("1960101535228"), Some(CnpDefect::CountyOutOfRange(53)));
        assert!(validator().is_valid("1960101015220"));
        assert!(validator().is_valid("1960101525220"));
    }

    #[test]
    fn test_sequence_edges() {
        assert_eq!(defect("1960101410000"), Some(CnpDefect::SequenceOutOfRange(0)));
        assert!(validator().is_valid("1960101419998"));
    }

    #[test]
    fn test_nonexistent_date_is_lenient_by_default() {
        // 1999-02-30
        let report = validator().inspect("2990230415222");
        assert!(report.is_valid());
        assert_eq!(
            report.warnings,
            vec![CnpDefect::DateDoesNotExist {
                year: 1999,
                month: 2,
                day: 30
            }]
        );
        assert_eq!(report.outcome.unwrap().birth_date(), None);
    }

    #[test]
    fn test_nonexistent_date_fails_in_strict_mode() {
        let strict = validator().with_strict_calendar(true);
        let report = strict.inspect("2990230415222");
        assert!(!report.is_valid());
        assert!(report.warnings.is_empty());
        assert_eq!(
            report.defect(),
            Some(&CnpDefect::DateDoesNotExist {
                year: 1999,
                month: 2,
                day: 30
            })
        );
        assert!(strict.is_valid("1960101415229"));
    }

    #[test]
    fn test_first_violation_wins() {
        // 月份和校验位都错，报告月份
        assert_eq!(defect("1961301415220"), Some(CnpDefect::MonthOutOfRange(13)));
    }
}
