use chrono::{Local, NaiveDate};

/// 当前日期的来源
///
/// CNP 的世纪判定依赖"今天"，注入时钟让校验在测试中可复现。
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// 读取本地系统时间，每次调用都重新读取
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// 固定日期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl FixedClock {
    /// 日期不存在时返回 None
    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
