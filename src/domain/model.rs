use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 目標年月，同時是快取鍵與資料來源的查詢單位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// 外部節假日來源提供的一筆原始資料
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    pub name: String,
    pub date: NaiveDate,
    #[serde(with = "weekday_label")]
    pub weekday: Weekday,
}

impl HolidayRecord {
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            weekday: date.weekday(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelWindow {
    pub holiday_name: String,
    pub holiday_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    #[serde(with = "weekday_label")]
    pub weekday: Weekday,
}

impl TravelWindow {
    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.departure_date, self.return_date)
    }
}

/// 閉區間 [start, end]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn overlaps(&self, other: &DateSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// 固定月份爬取日期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedDates {
    pub departure_date: NaiveDate,
    pub return_date: NaiveDate,
    pub target_year: i32,
    pub target_month: u32,
}

/// 節日模式的回應內容
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayDates {
    pub target_year: i32,
    pub target_month: u32,
    pub holidays: Vec<TravelWindow>,
}

/// 送進佇列的一筆節日查詢
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayQuery {
    pub period: Period,
    /// 同月份固定爬取區間，節日區間不可與之重疊
    pub blocked: Vec<DateSpan>,
}

impl HolidayQuery {
    pub fn new(period: Period) -> Self {
        Self {
            period,
            blocked: Vec::new(),
        }
    }

    pub fn with_blocked(mut self, blocked: Vec<DateSpan>) -> Self {
        self.blocked = blocked;
        self
    }
}

/// 中文星期標示（一、二 … 日）
pub fn weekday_zh(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "一",
        Weekday::Tue => "二",
        Weekday::Wed => "三",
        Weekday::Thu => "四",
        Weekday::Fri => "五",
        Weekday::Sat => "六",
        Weekday::Sun => "日",
    }
}

pub fn parse_weekday_zh(label: &str) -> Option<Weekday> {
    match label.trim() {
        "一" => Some(Weekday::Mon),
        "二" => Some(Weekday::Tue),
        "三" => Some(Weekday::Wed),
        "四" => Some(Weekday::Thu),
        "五" => Some(Weekday::Fri),
        "六" => Some(Weekday::Sat),
        "日" | "天" => Some(Weekday::Sun),
        _ => None,
    }
}

/// 星期欄位以中文標示輸出（"四"）
pub mod weekday_label {
    use super::{parse_weekday_zh, weekday_zh};
    use chrono::Weekday;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(weekday: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(weekday_zh(*weekday))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let label = String::deserialize(deserializer)?;
        parse_weekday_zh(&label)
            .ok_or_else(|| de::Error::custom(format!("invalid weekday label: {}", label)))
    }
}
