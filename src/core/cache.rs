use crate::domain::model::{HolidayRecord, Period};
use chrono::Datelike;
use std::collections::HashMap;

/// 以年月為鍵的節假日快取
///
/// 本身不做任何同步；只有佇列的 worker 會讀寫它。
/// 存在的鍵代表該月份已向資料來源查詢過，空序列表示「確認沒有節日」。
#[derive(Debug, Default)]
pub struct HolidayCache {
    entries: HashMap<Period, Vec<HolidayRecord>>,
}

impl HolidayCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, period: &Period) -> Option<&[HolidayRecord]> {
        self.entries.get(period).map(Vec::as_slice)
    }

    pub fn put(&mut self, period: Period, records: Vec<HolidayRecord>) {
        self.entries.insert(period, records);
    }

    pub fn contains(&self, period: &Period) -> bool {
        self.entries.contains_key(period)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 將整年度資料依月份拆分，一次寫入全部 12 個月份
    ///
    /// 不屬於 `year` 的資料會被忽略。
    pub fn put_year(&mut self, year: i32, records: Vec<HolidayRecord>) {
        let mut by_month: HashMap<u32, Vec<HolidayRecord>> = HashMap::new();
        for record in records {
            if record.date.year() == year {
                by_month.entry(record.date.month()).or_default().push(record);
            }
        }

        for month in 1..=12 {
            let mut month_records = by_month.remove(&month).unwrap_or_default();
            month_records.sort_by_key(|r| r.date);
            self.put(Period { year, month }, month_records);
        }
    }
}
