use crate::core::policy::WindowPolicy;
use crate::domain::model::{DateSpan, HolidayRecord, Period, TravelWindow};
use chrono::{Datelike, Days};

/// 將某月份的節假日轉換成出發 / 回程日期組合
#[derive(Debug, Clone, Default)]
pub struct TravelWindowSelector {
    policy: WindowPolicy,
}

impl TravelWindowSelector {
    pub fn new(policy: WindowPolicy) -> Self {
        Self { policy }
    }

    /// 依序：剔除春節與補假、查表計算區間、剔除與固定區間重疊者、依節日日期排序
    pub fn select(
        &self,
        period: Period,
        records: &[HolidayRecord],
        blocked: &[DateSpan],
    ) -> Vec<TravelWindow> {
        let mut windows: Vec<TravelWindow> = records
            .iter()
            .filter(|record| period.contains(record.date))
            .filter(|record| {
                if self.policy.is_skipped(&record.name) {
                    tracing::debug!(holiday = %record.name, date = %record.date, "skipping holiday");
                    return false;
                }
                true
            })
            .filter_map(|record| self.window_for(record))
            .filter(|window| {
                let span = window.span();
                let overlapping = blocked.iter().any(|fixed| fixed.overlaps(&span));
                if overlapping {
                    tracing::debug!(
                        holiday = %window.holiday_name,
                        departure = %window.departure_date,
                        return_date = %window.return_date,
                        "window overlaps a fixed crawl interval"
                    );
                }
                !overlapping
            })
            .collect();

        windows.sort_by_key(|w| w.holiday_date);
        windows
    }

    fn window_for(&self, record: &HolidayRecord) -> Option<TravelWindow> {
        let weekday = record.date.weekday();
        let rule = self.policy.rule_for(&record.name, weekday);

        let departure_date = record
            .date
            .checked_sub_days(Days::new(u64::from(rule.departure_offset_days)))?;
        let return_date = if rule.return_is_holiday() {
            record.date
        } else {
            record
                .date
                .checked_add_days(Days::new(u64::from(rule.return_offset_days)))?
        };

        Some(TravelWindow {
            holiday_name: record.name.clone(),
            holiday_date: record.date,
            departure_date,
            return_date,
            weekday,
        })
    }
}
