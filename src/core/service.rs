use crate::adapters::TaiwanCalendarGateway;
use crate::config::AppConfig;
use crate::core::period::{calculate_fixed_dates, fixed_span, resolve_period, today_in};
use crate::core::selector::TravelWindowSelector;
use crate::core::sequencer::{RequestSequencer, TaskHandle};
use crate::domain::model::{DateSpan, FixedDates, HolidayDates, HolidayQuery, Period};
use crate::domain::ports::HolidayGateway;
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::sync::Arc;

/// 對外的日期計算入口：固定月份與節日兩種模式
#[derive(Clone)]
pub struct CrawlDateService {
    sequencer: RequestSequencer,
    config: Arc<AppConfig>,
}

impl CrawlDateService {
    pub fn new(sequencer: RequestSequencer, config: AppConfig) -> Self {
        Self {
            sequencer,
            config: Arc::new(config),
        }
    }

    /// 依配置建立 HTTP 資料來源與佇列，必須在 Tokio runtime 內呼叫
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let gateway = TaiwanCalendarGateway::new(config.gateway.endpoint.clone(), config.timeout())?;
        Ok(Self::with_gateway(config, gateway))
    }

    pub fn with_gateway<G: HolidayGateway + 'static>(config: &AppConfig, gateway: G) -> Self {
        let selector = TravelWindowSelector::new(config.policy.clone());
        let sequencer =
            RequestSequencer::spawn(gateway, selector, config.sequencer.queue_capacity);
        Self::new(sequencer, config.clone())
    }

    pub fn sequencer(&self) -> &RequestSequencer {
        &self.sequencer
    }

    pub fn today(&self) -> NaiveDate {
        today_in(self.config.calendar.utc_offset_hours)
    }

    pub fn fixed_dates(&self, month_offset: i64, dep_day: i64, return_day: i64) -> Result<FixedDates> {
        self.fixed_dates_at(self.today(), month_offset, dep_day, return_day)
    }

    pub fn fixed_dates_at(
        &self,
        now: NaiveDate,
        month_offset: i64,
        dep_day: i64,
        return_day: i64,
    ) -> Result<FixedDates> {
        let dates = calculate_fixed_dates(now, month_offset, dep_day, return_day)?;
        tracing::debug!(
            month_offset,
            departure = %dates.departure_date,
            return_date = %dates.return_date,
            "fixed dates calculated"
        );
        Ok(dates)
    }

    pub async fn holiday_dates(&self, month_offset: i64) -> Result<HolidayDates> {
        self.holiday_dates_at(self.today(), month_offset).await
    }

    pub async fn holiday_dates_at(&self, now: NaiveDate, month_offset: i64) -> Result<HolidayDates> {
        let handle = self.submit_at(now, month_offset)?;
        let (task_id, period) = (handle.id(), handle.period());
        let holidays = handle.wait().await?;
        tracing::debug!(task_id, %period, windows = holidays.len(), "holiday dates resolved");

        Ok(HolidayDates {
            target_year: period.year,
            target_month: period.month,
            holidays,
        })
    }

    /// 參數檢查在進入佇列前完成；佇列已滿時立即失敗
    pub fn submit_at(&self, now: NaiveDate, month_offset: i64) -> Result<TaskHandle> {
        let period = resolve_period(now, month_offset)?;
        let blocked = self.blocked_spans(period, month_offset)?;
        self.sequencer
            .submit(HolidayQuery::new(period).with_blocked(blocked))
    }

    fn blocked_spans(&self, period: Period, month_offset: i64) -> Result<Vec<DateSpan>> {
        self.config
            .fixed_windows_for(month_offset)
            .map(|w| fixed_span(period, w.dep_day, w.return_day))
            .collect()
    }
}
