use crate::domain::model::{parse_weekday_zh, weekday_zh, HolidayRecord};
use crate::domain::ports::HolidayGateway;
use crate::utils::error::{CrawlError, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str =
    "https://cdn.jsdelivr.net/gh/ruyut/TaiwanCalendar/data/{year}.json";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// 資料來源中的一天
#[derive(Debug, Clone, Deserialize)]
struct CalendarDay {
    date: String,
    #[serde(default)]
    week: String,
    #[serde(rename = "isHoliday", default)]
    is_holiday: bool,
    #[serde(default)]
    description: String,
}

/// 台灣行事曆（政府行政機關辦公日曆）資料來源
#[derive(Debug, Clone)]
pub struct TaiwanCalendarGateway {
    client: Client,
    endpoint: String,
}

impl TaiwanCalendarGateway {
    /// `endpoint` 中的 `{year}` 會被替換成查詢年份
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            CrawlError::ConfigError {
                message: format!("無法建立 HTTP client: {}", e),
            }
        })?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn url_for(&self, year: i32) -> String {
        self.endpoint.replace("{year}", &year.to_string())
    }

    async fn download(&self, year: i32) -> std::result::Result<Vec<u8>, String> {
        let url = self.url_for(year);
        tracing::debug!("Making holiday request to: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        tracing::debug!("Holiday API response status: {}", response.status());
        if !response.status().is_success() {
            return Err(format!("unexpected status {}", response.status()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read body: {}", e))?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl HolidayGateway for TaiwanCalendarGateway {
    async fn fetch_year(&self, year: i32) -> Result<Vec<HolidayRecord>> {
        let body = self
            .download(year)
            .await
            .map_err(|message| CrawlError::GatewayError { year, message })?;

        let records = parse_calendar(year, &body)?;
        tracing::info!(year, holidays = records.len(), "holiday calendar downloaded");
        Ok(records)
    }
}

/// 解析年度行事曆，只保留有描述的放假日
pub fn parse_calendar(year: i32, body: &[u8]) -> Result<Vec<HolidayRecord>> {
    let gateway_error = |message: String| CrawlError::GatewayError { year, message };

    // 來源檔案可能帶 UTF-8 BOM
    let body = body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(body);
    let days: Vec<CalendarDay> =
        serde_json::from_slice(body).map_err(|e| gateway_error(format!("invalid JSON: {}", e)))?;

    let mut records = Vec::new();
    for day in days {
        if !day.is_holiday || day.description.trim().is_empty() {
            continue;
        }

        let date = NaiveDate::parse_from_str(&day.date, "%Y%m%d")
            .map_err(|_| gateway_error(format!("無效的日期格式：{}", day.date)))?;

        let weekday = date.weekday();
        if !day.week.trim().is_empty() {
            let labelled = parse_weekday_zh(&day.week)
                .ok_or_else(|| gateway_error(format!("無效的星期：{}", day.week)))?;
            if labelled != weekday {
                return Err(gateway_error(format!(
                    "{} 標示為星期{}，實際為星期{}",
                    day.date,
                    day.week.trim(),
                    weekday_zh(weekday)
                )));
            }
        }

        records.push(HolidayRecord {
            name: day.description.trim().to_string(),
            date,
            weekday,
        });
    }

    Ok(records)
}
