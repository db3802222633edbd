use chrono::NaiveDate;
use crawl_dates::utils::validation::Validate;
use crawl_dates::{AppConfig, CrawlDateService, CrawlError};
use httpmock::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file
}

#[tokio::test]
async fn test_policy_and_fixed_windows_from_file() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/calendar/2026.json");
            then.status(200).json_body(serde_json::json!([
                {"date": "20260101", "week": "四", "isHoliday": true, "description": "開國紀念日"},
                {"date": "20260102", "week": "五", "isHoliday": true, "description": "彈性放假"}
            ]));
        })
        .await;

    let toml_content = format!(
        r#"
[gateway]
endpoint = "{}"
timeout_seconds = 5

[[fixed_windows]]
month_offset = 1
dep_day = 2
return_day = 4

[policy]
named_rules = []

[policy.weekdays]
mon = {{ departure_offset_days = 4 }}
tue = {{ departure_offset_days = 4 }}
wed = {{ departure_offset_days = 0, return_offset_days = 3 }}
thu = {{ departure_offset_days = 4 }}
fri = {{ departure_offset_days = 2, return_offset_days = 2 }}
sat = {{ departure_offset_days = 3, return_offset_days = 1 }}
sun = {{ departure_offset_days = 4 }}
"#,
        server.url("/calendar/{year}.json")
    );
    let file = write_config(&toml_content);

    let config = AppConfig::from_file(file.path()).unwrap();
    config.validate().unwrap();
    let service = CrawlDateService::from_config(&config).unwrap();

    let result = service.holiday_dates_at(date(2025, 12, 3), 1).await.unwrap();

    api_mock.assert_async().await;
    assert_eq!((result.target_year, result.target_month), (2026, 1));
    // 01-02 (五) => 12-31 ~ 01-04 與固定區間 01-02 ~ 01-04 重疊
    assert_eq!(result.holidays.len(), 1);
    assert_eq!(result.holidays[0].departure_date, date(2025, 12, 28));
    assert_eq!(result.holidays[0].return_date, date(2026, 1, 1));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = AppConfig::from_file("/definitely/not/here/crawl-dates.toml").unwrap_err();
    assert!(matches!(err, CrawlError::IoError(_)));
}

#[test]
fn test_invalid_policy_rejected() {
    let file = write_config(
        r#"
[[policy.named_rules]]
keyword = ""
departure_offset_days = 1
"#,
    );

    let config = AppConfig::from_file(file.path()).unwrap();
    assert!(config.validate().is_err());
}
