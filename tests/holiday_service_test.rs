use chrono::{NaiveDate, Weekday};
use crawl_dates::{
    AppConfig, CrawlDateService, CrawlError, WeekdayTable, WindowPolicy, WindowRule,
};
use httpmock::prelude::*;
use std::time::Duration;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn calendar_2025() -> serde_json::Value {
    serde_json::json!([
        {"date": "20250101", "week": "三", "isHoliday": true, "description": "開國紀念日"},
        {"date": "20250127", "week": "一", "isHoliday": true, "description": "小年夜"},
        {"date": "20250128", "week": "二", "isHoliday": true, "description": "農曆除夕"},
        {"date": "20250129", "week": "三", "isHoliday": true, "description": "春節"},
        {"date": "20250131", "week": "五", "isHoliday": true, "description": "春節補假"},
        {"date": "20250208", "week": "六", "isHoliday": false, "description": "補行上班"},
        {"date": "20251224", "week": "三", "isHoliday": false, "description": ""},
        {"date": "20251225", "week": "四", "isHoliday": true, "description": "行憲紀念日"},
        {"date": "20251227", "week": "六", "isHoliday": true, "description": ""}
    ])
}

fn config_for(server: &MockServer) -> AppConfig {
    let mut config = AppConfig::default();
    config.gateway.endpoint = server.url("/data/{year}.json");
    config.gateway.timeout_seconds = 5;
    config
}

#[tokio::test]
async fn test_documented_december_scenario_over_http() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/2025.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(calendar_2025());
        })
        .await;

    let mut weekdays = WeekdayTable::default();
    weekdays.set(Weekday::Thu, WindowRule::new(4, 0));
    let mut config = config_for(&server);
    config.policy = WindowPolicy::with_weekdays(weekdays);

    let service = CrawlDateService::from_config(&config).unwrap();
    let result = service.holiday_dates_at(date(2025, 10, 15), 2).await.unwrap();

    api_mock.assert_async().await;
    assert_eq!(result.target_year, 2025);
    assert_eq!(result.target_month, 12);
    assert_eq!(result.holidays.len(), 1);

    let window = &result.holidays[0];
    assert_eq!(window.holiday_name, "行憲紀念日");
    assert_eq!(window.holiday_date, date(2025, 12, 25));
    assert_eq!(window.departure_date, date(2025, 12, 21));
    assert_eq!(window.return_date, date(2025, 12, 25));
    assert_eq!(window.weekday, Weekday::Thu);

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["holidays"][0]["weekday"], "四");
    assert_eq!(json["holidays"][0]["departure_date"], "2025-12-21");
}

#[tokio::test]
async fn test_year_is_fetched_once_for_many_months() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/2025.json");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(calendar_2025());
        })
        .await;

    let service = CrawlDateService::from_config(&config_for(&server)).unwrap();
    let now = date(2025, 1, 10);

    let january = service.holiday_dates_at(now, 0).await.unwrap();
    let january_again = service.holiday_dates_at(now, 0).await.unwrap();
    let december = service.holiday_dates_at(now, 11).await.unwrap();

    assert_eq!(api_mock.hits_async().await, 1);
    assert_eq!(january, january_again);

    // 春節、除夕與補假都被剔除，只剩開國紀念日與小年夜
    let names: Vec<&str> = january.holidays.iter().map(|w| w.holiday_name.as_str()).collect();
    assert_eq!(names, vec!["開國紀念日", "小年夜"]);
    assert_eq!(january.holidays[1].departure_date, date(2025, 1, 25));
    assert_eq!(january.holidays[1].return_date, date(2025, 1, 31));

    assert_eq!(december.holidays.len(), 1);
}

#[tokio::test]
async fn test_month_without_holidays_is_empty_success() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/2025.json");
            then.status(200).json_body(calendar_2025());
        })
        .await;

    let service = CrawlDateService::from_config(&config_for(&server)).unwrap();
    let result = service.holiday_dates_at(date(2025, 5, 1), 2).await.unwrap();

    api_mock.assert_async().await;
    assert_eq!(result.target_month, 7);
    assert!(result.holidays.is_empty());
}

#[tokio::test]
async fn test_gateway_failure_is_retried_on_next_request() {
    let server = MockServer::start_async().await;
    let mut failing = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/2025.json");
            then.status(503);
        })
        .await;

    let service = CrawlDateService::from_config(&config_for(&server)).unwrap();

    let err = service.holiday_dates_at(date(2025, 10, 15), 2).await.unwrap_err();
    assert!(matches!(err, CrawlError::GatewayError { year: 2025, .. }));
    failing.assert_async().await;
    failing.delete_async().await;

    let healthy = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/2025.json");
            then.status(200).json_body(calendar_2025());
        })
        .await;

    let result = service.holiday_dates_at(date(2025, 10, 15), 2).await.unwrap();
    healthy.assert_async().await;
    assert_eq!(result.holidays.len(), 1);
}

#[tokio::test]
async fn test_queue_full_while_worker_waits_on_gateway() {
    let server = MockServer::start_async().await;
    let slow = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/2025.json");
            then.status(200)
                .json_body(calendar_2025())
                .delay(Duration::from_millis(500));
        })
        .await;

    let mut config = config_for(&server);
    config.sequencer.queue_capacity = 3;
    let service = CrawlDateService::from_config(&config).unwrap();
    let now = date(2025, 10, 15);

    let handles: Vec<_> = (0..3)
        .map(|offset| service.submit_at(now, offset).unwrap())
        .collect();

    let rejected = tokio_test::assert_err!(service.submit_at(now, 0));
    assert!(matches!(rejected, CrawlError::QueueFull { capacity: 3 }));

    let mut months = Vec::new();
    for handle in handles {
        let period = handle.period();
        handle.wait().await.unwrap();
        months.push(period.month);
    }
    assert_eq!(months, vec![10, 11, 12]);
    assert_eq!(slow.hits_async().await, 1);

    // 名額釋放後可以再次送出
    tokio_test::assert_ok!(service.submit_at(now, 0));
}

#[tokio::test]
async fn test_concurrent_callers_share_one_fetch() {
    let server = MockServer::start_async().await;
    let api_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/2025.json");
            then.status(200).json_body(calendar_2025());
        })
        .await;

    let service = CrawlDateService::from_config(&config_for(&server)).unwrap();
    let now = date(2025, 1, 10);

    let mut tasks = Vec::new();
    for offset in 0..12 {
        let service = service.clone();
        tasks.push(tokio::spawn(async move {
            service.holiday_dates_at(now, offset).await
        }));
    }

    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }
    assert_eq!(api_mock.hits_async().await, 1);
}
