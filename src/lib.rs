pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::AppConfig;

pub use crate::adapters::TaiwanCalendarGateway;
pub use crate::core::period::{calculate_fixed_dates, clamp_day, resolve_period};
pub use crate::core::policy::{WeekdayTable, WindowPolicy, WindowRule};
pub use crate::core::selector::TravelWindowSelector;
pub use crate::core::sequencer::{RequestSequencer, TaskHandle};
pub use crate::core::service::CrawlDateService;
pub use crate::domain::model::{DateSpan, FixedDates, HolidayDates, HolidayRecord, Period, TravelWindow};
pub use crate::domain::ports::HolidayGateway;
pub use crate::utils::error::{CrawlError, Result};
