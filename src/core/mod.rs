pub mod cache;
pub mod period;
pub mod policy;
pub mod selector;
pub mod sequencer;
pub mod service;

pub use crate::domain::model::{HolidayQuery, HolidayRecord, Period, TravelWindow};
pub use crate::domain::ports::HolidayGateway;
pub use crate::utils::error::Result;
