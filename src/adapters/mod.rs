// Adapters layer: concrete implementations for external systems.

pub mod taiwan_calendar;

pub use taiwan_calendar::TaiwanCalendarGateway;
