pub mod auth_service;
pub mod pagespeed_service;

pub use pagespeed_service::{PageSpeedClient, PerformanceAnalyzer};
