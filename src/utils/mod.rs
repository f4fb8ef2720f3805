pub mod config;
pub mod logging;
pub mod rate_limiter;
