//! Configuration domain types

mod app_config;

pub use app_config::AppConfig;
