//! Configuration module
//!
//! Schema types plus the layered loader.

pub mod loader;
pub mod schema;

pub use loader::{
    ConfigLoader, ConfigSource, ConfigSourceType, CreateConfigOptions, CreatedConfig,
    PROJECT_CONFIG_FILE,
};
pub use schema::{
    AutoDetect, BaseSegmentConfig, Config, LoadColorConfig, LoadSegmentConfig,
    LoadThresholdsConfig, SegmentsConfig, StyleConfig, TerminalConfig, UptimeSegmentConfig,
    WeatherSegmentConfig,
};
