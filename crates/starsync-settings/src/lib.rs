//! StarSync Settings Crate
//!
//! Alignment configuration: the settings record, validation, and
//! JSON/TOML persistence.

pub mod config;
pub mod error;

pub use config::{
    default_config_path, ActivePointsMode, AlignmentConfig, AlignmentMode, ThreePointAlgorithm,
    TransformKind,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
