//! # StarSync
//!
//! An N-star pointing model for two-axis telescope mounts. Sync events
//! pair the position the mount reported with the position it was really
//! pointing at; the model then corrects gotos and reported positions
//! using a triangulated transform over nearby calibration points.
//!
//! ## Architecture
//!
//! StarSync is organized as a workspace with multiple crates:
//!
//! 1. **starsync-core** - Coordinate types, mount kinematics, errors, events
//! 2. **starsync-settings** - Alignment configuration and persistence
//! 3. **starsync-alignment** - Projection, point store, selection, transforms, engine
//! 4. **starsync** - Facade and command line report tool

use std::path::Path;

use anyhow::Context;

pub use starsync_alignment::{
    AlignmentPoint, AlignmentRecord, AlignmentReport, CoordinateProjector, Direction,
    MappingEngine,
};
pub use starsync_core::{
    AlignmentError, AppEvent, AxisKinematics, AxisPosition, EquatorialKinematics, Error,
    EventBus, EventCategory, EventFilter, HorizonPosition, NotificationEvent, NotificationLevel,
    PlanePoint, Result, Site,
};
pub use starsync_settings::{
    default_config_path, ActivePointsMode, AlignmentConfig, AlignmentMode, ThreePointAlgorithm,
    TransformKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output with pretty formatting
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_line_number(true)
        .pretty();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Read calibration records from a JSON file
pub fn load_records(path: &Path) -> anyhow::Result<Vec<AlignmentRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = serde_json::from_str(&content)
        .with_context(|| format!("Invalid alignment records in {}", path.display()))?;
    Ok(records)
}

/// Write calibration records to a JSON file
pub fn save_records(path: &Path, records: &[AlignmentRecord]) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(records)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!("Saved {} alignment records to {}", records.len(), path.display());
    Ok(())
}
