//! Event type definitions for the event bus.
//!
//! This module defines the telemetry events published by the alignment
//! engine. Events are cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

/// Root event enum for all telemetry events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Alignment model state changes
    Alignment(AlignmentEvent),
    /// Configuration changes
    Settings(SettingsEvent),
    /// User-facing notifications and reports
    Notification(NotificationEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Alignment(_) => EventCategory::Alignment,
            AppEvent::Settings(_) => EventCategory::Settings,
            AppEvent::Notification(_) => EventCategory::Notification,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Alignment(e) => e.description(),
            AppEvent::Settings(e) => e.description(),
            AppEvent::Notification(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Alignment model events.
    Alignment,
    /// Settings and configuration events.
    Settings,
    /// Notification events.
    Notification,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Alignment => write!(f, "Alignment"),
            EventCategory::Settings => write!(f, "Settings"),
            EventCategory::Notification => write!(f, "Notification"),
        }
    }
}

/// Alignment model events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlignmentEvent {
    /// Number of calibration points changed.
    PointCountChanged {
        /// New point count.
        count: usize,
    },
    /// Point used by the last nearest-point mapping changed.
    SelectedPointChanged {
        /// Selected point id, `None` when cleared.
        id: Option<u32>,
    },
    /// Set of points flagged for goto changed.
    SelectionChanged {
        /// Ids of the flagged points.
        ids: Vec<u32>,
    },
    /// Active transform was enabled or disabled.
    TransformStateChanged {
        /// Whether the active transform is usable.
        enabled: bool,
    },
    /// A transform assembly hit collinear or coincident points.
    DegenerateGeometry {
        /// Ids of the offending triple.
        ids: Vec<u32>,
    },
}

impl AlignmentEvent {
    fn description(&self) -> String {
        match self {
            AlignmentEvent::PointCountChanged { count } => {
                format!("Alignment point count: {}", count)
            }
            AlignmentEvent::SelectedPointChanged { id } => match id {
                Some(id) => format!("Selected alignment point {}", id),
                None => "Selected alignment point cleared".to_string(),
            },
            AlignmentEvent::SelectionChanged { ids } => {
                format!("Goto selection: {:?}", ids)
            }
            AlignmentEvent::TransformStateChanged { enabled } => {
                format!(
                    "Alignment transform {}",
                    if *enabled { "enabled" } else { "disabled" }
                )
            }
            AlignmentEvent::DegenerateGeometry { ids } => {
                format!("Degenerate alignment triangle {:?}", ids)
            }
        }
    }
}

/// Settings events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingsEvent {
    /// Alignment configuration applied.
    ConfigurationApplied,
    /// Site location changed.
    SiteChanged {
        /// New latitude in degrees.
        latitude: f64,
        /// New longitude in degrees.
        longitude: f64,
    },
}

impl SettingsEvent {
    fn description(&self) -> String {
        match self {
            SettingsEvent::ConfigurationApplied => "Alignment configuration applied".to_string(),
            SettingsEvent::SiteChanged {
                latitude,
                longitude,
            } => format!("Site changed to {:.4}, {:.4}", latitude, longitude),
        }
    }
}

/// Notification severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    /// General information
    Information,
    /// Report data
    Data,
    /// Recoverable problem
    Warning,
    /// Failure
    Error,
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationLevel::Information => write!(f, "Information"),
            NotificationLevel::Data => write!(f, "Data"),
            NotificationLevel::Warning => write!(f, "Warning"),
            NotificationLevel::Error => write!(f, "Error"),
        }
    }
}

/// A notification message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

impl NotificationEvent {
    /// Create a notification
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    fn description(&self) -> String {
        format!("[{}] {}", self.level, self.message)
    }
}
