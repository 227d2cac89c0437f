//! # StarSync Core
//!
//! Core types, traits, and utilities for StarSync.
//! Provides the coordinate data model, angle helpers, the axis
//! kinematics abstraction, error types, and telemetry events.

pub mod angles;
pub mod data;
pub mod error;
pub mod event_bus;
pub mod kinematics;
pub mod types;

pub use data::{AxisPosition, HorizonPosition, PlanePoint, PlaneVector, Quadrant};

pub use error::{AlignmentError, Error, KinematicsError, Result};

pub use event_bus::{
    AlignmentEvent, AppEvent, EventBus, EventCategory, EventFilter, NotificationEvent,
    NotificationLevel, SettingsEvent,
};

pub use kinematics::{AxisKinematics, EquatorialKinematics, Site};

pub use types::{thread_safe, ThreadSafe};
