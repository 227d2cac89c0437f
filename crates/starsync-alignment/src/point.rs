//! Alignment point model
//!
//! A calibration point pairs the position the mount reported (unsynced)
//! with the position it was verified to point at (synced), together with
//! cached plane projections of both.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use starsync_core::{AxisPosition, PlanePoint, PlaneVector};
use std::fmt;

use crate::projector::CoordinateProjector;

/// Which side of a calibration pair a coordinate belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frame {
    /// Raw mount reading
    Unsynced,
    /// Verified pointing position
    Synced,
}

/// Mapping direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Synced to unsynced: where to drive the mount to reach a target
    Forward,
    /// Unsynced to synced: where the mount is really pointing
    Reverse,
}

impl Direction {
    /// Frame the query is expressed in
    pub fn source(self) -> Frame {
        match self {
            Direction::Forward => Frame::Synced,
            Direction::Reverse => Frame::Unsynced,
        }
    }

    /// Frame the answer is expressed in
    pub fn destination(self) -> Frame {
        match self {
            Direction::Forward => Frame::Unsynced,
            Direction::Reverse => Frame::Synced,
        }
    }

    /// Apply a calibration delta (synced - unsynced) as a translation
    ///
    /// Forward subtracts the delta, Reverse adds it.
    pub fn translate(self, position: AxisPosition, delta: AxisPosition) -> AxisPosition {
        match self {
            Direction::Forward => position - delta,
            Direction::Reverse => position + delta,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Reverse => write!(f, "reverse"),
        }
    }
}

/// A calibration point with cached projections
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentPoint {
    /// Unique positive id
    pub id: u32,
    /// When the sync was taken
    pub timestamp: DateTime<Utc>,
    /// Position reported by the mount
    pub unsynced: AxisPosition,
    /// Projection of `unsynced`
    pub unsynced_plane: PlanePoint,
    /// Verified position
    pub synced: AxisPosition,
    /// Projection of `synced`
    pub synced_plane: PlanePoint,
    /// `synced_plane - unsynced_plane`
    pub delta: PlaneVector,
    /// Point took part in the most recent mapping
    pub selected_for_goto: bool,
}

impl AlignmentPoint {
    pub(crate) fn new(
        projector: &CoordinateProjector,
        id: u32,
        timestamp: DateTime<Utc>,
        unsynced: AxisPosition,
        synced: AxisPosition,
    ) -> Self {
        let mut point = Self {
            id,
            timestamp,
            unsynced,
            unsynced_plane: PlanePoint::default(),
            synced,
            synced_plane: PlanePoint::default(),
            delta: PlaneVector::default(),
            selected_for_goto: false,
        };
        point.reproject(projector);
        point
    }

    /// Recompute the plane caches from the axis positions
    pub(crate) fn reproject(&mut self, projector: &CoordinateProjector) {
        self.unsynced_plane = projector.project(self.unsynced);
        self.synced_plane = projector.project(self.synced);
        self.delta = self.synced_plane - self.unsynced_plane;
    }

    /// Axis position in the given frame
    pub fn axis(&self, frame: Frame) -> AxisPosition {
        match frame {
            Frame::Unsynced => self.unsynced,
            Frame::Synced => self.synced,
        }
    }

    /// Plane projection in the given frame
    pub fn plane(&self, frame: Frame) -> &PlanePoint {
        match frame {
            Frame::Unsynced => &self.unsynced_plane,
            Frame::Synced => &self.synced_plane,
        }
    }

    /// Axis-space correction, `synced - unsynced`
    pub fn axis_delta(&self) -> AxisPosition {
        self.synced - self.unsynced
    }

    /// Flat record for persistence
    pub fn record(&self) -> AlignmentRecord {
        AlignmentRecord {
            id: self.id,
            timestamp: self.timestamp,
            unsynced: self.unsynced,
            synced: self.synced,
        }
    }
}

impl fmt::Display for AlignmentPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} [{}] unsynced {} synced {} delta ({:.6}, {:.6})",
            self.id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.unsynced,
            self.synced,
            self.delta.x,
            self.delta.y
        )
    }
}

/// Persisted form of an alignment point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentRecord {
    /// Point id; zero or duplicates are reassigned on load
    #[serde(default)]
    pub id: u32,
    /// When the sync was taken
    pub timestamp: DateTime<Utc>,
    /// Position reported by the mount
    pub unsynced: AxisPosition,
    /// Verified position
    pub synced: AxisPosition,
}

impl AlignmentRecord {
    /// Create a record
    pub fn new(
        id: u32,
        timestamp: DateTime<Utc>,
        unsynced: AxisPosition,
        synced: AxisPosition,
    ) -> Self {
        Self {
            id,
            timestamp,
            unsynced,
            synced,
        }
    }
}
