//! Alignment point store
//!
//! Ordered collection of calibration points. Insertion order matters:
//! the active transform is built from the first three points and the
//! one-point fallback follows the most recently added point.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use starsync_core::angles::angular_separation;
use starsync_core::{AlignmentError, AxisPosition};
use tracing::{debug, info};

use crate::point::{AlignmentPoint, AlignmentRecord};
use crate::projector::CoordinateProjector;

/// Result of an insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Id assigned to the new point
    pub id: u32,
    /// Ids of the points it replaced
    pub replaced: Vec<u32>,
}

/// Ordered calibration point storage
#[derive(Debug, Clone, Default)]
pub struct AlignmentPointStore {
    points: Vec<AlignmentPoint>,
    fallback_delta: AxisPosition,
}

impl AlignmentPointStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in insertion order
    pub fn points(&self) -> &[AlignmentPoint] {
        &self.points
    }

    /// Look up a point by id
    pub fn get(&self, id: u32) -> Option<&AlignmentPoint> {
        self.points.iter().find(|p| p.id == id)
    }

    /// The first three points, which define the active transform
    pub fn first_three(&self) -> Result<[&AlignmentPoint; 3], AlignmentError> {
        match self.points.as_slice() {
            [a, b, c, ..] => Ok([a, b, c]),
            _ => Err(AlignmentError::InsufficientPoints {
                available: self.points.len(),
                required: 3,
            }),
        }
    }

    /// Rolling one-point correction, `synced - unsynced` of the newest point
    pub fn fallback_delta(&self) -> AxisPosition {
        self.fallback_delta
    }

    /// Next id: one past the largest in use, or 1
    ///
    /// Once the largest id is `u32::MAX` the lowest unused positive id
    /// is handed out instead.
    pub fn next_id(&self) -> u32 {
        let taken: HashSet<u32> = self.points.iter().map(|p| p.id).collect();
        allocate_id(&taken, taken.iter().max().copied())
    }

    /// Add a sync pair
    ///
    /// Every existing point whose unsynced axis lies within
    /// `proximity_limit` degrees of the new one is removed first.
    pub fn insert(
        &mut self,
        projector: &CoordinateProjector,
        unsynced: AxisPosition,
        synced: AxisPosition,
        timestamp: DateTime<Utc>,
        proximity_limit: f64,
    ) -> InsertOutcome {
        let mut replaced = Vec::new();
        self.points.retain(|p| {
            let near = angular_separation(&p.unsynced, &unsynced) < proximity_limit;
            if near {
                replaced.push(p.id);
            }
            !near
        });
        if !replaced.is_empty() {
            debug!("Sync replaces nearby points {:?}", replaced);
        }

        let id = self.next_id();
        let point = AlignmentPoint::new(projector, id, timestamp, unsynced, synced);
        self.fallback_delta = point.axis_delta();
        self.points.push(point);
        self.clear_selection();

        info!(
            "Added alignment point {} ({} -> {}), {} total",
            id,
            unsynced,
            synced,
            self.points.len()
        );

        InsertOutcome { id, replaced }
    }

    /// Remove a point by id
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.points.len();
        self.points.retain(|p| p.id != id);
        if self.points.len() == before {
            return false;
        }

        self.fallback_delta = self
            .points
            .last()
            .map(AlignmentPoint::axis_delta)
            .unwrap_or_default();
        self.clear_selection();
        info!(
            "Removed alignment point {}, {} remaining",
            id,
            self.points.len()
        );
        true
    }

    /// Remove every point
    pub fn clear(&mut self) {
        self.points.clear();
        self.fallback_delta = AxisPosition::default();
        info!("Cleared alignment points");
    }

    /// Replace the contents with persisted records
    ///
    /// Record order is kept. Ids that are zero or already taken are
    /// replaced with fresh ones. Returns the ids in record order.
    pub fn load(
        &mut self,
        projector: &CoordinateProjector,
        records: &[AlignmentRecord],
    ) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut keep = Vec::with_capacity(records.len());
        for record in records {
            keep.push(record.id > 0 && seen.insert(record.id));
        }

        let mut largest = seen.iter().max().copied();
        self.points = records
            .iter()
            .zip(keep)
            .map(|(record, valid)| {
                let id = if valid {
                    record.id
                } else {
                    let id = allocate_id(&seen, largest);
                    seen.insert(id);
                    largest = largest.max(Some(id));
                    debug!("Reassigned alignment record id {} to {}", record.id, id);
                    id
                };
                AlignmentPoint::new(projector, id, record.timestamp, record.unsynced, record.synced)
            })
            .collect();

        self.fallback_delta = self
            .points
            .last()
            .map(AlignmentPoint::axis_delta)
            .unwrap_or_default();

        info!("Loaded {} alignment points", self.points.len());
        self.points.iter().map(|p| p.id).collect()
    }

    /// Recompute every cached projection
    pub fn reproject(&mut self, projector: &CoordinateProjector) {
        for point in &mut self.points {
            point.reproject(projector);
        }
    }

    /// Flag exactly the given ids as selected
    pub fn mark_selected(&mut self, ids: &[u32]) {
        for point in &mut self.points {
            point.selected_for_goto = ids.contains(&point.id);
        }
    }

    /// Clear every selection flag
    pub fn clear_selection(&mut self) {
        for point in &mut self.points {
            point.selected_for_goto = false;
        }
    }

    /// Ids currently flagged as selected, in store order
    pub fn selected_ids(&self) -> Vec<u32> {
        self.points
            .iter()
            .filter(|p| p.selected_for_goto)
            .map(|p| p.id)
            .collect()
    }

    /// Flat records in store order
    pub fn records(&self) -> Vec<AlignmentRecord> {
        self.points.iter().map(AlignmentPoint::record).collect()
    }
}

/// One past `largest`, or the lowest positive id not in `taken` when
/// that would overflow
fn allocate_id(taken: &HashSet<u32>, largest: Option<u32>) -> u32 {
    match largest {
        None => 1,
        Some(largest) => largest.checked_add(1).unwrap_or_else(|| {
            // A store never holds u32::MAX points, so a gap exists
            (1..u32::MAX).find(|id| !taken.contains(id)).unwrap_or(1)
        }),
    }
}
