//! Active transform
//!
//! Forward and reverse transforms built from the first three points in
//! the store. Rebuilt whenever membership or the site changes, and reused
//! by queries whose selected triangle is that same triple.

use starsync_core::{AlignmentError, PlanePoint};
use starsync_settings::{AlignmentConfig, TransformKind};
use tracing::debug;

use crate::point::{AlignmentPoint, Direction, Frame};
use crate::store::AlignmentPointStore;
use crate::transform::Transform;

/// Cached transforms for the calibration triple
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveTransform {
    triple: Option<[u32; 3]>,
    forward: Option<Transform>,
    reverse: Option<Transform>,
    enabled: bool,
}

impl ActiveTransform {
    /// Ids of the triple the transforms were built from
    pub fn triple_ids(&self) -> Option<[u32; 3]> {
        self.triple
    }

    /// Whether the transforms can be used
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Transform for a direction
    pub fn transform(&self, direction: Direction) -> Option<&Transform> {
        match direction {
            Direction::Forward => self.forward.as_ref(),
            Direction::Reverse => self.reverse.as_ref(),
        }
    }

    /// Cached transform for `ids` in any vertex order, if usable
    ///
    /// Three vertex correspondences fix the map, so the order the
    /// triangle was discovered in does not matter.
    pub fn cached(&self, ids: [u32; 3], direction: Direction) -> Option<&Transform> {
        if !self.enabled {
            return None;
        }
        let mut wanted = ids;
        wanted.sort_unstable();
        let mut own = self.triple?;
        own.sort_unstable();
        if own == wanted {
            self.transform(direction)
        } else {
            None
        }
    }

    /// Drop back to the empty, disabled state
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rebuild from the store
    ///
    /// With fewer than three points the transform is reset. A degenerate
    /// triple disables it but keeps the previous matrices.
    pub fn rebuild(
        &mut self,
        store: &AlignmentPointStore,
        config: &AlignmentConfig,
    ) -> Result<(), AlignmentError> {
        let triple = match store.first_three() {
            Ok(triple) => triple,
            Err(err) => {
                debug!("Active transform reset: {}", err);
                self.reset();
                return Ok(());
            }
        };
        let ids = triple.map(|p| p.id);

        let built = assemble(&triple, Direction::Forward, config).and_then(|forward| {
            assemble(&triple, Direction::Reverse, config).map(|reverse| (forward, reverse))
        });

        match built {
            Ok((forward, reverse)) => {
                debug!("Active transform rebuilt from points {:?}", ids);
                *self = Self {
                    triple: Some(ids),
                    forward: Some(forward),
                    reverse: Some(reverse),
                    enabled: true,
                };
                Ok(())
            }
            Err(err) => {
                self.enabled = false;
                Err(with_ids(err, &ids))
            }
        }
    }
}

/// Transform kind configured for a direction
pub fn kind_for(config: &AlignmentConfig, direction: Direction) -> TransformKind {
    match direction {
        Direction::Forward => config.forward_transform,
        Direction::Reverse => config.reverse_transform,
    }
}

/// Assemble the transform carrying a triple from the direction's source
/// frame to its destination frame
pub fn assemble(
    triple: &[&AlignmentPoint; 3],
    direction: Direction,
    config: &AlignmentConfig,
) -> Result<Transform, AlignmentError> {
    let planes = |frame: Frame| -> [PlanePoint; 3] { triple.map(|p| *p.plane(frame)) };
    Transform::assemble(
        kind_for(config, direction),
        &planes(direction.source()),
        &planes(direction.destination()),
    )
    .map_err(|err| with_ids(err, &triple.map(|p| p.id)))
}

/// Attach point ids to a degenerate geometry error
fn with_ids(err: AlignmentError, ids: &[u32; 3]) -> AlignmentError {
    match err {
        AlignmentError::DegenerateGeometry { determinant, .. } => {
            AlignmentError::DegenerateGeometry {
                ids: ids.to_vec(),
                determinant,
            }
        }
        other => other,
    }
}
