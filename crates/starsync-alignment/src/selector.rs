//! Candidate selection
//!
//! Picks the calibration points used to map a query: either the single
//! nearest point, or a triangle of points enclosing the query.

use starsync_core::{AxisPosition, PlanePoint};
use starsync_settings::{ActivePointsMode, AlignmentConfig, ThreePointAlgorithm};
use tracing::debug;

use crate::geometry::Triangle;
use crate::point::{AlignmentPoint, Frame};

/// How distances between a query and a candidate are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Planar distance between projections
    #[default]
    Plane,
    /// Raw axis-space distance
    Axis,
}

impl DistanceMetric {
    /// Metric matching the `use_axis_space_distance` toggle
    pub fn from_axis_space(use_axis_space: bool) -> Self {
        if use_axis_space {
            DistanceMetric::Axis
        } else {
            DistanceMetric::Plane
        }
    }

    /// Squared distance from the query to a point, in the query frame
    pub fn squared_distance(&self, point: &AlignmentPoint, query: &Query) -> f64 {
        match self {
            DistanceMetric::Plane => point.plane(query.frame).squared_distance(&query.plane),
            DistanceMetric::Axis => point.axis(query.frame).squared_distance(&query.axis),
        }
    }
}

/// A position to be mapped, with its projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    /// Axis position
    pub axis: AxisPosition,
    /// Its projection
    pub plane: PlanePoint,
    /// Frame the position is expressed in
    pub frame: Frame,
}

/// Selects calibration points for a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateSelector {
    /// Which points are eligible
    pub active_points: ActivePointsMode,
    /// Triangle choice policy
    pub algorithm: ThreePointAlgorithm,
    /// Search pool size for triangles
    pub max_candidates: usize,
    /// Distance measure
    pub metric: DistanceMetric,
}

impl CandidateSelector {
    /// Build a selector from the configuration
    pub fn from_config(config: &AlignmentConfig) -> Self {
        Self {
            active_points: config.active_points,
            algorithm: config.three_point_algorithm,
            max_candidates: config.max_candidates,
            metric: DistanceMetric::from_axis_space(config.use_axis_space_distance),
        }
    }

    fn admits(&self, point: &AlignmentPoint, query: &Query) -> bool {
        let plane = point.plane(query.frame);
        match self.active_points {
            ActivePointsMode::All => true,
            ActivePointsMode::PierSideOnly => plane.same_pier_side(&query.plane),
            ActivePointsMode::LocalQuadrant => plane.quadrant() == query.plane.quadrant(),
        }
    }

    /// Eligible points sorted by ascending distance
    fn candidates<'a>(&self, points: &'a [AlignmentPoint], query: &Query) -> Vec<&'a AlignmentPoint> {
        let mut ranked: Vec<(f64, &AlignmentPoint)> = points
            .iter()
            .filter(|p| self.admits(p, query))
            .map(|p| (self.metric.squared_distance(p, query), p))
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
        ranked.into_iter().map(|(_, p)| p).collect()
    }

    /// Nearest eligible point
    pub fn select_one<'a>(
        &self,
        points: &'a [AlignmentPoint],
        query: &Query,
    ) -> Option<&'a AlignmentPoint> {
        self.candidates(points, query).into_iter().next()
    }

    /// Three points to triangulate the query with
    ///
    /// With three points or fewer the whole store is returned, oldest
    /// first, whether or not it encloses the query. Otherwise the
    /// eligible points nearest the query are searched for an enclosing
    /// triangle. `None` means no triangle was found.
    pub fn select_three<'a>(
        &self,
        points: &'a [AlignmentPoint],
        query: &Query,
    ) -> Option<[&'a AlignmentPoint; 3]> {
        if points.len() <= 3 {
            let mut all: Vec<&AlignmentPoint> = points.iter().collect();
            all.sort_by_key(|p| p.timestamp);
            return match all.as_slice() {
                [a, b, c] => Some([*a, *b, *c]),
                _ => None,
            };
        }

        let mut pool = self.candidates(points, query);
        pool.truncate(self.max_candidates);
        if pool.len() < 3 {
            debug!("Only {} eligible points for triangulation", pool.len());
            return None;
        }

        match self.algorithm {
            ThreePointAlgorithm::BestCentre => best_centre(&pool, query),
            ThreePointAlgorithm::ClosestPoints => closest_points(&pool, query),
        }
    }
}

fn triangle(pool: &[&AlignmentPoint], frame: Frame, i: usize, j: usize, k: usize) -> Triangle {
    Triangle::new(*pool[i].plane(frame), *pool[j].plane(frame), *pool[k].plane(frame))
}

/// Enclosing triangle whose centre is nearest the query, as (k, j, i)
fn best_centre<'a>(pool: &[&'a AlignmentPoint], query: &Query) -> Option<[&'a AlignmentPoint; 3]> {
    let n = pool.len();
    let mut best: Option<(f64, [usize; 3])> = None;

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let t = triangle(pool, query.frame, i, j, k);
                if t.is_degenerate() || !t.contains(&query.plane) {
                    continue;
                }
                let distance = t.centre().squared_distance(&query.plane);
                if best.is_none_or(|(d, _)| distance < d) {
                    best = Some((distance, [i, j, k]));
                }
            }
        }
    }

    best.map(|(_, [i, j, k])| {
        debug!("Best centre triangle {:?}", [pool[k].id, pool[j].id, pool[i].id]);
        [pool[k], pool[j], pool[i]]
    })
}

/// First enclosing triangle in distance order, as (i, j, k)
fn closest_points<'a>(pool: &[&'a AlignmentPoint], query: &Query) -> Option<[&'a AlignmentPoint; 3]> {
    let n = pool.len();
    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let t = triangle(pool, query.frame, i, j, k);
                if !t.is_degenerate() && t.contains(&query.plane) {
                    debug!("Closest enclosing triangle {:?}", [pool[i].id, pool[j].id, pool[k].id]);
                    return Some([pool[i], pool[j], pool[k]]);
                }
            }
        }
    }
    None
}
