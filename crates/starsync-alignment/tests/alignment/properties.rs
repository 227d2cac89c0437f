use std::collections::HashSet;

use proptest::prelude::*;
use starsync_alignment::CoordinateProjector;
use starsync_core::angles::axis_distance;
use starsync_core::{AxisPosition, Site};

use super::support::{at, engine, projector};

/// Axis positions on either side of the pier, away from the pole
fn axis_position() -> impl Strategy<Value = AxisPosition> {
    prop_oneof![
        (0.0..360.0f64, -30.0..85.0f64).prop_map(|(ra, dec)| AxisPosition::new(ra, dec)),
        (0.0..360.0f64, 95.0..210.0f64).prop_map(|(ra, dec)| AxisPosition::new(ra, dec)),
        (prop_oneof![Just(0.0), Just(180.0)], -30.0..210.0f64)
            .prop_filter("away from the pole", |(_, dec)| (dec - 90.0f64).abs() > 5.0)
            .prop_map(|(ra, dec)| AxisPosition::new(ra, dec)),
    ]
}

#[derive(Debug, Clone)]
enum Op {
    Sync(AxisPosition, AxisPosition),
    Remove(usize),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (axis_position(), -1.0..1.0f64, -1.0..1.0f64).prop_map(|(a, dra, ddec)| {
            Op::Sync(a, AxisPosition::new(a.ra + dra, a.dec + ddec))
        }),
        2 => (0usize..8).prop_map(Op::Remove),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_projection_round_trip(a in axis_position()) {
        let projector = projector();
        let plane = projector.project(a);
        let back = projector.unproject_near(&plane, &plane, a);
        prop_assert!(axis_distance(&back, &a) < 1e-9, "{} -> {}", a, back);
    }

    #[test]
    fn prop_southern_round_trip(a in axis_position()) {
        let projector = CoordinateProjector::equatorial(Site::new(-33.86, 151.2).unwrap());
        let plane = projector.project(a);
        let back = projector.unproject_near(&plane, &plane, a);
        prop_assert!(axis_distance(&back, &a) < 1e-9, "{} -> {}", a, back);
    }

    #[test]
    fn prop_store_invariants(ops in prop::collection::vec(op(), 1..40)) {
        let engine = engine();
        for (n, op) in ops.into_iter().enumerate() {
            match op {
                Op::Sync(unsynced, synced) => {
                    engine.sync_point(unsynced, synced, at(n as i64)).unwrap();
                }
                Op::Remove(index) => {
                    let ids: Vec<u32> = engine.points().iter().map(|p| p.id).collect();
                    if let Some(id) = ids.get(index) {
                        prop_assert!(engine.remove_point(*id));
                    }
                }
                Op::Clear => engine.clear(),
            }

            let points = engine.points();
            let ids: HashSet<u32> = points.iter().map(|p| p.id).collect();
            prop_assert_eq!(ids.len(), points.len());
            prop_assert!(ids.iter().all(|id| *id > 0));
            prop_assert_eq!(engine.is_enabled(), points.len() >= 3);

            let projector = projector();
            for p in &points {
                prop_assert_eq!(p.unsynced_plane, projector.project(p.unsynced));
                prop_assert_eq!(p.synced_plane, projector.project(p.synced));
            }
        }
    }

    #[test]
    fn prop_queries_are_total(
        syncs in prop::collection::vec((axis_position(), -1.0..1.0f64), 0..8),
        query in axis_position(),
    ) {
        let engine = engine();
        for (n, (a, d)) in syncs.into_iter().enumerate() {
            engine.sync_point(a, AxisPosition::new(a.ra + d, a.dec - d), at(n as i64)).unwrap();
        }
        prop_assert!(engine.forward(query).is_finite());
        prop_assert!(engine.reverse(query).is_finite());
    }
}

#[test]
fn test_proximity_keeps_later_point() {
    let engine = engine();
    engine
        .sync_point(AxisPosition::new(45.0, 20.0), AxisPosition::new(45.5, 20.0), at(0))
        .unwrap();
    let second = engine
        .sync_point(AxisPosition::new(45.2, 20.2), AxisPosition::new(45.9, 20.1), at(1))
        .unwrap();

    let points = engine.points();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].id, second);
    // The store was empty again when the id was assigned
    assert_eq!(second, 1);
    assert_eq!(points[0].synced, AxisPosition::new(45.9, 20.1));
}

#[test]
fn test_proximity_limit_is_configurable() {
    let engine = engine();
    let mut config = engine.config();
    config.proximity_limit = 0.1;
    engine.configure(config).unwrap();

    engine
        .sync_point(AxisPosition::new(45.0, 20.0), AxisPosition::new(45.5, 20.0), at(0))
        .unwrap();
    engine
        .sync_point(AxisPosition::new(45.2, 20.2), AxisPosition::new(45.9, 20.1), at(1))
        .unwrap();
    assert_eq!(engine.point_count(), 2);
}
