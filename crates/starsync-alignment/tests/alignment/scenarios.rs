use starsync_alignment::MappingEngine;
use starsync_core::angles::{axis_distance, range360};
use starsync_core::{AxisPosition, PlanePoint};
use starsync_settings::{AlignmentConfig, AlignmentMode};

use super::support::{assert_axis_close, at, axis_near, config, engine, projector};

#[test]
fn test_empty_store_is_identity() {
    let engine = engine();
    let p = AxisPosition::new(123.4, 56.7);
    assert_eq!(engine.forward(p), p);
    assert_eq!(engine.reverse(p), p);
    assert_eq!(engine.last_selected_point_id(), None);
}

#[test]
fn test_single_point_translation() {
    let engine = engine();
    let unsynced = AxisPosition::new(80.0, 30.0);
    let synced = AxisPosition::new(80.75, 29.5);
    engine.sync_point(unsynced, synced, at(0)).unwrap();

    let d = synced - unsynced;
    let p = AxisPosition::new(150.0, 10.0);
    assert_axis_close(engine.forward(p), p - d, 1e-12);
    assert_axis_close(engine.reverse(p), p + d, 1e-12);
    assert_eq!(engine.last_selected_point_id(), None);
}

#[test]
fn test_two_points_use_newest_delta() {
    let engine = engine();
    engine
        .sync_point(AxisPosition::new(80.0, 30.0), AxisPosition::new(81.0, 30.0), at(0))
        .unwrap();
    engine
        .sync_point(AxisPosition::new(20.0, 60.0), AxisPosition::new(20.0, 60.5), at(1))
        .unwrap();

    let p = AxisPosition::new(100.0, 20.0);
    assert_axis_close(engine.reverse(p), AxisPosition::new(100.0, 20.5), 1e-12);

    engine.remove_point(2);
    assert_axis_close(engine.reverse(p), AxisPosition::new(101.0, 20.0), 1e-12);

    engine.clear();
    assert_eq!(engine.reverse(p), p);
}

/// Three unsynced points and synced partners whose plane triangle is the
/// unsynced one scaled about its centroid
fn scaled_triangle(scale: f64) -> Vec<(AxisPosition, AxisPosition)> {
    let projector = projector();
    let unsynced = [
        AxisPosition::new(20.0, 30.0),
        AxisPosition::new(60.0, 40.0),
        AxisPosition::new(40.0, 70.0),
    ];
    let planes: Vec<PlanePoint> = unsynced.iter().map(|a| projector.project(*a)).collect();
    let cx = planes.iter().map(|p| p.x).sum::<f64>() / 3.0;
    let cy = planes.iter().map(|p| p.y).sum::<f64>() / 3.0;

    unsynced
        .iter()
        .zip(&planes)
        .map(|(axis, plane)| {
            let synced = axis_near(
                &projector,
                plane,
                (scale - 1.0) * (plane.x - cx),
                (scale - 1.0) * (plane.y - cy),
            );
            (*axis, synced)
        })
        .collect()
}

fn engine_with(pairs: &[(AxisPosition, AxisPosition)]) -> MappingEngine {
    let engine = engine();
    for (n, (unsynced, synced)) in pairs.iter().enumerate() {
        engine.sync_point(*unsynced, *synced, at(n as i64)).unwrap();
    }
    engine
}

#[test]
fn test_three_points_reverse_reproduces_vertices() {
    // The synced triangle encloses the unsynced one, so every unsynced
    // vertex is inside the destination triangle
    let pairs = scaled_triangle(1.1);
    let engine = engine_with(&pairs);
    assert!(engine.is_enabled());

    for (unsynced, synced) in &pairs {
        assert_axis_close(engine.reverse(*unsynced), *synced, 1e-9);
        assert_eq!(engine.last_selected_point_id(), None);
    }
}

#[test]
fn test_three_points_forward_reproduces_vertices() {
    let pairs = scaled_triangle(0.9);
    let engine = engine_with(&pairs);

    for (unsynced, synced) in &pairs {
        assert_axis_close(engine.forward(*synced), *unsynced, 1e-9);
        assert_eq!(engine.last_selected_point_id(), None);
    }
}

#[test]
fn test_three_points_vertices_both_ways() {
    // Whichever branch is taken, each vertex maps onto its partner
    let pairs = scaled_triangle(1.05);
    let engine = engine_with(&pairs);

    for (unsynced, synced) in &pairs {
        assert_axis_close(engine.reverse(*unsynced), *synced, 1e-9);
        assert_axis_close(engine.forward(*synced), *unsynced, 1e-9);
    }
}

#[test]
fn test_interior_query_is_interpolated() {
    let pairs = scaled_triangle(1.1);
    let engine = engine_with(&pairs);

    let projector = projector();
    let planes: Vec<PlanePoint> = pairs.iter().map(|(u, _)| projector.project(*u)).collect();
    let centre = planes[0].with_xy(
        planes.iter().map(|p| p.x).sum::<f64>() / 3.0,
        planes.iter().map(|p| p.y).sum::<f64>() / 3.0,
    );
    let query = projector.unproject(&centre, &planes[0]);

    // The centroid is a fixed point of a scaling about the centroid
    assert_axis_close(engine.reverse(query), query, 1e-9);
    assert_eq!(engine.last_selected_point_id(), None);
    assert_eq!(engine.report().selected_ids, vec![1, 2, 3]);
}

fn five_points() -> Vec<(AxisPosition, AxisPosition)> {
    vec![
        (AxisPosition::new(20.0, 30.0), AxisPosition::new(20.4, 30.1)),
        (AxisPosition::new(60.0, 40.0), AxisPosition::new(60.3, 39.8)),
        (AxisPosition::new(40.0, 70.0), AxisPosition::new(40.5, 70.2)),
        (AxisPosition::new(100.0, 20.0), AxisPosition::new(100.2, 20.3)),
        (AxisPosition::new(140.0, 50.0), AxisPosition::new(139.6, 50.1)),
    ]
}

#[test]
fn test_outside_query_matches_nearest_only() {
    let triangulating = engine_with(&five_points());
    let nearest = MappingEngine::new(AlignmentConfig {
        alignment_mode: AlignmentMode::NearestOnly,
        ..config()
    })
    .unwrap();
    for (n, (unsynced, synced)) in five_points().iter().enumerate() {
        nearest.sync_point(*unsynced, *synced, at(n as i64)).unwrap();
    }

    // East of the meridian, and below the northern horizon: every
    // calibration point is west of the meridian and above the horizon
    for query in [AxisPosition::new(300.0, 30.0), AxisPosition::new(170.0, -20.0)] {
        assert_eq!(triangulating.reverse(query), nearest.reverse(query));
        assert_eq!(triangulating.forward(query), nearest.forward(query));
        assert_eq!(
            triangulating.last_selected_point_id(),
            nearest.last_selected_point_id()
        );
        assert!(triangulating.last_selected_point_id().is_some());
    }
}

#[test]
fn test_degenerate_triple_falls_back() {
    let engine = engine();
    // On the meridian south of the zenith these project onto one line
    for (n, dec) in [10.0, 20.0, 30.0].into_iter().enumerate() {
        engine
            .sync_point(
                AxisPosition::new(0.0, dec),
                AxisPosition::new(0.5, dec),
                at(n as i64),
            )
            .unwrap();
    }
    assert_eq!(engine.point_count(), 3);
    assert!(!engine.is_enabled());
    assert_eq!(engine.active_triple(), None);

    // Queries stay total: nearest point translation
    let out = engine.reverse(AxisPosition::new(0.0, 21.0));
    assert_axis_close(out, AxisPosition::new(0.5, 21.0), 1e-12);
    assert_eq!(engine.last_selected_point_id(), Some(2));

    // A fourth, non-collinear point does not change the first triple
    engine
        .sync_point(AxisPosition::new(60.0, 40.0), AxisPosition::new(60.5, 40.0), at(3))
        .unwrap();
    assert!(!engine.is_enabled());

    // Removing a collinear point gives a valid triple
    engine.remove_point(1);
    assert!(engine.is_enabled());
    assert_eq!(engine.active_triple(), Some([2, 3, 4]));
}

/// Three syncs straddling RA axis `ra`, each corrected by +0.5 degrees RA
fn straddling(ra: f64) -> MappingEngine {
    let engine = engine();
    for (n, (dra, dec)) in [(-5.0, 20.0), (5.0, 20.0), (0.0, 40.0)].into_iter().enumerate() {
        let unsynced = AxisPosition::new(range360(ra + dra), dec);
        let synced = AxisPosition::new(range360(ra + dra + 0.5), dec);
        engine.sync_point(unsynced, synced, at(n as i64)).unwrap();
    }
    engine
}

#[test]
fn test_correction_across_ra_axis_180_keeps_pier_side() {
    let engine = straddling(180.0);
    for ra in [179.0, 179.6, 179.8] {
        let out = engine.reverse(AxisPosition::new(ra, 28.0));
        let expected = AxisPosition::new(ra + 0.5, 28.0);
        assert!(axis_distance(&out, &expected) < 0.05, "{} -> {}", ra, out);
    }
}

#[test]
fn test_correction_across_ra_axis_0_keeps_pier_side() {
    let engine = straddling(0.0);
    for ra in [359.0, 359.6, 359.8] {
        let out = engine.reverse(AxisPosition::new(ra, 28.0));
        let expected = AxisPosition::new(range360(ra + 0.5), 28.0);
        assert!(axis_distance(&out, &expected) < 0.05, "{} -> {}", ra, out);

        let back = engine.forward(expected);
        assert!(axis_distance(&back, &AxisPosition::new(ra, 28.0)) < 0.05, "{} -> {}", expected, back);
    }
}
