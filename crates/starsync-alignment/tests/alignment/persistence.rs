use starsync_alignment::{AlignmentRecord, MappingEngine};
use starsync_core::AxisPosition;

use super::support::{at, config, engine};

fn calibrated() -> MappingEngine {
    let engine = engine();
    for (n, (ra, dec)) in [(20.0, 30.0), (60.0, 40.0), (40.0, 70.0), (100.0, 20.0)]
        .into_iter()
        .enumerate()
    {
        engine
            .sync_point(
                AxisPosition::new(ra, dec),
                AxisPosition::new(ra + 0.25, dec - 0.1),
                at(n as i64),
            )
            .unwrap();
    }
    engine
}

#[test]
fn test_records_survive_json() {
    let original = calibrated();
    let json = serde_json::to_string_pretty(&original.records()).unwrap();
    let records: Vec<AlignmentRecord> = serde_json::from_str(&json).unwrap();

    let restored = MappingEngine::new(config()).unwrap();
    let ids = restored.load_all(&records).unwrap();
    assert_eq!(ids, vec![1, 2, 3, 4]);
    assert_eq!(restored.records(), original.records());
    assert!(restored.is_enabled());
    assert_eq!(restored.active_triple(), original.active_triple());

    for query in [AxisPosition::new(45.0, 45.0), AxisPosition::new(90.0, 25.0)] {
        assert_eq!(restored.reverse(query), original.reverse(query));
        assert_eq!(restored.forward(query), original.forward(query));
    }
}

#[test]
fn test_load_replaces_existing_points() {
    let engine = calibrated();
    let records = vec![
        AlignmentRecord::new(9, at(0), AxisPosition::new(10.0, 10.0), AxisPosition::new(10.5, 10.0)),
        AlignmentRecord::new(9, at(1), AxisPosition::new(50.0, 10.0), AxisPosition::new(50.5, 10.0)),
    ];

    let ids = engine.load_all(&records).unwrap();
    assert_eq!(ids, vec![9, 10]);
    assert_eq!(engine.point_count(), 2);
    assert!(!engine.is_enabled());
    assert_eq!(engine.active_triple(), None);

    // Fallback follows the last record
    let p = AxisPosition::new(100.0, 40.0);
    assert_eq!(engine.reverse(p), AxisPosition::new(100.5, 40.0));

    // New syncs continue after the largest id
    let id = engine
        .sync_point(AxisPosition::new(90.0, 60.0), AxisPosition::new(90.0, 60.0), at(2))
        .unwrap();
    assert_eq!(id, 11);
}

#[test]
fn test_load_rejects_non_finite_records() {
    let engine = calibrated();
    let records = vec![AlignmentRecord {
        id: 1,
        timestamp: at(0),
        unsynced: AxisPosition { ra: f64::INFINITY, dec: 0.0 },
        synced: AxisPosition::new(0.0, 0.0),
    }];

    assert!(engine.load_all(&records).is_err());
    assert_eq!(engine.point_count(), 4);
}

#[test]
fn test_record_without_id_is_assigned_one() {
    let json = r#"[{
        "timestamp": "2026-03-01T21:15:00Z",
        "unsynced": { "ra": 30.0, "dec": 40.0 },
        "synced": { "ra": 30.2, "dec": 40.1 }
    }]"#;
    let records: Vec<AlignmentRecord> = serde_json::from_str(json).unwrap();
    assert_eq!(records[0].id, 0);

    let engine = engine();
    assert_eq!(engine.load_all(&records).unwrap(), vec![1]);
}

#[test]
fn test_largest_possible_id_loads() {
    let engine = engine();
    let records = vec![
        AlignmentRecord::new(u32::MAX, at(0), AxisPosition::new(10.0, 10.0), AxisPosition::new(10.5, 10.0)),
        AlignmentRecord::new(0, at(1), AxisPosition::new(50.0, 10.0), AxisPosition::new(50.5, 10.0)),
    ];

    assert_eq!(engine.load_all(&records).unwrap(), vec![u32::MAX, 1]);
    let id = engine
        .sync_point(AxisPosition::new(90.0, 60.0), AxisPosition::new(90.0, 60.0), at(2))
        .unwrap();
    assert_eq!(id, 2);
    assert!(engine.points().iter().all(|p| p.id > 0));
}
