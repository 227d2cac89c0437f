use starsync_core::{
    AxisKinematics, AxisPosition, EquatorialKinematics, HorizonPosition, KinematicsError, Site,
};

const LATITUDE: f64 = 52.6683333333333;
const LONGITUDE: f64 = -1.33888888888889;

fn kinematics() -> EquatorialKinematics {
    EquatorialKinematics::new(Site::new(LATITUDE, LONGITUDE).unwrap())
}

fn assert_close(a: f64, b: f64, tolerance: f64) {
    assert!((a - b).abs() < tolerance, "{} vs {}", a, b);
}

#[test]
fn test_site_rejects_bad_values() {
    assert_eq!(
        Site::new(-91.0, 0.0),
        Err(KinematicsError::LatitudeOutOfRange { latitude: -91.0 })
    );
    assert!(matches!(
        Site::new(10.0, f64::INFINITY),
        Err(KinematicsError::NonFinite { .. })
    ));
    assert!(Site::new(-33.0, 151.0).unwrap().is_southern());
}

#[test]
fn test_celestial_equator_on_meridian() {
    let h = kinematics().axis_to_horizon(AxisPosition::new(0.0, 0.0));
    assert_close(h.azimuth, 180.0, 1e-9);
    assert_close(h.altitude, 90.0 - LATITUDE, 1e-9);
}

#[test]
fn test_pole_altitude_is_latitude() {
    let h = kinematics().axis_to_horizon(AxisPosition::new(30.0, 90.0));
    assert_close(h.altitude, LATITUDE, 1e-9);
}

#[test]
fn test_low_side_round_trip() {
    let k = kinematics();
    let axis = AxisPosition::new(45.0, 20.0);
    assert!(!k.is_high_side(axis));
    let back = k.horizon_to_axis_near(k.axis_to_horizon(axis), axis);
    assert_close(back.ra, axis.ra, 1e-9);
    assert_close(back.dec, axis.dec, 1e-9);
}

#[test]
fn test_high_side_round_trip() {
    let k = kinematics();
    let axis = AxisPosition::new(200.0, 40.0);
    assert!(k.is_high_side(axis));
    let back = k.horizon_to_axis_near(k.axis_to_horizon(axis), axis);
    assert_close(back.ra, axis.ra, 1e-9);
    assert_close(back.dec, axis.dec, 1e-9);
}

#[test]
fn test_reference_picks_the_pier_side() {
    let k = kinematics();
    let horizon = k.axis_to_horizon(AxisPosition::new(180.1, 28.0));
    let low = k.horizon_to_axis_near(horizon, AxisPosition::new(179.6, 28.0));
    let high = k.horizon_to_axis_near(horizon, AxisPosition::new(0.0, 150.0));
    assert_close(low.ra, 180.1, 1e-9);
    assert_close(low.dec, 28.0, 1e-9);
    assert_close(high.ra, 0.1, 1e-9);
    assert_close(high.dec, 152.0, 1e-9);
}

#[test]
fn test_flip_is_an_involution() {
    let k = kinematics();
    let axis = AxisPosition::new(75.0, 30.0);
    let flipped = k.flip(axis);
    assert_eq!(flipped, AxisPosition::new(255.0, 150.0));
    assert_eq!(k.flip(flipped), axis);
}

#[test]
fn test_set_site_changes_conversion() {
    let mut k = kinematics();
    let before = k.axis_to_horizon(AxisPosition::new(0.0, 0.0));
    k.set_site(Site::new(-LATITUDE, LONGITUDE).unwrap());
    let after = k.axis_to_horizon(AxisPosition::new(0.0, 0.0));
    assert_eq!(k.site().latitude, -LATITUDE);
    assert_close(before.altitude, after.altitude, 1e-9);
    // The equator culminates to the north south of the equator
    assert_close(after.azimuth, 0.0, 1e-9);
}

#[test]
fn test_horizon_display() {
    let h = HorizonPosition::new(180.0, 45.5);
    assert_eq!(h.to_string(), "Az 180.000000°, Alt 45.500000°");
}
