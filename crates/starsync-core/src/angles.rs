//! Angle helpers
//!
//! Range normalization and great-circle separation, all in degrees.

use crate::data::AxisPosition;

/// Normalize an angle into [0, 360)
pub fn range360(angle: f64) -> f64 {
    let r = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

/// Normalize an angle into [-180, 180)
pub fn range180(angle: f64) -> f64 {
    range360(angle + 180.0) - 180.0
}

/// Great-circle separation between two axis positions
///
/// The RA axis is treated as longitude and the Dec axis as latitude.
/// Dec axis values past the pole are valid and land on the far
/// hemisphere of the same sphere. Uses the haversine form so small
/// separations stay accurate.
pub fn angular_separation(a: &AxisPosition, b: &AxisPosition) -> f64 {
    let lat1 = a.dec.to_radians();
    let lat2 = b.dec.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.ra - a.ra).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    (2.0 * h.sqrt().asin()).to_degrees()
}

/// Distance in raw axis space with the RA difference wrapped into
/// [-180, 180)
///
/// Unlike [`angular_separation`] this tells apart the two mount
/// solutions for one sky position.
pub fn axis_distance(a: &AxisPosition, b: &AxisPosition) -> f64 {
    range180(a.ra - b.ra).hypot(a.dec - b.dec)
}
