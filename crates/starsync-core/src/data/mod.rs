//! Coordinate data models.
//!
//! Axis positions, local horizon positions, and the planar projection
//! the alignment geometry works in. All angles are degrees.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// Two-axis mount coordinate in degrees
///
/// `ra` is the right ascension (polar) axis angle and `dec` the
/// declination axis angle, as reported by the mount encoders.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisPosition {
    /// RA axis angle
    pub ra: f64,
    /// Dec axis angle
    pub dec: f64,
}

impl AxisPosition {
    /// Create an axis position
    pub fn new(ra: f64, dec: f64) -> Self {
        debug_assert!(
            ra.is_finite() && dec.is_finite(),
            "AxisPosition axes must be finite: ra={ra}, dec={dec}"
        );
        Self { ra, dec }
    }

    /// Squared distance in raw axis space
    pub fn squared_distance(&self, other: &AxisPosition) -> f64 {
        let dra = self.ra - other.ra;
        let ddec = self.dec - other.dec;
        dra * dra + ddec * ddec
    }

    /// Whether both axes are finite numbers
    pub fn is_finite(&self) -> bool {
        self.ra.is_finite() && self.dec.is_finite()
    }
}

impl Add for AxisPosition {
    type Output = AxisPosition;

    fn add(self, rhs: AxisPosition) -> AxisPosition {
        AxisPosition {
            ra: self.ra + rhs.ra,
            dec: self.dec + rhs.dec,
        }
    }
}

impl Sub for AxisPosition {
    type Output = AxisPosition;

    fn sub(self, rhs: AxisPosition) -> AxisPosition {
        AxisPosition {
            ra: self.ra - rhs.ra,
            dec: self.dec - rhs.dec,
        }
    }
}

impl Neg for AxisPosition {
    type Output = AxisPosition;

    fn neg(self) -> AxisPosition {
        AxisPosition {
            ra: -self.ra,
            dec: -self.dec,
        }
    }
}

impl fmt::Display for AxisPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RA {:.6}°, Dec {:.6}°", self.ra, self.dec)
    }
}

/// Local horizon coordinate in degrees
///
/// Azimuth runs from north through east, altitude is positive above
/// the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HorizonPosition {
    /// Azimuth, north = 0, east = 90
    pub azimuth: f64,
    /// Altitude above the horizon
    pub altitude: f64,
}

impl HorizonPosition {
    /// Create a horizon position
    pub fn new(azimuth: f64, altitude: f64) -> Self {
        Self { azimuth, altitude }
    }
}

impl fmt::Display for HorizonPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Az {:.6}°, Alt {:.6}°", self.azimuth, self.altitude)
    }
}

/// Quadrant of a plane point, used by the local quadrant filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quadrant {
    /// x >= 0, y >= 0
    First,
    /// x >= 0, y < 0
    Second,
    /// x < 0, y >= 0
    Third,
    /// x < 0, y < 0
    Fourth,
}

/// Cartesian projection of an axis position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanePoint {
    /// Plane x
    pub x: f64,
    /// Plane y
    pub y: f64,
    /// Third coordinate used by direction-cosine transforms, always 1 on projection
    pub z: f64,
    /// Sign of the projected radius, +1 or -1
    pub radius_sign: f64,
    /// A zero radius was replaced by 1 during projection
    pub zero_guarded: bool,
    /// Source axis position was on the far side of the meridian
    pub high_side: bool,
}

impl PlanePoint {
    /// Create a plane point on the z = 1 plane with a positive radius
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 1.0,
            radius_sign: 1.0,
            zero_guarded: false,
            high_side: false,
        }
    }

    /// Copy of this point with new planar coordinates, keeping the
    /// radius sign, guard and meridian flags
    pub fn with_xy(&self, x: f64, y: f64) -> Self {
        Self { x, y, ..*self }
    }

    /// Squared planar distance
    pub fn squared_distance(&self, other: &PlanePoint) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Quadrant containing this point
    pub fn quadrant(&self) -> Quadrant {
        match (self.x >= 0.0, self.y >= 0.0) {
            (true, true) => Quadrant::First,
            (true, false) => Quadrant::Second,
            (false, true) => Quadrant::Third,
            (false, false) => Quadrant::Fourth,
        }
    }

    /// Whether `other` lies on the same side of the x axis
    pub fn same_pier_side(&self, other: &PlanePoint) -> bool {
        self.y * other.y >= 0.0
    }
}

impl Default for PlanePoint {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Sub for PlanePoint {
    type Output = PlaneVector;

    fn sub(self, rhs: PlanePoint) -> PlaneVector {
        PlaneVector {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl fmt::Display for PlanePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}

/// Difference between two plane points
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaneVector {
    /// x component
    pub x: f64,
    /// y component
    pub y: f64,
    /// z component
    pub z: f64,
}
