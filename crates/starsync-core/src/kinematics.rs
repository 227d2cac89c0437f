//! Axis kinematics
//!
//! Conversion between two-axis mount coordinates and local horizon
//! coordinates. The alignment engine treats this as a black box through
//! the [`AxisKinematics`] trait; [`EquatorialKinematics`] is the German
//! equatorial implementation used by default.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::angles::{axis_distance, range360};
use crate::data::{AxisPosition, HorizonPosition};
use crate::error::KinematicsError;

/// Observing site
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Site {
    /// Latitude in degrees, north positive
    pub latitude: f64,
    /// Longitude in degrees, east positive
    pub longitude: f64,
}

impl Site {
    /// Create a validated site
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, KinematicsError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(KinematicsError::LatitudeOutOfRange { latitude });
        }
        if !longitude.is_finite() {
            return Err(KinematicsError::NonFinite {
                what: format!("longitude {}", longitude),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Whether the site is south of the equator
    pub fn is_southern(&self) -> bool {
        self.latitude < 0.0
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat {:.6}°, lon {:.6}°", self.latitude, self.longitude)
    }
}

/// Mount-specific conversion between axis and horizon coordinates
pub trait AxisKinematics: Send + Sync + fmt::Debug {
    /// Convert an axis position to azimuth/altitude
    fn axis_to_horizon(&self, axis: AxisPosition) -> HorizonPosition;

    /// Convert azimuth/altitude to the primary (low side) axis solution
    fn horizon_to_axis(&self, horizon: HorizonPosition) -> AxisPosition;

    /// Whether the axis position is on the far side of the meridian
    fn is_high_side(&self, axis: AxisPosition) -> bool;

    /// The other axis solution pointing at the same place in the sky
    fn flip(&self, axis: AxisPosition) -> AxisPosition;

    /// Update the observing site
    fn set_site(&mut self, site: Site);

    /// Current observing site
    fn site(&self) -> Site;

    /// Convert azimuth/altitude to whichever axis solution lies closest
    /// to `near` in axis space
    fn horizon_to_axis_near(&self, horizon: HorizonPosition, near: AxisPosition) -> AxisPosition {
        let axis = self.horizon_to_axis(horizon);
        let flipped = self.flip(axis);
        if axis_distance(&flipped, &near) < axis_distance(&axis, &near) {
            flipped
        } else {
            axis
        }
    }
}

/// German equatorial mount kinematics
///
/// The RA axis angle is the hour angle of the low side solution. Dec axis
/// angles past +/-90 describe the through-the-pole orientation, which is
/// folded back onto hour angle + 180. South of the equator the Dec axis
/// runs opposite to declination.
#[derive(Debug, Clone, PartialEq)]
pub struct EquatorialKinematics {
    site: Site,
}

impl EquatorialKinematics {
    /// Create kinematics for the given site
    pub fn new(site: Site) -> Self {
        Self { site }
    }

    /// Create kinematics from a latitude, validating its range
    pub fn from_latitude(latitude: f64) -> Result<Self, KinematicsError> {
        Ok(Self::new(Site::new(latitude, 0.0)?))
    }

    /// Rotation from the equatorial frame (x toward the meridian on the
    /// equator, z toward the pole) into the horizon frame (x south, z zenith)
    fn rotation(&self) -> Matrix3<f64> {
        let (s, c) = self.site.latitude.to_radians().sin_cos();
        Matrix3::new(s, 0.0, -c, 0.0, 1.0, 0.0, c, 0.0, s)
    }

    /// Hour angle and declination to horizon coordinates
    pub fn hadec_to_horizon(&self, hour_angle: f64, declination: f64) -> HorizonPosition {
        let (sh, ch) = hour_angle.to_radians().sin_cos();
        let (sd, cd) = declination.to_radians().sin_cos();
        let h = self.rotation() * Vector3::new(cd * ch, cd * sh, sd);

        let altitude = h.z.atan2(h.x.hypot(h.y)).to_degrees();
        let azimuth = range360(h.y.atan2(h.x).to_degrees() + 180.0);
        HorizonPosition::new(azimuth, altitude)
    }

    /// Horizon coordinates to hour angle [0, 360) and declination
    pub fn horizon_to_hadec(&self, horizon: HorizonPosition) -> (f64, f64) {
        let (sa, ca) = (horizon.azimuth - 180.0).to_radians().sin_cos();
        let (se, ce) = horizon.altitude.to_radians().sin_cos();
        let e = self.rotation().transpose() * Vector3::new(ce * ca, ce * sa, se);

        let declination = e.z.atan2(e.x.hypot(e.y)).to_degrees();
        let hour_angle = range360(e.y.atan2(e.x).to_degrees());
        (hour_angle, declination)
    }
}

impl Default for EquatorialKinematics {
    fn default() -> Self {
        Self::new(Site::default())
    }
}

impl AxisKinematics for EquatorialKinematics {
    fn axis_to_horizon(&self, axis: AxisPosition) -> HorizonPosition {
        let (hour_angle, mut declination) = if axis.dec > 90.0 {
            (axis.ra + 180.0, 180.0 - axis.dec)
        } else if axis.dec < -90.0 {
            (axis.ra + 180.0, -180.0 - axis.dec)
        } else {
            (axis.ra, axis.dec)
        };
        if self.site.is_southern() {
            declination = -declination;
        }
        self.hadec_to_horizon(range360(hour_angle), declination)
    }

    fn horizon_to_axis(&self, horizon: HorizonPosition) -> AxisPosition {
        let (hour_angle, mut declination) = self.horizon_to_hadec(horizon);
        if self.site.is_southern() {
            declination = -declination;
        }
        if hour_angle > 180.0 {
            AxisPosition::new(range360(hour_angle + 180.0), 180.0 - declination)
        } else {
            AxisPosition::new(hour_angle, declination)
        }
    }

    fn is_high_side(&self, axis: AxisPosition) -> bool {
        range360(axis.ra) > 180.0
    }

    fn flip(&self, axis: AxisPosition) -> AxisPosition {
        AxisPosition::new(range360(axis.ra + 180.0), 180.0 - axis.dec)
    }

    fn set_site(&mut self, site: Site) {
        self.site = site;
    }

    fn site(&self) -> Site {
        self.site
    }
}
