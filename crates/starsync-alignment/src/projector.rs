//! Coordinate projector
//!
//! Maps axis positions into the planar geometry used for triangulation
//! and back. The axis position goes through the mount kinematics to
//! azimuth/altitude, then is embedded polarly: the angle is the azimuth
//! measured from the reference azimuth, the radius is the zenith
//! distance. Every projected point sits on the z = 1 plane.

use std::f64::consts::{FRAC_PI_2, PI};

use starsync_core::angles::range360;
use starsync_core::{
    AxisKinematics, AxisPosition, EquatorialKinematics, HorizonPosition, PlanePoint, Site,
};

/// Azimuth that maps to plane angle 0 (due south)
pub const REFERENCE_AZIMUTH: f64 = 180.0;

/// Altitude that maps to plane radius 0 (the zenith)
pub const REFERENCE_ALTITUDE: f64 = 90.0;

/// Converts axis positions to and from plane points
#[derive(Debug)]
pub struct CoordinateProjector {
    kinematics: Box<dyn AxisKinematics>,
}

impl CoordinateProjector {
    /// Create a projector over the given kinematics
    pub fn new(kinematics: Box<dyn AxisKinematics>) -> Self {
        Self { kinematics }
    }

    /// Create a projector for a German equatorial mount at `site`
    pub fn equatorial(site: Site) -> Self {
        Self::new(Box::new(EquatorialKinematics::new(site)))
    }

    /// The underlying kinematics
    pub fn kinematics(&self) -> &dyn AxisKinematics {
        self.kinematics.as_ref()
    }

    /// Current site
    pub fn site(&self) -> Site {
        self.kinematics.site()
    }

    /// Change the site; existing projections become stale
    pub fn set_site(&mut self, site: Site) {
        self.kinematics.set_site(site);
    }

    /// Project an axis position onto the plane
    pub fn project(&self, axis: AxisPosition) -> PlanePoint {
        let horizon = self.kinematics.axis_to_horizon(axis);
        let mut plane = horizon_to_plane(horizon);
        plane.high_side = self.kinematics.is_high_side(axis);
        plane
    }

    /// Recover the primary axis solution for a plane point
    ///
    /// `reference` is the projection the plane point was derived from; it
    /// supplies the radius sign lost by squaring and the zero-radius guard.
    pub fn unproject(&self, plane: &PlanePoint, reference: &PlanePoint) -> AxisPosition {
        self.kinematics
            .horizon_to_axis(plane_to_horizon(plane, reference))
    }

    /// Recover the axis solution for a plane point closest to `near`
    ///
    /// A sky position has two mount solutions on opposite sides of the
    /// pier; a mapped position keeps to the side of the position it was
    /// mapped from, even when the correction carries it across RA axis
    /// 0 or 180.
    pub fn unproject_near(
        &self,
        plane: &PlanePoint,
        reference: &PlanePoint,
        near: AxisPosition,
    ) -> AxisPosition {
        self.kinematics
            .horizon_to_axis_near(plane_to_horizon(plane, reference), near)
    }
}

/// Polar embedding of a horizon position
pub fn horizon_to_plane(horizon: HorizonPosition) -> PlanePoint {
    let theta = range360(horizon.azimuth - REFERENCE_AZIMUTH).to_radians();

    let mut radius = REFERENCE_ALTITUDE - horizon.altitude;
    let zero_guarded = radius == 0.0;
    if zero_guarded {
        radius = 1.0;
    }

    PlanePoint {
        x: theta.cos() * radius,
        y: theta.sin() * radius,
        z: 1.0,
        radius_sign: if radius > 0.0 { 1.0 } else { -1.0 },
        zero_guarded,
        high_side: false,
    }
}

/// Inverse of [`horizon_to_plane`]
pub fn plane_to_horizon(plane: &PlanePoint, reference: &PlanePoint) -> HorizonPosition {
    let radius = if reference.zero_guarded {
        0.0
    } else {
        plane.x.hypot(plane.y) * reference.radius_sign
    };

    let mut angle = polar_angle(plane.x, plane.y).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    if reference.radius_sign < 0.0 {
        angle = range360(angle + 180.0);
    }

    HorizonPosition::new(
        range360(angle + REFERENCE_AZIMUTH),
        REFERENCE_ALTITUDE - radius,
    )
}

/// Angle of (x, y) in radians, with the origin mapped to 0
fn polar_angle(x: f64, y: f64) -> f64 {
    if x > 0.0 {
        (y / x).atan()
    } else if x < 0.0 {
        if y >= 0.0 {
            (y / x).atan() + PI
        } else {
            (y / x).atan() - PI
        }
    } else if y > 0.0 {
        FRAC_PI_2
    } else if y < 0.0 {
        -FRAC_PI_2
    } else {
        0.0
    }
}
