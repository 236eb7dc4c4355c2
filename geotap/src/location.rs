//! Location fixes and the sensor seams that produce them.
//!
//! The crate does not talk to positioning hardware itself. The host
//! application feeds [`LocationFix`]es into the
//! [`LocationOverlay`](crate::layer::location::LocationOverlay) and provides
//! a [`HeadingSource`] wrapping whatever orientation sensor the platform has.

use geotap_types::geo::GeoPoint2d;
use maybe_sync::{MaybeSend, MaybeSync};

/// A single reported location sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationFix {
    position: GeoPoint2d,
    accuracy: f64,
    bearing: f64,
}

impl LocationFix {
    /// Creates a fix without bearing information.
    pub fn new(position: GeoPoint2d, accuracy: f64) -> Self {
        Self {
            position,
            accuracy,
            bearing: f64::NAN,
        }
    }

    /// Sets the bearing of the fix in degrees clockwise from north.
    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = bearing;
        self
    }

    /// Geographic position of the fix.
    pub fn position(&self) -> GeoPoint2d {
        self.position
    }

    /// Accuracy radius of the fix in meters.
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Bearing in degrees clockwise from north. `NaN` if the fix has no
    /// bearing information.
    pub fn bearing(&self) -> f64 {
        self.bearing
    }

    /// Returns true if the fix carries bearing information.
    pub fn has_bearing(&self) -> bool {
        !self.bearing.is_nan()
    }
}

/// Source of compass heading data.
///
/// The sensor is expected to be off until [`HeadingSource::enable`] is
/// called, and implementations should stop consuming power after
/// [`HeadingSource::disable`].
pub trait HeadingSource: MaybeSend + MaybeSync {
    /// Starts the underlying sensor.
    ///
    /// Returns `false` if the platform cannot provide heading data.
    fn enable(&self) -> bool;

    /// Stops the underlying sensor.
    fn disable(&self);

    /// Returns true if the sensor is currently running.
    fn is_enabled(&self) -> bool;

    /// Last reported heading in degrees clockwise from north.
    ///
    /// `NaN` while the sensor is off or has not produced a reading yet.
    fn heading(&self) -> f64;
}

/// [`HeadingSource`] with a controllable state. Used for tests.
#[cfg(feature = "_tests")]
pub struct TestHeadingSource {
    state: parking_lot::Mutex<TestHeadingState>,
}

#[cfg(feature = "_tests")]
struct TestHeadingState {
    enabled: bool,
    heading: f64,
}

#[cfg(feature = "_tests")]
impl TestHeadingSource {
    /// Creates a disabled source that will report the given heading.
    pub fn new(heading: f64) -> Self {
        Self {
            state: parking_lot::Mutex::new(TestHeadingState {
                enabled: false,
                heading,
            }),
        }
    }

    /// Changes the heading the source reports.
    pub fn set_heading(&self, heading: f64) {
        self.state.lock().heading = heading;
    }
}

#[cfg(feature = "_tests")]
impl HeadingSource for TestHeadingSource {
    fn enable(&self) -> bool {
        self.state.lock().enabled = true;
        true
    }

    fn disable(&self) {
        self.state.lock().enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    fn heading(&self) -> f64 {
        let state = self.state.lock();
        if state.enabled {
            state.heading
        } else {
            f64::NAN
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geotap_types::latlon;

    #[test]
    fn fix_without_bearing() {
        let fix = LocationFix::new(latlon!(10.0, 20.0), 15.0);
        assert!(!fix.has_bearing());
        assert!(fix.bearing().is_nan());
    }

    #[test]
    fn fix_with_bearing() {
        let fix = LocationFix::new(latlon!(10.0, 20.0), 15.0).with_bearing(90.0);
        assert!(fix.has_bearing());
        assert_eq!(fix.bearing(), 90.0);
    }
}
