//! Overlay that tracks and renders the device location on top of the map.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use geotap_types::cartesian::Point2d;
use geotap_types::geo::GeoPoint;
use maybe_sync::{MaybeSend, MaybeSync};
use nalgebra::{Matrix3, Rotation2, Translation2, Vector2};
use parking_lot::{Mutex, RwLock};
use web_time::SystemTime;

use crate::decoded_image::DecodedImage;
use crate::layer::Layer;
use crate::location::{HeadingSource, LocationFix};
use crate::map::Map;
use crate::messenger::Messenger;
use crate::render::{Canvas, CirclePaint, ImagePaint, LineCap, LinePaint};
use crate::view::MapView;
use crate::Color;

mod marker;

pub use marker::MarkerStyle;

use marker::FRAME_COUNT;

/// Minimum time between marker animation frame changes.
const FRAME_INTERVAL: Duration = Duration::from_millis(500);
/// The marker artwork points northeast in its source orientation.
const MARKER_ROTATION_OFFSET: f64 = -45.0;
/// Duration of the recenter animation in follow mode.
const FOLLOW_ANIMATION_DURATION: Duration = Duration::from_millis(500);

const ROSE_CENTER: Point2d = Point2d::new(40.0, 40.0);
const ROSE_RADIUS: f64 = 24.0;

/// Callback invoked by [`LocationOverlay`] on every location update.
pub trait LocationChangedListener: MaybeSend + MaybeSync {
    /// Called after the overlay has processed the location update.
    fn location_changed(&self, fix: &LocationFix);
}

impl<T: Fn(&LocationFix)> LocationChangedListener for T
where
    T: MaybeSend + MaybeSync,
{
    fn location_changed(&self, fix: &LocationFix) {
        self(fix)
    }
}

struct AnimationState {
    cycle: usize,
    frame: Option<Arc<DecodedImage>>,
    last_advance: SystemTime,
}

/// A [`Layer`] that renders the device location, with optional directional
/// animation, accuracy visualization and map recentering.
///
/// With all toggles off the overlay draws the default location dot at the
/// last reported fix. Enabling `direction` replaces the dot with a rotating
/// four-frame marker oriented by the [`HeadingSource`]; enabling `accuracy`
/// adds a translucent circle sized to the fix's accuracy radius; enabling
/// `follow` recenters the map on every location update.
///
/// The overlay is usually shared between the map and the host:
///
/// ```no_run
/// # use std::sync::Arc;
/// # use parking_lot::RwLock;
/// # fn wire(mut map: geotap::Map, overlay: geotap::layer::LocationOverlay) {
/// let overlay = Arc::new(RwLock::new(overlay));
/// map.layers_mut().push(overlay.clone());
/// overlay.write().enable_direction();
/// # }
/// ```
pub struct LocationOverlay {
    heading_source: Arc<dyn HeadingSource>,
    style: MarkerStyle,
    fix: RwLock<Option<LocationFix>>,
    animation: Mutex<AnimationState>,

    accuracy_enabled: bool,
    compass_enabled: bool,
    direction_enabled: bool,
    follow_enabled: bool,

    listener: Option<Box<dyn LocationChangedListener>>,
    messenger: Option<Box<dyn Messenger>>,
}

impl LocationOverlay {
    /// Creates an overlay with all toggles off and no location fix.
    pub fn new(style: MarkerStyle, heading_source: Arc<dyn HeadingSource>) -> Self {
        Self {
            heading_source,
            style,
            fix: RwLock::new(None),
            animation: Mutex::new(AnimationState {
                cycle: 0,
                frame: None,
                last_advance: SystemTime::UNIX_EPOCH,
            }),
            accuracy_enabled: false,
            compass_enabled: false,
            direction_enabled: false,
            follow_enabled: false,
            listener: None,
            messenger: None,
        }
    }

    /// Sets the location changed listener during construction.
    pub fn with_listener(mut self, listener: impl LocationChangedListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Sets the listener invoked on every location update, replacing the
    /// previous one.
    pub fn set_location_changed_listener(
        &mut self,
        listener: impl LocationChangedListener + 'static,
    ) {
        self.listener = Some(Box::new(listener));
    }

    /// Enable drawing the accuracy of the current location.
    pub fn enable_accuracy(&mut self) {
        self.accuracy_enabled = true;
    }

    /// Disable drawing the accuracy of the current location.
    pub fn disable_accuracy(&mut self) {
        self.accuracy_enabled = false;
    }

    /// Check if drawing the accuracy of the current location is enabled.
    pub fn is_accuracy_enabled(&self) -> bool {
        self.accuracy_enabled
    }

    /// Enable the compass rose and the underlying heading sensor.
    ///
    /// Returns `false` if the platform cannot provide heading data.
    pub fn enable_compass(&mut self) -> bool {
        self.compass_enabled = self.heading_source.enable();
        self.compass_enabled
    }

    /// Disable the compass rose and the underlying heading sensor.
    pub fn disable_compass(&mut self) {
        self.heading_source.disable();
        self.compass_enabled = false;
    }

    /// Check if the compass rose is enabled.
    ///
    /// This reflects the explicit compass toggle only. The underlying sensor
    /// may still be running if direction drawing keeps it on.
    pub fn is_compass_enabled(&self) -> bool {
        self.compass_enabled
    }

    /// Enable drawing a directional marker instead of the default dot.
    pub fn enable_direction(&mut self) {
        self.direction_enabled = true;
        // Direction needs heading data. The sensor is enabled directly so
        // that the compass flag is not affected.
        self.heading_source.enable();
    }

    /// Disable drawing the directional marker, showing the default dot
    /// instead.
    pub fn disable_direction(&mut self) {
        self.direction_enabled = false;
        // Turn the sensor off unless the compass was explicitly enabled.
        if !self.compass_enabled {
            self.heading_source.disable();
        }
    }

    /// Check if drawing the directional marker is enabled.
    pub fn is_direction_enabled(&self) -> bool {
        self.direction_enabled
    }

    /// Enable recentering the map on every location update.
    pub fn enable_follow(&mut self) {
        self.follow_enabled = true;
    }

    /// Disable recentering the map on every location update.
    pub fn disable_follow(&mut self) {
        self.follow_enabled = false;
    }

    /// Check if recentering the map on every location update is enabled.
    pub fn is_follow_enabled(&self) -> bool {
        self.follow_enabled
    }

    /// Last location fix reported to the overlay.
    pub fn location(&self) -> Option<LocationFix> {
        *self.fix.read()
    }

    /// Processes a location update from the host's positioning source.
    ///
    /// Stores the fix, recenters the map if follow mode is on, and then
    /// notifies the location changed listener, if any.
    pub fn location_changed(&mut self, fix: LocationFix, map: &mut Map) {
        *self.fix.write() = Some(fix);

        if self.follow_enabled {
            if let Some(target) = map.target_view().with_geo_position(&fix.position()) {
                map.animate_to(target, FOLLOW_ANIMATION_DURATION);
            }
        }

        if let Some(listener) = &self.listener {
            listener.location_changed(&fix);
        }
    }

    fn draw_location(&self, view: &MapView, canvas: &mut dyn Canvas, when: SystemTime) {
        let Some(fix) = *self.fix.read() else {
            return;
        };
        let Some(screen_position) = view.geo_to_screen(&fix.position()) else {
            return;
        };

        if !self.direction_enabled {
            canvas.draw_circle(screen_position, self.style.dot_radius(), self.style.dot_paint());
            return;
        }

        let frame = self.current_frame(when);

        let heading = self.heading_source.heading();
        let heading = if heading.is_nan() { 0.0 } else { heading };
        let rotation = (heading + MARKER_ROTATION_OFFSET).to_radians();
        let transform = marker_transform(&frame, screen_position, rotation);

        // Accuracy is drawn under the marker.
        if self.accuracy_enabled {
            let radius = view.meters_to_pixels(fix.accuracy(), fix.position().lat());
            canvas.draw_circle(screen_position, radius, self.style.accuracy_fill_paint());
            canvas.draw_circle(screen_position, radius, self.style.accuracy_stroke_paint());
        }

        canvas.draw_image(&frame, &transform, ImagePaint { opacity: 255 });

        // Keep the animation going.
        if let Some(messenger) = &self.messenger {
            messenger.request_redraw();
        }
    }

    fn current_frame(&self, when: SystemTime) -> Arc<DecodedImage> {
        let mut state = self.animation.lock();

        let elapsed = when.duration_since(state.last_advance).unwrap_or_default();
        if state.frame.is_none() || elapsed >= FRAME_INTERVAL {
            state.cycle = (state.cycle + 1) % FRAME_COUNT;
            state.frame = Some(self.style.frame(state.cycle));
            state.last_advance = when;
        }

        state.frame.clone().expect("frame was just selected")
    }

    fn draw_compass_rose(&self, canvas: &mut dyn Canvas) {
        // The rose is drawn only when explicitly enabled. Direction mode
        // keeps the sensor running but shows bearing on the marker itself.
        if !self.compass_enabled {
            return;
        }

        let heading = self.heading_source.heading();
        let heading = if heading.is_nan() { 0.0 } else { heading };
        let north = Rotation2::new(-heading.to_radians()) * Vector2::new(0.0, -ROSE_RADIUS);

        canvas.draw_circle(
            ROSE_CENTER,
            ROSE_RADIUS,
            CirclePaint {
                fill: Color::WHITE.with_alpha(160),
                outline: Some(LinePaint {
                    color: Color::GRAY,
                    width: 1.0,
                    line_cap: LineCap::Round,
                }),
            },
        );
        canvas.draw_line(
            ROSE_CENTER,
            ROSE_CENTER + north,
            LinePaint {
                color: Color::RED,
                width: 2.0,
                line_cap: LineCap::Round,
            },
        );
        canvas.draw_line(
            ROSE_CENTER,
            ROSE_CENTER - north,
            LinePaint {
                color: Color::GRAY,
                width: 2.0,
                line_cap: LineCap::Round,
            },
        );
    }
}

/// Builds the screen transform of the marker: rotation about the bitmap
/// center followed by a translation placing the center at the given screen
/// position.
fn marker_transform(frame: &DecodedImage, position: Point2d, rotation: f64) -> Matrix3<f64> {
    let center = Vector2::new(frame.width() as f64 / 2.0, frame.height() as f64 / 2.0);

    let rotate_about_center = Translation2::from(center).to_homogeneous()
        * Rotation2::new(rotation).to_homogeneous()
        * Translation2::from(-center).to_homogeneous();
    let place = Translation2::new(position.x - center.x, position.y - center.y).to_homogeneous();

    place * rotate_about_center
}

impl Layer for LocationOverlay {
    fn render(&self, view: &MapView, canvas: &mut dyn Canvas) {
        let when = SystemTime::now();
        self.draw_location(view, canvas, when);
        self.draw_compass_rose(canvas);
    }

    fn set_messenger(&mut self, messenger: Box<dyn Messenger>) {
        self.messenger = Some(messenger);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use approx::assert_abs_diff_eq;
    use geotap_types::cartesian::Size;
    use geotap_types::latlon;
    use nalgebra::Vector3;

    use super::*;
    use crate::location::TestHeadingSource;
    use crate::render::TestCanvas;

    fn test_frames() -> [DecodedImage; 4] {
        [0u8, 1, 2, 3]
            .map(|i| DecodedImage::from_raw(vec![i; 64], 4, 4).expect("valid buffer length"))
    }

    fn test_overlay() -> (LocationOverlay, Arc<TestHeadingSource>) {
        let heading_source = Arc::new(TestHeadingSource::new(0.0));
        let overlay = LocationOverlay::new(
            MarkerStyle::new(test_frames()),
            heading_source.clone() as Arc<dyn HeadingSource>,
        );
        (overlay, heading_source)
    }

    fn test_view() -> MapView {
        MapView::new(&latlon!(0.0, 0.0), 10.0).with_size(Size::new(200.0, 200.0))
    }

    fn test_map() -> Map {
        Map::new(test_view(), vec![], None)
    }

    fn test_canvas() -> TestCanvas {
        TestCanvas::new(Size::new(200.0, 200.0))
    }

    fn ts(ms: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(10_000 + ms)
    }

    fn fix_at_center() -> LocationFix {
        LocationFix::new(latlon!(0.0, 0.0), 100.0)
    }

    struct CountingMessenger(Arc<AtomicUsize>);

    impl Messenger for CountingMessenger {
        fn request_redraw(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn animation_advances_once_per_interval() {
        let (mut overlay, _) = test_overlay();
        overlay.enable_direction();
        overlay.location_changed(fix_at_center(), &mut test_map());

        let view = test_view();
        let mut cycles = vec![];
        for i in 0..6 {
            overlay.draw_location(&view, &mut test_canvas(), ts(i * 600));
            cycles.push(overlay.animation.lock().cycle);
        }

        assert_eq!(cycles, vec![1, 2, 3, 0, 1, 2]);
    }

    #[test]
    fn animation_is_frozen_within_interval() {
        let (mut overlay, _) = test_overlay();
        overlay.enable_direction();
        overlay.location_changed(fix_at_center(), &mut test_map());

        let view = test_view();
        overlay.draw_location(&view, &mut test_canvas(), ts(0));
        let first_frame = overlay.animation.lock().frame.clone().expect("frame selected");

        for &offset in &[100, 250, 499] {
            overlay.draw_location(&view, &mut test_canvas(), ts(offset));
            let state = overlay.animation.lock();
            assert_eq!(state.cycle, 1);
            assert!(Arc::ptr_eq(
                state.frame.as_ref().expect("frame selected"),
                &first_frame
            ));
        }

        overlay.draw_location(&view, &mut test_canvas(), ts(500));
        assert_eq!(overlay.animation.lock().cycle, 2);
    }

    #[test]
    fn direction_alone_does_not_keep_sensor_on() {
        let (mut overlay, heading_source) = test_overlay();

        overlay.enable_direction();
        assert!(heading_source.is_enabled());
        assert!(!overlay.is_compass_enabled());

        overlay.disable_direction();
        assert!(!heading_source.is_enabled());
    }

    #[test]
    fn explicit_compass_keeps_sensor_on() {
        let (mut overlay, heading_source) = test_overlay();

        overlay.enable_direction();
        assert!(overlay.enable_compass());
        overlay.disable_direction();

        assert!(heading_source.is_enabled());
        assert!(overlay.is_compass_enabled());

        overlay.disable_compass();
        assert!(!heading_source.is_enabled());
    }

    #[test]
    fn no_circles_when_accuracy_is_disabled() {
        let (mut overlay, _) = test_overlay();
        overlay.enable_direction();
        overlay.location_changed(fix_at_center(), &mut test_map());

        let mut canvas = test_canvas();
        overlay.draw_location(&test_view(), &mut canvas, ts(0));

        assert!(canvas.circles.is_empty());
        assert_eq!(canvas.images.len(), 1);
    }

    #[test]
    fn accuracy_circles_are_drawn_under_the_marker() {
        let (mut overlay, _) = test_overlay();
        overlay.enable_direction();
        overlay.enable_accuracy();
        overlay.location_changed(fix_at_center(), &mut test_map());

        let mut canvas = test_canvas();
        overlay.draw_location(&test_view(), &mut canvas, ts(0));

        assert_eq!(canvas.circles.len(), 2);
        assert_eq!(canvas.images.len(), 1);

        // 100 m at 10 m/px on the equator.
        let (center, radius, fill_paint) = &canvas.circles[0];
        assert_abs_diff_eq!(*center, Point2d::new(100.0, 100.0), epsilon = 0.0001);
        assert_abs_diff_eq!(*radius, 10.0, epsilon = 0.0001);
        assert!(fill_paint.outline.is_none());

        let (_, _, stroke_paint) = &canvas.circles[1];
        assert!(stroke_paint.fill.is_transparent());
        assert!(stroke_paint.outline.is_some());
    }

    #[test]
    fn default_dot_when_direction_is_off() {
        let (mut overlay, _) = test_overlay();
        overlay.enable_accuracy();
        overlay.location_changed(fix_at_center(), &mut test_map());

        let mut canvas = test_canvas();
        overlay.draw_location(&test_view(), &mut canvas, ts(0));

        assert_eq!(canvas.circles.len(), 1);
        assert!(canvas.images.is_empty());
    }

    #[test]
    fn nothing_is_drawn_without_a_fix() {
        let (mut overlay, _) = test_overlay();
        overlay.enable_direction();
        overlay.enable_accuracy();

        let mut canvas = test_canvas();
        overlay.draw_location(&test_view(), &mut canvas, ts(0));

        assert!(canvas.circles.is_empty());
        assert!(canvas.images.is_empty());
    }

    #[test]
    fn follow_recenters_the_map() {
        let (mut overlay, _) = test_overlay();
        overlay.enable_follow();

        let mut map = test_map();
        let fix = LocationFix::new(latlon!(10.0, 20.0), 5.0);
        overlay.location_changed(fix, &mut map);

        let target = map.target_view().geo_position().expect("projectable");
        assert_abs_diff_eq!(target.lat(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(target.lon(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn follow_disabled_leaves_the_map_alone() {
        let (mut overlay, _) = test_overlay();

        let mut map = test_map();
        let original = map.view().position();
        overlay.location_changed(LocationFix::new(latlon!(10.0, 20.0), 5.0), &mut map);

        assert_eq!(map.target_view().position(), original);
    }

    #[test]
    fn listener_receives_every_fix() {
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = received.clone();

        let (mut overlay, _) = test_overlay();
        overlay.set_location_changed_listener(move |fix: &LocationFix| {
            sink.lock().push(*fix);
        });

        let mut map = test_map();
        let first = LocationFix::new(latlon!(1.0, 2.0), 5.0);
        let second = LocationFix::new(latlon!(3.0, 4.0), 6.0).with_bearing(90.0);
        overlay.location_changed(first, &mut map);
        overlay.location_changed(second, &mut map);

        assert_eq!(*received.lock(), vec![first, second]);
    }

    #[test]
    fn compass_rose_requires_explicit_enable() {
        let (mut overlay, _) = test_overlay();
        overlay.enable_direction();

        let mut canvas = test_canvas();
        overlay.draw_compass_rose(&mut canvas);
        assert!(canvas.lines.is_empty());

        overlay.enable_compass();
        overlay.draw_compass_rose(&mut canvas);
        assert!(!canvas.lines.is_empty());
    }

    #[test]
    fn marker_center_lands_on_the_location() {
        let frame = DecodedImage::from_raw(vec![0; 64], 4, 4).expect("valid buffer length");
        let position = Point2d::new(50.0, 80.0);

        for rotation in [0.0, 0.5, -1.2] {
            let transform = marker_transform(&frame, position, rotation);
            let center = transform * Vector3::new(2.0, 2.0, 1.0);
            assert_abs_diff_eq!(center.x, position.x, epsilon = 1e-9);
            assert_abs_diff_eq!(center.y, position.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn missing_heading_draws_like_zero_heading() {
        let (mut enabled, heading_source) = test_overlay();
        enabled.enable_direction();
        heading_source.set_heading(0.0);
        enabled.location_changed(fix_at_center(), &mut test_map());

        let (mut missing, missing_source) = test_overlay();
        missing.enable_direction();
        missing_source.set_heading(f64::NAN);
        missing.location_changed(fix_at_center(), &mut test_map());

        let mut canvas_a = test_canvas();
        let mut canvas_b = test_canvas();
        enabled.draw_location(&test_view(), &mut canvas_a, ts(0));
        missing.draw_location(&test_view(), &mut canvas_b, ts(0));

        let (_, transform_a, _) = &canvas_a.images[0];
        let (_, transform_b, _) = &canvas_b.images[0];
        assert_abs_diff_eq!(*transform_a, *transform_b, epsilon = 1e-9);
    }

    #[test]
    fn animated_draw_requests_redraw() {
        let redraws = Arc::new(AtomicUsize::new(0));

        let (mut overlay, _) = test_overlay();
        overlay.set_messenger(Box::new(CountingMessenger(redraws.clone())));
        overlay.location_changed(fix_at_center(), &mut test_map());

        overlay.draw_location(&test_view(), &mut test_canvas(), ts(0));
        assert_eq!(redraws.load(Ordering::SeqCst), 0);

        overlay.enable_direction();
        overlay.draw_location(&test_view(), &mut test_canvas(), ts(600));
        assert_eq!(redraws.load(Ordering::SeqCst), 1);
    }
}
