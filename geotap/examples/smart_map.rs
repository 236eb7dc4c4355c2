//! Minimal host application: a map with tap shortcuts and the animated
//! location overlay, driven by simulated input instead of a real window.
//!
//! Run with `RUST_LOG=debug cargo run --example smart_map` to see the draw
//! calls the overlay produces.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use geotap::control::{
    EventProcessor, GestureController, MapController, MouseButton, RawUserEvent,
};
use geotap::decoded_image::DecodedImage;
use geotap::geotap_types::cartesian::{Point2d, Size};
use geotap::geotap_types::geo::{GeoPoint, GeoPoint2d};
use geotap::geotap_types::latlon;
use geotap::layer::location::{LocationOverlay, MarkerStyle};
use geotap::layer::Layer;
use geotap::location::{HeadingSource, LocationFix};
use geotap::render::{Canvas, CirclePaint, ImagePaint, LinePaint};
use geotap::{Map, MapView};
use nalgebra::Matrix3;
use parking_lot::{Mutex, RwLock};

/// Stand-in for a platform orientation sensor.
struct SimulatedCompass {
    state: Mutex<(bool, f64)>,
}

impl SimulatedCompass {
    fn new() -> Self {
        Self {
            state: Mutex::new((false, f64::NAN)),
        }
    }

    fn set_heading(&self, heading: f64) {
        self.state.lock().1 = heading;
    }
}

impl HeadingSource for SimulatedCompass {
    fn enable(&self) -> bool {
        self.state.lock().0 = true;
        true
    }

    fn disable(&self) {
        self.state.lock().0 = false;
    }

    fn is_enabled(&self) -> bool {
        self.state.lock().0
    }

    fn heading(&self) -> f64 {
        let state = self.state.lock();
        if state.0 {
            state.1
        } else {
            f64::NAN
        }
    }
}

/// Canvas that logs draw calls instead of drawing.
struct LogCanvas {
    size: Size,
}

impl Canvas for LogCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn draw_circle(&mut self, center: Point2d, radius: f64, _paint: CirclePaint) {
        log::debug!("circle at ({:.1}, {:.1}), r = {radius:.1}", center.x, center.y);
    }

    fn draw_line(&mut self, from: Point2d, to: Point2d, _paint: LinePaint) {
        log::debug!(
            "line ({:.1}, {:.1}) -> ({:.1}, {:.1})",
            from.x,
            from.y,
            to.x,
            to.y
        );
    }

    fn draw_image(&mut self, image: &DecodedImage, transform: &Matrix3<f64>, _paint: ImagePaint) {
        log::debug!(
            "{}x{} marker at ({:.1}, {:.1})",
            image.width(),
            image.height(),
            transform[(0, 2)],
            transform[(1, 2)]
        );
    }
}

fn marker_frames() -> [DecodedImage; 4] {
    // Solid-color squares; a real application would load its artwork here.
    [
        [0x1e, 0x88, 0xe5, 0xff],
        [0x42, 0xa5, 0xf5, 0xff],
        [0x90, 0xca, 0xf9, 0xff],
        [0x42, 0xa5, 0xf5, 0xff],
    ]
    .map(|pixel| {
        let bytes = pixel.repeat(32 * 32);
        DecodedImage::from_raw(bytes, 32, 32).expect("valid buffer length")
    })
}

fn main() {
    env_logger::init();

    let size = Size::new(800.0, 600.0);
    let mut map = Map::new(
        MapView::new(&latlon!(52.52, 13.405), 10.0).with_size(size),
        vec![],
        None,
    );

    let mut gestures = GestureController::new();
    gestures.set_long_press_handler(|point: GeoPoint2d| {
        log::info!("long press at [{:.5}, {:.5}]", point.lat(), point.lon());
    });

    let mut processor = EventProcessor::default();
    processor.add_handler(gestures);
    processor.add_handler(MapController::default());

    let compass = Arc::new(SimulatedCompass::new());
    let overlay = Arc::new(RwLock::new(LocationOverlay::new(
        MarkerStyle::new(marker_frames()),
        compass.clone() as Arc<dyn HeadingSource>,
    )));

    {
        let mut overlay = overlay.write();
        overlay.set_location_changed_listener(|fix: &LocationFix| {
            log::info!(
                "location changed: [{:.5}, {:.5}] +-{:.0} m",
                fix.position().lat(),
                fix.position().lon(),
                fix.accuracy()
            );
        });
        overlay.enable_compass();
        overlay.enable_accuracy();
        overlay.enable_direction();
        overlay.enable_follow();
    }

    map.layers_mut().push(overlay.clone());

    // A double tap: two quick press/release pairs.
    for _ in 0..2 {
        processor.handle(RawUserEvent::ButtonPressed(MouseButton::Left), &mut map);
        processor.handle(RawUserEvent::ButtonReleased(MouseButton::Left), &mut map);
    }
    log::info!(
        "double tap zoomed the map to resolution {:.1}",
        map.target_view().resolution()
    );

    // A long press at the center of the map.
    processor.handle(
        RawUserEvent::PointerMoved(Point2d::new(400.0, 300.0)),
        &mut map,
    );
    processor.handle(RawUserEvent::ButtonPressed(MouseButton::Left), &mut map);
    thread::sleep(Duration::from_millis(550));
    processor.handle(RawUserEvent::ButtonReleased(MouseButton::Left), &mut map);

    // A few location updates with the device turning in place. A real host
    // starts its positioning source when the screen becomes active and stops
    // it when the screen goes inactive to save power; here the fixes are
    // simply synthesized.
    let mut canvas = LogCanvas { size };
    for (step, heading) in [0.0, 30.0, 60.0, 90.0].into_iter().enumerate() {
        compass.set_heading(heading);
        let fix = LocationFix::new(latlon!(52.52 + 0.0001 * step as f64, 13.405), 25.0)
            .with_bearing(heading);
        overlay.write().location_changed(fix, &mut map);

        map.animate();
        for layer in map.layers().iter_visible() {
            layer.render(map.view(), &mut canvas);
        }

        thread::sleep(Duration::from_millis(600));
    }
}
