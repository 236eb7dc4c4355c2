//! Tap shortcuts recognized on top of the default map controls.

use std::time::Duration;

use geotap_types::geo::GeoPoint2d;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::control::{EventPropagation, MouseButton, UserEvent, UserEventHandler};
use crate::map::Map;

/// Resolution multiplier of a double tap. One tap halves the resolution, which corresponds to
/// one zoom level on web maps.
const DOUBLE_TAP_ZOOM: f64 = 0.5;
const ZOOM_ANIMATION_DURATION: Duration = Duration::from_millis(200);

/// Handler invoked when a long press is recognized on the map.
pub trait LongPressHandler: MaybeSend + MaybeSync {
    /// Called with the geographic location of the press.
    fn long_press(&self, point: GeoPoint2d);
}

impl<T: Fn(GeoPoint2d)> LongPressHandler for T
where
    T: MaybeSend + MaybeSync,
{
    fn long_press(&self, point: GeoPoint2d) {
        self(point)
    }
}

/// [`UserEventHandler`] that adds two tap shortcuts to a map:
///
/// * a double tap zooms the map in, anchored at the tap position;
/// * a long press is translated into a geographic point and given to the registered
///   [`LongPressHandler`], if any.
///
/// Add it to the [`EventProcessor`](crate::control::EventProcessor) *before* the
/// [`MapController`](crate::control::MapController): the shortcuts consume their events, and
/// everything else is propagated to the default map controls untouched.
#[derive(Default)]
pub struct GestureController {
    long_press_handler: Option<Box<dyn LongPressHandler>>,
}

impl GestureController {
    /// Creates a controller with no long press handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the long press handler, replacing the previous one.
    pub fn set_long_press_handler(&mut self, handler: impl LongPressHandler + 'static) {
        self.long_press_handler = Some(Box::new(handler));
    }
}

impl UserEventHandler for GestureController {
    fn handle(&self, event: &UserEvent, map: &mut Map) -> EventPropagation {
        match event {
            UserEvent::DoubleClick(MouseButton::Left, e) => {
                let target = map
                    .target_view()
                    .zoom(DOUBLE_TAP_ZOOM, e.screen_pointer_position);
                map.animate_to(target, ZOOM_ANIMATION_DURATION);

                EventPropagation::Consume
            }
            UserEvent::LongPress(MouseButton::Left, e) => {
                if let Some(handler) = &self.long_press_handler {
                    match map.view().screen_to_geo(e.screen_pointer_position) {
                        Some(point) => handler.long_press(point),
                        None => {
                            log::debug!("long press at an unprojectable screen position, ignored")
                        }
                    }
                }

                EventPropagation::Consume
            }
            _ => EventPropagation::Propagate,
        }
    }
}
