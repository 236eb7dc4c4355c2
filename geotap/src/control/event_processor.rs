use std::time::Duration;

use geotap_types::cartesian::{CartesianPoint2d, Point2d};
use web_time::SystemTime;

use crate::control::{
    EventPropagation, MouseButton, MouseButtonsState, MouseEvent, RawUserEvent, TouchId, UserEvent,
    UserEventHandler,
};
use crate::map::Map;

const DRAG_THRESHOLD: f64 = 3.0;
const CLICK_TIMEOUT: Duration = Duration::from_millis(200);
const DBL_CLICK_TIMEOUT: Duration = Duration::from_millis(500);
const LONG_PRESS_TIMEOUT: Duration = Duration::from_millis(500);

/// Converts [`RawUserEvent`]s into [`UserEvent`]s and dispatches them over the registered
/// [`UserEventHandler`]s.
///
/// Touch input is folded into the same event stream: a single touch behaves like the left mouse
/// button, so taps, double taps and long presses come out as [`UserEvent::Click`],
/// [`UserEvent::DoubleClick`] and [`UserEvent::LongPress`]. A two-finger pinch produces
/// [`UserEvent::Zoom`] events around the gesture center.
pub struct EventProcessor {
    handlers: Vec<Box<dyn UserEventHandler>>,

    pointer_position: Point2d,
    pointer_pressed_position: Point2d,
    buttons_state: MouseButtonsState,

    last_pressed_time: SystemTime,
    last_click_time: SystemTime,

    drag_target: Option<usize>,

    touches: Vec<TouchState>,
    multi_touch: bool,
    pinch_distance: Option<f64>,
}

struct TouchState {
    id: TouchId,
    position: Point2d,
}

impl Default for EventProcessor {
    fn default() -> Self {
        Self {
            handlers: vec![],
            pointer_position: Point2d::origin(),
            pointer_pressed_position: Point2d::origin(),
            buttons_state: Default::default(),
            last_pressed_time: SystemTime::UNIX_EPOCH,
            last_click_time: SystemTime::UNIX_EPOCH,
            drag_target: None,
            touches: vec![],
            multi_touch: false,
            pinch_distance: None,
        }
    }
}

impl EventProcessor {
    /// Adds a handler to the end of the handler list.
    ///
    /// Handlers registered earlier see events first.
    pub fn add_handler(&mut self, handler: impl UserEventHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Processes the raw event and gives the resulting user events to the handlers.
    pub fn handle(&mut self, event: RawUserEvent, map: &mut Map) {
        if let Some(user_events) = self.process(event, SystemTime::now()) {
            for user_event in user_events {
                self.dispatch(user_event, map);
            }
        }
    }

    fn dispatch(&mut self, user_event: UserEvent, map: &mut Map) {
        let mut drag_start_target = None;

        let delta = self.pointer_position - self.pointer_pressed_position;
        let mouse_event = self.mouse_event();

        for (index, handler) in self.handlers.iter().enumerate() {
            if matches!(user_event, UserEvent::Drag(..) | UserEvent::DragEnded(..)) {
                match self.drag_target {
                    Some(target) if index == target => {}
                    _ => continue,
                }
            }

            match handler.handle(&user_event, map) {
                EventPropagation::Propagate => {}
                EventPropagation::Stop => break,
                EventPropagation::Consume => {
                    if let UserEvent::DragStarted(button, _) = &user_event {
                        drag_start_target = Some(index);

                        handler.handle(
                            &UserEvent::Drag(*button, delta, mouse_event.clone()),
                            map,
                        );
                    }

                    break;
                }
            }
        }

        if drag_start_target.is_some() {
            self.drag_target = drag_start_target;
        }

        if matches!(user_event, UserEvent::DragEnded(..)) {
            self.drag_target = None;
        }
    }

    fn process(&mut self, event: RawUserEvent, now: SystemTime) -> Option<Vec<UserEvent>> {
        match event {
            RawUserEvent::ButtonPressed(button) => self.on_button_pressed(button, now),
            RawUserEvent::ButtonReleased(button) => self.on_button_released(button, now),
            RawUserEvent::PointerMoved(position) => self.on_pointer_moved(position),
            RawUserEvent::Scroll(delta) => {
                Some(vec![UserEvent::Scroll(delta, self.mouse_event())])
            }
            RawUserEvent::TouchStart(touch) => {
                self.touches.push(TouchState {
                    id: touch.touch_id,
                    position: touch.position,
                });

                match self.touches.len() {
                    1 => {
                        self.pointer_position = touch.position;
                        self.on_button_pressed(MouseButton::Left, now)
                    }
                    2 => {
                        // A second finger cancels the tap gestures in progress and starts a
                        // pinch.
                        self.buttons_state.set_released(MouseButton::Left);
                        self.multi_touch = true;
                        self.pinch_distance = Some(self.touch_distance()?);
                        None
                    }
                    _ => None,
                }
            }
            RawUserEvent::TouchMove(touch) => {
                let state = self.touches.iter_mut().find(|t| t.id == touch.touch_id)?;
                state.position = touch.position;

                if !self.multi_touch {
                    self.on_pointer_moved(touch.position)
                } else if self.touches.len() == 2 {
                    let distance = self.touch_distance()?;
                    let prev_distance = self.pinch_distance.replace(distance)?;
                    if distance == 0.0 {
                        return None;
                    }

                    Some(vec![UserEvent::Zoom(
                        prev_distance / distance,
                        self.touch_center()?,
                    )])
                } else {
                    None
                }
            }
            RawUserEvent::TouchEnd(touch) => {
                self.touches.retain(|t| t.id != touch.touch_id);

                if self.touches.is_empty() {
                    self.pinch_distance = None;
                    if self.multi_touch {
                        self.multi_touch = false;
                        return None;
                    }

                    return self.on_button_released(MouseButton::Left, now);
                }

                None
            }
        }
    }

    fn on_button_pressed(&mut self, button: MouseButton, now: SystemTime) -> Option<Vec<UserEvent>> {
        self.buttons_state.set_pressed(button);
        self.last_pressed_time = now;
        self.pointer_pressed_position = self.pointer_position;

        Some(vec![UserEvent::ButtonPressed(button, self.mouse_event())])
    }

    fn on_button_released(
        &mut self,
        button: MouseButton,
        now: SystemTime,
    ) -> Option<Vec<UserEvent>> {
        self.buttons_state.set_released(button);
        let mut events = vec![UserEvent::ButtonReleased(button, self.mouse_event())];

        let held = now
            .duration_since(self.last_pressed_time)
            .unwrap_or_default();
        let is_stationary = self
            .pointer_position
            .taxicab_distance(&self.pointer_pressed_position)
            <= DRAG_THRESHOLD;

        if held < CLICK_TIMEOUT {
            events.push(UserEvent::Click(button, self.mouse_event()));

            if now
                .duration_since(self.last_click_time)
                .unwrap_or_default()
                < DBL_CLICK_TIMEOUT
            {
                events.push(UserEvent::DoubleClick(button, self.mouse_event()));
            }

            self.last_click_time = now;
        } else if held >= LONG_PRESS_TIMEOUT && self.drag_target.is_none() && is_stationary {
            events.push(UserEvent::LongPress(
                button,
                self.mouse_event_at(self.pointer_pressed_position),
            ));
        }

        if self.drag_target.is_some() {
            events.push(UserEvent::DragEnded(button, self.mouse_event()));
        }

        Some(events)
    }

    fn on_pointer_moved(&mut self, position: Point2d) -> Option<Vec<UserEvent>> {
        let prev_position = self.pointer_position;
        self.pointer_position = position;

        let mut events = vec![UserEvent::PointerMoved(self.mouse_event())];
        if let Some(button) = self.buttons_state.single_pressed() {
            if self.drag_target.is_none()
                && position.taxicab_distance(&self.pointer_pressed_position) > DRAG_THRESHOLD
            {
                events.push(UserEvent::DragStarted(
                    button,
                    self.mouse_event_at(self.pointer_pressed_position),
                ));
            }

            if self.drag_target.is_some() {
                events.push(UserEvent::Drag(
                    button,
                    position - prev_position,
                    self.mouse_event(),
                ));
            }
        }

        Some(events)
    }

    fn touch_distance(&self) -> Option<f64> {
        let [a, b] = self.touches.as_slice() else {
            return None;
        };
        Some((a.position - b.position).norm())
    }

    fn touch_center(&self) -> Option<Point2d> {
        let [a, b] = self.touches.as_slice() else {
            return None;
        };
        Some(nalgebra::center(&a.position, &b.position))
    }

    fn mouse_event(&self) -> MouseEvent {
        self.mouse_event_at(self.pointer_position)
    }

    fn mouse_event_at(&self, screen_pointer_position: Point2d) -> MouseEvent {
        MouseEvent {
            screen_pointer_position,
            buttons: self.buttons_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::control::TouchEvent;

    fn ts(ms: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(100_000 + ms)
    }

    fn press(processor: &mut EventProcessor, at: u64) -> Vec<UserEvent> {
        processor
            .process(RawUserEvent::ButtonPressed(MouseButton::Left), ts(at))
            .unwrap_or_default()
    }

    fn release(processor: &mut EventProcessor, at: u64) -> Vec<UserEvent> {
        processor
            .process(RawUserEvent::ButtonReleased(MouseButton::Left), ts(at))
            .unwrap_or_default()
    }

    fn move_to(processor: &mut EventProcessor, x: f64, y: f64) -> Vec<UserEvent> {
        processor
            .process(RawUserEvent::PointerMoved(Point2d::new(x, y)), ts(0))
            .unwrap_or_default()
    }

    #[test]
    fn quick_release_is_a_click() {
        let mut processor = EventProcessor::default();

        press(&mut processor, 0);
        let events = release(&mut processor, 100);

        assert_eq!(events.len(), 2);
        assert_matches!(events[0], UserEvent::ButtonReleased(MouseButton::Left, _));
        assert_matches!(events[1], UserEvent::Click(MouseButton::Left, _));
    }

    #[test]
    fn second_quick_click_is_a_double_click() {
        let mut processor = EventProcessor::default();

        press(&mut processor, 0);
        release(&mut processor, 100);
        press(&mut processor, 200);
        let events = release(&mut processor, 300);

        assert_eq!(events.len(), 3);
        assert_matches!(events[1], UserEvent::Click(..));
        assert_matches!(events[2], UserEvent::DoubleClick(MouseButton::Left, _));
    }

    #[test]
    fn slow_second_click_is_not_a_double_click() {
        let mut processor = EventProcessor::default();

        press(&mut processor, 0);
        release(&mut processor, 100);
        press(&mut processor, 700);
        let events = release(&mut processor, 800);

        assert_eq!(events.len(), 2);
        assert_matches!(events[1], UserEvent::Click(..));
    }

    #[test]
    fn stationary_hold_is_a_long_press() {
        let mut processor = EventProcessor::default();

        move_to(&mut processor, 30.0, 40.0);
        press(&mut processor, 0);
        let events = release(&mut processor, 600);

        assert_eq!(events.len(), 2);
        assert_matches!(
            &events[1],
            UserEvent::LongPress(MouseButton::Left, e)
                if e.screen_pointer_position == Point2d::new(30.0, 40.0)
        );
    }

    #[test]
    fn moved_hold_is_not_a_long_press() {
        let mut processor = EventProcessor::default();

        press(&mut processor, 0);
        let events = move_to(&mut processor, 50.0, 0.0);
        assert_matches!(events[1], UserEvent::DragStarted(..));

        let events = release(&mut processor, 600);
        assert_eq!(events.len(), 1);
        assert_matches!(events[0], UserEvent::ButtonReleased(..));
    }

    #[test]
    fn medium_hold_produces_no_gesture() {
        let mut processor = EventProcessor::default();

        press(&mut processor, 0);
        let events = release(&mut processor, 350);

        assert_eq!(events.len(), 1);
        assert_matches!(events[0], UserEvent::ButtonReleased(..));
    }

    #[test]
    fn touch_tap_acts_like_a_click() {
        let mut processor = EventProcessor::default();

        let events = processor
            .process(
                RawUserEvent::TouchStart(TouchEvent {
                    touch_id: 1,
                    position: Point2d::new(10.0, 10.0),
                }),
                ts(0),
            )
            .unwrap_or_default();
        assert_matches!(events[0], UserEvent::ButtonPressed(MouseButton::Left, _));

        let events = processor
            .process(
                RawUserEvent::TouchEnd(TouchEvent {
                    touch_id: 1,
                    position: Point2d::new(10.0, 10.0),
                }),
                ts(100),
            )
            .unwrap_or_default();
        assert_matches!(events[1], UserEvent::Click(MouseButton::Left, _));
    }

    #[test]
    fn pinch_produces_zoom_around_center() {
        let mut processor = EventProcessor::default();

        for event in [
            RawUserEvent::TouchStart(TouchEvent {
                touch_id: 1,
                position: Point2d::new(0.0, 0.0),
            }),
            RawUserEvent::TouchStart(TouchEvent {
                touch_id: 2,
                position: Point2d::new(100.0, 0.0),
            }),
        ] {
            processor.process(event, ts(0));
        }

        let events = processor
            .process(
                RawUserEvent::TouchMove(TouchEvent {
                    touch_id: 2,
                    position: Point2d::new(200.0, 0.0),
                }),
                ts(50),
            )
            .unwrap_or_default();

        assert_eq!(events.len(), 1);
        assert_matches!(
            &events[0],
            UserEvent::Zoom(zoom, center)
                if (zoom - 0.5).abs() < 1e-9 && *center == Point2d::new(100.0, 0.0)
        );
    }

    #[test]
    fn releasing_all_touches_after_pinch_is_not_a_tap() {
        let mut processor = EventProcessor::default();

        for (id, x) in [(1, 0.0), (2, 100.0)] {
            processor.process(
                RawUserEvent::TouchStart(TouchEvent {
                    touch_id: id,
                    position: Point2d::new(x, 0.0),
                }),
                ts(0),
            );
        }

        let events = processor.process(
            RawUserEvent::TouchEnd(TouchEvent {
                touch_id: 1,
                position: Point2d::new(0.0, 0.0),
            }),
            ts(100),
        );
        assert!(events.is_none());

        let events = processor.process(
            RawUserEvent::TouchEnd(TouchEvent {
                touch_id: 2,
                position: Point2d::new(100.0, 0.0),
            }),
            ts(150),
        );
        assert!(events.is_none());
    }
}
