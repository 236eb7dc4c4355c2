use maybe_sync::{MaybeSend, MaybeSync};

/// Messengers are used by the map and layers to notify the application that
/// the map image changed and it should be redrawn on the screen.
pub trait Messenger: MaybeSend + MaybeSync {
    /// Request the application to redraw the map.
    fn request_redraw(&self);
}

/// Messenger that does nothing. Useful for tests and headless hosts.
#[derive(Debug, Default, Copy, Clone)]
pub struct DummyMessenger {}

impl Messenger for DummyMessenger {
    fn request_redraw(&self) {}
}
