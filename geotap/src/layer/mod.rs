//! [Layers](Layer) draw their content on top of the base map surface.

use std::any::Any;
use std::sync::Arc;

use maybe_sync::{MaybeSend, MaybeSync};
use parking_lot::RwLock;

use crate::messenger::Messenger;
use crate::render::Canvas;
use crate::view::MapView;

pub mod location;

pub use location::LocationOverlay;

/// A drawable layer composited on top of the base map surface.
pub trait Layer: MaybeSend + MaybeSync {
    /// Renders the layer to the given canvas.
    fn render(&self, view: &MapView, canvas: &mut dyn Canvas);
    /// Sets the messenger for the layer. Messenger is used to notify the
    /// application when the layer thinks it should be updated on the screen.
    fn set_messenger(&mut self, messenger: Box<dyn Messenger>);
    /// A map stores layers as trait objects. This method can be used to
    /// convert the trait object into the concrete type.
    fn as_any(&self) -> &dyn Any;
    /// A map stores layers as trait objects. This method can be used to
    /// convert the trait object into the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Layer + 'static> Layer for Arc<RwLock<T>> {
    fn render(&self, view: &MapView, canvas: &mut dyn Canvas) {
        self.read().render(view, canvas)
    }

    fn set_messenger(&mut self, messenger: Box<dyn Messenger>) {
        self.write().set_messenger(messenger)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Used for tests.
#[cfg(feature = "_tests")]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TestLayer(pub &'static str);

#[cfg(feature = "_tests")]
impl Layer for TestLayer {
    fn render(&self, _view: &MapView, _canvas: &mut dyn Canvas) {}

    fn set_messenger(&mut self, _messenger: Box<dyn Messenger>) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
