//! Geotap adds two conveniences on top of a bare interactive map widget: tap
//! shortcuts and a better "my location" marker.
//!
//! * [`GestureController`](control::GestureController) recognizes a double tap
//!   (zoom in, anchored at the tap) and a long press (translated into a
//!   geographic coordinate and delivered to a callback), while leaving every
//!   other interaction to the default map controls.
//! * [`LocationOverlay`](layer::LocationOverlay) renders the device location
//!   as a rotating directional marker with an optional accuracy circle, can
//!   recenter the map on every location update, and forwards location updates
//!   to the application.
//!
//! A minimal host wires them up like this:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use geotap::control::{EventProcessor, GestureController, MapController};
//! use geotap::layer::location::{LocationOverlay, MarkerStyle};
//! use geotap::geotap_types::geo::{GeoPoint, GeoPoint2d};
//! use geotap::geotap_types::latlon;
//! use geotap::{Map, MapView};
//! use parking_lot::RwLock;
//!
//! # fn frames() -> [geotap::decoded_image::DecodedImage; 4] { todo!() }
//! # fn heading_source() -> Arc<dyn geotap::location::HeadingSource> { todo!() }
//! let mut map = Map::new(MapView::new(&latlon!(52.52, 13.405), 10.0), vec![], None);
//!
//! let mut gestures = GestureController::new();
//! gestures.set_long_press_handler(|point: GeoPoint2d| {
//!     println!("[{}, {}]", point.lat(), point.lon());
//! });
//!
//! let mut processor = EventProcessor::default();
//! processor.add_handler(gestures);
//! processor.add_handler(MapController::default());
//!
//! let overlay = Arc::new(RwLock::new(LocationOverlay::new(
//!     MarkerStyle::new(frames()),
//!     heading_source(),
//! )));
//! overlay.write().enable_direction();
//! map.layers_mut().push(overlay.clone());
//! ```
//!
//! The crate does not render anything itself and does not talk to any
//! hardware. Rendering goes through the [`render::Canvas`] trait, OS input
//! comes in as [`control::RawUserEvent`]s (a `winit` adapter is provided
//! behind the `winit` feature), heading data comes from a
//! [`location::HeadingSource`], and location fixes are fed in by the host.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

mod color;
pub mod control;
pub mod decoded_image;
pub mod error;
pub mod layer;
pub mod location;
mod map;
mod messenger;
pub mod render;
mod view;

#[cfg(feature = "winit")]
pub mod winit;

pub use color::Color;
pub use map::{LayerCollection, Map};
pub use messenger::{DummyMessenger, Messenger};
pub use view::MapView;

// Reexport geotap_types
pub use geotap_types;
