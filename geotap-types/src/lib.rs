//! Trait based geographic and cartesian primitives used by the `geotap` map
//! widget crate.
//!
//! The crate separates *geographic* coordinates (latitude/longitude on the
//! surface of the Earth, see [`geo`]) from *cartesian* ones (projected map or
//! screen coordinates, see [`cartesian`]), and provides [`projection`]s to
//! convert between the two.

pub mod cartesian;
pub mod geo;
pub mod projection;
