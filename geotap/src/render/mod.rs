//! Drawing primitives that layers use to put their content on the screen.
//!
//! The crate does not ship a renderer. Instead, layers describe what they
//! want drawn through the [`Canvas`] trait, and the host application provides
//! an implementation backed by whatever graphics stack it uses.

use geotap_types::cartesian::{Point2d, Size};
use nalgebra::Matrix3;

use crate::decoded_image::DecodedImage;
use crate::Color;

/// The way a line or outline should be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePaint {
    /// Color of the line.
    pub color: Color,
    /// Width of the line in pixels.
    pub width: f64,
    /// The shape of the line ends.
    pub line_cap: LineCap,
}

/// The shape of the line ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    /// Half-circle.
    Round,
    /// Flat.
    Butt,
}

/// The way a circle should be drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePaint {
    /// Fill color of the circle.
    pub fill: Color,
    /// Outline of the circle. Not drawn if `None`.
    pub outline: Option<LinePaint>,
}

impl CirclePaint {
    /// Paint that fills a circle with the given color without an outline.
    pub fn fill(color: Color) -> Self {
        Self {
            fill: color,
            outline: None,
        }
    }

    /// Paint that draws only the outline of a circle.
    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            fill: Color::TRANSPARENT,
            outline: Some(LinePaint {
                color,
                width,
                line_cap: LineCap::Round,
            }),
        }
    }
}

/// The way an image should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImagePaint {
    /// Opacity of the image, `255` being fully opaque.
    pub opacity: u8,
}

/// Drawing surface given to layers during the render cycle.
///
/// Coordinates are screen pixels from the top-left corner of the map widget.
/// Image transforms are homogeneous 2d matrices in the same coordinate
/// system.
pub trait Canvas {
    /// Size of the drawing surface in pixels.
    fn size(&self) -> Size;
    /// Draws a circle with the center at the given position.
    fn draw_circle(&mut self, center: Point2d, radius: f64, paint: CirclePaint);
    /// Draws a straight line segment.
    fn draw_line(&mut self, from: Point2d, to: Point2d, paint: LinePaint);
    /// Draws an image with the given transform applied to it.
    fn draw_image(&mut self, image: &DecodedImage, transform: &Matrix3<f64>, paint: ImagePaint);
}

/// [`Canvas`] implementation that records draw calls instead of drawing.
///
/// Used as a fixture in tests.
#[cfg(feature = "_tests")]
pub struct TestCanvas {
    size: Size,
    /// Recorded `draw_circle` calls.
    pub circles: Vec<(Point2d, f64, CirclePaint)>,
    /// Recorded `draw_line` calls.
    pub lines: Vec<(Point2d, Point2d, LinePaint)>,
    /// Recorded `draw_image` calls.
    pub images: Vec<(DecodedImage, Matrix3<f64>, ImagePaint)>,
}

#[cfg(feature = "_tests")]
impl TestCanvas {
    /// Creates a canvas of the given size with no recorded calls.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            circles: vec![],
            lines: vec![],
            images: vec![],
        }
    }
}

#[cfg(feature = "_tests")]
impl Canvas for TestCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn draw_circle(&mut self, center: Point2d, radius: f64, paint: CirclePaint) {
        self.circles.push((center, radius, paint));
    }

    fn draw_line(&mut self, from: Point2d, to: Point2d, paint: LinePaint) {
        self.lines.push((from, to, paint));
    }

    fn draw_image(&mut self, image: &DecodedImage, transform: &Matrix3<f64>, paint: ImagePaint) {
        self.images.push((image.clone(), *transform, paint));
    }
}
