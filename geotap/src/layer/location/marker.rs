use std::sync::Arc;

use crate::decoded_image::DecodedImage;
use crate::render::{CirclePaint, LineCap, LinePaint};
use crate::Color;

pub(super) const FRAME_COUNT: usize = 4;

const ACCURACY_FILL_COLOR: Color = Color::from_hex("#0000FF22");
const ACCURACY_STROKE_COLOR: Color = Color::from_hex("#0000FF66");
const ACCURACY_STROKE_WIDTH: f64 = 2.0;

const DOT_COLOR: Color = Color::BLUE;
const DOT_OUTLINE_WIDTH: f64 = 2.0;
const DOT_RADIUS: f64 = 8.0;

/// Artwork and paints used by the
/// [`LocationOverlay`](super::LocationOverlay).
///
/// The four `frames` form the looping animation of the directional marker.
/// All frames are expected to point northeast in their source orientation and
/// to have the same dimensions.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    frames: [Arc<DecodedImage>; FRAME_COUNT],
    accuracy_fill: Color,
    accuracy_stroke: Color,
}

impl MarkerStyle {
    /// Creates a style with the given animation frames and default paints.
    pub fn new(frames: [DecodedImage; FRAME_COUNT]) -> Self {
        Self {
            frames: frames.map(Arc::new),
            accuracy_fill: ACCURACY_FILL_COLOR,
            accuracy_stroke: ACCURACY_STROKE_COLOR,
        }
    }

    /// Overrides the colors of the accuracy circle.
    pub fn with_accuracy_colors(mut self, fill: Color, stroke: Color) -> Self {
        self.accuracy_fill = fill;
        self.accuracy_stroke = stroke;
        self
    }

    pub(super) fn frame(&self, cycle: usize) -> Arc<DecodedImage> {
        self.frames[cycle % FRAME_COUNT].clone()
    }

    pub(super) fn dot_radius(&self) -> f64 {
        DOT_RADIUS
    }

    pub(super) fn dot_paint(&self) -> CirclePaint {
        CirclePaint {
            fill: DOT_COLOR,
            outline: Some(LinePaint {
                color: Color::WHITE,
                width: DOT_OUTLINE_WIDTH,
                line_cap: LineCap::Round,
            }),
        }
    }

    pub(super) fn accuracy_fill_paint(&self) -> CirclePaint {
        CirclePaint::fill(self.accuracy_fill)
    }

    pub(super) fn accuracy_stroke_paint(&self) -> CirclePaint {
        CirclePaint::stroke(self.accuracy_stroke, ACCURACY_STROKE_WIDTH)
    }
}
