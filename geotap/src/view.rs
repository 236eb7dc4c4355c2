use geotap_types::cartesian::{Point2d, Size};
use geotap_types::geo::{GeoPoint, GeoPoint2d};
use geotap_types::projection::{Projection, WebMercator};
use nalgebra::Vector2;

/// Position and orientation of the map camera.
///
/// The view stores its center in projected (web mercator) coordinates and
/// provides conversions between three coordinate systems:
///
/// * *screen* - pixels from the top-left corner of the map widget, y down;
/// * *map* - projected meters, y up;
/// * *geographic* - latitude and longitude in degrees.
#[derive(Debug, Clone, Copy)]
pub struct MapView {
    position: Point2d,
    resolution: f64,
    size: Size,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            position: Point2d::origin(),
            resolution: 1.0,
            size: Size::default(),
        }
    }
}

impl MapView {
    /// Creates a view centered at the given geographic position.
    ///
    /// `resolution` is the size of a screen pixel in projected map units
    /// (meters at the equator). Positions that cannot be projected fall back
    /// to the origin.
    pub fn new(position: &impl GeoPoint<Num = f64>, resolution: f64) -> Self {
        let projected = Self::projection()
            .project(&GeoPoint2d::from(position))
            .unwrap_or_else(Point2d::origin);
        Self {
            position: projected,
            resolution,
            size: Size::default(),
        }
    }

    fn projection() -> WebMercator<GeoPoint2d, Point2d> {
        WebMercator::default()
    }

    /// Center of the view in projected coordinates.
    pub fn position(&self) -> Point2d {
        self.position
    }

    /// Center of the view in geographic coordinates.
    pub fn geo_position(&self) -> Option<GeoPoint2d> {
        Self::projection().unproject(&self.position)
    }

    /// Resolution of the view in map units per pixel.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Returns a copy of the view with the given resolution.
    pub fn with_resolution(&self, resolution: f64) -> Self {
        Self {
            resolution,
            ..*self
        }
    }

    /// Size of the view area in pixels.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns a copy of the view with the given size.
    pub fn with_size(&self, new_size: Size) -> Self {
        Self {
            size: new_size,
            ..*self
        }
    }

    /// Returns a copy of the view centered at the given geographic position,
    /// or `None` if the position cannot be projected.
    pub fn with_geo_position(&self, position: &impl GeoPoint<Num = f64>) -> Option<Self> {
        let projected = Self::projection().project(&GeoPoint2d::from(position))?;
        Some(Self {
            position: projected,
            ..*self
        })
    }

    /// Converts a screen pixel position into projected map coordinates.
    pub fn screen_to_map(&self, px_position: Point2d) -> Point2d {
        let x = self.position.x + (px_position.x - self.size.half_width()) * self.resolution;
        let y = self.position.y + (self.size.half_height() - px_position.y) * self.resolution;
        Point2d::new(x, y)
    }

    /// Converts projected map coordinates into a screen pixel position.
    pub fn map_to_screen(&self, map_position: Point2d) -> Point2d {
        let x = (map_position.x - self.position.x) / self.resolution + self.size.half_width();
        let y = self.size.half_height() - (map_position.y - self.position.y) / self.resolution;
        Point2d::new(x, y)
    }

    /// Converts a screen pixel position into geographic coordinates.
    pub fn screen_to_geo(&self, px_position: Point2d) -> Option<GeoPoint2d> {
        Self::projection().unproject(&self.screen_to_map(px_position))
    }

    /// Converts geographic coordinates into a screen pixel position.
    pub fn geo_to_screen(&self, position: &impl GeoPoint<Num = f64>) -> Option<Point2d> {
        Some(self.map_to_screen(Self::projection().project(&GeoPoint2d::from(position))?))
    }

    /// Converts a distance in ground meters at the given latitude into screen
    /// pixels at the current resolution.
    pub fn meters_to_pixels(&self, meters: f64, lat: f64) -> f64 {
        meters / (self.resolution * lat.to_radians().cos())
    }

    /// Returns a copy of the view translated so that the map point that was
    /// displayed at the `from` screen position is displayed at `to`.
    pub fn translate_by_pixels(&self, from: Point2d, to: Point2d) -> Self {
        let delta = self.screen_to_map(to) - self.screen_to_map(from);
        self.translate(delta)
    }

    /// Returns a copy of the view translated by the given projected vector.
    pub fn translate(&self, delta: Vector2<f64>) -> Self {
        Self {
            position: self.position - delta,
            ..*self
        }
    }

    /// Returns a copy of the view with the resolution multiplied by `zoom`,
    /// keeping the map point under the `base_point` screen position fixed.
    pub fn zoom(&self, zoom: f64, base_point: Point2d) -> Self {
        let base_point = self.screen_to_map(base_point);
        let resolution = self.resolution * zoom;
        let position = base_point + (self.position - base_point) * zoom;
        Self {
            position,
            resolution,
            ..*self
        }
    }

    /// Returns a view interpolated between `self` and `target` with the ratio
    /// `k` in `0.0..=1.0`.
    pub(crate) fn interpolate(&self, target: &MapView, k: f64) -> Self {
        Self {
            position: self.position + (target.position - self.position) * k,
            resolution: self.resolution + (target.resolution - self.resolution) * k,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use geotap_types::latlon;

    use super::*;

    #[test]
    fn screen_to_map_size() {
        let view = MapView::default().with_size(Size::new(100.0, 100.0));

        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(0.0, 0.0)),
            Point2d::new(-50.0, 50.0),
            epsilon = 0.0001,
        );
        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(50.0, 50.0)),
            Point2d::new(0.0, 0.0),
            epsilon = 0.0001,
        );

        let view = MapView::default().with_size(Size::new(200.0, 50.0));

        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(0.0, 0.0)),
            Point2d::new(-100.0, 25.0),
            epsilon = 0.0001,
        );
        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(25.0, 49.0)),
            Point2d::new(-75.0, -24.0),
            epsilon = 0.0001,
        );
    }

    #[test]
    fn screen_to_map_position() {
        let view = MapView {
            position: Point2d::new(-100.0, -100.0),
            resolution: 1.0,
            size: Size::new(100.0, 100.0),
        };

        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(0.0, 0.0)),
            Point2d::new(-150.0, -50.0),
            epsilon = 0.0001,
        );
        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(50.0, 50.0)),
            Point2d::new(-100.0, -100.0),
            epsilon = 0.0001,
        );
        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(100.0, 100.0)),
            Point2d::new(-50.0, -150.0),
            epsilon = 0.0001,
        );
    }

    #[test]
    fn screen_to_map_resolution() {
        let view = MapView {
            position: Point2d::origin(),
            resolution: 2.0,
            size: Size::new(100.0, 100.0),
        };

        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(0.0, 0.0)),
            Point2d::new(-100.0, 100.0),
            epsilon = 0.0001,
        );
        assert_abs_diff_eq!(
            view.screen_to_map(Point2d::new(100.0, 100.0)),
            Point2d::new(100.0, -100.0),
            epsilon = 0.0001,
        );
    }

    #[test]
    fn map_to_screen_is_inverse() {
        let view = MapView {
            position: Point2d::new(1000.0, -500.0),
            resolution: 4.0,
            size: Size::new(640.0, 480.0),
        };

        for &(x, y) in &[(0.0, 0.0), (320.0, 240.0), (17.0, 433.0)] {
            let px = Point2d::new(x, y);
            assert_abs_diff_eq!(
                view.map_to_screen(view.screen_to_map(px)),
                px,
                epsilon = 0.0001,
            );
        }
    }

    #[test]
    fn zoom_keeps_base_point_fixed() {
        let view = MapView {
            position: Point2d::new(10.0, 20.0),
            resolution: 2.0,
            size: Size::new(100.0, 100.0),
        };

        let base_px = Point2d::new(30.0, 70.0);
        let base_map = view.screen_to_map(base_px);

        let zoomed = view.zoom(0.5, base_px);
        assert_abs_diff_eq!(zoomed.resolution(), 1.0);
        assert_abs_diff_eq!(zoomed.map_to_screen(base_map), base_px, epsilon = 0.0001);
    }

    #[test]
    fn translate_by_pixels_moves_against_drag() {
        let view = MapView::default().with_size(Size::new(100.0, 100.0));
        let translated = view.translate_by_pixels(Point2d::new(0.0, 0.0), Point2d::new(10.0, 5.0));

        assert_abs_diff_eq!(translated.position(), Point2d::new(-10.0, 5.0));
    }

    #[test]
    fn geo_center_projects_to_screen_center() {
        let view = MapView::new(&latlon!(52.0, 13.0), 10.0).with_size(Size::new(512.0, 256.0));
        let center = view.geo_position().expect("view center is projectable");

        assert_abs_diff_eq!(
            view.geo_to_screen(&center).expect("projectable"),
            Point2d::new(256.0, 128.0),
            epsilon = 0.0001,
        );
    }

    #[test]
    fn meters_to_pixels_scales_with_latitude() {
        let view = MapView::default().with_resolution(10.0);

        assert_abs_diff_eq!(view.meters_to_pixels(100.0, 0.0), 10.0, epsilon = 0.0001);
        assert_abs_diff_eq!(view.meters_to_pixels(100.0, 60.0), 20.0, epsilon = 0.0001);
    }
}
