//! Pan and zoom transform applied to the whole scene.
//!
//! The transform is the usual 2D affine matrix `[a, b, c, d, e, f]`
//! (`screen = world * zoom + (e, f)`), without rotation or skew.

use crate::geometry::Point;
use crate::options::ZoomOptions;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f64,
    pan_x: f64,
    pan_y: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Viewport {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn pan(&self) -> Point {
        Point::new(self.pan_x, self.pan_y)
    }

    pub fn transform(&self) -> [f64; 6] {
        [self.zoom, 0.0, 0.0, self.zoom, self.pan_x, self.pan_y]
    }

    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.pan_x) / self.zoom, (p.y - self.pan_y) / self.zoom)
    }

    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.pan_x, p.y * self.zoom + self.pan_y)
    }

    /// Translate the whole scene by a screen-space delta.
    pub fn relative_pan(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Set the zoom so that the world point under screen point `anchor` stays
    /// under it.
    pub fn zoom_to_point(&mut self, anchor: Point, zoom: f64) {
        let world = self.screen_to_world(anchor);
        self.zoom = zoom;
        let moved = self.world_to_screen(world);
        self.relative_pan(anchor.x - moved.x, anchor.y - moved.y);
    }

    /// Apply one wheel step at `anchor`, then keep the content attached to
    /// the canvas. Returns the new zoom.
    pub fn apply_wheel(
        &mut self,
        delta_y: f64,
        anchor: Point,
        canvas_width: f64,
        canvas_height: f64,
        options: &ZoomOptions,
    ) -> f64 {
        let zoom = clamp_zoom(self.zoom * options.base.powf(delta_y), options);
        self.zoom_to_point(anchor, zoom);
        self.clamp_pan(canvas_width, canvas_height, options);
        self.zoom
    }

    /// Zoomed out past the threshold the content is pinned to a fixed
    /// centered offset; otherwise the pan is kept between the canvas edge and
    /// the far edge of the scaled content.
    pub fn clamp_pan(&mut self, canvas_width: f64, canvas_height: f64, options: &ZoomOptions) {
        let content = options.content_size * self.zoom;

        if self.zoom < options.margin_threshold / options.content_size {
            let centered = options.margin_threshold / 2.0 - content / 2.0;
            self.pan_x = centered;
            self.pan_y = centered;
            return;
        }

        self.pan_x = clamp_axis(self.pan_x, canvas_width - content);
        self.pan_y = clamp_axis(self.pan_y, canvas_height - content);
    }
}

fn clamp_axis(offset: f64, far_limit: f64) -> f64 {
    if offset >= 0.0 {
        0.0
    } else if offset < far_limit {
        far_limit
    } else {
        offset
    }
}

/// Clamp a zoom value into the configured range. NaN falls back to the minimum.
pub fn clamp_zoom(zoom: f64, options: &ZoomOptions) -> f64 {
    if zoom.is_nan() {
        return options.min;
    }
    zoom.clamp(options.min, options.max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_zoom_to_point_keeps_anchor_fixed() {
        let mut vp = Viewport::default();
        vp.relative_pan(-30.0, -40.0);
        let anchor = Point::new(250.0, 120.0);
        let world = vp.screen_to_world(anchor);

        vp.zoom_to_point(anchor, 2.5);
        let back = vp.world_to_screen(world);
        assert!(close(back.x, anchor.x) && close(back.y, anchor.y));
    }

    #[test]
    fn test_wheel_down_zooms_out() {
        let mut vp = Viewport::default();
        let options = ZoomOptions::default();
        let zoom = vp.apply_wheel(100.0, Point::new(0.0, 0.0), 1000.0, 1000.0, &options);
        assert!(close(zoom, 0.999f64.powf(100.0)));
        assert!(zoom < 1.0);
    }

    #[test]
    fn test_far_zoom_out_centers_content() {
        let mut vp = Viewport::default();
        let options = ZoomOptions::default();
        let zoom = vp.apply_wheel(2000.0, Point::new(500.0, 500.0), 1000.0, 1000.0, &options);
        assert!(zoom < 0.4);
        let expected = 200.0 - 1000.0 * zoom / 2.0;
        assert!(close(vp.pan().x, expected) && close(vp.pan().y, expected));
    }

    #[test]
    fn test_zoomed_in_pan_is_clamped() {
        let mut vp = Viewport::default();
        let options = ZoomOptions::default();
        vp.zoom_to_point(Point::new(0.0, 0.0), 2.0);

        vp.relative_pan(50.0, 50.0);
        vp.clamp_pan(1000.0, 800.0, &options);
        assert_eq!(vp.pan(), Point::new(0.0, 0.0));

        vp.relative_pan(-5000.0, -5000.0);
        vp.clamp_pan(1000.0, 800.0, &options);
        assert_eq!(vp.pan(), Point::new(1000.0 - 2000.0, 800.0 - 2000.0));
    }

    #[test]
    fn test_relative_pan() {
        let mut vp = Viewport::default();
        vp.relative_pan(10.0, -5.0);
        vp.relative_pan(1.0, 1.0);
        assert_eq!(vp.transform(), [1.0, 0.0, 0.0, 1.0, 11.0, -4.0]);
        assert_eq!(vp.screen_to_world(Point::new(11.0, -4.0)), Point::new(0.0, 0.0));
    }

    proptest! {
        #[test]
        fn prop_zoom_stays_in_range(
            deltas in proptest::collection::vec(-5000.0..5000.0f64, 1..60),
            x in 0.0..1000.0f64,
            y in 0.0..1000.0f64,
        ) {
            let options = ZoomOptions::default();
            let mut vp = Viewport::default();
            for delta in deltas {
                let zoom = vp.apply_wheel(delta, Point::new(x, y), 1000.0, 1000.0, &options);
                prop_assert!((0.01..=20.0).contains(&zoom));
            }
        }
    }
}
