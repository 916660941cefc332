//! Plane geometry shared by the controller and render surfaces.
//!
//! World coordinates are the layout engine's coordinates; screen coordinates are
//! pixels inside the canvas. A [`ViewTransform`] maps between the two with
//! `screen = world * zoom + offset`, the same convention the canvas uses for
//! panning and zooming.

use crate::constants::{MAX_ZOOM, MIN_ZOOM};
use serde::{Deserialize, Serialize};

/// A 2D coordinate. Unbounded in both axes.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Point {
    /// Creates a point from its coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<egui::Pos2> for Point {
    fn from(pos: egui::Pos2) -> Self {
        Self::new(pos.x, pos.y)
    }
}

impl From<Point> for egui::Pos2 {
    fn from(point: Point) -> Self {
        egui::pos2(point.x, point.y)
    }
}

/// Axis-aligned rectangle given by its min and max corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Top-left corner
    pub min: Point,
    /// Bottom-right corner
    pub max: Point,
}

impl Bounds {
    /// Creates bounds from two corners in any order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest bounds containing every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |acc, p| Self {
            min: Point::new(acc.min.x.min(p.x), acc.min.y.min(p.y)),
            max: Point::new(acc.max.x.max(p.x), acc.max.y.max(p.y)),
        }))
    }

    /// Width of the rectangle.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Height of the rectangle.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Centroid of the rectangle.
    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    /// Grows the rectangle by `amount` on every side.
    pub fn expand(&self, amount: f32) -> Self {
        Self {
            min: Point::new(self.min.x - amount, self.min.y - amount),
            max: Point::new(self.max.x + amount, self.max.y + amount),
        }
    }

    /// Whether `point` lies inside or on the edge of the rectangle.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

impl From<egui::Rect> for Bounds {
    fn from(rect: egui::Rect) -> Self {
        Self {
            min: rect.min.into(),
            max: rect.max.into(),
        }
    }
}

/// Camera transform from world space to screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Magnification (1.0 = one world unit per pixel)
    pub zoom: f32,
    /// Screen position of the world origin
    pub offset: Point,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            offset: Point::default(),
        }
    }
}

impl ViewTransform {
    /// Converts a world position to screen space.
    pub fn to_screen(&self, world: Point) -> Point {
        Point::new(
            world.x * self.zoom + self.offset.x,
            world.y * self.zoom + self.offset.y,
        )
    }

    /// Converts a screen position to world space.
    pub fn to_world(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.offset.x) / self.zoom,
            (screen.y - self.offset.y) / self.zoom,
        )
    }

    /// The world-space rectangle visible through `viewport`.
    pub fn visible_world(&self, viewport: Bounds) -> Bounds {
        Bounds::from_corners(self.to_world(viewport.min), self.to_world(viewport.max))
    }

    /// Scales the visible extent by `factor` while keeping `pivot` (world space) fixed on screen.
    ///
    /// A factor above 1 shows more of the world (zooms out), below 1 magnifies.
    /// `factor` must be positive. Magnification is kept within `[MIN_ZOOM, MAX_ZOOM]`,
    /// widened to include the current zoom, so a step never moves against its direction.
    pub fn zoomed_about(&self, factor: f32, pivot: Point) -> Self {
        let lower = MIN_ZOOM.min(self.zoom);
        let upper = MAX_ZOOM.max(self.zoom);
        let zoom = (self.zoom / factor).clamp(lower, upper);
        let pivot_screen = self.to_screen(pivot);
        Self {
            zoom,
            offset: Point::new(pivot_screen.x - pivot.x * zoom, pivot_screen.y - pivot.y * zoom),
        }
    }

    /// Keeps the zoom and pans so `world` sits at the middle of `viewport`.
    pub fn centered_on(&self, world: Point, viewport: Bounds) -> Self {
        let center = viewport.center();
        Self {
            zoom: self.zoom,
            offset: Point::new(center.x - world.x * self.zoom, center.y - world.y * self.zoom),
        }
    }

    /// The largest-magnification transform showing all of `content` inside `viewport`
    /// with `padding` screen pixels of margin on every side.
    ///
    /// Degenerate content (a single point) keeps unit zoom and only centers. Magnification
    /// is capped at `MAX_ZOOM` but has no lower bound, so content of any size fits.
    pub fn fit(content: Bounds, viewport: Bounds, padding: f32) -> Self {
        let available_w = (viewport.width() - 2.0 * padding).max(1.0);
        let available_h = (viewport.height() - 2.0 * padding).max(1.0);
        let zoom_x = if content.width() > f32::EPSILON {
            available_w / content.width()
        } else {
            f32::INFINITY
        };
        let zoom_y = if content.height() > f32::EPSILON {
            available_h / content.height()
        } else {
            f32::INFINITY
        };
        let zoom = match zoom_x.min(zoom_y) {
            z if z.is_finite() => z.min(MAX_ZOOM),
            _ => 1.0,
        };
        Self {
            zoom,
            offset: Point::default(),
        }
        .centered_on(content.center(), viewport)
    }

    /// Interpolates between two transforms; `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, target: &ViewTransform, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            zoom: self.zoom + (target.zoom - self.zoom) * t,
            offset: Point::new(
                self.offset.x + (target.offset.x - self.offset.x) * t,
                self.offset.y + (target.offset.y - self.offset.y) * t,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_bounds_from_points() {
        let bounds = Bounds::from_points([
            Point::new(-10.0, 5.0),
            Point::new(30.0, -5.0),
            Point::new(0.0, 25.0),
        ])
        .unwrap();
        assert_eq!(bounds.min, Point::new(-10.0, -5.0));
        assert_eq!(bounds.max, Point::new(30.0, 25.0));
        assert_eq!(bounds.center(), Point::new(10.0, 10.0));
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_screen_world_inverse() {
        let t = ViewTransform {
            zoom: 2.5,
            offset: Point::new(120.0, -40.0),
        };
        let world = Point::new(13.0, -7.0);
        let back = t.to_world(t.to_screen(world));
        assert!(approx(back.x, world.x) && approx(back.y, world.y));
    }

    #[test]
    fn test_zoom_out_factor_shrinks_magnification() {
        let t = ViewTransform::default();
        let pivot = Point::new(50.0, 50.0);
        let out = t.zoomed_about(1.2, pivot);
        let inn = t.zoomed_about(0.8, pivot);
        assert!(out.zoom < t.zoom);
        assert!(inn.zoom > t.zoom);
        // Pivot stays put on screen
        let before = t.to_screen(pivot);
        let after = out.to_screen(pivot);
        assert!(approx(before.x, after.x) && approx(before.y, after.y));
    }

    #[test]
    fn test_fit_contains_content_with_padding() {
        let content = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(400.0, 100.0));
        let viewport = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(840.0, 600.0));
        let t = ViewTransform::fit(content, viewport, 20.0);
        // Width is the binding dimension: (840 - 40) / 400
        assert!(approx(t.zoom, 2.0));
        let min = t.to_screen(content.min);
        let max = t.to_screen(content.max);
        assert!(approx(min.x, 20.0) && approx(max.x, 820.0));
        let mid = t.to_screen(content.center());
        assert!(approx(mid.x, 420.0) && approx(mid.y, 300.0));
    }

    #[test]
    fn test_fit_contains_very_wide_content() {
        let content = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(40_000.0, 100.0));
        let viewport = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(800.0, 600.0));
        let t = ViewTransform::fit(content, viewport, 20.0);
        // (800 - 40) / 40000, well below the interactive zoom floor
        assert!(approx(t.zoom, 0.019));
        assert!(t.zoom < MIN_ZOOM);
        let min = t.to_screen(content.min);
        let max = t.to_screen(content.max);
        assert!(min.x >= 0.0 && max.x <= 800.0);
        assert!(approx(min.x, 20.0) && (max.x - 780.0).abs() < 0.1);
    }

    #[test]
    fn test_fit_caps_magnification_of_tiny_content() {
        let content = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let viewport = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(800.0, 600.0));
        let t = ViewTransform::fit(content, viewport, 20.0);
        assert!(approx(t.zoom, MAX_ZOOM));
    }

    #[test]
    fn test_zoom_steps_below_floor_never_reverse() {
        let t = ViewTransform {
            zoom: 0.019,
            offset: Point::default(),
        };
        let pivot = Point::new(0.0, 0.0);
        // Zooming out from under the floor stays put instead of jumping in
        assert!(approx(t.zoomed_about(1.2, pivot).zoom, 0.019));
        assert!(t.zoomed_about(0.8, pivot).zoom > t.zoom);
        // Ordinary zoom out still stops at the floor
        let near_floor = ViewTransform {
            zoom: MIN_ZOOM * 1.1,
            offset: Point::default(),
        };
        assert!(approx(near_floor.zoomed_about(1.2, pivot).zoom, MIN_ZOOM));
    }

    #[test]
    fn test_fit_single_point_only_centers() {
        let p = Point::new(7.0, 9.0);
        let content = Bounds { min: p, max: p };
        let viewport = Bounds::from_corners(Point::new(0.0, 0.0), Point::new(200.0, 100.0));
        let t = ViewTransform::fit(content, viewport, 20.0);
        assert!(approx(t.zoom, 1.0));
        let screen = t.to_screen(p);
        assert!(approx(screen.x, 100.0) && approx(screen.y, 50.0));
    }
}
