//! Zoom, fit-to-view and centering against a render surface.

use crate::guard::PerformanceGuard;
use crate::surface::RenderSurface;
use crate::types::TransitionConfig;

/// Issues viewport operations, animating them only while the graph is small enough.
///
/// The controller holds no viewport state of its own; the surface owns zoom and
/// center, the controller only sends targets and deltas. Inputs are trusted:
/// callers validate `factor > 0` and `padding >= 0` before calling in (see
/// [`ControlSurface`](crate::ControlSurface)).
#[derive(Debug, Clone, Copy, Default)]
pub struct ViewportController {
    guard: PerformanceGuard,
    transition: TransitionConfig,
}

impl ViewportController {
    /// Creates a controller with the given guard and transition settings.
    pub fn new(guard: PerformanceGuard, transition: TransitionConfig) -> Self {
        Self { guard, transition }
    }

    /// The guard consulted before each transition.
    pub fn guard(&self) -> &PerformanceGuard {
        &self.guard
    }

    /// The transition applied whenever animation is enabled.
    pub fn transition(&self) -> &TransitionConfig {
        &self.transition
    }

    fn should_animate<S: RenderSurface + ?Sized>(&self, surface: &S) -> bool {
        let node_count = surface.node_count();
        let animate = self.guard.should_animate(node_count);
        log::debug!(
            "{} nodes against limit {}: {}",
            node_count,
            self.guard.node_count_limit(),
            if animate { "animated" } else { "instant" }
        );
        animate
    }

    /// Scales the visible extent by `factor` around the surface's current center.
    ///
    /// `1.2` zooms out, `0.8` zooms in. Requires `factor > 0`.
    pub fn zoom<S: RenderSurface + ?Sized>(&self, surface: &mut S, factor: f32) {
        let animate = self.should_animate(surface);
        let center = surface.graph_center_point();
        surface.zoom(factor, center, animate, &self.transition);
    }

    /// Fits every node into the viewport with `padding` pixels of margin.
    ///
    /// No-op on an empty diagram. Requires `padding >= 0`.
    pub fn fit_to_view<S: RenderSurface + ?Sized>(&self, surface: &mut S, padding: f32) {
        if surface.node_count() == 0 {
            log::debug!("fit_to_view skipped: no nodes");
            return;
        }
        let animate = self.should_animate(surface);
        surface.fit_view(padding, None, animate, &self.transition);
    }

    /// Recenters on the nodes' bounding-box centroid without changing zoom.
    ///
    /// Always instantaneous. No-op on an empty diagram.
    pub fn center<S: RenderSurface + ?Sized>(&self, surface: &mut S) {
        if surface.node_count() == 0 {
            log::debug!("center skipped: no nodes");
            return;
        }
        surface.fit_center(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::surface::testing::{RecordingSurface, SurfaceCall};

    fn controller(limit: usize) -> ViewportController {
        ViewportController::new(
            PerformanceGuard::new(limit).unwrap(),
            TransitionConfig::default(),
        )
    }

    #[test]
    fn test_zoom_animates_small_graphs_only() {
        let ctl = controller(50);

        let mut small = RecordingSurface::with_nodes(10);
        small.center = Point::new(3.0, 4.0);
        ctl.zoom(&mut small, 1.2);

        let mut large = RecordingSurface::with_nodes(1000);
        large.center = Point::new(3.0, 4.0);
        ctl.zoom(&mut large, 1.2);

        assert_eq!(
            small.calls,
            vec![SurfaceCall::Zoom {
                factor: 1.2,
                center: Point::new(3.0, 4.0),
                animate: true
            }]
        );
        assert_eq!(
            large.calls,
            vec![SurfaceCall::Zoom {
                factor: 1.2,
                center: Point::new(3.0, 4.0),
                animate: false
            }]
        );
        assert_eq!(small.last_transition, Some(TransitionConfig::default()));
    }

    #[test]
    fn test_fit_to_view_on_empty_diagram_is_noop() {
        let ctl = controller(50);
        let mut surface = RecordingSurface::with_nodes(0);
        ctl.fit_to_view(&mut surface, 20.0);
        ctl.center(&mut surface);
        assert!(surface.calls.is_empty());
    }

    #[test]
    fn test_fit_to_view_passes_padding_and_animate_flag() {
        let ctl = controller(5);
        let mut surface = RecordingSurface::with_nodes(6);
        ctl.fit_to_view(&mut surface, 20.0);
        assert_eq!(
            surface.calls,
            vec![SurfaceCall::FitView {
                padding: 20.0,
                view_rect: None,
                animate: false
            }]
        );
    }

    #[test]
    fn test_center_is_always_instant() {
        let ctl = controller(50);
        let mut surface = RecordingSurface::with_nodes(3);
        ctl.center(&mut surface);
        assert_eq!(surface.calls, vec![SurfaceCall::FitCenter { animate: false }]);
    }
}
