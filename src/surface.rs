//! The render surface capability boundary.
//!
//! The controller never talks to a concrete renderer. Anything that can enumerate its
//! nodes, zoom, fit, center and relayout implements [`RenderSurface`] and can be driven
//! by [`ViewportController`](crate::ViewportController) and
//! [`ResetCoordinator`](crate::ResetCoordinator).

use crate::geometry::{Bounds, Point};
use crate::types::{NodeHandle, TransitionConfig};

/// Capabilities the viewport core consumes from a renderer.
pub trait RenderSurface {
    /// All nodes currently in the diagram, in no particular order.
    fn nodes(&self) -> Vec<NodeHandle>;

    /// Number of nodes currently in the diagram.
    fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Geometric center of the current viewport, in world space.
    fn graph_center_point(&self) -> Point;

    /// Scales the visible extent by `factor` about `center`.
    fn zoom(&mut self, factor: f32, center: Point, animate: bool, transition: &TransitionConfig);

    /// Fits all nodes, or `view_rect` when given, into the viewport with `padding` pixels of margin.
    fn fit_view(
        &mut self,
        padding: f32,
        view_rect: Option<Bounds>,
        animate: bool,
        transition: &TransitionConfig,
    );

    /// Pans so the nodes' bounding-box centroid sits in the middle of the viewport.
    fn fit_center(&mut self, animate: bool);

    /// Starts recomputing node placement. Returns before the layout has settled.
    fn layout(&mut self);

    /// Drops every in-memory position override so the next layout starts fresh.
    fn clean_local_positions(&mut self);

    /// Moves a node; unknown ids are ignored.
    fn set_node_position(&mut self, id: &str, position: Point);

    /// Whether the surface is still mounted. Torn-down surfaces report `false`.
    fn is_alive(&self) -> bool {
        true
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! A surface double that records every call it receives.

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceCall {
        Zoom {
            factor: f32,
            center: Point,
            animate: bool,
        },
        FitView {
            padding: f32,
            view_rect: Option<Bounds>,
            animate: bool,
        },
        FitCenter {
            animate: bool,
        },
        Layout,
        CleanLocalPositions,
        SetNodePosition {
            id: String,
            position: Point,
        },
    }

    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub nodes: Vec<NodeHandle>,
        pub center: Point,
        pub calls: Vec<SurfaceCall>,
        pub alive: bool,
        pub last_transition: Option<TransitionConfig>,
    }

    impl RecordingSurface {
        pub fn with_nodes(count: usize) -> Self {
            let nodes = (0..count)
                .map(|i| NodeHandle::new(format!("n{i}"), Point::new(i as f32 * 10.0, 0.0)))
                .collect();
            Self {
                nodes,
                alive: true,
                ..Default::default()
            }
        }

        pub fn count(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl RenderSurface for RecordingSurface {
        fn nodes(&self) -> Vec<NodeHandle> {
            self.nodes.clone()
        }

        fn graph_center_point(&self) -> Point {
            self.center
        }

        fn zoom(&mut self, factor: f32, center: Point, animate: bool, transition: &TransitionConfig) {
            self.last_transition = Some(*transition);
            self.calls.push(SurfaceCall::Zoom {
                factor,
                center,
                animate,
            });
        }

        fn fit_view(
            &mut self,
            padding: f32,
            view_rect: Option<Bounds>,
            animate: bool,
            transition: &TransitionConfig,
        ) {
            self.last_transition = Some(*transition);
            self.calls.push(SurfaceCall::FitView {
                padding,
                view_rect,
                animate,
            });
        }

        fn fit_center(&mut self, animate: bool) {
            self.calls.push(SurfaceCall::FitCenter { animate });
        }

        fn layout(&mut self) {
            self.calls.push(SurfaceCall::Layout);
        }

        fn clean_local_positions(&mut self) {
            self.calls.push(SurfaceCall::CleanLocalPositions);
        }

        fn set_node_position(&mut self, id: &str, position: Point) {
            if let Some(node) = self.nodes.iter_mut().find(|n| n.id == id) {
                node.position = position;
                self.calls.push(SurfaceCall::SetNodePosition {
                    id: id.to_string(),
                    position,
                });
            }
        }

        fn is_alive(&self) -> bool {
            self.alive
        }
    }
}
