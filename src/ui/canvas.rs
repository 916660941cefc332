//! The egui render surface: node storage, camera, animation and pointer interaction.
//!
//! [`EguiSurface`] is what the viewport controller drives in the viewer. It owns
//! the live node positions and the camera; the controller only sends it targets.

use super::layout::{seed_positions, ForceLayout, LayoutProgress};
use crate::constants::*;
use crate::geometry::{Bounds, Point, ViewTransform};
use crate::surface::RenderSurface;
use crate::types::*;
use eframe::egui;
use std::collections::HashMap;

/// A node as held by the viewer.
#[derive(Debug, Clone)]
pub struct SurfaceNode {
    /// Identifier of the node
    pub id: NodeId,
    /// Text drawn under the node
    pub label: String,
    /// Position in world space
    pub position: egui::Pos2,
    /// Set when the position came from the user or from storage; the layout leaves it alone
    pub pinned: bool,
}

/// Notifications the app reacts to by persisting positions.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// The user finished dragging a node
    NodeDragged(NodeId),
    /// A layout pass came to rest
    LayoutSettled,
}

/// An eased camera move in progress.
#[derive(Debug, Clone, Copy)]
struct CameraAnimation {
    from: ViewTransform,
    to: ViewTransform,
    elapsed: f32,
    duration: f32,
    easing: Easing,
}

/// egui-backed implementation of [`RenderSurface`].
pub struct EguiSurface {
    nodes: Vec<SurfaceNode>,
    index: HashMap<NodeId, usize>,
    links: Vec<(usize, usize)>,
    camera: ViewTransform,
    animation: Option<CameraAnimation>,
    viewport: egui::Rect,
    layout: ForceLayout,
    events: Vec<SurfaceEvent>,
    alive: bool,
    dragging: Option<usize>,
    drag_offset: egui::Vec2,
    last_pan_pos: Option<egui::Pos2>,
}

impl EguiSurface {
    /// Builds a surface for `topology` with every node on its seed position.
    ///
    /// Links naming unknown nodes are dropped.
    pub fn from_topology(topology: &Topology) -> Self {
        let seeds = seed_positions(topology.nodes.len());
        let mut nodes = Vec::with_capacity(topology.nodes.len());
        let mut index = HashMap::new();
        for (node, seed) in topology.nodes.iter().zip(seeds) {
            if index.contains_key(&node.id) {
                log::warn!("Duplicate node id {} ignored", node.id);
                continue;
            }
            index.insert(node.id.clone(), nodes.len());
            nodes.push(SurfaceNode {
                id: node.id.clone(),
                label: if node.label.is_empty() {
                    node.id.clone()
                } else {
                    node.label.clone()
                },
                position: seed,
                pinned: false,
            });
        }
        let links = topology
            .links
            .iter()
            .filter_map(|link| match (index.get(&link.source), index.get(&link.target)) {
                (Some(&from), Some(&to)) if from != to => Some((from, to)),
                _ => {
                    log::debug!("Skipping link {} -> {}", link.source, link.target);
                    None
                }
            })
            .collect();
        Self {
            nodes,
            index,
            links,
            camera: ViewTransform::default(),
            animation: None,
            viewport: egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(800.0, 600.0)),
            layout: ForceLayout::default(),
            events: Vec::new(),
            alive: true,
            dragging: None,
            drag_offset: egui::Vec2::ZERO,
            last_pan_pos: None,
        }
    }

    /// Nodes in drawing order.
    pub fn surface_nodes(&self) -> &[SurfaceNode] {
        &self.nodes
    }

    /// Links as index pairs into [`surface_nodes`](Self::surface_nodes).
    pub fn links(&self) -> &[(usize, usize)] {
        &self.links
    }

    /// The camera as currently displayed (mid-animation if one is running).
    pub fn camera(&self) -> ViewTransform {
        self.camera
    }

    /// Where the camera will end up once any running animation finishes.
    pub fn target_camera(&self) -> ViewTransform {
        self.animation.map(|a| a.to).unwrap_or(self.camera)
    }

    /// Screen rectangle the surface draws into.
    pub fn viewport(&self) -> egui::Rect {
        self.viewport
    }

    /// Updates the screen rectangle; called once per frame by the canvas.
    pub fn set_viewport(&mut self, viewport: egui::Rect) {
        self.viewport = viewport;
    }

    /// Whether a camera animation or a layout pass is in progress.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some() || self.layout.is_running()
    }

    /// Index of the node being dragged, if any.
    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    /// Marks the surface as unmounted; later calls from deferred work become no-ops.
    pub fn tear_down(&mut self) {
        self.alive = false;
        self.animation = None;
        self.layout.stop();
    }

    /// Takes all pending events.
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    /// Converts a world position to screen space using the displayed camera.
    pub fn world_to_screen(&self, world: egui::Pos2) -> egui::Pos2 {
        self.camera.to_screen(world.into()).into()
    }

    /// Converts a screen position to world space using the displayed camera.
    pub fn screen_to_world(&self, screen: egui::Pos2) -> egui::Pos2 {
        self.camera.to_world(screen.into()).into()
    }

    /// World-space bounding box of all nodes including their radius.
    pub fn node_bounds(&self) -> Option<Bounds> {
        self.node_centers_bounds().map(|b| b.expand(NODE_RADIUS))
    }

    /// Bounding box of node centers only.
    fn node_centers_bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.nodes.iter().map(|n| Point::from(n.position)))
    }

    /// What a fit should frame: all nodes with their radius, or the bare point when
    /// every node sits on the same spot so the fit only centers.
    fn fit_content(&self) -> Option<Bounds> {
        let centers = self.node_centers_bounds()?;
        if centers.width() <= f32::EPSILON && centers.height() <= f32::EPSILON {
            Some(centers)
        } else {
            Some(centers.expand(NODE_RADIUS))
        }
    }

    /// Advances camera animation and layout by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if let Some(mut animation) = self.animation {
            animation.elapsed += dt;
            let t = if animation.duration > 0.0 {
                animation.elapsed / animation.duration
            } else {
                1.0
            };
            if t >= 1.0 {
                self.camera = animation.to;
                self.animation = None;
            } else {
                self.camera = animation.from.lerp(&animation.to, animation.easing.apply(t));
                self.animation = Some(animation);
            }
        }

        if self.layout.is_running() {
            let mut positions: Vec<egui::Pos2> = self.nodes.iter().map(|n| n.position).collect();
            let pinned: Vec<bool> = self.nodes.iter().map(|n| n.pinned).collect();
            let progress = self.layout.advance(
                &mut positions,
                &pinned,
                &self.links,
                LAYOUT_ITERATIONS_PER_FRAME,
                LAYOUT_SETTLE_THRESHOLD,
            );
            for (node, position) in self.nodes.iter_mut().zip(positions) {
                node.position = position;
            }
            if progress == LayoutProgress::Settled {
                log::debug!("Layout settled for {} nodes", self.nodes.len());
                self.events.push(SurfaceEvent::LayoutSettled);
            }
        }
    }

    /// Moves the camera to `target`, eased over the transition when `animate` is set.
    fn apply_camera(&mut self, target: ViewTransform, animate: bool, transition: &TransitionConfig) {
        if animate && transition.duration_ms > 0 {
            self.animation = Some(CameraAnimation {
                from: self.camera,
                to: target,
                elapsed: 0.0,
                duration: transition.duration().as_secs_f32(),
                easing: transition.easing,
            });
        } else {
            self.animation = None;
            self.camera = target;
        }
    }

    /// Finds the topmost node under a world position.
    pub fn find_node_at_position(&self, world: egui::Pos2) -> Option<usize> {
        self.nodes
            .iter()
            .rposition(|n| (n.position - world).length() <= NODE_RADIUS)
    }

    /// Handles scroll wheel zooming about the cursor.
    ///
    /// Each wheel notch scales the visible extent by 5%; applied instantly.
    pub fn handle_canvas_zoom(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let scroll_delta = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta == 0.0 {
            return;
        }
        let Some(mouse_pos) = ui.input(|i| i.pointer.hover_pos()) else {
            return;
        };
        // Only zoom if the cursor is over the canvas
        if !response.rect.contains(mouse_pos) {
            return;
        }
        let factor = if scroll_delta > 0.0 { 0.95 } else { 1.05 };
        let pivot = self.screen_to_world(mouse_pos);
        self.animation = None;
        self.camera = self.camera.zoomed_about(factor, pivot.into());
    }

    /// Handles primary-button dragging: on a node it moves the node, on empty space it pans.
    /// Middle-button drags always pan.
    pub fn handle_pointer_drag(&mut self, ui: &egui::Ui, response: &egui::Response) {
        let (primary_down, middle_down) =
            ui.input(|i| (i.pointer.primary_down(), i.pointer.middle_down()));

        if !primary_down && !middle_down {
            if let Some(index) = self.dragging.take() {
                self.events
                    .push(SurfaceEvent::NodeDragged(self.nodes[index].id.clone()));
            }
            self.last_pan_pos = None;
            return;
        }

        let Some(current_pos) = response.interact_pointer_pos() else {
            return;
        };
        let world_pos = self.screen_to_world(current_pos);

        if let Some(index) = self.dragging {
            let node = &mut self.nodes[index];
            node.position = world_pos + self.drag_offset;
            node.pinned = true;
            return;
        }

        if let Some(last_pos) = self.last_pan_pos {
            let delta = current_pos - last_pos;
            self.animation = None;
            self.camera.offset.x += delta.x;
            self.camera.offset.y += delta.y;
            self.last_pan_pos = Some(current_pos);
            return;
        }

        // Press just started: decide between node drag and pan
        match self.find_node_at_position(world_pos) {
            Some(index) if primary_down && !middle_down => {
                self.dragging = Some(index);
                self.drag_offset = self.nodes[index].position - world_pos;
            }
            _ => self.last_pan_pos = Some(current_pos),
        }
    }
}

impl RenderSurface for EguiSurface {
    fn nodes(&self) -> Vec<NodeHandle> {
        self.nodes
            .iter()
            .map(|n| NodeHandle::new(n.id.clone(), n.position.into()))
            .collect()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn graph_center_point(&self) -> Point {
        self.target_camera().to_world(self.viewport.center().into())
    }

    fn zoom(&mut self, factor: f32, center: Point, animate: bool, transition: &TransitionConfig) {
        let target = self.target_camera().zoomed_about(factor, center);
        self.apply_camera(target, animate, transition);
    }

    fn fit_view(
        &mut self,
        padding: f32,
        view_rect: Option<Bounds>,
        animate: bool,
        transition: &TransitionConfig,
    ) {
        let Some(content) = view_rect.or_else(|| self.fit_content()) else {
            return;
        };
        let target = ViewTransform::fit(content, self.viewport.into(), padding);
        self.apply_camera(target, animate, transition);
    }

    fn fit_center(&mut self, animate: bool) {
        let Some(bounds) = self.node_bounds() else {
            return;
        };
        let target = self
            .target_camera()
            .centered_on(bounds.center(), self.viewport.into());
        self.apply_camera(target, animate, &TransitionConfig::default());
    }

    fn layout(&mut self) {
        log::debug!("Starting layout pass over {} nodes", self.nodes.len());
        self.layout.start(self.nodes.len(), LAYOUT_MAX_ITERATIONS);
    }

    fn clean_local_positions(&mut self) {
        self.dragging = None;
        let seeds = seed_positions(self.nodes.len());
        for (node, seed) in self.nodes.iter_mut().zip(seeds) {
            node.position = seed;
            node.pinned = false;
        }
    }

    fn set_node_position(&mut self, id: &str, position: Point) {
        if let Some(&index) = self.index.get(id) {
            let node = &mut self.nodes[index];
            node.position = position.into();
            node.pinned = true;
        }
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples::{build_example, ExampleKind};

    fn surface(n: usize) -> EguiSurface {
        let mut surface = EguiSurface::from_topology(&build_example(ExampleKind::Ring, n));
        surface.set_viewport(egui::Rect::from_min_size(
            egui::Pos2::ZERO,
            egui::vec2(1000.0, 800.0),
        ));
        surface
    }

    #[test]
    fn test_instant_zoom_applies_immediately() {
        let mut s = surface(5);
        let center = s.graph_center_point();
        s.zoom(1.2, center, false, &TransitionConfig::default());
        assert!(!s.is_animating());
        assert!((s.camera().zoom - 1.0 / 1.2).abs() < 1e-4);
        // The viewport center stays on the same world point
        let after = s.graph_center_point();
        assert!(center.distance(after) < 1e-2);
    }

    #[test]
    fn test_animated_zoom_reaches_same_target() {
        let mut animated = surface(5);
        let mut instant = surface(5);
        let center = animated.graph_center_point();
        animated.zoom(0.8, center, true, &TransitionConfig::default());
        instant.zoom(0.8, center, false, &TransitionConfig::default());
        assert!(animated.is_animating());
        assert_eq!(animated.target_camera(), instant.camera());
        animated.tick(0.1);
        assert_ne!(animated.camera(), instant.camera());
        animated.tick(0.2);
        assert!(!animated.is_animating());
        assert_eq!(animated.camera(), instant.camera());
    }

    #[test]
    fn test_fit_view_keeps_every_node_on_screen() {
        let mut s = surface(30);
        s.fit_view(20.0, None, false, &TransitionConfig::default());
        let viewport = s.viewport().shrink(19.0);
        for node in s.surface_nodes() {
            assert!(viewport.contains(s.world_to_screen(node.position)));
        }
    }

    #[test]
    fn test_fit_view_on_single_node_only_centers() {
        let mut s = surface(1);
        s.set_node_position("broker-0", Point::new(300.0, -120.0));
        s.fit_view(20.0, None, false, &TransitionConfig::default());
        assert_eq!(s.camera().zoom, 1.0);
        let screen = s.world_to_screen(egui::pos2(300.0, -120.0));
        assert!((screen - s.viewport().center()).length() < 1e-2);
    }

    #[test]
    fn test_fit_center_keeps_zoom() {
        let mut s = surface(8);
        s.zoom(0.5, Point::default(), false, &TransitionConfig::default());
        let zoom = s.camera().zoom;
        s.fit_center(false);
        assert_eq!(s.camera().zoom, zoom);
        let center = s.node_bounds().unwrap().center();
        let screen = s.world_to_screen(center.into());
        assert!((screen - s.viewport().center()).length() < 1e-2);
    }

    #[test]
    fn test_clean_local_positions_unpins_and_reseeds() {
        let mut s = surface(4);
        s.set_node_position("broker-2", Point::new(500.0, 500.0));
        assert!(s.surface_nodes()[2].pinned);
        s.clean_local_positions();
        assert!(s.surface_nodes().iter().all(|n| !n.pinned));
        assert_eq!(s.surface_nodes()[2].position, seed_positions(4)[2]);
    }

    #[test]
    fn test_layout_emits_settled_event() {
        let mut s = surface(6);
        s.layout();
        for _ in 0..(LAYOUT_MAX_ITERATIONS / LAYOUT_ITERATIONS_PER_FRAME + 1) {
            s.tick(1.0 / 60.0);
        }
        assert!(!s.is_animating());
        assert_eq!(s.drain_events(), vec![SurfaceEvent::LayoutSettled]);
        assert!(s.drain_events().is_empty());
    }

    #[test]
    fn test_unknown_links_dropped() {
        let mut topology = build_example(ExampleKind::Ring, 3);
        topology.add_link("broker-0", "nowhere");
        let s = EguiSurface::from_topology(&topology);
        assert_eq!(s.links().len(), 3);
    }
}
