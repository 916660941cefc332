//! Canvas rendering functionality for nodes, links, and grid.
//!
//! This module handles all drawing operations including the grid background,
//! link lines with direction arrows, and node visualization.

use super::canvas::EguiSurface;
use crate::constants::*;
use eframe::egui;

/// Below this on-screen node radius, labels are skipped.
const LABEL_MIN_SCREEN_RADIUS: f32 = 8.0;

impl EguiSurface {
    /// Renders the grid, links and nodes, in that order.
    ///
    /// # Arguments
    ///
    /// * `painter` - The egui painter for drawing operations
    /// * `show_grid` - Whether to draw the background grid
    /// * `dark_mode` - Picks label and outline colors
    pub fn paint(&self, painter: &egui::Painter, show_grid: bool, dark_mode: bool) {
        let canvas_rect = self.viewport();
        if show_grid {
            self.draw_grid(painter, canvas_rect);
        }

        let link_color = if dark_mode {
            egui::Color32::from_gray(110)
        } else {
            egui::Color32::from_gray(150)
        };
        let nodes = self.surface_nodes();
        for &(from, to) in self.links() {
            let start = self.world_to_screen(nodes[from].position);
            let end = self.world_to_screen(nodes[to].position);
            if !canvas_rect.intersects(egui::Rect::from_two_pos(start, end)) {
                continue;
            }
            painter.line_segment([start, end], egui::Stroke::new(1.5, link_color));
            self.draw_arrow_at_center(painter, start, end, link_color);
        }

        for index in 0..nodes.len() {
            self.draw_node(painter, index, dark_mode);
        }
    }

    /// Draws a zoom-aware grid on the canvas.
    ///
    /// Skipped entirely when grid cells would be smaller than a few pixels.
    fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let zoom = self.camera().zoom;
        let screen_grid_size = GRID_SIZE * zoom;
        if screen_grid_size < 4.0 {
            return;
        }
        let stroke = egui::Stroke::new(1.0, egui::Color32::from_rgba_unmultiplied(128, 128, 128, 28));

        let visible = self.camera().visible_world(canvas_rect.into());

        let mut x = (visible.min.x / GRID_SIZE).floor() * GRID_SIZE;
        while x <= visible.max.x {
            let screen_x = self.world_to_screen(egui::pos2(x, 0.0)).x;
            painter.line_segment(
                [
                    egui::pos2(screen_x, canvas_rect.min.y),
                    egui::pos2(screen_x, canvas_rect.max.y),
                ],
                stroke,
            );
            x += GRID_SIZE;
        }

        let mut y = (visible.min.y / GRID_SIZE).floor() * GRID_SIZE;
        while y <= visible.max.y {
            let screen_y = self.world_to_screen(egui::pos2(0.0, y)).y;
            painter.line_segment(
                [
                    egui::pos2(canvas_rect.min.x, screen_y),
                    egui::pos2(canvas_rect.max.x, screen_y),
                ],
                stroke,
            );
            y += GRID_SIZE;
        }
    }

    /// Draws a filled triangle at the middle of a link pointing from source to target.
    fn draw_arrow_at_center(
        &self,
        painter: &egui::Painter,
        start: egui::Pos2,
        end: egui::Pos2,
        color: egui::Color32,
    ) {
        let zoom = self.camera().zoom;
        if zoom < 0.3 || (end - start).length_sq() < 1.0 {
            return;
        }
        let center = start + (end - start) * 0.5;
        let direction = (end - start).normalized();
        let perpendicular = egui::vec2(-direction.y, direction.x);
        let arrow_size = 6.0 * zoom;
        let arrow_width = 4.0 * zoom;

        let tip = center + direction * arrow_size;
        let left = center - direction * arrow_size + perpendicular * arrow_width;
        let right = center - direction * arrow_size - perpendicular * arrow_width;

        painter.add(egui::Shape::convex_polygon(
            vec![tip, left, right],
            color,
            egui::Stroke::NONE,
        ));
    }

    /// Draws one node as a circle with its label underneath.
    fn draw_node(&self, painter: &egui::Painter, index: usize, dark_mode: bool) {
        let node = &self.surface_nodes()[index];
        let screen_pos = self.world_to_screen(node.position);
        let radius = NODE_RADIUS * self.camera().zoom;
        if !self.viewport().expand(radius).contains(screen_pos) {
            return;
        }

        let fill = if self.dragging() == Some(index) {
            egui::Color32::from_rgb(255, 165, 0)
        } else if node.pinned {
            egui::Color32::from_rgb(90, 140, 220)
        } else {
            egui::Color32::from_rgb(120, 190, 140)
        };
        let outline = if dark_mode {
            egui::Color32::from_gray(30)
        } else {
            egui::Color32::BLACK
        };
        painter.circle(screen_pos, radius, fill, egui::Stroke::new(1.5, outline));

        if radius >= LABEL_MIN_SCREEN_RADIUS {
            let text_color = if dark_mode {
                egui::Color32::from_gray(220)
            } else {
                egui::Color32::from_gray(40)
            };
            let font_size = (11.0 * self.camera().zoom).clamp(8.0, 22.0);
            painter.text(
                screen_pos + egui::vec2(0.0, radius + 2.0),
                egui::Align2::CENTER_TOP,
                &node.label,
                egui::FontId::proportional(font_size),
                text_color,
            );
        }
    }
}
