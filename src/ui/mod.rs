//! Interactive viewer for topology diagrams built on eframe/egui.
//!
//! The viewer drives an [`EguiSurface`] through the same [`ControlSurface`] commands a
//! host application would use, and persists node positions through a
//! [`PositionStore`](crate::store::PositionStore).
//!
//! # Module Organization
//!
//! - `canvas` - The egui render surface: nodes, camera, animation, pointer input
//! - `layout` - Incremental force-directed placement
//! - `rendering` - Drawing the grid, links and nodes
//! - `state` - Persisted preferences and the main [`TopologyApp`]
//!
//! [`ControlSurface`]: crate::control::ControlSurface

mod canvas;
mod layout;
mod rendering;
mod state;


pub use canvas::{EguiSurface, SurfaceEvent, SurfaceNode};
pub use state::{open_position_store, TopologyApp, ViewerPrefs};

use self::state::SAMPLE_SIZE_RANGE;
use crate::constants::APP_STATE_KEY;
use crate::control::Command;
use crate::examples::all_examples;
use crate::reset::ResetPhase;
use crate::surface::RenderSurface;
use eframe::egui;
use std::rc::Rc;
use std::time::Duration;

impl eframe::App for TopologyApp {
    /// Persist UI preferences between restarts. Node positions are persisted as they change.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.prefs.to_json() {
            Ok(json) => storage.set_string(APP_STATE_KEY, json),
            Err(err) => log::warn!("Failed to serialize UI preferences: {err}"),
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}

impl TopologyApp {
    /// Runs one frame of the viewer.
    ///
    /// Deferred work is due-checked before any input is handled, so a reset's fit
    /// lands on the frame after its delay elapses.
    pub fn show(&mut self, ctx: &egui::Context) {
        let visuals = if self.prefs.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        let dt = self.frame_delta(ctx);
        self.timers.advance(dt);

        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.draw_status_bar(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui, dt.as_secs_f32());
        });

        self.handle_surface_events();
        self.schedule_repaint(ctx);
    }

    /// Time elapsed since the previous frame, taken from the input clock.
    fn frame_delta(&mut self, ctx: &egui::Context) -> Duration {
        let now = ctx.input(|i| i.time);
        let elapsed = self.last_time.map_or(0.0, |last| (now - last).max(0.0));
        self.last_time = Some(now);
        Duration::from_secs_f64(elapsed)
    }

    /// `+`/`=` zoom in, `-` zooms out, `F` fits, `C` centers, `R` resets the layout.
    ///
    /// Ignored while a text field has focus.
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let commands = ctx.input(|i| {
            let mut commands = Vec::new();
            if i.modifiers.command {
                return commands;
            }
            if i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals) {
                commands.push(Command::ZoomIn);
            }
            if i.key_pressed(egui::Key::Minus) {
                commands.push(Command::ZoomOut);
            }
            if i.key_pressed(egui::Key::F) {
                commands.push(Command::FitView);
            }
            if i.key_pressed(egui::Key::C) {
                commands.push(Command::Center);
            }
            if i.key_pressed(egui::Key::R) {
                commands.push(Command::ResetLayout);
            }
            commands
        });
        for command in commands {
            self.controls.execute(command);
        }
    }

    /// Draws the command buttons, the sample picker and the display toggles.
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for command in Command::ALL {
                if ui.button(command.label()).clicked() {
                    self.controls.execute(command);
                }
            }

            ui.separator();

            let selected_name = all_examples()
                .iter()
                .find(|info| info.kind == self.prefs.example)
                .map_or("Sample", |info| info.name);
            egui::ComboBox::from_id_salt("sample_kind")
                .selected_text(selected_name)
                .show_ui(ui, |ui| {
                    for info in all_examples() {
                        ui.selectable_value(&mut self.prefs.example, info.kind, info.name);
                    }
                });
            ui.add(
                egui::DragValue::new(&mut self.prefs.sample_size)
                    .range(SAMPLE_SIZE_RANGE)
                    .suffix(" nodes"),
            );
            if ui.button("Load").clicked() {
                if let Err(err) = self.load_selected_example() {
                    log::error!("Failed to load sample: {err}");
                }
            }

            ui.separator();
            ui.checkbox(&mut self.prefs.show_grid, "Grid");
            ui.checkbox(&mut self.prefs.dark_mode, "Dark");
        });
    }

    /// Zoom level, node count, animation status and any reset in progress.
    fn draw_status_bar(&self, ui: &mut egui::Ui) {
        let (zoom, node_count) = {
            let surface = self.controls.surface().borrow();
            (surface.camera().zoom, surface.node_count())
        };
        let limit = self.controls.controller().guard().node_count_limit();
        let animation = if self.controls.animations_enabled() {
            format!("Animated (limit {limit})")
        } else {
            format!("Instant (over {limit} nodes)")
        };
        let phase = self.controls.reset_phase();

        ui.horizontal(|ui| {
            ui.label(format!("Zoom {:.0}%", zoom * 100.0));
            ui.separator();
            ui.label(format!("{node_count} nodes"));
            ui.separator();
            ui.label(animation);
            if self.custom_topology.is_some() {
                ui.separator();
                ui.label("Custom topology");
            }
            if phase != ResetPhase::Idle {
                ui.separator();
                ui.label(format!("Reset: {phase:?}"));
            }
        });
    }

    /// Allocates the canvas, routes pointer input to the surface and paints it.
    pub(crate) fn draw_canvas(&mut self, ui: &mut egui::Ui, dt: f32) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());

        let shared = Rc::clone(self.controls.surface());
        let mut surface = shared.borrow_mut();
        surface.set_viewport(response.rect);

        if self.needs_initial_fit {
            self.needs_initial_fit = false;
            surface.fit_view(self.config.fit_padding, None, false, &self.config.transition);
        }

        surface.handle_canvas_zoom(ui, &response);
        surface.handle_pointer_drag(ui, &response);
        surface.tick(dt);
        surface.paint(&painter, self.prefs.show_grid, self.prefs.dark_mode);
    }

    /// Persists positions after a drag or a settled layout.
    fn handle_surface_events(&mut self) {
        let events = self.controls.surface().borrow_mut().drain_events();
        if events.is_empty() {
            return;
        }
        for event in &events {
            log::debug!("Surface event: {event:?}");
        }
        self.persist_positions();
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        if self.controls.surface().borrow().is_animating() {
            ctx.request_repaint();
        } else if let Some(wait) = self.timers.next_due_in() {
            ctx.request_repaint_after(wait);
        }
    }
}
