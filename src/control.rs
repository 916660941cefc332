//! The user-facing command set: zoom in, zoom out, fit, center, reset.

use crate::config::ViewportConfig;
use crate::controller::ViewportController;
use crate::error::{ViewportError, ViewportResult};
use crate::reset::{ResetCoordinator, ResetPhase};
use crate::scheduler::Scheduler;
use crate::store::PositionStore;
use crate::surface::RenderSurface;
use std::cell::RefCell;
use std::rc::Rc;

/// A parameterless viewport command as issued by a toolbar button or shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Magnify the content
    ZoomIn,
    /// Show more of the diagram
    ZoomOut,
    /// Fit every node into view
    FitView,
    /// Recenter without changing zoom
    Center,
    /// Forget positions, relayout, then fit
    ResetLayout,
}

impl Command {
    /// Every command, in toolbar order.
    pub const ALL: [Command; 5] = [
        Command::ZoomIn,
        Command::ZoomOut,
        Command::FitView,
        Command::Center,
        Command::ResetLayout,
    ];

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            Command::ZoomIn => "Zoom In",
            Command::ZoomOut => "Zoom Out",
            Command::FitView => "Fit",
            Command::Center => "Center",
            Command::ResetLayout => "Reset Layout",
        }
    }
}

/// Binds the viewport commands to one render surface.
///
/// Commands are synchronous and fire-and-forget. This is the boundary where
/// preconditions the controller trusts (`factor > 0`, `padding >= 0`) are checked.
pub struct ControlSurface<S: RenderSurface + ?Sized + 'static> {
    surface: Rc<RefCell<S>>,
    controller: ViewportController,
    reset: ResetCoordinator,
    zoom_in_factor: f32,
    zoom_out_factor: f32,
    fit_padding: f32,
}

impl<S: RenderSurface + ?Sized + 'static> ControlSurface<S> {
    /// Wires a surface to a controller and reset coordinator built from `config`.
    pub fn new(
        surface: Rc<RefCell<S>>,
        config: &ViewportConfig,
        store: Rc<RefCell<PositionStore>>,
        scheduler: Rc<dyn Scheduler>,
    ) -> ViewportResult<Self> {
        config.validate()?;
        let controller = config.controller()?;
        let reset = ResetCoordinator::new(controller, store, scheduler)
            .with_settle_delay(config.settle_delay())
            .with_fit_padding(config.fit_padding);
        Ok(Self {
            surface,
            controller,
            reset,
            zoom_in_factor: config.zoom_in_factor,
            zoom_out_factor: config.zoom_out_factor,
            fit_padding: config.fit_padding,
        })
    }

    /// The surface commands act on.
    pub fn surface(&self) -> &Rc<RefCell<S>> {
        &self.surface
    }

    /// The controller commands go through.
    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    /// Phase of the most recent reset.
    pub fn reset_phase(&self) -> ResetPhase {
        self.reset.phase()
    }

    /// Whether transitions would currently animate.
    pub fn animations_enabled(&self) -> bool {
        let node_count = self.surface.borrow().node_count();
        self.controller.guard().should_animate(node_count)
    }

    /// Runs one command.
    pub fn execute(&self, command: Command) {
        log::debug!("command: {command:?}");
        match command {
            Command::ZoomIn => self.controller.zoom(&mut *self.surface.borrow_mut(), self.zoom_in_factor),
            Command::ZoomOut => self.controller.zoom(&mut *self.surface.borrow_mut(), self.zoom_out_factor),
            Command::FitView => self
                .controller
                .fit_to_view(&mut *self.surface.borrow_mut(), self.fit_padding),
            Command::Center => self.controller.center(&mut *self.surface.borrow_mut()),
            Command::ResetLayout => self.reset.reset(&self.surface),
        }
    }

    /// Zooms by an arbitrary factor, rejecting non-positive values.
    pub fn zoom_by(&self, factor: f32) -> ViewportResult<()> {
        if !(factor > 0.0) || !factor.is_finite() {
            return Err(ViewportError::InvalidZoomFactor(factor));
        }
        self.controller.zoom(&mut *self.surface.borrow_mut(), factor);
        Ok(())
    }

    /// Fits with custom padding, rejecting negative values.
    pub fn fit_with_padding(&self, padding: f32) -> ViewportResult<()> {
        if !(padding >= 0.0) || !padding.is_finite() {
            return Err(ViewportError::InvalidPadding(padding));
        }
        self.controller
            .fit_to_view(&mut *self.surface.borrow_mut(), padding);
        Ok(())
    }
}
