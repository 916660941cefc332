//! # Topology Viewport
//!
//! View controls for interactive node-link diagrams: zoom, fit-to-view, recenter and
//! "clear and relayout", driven against any renderer that implements
//! [`RenderSurface`].
//!
//! ## Features
//! - Animated transitions for small diagrams, instantaneous ones above a node-count limit
//! - Reset that forgets persisted positions, relayouts, then fits once things settle
//! - Per-node positions persisted across sessions (memory, JSON file, or browser storage)
//! - An eframe/egui viewer with a force-directed layout and built-in sample topologies
//!
//! The core ([`ViewportController`], [`ResetCoordinator`], [`ControlSurface`]) is
//! renderer-agnostic and single-threaded; deferred work goes through a [`Scheduler`].

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod config;
mod constants;
mod control;
mod controller;
mod error;
mod examples;
mod geometry;
mod guard;
mod reset;
mod scheduler;
mod store;
mod surface;
mod types;
mod ui;

// Re-export public types and functions
pub use config::ViewportConfig;
pub use constants::*;
pub use control::{Command, ControlSurface};
pub use controller::ViewportController;
pub use error::{ViewportError, ViewportResult};
pub use examples::{all_examples, build_example, ExampleInfo, ExampleKind};
pub use geometry::{Bounds, Point, ViewTransform};
pub use guard::PerformanceGuard;
pub use reset::{ResetCoordinator, ResetPhase};
#[cfg(not(target_arch = "wasm32"))]
pub use scheduler::TokioScheduler;
pub use scheduler::{Scheduler, Task, TimerQueue};
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorage;
pub use store::{KeyValueStore, MemoryStore, PositionStore};
pub use surface::RenderSurface;
pub use types::*;
pub use ui::{open_position_store, EguiSurface, SurfaceEvent, SurfaceNode, TopologyApp, ViewerPrefs};

/// Runs the viewer in a native window.
///
/// Shows `topology` when given, otherwise the sample remembered from the last session.
///
/// # Returns
///
/// Returns `Ok(())` when the window closes normally, or an `eframe::Error` if
/// initialization fails (including an invalid `config`).
///
/// # Example
///
/// ```no_run
/// use topology_viewport::{run_app, ViewportConfig};
///
/// fn main() -> Result<(), eframe::Error> {
///     run_app(ViewportConfig::default(), None)
/// }
/// ```
#[cfg(not(target_arch = "wasm32"))]
pub fn run_app(config: ViewportConfig, topology: Option<Topology>) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        APP_ID,
        options,
        Box::new(move |cc| Ok(Box::new(TopologyApp::new(cc, config, topology)?))),
    )
}
