//! Application state for the topology viewer.
//!
//! Holds the persisted UI preferences, the live surface wired to the viewport
//! commands, the position store and the frame-driven timer queue.

use super::canvas::EguiSurface;
use crate::config::ViewportConfig;
use crate::constants::*;
use crate::control::ControlSurface;
use crate::error::ViewportResult;
use crate::examples::{build_example, ExampleKind};
use crate::scheduler::TimerQueue;
use crate::store::PositionStore;
use crate::surface::RenderSurface;
use crate::types::Topology;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Smallest and largest sample size offered in the toolbar.
pub const SAMPLE_SIZE_RANGE: std::ops::RangeInclusive<usize> = 1..=2000;

/// UI preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerPrefs {
    /// Whether the background grid is drawn
    pub show_grid: bool,
    /// Dark or light visuals
    pub dark_mode: bool,
    /// Sample picked in the toolbar
    pub example: ExampleKind,
    /// Node count of generated samples
    pub sample_size: usize,
}

impl Default for ViewerPrefs {
    fn default() -> Self {
        Self {
            show_grid: true,
            dark_mode: true,
            example: ExampleKind::default(),
            sample_size: 24,
        }
    }
}

impl ViewerPrefs {
    /// Serializes the preferences for `eframe::Storage`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restores preferences, falling back to defaults on malformed input.
    pub fn from_json(json: &str) -> Self {
        serde_json::from_str(json).unwrap_or_else(|err| {
            log::warn!("Ignoring stored UI preferences: {err}");
            Self::default()
        })
    }
}

/// The viewer application.
pub struct TopologyApp {
    /// Persisted UI preferences
    pub prefs: ViewerPrefs,
    pub(crate) config: ViewportConfig,
    pub(crate) controls: ControlSurface<EguiSurface>,
    pub(crate) store: Rc<RefCell<PositionStore>>,
    pub(crate) timers: TimerQueue,
    /// Topology given at startup; takes precedence over the samples until one is loaded
    pub(crate) custom_topology: Option<Topology>,
    /// Set when a topology was just loaded and the first frame should fit it
    pub(crate) needs_initial_fit: bool,
    /// Input time of the previous frame, in seconds
    pub(crate) last_time: Option<f64>,
}

impl TopologyApp {
    /// Creates the app from eframe's creation context.
    ///
    /// Preferences are read from `cc.storage`; positions go to the store picked by
    /// [`open_position_store`].
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: ViewportConfig,
        topology: Option<Topology>,
    ) -> ViewportResult<Self> {
        let prefs = cc
            .storage
            .and_then(|storage| storage.get_string(APP_STATE_KEY))
            .map(|json| ViewerPrefs::from_json(&json))
            .unwrap_or_default();
        let store = open_position_store(&config);
        Self::with_parts(config, store, prefs, topology)
    }

    /// Assembles the app from explicit parts and loads the initial topology.
    pub fn with_parts(
        config: ViewportConfig,
        store: PositionStore,
        prefs: ViewerPrefs,
        topology: Option<Topology>,
    ) -> ViewportResult<Self> {
        config.validate()?;
        let store = Rc::new(RefCell::new(store));
        let timers = TimerQueue::new();
        let initial = topology
            .clone()
            .unwrap_or_else(|| build_example(prefs.example, prefs.sample_size));
        let controls = build_controls(&config, &store, &timers, &initial)?;
        Ok(Self {
            prefs,
            config,
            controls,
            store,
            timers,
            custom_topology: topology,
            needs_initial_fit: true,
            last_time: None,
        })
    }

    /// Replaces the displayed diagram.
    ///
    /// The old surface is torn down first so a pending reset fit against it does nothing.
    pub fn load_topology(&mut self, topology: &Topology) -> ViewportResult<()> {
        self.controls.surface().borrow_mut().tear_down();
        self.controls = build_controls(&self.config, &self.store, &self.timers, topology)?;
        self.needs_initial_fit = true;
        Ok(())
    }

    /// Loads the sample picked in the toolbar, dropping any startup topology.
    pub fn load_selected_example(&mut self) -> ViewportResult<()> {
        self.custom_topology = None;
        let topology = build_example(self.prefs.example, self.prefs.sample_size);
        log::info!(
            "Loading {:?} sample with {} nodes",
            self.prefs.example,
            topology.nodes.len()
        );
        self.load_topology(&topology)
    }

    /// Persists every live node position.
    pub(crate) fn persist_positions(&self) {
        let surface = self.controls.surface().borrow();
        self.store.borrow_mut().snapshot_from(&*surface);
    }
}

/// Builds a surface for `topology`, applies persisted positions and wires the commands.
///
/// A layout pass starts unless every node came back from storage.
fn build_controls(
    config: &ViewportConfig,
    store: &Rc<RefCell<PositionStore>>,
    timers: &TimerQueue,
    topology: &Topology,
) -> ViewportResult<ControlSurface<EguiSurface>> {
    let mut surface = EguiSurface::from_topology(topology);
    let restored = store.borrow().restore_into(&mut surface);
    if restored < surface.node_count() {
        surface.layout();
    }
    ControlSurface::new(
        Rc::new(RefCell::new(surface)),
        config,
        Rc::clone(store),
        Rc::new(timers.clone()),
    )
}

/// Picks the position backend for this platform.
///
/// Native builds use a JSON file: the configured `storage_path`, else a file in the
/// app's storage directory. Without either, positions only live for the session.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_position_store(config: &ViewportConfig) -> PositionStore {
    let path = config
        .storage_path
        .clone()
        .or_else(|| eframe::storage_dir(APP_ID).map(|dir| dir.join(POSITIONS_FILE_NAME)));
    match path {
        Some(path) => {
            log::info!("Persisting node positions to {}", path.display());
            PositionStore::new(
                crate::store::FileStore::open(path),
                config.storage_key.clone(),
            )
        }
        None => {
            log::warn!("No storage directory available; node positions kept in memory");
            PositionStore::new(crate::store::MemoryStore::new(), config.storage_key.clone())
        }
    }
}

/// Picks the position backend for this platform: the browser's local storage.
#[cfg(target_arch = "wasm32")]
pub fn open_position_store(config: &ViewportConfig) -> PositionStore {
    PositionStore::new(
        crate::store::LocalStorage::new(),
        config.storage_key.clone(),
    )
}
