//! Shared application-wide constants.
//! Centralizes tweakable values used by the viewport controller and the viewer.

// Viewport commands
/// Zoom factor for "zoom in". Factors scale the visible extent, so magnifying uses a value below 1.
pub const ZOOM_IN_FACTOR: f32 = 0.8;
/// Zoom factor for "zoom out". Enlarges the visible extent.
pub const ZOOM_OUT_FACTOR: f32 = 1.2;
/// Margin in screen pixels kept around the nodes by fit-to-view.
pub const FIT_PADDING: f32 = 20.0;
/// Node count above which viewport transitions are applied instantly.
pub const DEFAULT_NODE_COUNT_LIMIT: usize = 500;

// Reset
/// Fixed wait between triggering a relayout and fitting the view.
pub const SETTLE_DELAY_MS: u64 = 250;

// Transitions
/// Duration of an animated viewport transition.
pub const TRANSITION_DURATION_MS: u64 = 200;

// Persistence
/// Namespace key holding the whole node-position mapping.
pub const POSITIONS_STORAGE_KEY: &str = "graph-node-positions";
/// Key under which the viewer persists its UI preferences.
pub const APP_STATE_KEY: &str = "app_state";
/// Application id used for window title and storage directory.
pub const APP_ID: &str = "Topology Viewport";
/// File name for persisted positions inside the storage directory.
pub const POSITIONS_FILE_NAME: &str = "node_positions.json";

// Camera
/// Smallest magnification reachable by zoom steps. Fit-to-view may go lower.
pub const MIN_ZOOM: f32 = 0.05;
/// Largest magnification the viewer camera allows.
pub const MAX_ZOOM: f32 = 8.0;

// Node dimensions
/// Node diameter in world units.
pub const NODE_RADIUS: f32 = 18.0;

// Grid/drawing
/// Grid cell size in world units.
pub const GRID_SIZE: f32 = 40.0;

// Layout
/// Force simulation iterations advanced per rendered frame.
pub const LAYOUT_ITERATIONS_PER_FRAME: usize = 12;
/// Upper bound on iterations for a single relayout pass.
pub const LAYOUT_MAX_ITERATIONS: usize = 240;
/// Total displacement per iteration below which the layout counts as settled.
pub const LAYOUT_SETTLE_THRESHOLD: f32 = 0.5;
