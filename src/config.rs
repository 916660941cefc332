//! Viewport configuration, loadable from JSON.

use crate::constants::*;
use crate::error::{ViewportError, ViewportResult};
use crate::guard::PerformanceGuard;
use crate::controller::ViewportController;
use crate::types::TransitionConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Tunables for the viewport controller and reset behavior.
///
/// Missing fields fall back to their defaults, so a partial JSON file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Node count above which transitions are instantaneous
    pub node_count_limit: usize,
    /// Padding of fit-to-view, in screen pixels
    pub fit_padding: f32,
    /// Wait between relayout and the deferred fit
    pub settle_delay_ms: u64,
    /// Animated transition settings
    pub transition: TransitionConfig,
    /// Factor used by "zoom in" (below 1)
    pub zoom_in_factor: f32,
    /// Factor used by "zoom out" (above 1)
    pub zoom_out_factor: f32,
    /// Namespace key for persisted positions
    pub storage_key: String,
    /// File holding persisted positions on native targets; the app storage dir when unset
    pub storage_path: Option<PathBuf>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            node_count_limit: DEFAULT_NODE_COUNT_LIMIT,
            fit_padding: FIT_PADDING,
            settle_delay_ms: SETTLE_DELAY_MS,
            transition: TransitionConfig::default(),
            zoom_in_factor: ZOOM_IN_FACTOR,
            zoom_out_factor: ZOOM_OUT_FACTOR,
            storage_key: POSITIONS_STORAGE_KEY.to_string(),
            storage_path: None,
        }
    }
}

impl ViewportConfig {
    /// Parses and validates a configuration from JSON.
    pub fn from_json(json: &str) -> ViewportResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ViewportResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        log::info!("Loaded viewport config from {}", path.display());
        Ok(config)
    }

    /// Serializes the configuration to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Checks every invariant the controller relies on.
    pub fn validate(&self) -> ViewportResult<()> {
        if self.node_count_limit == 0 {
            return Err(ViewportError::InvalidNodeCountLimit(self.node_count_limit));
        }
        for factor in [self.zoom_in_factor, self.zoom_out_factor] {
            if !(factor > 0.0) {
                return Err(ViewportError::InvalidZoomFactor(factor));
            }
        }
        if !(self.fit_padding >= 0.0) {
            return Err(ViewportError::InvalidPadding(self.fit_padding));
        }
        Ok(())
    }

    /// Settle delay as a [`Duration`].
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Builds the controller this configuration describes.
    pub fn controller(&self) -> ViewportResult<ViewportController> {
        let guard = PerformanceGuard::new(self.node_count_limit)?;
        Ok(ViewportController::new(guard, self.transition))
    }
}
