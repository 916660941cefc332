//! Core data types shared by the viewport controller, its storage, and render surfaces.
//!
//! This module defines node handles, persisted positions, transition settings, and the
//! topology model a diagram is built from.

use crate::constants::TRANSITION_DURATION_MS;
use crate::error::ViewportResult;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Stable identifier of a node, assigned by whoever owns the topology.
pub type NodeId = String;

/// A node as seen by the controller: its id and current position.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeHandle {
    /// Identifier of the node
    pub id: NodeId,
    /// Live position in world space
    pub position: Point,
}

impl NodeHandle {
    /// Creates a handle for a node at the given position.
    pub fn new(id: impl Into<NodeId>, position: Point) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

/// A node position as kept by the position store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPosition {
    /// Identifier of the node this position belongs to
    pub node_id: NodeId,
    /// Horizontal coordinate in world space
    pub x: f64,
    /// Vertical coordinate in world space
    pub y: f64,
}

impl PersistedPosition {
    /// Creates a persisted position record.
    pub fn new(node_id: impl Into<NodeId>, x: f64, y: f64) -> Self {
        Self {
            node_id: node_id.into(),
            x,
            y,
        }
    }
}

impl From<&NodeHandle> for PersistedPosition {
    fn from(node: &NodeHandle) -> Self {
        Self::new(
            node.id.clone(),
            f64::from(node.position.x),
            f64::from(node.position.y),
        )
    }
}

/// Easing curve used for animated viewport transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant speed
    Linear,
    /// Cubic ease-in-out
    #[default]
    CubicEase,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicEase => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let f = -2.0 * t + 2.0;
                    1.0 - f * f * f / 2.0
                }
            }
        }
    }
}

/// Settings applied whenever a viewport change is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    /// Length of the transition in milliseconds
    pub duration_ms: u64,
    /// Easing curve
    pub easing: Easing,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration_ms: TRANSITION_DURATION_MS,
            easing: Easing::CubicEase,
        }
    }
}

impl TransitionConfig {
    /// Transition length as a [`Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// A node of a topology as delivered by the API server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyNode {
    /// Stable node identifier
    pub id: NodeId,
    /// Display label; falls back to the id when empty
    #[serde(default)]
    pub label: String,
}

/// A directed link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyLink {
    /// Source node id
    pub source: NodeId,
    /// Target node id
    pub target: NodeId,
}

/// The node-link structure a diagram is laid out from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
    /// All nodes of the diagram
    #[serde(default)]
    pub nodes: Vec<TopologyNode>,
    /// Links between nodes; links naming unknown nodes are ignored by surfaces
    #[serde(default)]
    pub links: Vec<TopologyLink>,
}

impl Topology {
    /// Parses a topology from JSON.
    pub fn from_json(json: &str) -> ViewportResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a topology file.
    pub fn load(path: impl AsRef<std::path::Path>) -> ViewportResult<Self> {
        let path = path.as_ref();
        let topology = Self::from_json(&std::fs::read_to_string(path)?)?;
        log::info!(
            "Loaded topology with {} nodes from {}",
            topology.nodes.len(),
            path.display()
        );
        Ok(topology)
    }

    /// Serializes the topology to pretty JSON.
    pub fn to_json(&self) -> ViewportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Adds a node and returns its id.
    pub fn add_node(&mut self, id: impl Into<NodeId>, label: impl Into<String>) -> NodeId {
        let id = id.into();
        self.nodes.push(TopologyNode {
            id: id.clone(),
            label: label.into(),
        });
        id
    }

    /// Adds a link between two nodes.
    pub fn add_link(&mut self, source: impl Into<NodeId>, target: impl Into<NodeId>) {
        self.links.push(TopologyLink {
            source: source.into(),
            target: target.into(),
        });
    }
}
