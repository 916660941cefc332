//! Built-in sample topologies that can be quickly loaded from the UI.
//!
//! Each sample is generated for a requested node count, so the same shape can be
//! shown below and above the animation threshold.

use crate::types::*;

/// Kinds of built-in samples available from the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum ExampleKind {
    /// Brokers in a ring, each linked to its successor
    #[default]
    Ring,
    /// One coordinator linked to every other node
    Star,
    /// Clusters of brokers linked to their bookies, clusters chained together
    Clusters,
}

/// Metadata for a single sample.
pub struct ExampleInfo {
    /// Stable identifier for the sample
    pub kind: ExampleKind,
    /// Human-friendly display name
    pub name: &'static str,
}

/// Returns all samples with their display names.
pub const fn all_examples() -> &'static [ExampleInfo] {
    const EXAMPLES: &[ExampleInfo] = &[
        ExampleInfo {
            kind: ExampleKind::Ring,
            name: "Ring",
        },
        ExampleInfo {
            kind: ExampleKind::Star,
            name: "Star",
        },
        ExampleInfo {
            kind: ExampleKind::Clusters,
            name: "Broker Clusters",
        },
    ];
    EXAMPLES
}

/// Builds a topology of `node_count` nodes for the given sample kind.
pub fn build_example(kind: ExampleKind, node_count: usize) -> Topology {
    match kind {
        ExampleKind::Ring => build_ring(node_count),
        ExampleKind::Star => build_star(node_count),
        ExampleKind::Clusters => build_clusters(node_count),
    }
}

fn build_ring(node_count: usize) -> Topology {
    let mut topology = Topology::default();
    for i in 0..node_count {
        topology.add_node(format!("broker-{i}"), format!("Broker {i}"));
    }
    if node_count > 1 {
        for i in 0..node_count {
            let next = (i + 1) % node_count;
            topology.add_link(format!("broker-{i}"), format!("broker-{next}"));
        }
    }
    topology
}

fn build_star(node_count: usize) -> Topology {
    let mut topology = Topology::default();
    if node_count == 0 {
        return topology;
    }
    let hub = topology.add_node("coordinator", "Coordinator");
    for i in 1..node_count {
        let leaf = topology.add_node(format!("worker-{i}"), format!("Worker {i}"));
        topology.add_link(hub.clone(), leaf);
    }
    topology
}

fn build_clusters(node_count: usize) -> Topology {
    // One broker per cluster plus up to four bookies
    const CLUSTER_SIZE: usize = 5;

    let mut topology = Topology::default();
    let mut previous_broker: Option<NodeId> = None;
    let mut placed = 0;
    let mut cluster = 0;
    while placed < node_count {
        let broker = topology.add_node(format!("c{cluster}-broker"), format!("Cluster {cluster}"));
        placed += 1;
        let bookies = (node_count - placed).min(CLUSTER_SIZE - 1);
        for b in 0..bookies {
            let bookie = topology.add_node(format!("c{cluster}-bookie-{b}"), format!("Bookie {b}"));
            topology.add_link(broker.clone(), bookie);
        }
        placed += bookies;
        if let Some(prev) = previous_broker.replace(broker.clone()) {
            topology.add_link(prev, broker);
        }
        cluster += 1;
    }
    topology
}
