//! On-disk JSON description of a topology: one `NodeSpec` per node plus
//! the binding/containment relations `Application::new` needs. Parsing
//! and validation live here, not in `warpgrid-topology` — the core crate
//! is deliberately config/format-agnostic (see its crate-level docs).

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use warpgrid_topology::{
    Application, CapId, NodeId, NodeInstance, NodeSpec, ReqId,
};

#[derive(Debug, Deserialize)]
struct NodeFile {
    #[serde(flatten)]
    spec: NodeSpec,
    /// Current state id; defaults to `spec.initial_state_id` when absent.
    current_state_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TopologyFile {
    nodes: BTreeMap<String, NodeFile>,
    #[serde(default)]
    binding: BTreeMap<String, String>,
    #[serde(default)]
    contained_by: BTreeMap<String, String>,
    #[serde(default)]
    has_hard_reset: bool,
}

/// Load and validate a topology description from a JSON file, producing
/// its initial `Application`.
pub fn load(path: &Path) -> anyhow::Result<Application> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading topology file {}", path.display()))?;
    let file: TopologyFile = serde_json::from_str(&contents)
        .with_context(|| format!("parsing topology file {}", path.display()))?;

    let mut nodes = BTreeMap::new();
    for (node_id, node_file) in file.nodes {
        let node_id = NodeId::from(node_id);
        let spec = std::sync::Arc::new(node_file.spec);
        let instance = match node_file.current_state_id {
            Some(state_id) => NodeInstance::at_state(spec, state_id.into()),
            None => NodeInstance::at_initial(spec),
        };
        nodes.insert(node_id, instance);
    }

    let binding = file
        .binding
        .into_iter()
        .map(|(req, cap)| (ReqId::from(req), CapId::from(cap)))
        .collect();
    let contained_by = file
        .contained_by
        .into_iter()
        .map(|(node, container)| (NodeId::from(node), NodeId::from(container)))
        .collect();

    Ok(Application::new(nodes, binding, contained_by, file.has_hard_reset)?)
}
