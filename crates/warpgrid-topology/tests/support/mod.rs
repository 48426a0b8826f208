//! Shared topology builders for integration tests. Not a test target
//! itself — `tests/scenarios.rs` and `tests/properties.rs` both `mod
//! support;` this file.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use warpgrid_topology::{
    Application, CapId, NodeId, NodeInstance, NodeSpec, OpId, Operation, ReqId, State, StateId,
};

#[allow(dead_code)]
pub fn node(
    id: &str,
    initial: &str,
    caps: impl IntoIterator<Item = &'static str>,
    reqs: impl IntoIterator<Item = &'static str>,
    ops: impl IntoIterator<Item = &'static str>,
    states: BTreeMap<StateId, State>,
) -> (NodeId, Arc<NodeSpec>) {
    let node_id = NodeId::from(id);
    let spec = NodeSpec::new(
        &node_id,
        StateId::from(initial),
        "generic",
        caps.into_iter().map(CapId::from).collect(),
        reqs.into_iter().map(ReqId::from).collect(),
        ops.into_iter().map(OpId::from).collect(),
        states,
    )
    .expect("test topology must be well-formed");
    (node_id, Arc::new(spec))
}

#[allow(dead_code)]
pub fn single_app(node_id: NodeId, spec: Arc<NodeSpec>) -> Application {
    let mut nodes = BTreeMap::new();
    nodes.insert(node_id, NodeInstance::at_initial(spec));
    Application::new(nodes, BTreeMap::new(), BTreeMap::new(), false).unwrap()
}

/// Host/guest containment topology shared across scenario and property
/// tests. `H` has `up` (alive) / `down` (not alive), reachable from each
/// other via `crash`/`boot`; `G` has `idle`/`busy`, both alive, contained
/// by `H`. `hasHardReset` is always on.
#[allow(dead_code)]
pub fn containment_app(guest_initial: &str) -> Application {
    let mut h_states = BTreeMap::new();
    h_states.insert(
        StateId::from("up"),
        State::new(true).with_op(OpId::from("crash"), Operation::new(StateId::from("down"), vec![BTreeSet::new()])),
    );
    h_states.insert(
        StateId::from("down"),
        State::new(false).with_op(OpId::from("boot"), Operation::new(StateId::from("up"), vec![BTreeSet::new()])),
    );
    let (h_id, h_spec) = node("H", "up", [], [], ["crash", "boot"], h_states);

    let mut g_states = BTreeMap::new();
    g_states.insert(
        StateId::from("idle"),
        State::new(true).with_op(OpId::from("work"), Operation::new(StateId::from("busy"), vec![BTreeSet::new()])),
    );
    g_states.insert(
        StateId::from("busy"),
        State::new(true).with_op(OpId::from("finish"), Operation::new(StateId::from("idle"), vec![BTreeSet::new()])),
    );
    let (g_id, g_spec) = node("G", "idle", [], [], ["work", "finish"], g_states);

    let mut nodes = BTreeMap::new();
    nodes.insert(h_id, NodeInstance::at_initial(h_spec));
    nodes.insert(g_id.clone(), NodeInstance::at_state(g_spec, StateId::from(guest_initial)));

    let mut contained_by = BTreeMap::new();
    contained_by.insert(g_id, NodeId::from("H"));

    Application::new(nodes, BTreeMap::new(), contained_by, true).unwrap()
}
