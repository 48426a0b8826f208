//! Static per-node description: states, capabilities, requirements,
//! operations and fault handlers. See spec.md §3/§4.1.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{SpecInvalid, SpecResult};
use crate::ids::{CapId, NodeId, OpId, ReqId, StateId};

/// A transition out of a state: a destination state and a non-empty
/// ordered list of requirement-alternative sets. The op is enabled iff at
/// least one alternative set is entirely satisfied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub to: StateId,
    pub reqs: Vec<BTreeSet<ReqId>>,
}

impl Operation {
    pub fn new(to: StateId, reqs: Vec<BTreeSet<ReqId>>) -> Self {
        Self { to, reqs }
    }
}

/// One state of a node's FSM.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct State {
    pub is_alive: bool,
    pub caps: BTreeSet<CapId>,
    pub reqs: BTreeSet<ReqId>,
    pub ops: BTreeMap<OpId, Operation>,
    pub handlers: BTreeMap<ReqId, StateId>,
}

impl State {
    pub fn new(is_alive: bool) -> Self {
        Self {
            is_alive,
            ..Default::default()
        }
    }

    pub fn with_caps(mut self, caps: impl IntoIterator<Item = CapId>) -> Self {
        self.caps = caps.into_iter().collect();
        self
    }

    pub fn with_reqs(mut self, reqs: impl IntoIterator<Item = ReqId>) -> Self {
        self.reqs = reqs.into_iter().collect();
        self
    }

    pub fn with_op(mut self, op: OpId, operation: Operation) -> Self {
        self.ops.insert(op, operation);
        self
    }

    pub fn with_handler(mut self, req: ReqId, to: StateId) -> Self {
        self.handlers.insert(req, to);
        self
    }
}

/// Immutable static description of one node's FSM. Declared `caps`/`reqs`/
/// `ops` are the union of identifiers that may ever appear in any state;
/// per-state sets must be subsets of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub initial_state_id: StateId,
    pub node_type: String,
    pub caps: BTreeSet<CapId>,
    pub reqs: BTreeSet<ReqId>,
    pub ops: BTreeSet<OpId>,
    pub states: BTreeMap<StateId, State>,
}

impl NodeSpec {
    /// Construct and validate a `NodeSpec`. `node_id` is used only to name
    /// the offending node in validation error messages — it is not stored.
    pub fn new(
        node_id: &NodeId,
        initial_state_id: StateId,
        node_type: impl Into<String>,
        caps: BTreeSet<CapId>,
        reqs: BTreeSet<ReqId>,
        ops: BTreeSet<OpId>,
        states: BTreeMap<StateId, State>,
    ) -> SpecResult<Self> {
        if !states.contains_key(&initial_state_id) {
            return Err(SpecInvalid::UnknownInitialState {
                node: node_id.clone(),
                state: initial_state_id,
            });
        }

        for (state_id, state) in &states {
            for cap in &state.caps {
                if !caps.contains(cap) {
                    return Err(SpecInvalid::UndeclaredCap {
                        node: node_id.clone(),
                        state: state_id.clone(),
                        cap: cap.clone(),
                    });
                }
            }
            for req in &state.reqs {
                if !reqs.contains(req) {
                    return Err(SpecInvalid::UndeclaredReq {
                        node: node_id.clone(),
                        state: state_id.clone(),
                        req: req.clone(),
                    });
                }
            }
            for (op_id, op) in &state.ops {
                if !ops.contains(op_id) {
                    return Err(SpecInvalid::UndeclaredOp {
                        node: node_id.clone(),
                        state: state_id.clone(),
                        op: op_id.clone(),
                    });
                }
                if !states.contains_key(&op.to) {
                    return Err(SpecInvalid::UnknownOpTarget {
                        node: node_id.clone(),
                        state: state_id.clone(),
                        op: op_id.clone(),
                        to: op.to.clone(),
                    });
                }
                if op.reqs.is_empty() {
                    return Err(SpecInvalid::EmptyAlternatives {
                        node: node_id.clone(),
                        state: state_id.clone(),
                        op: op_id.clone(),
                    });
                }
                for alt in &op.reqs {
                    for req in alt {
                        if !reqs.contains(req) {
                            return Err(SpecInvalid::UnknownOpRequirement {
                                node: node_id.clone(),
                                state: state_id.clone(),
                                op: op_id.clone(),
                                req: req.clone(),
                            });
                        }
                    }
                }
            }
            for (req, to) in &state.handlers {
                if !reqs.contains(req) {
                    return Err(SpecInvalid::UnknownHandlerRequirement {
                        node: node_id.clone(),
                        state: state_id.clone(),
                        req: req.clone(),
                    });
                }
                if !states.contains_key(to) {
                    return Err(SpecInvalid::UnknownHandlerTarget {
                        node: node_id.clone(),
                        state: state_id.clone(),
                        req: req.clone(),
                        to: to.clone(),
                    });
                }
            }
        }

        Ok(Self {
            initial_state_id,
            node_type: node_type.into(),
            caps,
            reqs,
            ops,
            states,
        })
    }

    pub fn state(&self, id: &StateId) -> Option<&State> {
        self.states.get(id)
    }
}
