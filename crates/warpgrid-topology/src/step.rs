//! The move witness type. See spec.md §4.5/§6 and the "Tagged witness"
//! design note in §9: internally this is the clean tagged variant; the
//! wire-compatible `(node_id, op_or_req_id, is_op)` triple from spec.md §6
//! is available via `Step::to_wire`.

use serde::{Deserialize, Serialize};

use crate::ids::{NodeId, OpId, ReqId};

/// The first move of a shortest path between two global states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Op { node: NodeId, op: OpId },
    Handle { node: NodeId, req: ReqId },
    Reset { node: NodeId },
}

impl Step {
    pub fn node(&self) -> &NodeId {
        match self {
            Step::Op { node, .. } | Step::Handle { node, .. } | Step::Reset { node } => node,
        }
    }

    /// The canonical wire record from spec.md §6: `{nodeId, opId, isOp}`,
    /// where `opId` is `None` for a hard reset.
    pub fn to_wire(&self) -> StepWire {
        match self {
            Step::Op { node, op } => StepWire {
                node_id: node.clone(),
                op_or_req_id: Some(op.as_str().to_string()),
                is_op: true,
            },
            Step::Handle { node, req } => StepWire {
                node_id: node.clone(),
                op_or_req_id: Some(req.as_str().to_string()),
                is_op: false,
            },
            Step::Reset { node } => StepWire {
                node_id: node.clone(),
                op_or_req_id: None,
                is_op: false,
            },
        }
    }
}

/// The flat `(nodeId, opOrReqId, isOp)` wire record named in spec.md §6.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepWire {
    pub node_id: NodeId,
    pub op_or_req_id: Option<String>,
    pub is_op: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_has_no_op_or_req_id_on_the_wire() {
        let wire = Step::Reset { node: NodeId::from("n") }.to_wire();
        assert!(wire.op_or_req_id.is_none());
        assert!(!wire.is_op);
    }

    #[test]
    fn op_step_round_trips_is_op_flag() {
        let wire = Step::Op {
            node: NodeId::from("n"),
            op: OpId::from("go"),
        }
        .to_wire();
        assert!(wire.is_op);
        assert_eq!(wire.op_or_req_id.as_deref(), Some("go"));
    }

    #[test]
    fn handle_step_carries_req_id_with_is_op_false() {
        let wire = Step::Handle {
            node: NodeId::from("n"),
            req: ReqId::from("r"),
        }
        .to_wire();
        assert!(!wire.is_op);
        assert_eq!(wire.op_or_req_id.as_deref(), Some("r"));
    }
}
