//! A node specification plus its current state. See spec.md §4.2.

use std::sync::Arc;

use crate::error::{IllegalNodeMove, NodeMoveResult};
use crate::ids::{OpId, ReqId, StateId};
use crate::spec::{NodeSpec, State};

/// A `NodeSpec` paired with a current state id. Cheap to clone: the static
/// spec is shared via `Arc`, only the state id is per-instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInstance {
    spec: Arc<NodeSpec>,
    current_state_id: StateId,
}

impl NodeInstance {
    /// Construct an instance at the spec's declared initial state.
    pub fn at_initial(spec: Arc<NodeSpec>) -> Self {
        let current_state_id = spec.initial_state_id.clone();
        Self {
            spec,
            current_state_id,
        }
    }

    /// Construct an instance at an explicit state id. The caller is
    /// responsible for `state_id` being declared in `spec`.
    pub fn at_state(spec: Arc<NodeSpec>, state_id: StateId) -> Self {
        Self {
            spec,
            current_state_id: state_id,
        }
    }

    pub fn spec(&self) -> &NodeSpec {
        &self.spec
    }

    pub fn current_state_id(&self) -> &StateId {
        &self.current_state_id
    }

    pub fn current_state(&self) -> &State {
        self.spec
            .state(&self.current_state_id)
            .expect("current_state_id always names a declared state")
    }

    /// Node-local legality only: does the current state declare `op_id`?
    /// Requirement satisfaction is the `Application`'s responsibility.
    pub fn perform_op(&self, op_id: &OpId) -> NodeMoveResult<Self> {
        let op = self
            .current_state()
            .ops
            .get(op_id)
            .ok_or_else(|| IllegalNodeMove::OpNotInState {
                state: self.current_state_id.clone(),
                op: op_id.clone(),
            })?;
        Ok(Self {
            spec: Arc::clone(&self.spec),
            current_state_id: op.to.clone(),
        })
    }

    pub fn handle_fault(&self, req_id: &ReqId) -> NodeMoveResult<Self> {
        let to = self
            .current_state()
            .handlers
            .get(req_id)
            .ok_or_else(|| IllegalNodeMove::NoHandlerForRequirement {
                state: self.current_state_id.clone(),
                req: req_id.clone(),
            })?;
        Ok(Self {
            spec: Arc::clone(&self.spec),
            current_state_id: to.clone(),
        })
    }

    /// Unconditional at the node level — returns an instance at the spec's
    /// initial state.
    pub fn do_hard_reset(&self) -> Self {
        Self {
            spec: Arc::clone(&self.spec),
            current_state_id: self.spec.initial_state_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::NodeId;
    use crate::spec::Operation;
    use std::collections::{BTreeMap, BTreeSet};

    fn two_state_spec() -> Arc<NodeSpec> {
        let mut states = BTreeMap::new();
        states.insert(
            StateId::from("s0"),
            State::new(true).with_op(OpId::from("go"), Operation::new(StateId::from("s1"), vec![BTreeSet::new()])),
        );
        states.insert(StateId::from("s1"), State::new(true));
        Arc::new(
            NodeSpec::new(
                &NodeId::from("n"),
                StateId::from("s0"),
                "generic",
                BTreeSet::new(),
                BTreeSet::new(),
                BTreeSet::from([OpId::from("go")]),
                states,
            )
            .unwrap(),
        )
    }

    #[test]
    fn perform_op_moves_to_target_state() {
        let inst = NodeInstance::at_initial(two_state_spec());
        let next = inst.perform_op(&OpId::from("go")).unwrap();
        assert_eq!(*next.current_state_id(), StateId::from("s1"));
    }

    #[test]
    fn perform_unknown_op_fails() {
        let inst = NodeInstance::at_initial(two_state_spec());
        let err = inst.perform_op(&OpId::from("nope")).unwrap_err();
        assert!(matches!(err, IllegalNodeMove::OpNotInState { .. }));
    }

    #[test]
    fn hard_reset_returns_to_initial() {
        let inst = NodeInstance::at_initial(two_state_spec());
        let moved = inst.perform_op(&OpId::from("go")).unwrap();
        let reset = moved.do_hard_reset();
        assert_eq!(*reset.current_state_id(), StateId::from("s0"));
    }

}
