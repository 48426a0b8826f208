//! Composition of `NodeInstance`s with a binding and containment relation.
//! See spec.md §3 (Application) and §4.3 (legality predicates & successors).

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::error::{AppMoveResult, IllegalApplicationMove, SpecInvalid, SpecResult};
use crate::ids::{CapId, NodeId, ReqId};
use crate::instance::NodeInstance;
use crate::step::Step;

/// An immutable snapshot of a whole distributed-topology configuration.
///
/// Every successor (`perform_op`/`handle_fault`/`hard_reset`) is a fresh
/// value: the `nodes` map is cloned with exactly one entry replaced, and
/// all derived fields are recomputed. `NodeInstance` clones are cheap
/// (the static `NodeSpec` is `Arc`-shared), so this is O(|nodes|) per move,
/// not O(|nodes| · spec size).
#[derive(Debug, Clone)]
pub struct Application {
    nodes: BTreeMap<NodeId, NodeInstance>,
    binding: BTreeMap<ReqId, CapId>,
    contained_by: BTreeMap<NodeId, NodeId>,
    has_hard_reset: bool,

    // Derived at construction — see spec.md §4.3 "Derivation at construction".
    reqs: BTreeSet<ReqId>,
    caps: BTreeSet<CapId>,
    req_node_id: BTreeMap<ReqId, NodeId>,
    cap_node_id: BTreeMap<CapId, NodeId>,
    faults: BTreeSet<ReqId>,
    is_containment_consistent: bool,
    global_state: String,
}

impl Application {
    /// Validate and construct an `Application`. See spec.md §3 Invariants
    /// and §4.3 "Derivation at construction".
    pub fn new(
        nodes: BTreeMap<NodeId, NodeInstance>,
        binding: BTreeMap<ReqId, CapId>,
        contained_by: BTreeMap<NodeId, NodeId>,
        has_hard_reset: bool,
    ) -> SpecResult<Self> {
        for (node, container) in &contained_by {
            if !nodes.contains_key(node) {
                return Err(SpecInvalid::UnknownContainer {
                    node: node.clone(),
                    container: container.clone(),
                });
            }
            if !nodes.contains_key(container) {
                return Err(SpecInvalid::UnknownContainer {
                    node: node.clone(),
                    container: container.clone(),
                });
            }
        }

        let mut req_node_id = BTreeMap::new();
        let mut cap_node_id = BTreeMap::new();
        for (node_id, inst) in &nodes {
            for req in &inst.spec().reqs {
                req_node_id.insert(req.clone(), node_id.clone());
            }
            for cap in &inst.spec().caps {
                cap_node_id.insert(cap.clone(), node_id.clone());
            }
        }

        for req in req_node_id.keys() {
            if !binding.contains_key(req) {
                return Err(SpecInvalid::UnboundRequirement { req: req.clone() });
            }
        }
        for (req, cap) in &binding {
            if !cap_node_id.contains_key(cap) {
                return Err(SpecInvalid::BindingTargetsUndeclaredCap {
                    req: req.clone(),
                    cap: cap.clone(),
                });
            }
        }

        let mut app = Self {
            nodes,
            binding,
            contained_by,
            has_hard_reset,
            reqs: BTreeSet::new(),
            caps: BTreeSet::new(),
            req_node_id,
            cap_node_id,
            faults: BTreeSet::new(),
            is_containment_consistent: true,
            global_state: String::new(),
        };
        app.recompute_derived();
        debug!(nodes = app.nodes.len(), global_state = %app.global_state, "application constructed");
        Ok(app)
    }

    fn recompute_derived(&mut self) {
        self.reqs = self
            .nodes
            .values()
            .flat_map(|inst| inst.current_state().reqs.iter().cloned())
            .collect();
        self.caps = self
            .nodes
            .values()
            .flat_map(|inst| inst.current_state().caps.iter().cloned())
            .collect();

        self.faults = self
            .reqs
            .iter()
            .filter(|req| {
                let cap = self.binding.get(*req);
                !matches!(cap, Some(c) if self.caps.contains(c))
            })
            .cloned()
            .collect();

        self.is_containment_consistent = self.nodes.iter().all(|(node_id, inst)| {
            if !inst.current_state().is_alive {
                return true;
            }
            match self.contained_by.get(node_id) {
                None => true,
                Some(container_id) => self
                    .nodes
                    .get(container_id)
                    .is_some_and(|c| c.current_state().is_alive),
            }
        });

        self.global_state = global_state_key(&self.nodes);
    }

    pub fn nodes(&self) -> &BTreeMap<NodeId, NodeInstance> {
        &self.nodes
    }

    pub fn binding(&self) -> &BTreeMap<ReqId, CapId> {
        &self.binding
    }

    pub fn contained_by(&self) -> &BTreeMap<NodeId, NodeId> {
        &self.contained_by
    }

    pub fn has_hard_reset(&self) -> bool {
        self.has_hard_reset
    }

    pub fn reqs(&self) -> &BTreeSet<ReqId> {
        &self.reqs
    }

    pub fn caps(&self) -> &BTreeSet<CapId> {
        &self.caps
    }

    /// Index from requirement id to the unique node that may ever demand
    /// it, derived from declared (not current-state) requirement sets.
    pub fn req_node_id(&self) -> &BTreeMap<ReqId, NodeId> {
        &self.req_node_id
    }

    /// Index from capability id to the unique node that may ever offer it.
    pub fn cap_node_id(&self) -> &BTreeMap<CapId, NodeId> {
        &self.cap_node_id
    }

    pub fn faults(&self) -> &BTreeSet<ReqId> {
        &self.faults
    }

    pub fn is_consistent(&self) -> bool {
        self.faults.is_empty()
    }

    pub fn is_containment_consistent(&self) -> bool {
        self.is_containment_consistent
    }

    /// The canonical `"node=state|node=state|..."` key from spec.md §6,
    /// tokens sorted lexicographically by the full `node=state` substring.
    pub fn global_state(&self) -> &str {
        &self.global_state
    }

    fn requirement_satisfied(&self, req: &ReqId) -> bool {
        self.binding
            .get(req)
            .is_some_and(|cap| self.caps.contains(cap))
    }

    // ---- legality predicates, spec.md §4.3 --------------------------------

    /// Checks, in order, exactly as spec.md §4.3 specifies: consistency,
    /// then (iff `has_hard_reset`) containment consistency, then node
    /// presence, then op presence, then requirement satisfaction.
    pub fn unsatisfied_op_constraints(
        &self,
        node_id: &NodeId,
        op_id: &crate::ids::OpId,
    ) -> AppMoveResult<()> {
        if !self.is_consistent() {
            return Err(IllegalApplicationMove::FaultsPending);
        }
        if self.has_hard_reset && !self.is_containment_consistent {
            return Err(IllegalApplicationMove::LivenessConstraintFailing);
        }
        let inst = self
            .nodes
            .get(node_id)
            .ok_or_else(|| IllegalApplicationMove::UnknownNode(node_id.clone()))?;
        let op = inst
            .current_state()
            .ops
            .get(op_id)
            .ok_or_else(|| IllegalApplicationMove::OpNotEnabled {
                node: node_id.clone(),
                op: op_id.clone(),
            })?;
        let any_alt_satisfied = op
            .reqs
            .iter()
            .any(|alt| alt.iter().all(|req| self.requirement_satisfied(req)));
        if !any_alt_satisfied {
            return Err(IllegalApplicationMove::RequirementsUnsatisfied {
                node: node_id.clone(),
                op: op_id.clone(),
            });
        }
        Ok(())
    }

    pub fn can_perform_op(&self, node_id: &NodeId, op_id: &crate::ids::OpId) -> bool {
        self.unsatisfied_op_constraints(node_id, op_id).is_ok()
    }

    /// No "all faults pending" short-circuit here by design — see spec.md
    /// §4.3/§9: handlers exist precisely to drain faults, so `!isConsistent`
    /// is never required, only that this specific requirement is faulted.
    pub fn unsatisfied_handler_constraints(
        &self,
        node_id: &NodeId,
        req_id: &ReqId,
    ) -> AppMoveResult<()> {
        if !self.faults.contains(req_id) {
            return Err(IllegalApplicationMove::RequirementNotFaulted(req_id.clone()));
        }
        let inst = self
            .nodes
            .get(node_id)
            .ok_or_else(|| IllegalApplicationMove::UnknownNode(node_id.clone()))?;
        if !inst.current_state().handlers.contains_key(req_id) {
            return Err(IllegalApplicationMove::NoHandlerForRequirement {
                node: node_id.clone(),
                req: req_id.clone(),
            });
        }
        Ok(())
    }

    pub fn can_handle_fault(&self, node_id: &NodeId, req_id: &ReqId) -> bool {
        self.unsatisfied_handler_constraints(node_id, req_id).is_ok()
    }

    /// Checks only the immediate container's liveness, not the transitive
    /// chain — intentional, see spec.md §9 "Open questions".
    pub fn unsatisfied_hard_reset_constraints(&self, node_id: &NodeId) -> AppMoveResult<()> {
        if !self.has_hard_reset {
            return Err(IllegalApplicationMove::HardResetDisabled);
        }
        let container_id = self
            .contained_by
            .get(node_id)
            .ok_or_else(|| IllegalApplicationMove::NoContainer(node_id.clone()))?;
        let container_alive = self
            .nodes
            .get(container_id)
            .is_some_and(|c| c.current_state().is_alive);
        if container_alive {
            return Err(IllegalApplicationMove::ContainerAlive {
                node: node_id.clone(),
                container: container_id.clone(),
            });
        }
        Ok(())
    }

    pub fn can_hard_reset(&self, node_id: &NodeId) -> bool {
        self.unsatisfied_hard_reset_constraints(node_id).is_ok()
    }

    // ---- successor constructors, spec.md §4.3 -----------------------------

    pub fn perform_op(&self, node_id: &NodeId, op_id: &crate::ids::OpId) -> AppMoveResult<Application> {
        self.unsatisfied_op_constraints(node_id, op_id)?;
        let inst = &self.nodes[node_id];
        let next_inst = inst
            .perform_op(op_id)
            .expect("legality predicate already confirmed the op is enabled");
        Ok(self.with_node_replaced(node_id, next_inst))
    }

    pub fn handle_fault(&self, node_id: &NodeId, req_id: &ReqId) -> AppMoveResult<Application> {
        self.unsatisfied_handler_constraints(node_id, req_id)?;
        let inst = &self.nodes[node_id];
        let next_inst = inst
            .handle_fault(req_id)
            .expect("legality predicate already confirmed the handler exists");
        Ok(self.with_node_replaced(node_id, next_inst))
    }

    pub fn hard_reset(&self, node_id: &NodeId) -> AppMoveResult<Application> {
        self.unsatisfied_hard_reset_constraints(node_id)?;
        let inst = &self.nodes[node_id];
        let next_inst = inst.do_hard_reset();
        Ok(self.with_node_replaced(node_id, next_inst))
    }

    fn with_node_replaced(&self, node_id: &NodeId, next_inst: NodeInstance) -> Application {
        let mut nodes = self.nodes.clone();
        nodes.insert(node_id.clone(), next_inst);
        let mut next = Application {
            nodes,
            binding: self.binding.clone(),
            contained_by: self.contained_by.clone(),
            has_hard_reset: self.has_hard_reset,
            reqs: BTreeSet::new(),
            caps: BTreeSet::new(),
            req_node_id: self.req_node_id.clone(),
            cap_node_id: self.cap_node_id.clone(),
            faults: BTreeSet::new(),
            is_containment_consistent: true,
            global_state: String::new(),
        };
        next.recompute_derived();
        next
    }

    /// Every legal move from this application, as `(Step, Application)`
    /// pairs, in the canonical enumeration order required by spec.md
    /// §4.4/§4.5/§9: every op on every node (in `nodes`/op map order), then
    /// every fault-handle on every declared requirement of every node,
    /// then every hard reset on every node.
    pub fn legal_successors(&self) -> Vec<(Step, Application)> {
        let mut out = Vec::new();

        for (node_id, inst) in &self.nodes {
            for op_id in inst.current_state().ops.keys() {
                if let Ok(next) = self.perform_op(node_id, op_id) {
                    out.push((
                        Step::Op {
                            node: node_id.clone(),
                            op: op_id.clone(),
                        },
                        next,
                    ));
                }
            }
        }
        for (node_id, inst) in &self.nodes {
            for req_id in &inst.spec().reqs {
                if let Ok(next) = self.handle_fault(node_id, req_id) {
                    out.push((
                        Step::Handle {
                            node: node_id.clone(),
                            req: req_id.clone(),
                        },
                        next,
                    ));
                }
            }
        }
        for node_id in self.nodes.keys() {
            if let Ok(next) = self.hard_reset(node_id) {
                out.push((Step::Reset { node: node_id.clone() }, next));
            }
        }

        out
    }
}

fn global_state_key(nodes: &BTreeMap<NodeId, NodeInstance>) -> String {
    let mut tokens: Vec<String> = nodes
        .iter()
        .map(|(node_id, inst)| format!("{}={}", node_id, inst.current_state_id()))
        .collect();
    tokens.sort();
    tokens.join("|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::OpId;
    use crate::spec::{NodeSpec, Operation, State};
    use std::sync::Arc;

    fn single_node_two_state_app() -> Application {
        let mut states = BTreeMap::new();
        states.insert(
            crate::ids::StateId::from("s0"),
            State::new(true).with_op(
                OpId::from("go"),
                Operation::new(crate::ids::StateId::from("s1"), vec![BTreeSet::new()]),
            ),
        );
        states.insert(crate::ids::StateId::from("s1"), State::new(true));
        let spec = Arc::new(
            NodeSpec::new(
                &NodeId::from("N"),
                crate::ids::StateId::from("s0"),
                "generic",
                BTreeSet::new(),
                BTreeSet::new(),
                BTreeSet::from([OpId::from("go")]),
                states,
            )
            .unwrap(),
        );
        let mut nodes = BTreeMap::new();
        nodes.insert(NodeId::from("N"), NodeInstance::at_initial(spec));
        Application::new(nodes, BTreeMap::new(), BTreeMap::new(), false).unwrap()
    }

    #[test]
    fn global_state_format_matches_spec() {
        let app = single_node_two_state_app();
        assert_eq!(app.global_state(), "N=s0");
    }

    #[test]
    fn op_is_legal_and_advances_state() {
        let app = single_node_two_state_app();
        assert!(app.can_perform_op(&NodeId::from("N"), &OpId::from("go")));
        let next = app.perform_op(&NodeId::from("N"), &OpId::from("go")).unwrap();
        assert_eq!(next.global_state(), "N=s1");
    }

    #[test]
    fn unbound_requirement_rejected_at_construction() {
        let mut states = BTreeMap::new();
        states.insert(
            crate::ids::StateId::from("s0"),
            State::new(true).with_reqs([ReqId::from("r")]),
        );
        let spec = Arc::new(
            NodeSpec::new(
                &NodeId::from("N"),
                crate::ids::StateId::from("s0"),
                "generic",
                BTreeSet::new(),
                BTreeSet::from([ReqId::from("r")]),
                BTreeSet::new(),
                states,
            )
            .unwrap(),
        );
        let mut nodes = BTreeMap::new();
        nodes.insert(NodeId::from("N"), NodeInstance::at_initial(spec));
        let err = Application::new(nodes, BTreeMap::new(), BTreeMap::new(), false).unwrap_err();
        assert!(matches!(err, SpecInvalid::UnboundRequirement { .. }));
    }
}
