//! Error types for the topology engine.

use thiserror::Error;

use crate::ids::{CapId, NodeId, OpId, ReqId, StateId};

/// Result alias for `NodeSpec`/`Application` construction.
pub type SpecResult<T> = Result<T, SpecInvalid>;

/// Result alias for node-local moves.
pub type NodeMoveResult<T> = Result<T, IllegalNodeMove>;

/// Result alias for application-level moves.
pub type AppMoveResult<T> = Result<T, IllegalApplicationMove>;

/// Violations detected while constructing a `NodeSpec` or `Application`.
///
/// Fatal: the caller must fix the input. The engine never raises this from
/// `reachable`/`plans` — only from the constructors in spec.md §6 item 1.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpecInvalid {
    #[error("state `{state}` declares capability `{cap}` not in node `{node}`'s declared caps")]
    UndeclaredCap {
        node: NodeId,
        state: StateId,
        cap: CapId,
    },

    #[error("state `{state}` declares requirement `{req}` not in node `{node}`'s declared reqs")]
    UndeclaredReq {
        node: NodeId,
        state: StateId,
        req: ReqId,
    },

    #[error("state `{state}` offers op `{op}` not in node `{node}`'s declared ops")]
    UndeclaredOp {
        node: NodeId,
        state: StateId,
        op: OpId,
    },

    #[error("op `{op}` in state `{state}` of node `{node}` targets undeclared state `{to}`")]
    UnknownOpTarget {
        node: NodeId,
        state: StateId,
        op: OpId,
        to: StateId,
    },

    #[error("op `{op}` in state `{state}` of node `{node}` has an empty requirement-alternative list")]
    EmptyAlternatives {
        node: NodeId,
        state: StateId,
        op: OpId,
    },

    #[error("op `{op}` in state `{state}` of node `{node}` mentions undeclared requirement `{req}`")]
    UnknownOpRequirement {
        node: NodeId,
        state: StateId,
        op: OpId,
        req: ReqId,
    },

    #[error("state `{state}` of node `{node}` declares a handler for undeclared requirement `{req}`")]
    UnknownHandlerRequirement {
        node: NodeId,
        state: StateId,
        req: ReqId,
    },

    #[error("state `{state}` of node `{node}` handler for `{req}` targets undeclared state `{to}`")]
    UnknownHandlerTarget {
        node: NodeId,
        state: StateId,
        req: ReqId,
        to: StateId,
    },

    #[error("node `{node}` declares initial state `{state}` which is not a declared state")]
    UnknownInitialState { node: NodeId, state: StateId },

    #[error("requirement `{req}` has no binding in the application's binding map")]
    UnboundRequirement { req: ReqId },

    #[error("binding maps requirement `{req}` to capability `{cap}` which no node ever declares")]
    BindingTargetsUndeclaredCap { req: ReqId, cap: CapId },

    #[error("node `{node}` is contained by unknown node `{container}`")]
    UnknownContainer { node: NodeId, container: NodeId },

    #[error("too many reachable states explored (cap: {cap}); likely a miswired topology")]
    TooManyStates { cap: usize },
}

/// Attempting a node-local move (`performOp`/`handleFault`/`doHardReset`)
/// that isn't legal at the `NodeInstance` level — a caller bug, per spec.md §7.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalNodeMove {
    #[error("op `{op}` is not enabled in state `{state}`")]
    OpNotInState { state: StateId, op: OpId },

    #[error("no fault handler for requirement `{req}` in state `{state}`")]
    NoHandlerForRequirement { state: StateId, req: ReqId },
}

/// Attempting an application-level move whose precondition fails, per
/// spec.md §4.3/§7. The message text is part of the stable, testable
/// contract — do not reword without checking spec.md §8's "Witness
/// validity"/scenario tests that key off specific reason strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalApplicationMove {
    #[error("faults pending")]
    FaultsPending,

    #[error("liveness constraint failing")]
    LivenessConstraintFailing,

    #[error("unknown node `{0}`")]
    UnknownNode(NodeId),

    #[error("op `{op}` is not enabled in node `{node}`'s current state")]
    OpNotEnabled { node: NodeId, op: OpId },

    #[error("no alternative requirement set of op `{op}` on node `{node}` is satisfied")]
    RequirementsUnsatisfied { node: NodeId, op: OpId },

    #[error("requirement `{0}` is not currently faulted")]
    RequirementNotFaulted(ReqId),

    #[error("node `{node}` has no fault handler for requirement `{req}`")]
    NoHandlerForRequirement { node: NodeId, req: ReqId },

    #[error("hard reset is disabled for this application")]
    HardResetDisabled,

    #[error("node `{0}` has no container")]
    NoContainer(NodeId),

    #[error("node `{node}`'s container `{container}` is alive")]
    ContainerAlive { node: NodeId, container: NodeId },
}
