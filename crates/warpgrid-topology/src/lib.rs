//! Reachability and shortest-plan analysis for applications modeled as
//! composed finite-state machines.
//!
//! An application is a fixed set of nodes, each an FSM whose states expose
//! capabilities, demand requirements, and offer operations and fault
//! handlers. Requirements are satisfied by capabilities of other nodes via
//! a static binding; containment encodes liveness dependencies. This crate
//! answers two questions: which global configurations are reachable from
//! an initial one (`reachable`), and, for every reachable pair, the
//! minimum number of moves and a witness first step (`plans`).
//!
//! Constructing `Node`/`Application` values (parsers, persistence, UI) and
//! any cost model beyond unit cost are explicitly out of scope here — see
//! the top-level `SPEC_FULL.md` for the full contract.

pub mod application;
pub mod config;
pub mod error;
pub mod ids;
pub mod instance;
pub mod planner;
pub mod reachability;
pub mod spec;
pub mod step;

pub use application::Application;
pub use config::EngineConfig;
pub use error::{IllegalApplicationMove, IllegalNodeMove, SpecInvalid};
pub use ids::{CapId, NodeId, OpId, ReqId, StateId};
pub use instance::NodeInstance;
pub use planner::{plans, Plan};
pub use reachability::{reachable, reachable_with_config};
pub use spec::{NodeSpec, Operation, State};
pub use step::{Step, StepWire};
