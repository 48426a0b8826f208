//! Depth-first enumeration of the application configuration space, keyed
//! by canonical global state. See spec.md §4.4.

use std::collections::BTreeMap;

use tracing::{info, trace};

use crate::application::Application;
use crate::config::EngineConfig;
use crate::error::{SpecInvalid, SpecResult};

/// `reachable(app)` from spec.md §6, using the default `EngineConfig`
/// (unbounded, with per-state expansion logging on). Panics only if the
/// default config somehow set a cap, which it never does — see
/// `reachable_with_config` for the fallible, configurable entry point.
pub fn reachable(initial: &Application) -> BTreeMap<String, Application> {
    reachable_with_config(initial, &EngineConfig::default())
        .expect("EngineConfig::default() has no reachable-state cap")
}

/// Enumerate every configuration reachable from `initial`, keyed by
/// `Application::global_state()`. Implemented as an explicit worklist
/// (not literal recursion) per the Recursion design note in spec.md §9 and
/// the resource-discipline note in §5 — deep graphs should not grow the
/// native call stack.
///
/// The set of keys returned is independent of traversal order; only which
/// `Application` value ends up stored for a given key can vary, and the
/// first one visited always wins (spec.md §4.4).
pub fn reachable_with_config(
    initial: &Application,
    config: &EngineConfig,
) -> SpecResult<BTreeMap<String, Application>> {
    let mut visited: BTreeMap<String, Application> = BTreeMap::new();
    let mut worklist: Vec<Application> = vec![initial.clone()];

    while let Some(app) = worklist.pop() {
        let key = app.global_state().to_string();
        if visited.contains_key(&key) {
            continue;
        }
        if let Some(cap) = config.max_reachable_states {
            if visited.len() >= cap {
                return Err(SpecInvalid::TooManyStates { cap });
            }
        }
        if config.log_expansion {
            trace!(global_state = %key, "expanding reachable state");
        }

        for (_step, successor) in app.legal_successors() {
            if !visited.contains_key(successor.global_state()) {
                worklist.push(successor);
            }
        }
        visited.insert(key, app);
    }

    info!(states = visited.len(), "reachability search complete");
    Ok(visited)
}
