//! All-pairs shortest paths over the reachability graph. See spec.md §4.5.

use std::collections::BTreeMap;

use tracing::info;

use crate::application::Application;
use crate::step::Step;

/// The two nested mappings spec.md §4.5/§6 describe: `globalState ->
/// globalState -> value`. Unreachable pairs are omitted entirely; a
/// `src == dst` entry always has cost 0 and no step (zero moves needed).
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub costs: BTreeMap<String, BTreeMap<String, u64>>,
    pub steps: BTreeMap<String, BTreeMap<String, Step>>,
}

impl Plan {
    pub fn cost(&self, src: &str, dst: &str) -> Option<u64> {
        self.costs.get(src).and_then(|row| row.get(dst)).copied()
    }

    pub fn step(&self, src: &str, dst: &str) -> Option<&Step> {
        self.steps.get(src).and_then(|row| row.get(dst))
    }
}

/// Build the all-pairs shortest-path plan over a reachability map, per
/// spec.md §4.5. Unit cost per move; ties at equal cost keep the
/// first-enumerated witness (ops before handles before resets, per
/// `Application::legal_successors`'s order).
pub fn plans(reachable: &BTreeMap<String, Application>) -> Plan {
    let mut keys: Vec<&String> = reachable.keys().collect();
    keys.sort();
    let n = keys.len();
    let idx: BTreeMap<&str, usize> = keys.iter().enumerate().map(|(i, k)| (k.as_str(), i)).collect();

    let mut cost: Vec<Vec<Option<u64>>> = vec![vec![None; n]; n];
    let mut step: Vec<Vec<Option<Step>>> = vec![vec![None; n]; n];
    for (i, row) in cost.iter_mut().enumerate() {
        row[i] = Some(0);
    }

    // Phase 1 — direct edges.
    for (i, key) in keys.iter().enumerate() {
        let app = &reachable[*key];
        for (move_step, succ) in app.legal_successors() {
            let Some(&j) = idx.get(succ.global_state()) else {
                continue;
            };
            let new_cost = 1u64;
            let should_write = cost[i][j].is_none_or(|existing| existing > new_cost);
            if should_write {
                cost[i][j] = Some(new_cost);
                step[i][j] = Some(move_step);
            }
        }
    }

    // Phase 2 — Floyd–Warshall, propagating the src→via first-step witness.
    for via in 0..n {
        for src in 0..n {
            if src == via {
                continue;
            }
            let Some(c_src_via) = cost[src][via] else {
                continue;
            };
            for dst in 0..n {
                let Some(c_via_dst) = cost[via][dst] else {
                    continue;
                };
                let new_cost = c_src_via + c_via_dst;
                let should_write = cost[src][dst].is_none_or(|existing| new_cost < existing);
                if should_write {
                    cost[src][dst] = Some(new_cost);
                    step[src][dst] = step[src][via].clone();
                }
            }
        }
    }

    let mut plan = Plan::default();
    for (i, src_key) in keys.iter().enumerate() {
        let mut cost_row = BTreeMap::new();
        let mut step_row = BTreeMap::new();
        for (j, dst_key) in keys.iter().enumerate() {
            if let Some(c) = cost[i][j] {
                cost_row.insert((*dst_key).clone(), c);
            }
            if let Some(s) = &step[i][j] {
                step_row.insert((*dst_key).clone(), s.clone());
            }
        }
        plan.costs.insert((*src_key).clone(), cost_row);
        plan.steps.insert((*src_key).clone(), step_row);
    }

    info!(states = n, "plan computed");
    plan
}
