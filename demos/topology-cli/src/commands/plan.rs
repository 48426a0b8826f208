use std::path::Path;

use serde::Serialize;
use warpgrid_topology::{plans, reachable};

use crate::topology_file;

#[derive(Serialize)]
struct PlanSummary {
    from: String,
    to: String,
    cost: u64,
    first_step: warpgrid_topology::StepWire,
}

pub fn plan(path: &str, from: &str, to: &str, format: &str) -> anyhow::Result<()> {
    let app = topology_file::load(Path::new(path))?;
    let states = reachable(&app);
    let plan = plans(&states);

    let Some(cost) = plan.cost(from, to) else {
        anyhow::bail!("{to} is not reachable from {from}");
    };
    let step = plan.step(from, to);

    match format {
        "json" => {
            let summary = step.map(|s| PlanSummary {
                from: from.to_string(),
                to: to.to_string(),
                cost,
                first_step: s.to_wire(),
            });
            match summary {
                Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
                None => println!("{{\"from\":\"{from}\",\"to\":\"{to}\",\"cost\":0}}"),
            }
        }
        _ => {
            println!("{from} -> {to}: cost {cost}");
            match step {
                Some(s) => println!("  first step: {:?}", s.to_wire()),
                None => println!("  already at the destination"),
            }
        }
    }

    Ok(())
}
