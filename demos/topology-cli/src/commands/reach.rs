use std::path::Path;

use warpgrid_topology::{reachable_with_config, EngineConfig};

use crate::topology_file;

pub fn reach(path: &str, config_path: Option<&str>, format: &str) -> anyhow::Result<()> {
    let app = topology_file::load(Path::new(path))?;
    let config = match config_path {
        Some(config_path) => {
            let contents = std::fs::read_to_string(config_path)?;
            EngineConfig::from_toml_str(&contents)?
        }
        None => EngineConfig::default(),
    };
    let states = reachable_with_config(&app, &config)?;

    match format {
        "json" => {
            let keys: Vec<&str> = states.keys().map(String::as_str).collect();
            println!("{}", serde_json::to_string_pretty(&keys)?);
        }
        _ => {
            println!("{} reachable state(s) from {}:", states.len(), app.global_state());
            for key in states.keys() {
                println!("  {key}");
            }
        }
    }

    Ok(())
}
