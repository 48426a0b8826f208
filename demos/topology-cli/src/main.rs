use clap::{Parser, Subcommand};

mod commands;
mod topology_file;

#[derive(Parser)]
#[command(
    name = "topology",
    about = "Reachability and shortest-plan analysis for composed-FSM topologies",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every global state reachable from a topology's initial state
    Reach {
        /// Path to a JSON topology description
        path: String,
        /// Path to a TOML engine config (max_reachable_states, log_expansion)
        #[arg(short, long)]
        config: Option<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Report the shortest path between two global states
    Plan {
        /// Path to a JSON topology description
        path: String,
        /// Source global-state key, e.g. "A=off|B=s"
        from: String,
        /// Destination global-state key
        to: String,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("topology=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Reach { path, config, format } => {
            commands::reach::reach(&path, config.as_deref(), &format)
        }
        Commands::Plan { path, from, to, format } => commands::plan::plan(&path, &from, &to, &format),
    }
}
