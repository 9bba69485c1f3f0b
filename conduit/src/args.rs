use std::path::PathBuf;

use clap::{Parser, Subcommand};
use conduit_routing::{Priority, Region, RoutingRequest, TaskCategory, Tier};

/// Conduit AI Router
#[derive(Debug, Parser)]
#[command(name = "conduit", about = "Tier-aware routing across local and cloud AI backends")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "conduit.toml", env = "CONDUIT_CONFIG", global = true)]
    pub config: PathBuf,

    /// Log filter when `RUST_LOG` is unset
    #[arg(long, default_value = "warn", env = "CONDUIT_LOG", global = true)]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the inferred task category
    Classify {
        text: String,
    },

    /// Print the routing decision as JSON
    Route(RouteArgs),

    /// Route, dispatch, and print the result with usage counters
    Ask {
        #[command(flatten)]
        route: RouteArgs,

        /// Knowledge-base scope for retrieval
        #[arg(long)]
        context_id: Option<String>,
    },

    /// List the backend catalog with tier availability
    Backends,

    /// Probe local engines and report vendor configuration
    Health,

    /// List models installed on the local engines
    Models,
}

#[derive(Debug, clap::Args)]
pub struct RouteArgs {
    /// Request text
    pub text: String,

    #[arg(long, default_value_t = Tier::Free)]
    pub tier: Tier,

    #[arg(long, default_value_t = Region::Global)]
    pub region: Region,

    #[arg(long, default_value_t = Priority::Balanced)]
    pub priority: Priority,

    /// Declared task category; inferred when absent
    #[arg(long)]
    pub task: Option<TaskCategory>,

    /// Explicit `vendor:model` backend
    #[arg(long)]
    pub backend: Option<String>,
}

impl RouteArgs {
    pub fn to_request(&self) -> RoutingRequest {
        RoutingRequest {
            text: self.text.clone(),
            task: self.task,
            tier: self.tier,
            region: self.region,
            priority: self.priority,
            backend: self.backend.clone(),
        }
    }
}
