use clap::{Parser, Subcommand};

/// envvars-broker: Open Service Broker backed by environment variables
#[derive(Parser)]
#[command(name = "envvars-broker", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the broker server
    Serve {
        /// Port to bind (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the catalog resolved from the environment and exit
    Catalog,
}
