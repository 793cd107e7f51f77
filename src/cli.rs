use clap::{Parser, Subcommand};
use std::net::SocketAddr;

/// Look up contact details for a website through a hosted contact-extraction API.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Serve the lookup form over HTTP (default)
    Serve {
        /// Address to listen on; overrides BIND_ADDR
        #[arg(long, value_name = "ADDR")]
        bind: Option<SocketAddr>,
    },
    /// Look up a single URL or domain and print the result
    Lookup {
        /// Full URL (https://example.com) or bare domain (example.com)
        query: String,

        /// Print the normalized report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Serve { bind: None })
    }
}
