use clap::Parser;

/// loanchat: talk to the loan-application assistant from a terminal.
#[derive(Parser, Debug)]
#[command(name = "loanchat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Conversation engine API base, e.g. http://localhost:5002/api.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// tracing filter directive.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Check the engine's health endpoint and exit.
    #[arg(long)]
    pub check: bool,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
