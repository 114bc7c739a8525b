use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "tiq")]
#[command(about = "Query multiple threat intelligence sources for information about an indicator.")]
#[command(version)]
#[command(after_help = "\x1b[1;36mExamples:\x1b[0m
  tiq 8.8.8.8                             Look up an IP address
  tiq evil.example.com --json             Look up a domain, print JSON
  tiq 44d88612fea8a8f36de82e1278abb02f    Look up a file hash

\x1b[1;36mConfiguration:\x1b[0m
  TOOL1_API_KEY, TOOL2_API_KEY, TOOL3_API_KEY     Required API keys
  TOOL1_BASE_URL, TOOL2_BASE_URL, TOOL3_BASE_URL  Optional endpoint overrides
  TIQ_TIMEOUT_SECS                                Per-request timeout (default 30)

  Variables may also be placed in a .env file in the working directory.")]
pub struct Cli {
    /// The indicator to search for (IP address, domain, hash, etc.)
    pub query: String,

    /// Output results in JSON format instead of table format
    #[arg(long)]
    pub json: bool,

    /// Per-request timeout in seconds (overrides TIQ_TIMEOUT_SECS)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Verbose logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
