//! ActionKit CLI - inspect GitHub Actions from the command line or over MCP

mod mcp;

use actionkit::{ActionsService, RawContentClient, Toolbox, DEFAULT_RAW_CONTENT_ORIGIN, TOOL_LLMTXT};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// ActionKit - AI-friendly GitHub Actions utilities
#[derive(Parser, Debug)]
#[command(name = "actionkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    client: ClientArgs,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

/// Raw-content client settings shared by all subcommands
#[derive(Args, Debug, Clone)]
struct ClientArgs {
    /// Origin serving raw repository files
    #[arg(long, global = true, default_value = DEFAULT_RAW_CONTENT_ORIGIN)]
    base_url: String,

    /// Per-request timeout in seconds (at least 1)
    #[arg(long, global = true, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_secs: u64,

    /// Custom User-Agent (none is sent by default)
    #[arg(long, global = true)]
    user_agent: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp,
    /// Fetch an action's action.yml and print it as JSON
    Action {
        /// Action reference, e.g. actions/checkout@v5
        reference: String,

        /// Print a short summary instead of the full JSON
        #[arg(long)]
        summary: bool,
    },
    /// Fetch a repository README and print it
    Readme {
        /// Repository reference, e.g. owner/repo or owner/repo@branch
        reference: String,
    },
}

impl ClientArgs {
    fn build_toolbox(&self) -> Result<Toolbox, actionkit::FetchError> {
        let mut builder = RawContentClient::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs));
        if let Some(ref ua) = self.user_agent {
            builder = builder.user_agent(ua);
        }
        Ok(Toolbox::new(ActionsService::with_source(builder.build()?)))
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Handle --llmtxt flag
    if cli.llmtxt {
        writeln_safe(TOOL_LLMTXT);
        std::process::exit(0);
    }

    init_tracing(cli.verbose);

    let tools = match cli.client.build_toolbox() {
        Ok(tools) => tools,
        Err(e) => exit_with_error(e),
    };

    match cli.command {
        Some(Commands::Mcp) => {
            mcp::run_server(tools).await;
        }
        Some(Commands::Action { reference, summary }) => {
            run_action(&tools, &reference, summary).await;
        }
        Some(Commands::Readme { reference }) => {
            match tools.service().get_readme(&reference).await {
                Ok(readme) => writeln_safe(&readme),
                Err(e) => exit_with_error(e),
            }
        }
        None => {
            eprintln!("Usage: actionkit action <OWNER/REPO@VERSION>");
            eprintln!("   or: actionkit readme <OWNER/REPO[@BRANCH]>");
            eprintln!("   or: actionkit mcp");
            eprintln!("   or: actionkit --help");
            std::process::exit(1);
        }
    }
}

async fn run_action(tools: &Toolbox, reference: &str, summary: bool) {
    if summary {
        let args = actionkit::GetActionParametersArgs::new(reference);
        match tools.get_action_parameters(args).await {
            Ok(output) => writeln_safe(&output.text),
            Err(e) => exit_with_error(e),
        }
    } else {
        match tools.service().get_action_parameters_json(reference).await {
            Ok(json) => writeln_safe(&json),
            Err(e) => exit_with_error(e),
        }
    }
}

/// Log to stderr; stdout carries results and JSON-RPC
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn exit_with_error(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
