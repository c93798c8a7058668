use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vox_gateway::api::{self, ApiState};
use vox_gateway::tools::{Calculator, ToolSet};
use vox_gateway::{Config, Router};

/// Vox - Voice assistant gateway with function-call routing
#[derive(Parser)]
#[command(name = "vox", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "VOX_PORT", default_value = "8170")]
    port: u16,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a text through the function-call router (no LLM involved)
    ///
    /// The text is treated both as model output (so JSON payloads dispatch)
    /// and as the utterance for rule-based fallback.
    Route {
        /// Text to route
        text: String,
    },
    /// Evaluate an arithmetic expression or spoken math phrase
    Calc {
        /// Expression, symbolic or spoken ("10 to the power of 2")
        expression: String,
    },
    /// Print the function-calling system prompt
    Specs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,vox_gateway=info",
        1 => "info,vox_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(cmd) = cli.command {
        return match cmd {
            Command::Route { text } => cmd_route(&text).await,
            Command::Calc { expression } => cmd_calc(&expression),
            Command::Specs => {
                println!("{}", vox_gateway::build_system_prompt());
                Ok(())
            }
        };
    }

    let config = Config::load();
    let state = Arc::new(ApiState::from_config(&config));

    if state.stt.is_none() {
        tracing::warn!("no OpenAI API key - voice endpoints disabled");
    }
    if state.llm.is_none() {
        tracing::warn!("no LLM configured - /chat/text degrades to rule-based routing");
    }

    tracing::info!(port = cli.port, "starting vox gateway");
    api::serve(state, cli.port).await?;

    Ok(())
}

/// Route a text directly, printing the reply or the no-match sentinel
async fn cmd_route(text: &str) -> anyhow::Result<()> {
    let config = Config::load();
    let tools = Arc::new(ToolSet::new(config.tools.default_location));
    let router = Router::new(tools);

    match router.route(text, text).await {
        Some(reply) => println!("{reply}"),
        None => println!("(no tool matched)"),
    }
    Ok(())
}

/// Normalize (if spoken) and evaluate an expression
fn cmd_calc(expression: &str) -> anyhow::Result<()> {
    let normalized = vox_gateway::normalize_expression(expression);
    let expr = if normalized.is_empty() {
        expression.trim().to_string()
    } else {
        normalized
    };

    let result = Calculator::new().evaluate(&expr);
    if result.ok {
        println!("{}", result.content);
        Ok(())
    } else {
        anyhow::bail!(result.content)
    }
}
