// CLI modules
mod cli;
mod logging;
mod state;

use clap::{Parser, Subcommand};
use cli::{args::Args, op::Op, Config, Download, Init, Login, Logout, Search, Signup, Status};

command_enum! {
    (Init, Init),
    (Status, Status),
    (Login, Login),
    (Signup, Signup),
    (Logout, Logout),
    (Config, Config),
    (Search, Search),
    (Download, Download),
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // A missing config file is fine, flags and defaults cover it
    let state = state::AppState::load(args.config_path.clone()).ok();

    let log_level = args
        .log_level
        .or_else(|| {
            state
                .as_ref()
                .and_then(|s| s.config.log_level.parse::<tracing::Level>().ok())
        })
        .unwrap_or(tracing::Level::WARN);
    let guard = logging::init_logging(log_level);

    // Resolve remote URL: explicit flag > config api_url > hardcoded default
    let remote = cli::op::resolve_remote(args.remote, state.as_ref());
    tracing::debug!(%remote, "using client api");

    let code = match cli::op::OpContext::new(remote, args.config_path) {
        Ok(ctx) => match args.command.execute(&ctx).await {
            Ok(output) => {
                println!("{}", output);
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        Err(e) => {
            eprintln!("Error: Failed to create API client: {}", e);
            1
        }
    };

    drop(guard);
    std::process::exit(code);
}
