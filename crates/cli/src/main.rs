//! `hc2` -- command-line tools for Lua scenes on a Fibaro HC2 controller.
//!
//! Scenes are kept as local `.lua` files carrying an embedded header with
//! the controller's metadata. `hc2 upload` sends a file (inlining required
//! libraries), `hc2 download` mirrors scenes into a section/room tree, and
//! `hc2 interact` triggers scenes and follows their debug console.
//!
//! # Environment variables
//!
//! | Variable        | Description                                  |
//! |-----------------|----------------------------------------------|
//! | `HC2_URL`       | Controller URL, same as `--url`              |
//! | `HC2_USER`      | Username, same as `--user`                   |
//! | `HC2_PASSWORD`  | Password, same as `--password`               |
//! | `RUST_LOG`      | Log filter; overrides `--log-level`          |

mod args;
mod commands;
mod context;

use clap::{CommandFactory, FromArgMatches};
use hc2_core::version::format_full_version;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{Cli, Command};

const CMD_NAME: &str = "hc2";

fn version_string() -> String {
    format_full_version(
        CMD_NAME,
        env!("CARGO_PKG_VERSION"),
        option_env!("HC2_GIT_BRANCH").unwrap_or(""),
        option_env!("HC2_GIT_COMMIT").unwrap_or(""),
    )
}

fn parse_cli() -> Cli {
    let matches = Cli::command().version(version_string()).get_matches();
    Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn init_tracing(log_level: &str) {
    let fallback = format!("hc2={log_level},hc2_core={log_level},hc2_client={log_level}");
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| fallback.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = parse_cli();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = context::config_path(cli.cfg_file.as_deref())?;

    match cli.command {
        Command::Init => commands::init::run(&config_path, &cli.login),
        Command::Info => commands::info::run(&config_path, &cli.login).await,
        Command::Upload(args) => commands::upload::run(&config_path, &cli.login, args).await,
        Command::Download(args) => commands::download::run(&config_path, &cli.login, args).await,
        Command::Interact(args) => commands::interact::run(&config_path, &cli.login, args).await,
        Command::Devices(args) => commands::devices::run(&config_path, &cli.login, args).await,
        Command::Globals(args) => commands::globals::run(&config_path, &cli.login, args).await,
    }
}
