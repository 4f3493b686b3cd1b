use super::args::*;
use crate::exit_codes::{COMMAND_FAILED, CONFIG_ERROR, SUCCESS};

use arbiter_core::config::ArbiterConfig;
use arbiter_core::ArbiterError;

pub mod ask;
pub mod documents;
pub mod evaluate;
pub mod models;
pub mod serve;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let config = cli.config;
    match cli.cmd {
        Command::Serve(args) => serve::run(config, args).await,
        Command::Models(args) => models::run(config, args),
        Command::Documents(args) => documents::run(config, args),
        Command::Ask(args) => ask::run(config, args).await,
        Command::Evaluate(args) => evaluate::run(config, args).await,
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(SUCCESS)
        }
    }
}

/// Print a core error and turn it into the matching exit code.
pub(crate) fn report(err: &ArbiterError) -> i32 {
    eprintln!("error: {err}");
    if err.is_recoverable() {
        COMMAND_FAILED
    } else {
        CONFIG_ERROR
    }
}

/// Load config or report why it is unusable.
pub(crate) fn load_config(path: Option<&std::path::Path>) -> Result<ArbiterConfig, i32> {
    ArbiterConfig::load_or_default(path).map_err(|e| {
        eprintln!("config error: {e}");
        CONFIG_ERROR
    })
}
