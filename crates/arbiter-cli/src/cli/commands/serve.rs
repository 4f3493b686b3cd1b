use std::path::PathBuf;

use arbiter_core::context::AppContext;
use arbiter_server::{start_server, AppState};
use tracing::info;

use super::super::args::ServeArgs;
use super::{load_config, report};
use crate::exit_codes::SUCCESS;

pub async fn run(config: Option<PathBuf>, args: ServeArgs) -> anyhow::Result<i32> {
    let mut cfg = match load_config(config.as_deref()) {
        Ok(cfg) => cfg,
        Err(code) => return Ok(code),
    };
    if let Some(bind) = args.bind {
        cfg.server.bind = bind;
    }

    // Missing credentials or fixtures are fatal before anything binds.
    let ctx = match AppContext::from_config(&cfg) {
        Ok(ctx) => ctx,
        Err(e) => return Ok(report(&e)),
    };
    info!(
        bind = %cfg.server.bind,
        models = ctx.registry.len(),
        documents = ctx.store.len(),
        "starting arbiter API"
    );

    start_server(&cfg.server.bind, AppState::new(ctx)).await?;
    Ok(SUCCESS)
}
