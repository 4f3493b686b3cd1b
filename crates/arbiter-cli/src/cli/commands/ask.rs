use std::path::PathBuf;
use std::sync::Arc;

use arbiter_core::gateway::Gateway;
use arbiter_core::prompt::{ChatPrompt, Prompt};
use arbiter_core::registry::ModelRegistry;
use arbiter_core::ArbiterError;

use super::super::args::AskArgs;
use super::{load_config, report};
use crate::exit_codes::SUCCESS;

pub async fn run(config: Option<PathBuf>, args: AskArgs) -> anyhow::Result<i32> {
    let cfg = match load_config(config.as_deref()) {
        Ok(cfg) => cfg,
        Err(code) => return Ok(code),
    };
    let Some(entry) = cfg.models.iter().find(|m| m.id == args.model) else {
        return Ok(report(&ArbiterError::not_found("model", args.model)));
    };

    // Only the chosen model's credential is required.
    let registry = match ModelRegistry::from_entries(std::slice::from_ref(entry), cfg.timeout_secs)
    {
        Ok(r) => r,
        Err(e) => return Ok(report(&e)),
    };
    let gateway = Gateway::new(Arc::new(registry));

    let prompt = match args.system {
        Some(system) => Prompt::Chat(ChatPrompt {
            system,
            human: args.prompt,
        }),
        None => Prompt::Text(args.prompt),
    };
    match gateway.invoke(entry.id, &prompt).await {
        Ok(text) => {
            println!("{text}");
            Ok(SUCCESS)
        }
        Err(e) => Ok(report(&e)),
    }
}
