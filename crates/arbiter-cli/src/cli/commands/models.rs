use std::path::PathBuf;

use arbiter_core::config::ModelEntry;
use arbiter_core::model::{ModelDescriptor, Role};

use super::super::args::ModelsArgs;
use super::load_config;
use crate::exit_codes::SUCCESS;

/// Lists the configured roster. Needs no credentials.
pub fn run(config: Option<PathBuf>, args: ModelsArgs) -> anyhow::Result<i32> {
    let cfg = match load_config(config.as_deref()) {
        Ok(cfg) => cfg,
        Err(code) => return Ok(code),
    };
    let role = args.role.map(Role::from);
    let descriptors: Vec<ModelDescriptor> = cfg
        .models
        .iter()
        .map(ModelEntry::descriptor)
        .filter(|d| match role {
            Some(r) => d.role() == r,
            None => true,
        })
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&descriptors)?);
        return Ok(SUCCESS);
    }
    for d in &descriptors {
        println!(
            "{:>3}  {:<10}  {}  ({})",
            d.model_id,
            d.role().as_str(),
            d.model_display_name,
            d.model_name
        );
    }
    Ok(SUCCESS)
}
