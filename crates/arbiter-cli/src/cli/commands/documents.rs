use std::path::PathBuf;

use arbiter_core::store::DocumentStore;

use super::super::args::DocumentsArgs;
use super::{load_config, report};
use crate::exit_codes::SUCCESS;

pub fn run(config: Option<PathBuf>, args: DocumentsArgs) -> anyhow::Result<i32> {
    let cfg = match load_config(config.as_deref()) {
        Ok(cfg) => cfg,
        Err(code) => return Ok(code),
    };
    let store = match DocumentStore::load(&cfg.data.documents, &cfg.data.questions) {
        Ok(store) => store,
        Err(e) => return Ok(report(&e)),
    };

    let docs = store.documents();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&docs)?);
        return Ok(SUCCESS);
    }
    for d in &docs {
        println!("{:>3}  {:<16}  {}  [{}]", d.doc_id, d.doc_type, d.doc_name, d.doc_path);
    }
    Ok(SUCCESS)
}
