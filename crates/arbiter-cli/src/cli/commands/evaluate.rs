use std::path::PathBuf;
use std::sync::Arc;

use arbiter_core::aggregator::ResponseAggregator;
use arbiter_core::config::ArbiterConfig;
use arbiter_core::extract;
use arbiter_core::gateway::Gateway;
use arbiter_core::model::JudgeVerdict;
use arbiter_core::pipeline::{self, RespondentOutcome};
use arbiter_core::registry::ModelRegistry;
use arbiter_core::store::DocumentStore;
use arbiter_core::verdict::{parse_best_model, split_answers};
use arbiter_core::{ArbiterError, ArbiterResult};
use serde_json::json;

use super::super::args::EvaluateArgs;
use super::{load_config, report};
use crate::exit_codes::SUCCESS;

pub async fn run(config: Option<PathBuf>, args: EvaluateArgs) -> anyhow::Result<i32> {
    let cfg = match load_config(config.as_deref()) {
        Ok(cfg) => cfg,
        Err(code) => return Ok(code),
    };
    match evaluate(&cfg, &args).await {
        Ok(()) => Ok(SUCCESS),
        Err(e) => Ok(report(&e)),
    }
}

/// Document text and questions from either a fixture document or a local file.
fn load_source(cfg: &ArbiterConfig, args: &EvaluateArgs) -> ArbiterResult<(String, Vec<String>)> {
    if let Some(path) = &args.file {
        if args.questions.is_empty() {
            return Err(ArbiterError::invalid_input(
                "--question is required with --file",
            ));
        }
        return Ok((extract::extract_file(path)?, args.questions.clone()));
    }

    let doc_id = args
        .doc
        .ok_or_else(|| ArbiterError::invalid_input("--doc or --file is required"))?;
    let store = DocumentStore::load(&cfg.data.documents, &cfg.data.questions)?;
    let text = store.document_text(doc_id)?;
    let questions = if args.questions.is_empty() {
        store.question_set(doc_id)?.questions
    } else {
        args.questions.clone()
    };
    Ok((text, questions))
}

async fn evaluate(cfg: &ArbiterConfig, args: &EvaluateArgs) -> ArbiterResult<()> {
    let (text, questions) = load_source(cfg, args)?;
    let registry = Arc::new(ModelRegistry::from_config(cfg)?);
    let gateway = Gateway::new(Arc::clone(&registry));

    let judge_id = match args.judge {
        Some(id) => id,
        None => registry
            .judge_ids()
            .first()
            .copied()
            .ok_or_else(|| ArbiterError::invalid_input("no judge model configured"))?,
    };
    let respondents = registry.respondent_ids();
    let aggregator = ResponseAggregator::new();

    let outcomes =
        pipeline::answer_all(&gateway, &respondents, &text, &questions, &aggregator).await;
    if !args.json {
        print_respondents(&registry, &questions, &outcomes);
    }

    let verdict = pipeline::judge(
        &gateway,
        judge_id,
        &respondents,
        &text,
        &questions,
        &cfg.criteria(),
        &aggregator,
    )
    .await;

    if args.json {
        let body = json!({
            "questions": questions,
            "respondents": outcomes,
            "verdict": verdict.as_ref().ok().map(|v| json!({
                "judge_id": v.judge_id,
                "text": v.text,
                "best_model": parse_best_model(&v.text),
            })),
            "error": verdict.as_ref().err().map(ToString::to_string),
        });
        println!("{body:#}");
    }

    let verdict = verdict?;
    if !args.json {
        print_verdict(&registry, &respondents, &verdict);
    }
    Ok(())
}

fn display_name(registry: &ModelRegistry, model_id: u32) -> String {
    registry
        .descriptor(model_id)
        .map(|d| d.model_display_name)
        .unwrap_or_else(|_| format!("model {model_id}"))
}

fn print_respondents(registry: &ModelRegistry, questions: &[String], outcomes: &[RespondentOutcome]) {
    for (i, outcome) in outcomes.iter().enumerate() {
        println!(
            "== Model {}: {} (id {}) ==",
            i + 1,
            display_name(registry, outcome.model_id),
            outcome.model_id
        );
        match (&outcome.output, &outcome.error) {
            (Some(text), _) => {
                let answers = split_answers(text);
                if answers.is_empty() {
                    println!("{text}");
                }
                for (n, answer) in answers {
                    let q = n
                        .checked_sub(1)
                        .and_then(|i| questions.get(i))
                        .map_or("?", String::as_str);
                    println!("Q{n}. {q}\n    {answer}");
                }
            }
            (None, Some(err)) => println!("failed: {err}"),
            (None, None) => println!("no output"),
        }
        println!();
    }
}

fn print_verdict(registry: &ModelRegistry, respondents: &[u32], verdict: &JudgeVerdict) {
    println!("== Judge: {} (id {}) ==", display_name(registry, verdict.judge_id), verdict.judge_id);
    println!("{}", verdict.text);
    if let Some(k) = parse_best_model(&verdict.text) {
        if let Some(&id) = k.checked_sub(1).and_then(|i| respondents.get(i)) {
            println!("\nBest model: Model {k} ({})", display_name(registry, id));
        }
    }
}
