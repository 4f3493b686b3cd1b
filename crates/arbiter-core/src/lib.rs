//! Core of the arbiter workspace: document store, model registry, prompt
//! builder, invocation gateway and response aggregation for document Q&A
//! evaluated by an LLM judge.
//!
//! A typical flow:
//!
//! ```no_run
//! use arbiter_core::config::ArbiterConfig;
//! use arbiter_core::context::AppContext;
//! use arbiter_core::prompt::Criteria;
//! use arbiter_core::aggregator::ResponseAggregator;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let cfg = ArbiterConfig::load_or_default(None)?;
//! let ctx = AppContext::from_config(&cfg)?;
//! let text = ctx.store.document_text(0)?;
//! let questions = ctx.store.question_set(0)?.questions;
//! let respondents = ctx.registry.respondent_ids();
//! let aggregator = ResponseAggregator::new();
//!
//! arbiter_core::pipeline::answer_all(&ctx.gateway, &respondents, &text, &questions, &aggregator).await;
//! let judge = ctx.registry.judge_ids()[0];
//! let verdict = arbiter_core::pipeline::judge(
//!     &ctx.gateway, judge, &respondents, &text, &questions, &Criteria::standard(), &aggregator,
//! )
//! .await?;
//! println!("{}", verdict.text);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod config;
pub mod context;
pub mod errors;
pub mod extract;
pub mod gateway;
pub mod model;
pub mod pipeline;
pub mod prompt;
pub mod providers;
pub mod registry;
pub mod store;
pub mod verdict;

pub use errors::{ArbiterError, ArbiterResult};
