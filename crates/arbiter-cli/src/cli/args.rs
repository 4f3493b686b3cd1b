use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use arbiter_core::model::Role;

#[derive(Parser)]
#[command(
    name = "arbiter",
    version,
    about = "Document Q&A with LLM respondents scored by an LLM judge"
)]
pub struct Cli {
    /// Config file (defaults to $ARBITER_CONFIG, then ./arbiter.yaml, then built-ins)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP API
    Serve(ServeArgs),
    /// List registered models
    Models(ModelsArgs),
    /// List fixture documents
    Documents(DocumentsArgs),
    /// Send one prompt to one model
    Ask(AskArgs),
    /// Ask every respondent about a document, then have a judge score them
    Evaluate(EvaluateArgs),
    Version,
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Listen address, overrides config and ARBITER_BIND
    #[arg(long)]
    pub bind: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Respondent,
    Judge,
}

impl From<RoleArg> for Role {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::Respondent => Role::Respondent,
            RoleArg::Judge => Role::Judge,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ModelsArgs {
    #[arg(long, value_enum)]
    pub role: Option<RoleArg>,

    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct DocumentsArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct AskArgs {
    /// Model id from `arbiter models`
    #[arg(long)]
    pub model: u32,

    /// Optional system text; turns the prompt into a chat prompt
    #[arg(long)]
    pub system: Option<String>,

    pub prompt: String,
}

#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// Fixture document id
    #[arg(long, conflicts_with = "file", required_unless_present = "file")]
    pub doc: Option<u32>,

    /// Local .pdf or text file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Question to ask (repeatable); defaults to the document's question set
    #[arg(long = "question", short = 'q')]
    pub questions: Vec<String>,

    /// Judge model id; defaults to the first judge
    #[arg(long)]
    pub judge: Option<u32>,

    #[arg(long)]
    pub json: bool,
}
