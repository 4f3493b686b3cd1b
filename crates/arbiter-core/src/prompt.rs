//! Prompt construction for respondents and the judge.
//!
//! Builders are pure: they never fail on empty input and never validate what
//! a model later produces. Respondent outputs are labeled `Model 1..N` in the
//! order the caller passes them, which is registry order.

use serde::{Deserialize, Serialize};

use crate::errors::{ArbiterError, ArbiterResult};

/// A two-part chat prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPrompt {
    pub system: String,
    pub human: String,
}

impl ChatPrompt {
    /// Flatten into a single text for clients that only take plain prompts.
    pub fn render(&self) -> String {
        format!("System: {}\nHuman: {}", self.system, self.human)
    }
}

/// What the gateway accepts: a bare text or a structured chat prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    Text(String),
    Chat(ChatPrompt),
}

impl Prompt {
    pub fn render(&self) -> String {
        match self {
            Prompt::Text(t) => t.clone(),
            Prompt::Chat(c) => c.render(),
        }
    }

    /// Byte length of the prompt text, without rendering it.
    pub fn text_len(&self) -> usize {
        match self {
            Prompt::Text(t) => t.len(),
            Prompt::Chat(c) => c.system.len() + c.human.len(),
        }
    }
}

impl From<ChatPrompt> for Prompt {
    fn from(p: ChatPrompt) -> Self {
        Prompt::Chat(p)
    }
}

impl From<String> for Prompt {
    fn from(s: String) -> Self {
        Prompt::Text(s)
    }
}

impl From<&str> for Prompt {
    fn from(s: &str) -> Self {
        Prompt::Text(s.to_string())
    }
}

/// One rubric dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub definition: String,
}

impl Criterion {
    pub fn new(name: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: definition.into(),
        }
    }
}

/// Ordered, non-empty rubric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Criteria(Vec<Criterion>);

impl Criteria {
    pub fn new(criteria: Vec<Criterion>) -> ArbiterResult<Self> {
        if criteria.is_empty() {
            return Err(ArbiterError::invalid_input("criteria must not be empty"));
        }
        Ok(Self(criteria))
    }

    /// Completeness, Relevance, Clarity, Accuracy.
    pub fn standard() -> Self {
        Self(vec![
            Criterion::new("Completeness", "Does the response answer all questions?"),
            Criterion::new("Relevance", "Are the answers relevant to the questions?"),
            Criterion::new("Clarity", "Are the answers clear and easy to understand?"),
            Criterion::new(
                "Accuracy",
                "Are the answers factually correct based on the document?",
            ),
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Criterion> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Name: definition` per line, in rubric order.
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|c| format!("{}: {}", c.name, c.definition))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'de> Deserialize<'de> for Criteria {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let items = Vec::<Criterion>::deserialize(deserializer)?;
        Criteria::new(items).map_err(serde::de::Error::custom)
    }
}

/// `1. first\n2. second`; empty input yields an empty string.
pub fn enumerate_questions(questions: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {}", i + 1, q))
        .collect::<Vec<_>>()
        .join("\n")
}

const RESPONDENT_SYSTEM: &str = "\
You are an intelligent assistant that carefully reads documents and answers questions about them.
Only provide answers that are directly supported by the content of the document. Do not guess, speculate, or hallucinate.

You must follow this strict format for each question:

Question [number]
Answer: [Insert answer text]

Important:
- If a question cannot be answered based on the document, still include it with:
Answer: [No answer]
- Do NOT restate the question.
- Do NOT include any extra commentary, headers, or closing remarks.

Example (follow line breaks, spacing, and punctuation exactly):

Question 1
Answer: The document discusses the impact of climate change on coastal cities.

Question 2
Answer: [No answer]

Repeat this structure for all questions in numerical order, starting at Question 1, with exactly one block per question.";

pub fn build_respondent_prompt(document_text: &str, questions: &[String]) -> ChatPrompt {
    let human = format!(
        "Please read the following document and answer the questions below.\n\
         <Document>\n{}\n</Document>\n\n\
         Questions:\n{}\n",
        document_text,
        enumerate_questions(questions)
    );
    ChatPrompt {
        system: RESPONDENT_SYSTEM.to_string(),
        human,
    }
}

fn model_labels(n: usize) -> String {
    match n {
        0 => "no models".to_string(),
        1 => "Model 1".to_string(),
        2 => "Model 1 and Model 2".to_string(),
        _ => {
            let head = (1..n)
                .map(|i| format!("Model {}", i))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{}, and Model {}", head, n)
        }
    }
}

/// Per-question scoring block: one line per model, in label order.
pub(crate) fn judge_format_block(n: usize) -> String {
    let mut block = String::from("Question [number]");
    for i in 1..=n {
        block.push_str(&format!(
            "\n- Model {}: [Aggregate Score out of 5], [Sub-scores for each criterion], [Brief Explanation]",
            i
        ));
    }
    block
}

fn judge_example_block(n: usize, criteria_len: usize) -> String {
    const SAMPLES: [(&str, u8, &str); 3] = [
        ("4.5", 5, "Clear, complete, and well-supported answers"),
        ("3.2", 3, "Relevant but vague answers with minor omissions"),
        ("2.8", 3, "Lacks detail and omits key points"),
    ];
    let mut block = String::from("Question 1");
    for i in 0..n {
        let (aggregate, sub, why) = SAMPLES[i % SAMPLES.len()];
        let subs = vec![sub.to_string(); criteria_len].join(", ");
        block.push_str(&format!(
            "\n- Model {}: {}, [{}], {}",
            i + 1,
            aggregate,
            subs,
            why
        ));
    }
    block
}

pub fn build_judge_prompt(
    document_text: &str,
    questions: &[String],
    responses: &[String],
    criteria: &Criteria,
) -> ChatPrompt {
    let n = responses.len();
    let system = format!(
        "You are a very strict evaluator that assesses the quality of multiple LLM's responses to document-based questions.\n\
         You will be given:\n\
         - The original document\n\
         - A list of questions\n\
         - The responses from {count} LLMs (labeled {labels}) to each question\n\n\
         Your task is to evaluate the quality of each model's response to each question using the following {crit_count} criteria:\n\
         {criteria}\n\n\
         For every question, follow this exact output format:\n\n\
         {format}\n\n\
         The sub-scores must be written in the order of the criteria ({order}) and enclosed in square brackets.\n\n\
         Example output:\n\n\
         {example}\n\n\
         You must follow this structure exactly.\n\
         Do not skip any questions or models.\n\
         Do not include any commentary outside of this format.\n\
         Do not hallucinate information. Only use what is in the document and responses.\n\n\
         ---\n\n\
         After evaluating all questions, select the best-performing model overall.\n\n\
         Use this exact format:\n\n\
         Best Model: Model [number]\n\
         [One brief sentence explaining your choice]\n\n\
         The chosen model should be the one with the highest and most consistent performance across all questions and criteria.",
        count = n,
        labels = model_labels(n),
        crit_count = criteria.len(),
        criteria = criteria.render(),
        format = judge_format_block(n),
        order = criteria
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        example = judge_example_block(n, criteria.len()),
    );

    let mut human = format!(
        "Please evaluate the following AI-generated responses.\n\n\
         <Document>\n{}\n</Document>\n\n\
         <Questions>\n{}\n</Questions>\n",
        document_text,
        enumerate_questions(questions)
    );
    for (i, text) in responses.iter().enumerate() {
        human.push_str(&format!(
            "\n<Model{idx}Responses>\n{text}\n</Model{idx}Responses>\n",
            idx = i + 1,
            text = text
        ));
    }

    ChatPrompt { system, human }
}
