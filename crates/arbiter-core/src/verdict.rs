//! Best-effort reading of model output. Models are asked for a fixed layout
//! but nothing enforces it, so every function here degrades to "nothing
//! found" instead of failing; callers keep the raw text for display.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

fn best_model_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^\W*best\s+model\W*:?\W*model\s*(\d+)").expect("static regex")
    })
}

fn question_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?im)^\W*question\s*(\d+)\W*$").expect("static regex"))
}

fn score_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?im)^\s*-?\s*model\s*(\d+)\s*:\s*([0-9]+(?:\.[0-9]+)?)\s*,\s*\[([^\]]*)\]\s*,?\s*(.*)$")
            .expect("static regex")
    })
}

/// 1-based label of the judge's pick, if a `Best Model: Model K` line exists.
pub fn parse_best_model(text: &str) -> Option<usize> {
    best_model_re()
        .captures_iter(text)
        .last()
        .and_then(|c| c[1].parse().ok())
}

/// Split a respondent's output into `(question number, answer)` pairs.
pub fn split_answers(text: &str) -> Vec<(usize, String)> {
    let headers: Vec<(usize, usize, usize)> = question_re()
        .captures_iter(text)
        .filter_map(|c| {
            let m = c.get(0)?;
            Some((c[1].parse().ok()?, m.start(), m.end()))
        })
        .collect();

    headers
        .iter()
        .enumerate()
        .map(|(i, (n, _, body_start))| {
            let body_end = headers.get(i + 1).map(|h| h.1).unwrap_or(text.len());
            let body = text[*body_start..body_end].trim();
            let answer = body
                .strip_prefix("Answer:")
                .map(str::trim)
                .unwrap_or(body)
                .to_string();
            (*n, answer)
        })
        .collect()
}

/// One `- Model N: score, [subs], justification` line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreLine {
    pub model: usize,
    pub aggregate: f32,
    pub sub_scores: Vec<f32>,
    pub justification: String,
}

/// Every parseable score line in the judge output, in text order.
pub fn parse_score_lines(text: &str) -> Vec<ScoreLine> {
    score_line_re()
        .captures_iter(text)
        .filter_map(|c| {
            Some(ScoreLine {
                model: c[1].parse().ok()?,
                aggregate: c[2].parse().ok()?,
                sub_scores: c[3]
                    .split(',')
                    .filter_map(|s| s.trim().parse().ok())
                    .collect(),
                justification: c[4].trim().to_string(),
            })
        })
        .collect()
}
