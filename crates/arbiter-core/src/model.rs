use serde::{Deserialize, Serialize};

/// A document known to the store. `doc_txt` stays empty until first read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub doc_id: u32,
    pub doc_name: String,
    pub doc_type: String,
    /// Backing file; empty for uploaded documents.
    pub doc_path: String,
    #[serde(default)]
    pub doc_txt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionSet {
    pub doc_type: String,
    pub questions: Vec<String>,
}

/// Fixture record for a document, as stored in `documents.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRecord {
    pub doc_name: String,
    pub doc_type: String,
    pub doc_path: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Respondent,
    Judge,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Respondent => "respondent",
            Role::Judge => "judge",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "respondent" => Ok(Role::Respondent),
            "judge" => Ok(Role::Judge),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Public description of a registered model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub model_id: u32,
    pub model_name: String,
    pub model_display_name: String,
    #[serde(default)]
    pub is_judge: bool,
}

impl ModelDescriptor {
    pub fn role(&self) -> Role {
        if self.is_judge {
            Role::Judge
        } else {
            Role::Respondent
        }
    }
}

/// Raw completion returned by a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// The judge's raw output for one evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JudgeVerdict {
    pub judge_id: u32,
    pub text: String,
}
