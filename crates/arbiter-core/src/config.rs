//! Workspace configuration (`arbiter.yaml`) with environment overrides.
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `ARBITER_CONFIG` | Config file path (default: `arbiter.yaml` when present) |
//! | `ARBITER_BIND` | HTTP bind address (default: `0.0.0.0:8000`) |
//! | `ARBITER_DOCUMENTS` | Documents fixture (default: `data/documents.json`) |
//! | `ARBITER_QUESTIONS` | Question sets fixture (default: `data/questions.json`) |
//! | `ARBITER_TIMEOUT` | Model request timeout in seconds (default: 60) |
//!
//! Credentials are read only from the environment, never from the file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{ArbiterError, ArbiterResult};
use crate::model::{ModelDescriptor, Role};
use crate::prompt::Criteria;

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_CONFIG_FILE: &str = "arbiter.yaml";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Together,
    Fake,
}

impl ProviderKind {
    /// Environment variable holding the provider's key.
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("OPENAI_API_KEY"),
            ProviderKind::Anthropic => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Together => Some("TOGETHER_API_KEY"),
            ProviderKind::Fake => None,
        }
    }
}

/// One registry entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelEntry {
    pub id: u32,
    pub provider: ProviderKind,
    pub model: String,
    pub display_name: String,
    pub role: Role,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl ModelEntry {
    fn new(
        id: u32,
        provider: ProviderKind,
        model: &str,
        display_name: &str,
        role: Role,
        max_tokens: Option<u32>,
    ) -> Self {
        Self {
            id,
            provider,
            model: model.to_string(),
            display_name: display_name.to_string(),
            role,
            temperature: 0.0,
            max_tokens,
            api_key_env: None,
            base_url: None,
        }
    }

    pub fn descriptor(&self) -> ModelDescriptor {
        ModelDescriptor {
            model_id: self.id,
            model_name: self.model.clone(),
            model_display_name: self.display_name.clone(),
            is_judge: self.role == Role::Judge,
        }
    }

    pub fn api_key_env(&self) -> Option<&str> {
        self.api_key_env
            .as_deref()
            .or_else(|| self.provider.default_api_key_env())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    #[serde(default = "default_documents")]
    pub documents: PathBuf,
    #[serde(default = "default_questions")]
    pub questions: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            documents: default_documents(),
            questions: default_questions(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArbiterConfig {
    pub version: u32,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub criteria: Option<Criteria>,
    #[serde(default = "default_models")]
    pub models: Vec<ModelEntry>,
}

fn default_documents() -> PathBuf {
    PathBuf::from("data/documents.json")
}

fn default_questions() -> PathBuf {
    PathBuf::from("data/questions.json")
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_timeout() -> u64 {
    60
}

/// Three respondents, three judges.
pub fn default_models() -> Vec<ModelEntry> {
    use ProviderKind::*;
    use Role::*;
    vec![
        ModelEntry::new(0, OpenAi, "gpt-3.5-turbo", "GPT-3.5 Turbo", Respondent, Some(1000)),
        ModelEntry::new(
            1,
            Anthropic,
            "claude-3-5-sonnet-latest",
            "Claude Sonnet 3.5",
            Respondent,
            Some(1000),
        ),
        ModelEntry::new(
            2,
            Together,
            "meta-llama/Llama-3.3-70B-Instruct-Turbo",
            "Meta Llama 3.3",
            Respondent,
            Some(1000),
        ),
        ModelEntry::new(
            3,
            Together,
            "mistralai/Mistral-7B-Instruct-v0.3",
            "Mistral (7B) Instruct",
            Judge,
            Some(1000),
        ),
        ModelEntry::new(
            4,
            Together,
            "deepseek-ai/DeepSeek-R1-Distill-Qwen-14B",
            "DeepSeek R1 Distill Qwen",
            Judge,
            Some(1000),
        ),
        ModelEntry::new(5, Together, "google/gemma-2-27b-it", "Gemma 2 27B", Judge, None),
    ]
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            data: DataConfig::default(),
            server: ServerConfig::default(),
            timeout_secs: default_timeout(),
            criteria: None,
            models: default_models(),
        }
    }
}

impl ArbiterConfig {
    pub fn load(path: &Path) -> ArbiterResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ArbiterError::startup(format!("failed to read config {}: {}", path.display(), e))
        })?;
        Self::parse(&raw)
    }

    pub fn parse(raw: &str) -> ArbiterResult<Self> {
        let cfg: ArbiterConfig = serde_yaml::from_str(raw)
            .map_err(|e| ArbiterError::startup(format!("failed to parse YAML: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Explicit path, then `ARBITER_CONFIG`, then `arbiter.yaml` if present,
    /// then built-in defaults. Environment overrides apply last.
    pub fn load_or_default(path: Option<&Path>) -> ArbiterResult<Self> {
        let from_env = std::env::var("ARBITER_CONFIG").ok().map(PathBuf::from);
        let chosen = path.map(Path::to_path_buf).or(from_env).or_else(|| {
            let p = PathBuf::from(DEFAULT_CONFIG_FILE);
            p.exists().then_some(p)
        });

        let mut cfg = match chosen {
            Some(p) => {
                debug!(path = %p.display(), "loading config");
                Self::load(&p)?
            }
            None => Self::default(),
        };
        cfg.apply_env();
        Ok(cfg)
    }

    pub fn apply_env(&mut self) {
        if let Ok(bind) = std::env::var("ARBITER_BIND") {
            self.server.bind = bind;
        }
        if let Ok(p) = std::env::var("ARBITER_DOCUMENTS") {
            self.data.documents = PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("ARBITER_QUESTIONS") {
            self.data.questions = PathBuf::from(p);
        }
        if let Some(t) = std::env::var("ARBITER_TIMEOUT")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.timeout_secs = t;
        }
    }

    pub fn validate(&self) -> ArbiterResult<()> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(ArbiterError::startup(format!(
                "unsupported config version {} (supported: {})",
                self.version, SUPPORTED_CONFIG_VERSION
            )));
        }
        if self.models.is_empty() {
            return Err(ArbiterError::startup("config has no models"));
        }
        let mut seen = HashSet::new();
        for m in &self.models {
            if !seen.insert(m.id) {
                return Err(ArbiterError::startup(format!("duplicate model id {}", m.id)));
            }
        }
        Ok(())
    }

    pub fn criteria(&self) -> Criteria {
        self.criteria.clone().unwrap_or_else(Criteria::standard)
    }
}
