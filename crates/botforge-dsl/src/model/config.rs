use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The model configuration document (`config.yml`).
/// Declares the NLU pipeline and the dialogue policies used for training.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Language the bot is trained for (e.g., "en")
    #[serde(default)]
    pub language: Option<String>,

    /// NLU pipeline components, in application order
    #[serde(default)]
    pub pipeline: Vec<ComponentDecl>,

    /// Dialogue policies
    #[serde(default)]
    pub policies: Vec<ComponentDecl>,
}

/// A single pipeline component or policy declaration.
/// Only the name is interpreted; every other key is component configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDecl {
    /// Component or policy name (e.g., "DIETClassifier")
    pub name: String,

    /// Component-specific configuration (arbitrary key-value pairs)
    #[serde(flatten)]
    pub config: HashMap<String, serde_json::Value>,
}
