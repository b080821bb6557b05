use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// The bot domain document (`domain.yml`).
/// Declares the intents, responses, actions, slots and forms the bot knows about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Domain {
    /// Domain format version (e.g., "2.0")
    #[serde(default)]
    pub version: Option<String>,

    /// Declared intents, either bare names or name-to-config mappings
    #[serde(default)]
    pub intents: Vec<IntentDecl>,

    /// Declared response templates, keyed by utterance name.
    /// A mapping is used so declaration order is preserved.
    #[serde(default, alias = "templates")]
    pub responses: Mapping,

    /// Declared custom action names
    #[serde(default)]
    pub actions: Vec<String>,

    /// Declared slots, keyed by slot name
    #[serde(default)]
    pub slots: Mapping,

    /// Declared forms, keyed by form name
    #[serde(default)]
    pub forms: Mapping,

    /// Declared entities
    #[serde(default)]
    pub entities: Vec<String>,
}

/// A single intent declaration.
/// Domain files allow both `- greet` and `- greet: {use_entities: true}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IntentDecl {
    /// A bare intent name
    Name(String),

    /// An intent name mapped to its configuration
    WithConfig(Mapping),
}

impl IntentDecl {
    /// The declared intent name, or None for a malformed mapping entry
    pub fn name(&self) -> Option<&str> {
        match self {
            IntentDecl::Name(name) => Some(name.as_str()),
            IntentDecl::WithConfig(config) => config
                .iter()
                .next()
                .and_then(|(key, _)| key.as_str()),
        }
    }
}

impl Domain {
    /// Declared intent names in declaration order, skipping malformed entries
    pub fn intent_names(&self) -> Vec<&str> {
        self.intents.iter().filter_map(|decl| decl.name()).collect()
    }

    /// Declared response names in declaration order
    pub fn response_names(&self) -> Vec<&str> {
        self.responses.iter().filter_map(|(key, _)| key.as_str()).collect()
    }

    /// True when every declarative section of the domain is empty
    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
            && self.responses.is_empty()
            && self.actions.is_empty()
            && self.slots.is_empty()
            && self.forms.is_empty()
            && self.entities.is_empty()
    }
}
