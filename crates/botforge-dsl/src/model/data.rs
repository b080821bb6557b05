use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

/// A training data file from the data directory.
/// Any file may carry NLU examples, stories, rules, or any mix of the three.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFile {
    /// Data format version (e.g., "2.0")
    #[serde(default)]
    pub version: Option<String>,

    /// NLU training entries
    #[serde(default)]
    pub nlu: Vec<NluEntry>,

    /// Story definitions
    #[serde(default)]
    pub stories: Vec<StoryDecl>,

    /// Rule definitions
    #[serde(default)]
    pub rules: Vec<RuleDecl>,
}

impl DataFile {
    /// Append another file's entries, preserving order
    pub fn merge(&mut self, other: DataFile) {
        self.nlu.extend(other.nlu);
        self.stories.extend(other.stories);
        self.rules.extend(other.rules);
    }
}

/// A single NLU training entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NluEntry {
    /// Labeled examples for one intent
    Intent {
        /// The intent the examples are labeled with
        intent: String,

        /// The labeled example texts
        #[serde(default)]
        examples: Option<ExamplesDecl>,
    },

    /// An entity synonym definition
    Synonym {
        /// The canonical value
        synonym: String,

        /// The synonym texts
        #[serde(default)]
        examples: Option<ExamplesDecl>,
    },

    /// A regex feature definition
    Regex {
        /// The regex feature name
        regex: String,

        /// The regex patterns
        #[serde(default)]
        examples: Option<ExamplesDecl>,
    },

    /// A lookup table definition
    Lookup {
        /// The lookup table name
        lookup: String,

        /// The lookup values
        #[serde(default)]
        examples: Option<ExamplesDecl>,
    },
}

impl NluEntry {
    /// The intent name, or None for synonym/regex/lookup entries
    pub fn intent(&self) -> Option<&str> {
        match self {
            NluEntry::Intent { intent, .. } => Some(intent.as_str()),
            _ => None,
        }
    }

    /// The normalized example texts for an intent entry
    pub fn example_texts(&self) -> Vec<String> {
        match self {
            NluEntry::Intent { examples, .. } => examples
                .as_ref()
                .map(ExamplesDecl::texts)
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

/// NLU examples, written either as a literal block of `- ` prefixed lines
/// or as a plain YAML list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExamplesDecl {
    /// A literal block scalar, one example per `- ` prefixed line
    Block(String),

    /// A plain list of example texts
    List(Vec<String>),
}

impl ExamplesDecl {
    /// The example texts with list markers and surrounding whitespace removed
    pub fn texts(&self) -> Vec<String> {
        match self {
            ExamplesDecl::Block(block) => block
                .lines()
                .map(|line| line.trim())
                .map(|line| line.strip_prefix("- ").unwrap_or(line).trim())
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            ExamplesDecl::List(items) => items
                .iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect(),
        }
    }
}

/// A story definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDecl {
    /// The story name
    pub story: String,

    /// The story steps, in conversation order
    #[serde(default)]
    pub steps: Vec<StoryStepDecl>,
}

/// A rule definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleDecl {
    /// The rule name
    pub rule: String,

    /// The rule steps, in conversation order
    #[serde(default)]
    pub steps: Vec<StoryStepDecl>,
}

/// One step of a story or rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoryStepDecl {
    /// A user intent step
    Intent {
        /// The intent name
        intent: String,
    },

    /// A bot action or utterance step
    Action {
        /// The action name
        action: String,
    },

    /// A form activation or deactivation step
    ActiveLoop {
        /// The active form name, or null to deactivate
        active_loop: serde_yaml::Value,
    },

    /// A slot assignment step
    SlotWasSet {
        /// The assigned slots
        slot_was_set: serde_yaml::Value,
    },

    /// A checkpoint step
    Checkpoint {
        /// The checkpoint name
        checkpoint: String,
    },

    /// Any step shape this crate does not interpret
    Other(Mapping),
}

impl StoryStepDecl {
    /// The intent name when this is an intent step
    pub fn intent_name(&self) -> Option<&str> {
        match self {
            StoryStepDecl::Intent { intent } => Some(intent.as_str()),
            _ => None,
        }
    }

    /// The action name when this is an action step
    pub fn action_name(&self) -> Option<&str> {
        match self {
            StoryStepDecl::Action { action } => Some(action.as_str()),
            _ => None,
        }
    }

    /// The name an adjacent step is predicted by, for conflict reporting
    pub fn step_name(&self) -> Option<&str> {
        self.intent_name().or_else(|| self.action_name())
    }
}
