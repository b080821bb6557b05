mod config;
mod data;
mod domain;

pub use config::{ComponentDecl, PipelineConfig};
pub use data::{DataFile, ExamplesDecl, NluEntry, RuleDecl, StoryDecl, StoryStepDecl};
pub use domain::{Domain, IntentDecl};

/// The complete set of training documents for one validation run.
/// This is the top-level structure the consistency checks operate on.
#[derive(Debug, Clone, Default)]
pub struct TrainingDataBundle {
    /// The parsed domain document
    pub domain: Domain,

    /// The parsed model configuration
    pub config: PipelineConfig,

    /// All NLU entries, stories and rules merged across the data directory
    pub data: DataFile,

    /// The multiflow stories document, when one was provided
    pub multiflow: MultiflowDocument,
}

/// Load state of the optional multiflow stories document
#[derive(Debug, Clone, Default)]
pub enum MultiflowDocument {
    /// No multiflow document was provided
    #[default]
    Absent,

    /// The document parsed as a top-level mapping
    Loaded(serde_json::Value),

    /// The document existed but did not have the expected shape.
    /// The cause is logged at load time and the failure is surfaced
    /// as an error when validation runs.
    Failed,
}

impl MultiflowDocument {
    /// The loaded document value, when one parsed successfully
    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            MultiflowDocument::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// True when a document existed but could not be loaded
    pub fn load_failed(&self) -> bool {
        matches!(self, MultiflowDocument::Failed)
    }
}
