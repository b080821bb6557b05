use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::error::TrainingDataError;
use crate::model::TrainingDataBundle;

mod actions;
mod config;
mod multiflow;
mod prompt;
mod shape;
mod story;

pub use actions::{
    validate_custom_actions, validate_email_actions, validate_form_validation_actions,
    validate_google_search_actions, validate_http_actions, validate_jira_actions,
    validate_pipedrive_leads_actions, validate_slot_set_actions, validate_zendesk_actions,
    ActionCategory,
};
pub use config::validate_pipeline_config;
pub use multiflow::{
    collect_multiflow_usage, validate_multiflow_stories, MultiflowUsage, MULTIFLOW_CATEGORY,
    MULTIFLOW_KEY,
};
pub use prompt::validate_prompt_actions;
pub use story::{
    validate_intents, validate_stories, validate_story_request, validate_training_examples,
    validate_utterances, FlowType, StoryStepKind, StorySubmissionStep,
};

/// The reporting categories of the training data summary, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IssueCategory {
    Intents,
    TrainingExamples,
    Stories,
    Utterances,
    Domain,
    Config,
    MultiflowStories,
}

impl IssueCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCategory::Intents => "intents",
            IssueCategory::TrainingExamples => "training_examples",
            IssueCategory::Stories => "stories",
            IssueCategory::Utterances => "utterances",
            IssueCategory::Domain => "domain",
            IssueCategory::Config => "config",
            IssueCategory::MultiflowStories => MULTIFLOW_CATEGORY,
        }
    }
}

impl fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issues found during validation, keyed by category. A category is
/// present only when it has at least one issue.
#[derive(Debug, Clone, Default)]
pub struct ValidationSummary {
    categories: BTreeMap<IssueCategory, Vec<String>>,
}

impl ValidationSummary {
    /// Files a batch of issues under a category. Empty batches are
    /// dropped so clean categories never appear in the summary.
    pub fn record(&mut self, category: IssueCategory, issues: Vec<String>) {
        if !issues.is_empty() {
            self.categories.entry(category).or_default().extend(issues);
        }
    }

    /// The issues filed under a category, empty when the category is clean.
    pub fn issues(&self, category: IssueCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, category: IssueCategory) -> bool {
        self.categories.contains_key(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (IssueCategory, &[String])> {
        self.categories
            .iter()
            .map(|(category, issues)| (*category, issues.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// True when any category carries an issue.
    pub fn is_invalid(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// The outcome of a full training data validation run.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Issues per category, absent categories are clean
    pub summary: ValidationSummary,

    /// Declared component counts per category, malformed records included
    pub component_count: BTreeMap<String, usize>,
}

/// Runs every consistency check over a loaded training data bundle.
///
/// The multiflow document feeds two places: its own graph checks, and
/// the intent and utterance usage sets the cross-reference checks
/// consult. A multiflow document that failed to load is an error in
/// both modes, not a summary entry.
///
/// With `raise_exception` set, a non-empty summary becomes
/// [`TrainingDataError::ValidationFailed`] after the whole summary has
/// been built and logged.
pub fn validate_training_data(
    bundle: &TrainingDataBundle,
    raise_exception: bool,
) -> Result<ValidationReport, TrainingDataError> {
    if bundle.multiflow.load_failed() {
        return Err(TrainingDataError::InvalidMultiflowDocument);
    }

    let mut summary = ValidationSummary::default();
    let mut component_count = BTreeMap::new();

    let (multiflow_issues, multiflow_count, usage) = match bundle.multiflow.value() {
        Some(document) => {
            let (issues, count) = multiflow::validate_multiflow_stories(document);
            (issues, count, multiflow::collect_multiflow_usage(document))
        }
        None => {
            let mut count = BTreeMap::new();
            count.insert(MULTIFLOW_CATEGORY.to_string(), 0);
            (Vec::new(), count, MultiflowUsage::default())
        }
    };
    component_count.extend(multiflow_count);

    summary.record(
        IssueCategory::Intents,
        story::validate_intents(&bundle.domain, &bundle.data, &usage),
    );
    summary.record(
        IssueCategory::TrainingExamples,
        story::validate_training_examples(&bundle.data),
    );
    summary.record(
        IssueCategory::Stories,
        story::validate_stories(&bundle.domain, &bundle.data),
    );
    summary.record(
        IssueCategory::Utterances,
        story::validate_utterances(&bundle.domain, &bundle.data, &usage),
    );
    if bundle.domain.is_empty() {
        summary.record(IssueCategory::Domain, vec!["domain.yml is empty!".to_string()]);
    }
    summary.record(
        IssueCategory::Config,
        config::validate_pipeline_config(&bundle.config),
    );
    summary.record(IssueCategory::MultiflowStories, multiflow_issues);

    for (category, issues) in summary.iter() {
        debug!("{} validation found {} issue(s)", category, issues.len());
    }

    if raise_exception && summary.is_invalid() {
        return Err(TrainingDataError::ValidationFailed);
    }

    Ok(ValidationReport {
        summary,
        component_count,
    })
}
