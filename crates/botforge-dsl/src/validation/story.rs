use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{DataFile, Domain};
use crate::validation::multiflow::MultiflowUsage;

/// Cross-reference every intent declaration against its usages.
///
/// Issues are grouped: undeclared-in-NLU first, then untrained, then
/// story usages of unknown intents, then multiflow usages, then intents
/// no story ever uses. Each group follows declaration order and reports
/// an intent once.
pub fn validate_intents(domain: &Domain, data: &DataFile, multiflow: &MultiflowUsage) -> Vec<String> {
    let mut issues = Vec::new();

    let domain_intents = domain.intent_names();
    let domain_set: HashSet<&str> = domain_intents.iter().copied().collect();

    let mut nlu_intents = Vec::new();
    let mut nlu_seen = HashSet::new();
    for entry in &data.nlu {
        if let Some(intent) = entry.intent() {
            if nlu_seen.insert(intent) {
                nlu_intents.push(intent);
            }
        }
    }

    let mut story_intents = Vec::new();
    let mut story_seen = HashSet::new();
    for steps in data
        .stories
        .iter()
        .map(|story| &story.steps)
        .chain(data.rules.iter().map(|rule| &rule.steps))
    {
        for step in steps {
            if let Some(intent) = step.intent_name() {
                if story_seen.insert(intent) {
                    story_intents.push(intent);
                }
            }
        }
    }

    for intent in &domain_intents {
        if !nlu_seen.contains(intent) {
            issues.push(format!(
                "The intent '{}' is listed in the domain file, but is not found in the NLU training data.",
                intent
            ));
        }
    }

    for intent in &nlu_intents {
        if !domain_set.contains(intent) {
            issues.push(format!(
                "There is a message in the training data labeled with intent '{}'. This intent is not listed in your domain.",
                intent
            ));
        }
    }

    for intent in &story_intents {
        if !domain_set.contains(intent) {
            issues.push(format!(
                "The intent '{}' is used in your stories, but it is not listed in the domain file. You should add it to your domain file!",
                intent
            ));
        }
    }

    for intent in &multiflow.intents {
        if !domain_set.contains(intent.as_str()) {
            issues.push(format!(
                "The intent '{}' is used in your multiflow_stories, but it is not listed in the domain file. You should add it to your domain file!",
                intent
            ));
        }
    }

    let multiflow_set: HashSet<&str> = multiflow.intents.iter().map(String::as_str).collect();
    for intent in &domain_intents {
        if !story_seen.contains(intent) && !multiflow_set.contains(intent) {
            issues.push(format!("The intent '{}' is not used in any story.", intent));
        }
    }

    issues
}

/// Find example texts labeled with more than one intent.
///
/// One issue per text, in first-seen order, listing the conflicting
/// intents sorted.
pub fn validate_training_examples(data: &DataFile) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut labels: HashMap<String, Vec<String>> = HashMap::new();

    for entry in &data.nlu {
        if let Some(intent) = entry.intent() {
            for text in entry.example_texts() {
                let intents = labels.entry(text.clone()).or_insert_with(|| {
                    order.push(text.clone());
                    Vec::new()
                });
                if !intents.iter().any(|known| known == intent) {
                    intents.push(intent.to_string());
                }
            }
        }
    }

    let mut issues = Vec::new();
    for text in &order {
        let mut intents = labels[text].clone();
        if intents.len() > 1 {
            intents.sort();
            issues.push(format!(
                "The example '{}' was found labeled with multiple different intents in the training data. Each annotated message should only appear with one intent. You should fix that conflict The example is labeled with: {}.",
                text,
                intents.join(", ")
            ));
        }
    }

    issues
}

/// Check the story structure: utterance actions must have a template, and
/// the same intent must always predict the same next step.
pub fn validate_stories(domain: &Domain, data: &DataFile) -> Vec<String> {
    let mut issues = Vec::new();
    let responses: HashSet<&str> = domain.response_names().into_iter().collect();

    let mut flagged = HashSet::new();
    for steps in data
        .stories
        .iter()
        .map(|story| &story.steps)
        .chain(data.rules.iter().map(|rule| &rule.steps))
    {
        for step in steps {
            if let Some(action) = step.action_name() {
                if action.starts_with("utter_") && !responses.contains(action) && flagged.insert(action) {
                    issues.push(format!(
                        "The action '{}' is used in the stories, but is not a valid utterance action. Please make sure the action is listed in your domain and there is a template defined with its name.",
                        action
                    ));
                }
            }
        }
    }

    // Collect each intent's successor steps across all stories, in story order
    let mut order: Vec<&str> = Vec::new();
    let mut successors: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
    for story in &data.stories {
        for pair in story.steps.windows(2) {
            if let (Some(intent), Some(next)) = (pair[0].intent_name(), pair[1].step_name()) {
                let entry = successors.entry(intent).or_insert_with(|| {
                    order.push(intent);
                    Vec::new()
                });
                entry.push((next, story.story.as_str()));
            }
        }
    }

    for intent in order {
        // Keep the first story each distinct successor was seen in
        let mut distinct: Vec<(&str, &str)> = Vec::new();
        for &(next, story) in &successors[intent] {
            if !distinct.iter().any(|&(known, _)| known == next) {
                distinct.push((next, story));
            }
        }
        if distinct.len() > 1 {
            let mut message = format!("Story structure conflict after intent '{}':\n", intent);
            for (next, story) in distinct {
                message.push_str(&format!("  {} predicted in '{}'\n", next, story));
            }
            issues.push(message);
        }
    }

    issues
}

/// Find declared responses no story step and no multiflow node uses
pub fn validate_utterances(domain: &Domain, data: &DataFile, multiflow: &MultiflowUsage) -> Vec<String> {
    let mut used: HashSet<&str> = HashSet::new();
    for steps in data
        .stories
        .iter()
        .map(|story| &story.steps)
        .chain(data.rules.iter().map(|rule| &rule.steps))
    {
        for step in steps {
            if let Some(action) = step.action_name() {
                used.insert(action);
            }
        }
    }
    let multiflow_used: HashSet<&str> = multiflow.utterances.iter().map(String::as_str).collect();

    let mut issues = Vec::new();
    for response in domain.response_names() {
        if !used.contains(response) && !multiflow_used.contains(response) {
            issues.push(format!("The utterance '{}' is not used in any story.", response));
        }
    }

    issues
}

/// Type discriminator for story submission steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryStepKind {
    /// A user intent
    Intent,

    /// A bot utterance
    Bot,

    /// An HTTP action call
    HttpAction,

    /// A custom action call
    Action,

    /// A slot event
    Slot,

    /// A form activation
    FormStart,

    /// A form deactivation
    FormEnd,
}

/// The flow kind of a story submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FlowType {
    /// A regular story
    Story,

    /// A rule
    Rule,
}

/// One step of a story submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorySubmissionStep {
    /// The step name; only form-end steps may leave it empty
    #[serde(default)]
    pub name: String,

    /// The step type
    #[serde(rename = "type")]
    pub kind: StoryStepKind,
}

/// Check the shape of a submitted story before it is stored.
///
/// These are request-shape rules, distinct from the consistency checks
/// that run over already-stored training data.
pub fn validate_story_request(name: &str, flow_type: FlowType, steps: &[StorySubmissionStep]) -> Vec<String> {
    let mut issues = Vec::new();

    if steps.is_empty() {
        issues.push("Steps are required to form Flow".to_string());
        return issues;
    }

    if steps[0].kind != StoryStepKind::Intent {
        issues.push("First step should be an intent".to_string());
    }
    if steps[steps.len() - 1].kind == StoryStepKind::Intent {
        issues.push("Intent should be followed by utterance or action".to_string());
    }

    let mut intents = 0;
    for (index, step) in steps.iter().enumerate() {
        if step.kind == StoryStepKind::Intent {
            intents += 1;
            if index + 1 < steps.len() && steps[index + 1].kind == StoryStepKind::Intent {
                issues.push("Found 2 consecutive intents".to_string());
            }
        }
        if step.name.trim().is_empty() && step.kind != StoryStepKind::FormEnd {
            issues.push("Only form_end step type can have empty name".to_string());
        }
    }

    if flow_type == FlowType::Rule && intents > 1 {
        issues.push(format!(
            "Found rules '{}' that contain more than intent.\nPlease use stories for this case",
            name
        ));
    }

    issues
}
