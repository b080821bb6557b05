use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::model::PipelineConfig;

lazy_static! {
    /// NLU pipeline components the platform can train with
    static ref KNOWN_COMPONENTS: HashSet<&'static str> = [
        "WhitespaceTokenizer",
        "JiebaTokenizer",
        "MitieTokenizer",
        "SpacyTokenizer",
        "MitieNLP",
        "SpacyNLP",
        "RegexFeaturizer",
        "LexicalSyntacticFeaturizer",
        "CountVectorsFeaturizer",
        "SpacyFeaturizer",
        "MitieFeaturizer",
        "LanguageModelFeaturizer",
        "DIETClassifier",
        "SklearnIntentClassifier",
        "MitieIntentClassifier",
        "KeywordIntentClassifier",
        "FallbackClassifier",
        "CRFEntityExtractor",
        "SpacyEntityExtractor",
        "MitieEntityExtractor",
        "DucklingEntityExtractor",
        "RegexEntityExtractor",
        "EntitySynonymMapper",
        "ResponseSelector",
    ]
    .iter()
    .copied()
    .collect();

    /// Dialogue policies the platform can train with
    static ref KNOWN_POLICIES: HashSet<&'static str> = [
        "MemoizationPolicy",
        "AugmentedMemoizationPolicy",
        "TEDPolicy",
        "RulePolicy",
        "UnexpecTEDIntentPolicy",
    ]
    .iter()
    .copied()
    .collect();
}

/// Check every pipeline component and policy name against the supported set.
///
/// Dotted names refer to user-supplied custom components and are accepted
/// without further checks.
pub fn validate_pipeline_config(config: &PipelineConfig) -> Vec<String> {
    let mut issues = Vec::new();

    for component in &config.pipeline {
        if !is_known_component(&component.name) {
            issues.push(format!("Invalid component {}", component.name));
        }
    }

    for policy in &config.policies {
        if !is_known_policy(&policy.name) {
            issues.push(format!("Invalid policy {}", policy.name));
        }
    }

    issues
}

/// True for supported components and custom component module paths
fn is_known_component(name: &str) -> bool {
    name.contains('.') || KNOWN_COMPONENTS.contains(name)
}

/// True for supported policies and custom policy module paths
fn is_known_policy(name: &str) -> bool {
    name.contains('.') || KNOWN_POLICIES.contains(name)
}
