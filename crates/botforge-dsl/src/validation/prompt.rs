use std::collections::HashSet;

use serde_json::Value;

use crate::validation::actions::DICT_EXPECTED;
use crate::validation::shape::{field_missing, is_missing, name_or_empty, string_field};

const PROMPT_REQUIRED_FIELDS: [&str; 2] = ["name", "llm_prompts"];
const PROMPT_TYPES: [&str; 3] = ["system", "user", "query"];
const PROMPT_SOURCES: [&str; 5] = ["static", "slot", "action", "history", "bot_content"];

const STOP_SHAPE: &str =
    "Stop must be None, a string, an integer, or an array of 4 or fewer strings or integers.";

/// Validates prompt action records: response bounds, model
/// hyperparameters and the prompt list with its cardinality rules.
pub fn validate_prompt_actions(records: &[Value]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        if !record.is_object() {
            issues.push(DICT_EXPECTED.to_string());
            continue;
        }
        if PROMPT_REQUIRED_FIELDS
            .iter()
            .any(|field| field_missing(record, field))
        {
            issues.push(format!(
                "Required fields {:?} not found in action: {}",
                PROMPT_REQUIRED_FIELDS,
                name_or_empty(record, "name")
            ));
            continue;
        }
        let name = name_or_empty(record, "name");
        if !seen.insert(name.clone()) {
            issues.push(format!("Duplicate action found: {}", name));
        }
        validate_response_bounds(record, &name, &mut issues);
        if let Some(hyperparameters) = provided(record.get("hyperparameters")) {
            validate_hyperparameters(hyperparameters, &mut issues);
        }
        if let Some(prompts) = record.get("llm_prompts").and_then(Value::as_array) {
            validate_llm_prompts(prompts, &mut issues);
        }
    }
    issues
}

fn validate_response_bounds(record: &Value, name: &str, issues: &mut Vec<String>) {
    if let Some(top_results) = provided(record.get("top_results")) {
        if !integer_at_most(top_results, 30) {
            issues.push(format!(
                "top_results should not be greater than 30 and of type int: {}",
                name
            ));
        }
    }
    if let Some(threshold) = provided(record.get("similarity_threshold")) {
        if !number_in_range(threshold, 0.3, 1.0) {
            issues.push(format!(
                "similarity_threshold should be within 0.3 and 1 and of type int or float: {}",
                name
            ));
        }
    }
    if let Some(responses) = provided(record.get("num_bot_responses")) {
        if !integer_at_most(responses, 5) {
            issues.push(format!(
                "num_bot_responses should not be greater than 5 and of type int: {}",
                name
            ));
        }
    }
}

fn validate_hyperparameters(hyperparameters: &Value, issues: &mut Vec<String>) {
    if let Some(temperature) = provided(hyperparameters.get("temperature")) {
        if !number_in_range(temperature, 0.0, 2.0) {
            issues.push("Temperature must be between 0.0 and 2.0!".to_string());
        }
    }
    if let Some(max_tokens) = provided(hyperparameters.get("max_tokens")) {
        if !integer_in_range(max_tokens, 5, 4096) {
            issues.push("max_tokens must be between 5 and 4096!".to_string());
        }
    }
    if let Some(top_p) = provided(hyperparameters.get("top_p")) {
        if !number_in_range(top_p, 0.0, 1.0) {
            issues.push("top_p must be between 0.0 and 1.0!".to_string());
        }
    }
    if let Some(n) = provided(hyperparameters.get("n")) {
        if !integer_in_range(n, 1, 5) {
            issues.push("n must be between 1 and 5!".to_string());
        }
    }
    if let Some(stop) = provided(hyperparameters.get("stop")) {
        if !stop_shape_valid(stop) {
            issues.push(STOP_SHAPE.to_string());
        }
    }
    if let Some(penalty) = provided(hyperparameters.get("presence_penalty")) {
        if !number_in_range(penalty, -2.0, 2.0) {
            issues.push("presence_penalty must be between -2.0 and 2.0!".to_string());
        }
    }
    if let Some(penalty) = provided(hyperparameters.get("frequency_penalty")) {
        if !number_in_range(penalty, -2.0, 2.0) {
            issues.push("frequency_penalty must be between -2.0 and 2.0!".to_string());
        }
    }
    if let Some(logit_bias) = provided(hyperparameters.get("logit_bias")) {
        if !logit_bias.is_object() {
            issues.push("logit_bias must be a dictionary!".to_string());
        }
    }
}

fn validate_llm_prompts(prompts: &[Value], issues: &mut Vec<String>) {
    let mut system_prompts = 0usize;
    let mut bot_content_sources = 0usize;
    let mut history_sources = 0usize;

    for prompt in prompts {
        let prompt_type = string_field(prompt, "type");
        let source = string_field(prompt, "source");
        if prompt_type == Some("system") {
            system_prompts += 1;
        }
        if source == Some("bot_content") {
            bot_content_sources += 1;
        }
        if source == Some("history") {
            history_sources += 1;
        }

        match prompt.get("type").filter(|value| !value.is_null()) {
            Some(Value::String(declared)) => {
                if !PROMPT_TYPES.contains(&declared.as_str()) {
                    issues.push("Invalid prompt type".to_string());
                }
            }
            _ => issues.push("type in LLM Prompts should be of type string.".to_string()),
        }
        match prompt.get("source").filter(|value| !value.is_null()) {
            Some(Value::String(declared)) => {
                if !PROMPT_SOURCES.contains(&declared.as_str()) {
                    issues.push("Invalid prompt source".to_string());
                }
            }
            _ => issues.push("source in LLM Prompts should be of type string.".to_string()),
        }
        if let Some(instructions) = provided(prompt.get("instructions")) {
            if !instructions.is_string() {
                issues.push("Instructions in LLM Prompts should be of type string.".to_string());
            }
        }
        if prompt_type == Some("system") && source != Some("static") {
            issues.push("System prompt must have static source".to_string());
        }
        if prompt_type == Some("query") && source != Some("static") {
            issues.push("Query prompt must have static source".to_string());
        }
        if string_field(prompt, "name").is_none() {
            issues.push("Name cannot be empty".to_string());
        }
        match prompt.get("data") {
            Some(data) if !data.is_null() && !data.is_string() => {
                issues.push("data field in prompts should of type string.".to_string());
            }
            data => {
                if is_missing(data) {
                    match source {
                        Some("static") => {
                            issues.push("data is required for static prompts".to_string())
                        }
                        Some("action") => {
                            issues.push("Data must contain action name".to_string())
                        }
                        Some("slot") => issues.push("Data must contain slot name".to_string()),
                        _ => {}
                    }
                }
            }
        }
    }

    if system_prompts == 0 {
        issues.push("System prompt is required".to_string());
    }
    if system_prompts > 1 {
        issues.push("Only one system prompt can be present".to_string());
    }
    if bot_content_sources > 1 {
        issues.push("Only one bot_content source can be present".to_string());
    }
    if history_sources > 1 {
        issues.push("Only one history source can be present".to_string());
    }
}

fn provided(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn integer_at_most(value: &Value, max: i64) -> bool {
    value.as_i64().map_or(false, |number| number <= max)
}

fn integer_in_range(value: &Value, min: i64, max: i64) -> bool {
    value
        .as_i64()
        .map_or(false, |number| min <= number && number <= max)
}

fn number_in_range(value: &Value, min: f64, max: f64) -> bool {
    value
        .as_f64()
        .map_or(false, |number| min <= number && number <= max)
}

fn stop_shape_valid(stop: &Value) -> bool {
    match stop {
        Value::String(_) => true,
        Value::Number(number) => number.as_i64().is_some(),
        Value::Array(entries) => {
            entries.len() <= 4
                && entries.iter().all(|entry| match entry {
                    Value::String(_) => true,
                    Value::Number(number) => number.as_i64().is_some(),
                    _ => false,
                })
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn system_prompt() -> Value {
        json!({"name": "System Prompt", "data": "You are a personal assistant.",
            "type": "system", "source": "static", "is_enabled": true})
    }

    fn prompt_record(name: &str) -> Value {
        json!({"name": name, "llm_prompts": [
            system_prompt(),
            {"name": "History Prompt", "type": "user", "source": "history", "is_enabled": true},
        ]})
    }

    #[test]
    fn test_well_formed_prompt_actions_pass() {
        let records = vec![prompt_record("test_add_prompt_action_one")];
        assert_eq!(validate_prompt_actions(&records), Vec::<String>::new());
    }

    #[test]
    fn test_response_bounds_are_checked() {
        let mut record = prompt_record("faq_action");
        record["top_results"] = json!(40);
        record["similarity_threshold"] = json!(2);
        record["num_bot_responses"] = json!(15);
        assert_eq!(
            validate_prompt_actions(&[record]),
            vec![
                "top_results should not be greater than 30 and of type int: faq_action",
                "similarity_threshold should be within 0.3 and 1 and of type int or float: faq_action",
                "num_bot_responses should not be greater than 5 and of type int: faq_action",
            ]
        );
    }

    #[test]
    fn test_hyperparameters_are_checked_in_order() {
        let mut record = prompt_record("faq_action");
        record["hyperparameters"] = json!({
            "temperature": 3.0, "max_tokens": 5000, "model": "gpt - 3.5 - turbo",
            "top_p": 4, "n": 10, "stream": false, "stop": ["a", "b", "c", "d", "e"],
            "presence_penalty": 5, "frequency_penalty": 5, "logit_bias": [],
        });
        assert_eq!(
            validate_prompt_actions(&[record]),
            vec![
                "Temperature must be between 0.0 and 2.0!",
                "max_tokens must be between 5 and 4096!",
                "top_p must be between 0.0 and 1.0!",
                "n must be between 1 and 5!",
                "Stop must be None, a string, an integer, or an array of 4 or fewer strings or integers.",
                "presence_penalty must be between -2.0 and 2.0!",
                "frequency_penalty must be between -2.0 and 2.0!",
                "logit_bias must be a dictionary!",
            ]
        );
    }

    #[test]
    fn test_stop_shapes() {
        assert!(stop_shape_valid(&json!("\n")));
        assert!(stop_shape_valid(&json!(111)));
        assert!(stop_shape_valid(&json!(["a", "b", 7])));
        assert!(!stop_shape_valid(&json!(["a", "b", "c", "d", "e"])));
        assert!(!stop_shape_valid(&json!({})));
        assert!(!stop_shape_valid(&json!(1.5)));
        assert!(!stop_shape_valid(&json!([1.5])));
    }

    #[test]
    fn test_hyperparameters_accept_boundary_values() {
        let mut record = prompt_record("faq_action");
        record["hyperparameters"] = json!({
            "temperature": 0.0, "max_tokens": 300, "top_p": 0.0, "n": 1,
            "stream": false, "stop": null, "presence_penalty": 0.0,
            "frequency_penalty": 0.0, "logit_bias": {},
        });
        assert_eq!(validate_prompt_actions(&[record]), Vec::<String>::new());
    }

    #[test]
    fn test_missing_llm_prompts_skip_every_other_check() {
        let record = json!({"name": "prompt_action_with_no_llm_prompts",
            "top_results": 10, "similarity_threshold": 0.70, "num_bot_responses": 5,
            "hyperparameters": {"temperature": 3.0}});
        assert_eq!(
            validate_prompt_actions(&[record]),
            vec![format!(
                "Required fields {:?} not found in action: prompt_action_with_no_llm_prompts",
                PROMPT_REQUIRED_FIELDS
            )]
        );
    }

    #[test]
    fn test_duplicate_prompt_actions_are_reported() {
        let records = vec![
            prompt_record("test_add_prompt_action_one"),
            prompt_record("test_add_prompt_action_one"),
        ];
        assert_eq!(
            validate_prompt_actions(&records),
            vec!["Duplicate action found: test_add_prompt_action_one"]
        );
    }

    #[test]
    fn test_prompt_type_and_source_field_types() {
        let record = json!({"name": "faq_action", "llm_prompts": [
            system_prompt(),
            {"name": "Similarity Prompt", "instructions": 50, "type": 1, "source": 2,
             "is_enabled": true},
        ]});
        assert_eq!(
            validate_prompt_actions(&[record]),
            vec![
                "type in LLM Prompts should be of type string.",
                "source in LLM Prompts should be of type string.",
                "Instructions in LLM Prompts should be of type string.",
            ]
        );
    }

    #[test]
    fn test_unknown_prompt_type_and_source_values() {
        let record = json!({"name": "faq_action", "llm_prompts": [
            system_prompt(),
            {"name": "Test Prompt", "type": "test", "source": "test", "is_enabled": true},
        ]});
        assert_eq!(
            validate_prompt_actions(&[record]),
            vec!["Invalid prompt type", "Invalid prompt source"]
        );
    }

    #[test]
    fn test_system_and_query_prompts_need_static_sources() {
        let record = json!({"name": "faq_action", "llm_prompts": [
            {"name": "System Prompt", "data": "You are a personal assistant.",
             "type": "system", "source": "history", "is_enabled": true},
            {"name": "Query Prompt", "data": "prior context", "instructions": "Rephrase",
             "type": "query", "source": "history", "is_enabled": true},
        ]});
        assert_eq!(
            validate_prompt_actions(&[record]),
            vec![
                "System prompt must have static source",
                "Query prompt must have static source",
            ]
        );
    }

    #[test]
    fn test_data_requirements_follow_the_source() {
        let record = json!({"name": "faq_action", "llm_prompts": [
            system_prompt(),
            {"name": "Static Prompt", "data": "", "type": "user", "source": "static",
             "is_enabled": true},
            {"name": "Http action Prompt", "data": "", "type": "user", "source": "action",
             "is_enabled": true},
            {"name": "Identification Prompt", "data": "", "type": "user", "source": "slot",
             "is_enabled": true},
            {"name": "Numeric Prompt", "data": 100, "type": "user", "source": "static",
             "is_enabled": true},
        ]});
        assert_eq!(
            validate_prompt_actions(&[record]),
            vec![
                "data is required for static prompts",
                "Data must contain action name",
                "Data must contain slot name",
                "data field in prompts should of type string.",
            ]
        );
    }

    #[test]
    fn test_cardinality_rules_reported_once_each() {
        let record = json!({"name": "faq_action", "llm_prompts": [
            system_prompt(),
            {"name": "System Prompt two", "data": "You are a personal assistant.",
             "type": "system", "source": "static", "is_enabled": true},
            {"name": "History Prompt one", "type": "user", "source": "history",
             "is_enabled": true},
            {"name": "History Prompt two", "type": "user", "source": "history",
             "is_enabled": true},
        ]});
        assert_eq!(
            validate_prompt_actions(&[record]),
            vec![
                "Only one system prompt can be present",
                "Only one history source can be present",
            ]
        );
    }

    #[test]
    fn test_missing_system_prompt_reported_after_the_prompt_loop() {
        let record = json!({"name": "faq_action", "llm_prompts": [
            {"name": "", "data": "A programming language is a system of notation.",
             "instructions": "Answer according to the context", "type": "query",
             "source": "history", "is_enabled": true},
        ]});
        assert_eq!(
            validate_prompt_actions(&[record]),
            vec![
                "Query prompt must have static source",
                "Name cannot be empty",
                "System prompt is required",
            ]
        );
    }
}
