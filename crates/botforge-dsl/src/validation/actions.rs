use std::collections::{BTreeMap, HashSet};

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::validation::prompt::validate_prompt_actions;
use crate::validation::shape::{field_missing, is_missing, name_or_empty, string_field, value_text};

/// Issue raised whenever a record (or the whole document) is not a mapping
pub const DICT_EXPECTED: &str = "Invalid action configuration format. Dictionary expected.";

const HTTP_REQUIRED_FIELDS: [&str; 4] = ["action_name", "http_url", "request_method", "response"];
const SLOT_SET_REQUIRED_FIELDS: [&str; 2] = ["name", "set_slots"];
const FORM_VALIDATION_REQUIRED_FIELDS: [&str; 2] = ["name", "slot"];
const EMAIL_REQUIRED_FIELDS: [&str; 8] = [
    "action_name",
    "smtp_url",
    "smtp_port",
    "smtp_password",
    "from_email",
    "subject",
    "to_email",
    "response",
];
const JIRA_REQUIRED_FIELDS: [&str; 8] = [
    "name",
    "url",
    "user_name",
    "api_token",
    "project_key",
    "issue_type",
    "summary",
    "response",
];
const ZENDESK_REQUIRED_FIELDS: [&str; 6] = [
    "name",
    "subdomain",
    "user_name",
    "api_token",
    "subject",
    "response",
];
const GOOGLE_SEARCH_REQUIRED_FIELDS: [&str; 3] = ["name", "api_key", "search_engine_id"];
const PIPEDRIVE_REQUIRED_FIELDS: [&str; 6] =
    ["name", "domain", "api_token", "title", "response", "metadata"];

const HTTP_REQUEST_METHODS: [&str; 4] = ["GET", "POST", "PUT", "DELETE"];
const HTTP_PARAMETER_TYPES: [&str; 4] = ["value", "slot", "sender_id", "user_message"];
const SLOT_SET_TYPES: [&str; 2] = ["from_value", "reset_slot"];
const FORM_SLOT_SET_TYPES: [&str; 3] = ["current", "custom", "slot"];

lazy_static! {
    static ref HTTP_URL_REGEX: Regex = Regex::new(r"^https?://").unwrap();
}

/// The kinds of custom actions an action document may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Http,
    SlotSet,
    FormValidation,
    Email,
    GoogleSearch,
    Jira,
    Zendesk,
    PipedriveLeads,
    Prompt,
}

impl ActionCategory {
    pub const ALL: [ActionCategory; 9] = [
        ActionCategory::Http,
        ActionCategory::SlotSet,
        ActionCategory::FormValidation,
        ActionCategory::Email,
        ActionCategory::GoogleSearch,
        ActionCategory::Jira,
        ActionCategory::Zendesk,
        ActionCategory::PipedriveLeads,
        ActionCategory::Prompt,
    ];

    /// Key under which records of this kind appear in the action document.
    pub fn input_key(self) -> &'static str {
        match self {
            ActionCategory::Http => "http_action",
            ActionCategory::SlotSet => "slot_set_action",
            ActionCategory::FormValidation => "form_validation_action",
            ActionCategory::Email => "email_action",
            ActionCategory::GoogleSearch => "google_search_action",
            ActionCategory::Jira => "jira_action",
            ActionCategory::Zendesk => "zendesk_action",
            ActionCategory::PipedriveLeads => "pipedrive_leads_action",
            ActionCategory::Prompt => "prompt_action",
        }
    }

    /// Key under which issues and record counts for this kind are reported.
    pub fn summary_key(self) -> &'static str {
        match self {
            ActionCategory::Http => "http_actions",
            ActionCategory::SlotSet => "slot_set_actions",
            ActionCategory::FormValidation => "form_validation_actions",
            ActionCategory::Email => "email_actions",
            ActionCategory::GoogleSearch => "google_search_actions",
            ActionCategory::Jira => "jira_actions",
            ActionCategory::Zendesk => "zendesk_actions",
            ActionCategory::PipedriveLeads => "pipedrive_leads_actions",
            ActionCategory::Prompt => "prompt_actions",
        }
    }

    fn from_input_key(key: &str) -> Option<ActionCategory> {
        ActionCategory::ALL
            .into_iter()
            .find(|category| category.input_key() == key)
    }
}

/// Validates a whole custom action document.
///
/// Returns whether any issue was found, the issues per reporting category
/// and the number of declared records per category. Every known category
/// appears in both maps even when it is clean or absent from the document;
/// unknown category keys are reported under their own name. Counts include
/// malformed records.
pub fn validate_custom_actions(
    document: &Value,
) -> (bool, BTreeMap<String, Vec<String>>, BTreeMap<String, usize>) {
    let mut issues: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    let document = match document.as_object() {
        Some(map) => map,
        None => {
            issues.insert(
                ActionCategory::Http.summary_key().to_string(),
                vec![DICT_EXPECTED.to_string()],
            );
            return (true, issues, counts);
        }
    };

    for category in ActionCategory::ALL {
        issues.insert(category.summary_key().to_string(), Vec::new());
        counts.insert(category.summary_key().to_string(), 0);
    }

    for (key, declared) in document {
        let category = match ActionCategory::from_input_key(key) {
            Some(category) => category,
            None => {
                issues
                    .entry(key.clone())
                    .or_default()
                    .push(format!("Invalid action type: {}", key));
                continue;
            }
        };
        let summary_key = category.summary_key().to_string();
        match declared.as_array() {
            Some(records) => {
                counts.insert(summary_key.clone(), records.len());
                let found = validate_action_records(category, records);
                issues.entry(summary_key).or_default().extend(found);
            }
            None => {
                issues
                    .entry(summary_key)
                    .or_default()
                    .push(DICT_EXPECTED.to_string());
            }
        }
    }

    let is_invalid = issues.values().any(|list| !list.is_empty());
    (is_invalid, issues, counts)
}

fn validate_action_records(category: ActionCategory, records: &[Value]) -> Vec<String> {
    match category {
        ActionCategory::Http => validate_http_actions(records),
        ActionCategory::SlotSet => validate_slot_set_actions(records),
        ActionCategory::FormValidation => validate_form_validation_actions(records),
        ActionCategory::Email => validate_email_actions(records),
        ActionCategory::GoogleSearch => validate_google_search_actions(records),
        ActionCategory::Jira => validate_jira_actions(records),
        ActionCategory::Zendesk => validate_zendesk_actions(records),
        ActionCategory::PipedriveLeads => validate_pipedrive_leads_actions(records),
        ActionCategory::Prompt => validate_prompt_actions(records),
    }
}

fn required_fields_issue(record: &Value, required: &[&str], name_key: &str) -> Option<String> {
    if required.iter().any(|field| field_missing(record, field)) {
        Some(format!(
            "Required fields {:?} not found in action: {}",
            required,
            name_or_empty(record, name_key)
        ))
    } else {
        None
    }
}

/// Validates HTTP action records: required fields, request method, URL
/// shape, header and parameter declarations, duplicate names.
pub fn validate_http_actions(records: &[Value]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        if !record.is_object() {
            issues.push(DICT_EXPECTED.to_string());
            continue;
        }
        if HTTP_REQUIRED_FIELDS
            .iter()
            .any(|field| field_missing(record, field))
        {
            issues.push(format!(
                "Required http action fields {:?} not found in action: {}",
                HTTP_REQUIRED_FIELDS,
                name_or_empty(record, "action_name")
            ));
            continue;
        }
        let name = name_or_empty(record, "action_name");
        if !seen.insert(name.clone()) {
            issues.push(format!("Duplicate http action found: {}", name));
        }
        match string_field(record, "request_method") {
            Some(method)
                if HTTP_REQUEST_METHODS
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(method)) => {}
            _ => issues.push(format!("Invalid request method: {}", name)),
        }
        match string_field(record, "http_url") {
            Some(url) if HTTP_URL_REGEX.is_match(url) => {}
            _ => issues.push(format!("Invalid http_url: {}", name)),
        }
        if !http_parameters_valid(record, "params_list") {
            issues.push(format!("Invalid params_list for http action: {}", name));
        }
        if !http_parameters_valid(record, "headers") {
            issues.push(format!("Invalid headers for http action: {}", name));
        }
    }
    issues
}

// A slot parameter with a blank value is fine, the slot name defaults to
// the key at dispatch time.
fn http_parameters_valid(record: &Value, key: &str) -> bool {
    match record.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::Array(entries)) => entries.iter().all(http_parameter_valid),
        Some(_) => false,
    }
}

fn http_parameter_valid(entry: &Value) -> bool {
    if string_field(entry, "key").is_none() {
        return false;
    }
    match string_field(entry, "parameter_type") {
        Some(parameter_type) => HTTP_PARAMETER_TYPES.contains(&parameter_type),
        None => false,
    }
}

/// Validates slot set action records and their slot entries.
pub fn validate_slot_set_actions(records: &[Value]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        if !record.is_object() {
            issues.push(DICT_EXPECTED.to_string());
            continue;
        }
        if let Some(issue) = required_fields_issue(record, &SLOT_SET_REQUIRED_FIELDS, "name") {
            issues.push(issue);
            continue;
        }
        let name = name_or_empty(record, "name");
        if !seen.insert(name.clone()) {
            issues.push(format!("Duplicate slot set action found: {}", name));
        }
        if let Some(slots) = record.get("set_slots").and_then(Value::as_array) {
            for slot in slots {
                if string_field(slot, "name").is_none() {
                    issues.push(format!("Slot name cannot be empty: {}", name));
                }
                let slot_type = slot.get("type").map(value_text).unwrap_or_default();
                if !SLOT_SET_TYPES.contains(&slot_type.as_str()) {
                    issues.push(format!("Invalid slot type {}: {}", slot_type, name));
                }
            }
        }
    }
    issues
}

/// Validates form validation action records and their slot_set blocks.
pub fn validate_form_validation_actions(records: &[Value]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        if !record.is_object() {
            issues.push(DICT_EXPECTED.to_string());
            continue;
        }
        if let Some(issue) = required_fields_issue(record, &FORM_VALIDATION_REQUIRED_FIELDS, "name")
        {
            issues.push(issue);
            continue;
        }
        let name = name_or_empty(record, "name");
        if !seen.insert(name.clone()) {
            issues.push(format!("Duplicate form validation action found: {}", name));
        }
        if let Some(slot_set) = record.get("slot_set") {
            let value_missing = is_missing(slot_set.get("value"));
            match string_field(slot_set, "type") {
                None => issues.push(format!("slot_set type is required: {}", name)),
                Some("current") if !value_missing => issues.push(format!(
                    "slot_set with type current should not have a value: {}",
                    name
                )),
                Some("slot") if value_missing => issues.push(format!(
                    "slot_set with type slot requires a slot name as value: {}",
                    name
                )),
                Some("custom") if value_missing => issues.push(format!(
                    "slot_set with type custom requires a value: {}",
                    name
                )),
                Some(slot_set_type) if !FORM_SLOT_SET_TYPES.contains(&slot_set_type) => issues
                    .push(format!(
                        "Invalid slot_set type {}: {}",
                        slot_set_type, name
                    )),
                Some(_) => {}
            }
        }
    }
    issues
}

/// Validates email action records.
pub fn validate_email_actions(records: &[Value]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        if !record.is_object() {
            issues.push(DICT_EXPECTED.to_string());
            continue;
        }
        if let Some(issue) = required_fields_issue(record, &EMAIL_REQUIRED_FIELDS, "action_name") {
            issues.push(issue);
            continue;
        }
        let name = name_or_empty(record, "action_name");
        if !seen.insert(name.clone()) {
            issues.push(format!("Duplicate email action found: {}", name));
        }
    }
    issues
}

/// Validates jira action records. Subtask issues additionally need a
/// parent key.
pub fn validate_jira_actions(records: &[Value]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        if !record.is_object() {
            issues.push(DICT_EXPECTED.to_string());
            continue;
        }
        if let Some(issue) = required_fields_issue(record, &JIRA_REQUIRED_FIELDS, "name") {
            issues.push(issue);
            continue;
        }
        let name = name_or_empty(record, "name");
        if !seen.insert(name.clone()) {
            issues.push(format!("Duplicate jira action found: {}", name));
        }
        if string_field(record, "issue_type") == Some("Subtask")
            && field_missing(record, "parent_key")
        {
            issues.push(format!(
                "parent_key is required for issue_type Subtask: {}",
                name
            ));
        }
    }
    issues
}

/// Validates zendesk action records.
pub fn validate_zendesk_actions(records: &[Value]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        if !record.is_object() {
            issues.push(DICT_EXPECTED.to_string());
            continue;
        }
        if let Some(issue) = required_fields_issue(record, &ZENDESK_REQUIRED_FIELDS, "name") {
            issues.push(issue);
            continue;
        }
        let name = name_or_empty(record, "name");
        if !seen.insert(name.clone()) {
            issues.push(format!("Duplicate zendesk action found: {}", name));
        }
    }
    issues
}

/// Validates google search action records. `num_results` accepts an
/// integer or an integer-parseable string; null and blank strings count
/// as absent.
pub fn validate_google_search_actions(records: &[Value]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        if !record.is_object() {
            issues.push(DICT_EXPECTED.to_string());
            continue;
        }
        if let Some(issue) = required_fields_issue(record, &GOOGLE_SEARCH_REQUIRED_FIELDS, "name")
        {
            issues.push(issue);
            continue;
        }
        let name = name_or_empty(record, "name");
        if !seen.insert(name.clone()) {
            issues.push(format!("Duplicate google search action found: {}", name));
        }
        if !num_results_valid(record.get("num_results")) {
            issues.push(format!("num_results must be a positive integer: {}", name));
        }
    }
    issues
}

fn num_results_valid(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) if text.trim().is_empty() => true,
        Some(Value::String(text)) => text.trim().parse::<i64>().map_or(false, |n| n > 0),
        Some(Value::Number(number)) => number.as_i64().map_or(false, |n| n > 0),
        Some(_) => false,
    }
}

/// Validates pipedrive leads action records. The metadata mapping must
/// name the lead.
pub fn validate_pipedrive_leads_actions(records: &[Value]) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    for record in records {
        if !record.is_object() {
            issues.push(DICT_EXPECTED.to_string());
            continue;
        }
        if let Some(issue) = required_fields_issue(record, &PIPEDRIVE_REQUIRED_FIELDS, "name") {
            issues.push(issue);
            continue;
        }
        let name = name_or_empty(record, "name");
        if !seen.insert(name.clone()) {
            issues.push(format!("Duplicate pipedrive leads action found: {}", name));
        }
        match record.get("metadata") {
            Some(metadata) if !field_missing(metadata, "name") => {}
            _ => issues.push(format!("metadata must contain a name key: {}", name)),
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn http_record(name: &str) -> Value {
        json!({
            "action_name": name,
            "http_url": "http://www.alphabet.com",
            "request_method": "GET",
            "response": "json",
        })
    }

    #[test]
    fn test_validate_http_actions_accepts_well_formed_records() {
        let records = vec![json!({
            "action_name": "rain_today",
            "http_url": "http://f2724.botforge.io/",
            "request_method": "GET",
            "response": "${RESPONSE}",
            "params_list": [
                {"key": "location", "parameter_type": "value", "value": "delhi"},
                {"key": "username", "parameter_type": "sender_id", "value": ""},
            ],
            "headers": [],
        })];
        assert_eq!(validate_http_actions(&records), Vec::<String>::new());
    }

    #[test]
    fn test_validate_http_actions_reports_duplicates() {
        let records = vec![http_record("act1"), http_record("act2"), http_record("act2")];
        assert_eq!(
            validate_http_actions(&records),
            vec!["Duplicate http action found: act2"]
        );
    }

    #[test]
    fn test_validate_http_actions_rejects_unsupported_request_method() {
        let mut record = http_record("rain_today");
        record["request_method"] = json!("OPTIONS");
        assert_eq!(
            validate_http_actions(&[record]),
            vec!["Invalid request method: rain_today"]
        );
    }

    #[test]
    fn test_validate_http_actions_rejects_malformed_url() {
        let mut record = http_record("rain_today");
        record["http_url"] = json!("ftp://f2724.botforge.io/");
        assert_eq!(
            validate_http_actions(&[record]),
            vec!["Invalid http_url: rain_today"]
        );
    }

    #[test]
    fn test_validate_http_actions_checks_parameter_entries() {
        let mut record = http_record("rain_today");
        record["params_list"] = json!([{"key": "", "parameter_type": "value", "value": "bot"}]);
        record["headers"] = json!([{"key": "location", "parameter_type": "text", "value": "delhi"}]);
        assert_eq!(
            validate_http_actions(&[record]),
            vec![
                "Invalid params_list for http action: rain_today",
                "Invalid headers for http action: rain_today",
            ]
        );
    }

    #[test]
    fn test_validate_http_actions_allows_blank_slot_parameter_value() {
        let mut record = http_record("rain_today");
        record["params_list"] =
            json!([{"key": "location", "parameter_type": "slot", "value": ""}]);
        assert_eq!(validate_http_actions(&[record]), Vec::<String>::new());
    }

    #[test]
    fn test_validate_http_actions_requires_core_fields() {
        let record = json!({"name": "rain_today", "http_url": "http://f2724.botforge.io/",
            "request_method": "GET", "response": "${RESPONSE}"});
        let issues = validate_http_actions(&[record]);
        assert_eq!(issues.len(), 1);
        assert!(
            issues[0].starts_with("Required http action fields"),
            "unexpected issue: {}",
            issues[0]
        );
        assert!(issues[0].ends_with("not found in action: "));
    }

    #[test]
    fn test_validate_slot_set_actions_checks_slot_entries() {
        let records = vec![
            json!({"name": "set_cuisine", "set_slots": [
                {"name": "cuisine", "type": "from_value", "value": "north indian"}]}),
            json!({"name": "set_num_people", "set_slots": [
                {"name": "num_people", "type": "reset_slot"}]}),
            json!({"name": "action", "set_slots": [
                {"name": "num_people", "type": "slot", "value": "num_people"}]}),
            json!({"name": "set_no_name", "set_slots": [
                {"name": " ", "type": "from_value", "value": "north indian"}]}),
        ];
        assert_eq!(
            validate_slot_set_actions(&records),
            vec![
                "Invalid slot type slot: action",
                "Slot name cannot be empty: set_no_name",
            ]
        );
    }

    #[test]
    fn test_validate_slot_set_actions_reports_duplicates() {
        let records = vec![
            json!({"name": "set_cuisine", "set_slots": [
                {"name": "cuisine", "type": "from_value", "value": "north indian"}]}),
            json!({"name": "set_cuisine", "set_slots": [
                {"name": "cuisine", "type": "reset_slot"}]}),
        ];
        assert_eq!(
            validate_slot_set_actions(&records),
            vec!["Duplicate slot set action found: set_cuisine"]
        );
    }

    #[test]
    fn test_validate_form_validation_actions_checks_slot_set_blocks() {
        let records = vec![
            json!({"name": "validate_current", "slot": "name",
                "slot_set": {"type": "current", "value": ""}}),
            json!({"name": "validate_blank_type", "slot": "name",
                "slot_set": {"type": "", "value": ""}}),
            json!({"name": "validate_current_value", "slot": "name",
                "slot_set": {"type": "current", "value": "Mahesh"}}),
            json!({"name": "validate_slot_value", "slot": "name",
                "slot_set": {"type": "slot", "value": ""}}),
            json!({"name": "validate_custom_value", "slot": "name",
                "slot_set": {"type": "custom", "value": ""}}),
            json!({"name": "validate_unknown", "slot": "name",
                "slot_set": {"type": "form", "value": "x"}}),
        ];
        assert_eq!(
            validate_form_validation_actions(&records),
            vec![
                "slot_set type is required: validate_blank_type",
                "slot_set with type current should not have a value: validate_current_value",
                "slot_set with type slot requires a slot name as value: validate_slot_value",
                "slot_set with type custom requires a value: validate_custom_value",
                "Invalid slot_set type form: validate_unknown",
            ]
        );
    }

    #[test]
    fn test_validate_jira_actions_requires_parent_key_for_subtasks() {
        let records = vec![
            json!({"name": "jira", "url": "http://domain.atlassian.net",
                "user_name": "test@digite.com", "api_token": "ASDFGHJKL",
                "project_key": "HEL", "issue_type": "Subtask", "parent_key": "HEL-4",
                "summary": "demo request", "response": "issue created"}),
            json!({"name": "jira2", "url": "http://domain.atlassian.net",
                "user_name": "test@digite.com", "api_token": "ASDFGHJKL",
                "project_key": "HEL", "issue_type": "Subtask",
                "summary": "demo request", "response": "issue created"}),
        ];
        assert_eq!(
            validate_jira_actions(&records),
            vec!["parent_key is required for issue_type Subtask: jira2"]
        );
    }

    #[test]
    fn test_validate_google_search_actions_checks_num_results() {
        let base = json!({"name": "google_search", "api_key": "1231234567",
            "search_engine_id": "2345678"});
        let mut blank = base.clone();
        blank["num_results"] = json!("");
        blank["name"] = json!("google_blank");
        let mut parseable = base.clone();
        parseable["num_results"] = json!("1");
        parseable["name"] = json!("google_parseable");
        let mut negative = base.clone();
        negative["num_results"] = json!(-2);
        negative["name"] = json!("google_negative");
        let mut textual = base.clone();
        textual["num_results"] = json!("ten");
        textual["name"] = json!("google_textual");
        let records = vec![base, blank, parseable, negative, textual];
        assert_eq!(
            validate_google_search_actions(&records),
            vec![
                "num_results must be a positive integer: google_negative",
                "num_results must be a positive integer: google_textual",
            ]
        );
    }

    #[test]
    fn test_validate_pipedrive_leads_actions_requires_lead_name_metadata() {
        let records = vec![
            json!({"name": "action_pipedrive_leads", "domain": "https://digite751.pipedrive.com",
                "api_token": "2345678dfghj", "title": "new lead detected",
                "response": "lead_created",
                "metadata": {"name": "name", "org_name": "organization"}}),
            json!({"name": "pipedrive_leads_action", "domain": "https://digite751.pipedrive.com",
                "api_token": "2345678dfghj", "title": "new lead detected",
                "response": "lead_created",
                "metadata": {"org_name": "organization", "email": "email"}}),
        ];
        assert_eq!(
            validate_pipedrive_leads_actions(&records),
            vec!["metadata must contain a name key: pipedrive_leads_action"]
        );
    }

    #[test]
    fn test_validate_custom_actions_rejects_non_dictionary_documents() {
        let (is_invalid, issues, counts) = validate_custom_actions(&json!(["http_action"]));
        assert!(is_invalid);
        assert_eq!(
            issues.get("http_actions"),
            Some(&vec![DICT_EXPECTED.to_string()])
        );
        assert!(counts.is_empty());
    }

    #[test]
    fn test_validate_custom_actions_seeds_every_category() {
        let document = json!({"http_action": [http_record("act1")]});
        let (is_invalid, issues, counts) = validate_custom_actions(&document);
        assert!(!is_invalid);
        assert_eq!(issues.len(), 9);
        assert!(issues.values().all(|list| list.is_empty()));
        assert_eq!(counts.get("http_actions"), Some(&1));
        assert_eq!(counts.get("prompt_actions"), Some(&0));
    }

    #[test]
    fn test_validate_custom_actions_reports_unknown_categories() {
        let document = json!({"reminder_action": [{"name": "remind_me"}]});
        let (is_invalid, issues, _) = validate_custom_actions(&document);
        assert!(is_invalid);
        assert_eq!(
            issues.get("reminder_action"),
            Some(&vec!["Invalid action type: reminder_action".to_string()])
        );
    }

    #[test]
    fn test_validate_custom_actions_flags_non_list_category_values() {
        let document = json!({"email_action": {"action_name": "send_mail"}});
        let (is_invalid, issues, counts) = validate_custom_actions(&document);
        assert!(is_invalid);
        assert_eq!(
            issues.get("email_actions"),
            Some(&vec![DICT_EXPECTED.to_string()])
        );
        assert_eq!(counts.get("email_actions"), Some(&0));
    }

    #[test]
    fn test_records_wrapped_in_lists_are_rejected() {
        let document = json!({"zendesk_action": [
            {"name": "zendesk", "subdomain": "digite", "user_name": "test@digite.com",
             "api_token": "123456", "subject": "demo request", "response": "ticket created"},
            [{"action_name": "", "smtp_url": ""}],
        ]});
        let (is_invalid, issues, counts) = validate_custom_actions(&document);
        assert!(is_invalid);
        assert_eq!(
            issues.get("zendesk_actions"),
            Some(&vec![DICT_EXPECTED.to_string()])
        );
        assert_eq!(counts.get("zendesk_actions"), Some(&2));
    }
}
