//! # BotForge DSL
//!
//! The BotForge DSL is the YAML-based declaration layer of the BotForge
//! conversational platform. This crate provides functionality for parsing,
//! validating, and representing the training documents a bot is built
//! from: the domain, the model configuration, NLU data, stories, rules,
//! custom action declarations and multiflow story graphs.
//!
//! ## Features
//!
//! * YAML-based declaration documents for intents, utterances, stories and rules
//! * Cross-reference validation between the domain, NLU data and stories
//! * Graph validation for multiflow stories, including cycle detection
//! * Schema checks for every supported custom action kind
//! * Pipeline and policy configuration checks against the supported components
//!
//! ## Example
//!
//! ```
//! use botforge_dsl::validation::validate_custom_actions;
//!
//! let document = serde_json::json!({
//!     "http_action": [{
//!         "action_name": "fetch_weather",
//!         "http_url": "http://weather.example.com/today",
//!         "request_method": "GET",
//!         "response": "${RESPONSE}",
//!     }]
//! });
//!
//! let (is_invalid, issues, counts) = validate_custom_actions(&document);
//! assert!(!is_invalid);
//! assert_eq!(counts["http_actions"], 1);
//! assert!(issues["http_actions"].is_empty());
//! ```

use std::path::Path;

mod error;

pub mod loader;
pub mod model;
pub mod validation;

pub use error::TrainingDataError;
pub use loader::load_training_data;
pub use model::{DataFile, Domain, MultiflowDocument, PipelineConfig, TrainingDataBundle};
pub use validation::{IssueCategory, ValidationReport, ValidationSummary};

/// Load the training data below `root` and run every consistency check.
///
/// This function covers the whole pipeline in one call:
/// 1. Reads `domain.yml`, `config.yml` and every YAML file under `data/`
/// 2. Picks up `multiflow_stories.yml` when one is present
/// 3. Runs the cross-reference, story, config and multiflow graph checks
///
/// # Arguments
///
/// * `root` - The training data root directory
/// * `raise_exception` - Turn a non-empty issue summary into an error
///
/// # Returns
///
/// A `Result` containing either the [`ValidationReport`] or a
/// [`TrainingDataError`]
///
/// # Errors
///
/// This function can fail for several reasons:
/// * The root or its `data/` directory is missing, or a file is unreadable
/// * Invalid YAML in the domain, configuration or data documents
/// * A multiflow stories document without the expected top-level mapping
/// * `raise_exception` is set and at least one issue was found
///
/// # Examples
///
/// ```no_run
/// use botforge_dsl::parse_and_validate_training_data;
///
/// let report = parse_and_validate_training_data("bots/customer-support", false)?;
/// for (category, issues) in report.summary.iter() {
///     println!("{}: {} issue(s)", category, issues.len());
/// }
/// # Ok::<(), botforge_dsl::TrainingDataError>(())
/// ```
pub fn parse_and_validate_training_data(
    root: impl AsRef<Path>,
    raise_exception: bool,
) -> Result<ValidationReport, TrainingDataError> {
    let bundle = loader::load_training_data(root)?;
    validation::validate_training_data(&bundle, raise_exception)
}

/// Returns a version string for the BotForge DSL crate
///
/// # Returns
///
/// The version of the crate as defined in Cargo.toml
///
/// # Examples
///
/// ```
/// use botforge_dsl::version;
///
/// let ver = version();
/// assert!(ver.starts_with("0."));
/// ```
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
