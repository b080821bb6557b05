use std::fs;
use std::path::Path;

use tracing::{debug, error};

use crate::error::TrainingDataError;
use crate::model::{DataFile, Domain, MultiflowDocument, PipelineConfig, TrainingDataBundle};

/// Domain document file name inside a training data root
pub const DOMAIN_FILE: &str = "domain.yml";

/// Model configuration file name inside a training data root
pub const CONFIG_FILE: &str = "config.yml";

/// Data directory name inside a training data root
pub const DATA_DIR: &str = "data";

/// Multiflow stories file name inside a training data root
pub const MULTIFLOW_FILE: &str = "multiflow_stories.yml";

/// Parse a domain document from YAML text.
///
/// An empty document yields an empty domain rather than an error; emptiness
/// is reported as a validation issue, not a parse failure.
pub fn parse_domain(yaml_str: &str) -> Result<Domain, TrainingDataError> {
    if yaml_str.trim().is_empty() {
        return Ok(Domain::default());
    }
    Ok(serde_yaml::from_str(yaml_str)?)
}

/// Parse a model configuration document from YAML text
pub fn parse_config(yaml_str: &str) -> Result<PipelineConfig, TrainingDataError> {
    if yaml_str.trim().is_empty() {
        return Ok(PipelineConfig::default());
    }
    Ok(serde_yaml::from_str(yaml_str)?)
}

/// Parse a training data file (NLU entries, stories, rules) from YAML text
pub fn parse_data_file(yaml_str: &str) -> Result<DataFile, TrainingDataError> {
    if yaml_str.trim().is_empty() {
        return Ok(DataFile::default());
    }
    Ok(serde_yaml::from_str(yaml_str)?)
}

/// Parse a multiflow stories document from YAML text.
///
/// The document is kept as a loose value so malformed blocks can be turned
/// into validation issues instead of parse failures, but the top level must
/// be a mapping.
pub fn parse_multiflow_document(yaml_str: &str) -> Result<serde_json::Value, TrainingDataError> {
    if yaml_str.trim().is_empty() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }
    let value: serde_json::Value = serde_yaml::from_str(yaml_str)?;
    if !value.is_object() {
        return Err(TrainingDataError::InvalidMultiflowDocument);
    }
    Ok(value)
}

/// Load every training document from a training data root directory.
///
/// The root is expected to follow the standard layout:
/// `domain.yml`, `config.yml`, a `data/` directory of YAML files carrying
/// NLU entries, stories and rules, and an optional `multiflow_stories.yml`.
///
/// # Arguments
///
/// * `root` - The training data root directory
///
/// # Returns
///
/// A `Result` containing either the loaded `TrainingDataBundle` or a
/// `TrainingDataError`.
///
/// # Errors
///
/// Fails when the root or data directory is missing, a required document
/// cannot be read, or `domain.yml`, `config.yml` or a data file contains
/// invalid YAML. A malformed `multiflow_stories.yml` is not an immediate
/// error: the failure is recorded on the bundle and surfaced when
/// validation runs.
pub fn load_training_data(root: impl AsRef<Path>) -> Result<TrainingDataBundle, TrainingDataError> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(TrainingDataError::InvalidPath(root.display().to_string()));
    }

    let domain_path = root.join(DOMAIN_FILE);
    debug!("Loading domain from {}", domain_path.display());
    let domain = parse_domain(&fs::read_to_string(&domain_path)?)?;

    let config_path = root.join(CONFIG_FILE);
    debug!("Loading model config from {}", config_path.display());
    let config = parse_config(&fs::read_to_string(&config_path)?)?;

    let data_dir = root.join(DATA_DIR);
    if !data_dir.is_dir() {
        return Err(TrainingDataError::InvalidPath(data_dir.display().to_string()));
    }
    let mut data = DataFile::default();
    for path in yaml_files_sorted(&data_dir)? {
        debug!("Loading training data file {}", path.display());
        data.merge(parse_data_file(&fs::read_to_string(&path)?)?);
    }

    let multiflow_path = root.join(MULTIFLOW_FILE);
    let multiflow = if multiflow_path.is_file() {
        debug!("Loading multiflow stories from {}", multiflow_path.display());
        match fs::read_to_string(&multiflow_path)
            .map_err(TrainingDataError::from)
            .and_then(|contents| parse_multiflow_document(&contents))
        {
            Ok(value) => MultiflowDocument::Loaded(value),
            Err(err) => {
                error!("Failed to load {}: {}", multiflow_path.display(), err);
                MultiflowDocument::Failed
            }
        }
    } else {
        MultiflowDocument::Absent
    };

    Ok(TrainingDataBundle {
        domain,
        config,
        data,
        multiflow,
    })
}

/// The YAML files directly inside a directory, sorted by file name so merge
/// order does not depend on directory iteration order.
fn yaml_files_sorted(dir: &Path) -> Result<Vec<std::path::PathBuf>, TrainingDataError> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"))
            .unwrap_or(false);
        if path.is_file() && is_yaml {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_documents_parse_to_defaults() {
        assert!(parse_domain("").unwrap().is_empty());
        assert!(parse_config("  \n").unwrap().pipeline.is_empty());
        assert!(parse_data_file("\n").unwrap().nlu.is_empty());
    }

    #[test]
    fn test_multiflow_document_must_be_a_mapping() {
        let result = parse_multiflow_document("- just\n- a\n- list\n");
        assert!(result.is_err());

        match result.err().unwrap() {
            TrainingDataError::InvalidMultiflowDocument => {}
            err => panic!("Expected InvalidMultiflowDocument, got {:?}", err),
        }
    }

    #[test]
    fn test_multiflow_parse_keeps_block_list() {
        let yaml = r#"
        multiflow_story:
          - block_name: first
            events: []
        "#;

        let value = parse_multiflow_document(yaml).unwrap();
        assert!(value["multiflow_story"].is_array());
    }

    #[test]
    fn test_missing_root_is_an_invalid_path() {
        let result = load_training_data("/definitely/not/a/real/path");
        assert!(result.is_err());

        match result.err().unwrap() {
            TrainingDataError::InvalidPath(path) => {
                assert!(path.contains("not/a/real/path"));
            }
            err => panic!("Expected InvalidPath, got {:?}", err),
        }
    }

    #[test]
    fn test_invalid_domain_yaml_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DOMAIN_FILE), "intents: [unclosed").unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        fs::create_dir(dir.path().join(DATA_DIR)).unwrap();

        let result = load_training_data(dir.path());
        assert!(result.is_err());

        match result.err().unwrap() {
            TrainingDataError::YamlError(_) => {}
            err => panic!("Expected YamlError, got {:?}", err),
        }
    }

    #[test]
    fn test_malformed_multiflow_defers_the_failure() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DOMAIN_FILE), "intents:\n  - greet\n").unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        fs::create_dir(dir.path().join(DATA_DIR)).unwrap();
        fs::write(dir.path().join(MULTIFLOW_FILE), "- not\n- a\n- mapping\n").unwrap();

        let bundle = load_training_data(dir.path()).unwrap();
        assert!(bundle.multiflow.load_failed());
    }
}
