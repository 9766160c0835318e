use taskscheduler::{AnalysisConfig, FlowAlgorithm, Traversal, UncategorizedPolicy};
use tempfile::NamedTempFile;

#[test]
fn test_config_serialization_roundtrip() {
    let original_config = AnalysisConfig {
        similarity_threshold: 0.65,
        uncategorized_policy: UncategorizedPolicy::Isolated,
        default_flow_algorithm: FlowAlgorithm::Dinic,
        default_traversal: Traversal::Dfs,
        cost_seed: Some(42),
        reminder_window_days: 3,
    };

    let toml_str = original_config
        .to_toml_string()
        .expect("Should be able to serialize config to TOML");

    assert!(toml_str.contains("similarity_threshold"));
    assert!(toml_str.contains("default_flow_algorithm = \"dinic\""));
    assert!(toml_str.contains("uncategorized_policy = \"isolated\""));

    let deserialized_config =
        AnalysisConfig::from_toml_str(&toml_str).expect("Should be able to deserialize TOML");
    assert_eq!(original_config, deserialized_config);
}

#[test]
fn test_config_file_operations() {
    let original_config = AnalysisConfig::default();

    let temp_file = NamedTempFile::new().expect("Should be able to create temporary file");
    let temp_path = temp_file.path();

    original_config
        .to_toml_file(temp_path)
        .expect("Should be able to save config to file");

    let loaded_config =
        AnalysisConfig::from_toml_file(temp_path).expect("Should be able to load config");
    assert_eq!(original_config, loaded_config);
    assert_eq!(loaded_config.cost_seed, None);
}

#[test]
fn test_empty_file_yields_defaults() {
    let config = AnalysisConfig::from_toml_str("").expect("Empty TOML should be accepted");
    assert_eq!(config, AnalysisConfig::default());
}

#[test]
fn test_invalid_values_are_rejected() {
    assert!(AnalysisConfig::from_toml_str("similarity_threshold = -0.1").is_err());
    assert!(AnalysisConfig::from_toml_str("default_flow_algorithm = \"simplex\"").is_err());
    assert!(AnalysisConfig::from_toml_str("default_traversal = 3").is_err());
    assert!(AnalysisConfig::from_toml_str("this is not toml").is_err());
}

#[test]
fn test_missing_file_reports_context() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path().with_extension("missing");

    let error = AnalysisConfig::from_toml_file(&path).unwrap_err();
    assert!(format!("{error:#}").contains("Failed to read config file"));
}
