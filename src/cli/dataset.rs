//! Dataset file handling
//!
//! Datasets are JSON documents holding the `users`, `categories` and
//! `tasks` arrays of a [`Dataset`]. Loading validates references and
//! costs through [`TaskStore::from_dataset`].

use crate::task::{AnalysisError, Dataset, TaskStore};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset file '{path}' not found")]
    NotFound { path: PathBuf },

    #[error("IO error on '{path}': {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Dataset '{path}' is not valid JSON: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize dataset for '{path}': {source}")]
    SerializeError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Dataset '{path}' is inconsistent: {source}")]
    Invalid {
        path: PathBuf,
        source: AnalysisError,
    },
}

/// Reads and writes dataset files
pub struct DatasetLoader;

impl DatasetLoader {
    /// Load a dataset file into a validated store
    pub fn load<P: AsRef<Path>>(path: P) -> Result<TaskStore, DatasetError> {
        let path = path.as_ref().to_path_buf();
        debug!("Loading dataset: {:?}", path);

        let content = fs::read_to_string(&path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DatasetError::NotFound { path: path.clone() },
            _ => DatasetError::IoError {
                path: path.clone(),
                source: e,
            },
        })?;

        Self::parse(&content, &path)
    }

    /// Parse dataset JSON; `path` is only used for error reporting
    pub fn parse(content: &str, path: &Path) -> Result<TaskStore, DatasetError> {
        let dataset: Dataset =
            serde_json::from_str(content).map_err(|source| DatasetError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;

        debug!(
            "Parsed {} users, {} categories, {} tasks from {:?}",
            dataset.users.len(),
            dataset.categories.len(),
            dataset.tasks.len(),
            path
        );

        TaskStore::from_dataset(dataset).map_err(|source| DatasetError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the store's collections as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(store: &TaskStore, path: P) -> Result<(), DatasetError> {
        let path = path.as_ref().to_path_buf();
        let content = serde_json::to_string_pretty(&store.to_dataset()).map_err(|source| {
            DatasetError::SerializeError {
                path: path.clone(),
                source,
            }
        })?;
        fs::write(&path, content).map_err(|source| DatasetError::IoError { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "users": [{"id": 1, "email": "ada@example.com", "password_hash": "x"}],
        "categories": [{"id": 1, "name": "Work"}],
        "tasks": [
            {"id": 1, "name": "report", "cost": 3.0, "category": 1, "owner": 1,
             "deadline": "2026-04-01", "priority": 2}
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let store = DatasetLoader::parse(SAMPLE, Path::new("sample.json")).unwrap();
        let task = store.get_task(1).unwrap();
        assert_eq!(task.category, Some(1));
        assert_eq!(task.priority, Some(2));
        assert_eq!(task.description, "");
        assert_eq!(task.deadline.unwrap().to_string(), "2026-04-01");
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = DatasetLoader::load(temp_dir.path().join("nope.json"));
        assert!(matches!(result, Err(DatasetError::NotFound { .. })));
    }

    #[test]
    fn test_malformed_json() {
        let result = DatasetLoader::parse("{ not json", Path::new("bad.json"));
        assert!(matches!(result, Err(DatasetError::ParseError { .. })));
    }

    #[test]
    fn test_inconsistent_dataset() {
        let content = r#"{"users": [], "tasks": [{"id": 1, "name": "x", "owner": 4}]}"#;
        let result = DatasetLoader::parse(content, Path::new("bad.json"));
        assert!(matches!(
            result,
            Err(DatasetError::Invalid {
                source: AnalysisError::NotFound { kind: "user", id: 4 },
                ..
            })
        ));
    }

    #[test]
    fn test_error_messages_name_the_failure() {
        let parse = DatasetLoader::parse("[", Path::new("a.json")).unwrap_err();
        assert!(parse.to_string().contains("is not valid JSON"));

        let source = serde_json::from_str::<Dataset>("[").unwrap_err();
        let serialize = DatasetError::SerializeError {
            path: PathBuf::from("b.json"),
            source,
        };
        assert!(serialize.to_string().starts_with("Failed to serialize dataset"));
    }

    #[test]
    fn test_save_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let store = DatasetLoader::parse(SAMPLE, Path::new("sample.json")).unwrap();
        let result = DatasetLoader::save(&store, temp_dir.path().join("absent/data.json"));
        assert!(matches!(result, Err(DatasetError::IoError { .. })));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.json");
        let store = DatasetLoader::parse(SAMPLE, Path::new("sample.json")).unwrap();

        DatasetLoader::save(&store, &path).unwrap();
        let reloaded = DatasetLoader::load(&path).unwrap();
        assert_eq!(reloaded.get_task(1).unwrap(), store.get_task(1).unwrap());
    }
}
