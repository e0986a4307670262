//! OpenAPI document loading (JSON or YAML)

use std::path::{Path, PathBuf};

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Cannot parse {0}: {1}")]
    Parse(PathBuf, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

/// Read and parse a document; format by extension, else by content.
pub fn load_spec(path: &Path) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| LoadError::Io(path.to_path_buf(), e.to_string()))?;
    let format = format_for(path, &content);
    parse(&content, format).map_err(|e| LoadError::Parse(path.to_path_buf(), e))
}

fn format_for(path: &Path, content: &str) -> Format {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Format::Json,
        Some("yaml" | "yml") => Format::Yaml,
        _ if content.trim_start().starts_with('{') => Format::Json,
        _ => Format::Yaml,
    }
}

fn parse(content: &str, format: Format) -> Result<Value, String> {
    match format {
        Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        Format::Yaml => serde_yml::from_str(content).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML_SPEC: &str = r#"openapi: 3.0.3
info:
  title: Demo
paths:
  /users:
    post:
      responses:
        "201":
          description: created
    get:
      responses:
        "200":
          description: ok
"#;

    #[test]
    fn loads_yaml_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.yaml");
        std::fs::write(&path, YAML_SPEC).unwrap();

        let doc = load_spec(&path).unwrap();
        assert_eq!(doc["info"]["title"], "Demo");
        // declaration order survives parsing
        let methods: Vec<&String> = doc["paths"]["/users"].as_object().unwrap().keys().collect();
        assert_eq!(methods, vec!["post", "get"]);
    }

    #[test]
    fn sniffs_json_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("openapi");
        std::fs::write(&path, r#"  {"openapi": "3.1.0", "paths": {}}"#).unwrap();
        let doc = load_spec(&path).unwrap();
        assert_eq!(doc["openapi"], "3.1.0");
    }

    #[test]
    fn sniffs_yaml_without_extension() {
        assert_eq!(format_for(Path::new("spec"), YAML_SPEC), Format::Yaml);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_spec(Path::new("no/such/api.yaml")).unwrap_err();
        assert!(matches!(err, LoadError::Io(..)));
    }

    #[test]
    fn broken_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("api.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = load_spec(&path).unwrap_err();
        assert!(matches!(err, LoadError::Parse(..)));
        assert!(err.to_string().contains("api.json"));
    }
}
