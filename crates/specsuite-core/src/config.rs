//! Project configuration and generation options

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenAPI document path (JSON or YAML)
    pub spec: PathBuf,

    /// Where the generated plan is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Example synthesis and case generation options
    #[serde(default)]
    pub generation: GenerationOptions,
}

fn default_output() -> PathBuf {
    PathBuf::from(".specsuite/plan.json")
}

/// Options passed to the engine at invocation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Hard cap on synthesized array length
    pub max_array_items: usize,
    /// Nesting depth up to which optional object properties are included
    pub max_object_depth: usize,
    /// How a `oneOf`/`anyOf` member is chosen
    pub variant_policy: VariantPolicy,
    /// Seed for [`VariantPolicy::Seeded`]
    pub seed: u64,
    /// How placeholder strings rotate
    pub string_rotation: StringRotation,
    /// Prefer a schema's own `example`/`default` over the lookup table
    pub use_declared_examples: bool,
    /// Expected status of valid cases
    pub success_status: SuccessStatus,
    /// Accepted statuses for invalid cases
    pub rejection_statuses: Vec<u16>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_array_items: 3,
            max_object_depth: 4,
            variant_policy: VariantPolicy::First,
            seed: 0,
            string_rotation: StringRotation::CallOrder,
            use_declared_examples: false,
            success_status: SuccessStatus::Always200,
            rejection_statuses: vec![400, 401, 422, 500],
        }
    }
}

/// Selection policy for `oneOf`/`anyOf` members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantPolicy {
    /// First non-null member
    #[default]
    First,
    /// Member picked by a seeded RNG (reproducible for a fixed seed)
    Seeded,
    /// One valid case per top-level body member; nested unions use the first member
    AllVariants,
}

/// Rotation key for placeholder strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StringRotation {
    /// Per-run call counter
    #[default]
    CallOrder,
    /// Hash of the property path, stable per property
    SchemaPath,
}

/// Expected status for valid cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessStatus {
    /// Always 200
    #[default]
    #[serde(rename = "always_200")]
    Always200,
    /// First declared 2xx status, 200 when none is declared
    FirstDeclared,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spec: PathBuf::from("openapi.yaml"),
            output: default_output(),
            generation: GenerationOptions::default(),
        }
    }
}

impl Config {
    /// Load config from file
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
    }

    /// Load from default location (.specsuite.toml)
    ///
    /// # Errors
    ///
    /// Returns error if a discovered file cannot be read or parsed
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = [".specsuite.toml", ".specsuite.json", "specsuite.toml"];

        for name in candidates {
            let path = Path::new(name);
            if path.exists() {
                return Self::load(path);
            }
        }

        Ok(Self::default())
    }

    /// Create example config file
    #[must_use]
    pub fn example() -> &'static str {
        r#"# specsuite configuration

# OpenAPI document (JSON or YAML)
spec = "openapi.yaml"

# Generated plan, consumed by a test emitter
output = ".specsuite/plan.json"

[generation]
# Cap on synthesized array length
max_array_items = 3

# Depth up to which optional object properties are filled in
max_object_depth = 4

# oneOf/anyOf member selection: "first", "seeded", "all_variants"
variant_policy = "first"
# seed = 42

# Placeholder string rotation: "call_order" or "schema_path"
string_rotation = "call_order"

# Use the schema's own example/default values when present
# use_declared_examples = true

# Valid-case status: "always_200" or "first_declared"
success_status = "always_200"

# Statuses accepted for empty/invalid requests
rejection_statuses = [400, 401, 422, 500]
"#
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read {0}: {1}")]
    Io(PathBuf, String),
    #[error("Parse error: {0}")]
    Parse(String),
}
