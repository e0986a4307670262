//! Plan file writing

use std::path::Path;

use specsuite_core::TestPlan;

/// Write the plan as pretty JSON, creating parent directories as needed.
pub fn write_plan(path: &Path, plan: &TestPlan) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(plan).map_err(|e| std::io::Error::other(e.to_string()))?;
    std::fs::write(path, json + "\n")
}
