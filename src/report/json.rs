use std::path::Path;
use anyhow::{Context, Result};
use super::types::TestResults;

/// Write the JSON report
pub fn write(results: &TestResults, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;
    Ok(())
}

/// Load a previously written JSON report
pub fn read(path: &Path) -> Result<TestResults> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let results = serde_json::from_str(&content)
        .with_context(|| format!("Invalid test results in {}", path.display()))?;
    Ok(results)
}
