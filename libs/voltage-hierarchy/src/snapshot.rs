//! Meter snapshot loading
//!
//! Reads a materialized meter list exported by the persistence layer. Two
//! layouts are accepted in JSON and YAML:
//!
//! ```text
//! [ {meter}, {meter}, ... ]
//! { "meters": [ {meter}, ... ] }
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{HierarchyError, Result};
use crate::types::Meter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                HierarchyError::unsupported_format(format!(
                    "snapshot file must have an extension: {}",
                    path.display()
                ))
            })?;

        match extension.to_ascii_lowercase().as_str() {
            "json" => Ok(SnapshotFormat::Json),
            "yaml" | "yml" => Ok(SnapshotFormat::Yaml),
            other => Err(HierarchyError::unsupported_format(other.to_string())),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotLayout {
    List(Vec<Meter>),
    Wrapped { meters: Vec<Meter> },
}

impl SnapshotLayout {
    fn into_meters(self) -> Vec<Meter> {
        match self {
            SnapshotLayout::List(meters) | SnapshotLayout::Wrapped { meters } => meters,
        }
    }
}

/// Decode a snapshot already held in memory
pub fn parse_meters(content: &str, format: SnapshotFormat) -> Result<Vec<Meter>> {
    let layout: SnapshotLayout = match format {
        SnapshotFormat::Json => serde_json::from_str(content)?,
        SnapshotFormat::Yaml => serde_yaml::from_str(content)?,
    };
    let meters = layout.into_meters();
    check_unique_ids(&meters)?;
    Ok(meters)
}

/// Read and decode a snapshot file, format chosen by extension
pub fn load_meters(path: impl AsRef<Path>) -> Result<Vec<Meter>> {
    let path = path.as_ref();
    let format = SnapshotFormat::from_path(path)?;
    debug!("Loading meter snapshot {} as {:?}", path.display(), format);

    let content = std::fs::read_to_string(path)?;
    let meters = parse_meters(&content, format)?;

    info!("Loaded {} meters from {}", meters.len(), path.display());
    Ok(meters)
}

/// The forest relies on ids being unique within one snapshot
fn check_unique_ids(meters: &[Meter]) -> Result<()> {
    let mut seen = HashSet::with_capacity(meters.len());
    for meter in meters {
        if !seen.insert(meter.id.as_str()) {
            return Err(HierarchyError::invalid_snapshot(format!(
                "duplicate meter id '{}'",
                meter.id
            )));
        }
    }
    Ok(())
}
