//! Voltage Hierarchy Library
//!
//! Meter (asset) hierarchy engine for VoltageEMS power-quality monitoring.
//! Pure business logic over an in-memory meter snapshot; persistence and
//! presentation live elsewhere.
//!
//! # Modules
//!
//! - `validation`: write-path checks for transformer code placement and uniqueness
//! - `autopopulate`: code suggestions from the meter naming convention
//! - `classify`: per-meter hierarchy completeness
//! - `forest`: assembly of the 400kV → 132kV → 11kV/380V forest
//! - `snapshot`: JSON/YAML meter snapshot loading
//!
//! # Example
//!
//! ```
//! use voltage_hierarchy::{build_forest, CodeTier, Meter, NodeTier};
//!
//! let meters = vec![
//!     Meter::new("M1", "PQMS_132KV.APA0001", "132kV").with_code(CodeTier::Ss132, "APA132"),
//!     Meter::new("M2", "PQMS_11KV.APA0042_H3", "11kV")
//!         .with_code(CodeTier::Ss132, "APA132")
//!         .with_code(CodeTier::Ss011, "APA011"),
//!     Meter::new("M3", "PQMS_380V.APA0107", "380V").with_code(CodeTier::Ss011, "APA011"),
//! ];
//!
//! let forest = build_forest(&meters);
//! assert_eq!(forest.len(), 1);
//! assert_eq!(forest[0].tier, NodeTier::Ss132);
//! assert_eq!(forest[0].children[0].children[0].id, "M3");
//! ```

pub mod autopopulate;
pub mod classify;
pub mod error;
pub mod forest;
pub mod serde_helpers;
pub mod snapshot;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use autopopulate::{derive_from_name, extract_area, CodeSuggestion};
pub use classify::{classify, HierarchyClassification};
pub use error::{HierarchyError, Result};
pub use forest::{build_forest, forest_meters, ForestSummary, NodeTier, TreeNode, ORPHAN_BUCKET_ID};
pub use snapshot::{load_meters, parse_meters, SnapshotFormat};
pub use types::{CodeTier, ExpectedFields, Meter, VoltageLevel};
pub use validation::{
    validate_meter, validate_meter_with, validate_no_self_reference, validate_tier_placement,
    validate_tier_placement_with, TierRules, ValidationResult,
};
