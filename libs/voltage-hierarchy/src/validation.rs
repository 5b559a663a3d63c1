//! Transformer Code Validation
//!
//! Pure checks run on the write path (meter create/update, batch import)
//! before anything is persisted. Callers must run both the tier-placement
//! and the self-reference check and reject the write on the first failure,
//! passing `reason` through to the user unchanged.

use serde::{Deserialize, Serialize};

use crate::types::{present, CodeTier, Meter, VoltageLevel};

pub const REASON_SS011_NEEDS_SS132: &str = "SS011 requires a parent SS132 code";
pub const REASON_SS132_NEEDS_SS400: &str = "SS132 requires a parent SS400 code for 132kV meters";
pub const REASON_CIRCULAR: &str = "Circular reference detected: transformer codes must be unique";

/// Outcome of a validation check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Parent-code rules applied on top of the placement table
///
/// The defaults reproduce the production behaviour, which is
/// self-contradictory for 132kV meters (SS400 is both forbidden and
/// required) and for 380V meters (SS132 is both forbidden and required).
/// Both switches stay on until the intended business rule is confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierRules {
    /// An SS011 code needs an SS132 code on the same meter
    pub parent_ss132_for_ss011: bool,
    /// A 132kV meter with an SS132 code needs an SS400 code
    pub parent_ss400_for_132kv: bool,
}

impl Default for TierRules {
    fn default() -> Self {
        Self {
            parent_ss132_for_ss011: true,
            parent_ss400_for_132kv: true,
        }
    }
}

impl TierRules {
    /// True when any parent rule contradicts the placement table
    pub fn has_known_conflicts(&self) -> bool {
        self.parent_ss132_for_ss011 || self.parent_ss400_for_132kv
    }
}

fn placement_reason(tier: CodeTier) -> &'static str {
    match tier {
        CodeTier::Ss400 => "SS400 can only be set for 400kV meters",
        CodeTier::Ss132 => "SS132 can only be set for 132kV or 11kV meters",
        CodeTier::Ss011 => "SS011 can only be set for 11kV or 380V meters",
    }
}

/// Check which code fields a meter may carry for its voltage level
///
/// | level | SS400 | SS132 | SS011 |
/// |-------|-------|-------|-------|
/// | 400kV | yes   | no    | no    |
/// | 132kV | no    | yes   | no    |
/// | 11kV  | no    | yes   | yes   |
/// | 380V  | no    | no    | yes   |
///
/// An unrecognized level allows no codes at all.
///
/// # Examples
/// ```
/// use voltage_hierarchy::validate_tier_placement;
///
/// assert!(validate_tier_placement("400kV", Some("APA400"), None, None).valid);
/// let r = validate_tier_placement("380V", Some("APA400"), None, None);
/// assert!(!r.valid);
/// assert_eq!(r.reason.as_deref(), Some("SS400 can only be set for 400kV meters"));
/// ```
pub fn validate_tier_placement(
    voltage_level: &str,
    ss400: Option<&str>,
    ss132: Option<&str>,
    ss011: Option<&str>,
) -> ValidationResult {
    validate_tier_placement_with(&TierRules::default(), voltage_level, ss400, ss132, ss011)
}

/// [`validate_tier_placement`] with explicit parent rules
pub fn validate_tier_placement_with(
    rules: &TierRules,
    voltage_level: &str,
    ss400: Option<&str>,
    ss132: Option<&str>,
    ss011: Option<&str>,
) -> ValidationResult {
    let level = VoltageLevel::parse(voltage_level);
    let ss400 = present(ss400);
    let ss132 = present(ss132);
    let ss011 = present(ss011);

    for (tier, code) in [
        (CodeTier::Ss400, ss400),
        (CodeTier::Ss132, ss132),
        (CodeTier::Ss011, ss011),
    ] {
        let allowed = level.is_some_and(|l| l.allows(tier));
        if code.is_some() && !allowed {
            return ValidationResult::fail(placement_reason(tier));
        }
    }

    if rules.parent_ss132_for_ss011 && ss011.is_some() && ss132.is_none() {
        return ValidationResult::fail(REASON_SS011_NEEDS_SS132);
    }

    // 11kV meters carry SS132 without SS400 on purpose
    if rules.parent_ss400_for_132kv
        && level == Some(VoltageLevel::Kv132)
        && ss132.is_some()
        && ss400.is_none()
    {
        return ValidationResult::fail(REASON_SS132_NEEDS_SS400);
    }

    ValidationResult::ok()
}

/// Reject code sets where two tiers hold the same value
///
/// # Examples
/// ```
/// use voltage_hierarchy::validate_no_self_reference;
///
/// assert!(validate_no_self_reference(None, Some("APA132"), Some("APA011")).valid);
/// assert!(!validate_no_self_reference(None, Some("APA132"), Some("APA132")).valid);
/// ```
pub fn validate_no_self_reference(
    ss400: Option<&str>,
    ss132: Option<&str>,
    ss011: Option<&str>,
) -> ValidationResult {
    let codes: Vec<&str> = [ss400, ss132, ss011]
        .into_iter()
        .filter_map(present)
        .collect();

    for (i, a) in codes.iter().enumerate() {
        if codes[i + 1..].contains(a) {
            return ValidationResult::fail(REASON_CIRCULAR);
        }
    }

    ValidationResult::ok()
}

/// Run every write-path check against a meter with the default rules
pub fn validate_meter(meter: &Meter) -> ValidationResult {
    validate_meter_with(&TierRules::default(), meter)
}

/// Run every write-path check against a meter, returning the first failure
pub fn validate_meter_with(rules: &TierRules, meter: &Meter) -> ValidationResult {
    let ss400 = meter.ss400.as_deref();
    let ss132 = meter.ss132.as_deref();
    let ss011 = meter.ss011.as_deref();

    let placement = validate_tier_placement_with(rules, &meter.voltage_level, ss400, ss132, ss011);
    if !placement.is_valid() {
        return placement;
    }

    validate_no_self_reference(ss400, ss132, ss011)
}
