//! Core domain types for the meter hierarchy
//!
//! Voltage tiers, transformer-code tiers and the meter record as it is
//! handed over by the persistence layer.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::serde_helpers::deserialize_id_flexible;

// ============================================================================
// Voltage Levels
// ============================================================================

/// Voltage level of a meter, forming the cascade 400kV → 132kV → 11kV/380V
///
/// Meter records carry the level as free text; parsing is case-insensitive
/// and tolerates surrounding whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoltageLevel {
    #[serde(rename = "400kV")]
    Kv400,
    #[serde(rename = "132kV")]
    Kv132,
    #[serde(rename = "11kV")]
    Kv11,
    #[serde(rename = "380V")]
    V380,
}

impl VoltageLevel {
    pub const ALL: [VoltageLevel; 4] = [
        VoltageLevel::Kv400,
        VoltageLevel::Kv132,
        VoltageLevel::Kv11,
        VoltageLevel::V380,
    ];

    /// Canonical display form
    ///
    /// # Examples
    /// ```
    /// # use voltage_hierarchy::VoltageLevel;
    /// assert_eq!(VoltageLevel::Kv11.as_str(), "11kV");
    /// ```
    pub fn as_str(&self) -> &'static str {
        match self {
            VoltageLevel::Kv400 => "400kV",
            VoltageLevel::Kv132 => "132kV",
            VoltageLevel::Kv11 => "11kV",
            VoltageLevel::V380 => "380V",
        }
    }

    /// Parse from free text, returning `None` for unrecognized levels
    ///
    /// # Examples
    /// ```
    /// # use voltage_hierarchy::VoltageLevel;
    /// assert_eq!(VoltageLevel::parse("11KV"), Some(VoltageLevel::Kv11));
    /// assert_eq!(VoltageLevel::parse(" 380v "), Some(VoltageLevel::V380));
    /// assert_eq!(VoltageLevel::parse("33kV"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    /// Whether a code of `tier` may be set on a meter at this level
    pub fn allows(&self, tier: CodeTier) -> bool {
        match (self, tier) {
            (VoltageLevel::Kv400, CodeTier::Ss400) => true,
            (VoltageLevel::Kv132, CodeTier::Ss132) => true,
            (VoltageLevel::Kv11, CodeTier::Ss132 | CodeTier::Ss011) => true,
            (VoltageLevel::V380, CodeTier::Ss011) => true,
            _ => false,
        }
    }

    /// Code fields a meter at this level must populate, no more and no less
    pub fn expected_fields(&self) -> ExpectedFields {
        match self {
            VoltageLevel::Kv400 => ExpectedFields::new(true, false, false),
            VoltageLevel::Kv132 => ExpectedFields::new(false, true, false),
            VoltageLevel::Kv11 => ExpectedFields::new(false, true, true),
            VoltageLevel::V380 => ExpectedFields::new(false, false, true),
        }
    }
}

impl fmt::Display for VoltageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoltageLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.eq_ignore_ascii_case("400kv") {
            Ok(VoltageLevel::Kv400)
        } else if t.eq_ignore_ascii_case("132kv") {
            Ok(VoltageLevel::Kv132)
        } else if t.eq_ignore_ascii_case("11kv") {
            Ok(VoltageLevel::Kv11)
        } else if t.eq_ignore_ascii_case("380v") {
            Ok(VoltageLevel::V380)
        } else {
            Err(format!("Unknown voltage level: {}", s))
        }
    }
}

// ============================================================================
// Transformer Code Tiers
// ============================================================================

/// Transformer-reference code fields, in tier order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeTier {
    Ss400,
    Ss132,
    Ss011,
}

impl CodeTier {
    /// Tier order: 400kV first
    pub const ALL: [CodeTier; 3] = [CodeTier::Ss400, CodeTier::Ss132, CodeTier::Ss011];

    /// Upper-case label used in user-facing reasons
    pub fn label(&self) -> &'static str {
        match self {
            CodeTier::Ss400 => "SS400",
            CodeTier::Ss132 => "SS132",
            CodeTier::Ss011 => "SS011",
        }
    }

    /// Record field name
    pub fn field_name(&self) -> &'static str {
        match self {
            CodeTier::Ss400 => "ss400",
            CodeTier::Ss132 => "ss132",
            CodeTier::Ss011 => "ss011",
        }
    }

    /// Suffix appended to an area code by the naming convention
    pub fn suffix(&self) -> &'static str {
        match self {
            CodeTier::Ss400 => "400",
            CodeTier::Ss132 => "132",
            CodeTier::Ss011 => "011",
        }
    }
}

impl fmt::Display for CodeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Which code fields are expected (or present) on a meter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpectedFields {
    pub ss400: bool,
    pub ss132: bool,
    pub ss011: bool,
}

impl ExpectedFields {
    pub const fn new(ss400: bool, ss132: bool, ss011: bool) -> Self {
        Self {
            ss400,
            ss132,
            ss011,
        }
    }

    pub fn get(&self, tier: CodeTier) -> bool {
        match tier {
            CodeTier::Ss400 => self.ss400,
            CodeTier::Ss132 => self.ss132,
            CodeTier::Ss011 => self.ss011,
        }
    }
}

/// Trim a raw code and treat blank values as absent
pub fn present(code: Option<&str>) -> Option<&str> {
    code.map(str::trim).filter(|c| !c.is_empty())
}

// ============================================================================
// Meter Record
// ============================================================================

/// A power-quality meter as stored by the persistence layer
///
/// The engine only reads these. Descriptive fields such as `status` are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meter {
    #[serde(deserialize_with = "deserialize_id_flexible")]
    pub id: String,

    #[serde(default)]
    pub meter_code: String,

    /// Raw voltage level text; unrecognized values are kept as-is
    #[serde(default)]
    pub voltage_level: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss400: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss132: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss011: Option<String>,

    /// Auxiliary code, never checked against tier rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss_misc: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub substation: Option<String>,
}

impl Meter {
    pub fn new(
        id: impl Into<String>,
        meter_code: impl Into<String>,
        voltage_level: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            meter_code: meter_code.into(),
            voltage_level: voltage_level.into(),
            area: None,
            ss400: None,
            ss132: None,
            ss011: None,
            ss_misc: None,
            status: None,
            location: None,
            substation: None,
        }
    }

    /// Builder-style setter for one transformer code
    pub fn with_code(mut self, tier: CodeTier, code: impl Into<String>) -> Self {
        *self.code_slot_mut(tier) = Some(code.into());
        self
    }

    /// Parsed voltage level, `None` if unrecognized
    pub fn voltage(&self) -> Option<VoltageLevel> {
        VoltageLevel::parse(&self.voltage_level)
    }

    /// Trimmed code for `tier`, `None` when absent or blank
    pub fn code(&self, tier: CodeTier) -> Option<&str> {
        let raw = match tier {
            CodeTier::Ss400 => self.ss400.as_deref(),
            CodeTier::Ss132 => self.ss132.as_deref(),
            CodeTier::Ss011 => self.ss011.as_deref(),
        };
        present(raw)
    }

    pub fn code_slot_mut(&mut self, tier: CodeTier) -> &mut Option<String> {
        match tier {
            CodeTier::Ss400 => &mut self.ss400,
            CodeTier::Ss132 => &mut self.ss132,
            CodeTier::Ss011 => &mut self.ss011,
        }
    }

    /// Which code fields are actually populated
    pub fn populated_fields(&self) -> ExpectedFields {
        ExpectedFields::new(
            self.code(CodeTier::Ss400).is_some(),
            self.code(CodeTier::Ss132).is_some(),
            self.code(CodeTier::Ss011).is_some(),
        )
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_voltage_level_parsing_is_case_insensitive() {
        assert_eq!(VoltageLevel::parse("400kV"), Some(VoltageLevel::Kv400));
        assert_eq!(VoltageLevel::parse("400KV"), Some(VoltageLevel::Kv400));
        assert_eq!(VoltageLevel::parse("132kv"), Some(VoltageLevel::Kv132));
        assert_eq!(VoltageLevel::parse("11Kv"), Some(VoltageLevel::Kv11));
        assert_eq!(VoltageLevel::parse("380V"), Some(VoltageLevel::V380));
        assert_eq!(VoltageLevel::parse(""), None);
        assert_eq!(VoltageLevel::parse("33kV"), None);
    }

    #[test]
    fn test_voltage_level_roundtrips_display() {
        for level in VoltageLevel::ALL {
            assert_eq!(VoltageLevel::parse(&level.to_string()), Some(level));
        }
    }

    #[test]
    fn test_blank_codes_are_absent() {
        let meter = Meter::new("m1", "X", "11kV")
            .with_code(CodeTier::Ss132, "   ")
            .with_code(CodeTier::Ss011, " APA011 ");

        assert_eq!(meter.code(CodeTier::Ss132), None);
        assert_eq!(meter.code(CodeTier::Ss011), Some("APA011"));
        assert_eq!(
            meter.populated_fields(),
            ExpectedFields::new(false, false, true)
        );
    }

    #[test]
    fn test_meter_deserializes_camel_case_and_numeric_id() {
        let json = r#"{
            "id": 42,
            "meterCode": "PQMS_11KV.APA0042_H3",
            "voltageLevel": "11kV",
            "ss132": "APA132",
            "ss011": "APA011",
            "ssMisc": "AUX1"
        }"#;
        let meter: Meter = serde_json::from_str(json).unwrap();
        assert_eq!(meter.id, "42");
        assert_eq!(meter.meter_code, "PQMS_11KV.APA0042_H3");
        assert_eq!(meter.voltage(), Some(VoltageLevel::Kv11));
        assert_eq!(meter.ss_misc.as_deref(), Some("AUX1"));
        assert!(meter.ss400.is_none());
    }
}
