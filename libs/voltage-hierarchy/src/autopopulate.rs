//! Code suggestions from the meter naming convention
//!
//! Meter identifiers embed a 3-letter area token right before a digit run,
//! e.g. `PQMS_11KV.APA0042_H3` → `APA`. The area plus a tier suffix gives the
//! conventional transformer code (`APA132`, `APA011`, ...). Suggestions are
//! advisory: they are only merged into fields that are still empty.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{CodeTier, Meter, VoltageLevel};

/// Leftmost 3 upper-case letters directly followed by a digit
#[allow(clippy::expect_used)] // literal pattern, covered by tests
static AREA_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]{3})[0-9]").expect("area pattern is valid"));

/// Suggested area and transformer codes for a meter being edited
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSuggestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss400: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss132: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss011: Option<String>,
}

impl CodeSuggestion {
    /// True when the naming convention did not match
    pub fn is_empty(&self) -> bool {
        self.area.is_none() && self.ss400.is_none() && self.ss132.is_none() && self.ss011.is_none()
    }

    pub fn code(&self, tier: CodeTier) -> Option<&str> {
        match tier {
            CodeTier::Ss400 => self.ss400.as_deref(),
            CodeTier::Ss132 => self.ss132.as_deref(),
            CodeTier::Ss011 => self.ss011.as_deref(),
        }
    }

    /// Merge into `meter`, touching only fields that are currently blank
    ///
    /// Returns the names of the fields that were filled, in tier order with
    /// `area` first.
    pub fn fill_empty(&self, meter: &mut Meter) -> Vec<&'static str> {
        let mut filled = Vec::new();

        if let Some(area) = &self.area {
            if is_blank(meter.area.as_deref()) {
                meter.area = Some(area.clone());
                filled.push("area");
            }
        }

        for tier in CodeTier::ALL {
            let Some(code) = self.code(tier) else {
                continue;
            };
            let slot = meter.code_slot_mut(tier);
            if is_blank(slot.as_deref()) {
                *slot = Some(code.to_string());
                filled.push(tier.field_name());
            }
        }

        filled
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Extract the area token from a meter identifier
///
/// # Examples
/// ```
/// use voltage_hierarchy::extract_area;
///
/// assert_eq!(extract_area("PQMS_11KV.APA0042_H3"), Some("APA"));
/// assert_eq!(extract_area("noareacode"), None);
/// ```
pub fn extract_area(meter_code: &str) -> Option<&str> {
    AREA_PATTERN
        .captures(meter_code)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Derive area and tier codes from a meter identifier and its voltage level
///
/// Returns an empty suggestion when the identifier does not follow the
/// naming convention. For an unrecognized voltage level only the area is
/// suggested.
///
/// # Examples
/// ```
/// use voltage_hierarchy::derive_from_name;
///
/// let s = derive_from_name("PQMS_11KV.APA0042_H3", "11kV");
/// assert_eq!(s.area.as_deref(), Some("APA"));
/// assert_eq!(s.ss132.as_deref(), Some("APA132"));
/// assert_eq!(s.ss011.as_deref(), Some("APA011"));
/// assert!(s.ss400.is_none());
/// ```
pub fn derive_from_name(meter_code: &str, voltage_level: &str) -> CodeSuggestion {
    let Some(area) = extract_area(meter_code) else {
        return CodeSuggestion::default();
    };

    // 132kV meters are offered an SS400 parent even though placement rules
    // forbid it there; kept as-is until the 132kV rule is settled.
    let tiers: &[CodeTier] = match VoltageLevel::parse(voltage_level) {
        Some(VoltageLevel::Kv400) => &[CodeTier::Ss400],
        Some(VoltageLevel::Kv132) => &[CodeTier::Ss400, CodeTier::Ss132],
        Some(VoltageLevel::Kv11) => &[CodeTier::Ss132, CodeTier::Ss011],
        Some(VoltageLevel::V380) => &[CodeTier::Ss011],
        None => &[],
    };

    let mut suggestion = CodeSuggestion {
        area: Some(area.to_string()),
        ..Default::default()
    };
    for tier in tiers {
        let code = Some(format!("{}{}", area, tier.suffix()));
        match tier {
            CodeTier::Ss400 => suggestion.ss400 = code,
            CodeTier::Ss132 => suggestion.ss132 = code,
            CodeTier::Ss011 => suggestion.ss011 = code,
        }
    }
    suggestion
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_11kv() {
        let s = derive_from_name("PQMS_11KV.APA0042_H3", "11kV");
        assert_eq!(
            s,
            CodeSuggestion {
                area: Some("APA".to_string()),
                ss400: None,
                ss132: Some("APA132".to_string()),
                ss011: Some("APA011".to_string()),
            }
        );
    }

    #[test]
    fn test_derive_no_match_is_empty() {
        assert!(derive_from_name("noareacode", "11kV").is_empty());
        assert!(derive_from_name("", "400kV").is_empty());
        // letters not followed by a digit
        assert!(derive_from_name("PQMS_ABC_X", "380V").is_empty());
    }

    #[test]
    fn test_derive_per_level() {
        let s = derive_from_name("M.KHB0007", "400KV");
        assert_eq!(s.ss400.as_deref(), Some("KHB400"));
        assert!(s.ss132.is_none() && s.ss011.is_none());

        let s = derive_from_name("M.KHB0007", "132kv");
        assert_eq!(s.ss400.as_deref(), Some("KHB400"));
        assert_eq!(s.ss132.as_deref(), Some("KHB132"));
        assert!(s.ss011.is_none());

        let s = derive_from_name("M.KHB0007", "380V");
        assert_eq!(s.ss011.as_deref(), Some("KHB011"));
        assert!(s.ss400.is_none() && s.ss132.is_none());

        let s = derive_from_name("M.KHB0007", "33kV");
        assert_eq!(s.area.as_deref(), Some("KHB"));
        assert!(s.ss400.is_none() && s.ss132.is_none() && s.ss011.is_none());
    }

    #[test]
    fn test_leftmost_match_wins() {
        assert_eq!(extract_area("ABCD1"), Some("BCD"));
        assert_eq!(extract_area("XYZ1_APA0042"), Some("XYZ"));
        assert_eq!(extract_area("abc1"), None);
    }

    #[test]
    fn test_fill_empty_never_overwrites() {
        let mut meter = Meter::new("m1", "PQMS_11KV.APA0042_H3", "11kV")
            .with_code(CodeTier::Ss132, "OLD132")
            .with_code(CodeTier::Ss011, "  ");

        let suggestion = derive_from_name(&meter.meter_code, &meter.voltage_level);
        let filled = suggestion.fill_empty(&mut meter);

        assert_eq!(filled, vec!["area", "ss011"]);
        assert_eq!(meter.area.as_deref(), Some("APA"));
        assert_eq!(meter.ss132.as_deref(), Some("OLD132"));
        assert_eq!(meter.ss011.as_deref(), Some("APA011"));
        assert!(meter.ss400.is_none());
    }

    #[test]
    fn test_fill_empty_with_empty_suggestion() {
        let mut meter = Meter::new("m1", "noareacode", "11kV");
        let before = meter.clone();
        assert!(CodeSuggestion::default().fill_empty(&mut meter).is_empty());
        assert_eq!(meter, before);
    }
}
