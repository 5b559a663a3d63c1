//! Hierarchy completeness classification
//!
//! A meter is complete when its populated code fields are exactly the set
//! its voltage level expects. Only complete meters are placed in the
//! forest; everything else lands in the orphan bucket.

use serde::{Deserialize, Serialize};

use crate::types::{CodeTier, ExpectedFields, Meter};

pub const REASON_UNKNOWN_LEVEL: &str = "unknown voltage level";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyClassification {
    pub is_complete: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_or_extra_reason: Option<String>,
    pub expected_fields: ExpectedFields,
}

impl HierarchyClassification {
    fn complete(expected_fields: ExpectedFields) -> Self {
        Self {
            is_complete: true,
            missing_or_extra_reason: None,
            expected_fields,
        }
    }

    fn incomplete(expected_fields: ExpectedFields, reason: impl Into<String>) -> Self {
        Self {
            is_complete: false,
            missing_or_extra_reason: Some(reason.into()),
            expected_fields,
        }
    }
}

/// Classify a meter against the expected-field table
///
/// | level | SS400 | SS132 | SS011 |
/// |-------|-------|-------|-------|
/// | 400kV | yes   | -     | -     |
/// | 132kV | -     | yes   | -     |
/// | 11kV  | -     | yes   | yes   |
/// | 380V  | -     | -     | yes   |
///
/// A missing field is reported before an unexpected one; within each kind
/// the first in tier order wins.
pub fn classify(meter: &Meter) -> HierarchyClassification {
    let Some(level) = meter.voltage() else {
        return HierarchyClassification::incomplete(
            ExpectedFields::default(),
            REASON_UNKNOWN_LEVEL,
        );
    };

    let expected = level.expected_fields();
    let actual = meter.populated_fields();

    if let Some(tier) = CodeTier::ALL
        .into_iter()
        .find(|t| expected.get(*t) && !actual.get(*t))
    {
        return HierarchyClassification::incomplete(
            expected,
            format!("missing {} code", tier.label()),
        );
    }

    if let Some(tier) = CodeTier::ALL
        .into_iter()
        .find(|t| !expected.get(*t) && actual.get(*t))
    {
        return HierarchyClassification::incomplete(
            expected,
            format!("unexpected {} code", tier.label()),
        );
    }

    HierarchyClassification::complete(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meter(level: &str, ss400: bool, ss132: bool, ss011: bool) -> Meter {
        let mut m = Meter::new("m", "PQMS.APA0001", level);
        if ss400 {
            m.ss400 = Some("APA400".into());
        }
        if ss132 {
            m.ss132 = Some("APA132".into());
        }
        if ss011 {
            m.ss011 = Some("APA011".into());
        }
        m
    }

    /// Exact code set each level expects, as (ss400, ss132, ss011)
    const EXPECTED: [(&str, (bool, bool, bool)); 4] = [
        ("400kV", (true, false, false)),
        ("132kV", (false, true, false)),
        ("11kV", (false, true, true)),
        ("380V", (false, false, true)),
    ];

    #[test]
    fn test_complete_only_for_exact_expected_set() {
        for (level, (e400, e132, e011)) in EXPECTED {
            let expected = ExpectedFields::new(e400, e132, e011);
            for mask in 0u8..8 {
                let (a, b, c) = (mask & 4 != 0, mask & 2 != 0, mask & 1 != 0);
                let result = classify(&meter(level, a, b, c));
                let exact = (a, b, c) == (e400, e132, e011);
                assert_eq!(result.is_complete, exact, "{} {:03b}", level, mask);
                assert_eq!(result.expected_fields, expected);
                assert_eq!(result.missing_or_extra_reason.is_none(), exact);
            }
        }
    }

    #[test]
    fn test_expected_fields_by_level() {
        let m = meter("11kV", false, true, true);
        assert_eq!(
            classify(&m).expected_fields,
            ExpectedFields {
                ss400: false,
                ss132: true,
                ss011: true,
            }
        );
        let load = meter("380V", false, true, true);
        assert_eq!(
            classify(&load).missing_or_extra_reason.as_deref(),
            Some("unexpected SS132 code")
        );
    }

    #[test]
    fn test_unknown_level() {
        for raw in ["", "33kV", "high"] {
            let result = classify(&meter(raw, true, false, false));
            assert!(!result.is_complete);
            assert_eq!(
                result.missing_or_extra_reason.as_deref(),
                Some(REASON_UNKNOWN_LEVEL)
            );
            assert_eq!(result.expected_fields, ExpectedFields::default());
        }
    }

    #[test]
    fn test_missing_reported_before_extra() {
        // 11kV with SS400 instead of SS011: missing SS011 wins over extra SS400
        let result = classify(&meter("11kV", true, true, false));
        assert_eq!(
            result.missing_or_extra_reason.as_deref(),
            Some("missing SS011 code")
        );

        let result = classify(&meter("11kV", false, false, false));
        assert_eq!(
            result.missing_or_extra_reason.as_deref(),
            Some("missing SS132 code")
        );

        let result = classify(&meter("380V", false, true, true));
        assert_eq!(
            result.missing_or_extra_reason.as_deref(),
            Some("unexpected SS132 code")
        );
    }

    #[test]
    fn test_m4_is_incomplete() {
        let m4 = Meter::new("M4", "PQMS.APA0004", "11kV").with_code(CodeTier::Ss132, "APA132");
        let result = classify(&m4);
        assert!(!result.is_complete);
        assert_eq!(
            result.missing_or_extra_reason.as_deref(),
            Some("missing SS011 code")
        );
    }
}
