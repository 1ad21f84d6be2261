//! Core domain model for NAP (Name, Address, Phone) auditing.
//!
//! This crate defines the fundamental types used throughout the system:
//! - `InputRecord`: The business identity as known internally
//! - `LookupResult`: The external place lookup's best match
//! - `LookupOutcome`: Found / no-results / failed, tagged per record
//! - `FieldMatchOutcome`: Per-field match decision with similarity
//! - `Verdict`: The final graded NAP consistency classification

use serde::{Deserialize, Serialize};

/// A business identity as recorded internally.
///
/// The address is already composed from its source components
/// (street, city, zip, country) joined with ", ". Built once per
/// source row and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRecord {
    /// Business name
    pub name: String,

    /// Raw phone string, any format
    pub phone: String,

    /// Comma-joined full address
    pub address: String,
}

impl InputRecord {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }

    /// The query string sent to the place lookup: name and address
    /// concatenated.
    pub fn lookup_query(&self) -> String {
        format!("{} {}", self.name, self.address)
    }
}

/// The top result resolved by the external place lookup.
///
/// Phone and address come from the detail fetch and may be empty when
/// the provider has no data for them; that is still a result, distinct
/// from the zero-results case.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupResult {
    /// Place name as the provider reports it
    #[serde(default)]
    pub name: String,

    /// Formatted phone number, may be empty
    #[serde(default)]
    pub phone: String,

    /// Formatted address, may be empty
    #[serde(default)]
    pub address: String,
}

impl LookupResult {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            address: address.into(),
        }
    }
}

/// What the lookup produced for one record.
///
/// The verdict engine consumes this tagged form instead of relying on
/// error propagation: zero results and lookup failures are ordinary
/// values that classify to their own verdicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum LookupOutcome {
    /// The lookup resolved a best-matching place
    Found(LookupResult),

    /// The lookup ran and returned nothing
    NoResults,

    /// The lookup (or its detail fetch) failed; carries the error detail
    Failed(String),
}

impl LookupOutcome {
    /// Fold a fallible lookup call into the tagged form consumed by the
    /// verdict engine.
    pub fn from_result<E: std::fmt::Display>(result: Result<Option<LookupResult>, E>) -> Self {
        match result {
            Ok(Some(found)) => Self::Found(found),
            Ok(None) => Self::NoResults,
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

/// Per-field match result: a boolean decision plus the similarity
/// signal that backed it, in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldMatchOutcome {
    pub matched: bool,
    pub similarity: f64,
}

impl FieldMatchOutcome {
    pub fn new(matched: bool, similarity: f64) -> Self {
        Self {
            matched,
            similarity,
        }
    }

    /// The zero outcome used when a field cannot be compared.
    pub fn no_match() -> Self {
        Self {
            matched: false,
            similarity: 0.0,
        }
    }
}

/// Top-level category of a verdict, used for batch tallying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VerdictCategory {
    Success,
    Partial,
    Fail,
    Error,
}

impl VerdictCategory {
    /// The category word as it appears in verdict labels.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Partial => "PARTIAL",
            Self::Fail => "FAIL",
            Self::Error => "ERROR",
        }
    }
}

/// The final NAP consistency classification for one record.
///
/// Exactly one variant per record; the variants are mutually exclusive
/// and ordered by the engine's first-applicable-rule policy. The
/// lookup-failed variant carries the error detail for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum Verdict {
    /// Name, address, and phone all matched
    AllMatch,

    /// Name and address matched; phone missing or different
    NameAddressMatch,

    /// Name and phone matched; address different
    NamePhoneMatch,

    /// Address and phone matched; name different
    AddressPhoneMatch,

    /// Only the name matched
    NameOnlyMatch,

    /// No boolean match fired, but similarity scores were near-exact
    HighSimilarity,

    /// Significant inconsistencies across the NAP fields
    Inconsistent,

    /// The lookup returned zero results
    NoResults,

    /// The lookup failed; carries the error detail
    LookupFailed(String),
}

impl Verdict {
    /// Top-level category for aggregation. Classification is by enum
    /// tag, never by inspecting display text.
    pub fn category(&self) -> VerdictCategory {
        match self {
            Self::AllMatch | Self::NameAddressMatch | Self::HighSimilarity => {
                VerdictCategory::Success
            }
            Self::NamePhoneMatch | Self::AddressPhoneMatch | Self::NameOnlyMatch => {
                VerdictCategory::Partial
            }
            Self::Inconsistent | Self::NoResults => VerdictCategory::Fail,
            Self::LookupFailed(_) => VerdictCategory::Error,
        }
    }

    /// The display label written to the output sink.
    pub fn label(&self) -> String {
        match self {
            Self::AllMatch => "SUCCESS - All NAP data matches".to_string(),
            Self::NameAddressMatch => {
                "SUCCESS - Name & Address match (Phone missing/different)".to_string()
            }
            Self::NamePhoneMatch => "PARTIAL - Name & Phone match (Address different)".to_string(),
            Self::AddressPhoneMatch => {
                "PARTIAL - Address & Phone match (Name different)".to_string()
            }
            Self::NameOnlyMatch => "PARTIAL - Only Name matches".to_string(),
            Self::HighSimilarity => "SUCCESS - 95%+ similarity match".to_string(),
            Self::Inconsistent => "FAIL - Significant NAP inconsistencies".to_string(),
            Self::NoResults => "FAIL - No results found".to_string(),
            Self::LookupFailed(detail) => format!("ERROR - {}", detail),
        }
    }

    /// Whether this verdict came from a failed lookup, in which case
    /// the per-field outcomes were never computed.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::LookupFailed(_))
    }
}

/// The full assessment of one record: the three field outcomes and the
/// verdict they classify to.
///
/// For the no-results and lookup-failed cases the field outcomes are
/// zeroed, since there is nothing to compare against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NapAssessment {
    pub name: FieldMatchOutcome,
    pub address: FieldMatchOutcome,
    pub phone: FieldMatchOutcome,
    pub verdict: Verdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_categories() {
        assert_eq!(Verdict::AllMatch.category(), VerdictCategory::Success);
        assert_eq!(
            Verdict::NameAddressMatch.category(),
            VerdictCategory::Success
        );
        assert_eq!(Verdict::HighSimilarity.category(), VerdictCategory::Success);
        assert_eq!(Verdict::NameOnlyMatch.category(), VerdictCategory::Partial);
        assert_eq!(Verdict::NoResults.category(), VerdictCategory::Fail);
        assert_eq!(Verdict::Inconsistent.category(), VerdictCategory::Fail);
        assert_eq!(
            Verdict::LookupFailed("timeout".into()).category(),
            VerdictCategory::Error
        );
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::NoResults.label(), "FAIL - No results found");
        assert_eq!(
            Verdict::LookupFailed("connection refused".into()).label(),
            "ERROR - connection refused"
        );
        assert_eq!(
            Verdict::HighSimilarity.label(),
            "SUCCESS - 95%+ similarity match"
        );
    }

    #[test]
    fn test_lookup_outcome_from_result() {
        let found: Result<Option<LookupResult>, std::fmt::Error> =
            Ok(Some(LookupResult::new("Acme", "", "")));
        assert!(matches!(
            LookupOutcome::from_result(found),
            LookupOutcome::Found(_)
        ));

        let none: Result<Option<LookupResult>, std::fmt::Error> = Ok(None);
        assert!(matches!(
            LookupOutcome::from_result(none),
            LookupOutcome::NoResults
        ));
    }

    #[test]
    fn test_lookup_query_concatenation() {
        let record = InputRecord::new("Acme Inc", "5551234567", "1 A St, Town, 00000, USA");
        assert_eq!(record.lookup_query(), "Acme Inc 1 A St, Town, 00000, USA");
    }

    #[test]
    fn test_record_serialization() {
        let record = InputRecord::new("Acme Inc", "555", "1 A St");
        let json = serde_json::to_string(&record).unwrap();
        let parsed: InputRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "Acme Inc");
        assert_eq!(parsed.address, "1 A St");
    }
}
