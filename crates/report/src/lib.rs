//! Result rendering and batch aggregation for NAP audits.
//!
//! Converts per-record assessments into the tabular output rows the
//! audit writes, and tallies verdicts into the batch summary printed
//! after a run.

use napaudit_model::{InputRecord, LookupOutcome, NapAssessment, Verdict, VerdictCategory};
use serde::{Deserialize, Serialize};

/// One output row per audited record.
///
/// Field names follow the audit sheet's column headers. Match cells
/// are "Yes"/"No", or "Error" when the lookup failed; similarity
/// scores are rounded to 3 decimal places; API cells are empty when
/// there was no result to show.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRow {
    #[serde(rename = "Input Business Name")]
    pub input_name: String,

    #[serde(rename = "Input Phone")]
    pub input_phone: String,

    #[serde(rename = "Input Address")]
    pub input_address: String,

    #[serde(rename = "API Name")]
    pub api_name: String,

    #[serde(rename = "API Phone")]
    pub api_phone: String,

    #[serde(rename = "API Address")]
    pub api_address: String,

    #[serde(rename = "Name Match")]
    pub name_match: String,

    #[serde(rename = "Address Match")]
    pub address_match: String,

    #[serde(rename = "Phone Match")]
    pub phone_match: String,

    #[serde(rename = "Name Similarity")]
    pub name_similarity: f64,

    #[serde(rename = "Address Similarity")]
    pub address_similarity: f64,

    #[serde(rename = "Phone Similarity")]
    pub phone_similarity: f64,

    #[serde(rename = "Overall NAP Status")]
    pub status: String,
}

impl AuditRow {
    /// Build the output row for one record.
    pub fn new(record: &InputRecord, lookup: &LookupOutcome, assessment: &NapAssessment) -> Self {
        let (api_name, api_phone, api_address) = match lookup {
            LookupOutcome::Found(result) => (
                result.name.clone(),
                result.phone.clone(),
                result.address.clone(),
            ),
            LookupOutcome::NoResults | LookupOutcome::Failed(_) => {
                (String::new(), String::new(), String::new())
            }
        };

        let is_error = assessment.verdict.is_error();

        Self {
            input_name: record.name.clone(),
            input_phone: record.phone.clone(),
            input_address: record.address.clone(),
            api_name,
            api_phone,
            api_address,
            name_match: match_cell(assessment.name.matched, is_error),
            address_match: match_cell(assessment.address.matched, is_error),
            phone_match: match_cell(assessment.phone.matched, is_error),
            name_similarity: round3(assessment.name.similarity),
            address_similarity: round3(assessment.address.similarity),
            phone_similarity: round3(assessment.phone.similarity),
            status: assessment.verdict.label(),
        }
    }
}

/// The "Yes"/"No"/"Error" cell value for one field.
///
/// "Error" is a distinct sentinel: the field was never compared because
/// the lookup failed, which is not the same as a comparison that said
/// no.
fn match_cell(matched: bool, is_error: bool) -> String {
    if is_error {
        "Error".to_string()
    } else if matched {
        "Yes".to_string()
    } else {
        "No".to_string()
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Running tally of verdicts across a batch.
///
/// Classified by `VerdictCategory`, never by inspecting label text.
/// Purely additive; a recorded verdict is never reclassified. Always
/// recomputable from the verdict sequence via [`summarize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub success: usize,
    pub partial: usize,
    pub fail: usize,
    pub error: usize,
    pub total: usize,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally one completed record.
    pub fn record(&mut self, verdict: &Verdict) {
        match verdict.category() {
            VerdictCategory::Success => self.success += 1,
            VerdictCategory::Partial => self.partial += 1,
            VerdictCategory::Fail => self.fail += 1,
            VerdictCategory::Error => self.error += 1,
        }
        self.total += 1;
    }

    /// The trailing summary block printed after a batch.
    pub fn render(&self) -> String {
        format!(
            "SUMMARY RESULTS:\n   Success: {}\n   Partial: {}\n   Failed: {}\n   Errors: {}\n   Total: {}",
            self.success, self.partial, self.fail, self.error, self.total
        )
    }
}

/// Tally a whole verdict sequence at once.
pub fn summarize<'a>(verdicts: impl IntoIterator<Item = &'a Verdict>) -> BatchSummary {
    let mut summary = BatchSummary::new();
    for verdict in verdicts {
        summary.record(verdict);
    }
    summary
}
