//! Field matching and verdict classification for NAP records.
//!
//! Takes one internal record and one lookup outcome and produces the
//! three per-field match decisions plus the single graded verdict.

use napaudit_features::{normalize_phone, normalize_text, similarity_ratio};
use napaudit_model::{
    FieldMatchOutcome, InputRecord, LookupOutcome, LookupResult, NapAssessment, Verdict,
};
use serde::{Deserialize, Serialize};

/// Thresholds for the field matchers and the high-similarity override.
///
/// The defaults are the calibrated constants the verdict boundaries are
/// defined by; the whole pipeline runs on `MatchConfig::default()`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum name similarity for a name match
    pub name_threshold: f64,
    /// Minimum whole-string address similarity for an address match
    pub address_threshold: f64,
    /// Minimum key-component ratio for an address match
    pub component_ratio_threshold: f64,
    /// Per-field similarity floor for the near-exact override verdict
    pub high_similarity_threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            name_threshold: 0.80,
            address_threshold: 0.85,
            component_ratio_threshold: 0.7,
            high_similarity_threshold: 0.95,
        }
    }
}

/// Match two business names.
///
/// A name matches when the similarity of the normalized strings reaches
/// the threshold, or when one normalized name contains the other
/// ("ABC Corp" vs "ABC Corporation"). The reported similarity is always
/// the raw ratio, so a containment match can report `matched = true`
/// alongside a low score; that permissiveness for name variants is
/// deliberate.
pub fn match_name(input_name: &str, api_name: &str, threshold: f64) -> FieldMatchOutcome {
    if input_name.is_empty() || api_name.is_empty() {
        return FieldMatchOutcome::no_match();
    }

    let norm_input = normalize_text(input_name);
    let norm_api = normalize_text(api_name);

    let similarity = similarity_ratio(&norm_input, &norm_api);
    let contains = norm_api.contains(&norm_input) || norm_input.contains(&norm_api);

    FieldMatchOutcome::new(similarity >= threshold || contains, similarity)
}

/// Match two addresses.
///
/// Combines whole-string similarity with a key-component check: every
/// input word longer than 2 characters counts as a key match when it
/// appears as a substring of any candidate word, and the component
/// ratio is key matches over the total input word count. Either signal
/// reaching its threshold matches; the reported similarity is the
/// better of the two.
pub fn match_address(
    input_address: &str,
    api_address: &str,
    threshold: f64,
    component_ratio_threshold: f64,
) -> FieldMatchOutcome {
    if input_address.is_empty() || api_address.is_empty() {
        return FieldMatchOutcome::no_match();
    }

    let norm_input = normalize_text(input_address);
    let norm_api = normalize_text(api_address);

    let similarity = similarity_ratio(&norm_input, &norm_api);

    let input_parts: Vec<&str> = norm_input.split_whitespace().collect();
    let api_parts: Vec<&str> = norm_api.split_whitespace().collect();

    // Short words (2 chars or fewer) never count as key matches, but
    // they stay in the denominator.
    let key_matches = input_parts
        .iter()
        .filter(|part| {
            part.chars().count() > 2 && api_parts.iter().any(|api_part| api_part.contains(*part))
        })
        .count();

    let component_ratio = if input_parts.is_empty() {
        0.0
    } else {
        key_matches as f64 / input_parts.len().max(1) as f64
    };

    FieldMatchOutcome::new(
        similarity >= threshold || component_ratio >= component_ratio_threshold,
        similarity.max(component_ratio),
    )
}

/// Match two phone numbers.
///
/// Tiered rather than continuous: numeric identity is the signal, not
/// fuzzy closeness. Exact digit equality scores 1.0; one number being a
/// substring of the other (partial numbers, short local forms) scores
/// 0.9; everything else is no match at 0.0.
pub fn match_phone(input_phone: &str, api_phone: &str) -> FieldMatchOutcome {
    let norm_input = normalize_phone(input_phone);
    let norm_api = normalize_phone(api_phone);

    if norm_input.is_empty() || norm_api.is_empty() {
        return FieldMatchOutcome::no_match();
    }

    if norm_input == norm_api {
        return FieldMatchOutcome::new(true, 1.0);
    }

    if norm_input.contains(&norm_api) || norm_api.contains(&norm_input) {
        return FieldMatchOutcome::new(true, 0.9);
    }

    FieldMatchOutcome::no_match()
}

/// Classify three field outcomes into one verdict.
///
/// First applicable rule wins; the order is the tie-break policy and
/// must not be reordered. The high-similarity override only runs after
/// every boolean-match rule has failed.
pub fn classify(
    name: &FieldMatchOutcome,
    address: &FieldMatchOutcome,
    phone: &FieldMatchOutcome,
    config: &MatchConfig,
) -> Verdict {
    let high = config.high_similarity_threshold;

    if name.matched && address.matched && phone.matched {
        Verdict::AllMatch
    } else if name.matched && address.matched {
        Verdict::NameAddressMatch
    } else if name.matched && phone.matched {
        Verdict::NamePhoneMatch
    } else if address.matched && phone.matched {
        Verdict::AddressPhoneMatch
    } else if name.matched {
        Verdict::NameOnlyMatch
    } else if (name.similarity >= high && address.similarity >= high)
        || (name.similarity >= high && phone.similarity >= high)
    {
        Verdict::HighSimilarity
    } else {
        Verdict::Inconsistent
    }
}

/// Assess one record against its lookup outcome.
///
/// The no-results and failed cases short-circuit with zeroed field
/// outcomes; the matchers only run when a result exists.
pub fn evaluate(
    record: &InputRecord,
    lookup: &LookupOutcome,
    config: &MatchConfig,
) -> NapAssessment {
    match lookup {
        LookupOutcome::NoResults => NapAssessment {
            name: FieldMatchOutcome::no_match(),
            address: FieldMatchOutcome::no_match(),
            phone: FieldMatchOutcome::no_match(),
            verdict: Verdict::NoResults,
        },
        LookupOutcome::Failed(detail) => NapAssessment {
            name: FieldMatchOutcome::no_match(),
            address: FieldMatchOutcome::no_match(),
            phone: FieldMatchOutcome::no_match(),
            verdict: Verdict::LookupFailed(detail.clone()),
        },
        LookupOutcome::Found(result) => assess_found(record, result, config),
    }
}

fn assess_found(
    record: &InputRecord,
    result: &LookupResult,
    config: &MatchConfig,
) -> NapAssessment {
    let name = match_name(&record.name, &result.name, config.name_threshold);
    let address = match_address(
        &record.address,
        &result.address,
        config.address_threshold,
        config.component_ratio_threshold,
    );
    let phone = match_phone(&record.phone, &result.phone);

    let verdict = classify(&name, &address, &phone, config);

    NapAssessment {
        name,
        address,
        phone,
        verdict,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> MatchConfig {
        MatchConfig::default()
    }

    #[test]
    fn test_name_containment_match() {
        let outcome = match_name("ABC Corp", "ABC Corporation", 0.80);
        assert!(outcome.matched);
        assert!(outcome.similarity > 0.0);
    }

    #[test]
    fn test_name_empty_inputs() {
        assert_eq!(match_name("", "Acme", 0.80), FieldMatchOutcome::no_match());
        assert_eq!(match_name("Acme", "", 0.80), FieldMatchOutcome::no_match());
    }

    #[test]
    fn test_name_containment_reports_raw_similarity() {
        // Contained in the longer name, so it matches even though the
        // raw ratio stays far below the threshold.
        let outcome = match_name("Hub", "Hub Plumbing & Mechanical of Manhattan", 0.80);
        assert!(outcome.matched);
        assert!(outcome.similarity < 0.80);
    }

    #[test]
    fn test_address_key_component_branch() {
        // Whole-string similarity stays below 0.85; the component
        // ratio (5 of 6 input words found, "st" too short to count)
        // carries the match and is the reported score.
        let outcome = match_address(
            "123 Main St, Springfield, 62704, USA",
            "Anytown Plaza Building 7, 123 Main St, Springfield, IL 62704, USA",
            0.85,
            0.7,
        );
        assert!(outcome.matched);
        assert!(outcome.similarity < 0.85);
        assert!((outcome.similarity - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_address_similarity_branch() {
        let outcome = match_address(
            "470 Commerce Boulevard, Harrisburg, 17101, USA",
            "470 Commerce Blvd, Harrisburg, PA 17101, USA",
            0.85,
            0.7,
        );
        assert!(outcome.matched);
        assert!(outcome.similarity >= 0.85);
    }

    #[test]
    fn test_address_mismatch() {
        let outcome = match_address(
            "123 Main St, Springfield, 62704, USA",
            "987 Ocean Dr, Miami, FL 33139",
            0.85,
            0.7,
        );
        assert!(!outcome.matched);
    }

    #[test]
    fn test_address_empty_inputs() {
        assert_eq!(
            match_address("", "987 Ocean Dr", 0.85, 0.7),
            FieldMatchOutcome::no_match()
        );
        assert_eq!(
            match_address("123 Main St", "", 0.85, 0.7),
            FieldMatchOutcome::no_match()
        );
    }

    #[test]
    fn test_phone_exact_across_formats() {
        let outcome = match_phone("555-123-4567", "(555) 123-4567");
        assert_eq!(outcome, FieldMatchOutcome::new(true, 1.0));
    }

    #[test]
    fn test_phone_containment_tier() {
        // The provider lists only the local seven digits; containment
        // in the full national number scores the 0.9 tier.
        let outcome = match_phone("1 (555) 123-4567", "123-4567");
        assert_eq!(outcome, FieldMatchOutcome::new(true, 0.9));
    }

    #[test]
    fn test_phone_no_fuzzy_scale() {
        let outcome = match_phone("5551234567", "5551234568");
        assert_eq!(outcome, FieldMatchOutcome::no_match());
    }

    #[test]
    fn test_phone_empty_after_normalization() {
        assert_eq!(
            match_phone("ext only", "5551234567"),
            FieldMatchOutcome::no_match()
        );
    }

    #[test]
    fn test_classify_all_match() {
        let yes = FieldMatchOutcome::new(true, 1.0);
        assert_eq!(classify(&yes, &yes, &yes, &cfg()), Verdict::AllMatch);
    }

    #[test]
    fn test_classify_pair_rules_in_order() {
        let yes = FieldMatchOutcome::new(true, 0.9);
        let no = FieldMatchOutcome::new(false, 0.3);

        assert_eq!(classify(&yes, &yes, &no, &cfg()), Verdict::NameAddressMatch);
        assert_eq!(classify(&yes, &no, &yes, &cfg()), Verdict::NamePhoneMatch);
        assert_eq!(classify(&no, &yes, &yes, &cfg()), Verdict::AddressPhoneMatch);
        assert_eq!(classify(&yes, &no, &no, &cfg()), Verdict::NameOnlyMatch);
    }

    #[test]
    fn test_classify_high_similarity_override() {
        // No boolean match fired but two fields are near-exact.
        let name = FieldMatchOutcome::new(false, 0.96);
        let address = FieldMatchOutcome::new(false, 0.97);
        let phone = FieldMatchOutcome::new(false, 0.0);
        assert_eq!(
            classify(&name, &address, &phone, &cfg()),
            Verdict::HighSimilarity
        );
    }

    #[test]
    fn test_classify_rule_order_all_match_beats_override() {
        // Both the all-match rule and the 95% override hold
        // independently; the earlier rule must win.
        let nearly = FieldMatchOutcome::new(true, 0.99);
        assert_eq!(
            classify(&nearly, &nearly, &nearly, &cfg()),
            Verdict::AllMatch
        );
    }

    #[test]
    fn test_classify_inconsistent() {
        let no = FieldMatchOutcome::new(false, 0.2);
        assert_eq!(classify(&no, &no, &no, &cfg()), Verdict::Inconsistent);
    }

    #[test]
    fn test_evaluate_end_to_end_success() {
        let record = InputRecord::new("Acme Inc", "5551234567", "1 A St, Town, 00000, USA");
        let lookup = LookupOutcome::Found(LookupResult::new(
            "Acme Inc",
            "(555) 123-4567",
            "1 A St., Town 00000, USA",
        ));

        let assessment = evaluate(&record, &lookup, &cfg());
        assert!(assessment.name.matched);
        assert!(assessment.address.matched);
        assert!(assessment.phone.matched);
        assert_eq!(assessment.verdict, Verdict::AllMatch);
    }

    #[test]
    fn test_evaluate_no_results() {
        let record = InputRecord::new("Acme Inc", "5551234567", "1 A St");
        let assessment = evaluate(&record, &LookupOutcome::NoResults, &cfg());

        assert_eq!(assessment.verdict, Verdict::NoResults);
        assert_eq!(assessment.name.similarity, 0.0);
        assert_eq!(assessment.address.similarity, 0.0);
        assert_eq!(assessment.phone.similarity, 0.0);
    }

    #[test]
    fn test_evaluate_lookup_failed_short_circuits() {
        let record = InputRecord::new("Acme Inc", "5551234567", "1 A St");
        let lookup = LookupOutcome::Failed("REQUEST_DENIED: bad key".into());
        let assessment = evaluate(&record, &lookup, &cfg());

        assert_eq!(
            assessment.verdict,
            Verdict::LookupFailed("REQUEST_DENIED: bad key".into())
        );
        assert_eq!(assessment.name, FieldMatchOutcome::no_match());
    }

    #[test]
    fn test_thresholds_are_calibrated_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.name_threshold, 0.80);
        assert_eq!(config.address_threshold, 0.85);
        assert_eq!(config.component_ratio_threshold, 0.7);
        assert_eq!(config.high_similarity_threshold, 0.95);
    }
}
