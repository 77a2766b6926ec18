//! Integration tests for regimen-rules
//!
//! These tests load rule sets from TOML and evaluate them against full
//! histories.

use regimen_core::EvaluationResult;
use regimen_domain::{
    DrugType, PartialDate, StopReason, Treatment, TreatmentCategory, TreatmentHistoryEntry,
    TreatmentStage,
};
use regimen_rules::{RuleRegistry, RulesError};

const RULES: &str = r#"
reference_date = { year = 2024, month = 6 }

[[rules]]
name = "progressed_on_platinum"
rule = "progressed_on_treatment_within_months"
months = 6
predicate = { categories = ["CHEMOTHERAPY"], types = ["PLATINUM_COMPOUND"] }

[[rules]]
name = "two_prior_lines"
rule = "has_had_minimum_lines"
threshold = 2

[[rules]]
name = "prior_anti_pd1"
rule = "has_had_treatment"
predicate = { categories = ["IMMUNOTHERAPY"], types = ["ANTI_PD1"] }

[[rules]]
name = "four_platinum_cycles"
rule = "has_had_treatment_with_minimum_cycles"
min_cycles = 4
predicate = { types = ["PLATINUM_COMPOUND"] }

[[rules]]
name = "only_chemotherapy"
rule = "has_only_had_systemic_treatments"
predicate = { categories = ["CHEMOTHERAPY"] }
enabled = false
"#;

fn carboplatin() -> Treatment {
    Treatment::new("CARBOPLATIN", TreatmentCategory::Chemotherapy)
        .with_type(DrugType::PlatinumCompound)
}

fn pembrolizumab() -> Treatment {
    Treatment::new("PEMBROLIZUMAB", TreatmentCategory::Immunotherapy).with_type(DrugType::AntiPd1)
}

fn recent_platinum() -> TreatmentHistoryEntry {
    TreatmentHistoryEntry::new(vec![carboplatin()])
        .with_start(PartialDate::year_month(2024, 4))
        .with_cycles(4)
}

#[test]
fn test_progression_needs_a_stop_reason() {
    let registry = RuleRegistry::from_toml(RULES).unwrap();

    let progressed = vec![recent_platinum().with_stop_reason(StopReason::ProgressiveDisease)];
    assert_eq!(
        registry.evaluate("progressed_on_platinum", &progressed).unwrap().result,
        EvaluationResult::Pass
    );

    let unknown = vec![recent_platinum()];
    assert_eq!(
        registry.evaluate("progressed_on_platinum", &unknown).unwrap().result,
        EvaluationResult::Undetermined
    );
}

#[test]
fn test_full_report() {
    let registry = RuleRegistry::from_toml(RULES).unwrap();
    let history = vec![
        TreatmentHistoryEntry::new(vec![pembrolizumab()])
            .with_start(PartialDate::year_month(2022, 3))
            .with_stop(PartialDate::year_month(2023, 1)),
        recent_platinum().with_stop_reason(StopReason::ProgressiveDisease),
    ];

    let report = registry.evaluate_all(&history);
    assert_eq!(report.len(), 5);
    assert_eq!(report.result("progressed_on_platinum"), Some(EvaluationResult::Pass));
    assert_eq!(report.result("two_prior_lines"), Some(EvaluationResult::Pass));
    assert_eq!(report.result("prior_anti_pd1"), Some(EvaluationResult::Pass));
    assert_eq!(report.result("four_platinum_cycles"), Some(EvaluationResult::Pass));
    assert_eq!(report.result("only_chemotherapy"), Some(EvaluationResult::NotEvaluated));
    assert!(report.summary().contains("PASS: 4"));
}

#[test]
fn test_undisclosed_trial_is_never_a_failure() {
    let registry = RuleRegistry::from_toml(RULES).unwrap();
    let history = vec![
        TreatmentHistoryEntry::undisclosed_trial(Some("BLINDED-2".to_string()))
            .with_start(PartialDate::year(2023)),
    ];

    let report = registry.evaluate_all(&history);
    assert_eq!(report.result("prior_anti_pd1"), Some(EvaluationResult::Undetermined));
    assert_eq!(report.result("two_prior_lines"), Some(EvaluationResult::Fail));
}

#[test]
fn test_stage_specific_progression() {
    let registry = RuleRegistry::from_toml(RULES).unwrap();
    let history = vec![TreatmentHistoryEntry::new(vec![pembrolizumab()])
        .with_start(PartialDate::year_month(2023, 9))
        .with_switch_to(
            TreatmentStage::new(carboplatin())
                .with_start(PartialDate::year_month(2024, 2))
                .with_cycles(2),
        )
        .with_stop(PartialDate::year_month(2024, 5))
        .with_stop_reason(StopReason::ProgressiveDisease)];

    let report = registry.evaluate_all(&history);
    assert_eq!(report.result("progressed_on_platinum"), Some(EvaluationResult::Pass));
    assert_eq!(report.result("four_platinum_cycles"), Some(EvaluationResult::Fail));
}

#[test]
fn test_rule_without_criteria_fails_at_load() {
    let result = RuleRegistry::from_toml(
        r#"
        reference_date = { year = 2024 }

        [[rules]]
        name = "anything"
        rule = "has_had_treatment"
        predicate = { categories = [], types = [], names = [] }
        "#,
    );
    assert!(matches!(result, Err(RulesError::Config(_))));
}

#[test]
fn test_unknown_rule_kind_fails_at_load() {
    let result = RuleRegistry::from_toml(
        r#"
        reference_date = { year = 2024 }

        [[rules]]
        name = "mystery"
        rule = "has_had_everything"
        "#,
    );
    assert!(matches!(result, Err(RulesError::Config(_))));
}
