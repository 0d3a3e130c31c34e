// ABOUTME: Integration tests for rule-based risk scoring and recommendations
// ABOUTME: Covers label-rule clauses, weighted-threshold bands, reference meals, and batch order
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::meal;
use gdm_meal_risk::config::{RecommendationConfig, RiskBands, WeightedScoringConfig};
use gdm_meal_risk::intelligence::algorithms::LabelClause;
use gdm_meal_risk::intelligence::{
    derive, HighRiskLabelRule, MealRiskEngine, RecommendationGenerator, RiskScorer, ScorerKind,
    WeightedThresholdRule, REFERENCE_MEALS,
};
use gdm_meal_risk::models::{MealNutrients, RiskLevel};

#[test]
fn test_label_rule_first_clause() {
    let input = meal(80.0, 1.0, 20.0, 73.0);
    let derived = derive(&input);

    assert_eq!(HighRiskLabelRule.label(&input, &derived), 1);
    assert_eq!(
        HighRiskLabelRule.matched_clause(&input, &derived),
        Some(LabelClause::HighGiCarbHeavyLowFiber)
    );
}

#[test]
fn test_label_rule_no_clause() {
    let input = meal(25.0, 4.0, 3.0, 36.0);
    let derived = derive(&input);

    assert_eq!(HighRiskLabelRule.label(&input, &derived), 0);
    assert_eq!(HighRiskLabelRule.matched_clause(&input, &derived), None);
}

#[test]
fn test_label_rule_load_and_sugar_clauses() {
    // GL = 60 * 40 / 100 = 24, quality = 2 / 40 = 0.05
    let low_quality = meal(40.0, 2.0, 5.0, 60.0);
    assert_eq!(
        HighRiskLabelRule.matched_clause(&low_quality, &derive(&low_quality)),
        Some(LabelClause::HighLoadLowQuality)
    );

    let sugary = meal(20.0, 6.0, 18.0, 75.0);
    assert_eq!(
        HighRiskLabelRule.matched_clause(&sugary, &derive(&sugary)),
        Some(LabelClause::HighGiHighSugar)
    );
}

#[test]
fn test_weighted_score_all_signals() {
    let rule = WeightedThresholdRule::default();
    let input = MealNutrients {
        total_carbs_g: 80.0,
        fiber_g: 1.0,
        glycemic_index: 73.0,
        ..MealNutrients::default()
    };
    let (score, level) = rule.classify(&input, &derive(&input));

    assert!((score - 1.0).abs() < 1e-12);
    assert_eq!(level, RiskLevel::High);
}

#[test]
fn test_weighted_score_no_signals() {
    let rule = WeightedThresholdRule::default();
    let input = MealNutrients {
        total_carbs_g: 30.0,
        fiber_g: 5.0,
        glycemic_index: 55.0,
        ..MealNutrients::default()
    };
    let derived = derive(&input);
    let (score, level) = rule.classify(&input, &derived);

    assert!((derived.glycemic_load - 16.5).abs() < 1e-9);
    assert!(score.abs() < f64::EPSILON);
    assert_eq!(level, RiskLevel::Low);
}

#[test]
fn test_band_boundaries_are_exclusive() {
    let bands = RiskBands::default();
    assert_eq!(bands.level(0.4), RiskLevel::Low);
    assert_eq!(bands.level(0.41), RiskLevel::Moderate);
    assert_eq!(bands.level(0.6), RiskLevel::Moderate);
    assert_eq!(bands.level(0.61), RiskLevel::High);
}

#[test]
fn test_policies_stay_distinct() {
    let label_engine = MealRiskEngine::new(
        RiskScorer::LabelRule(HighRiskLabelRule),
        RecommendationGenerator::default(),
    );
    let weighted_engine = MealRiskEngine::default();

    // Sugary high-GI snack: only the GI weight fires (0.3), but the label rule's
    // sugar clause marks it high risk
    let snack = meal(20.0, 6.0, 18.0, 75.0);
    let weighted = weighted_engine.assess(&snack);
    let labelled = label_engine.assess(&snack);
    assert_eq!(weighted.scorer, ScorerKind::WeightedThreshold);
    assert_eq!(weighted.risk_level, RiskLevel::Low);
    assert_eq!(labelled.scorer, ScorerKind::LabelRule);
    assert_eq!(labelled.risk_level, RiskLevel::High);

    // Fiber-rich high-GI plate: GI, carbs and load fire (0.8), but no label clause does
    let plate = meal(50.0, 6.0, 5.0, 75.0);
    let weighted = weighted_engine.assess(&plate);
    let labelled = label_engine.assess(&plate);
    assert_eq!(weighted.risk_level, RiskLevel::High);
    assert!(!labelled.high_risk);
    assert_eq!(labelled.risk_level, RiskLevel::Low);
}

#[test]
fn test_reference_meals_through_engine() {
    let engine = MealRiskEngine::default();
    for reference in REFERENCE_MEALS {
        let assessment = engine.assess(&reference.nutrients);
        assert_eq!(assessment.risk_level, reference.expected, "{}", reference.name);
        assert!(!assessment.recommendations.is_empty());
    }
}

#[test]
fn test_custom_weights_change_band() {
    let mut config = WeightedScoringConfig::default();
    config.weights.high_glycemic_index = 0.7;
    config.weights.high_glycemic_load = 0.0;
    config.weights.high_carbs = 0.15;
    config.weights.low_fiber = 0.15;
    let rule = WeightedThresholdRule::new(config).unwrap();

    let input = meal(30.0, 5.0, 2.0, 80.0);
    let (score, level) = rule.classify(&input, &derive(&input));
    assert!((score - 0.7).abs() < 1e-12);
    assert_eq!(level, RiskLevel::High);
}

#[test]
fn test_recommendations_ordered_and_idempotent() {
    let generator = RecommendationGenerator::new(RecommendationConfig::default()).unwrap();
    let input = MealNutrients {
        total_carbs_g: 80.0,
        fiber_g: 1.0,
        sugar_g: 20.0,
        protein_g: 5.0,
        fat_g: 2.0,
        saturated_fat_g: 0.5,
        energy_kcal: 380.0,
        glycemic_index: 73.0,
    };

    let first = generator.generate(&input);
    let second = generator.generate(&input);
    assert_eq!(first, second);
    assert_eq!(
        first,
        vec![
            "Consider reducing portion size to lower total carbs",
            "Add more fiber (vegetables, whole grains, legumes)",
            "Choose lower GI alternatives (brown rice instead of white)",
            "Add healthy fats to slow carb absorption (nuts, avocado, olive oil)",
            "Include more protein to stabilize blood sugar",
        ]
    );
}

#[test]
fn test_balanced_meal_gets_single_message() {
    let generator = RecommendationGenerator::default();
    let input = MealNutrients {
        total_carbs_g: 35.0,
        fiber_g: 8.0,
        sugar_g: 4.0,
        protein_g: 25.0,
        fat_g: 12.0,
        saturated_fat_g: 3.0,
        energy_kcal: 420.0,
        glycemic_index: 45.0,
    };

    assert_eq!(generator.generate(&input), vec!["This meal looks well-balanced!"]);
}

#[test]
fn test_batch_preserves_input_order() {
    let engine = MealRiskEngine::default();
    let meals: Vec<MealNutrients> = (0..64_u32)
        .map(|i| meal(f64::from(i * 2), 1.0 + f64::from(i % 5), 3.0, 30.0 + f64::from(i)))
        .collect();

    let batch = engine.assess_batch(&meals);
    assert_eq!(batch.len(), meals.len());
    for (input, assessment) in meals.iter().zip(&batch) {
        assert_eq!(assessment, &engine.assess(input));
    }
}
