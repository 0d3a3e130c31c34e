// ABOUTME: gdm-risk CLI - assess meals, build labelled feature tables, and train risk classifiers
// ABOUTME: Thin command layer over the meal risk library with ErrorCode-based exit statuses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Assess a meal with the weighted-threshold rule
//! gdm-risk assess --carbs 80 --fiber 1 --sugar 20 --gi 73
//!
//! # Assess with a trained classifier and print JSON
//! gdm-risk assess --carbs 50 --fiber 4 --gi 68 --model model.json --json
//!
//! # Derive features and labels for a raw meal table
//! gdm-risk featurize --input meals.csv --output features.csv
//!
//! # Train a logistic regression on a feature table
//! gdm-risk train --input features.csv --output model.json
//!
//! # Show the reference meals
//! gdm-risk examples
//! ```

use clap::{Parser, Subcommand};
use gdm_meal_risk::config::{RiskConfig, ScorerOverrides};
use gdm_meal_risk::dataset::{
    featurize, read_feature_table_path, read_raw_meals_path, write_feature_table_path,
    DatasetSummary,
};
use gdm_meal_risk::errors::{AppError, AppResult};
use gdm_meal_risk::intelligence::training::{LogisticTrainer, TrainingConfig};
use gdm_meal_risk::intelligence::{
    derive, MealRiskEngine, RiskAssessment, ScorerKind, REFERENCE_MEALS,
};
use gdm_meal_risk::logging::LoggingConfig;
use gdm_meal_risk::models::{DerivedFeatures, MealNutrients};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "gdm-risk",
    about = "Gestational diabetes meal risk assessment",
    long_about = "Estimate post-meal glucose spike risk from a meal's nutrients, and build and train the risk classifier."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Assess a single meal
    Assess {
        #[command(flatten)]
        meal: MealArgs,

        /// Scorer: weighted_threshold, label_rule, or classifier
        #[arg(long)]
        scorer: Option<ScorerKind>,

        /// Trained model artifact (implies the classifier scorer)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,
    },

    /// Derive features and labels for a raw meal table
    Featurize {
        /// Raw meal CSV
        #[arg(long)]
        input: PathBuf,

        /// Feature table CSV to write
        #[arg(long)]
        output: PathBuf,
    },

    /// Train a logistic regression classifier on a feature table
    Train {
        /// Feature table CSV
        #[arg(long)]
        input: PathBuf,

        /// Model artifact JSON to write
        #[arg(long)]
        output: PathBuf,

        /// Held-out share of each class
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Split seed
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Show the reference meals and their risk bands
    Examples,
}

/// Meal nutrient flags; defaults describe a typical mixed meal
#[derive(clap::Args)]
struct MealArgs {
    /// Total carbohydrates (g)
    #[arg(long, default_value = "45")]
    carbs: f64,

    /// Dietary fiber (g)
    #[arg(long, default_value = "3")]
    fiber: f64,

    /// Total sugars (g)
    #[arg(long, default_value = "5")]
    sugar: f64,

    /// Protein (g)
    #[arg(long, default_value = "20")]
    protein: f64,

    /// Total fat (g)
    #[arg(long, default_value = "10")]
    fat: f64,

    /// Saturated fat (g)
    #[arg(long, default_value = "3")]
    saturated_fat: f64,

    /// Energy (kcal)
    #[arg(long, default_value = "300")]
    energy: f64,

    /// Glycemic index (0-100)
    #[arg(long, default_value = "55")]
    gi: f64,
}

impl From<MealArgs> for MealNutrients {
    fn from(args: MealArgs) -> Self {
        Self {
            total_carbs_g: args.carbs,
            fiber_g: args.fiber,
            sugar_g: args.sugar,
            protein_g: args.protein,
            fat_g: args.fat,
            saturated_fat_g: args.saturated_fat,
            energy_kcal: args.energy,
            glycemic_index: args.gi,
        }
    }
}

#[derive(Serialize)]
struct AssessOutput<'a> {
    nutrients: &'a MealNutrients,
    derived: &'a DerivedFeatures,
    assessment: &'a RiskAssessment,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = LoggingConfig::from_env()
        .verbose(cli.verbose)
        .init()
        .map_err(AppError::from)
        .and_then(|()| run(cli.command));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = ?e.code, "{}", e.message);
            eprintln!("Error: {e}");
            ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(1))
        }
    }
}

fn run(command: Command) -> AppResult<()> {
    match command {
        Command::Assess {
            meal,
            scorer,
            model,
            json,
        } => assess(meal.into(), scorer, model, json),
        Command::Featurize { input, output } => {
            let records = featurize(read_raw_meals_path(&input)?);
            write_feature_table_path(&output, &records)?;
            print_summary(&DatasetSummary::from_records(&records));
            println!("Wrote {}", output.display());
            Ok(())
        }
        Command::Train {
            input,
            output,
            test_fraction,
            seed,
        } => train(&input, &output, test_fraction, seed),
        Command::Examples => {
            examples();
            Ok(())
        }
    }
}

fn assess(
    meal: MealNutrients,
    scorer: Option<ScorerKind>,
    model: Option<PathBuf>,
    json: bool,
) -> AppResult<()> {
    let config = RiskConfig::load_with(ScorerOverrides {
        kind: scorer,
        model_path: model,
    })?;

    let engine = MealRiskEngine::from_config(&config)?;
    let derived = derive(&meal);
    let assessment = engine.score(&meal, &derived);

    if json {
        let output = AssessOutput {
            nutrients: &meal,
            derived: &derived,
            assessment: &assessment,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Scorer:             {}", assessment.scorer);
    println!(
        "Risk level:         {}",
        assessment.risk_level.as_str().to_uppercase()
    );
    match assessment.risk_score {
        Some(score) => println!("Risk score:         {score:.2}"),
        None => println!("High risk label:    {}", u8::from(assessment.high_risk)),
    }
    println!("Glycemic load:      {:.1}", derived.glycemic_load);
    println!("Carb quality ratio: {:.3}", derived.carb_quality_ratio);
    println!("Net carbs:          {:.1} g", derived.net_carbs_g);
    println!("Sugar share:        {:.1}% of carbs", derived.sugar_pct_carbs);
    println!();
    println!("Recommendations:");
    for recommendation in &assessment.recommendations {
        println!("  - {recommendation}");
    }
    Ok(())
}

fn train(input: &Path, output: &Path, test_fraction: f64, seed: u64) -> AppResult<()> {
    let records = read_feature_table_path(input)?;
    print_summary(&DatasetSummary::from_records(&records));

    let rows: Vec<_> = records.iter().map(|record| record.to_labelled_row()).collect();
    let trainer = LogisticTrainer::new(TrainingConfig {
        test_fraction,
        seed,
        ..TrainingConfig::default()
    });
    let outcome = trainer.train(&rows)?;
    outcome.artifact.save(output)?;

    let metrics = outcome.metrics;
    println!("Iterations: {}", outcome.iterations);
    println!("Accuracy:   {:.3}", metrics.accuracy);
    println!("Precision:  {:.3}", metrics.precision);
    println!("Recall:     {:.3}", metrics.recall);
    match metrics.roc_auc {
        Some(auc) => println!("ROC-AUC:    {auc:.3}"),
        None => println!("ROC-AUC:    n/a (single class in test split)"),
    }
    let confusion = metrics.confusion;
    println!();
    println!("Confusion matrix ({} held-out rows):", confusion.total());
    println!("                 predicted high  predicted low");
    println!(
        "  actual high    {:>14}  {:>13}",
        confusion.true_positives, confusion.false_negatives
    );
    println!(
        "  actual low     {:>14}  {:>13}",
        confusion.false_positives, confusion.true_negatives
    );
    println!("Saved model to {}", output.display());
    info!(path = %output.display(), "Training complete");
    Ok(())
}

fn examples() {
    let engine = MealRiskEngine::default();
    println!(
        "{:<32} {:>6} {:>6} {:>4}  {:<9} {:<9}",
        "Meal", "Carbs", "Fiber", "GI", "Expected", "Computed"
    );
    for reference in REFERENCE_MEALS {
        let assessment = engine.assess(&reference.nutrients);
        let n = reference.nutrients;
        println!(
            "{:<32} {:>6.0} {:>6.0} {:>4.0}  {:<9} {:<9}",
            reference.name,
            n.total_carbs_g,
            n.fiber_g,
            n.glycemic_index,
            reference.expected.as_str(),
            assessment.risk_level.as_str()
        );
    }
}

fn print_summary(summary: &DatasetSummary) {
    println!("Rows:       {}", summary.total);
    println!("High risk:  {} ({:.1}%)", summary.high_risk, summary.high_risk_pct);
    println!("Low risk:   {}", summary.low_risk);
}
