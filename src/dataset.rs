// ABOUTME: Tabular interchange for meal datasets: raw nutrient tables and labelled feature tables
// ABOUTME: CSV reading and writing, label generation, consistency checks, and dataset summaries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Dataset Interchange
//!
//! Two CSV layouts are shared with external producers and trainers:
//!
//! - **Raw meal table**: the 8 base nutrient columns, an optional `food_name`
//!   column, and any number of extra columns which are ignored.
//! - **Feature table**: optional `food_name`, the 17 feature columns in
//!   schema order, and the `high_risk` label. Flags and the label are written
//!   as `0`/`1`.
//!
//! Feature tables are never trusted blindly: reading one re-derives every
//! feature from the base columns and rejects rows whose stored values or label
//! disagree.

use crate::intelligence::algorithms::HighRiskLabelRule;
use crate::intelligence::features::derive;
use crate::intelligence::training::LabelledRow;
use csv::{Reader, StringRecord, Writer};
use gdm_core::constants::schema::{BASE_FEATURE_COUNT, NAME_COLUMN};
use gdm_core::constants::{FEATURE_COUNT, FEATURE_NAMES, LABEL_COLUMN};
use gdm_core::errors::{AppError, AppResult};
use gdm_core::models::{FeatureVector, MealNutrients};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;
use tracing::info;

/// Largest absolute difference tolerated between stored and re-derived features
pub const FEATURE_TOLERANCE: f64 = 1e-6;

/// One row of a raw meal table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMealRecord {
    /// Optional food or meal name
    pub food_name: Option<String>,
    /// Base nutrients
    pub nutrients: MealNutrients,
}

/// One row of a labelled feature table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Optional food or meal name
    pub food_name: Option<String>,
    /// Base nutrients and derived features
    pub features: FeatureVector,
    /// Label-rule outcome
    pub high_risk: bool,
}

impl FeatureRecord {
    /// Derive features and label for a raw record
    #[must_use]
    pub fn from_raw(record: RawMealRecord) -> Self {
        let derived = derive(&record.nutrients);
        let high_risk = HighRiskLabelRule.evaluate(&record.nutrients, &derived);
        Self {
            food_name: record.food_name,
            features: FeatureVector::new(record.nutrients, derived),
            high_risk,
        }
    }

    /// Training example for this record
    #[must_use]
    pub fn to_labelled_row(&self) -> LabelledRow {
        LabelledRow {
            features: self.features.to_array(),
            label: self.high_risk,
        }
    }
}

/// Class balance of a labelled dataset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    /// Number of rows
    pub total: usize,
    /// Rows labelled high risk
    pub high_risk: usize,
    /// Rows labelled low risk
    pub low_risk: usize,
    /// Share of high-risk rows, in percent (0 for an empty dataset)
    pub high_risk_pct: f64,
}

impl DatasetSummary {
    /// Summarise labelled records
    #[must_use]
    pub fn from_records(records: &[FeatureRecord]) -> Self {
        let total = records.len();
        let high_risk = records.iter().filter(|record| record.high_risk).count();
        let high_risk_pct = if total == 0 {
            0.0
        } else {
            high_risk as f64 / total as f64 * 100.0
        };
        Self {
            total,
            high_risk,
            low_risk: total - high_risk,
            high_risk_pct,
        }
    }
}

/// Derive features and labels for many raw records in parallel, preserving order
#[must_use]
pub fn featurize(records: Vec<RawMealRecord>) -> Vec<FeatureRecord> {
    let featurized: Vec<FeatureRecord> = records
        .into_par_iter()
        .map(FeatureRecord::from_raw)
        .collect();
    let summary = DatasetSummary::from_records(&featurized);
    info!(
        rows = summary.total,
        high_risk = summary.high_risk,
        high_risk_pct = summary.high_risk_pct,
        "Featurized meal dataset"
    );
    featurized
}

/// Column positions resolved from a header row
struct Columns {
    name: Option<usize>,
    features: Vec<usize>,
    label: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord, feature_names: &[&str], need_label: bool) -> AppResult<Self> {
        let position = |wanted: &str| headers.iter().position(|h| h.trim() == wanted);

        let features = feature_names
            .iter()
            .map(|name| position(name).ok_or_else(|| AppError::missing_field(*name)))
            .collect::<AppResult<Vec<usize>>>()?;
        let label = position(LABEL_COLUMN);
        if need_label && label.is_none() {
            return Err(AppError::missing_field(LABEL_COLUMN));
        }

        Ok(Self {
            name: position(NAME_COLUMN),
            features,
            label,
        })
    }
}

fn field<'r>(record: &'r StringRecord, index: usize, column: &str, row: usize) -> AppResult<&'r str> {
    record.get(index).map(str::trim).ok_or_else(|| {
        AppError::invalid_format(format!("row {row}: missing value for '{column}'"))
    })
}

fn number(record: &StringRecord, index: usize, column: &str, row: usize) -> AppResult<f64> {
    let raw = field(record, index, column, row)?;
    let value: f64 = raw.parse().map_err(|_| {
        AppError::invalid_format(format!("row {row}: '{column}' is not a number: '{raw}'"))
    })?;
    if !value.is_finite() {
        return Err(AppError::invalid_format(format!(
            "row {row}: '{column}' must be finite"
        )));
    }
    Ok(value)
}

fn binary(record: &StringRecord, index: usize, column: &str, row: usize) -> AppResult<bool> {
    match field(record, index, column, row)? {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(AppError::invalid_format(format!(
            "row {row}: '{column}' must be 0 or 1, got '{other}'"
        ))),
    }
}

fn name(record: &StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn base_nutrients(record: &StringRecord, columns: &Columns, row: usize) -> AppResult<MealNutrients> {
    let mut values = [0.0; BASE_FEATURE_COUNT];
    for ((slot, index), column) in values.iter_mut().zip(&columns.features).zip(FEATURE_NAMES) {
        *slot = number(record, *index, column, row)?;
    }
    Ok(MealNutrients::from_array(values))
}

/// Read a raw meal table
///
/// # Errors
///
/// Returns `MissingRequiredField` if a base column is absent and
/// `InvalidFormat` for unparseable or non-finite values.
pub fn read_raw_meals<R: io::Read>(reader: R) -> AppResult<Vec<RawMealRecord>> {
    let mut csv_reader = Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = Columns::resolve(&headers, &FEATURE_NAMES[..BASE_FEATURE_COUNT], false)?;

    let mut records = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = result?;
        records.push(RawMealRecord {
            food_name: name(&record, columns.name),
            nutrients: base_nutrients(&record, &columns, row)?,
        });
    }
    Ok(records)
}

/// Read and verify a labelled feature table
///
/// # Errors
///
/// Returns `MissingRequiredField` if a feature or label column is absent and
/// `InvalidFormat` if a value is malformed, a stored feature differs from its
/// re-derived value by more than [`FEATURE_TOLERANCE`], or a label disagrees
/// with the label rule.
pub fn read_feature_table<R: io::Read>(reader: R) -> AppResult<Vec<FeatureRecord>> {
    let mut csv_reader = Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let columns = Columns::resolve(&headers, &FEATURE_NAMES, true)?;
    let label_index = columns.label.ok_or_else(|| AppError::missing_field(LABEL_COLUMN))?;

    let mut records = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let row = index + 1;
        let record = result?;
        let nutrients = base_nutrients(&record, &columns, row)?;
        let expected = FeatureRecord::from_raw(RawMealRecord {
            food_name: name(&record, columns.name),
            nutrients,
        });

        let derived_values = expected.features.to_array();
        for position in BASE_FEATURE_COUNT..FEATURE_COUNT {
            let column = FEATURE_NAMES[position];
            let stored = number(&record, columns.features[position], column, row)?;
            if (stored - derived_values[position]).abs() > FEATURE_TOLERANCE {
                return Err(AppError::invalid_format(format!(
                    "row {row}: '{column}' is {stored}, derived value is {}",
                    derived_values[position]
                )));
            }
        }

        let label = binary(&record, label_index, LABEL_COLUMN, row)?;
        if label != expected.high_risk {
            return Err(AppError::invalid_format(format!(
                "row {row}: '{LABEL_COLUMN}' is {}, label rule gives {}",
                u8::from(label),
                u8::from(expected.high_risk)
            )));
        }

        records.push(expected);
    }
    Ok(records)
}

/// Write a labelled feature table
///
/// The `food_name` column is written only when at least one record has a name.
///
/// # Errors
///
/// Returns `StorageError` if writing fails
pub fn write_feature_table<W: io::Write>(writer: W, records: &[FeatureRecord]) -> AppResult<()> {
    let with_names = records.iter().any(|record| record.food_name.is_some());
    let mut csv_writer = Writer::from_writer(writer);

    let mut header: Vec<&str> = Vec::with_capacity(FEATURE_COUNT + 2);
    if with_names {
        header.push(NAME_COLUMN);
    }
    header.extend(FEATURE_NAMES);
    header.push(LABEL_COLUMN);
    csv_writer.write_record(&header)?;

    for record in records {
        let mut fields: Vec<String> = Vec::with_capacity(header.len());
        if with_names {
            fields.push(record.food_name.clone().unwrap_or_default());
        }
        fields.extend(record.features.to_array().iter().map(f64::to_string));
        fields.push(u8::from(record.high_risk).to_string());
        csv_writer.write_record(&fields)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Read a raw meal table from a file
///
/// # Errors
///
/// Returns `StorageError` if the file cannot be opened, and any
/// [`read_raw_meals`] error
pub fn read_raw_meals_path(path: &Path) -> AppResult<Vec<RawMealRecord>> {
    let records = read_raw_meals(open(path)?)?;
    info!(path = %path.display(), rows = records.len(), "Read raw meal table");
    Ok(records)
}

/// Read and verify a labelled feature table from a file
///
/// # Errors
///
/// Returns `StorageError` if the file cannot be opened, and any
/// [`read_feature_table`] error
pub fn read_feature_table_path(path: &Path) -> AppResult<Vec<FeatureRecord>> {
    let records = read_feature_table(open(path)?)?;
    info!(path = %path.display(), rows = records.len(), "Read feature table");
    Ok(records)
}

/// Write a labelled feature table to a file
///
/// # Errors
///
/// Returns `StorageError` if the file cannot be created or written
pub fn write_feature_table_path(path: &Path, records: &[FeatureRecord]) -> AppResult<()> {
    let file = File::create(path).map_err(|e| {
        AppError::storage(format!("Failed to create {}", path.display())).with_source(e)
    })?;
    write_feature_table(BufWriter::new(file), records)?;
    info!(path = %path.display(), rows = records.len(), "Wrote feature table");
    Ok(())
}

fn open(path: &Path) -> AppResult<BufReader<File>> {
    let file = File::open(path).map_err(|e| {
        AppError::storage(format!("Failed to open {}", path.display())).with_source(e)
    })?;
    Ok(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "\
food_name,total_carbs_g,fiber_g,sugar_g,protein_g,fat_g,saturated_fat_g,energy_kcal,glycemic_index,source
White rice + soda,80,1,20,5,1,0,360,73,usda
,25,4,3,4,8,1,190,36,usda
";

    #[test]
    fn test_raw_table_ignores_extra_columns() {
        let records = read_raw_meals(RAW.as_bytes()).unwrap_or_default();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].food_name.as_deref(), Some("White rice + soda"));
        assert_eq!(records[1].food_name, None);
        assert!((records[0].nutrients.glycemic_index - 73.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_base_column_reported() {
        let result = read_raw_meals("total_carbs_g,fiber_g\n1,2\n".as_bytes());
        assert!(matches!(result, Err(e) if e.message.contains("sugar_g")));
    }

    #[test]
    fn test_summary_percentages() {
        let records = featurize(read_raw_meals(RAW.as_bytes()).unwrap_or_default());
        let summary = DatasetSummary::from_records(&records);
        assert_eq!(summary.total, 2);
        assert_eq!(summary.high_risk, 1);
        assert_eq!(summary.low_risk, 1);
        assert!((summary.high_risk_pct - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_summary_has_zero_share() {
        let summary = DatasetSummary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.high_risk_pct.abs() < f64::EPSILON);
    }
}
