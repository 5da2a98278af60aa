//! Labelled training data and model evaluation.
//!
//! The dataset is a delimited text file with one row per URL: a `url`
//! column (dropped), a `status` target (`legitimate` or `phishing`) and one
//! numeric column per feature.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;

use crate::detector::Detector;
use crate::error::{DetectError, Result};
use crate::features::FeatureVector;
use crate::inference::Classifier;
use crate::layout::FeatureLayout;
use crate::report::Label;

const URL_COLUMN: &str = "url";
const TARGET_COLUMN: &str = "status";

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    feature_names: Vec<String>,
    rows: Vec<FeatureVector>,
    labels: Vec<Label>,
}

impl Dataset {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let headers = rdr.headers()?.clone();

        let target = headers
            .iter()
            .position(|h| h == TARGET_COLUMN)
            .ok_or_else(|| DetectError::Dataset(format!("no {TARGET_COLUMN:?} column")))?;
        let feature_columns: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, h)| *i != target && *h != URL_COLUMN)
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        let mut dataset = Dataset {
            feature_names: feature_columns.iter().map(|(_, h)| h.clone()).collect(),
            ..Dataset::default()
        };

        for (n, record) in rdr.records().enumerate() {
            let record = record?;
            // Header is line 1.
            let line = n + 2;

            let status = record.get(target).unwrap_or_default();
            let label = Label::from_status(status).ok_or_else(|| {
                DetectError::Dataset(format!("line {line}: unknown status {status:?}"))
            })?;

            let mut features = FeatureVector::default();
            for (i, name) in &feature_columns {
                let raw = record.get(*i).unwrap_or_default();
                let value: f32 = raw.parse().map_err(|_| {
                    DetectError::Dataset(format!("line {line}: column {name:?} is not numeric: {raw:?}"))
                })?;
                features.insert(name.as_str(), value);
            }

            dataset.rows.push(features);
            dataset.labels.push(label);
        }

        Ok(dataset)
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn rows(&self) -> &[FeatureVector] {
        &self.rows
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Layout columns the dataset lacks, and dataset columns the layout ignores.
    pub fn column_mismatch<'a>(&'a self, layout: &'a FeatureLayout) -> (Vec<&'a str>, Vec<&'a str>) {
        let absent = layout
            .names()
            .iter()
            .filter(|n| !self.feature_names.contains(*n))
            .map(String::as_str)
            .collect();
        let extra = self
            .feature_names
            .iter()
            .filter(|n| !layout.names().contains(*n))
            .map(String::as_str)
            .collect();
        (absent, extra)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub accuracy: f64,
    /// `confusion[true][predicted]`, indexed by class.
    pub confusion: [[usize; 2]; 2],
    pub per_class: Vec<ClassMetrics>,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

impl Evaluation {
    pub fn from_predictions(truth: &[Label], predicted: &[Label]) -> Self {
        let mut confusion = [[0usize; 2]; 2];
        for (t, p) in truth.iter().zip(predicted) {
            confusion[t.index()][p.index()] += 1;
        }

        let correct = confusion[0][0] + confusion[1][1];
        let per_class = Label::ALL
            .iter()
            .map(|&label| {
                let c = label.index();
                let tp = confusion[c][c];
                let predicted_c = confusion[0][c] + confusion[1][c];
                let support = confusion[c][0] + confusion[c][1];
                let precision = ratio(tp, predicted_c);
                let recall = ratio(tp, support);
                let f1 = if precision + recall > 0.0 {
                    2.0 * precision * recall / (precision + recall)
                } else {
                    0.0
                };
                ClassMetrics {
                    label,
                    precision,
                    recall,
                    f1,
                    support,
                }
            })
            .collect();

        Self {
            accuracy: ratio(correct, truth.len()),
            confusion,
            per_class,
        }
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.2}%", self.accuracy * 100.0)?;
        writeln!(f)?;
        writeln!(f, "{:>12} {:>10} {:>10} {:>10} {:>10}", "", "precision", "recall", "f1-score", "support")?;
        for m in &self.per_class {
            writeln!(
                f,
                "{:>12} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                m.label.as_str(),
                m.precision,
                m.recall,
                m.f1,
                m.support
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Confusion matrix (rows = true, columns = predicted):")?;
        for row in &self.confusion {
            writeln!(f, "  [{:>6} {:>6}]", row[0], row[1])?;
        }
        Ok(())
    }
}

/// Predict every dataset row and score the predictions against the labels.
pub fn evaluate<C: Classifier>(detector: &Detector<C>, dataset: &Dataset) -> Result<Evaluation> {
    if dataset.is_empty() {
        return Err(DetectError::Dataset("dataset has no rows".into()));
    }

    let (absent, extra) = dataset.column_mismatch(detector.layout());
    if !absent.is_empty() || !extra.is_empty() {
        tracing::warn!(
            absent = ?absent,
            extra = ?extra,
            "dataset columns differ from the model layout"
        );
    }

    let predicted = dataset
        .rows()
        .par_iter()
        .map(|row| detector.predict(row).map(|p| p.label))
        .collect::<Result<Vec<_>>>()?;

    Ok(Evaluation::from_predictions(dataset.labels(), &predicted))
}
