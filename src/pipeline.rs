//! The end-to-end run: load, encode, split, train one model per origin,
//! score the holdout rows and print every intermediate result.

use crate::config::Config;
use crate::dataset::{Frame, ShuffleSplit, Split};
use crate::error::{Error, Result};
use crate::metrics::label_accuracy;
use crate::multiclass::{ClassReport, OneVsRestClassifier, ProbabilityTable};
use crate::preprocessing::{EncodedFrame, encode_frame};
use ndarray::Axis;
use std::fmt::Display;
use std::io::Write;

pub const TARGET_COLUMN: &str = "origin";

/// Source column and indicator prefix of every encoded feature block.
pub const ENCODED_COLUMNS: [(&str, &str); 2] = [("cylinders", "cyl"), ("year", "year")];

/// Everything one run produced, stage by stage.
#[derive(Clone, Debug)]
pub struct Report {
    /// Distinct origins in first-seen order; also the class order.
    pub origins: Vec<String>,
    pub encoded: EncodedFrame,
    pub split: Split,
    pub class_reports: Vec<ClassReport>,
    /// Indexed by each holdout row's position in the unsplit dataset.
    pub probabilities: ProbabilityTable,
    pub predictions: Vec<String>,
    /// Fraction of holdout rows whose predicted origin is the true one.
    pub holdout_accuracy: f64,
}

impl Report {
    pub fn n_train(&self) -> usize {
        self.split.train.len()
    }

    pub fn n_test(&self) -> usize {
        self.split.test.len()
    }
}

/// Read the configured CSV and check that the columns the model needs exist.
pub fn load(config: &Config) -> Result<Frame> {
    let frame = Frame::from_csv_path(&config.data_path)?;
    let mut required = vec![TARGET_COLUMN];
    required.extend(ENCODED_COLUMNS.iter().map(|&(column, _)| column));
    frame.require_columns(&required)?;

    tracing::info!(
        path = %config.data_path.display(),
        rows = frame.n_rows(),
        columns = frame.n_columns(),
        "loaded dataset"
    );
    Ok(frame)
}

pub fn run(config: &Config, out: &mut dyn Write) -> Result<Report> {
    config.validate()?;
    let frame = load(config)?;
    run_frame(&frame, config, out)
}

pub fn run_frame(frame: &Frame, config: &Config, out: &mut dyn Write) -> Result<Report> {
    if frame.n_rows() == 0 {
        return Err(Error::EmptyDataset("the input file has no rows".to_string()));
    }
    let head_rows = config.head_rows;
    emit(out, frame.head(head_rows))?;

    let origins = frame.unique(TARGET_COLUMN)?;
    emit(out, format!("\nOrigins: [{}]", origins.join(", ")))?;

    let encoded = encode_frame(frame, &ENCODED_COLUMNS)?;
    tracing::info!(features = encoded.feature_names.len(), "encoded categorical columns");
    emit(out, format!("\n{}", encoded.head(head_rows)))?;

    let mut splitter = ShuffleSplit::new(config.train_fraction);
    if let Some(seed) = config.seed {
        splitter = splitter.random_state(seed);
    }
    let split = splitter.split(frame.n_rows())?;
    emit(out, format!("\nTraining rows: {}", split.train.len()))?;
    emit(out, format!("Holdout rows: {}", split.test.len()))?;
    emit(out, format!("Features: [{}]", encoded.feature_names.join(", ")))?;

    let origin_column = frame.column(TARGET_COLUMN)?;
    let select_labels = |rows: &[usize]| -> Vec<String> {
        rows.iter().map(|&i| origin_column[i].to_string()).collect()
    };

    let x_train = encoded.features.select(Axis(0), &split.train);
    let y_train = select_labels(&split.train);

    let mut classifier = OneVsRestClassifier::with_estimator(config.estimator());
    let class_reports = classifier.fit(&x_train, &y_train, &origins)?;
    emit(out, "")?;
    for report in &class_reports {
        emit(
            out,
            format!(
                "Accuracy Score for model of origin {} is {}",
                report.class, report.accuracy
            ),
        )?;
    }

    let x_test = encoded.features.select(Axis(0), &split.test);
    let y_test = select_labels(&split.test);

    let probabilities = classifier
        .predict_proba(&x_test)?
        .with_index(split.test.clone())?;
    emit(out, format!("\n{}", probabilities.head(head_rows)))?;

    let predictions = probabilities.predict();
    emit(out, "\nPredicted origins:")?;
    for (idx, label) in probabilities.index.iter().zip(&predictions) {
        emit(out, format!("{}  {}", idx, label))?;
    }

    let holdout_accuracy = label_accuracy(&y_test, &predictions)?;
    tracing::info!(holdout_accuracy, rows = y_test.len(), "scored holdout rows");
    emit(out, format!("\nHoldout accuracy: {:.4}", holdout_accuracy))?;

    Ok(Report {
        origins,
        encoded,
        split,
        class_reports,
        probabilities,
        predictions,
        holdout_accuracy,
    })
}

fn emit(out: &mut dyn Write, text: impl Display) -> Result<()> {
    writeln!(out, "{}", text).map_err(Error::Output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        let mut data = String::from("mpg,cylinders,year,origin\n");
        for i in 0..30 {
            let (cyl, origin) = match i % 3 {
                0 => (8, 1),
                1 => (4, 2),
                _ => (4, 3),
            };
            data.push_str(&format!("{},{},{},{}\n", 10 + i, cyl, 70 + i % 2, origin));
        }
        Frame::from_reader(data.as_bytes()).unwrap()
    }

    fn seeded() -> Config {
        Config {
            seed: Some(3),
            ..Config::default()
        }
    }

    #[test]
    fn test_run_frame_stages() {
        let mut out = Vec::new();
        let report = run_frame(&frame(), &seeded(), &mut out).unwrap();

        assert_eq!(report.origins, vec!["1", "2", "3"]);
        assert_eq!(report.n_train(), 21);
        assert_eq!(report.n_test(), 9);
        assert_eq!(report.encoded.feature_names, vec!["cyl_4", "cyl_8", "year_70", "year_71"]);
        assert_eq!(report.class_reports.len(), 3);
        assert_eq!(report.predictions.len(), 9);
        assert_eq!(report.probabilities.index, report.split.test);
        assert!((0.0..=1.0).contains(&report.holdout_accuracy));
    }

    #[test]
    fn test_output_order() {
        let mut out = Vec::new();
        run_frame(&frame(), &seeded(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let position = |needle: &str| text.find(needle).unwrap();
        assert!(position("Origins: [1, 2, 3]") < position("Training rows: 21"));
        assert!(position("Holdout rows: 9") < position("Features: [cyl_4"));
        assert!(position("Accuracy Score for model of origin 1 is") < position("Predicted origins:"));
        assert!(position("Predicted origins:") < position("Holdout accuracy:"));
    }

    #[test]
    fn test_empty_frame() {
        let empty = Frame::from_reader("cylinders,year,origin\n".as_bytes()).unwrap();
        let err = run_frame(&empty, &seeded(), &mut Vec::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyDataset(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let config = Config {
            data_path: "missing/auto.csv".into(),
            ..Config::default()
        };
        let err = run(&config, &mut Vec::new()).unwrap_err();
        assert!(err.is_load_error());
    }
}
