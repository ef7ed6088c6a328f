//! One-versus-rest multiclass classification on top of the binary
//! `LogisticRegression`.
//!
//! Every class gets its own independently fitted model that separates it
//! from all other classes combined. The per-class probabilities are not
//! normalized against each other; the decision is the arg-max.

use crate::dataset::render_table;
use crate::error::{Error, Result};
use crate::linear_model::LogisticRegression;
use crate::{Matrix, Vector};

/// In-sample accuracy of one class's binary model.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassReport {
    pub class: String,
    pub accuracy: f64,
}

#[derive(Clone, Debug)]
pub struct OneVsRestClassifier {
    template: LogisticRegression,
    models: Vec<(String, LogisticRegression)>,
}

impl OneVsRestClassifier {
    pub fn new() -> Self {
        Self::with_estimator(LogisticRegression::new())
    }

    /// Every per-class model is a clone of `template` before fitting.
    pub fn with_estimator(template: LogisticRegression) -> Self {
        Self {
            template,
            models: Vec::new(),
        }
    }

    pub fn classes(&self) -> Vec<&str> {
        self.models.iter().map(|(class, _)| class.as_str()).collect()
    }

    pub fn model(&self, class: &str) -> Option<&LogisticRegression> {
        self.models
            .iter()
            .find(|(c, _)| c == class)
            .map(|(_, model)| model)
    }

    /// Fit one binary model per entry of `classes`, in that order. A class
    /// with no rows in `labels` still gets a (constant) model.
    pub fn fit(&mut self, x: &Matrix, labels: &[String], classes: &[String]) -> Result<Vec<ClassReport>> {
        if x.nrows() != labels.len() {
            return Err(Error::shape(
                format!("{} labels", x.nrows()),
                format!("{} labels", labels.len()),
            ));
        }
        if classes.is_empty() {
            return Err(Error::EmptyDataset("no classes to fit".to_string()));
        }

        let mut models = Vec::with_capacity(classes.len());
        let mut reports = Vec::with_capacity(classes.len());

        for class in classes {
            let y: Vector = labels
                .iter()
                .map(|label| if label == class { 1.0 } else { 0.0 })
                .collect();

            let mut model = self.template.clone();
            model.fit(x, &y)?;
            let accuracy = model.score(x, &y)?;
            tracing::info!(class = %class, accuracy, "fitted one-vs-rest model");

            reports.push(ClassReport {
                class: class.clone(),
                accuracy,
            });
            models.push((class.clone(), model));
        }

        self.models = models;
        Ok(reports)
    }

    /// Positive-class probability of every class model for every row.
    pub fn predict_proba(&self, x: &Matrix) -> Result<ProbabilityTable> {
        if self.models.is_empty() {
            return Err(Error::NotFitted);
        }

        let mut probabilities = Matrix::zeros((x.nrows(), self.models.len()));
        for (j, (_, model)) in self.models.iter().enumerate() {
            probabilities.column_mut(j).assign(&model.predict_proba(x)?);
        }

        Ok(ProbabilityTable {
            classes: self.models.iter().map(|(class, _)| class.clone()).collect(),
            index: (0..x.nrows()).collect(),
            probabilities,
        })
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vec<String>> {
        Ok(self.predict_proba(x)?.predict())
    }
}

impl Default for OneVsRestClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows are observations, columns are classes.
#[derive(Clone, Debug)]
pub struct ProbabilityTable {
    pub classes: Vec<String>,
    /// Row labels, positional by default.
    pub index: Vec<usize>,
    pub probabilities: Matrix,
}

impl ProbabilityTable {
    pub fn n_rows(&self) -> usize {
        self.probabilities.nrows()
    }

    /// Relabel rows, e.g. with their position in the unsplit dataset.
    pub fn with_index(mut self, index: Vec<usize>) -> Result<Self> {
        if index.len() != self.n_rows() {
            return Err(Error::shape(
                format!("{} index labels", self.n_rows()),
                index.len(),
            ));
        }
        self.index = index;
        Ok(self)
    }

    /// Arg-max class for every row. Ties go to the earliest class.
    pub fn predict(&self) -> Vec<String> {
        self.probabilities
            .rows()
            .into_iter()
            .map(|row| {
                let mut best = 0;
                for (j, &p) in row.iter().enumerate() {
                    if p > row[best] {
                        best = j;
                    }
                }
                self.classes[best].clone()
            })
            .collect()
    }

    pub fn head(&self, n: usize) -> String {
        let rows = self
            .index
            .iter()
            .zip(self.probabilities.rows())
            .take(n)
            .map(|(&idx, row)| (idx, row.iter().map(|p| format!("{:.6}", p)).collect::<Vec<String>>()));
        render_table(&self.classes, rows)
    }
}
