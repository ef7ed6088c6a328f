use crate::Vector;
use crate::error::{Error, Result};

/// Fraction of positions where two 0/1 vectors agree.
pub fn accuracy_score(y_true: &Vector, y_pred: &Vector) -> Result<f64> {
    if y_true.len() != y_pred.len() {
        return Err(Error::shape(
            format!("{} predictions", y_true.len()),
            format!("{} predictions", y_pred.len()),
        ));
    }
    if y_true.is_empty() {
        return Err(Error::EmptyDataset("no labels to score".to_string()));
    }

    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(actual, pred)| (*pred - *actual).abs() < 1e-10)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Fraction of positions where two label sequences agree.
pub fn label_accuracy<A, B>(y_true: &[A], y_pred: &[B]) -> Result<f64>
where
    A: PartialEq<B>,
{
    if y_true.len() != y_pred.len() {
        return Err(Error::shape(
            format!("{} labels", y_true.len()),
            format!("{} labels", y_pred.len()),
        ));
    }
    if y_true.is_empty() {
        return Err(Error::EmptyDataset("no labels to score".to_string()));
    }

    let correct = y_true
        .iter()
        .zip(y_pred)
        .filter(|(actual, pred)| *actual == *pred)
        .count();
    Ok(correct as f64 / y_true.len() as f64)
}
