use crate::error::{Error, Result};
use crate::{Matrix, Vector};

const EPSILON: f64 = 1e-15;

#[derive(Clone, Debug)]
pub struct LogisticRegression {
    pub coefficients: Option<Vector>,
    pub intercept: Option<f64>,
    learning_rate: f64,
    max_iterations: usize,
    tolerance: f64,
    c: f64,
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            learning_rate: 0.5,
            max_iterations: 5000,
            tolerance: 1e-6,
            c: 1.0,
        }
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Inverse L2 regularization strength. `f64::INFINITY` disables the penalty.
    pub fn c(mut self, c: f64) -> Self {
        self.c = c;
        self
    }

    pub fn fit(&mut self, x: &Matrix, y: &Vector) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(Error::shape(
                format!("{} labels", x.nrows()),
                format!("{} labels", y.len()),
            ));
        }
        if x.nrows() == 0 {
            return Err(Error::EmptyDataset("X must have at least one sample".to_string()));
        }
        self.validate_params()?;
        self.validate_labels(y)?;

        let (coeffs, intercept) = if Self::is_single_class(y) {
            self.fit_constant(x, y)
        } else {
            self.fit_with_intercept(x, y)?
        };

        self.coefficients = Some(coeffs);
        self.intercept = Some(intercept);
        Ok(())
    }

    pub fn predict(&self, x: &Matrix) -> Result<Vector> {
        let probabilities = self.predict_proba(x)?;
        let predictions = probabilities.mapv(|p| if p > 0.5 { 1.0 } else { 0.0 });
        Ok(predictions)
    }

    /// Probability of the positive class for every row of `x`.
    pub fn predict_proba(&self, x: &Matrix) -> Result<Vector> {
        let coeffs = self.coefficients.as_ref().ok_or(Error::NotFitted)?;
        let intercept = self.intercept.unwrap_or(0.0);

        if x.ncols() != coeffs.len() {
            return Err(Error::shape(
                format!("{} features", coeffs.len()),
                format!("{} features", x.ncols()),
            ));
        }

        let linear_combination = x.dot(coeffs) + intercept;
        Ok(linear_combination.mapv(Self::sigmoid))
    }

    pub fn score(&self, x: &Matrix, y: &Vector) -> Result<f64> {
        let predictions = self.predict(x)?;
        crate::metrics::accuracy_score(y, &predictions)
    }

    fn sigmoid(z: f64) -> f64 {
        if z > 500.0 {
            1.0
        } else if z < -500.0 {
            0.0
        } else {
            1.0 / (1.0 + (-z).exp())
        }
    }

    fn validate_params(&self) -> Result<()> {
        let invalid = |name: &str, value: f64, reason: &str| Error::InvalidParameter {
            name: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        if !(self.learning_rate > 0.0) {
            return Err(invalid("learning_rate", self.learning_rate, "must be positive"));
        }
        if !(self.c > 0.0) {
            return Err(invalid("c", self.c, "must be positive"));
        }
        Ok(())
    }

    fn validate_labels(&self, y: &Vector) -> Result<()> {
        for &label in y.iter() {
            if label != 0.0 && label != 1.0 {
                return Err(Error::InvalidParameter {
                    name: "y".to_string(),
                    value: label.to_string(),
                    reason: "labels must be 0 or 1 for binary classification".to_string(),
                });
            }
        }
        Ok(())
    }

    fn is_single_class(y: &Vector) -> bool {
        y.iter().all(|&v| v == y[0])
    }

    /// With only one label present the likelihood has no finite optimum, so
    /// the model collapses to the (clipped) base rate for every row.
    fn fit_constant(&self, x: &Matrix, y: &Vector) -> (Vector, f64) {
        let rate = y[0].clamp(EPSILON, 1.0 - EPSILON);
        tracing::warn!(
            positive = y[0] == 1.0,
            n_samples = y.len(),
            "single-class target, fitting constant model"
        );
        (Vector::zeros(x.ncols()), (rate / (1.0 - rate)).ln())
    }

    fn fit_with_intercept(&self, x: &Matrix, y: &Vector) -> Result<(Vector, f64)> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        let mut x_with_intercept = Matrix::ones((n_samples, n_features + 1));
        x_with_intercept.slice_mut(ndarray::s![.., 1..]).assign(x);

        let coeffs_with_intercept = self.gradient_descent(&x_with_intercept, y)?;

        let intercept = coeffs_with_intercept[0];
        let coeffs = coeffs_with_intercept.slice(ndarray::s![1..]).to_owned();

        Ok((coeffs, intercept))
    }

    /// Minimizes mean log-loss plus `‖w‖² / (2·C·n)`. Column 0 of `x` is the
    /// constant intercept column and is not penalized.
    fn gradient_descent(&self, x: &Matrix, y: &Vector) -> Result<Vector> {
        let n_features = x.ncols();
        let n_samples = x.nrows() as f64;
        let alpha = 1.0 / (self.c * n_samples);
        let mut weights = Vector::zeros(n_features);

        let mut penalty_mask = Vector::ones(n_features);
        penalty_mask[0] = 0.0;

        let mut prev_cost = f64::INFINITY;
        let mut no_improvement_count = 0;
        let mut iterations = 0;

        for iteration in 0..self.max_iterations {
            iterations = iteration + 1;
            let linear_combination = x.dot(&weights);
            let predictions = linear_combination.mapv(Self::sigmoid);

            let penalized = &weights * &penalty_mask;
            let cost = Self::logistic_loss(y, &predictions) + 0.5 * alpha * penalized.dot(&penalized);

            if cost.is_nan() || cost.is_infinite() {
                return Err(Error::Diverged { iterations });
            }

            if (prev_cost - cost).abs() < self.tolerance {
                no_improvement_count += 1;
                if no_improvement_count > 10 {
                    break;
                }
            } else {
                no_improvement_count = 0;
            }

            let error = &predictions - y;
            let gradient = x.t().dot(&error) / n_samples + &penalized * alpha;
            weights = &weights - &gradient * self.learning_rate;

            prev_cost = cost;
        }

        tracing::debug!(iterations, cost = prev_cost, "gradient descent finished");
        Ok(weights)
    }

    fn logistic_loss(y_true: &Vector, y_pred: &Vector) -> f64 {
        let loss = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&y, &p)| {
                let p = p.clamp(EPSILON, 1.0 - EPSILON);
                -y * p.ln() - (1.0 - y) * (1.0 - p).ln()
            })
            .sum::<f64>();

        loss / y_true.len() as f64
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_logistic_regression_simple() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];

        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        let predictions = model.predict(&x).unwrap();
        let probabilities = model.predict_proba(&x).unwrap();

        assert_eq!(predictions.len(), 4);
        assert_eq!(probabilities.len(), 4);

        assert!(probabilities[0] < 0.5);
        assert!(probabilities[3] > 0.5);
    }

    #[test]
    fn test_logistic_regression_indicator_features() {
        // first column marks the positive class perfectly
        let x = array![
            [1.0, 0.0],
            [1.0, 0.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [0.0, 1.0],
            [0.0, 1.0]
        ];
        let y = array![1.0, 1.0, 1.0, 0.0, 0.0, 0.0];

        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        assert_eq!(model.score(&x, &y).unwrap(), 1.0);
        let coeffs = model.coefficients.as_ref().unwrap();
        assert!(coeffs[0] > coeffs[1]);
    }

    #[test]
    fn test_penalty_shrinks_coefficients() {
        let x = array![[1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]];
        let y = array![1.0, 1.0, 0.0, 0.0];

        let mut strong = LogisticRegression::new().c(0.1);
        let mut weak = LogisticRegression::new().c(100.0);
        strong.fit(&x, &y).unwrap();
        weak.fit(&x, &y).unwrap();

        let norm = |m: &LogisticRegression| {
            let c = m.coefficients.as_ref().unwrap();
            c.dot(c)
        };
        assert!(norm(&strong) < norm(&weak));
    }

    #[test]
    fn test_logistic_regression_score() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];

        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        let score = model.score(&x, &y).unwrap();
        assert!(score > 0.5);
    }

    #[test]
    fn test_single_class_target_is_constant() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 0.0]];
        let y = array![0.0, 0.0, 0.0];

        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        let probabilities = model.predict_proba(&x).unwrap();
        assert!(probabilities.iter().all(|&p| p == probabilities[0]));
        assert!(probabilities[0] < 1e-10);
        assert_eq!(model.predict(&x).unwrap(), array![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_single_class_target_scores_base_rate() {
        let x = array![[1.0, 0.0], [0.0, 1.0], [1.0, 0.0]];

        let mut negative = LogisticRegression::new();
        let y = array![0.0, 0.0, 0.0];
        negative.fit(&x, &y).unwrap();
        assert_eq!(negative.score(&x, &y).unwrap(), 1.0);

        let mut positive = LogisticRegression::new();
        let y = array![1.0, 1.0, 1.0];
        positive.fit(&x, &y).unwrap();
        let probabilities = positive.predict_proba(&x).unwrap();
        assert!(probabilities.iter().all(|&p| p > 1.0 - 1e-10));
        assert_eq!(positive.predict(&x).unwrap(), array![1.0, 1.0, 1.0]);
        assert_eq!(positive.score(&x, &y).unwrap(), 1.0);
    }

    #[test]
    fn test_even_odds_predict_negative() {
        let mut model = LogisticRegression::new();
        model.coefficients = Some(array![0.0]);
        model.intercept = Some(0.0);

        let x = array![[1.0], [-3.0]];
        assert_eq!(model.predict_proba(&x).unwrap(), array![0.5, 0.5]);
        assert_eq!(model.predict(&x).unwrap(), array![0.0, 0.0]);
    }

    #[test]
    fn test_logistic_regression_invalid_labels() {
        let x = array![[1.0], [2.0]];
        let y = array![0.5, 2.0];

        let mut model = LogisticRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_logistic_regression_shape_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![0.0, 1.0, 1.0];

        let mut model = LogisticRegression::new();
        assert!(matches!(model.fit(&x, &y), Err(Error::Shape { .. })));
    }

    #[test]
    fn test_logistic_regression_predict_without_fit() {
        let x = array![[1.0], [2.0]];
        let model = LogisticRegression::new();

        assert!(matches!(model.predict(&x), Err(Error::NotFitted)));
        assert!(matches!(model.predict_proba(&x), Err(Error::NotFitted)));
    }

    #[test]
    fn test_predict_feature_mismatch() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let mut model = LogisticRegression::new();
        model.fit(&x, &y).unwrap();

        let wide = array![[1.0, 2.0]];
        assert!(matches!(model.predict_proba(&wide), Err(Error::Shape { .. })));
    }

    #[test]
    fn test_sigmoid_function() {
        assert!((LogisticRegression::sigmoid(0.0) - 0.5).abs() < 1e-10);
        assert!(LogisticRegression::sigmoid(1000.0) > 0.99);
        assert!(LogisticRegression::sigmoid(-1000.0) < 0.01);
    }
}
