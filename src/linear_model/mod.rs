//! Linear models for classification.
//!
//! - `LogisticRegression`: L2-penalized logistic regression for binary classification
//!
//! # Examples
//!
//! ```rust
//! use vehicle_origin::LogisticRegression;
//! use ndarray::array;
//!
//! let x = array![[1.0], [2.0], [3.0], [4.0]];
//! let y = array![0.0, 0.0, 1.0, 1.0];
//!
//! let mut model = LogisticRegression::new();
//! model.fit(&x, &y).unwrap();
//! let predictions = model.predict(&x).unwrap();
//! let probabilities = model.predict_proba(&x).unwrap();
//! ```

mod logistic_regression;

pub use logistic_regression::LogisticRegression;
