//! One-versus-rest classification of a vehicle's manufacturing region from
//! its cylinder count and model year.
//!
//! The crate is a small tabular toolkit built on `ndarray`:
//! - `Frame`: raw CSV table with string cells
//! - `OneHotEncoder` / `encode_frame`: integer columns to indicator columns
//! - `ShuffleSplit`: random (optionally seeded) train/holdout partition
//! - `LogisticRegression`: binary classifier fit by gradient descent
//! - `OneVsRestClassifier`: one binary model per class, arg-max decision
//!
//! # Example
//! ```rust
//! use vehicle_origin::{OneVsRestClassifier, Matrix};
//! use ndarray::array;
//!
//! let x: Matrix = array![[1.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.0, 1.0]];
//! let labels = vec!["usa".to_string(), "usa".to_string(), "japan".to_string(), "japan".to_string()];
//! let classes = vec!["usa".to_string(), "japan".to_string()];
//!
//! let mut clf = OneVsRestClassifier::new();
//! clf.fit(&x, &labels, &classes).unwrap();
//! let table = clf.predict_proba(&x).unwrap();
//! assert_eq!(table.predict(), labels);
//! ```

pub use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

pub mod config;
pub mod dataset;
pub mod error;
pub mod linear_model;
pub mod metrics;
pub mod multiclass;
pub mod pipeline;
pub mod preprocessing;

pub use config::Config;
pub use dataset::{Frame, ShuffleSplit, Split};
pub use error::{Error, Result};
pub use linear_model::LogisticRegression;
pub use multiclass::{ClassReport, OneVsRestClassifier, ProbabilityTable};
pub use preprocessing::{EncodedFrame, OneHotEncoder, encode_frame};

pub type Vector = Array1<f64>;
pub type Matrix = Array2<f64>;
