#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/arlington/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod categorical;
pub mod error;
pub mod factors;
pub mod ols;
pub mod ttest;

pub use categorical::{CategoricalRegression, CategoryEffect, fit_categorical};
pub use error::{StatsError, StatsResult};
pub use factors::{FactorRegression, FactorTable, fit_factor_model};
pub use ols::{OlsFit, fit_ols};
pub use ttest::{TTestResult, one_sample_ttest};
