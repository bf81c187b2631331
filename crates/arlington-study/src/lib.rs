#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/arlington/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod abnormal;
pub mod aggregate;
pub mod car;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod model;
pub mod store;
pub mod window;

pub use abnormal::AbnormalReturnSeries;
pub use aggregate::{AarPoint, AarSeries};
pub use car::compute_cars;
pub use config::{CarWindow, StudyConfig};
pub use engine::{EventStudy, StudyOutcome, StudyStats};
pub use error::{StudyError, StudyResult};
pub use event::{Event, EventStudyResult};
pub use model::MarketModelParameters;
pub use store::{EntitySeries, MarketSeries, ReturnSeriesStore};
pub use window::{EstimationWindow, select_estimation_window};
