//! Core of the dual-model image lab: loads a detector and a classifier side
//! by side, runs both on whatever image the user picks, and keeps only the
//! results that belong to the latest pick.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod handle;
pub mod image_source;
pub mod kind;
mod loader;
pub mod prediction;
pub mod service;
pub mod session;
pub mod status;
pub mod view;

pub use config::{AppConfig, GalleryImage};
pub use coordinator::InferenceOutcome;
pub use error::{ConfigError, InferenceError, ModelLoadError, ServiceError};
pub use handle::{ModelHandle, ModelStatus};
pub use image_source::{ImageOrigin, ImageSource, ImageToken};
pub use kind::ModelKind;
pub use prediction::{BoundingBox, Classification, Detection, Prediction, PredictionSet};
pub use service::{Classify, ClassifierService, Clock, Detect, DetectorService};
pub use session::{PredictionOutcome, Session};
pub use status::{Severity, StatusLine};
pub use view::{ModelView, PredictionsView, SessionView};
