use crate::handle::{ModelHandle, ModelStatus};
use crate::image_source::ImageSource;
use crate::kind::ModelKind;
use crate::prediction::Prediction;
use crate::session::{PredictionOutcome, SessionState};
use crate::status::{self, Severity};
use serde::Serialize;

/// Everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub status_message: String,
    pub status_severity: Severity,
    pub detector: ModelView,
    pub classifier: ModelView,
    pub image: Option<ImageSource>,
    pub image_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelView {
    pub kind: ModelKind,
    pub name: String,
    pub status: ModelStatus,
    pub load_duration_seconds: Option<f64>,
    pub error_message: Option<String>,
    pub predictions: PredictionsView,
}

/// Predictions for the current image. An empty `Ready` list means the model
/// ran and found nothing, which is different from `Unavailable`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PredictionsView {
    NoImage,
    Unavailable,
    Pending,
    Failed { error: String },
    Ready { items: Vec<Prediction> },
}

impl SessionView {
    pub(crate) fn from_state<I: ?Sized>(state: &SessionState<I>) -> Self {
        let line = status::project(&state.handles.detector, &state.handles.classifier);

        Self {
            status_message: line.message,
            status_severity: line.severity,
            detector: ModelView::new(state, ModelKind::Detector),
            classifier: ModelView::new(state, ModelKind::Classifier),
            image: state.images.current().cloned(),
            image_error: state.image_error.clone(),
        }
    }

    pub fn model(&self, kind: ModelKind) -> &ModelView {
        match kind {
            ModelKind::Detector => &self.detector,
            ModelKind::Classifier => &self.classifier,
        }
    }

    pub fn any_online(&self) -> bool {
        self.detector.status == ModelStatus::Ready || self.classifier.status == ModelStatus::Ready
    }
}

impl ModelView {
    fn new<I: ?Sized>(state: &SessionState<I>, kind: ModelKind) -> Self {
        let handle: &ModelHandle<I> = &state.handles[kind];

        let predictions = if state.images.current().is_none() || state.image_error.is_some() {
            PredictionsView::NoImage
        } else if handle.status() != ModelStatus::Ready {
            PredictionsView::Unavailable
        } else {
            match &state.outcomes[kind] {
                Some(PredictionOutcome::Ready(set)) => PredictionsView::Ready {
                    items: set.items.clone(),
                },
                Some(PredictionOutcome::Failed { error, .. }) => PredictionsView::Failed {
                    error: error.clone(),
                },
                None => PredictionsView::Pending,
            }
        };

        Self {
            kind,
            name: handle.name().to_string(),
            status: handle.status(),
            load_duration_seconds: handle.load_duration_ms().map(|ms| ms / 1000.0),
            error_message: handle.error_message().map(str::to_string),
            predictions,
        }
    }

    /// "loaded in 1.23 seconds", "is loading...", or the failure.
    pub fn load_summary(&self) -> String {
        match (self.status, self.load_duration_seconds, &self.error_message) {
            (ModelStatus::Ready, Some(seconds), _) => {
                format!("{} model loaded in {:.2} seconds.", self.name, seconds)
            }
            (ModelStatus::Failed, _, Some(error)) => {
                format!("{} model failed to load: {}", self.name, error)
            }
            (ModelStatus::Failed, _, None) => format!("{} model failed to load.", self.name),
            _ => format!("{} model is loading...", self.name),
        }
    }
}
