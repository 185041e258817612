use crate::kind::ModelKind;
use crate::service::ModelInstance;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

impl ModelStatus {
    /// Still waiting on the load call (or not started yet).
    pub fn is_pending(self) -> bool {
        matches!(self, ModelStatus::Idle | ModelStatus::Loading)
    }
}

enum LoadState<I: ?Sized> {
    Idle,
    Loading { started_ms: f64 },
    Ready { load_duration_ms: f64, instance: ModelInstance<I> },
    Failed { error: String },
}

/// Load state of one model. `Idle -> Loading -> Ready | Failed`, no way back.
pub struct ModelHandle<I: ?Sized> {
    kind: ModelKind,
    name: String,
    state: LoadState<I>,
}

impl<I: ?Sized> ModelHandle<I> {
    pub fn new(kind: ModelKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            state: LoadState::Idle,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> ModelStatus {
        match self.state {
            LoadState::Idle => ModelStatus::Idle,
            LoadState::Loading { .. } => ModelStatus::Loading,
            LoadState::Ready { .. } => ModelStatus::Ready,
            LoadState::Failed { .. } => ModelStatus::Failed,
        }
    }

    pub fn load_duration_ms(&self) -> Option<f64> {
        match self.state {
            LoadState::Ready { load_duration_ms, .. } => Some(load_duration_ms),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            LoadState::Failed { error } => Some(error),
            _ => None,
        }
    }

    pub fn instance(&self) -> Option<&ModelInstance<I>> {
        match &self.state {
            LoadState::Ready { instance, .. } => Some(instance),
            _ => None,
        }
    }

    /// Returns false if the handle already left `Idle`.
    pub(crate) fn begin_loading(&mut self, now_ms: f64) -> bool {
        if !matches!(self.state, LoadState::Idle) {
            return false;
        }
        self.state = LoadState::Loading { started_ms: now_ms };
        true
    }

    pub(crate) fn mark_ready(&mut self, now_ms: f64, instance: ModelInstance<I>) {
        if let LoadState::Loading { started_ms } = self.state {
            debug_assert_eq!(instance.kind(), self.kind, "{} got the wrong model", self.name);
            self.state = LoadState::Ready {
                load_duration_ms: (now_ms - started_ms).max(0.0),
                instance,
            };
        }
    }

    pub(crate) fn mark_failed(&mut self, error: impl Into<String>) {
        if matches!(self.state, LoadState::Loading { .. }) {
            self.state = LoadState::Failed { error: error.into() };
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ServiceError;
    use crate::prediction::{Classification, Detection};
    use crate::service::{Classify, Detect};
    use futures::FutureExt;
    use futures::future::LocalBoxFuture;
    use std::rc::Rc;

    pub(crate) struct NoopDetector;

    impl Detect<()> for NoopDetector {
        fn detect<'a>(
            &'a self,
            _image: &'a (),
        ) -> LocalBoxFuture<'a, Result<Vec<Detection>, ServiceError>> {
            async { Ok(Vec::new()) }.boxed_local()
        }
    }

    pub(crate) struct NoopClassifier;

    impl Classify<()> for NoopClassifier {
        fn classify<'a>(
            &'a self,
            _image: &'a (),
        ) -> LocalBoxFuture<'a, Result<Vec<Classification>, ServiceError>> {
            async { Ok(Vec::new()) }.boxed_local()
        }
    }

    pub(crate) fn noop_instance(kind: ModelKind) -> ModelInstance<()> {
        match kind {
            ModelKind::Detector => ModelInstance::Detector(Rc::new(NoopDetector)),
            ModelKind::Classifier => ModelInstance::Classifier(Rc::new(NoopClassifier)),
        }
    }

    pub(crate) fn handle_in(kind: ModelKind, name: &str, status: ModelStatus) -> ModelHandle<()> {
        let mut handle = ModelHandle::new(kind, name);
        match status {
            ModelStatus::Idle => {}
            ModelStatus::Loading => {
                handle.begin_loading(0.0);
            }
            ModelStatus::Ready => {
                handle.begin_loading(0.0);
                handle.mark_ready(10.0, noop_instance(kind));
            }
            ModelStatus::Failed => {
                handle.begin_loading(0.0);
                handle.mark_failed("boom");
            }
        }
        handle
    }

    #[test]
    fn ready_records_elapsed_time() {
        let mut handle = ModelHandle::<()>::new(ModelKind::Detector, "COCO-SSD");
        assert_eq!(handle.status(), ModelStatus::Idle);

        assert!(handle.begin_loading(1_000.0));
        assert_eq!(handle.status(), ModelStatus::Loading);
        assert_eq!(handle.load_duration_ms(), None);

        handle.mark_ready(3_500.0, noop_instance(ModelKind::Detector));
        assert_eq!(handle.status(), ModelStatus::Ready);
        assert_eq!(handle.load_duration_ms(), Some(2_500.0));
        assert!(handle.instance().is_some());
        assert_eq!(handle.error_message(), None);
    }

    #[test]
    fn terminal_states_do_not_change() {
        let mut handle = handle_in(ModelKind::Classifier, "MobileNet", ModelStatus::Failed);
        assert_eq!(handle.error_message(), Some("boom"));

        assert!(!handle.begin_loading(5.0));
        handle.mark_ready(6.0, noop_instance(ModelKind::Classifier));
        assert_eq!(handle.status(), ModelStatus::Failed);
        assert!(handle.instance().is_none());
    }

    #[test]
    fn failure_requires_loading_first() {
        let mut handle = ModelHandle::<()>::new(ModelKind::Classifier, "MobileNet");
        handle.mark_failed("too early");
        assert_eq!(handle.status(), ModelStatus::Idle);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "MobileNet got the wrong model")]
    fn ready_rejects_an_instance_of_the_other_kind() {
        let mut handle = handle_in(ModelKind::Classifier, "MobileNet", ModelStatus::Loading);
        handle.mark_ready(1.0, noop_instance(ModelKind::Detector));
    }
}
