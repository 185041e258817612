use crate::handle::{ModelHandle, ModelStatus};
use crate::image_source::{ImageOrigin, ImageSelector, ImageToken};
use crate::kind::{ByKind, ModelKind};
use crate::prediction::PredictionSet;
use crate::service::{AnyService, ClassifierService, Clock, DetectorService};
use crate::status::{self, StatusLine};
use crate::view::SessionView;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// What the coordinator last committed for one model kind. Always belongs to
/// the current image; cleared on every new selection.
#[derive(Debug, Clone, PartialEq)]
pub enum PredictionOutcome {
    Ready(PredictionSet),
    Failed { image_id: ImageToken, error: String },
}

impl PredictionOutcome {
    pub fn image_id(&self) -> ImageToken {
        match self {
            PredictionOutcome::Ready(set) => set.image_id,
            PredictionOutcome::Failed { image_id, .. } => *image_id,
        }
    }
}

pub(crate) struct DecodedImage<I: ?Sized> {
    pub(crate) token: ImageToken,
    pub(crate) image: Rc<I>,
}

pub(crate) struct SessionState<I: ?Sized> {
    pub(crate) handles: ByKind<ModelHandle<I>>,
    pub(crate) images: ImageSelector,
    pub(crate) decoded: Option<DecodedImage<I>>,
    pub(crate) image_error: Option<String>,
    pub(crate) outcomes: ByKind<Option<PredictionOutcome>>,
    pub(crate) in_flight: ByKind<Option<ImageToken>>,
}

pub(crate) struct Inner<I: ?Sized + 'static> {
    pub(crate) state: RefCell<SessionState<I>>,
    pub(crate) services: ByKind<AnyService<I>>,
    pub(crate) clock: Box<dyn Clock>,
    listeners: RefCell<Vec<Rc<dyn Fn()>>>,
}

/// Single-threaded owner of both model handles, the current image and the
/// current predictions. Cloning yields another handle to the same session.
///
/// Model handles are written only by the loader; predictions only by the
/// coordinator, under the token check.
pub struct Session<I: ?Sized + 'static> {
    pub(crate) inner: Rc<Inner<I>>,
}

impl<I: ?Sized + 'static> Clone for Session<I> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<I: ?Sized + 'static> Session<I> {
    pub fn new(
        detector: impl DetectorService<I> + 'static,
        classifier: impl ClassifierService<I> + 'static,
        clock: impl Clock + 'static,
    ) -> Self {
        let handles = ByKind::new(
            ModelHandle::new(ModelKind::Detector, detector.name()),
            ModelHandle::new(ModelKind::Classifier, classifier.name()),
        );
        let services = ByKind::new(
            AnyService::Detector(Rc::new(detector)),
            AnyService::Classifier(Rc::new(classifier)),
        );

        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(SessionState {
                    handles,
                    images: ImageSelector::new(),
                    decoded: None,
                    image_error: None,
                    outcomes: ByKind::default(),
                    in_flight: ByKind::default(),
                }),
                services,
                clock: Box::new(clock),
                listeners: RefCell::new(Vec::new()),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<Inner<I>> {
        Rc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<Inner<I>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// Called after every observable change. Listeners may read the session.
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub(crate) fn notify(&self) {
        let listeners = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener();
        }
    }

    /// Makes `uri` the current image. Predictions for the previous image are
    /// cleared right away, and anything still in flight for it will be
    /// dropped on arrival.
    pub fn select(&self, uri: impl Into<String>, origin: ImageOrigin) -> ImageToken {
        let token = {
            let mut state = self.inner.state.borrow_mut();
            let token = state.images.select(uri, origin);
            state.decoded = None;
            state.image_error = None;
            state.outcomes = ByKind::default();
            token
        };
        log::debug!("Selected {origin} image {token}");
        self.notify();
        token
    }

    /// The image element for `token` could not be decoded.
    pub fn on_image_failed(&self, token: ImageToken, message: impl Into<String>) {
        {
            let mut state = self.inner.state.borrow_mut();
            if !state.images.is_current(token) {
                return;
            }
            let message = message.into();
            log::warn!("Image {token} failed to decode: {message}");
            state.image_error = Some(message);
        }
        self.notify();
    }

    pub fn model_status(&self, kind: ModelKind) -> ModelStatus {
        self.inner.state.borrow().handles[kind].status()
    }

    pub fn prediction_set(&self, kind: ModelKind) -> Option<PredictionSet> {
        match &self.inner.state.borrow().outcomes[kind] {
            Some(PredictionOutcome::Ready(set)) => Some(set.clone()),
            _ => None,
        }
    }

    pub fn outcome(&self, kind: ModelKind) -> Option<PredictionOutcome> {
        self.inner.state.borrow().outcomes[kind].clone()
    }

    pub fn status(&self) -> StatusLine {
        let state = self.inner.state.borrow();
        status::project(&state.handles.detector, &state.handles.classifier)
    }

    pub fn view(&self) -> SessionView {
        let state = self.inner.state.borrow();
        SessionView::from_state(&*state)
    }
}
