//! Seams to the external, pre-trained models.
//!
//! The models themselves are opaque: something that can be loaded, and once
//! loaded can run on a decoded image of type `I`. Implementations live with
//! the host (the browser bindings in the frontend, fakes in tests).

use crate::error::ServiceError;
use crate::kind::ModelKind;
use crate::prediction::{Classification, Detection, Prediction};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

pub trait Detect<I: ?Sized> {
    fn detect<'a>(&'a self, image: &'a I) -> LocalBoxFuture<'a, Result<Vec<Detection>, ServiceError>>;
}

pub trait Classify<I: ?Sized> {
    fn classify<'a>(
        &'a self,
        image: &'a I,
    ) -> LocalBoxFuture<'a, Result<Vec<Classification>, ServiceError>>;
}

pub trait DetectorService<I: ?Sized> {
    /// Display name, e.g. "COCO-SSD".
    fn name(&self) -> &str;

    fn load(&self) -> LocalBoxFuture<'static, Result<Rc<dyn Detect<I>>, ServiceError>>;
}

pub trait ClassifierService<I: ?Sized> {
    /// Display name, e.g. "MobileNet".
    fn name(&self) -> &str;

    fn load(&self) -> LocalBoxFuture<'static, Result<Rc<dyn Classify<I>>, ServiceError>>;
}

/// Millisecond timestamps for load timing.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

impl<F: Fn() -> f64> Clock for F {
    fn now_ms(&self) -> f64 {
        self()
    }
}

/// Either service, so the loader can treat both kinds alike.
pub(crate) enum AnyService<I: ?Sized> {
    Detector(Rc<dyn DetectorService<I>>),
    Classifier(Rc<dyn ClassifierService<I>>),
}

impl<I: ?Sized + 'static> AnyService<I> {
    pub(crate) fn name(&self) -> &str {
        match self {
            AnyService::Detector(service) => service.name(),
            AnyService::Classifier(service) => service.name(),
        }
    }

    pub(crate) fn load(&self) -> LocalBoxFuture<'static, Result<ModelInstance<I>, ServiceError>> {
        use futures::FutureExt;

        match self {
            AnyService::Detector(service) => {
                service.load().map(|r| r.map(ModelInstance::Detector)).boxed_local()
            }
            AnyService::Classifier(service) => {
                service.load().map(|r| r.map(ModelInstance::Classifier)).boxed_local()
            }
        }
    }
}

/// A loaded model, ready for inference.
pub enum ModelInstance<I: ?Sized> {
    Detector(Rc<dyn Detect<I>>),
    Classifier(Rc<dyn Classify<I>>),
}

impl<I: ?Sized> Clone for ModelInstance<I> {
    fn clone(&self) -> Self {
        match self {
            ModelInstance::Detector(model) => ModelInstance::Detector(Rc::clone(model)),
            ModelInstance::Classifier(model) => ModelInstance::Classifier(Rc::clone(model)),
        }
    }
}

impl<I: ?Sized> ModelInstance<I> {
    pub fn kind(&self) -> ModelKind {
        match self {
            ModelInstance::Detector(_) => ModelKind::Detector,
            ModelInstance::Classifier(_) => ModelKind::Classifier,
        }
    }

    /// `detect` or `classify`, normalised to predictions in model order.
    pub async fn infer(&self, image: &I) -> Result<Vec<Prediction>, ServiceError> {
        match self {
            ModelInstance::Detector(model) => Ok(model
                .detect(image)
                .await?
                .into_iter()
                .map(Prediction::from)
                .collect()),
            ModelInstance::Classifier(model) => Ok(model
                .classify(image)
                .await?
                .into_iter()
                .map(Prediction::from)
                .collect()),
        }
    }
}
