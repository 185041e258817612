use crate::error::{InferenceError, ServiceError};
use crate::image_source::ImageToken;
use crate::kind::ModelKind;
use crate::prediction::{Prediction, PredictionSet};
use crate::session::{DecodedImage, Inner, PredictionOutcome, Session, SessionState};
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use std::rc::{Rc, Weak};
use strum::IntoEnumIterator;

/// How one dispatched inference call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceOutcome {
    Committed { kind: ModelKind, image: ImageToken, predictions: usize },
    Failed { kind: ModelKind, image: ImageToken, message: String },
    /// The selection moved on before the call returned; the result was dropped.
    Stale { kind: ModelKind, image: ImageToken },
}

impl InferenceOutcome {
    pub fn kind(&self) -> ModelKind {
        match self {
            InferenceOutcome::Committed { kind, .. }
            | InferenceOutcome::Failed { kind, .. }
            | InferenceOutcome::Stale { kind, .. } => *kind,
        }
    }
}

/// Owns the `in_flight` mark for one dispatched call. Released when the call
/// commits or when its future is dropped unfinished, so a later decode signal
/// for the same image can dispatch again.
struct InFlight<I: ?Sized + 'static> {
    session: Weak<Inner<I>>,
    kind: ModelKind,
    token: ImageToken,
}

impl<I: ?Sized + 'static> Drop for InFlight<I> {
    fn drop(&mut self) {
        let Some(inner) = self.session.upgrade() else {
            return;
        };
        let Ok(mut state) = inner.state.try_borrow_mut() else {
            return;
        };
        if state.in_flight[self.kind] == Some(self.token) {
            state.in_flight[self.kind] = None;
        }
    }
}

impl<I: ?Sized + 'static> Session<I> {
    /// The image selected under `token` has finished decoding. Runs every
    /// ready model on it; models still loading pick it up once they are
    /// ready.
    ///
    /// The returned future completes once every dispatched call has been
    /// committed or dropped. Each call commits on its own, so one model's
    /// failure or slowness never holds back the other.
    pub fn on_image_selected(
        &self,
        token: ImageToken,
        image: Rc<I>,
    ) -> LocalBoxFuture<'static, Vec<InferenceOutcome>> {
        let jobs: Vec<_> = {
            let mut state = self.inner.state.borrow_mut();
            if !state.images.is_current(token) {
                log::debug!("Ignoring decoded image {token}: no longer selected");
                return future::ready(Vec::new()).boxed_local();
            }
            state.decoded = Some(DecodedImage { token, image });
            state.image_error = None;

            ModelKind::iter()
                .filter_map(|kind| self.dispatch(&mut *state, kind))
                .collect()
        };
        self.notify();

        future::join_all(jobs).boxed_local()
    }

    /// Starts inference for `kind` on the decoded current image, if the model
    /// is ready and has not already been run on it.
    pub(crate) fn dispatch(
        &self,
        state: &mut SessionState<I>,
        kind: ModelKind,
    ) -> Option<LocalBoxFuture<'static, InferenceOutcome>> {
        let (token, image) = state
            .decoded
            .as_ref()
            .map(|decoded| (decoded.token, Rc::clone(&decoded.image)))?;

        let handle = &state.handles[kind];
        let Some(instance) = handle.instance().cloned() else {
            log::debug!("{} is {}; not running it on image {token}", handle.name(), handle.status());
            return None;
        };

        let already_run = state.outcomes[kind]
            .as_ref()
            .is_some_and(|outcome| outcome.image_id() == token);
        if state.in_flight[kind] == Some(token) || already_run {
            log::debug!("{} already ran on image {token}", handle.name());
            return None;
        }

        let name = handle.name().to_string();
        state.in_flight[kind] = Some(token);
        let guard = InFlight {
            session: self.downgrade(),
            kind,
            token,
        };

        Some(
            async move {
                let result = instance.infer(&image).await;
                let session = Session::upgrade(&guard.session);
                drop(guard);
                match session {
                    Some(session) => session.commit(kind, token, name, result),
                    None => InferenceOutcome::Stale { kind, image: token },
                }
            }
            .boxed_local(),
        )
    }

    fn commit(
        &self,
        kind: ModelKind,
        token: ImageToken,
        name: String,
        result: Result<Vec<Prediction>, ServiceError>,
    ) -> InferenceOutcome {
        let outcome = {
            let mut state = self.inner.state.borrow_mut();
            if !state.images.is_current(token) {
                log::debug!("Dropping stale {name} result for image {token}");
                return InferenceOutcome::Stale { kind, image: token };
            }

            match result {
                Ok(items) => {
                    let predictions = items.len();
                    log::debug!("{name} produced {predictions} predictions for image {token}");
                    state.outcomes[kind] = Some(PredictionOutcome::Ready(PredictionSet {
                        image_id: token,
                        model_kind: kind,
                        items,
                    }));
                    InferenceOutcome::Committed { kind, image: token, predictions }
                }
                Err(source) => {
                    let error = InferenceError {
                        kind,
                        name,
                        image: token,
                        source,
                    };
                    log::warn!("{error}");
                    let message = error.source.to_string();
                    state.outcomes[kind] = Some(PredictionOutcome::Failed {
                        image_id: token,
                        error: message.clone(),
                    });
                    InferenceOutcome::Failed { kind, image: token, message }
                }
            }
        };
        self.notify();
        outcome
    }
}
