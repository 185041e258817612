use crate::error::{ModelLoadError, ServiceError};
use crate::kind::ModelKind;
use crate::service::ModelInstance;
use crate::session::Session;
use futures::future::{self, LocalBoxFuture};
use futures::FutureExt;
use strum::IntoEnumIterator;

impl<I: ?Sized + 'static> Session<I> {
    /// Starts loading both models. Meant to be called once at startup; the
    /// returned future drives both loads concurrently and finishes when both
    /// have settled.
    ///
    /// Each load is independent: a rejected load fails only its own handle.
    /// There is no retry and no timeout, a load that never resolves leaves
    /// its handle `Loading`.
    pub fn load_all(&self) -> LocalBoxFuture<'static, ()> {
        let started: Vec<ModelKind> = {
            let mut state = self.inner.state.borrow_mut();
            let now = self.inner.clock.now_ms();
            ModelKind::iter()
                .filter(|&kind| state.handles[kind].begin_loading(now))
                .collect()
        };

        if started.is_empty() {
            log::warn!("Models are already loading; ignoring repeated load request");
            return future::ready(()).boxed_local();
        }
        self.notify();

        let branches: Vec<_> = started
            .into_iter()
            .map(|kind| {
                let service = &self.inner.services[kind];
                log::info!("Loading {} ({kind})", service.name());
                let pending = service.load();
                let session = self.downgrade();

                async move {
                    let result = pending.await;
                    if let Some(session) = Session::upgrade(&session) {
                        session.finish_loading(kind, result).await;
                    }
                }
            })
            .collect();

        future::join_all(branches).map(|_| ()).boxed_local()
    }

    async fn finish_loading(&self, kind: ModelKind, result: Result<ModelInstance<I>, ServiceError>) {
        let late_run = {
            let mut state = self.inner.state.borrow_mut();
            let now = self.inner.clock.now_ms();
            let handle = &mut state.handles[kind];

            match result {
                Ok(instance) => {
                    handle.mark_ready(now, instance);
                    log::info!(
                        "{} model loaded in {:.2} seconds",
                        handle.name(),
                        handle.load_duration_ms().unwrap_or_default() / 1000.0
                    );
                    // The user may have picked an image while this model was loading.
                    self.dispatch(&mut *state, kind)
                }
                Err(source) => {
                    let error = ModelLoadError {
                        kind,
                        name: handle.name().to_string(),
                        source,
                    };
                    log::warn!("{error}");
                    handle.mark_failed(error.source.to_string());
                    None
                }
            }
        };
        self.notify();

        if let Some(job) = late_run {
            job.await;
        }
    }
}
