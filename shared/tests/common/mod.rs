#![allow(dead_code)]

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use shared::{
    Classification, ClassifierService, Classify, Detect, Detection, DetectorService, ServiceError,
    Session,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tokio::sync::oneshot;

/// Stand-in for a decoded image; the name keys scripted replies.
pub struct TestImage(pub &'static str);

pub type Reply<T> = Result<T, String>;

enum Scripted<T> {
    Now(Reply<T>),
    Gate(oneshot::Receiver<Reply<T>>),
}

async fn settle<T>(scripted: Scripted<T>) -> Result<T, ServiceError> {
    let reply = match scripted {
        Scripted::Now(reply) => reply,
        Scripted::Gate(rx) => rx.await.unwrap_or_else(|_| Err("gate dropped".into())),
    };
    reply.map_err(ServiceError::Rejected)
}

/// Per-image replies for one fake model, plus a record of every call.
pub struct Script<T> {
    replies: RefCell<HashMap<&'static str, Scripted<T>>>,
    calls: RefCell<Vec<&'static str>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            replies: RefCell::new(HashMap::new()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl<T> Script<T> {
    pub fn reply(&self, image: &'static str, reply: Reply<T>) {
        self.replies.borrow_mut().insert(image, Scripted::Now(reply));
    }

    /// The call for `image` blocks until the returned sender fires.
    pub fn gate(&self, image: &'static str) -> oneshot::Sender<Reply<T>> {
        let (tx, rx) = oneshot::channel();
        self.replies.borrow_mut().insert(image, Scripted::Gate(rx));
        tx
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }

    fn next(&self, image: &'static str, fallback: impl FnOnce() -> T) -> Scripted<T> {
        self.calls.borrow_mut().push(image);
        self.replies
            .borrow_mut()
            .remove(image)
            .unwrap_or_else(|| Scripted::Now(Ok(fallback())))
    }
}

pub enum LoadPlan {
    Succeed,
    Fail(&'static str),
    Gated(oneshot::Receiver<Reply<()>>),
    Never,
}

impl LoadPlan {
    pub fn gated() -> (Self, oneshot::Sender<Reply<()>>) {
        let (tx, rx) = oneshot::channel();
        (LoadPlan::Gated(rx), tx)
    }

    async fn run(self) -> Result<(), ServiceError> {
        match self {
            LoadPlan::Succeed => Ok(()),
            LoadPlan::Fail(reason) => Err(ServiceError::Rejected(reason.into())),
            LoadPlan::Gated(rx) => settle(Scripted::Gate(rx)).await,
            LoadPlan::Never => futures::future::pending().await,
        }
    }
}

struct FakeDetector {
    plan: RefCell<Option<LoadPlan>>,
    script: Rc<Script<Vec<Detection>>>,
}

struct DetectModel(Rc<Script<Vec<Detection>>>);

impl Detect<TestImage> for DetectModel {
    fn detect<'a>(
        &'a self,
        image: &'a TestImage,
    ) -> LocalBoxFuture<'a, Result<Vec<Detection>, ServiceError>> {
        let name = image.0;
        let scripted = self.0.next(name, || {
            vec![Detection {
                class: format!("{name}-object"),
                score: 0.9,
                bbox: Some([0.0, 0.0, 10.0, 10.0]),
            }]
        });
        settle(scripted).boxed_local()
    }
}

impl DetectorService<TestImage> for FakeDetector {
    fn name(&self) -> &str {
        "COCO-SSD"
    }

    fn load(&self) -> LocalBoxFuture<'static, Result<Rc<dyn Detect<TestImage>>, ServiceError>> {
        let plan = self.plan.borrow_mut().take().unwrap_or(LoadPlan::Succeed);
        let script = Rc::clone(&self.script);
        async move {
            plan.run().await?;
            Ok(Rc::new(DetectModel(script)) as Rc<dyn Detect<TestImage>>)
        }
        .boxed_local()
    }
}

struct FakeClassifier {
    plan: RefCell<Option<LoadPlan>>,
    script: Rc<Script<Vec<Classification>>>,
}

struct ClassifyModel(Rc<Script<Vec<Classification>>>);

impl Classify<TestImage> for ClassifyModel {
    fn classify<'a>(
        &'a self,
        image: &'a TestImage,
    ) -> LocalBoxFuture<'a, Result<Vec<Classification>, ServiceError>> {
        let name = image.0;
        let scripted = self.0.next(name, || {
            vec![Classification {
                class_name: format!("{name}-label"),
                probability: 0.8,
            }]
        });
        settle(scripted).boxed_local()
    }
}

impl ClassifierService<TestImage> for FakeClassifier {
    fn name(&self) -> &str {
        "MobileNet"
    }

    fn load(&self) -> LocalBoxFuture<'static, Result<Rc<dyn Classify<TestImage>>, ServiceError>> {
        let plan = self.plan.borrow_mut().take().unwrap_or(LoadPlan::Succeed);
        let script = Rc::clone(&self.script);
        async move {
            plan.run().await?;
            Ok(Rc::new(ClassifyModel(script)) as Rc<dyn Classify<TestImage>>)
        }
        .boxed_local()
    }
}

pub struct Fakes {
    pub detector: Rc<Script<Vec<Detection>>>,
    pub classifier: Rc<Script<Vec<Classification>>>,
    pub clock: Rc<Cell<f64>>,
}

pub fn session_with(detector: LoadPlan, classifier: LoadPlan) -> (Session<TestImage>, Fakes) {
    let fakes = Fakes {
        detector: Rc::new(Script::default()),
        classifier: Rc::new(Script::default()),
        clock: Rc::new(Cell::new(0.0)),
    };
    let clock = Rc::clone(&fakes.clock);

    let session = Session::new(
        FakeDetector {
            plan: RefCell::new(Some(detector)),
            script: Rc::clone(&fakes.detector),
        },
        FakeClassifier {
            plan: RefCell::new(Some(classifier)),
            script: Rc::clone(&fakes.classifier),
        },
        move || clock.get(),
    );
    (session, fakes)
}

/// Both models loaded and ready.
pub async fn ready_session() -> (Session<TestImage>, Fakes) {
    let (session, fakes) = session_with(LoadPlan::Succeed, LoadPlan::Succeed);
    session.load_all().await;
    (session, fakes)
}

pub fn image(name: &'static str) -> Rc<TestImage> {
    Rc::new(TestImage(name))
}
