//! Browser bindings for the TensorFlow.js `cocoSsd` and `mobilenet` globals
//! (loaded by script tags in index.html).

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use js_sys::{JSON, Promise};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::config::{ClassifierConfig, DetectorConfig};
use shared::{
    Classification, ClassifierService, Classify, Detect, Detection, DetectorService, ServiceError,
};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlImageElement;

#[wasm_bindgen]
unsafe extern "C" {
    #[wasm_bindgen(js_namespace = cocoSsd, js_name = load, catch)]
    fn coco_ssd_load(config: &JsValue) -> Result<Promise, JsValue>;

    #[wasm_bindgen(js_namespace = mobilenet, js_name = load, catch)]
    fn mobilenet_load(config: &JsValue) -> Result<Promise, JsValue>;

    type ObjectDetection;

    #[wasm_bindgen(method, catch)]
    fn detect(
        this: &ObjectDetection,
        img: &HtmlImageElement,
        max_num_boxes: Option<u32>,
        min_score: Option<f32>,
    ) -> Result<Promise, JsValue>;

    type MobileNet;

    #[wasm_bindgen(method, catch)]
    fn classify(
        this: &MobileNet,
        img: &HtmlImageElement,
        top_k: Option<u32>,
    ) -> Result<Promise, JsValue>;
}

fn js_message(value: &JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        String::from(error.message())
    } else if let Some(text) = value.as_string() {
        text
    } else {
        format!("{:?}", value)
    }
}

fn rejected(value: JsValue) -> ServiceError {
    ServiceError::Rejected(js_message(&value))
}

// A missing global means the library script never loaded.
fn load_error(value: JsValue) -> ServiceError {
    if value.is_instance_of::<js_sys::ReferenceError>() {
        ServiceError::Unavailable(js_message(&value))
    } else {
        rejected(value)
    }
}

/// Serializes load options; an empty set becomes `undefined` so the library
/// applies its own defaults.
fn load_options<T: Serialize>(options: &T) -> Result<JsValue, ServiceError> {
    let value = serde_json::to_value(options)
        .map_err(|e| ServiceError::Rejected(format!("Invalid load options: {}", e)))?;
    if value.as_object().is_some_and(|map| map.is_empty()) {
        return Ok(JsValue::UNDEFINED);
    }
    JSON::parse(&value.to_string()).map_err(rejected)
}

fn decode_output<T: DeserializeOwned>(value: &JsValue) -> Result<T, ServiceError> {
    let text: String = JSON::stringify(value)
        .map_err(|e| ServiceError::MalformedOutput(js_message(&e)))?
        .into();
    serde_json::from_str(&text).map_err(|e| ServiceError::MalformedOutput(e.to_string()))
}

// Detector

#[derive(Serialize)]
struct CocoSsdLoadOptions<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    base: Option<&'a str>,
}

pub struct CocoSsdService {
    config: DetectorConfig,
}

impl CocoSsdService {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }
}

struct CocoSsdModel {
    inner: ObjectDetection,
    max_detections: Option<u32>,
    min_score: Option<f32>,
}

impl Detect<HtmlImageElement> for CocoSsdModel {
    fn detect<'a>(
        &'a self,
        image: &'a HtmlImageElement,
    ) -> LocalBoxFuture<'a, Result<Vec<Detection>, ServiceError>> {
        async move {
            let promise = self
                .inner
                .detect(image, self.max_detections, self.min_score)
                .map_err(rejected)?;
            let output = JsFuture::from(promise).await.map_err(rejected)?;
            decode_output(&output)
        }
        .boxed_local()
    }
}

impl DetectorService<HtmlImageElement> for CocoSsdService {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn load(&self) -> LocalBoxFuture<'static, Result<Rc<dyn Detect<HtmlImageElement>>, ServiceError>> {
        // Start the download now; the future only waits for it.
        let pending = load_options(&CocoSsdLoadOptions {
            base: self.config.base.as_deref(),
        })
        .and_then(|options| coco_ssd_load(&options).map_err(load_error));
        let max_detections = self.config.max_detections;
        let min_score = self.config.min_score;

        async move {
            let model = JsFuture::from(pending?).await.map_err(load_error)?;
            Ok(Rc::new(CocoSsdModel {
                inner: model.unchecked_into(),
                max_detections,
                min_score,
            }) as Rc<dyn Detect<HtmlImageElement>>)
        }
        .boxed_local()
    }
}

// Classifier

#[derive(Serialize)]
struct MobileNetLoadOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alpha: Option<f32>,
}

pub struct MobileNetService {
    config: ClassifierConfig,
}

impl MobileNetService {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }
}

struct MobileNetModel {
    inner: MobileNet,
    top_k: Option<u32>,
}

impl Classify<HtmlImageElement> for MobileNetModel {
    fn classify<'a>(
        &'a self,
        image: &'a HtmlImageElement,
    ) -> LocalBoxFuture<'a, Result<Vec<Classification>, ServiceError>> {
        async move {
            let promise = self.inner.classify(image, self.top_k).map_err(rejected)?;
            let output = JsFuture::from(promise).await.map_err(rejected)?;
            decode_output(&output)
        }
        .boxed_local()
    }
}

impl ClassifierService<HtmlImageElement> for MobileNetService {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn load(&self) -> LocalBoxFuture<'static, Result<Rc<dyn Classify<HtmlImageElement>>, ServiceError>> {
        let pending = load_options(&MobileNetLoadOptions {
            version: self.config.version,
            alpha: self.config.alpha,
        })
        .and_then(|options| mobilenet_load(&options).map_err(load_error));
        let top_k = self.config.top_k;

        async move {
            let model = JsFuture::from(pending?).await.map_err(load_error)?;
            Ok(Rc::new(MobileNetModel {
                inner: model.unchecked_into(),
                top_k,
            }) as Rc<dyn Classify<HtmlImageElement>>)
        }
        .boxed_local()
    }
}
