use crate::image_source::ImageToken;
use crate::kind::ModelKind;
use thiserror::Error;

/// Failure reported by an external model service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("model runtime is unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Rejected(String),

    #[error("unexpected model output: {0}")]
    MalformedOutput(String),
}

/// A model's `load()` call rejected. The handle degrades to `Failed`.
#[derive(Debug, Clone, Error)]
#[error("{name} ({kind}) failed to load: {source}")]
pub struct ModelLoadError {
    pub kind: ModelKind,
    pub name: String,
    pub source: ServiceError,
}

/// One inference call rejected for a given model and image.
#[derive(Debug, Clone, Error)]
#[error("{name} ({kind}) inference failed for image {image}: {source}")]
pub struct InferenceError {
    pub kind: ModelKind,
    pub name: String,
    pub image: ImageToken,
    pub source: ServiceError,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
