use crate::handle::{ModelHandle, ModelStatus};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusLine {
    pub message: String,
    pub severity: Severity,
}

impl StatusLine {
    fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Single human-facing status for the pair of models.
///
/// While either model is still pending the app reports "Loading...", even if
/// the other one already finished; the outcome is only known once both have
/// settled.
pub fn project<I: ?Sized>(detector: &ModelHandle<I>, classifier: &ModelHandle<I>) -> StatusLine {
    use ModelStatus::*;

    match (detector.status(), classifier.status()) {
        (d, c) if d.is_pending() || c.is_pending() => StatusLine::new("Loading...", Severity::Warn),
        (Ready, Ready) => StatusLine::new("Both models are online", Severity::Ok),
        (Ready, _) => StatusLine::new(format!("{} is online", detector.name()), Severity::Ok),
        (_, Ready) => StatusLine::new(format!("{} is online", classifier.name()), Severity::Ok),
        _ => StatusLine::new("Both models are offline", Severity::Error),
    }
}
