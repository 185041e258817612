use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use strum_macros::{Display, EnumIter};

/// The two model families the app runs side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ModelKind {
    /// Bounding-box object detection (COCO-SSD).
    Detector,
    /// Whole-image labelling (MobileNet).
    Classifier,
}

/// One value per model kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ByKind<T> {
    pub detector: T,
    pub classifier: T,
}

impl<T> ByKind<T> {
    pub fn new(detector: T, classifier: T) -> Self {
        Self { detector, classifier }
    }
}

impl<T> Index<ModelKind> for ByKind<T> {
    type Output = T;

    fn index(&self, kind: ModelKind) -> &T {
        match kind {
            ModelKind::Detector => &self.detector,
            ModelKind::Classifier => &self.classifier,
        }
    }
}

impl<T> IndexMut<ModelKind> for ByKind<T> {
    fn index_mut(&mut self, kind: ModelKind) -> &mut T {
        match kind {
            ModelKind::Detector => &mut self.detector,
            ModelKind::Classifier => &mut self.classifier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn kinds_display_lowercase() {
        let names: Vec<String> = ModelKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(names, vec!["detector", "classifier"]);
    }

    #[test]
    fn index_by_kind() {
        let mut slots = ByKind::new(1, 2);
        slots[ModelKind::Classifier] += 10;
        assert_eq!(slots[ModelKind::Detector], 1);
        assert_eq!(slots[ModelKind::Classifier], 12);
    }
}
