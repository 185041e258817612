use crate::image_source::ImageToken;
use crate::kind::ModelKind;
use serde::{Deserialize, Serialize};

/// Raw detector output, shaped like the COCO-SSD result objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: String,
    pub score: f32,
    /// `[x, y, width, height]` in image pixels.
    #[serde(default)]
    pub bbox: Option<[f32; 4]>,
}

/// Raw classifier output, shaped like the MobileNet result objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub class_name: String,
    pub probability: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    /// Always within `[0, 1]`.
    pub confidence: f32,
    /// Present only for detector predictions.
    pub bbox: Option<BoundingBox>,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: clamp_confidence(confidence),
            bbox: None,
        }
    }

    /// Two decimals, the way the lists show it.
    pub fn score_text(&self) -> String {
        format!("{:.2}", self.confidence)
    }
}

fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

impl From<Detection> for Prediction {
    fn from(detection: Detection) -> Self {
        Self {
            label: detection.class,
            confidence: clamp_confidence(detection.score),
            bbox: detection.bbox.map(|[x, y, width, height]| BoundingBox {
                x,
                y,
                width,
                height,
            }),
        }
    }
}

impl From<Classification> for Prediction {
    fn from(classification: Classification) -> Self {
        Prediction::new(classification.class_name, classification.probability)
    }
}

/// All predictions one model produced for one image selection. Replaced
/// wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionSet {
    pub image_id: ImageToken,
    pub model_kind: ModelKind,
    pub items: Vec<Prediction>,
}

impl PredictionSet {
    pub fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|p| p.label.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_keeps_box_and_clamps_score() {
        let raw: Vec<Detection> = serde_json::from_str(
            r#"[{"class":"cow","score":1.2,"bbox":[1.0,2.0,30.0,40.0]},{"class":"dog","score":0.4}]"#,
        )
        .unwrap();
        let predictions: Vec<Prediction> = raw.into_iter().map(Prediction::from).collect();

        assert_eq!(predictions[0].label, "cow");
        assert_eq!(predictions[0].confidence, 1.0);
        assert_eq!(
            predictions[0].bbox,
            Some(BoundingBox { x: 1.0, y: 2.0, width: 30.0, height: 40.0 })
        );
        assert_eq!(predictions[1].bbox, None);
    }

    #[test]
    fn classification_uses_camel_case_fields() {
        let raw: Vec<Classification> =
            serde_json::from_str(r#"[{"className":"pizza","probability":0.876}]"#).unwrap();
        let prediction = Prediction::from(raw[0].clone());

        assert_eq!(prediction.label, "pizza");
        assert_eq!(prediction.bbox, None);
        assert_eq!(prediction.score_text(), "0.88");
    }

    #[test]
    fn nan_confidence_becomes_zero() {
        assert_eq!(Prediction::new("x", f32::NAN).confidence, 0.0);
        assert_eq!(Prediction::new("x", -0.5).confidence, 0.0);
    }
}
