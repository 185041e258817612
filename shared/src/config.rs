use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Built-in configuration, compiled into every build.
pub const DEFAULT_CONFIG: &str = include_str!("../../config/duolens.yaml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub models: ModelsConfig,
    #[serde(default)]
    pub gallery: Vec<GalleryImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub detector: DetectorConfig,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    pub name: String,
    /// Backbone passed to the detector's `load`, e.g. "lite_mobilenet_v2".
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub max_detections: Option<u32>,
    #[serde(default)]
    pub min_score: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub name: String,
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub alpha: Option<f32>,
    #[serde(default)]
    pub top_k: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub src: String,
    pub alt: String,
}

impl AppConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let detector = &self.models.detector;
        let classifier = &self.models.classifier;

        if detector.name.trim().is_empty() || classifier.name.trim().is_empty() {
            return Err(ConfigError::Invalid("model names must not be empty".into()));
        }
        if let Some(score) = detector.min_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(ConfigError::Invalid(format!(
                    "detector min_score {score} is outside [0, 1]"
                )));
            }
        }
        if detector.max_detections == Some(0) {
            return Err(ConfigError::Invalid("detector max_detections must be positive".into()));
        }
        if classifier.top_k == Some(0) {
            return Err(ConfigError::Invalid("classifier top_k must be positive".into()));
        }
        if let Some(image) = self.gallery.iter().find(|image| image.src.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "gallery image \"{}\" has no src",
                image.alt
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        match Self::from_yaml(DEFAULT_CONFIG) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Built-in config is invalid, using bare defaults: {e}");
                Self {
                    models: ModelsConfig {
                        detector: DetectorConfig {
                            name: "COCO-SSD".into(),
                            base: None,
                            max_detections: None,
                            min_score: None,
                        },
                        classifier: ClassifierConfig {
                            name: "MobileNet".into(),
                            version: None,
                            alpha: None,
                            top_k: None,
                        },
                    },
                    gallery: Vec::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_parses() {
        let config = AppConfig::from_yaml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.models.detector.name, "COCO-SSD");
        assert_eq!(config.models.classifier.name, "MobileNet");
        assert_eq!(config.gallery.len(), 12);
        assert_eq!(config.gallery[0].src, "./cow.jpg");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn optional_fields_default_to_none() {
        let config = AppConfig::from_yaml(
            "models:\n  detector:\n    name: D\n  classifier:\n    name: C\n",
        )
        .unwrap();
        assert_eq!(config.models.detector.base, None);
        assert_eq!(config.models.classifier.top_k, None);
        assert!(config.gallery.is_empty());
    }

    #[test]
    fn rejects_out_of_range_min_score() {
        let err = AppConfig::from_yaml(
            "models:\n  detector:\n    name: D\n    min_score: 1.5\n  classifier:\n    name: C\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "{err}");
    }

    #[test]
    fn rejects_blank_gallery_src() {
        let err = AppConfig::from_yaml(
            "models:\n  detector:\n    name: D\n  classifier:\n    name: C\ngallery:\n  - { src: '', alt: Empty }\n",
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Invalid config: gallery image \"Empty\" has no src");
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = AppConfig::from_yaml("models: [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
