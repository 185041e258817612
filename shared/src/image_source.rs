use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Identifies one image selection. Strictly increasing within a session, so a
/// result carrying an older token belongs to a superseded selection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[display(fmt = "#{}", _0)]
pub struct ImageToken(u64);

impl ImageToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageOrigin {
    Upload,
    Gallery,
}

/// The currently selected image. Replaced on every selection, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    pub id: ImageToken,
    pub uri: String,
    pub origin: ImageOrigin,
}

#[derive(Debug, Default)]
pub struct ImageSelector {
    issued: u64,
    current: Option<ImageSource>,
}

impl ImageSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `uri` the current image under a fresh token. Selecting the same
    /// uri twice still yields two distinct tokens.
    pub fn select(&mut self, uri: impl Into<String>, origin: ImageOrigin) -> ImageToken {
        self.issued += 1;
        let id = ImageToken(self.issued);
        self.current = Some(ImageSource {
            id,
            uri: uri.into(),
            origin,
        });
        id
    }

    pub fn current(&self) -> Option<&ImageSource> {
        self.current.as_ref()
    }

    pub fn is_current(&self, token: ImageToken) -> bool {
        self.current.as_ref().is_some_and(|source| source.id == token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_increase_even_for_repeated_uri() {
        let mut selector = ImageSelector::new();
        let first = selector.select("./cow.jpg", ImageOrigin::Gallery);
        let second = selector.select("./cow.jpg", ImageOrigin::Gallery);

        assert!(second > first);
        assert!(!selector.is_current(first));
        assert!(selector.is_current(second));
    }

    #[test]
    fn selection_replaces_current_source() {
        let mut selector = ImageSelector::new();
        assert!(selector.current().is_none());

        selector.select("blob:upload-1", ImageOrigin::Upload);
        let token = selector.select("./dog.jpg", ImageOrigin::Gallery);

        let current = selector.current().unwrap();
        assert_eq!(current.id, token);
        assert_eq!(current.uri, "./dog.jpg");
        assert_eq!(current.origin, ImageOrigin::Gallery);
        assert_eq!(token.to_string(), "#2");
    }
}
