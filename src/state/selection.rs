/// The recorded selection and everything that must stay in sync with it
///
/// The hidden form value, the preview image, and the caption always change
/// together; the only mutation paths are `select` and `clear`, each of
/// which updates all three in one step.

use iced::widget::image::Handle;
use serde::{Deserialize, Serialize};

/// The value submitted with the hosting form.
///
/// Serialized shape is a compatibility contract with the server-side
/// field handler: `{"pageid":"<string>","filename":"<string>"}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub pageid: String,
    pub filename: String,
}

/// Per-field selection state.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    selection: Option<Selection>,
    /// Decoded preview of the chosen image; None shows the placeholder
    preview: Option<Handle>,
    caption: String,
    /// Placeholder caption recorded at field initialization
    placeholder: String,
    /// True when the current selection came from the any-page flow
    from_dynamic: bool,
}

impl SelectionStore {
    pub fn new(placeholder: impl Into<String>) -> Self {
        SelectionStore {
            selection: None,
            preview: None,
            caption: String::new(),
            placeholder: placeholder.into(),
            from_dynamic: false,
        }
    }

    /// Record a choice. Preview, caption, and hidden value move together.
    pub fn select(
        &mut self,
        selection: Selection,
        preview: Option<Handle>,
        caption: impl Into<String>,
        from_dynamic: bool,
    ) {
        self.selection = Some(selection);
        self.preview = preview;
        self.caption = caption.into();
        self.from_dynamic = from_dynamic;
    }

    /// Reset to "no selection": placeholder preview, empty caption,
    /// empty hidden value.
    pub fn clear(&mut self) {
        self.selection = None;
        self.preview = None;
        self.caption.clear();
        self.from_dynamic = false;
    }

    /// The serialized value submitted with the form; empty string means
    /// no selection. Selection fields are plain strings, so serialization
    /// cannot fail in practice; a failure degrades to the empty value.
    pub fn hidden_value(&self) -> String {
        match &self.selection {
            Some(selection) => serde_json::to_string(selection).unwrap_or_default(),
            None => String::new(),
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn preview(&self) -> Option<&Handle> {
        self.preview.as_ref()
    }

    /// Caption to display: the recorded placeholder while nothing is
    /// selected.
    pub fn caption(&self) -> &str {
        if self.selection.is_some() {
            &self.caption
        } else {
            &self.placeholder
        }
    }

    pub fn from_dynamic(&self) -> bool {
        self.from_dynamic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_value_exact_shape() {
        let mut store = SelectionStore::new("No image selected");
        store.select(
            Selection {
                pageid: "42".to_string(),
                filename: "foo.jpg".to_string(),
            },
            None,
            "foo.jpg - 12kB",
            false,
        );

        assert_eq!(
            store.hidden_value(),
            r#"{"pageid":"42","filename":"foo.jpg"}"#
        );
        assert_eq!(store.caption(), "foo.jpg - 12kB");
    }

    #[test]
    fn test_empty_value_before_any_selection() {
        let store = SelectionStore::new("No image selected");
        assert_eq!(store.hidden_value(), "");
        assert_eq!(store.caption(), "No image selected");
        assert!(store.preview().is_none());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut store = SelectionStore::new("No image selected");
        store.select(
            Selection {
                pageid: "7".to_string(),
                filename: "b.png".to_string(),
            },
            None,
            "b.png",
            true,
        );
        assert!(store.from_dynamic());

        store.clear();

        assert_eq!(store.hidden_value(), "");
        assert_eq!(store.caption(), "No image selected");
        assert!(store.preview().is_none());
        assert!(!store.from_dynamic());
    }

    #[test]
    fn test_reselect_overwrites_previous_choice() {
        let mut store = SelectionStore::new("placeholder");
        store.select(
            Selection {
                pageid: "1".to_string(),
                filename: "old.jpg".to_string(),
            },
            None,
            "old",
            false,
        );
        store.select(
            Selection {
                pageid: "2".to_string(),
                filename: "new.jpg".to_string(),
            },
            None,
            "new",
            true,
        );

        assert_eq!(
            store.hidden_value(),
            r#"{"pageid":"2","filename":"new.jpg"}"#
        );
        assert!(store.from_dynamic());
    }

    #[test]
    fn test_selection_roundtrips_through_json() {
        let selection = Selection {
            pageid: "42".to_string(),
            filename: "foo.jpg".to_string(),
        };
        let json = serde_json::to_string(&selection).unwrap();
        let restored: Selection = serde_json::from_str(&json).unwrap();
        assert_eq!(selection, restored);
    }
}
