/// Field instances and the registry that wires them
///
/// A field instance is one logical picker bound to one form value. The
/// registry plays two roles: the field initializer (idempotent
/// discovery/wiring of instances) and the single process-wide
/// modal-refresh listener, dispatching by field identity carried in the
/// notification payload.

use std::collections::HashSet;

use serde::Deserialize;

use super::panel::{PanelSource, ThumbnailPanel};
use super::selection::SelectionStore;

/// Caption shown while no image is selected, recorded per field at
/// initialization time
const PLACEHOLDER_CAPTION: &str = "No image selected";

/// A candidate page for the any-page picker
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PageRef {
    pub id: String,
    pub title: String,
}

/// Host-supplied definition of one fixed panel
#[derive(Deserialize, Debug, Clone)]
pub struct PanelConfig {
    pub title: String,
    pub pageid: String,
    #[serde(default)]
    pub folderpath: Option<String>,
    #[serde(default)]
    pub images_fields: Vec<String>,
}

/// Host-supplied definition of one field instance
#[derive(Deserialize, Debug, Clone)]
pub struct FieldConfig {
    /// Identity used for the idempotency guard and modal dispatch
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub panels: Vec<PanelConfig>,
    /// Whether this field offers the any-page flow
    #[serde(default)]
    pub any_page: bool,
    /// Pages offered by the host's page picker
    #[serde(default)]
    pub any_page_candidates: Vec<PageRef>,
}

/// One wired picker: its panels, its selection, its page-picker candidates.
#[derive(Debug, Clone)]
pub struct FieldInstance {
    pub id: String,
    pub label: String,
    pub selection: SelectionStore,
    pub panels: Vec<ThumbnailPanel>,
    pub any_page_candidates: Vec<PageRef>,
}

impl FieldInstance {
    fn from_config(config: &FieldConfig) -> Self {
        let mut panels: Vec<ThumbnailPanel> = config
            .panels
            .iter()
            .map(|p| {
                ThumbnailPanel::new(
                    p.title.clone(),
                    PanelSource {
                        pageid: p.pageid.clone(),
                        folderpath: p.folderpath.clone(),
                        images_fields: p.images_fields.clone(),
                    },
                )
            })
            .collect();

        if config.any_page {
            panels.push(ThumbnailPanel::new_dynamic("From any page"));
        }

        FieldInstance {
            id: config.id.clone(),
            label: config.label.clone(),
            selection: SelectionStore::new(PLACEHOLDER_CAPTION),
            panels,
            any_page_candidates: config.any_page_candidates.clone(),
        }
    }

    /// Index of the any-page panel, if this field has one
    pub fn dynamic_panel(&self) -> Option<usize> {
        self.panels.iter().position(|p| p.dynamic)
    }
}

/// Payload of an "edit-images dialog closed" notification: which field's
/// control triggered the dialog, and which of its panels it sits next to.
#[derive(Debug, Clone, PartialEq)]
pub struct ModalTrigger {
    pub field_id: String,
    pub panel: usize,
}

/// All wired field instances, keyed by identity.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<FieldInstance>,
    seen: HashSet<String>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        FieldRegistry::default()
    }

    /// Wire every not-yet-initialized field config. Re-running over
    /// already-wired ids is a no-op, so a repeating-item reload can pass
    /// the whole document's configs again and only the newly inserted
    /// fields are wired. Returns how many fields were added.
    pub fn init_all(&mut self, configs: &[FieldConfig]) -> usize {
        let mut added = 0;
        for config in configs {
            if !self.seen.insert(config.id.clone()) {
                continue;
            }
            self.fields.push(FieldInstance::from_config(config));
            added += 1;
        }
        added
    }

    pub fn fields(&self) -> &[FieldInstance] {
        &self.fields
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FieldInstance> {
        self.fields.get_mut(index)
    }

    /// Resolve a field by the identity carried in a host notification.
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<(usize, &mut FieldInstance)> {
        self.fields
            .iter_mut()
            .enumerate()
            .find(|(_, f)| f.id == id)
    }

    /// The single modal-refresh dispatch path. Editing images in the
    /// dialog can change the files server-side, so the triggering
    /// control's sibling panel is force-refreshed, never any other
    /// field's. Returns (field index, panel index, request seq) for the
    /// caller to issue the fetch, or None for an unknown trigger.
    pub fn on_modal_closed(&mut self, trigger: &ModalTrigger) -> Option<(usize, usize, u64)> {
        let (field_index, field) = self.find_by_id_mut(&trigger.field_id)?;
        let panel = field.panels.get_mut(trigger.panel)?;
        let seq = panel.force_load();
        Some((field_index, trigger.panel, seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::panel::LoadState;

    fn config(id: &str, panels: usize) -> FieldConfig {
        FieldConfig {
            id: id.to_string(),
            label: format!("Field {}", id),
            panels: (0..panels)
                .map(|i| PanelConfig {
                    title: format!("Panel {}", i),
                    pageid: format!("{}", 100 + i),
                    folderpath: None,
                    images_fields: Vec::new(),
                })
                .collect(),
            any_page: false,
            any_page_candidates: Vec::new(),
        }
    }

    #[test]
    fn test_init_all_wires_each_field_once() {
        let mut registry = FieldRegistry::new();
        let configs = vec![config("field_a", 2), config("field_b", 1)];

        assert_eq!(registry.init_all(&configs), 2);
        assert_eq!(registry.fields().len(), 2);

        // Re-running over the same document is a no-op
        assert_eq!(registry.init_all(&configs), 0);
        assert_eq!(registry.fields().len(), 2);
    }

    #[test]
    fn test_repeater_reload_wires_only_new_fields() {
        let mut registry = FieldRegistry::new();
        let mut configs = vec![config("field_a", 1)];
        registry.init_all(&configs);

        // Give the existing field some state that must survive the re-scan
        let seq = registry.get_mut(0).unwrap().panels[0].maybe_load().unwrap();
        registry.get_mut(0).unwrap().panels[0].finish_load(seq, Ok(vec![]));

        configs.push(config("field_b", 1));
        assert_eq!(registry.init_all(&configs), 1);
        assert_eq!(registry.fields().len(), 2);
        assert_eq!(registry.fields()[0].panels[0].load, LoadState::Loaded);
    }

    #[test]
    fn test_any_page_config_appends_dynamic_panel() {
        let mut registry = FieldRegistry::new();
        let mut cfg = config("field_a", 1);
        cfg.any_page = true;
        registry.init_all(&[cfg]);

        let field = &registry.fields()[0];
        assert_eq!(field.panels.len(), 2);
        assert_eq!(field.dynamic_panel(), Some(1));
    }

    #[test]
    fn test_modal_close_refreshes_only_the_paired_panel() {
        let mut registry = FieldRegistry::new();
        registry.init_all(&[config("field_a", 2), config("field_b", 1)]);

        // Load the target panel so the refresh has a cache to discard
        let seq = registry.get_mut(0).unwrap().panels[1].maybe_load().unwrap();
        registry.get_mut(0).unwrap().panels[1].finish_load(seq, Ok(vec![]));

        let trigger = ModalTrigger {
            field_id: "field_a".to_string(),
            panel: 1,
        };
        let (field_index, panel_index, _seq) = registry.on_modal_closed(&trigger).unwrap();
        assert_eq!((field_index, panel_index), (0, 1));

        // The paired panel is loading again; every other panel untouched
        assert!(registry.fields()[0].panels[1].is_loading());
        assert_eq!(registry.fields()[0].panels[0].load, LoadState::Unloaded);
        assert_eq!(registry.fields()[1].panels[0].load, LoadState::Unloaded);
    }

    #[test]
    fn test_modal_close_for_unknown_trigger_is_ignored() {
        let mut registry = FieldRegistry::new();
        registry.init_all(&[config("field_a", 1)]);

        let trigger = ModalTrigger {
            field_id: "no_such_field".to_string(),
            panel: 0,
        };
        assert!(registry.on_modal_closed(&trigger).is_none());

        let trigger = ModalTrigger {
            field_id: "field_a".to_string(),
            panel: 9,
        };
        assert!(registry.on_modal_closed(&trigger).is_none());
    }
}
