use iced::widget::{button, column, container, row, scrollable, text, Column};
use iced::{Element, Length, Task, Theme};

mod config;
mod fetch;
mod state;
mod ui;

use config::HostConfig;
use state::field::{FieldRegistry, ModalTrigger, PageRef};
use state::panel::Thumbnail;
use state::selection::Selection;

/// Main application state
struct ImagerefPicker {
    /// Host-supplied configuration (endpoint URL, field definitions)
    config: HostConfig,
    /// Shared HTTP client for all panel fetches
    http: reqwest::Client,
    /// All wired field instances
    registry: FieldRegistry,
    /// Open edit-images dialog, if any (the host owns this in production)
    editing: Option<ModalTrigger>,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
///
/// Panel/thumbnail interactions carry plain indices; notifications that
/// come from the host (page picker, modal lifecycle, repeater reload)
/// carry field identity, the way the host addresses fields.
#[derive(Debug, Clone)]
enum Message {
    /// User clicked a fixed panel's header (expand/collapse)
    PanelToggled { field: usize, panel: usize },
    /// A background fetch for one panel completed
    ThumbnailsFetched {
        field: usize,
        panel: usize,
        seq: u64,
        result: Result<Vec<Thumbnail>, String>,
    },
    /// User clicked a thumbnail inside a loaded panel
    ThumbnailClicked {
        field: usize,
        panel: usize,
        index: usize,
    },
    /// User clicked the remove control on the preview
    RemoveSelection { field: usize },
    /// Host page picker chose a page for the any-page flow
    PageSelected { field_id: String, page: PageRef },
    /// User clicked the any-page panel header (show/hide toggle)
    AnyPageHeaderClicked { field: usize },
    /// User opened the edit-images dialog for one panel
    EditImagesClicked { field: usize, panel: usize },
    /// Host reports the edit-images dialog closed
    ModalClosed { trigger: ModalTrigger },
    /// Host repeating-item UI inserted a new block
    AddRepeaterItem,
}

impl ImagerefPicker {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = HostConfig::load();

        let mut registry = FieldRegistry::new();
        let wired = registry.init_all(&config.fields);
        println!("🖼️  Image reference picker initialized with {} field(s)", wired);

        let status = format!("Ready. {} picker field(s) on this form.", wired);

        (
            ImagerefPicker {
                config,
                http: reqwest::Client::new(),
                registry,
                editing: None,
                status,
            },
            Task::none(),
        )
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PanelToggled { field, panel } => {
                let base = self.config.url.clone();
                let Some(instance) = self.registry.get_mut(field) else {
                    return Task::none();
                };
                let Some(target) = instance.panels.get_mut(panel) else {
                    return Task::none();
                };

                target.expanded = !target.expanded;

                // Lazy policy: fetch only on an expand that finds no
                // trusted content
                if target.expanded {
                    if let Some(seq) = target.maybe_load() {
                        let url = fetch::url::thumbnails_url(&base, &target.source);
                        return self.fetch_task(field, panel, seq, url);
                    }
                }
                Task::none()
            }

            Message::ThumbnailsFetched {
                field,
                panel,
                seq,
                result,
            } => {
                let Some(instance) = self.registry.get_mut(field) else {
                    return Task::none();
                };
                let Some(target) = instance.panels.get_mut(panel) else {
                    return Task::none();
                };

                let applied = target.finish_load(seq, result);
                if applied && target.load == state::panel::LoadState::Loaded {
                    self.status = format!(
                        "Loaded {} thumbnail(s) for '{}'.",
                        target.thumbnails.len(),
                        target.title
                    );
                }
                Task::none()
            }

            Message::ThumbnailClicked {
                field,
                panel,
                index,
            } => {
                let Some(instance) = self.registry.get_mut(field) else {
                    return Task::none();
                };

                let picked = {
                    let Some(target) = instance.panels.get(panel) else {
                        return Task::none();
                    };
                    let Some(thumbnail) = target.thumbnails.get(index) else {
                        return Task::none();
                    };
                    (
                        Selection {
                            pageid: thumbnail.entry.pageid.clone(),
                            filename: thumbnail.entry.filename.clone(),
                        },
                        thumbnail.handle.clone(),
                        thumbnail.entry.info.clone(),
                        target.dynamic,
                    )
                };

                let (selection, preview, caption, from_dynamic) = picked;
                let filename = selection.filename.clone();
                // Preview, caption, and hidden value move in one step
                instance
                    .selection
                    .select(selection, preview, caption, from_dynamic);
                self.status = format!("Selected {}.", filename);
                Task::none()
            }

            Message::RemoveSelection { field } => {
                if let Some(instance) = self.registry.get_mut(field) {
                    instance.selection.clear();
                    self.status = "Selection removed.".to_string();
                }
                Task::none()
            }

            Message::PageSelected { field_id, page } => {
                let base = self.config.url.clone();
                let Some((field_index, instance)) = self.registry.find_by_id_mut(&field_id)
                else {
                    return Task::none();
                };
                let Some(panel_index) = instance.dynamic_panel() else {
                    return Task::none();
                };

                // Rewrite the dynamic panel's source and fetch eagerly,
                // bypassing the cache
                let target = &mut instance.panels[panel_index];
                target.source.pageid = page.id.clone();
                target.label = page.title.clone();
                target.visible = true;
                let seq = target.force_load();
                let url = fetch::url::thumbnails_url(&base, &target.source);

                self.status = format!("Browsing images on '{}'.", page.title);
                self.fetch_task(field_index, panel_index, seq, url)
            }

            Message::AnyPageHeaderClicked { field } => {
                let Some(instance) = self.registry.get_mut(field) else {
                    return Task::none();
                };

                // Presentational only: show/hide the thumbnails when the
                // current selection came from the any-page flow. Cache and
                // selection state are untouched.
                if instance.selection.from_dynamic() {
                    if let Some(panel_index) = instance.dynamic_panel() {
                        let target = &mut instance.panels[panel_index];
                        target.visible = !target.visible;
                    }
                }
                Task::none()
            }

            Message::EditImagesClicked { field, panel } => {
                if let Some(instance) = self.registry.get_mut(field) {
                    if panel < instance.panels.len() {
                        self.editing = Some(ModalTrigger {
                            field_id: instance.id.clone(),
                            panel,
                        });
                        self.status = "Edit-images dialog open.".to_string();
                    }
                }
                Task::none()
            }

            Message::ModalClosed { trigger } => {
                self.editing = None;

                // Files may have changed server-side; the paired panel's
                // cache is stale and must be discarded unconditionally
                let Some((field, panel, seq)) = self.registry.on_modal_closed(&trigger) else {
                    return Task::none();
                };

                let source = self.registry.fields()[field].panels[panel].source.clone();
                let url = fetch::url::thumbnails_url(&self.config.url, &source);
                self.status = "Refreshing thumbnails after image edits…".to_string();
                self.fetch_task(field, panel, seq, url)
            }

            Message::AddRepeaterItem => {
                // The host's repeating-item UI inserted a block; re-scan
                // the whole document and wire only what is new
                let next = self.config.fields.len() + 1;
                if let Some(mut item) = self.config.fields.first().cloned() {
                    item.id = format!("{}_{}", item.id, next);
                    item.label = format!("{} #{}", item.label, next);
                    self.config.fields.push(item);
                }

                let added = self.registry.init_all(&self.config.fields);
                self.status = format!("Repeater block reloaded, wired {} new field(s).", added);
                Task::none()
            }
        }
    }

    /// Spawn one panel fetch; the completion message carries the request
    /// sequence number so stale responses can be recognized.
    fn fetch_task(&self, field: usize, panel: usize, seq: u64, url: String) -> Task<Message> {
        let client = self.http.clone();
        Task::perform(
            fetch::client::fetch_thumbnails(client, url),
            move |result| Message::ThumbnailsFetched {
                field,
                panel,
                seq,
                result,
            },
        )
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        let mut fields: Column<Message> = column![].spacing(16);
        for (index, field) in self.registry.fields().iter().enumerate() {
            fields = fields.push(ui::panel::field_view(index, field));
        }

        let mut content: Column<Message> = column![
            text("Image Reference Picker").size(28),
            fields,
            row![button(text("Add repeater item").size(13)).on_press(Message::AddRepeaterItem)]
                .spacing(8),
        ]
        .spacing(20)
        .padding(24);

        // Stand-in for the host's modal dialog lifecycle
        if let Some(trigger) = &self.editing {
            content = content.push(
                container(
                    column![
                        text("Edit images (host dialog)").size(16),
                        text("Add, remove or rename images, then close.").size(13),
                        button(text("Close dialog").size(13)).on_press(Message::ModalClosed {
                            trigger: trigger.clone(),
                        }),
                    ]
                    .spacing(8)
                    .padding(12),
                )
                .style(container::bordered_box),
            );
        }

        content = content.push(text(&self.status).size(14));

        scrollable(
            container(content)
                .width(Length::Fill)
                .center_x(Length::Fill),
        )
        .height(Length::Fill)
        .into()
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    iced::application(
        "Image Reference Picker",
        ImagerefPicker::update,
        ImagerefPicker::view,
    )
    .theme(ImagerefPicker::theme)
    .centered()
    .run_with(ImagerefPicker::new)
}
