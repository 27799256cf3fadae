use iced::widget::{button, column, container, mouse_area, row, text, Column};
use iced::{Alignment, Element, Length};
use iced_aw::Wrap;

use crate::state::field::FieldInstance;
use crate::state::panel::{LoadState, Thumbnail, ThumbnailPanel};
use crate::ui::preview;
use crate::Message;

/// Displayed width of one thumbnail in the grid
const THUMB_WIDTH: f32 = 120.0;

/// One complete field instance: label, preview area, panels.
pub fn field_view(index: usize, field: &FieldInstance) -> Element<'_, Message> {
    let mut content: Column<'_, Message> = column![
        text(&field.label).size(20),
        preview::preview_view(index, field),
    ]
    .spacing(12);

    for (panel_index, panel) in field.panels.iter().enumerate() {
        if panel.dynamic {
            content = content.push(any_page_section(index, field, panel_index, panel));
        } else {
            content = content.push(panel_view(index, panel_index, panel));
        }
    }

    container(content.padding(16))
        .style(container::bordered_box)
        .width(Length::Fill)
        .into()
}

/// A fixed-source collapsible panel.
fn panel_view<'a>(
    field_index: usize,
    panel_index: usize,
    panel: &'a ThumbnailPanel,
) -> Element<'a, Message> {
    let marker = if panel.expanded { "▾" } else { "▸" };
    let mut title_row = row![text(marker), text(&panel.title).size(16)]
        .spacing(8)
        .align_y(Alignment::Center);
    if panel.is_loading() {
        title_row = title_row.push(text("(loading)").size(13));
    }

    let header = mouse_area(title_row).on_press(Message::PanelToggled {
        field: field_index,
        panel: panel_index,
    });

    let mut section: Column<'a, Message> = column![header].spacing(8);

    if panel.expanded {
        section = section.push(panel_content(field_index, panel_index, panel));
        section = section.push(
            button(text("Edit images").size(13))
                .style(button::secondary)
                .on_press(Message::EditImagesClicked {
                    field: field_index,
                    panel: panel_index,
                }),
        );
    }

    container(section.padding(8))
        .style(container::rounded_box)
        .width(Length::Fill)
        .into()
}

/// The any-page flow: the host's page-picker surrogate plus the dynamic
/// panel it feeds.
fn any_page_section<'a>(
    field_index: usize,
    field: &'a FieldInstance,
    panel_index: usize,
    panel: &'a ThumbnailPanel,
) -> Element<'a, Message> {
    let mut picker = row![text("From any page:").size(14)]
        .spacing(8)
        .align_y(Alignment::Center);
    for page in &field.any_page_candidates {
        picker = picker.push(
            button(text(&page.title).size(13))
                .style(button::secondary)
                .on_press(Message::PageSelected {
                    field_id: field.id.clone(),
                    page: page.clone(),
                }),
        );
    }

    let mut section: Column<'a, Message> = column![picker].spacing(8);

    if !panel.label.is_empty() {
        let marker = if panel.visible { "▾" } else { "▸" };
        let header = mouse_area(
            row![text(marker), text(&panel.label).size(16)]
                .spacing(8)
                .align_y(Alignment::Center),
        )
        .on_press(Message::AnyPageHeaderClicked { field: field_index });
        section = section.push(header);
    }

    if panel.visible {
        section = section.push(panel_content(field_index, panel_index, panel));
    }

    container(section.padding(8))
        .style(container::rounded_box)
        .width(Length::Fill)
        .into()
}

/// Panel body: loading indicator, empty note, or the thumbnail grid.
fn panel_content<'a>(
    field_index: usize,
    panel_index: usize,
    panel: &'a ThumbnailPanel,
) -> Element<'a, Message> {
    match panel.load {
        // Failed keeps the indicator up; the diagnostic went to stderr
        LoadState::Loading { .. } | LoadState::Failed => text("Loading…").size(14).into(),
        LoadState::Unloaded => text("").size(14).into(),
        LoadState::Loaded if panel.thumbnails.is_empty() => {
            text("No images found").size(14).into()
        }
        LoadState::Loaded => {
            let mut grid = Wrap::new().spacing(8.0).line_spacing(8.0);
            for (index, thumbnail) in panel.thumbnails.iter().enumerate() {
                grid = grid.push(thumbnail_view(field_index, panel_index, index, thumbnail));
            }
            grid.into()
        }
    }
}

/// One clickable thumbnail entry.
fn thumbnail_view<'a>(
    field_index: usize,
    panel_index: usize,
    index: usize,
    thumbnail: &'a Thumbnail,
) -> Element<'a, Message> {
    let visual: Element<'a, Message> = match &thumbnail.handle {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(THUMB_WIDTH))
            .into(),
        // Image failed to load; the entry stays selectable by name
        None => text(&thumbnail.entry.filename).size(13).into(),
    };

    mouse_area(
        column![visual, text(&thumbnail.entry.filename).size(11)]
            .spacing(4)
            .width(Length::Fixed(THUMB_WIDTH)),
    )
    .on_press(Message::ThumbnailClicked {
        field: field_index,
        panel: panel_index,
        index,
    })
    .into()
}
