use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length};

use crate::state::field::FieldInstance;
use crate::Message;

/// Displayed width of the chosen-image preview
const PREVIEW_WIDTH: f32 = 260.0;

/// The chosen-image area: preview (or placeholder), caption, remove
/// control, and the serialized value that would be submitted with the
/// form.
pub fn preview_view(field_index: usize, field: &FieldInstance) -> Element<'_, Message> {
    let visual: Element<'_, Message> = match field.selection.preview() {
        Some(handle) => iced::widget::image(handle.clone())
            .width(Length::Fixed(PREVIEW_WIDTH))
            .into(),
        None => container(text("·").size(40))
            .width(Length::Fixed(PREVIEW_WIDTH))
            .height(Length::Fixed(120.0))
            .center_x(Length::Fixed(PREVIEW_WIDTH))
            .center_y(Length::Fixed(120.0))
            .style(container::rounded_box)
            .into(),
    };

    let mut details = column![text(field.selection.caption()).size(14)].spacing(8);

    if field.selection.selection().is_some() {
        details = details.push(
            button(text("Remove").size(13))
                .style(button::danger)
                .on_press(Message::RemoveSelection { field: field_index }),
        );
    }

    // What the hosting form would submit
    details = details.push(
        text(format!("value: {}", field.selection.hidden_value())).size(11),
    );

    row![visual, details]
        .spacing(16)
        .align_y(Alignment::Start)
        .into()
}
