/// Widget views
///
/// This module builds the iced element tree for the picker:
/// - `panel.rs` - field layout, collapsible panels, thumbnail grid
/// - `preview.rs` - chosen-image preview, caption, remove control

pub mod panel;
pub mod preview;
