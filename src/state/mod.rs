/// State management module
///
/// This module handles all widget state, including:
/// - Field instances and the init/dispatch registry (field.rs)
/// - Panel cache states and the lazy-load policy (panel.rs)
/// - The recorded selection and its serialized form value (selection.rs)

pub mod field;
pub mod panel;
pub mod selection;
