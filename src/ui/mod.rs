//! UI rendering for the location picker

mod picker;
pub mod theme;

pub use picker::render_picker;
