//! Application state modules
//!
//! State structs own their related fields and async tasks; poll methods
//! communicate results back to GazetteerApp through events instead of
//! mutating the app directly.

mod location;

pub use location::{CountryLoad, LocationState, Selection};

/// Events that state poll methods can return
#[derive(Debug)]
pub enum StateEvent {
    /// Update the status message
    StatusMessage(String),

    /// Log an error message
    LogError(String),

    /// Log an info message
    LogInfo(String),
}
