//! Full-screen search result picker.

mod app;
mod events;
mod rendering;

pub use app::PickerApp;
pub use events::pick;
