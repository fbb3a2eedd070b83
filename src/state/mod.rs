// State management module
// Handles the dependencies shared by every request

pub mod app_state;

pub use app_state::AppState;
