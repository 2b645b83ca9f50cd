//! Shapeboard Application
//!
//! Windowing, input routing and frame rendering for the shape editor.

mod app;
mod error;
mod event_handler;
mod ui;

pub use app::{App, AppConfig};
pub use error::AppError;
pub use event_handler::{EventHandler, to_modifiers};
pub use ui::{UiAction, render_ui};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::run_wasm;
