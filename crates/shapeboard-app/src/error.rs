//! Application errors.

use shapeboard_core::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Shape catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
