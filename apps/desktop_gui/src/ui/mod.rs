//! UI layer for desktop GUI: app shell and toast region.

pub mod app;
pub mod toasts;

pub use app::MintApp;
