// Presentation layer - HTTP surface and embedded assets
pub mod app_state;
pub mod assets;
pub mod handlers;
