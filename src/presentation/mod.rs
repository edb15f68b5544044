// Presentation layer - Browser-facing HTTP surface
pub mod app_state;
pub mod handlers;
pub mod router;
pub mod snapshot_view;
