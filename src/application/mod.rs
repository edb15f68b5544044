// Application layer - Synchronization loop, commands and the seams they drive
pub mod control_api;
pub mod dashboard_controller;
pub mod error;
pub mod poll_loop;
pub mod view;

#[cfg(test)]
pub mod testing;
