//! maindock: a dock that stacks the main dialogs of a package-management UI
//! into one shared window, showing only the most recently opened one.

pub mod cli;
pub mod config;
pub mod dock;
pub mod tui;
pub mod version;
