//! Docking of main dialogs
//!
//! Main dialogs of the package manager are stacked into one shared
//! container, with only the most recently added one visible. Popup dialogs
//! are never docked and prevent docking while they are open.
//!
//! The dock talks to the windowing host through [`DockContainer`] and to
//! the dialog-creation layer through [`DialogRegistry`] and dock events.

pub mod host;
pub mod manager;
pub mod registry;
pub mod singleton;
pub mod types;

pub use host::{DockContainer, SlotContainer};
pub use manager::DialogDock;
pub use registry::{DialogRegistry, OpenDialog, OpenDialogs};
pub use singleton::{dock, install_container_factory, is_initialized};
pub use types::*;
