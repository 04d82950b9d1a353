//! Core dock types
//!
//! Identifiers, handles and the small value types shared by the dock,
//! its host container and the dialog registry.

use ratatui::layout::Rect;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Unique identifier for dialog instances
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogId(pub String);

impl DialogId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DialogId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DialogId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for DialogId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-owning reference to a dialog's visual representation.
///
/// The dialog object itself belongs to whoever created it. The dock and its
/// container only ever address the dialog through its [`DialogId`], so a
/// handle whose dialog is already gone is inert rather than dangling.
///
/// Two handles are the same dialog when their ids match; the title is
/// display metadata and takes no part in identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogHandle {
    id: DialogId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
}

impl DialogHandle {
    pub fn new(id: impl Into<DialogId>) -> Self {
        Self {
            id: id.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn id(&self) -> &DialogId {
        &self.id
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
}

impl PartialEq for DialogHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for DialogHandle {}

impl Hash for DialogHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Kind of an open dialog as reported by the dialog registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    /// Top-level application window, docked when possible
    Main,
    /// Wizard window; docks like a main dialog
    Wizard,
    /// Transient dialog that renders above everything and blocks docking
    Popup,
}

impl DialogKind {
    /// Whether a dialog of this kind lives in the dock
    pub fn is_dockable(self) -> bool {
        matches!(self, Self::Main | Self::Wizard)
    }
}

impl Default for DialogKind {
    fn default() -> Self {
        Self::Main
    }
}

/// Edge on which the side-bar inset is reserved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutDirection {
    /// Side bar on the left, dialog to its right
    #[serde(rename = "ltr")]
    LeftToRight,
    /// Side bar on the right, dialog to its left
    #[serde(rename = "rtl")]
    RightToLeft,
}

impl Default for LayoutDirection {
    fn default() -> Self {
        Self::LeftToRight
    }
}

impl FromStr for LayoutDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ltr" | "left-to-right" | "left_to_right" => Ok(Self::LeftToRight),
            "rtl" | "right-to-left" | "right_to_left" => Ok(Self::RightToLeft),
            other => Err(format!("unknown layout direction '{}'", other)),
        }
    }
}

/// Occupancy state of the dock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DockState {
    /// Nothing docked, container hidden
    Empty,
    /// At least one dialog docked, the topmost one shown
    Occupied,
}

/// Notifications the dock sends to the application's event handling
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DockEvent {
    /// The window manager asked to close the dock; treat it like the user
    /// cancelling the topmost dialog
    Cancel { dialog: Option<DialogId> },
    /// A dialog was pushed onto the dock
    Docked(DialogId),
    /// A dialog was taken off the dock
    Undocked(DialogId),
}

/// Serialisable view of the dock at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockSnapshot {
    pub state: DockState,
    pub stack: Vec<DialogId>,
    pub topmost: Option<DialogId>,
    pub visible: bool,
    pub side_bar_width: u16,
    pub container: Rect,
    pub child: Option<Rect>,
}

/// Result type for dock operations
pub type DockResult<T> = std::result::Result<T, DockError>;

/// Dock-specific error types
#[derive(Debug, thiserror::Error)]
pub enum DockError {
    #[error("The dialog dock already exists; install the container factory before first use")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_identity_ignores_title() {
        let a = DialogHandle::new("selector").with_title("Software Management");
        let b = DialogHandle::new("selector");
        let c = DialogHandle::new("wizard");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.title(), Some("Software Management"));
        assert_eq!(b.title(), None);
    }

    #[test]
    fn test_dialog_kind_dockable() {
        assert!(DialogKind::Main.is_dockable());
        assert!(DialogKind::Wizard.is_dockable());
        assert!(!DialogKind::Popup.is_dockable());
    }

    #[test]
    fn test_layout_direction_parsing() {
        assert_eq!("ltr".parse::<LayoutDirection>(), Ok(LayoutDirection::LeftToRight));
        assert_eq!("RTL".parse::<LayoutDirection>(), Ok(LayoutDirection::RightToLeft));
        assert!("sideways".parse::<LayoutDirection>().is_err());
    }

    #[test]
    fn test_dock_event_serialization() {
        let event = DockEvent::Cancel {
            dialog: Some(DialogId::new("selector")),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({"cancel": {"dialog": "selector"}}));
    }
}
