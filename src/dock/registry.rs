//! Registry of open dialogs
//!
//! The dock decides whether a new main dialog may be docked by looking at
//! every dialog the application currently has open, docked or not.

use super::types::{DialogHandle, DialogId, DialogKind};
use serde::Serialize;
use std::cell::RefCell;
use tracing::{debug, warn};

/// An open dialog together with its kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenDialog {
    pub handle: DialogHandle,
    pub kind: DialogKind,
}

impl OpenDialog {
    pub fn new(handle: DialogHandle, kind: DialogKind) -> Self {
        Self { handle, kind }
    }

    pub fn id(&self) -> &DialogId {
        self.handle.id()
    }
}

/// Source of truth for the set of open dialogs
pub trait DialogRegistry {
    /// Every dialog currently open, oldest first.
    ///
    /// `None` if the set of open dialogs cannot be read right now.
    fn open_dialogs(&self) -> Option<Vec<OpenDialog>>;
}

impl<R: DialogRegistry + ?Sized> DialogRegistry for RefCell<R> {
    fn open_dialogs(&self) -> Option<Vec<OpenDialog>> {
        match self.try_borrow() {
            Ok(registry) => registry.open_dialogs(),
            Err(_) => {
                warn!("Dialog registry is being modified; open dialogs unknown");
                None
            }
        }
    }
}

impl DialogRegistry for Vec<OpenDialog> {
    fn open_dialogs(&self) -> Option<Vec<OpenDialog>> {
        Some(self.clone())
    }
}

/// Ordered list of open dialogs maintained by a dialog-creation layer
#[derive(Debug, Default, Clone)]
pub struct OpenDialogs {
    dialogs: Vec<OpenDialog>,
}

impl OpenDialogs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly opened dialog. Returns `false` if the id is already open.
    pub fn open(&mut self, handle: DialogHandle, kind: DialogKind) -> bool {
        if self.contains(handle.id()) {
            warn!("Dialog {} is already registered as open", handle.id());
            return false;
        }

        debug!("Registered {:?} dialog {}", kind, handle.id());
        self.dialogs.push(OpenDialog::new(handle, kind));
        true
    }

    /// Forget a closed dialog
    pub fn close(&mut self, id: &DialogId) -> Option<OpenDialog> {
        let index = self.dialogs.iter().position(|dialog| dialog.id() == id)?;
        let dialog = self.dialogs.remove(index);
        debug!("Unregistered {:?} dialog {}", dialog.kind, id);
        Some(dialog)
    }

    /// Most recently opened dialog
    pub fn topmost(&self) -> Option<&OpenDialog> {
        self.dialogs.last()
    }

    pub fn get(&self, id: &DialogId) -> Option<&OpenDialog> {
        self.dialogs.iter().find(|dialog| dialog.id() == id)
    }

    pub fn contains(&self, id: &DialogId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpenDialog> {
        self.dialogs.iter()
    }

    pub fn len(&self) -> usize {
        self.dialogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialogs.is_empty()
    }

    /// Whether any popup is currently open
    pub fn has_popup(&self) -> bool {
        self.dialogs.iter().any(|dialog| dialog.kind == DialogKind::Popup)
    }
}

impl DialogRegistry for OpenDialogs {
    fn open_dialogs(&self) -> Option<Vec<OpenDialog>> {
        Some(self.dialogs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_and_close() {
        let mut dialogs = OpenDialogs::new();
        assert!(dialogs.open(DialogHandle::new("selector"), DialogKind::Main));
        assert!(dialogs.open(DialogHandle::new("confirm"), DialogKind::Popup));

        assert_eq!(dialogs.len(), 2);
        assert!(dialogs.has_popup());
        assert_eq!(dialogs.topmost().map(|d| d.id().as_str()), Some("confirm"));

        let closed = dialogs.close(&DialogId::new("confirm")).unwrap();
        assert_eq!(closed.kind, DialogKind::Popup);
        assert!(!dialogs.has_popup());
        assert_eq!(dialogs.topmost().map(|d| d.id().as_str()), Some("selector"));
    }

    #[test]
    fn test_duplicate_open_rejected() {
        let mut dialogs = OpenDialogs::new();
        assert!(dialogs.open(DialogHandle::new("selector"), DialogKind::Main));
        assert!(!dialogs.open(DialogHandle::new("selector"), DialogKind::Popup));
        assert_eq!(dialogs.len(), 1);
        assert_eq!(dialogs.get(&DialogId::new("selector")).unwrap().kind, DialogKind::Main);
    }

    #[test]
    fn test_close_unknown_returns_none() {
        let mut dialogs = OpenDialogs::new();
        assert!(dialogs.close(&DialogId::new("ghost")).is_none());
    }

    #[test]
    fn test_refcell_registry_reports_contents() {
        let registry = RefCell::new(OpenDialogs::new());
        registry.borrow_mut().open(DialogHandle::new("selector"), DialogKind::Main);

        let open = registry.open_dialogs().unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id().as_str(), "selector");
    }

    #[test]
    fn test_refcell_registry_while_borrowed_mutably() {
        let registry = RefCell::new(OpenDialogs::new());
        let mut guard = registry.borrow_mut();
        guard.open(DialogHandle::new("selector"), DialogKind::Main);

        assert!(registry.open_dialogs().is_none());
    }
}
